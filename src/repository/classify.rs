use std::collections::HashMap;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::cache::store::CacheStore;
use crate::cache::token::REPOSITORY_TYPE_TTL_SECONDS;
use crate::error::{Result, UtilError};
use crate::observability::metrics::get_metrics;

pub const CONTENT_STREAM_UPDATABILITY: &str = "capabilityContentStreamUpdatability";
/// Capability value of repositories that keep a version per content update.
pub const PWC_ONLY: &str = "pwconly";

/// Repository metadata as returned by the repository info endpoint:
/// `{ "data": { "<id>": { "capabilities": { .. } } } }`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RepositoryInfo {
    #[serde(default)]
    pub data: HashMap<String, RepositoryData>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RepositoryData {
    #[serde(default)]
    pub capabilities: HashMap<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    Versioned,
    NonVersioned,
}

impl RepositoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepositoryType::Versioned => "versioned",
            RepositoryType::NonVersioned => "non-versioned",
        }
    }

    fn from_capabilities(capabilities: &HashMap<String, Value>) -> Self {
        match capabilities.get(CONTENT_STREAM_UPDATABILITY).and_then(Value::as_str) {
            Some(PWC_ONLY) => RepositoryType::Versioned,
            _ => RepositoryType::NonVersioned,
        }
    }
}

impl FromStr for RepositoryType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "versioned" => Ok(RepositoryType::Versioned),
            "non-versioned" => Ok(RepositoryType::NonVersioned),
            other => Err(format!("unknown repository type '{}'", other)),
        }
    }
}

/// `true` when the repository is version-controlled.
///
/// Always computed from `repository_info`; the result is cached under
/// `repository_id` for 60 days only if nothing is cached for it yet.
pub fn classify_repository<S>(store: &S, repository_info: &RepositoryInfo, repository_id: &str) -> Result<bool>
where
    S: CacheStore + ?Sized,
{
    let repository = repository_info
        .data
        .get(repository_id)
        .ok_or_else(|| UtilError::UnknownRepository(repository_id.to_owned()))?;

    let repository_type = RepositoryType::from_capabilities(&repository.capabilities);
    get_metrics()
        .repository_classifications
        .with_label_values(&[repository_type.as_str()])
        .inc();

    save_repository_type(store, repository_id, repository_type);
    Ok(repository_type == RepositoryType::Versioned)
}

/// Classification cached by an earlier [`classify_repository`] call.
pub fn cached_repository_type<S>(store: &S, repository_id: &str) -> Option<RepositoryType>
where
    S: CacheStore + ?Sized,
{
    store.get(repository_id).and_then(|v| v.parse().ok())
}

fn save_repository_type<S>(store: &S, repository_id: &str, repository_type: RepositoryType)
where
    S: CacheStore + ?Sized,
{
    if store.get(repository_id).is_none() {
        debug!(repository_id, repository_type = repository_type.as_str(), "caching repository type");
        store.set(repository_id, repository_type.as_str().to_owned(), REPOSITORY_TYPE_TTL_SECONDS);
    }
}
