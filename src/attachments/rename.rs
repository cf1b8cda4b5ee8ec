use std::collections::HashMap;
use std::future::Future;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::Result;

/// Draft-side attachment whose filename may have been edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftAttachment {
    #[serde(rename = "ID", deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub url: String,
    pub filename: String,
}

/// Attachment as currently persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedAttachment {
    #[serde(rename = "ID", deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub filename: String,
    #[serde(rename = "folderId")]
    pub folder_id: String,
}

/// An attachment to rename remotely from `prevname` to `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameDescriptor {
    #[serde(rename = "ID")]
    pub id: String,
    pub url: String,
    pub name: String,
    pub prevname: String,
    #[serde(rename = "folderId")]
    pub folder_id: String,
}

// Integer keys from the persistence layer compare equal to their string form.
fn id_from_string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

/// Lookup of persisted attachments by id.
pub trait AttachmentPersistence: Send + Sync {
    /// Opaque handle identifying the attachment entity to query.
    type Context: Send + Sync;

    fn get_existing_attachments(
        &self,
        ids: &[String],
        context: &Self::Context,
    ) -> impl Future<Output = Result<Vec<PersistedAttachment>>> + Send;
}

/// Candidates whose filename differs from the persisted one, in candidate order.
///
/// Candidates without a persisted counterpart are skipped, not reported.
pub async fn diff_renamed_attachments<P: AttachmentPersistence>(
    persistence: &P,
    candidates: &[DraftAttachment],
    attachment_ids: &[String],
    context: &P::Context,
) -> Result<Vec<RenameDescriptor>> {
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let existing = persistence.get_existing_attachments(attachment_ids, context).await?;
    // first record wins on repeated ids
    let mut by_id: HashMap<&str, &PersistedAttachment> = HashMap::with_capacity(existing.len());
    for attachment in &existing {
        by_id.entry(attachment.id.as_str()).or_insert(attachment);
    }

    let renamed: Vec<RenameDescriptor> = candidates
        .iter()
        .filter_map(|draft| {
            let persisted = by_id.get(draft.id.as_str())?;
            (persisted.filename != draft.filename).then(|| RenameDescriptor {
                id: draft.id.clone(),
                url: draft.url.clone(),
                name: draft.filename.clone(),
                prevname: persisted.filename.clone(),
                folder_id: persisted.folder_id.clone(),
            })
        })
        .collect();

    debug!(
        candidates = candidates.len(),
        renamed = renamed.len(),
        "attachment rename diff computed"
    );
    Ok(renamed)
}
