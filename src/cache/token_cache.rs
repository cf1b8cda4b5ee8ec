use tracing::{debug, error, info};

use crate::cache::store::CacheStore;
use crate::cache::token::{TokenFlow, CLIENT_CREDENTIALS_KEY, TOKEN_TTL_SECONDS};
use crate::config::credentials::Credentials;
use crate::error::Result;
use crate::helpers::time::is_token_expired;
use crate::observability::metrics::get_metrics;
use crate::parser::parser::decode_access_token;
use crate::repository::classify::{self, RepositoryInfo, RepositoryType};
use crate::sources::TokenIssuer;

/// Memoizes bearer tokens in front of a [`TokenIssuer`].
///
/// - user tokens are keyed by the `email` claim of the token,
/// - the client-credentials token is keyed by [`CLIENT_CREDENTIALS_KEY`],
/// - both live [`TOKEN_TTL_SECONDS`] in the store.
///
/// Concurrent misses for the same key may both reach the issuer; the last write wins.
#[derive(Debug, Clone)]
pub struct TokenCacheManager<S, I> {
    store: S,
    issuer: I,
}

impl<S: CacheStore, I: TokenIssuer> TokenCacheManager<S, I> {
    pub fn new(store: S, issuer: I) -> Self {
        Self { store, issuer }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn issuer(&self) -> &I {
        &self.issuer
    }

    /// Token for the user behind `presented_token`, issued on a miss and
    /// re-issued when the cached one is past its `exp` claim.
    pub async fn fetch_user_token(&self, credentials: &Credentials, presented_token: &str) -> Result<String> {
        let metrics = get_metrics();
        let flow = TokenFlow::User;
        let presented = decode_access_token(presented_token)?;

        let Some(cached) = self.store.get(&presented.email) else {
            metrics.cache_misses.with_label_values(&[flow.as_str()]).inc();
            debug!("no cached user token, requesting a new one");

            let token = self.issue(flow, self.issuer.issue_user_token(presented_token, credentials)).await?;
            let user = decode_access_token(&token)?.email;
            self.store.set(&user, token.clone(), TOKEN_TTL_SECONDS);
            return Ok(token);
        };

        let cached_claims = decode_access_token(&cached)?;
        if !is_token_expired(cached_claims.exp) {
            metrics.cache_hits.with_label_values(&[flow.as_str()]).inc();
            return Ok(cached);
        }

        info!(exp = cached_claims.exp, "cached user token expired, re-issuing");
        metrics.token_refreshes.with_label_values(&[flow.as_str()]).inc();

        // resolved before the old entry is touched: a failed refresh leaves the cache as is
        let token = self.issue(flow, self.issuer.issue_user_token(presented_token, credentials)).await?;
        self.store.delete(&cached_claims.email);
        self.store.set(&cached_claims.email, token.clone(), TOKEN_TTL_SECONDS);
        Ok(token)
    }

    /// The single machine-identity token of this process.
    pub async fn fetch_client_credentials_token(&self, credentials: &Credentials) -> Result<String> {
        let metrics = get_metrics();
        let flow = TokenFlow::ClientCredentials;

        if let Some(cached) = self.store.get(CLIENT_CREDENTIALS_KEY) {
            metrics.cache_hits.with_label_values(&[flow.as_str()]).inc();
            return Ok(cached);
        }

        metrics.cache_misses.with_label_values(&[flow.as_str()]).inc();
        let token = self
            .issue(flow, self.issuer.issue_client_credentials_token(credentials))
            .await?;
        self.store.set(CLIENT_CREDENTIALS_KEY, token.clone(), TOKEN_TTL_SECONDS);
        Ok(token)
    }

    /// See [`classify::classify_repository`]; uses this manager's store.
    pub fn classify_repository(&self, repository_info: &RepositoryInfo, repository_id: &str) -> Result<bool> {
        classify::classify_repository(&self.store, repository_info, repository_id)
    }

    pub fn cached_repository_type(&self, repository_id: &str) -> Option<RepositoryType> {
        classify::cached_repository_type(&self.store, repository_id)
    }

    async fn issue(
        &self,
        flow: TokenFlow,
        request: impl std::future::Future<Output = Result<String>>,
    ) -> Result<String> {
        request.await.inspect_err(|err| {
            let status = err
                .status()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "unknown".to_owned());
            error!(flow = flow.as_str(), error = %err, "Response error while fetching access token {}", status);
        })
    }
}

