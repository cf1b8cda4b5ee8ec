//! Token issuers: the collaborators that actually mint bearer tokens.

use std::future::Future;
use std::sync::Arc;

use crate::config::credentials::Credentials;
use crate::error::Result;

pub mod oauth2;

pub use oauth2::HttpTokenIssuer;

/// Mints tokens for the two supported flows.
///
/// Implementations report failures as `UtilError::IssuanceFailure` and never retry.
pub trait TokenIssuer: Send + Sync {
    /// Exchange a presented user token for a token usable on outbound calls.
    fn issue_user_token(
        &self,
        presented_token: &str,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<String>> + Send;

    fn issue_client_credentials_token(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<String>> + Send;
}

impl<T: TokenIssuer> TokenIssuer for Arc<T> {
    fn issue_user_token(
        &self,
        presented_token: &str,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<String>> + Send {
        (**self).issue_user_token(presented_token, credentials)
    }

    fn issue_client_credentials_token(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<String>> + Send {
        (**self).issue_client_credentials_token(credentials)
    }
}
