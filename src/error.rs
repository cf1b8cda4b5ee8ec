/// Errors surfaced by the token cache, repository and attachment helpers.
#[derive(Debug, thiserror::Error)]
pub enum UtilError {
    /// The issuer reported an error or a non-success status.
    #[error("token issuance failed (status: {status:?}): {message}")]
    IssuanceFailure {
        status: Option<u16>,
        message: String,
    },

    /// A compact token without the `header.payload.signature` / base64 / JSON structure.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    #[error("repository '{0}' not found in repository info")]
    UnknownRepository(String),

    #[error("attachment lookup failed: {0}")]
    Persistence(String),
}

impl UtilError {
    pub fn issuance(status: Option<u16>, message: impl Into<String>) -> Self {
        UtilError::IssuanceFailure {
            status,
            message: message.into(),
        }
    }

    /// Status reported by the issuer, when one is known.
    pub fn status(&self) -> Option<u16> {
        match self {
            UtilError::IssuanceFailure { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for UtilError {
    fn from(e: reqwest::Error) -> Self {
        UtilError::issuance(e.status().map(|s| s.as_u16()), e.to_string())
    }
}

pub type Result<T, E = UtilError> = std::result::Result<T, E>;
