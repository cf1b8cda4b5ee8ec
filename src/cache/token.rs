/// Tokens (both flows) live for 11 hours.
pub const TOKEN_TTL_SECONDS: u64 = 11 * 3600;

/// Repository classifications live for 60 days.
pub const REPOSITORY_TYPE_TTL_SECONDS: u64 = 60 * 60 * 24 * 60;

/// One machine-identity token per process.
pub const CLIENT_CREDENTIALS_KEY: &str = "SDM_ACCESS_TOKEN";

/// Which flow a cache lookup belongs to, used as a metrics label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFlow {
    User,
    ClientCredentials,
}

impl TokenFlow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenFlow::User => "user",
            TokenFlow::ClientCredentials => "client_credentials",
        }
    }
}
