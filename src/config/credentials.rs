use serde::Deserialize;

/// Issuer configuration as found in the service binding.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub uaa: UaaCredentials,
}

/// OAuth2 authorization server of the binding.
#[derive(Deserialize, Clone, PartialEq, Eq)]
pub struct UaaCredentials {
    /// Base url; `/oauth/token` is appended
    pub url: String,
    pub clientid: String,
    pub clientsecret: String,
}

impl UaaCredentials {
    pub fn token_endpoint(&self) -> String {
        format!("{}/oauth/token", self.url.trim_end_matches('/'))
    }
}

// keep the secret out of logs
impl std::fmt::Debug for UaaCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UaaCredentials")
            .field("url", &self.url)
            .field("clientid", &self.clientid)
            .field("clientsecret", &"***")
            .finish()
    }
}
