use std::collections::HashMap;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::credentials::Credentials;
use crate::error::{Result, UtilError};
use crate::helpers::time::get_instant;
use crate::observability::metrics::get_metrics;
use crate::sources::TokenIssuer;

const GRANT_TYPE_JWT_BEARER: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const GRANT_TYPE_CLIENT_CREDENTIALS: &str = "client_credentials";

static USER_FLOW: &str = "user";
static CLIENT_CREDENTIALS_FLOW: &str = "client_credentials";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Issues tokens against the OAuth2 token endpoint of the binding (`{uaa.url}/oauth/token`).
#[derive(Debug, Clone)]
pub struct HttpTokenIssuer {
    client: Client,
}

impl HttpTokenIssuer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn request_token(
        &self,
        flow: &str,
        credentials: &Credentials,
        form: HashMap<&str, &str>,
    ) -> Result<String> {
        let metrics = get_metrics();
        let start = get_instant();
        metrics.issuance_requests.with_label_values(&[flow]).inc();

        let result = self.send_token_request(credentials, &form).await;

        metrics
            .issuance_duration
            .with_label_values(&[flow])
            .observe(start.elapsed().as_secs_f64());
        if let Err(err) = &result {
            let status = err.status().map(|s| s.to_string()).unwrap_or_else(|| "none".to_owned());
            metrics.issuance_failures.with_label_values(&[flow, status.as_str()]).inc();
        }
        result
    }

    async fn send_token_request(
        &self,
        credentials: &Credentials,
        form: &HashMap<&str, &str>,
    ) -> Result<String> {
        let uaa = &credentials.uaa;
        let url = uaa.token_endpoint();
        debug!(url = %url, grant_type = ?form.get("grant_type"), "requesting token");

        let response = self
            .client
            .post(&url)
            .basic_auth(&uaa.clientid, Some(&uaa.clientsecret))
            .header(reqwest::header::ACCEPT, "application/json")
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "token endpoint rejected request");
            return Err(UtilError::issuance(
                Some(status.as_u16()),
                format!("token endpoint responded {}: {}", status, body),
            ));
        }

        let token = response
            .json::<TokenResponse>()
            .await
            .map_err(|e| UtilError::issuance(Some(status.as_u16()), format!("invalid token response: {}", e)))?;
        Ok(token.access_token)
    }
}

impl TokenIssuer for HttpTokenIssuer {
    async fn issue_user_token(&self, presented_token: &str, credentials: &Credentials) -> Result<String> {
        let form = HashMap::from([
            ("grant_type", GRANT_TYPE_JWT_BEARER),
            ("assertion", presented_token),
            ("response_type", "token"),
        ]);
        self.request_token(USER_FLOW, credentials, form).await
    }

    async fn issue_client_credentials_token(&self, credentials: &Credentials) -> Result<String> {
        let form = HashMap::from([
            ("grant_type", GRANT_TYPE_CLIENT_CREDENTIALS),
            ("response_type", "token"),
        ]);
        self.request_token(CLIENT_CREDENTIALS_FLOW, credentials, form).await
    }
}
