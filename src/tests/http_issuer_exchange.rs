// Runs the token cache against a mocked OAuth2 token endpoint:
//  - client credentials grant -> cached after the first call
//  - jwt-bearer grant -> exchanged token cached under its email
//  - non-2xx -> IssuanceFailure carrying the status

#[cfg(test)]
mod test {
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use reqwest::Client;
    use serde_json::json;

    use crate::cache::store::{CacheStore, MemoryStore};
    use crate::cache::token::CLIENT_CREDENTIALS_KEY;
    use crate::cache::token_cache::TokenCacheManager;
    use crate::error::UtilError;
    use crate::helpers::time::now_i64;
    use crate::sources::oauth2::HttpTokenIssuer;
    use crate::sources::TokenIssuer;
    use crate::tests::common::{credentials, sample_token};

    const TOKEN_PATH: &str = "/oauth/token";
    const BASIC_AUTH: &str = "Basic c2ItY2xpZW50OnNiLXNlY3JldA==";

    fn manager() -> TokenCacheManager<MemoryStore, HttpTokenIssuer> {
        TokenCacheManager::new(MemoryStore::new(), HttpTokenIssuer::new(Client::new()))
    }

    #[tokio::test]
    async fn client_credentials_grant_is_requested_once() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(TOKEN_PATH)
                    .header("authorization", BASIC_AUTH)
                    .form_urlencoded_tuple("grant_type", "client_credentials");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(json!({
                        "access_token": "client-abc-123",
                        "token_type": "bearer",
                        "expires_in": 43199
                    }));
            })
            .await;

        let manager = manager();
        let creds = credentials(&server.base_url());

        let first = manager.fetch_client_credentials_token(&creds).await.unwrap();
        let second = manager.fetch_client_credentials_token(&creds).await.unwrap();

        assert_eq!(first, "client-abc-123");
        assert_eq!(second, first);
        assert_eq!(mock.calls_async().await, 1);
        assert_eq!(manager.store().get(CLIENT_CREDENTIALS_KEY).as_deref(), Some("client-abc-123"));
    }

    #[tokio::test]
    async fn jwt_bearer_grant_exchanges_presented_token() {
        let presented = sample_token("example@example.com", now_i64() + 600);
        let exchanged = sample_token("example@example.com", now_i64() + 3600);

        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(TOKEN_PATH)
                    .header("authorization", BASIC_AUTH)
                    .form_urlencoded_tuple("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer")
                    .form_urlencoded_tuple("assertion", presented.as_str());
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(json!({ "access_token": exchanged.as_str(), "token_type": "bearer" }));
            })
            .await;

        let manager = manager();
        let creds = credentials(&server.base_url());

        let token = manager.fetch_user_token(&creds, &presented).await.unwrap();
        assert_eq!(token, exchanged);

        // live token cached under its email: no second round trip
        let again = manager.fetch_user_token(&creds, &presented).await.unwrap();
        assert_eq!(again, exchanged);
        assert_eq!(mock.calls_async().await, 1);
        assert_eq!(manager.store().get("example@example.com"), Some(exchanged));
    }

    #[tokio::test]
    async fn error_status_becomes_issuance_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(TOKEN_PATH);
                then.status(401).body("unauthorized");
            })
            .await;

        let manager = manager();
        let err = manager
            .fetch_client_credentials_token(&credentials(&server.base_url()))
            .await
            .unwrap_err();

        assert!(matches!(err, UtilError::IssuanceFailure { status: Some(401), .. }));
        assert!(manager.store().get(CLIENT_CREDENTIALS_KEY).is_none());
    }

    #[tokio::test]
    async fn body_without_access_token_is_a_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(TOKEN_PATH);
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(json!({ "token_type": "bearer" }));
            })
            .await;

        let issuer = HttpTokenIssuer::new(Client::new());
        let err = issuer
            .issue_client_credentials_token(&credentials(&server.base_url()))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(200));
    }

    #[tokio::test]
    async fn unreachable_endpoint_has_no_status() {
        let issuer = HttpTokenIssuer::new(Client::new());
        let err = issuer
            .issue_client_credentials_token(&credentials("http://127.0.0.1:9"))
            .await
            .unwrap_err();

        assert!(matches!(err, UtilError::IssuanceFailure { status: None, .. }));
    }
}
