// tests/common/mod.rs
use std::sync::atomic::{AtomicUsize, Ordering};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use parking_lot::Mutex;

use crate::cache::store::{CacheStore, MemoryStore};
use crate::config::credentials::{Credentials, UaaCredentials};
use crate::error::{Result, UtilError};
use crate::sources::TokenIssuer;

/// Minimal unsigned token for tests: {"sub", "email", "exp"}
pub fn sample_token(email: &str, exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(
        r#"{{"sub":"1234567890","email":"{}","exp":{}}}"#,
        email, exp
    ));
    format!("{}.{}.sig", header, payload)
}

pub fn credentials(url: &str) -> Credentials {
    Credentials {
        uaa: UaaCredentials {
            url: url.to_owned(),
            clientid: "sb-client".to_owned(),
            clientsecret: "sb-secret".to_owned(),
        },
    }
}

/// Issuer answering from canned values; `None` means "fail with 500".
#[derive(Default)]
pub struct StubIssuer {
    pub user_token: Mutex<Option<String>>,
    pub client_token: Mutex<Option<String>>,
    pub user_calls: AtomicUsize,
    pub client_calls: AtomicUsize,
}

impl StubIssuer {
    pub fn issuing(user_token: Option<String>, client_token: Option<String>) -> Self {
        Self {
            user_token: Mutex::new(user_token),
            client_token: Mutex::new(client_token),
            ..Default::default()
        }
    }

    pub fn user_calls(&self) -> usize {
        self.user_calls.load(Ordering::SeqCst)
    }

    pub fn client_calls(&self) -> usize {
        self.client_calls.load(Ordering::SeqCst)
    }
}

impl TokenIssuer for StubIssuer {
    async fn issue_user_token(&self, _presented_token: &str, _credentials: &Credentials) -> Result<String> {
        self.user_calls.fetch_add(1, Ordering::SeqCst);
        let token = self.user_token.lock().clone();
        token.ok_or_else(|| UtilError::issuance(Some(500), "test error"))
    }

    async fn issue_client_credentials_token(&self, _credentials: &Credentials) -> Result<String> {
        self.client_calls.fetch_add(1, Ordering::SeqCst);
        let token = self.client_token.lock().clone();
        token.ok_or_else(|| UtilError::issuance(Some(500), "test error"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Get(String),
    Set(String, String, u64),
    Delete(String),
}

/// MemoryStore that remembers every call made to it.
#[derive(Default)]
pub struct RecordingStore {
    pub inner: MemoryStore,
    pub ops: Mutex<Vec<StoreOp>>,
}

impl RecordingStore {
    pub fn ops(&self) -> Vec<StoreOp> {
        self.ops.lock().clone()
    }

    pub fn writes(&self) -> Vec<StoreOp> {
        self.ops()
            .into_iter()
            .filter(|op| !matches!(op, StoreOp::Get(_)))
            .collect()
    }

    pub fn clear_ops(&self) {
        self.ops.lock().clear();
    }
}

impl CacheStore for RecordingStore {
    fn get(&self, key: &str) -> Option<String> {
        self.ops.lock().push(StoreOp::Get(key.to_owned()));
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: String, ttl_seconds: u64) {
        self.ops
            .lock()
            .push(StoreOp::Set(key.to_owned(), value.clone(), ttl_seconds));
        self.inner.set(key, value, ttl_seconds)
    }

    fn delete(&self, key: &str) {
        self.ops.lock().push(StoreOp::Delete(key.to_owned()));
        self.inner.delete(key)
    }
}
