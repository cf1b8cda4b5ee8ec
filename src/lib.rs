//! # SDM Token Utilities
//!
//! Glue used by the document-management integration: bearer tokens are
//! memoized in an explicitly constructed TTL store, repositories are
//! classified as versioned or not, draft attachments are diffed against
//! persisted ones to detect renames.
//!
//! Modules:
//! - `cache` — TTL store and the token cache manager
//! - `sources` — token issuers (HTTP OAuth2 token endpoint)
//! - `parser` — unverified claim decoding of compact tokens
//! - `repository` — repository classification
//! - `attachments` — rename detection
//! - `config` — service configuration, credentials and plugin settings

pub mod attachments;
pub mod cache;
pub mod config;
pub mod error;
pub mod helpers;
pub mod observability;
pub mod parser;
pub mod repository;
pub mod sources;
pub mod utils;

#[cfg(test)]
pub mod tests;

pub use crate::cache::store::{CacheStore, MemoryStore};
pub use crate::cache::token_cache::TokenCacheManager;
pub use crate::config::credentials::{Credentials, UaaCredentials};
pub use crate::config::settings::{ConfigurationProvider, ServiceConfig};
pub use crate::error::UtilError;
pub use crate::sources::{HttpTokenIssuer, TokenIssuer};
