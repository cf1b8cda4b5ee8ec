pub mod common;
pub mod http_issuer_exchange;
