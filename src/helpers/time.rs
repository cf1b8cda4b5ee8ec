use chrono::Utc;
use tokio::time::Instant;

pub fn now_i64() -> i64 {
    Utc::now().timestamp()
}

pub fn get_instant() -> Instant {
    Instant::now()
}

/// `true` once the wall clock is strictly past the `exp` claim (Unix seconds).
pub fn is_token_expired(exp: i64) -> bool {
    is_expired_at(exp, Utc::now().timestamp_millis())
}

/// Millisecond comparison: a token is already expired during its `exp` second.
fn is_expired_at(exp: i64, now_millis: i64) -> bool {
    now_millis > exp.saturating_mul(1000)
}
