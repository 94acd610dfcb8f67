//! Interpretation of GitHub rate-limit responses.
//!
//! GitHub answers both "rate limit exhausted" and "insufficient permissions"
//! with `403 Forbidden`. Only a 403 that carries `X-RateLimit-Remaining` is
//! treated as a rate limit; a 403 without it, or with requests still
//! remaining, is a permission error and must not be waited on.

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use tokio::time::Duration;

use crate::transport::ResponseDescriptor;

pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub const RESET_HEADER: &str = "x-ratelimit-reset";

/// Rate-limit figures taken from a single response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitState {
    pub remaining: u64,
    /// Unix time (seconds) at which the window resets.
    pub reset_epoch: i64,
}

impl RateLimitState {
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// How long to suspend before retrying, measured from `now_epoch`.
    ///
    /// `None` when requests remain. Otherwise `max(reset - now, 0) + 1` seconds.
    pub fn wait_from(&self, now_epoch: i64) -> Option<Duration> {
        if !self.is_exhausted() {
            return None;
        }
        let secs = self.reset_epoch.saturating_sub(now_epoch).max(0) as u64;
        Some(Duration::from_secs(secs.saturating_add(1)))
    }
}

/// Rate-limit state of `response`, or `None` when the response is not a
/// rate-limit answer at all.
///
/// A missing or unparseable reset header is read as `now_epoch`.
pub fn interpret(response: &ResponseDescriptor, now_epoch: i64) -> Option<RateLimitState> {
    if response.status() != StatusCode::FORBIDDEN {
        return None;
    }
    let remaining = header_value::<u64>(response.headers(), REMAINING_HEADER)?;
    let reset_epoch = header_value::<i64>(response.headers(), RESET_HEADER).unwrap_or(now_epoch);

    Some(RateLimitState {
        remaining,
        reset_epoch,
    })
}

/// Suspension required before `response` may be retried, if it is a
/// recoverable rate-limit answer.
pub fn retry_after(response: &ResponseDescriptor, now_epoch: i64) -> Option<Duration> {
    interpret(response, now_epoch).and_then(|state| state.wait_from(now_epoch))
}

fn header_value<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}
