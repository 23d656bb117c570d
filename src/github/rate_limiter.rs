use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use reqwest::Response;
use tokio::time::sleep;

/// Tracks GitHub's `x-ratelimit-*` headers and waits out an exhausted
/// window before the next request goes out. This is pacing only; an
/// actual 429 response still surfaces as `Error::RateLimited`.
pub struct RateLimiter {
    state: Mutex<RateLimitState>,
}

struct RateLimitState {
    remaining: u32,
    reset_at: Option<Instant>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RateLimitState {
                remaining: 5000,
                reset_at: None,
            }),
        }
    }

    pub async fn wait(&self) {
        let wait_for = {
            let state = self.state.lock().unwrap();
            if state.remaining == 0 {
                state
                    .reset_at
                    .and_then(|reset| reset.checked_duration_since(Instant::now()))
            } else {
                None
            }
        };

        if let Some(duration) = wait_for {
            tracing::info!("GitHub rate limit window exhausted, waiting {:?}", duration);
            sleep(duration).await;
        }
    }

    pub fn update_from_response(&self, response: &Response) {
        let Some(remaining) = header_u64(response, "x-ratelimit-remaining") else {
            return;
        };

        let mut state = self.state.lock().unwrap();
        state.remaining = remaining as u32;

        if let Some(reset_timestamp) = header_u64(response, "x-ratelimit-reset") {
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs();
            state.reset_at = (reset_timestamp > now)
                .then(|| Instant::now() + Duration::from_secs(reset_timestamp - now));
        }
    }
}

fn header_u64(response: &Response, name: &str) -> Option<u64> {
    response
        .headers()
        .get(name)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
