//! OpenDota statistics provider.

mod client;
mod dto;
mod limiter;

pub use client::{OpenDotaClient, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT};
pub use limiter::RateLimiter;
