//! Bounded polling for content that appears asynchronously without a
//! completion signal.

use log::debug;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
	/// Wait before the first read.
	pub settle: Duration,
	/// Wait between subsequent reads.
	pub interval: Duration,
	/// Total number of reads, including the first.
	pub max_attempts: u32,
}

impl Default for RetryPolicy {
	fn default() -> Self {
		Self {
			settle: Duration::from_millis(50),
			interval: Duration::from_millis(100),
			max_attempts: 5,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
	Ready(String),
	TimedOut,
}

/// Reads until `read` yields non-empty content or the attempts run out.
pub async fn poll_until_ready<F>(policy: &RetryPolicy, mut read: F) -> Readiness
where
	F: FnMut() -> String,
{
	tokio::time::sleep(policy.settle).await;

	let attempts = policy.max_attempts.max(1);
	for attempt in 1..=attempts {
		if attempt > 1 {
			tokio::time::sleep(policy.interval).await;
		}

		let content = read();
		if !content.is_empty() {
			return Readiness::Ready(content);
		}
		debug!("render not ready, attempt {}/{}", attempt, attempts);
	}

	Readiness::TimedOut
}
