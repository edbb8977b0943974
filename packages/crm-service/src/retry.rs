use std::{future::Future, time::Duration};

use crate::{Error, Result};

const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";
const LOCK_NOT_AVAILABLE: &str = "55P03";

pub fn is_transient(err: &sqlx::Error) -> bool {
	match err {
		sqlx::Error::PoolTimedOut => true,
		sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| {
			matches!(code.as_ref(), SERIALIZATION_FAILURE | DEADLOCK_DETECTED | LOCK_NOT_AVAILABLE)
		}),
		_ => false,
	}
}

/// Delay before retry number `attempt + 1`: the base grows by a quarter per attempt.
pub fn backoff_for_attempt(base_ms: u64, attempt: u32) -> Duration {
	let factor = 4_u64.saturating_add(u64::from(attempt));

	Duration::from_millis(base_ms.saturating_mul(factor) / 4)
}

/// Runs a whole transactional write, repeating it while it fails with [`Error::Contention`].
///
/// `attempts` counts the first try. Any other error, or contention on the final try, is returned
/// as is.
pub async fn with_write_retry<T, F, Fut>(
	cfg: &crm_config::Postgres,
	operation: &'static str,
	mut run: F,
) -> Result<T>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = Result<T>>,
{
	let attempts = cfg.write_retry_attempts.max(1);
	let mut attempt = 0;

	loop {
		match run().await {
			Err(Error::Contention { message }) if attempt + 1 < attempts => {
				let delay = backoff_for_attempt(cfg.write_retry_base_ms, attempt);

				tracing::warn!(
					operation,
					attempt = attempt + 1,
					delay_ms = delay.as_millis() as u64,
					error = %message,
					"Write contention. Retrying."
				);
				tokio::time::sleep(delay).await;

				attempt += 1;
			},
			result => return result,
		}
	}
}
