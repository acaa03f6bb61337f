use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

/// How often to check, and how many checks to allow before giving up.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub interval: Duration,
    /// `None` polls until a terminal value or an error, with no upper bound.
    pub max_attempts: Option<u32>,
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: Some(max_attempts),
        }
    }
}

#[derive(Error, Debug)]
pub enum PollError {
    #[error("Status check failed on attempt {attempt}: {source}")]
    Check {
        attempt: u32,
        #[source]
        source: anyhow::Error,
    },

    #[error("No terminal status after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

/// Repeatedly run `check`, waiting `policy.interval` before each attempt,
/// until `is_terminal` accepts the value.
///
/// Resolves exactly once: on the first terminal value, on the first failed
/// check, or when the attempt budget is spent. No check runs after any of
/// these.
pub async fn poll_until<T, F, Fut, P>(
    policy: PollPolicy,
    mut check: F,
    is_terminal: P,
) -> Result<T, PollError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
    P: Fn(&T) -> bool,
{
    let mut attempt = 0u32;

    loop {
        if let Some(max) = policy.max_attempts {
            if attempt >= max {
                return Err(PollError::Exhausted { attempts: attempt });
            }
        }

        sleep(policy.interval).await;
        attempt += 1;

        let value = check()
            .await
            .map_err(|source| PollError::Check { attempt, source })?;

        if is_terminal(&value) {
            tracing::debug!("Poll resolved after {} attempt(s)", attempt);
            return Ok(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast(max_attempts: Option<u32>) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(1),
            max_attempts,
        }
    }

    #[tokio::test]
    async fn test_stops_on_first_terminal_value() {
        let calls = Arc::new(AtomicU32::new(0));
        let sequence = ["IN_PROGRESS", "IN_PROGRESS", "COMPLETED", "IN_PROGRESS"];

        let counter = calls.clone();
        let result = poll_until(
            fast(None),
            || {
                let counter = counter.clone();
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst) as usize;
                    Ok::<_, anyhow::Error>(sequence[n])
                }
            },
            |status| *status == "COMPLETED",
        )
        .await
        .unwrap();

        assert_eq!(result, "COMPLETED");

        // Give a stray timer the chance to fire if one were still armed.
        sleep(Duration::from_millis(20)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_first_check_error_aborts() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let err = poll_until(
            fast(Some(10)),
            || {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) == 1 {
                        anyhow::bail!("throttled");
                    }
                    Ok(false)
                }
            },
            |done| *done,
        )
        .await
        .unwrap_err();

        match err {
            PollError::Check { attempt, source } => {
                assert_eq!(attempt, 2);
                assert_eq!(source.to_string(), "throttled");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_exhausts_attempt_budget() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let err = poll_until(
            fast(Some(4)),
            || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, anyhow::Error>(())
                }
            },
            |_| false,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, PollError::Exhausted { attempts: 4 }));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_waits_before_first_check() {
        let start = tokio::time::Instant::now();
        let policy = PollPolicy::new(Duration::from_millis(30), 1);

        poll_until(policy, || async { Ok::<_, anyhow::Error>(1) }, |_| true)
            .await
            .unwrap();

        assert!(start.elapsed() >= Duration::from_millis(30));
    }
}
