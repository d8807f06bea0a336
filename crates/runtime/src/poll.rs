//! Bounded readiness polling.

use std::time::{Duration, Instant};

use crate::error::{Error, Result};

/// Re-evaluates `predicate` every `interval` until it returns true or
/// `deadline` elapses, in which case a [`Error::Timeout`] names `what`.
///
/// The predicate runs at least once even with a zero deadline.
pub async fn wait_until<F, Fut>(
    what: &str,
    interval: Duration,
    deadline: Duration,
    mut predicate: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let started = Instant::now();
    loop {
        if predicate().await {
            return Ok(());
        }
        if started.elapsed() >= deadline {
            return Err(Error::Timeout {
                what: what.to_owned(),
                waited: started.elapsed(),
            });
        }
        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn returns_once_the_condition_holds() {
        let calls = AtomicU32::new(0);
        wait_until(
            "counter reaches three",
            Duration::from_millis(1),
            Duration::from_secs(5),
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move { n >= 2 }
            },
        )
        .await
        .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn expired_deadline_reports_what_was_awaited() {
        let err = wait_until(
            "agent port",
            Duration::from_millis(1),
            Duration::from_millis(10),
            || async { false },
        )
        .await
        .unwrap_err();
        assert!(err.is_timeout());
        assert!(err.to_string().contains("agent port"));
    }

    #[tokio::test]
    async fn predicate_runs_at_least_once_with_zero_deadline() {
        wait_until(
            "already true",
            Duration::from_millis(1),
            Duration::ZERO,
            || async { true },
        )
        .await
        .unwrap();
    }
}
