//! Run-wide deadline and cancellation
//!
//! A single [`RunContext`] spans the whole process. Termination signals and
//! the deadline both cancel its token; the orchestrator checks the token
//! between steps and the DDL tool subprocess is killed when it fires.

use crate::error::{RunError, RunResult};
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Deadline and cancellation shared by every step of a run.
#[derive(Debug, Clone)]
pub struct RunContext {
    token: CancellationToken,
    timeout: Duration,
}

impl RunContext {
    /// A context that expires after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            timeout,
        }
    }

    /// Token observed by long-running steps.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Request cancellation of the run.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Fail with [`RunError::Cancelled`] if the run has been cancelled.
    pub fn checkpoint(&self, step: &str) -> RunResult<()> {
        if self.token.is_cancelled() {
            return Err(RunError::Cancelled {
                step: step.to_string(),
            });
        }
        Ok(())
    }

    /// Drive `run` to completion within the deadline.
    ///
    /// On expiry or cancellation the future is dropped, which interrupts any
    /// in-flight database call, releases the connection, and kills any child
    /// process. Expiry also cancels the token.
    pub async fn run<F, T>(&self, run: F) -> RunResult<T>
    where
        F: Future<Output = RunResult<T>>,
    {
        tokio::select! {
            result = tokio::time::timeout(self.timeout, run) => match result {
                Ok(result) => result,
                Err(_) => {
                    self.token.cancel();
                    Err(RunError::TimedOut {
                        minutes: self.timeout.as_secs() / 60,
                    })
                }
            },
            _ = self.token.cancelled() => Err(RunError::Cancelled {
                step: "running migrations".to_string(),
            }),
        }
    }

    /// Spawn the background watcher that cancels the run on SIGINT/SIGTERM.
    ///
    /// The watcher exits on its own once the token is cancelled for any
    /// other reason.
    pub fn watch_signals(&self) -> JoinHandle<()> {
        let token = self.token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                signal = wait_for_signal() => match signal {
                    Ok(name) => {
                        log::warn!("Received {}, cancelling migration run", name);
                        token.cancel();
                    }
                    Err(e) => log::warn!("Failed to install signal handler: {}", e),
                },
            }
        })
    }
}

#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result.map(|_| "SIGINT"),
        _ = terminate.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await.map(|_| "Ctrl+C")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkpoint_passes_until_cancelled() {
        let ctx = RunContext::new(Duration::from_secs(60));
        assert!(ctx.checkpoint("discovery").is_ok());

        ctx.cancel();
        let err = ctx.checkpoint("applying '2_x.all.dml.sql'").unwrap_err();
        assert!(matches!(err, RunError::Cancelled { .. }));
        assert!(err.to_string().contains("2_x.all.dml.sql"));
    }

    #[test]
    fn test_clones_share_the_token() {
        let ctx = RunContext::new(Duration::from_secs(60));
        let other = ctx.clone();
        other.cancel();
        assert!(ctx.token().is_cancelled());
    }

    #[tokio::test]
    async fn test_run_returns_inner_result() {
        let ctx = RunContext::new(Duration::from_secs(60));
        let value = ctx.run(async { Ok::<_, RunError>(42) }).await.unwrap();
        assert_eq!(value, 42);
        assert!(!ctx.token().is_cancelled());
    }

    #[tokio::test]
    async fn test_run_times_out_and_cancels() {
        let ctx = RunContext::new(Duration::from_millis(20));
        let err = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok::<_, RunError>(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RunError::TimedOut { .. }));
        assert!(ctx.token().is_cancelled());
    }

    #[tokio::test]
    async fn test_run_stops_when_cancelled() {
        let ctx = RunContext::new(Duration::from_secs(60));
        let other = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            other.cancel();
        });

        let err = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok::<_, RunError>(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RunError::Cancelled { .. }));
    }

    #[tokio::test]
    async fn test_signal_watcher_stops_on_cancel() {
        let ctx = RunContext::new(Duration::from_secs(60));
        let watcher = ctx.watch_signals();
        ctx.cancel();
        watcher.await.unwrap();
    }
}
