//! Test execution engine
//!
//! Runs the attempts of one validated test against one host, strictly in
//! sequence: one fresh connection per attempt, one exchange per connection,
//! and a short pause between attempts.

#[cfg(test)]
pub(crate) mod test_support;

use crate::{
    error::AttemptError,
    logging::Logger,
    models::{AttemptResult, Operation, ValidatedTest},
    protocol,
};
use async_trait::async_trait;
use std::io;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{timeout_at, Instant};

/// Basic execution configuration for the test executor
#[derive(Debug, Clone)]
pub struct ExecutionConfig {
    /// Pause between consecutive attempts of the same test and host
    pub pacing: Duration,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            pacing: crate::defaults::ATTEMPT_PACING,
        }
    }
}

/// High-level test executor interface
#[async_trait]
pub trait TestExecutor: Send + Sync {
    /// Run every attempt of `test` against `host` and return one result per
    /// attempt, in attempt order
    async fn execute(&self, test: &ValidatedTest, host: &str) -> Vec<AttemptResult>;
}

/// Executor that dials real TCP connections
pub struct TcpExecutor {
    config: ExecutionConfig,
    logger: Logger,
}

impl TcpExecutor {
    pub fn new(config: ExecutionConfig, logger: Logger) -> Self {
        Self { config, logger }
    }

    async fn run_attempt(&self, test: &ValidatedTest, host: &str, attempt: u32) -> AttemptResult {
        self.attempt_until(test, host, attempt, Instant::now() + test.timeout).await
    }

    /// One attempt whose dial and exchange share a single deadline
    async fn attempt_until(
        &self,
        test: &ValidatedTest,
        host: &str,
        attempt: u32,
        deadline: Instant,
    ) -> AttemptResult {
        let mut stream = match dial(host, deadline, test.timeout).await {
            Ok(stream) => stream,
            Err(error) => return AttemptResult::failure(&test.name, host, attempt, error),
        };

        let outcome = match timeout_at(deadline, exchange(&mut stream, &test.operation, test.size)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(AttemptError::Timeout(test.timeout)),
        };

        // Closed after every exchange, whatever the outcome
        let _ = stream.shutdown().await;
        drop(stream);

        match outcome {
            Ok(duration) => AttemptResult::success(&test.name, host, attempt, duration, u64::from(test.size)),
            Err(error) => AttemptResult::failure(&test.name, host, attempt, error),
        }
    }

    async fn report(&self, result: &AttemptResult) {
        match (&result.error, result.throughput_mib_s()) {
            (None, throughput) => {
                self.logger
                    .info(&format!(
                        "Success: {:?} ({:.2} MB/s)",
                        result.duration,
                        throughput.unwrap_or(0.0)
                    ))
                    .field("test", &result.test_name)
                    .field("host", &result.host)
                    .field("attempt", result.attempt)
                    .field("duration_ms", result.duration.as_secs_f64() * 1000.0)
                    .field("bytes", result.bytes)
                    .log()
                    .await;
            }
            (Some(error), _) => {
                self.logger
                    .warn(&format!("Failed: {}", error))
                    .field("test", &result.test_name)
                    .field("host", &result.host)
                    .field("attempt", result.attempt)
                    .attempt_error(error)
                    .log()
                    .await;
            }
        }
    }
}

#[async_trait]
impl TestExecutor for TcpExecutor {
    async fn execute(&self, test: &ValidatedTest, host: &str) -> Vec<AttemptResult> {
        self.logger
            .info(&format!("--- Test: {} on {} ---", test.name, host))
            .field("operation", test.operation.as_str())
            .field("size", test.size)
            .field("repeat", test.repeat)
            .log()
            .await;

        let mut results = Vec::with_capacity(test.repeat.min(1024) as usize);

        for attempt in 1..=test.repeat {
            self.logger
                .info(&format!("Attempt {}/{}...", attempt, test.repeat))
                .log()
                .await;

            let result = self.run_attempt(test, host, attempt).await;
            self.report(&result).await;
            results.push(result);

            if attempt < test.repeat {
                tokio::time::sleep(self.config.pacing).await;
            }
        }

        results
    }
}

/// Open a connection before the attempt's deadline
async fn dial(host: &str, deadline: Instant, limit: Duration) -> Result<TcpStream, AttemptError> {
    let connect_failed = |source: io::Error| AttemptError::ConnectFailed {
        host: host.to_string(),
        source,
    };

    match timeout_at(deadline, TcpStream::connect(host)).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(e)) => Err(connect_failed(e)),
        Err(_) => Err(connect_failed(io::Error::new(
            io::ErrorKind::TimedOut,
            format!("connect timed out after {:?}", limit),
        ))),
    }
}

/// Perform the one exchange the operation calls for
async fn exchange<S>(stream: &mut S, operation: &Operation, size: u32) -> Result<Duration, AttemptError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    match operation {
        Operation::Download => protocol::download(stream, size).await,
        Operation::Upload => protocol::upload(stream, size).await,
        Operation::Other(name) => Err(AttemptError::UnknownOperation(name.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::logging::MemorySink;
    use std::sync::Arc;
    use std::time::Instant;

    fn validated(operation: Operation, repeat: u32, size: u32) -> ValidatedTest {
        ValidatedTest {
            name: "unit".to_string(),
            operation,
            repeat,
            size_spec: size.to_string(),
            size,
            timeout: Duration::from_secs(5),
        }
    }

    fn executor(pacing: Duration) -> (TcpExecutor, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let logger = Logger::memory("EXECUTOR", sink.clone());
        (TcpExecutor::new(ExecutionConfig { pacing }, logger), sink)
    }

    #[tokio::test]
    async fn test_repeat_produces_ordered_results() {
        let addr = spawn_responder().await.to_string();
        let (executor, sink) = executor(Duration::ZERO);

        let results = executor.execute(&validated(Operation::Download, 3, 64 * 1024), &addr).await;

        assert_eq!(results.len(), 3);
        let attempts: Vec<u32> = results.iter().map(|r| r.attempt).collect();
        assert_eq!(attempts, vec![1, 2, 3]);
        for result in &results {
            assert!(result.success, "{:?}", result.error);
            assert_eq!(result.host, addr);
            assert_eq!(result.bytes, 64 * 1024);
        }

        let messages = sink.messages();
        assert!(messages.iter().any(|m| m == "Attempt 3/3..."));
        assert_eq!(messages.iter().filter(|m| m.starts_with("Success:")).count(), 3);
    }

    #[tokio::test]
    async fn test_upload_attempts() {
        let addr = spawn_responder().await.to_string();
        let (executor, _) = executor(Duration::ZERO);

        let results = executor.execute(&validated(Operation::Upload, 2, 1024 * 1024), &addr).await;
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.success));
    }

    #[tokio::test]
    async fn test_connect_failure_continues_with_next_attempt() {
        let addr = closed_port().await.to_string();
        let (executor, sink) = executor(Duration::ZERO);

        let results = executor.execute(&validated(Operation::Download, 2, 16), &addr).await;

        assert_eq!(results.len(), 2);
        for result in &results {
            assert!(!result.success);
            assert_eq!(result.error_kind(), Some("ConnectFailed"));
            assert_eq!(result.bytes, 0);
            assert_eq!(result.duration, Duration::ZERO);
        }
        assert_eq!(sink.messages().iter().filter(|m| m.starts_with("Failed:")).count(), 2);
    }

    #[tokio::test]
    async fn test_unknown_operation_fails_attempt() {
        let addr = spawn_responder().await.to_string();
        let (executor, _) = executor(Duration::ZERO);

        let results = executor.execute(&validated(Operation::Other("ping".into()), 1, 16), &addr).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].error_kind(), Some("UnknownOperation"));
    }

    #[tokio::test]
    async fn test_hash_mismatch_keeps_duration() {
        let addr = spawn_corrupting().await.to_string();
        let (executor, _) = executor(Duration::ZERO);

        let results = executor.execute(&validated(Operation::Download, 1, 4096), &addr).await;

        assert_eq!(results[0].error_kind(), Some("HashMismatch"));
        assert!(results[0].duration > Duration::ZERO);
        assert_eq!(results[0].bytes, 0);
    }

    #[tokio::test]
    async fn test_exchange_timeout() {
        let addr = spawn_silent().await.to_string();
        let (executor, _) = executor(Duration::ZERO);
        let mut test = validated(Operation::Download, 1, 16);
        test.timeout = Duration::from_millis(100);

        let started = Instant::now();
        let results = executor.execute(&test, &addr).await;

        assert_eq!(results[0].error_kind(), Some("Timeout"));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_dial_and_exchange_share_one_deadline() {
        let addr = spawn_silent().await.to_string();
        let (executor, _) = executor(Duration::ZERO);
        let test = validated(Operation::Download, 1, 16);

        // The test allows 5s, but this attempt has only 150ms left in total
        let started = Instant::now();
        let deadline = tokio::time::Instant::now() + Duration::from_millis(150);
        let result = executor.attempt_until(&test, &addr, 1, deadline).await;

        assert_eq!(result.error_kind(), Some("Timeout"));
        assert!(started.elapsed() < Duration::from_secs(2), "elapsed {:?}", started.elapsed());
    }

    #[tokio::test]
    async fn test_pacing_between_attempts_only() {
        let addr = spawn_responder().await.to_string();
        let (executor, _) = executor(Duration::from_millis(50));

        let started = Instant::now();
        executor.execute(&validated(Operation::Download, 3, 16), &addr).await;
        let elapsed = started.elapsed();

        // Two pauses for three attempts
        assert!(elapsed >= Duration::from_millis(100), "elapsed {:?}", elapsed);
    }

    #[test]
    fn test_default_pacing() {
        assert_eq!(ExecutionConfig::default().pacing, Duration::from_millis(100));
    }
}
