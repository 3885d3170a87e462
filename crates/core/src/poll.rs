use std::time::Duration;

use tokio::time::sleep;

use crate::{
    error::Result,
    media::{FileState, MediaHandle},
    processor::MediaProcessor,
    progress::{Progress, Reporter},
};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(600);

/// Fixed-interval polling with an upper bound on re-fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollPolicy {
    /// Derive the attempt cap from a total wait budget. Always allows at least one re-fetch.
    ///
    /// A zero interval re-fetches back-to-back, so the cap saturates at `u32::MAX`
    /// unless `max_wait` is zero as well.
    pub fn from_wait(interval: Duration, max_wait: Duration) -> Self {
        let step = interval.as_nanos().max(1);
        let attempts = max_wait.as_nanos().div_ceil(step);
        let max_attempts = u32::try_from(attempts).unwrap_or(u32::MAX).max(1);

        Self {
            interval,
            max_attempts,
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::from_wait(DEFAULT_POLL_INTERVAL, DEFAULT_MAX_WAIT)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Ready(MediaHandle),
    Failed(FileState),
    TimedOut { attempts: u32, waited: Duration },
}

/// Re-fetch `handle` every `policy.interval` until it leaves `PROCESSING`
/// or the attempt cap is reached.
pub async fn poll_until_ready<P>(
    processor: &P,
    mut handle: MediaHandle,
    policy: PollPolicy,
    reporter: &dyn Reporter,
) -> Result<PollOutcome>
where
    P: MediaProcessor + ?Sized,
{
    let mut attempts = 0u32;

    while handle.is_processing() {
        if attempts >= policy.max_attempts {
            tracing::warn!(file = %handle.name, attempts, "Gave up waiting for processing");
            return Ok(PollOutcome::TimedOut {
                attempts,
                waited: policy.interval * attempts,
            });
        }

        sleep(policy.interval).await;
        attempts += 1;
        reporter.report(Progress::Processing { attempt: attempts });

        handle = processor.get(&handle.name).await?;
        tracing::debug!(file = %handle.name, state = %handle.state, attempt = attempts, "Polled file state");
    }

    match handle.state {
        FileState::Active => Ok(PollOutcome::Ready(handle)),
        state => {
            tracing::warn!(file = %handle.name, %state, "File left processing in a non-active state");
            Ok(PollOutcome::Failed(state))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        path::Path,
        sync::{
            Mutex,
            atomic::{AtomicU32, Ordering},
        },
    };

    use async_trait::async_trait;
    use tokio::time::Instant;

    use super::*;
    use crate::progress::SilentReporter;

    struct Scripted {
        states: Mutex<VecDeque<FileState>>,
        gets: AtomicU32,
    }

    impl Scripted {
        fn new(states: Vec<FileState>) -> Self {
            Self {
                states: Mutex::new(states.into()),
                gets: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl MediaProcessor for Scripted {
        async fn upload(&self, _: &Path, _: &str, _: &str) -> Result<MediaHandle> {
            unreachable!("poll never uploads")
        }

        async fn get(&self, name: &str) -> Result<MediaHandle> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            let state = self
                .states
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(FileState::Processing);
            Ok(handle(name, state))
        }
    }

    fn handle(name: &str, state: FileState) -> MediaHandle {
        MediaHandle {
            name: name.to_string(),
            display_name: "clip.mp4".to_string(),
            uri: format!("https://example.test/{name}"),
            mime_type: "video/mp4".to_string(),
            state,
        }
    }

    fn policy(max_attempts: u32) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_secs(5),
            max_attempts,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn already_active_does_not_poll() {
        let processor = Scripted::new(vec![]);
        let outcome = poll_until_ready(
            &processor,
            handle("files/a", FileState::Active),
            policy(3),
            &SilentReporter,
        )
        .await
        .unwrap();

        assert!(matches!(outcome, PollOutcome::Ready(_)));
        assert_eq!(processor.gets.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_one_interval_per_refetch() {
        let processor = Scripted::new(vec![FileState::Processing, FileState::Active]);
        let start = Instant::now();

        let outcome = poll_until_ready(
            &processor,
            handle("files/a", FileState::Processing),
            policy(10),
            &SilentReporter,
        )
        .await
        .unwrap();

        assert!(matches!(outcome, PollOutcome::Ready(ref h) if h.state == FileState::Active));
        assert_eq!(processor.gets.load(Ordering::SeqCst), 2);
        assert!(start.elapsed() >= Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_state_is_returned() {
        let processor = Scripted::new(vec![FileState::Failed]);
        let outcome = poll_until_ready(
            &processor,
            handle("files/a", FileState::Processing),
            policy(10),
            &SilentReporter,
        )
        .await
        .unwrap();

        assert_eq!(outcome, PollOutcome::Failed(FileState::Failed));
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_after_max_attempts() {
        let processor = Scripted::new(vec![]);
        let outcome = poll_until_ready(
            &processor,
            handle("files/a", FileState::Processing),
            policy(3),
            &SilentReporter,
        )
        .await
        .unwrap();

        assert_eq!(
            outcome,
            PollOutcome::TimedOut {
                attempts: 3,
                waited: Duration::from_secs(15),
            }
        );
        assert_eq!(processor.gets.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn attempt_cap_rounds_up() {
        let p = PollPolicy::from_wait(Duration::from_secs(5), Duration::from_secs(12));
        assert_eq!(p.max_attempts, 3);

        let p = PollPolicy::from_wait(Duration::from_secs(5), Duration::ZERO);
        assert_eq!(p.max_attempts, 1);

        assert_eq!(PollPolicy::default().max_attempts, 120);
    }

    #[test]
    fn sub_millisecond_interval_keeps_the_wait_budget() {
        let p = PollPolicy::from_wait(Duration::from_micros(500), Duration::from_secs(1));
        assert_eq!(p.max_attempts, 2000);

        let p = PollPolicy::from_wait(Duration::from_nanos(1), Duration::from_nanos(3));
        assert_eq!(p.max_attempts, 3);
    }

    #[test]
    fn zero_interval_does_not_collapse_the_wait() {
        let p = PollPolicy::from_wait(Duration::ZERO, Duration::from_secs(600));
        assert_eq!(p.max_attempts, u32::MAX);

        let p = PollPolicy::from_wait(Duration::ZERO, Duration::ZERO);
        assert_eq!(p.max_attempts, 1);
    }
}
