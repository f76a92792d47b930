use crate::host::UiPatcher;
use std::time::Duration;
use tokio::time::{interval, timeout};
use tracing::{debug, info, warn};

/// Retry budget for injecting toolbar controls when patching fails.
#[derive(Debug, Clone)]
pub struct InjectionPolicy {
    pub max_attempts: usize,
    pub retry_interval: Duration,
    pub deadline: Duration,
}

impl Default for InjectionPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            retry_interval: Duration::from_secs(3),
            deadline: Duration::from_secs(300),
        }
    }
}

impl InjectionPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, max: usize) -> Self {
        self.max_attempts = max;
        self
    }

    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionOutcome {
    /// The toolbar component was patched directly.
    Patched,
    /// Controls were inserted into the rendered container on this attempt.
    Injected { attempt: usize },
    GaveUp { attempts: usize },
    TimedOut,
}

impl InjectionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Patched | Self::Injected { .. })
    }
}

/// Patch the toolbar, falling back to polling the rendered container.
pub async fn inject_toolbar(patcher: &dyn UiPatcher, policy: &InjectionPolicy) -> InjectionOutcome {
    if patcher.patch_toolbar() {
        info!("Toolbar patched");
        return InjectionOutcome::Patched;
    }
    debug!("Toolbar patch target not found, polling for container");

    let poll = async {
        // First tick completes immediately
        let mut ticker = interval(policy.retry_interval.max(Duration::from_millis(1)));
        for attempt in 1..=policy.max_attempts {
            ticker.tick().await;
            if patcher.inject_into_container() {
                return Some(attempt);
            }
            debug!(attempt, max = policy.max_attempts, "Toolbar container not ready");
        }
        None
    };

    let outcome = match timeout(policy.deadline, poll).await {
        Ok(Some(attempt)) => InjectionOutcome::Injected { attempt },
        Ok(None) => InjectionOutcome::GaveUp {
            attempts: policy.max_attempts,
        },
        Err(_) => InjectionOutcome::TimedOut,
    };

    if outcome.is_success() {
        info!(?outcome, "Toolbar controls injected");
    } else {
        warn!(?outcome, "Could not inject toolbar controls");
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::Instant;

    struct FlakyPatcher {
        patch_ok: bool,
        succeed_on: usize,
        attempts: AtomicUsize,
    }

    impl FlakyPatcher {
        fn new(patch_ok: bool, succeed_on: usize) -> Self {
            Self {
                patch_ok,
                succeed_on,
                attempts: AtomicUsize::new(0),
            }
        }
    }

    impl UiPatcher for FlakyPatcher {
        fn patch_toolbar(&self) -> bool {
            self.patch_ok
        }

        fn inject_into_container(&self) -> bool {
            self.attempts.fetch_add(1, Ordering::SeqCst) + 1 >= self.succeed_on
        }

        fn unpatch_all(&self) {}
    }

    #[tokio::test(start_paused = true)]
    async fn test_patch_success_skips_polling() {
        let patcher = FlakyPatcher::new(true, 1);
        let outcome = inject_toolbar(&patcher, &InjectionPolicy::default()).await;
        assert_eq!(outcome, InjectionOutcome::Patched);
        assert_eq!(patcher.attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_until_container_appears() {
        let patcher = FlakyPatcher::new(false, 3);
        let start = Instant::now();

        let outcome = inject_toolbar(&patcher, &InjectionPolicy::default()).await;

        assert_eq!(outcome, InjectionOutcome::Injected { attempt: 3 });
        assert_eq!(start.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let patcher = FlakyPatcher::new(false, usize::MAX);

        let outcome = inject_toolbar(&patcher, &InjectionPolicy::default()).await;

        assert_eq!(outcome, InjectionOutcome::GaveUp { attempts: 10 });
        assert_eq!(patcher.attempts.load(Ordering::SeqCst), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_cuts_polling_short() {
        let patcher = FlakyPatcher::new(false, usize::MAX);
        let policy = InjectionPolicy::new()
            .with_retry_interval(Duration::from_secs(60))
            .with_deadline(Duration::from_secs(150));

        let outcome = inject_toolbar(&patcher, &policy).await;

        assert_eq!(outcome, InjectionOutcome::TimedOut);
        assert_eq!(patcher.attempts.load(Ordering::SeqCst), 3);
    }
}
