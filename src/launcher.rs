//! Hand-off of launch targets to the outside world.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::browser::LaunchTarget;
use crate::Result;

/// Trait for opening a URL or a browser application.
///
/// Implementations decide how a target reaches the screen; `launch` returns
/// once the hand-off is done and does not wait for the browser to exit.
#[async_trait]
pub trait Launcher: Send + Sync {
    /// Opens one target.
    async fn launch(&self, target: &LaunchTarget) -> Result<()>;
}

/// Outcome of a batch of launches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchReport {
    /// Number of targets handed off successfully.
    pub opened: usize,
    /// Labels and error messages of failed targets, in order.
    pub failures: Vec<(String, String)>,
}

impl LaunchReport {
    /// Returns `true` if every target was opened.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Launches targets one at a time.
///
/// A failed target is logged and recorded; it is not retried and the
/// remaining targets are still launched.
pub async fn launch_all<L>(launcher: &L, targets: &[LaunchTarget]) -> LaunchReport
where
    L: Launcher + ?Sized,
{
    let mut report = LaunchReport::default();

    for target in targets {
        let label = target.label();
        match launcher.launch(target).await {
            Ok(()) => {
                info!("Opened {}", label);
                report.opened += 1;
            }
            Err(e) => {
                warn!("Failed to open {}: {}", label, e);
                report.failures.push((label, e.to_string()));
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SearchError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingLauncher {
        opened: Mutex<Vec<LaunchTarget>>,
    }

    #[async_trait]
    impl Launcher for RecordingLauncher {
        async fn launch(&self, target: &LaunchTarget) -> Result<()> {
            self.opened.lock().unwrap().push(target.clone());
            Ok(())
        }
    }

    struct FailingLauncher {
        fail_on: String,
    }

    #[async_trait]
    impl Launcher for FailingLauncher {
        async fn launch(&self, target: &LaunchTarget) -> Result<()> {
            if target.url.as_deref() == Some(self.fail_on.as_str()) {
                return Err(SearchError::Launch(self.fail_on.clone(), "not found".to_string()));
            }
            Ok(())
        }
    }

    fn targets(urls: &[&str]) -> Vec<LaunchTarget> {
        urls.iter().map(|u| LaunchTarget::default_browser(*u)).collect()
    }

    #[tokio::test]
    async fn test_launch_all_in_order() {
        let launcher = RecordingLauncher::default();
        let report = launch_all(&launcher, &targets(&["https://a.com/", "https://b.com/"])).await;
        assert!(report.is_success());
        assert_eq!(report.opened, 2);

        let opened = launcher.opened.lock().unwrap();
        assert_eq!(opened[0].url.as_deref(), Some("https://a.com/"));
        assert_eq!(opened[1].url.as_deref(), Some("https://b.com/"));
    }

    #[tokio::test]
    async fn test_launch_all_continues_after_failure() {
        let launcher = FailingLauncher {
            fail_on: "https://a.com/".to_string(),
        };
        let report = launch_all(
            &launcher,
            &targets(&["https://a.com/", "https://b.com/", "https://c.com/"]),
        )
        .await;
        assert!(!report.is_success());
        assert_eq!(report.opened, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, "https://a.com/");
    }

    #[tokio::test]
    async fn test_launch_all_empty() {
        let launcher = RecordingLauncher::default();
        let report = launch_all(&launcher, &[]).await;
        assert_eq!(report, LaunchReport::default());
    }

    #[tokio::test]
    async fn test_launch_all_dyn_launcher() {
        let launcher: Box<dyn Launcher> = Box::new(RecordingLauncher::default());
        let report = launch_all(launcher.as_ref(), &targets(&["https://a.com/"])).await;
        assert_eq!(report.opened, 1);
    }
}
