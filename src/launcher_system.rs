//! Launcher backed by the operating system's URL and application openers.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::browser::LaunchTarget;
use crate::launcher::Launcher;
use crate::{Result, SearchError};

/// A resolved process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Wait for the process to exit and check its status. Platform openers
    /// return right after the hand-off; browsers themselves keep running.
    pub wait: bool,
}

/// Opens targets with `open` (macOS), `xdg-open` or the browser executable
/// (Linux and other Unix), or `cmd /C start` (Windows).
#[derive(Debug, Clone, Default)]
pub struct SystemLauncher;

impl SystemLauncher {
    pub fn new() -> Self {
        Self
    }

    /// Resolves the process to run for a target without spawning it.
    pub fn invocation(&self, target: &LaunchTarget) -> Result<Invocation> {
        platform_invocation(target)
    }
}

#[async_trait]
impl Launcher for SystemLauncher {
    async fn launch(&self, target: &LaunchTarget) -> Result<()> {
        let invocation = self.invocation(target)?;
        debug!("Running {} {:?}", invocation.program.display(), invocation.args);

        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let program = invocation.program.display().to_string();
        let launch_error = |e: std::io::Error| SearchError::Launch(program.clone(), e.to_string());

        if invocation.wait {
            let status = command.status().await.map_err(launch_error)?;
            if !status.success() {
                return Err(SearchError::Launch(program, format!("exited with {}", status)));
            }
        } else {
            command.spawn().map_err(launch_error)?;
        }

        Ok(())
    }
}

fn missing_url(target: &LaunchTarget) -> SearchError {
    SearchError::Launch(target.label(), "no URL or browser to open".to_string())
}

#[cfg(target_os = "macos")]
fn platform_invocation(target: &LaunchTarget) -> Result<Invocation> {
    let mut args = Vec::new();
    match &target.app {
        Some(app) => {
            args.push("-a".to_string());
            args.push(app.clone());
            args.extend(target.url.iter().cloned());
            if !target.arguments.is_empty() {
                args.push("--args".to_string());
                args.extend(target.arguments.iter().cloned());
            }
        }
        None => args.push(target.url.clone().ok_or_else(|| missing_url(target))?),
    }

    Ok(Invocation {
        program: PathBuf::from("open"),
        args,
        wait: true,
    })
}

#[cfg(target_os = "windows")]
fn platform_invocation(target: &LaunchTarget) -> Result<Invocation> {
    let mut args = vec!["/C".to_string(), "start".to_string(), String::new()];
    match &target.app {
        Some(app) => {
            args.push(app.clone());
            args.extend(target.arguments.iter().cloned());
            args.extend(target.url.iter().cloned());
        }
        None => args.push(target.url.clone().ok_or_else(|| missing_url(target))?),
    }

    Ok(Invocation {
        program: PathBuf::from("cmd"),
        args,
        wait: true,
    })
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn platform_invocation(target: &LaunchTarget) -> Result<Invocation> {
    match &target.app {
        Some(app) => {
            let mut args = target.arguments.clone();
            args.extend(target.url.iter().cloned());
            Ok(Invocation {
                program: resolve_executable(app)?,
                args,
                wait: false,
            })
        }
        None => Ok(Invocation {
            program: PathBuf::from("xdg-open"),
            args: vec![target.url.clone().ok_or_else(|| missing_url(target))?],
            wait: true,
        }),
    }
}

/// Finds a browser executable in `PATH`.
#[cfg(all(feature = "launch", not(any(target_os = "macos", target_os = "windows"))))]
fn resolve_executable(app: &str) -> Result<PathBuf> {
    which::which(app).map_err(|e| SearchError::Launch(app.to_string(), e.to_string()))
}

#[cfg(all(not(feature = "launch"), not(any(target_os = "macos", target_os = "windows"))))]
fn resolve_executable(app: &str) -> Result<PathBuf> {
    Ok(PathBuf::from(app))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_launcher_default() {
        let launcher = SystemLauncher::default();
        let target = LaunchTarget::default_browser("https://a.com/");
        let invocation = launcher.invocation(&target).unwrap();
        assert!(invocation.args.contains(&"https://a.com/".to_string()));
        assert!(invocation.wait);
    }

    #[test]
    fn test_invocation_requires_url_without_app() {
        let target = LaunchTarget {
            browser: None,
            app: None,
            url: None,
            arguments: Vec::new(),
        };
        let result = SystemLauncher::new().invocation(&target);
        assert!(matches!(result, Err(SearchError::Launch(..))));
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    #[test]
    fn test_default_browser_uses_xdg_open() {
        let target = LaunchTarget::default_browser("https://a.com/");
        let invocation = SystemLauncher::new().invocation(&target).unwrap();
        assert_eq!(invocation.program, PathBuf::from("xdg-open"));
        assert_eq!(invocation.args, vec!["https://a.com/"]);
    }

    #[cfg(all(unix, not(target_os = "macos"), feature = "launch"))]
    #[test]
    fn test_missing_browser_executable() {
        let target = LaunchTarget {
            browser: Some("nonexistent".to_string()),
            app: Some("browser-search-nonexistent-browser".to_string()),
            url: Some("https://a.com/".to_string()),
            arguments: vec!["--incognito".to_string()],
        };
        let result = SystemLauncher::new().invocation(&target);
        assert!(matches!(result, Err(SearchError::Launch(..))));
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn test_app_invocation_macos() {
        let target = LaunchTarget {
            browser: Some("chrome".to_string()),
            app: Some("google chrome".to_string()),
            url: Some("https://a.com/".to_string()),
            arguments: vec!["--incognito".to_string()],
        };
        let invocation = SystemLauncher::new().invocation(&target).unwrap();
        assert_eq!(
            invocation.args,
            vec!["-a", "google chrome", "https://a.com/", "--args", "--incognito"]
        );
    }
}
