//! Browser descriptors and launch argument derivation.
//!
//! This module turns a finished URL list plus browser selections into an
//! ordered list of [`LaunchTarget`]s. Nothing here spawns processes; see
//! [`crate::launcher`] for that.

use serde::{Deserialize, Serialize};

/// A browser to open URLs in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Browser {
    /// Browser name, e.g. `chrome`, `firefox`, `edge`, or an application name.
    pub name: String,
    /// Profile directories; each one gets its own window.
    #[serde(default)]
    pub profiles: Vec<String>,
    /// Overrides the request's incognito flag for this browser.
    #[serde(default)]
    pub incognito: Option<bool>,
}

impl Browser {
    /// Creates a browser selection without profiles.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            profiles: Vec::new(),
            incognito: None,
        }
    }

    /// Adds a profile directory.
    pub fn with_profile(mut self, directory: impl Into<String>) -> Self {
        self.profiles.push(directory.into());
        self
    }

    /// Sets a per-browser incognito override.
    pub fn with_incognito(mut self, incognito: bool) -> Self {
        self.incognito = Some(incognito);
        self
    }
}

impl From<&str> for Browser {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Returns the platform application name for well-known browsers.
///
/// Unknown names are returned unchanged.
pub fn app_name(browser: &str) -> String {
    let known = match browser.to_lowercase().as_str() {
        "chrome" => Some(chrome_app()),
        "firefox" => Some("firefox"),
        "edge" => Some(edge_app()),
        _ => None,
    };
    known.unwrap_or(browser).to_string()
}

#[cfg(target_os = "macos")]
fn chrome_app() -> &'static str {
    "google chrome"
}

#[cfg(target_os = "windows")]
fn chrome_app() -> &'static str {
    "chrome"
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn chrome_app() -> &'static str {
    "google-chrome"
}

#[cfg(target_os = "macos")]
fn edge_app() -> &'static str {
    "microsoft edge"
}

#[cfg(target_os = "windows")]
fn edge_app() -> &'static str {
    "msedge"
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn edge_app() -> &'static str {
    "microsoft-edge"
}

/// Derives command-line arguments for one browser window.
///
/// One argument per enabled feature: the profile directory, then the
/// browser-specific private browsing flag.
pub fn browser_arguments(browser: &str, incognito: bool, profile: Option<&str>) -> Vec<String> {
    let mut arguments = Vec::new();

    if let Some(directory) = profile {
        arguments.push(format!("--profile-directory={}", directory));
    }

    if incognito {
        let flag = match browser {
            "edge" => "inprivate",
            "firefox" | "opera" => "private",
            _ => "incognito",
        };
        arguments.push(format!("--{}", flag));
    }

    arguments
}

/// One hand-off to the open collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchTarget {
    /// Browser name as selected by the user; `None` uses the system default.
    pub browser: Option<String>,
    /// Platform application name resolved from [`app_name`].
    pub app: Option<String>,
    /// URL to open; `None` opens the application without a page.
    pub url: Option<String>,
    /// Extra command-line arguments for the application.
    pub arguments: Vec<String>,
}

impl LaunchTarget {
    /// Opens a URL in the system default browser.
    pub fn default_browser(url: impl Into<String>) -> Self {
        Self {
            browser: None,
            app: None,
            url: Some(url.into()),
            arguments: Vec::new(),
        }
    }

    /// Human-readable label used in logs.
    pub fn label(&self) -> String {
        match (&self.browser, &self.url) {
            (Some(browser), Some(url)) => format!("{} in {}", url, browser),
            (Some(browser), None) => browser.clone(),
            (None, Some(url)) => url.clone(),
            (None, None) => "default browser".to_string(),
        }
    }
}

/// Expands URLs and browser selections into ordered launch targets.
///
/// With browsers: for each browser, each URL (or the bare application when
/// there are no URLs), each profile (or none). Without browsers: each URL in
/// the system default browser.
pub fn launch_plan(urls: &[String], browsers: &[Browser], incognito: bool) -> Vec<LaunchTarget> {
    if browsers.is_empty() {
        return urls.iter().map(LaunchTarget::default_browser).collect();
    }

    let mut targets = Vec::new();
    for browser in browsers {
        let incognito = browser.incognito.unwrap_or(incognito);
        let app = app_name(&browser.name);
        let profiles: Vec<Option<&str>> = if browser.profiles.is_empty() {
            vec![None]
        } else {
            browser.profiles.iter().map(|p| Some(p.as_str())).collect()
        };
        let pages: Vec<Option<&String>> = if urls.is_empty() {
            vec![None]
        } else {
            urls.iter().map(Some).collect()
        };

        for page in &pages {
            for profile in &profiles {
                targets.push(LaunchTarget {
                    browser: Some(browser.name.clone()),
                    app: Some(app.clone()),
                    url: page.cloned(),
                    arguments: browser_arguments(&browser.name, incognito, *profile),
                });
            }
        }
    }
    targets
}
