//! Engine and browser configuration loaded from a JSON file.

use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use tracing::debug;

use crate::browser::Browser;
use crate::engine::{Engine, EngineTarget};
use crate::{Result, SearchError};

/// Environment variable pointing at a configuration file.
pub const CONFIG_ENV: &str = "BROWSER_SEARCH_CONFIG";

/// Query prefix as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum QueryEntry {
    Prefix(String),
    #[serde(deserialize_with = "ordered_map")]
    Keyed(Vec<(String, String)>),
}

/// An engine definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineEntry {
    /// Base URL without query, e.g. `github.com`.
    pub url: String,
    #[serde(default)]
    pub query: Option<QueryEntry>,
    #[serde(default, deserialize_with = "ordered_map")]
    pub routes: Vec<(String, String)>,
    #[serde(default)]
    pub delimiter: Option<String>,
    #[serde(default)]
    pub alias: Vec<String>,
}

impl EngineEntry {
    fn new(url: &str, query: Option<QueryEntry>) -> Self {
        Self {
            url: url.to_string(),
            query,
            routes: Vec::new(),
            delimiter: None,
            alias: Vec::new(),
        }
    }

    /// Builds a validated engine named `name`.
    pub fn to_engine(&self, name: &str) -> Result<Engine> {
        let mut builder = Engine::builder(&self.url)
            .name(name)
            .routes(self.routes.iter().cloned());

        builder = match &self.query {
            Some(QueryEntry::Prefix(prefix)) => builder.query(prefix.as_str()),
            Some(QueryEntry::Keyed(modes)) => builder.query_modes(modes.iter().cloned()),
            None => builder,
        };

        if let Some(delimiter) = &self.delimiter {
            builder = builder.delimiter(delimiter.as_str());
        }

        builder.build()
    }

    fn matches(&self, name: &str, key: &str) -> bool {
        key == name || self.alias.iter().any(|alias| alias == name)
    }
}

/// A browser definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BrowserEntry {
    /// Profile aliases mapped to profile directories.
    #[serde(default, deserialize_with = "ordered_map")]
    pub profiles: Vec<(String, String)>,
    /// Profile alias or directory used when no profile is requested.
    #[serde(default)]
    pub default_profile: Option<String>,
    #[serde(default)]
    pub incognito: Option<bool>,
    #[serde(default)]
    pub alias: Vec<String>,
}

/// Top-level configuration.
///
/// A file without `engines` gets the built-in engines. `default_engine` is
/// only preset for the built-in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default = "builtin_engines", deserialize_with = "ordered_map")]
    pub engines: Vec<(String, EngineEntry)>,
    #[serde(default)]
    pub default_engine: Option<String>,
    #[serde(default, deserialize_with = "ordered_map")]
    pub browsers: Vec<(String, BrowserEntry)>,
    #[serde(default)]
    pub default_browser: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engines: builtin_engines(),
            default_engine: Some("google".to_string()),
            browsers: Vec::new(),
            default_browser: None,
        }
    }
}

fn prefix(value: &str) -> Option<QueryEntry> {
    Some(QueryEntry::Prefix(value.to_string()))
}

fn builtin_engines() -> Vec<(String, EngineEntry)> {
    let mut github = EngineEntry::new("github.com", prefix("search?q="));
    github.routes = vec![
        ("repos".to_string(), "?tab=repositories".to_string()),
        ("prs".to_string(), "pulls".to_string()),
    ];
    github.alias = vec!["gh".to_string()];

    let mut duckduckgo = EngineEntry::new("duckduckgo.com", prefix("?q="));
    duckduckgo.delimiter = Some("+".to_string());
    duckduckgo.alias = vec!["ddg".to_string()];

    let mut google = EngineEntry::new("google.com", prefix("search?q="));
    google.alias = vec!["g".to_string()];

    let mut youtube = EngineEntry::new(
        "youtube.com",
        Some(QueryEntry::Keyed(vec![
            ("main".to_string(), "results?search_query=".to_string()),
            ("channel".to_string(), "@".to_string()),
        ])),
    );
    youtube.alias = vec!["yt".to_string()];

    vec![
        ("google".to_string(), google),
        ("duckduckgo".to_string(), duckduckgo),
        ("github".to_string(), github),
        ("youtube".to_string(), youtube),
    ]
}

impl Config {
    /// Loads and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses and validates configuration JSON.
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Finds the configuration: `$BROWSER_SEARCH_CONFIG`, then the user
    /// config directory, then built-in defaults.
    pub fn discover() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load(path),
            _ => {
                debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Returns `<config_dir>/browser-search/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("browser-search").join("config.json"))
    }

    fn validate(&self) -> Result<()> {
        for (name, entry) in &self.engines {
            entry.to_engine(name)?;
        }

        if let Some(name) = &self.default_engine {
            if self.engine_entry(name).is_none() {
                return Err(SearchError::Config(format!("unknown default engine '{}'", name)));
            }
        }

        if let Some(name) = &self.default_browser {
            if name.trim().is_empty() {
                return Err(SearchError::Config("default browser name is empty".to_string()));
            }
        }

        Ok(())
    }

    fn engine_entry(&self, name: &str) -> Option<(&str, &EngineEntry)> {
        self.engines
            .iter()
            .find(|(key, entry)| entry.matches(name, key))
            .map(|(key, entry)| (key.as_str(), entry))
    }

    /// Looks up an engine by name or alias.
    pub fn engine(&self, name: &str) -> Result<Option<Engine>> {
        self.engine_entry(name)
            .map(|(key, entry)| entry.to_engine(key))
            .transpose()
    }

    /// Resolves a user-supplied engine: configured engines by name or alias,
    /// anything else as a literal base URL.
    pub fn resolve_engine(&self, name: &str) -> Result<EngineTarget> {
        Ok(match self.engine(name)? {
            Some(engine) => EngineTarget::Engine(engine),
            None => EngineTarget::Literal(name.to_string()),
        })
    }

    /// Returns the configured default engine, if any.
    pub fn default_engine(&self) -> Result<Option<Engine>> {
        match &self.default_engine {
            Some(name) => self.engine(name),
            None => Ok(None),
        }
    }

    /// Builds a browser selection, resolving profile aliases.
    ///
    /// Without requested profiles the browser's `default_profile` is used.
    /// Unknown browsers and profile names pass through unchanged.
    pub fn browser(&self, name: &str, profiles: &[String]) -> Browser {
        let found = self
            .browsers
            .iter()
            .find(|(key, entry)| key == name || entry.alias.iter().any(|a| a == name));

        let Some((key, entry)) = found else {
            let mut browser = Browser::new(name);
            browser.profiles = profiles.to_vec();
            return browser;
        };

        let requested = if profiles.is_empty() {
            entry.default_profile.iter().cloned().collect()
        } else {
            profiles.to_vec()
        };

        let mut browser = Browser::new(key.as_str());
        browser.incognito = entry.incognito;
        browser.profiles = requested
            .iter()
            .map(|profile| {
                entry
                    .profiles
                    .iter()
                    .find(|(alias, _)| alias == profile)
                    .map(|(_, directory)| directory.clone())
                    .unwrap_or_else(|| profile.clone())
            })
            .collect();
        browser
    }
}

/// Deserializes a JSON object into key/value pairs, keeping document order.
fn ordered_map<'de, D, V>(deserializer: D) -> std::result::Result<Vec<(String, V)>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct OrderedMapVisitor<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
        type Value = Vec<(String, V)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map")
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, V>()? {
                if entries.iter().any(|(existing, _): &(String, V)| existing == &key) {
                    return Err(serde::de::Error::custom(format!("duplicate key '{}'", key)));
                }
                entries.push((key, value));
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "engines": {
            "npm": {
                "url": "npmjs.com",
                "query": "search?q=",
                "routes": { "z": "zeta", "a": "alpha" }
            },
            "yt": {
                "url": "youtube.com",
                "query": { "main": "results?search_query=", "channel": "@" },
                "alias": ["tube"]
            }
        },
        "default_engine": "npm",
        "browsers": {
            "chrome": {
                "profiles": { "work": "Profile 1" },
                "default_profile": "work",
                "alias": ["c"]
            }
        }
    }"#;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.engines.len(), 4);
        assert_eq!(config.default_engine.as_deref(), Some("google"));
        let engine = config.default_engine().unwrap().unwrap();
        assert_eq!(engine.base_url(), "google.com");
    }

    #[test]
    fn test_config_default_engines_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.engine("ddg").unwrap().is_some());
        assert_eq!(config.engine("yt").unwrap().unwrap().base_url(), "youtube.com");
    }

    #[test]
    fn test_config_from_json_preserves_route_order() {
        let config = Config::from_json(SAMPLE).unwrap();
        let engine = config.engine("npm").unwrap().unwrap();
        let names: Vec<&str> = engine.routes().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["z", "a"]);
    }

    #[test]
    fn test_config_keyed_query_and_alias() {
        let config = Config::from_json(SAMPLE).unwrap();
        let engine = config.engine("tube").unwrap().unwrap();
        assert_eq!(engine.name(), "yt");
        assert_eq!(engine.query_prefixes(None), vec!["results?search_query="]);
    }

    #[test]
    fn test_config_missing_sections_use_defaults() {
        let config = Config::from_json(r#"{ "default_browser": "firefox" }"#).unwrap();
        assert_eq!(config.engines.len(), 4);
        assert_eq!(config.default_browser.as_deref(), Some("firefox"));
        assert!(config.default_engine.is_none());
    }

    #[test]
    fn test_config_engines_without_default_engine() {
        let json = r#"{ "engines": { "npm": { "url": "npmjs.com", "query": "search?q=" } } }"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.engines.len(), 1);
        assert!(config.default_engine.is_none());
        assert!(config.default_engine().unwrap().is_none());
        assert!(config.engine("google").unwrap().is_none());
    }

    #[test]
    fn test_config_unknown_default_engine() {
        let result = Config::from_json(r#"{ "default_engine": "nope" }"#);
        assert!(matches!(result, Err(SearchError::Config(_))));
    }

    #[test]
    fn test_config_invalid_engine() {
        let json = r#"{ "engines": { "bad": { "url": "x.com", "query": { "images": "i?q=" } } } }"#;
        let result = Config::from_json(json);
        assert!(matches!(result, Err(SearchError::InvalidEngine(..))));
    }

    #[test]
    fn test_config_duplicate_keys_rejected() {
        let json = r#"{ "engines": { "a": { "url": "a.com" }, "a": { "url": "b.com" } } }"#;
        let result = Config::from_json(json);
        assert!(matches!(result, Err(SearchError::Json(_))));
    }

    #[test]
    fn test_config_malformed() {
        let result = Config::from_json("{ not json");
        assert!(matches!(result, Err(SearchError::Json(_))));
    }

    #[test]
    fn test_resolve_engine_literal_fallback() {
        let config = Config::default();
        assert!(matches!(config.resolve_engine("g").unwrap(), EngineTarget::Engine(_)));
        assert_eq!(
            config.resolve_engine("example.com").unwrap(),
            EngineTarget::Literal("example.com".to_string())
        );
    }

    #[test]
    fn test_browser_profile_aliases() {
        let config = Config::from_json(SAMPLE).unwrap();
        let browser = config.browser("c", &["work".to_string(), "Other".to_string()]);
        assert_eq!(browser.name, "chrome");
        assert_eq!(browser.profiles, vec!["Profile 1", "Other"]);

        let browser = config.browser("firefox", &[]);
        assert_eq!(browser, Browser::new("firefox"));
    }

    #[test]
    fn test_browser_default_profile() {
        let config = Config::from_json(SAMPLE).unwrap();
        let browser = config.browser("chrome", &[]);
        assert_eq!(browser.profiles, vec!["Profile 1"]);

        let browser = config.browser("chrome", &["Other".to_string()]);
        assert_eq!(browser.profiles, vec!["Other"]);
    }

    #[test]
    fn test_config_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.default_engine.as_deref(), Some("npm"));
    }

    #[test]
    fn test_config_load_missing_file() {
        let result = Config::load("/nonexistent/browser-search/config.json");
        assert!(matches!(result, Err(SearchError::Io(_))));
    }

    #[test]
    fn test_default_path() {
        if let Some(path) = Config::default_path() {
            assert!(path.ends_with("browser-search/config.json"));
        }
    }
}
