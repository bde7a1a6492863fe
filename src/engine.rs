//! Search destination descriptors.

use std::fmt;
use std::sync::Arc;

use crate::utils::{prefix_protocol, slash, with_ports};
use crate::{Result, SearchError};

/// Mode name that a keyed query configuration must always define.
pub const MAIN_QUERY: &str = "main";

/// Query prefix configuration of an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryConfig {
    /// A single prefix such as `search?q=`.
    Prefix(String),
    /// Named query modes, in insertion order. Always contains `main`.
    Keyed(Vec<(String, String)>),
}

impl QueryConfig {
    /// Returns the prefix used when no query mode is selected.
    pub fn default_prefix(&self) -> Option<&str> {
        match self {
            Self::Prefix(prefix) => Some(prefix.as_str()),
            Self::Keyed(_) => self.mode(MAIN_QUERY),
        }
    }

    /// Looks up a named query mode.
    pub fn mode(&self, name: &str) -> Option<&str> {
        match self {
            Self::Prefix(_) => None,
            Self::Keyed(modes) => modes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, prefix)| prefix.as_str()),
        }
    }
}

impl From<&str> for QueryConfig {
    fn from(value: &str) -> Self {
        Self::Prefix(value.to_string())
    }
}

impl From<String> for QueryConfig {
    fn from(value: String) -> Self {
        Self::Prefix(value)
    }
}

/// Maps an engine's query configuration to the prefixes to use.
pub type QueryResolver = Arc<dyn Fn(&QueryConfig) -> Vec<String> + Send + Sync>;

/// Runtime selection of the query prefix(es) for a search.
#[derive(Clone)]
pub enum QuerySelector {
    /// A mode name, or a literal prefix when no mode matches.
    Literal(String),
    /// Several mode names or literal prefixes; each yields its own URL set.
    List(Vec<String>),
    /// Computes prefixes from the engine's query configuration.
    Resolver(QueryResolver),
}

impl QuerySelector {
    /// Creates a resolver-based selector.
    pub fn resolver<F>(resolve: F) -> Self
    where
        F: Fn(&QueryConfig) -> Vec<String> + Send + Sync + 'static,
    {
        Self::Resolver(Arc::new(resolve))
    }
}

impl fmt::Debug for QuerySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::List(values) => f.debug_tuple("List").field(values).finish(),
            Self::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

/// Per-search parameters shared by every engine in a request.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    /// Query prefix selection; `None` uses the engine default.
    pub query: Option<QuerySelector>,
    /// Port overrides, already deduplicated.
    pub ports: Vec<u16>,
    /// One URL per keyword instead of one joined query.
    pub split: bool,
    /// Use `http://` for URLs without a protocol.
    pub use_http: bool,
}

/// An immutable search destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Engine {
    name: Option<String>,
    base_url: String,
    query: Option<QueryConfig>,
    routes: Vec<(String, String)>,
    delimiter: String,
}

impl Engine {
    /// Starts building an engine for the given base URL (e.g. `github.com`).
    pub fn builder(base_url: impl Into<String>) -> EngineBuilder {
        EngineBuilder {
            name: None,
            base_url: base_url.into(),
            query: None,
            routes: Vec::new(),
            delimiter: " ".to_string(),
        }
    }

    /// Returns the display name, falling back to the base URL.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn query(&self) -> Option<&QueryConfig> {
        self.query.as_ref()
    }

    pub fn routes(&self) -> &[(String, String)] {
        &self.routes
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Resolves the query prefixes for a search.
    ///
    /// Mode names are looked up in a keyed configuration; anything else is
    /// used as a literal prefix.
    pub fn query_prefixes(&self, selector: Option<&QuerySelector>) -> Vec<String> {
        match selector {
            None => self
                .query
                .as_ref()
                .and_then(QueryConfig::default_prefix)
                .map(str::to_string)
                .into_iter()
                .collect(),
            Some(QuerySelector::Literal(mode)) => vec![self.lookup_prefix(mode)],
            Some(QuerySelector::List(modes)) => {
                modes.iter().map(|mode| self.lookup_prefix(mode)).collect()
            }
            Some(QuerySelector::Resolver(resolve)) => {
                self.query.as_ref().map(|query| (**resolve)(query)).unwrap_or_default()
            }
        }
    }

    fn lookup_prefix(&self, mode: &str) -> String {
        self.query
            .as_ref()
            .and_then(|query| query.mode(mode))
            .unwrap_or(mode)
            .to_string()
    }

    /// Resolves a route name to its path segment.
    ///
    /// Unknown names pass through as a literal path segment.
    pub fn route_path<'a>(&'a self, route: &'a str) -> &'a str {
        self.routes
            .iter()
            .find(|(name, _)| name == route)
            .map(|(_, path)| path.as_str())
            .unwrap_or(route)
    }

    /// Returns the base URL expanded per port, each with a trailing slash.
    pub fn base_urls(&self, ports: &[u16]) -> Vec<String> {
        with_ports(&self.base_url, ports)
            .iter()
            .map(|url| slash::trailing::add(url))
            .collect()
    }

    /// Builds search URLs for the given keywords.
    ///
    /// URLs carry a protocol but are not normalized; spaces and other
    /// characters are left as given. Order is prefix, then port, then keyword.
    pub fn search(&self, keywords: &[String], params: &SearchParams) -> Vec<String> {
        let prefixes = self.query_prefixes(params.query.as_ref());
        let bases = self.base_urls(&params.ports);

        let urls = if prefixes.is_empty() {
            bases
        } else if params.split {
            prefixes
                .iter()
                .flat_map(|prefix| {
                    bases.iter().flat_map(move |base| {
                        keywords
                            .iter()
                            .map(move |keyword| query_url(base, prefix, keyword))
                    })
                })
                .collect()
        } else {
            let joined = keywords.join(&self.delimiter);
            prefixes
                .iter()
                .flat_map(|prefix| {
                    bases
                        .iter()
                        .map(|base| query_url(base, prefix, &joined))
                        .collect::<Vec<_>>()
                })
                .collect()
        };

        urls.iter()
            .map(|url| prefix_protocol(url, params.use_http))
            .collect()
    }

    /// Builds the URLs of a route, one per port.
    pub fn navigate(&self, route: &str, params: &SearchParams) -> Vec<String> {
        let path = self.route_path(route);
        self.base_urls(&params.ports)
            .iter()
            .map(|base| prefix_protocol(&slash::join(base, path), params.use_http))
            .collect()
    }
}

impl Default for Engine {
    /// `google.com` searched through `search?q=`.
    fn default() -> Self {
        Self {
            name: Some("google".to_string()),
            base_url: "google.com".to_string(),
            query: Some(QueryConfig::Prefix("search?q=".to_string())),
            routes: Vec::new(),
            delimiter: " ".to_string(),
        }
    }
}

fn query_url(base: &str, prefix: &str, values: &str) -> String {
    format!("{}{}{}", base, slash::leading::remove(prefix), values)
}

/// Builder for [`Engine`], validated on [`EngineBuilder::build`].
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    name: Option<String>,
    base_url: String,
    query: Option<QueryConfig>,
    routes: Vec<(String, String)>,
    delimiter: String,
}

impl EngineBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the query configuration (a prefix string or keyed modes).
    pub fn query(mut self, query: impl Into<QueryConfig>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Sets keyed query modes; a `main` mode is required.
    pub fn query_modes<I, K, V>(mut self, modes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let modes = modes.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self.query = Some(QueryConfig::Keyed(modes));
        self
    }

    /// Adds a named route.
    pub fn route(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.routes.push((name.into(), path.into()));
        self
    }

    /// Adds named routes in order.
    pub fn routes<I, K, V>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.routes
            .extend(routes.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Sets the keyword delimiter used for joined queries.
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Validates and builds the engine.
    pub fn build(self) -> Result<Engine> {
        let invalid =
            |reason: &str| SearchError::InvalidEngine(self.base_url.clone(), reason.to_string());

        if self.base_url.trim().is_empty() {
            return Err(invalid("base URL is empty"));
        }
        if self.base_url.contains('?') {
            return Err(invalid("base URL must not contain a query"));
        }
        if let Some(QueryConfig::Keyed(modes)) = &self.query {
            if !modes.iter().any(|(key, _)| key == MAIN_QUERY) {
                return Err(invalid("keyed query modes must define 'main'"));
            }
            if has_duplicate_keys(modes) {
                return Err(invalid("duplicate query mode"));
            }
        }
        if has_duplicate_keys(&self.routes) {
            return Err(invalid("duplicate route name"));
        }

        Ok(Engine {
            name: self.name,
            base_url: self.base_url,
            query: self.query,
            routes: self.routes,
            delimiter: self.delimiter,
        })
    }
}

fn has_duplicate_keys(entries: &[(String, String)]) -> bool {
    entries
        .iter()
        .enumerate()
        .any(|(i, (key, _))| entries[..i].iter().any(|(other, _)| other == key))
}

/// A destination in a request: a configured engine or a bare base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineTarget {
    Engine(Engine),
    Literal(String),
}

impl EngineTarget {
    pub fn base_url(&self) -> &str {
        match self {
            Self::Engine(engine) => engine.base_url(),
            Self::Literal(url) => url,
        }
    }
}

impl From<Engine> for EngineTarget {
    fn from(engine: Engine) -> Self {
        Self::Engine(engine)
    }
}

impl From<&str> for EngineTarget {
    fn from(url: &str) -> Self {
        Self::Literal(url.to_string())
    }
}

impl From<String> for EngineTarget {
    fn from(url: String) -> Self {
        Self::Literal(url)
    }
}
