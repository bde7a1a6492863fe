//! Raw search options and their normalized request form.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::{Engine, EngineTarget, QuerySelector, SearchParams};
use crate::keywords::KeywordInput;
use crate::utils::is_url_like;

/// A port value as received from callers: a number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortValue {
    Number(f64),
    Text(String),
}

impl PortValue {
    /// Returns the port if the value is a finite integer in `0..=65535`.
    pub fn port(&self) -> Option<u16> {
        let number = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
        };

        let in_range = (0.0..=u16::MAX as f64).contains(&number);
        if number.is_finite() && number.fract() == 0.0 && in_range {
            Some(number as u16)
        } else {
            None
        }
    }
}

impl From<u16> for PortValue {
    fn from(port: u16) -> Self {
        Self::Number(port as f64)
    }
}

impl From<f64> for PortValue {
    fn from(port: f64) -> Self {
        Self::Number(port)
    }
}

impl From<&str> for PortValue {
    fn from(port: &str) -> Self {
        Self::Text(port.to_string())
    }
}

/// Route input: one route or several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RouteInput {
    One(String),
    Many(Vec<String>),
}

/// Raw, caller-facing options for one search.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    keywords: Option<KeywordInput>,
    engines: Option<Vec<EngineTarget>>,
    default_engine: Option<Engine>,
    route: Option<RouteInput>,
    ports: Vec<PortValue>,
    query: Option<QuerySelector>,
    incognito: bool,
    split: bool,
    http: bool,
}

impl SearchOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search keywords.
    pub fn with_keywords(mut self, keywords: impl Into<KeywordInput>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    /// Sets a single target engine or base URL.
    pub fn with_engine(mut self, engine: impl Into<EngineTarget>) -> Self {
        self.engines = Some(vec![engine.into()]);
        self
    }

    /// Sets several target engines or base URLs, in order.
    pub fn with_engines<I, E>(mut self, engines: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<EngineTarget>,
    {
        self.engines = Some(engines.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the engine used when no engine is given.
    pub fn with_default_engine(mut self, engine: Engine) -> Self {
        self.default_engine = Some(engine);
        self
    }

    /// Sets a single route.
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(RouteInput::One(route.into()));
        self
    }

    /// Sets several routes, in order.
    pub fn with_routes<I, S>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.route = Some(RouteInput::Many(routes.into_iter().map(Into::into).collect()));
        self
    }

    /// Sets a single port override.
    pub fn with_port(mut self, port: impl Into<PortValue>) -> Self {
        self.ports = vec![port.into()];
        self
    }

    /// Sets several port overrides, in order.
    pub fn with_ports<I, P>(mut self, ports: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PortValue>,
    {
        self.ports = ports.into_iter().map(Into::into).collect();
        self
    }

    /// Selects the engine query mode(s) or prefix(es).
    pub fn with_query(mut self, query: QuerySelector) -> Self {
        self.query = Some(query);
        self
    }

    pub fn with_incognito(mut self, incognito: bool) -> Self {
        self.incognito = incognito;
        self
    }

    pub fn with_split(mut self, split: bool) -> Self {
        self.split = split;
        self
    }

    /// Forces `http://` for URLs that carry no protocol.
    pub fn with_http(mut self, http: bool) -> Self {
        self.http = http;
        self
    }

    /// Normalizes the options into an immutable request.
    pub fn normalize(self) -> SearchRequest {
        let keywords = self
            .keywords
            .as_ref()
            .map(KeywordInput::keywords)
            .unwrap_or_default();

        let routes = match self.route {
            Some(RouteInput::One(route)) => vec![route],
            Some(RouteInput::Many(routes)) => routes,
            None => Vec::new(),
        }
        .into_iter()
        .filter(|route| !route.is_empty())
        .collect();

        let mut ports: Vec<u16> = Vec::new();
        for value in &self.ports {
            match value.port() {
                Some(port) if !ports.contains(&port) => ports.push(port),
                Some(_) => {}
                None => warn!("Ignoring invalid port {:?}", value),
            }
        }

        SearchRequest {
            keywords,
            engines: self.engines.unwrap_or_default(),
            default_engine: self.default_engine,
            routes,
            params: SearchParams {
                query: self.query,
                ports,
                split: self.split,
                use_http: self.http,
            },
            incognito: self.incognito,
        }
    }
}

/// Normalized options for one search.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    keywords: Vec<String>,
    engines: Vec<EngineTarget>,
    default_engine: Option<Engine>,
    routes: Vec<String>,
    params: SearchParams,
    incognito: bool,
}

impl SearchRequest {
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn engines(&self) -> &[EngineTarget] {
        &self.engines
    }

    pub fn default_engine(&self) -> Option<&Engine> {
        self.default_engine.as_ref()
    }

    pub fn routes(&self) -> &[String] {
        &self.routes
    }

    pub fn ports(&self) -> &[u16] {
        &self.params.ports
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn incognito(&self) -> bool {
        self.incognito
    }

    pub fn split(&self) -> bool {
        self.params.split
    }

    pub fn use_http(&self) -> bool {
        self.params.use_http
    }

    /// Keywords that look like a host name.
    pub fn url_keywords(&self) -> Vec<String> {
        self.keywords.iter().filter(|k| is_url_like(k)).cloned().collect()
    }

    /// Returns `true` if at least one keyword is a search term.
    pub fn has_search_keywords(&self) -> bool {
        self.keywords.iter().any(|k| !is_url_like(k))
    }

    /// Returns `true` if there are keywords and all of them look like URLs.
    pub fn urls_only(&self) -> bool {
        !self.keywords.is_empty() && self.keywords.iter().all(|k| is_url_like(k))
    }
}

impl From<SearchOptions> for SearchRequest {
    fn from(options: SearchOptions) -> Self {
        options.normalize()
    }
}
