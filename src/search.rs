//! URL orchestration.

use tracing::debug;

use crate::engine::{Engine, EngineTarget, SearchParams};
use crate::options::SearchRequest;
use crate::utils::{slash, with_ports, with_protocol};
use crate::Result;

/// Builds the final URL list for normalized search requests.
///
/// Holds the engine used when a request names neither an engine nor its own
/// default engine.
#[derive(Debug, Clone, Default)]
pub struct Search {
    default_engine: Engine,
}

/// Borrowed view of the destination a branch works against.
#[derive(Debug, Clone, Copy)]
enum Destination<'a> {
    Engine(&'a Engine),
    Literal(&'a str),
}

impl<'a> From<&'a EngineTarget> for Destination<'a> {
    fn from(target: &'a EngineTarget) -> Self {
        match target {
            EngineTarget::Engine(engine) => Self::Engine(engine),
            EngineTarget::Literal(url) => Self::Literal(url),
        }
    }
}

impl Destination<'_> {
    fn name(&self) -> &str {
        match self {
            Self::Engine(engine) => engine.name(),
            Self::Literal(url) => url,
        }
    }

    fn base_urls(&self, ports: &[u16]) -> Vec<String> {
        match self {
            Self::Engine(engine) => engine.base_urls(ports),
            Self::Literal(url) => with_ports(url, ports)
                .iter()
                .map(|url| slash::trailing::add(url))
                .collect(),
        }
    }

    fn route_urls(&self, route: &str, params: &SearchParams) -> Vec<String> {
        match self {
            Self::Engine(engine) => engine.navigate(route, params),
            Self::Literal(_) => self
                .base_urls(&params.ports)
                .iter()
                .map(|base| slash::join(base, route))
                .collect(),
        }
    }

    fn query_urls(&self, values: &[String], params: &SearchParams) -> Vec<String> {
        match self {
            Self::Engine(engine) => engine.search(values, params),
            Self::Literal(url) => {
                let queries = if params.split {
                    values.to_vec()
                } else {
                    vec![values.join(" ")]
                };

                with_ports(url, &params.ports)
                    .iter()
                    .flat_map(|base| {
                        let base = if base.ends_with('=') {
                            base.clone()
                        } else {
                            slash::trailing::add(base)
                        };
                        queries
                            .iter()
                            .map(|query| format!("{}{}", base, query))
                            .collect::<Vec<_>>()
                    })
                    .collect()
            }
        }
    }
}

impl Search {
    /// Creates an orchestrator with an explicit default engine.
    pub fn new(default_engine: Engine) -> Self {
        Self { default_engine }
    }

    /// Returns the fallback engine.
    pub fn default_engine(&self) -> &Engine {
        &self.default_engine
    }

    /// Builds the ordered, normalized URL list for a request.
    ///
    /// An empty list means the browser should open without a target. The
    /// first URL that fails to parse aborts the build.
    pub fn urls(&self, request: &SearchRequest) -> Result<Vec<String>> {
        let engines = request.engines();

        if engines.is_empty() && !request.has_search_keywords() && !request.urls_only() {
            debug!("No engine or keywords given, nothing to build");
            return Ok(Vec::new());
        }

        let raw: Vec<String> = if engines.is_empty() {
            self.construct(request, None)
        } else {
            engines
                .iter()
                .flat_map(|engine| self.construct(request, Some(engine)))
                .collect()
        };

        let urls = raw
            .iter()
            .map(|url| with_protocol(url, request.use_http()))
            .collect::<Result<Vec<_>>>()?;

        debug!("Built {} URL(s)", urls.len());
        Ok(urls)
    }

    /// Runs the branch logic against one engine (or the default engine).
    fn construct(&self, request: &SearchRequest, explicit: Option<&EngineTarget>) -> Vec<String> {
        let fallback = request.default_engine().unwrap_or(&self.default_engine);
        let destination = explicit.map_or(Destination::Engine(fallback), Destination::from);
        let params = request.params();

        if !request.routes().is_empty() {
            if request.urls_only() {
                debug!("Appending routes to URL keywords");
                return request
                    .url_keywords()
                    .iter()
                    .flat_map(|url| {
                        request
                            .routes()
                            .iter()
                            .map(move |route| slash::join(url, route))
                    })
                    .flat_map(|url| with_ports(&url, &params.ports))
                    .collect();
            }

            debug!("Building route URLs for {}", destination.name());
            return request
                .routes()
                .iter()
                .flat_map(|route| destination.route_urls(route, params))
                .flat_map(|url| {
                    if request.keywords().is_empty() {
                        vec![url]
                    } else {
                        request
                            .keywords()
                            .iter()
                            .map(|keyword| slash::join(&url, keyword))
                            .collect()
                    }
                })
                .collect();
        }

        if request.urls_only() {
            if explicit.is_some() {
                debug!("Searching URL keywords on {}", destination.name());
                return destination.query_urls(&request.url_keywords(), params);
            }

            debug!("Opening URL keywords directly");
            return request
                .url_keywords()
                .iter()
                .flat_map(|url| with_ports(url, &params.ports))
                .collect();
        }

        if request.has_search_keywords() {
            debug!("Building search URLs for {}", destination.name());
            return destination.query_urls(request.keywords(), params);
        }

        debug!("Opening {} without a query", destination.name());
        destination.base_urls(&params.ports)
    }
}
