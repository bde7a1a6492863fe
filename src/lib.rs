//! # browser-search
//!
//! Turns a declarative search request (keywords, engines, routes, ports and a
//! protocol preference) into fully-qualified URLs, and hands them to a browser.
//!
//! The URL construction engine is pure and synchronous:
//!
//! - [`SearchOptions`] normalizes raw input into a [`SearchRequest`]
//! - [`Engine`] describes one search destination
//! - [`Search`] combines both into the ordered URL list
//!
//! Opening URLs is delegated to a [`Launcher`].
//!
//! ## Example
//!
//! ```rust
//! use browser_search::{Engine, Search, SearchOptions};
//!
//! fn main() -> browser_search::Result<()> {
//!     let github = Engine::builder("github.com")
//!         .query("search?q=")
//!         .route("prs", "pulls")
//!         .build()?;
//!
//!     let request = SearchOptions::new()
//!         .with_engine(github)
//!         .with_route("prs")
//!         .normalize();
//!
//!     let urls = Search::default().urls(&request)?;
//!     assert_eq!(urls, vec!["https://github.com/pulls"]);
//!     Ok(())
//! }
//! ```

mod engine;
mod error;
mod keywords;
mod launcher;
mod launcher_system;
mod options;
mod search;

pub mod browser;
pub mod config;
pub mod utils;

pub use browser::{Browser, LaunchTarget};
pub use config::Config;
pub use engine::{Engine, EngineBuilder, EngineTarget, QueryConfig, QuerySelector, SearchParams};
pub use error::{Result, SearchError};
pub use keywords::{KeywordInput, KeywordValue};
pub use launcher::{launch_all, LaunchReport, Launcher};
pub use launcher_system::{Invocation, SystemLauncher};
pub use options::{PortValue, RouteInput, SearchOptions, SearchRequest};
pub use search::Search;
