//! Topography data sources.
//!
//! Rendering only needs "give me the samples for this region". This crate
//! puts that behind the [`TopoSource`] trait and supplies:
//! - [`ErddapClient`]: queries an ERDDAP griddap server over HTTP
//! - [`FileCache`]: raw query results on disk, keyed by region
//! - [`CachedSource`]: cache first, falling back to another source

pub mod cache;
pub mod config;
pub mod erddap;
pub mod provider;

pub use cache::{CachedSource, FileCache};
pub use config::SourceConfig;
pub use erddap::ErddapClient;
pub use provider::TopoSource;
