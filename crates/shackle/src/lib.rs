//! shackle — a chainable, order-aware configuration builder.
//!
//! Callers assemble a [`Config`] tree through fluent mutators, then
//! materialize it with [`Config::to_config`] into one plain
//! `serde_json::Value` handed to the bundling engine. Every map-like slot
//! keeps insertion order; plugins, rules and uses can request placement
//! relative to a named sibling, resolved at read time.
//!
//! ```
//! use serde_json::json;
//! use shackle::Config;
//!
//! let mut config = Config::new();
//! config.mode("production");
//! config.entry("app").add("./src/index.js");
//! config.output.filename("[name].[contenthash].js");
//! config
//!     .plugin("html")
//!     .use_("HtmlWebpackPlugin", [json!({"title": "app"})]);
//!
//! let materialized = config.to_config();
//! assert_eq!(materialized["entry"]["app"], json!(["./src/index.js"]));
//! ```

pub mod chainable;
pub mod chained_map;
pub mod chained_set;
pub mod config;
pub mod dev_server;
pub mod error;
pub mod merge;
pub mod module;
pub mod optimization;
pub mod output;
pub mod performance;
pub mod plugin;
pub mod resolve;
pub mod stringify;

// Re-export main types
pub use chainable::{Chainable, OrderHint, Orderable};
pub use chained_map::ChainedMap;
pub use chained_set::ChainedSet;
pub use config::Config;
pub use dev_server::DevServer;
pub use error::{ConfigError, Result};
pub use merge::{clean, merge_values};
pub use module::{Module, Rule, Use};
pub use optimization::Optimization;
pub use output::Output;
pub use performance::Performance;
pub use plugin::{Plugin, PluginCtor};
pub use resolve::{Resolve, ResolveLoader};
pub use stringify::{expression, StringifyOptions};
