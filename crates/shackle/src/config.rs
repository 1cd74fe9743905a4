//! The root configuration node.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::chainable::Chainable;
use crate::chained_map::{shorthands, ChainedMap};
use crate::chained_set::ChainedSet;
use crate::dev_server::DevServer;
use crate::error::{value_kind, ConfigError, Result};
use crate::merge::clean;
use crate::module::Module;
use crate::optimization::Optimization;
use crate::output::Output;
use crate::performance::Performance;
use crate::plugin::{Plugin, PluginKind};
use crate::resolve::{Resolve, ResolveLoader};
use crate::stringify::{stringify_config, StringifyOptions};

/// Keys that route into a named sub-tree during merge, and are therefore
/// excluded from the generic fallback merge.
const SUB_TREES: &[&str] = &[
    "node",
    "output",
    "resolve",
    "resolveLoader",
    "devServer",
    "optimization",
    "performance",
    "module",
];

/// Root of the builder tree.
///
/// A `Config` is mutated fluently while a build is being assembled, then
/// materialized with [`to_config`](Config::to_config) into a single plain
/// value handed to the bundling engine. Materialization is a pure read;
/// mutate-and-rematerialize cycles are allowed indefinitely.
#[derive(Debug, Clone, Default)]
pub struct Config {
    options: ChainedMap<Value>,
    pub dev_server: DevServer,
    pub entry_points: ChainedMap<ChainedSet<Value>>,
    pub module: Module,
    pub node: ChainedMap<Value>,
    pub optimization: Optimization,
    pub output: Output,
    pub performance: Performance,
    pub plugins: ChainedMap<Plugin>,
    pub resolve: Resolve,
    pub resolve_loader: ResolveLoader,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    shorthands! {
        amd => "amd",
        bail => "bail",
        cache => "cache",
        context => "context",
        devtool => "devtool",
        externals => "externals",
        loader => "loader",
        mode => "mode",
        name => "name",
        parallelism => "parallelism",
        profile => "profile",
        records_input_path => "recordsInputPath",
        records_path => "recordsPath",
        records_output_path => "recordsOutputPath",
        stats => "stats",
        target => "target",
        watch => "watch",
        watch_options => "watchOptions",
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.options.set(key, value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// The named entry chunk's file sequence, created on first reference.
    pub fn entry(&mut self, name: &str) -> &mut ChainedSet<Value> {
        self.entry_points.get_or_compute(name, ChainedSet::new)
    }

    /// The named plugin, created on first reference.
    pub fn plugin(&mut self, name: &str) -> &mut Plugin {
        self.plugins
            .get_or_compute(name, || Plugin::new(name, PluginKind::Plugin))
    }

    /// Materialize the whole tree into one plain configuration value.
    ///
    /// Pure and idempotent: repeated calls without intervening mutation
    /// produce structurally equal values.
    pub fn to_config(&self) -> Value {
        let mut map = match self.options.to_config() {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };

        let sub_trees = [
            ("node", self.node.to_config()),
            ("output", self.output.to_config()),
            ("resolve", self.resolve.to_config()),
            ("resolveLoader", self.resolve_loader.to_config()),
            ("devServer", self.dev_server.to_config()),
            ("module", self.module.to_config()),
            ("optimization", self.optimization.to_config()),
        ];
        for (key, value) in sub_trees {
            if let Some(value) = value {
                map.insert(key.to_owned(), value);
            }
        }

        let plugins: Vec<Value> = self
            .plugins
            .values()
            .iter()
            .map(|plugin| plugin.to_config())
            .collect();
        if !plugins.is_empty() {
            map.insert("plugins".to_owned(), Value::Array(plugins));
        }

        if let Some(performance) = self.performance.to_config() {
            map.insert("performance".to_owned(), performance);
        }

        if let Some(entries) = self.entry_points.entries() {
            let mut entry = Map::new();
            for (name, files) in entries {
                if let Some(files) = files.to_config() {
                    entry.insert(name.to_owned(), files);
                }
            }
            map.insert("entry".to_owned(), Value::Object(entry));
        }

        clean(Value::Object(map))
    }

    /// Source-like diagnostic rendering of the materialized configuration.
    pub fn to_string_with(&self, options: &StringifyOptions) -> String {
        stringify_config(self, options)
    }

    /// Overlay a plain configuration object onto this tree.
    ///
    /// Three families get dedicated treatment before the generic fallback:
    /// `entry` sequences append rather than overwrite, `plugin` entries merge
    /// into their named nodes (constructor rebinding is a conflict), and each
    /// named sub-tree key delegates into that sub-tree.
    pub fn merge(&mut self, source: &Value, omit: &[&str]) -> Result<&mut Self> {
        let Some(incoming) = source.as_object() else {
            return Err(ConfigError::MalformedMerge {
                found: value_kind(source),
            });
        };

        tracing::debug!(keys = incoming.len(), "merging configuration overlay");

        if !omit.contains(&"entry") {
            if let Some(entries) = incoming.get("entry").and_then(Value::as_object) {
                for (name, files) in entries {
                    match files {
                        Value::Array(files) => {
                            self.entry(name).merge(files.iter().cloned());
                        }
                        single => {
                            self.entry(name).add(single.clone());
                        }
                    }
                }
            }
        }

        if !omit.contains(&"plugin") {
            if let Some(plugins) = incoming.get("plugin").and_then(Value::as_object) {
                for (name, value) in plugins {
                    self.plugin(name).merge(value)?;
                }
            }
        }

        for key in SUB_TREES {
            if omit.contains(key) {
                continue;
            }
            let Some(value) = incoming.get(*key) else {
                continue;
            };
            match *key {
                "node" => {
                    self.node.merge(value, &[])?;
                }
                "output" => {
                    self.output.merge(value)?;
                }
                "resolve" => {
                    self.resolve.merge(value)?;
                }
                "resolveLoader" => {
                    self.resolve_loader.merge(value)?;
                }
                "devServer" => {
                    self.dev_server.merge(value)?;
                }
                "optimization" => {
                    self.optimization.merge(value)?;
                }
                "performance" => {
                    self.performance.merge(value)?;
                }
                "module" => {
                    self.module.merge(value)?;
                }
                _ => unreachable!("key list and routing are maintained together"),
            }
        }

        let mut fallback_omit: Vec<&str> = omit.to_vec();
        fallback_omit.extend_from_slice(SUB_TREES);
        fallback_omit.extend_from_slice(&["entry", "plugin"]);
        self.options.merge(source, &fallback_omit)?;

        Ok(self)
    }

    pub(crate) fn own_config(&self) -> Option<Value> {
        self.options.to_config()
    }
}

impl Chainable for Config {}

impl Serialize for Config {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_config().serialize(serializer)
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with(&StringifyOptions::default()))
    }
}
