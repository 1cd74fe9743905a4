//! Optimization options, including the named minimizer map.

use serde_json::Value;

use crate::chainable::Chainable;
use crate::chained_map::{shorthands, ChainedMap};
use crate::error::Result;
use crate::merge::clean_to_option;
use crate::plugin::{Plugin, PluginKind};

#[derive(Debug, Clone, Default)]
pub struct Optimization {
    options: ChainedMap<Value>,
    pub minimizers: ChainedMap<Plugin>,
}

impl Optimization {
    pub fn new() -> Self {
        Self::default()
    }

    shorthands! {
        minimize => "minimize",
        split_chunks => "splitChunks",
        runtime_chunk => "runtimeChunk",
        side_effects => "sideEffects",
        used_exports => "usedExports",
        concatenate_modules => "concatenateModules",
        remove_empty_chunks => "removeEmptyChunks",
        merge_duplicate_chunks => "mergeDuplicateChunks",
        node_env => "nodeEnv",
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.options.set(key, value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// The named minimizer plugin, created on first reference.
    pub fn minimizer(&mut self, name: &str) -> &mut Plugin {
        self.minimizers
            .get_or_compute(name, || Plugin::new(name, PluginKind::Minimizer))
    }

    pub fn merge(&mut self, source: &Value) -> Result<&mut Self> {
        if let Some(minimizers) = source.get("minimizer").and_then(Value::as_object) {
            for (name, value) in minimizers {
                self.minimizer(name).merge(value)?;
            }
        }
        self.options.merge(source, &["minimizer"])?;
        Ok(self)
    }

    pub(crate) fn options_config(&self) -> Option<Value> {
        self.options.to_config()
    }

    pub fn to_config(&self) -> Option<Value> {
        let mut map = match self.options.to_config() {
            Some(Value::Object(map)) => map,
            _ => Default::default(),
        };
        let minimizers: Vec<Value> = self
            .minimizers
            .values()
            .iter()
            .map(|plugin| plugin.to_config())
            .collect();
        if !minimizers.is_empty() {
            map.insert("minimizer".to_owned(), Value::Array(minimizers));
        }
        clean_to_option(map)
    }
}

impl Chainable for Optimization {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minimizers_materialize_in_resolved_order() {
        let mut optimization = Optimization::new();
        optimization.minimize(true);
        optimization.minimizer("terser").use_("TerserPlugin", []);
        optimization
            .minimizer("css")
            .use_("CssMinimizerPlugin", [])
            .before("terser");

        assert_eq!(
            optimization.to_config().unwrap(),
            json!({
                "minimize": true,
                "minimizer": [
                    {"plugin": "CssMinimizerPlugin"},
                    {"plugin": "TerserPlugin"}
                ]
            })
        );
    }
}
