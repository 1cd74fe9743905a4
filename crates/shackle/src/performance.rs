//! Performance budget options.

use serde_json::Value;

use crate::chainable::Chainable;
use crate::chained_map::{shorthands, ChainedMap};
use crate::error::Result;

#[derive(Debug, Clone, Default)]
pub struct Performance {
    options: ChainedMap<Value>,
}

impl Performance {
    pub fn new() -> Self {
        Self::default()
    }

    shorthands! {
        hints => "hints",
        max_entrypoint_size => "maxEntrypointSize",
        max_asset_size => "maxAssetSize",
        asset_filter => "assetFilter",
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.options.set(key, value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    pub fn merge(&mut self, source: &Value) -> Result<&mut Self> {
        self.options.merge(source, &[])?;
        Ok(self)
    }

    pub fn to_config(&self) -> Option<Value> {
        self.options.to_config()
    }
}

impl Chainable for Performance {}
