//! Output options: where and how bundles are emitted.

use serde_json::Value;

use crate::chainable::Chainable;
use crate::chained_map::{shorthands, ChainedMap};
use crate::error::Result;

#[derive(Debug, Clone, Default)]
pub struct Output {
    options: ChainedMap<Value>,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    shorthands! {
        filename => "filename",
        chunk_filename => "chunkFilename",
        path => "path",
        public_path => "publicPath",
        library => "library",
        library_target => "libraryTarget",
        library_export => "libraryExport",
        global_object => "globalObject",
        pathinfo => "pathinfo",
        cross_origin_loading => "crossOriginLoading",
        source_map_filename => "sourceMapFilename",
        hot_update_chunk_filename => "hotUpdateChunkFilename",
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

impl Chainable for Output {}
