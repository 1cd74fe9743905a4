//! Module- and loader-resolution options.

use serde_json::Value;

use crate::chainable::Chainable;
use crate::chained_map::{shorthands, ChainedMap};
use crate::chained_set::ChainedSet;
use crate::error::Result;
use crate::merge::clean_to_option;

/// Resolution options for imported modules.
#[derive(Debug, Clone, Default)]
pub struct Resolve {
    options: ChainedMap<Value>,
    pub alias: ChainedMap<Value>,
    pub extensions: ChainedSet<Value>,
    pub modules: ChainedSet<Value>,
    pub main_fields: ChainedSet<Value>,
    pub main_files: ChainedSet<Value>,
}

impl Resolve {
    pub fn new() -> Self {
        Self::default()
    }

    shorthands! {
        enforce_extension => "enforceExtension",
        symlinks => "symlinks",
        unsafe_cache => "unsafeCache",
        cache_with_context => "cacheWithContext",
        prefer_relative => "preferRelative",
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.options.set(key, value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    pub fn merge(&mut self, source: &Value) -> Result<&mut Self> {
        if let Some(alias) = source.get("alias") {
            self.alias.merge(alias, &[])?;
        }
        for (key, set) in [
            ("extensions", &mut self.extensions),
            ("modules", &mut self.modules),
            ("mainFields", &mut self.main_fields),
            ("mainFiles", &mut self.main_files),
        ] {
            if let Some(Value::Array(values)) = source.get(key) {
                set.merge(values.iter().cloned());
            }
        }
        self.options.merge(
            source,
            &["alias", "extensions", "modules", "mainFields", "mainFiles"],
        )?;
        Ok(self)
    }

    pub fn to_config(&self) -> Option<Value> {
        let mut map = match self.options.to_config() {
            Some(Value::Object(map)) => map,
            _ => Default::default(),
        };
        if let Some(alias) = self.alias.to_config() {
            map.insert("alias".to_owned(), alias);
        }
        for (key, set) in [
            ("extensions", &self.extensions),
            ("modules", &self.modules),
            ("mainFields", &self.main_fields),
            ("mainFiles", &self.main_files),
        ] {
            if let Some(values) = set.to_config() {
                map.insert(key.to_owned(), values);
            }
        }
        clean_to_option(map)
    }
}

impl Chainable for Resolve {}

/// Resolution options applied only when locating loaders.
#[derive(Debug, Clone, Default)]
pub struct ResolveLoader {
    options: ChainedMap<Value>,
    pub extensions: ChainedSet<Value>,
    pub modules: ChainedSet<Value>,
    pub main_fields: ChainedSet<Value>,
}

impl ResolveLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.options.set(key, value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    pub fn merge(&mut self, source: &Value) -> Result<&mut Self> {
        for (key, set) in [
            ("extensions", &mut self.extensions),
            ("modules", &mut self.modules),
            ("mainFields", &mut self.main_fields),
        ] {
            if let Some(Value::Array(values)) = source.get(key) {
                set.merge(values.iter().cloned());
            }
        }
        self.options
            .merge(source, &["extensions", "modules", "mainFields"])?;
        Ok(self)
    }

    pub fn to_config(&self) -> Option<Value> {
        let mut map = match self.options.to_config() {
            Some(Value::Object(map)) => map,
            _ => Default::default(),
        };
        for (key, set) in [
            ("extensions", &self.extensions),
            ("modules", &self.modules),
            ("mainFields", &self.main_fields),
        ] {
            if let Some(values) = set.to_config() {
                map.insert(key.to_owned(), values);
            }
        }
        clean_to_option(map)
    }
}

impl Chainable for ResolveLoader {}
