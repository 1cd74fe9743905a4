//! Dev-server options passed through to the serving layer.

use serde_json::Value;

use crate::chainable::Chainable;
use crate::chained_map::{shorthands, ChainedMap};
use crate::chained_set::ChainedSet;
use crate::error::Result;
use crate::merge::clean_to_option;

#[derive(Debug, Clone, Default)]
pub struct DevServer {
    options: ChainedMap<Value>,
    pub allowed_hosts: ChainedSet<Value>,
}

impl DevServer {
    pub fn new() -> Self {
        Self::default()
    }

    shorthands! {
        host => "host",
        port => "port",
        hot => "hot",
        open => "open",
        https => "https",
        compress => "compress",
        history_api_fallback => "historyApiFallback",
        proxy => "proxy",
        public => "public",
        quiet => "quiet",
        watch_content_base => "watchContentBase",
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.options.set(key, value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    pub fn merge(&mut self, source: &Value) -> Result<&mut Self> {
        if let Some(Value::Array(hosts)) = source.get("allowedHosts") {
            self.allowed_hosts.merge(hosts.iter().cloned());
        }
        self.options.merge(source, &["allowedHosts"])?;
        Ok(self)
    }

    pub fn to_config(&self) -> Option<Value> {
        let mut map = match self.options.to_config() {
            Some(Value::Object(map)) => map,
            _ => Default::default(),
        };
        if let Some(hosts) = self.allowed_hosts.to_config() {
            map.insert("allowedHosts".to_owned(), hosts);
        }
        clean_to_option(map)
    }
}

impl Chainable for DevServer {}
