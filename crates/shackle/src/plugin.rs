//! Named plugin node: a constructor reference plus opaque constructor args.

use serde_json::{Map, Value};

use crate::chainable::{Chainable, OrderHint, Orderable};
use crate::error::{value_kind, ConfigError, Result};

/// How a plugin constructor is referenced in the materialized config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginCtor {
    /// A constructor identifier in scope, e.g. `HtmlWebpackPlugin`.
    Ident(String),
    /// A module path to be required at instantiation time.
    Require(String),
}

impl PluginCtor {
    /// Source-like constructor expression.
    pub fn expression(&self) -> String {
        match self {
            PluginCtor::Ident(name) => name.clone(),
            PluginCtor::Require(path) => format!("(require('{path}'))"),
        }
    }
}

impl From<&str> for PluginCtor {
    fn from(name: &str) -> Self {
        PluginCtor::Ident(name.to_owned())
    }
}

impl From<String> for PluginCtor {
    fn from(name: String) -> Self {
        PluginCtor::Ident(name)
    }
}

/// Which map the plugin lives in; read only by the diagnostic renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PluginKind {
    Plugin,
    Minimizer,
}

impl PluginKind {
    pub(crate) fn call_path(self, prefix: &str, name: &str) -> String {
        match self {
            PluginKind::Plugin => format!("{prefix}.plugin('{name}')"),
            PluginKind::Minimizer => format!("{prefix}.optimization.minimizer('{name}')"),
        }
    }
}

/// Named plugin entry. The name and kind identify the entry for diagnostics
/// only; materialized output carries just the constructor expression and the
/// argument list.
#[derive(Debug, Clone)]
pub struct Plugin {
    name: String,
    kind: PluginKind,
    ctor: Option<PluginCtor>,
    args: Vec<Value>,
    hint: OrderHint,
}

impl Plugin {
    pub(crate) fn new(name: impl Into<String>, kind: PluginKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ctor: None,
            args: Vec::new(),
            hint: OrderHint::Natural,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bind the constructor and its argument list. Overwrites silently, like
    /// any other set.
    pub fn use_(
        &mut self,
        ctor: impl Into<PluginCtor>,
        args: impl IntoIterator<Item = Value>,
    ) -> &mut Self {
        self.ctor = Some(ctor.into());
        self.args = args.into_iter().collect();
        self
    }

    /// Post-process the argument list before materialization.
    pub fn tap(&mut self, f: impl FnOnce(Vec<Value>) -> Vec<Value>) -> &mut Self {
        self.args = f(std::mem::take(&mut self.args));
        self
    }

    /// Place this plugin immediately before the named sibling.
    pub fn before(&mut self, anchor: impl Into<String>) -> &mut Self {
        self.hint = OrderHint::Before(anchor.into());
        self
    }

    /// Place this plugin immediately after the named sibling.
    pub fn after(&mut self, anchor: impl Into<String>) -> &mut Self {
        self.hint = OrderHint::After(anchor.into());
        self
    }

    /// Overlay a `{plugin, args}` object onto this entry. Rebinding an
    /// already-configured constructor to a different one is a conflict.
    pub fn merge(&mut self, source: &Value) -> Result<&mut Self> {
        let Some(incoming) = source.as_object() else {
            return Err(ConfigError::MalformedMerge {
                found: value_kind(source),
            });
        };

        if let Some(requested) = incoming.get("plugin").and_then(Value::as_str) {
            let requested = PluginCtor::from(requested);
            match &self.ctor {
                Some(existing) if *existing != requested => {
                    return Err(ConfigError::PluginConflict {
                        name: self.name.clone(),
                        existing: existing.expression(),
                        requested: requested.expression(),
                    });
                }
                _ => self.ctor = Some(requested),
            }
        }

        if let Some(Value::Array(args)) = incoming.get("args") {
            self.args.extend(args.iter().cloned());
        }

        Ok(self)
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub(crate) fn ctor(&self) -> Option<&PluginCtor> {
        self.ctor.as_ref()
    }

    pub(crate) fn kind(&self) -> PluginKind {
        self.kind
    }

    /// Materialize to `{plugin, args}`; empty pieces are omitted.
    pub fn to_config(&self) -> Value {
        let mut map = Map::new();
        if let Some(ctor) = &self.ctor {
            map.insert("plugin".to_owned(), Value::String(ctor.expression()));
        }
        if !self.args.is_empty() {
            map.insert("args".to_owned(), Value::Array(self.args.clone()));
        }
        Value::Object(map)
    }
}

impl Orderable for Plugin {
    fn order_hint(&self) -> OrderHint {
        self.hint.clone()
    }
}

impl Chainable for Plugin {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn use_binds_ctor_and_args() {
        let mut plugin = Plugin::new("html", PluginKind::Plugin);
        plugin.use_("HtmlWebpackPlugin", [json!({"title": "t"})]);
        assert_eq!(
            plugin.to_config(),
            json!({"plugin": "HtmlWebpackPlugin", "args": [{"title": "t"}]})
        );
    }

    #[test]
    fn tap_transforms_current_args() {
        let mut plugin = Plugin::new("define", PluginKind::Plugin);
        plugin.use_("DefinePlugin", [json!({"A": 1})]);
        plugin.tap(|mut args| {
            args.push(json!({"B": 2}));
            args
        });
        assert_eq!(plugin.args(), &[json!({"A": 1}), json!({"B": 2})]);
    }

    #[test]
    fn merge_rejects_ctor_rebinding() {
        let mut plugin = Plugin::new("html", PluginKind::Plugin);
        plugin.use_("HtmlWebpackPlugin", []);
        let err = plugin
            .merge(&json!({"plugin": "OtherPlugin"}))
            .unwrap_err();
        assert!(matches!(err, ConfigError::PluginConflict { .. }));
    }

    #[test]
    fn merge_accepts_matching_ctor_and_appends_args() {
        let mut plugin = Plugin::new("html", PluginKind::Plugin);
        plugin.use_("HtmlWebpackPlugin", [json!(1)]);
        plugin
            .merge(&json!({"plugin": "HtmlWebpackPlugin", "args": [2]}))
            .unwrap();
        assert_eq!(plugin.args(), &[json!(1), json!(2)]);
    }

    #[test]
    fn require_ctor_renders_as_require_expression() {
        let mut plugin = Plugin::new("local", PluginKind::Plugin);
        plugin.use_(PluginCtor::Require("./plugin.js".into()), []);
        assert_eq!(
            plugin.to_config(),
            json!({"plugin": "(require('./plugin.js'))"})
        );
    }
}
