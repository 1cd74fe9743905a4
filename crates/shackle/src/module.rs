//! Module options: the rule tree (nested rules, oneOf branches, loader uses).

use serde_json::{Map, Value};

use crate::chainable::{Chainable, OrderHint, Orderable};
use crate::chained_map::{shorthands, ChainedMap};
use crate::chained_set::ChainedSet;
use crate::error::{value_kind, ConfigError, Result};
use crate::merge::{clean, clean_to_option, merge_values};

/// One step of a rule's lineage (`rule('ts')`, `oneOf('esm')`), kept only
/// for diagnostic rendering.
#[derive(Debug, Clone)]
pub(crate) struct RuleStep {
    pub(crate) kind: &'static str,
    pub(crate) name: String,
}

/// Module configuration: scalar options plus the named rule tree.
#[derive(Debug, Clone, Default)]
pub struct Module {
    options: ChainedMap<Value>,
    pub rules: ChainedMap<Rule>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    shorthands! {
        no_parse => "noParse",
        strict_export_presence => "strictExportPresence",
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.options.set(key, value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// The named rule, created on first reference.
    pub fn rule(&mut self, name: &str) -> &mut Rule {
        self.rules.get_or_compute(name, || {
            Rule::new(vec![RuleStep {
                kind: "rule",
                name: name.to_owned(),
            }])
        })
    }

    pub fn merge(&mut self, source: &Value) -> Result<&mut Self> {
        let Some(incoming) = source.as_object() else {
            return Err(ConfigError::MalformedMerge {
                found: value_kind(source),
            });
        };

        if let Some(rules) = incoming.get("rule").and_then(Value::as_object) {
            for (name, value) in rules {
                self.rule(name).merge(value)?;
            }
        }

        self.options.merge(source, &["rule"])?;
        Ok(self)
    }

    pub(crate) fn options_config(&self) -> Option<Value> {
        self.options.to_config()
    }

    pub fn to_config(&self) -> Option<Value> {
        let mut map = match self.options.to_config() {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };

        let rules: Vec<Value> = self.rules.values().iter().map(|rule| rule.to_config()).collect();
        if !rules.is_empty() {
            map.insert("rules".to_owned(), Value::Array(rules));
        }

        clean_to_option(map)
    }
}

impl Chainable for Module {}

/// A single rule: matching options, loader uses, nested rules and oneOf
/// branches. Rules know their lineage of named ancestors, but only the
/// diagnostic renderer ever reads it.
#[derive(Debug, Clone)]
pub struct Rule {
    options: ChainedMap<Value>,
    pub include: ChainedSet<Value>,
    pub exclude: ChainedSet<Value>,
    pub uses: ChainedMap<Use>,
    pub rules: ChainedMap<Rule>,
    pub one_ofs: ChainedMap<Rule>,
    lineage: Vec<RuleStep>,
    hint: OrderHint,
}

impl Rule {
    fn new(lineage: Vec<RuleStep>) -> Self {
        Self {
            options: ChainedMap::new(),
            include: ChainedSet::new(),
            exclude: ChainedSet::new(),
            uses: ChainedMap::new(),
            rules: ChainedMap::new(),
            one_ofs: ChainedMap::new(),
            lineage,
            hint: OrderHint::Natural,
        }
    }

    shorthands! {
        test => "test",
        enforce => "enforce",
        mimetype => "mimetype",
        resource_query => "resourceQuery",
        side_effects => "sideEffects",
        r#type => "type",
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.options.set(key, value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// The named loader use, created on first reference.
    pub fn use_(&mut self, name: &str) -> &mut Use {
        let lineage = self.lineage.clone();
        self.uses
            .get_or_compute(name, || Use::new(name, lineage))
    }

    /// A nested child rule, created on first reference.
    pub fn rule(&mut self, name: &str) -> &mut Rule {
        let lineage = self.child_lineage("rule", name);
        self.rules.get_or_compute(name, || Rule::new(lineage))
    }

    /// A oneOf branch, created on first reference.
    pub fn one_of(&mut self, name: &str) -> &mut Rule {
        let lineage = self.child_lineage("oneOf", name);
        self.one_ofs.get_or_compute(name, || Rule::new(lineage))
    }

    fn child_lineage(&self, kind: &'static str, name: &str) -> Vec<RuleStep> {
        let mut lineage = self.lineage.clone();
        lineage.push(RuleStep {
            kind,
            name: name.to_owned(),
        });
        lineage
    }

    /// Place this rule immediately before the named sibling.
    pub fn before(&mut self, anchor: impl Into<String>) -> &mut Self {
        self.hint = OrderHint::Before(anchor.into());
        self
    }

    /// Place this rule immediately after the named sibling.
    pub fn after(&mut self, anchor: impl Into<String>) -> &mut Self {
        self.hint = OrderHint::After(anchor.into());
        self
    }

    pub fn merge(&mut self, source: &Value) -> Result<&mut Self> {
        let Some(incoming) = source.as_object() else {
            return Err(ConfigError::MalformedMerge {
                found: value_kind(source),
            });
        };

        if let Some(Value::Array(paths)) = incoming.get("include") {
            self.include.merge(paths.iter().cloned());
        }
        if let Some(Value::Array(paths)) = incoming.get("exclude") {
            self.exclude.merge(paths.iter().cloned());
        }
        if let Some(uses) = incoming.get("use").and_then(Value::as_object) {
            for (name, value) in uses {
                self.use_(name).merge(value)?;
            }
        }
        if let Some(branches) = incoming.get("oneOf").and_then(Value::as_object) {
            for (name, value) in branches {
                self.one_of(name).merge(value)?;
            }
        }
        if let Some(nested) = incoming.get("rule").and_then(Value::as_object) {
            for (name, value) in nested {
                self.rule(name).merge(value)?;
            }
        }

        self.options
            .merge(source, &["include", "exclude", "use", "oneOf", "rule"])?;
        Ok(self)
    }

    pub(crate) fn lineage(&self) -> &[RuleStep] {
        &self.lineage
    }

    /// Matching options plus include/exclude, without the child collections.
    /// Feeds the diagnostic renderer, which draws children from their nodes.
    pub(crate) fn base_config(&self) -> Option<Value> {
        let mut map = match self.options.to_config() {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        if let Some(include) = self.include.to_config() {
            map.insert("include".to_owned(), include);
        }
        if let Some(exclude) = self.exclude.to_config() {
            map.insert("exclude".to_owned(), exclude);
        }
        clean_to_option(map)
    }

    pub fn to_config(&self) -> Value {
        let mut map = match self.options.to_config() {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };

        if let Some(include) = self.include.to_config() {
            map.insert("include".to_owned(), include);
        }
        if let Some(exclude) = self.exclude.to_config() {
            map.insert("exclude".to_owned(), exclude);
        }

        let uses: Vec<Value> = self.uses.values().iter().map(|u| u.to_config()).collect();
        if !uses.is_empty() {
            map.insert("use".to_owned(), Value::Array(uses));
        }

        let branches: Vec<Value> = self.one_ofs.values().iter().map(|r| r.to_config()).collect();
        if !branches.is_empty() {
            map.insert("oneOf".to_owned(), Value::Array(branches));
        }

        let nested: Vec<Value> = self.rules.values().iter().map(|r| r.to_config()).collect();
        if !nested.is_empty() {
            map.insert("rules".to_owned(), Value::Array(nested));
        }

        clean(Value::Object(map))
    }
}

impl Orderable for Rule {
    fn order_hint(&self) -> OrderHint {
        self.hint.clone()
    }
}

impl Chainable for Rule {}

/// One loader application inside a rule's `use` list.
#[derive(Debug, Clone)]
pub struct Use {
    name: String,
    lineage: Vec<RuleStep>,
    loader: Option<String>,
    options: Option<Value>,
    hint: OrderHint,
}

impl Use {
    fn new(name: &str, lineage: Vec<RuleStep>) -> Self {
        Self {
            name: name.to_owned(),
            lineage,
            loader: None,
            options: None,
            hint: OrderHint::Natural,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn loader(&mut self, loader: impl Into<String>) -> &mut Self {
        self.loader = Some(loader.into());
        self
    }

    pub fn options(&mut self, options: impl Into<Value>) -> &mut Self {
        self.options = Some(options.into());
        self
    }

    /// Post-process the loader options before materialization. The closure
    /// receives the current options (if any) and returns the replacement.
    pub fn tap(&mut self, f: impl FnOnce(Option<Value>) -> Value) -> &mut Self {
        self.options = Some(f(self.options.take()));
        self
    }

    /// Place this use immediately before the named sibling.
    pub fn before(&mut self, anchor: impl Into<String>) -> &mut Self {
        self.hint = OrderHint::Before(anchor.into());
        self
    }

    /// Place this use immediately after the named sibling.
    pub fn after(&mut self, anchor: impl Into<String>) -> &mut Self {
        self.hint = OrderHint::After(anchor.into());
        self
    }

    pub fn merge(&mut self, source: &Value) -> Result<&mut Self> {
        let Some(incoming) = source.as_object() else {
            return Err(ConfigError::MalformedMerge {
                found: value_kind(source),
            });
        };

        if let Some(loader) = incoming.get("loader").and_then(Value::as_str) {
            self.loader = Some(loader.to_owned());
        }
        if let Some(options) = incoming.get("options") {
            match &mut self.options {
                Some(existing) => merge_values(existing, options),
                None => self.options = Some(options.clone()),
            }
        }

        Ok(self)
    }

    pub(crate) fn lineage(&self) -> &[RuleStep] {
        &self.lineage
    }

    pub fn to_config(&self) -> Value {
        let mut map = Map::new();
        if let Some(loader) = &self.loader {
            map.insert("loader".to_owned(), Value::String(loader.clone()));
        }
        if let Some(options) = &self.options {
            map.insert("options".to_owned(), options.clone());
        }
        clean(Value::Object(map))
    }
}

impl Orderable for Use {
    fn order_hint(&self) -> OrderHint {
        self.hint.clone()
    }
}

impl Chainable for Use {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rule_tree_materializes_depth_first() {
        let mut module = Module::new();
        module
            .rule("ts")
            .test("\\.tsx?$")
            .use_("babel")
            .loader("babel-loader")
            .options(json!({"cacheDirectory": true}));
        module.rule("ts").include.add("src");

        assert_eq!(
            module.to_config().unwrap(),
            json!({
                "rules": [{
                    "test": "\\.tsx?$",
                    "include": ["src"],
                    "use": [{
                        "loader": "babel-loader",
                        "options": {"cacheDirectory": true}
                    }]
                }]
            })
        );
    }

    #[test]
    fn rule_type_writes_the_type_key() {
        let mut module = Module::new();
        module.rule("wasm").test("\\.wasm$").r#type("webassembly/async");

        assert_eq!(
            module.rule("wasm").get("type"),
            Some(&json!("webassembly/async"))
        );
        assert_eq!(
            module.to_config().unwrap()["rules"][0]["type"],
            json!("webassembly/async")
        );
    }

    #[test]
    fn one_of_branches_keep_lineage() {
        let mut module = Module::new();
        let branch = module.rule("assets").one_of("inline");
        let kinds: Vec<&str> = branch.lineage().iter().map(|s| s.kind).collect();
        let names: Vec<&str> = branch.lineage().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(kinds, vec!["rule", "oneOf"]);
        assert_eq!(names, vec!["assets", "inline"]);
    }

    #[test]
    fn use_ordering_honors_before() {
        let mut module = Module::new();
        module.rule("ts").use_("babel").loader("babel-loader");
        module.rule("ts").use_("cache").loader("cache-loader").before("babel");

        let rule = module.to_config().unwrap();
        let loaders: Vec<&str> = rule["rules"][0]["use"]
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["loader"].as_str().unwrap())
            .collect();
        assert_eq!(loaders, vec!["cache-loader", "babel-loader"]);
    }

    #[test]
    fn merge_routes_uses_and_sets() {
        let mut module = Module::new();
        module
            .merge(&json!({
                "rule": {
                    "css": {
                        "test": "\\.css$",
                        "exclude": ["node_modules"],
                        "use": {
                            "style": {"loader": "style-loader"}
                        }
                    }
                }
            }))
            .unwrap();

        let config = module.to_config().unwrap();
        assert_eq!(config["rules"][0]["test"], json!("\\.css$"));
        assert_eq!(config["rules"][0]["exclude"], json!(["node_modules"]));
        assert_eq!(config["rules"][0]["use"][0]["loader"], json!("style-loader"));
    }

    #[test]
    fn use_tap_replaces_options() {
        let mut module = Module::new();
        module
            .rule("ts")
            .use_("babel")
            .options(json!({"a": 1}))
            .tap(|options| {
                let mut options = options.unwrap();
                options["b"] = json!(2);
                options
            });
        assert_eq!(
            module.rule("ts").use_("babel").to_config()["options"],
            json!({"a": 1, "b": 2})
        );
    }
}
