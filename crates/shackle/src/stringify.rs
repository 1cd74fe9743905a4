//! Source-like diagnostic rendering of a materialized configuration.
//!
//! The output is a JS-flavored object literal with provenance comments for
//! plugins and rules (`/* config.plugin('html') */`). It exists purely for
//! humans debugging a generated configuration; materialization never depends
//! on it.

use serde_json::{Map, Value};

use crate::config::Config;
use crate::module::{Module, Rule, Use};
use crate::plugin::Plugin;

/// Options for [`Config::to_string_with`].
#[derive(Debug, Clone)]
pub struct StringifyOptions {
    /// Render long function expressions in full instead of eliding them.
    pub verbose: bool,
    /// Variable name the provenance comments are written against.
    pub config_prefix: String,
}

impl Default for StringifyOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            config_prefix: "config".to_owned(),
        }
    }
}

/// Wrap a raw source expression (typically a function) so it renders as-is
/// instead of as a quoted string. The marker survives materialization as a
/// one-key object.
pub fn expression(source: impl Into<String>) -> Value {
    let mut map = Map::new();
    map.insert("__expression".to_owned(), Value::String(source.into()));
    Value::Object(map)
}

const ELISION_THRESHOLD: usize = 100;

pub(crate) fn stringify_config(config: &Config, options: &StringifyOptions) -> String {
    let mut fields: Vec<(String, String)> = Vec::new();

    if let Some(Value::Object(own)) = config.own_config() {
        for (key, value) in &own {
            fields.push((key.clone(), render_value(value, 1, options)));
        }
    }

    let plain = [
        ("node", config.node.to_config()),
        ("output", config.output.to_config()),
        ("resolve", config.resolve.to_config()),
        ("resolveLoader", config.resolve_loader.to_config()),
        ("devServer", config.dev_server.to_config()),
    ];
    for (key, value) in plain {
        if let Some(value) = value {
            fields.push((key.to_owned(), render_value(&value, 1, options)));
        }
    }

    if let Some(rendered) = render_module(&config.module, options, 1) {
        fields.push(("module".to_owned(), rendered));
    }
    if let Some(rendered) = render_optimization(config, options, 1) {
        fields.push(("optimization".to_owned(), rendered));
    }

    let plugins = config.plugins.values();
    if !plugins.is_empty() {
        let items: Vec<String> = plugins
            .iter()
            .map(|plugin| render_plugin(plugin, options, 2))
            .collect();
        fields.push(("plugins".to_owned(), render_array_of(items, 1)));
    }

    if let Some(performance) = config.performance.to_config() {
        fields.push(("performance".to_owned(), render_value(&performance, 1, options)));
    }

    if let Some(entries) = config.entry_points.entries() {
        let mut items: Vec<(String, String)> = Vec::new();
        for (name, files) in entries {
            if let Some(files) = files.to_config() {
                items.push((name.to_owned(), render_value(&files, 2, options)));
            }
        }
        if !items.is_empty() {
            fields.push(("entry".to_owned(), render_object_of(items, 1)));
        }
    }

    render_object_of(fields, 0)
}

fn render_module(module: &Module, options: &StringifyOptions, indent: usize) -> Option<String> {
    let mut fields: Vec<(String, String)> = Vec::new();

    if let Some(Value::Object(own)) = module.options_config() {
        for (key, value) in &own {
            fields.push((key.clone(), render_value(value, indent + 1, options)));
        }
    }

    let rules = module.rules.values();
    if !rules.is_empty() {
        let items: Vec<String> = rules
            .iter()
            .map(|rule| render_rule(rule, options, indent + 2))
            .collect();
        fields.push(("rules".to_owned(), render_array_of(items, indent + 1)));
    }

    if fields.is_empty() {
        None
    } else {
        Some(render_object_of(fields, indent))
    }
}

fn render_optimization(
    config: &Config,
    options: &StringifyOptions,
    indent: usize,
) -> Option<String> {
    let mut fields: Vec<(String, String)> = Vec::new();

    if let Some(Value::Object(own)) = config.optimization.options_config() {
        for (key, value) in &own {
            fields.push((key.clone(), render_value(value, indent + 1, options)));
        }
    }

    let minimizers = config.optimization.minimizers.values();
    if !minimizers.is_empty() {
        let items: Vec<String> = minimizers
            .iter()
            .map(|plugin| render_plugin(plugin, options, indent + 2))
            .collect();
        fields.push(("minimizer".to_owned(), render_array_of(items, indent + 1)));
    }

    if fields.is_empty() {
        None
    } else {
        Some(render_object_of(fields, indent))
    }
}

fn render_plugin(plugin: &Plugin, options: &StringifyOptions, indent: usize) -> String {
    let path = plugin.kind().call_path(&options.config_prefix, plugin.name());
    let pad = "  ".repeat(indent);
    let mut out = format!("/* {path} */\n{pad}");

    match plugin.ctor() {
        Some(ctor) => {
            let args: Vec<String> = plugin
                .args()
                .iter()
                .map(|arg| render_value(arg, indent, options))
                .collect();
            out.push_str(&format!("new {}({})", ctor.expression(), args.join(", ")));
        }
        None => {
            let body = if plugin.args().is_empty() {
                Value::Object(Map::new())
            } else {
                let mut map = Map::new();
                map.insert("args".to_owned(), Value::Array(plugin.args().to_vec()));
                Value::Object(map)
            };
            out.push_str(&render_value(&body, indent, options));
        }
    }

    out
}

fn render_rule(rule: &Rule, options: &StringifyOptions, indent: usize) -> String {
    let steps: String = rule
        .lineage()
        .iter()
        .map(|step| format!(".{}('{}')", step.kind, step.name))
        .collect();
    let pad = "  ".repeat(indent);
    let mut out = format!("/* {}.module{steps} */\n{pad}", options.config_prefix);

    let mut fields: Vec<(String, String)> = Vec::new();
    if let Some(Value::Object(base)) = rule.base_config() {
        for (key, value) in &base {
            fields.push((key.clone(), render_value(value, indent + 1, options)));
        }
    }

    let uses = rule.uses.values();
    if !uses.is_empty() {
        let items: Vec<String> = uses
            .iter()
            .map(|entry| render_use(entry, options, indent + 2))
            .collect();
        fields.push(("use".to_owned(), render_array_of(items, indent + 1)));
    }

    let branches = rule.one_ofs.values();
    if !branches.is_empty() {
        let items: Vec<String> = branches
            .iter()
            .map(|branch| render_rule(branch, options, indent + 2))
            .collect();
        fields.push(("oneOf".to_owned(), render_array_of(items, indent + 1)));
    }

    let nested = rule.rules.values();
    if !nested.is_empty() {
        let items: Vec<String> = nested
            .iter()
            .map(|child| render_rule(child, options, indent + 2))
            .collect();
        fields.push(("rules".to_owned(), render_array_of(items, indent + 1)));
    }

    out.push_str(&render_object_of(fields, indent));
    out
}

fn render_use(entry: &Use, options: &StringifyOptions, indent: usize) -> String {
    let steps: String = entry
        .lineage()
        .iter()
        .map(|step| format!(".{}('{}')", step.kind, step.name))
        .collect();
    let pad = "  ".repeat(indent);
    format!(
        "/* {}.module{steps}.use('{}') */\n{pad}{}",
        options.config_prefix,
        entry.name(),
        render_value(&entry.to_config(), indent, options)
    )
}

fn render_value(value: &Value, indent: usize, options: &StringifyOptions) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(items) => {
            let rendered: Vec<String> = items
                .iter()
                .map(|item| render_value(item, indent + 1, options))
                .collect();
            render_array_of(rendered, indent)
        }
        Value::Object(map) => {
            if let Some(source) = expression_source(map) {
                return render_expression(source, options);
            }
            let fields: Vec<(String, String)> = map
                .iter()
                .map(|(key, value)| (key.clone(), render_value(value, indent + 1, options)))
                .collect();
            render_object_of(fields, indent)
        }
    }
}

fn expression_source(map: &Map<String, Value>) -> Option<&str> {
    if map.len() != 1 {
        return None;
    }
    map.get("__expression").and_then(Value::as_str)
}

fn render_expression(source: &str, options: &StringifyOptions) -> String {
    let looks_like_function = source.trim_start().starts_with("function") || source.contains("=>");
    if !options.verbose && looks_like_function && source.len() > ELISION_THRESHOLD {
        "function () { /* omitted long function */ }".to_owned()
    } else {
        source.to_owned()
    }
}

fn render_array_of(items: Vec<String>, indent: usize) -> String {
    if items.is_empty() {
        return "[]".to_owned();
    }
    let pad = "  ".repeat(indent);
    let inner_pad = "  ".repeat(indent + 1);
    let body: Vec<String> = items
        .into_iter()
        .map(|item| format!("{inner_pad}{item}"))
        .collect();
    format!("[\n{}\n{pad}]", body.join(",\n"))
}

fn render_object_of(fields: Vec<(String, String)>, indent: usize) -> String {
    if fields.is_empty() {
        return "{}".to_owned();
    }
    let pad = "  ".repeat(indent);
    let inner_pad = "  ".repeat(indent + 1);
    let body: Vec<String> = fields
        .into_iter()
        .map(|(key, value)| format!("{inner_pad}{}: {value}", render_key(&key)))
        .collect();
    format!("{{\n{}\n{pad}}}", body.join(",\n"))
}

fn render_key(key: &str) -> String {
    let mut chars = key.chars();
    let identifier = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    };
    if identifier {
        key.to_owned()
    } else {
        quote(key)
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}
