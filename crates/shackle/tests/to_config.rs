//! End-to-end materialization of a realistic development configuration.

use serde_json::json;
use shackle::{Chainable, Config};

fn dev_config() -> Config {
    let mut config = Config::new();

    config
        .mode("development")
        .devtool("eval-cheap-module-source-map")
        .context("/project");

    config.entry("app").add("./src/polyfill").add("./src/index");

    config
        .output
        .path("/project/dist")
        .filename("[name].js")
        .public_path("/");

    config.resolve.alias.set("@", json!("./src"));
    config.resolve.extensions.add(".ts").add(".js");

    config
        .dev_server
        .host("0.0.0.0")
        .port(8080)
        .hot(true);
    config.dev_server.allowed_hosts.add("localhost");

    config
        .module
        .rule("ts")
        .test("\\.tsx?$")
        .use_("babel")
        .loader("babel-loader")
        .options(json!({"cacheDirectory": true}));

    config
        .plugin("define")
        .use_("DefinePlugin", [json!({"process.env.NODE_ENV": "'development'"})]);
    config
        .plugin("html")
        .use_("HtmlWebpackPlugin", [json!({"template": "public/index.html"})]);
    config.plugin("progress").use_("ProgressPlugin", []).before("define");

    config.optimization.minimize(false);
    config.performance.hints(false);

    config
}

#[test]
fn full_tree_materializes_in_one_pass() {
    let config = dev_config();
    let materialized = config.to_config();

    assert_eq!(
        materialized,
        json!({
            "mode": "development",
            "devtool": "eval-cheap-module-source-map",
            "context": "/project",
            "output": {
                "path": "/project/dist",
                "filename": "[name].js",
                "publicPath": "/"
            },
            "resolve": {
                "alias": {"@": "./src"},
                "extensions": [".ts", ".js"]
            },
            "devServer": {
                "host": "0.0.0.0",
                "port": 8080,
                "hot": true,
                "allowedHosts": ["localhost"]
            },
            "module": {
                "rules": [{
                    "test": "\\.tsx?$",
                    "use": [{
                        "loader": "babel-loader",
                        "options": {"cacheDirectory": true}
                    }]
                }]
            },
            "optimization": {"minimize": false},
            "plugins": [
                {"plugin": "ProgressPlugin"},
                {
                    "plugin": "DefinePlugin",
                    "args": [{"process.env.NODE_ENV": "'development'"}]
                },
                {
                    "plugin": "HtmlWebpackPlugin",
                    "args": [{"template": "public/index.html"}]
                }
            ],
            "performance": {"hints": false},
            "entry": {
                "app": ["./src/polyfill", "./src/index"]
            }
        })
    );
}

#[test]
fn to_config_is_a_pure_read() {
    let config = dev_config();
    assert_eq!(config.to_config(), config.to_config());
}

#[test]
fn empty_slots_are_pruned() {
    let mut config = Config::new();
    config.mode("production");
    config.entry("app"); // referenced but never filled
    config.plugin("noop"); // no ctor, no args

    let materialized = config.to_config();
    assert_eq!(materialized.get("entry"), None);
    // A plugin node with nothing configured still occupies its slot.
    assert_eq!(materialized["plugins"], json!([{}]));
    assert_eq!(materialized.get("module"), None);
    assert_eq!(materialized.get("resolve"), None);
}

#[test]
fn conditional_mutation_via_when() {
    let production = true;
    let mut config = Config::new();
    config.when_else(
        production,
        |c| {
            c.mode("production");
        },
        |c| {
            c.devtool("eval");
        },
    );

    assert_eq!(config.to_config(), json!({"mode": "production"}));
}

#[test]
fn batch_groups_mutations_inline() {
    let mut config = Config::new();
    config.batch(|c| {
        c.mode("production");
        c.entry("app").add("./src/index");
    });

    let materialized = config.to_config();
    assert_eq!(materialized["mode"], json!("production"));
    assert_eq!(materialized["entry"]["app"], json!(["./src/index"]));
}
