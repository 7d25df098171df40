//! End-to-end configuration loading against on-disk fixtures.

use bundlebd_config::{
    BUNDLE_CONFIG_FILE, ConfigError, ConfigWarning, PLUGIN_CONFIG_FILE, PluginConfig,
    ResolvedConfig, RunParams,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn bogus_meta_key_is_dropped_with_one_warning() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "src/config.json",
        r#"{ "meta": { "name": "Foo", "bogus": 1 } }"#,
    );

    let resolved = ResolvedConfig::load(dir.path(), RunParams::new("Foo")).unwrap();

    assert_eq!(
        resolved.warnings,
        vec![ConfigWarning::UnknownMetaKey("bogus".to_string())]
    );
    let meta = serde_json::to_value(&resolved.plugin.meta).unwrap();
    assert!(meta.get("bogus").is_none());
    assert_eq!(resolved.plugin.meta.name, "Foo");
}

#[test]
fn missing_entry_dir_fails_before_anything_else() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), BUNDLE_CONFIG_FILE, r#"{ "entry": "plugins/[plugin]" }"#);

    let err = ResolvedConfig::load(dir.path(), RunParams::new("Foo")).unwrap_err();
    match err {
        ConfigError::EntryDirNotFound(path) => {
            assert!(path.ends_with("plugins/Foo"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn absent_plugin_config_yields_default_meta() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("src")).unwrap();

    let resolved = ResolvedConfig::load(dir.path(), RunParams::new("Foo")).unwrap();
    assert_eq!(resolved.plugin, PluginConfig::defaults_for("Foo"));
    assert!(resolved.warnings.is_empty());
    assert_eq!(resolved.entry_point(), dir.path().join("src"));
}

#[test]
fn templated_entry_and_output_are_resolved() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        BUNDLE_CONFIG_FILE,
        r#"{ "entry": "plugins/[plugin]", "output": "build/[plugin]" }"#,
    );
    write(
        dir.path(),
        "plugins/Foo/config.json",
        r#"{ "entry": "index.tsx", "zlibrary": true }"#,
    );

    let resolved = ResolvedConfig::load(dir.path(), RunParams::new("Foo")).unwrap();
    assert_eq!(resolved.entry_point(), dir.path().join("plugins/Foo/index.tsx"));
    assert_eq!(resolved.output_dir(), dir.path().join("build/Foo"));
    assert_eq!(resolved.output_filename(), "Foo.plugin.js");
    assert!(resolved.plugin.zlibrary);
}

#[test]
fn malformed_plugin_config_names_the_file() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/config.json", "{ \"meta\": ");

    let err = PluginConfig::load(&dir.path().join("src"), "Foo").unwrap_err();
    match err {
        ConfigError::Parse { path, .. } => assert!(path.ends_with(PLUGIN_CONFIG_FILE)),
        other => panic!("unexpected error: {other}"),
    }
}
