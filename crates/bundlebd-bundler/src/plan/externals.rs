//! Host-provided modules and injected bindings.

use indexmap::IndexMap;

/// Modules the host application exposes as globals, always external.
const HOST_GLOBALS: &[(&str, &str)] = &[
    ("react", "var BdApi.React"),
    ("react-dom", "var BdApi.ReactDOM"),
];

/// ZLibrary globals, external only for plugins built against it.
const ZLIBRARY_GLOBALS: &[(&str, &str)] = &[
    ("@zlibrary", "var Library"),
    ("@zlibrary/plugin", "var BasePlugin"),
];

/// Module name to the host expression that replaces it.
pub fn externals(zlibrary: bool) -> IndexMap<String, String> {
    let zlibrary_globals: &[(&str, &str)] = if zlibrary { ZLIBRARY_GLOBALS } else { &[] };
    HOST_GLOBALS
        .iter()
        .chain(zlibrary_globals)
        .map(|(module, global)| (module.to_string(), global.to_string()))
        .collect()
}

/// JavaScript expression of a host external: `var BdApi.React` is `BdApi.React`.
pub fn host_expression(external: &str) -> &str {
    external.strip_prefix("var ").unwrap_or(external).trim()
}

/// Free identifiers resolved to a module import wherever they are used.
pub fn provided_bindings() -> IndexMap<String, String> {
    IndexMap::from([("React".to_string(), "react".to_string())])
}
