//! Run parameters and `[token]` interpolation for path templates.

use std::collections::BTreeMap;

/// Parameters supplied by the surrounding CLI for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunParams {
    /// Plugin name, substituted for `[plugin]` in templates and used as the
    /// default `meta.name`.
    pub plugin: String,
    /// Development mode: the toolchain keeps watching and rebuilding.
    pub development: bool,
}

impl RunParams {
    pub fn new(plugin: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            development: false,
        }
    }

    pub fn with_development(mut self, development: bool) -> Self {
        self.development = development;
        self
    }

    /// Token map used for template interpolation.
    pub fn tokens(&self) -> BTreeMap<&'static str, &str> {
        BTreeMap::from([("plugin", self.plugin.as_str())])
    }

    /// Interpolate a template with this invocation's tokens.
    pub fn interpolate(&self, template: &str) -> String {
        interpolate(template, &self.tokens())
    }
}

/// Replace every `[name]` in `template` whose name is a key of `tokens`.
///
/// Brackets naming an unknown token are left untouched, so
/// `"[plugin]-[hash].js"` with only `plugin` known keeps `[hash]` verbatim.
///
/// ```
/// use std::collections::BTreeMap;
/// use bundlebd_config::interpolate;
///
/// let tokens = BTreeMap::from([("plugin", "Foo")]);
/// assert_eq!(interpolate("[plugin].plugin.js", &tokens), "Foo.plugin.js");
/// ```
pub fn interpolate(template: &str, tokens: &BTreeMap<&str, &str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('[') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find(']') {
            Some(close) => {
                let name = &after[..close];
                match tokens.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('[');
                        out.push_str(name);
                        out.push(']');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}
