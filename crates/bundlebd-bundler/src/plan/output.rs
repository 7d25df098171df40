//! Output location, library convention and optimizer policy.

use std::path::PathBuf;

use serde::Serialize;

/// Global the bundle is assigned to under the assign convention.
pub const ASSIGN_GLOBAL: &str = "Plugin";

/// How the bundle exposes its main export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LibraryConvention {
    /// Assign the module to a named global.
    Assign { name: String },
    /// `module.exports` set to one named export.
    #[serde(rename = "commonjs2")]
    CommonJs2 { export: String },
}

impl LibraryConvention {
    pub fn for_zlibrary(zlibrary: bool) -> Self {
        if zlibrary {
            Self::Assign {
                name: ASSIGN_GLOBAL.to_string(),
            }
        } else {
            Self::CommonJs2 {
                export: "default".to_string(),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputSpec {
    pub path: PathBuf,
    pub filename: String,
    pub library: LibraryConvention,
}

impl OutputSpec {
    pub fn file(&self) -> PathBuf {
        self.path.join(&self.filename)
    }
}

/// Minifier settings. The bundle stays readable: nothing is compressed by
/// default and names are kept, only comments go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizerPolicy {
    pub compress_defaults: bool,
    pub comments: bool,
    pub mangle: bool,
}

impl Default for OptimizerPolicy {
    fn default() -> Self {
        Self {
            compress_defaults: false,
            comments: false,
            mangle: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convention_follows_zlibrary() {
        assert_eq!(
            LibraryConvention::for_zlibrary(true),
            LibraryConvention::Assign {
                name: "Plugin".to_string()
            }
        );
        let json = serde_json::to_value(LibraryConvention::for_zlibrary(false)).unwrap();
        assert_eq!(json["type"], "commonjs2");
        assert_eq!(json["export"], "default");
    }
}
