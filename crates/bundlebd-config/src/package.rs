//! The slice of `package.json` the build targets need.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub dependencies: IndexMap<String, String>,
}

impl PackageManifest {
    /// Read `package.json` from `cwd`. A missing manifest has no dependencies.
    pub fn load(cwd: &Path) -> Result<Self> {
        let path = cwd.join("package.json");
        if !path.is_file() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|e| ConfigError::parse(&path, e))
    }

    /// Runtime dependency names in manifest order.
    pub fn dependency_names(&self) -> Vec<String> {
        self.dependencies.keys().cloned().collect()
    }
}
