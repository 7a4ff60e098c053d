use crate::error::{Result, ToolupError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Catalog of installable tools, produced externally and consumed read-only.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Catalog {
    /// GitHub organization every tool repository lives under.
    pub organization: String,
    pub tools: Vec<Tool>,
}

/// One installable tool as described by the catalog.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Tool {
    pub name: String,
    /// Release tag, usually with a leading `v`.
    pub version: String,
    pub repo: String,
    /// Release asset filename to string-encoded numeric asset ID. A sorted
    /// map keeps asset selection stable across runs.
    #[serde(default)]
    pub assets: BTreeMap<String, String>,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
    /// Module path suffix for the `go install` fallback, when the tool
    /// supports building from source.
    #[serde(default)]
    pub go_install_path: Option<String>,
}

/// Runtime dependencies a tool declares for one operating system.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Requirement {
    pub os: String,
    pub specification: Vec<RequirementSpec>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RequirementSpec {
    pub name: String,
    /// Human remediation text; `$CMD` is replaced with `command`.
    pub instruction: String,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub required: bool,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ToolupError::config_error(format!("cannot read catalog {}: {e}", path.display()))
        })?;
        let catalog: Catalog = serde_json::from_str(&content)?;
        Ok(catalog)
    }

    pub fn find(&self, name: &str) -> Result<&Tool> {
        self.tools
            .iter()
            .find(|tool| tool.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ToolupError::ToolNotFound {
                name: name.to_string(),
            })
    }
}
