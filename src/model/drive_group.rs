//! Drive groups
//!
//! A drive group names a device-selection spec that the provisioning agent
//! evaluates itself. The spec is kept as free-form JSON.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A named device-selection group
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DriveGroup {
    /// Unique group name
    pub name: String,

    /// Selection spec passed through to the agent
    #[serde(default)]
    pub spec: BTreeMap<String, Value>,

    /// Scheduling placement; consumed by the caller, never serialized into
    /// the blob
    #[serde(default)]
    pub placement: Option<Value>,
}

impl DriveGroup {
    /// Create a drive group with an empty spec
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set one spec field
    pub fn with_spec(mut self, key: impl Into<String>, value: Value) -> Self {
        self.spec.insert(key.into(), value);
        self
    }
}
