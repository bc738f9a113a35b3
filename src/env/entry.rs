//! Environment entries
//!
//! An entry pairs a registered name with exactly one value source. Entries
//! are plain values that do not outlive the call that built them.

use super::vocabulary::EnvName;
use crate::domain::ports::{ConfigMapKeyRef, SecretKeyRef};
use k8s_openapi::api::core::v1::{
    ConfigMapKeySelector, EnvVar, EnvVarSource, ObjectFieldSelector, SecretKeySelector,
};
use serde::Serialize;

// =============================================================================
// Value Source
// =============================================================================

/// Where an entry's value comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EnvValue {
    /// Inline string
    Literal(String),
    /// Key of a secret, dereferenced at container start
    SecretKeyRef(SecretKeyRef),
    /// Key of a config map, dereferenced at container start
    ConfigMapKeyRef(ConfigMapKeyRef),
    /// Downward API field of the pod
    FieldRef(String),
}

// =============================================================================
// Environment Entry
// =============================================================================

/// One name/value pair destined for a container environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentEntry {
    pub name: EnvName,
    pub value: EnvValue,
}

impl EnvironmentEntry {
    /// Entry with an inline value
    pub fn literal(name: EnvName, value: impl Into<String>) -> Self {
        Self {
            name,
            value: EnvValue::Literal(value.into()),
        }
    }

    /// Entry read from a secret key
    pub fn secret(name: EnvName, secret: SecretKeyRef) -> Self {
        Self {
            name,
            value: EnvValue::SecretKeyRef(secret),
        }
    }

    /// Entry read from a config map key
    pub fn config_map(name: EnvName, map: ConfigMapKeyRef) -> Self {
        Self {
            name,
            value: EnvValue::ConfigMapKeyRef(map),
        }
    }

    /// Entry read from a pod field
    pub fn field(name: EnvName, field_path: impl Into<String>) -> Self {
        Self {
            name,
            value: EnvValue::FieldRef(field_path.into()),
        }
    }

    /// Inline value, if this entry has one
    pub fn literal_value(&self) -> Option<&str> {
        match &self.value {
            EnvValue::Literal(v) => Some(v),
            _ => None,
        }
    }
}

impl From<EnvironmentEntry> for EnvVar {
    fn from(entry: EnvironmentEntry) -> Self {
        let name = entry.name.as_str().to_string();
        match entry.value {
            EnvValue::Literal(value) => EnvVar {
                name,
                value: Some(value),
                ..Default::default()
            },
            EnvValue::SecretKeyRef(secret) => EnvVar {
                name,
                value_from: Some(EnvVarSource {
                    secret_key_ref: Some(SecretKeySelector {
                        name: Some(secret.store),
                        key: secret.key,
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            },
            EnvValue::ConfigMapKeyRef(map) => EnvVar {
                name,
                value_from: Some(EnvVarSource {
                    config_map_key_ref: Some(ConfigMapKeySelector {
                        name: Some(map.map),
                        key: map.key,
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            },
            EnvValue::FieldRef(field_path) => EnvVar {
                name,
                value_from: Some(EnvVarSource {
                    field_ref: Some(ObjectFieldSelector {
                        field_path,
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            },
        }
    }
}

/// Convert a materialized sequence into container env vars, order preserved
pub fn to_env_vars(entries: Vec<EnvironmentEntry>) -> Vec<EnvVar> {
    entries.into_iter().map(EnvVar::from).collect()
}

/// First entry with the given name
pub fn find(entries: &[EnvironmentEntry], name: EnvName) -> Option<&EnvironmentEntry> {
    entries.iter().find(|e| e.name == name)
}
