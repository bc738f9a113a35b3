//! Materializer configuration and file loading
//!
//! Secret and config map names default to the ones the provisioning agent's
//! cluster layout uses. Files are read as JSON when the extension says so,
//! YAML otherwise.

use crate::error::{Error, Result};
use crate::model::DeploymentDescriptor;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the materializer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MaterializerConfig {
    /// Secret and config map naming
    pub naming: SecretNaming,
    /// Path of the ceph config override inside the container
    pub config_override_path: String,
}

impl Default for MaterializerConfig {
    fn default() -> Self {
        Self {
            naming: SecretNaming::default(),
            config_override_path: "/etc/rook/config/override.conf".to_string(),
        }
    }
}

/// Names of the secrets and config maps entries point at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecretNaming {
    /// Secret holding monitor and admin credentials
    pub mon_secret_name: String,
    pub mon_secret_key: String,
    pub ceph_username_key: String,
    pub ceph_secret_key: String,
    pub fsid_key: String,
    /// Config map publishing monitor endpoints
    pub mon_endpoints_config_map: String,
    pub mon_endpoints_key: String,
    /// Secret holding the rendered ceph config
    pub config_secret_name: String,
    pub mon_host_key: String,
    /// Per-claim encryption secrets are named `<prefix>-<claim>`
    pub encryption_secret_prefix: String,
    pub encryption_key_name: String,
}

impl Default for SecretNaming {
    fn default() -> Self {
        Self {
            mon_secret_name: "rook-ceph-mon".to_string(),
            mon_secret_key: "mon-secret".to_string(),
            ceph_username_key: "ceph-username".to_string(),
            ceph_secret_key: "ceph-secret".to_string(),
            fsid_key: "fsid".to_string(),
            mon_endpoints_config_map: "rook-ceph-mon-endpoints".to_string(),
            mon_endpoints_key: "data".to_string(),
            config_secret_name: "rook-ceph-config".to_string(),
            mon_host_key: "mon_host".to_string(),
            encryption_secret_prefix: "rook-ceph-osd-encryption-key".to_string(),
            encryption_key_name: "dmcrypt-key".to_string(),
        }
    }
}

impl SecretNaming {
    /// Name of the encryption key secret for a claim
    pub fn encryption_secret_name(&self, claim_name: &str) -> String {
        format!("{}-{}", self.encryption_secret_prefix, claim_name)
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Load a materializer configuration file
pub fn load_config(path: impl AsRef<Path>) -> Result<MaterializerConfig> {
    load_file(path.as_ref())
}

/// Load a deployment descriptor file
pub fn load_descriptor(path: impl AsRef<Path>) -> Result<DeploymentDescriptor> {
    load_file(path.as_ref())
}

fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)?;
    if raw.trim().is_empty() {
        return Err(Error::Configuration(format!(
            "{} is empty",
            path.display()
        )));
    }

    debug!("Loading {}", path.display());

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        Ok(serde_json::from_str(&raw)?)
    } else {
        Ok(serde_yaml::from_str(&raw)?)
    }
}
