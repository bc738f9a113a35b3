//! Domain Ports - Collaborator traits used by the materializer
//!
//! The materializer calls into two collaborators it does not own: a blob
//! serializer for drive groups and a resolver that maps logical secret
//! names onto concrete store/key addresses.

use crate::error::Result;
use crate::model::DriveGroup;
use serde::{Deserialize, Serialize};

// =============================================================================
// Indirect Value Addresses
// =============================================================================

/// Address of one key in a secret store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SecretKeyRef {
    /// Secret name
    pub store: String,
    /// Key within the secret
    pub key: String,
}

impl SecretKeyRef {
    pub fn new(store: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            store: store.into(),
            key: key.into(),
        }
    }
}

/// Address of one key in a config map
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigMapKeyRef {
    /// Config map name
    pub map: String,
    /// Key within the config map
    pub key: String,
}

impl ConfigMapKeyRef {
    pub fn new(map: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            map: map.into(),
            key: key.into(),
        }
    }
}

// =============================================================================
// Logical Names
// =============================================================================

/// Secrets the OSD environment refers to by role
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogicalSecret {
    /// Monitor keyring secret
    MonSecret,
    /// Admin client username
    CephUsername,
    /// Admin client key
    CephSecret,
    /// Cluster fsid
    Fsid,
    /// Monitor host list for activation
    MonHost,
    /// Per-claim dm-crypt key
    OsdEncryptionKey { claim_name: String },
}

impl std::fmt::Display for LogicalSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogicalSecret::MonSecret => write!(f, "mon-secret"),
            LogicalSecret::CephUsername => write!(f, "ceph-username"),
            LogicalSecret::CephSecret => write!(f, "ceph-secret"),
            LogicalSecret::Fsid => write!(f, "fsid"),
            LogicalSecret::MonHost => write!(f, "mon-host"),
            LogicalSecret::OsdEncryptionKey { claim_name } => {
                write!(f, "osd-encryption-key/{}", claim_name)
            }
        }
    }
}

/// Config maps the OSD environment refers to by role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalConfigMap {
    /// Current monitor endpoints
    MonEndpoints,
}

// =============================================================================
// Ports
// =============================================================================

/// Encodes drive groups into the string form carried by an environment entry
pub trait DriveGroupSerializer: Send + Sync {
    /// Serialize a non-empty list of drive groups
    fn serialize(&self, groups: &[DriveGroup]) -> Result<String>;
}

/// Resolves logical names into addresses the container runtime dereferences
pub trait SecretReferenceResolver: Send + Sync {
    /// Address of a secret value
    fn secret(&self, secret: &LogicalSecret) -> SecretKeyRef;

    /// Address of a config map value
    fn config_map(&self, map: LogicalConfigMap) -> ConfigMapKeyRef;
}
