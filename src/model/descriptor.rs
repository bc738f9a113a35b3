//! Deployment descriptor
//!
//! Describes how one OSD instance should be deployed: who owns it, where it
//! lands, what backs it and how its object store is tuned.

use super::drive_group::DriveGroup;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// =============================================================================
// Deployment Descriptor
// =============================================================================

/// Immutable input of one materialization call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentDescriptor {
    /// Owning cluster
    pub cluster: ClusterIdentity,

    /// Node placement of the daemon
    pub placement: Placement,

    /// What backs the OSD data
    #[serde(default)]
    pub volume_backing: VolumeBacking,

    /// Object store tuning
    #[serde(default)]
    pub store_tuning: StoreTuning,

    /// Encrypt the OSD device
    #[serde(default)]
    pub encryption: bool,

    /// Device-selection groups, in declaration order
    #[serde(default)]
    pub drive_groups: Vec<DriveGroup>,

    /// Explicit device selection. The families are alternatives; picking one
    /// is the caller's job and nothing here enforces it.
    #[serde(default)]
    pub device_selectors: DeviceSelectors,

    /// Verbose logging in the provisioning agent
    #[serde(default)]
    pub debug: bool,

    /// CRUSH device class override
    #[serde(default)]
    pub crush_device_class: Option<String>,

    /// Daemon configuration directory
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

// =============================================================================
// Sub-Types
// =============================================================================

/// Cluster correlation data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterIdentity {
    /// UID of the owning cluster resource
    pub owner_uid: String,

    /// Namespace the cluster runs in
    pub namespace: String,
}

/// Placement of the daemon
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    /// Target Kubernetes node
    #[serde(default)]
    pub node_name: String,

    /// Whether the daemon may migrate across nodes
    #[serde(default)]
    pub portable: bool,

    /// Host label used in the CRUSH map
    #[serde(default)]
    pub crush_hostname: String,
}

/// Backing storage of the OSD
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum VolumeBacking {
    /// Raw devices local to the node
    #[default]
    NodeDevices,
    /// A persistent volume claim
    #[serde(rename_all = "camelCase")]
    PersistentVolumeClaim { claim_name: String },
}

impl VolumeBacking {
    /// Whether the OSD sits on a persistent volume claim
    pub fn on_pvc(&self) -> bool {
        matches!(self, VolumeBacking::PersistentVolumeClaim { .. })
    }

    /// Name of the backing claim, if any
    pub fn claim_name(&self) -> Option<&str> {
        match self {
            VolumeBacking::PersistentVolumeClaim { claim_name } => Some(claim_name),
            VolumeBacking::NodeDevices => None,
        }
    }
}

/// Object store tuning. Zero means "backend default" and is never emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreTuning {
    /// RocksDB size in MiB
    #[serde(default, rename = "databaseSizeMB")]
    pub database_size_mb: u64,

    /// WAL size in MiB
    #[serde(default, rename = "walSizeMB")]
    pub wal_size_mb: u64,

    /// Journal size in MiB
    #[serde(default, rename = "journalSizeMB")]
    pub journal_size_mb: u64,

    /// Number of OSDs carved out of each device
    #[serde(default)]
    pub osds_per_device: u32,
}

/// Explicit device selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSelectors {
    /// Serialized explicit device list
    #[serde(default)]
    pub data_devices: Option<String>,

    /// Device name regex
    #[serde(default)]
    pub device_filter: Option<String>,

    /// Device path regex
    #[serde(default)]
    pub device_path_filter: Option<String>,

    /// Dedicated metadata device
    #[serde(default)]
    pub metadata_device: Option<String>,

    /// Dedicated WAL device
    #[serde(default)]
    pub wal_device: Option<String>,
}

fn default_data_dir() -> String {
    "/var/lib/rook".to_string()
}
