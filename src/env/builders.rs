//! Single-purpose entry builders
//!
//! Each builder maps primitive values onto exactly one entry (or one fixed
//! bundle) and cannot fail. Callers composing mode-specific environments
//! use these directly; the materializer uses them for the base sequence.

use super::entry::EnvironmentEntry;
use super::vocabulary::EnvName;
use crate::domain::ports::{LogicalConfigMap, LogicalSecret, SecretReferenceResolver};

/// Downward API path of the pod IP
pub const POD_IP_FIELD: &str = "status.podIP";
/// Downward API path of the scheduled node
pub const NODE_NAME_FIELD: &str = "spec.nodeName";

// =============================================================================
// ceph-volume Mode
// =============================================================================

/// How ceph-volume lays out the OSD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CephVolumeMode {
    Raw,
    Lvm,
}

impl CephVolumeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CephVolumeMode::Raw => "raw",
            CephVolumeMode::Lvm => "lvm",
        }
    }
}

impl std::fmt::Display for CephVolumeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Identity & Placement
// =============================================================================

pub fn node_name(name: &str) -> EnvironmentEntry {
    EnvironmentEntry::literal(EnvName::NodeName, name)
}

pub fn cluster_id(owner_uid: &str) -> EnvironmentEntry {
    EnvironmentEntry::literal(EnvName::ClusterId, owner_uid)
}

pub fn private_ip() -> EnvironmentEntry {
    EnvironmentEntry::field(EnvName::PrivateIp, POD_IP_FIELD)
}

pub fn public_ip() -> EnvironmentEntry {
    EnvironmentEntry::field(EnvName::PublicIp, POD_IP_FIELD)
}

pub fn pod_namespace(namespace: &str) -> EnvironmentEntry {
    EnvironmentEntry::literal(EnvName::PodNamespace, namespace)
}

pub fn mon_endpoints(resolver: &dyn SecretReferenceResolver) -> EnvironmentEntry {
    EnvironmentEntry::config_map(
        EnvName::MonEndpoints,
        resolver.config_map(LogicalConfigMap::MonEndpoints),
    )
}

pub fn mon_secret(resolver: &dyn SecretReferenceResolver) -> EnvironmentEntry {
    EnvironmentEntry::secret(EnvName::MonSecret, resolver.secret(&LogicalSecret::MonSecret))
}

pub fn ceph_username(resolver: &dyn SecretReferenceResolver) -> EnvironmentEntry {
    EnvironmentEntry::secret(
        EnvName::CephUsername,
        resolver.secret(&LogicalSecret::CephUsername),
    )
}

pub fn ceph_secret(resolver: &dyn SecretReferenceResolver) -> EnvironmentEntry {
    EnvironmentEntry::secret(EnvName::CephSecret, resolver.secret(&LogicalSecret::CephSecret))
}

pub fn config_dir(dir: &str) -> EnvironmentEntry {
    EnvironmentEntry::literal(EnvName::ConfigDir, dir)
}

pub fn config_override(path: &str) -> EnvironmentEntry {
    EnvironmentEntry::literal(EnvName::ConfigOverride, path)
}

pub fn fsid(resolver: &dyn SecretReferenceResolver) -> EnvironmentEntry {
    EnvironmentEntry::secret(EnvName::Fsid, resolver.secret(&LogicalSecret::Fsid))
}

pub fn kube_node_name() -> EnvironmentEntry {
    EnvironmentEntry::field(EnvName::KubeNodeName, NODE_NAME_FIELD)
}

/// CRUSH host hint; an empty value asks the agent to work it out itself
pub fn crushmap_hostname(hostname: &str) -> EnvironmentEntry {
    EnvironmentEntry::literal(EnvName::CrushmapHostname, hostname)
}

// =============================================================================
// ceph-volume
// =============================================================================

/// Fixed ceph-volume environment
pub fn ceph_volume_environment() -> Vec<EnvironmentEntry> {
    vec![
        EnvironmentEntry::literal(EnvName::CephVolumeDebug, "1"),
        EnvironmentEntry::literal(EnvName::CephVolumeSkipRestorecon, "1"),
        // LVM manages /dev nodes itself instead of waiting on udev
        EnvironmentEntry::literal(EnvName::DmDisableUdev, "1"),
    ]
}

/// Monitor host secret plus the `CEPH_ARGS` literal that interpolates it.
/// The secret entry comes first so the interpolation can resolve.
pub fn mon_host_environment(resolver: &dyn SecretReferenceResolver) -> [EnvironmentEntry; 2] {
    [
        EnvironmentEntry::secret(EnvName::MonHost, resolver.secret(&LogicalSecret::MonHost)),
        EnvironmentEntry::literal(
            EnvName::CephArgs,
            format!("-m {}", EnvName::MonHost.interpolation()),
        ),
    ]
}

/// Environment of the OSD activation step
pub fn activate_environment(resolver: &dyn SecretReferenceResolver) -> Vec<EnvironmentEntry> {
    let mut entries = ceph_volume_environment();
    entries.extend(mon_host_environment(resolver));
    entries
}

// =============================================================================
// Store Tuning
// =============================================================================

pub fn database_size(size_mb: u64) -> EnvironmentEntry {
    EnvironmentEntry::literal(EnvName::DatabaseSize, size_mb.to_string())
}

pub fn wal_size(size_mb: u64) -> EnvironmentEntry {
    EnvironmentEntry::literal(EnvName::WalSize, size_mb.to_string())
}

pub fn journal_size(size_mb: u64) -> EnvironmentEntry {
    EnvironmentEntry::literal(EnvName::JournalSize, size_mb.to_string())
}

pub fn osds_per_device(count: u32) -> EnvironmentEntry {
    EnvironmentEntry::literal(EnvName::OsdsPerDevice, count.to_string())
}

/// Encrypted-device flag carrying either boolean
pub fn encrypted_device(encrypted: bool) -> EnvironmentEntry {
    EnvironmentEntry::literal(EnvName::EncryptedDevice, encrypted.to_string())
}

/// dm-crypt key of a PVC-backed OSD, read by ceph-volume in raw mode
pub fn encryption_key_secret(
    resolver: &dyn SecretReferenceResolver,
    claim_name: &str,
) -> EnvironmentEntry {
    EnvironmentEntry::secret(
        EnvName::DmcryptSecret,
        resolver.secret(&LogicalSecret::OsdEncryptionKey {
            claim_name: claim_name.to_string(),
        }),
    )
}

// =============================================================================
// Device Selection
// =============================================================================

pub fn drive_groups(blob: &str) -> EnvironmentEntry {
    EnvironmentEntry::literal(EnvName::DriveGroups, blob)
}

pub fn data_devices(devices: &str) -> EnvironmentEntry {
    EnvironmentEntry::literal(EnvName::DataDevices, devices)
}

pub fn device_filter(filter: &str) -> EnvironmentEntry {
    EnvironmentEntry::literal(EnvName::DeviceFilter, filter)
}

pub fn device_path_filter(filter: &str) -> EnvironmentEntry {
    EnvironmentEntry::literal(EnvName::DevicePathFilter, filter)
}

pub fn metadata_device(path: &str) -> EnvironmentEntry {
    EnvironmentEntry::literal(EnvName::MetadataDevice, path)
}

pub fn wal_device(path: &str) -> EnvironmentEntry {
    EnvironmentEntry::literal(EnvName::WalDevice, path)
}

pub fn pvc_backed_osd(pvc_backed: bool) -> EnvironmentEntry {
    EnvironmentEntry::literal(EnvName::PvcBackedOsd, pvc_backed.to_string())
}

pub fn block_path(path: &str) -> EnvironmentEntry {
    EnvironmentEntry::literal(EnvName::BlockPath, path)
}

pub fn cv_mode(mode: CephVolumeMode) -> EnvironmentEntry {
    EnvironmentEntry::literal(EnvName::CvMode, mode.as_str())
}

pub fn lv_backed_pv(lv_backed: bool) -> EnvironmentEntry {
    EnvironmentEntry::literal(EnvName::LvBackedPv, lv_backed.to_string())
}

pub fn crush_device_class(class: &str) -> EnvironmentEntry {
    EnvironmentEntry::literal(EnvName::CrushDeviceClass, class)
}

// =============================================================================
// Agent Runtime
// =============================================================================

/// `DEBUG` when debug is set, `INFO` otherwise
pub fn log_level(debug: bool) -> EnvironmentEntry {
    let level = if debug { "DEBUG" } else { "INFO" };
    EnvironmentEntry::literal(EnvName::LogLevel, level)
}
