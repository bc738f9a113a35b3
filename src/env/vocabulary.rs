//! Environment variable name registry
//!
//! Every name emitted into an OSD container lives here. The provisioning
//! agent reads these strings verbatim; changing one is a contract change.

use serde::{Serialize, Serializer};

/// Symbolic environment variable name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EnvName {
    // Identity & placement
    NodeName,
    ClusterId,
    PrivateIp,
    PublicIp,
    PodNamespace,
    MonEndpoints,
    MonSecret,
    CephUsername,
    CephSecret,
    ConfigDir,
    ConfigOverride,
    Fsid,
    KubeNodeName,
    CrushmapHostname,

    // ceph-volume
    CephVolumeDebug,
    CephVolumeSkipRestorecon,
    DmDisableUdev,

    // Store tuning
    OsdStore,
    DatabaseSize,
    WalSize,
    JournalSize,
    OsdsPerDevice,
    EncryptedDevice,
    /// Read by ceph-volume itself in raw mode
    DmcryptSecret,

    // Device selection
    MetadataDevice,
    WalDevice,
    PvcBackedOsd,
    BlockPath,
    CvMode,
    LvBackedPv,
    CrushDeviceClass,
    DriveGroups,
    DataDevices,
    DeviceFilter,
    DevicePathFilter,

    // Agent runtime
    LogLevel,
    MonHost,
    CephArgs,
}

impl EnvName {
    /// Every registered name
    pub const ALL: [EnvName; 38] = [
        EnvName::NodeName,
        EnvName::ClusterId,
        EnvName::PrivateIp,
        EnvName::PublicIp,
        EnvName::PodNamespace,
        EnvName::MonEndpoints,
        EnvName::MonSecret,
        EnvName::CephUsername,
        EnvName::CephSecret,
        EnvName::ConfigDir,
        EnvName::ConfigOverride,
        EnvName::Fsid,
        EnvName::KubeNodeName,
        EnvName::CrushmapHostname,
        EnvName::CephVolumeDebug,
        EnvName::CephVolumeSkipRestorecon,
        EnvName::DmDisableUdev,
        EnvName::OsdStore,
        EnvName::DatabaseSize,
        EnvName::WalSize,
        EnvName::JournalSize,
        EnvName::OsdsPerDevice,
        EnvName::EncryptedDevice,
        EnvName::DmcryptSecret,
        EnvName::MetadataDevice,
        EnvName::WalDevice,
        EnvName::PvcBackedOsd,
        EnvName::BlockPath,
        EnvName::CvMode,
        EnvName::LvBackedPv,
        EnvName::CrushDeviceClass,
        EnvName::DriveGroups,
        EnvName::DataDevices,
        EnvName::DeviceFilter,
        EnvName::DevicePathFilter,
        EnvName::LogLevel,
        EnvName::MonHost,
        EnvName::CephArgs,
    ];

    /// Wire string read by the provisioning agent
    pub const fn as_str(self) -> &'static str {
        match self {
            EnvName::NodeName => "ROOK_NODE_NAME",
            EnvName::ClusterId => "ROOK_CLUSTER_ID",
            EnvName::PrivateIp => "ROOK_PRIVATE_IP",
            EnvName::PublicIp => "ROOK_PUBLIC_IP",
            EnvName::PodNamespace => "POD_NAMESPACE",
            EnvName::MonEndpoints => "ROOK_CEPH_MON_ENDPOINTS",
            EnvName::MonSecret => "ROOK_CEPH_MON_SECRET",
            EnvName::CephUsername => "ROOK_CEPH_USERNAME",
            EnvName::CephSecret => "ROOK_CEPH_SECRET",
            EnvName::ConfigDir => "ROOK_CONFIG_DIR",
            EnvName::ConfigOverride => "ROOK_CEPH_CONFIG_OVERRIDE",
            EnvName::Fsid => "ROOK_FSID",
            EnvName::KubeNodeName => "NODE_NAME",
            EnvName::CrushmapHostname => "ROOK_CRUSHMAP_HOSTNAME",
            EnvName::CephVolumeDebug => "CEPH_VOLUME_DEBUG",
            EnvName::CephVolumeSkipRestorecon => "CEPH_VOLUME_SKIP_RESTORECON",
            EnvName::DmDisableUdev => "DM_DISABLE_UDEV",
            EnvName::OsdStore => "ROOK_OSD_STORE",
            EnvName::DatabaseSize => "ROOK_OSD_DATABASE_SIZE",
            EnvName::WalSize => "ROOK_OSD_WAL_SIZE",
            EnvName::JournalSize => "ROOK_OSD_JOURNAL_SIZE",
            EnvName::OsdsPerDevice => "ROOK_OSDS_PER_DEVICE",
            EnvName::EncryptedDevice => "ROOK_ENCRYPTED_DEVICE",
            EnvName::DmcryptSecret => "CEPH_VOLUME_DMCRYPT_SECRET",
            EnvName::MetadataDevice => "ROOK_METADATA_DEVICE",
            EnvName::WalDevice => "ROOK_WAL_DEVICE",
            EnvName::PvcBackedOsd => "ROOK_PVC_BACKED_OSD",
            EnvName::BlockPath => "ROOK_BLOCK_PATH",
            EnvName::CvMode => "ROOK_CV_MODE",
            EnvName::LvBackedPv => "ROOK_LV_BACKED_PV",
            EnvName::CrushDeviceClass => "ROOK_OSD_CRUSH_DEVICE_CLASS",
            EnvName::DriveGroups => "ROOK_DRIVE_GROUPS",
            EnvName::DataDevices => "ROOK_DATA_DEVICES",
            EnvName::DeviceFilter => "ROOK_DATA_DEVICE_FILTER",
            EnvName::DevicePathFilter => "ROOK_DATA_DEVICE_PATH_FILTER",
            EnvName::LogLevel => "ROOK_LOG_LEVEL",
            EnvName::MonHost => "ROOK_CEPH_MON_HOST",
            EnvName::CephArgs => "CEPH_ARGS",
        }
    }

    /// Look a name up by its wire string
    pub fn from_wire(s: &str) -> Option<EnvName> {
        EnvName::ALL.iter().copied().find(|n| n.as_str() == s)
    }

    /// Shell-style `$(NAME)` reference for use inside another entry's value
    pub fn interpolation(self) -> String {
        format!("$({})", self.as_str())
    }
}

impl std::fmt::Display for EnvName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EnvName {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
