//! Environment Materializer
//!
//! Turns a [`DeploymentDescriptor`] into the ordered environment of an OSD
//! container. Construction order is part of the contract: entries that are
//! interpolated by later entries must come first.
//!
//! Base sequence:
//! 1. identity & placement
//! 2. CRUSH host hint
//! 3. fixed ceph-volume environment
//! 4. non-zero store tuning, then the encrypted-device flag
//! 5. drive groups blob, when any groups are declared

use super::builders;
use super::drive_groups::JsonDriveGroupSerializer;
use super::entry::EnvironmentEntry;
use super::resolver::RookSecretResolver;
use crate::config::MaterializerConfig;
use crate::domain::ports::{DriveGroupSerializer, SecretReferenceResolver};
use crate::error::{Error, Result};
use crate::model::{DeploymentDescriptor, DeviceSelectors, DriveGroup};
use std::sync::Arc;
use tracing::debug;

// =============================================================================
// Materializer
// =============================================================================

/// Stateless environment materializer
#[derive(Clone)]
pub struct Materializer {
    config: MaterializerConfig,
    serializer: Arc<dyn DriveGroupSerializer>,
    resolver: Arc<dyn SecretReferenceResolver>,
}

impl Default for Materializer {
    fn default() -> Self {
        Self::new(MaterializerConfig::default())
    }
}

impl std::fmt::Debug for Materializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Materializer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Materializer {
    /// Create a materializer with the JSON blob serializer and a resolver
    /// driven by the configured naming
    pub fn new(config: MaterializerConfig) -> Self {
        let resolver = RookSecretResolver::new(config.naming.clone());
        Self {
            config,
            serializer: Arc::new(JsonDriveGroupSerializer),
            resolver: Arc::new(resolver),
        }
    }

    /// Replace the drive group serializer
    pub fn with_serializer(mut self, serializer: Arc<dyn DriveGroupSerializer>) -> Self {
        self.serializer = serializer;
        self
    }

    /// Replace the secret reference resolver
    pub fn with_resolver(mut self, resolver: Arc<dyn SecretReferenceResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &MaterializerConfig {
        &self.config
    }

    pub fn resolver(&self) -> &dyn SecretReferenceResolver {
        self.resolver.as_ref()
    }

    /// Build the base environment of an OSD container.
    ///
    /// Fails only when the drive groups cannot be serialized, in which case
    /// nothing is returned.
    pub fn materialize_base(&self, desc: &DeploymentDescriptor) -> Result<Vec<EnvironmentEntry>> {
        let resolver = self.resolver();
        let placement = &desc.placement;

        let mut entries = vec![
            builders::node_name(&placement.crush_hostname),
            builders::cluster_id(&desc.cluster.owner_uid),
            builders::private_ip(),
            builders::public_ip(),
            builders::pod_namespace(&desc.cluster.namespace),
            builders::mon_endpoints(resolver),
            builders::mon_secret(resolver),
            builders::ceph_username(resolver),
            builders::ceph_secret(resolver),
            builders::config_dir(&desc.data_dir),
            builders::config_override(&self.config.config_override_path),
            builders::fsid(resolver),
            builders::kube_node_name(),
        ];

        // A non-portable OSD on a claim only learns its host inside the
        // prepare job, so leave the hint empty for it to fill in
        let crushmap_hostname = if !placement.portable && desc.volume_backing.on_pvc() {
            if !placement.crush_hostname.is_empty() {
                debug!(
                    "Deferring crush hostname {} of non-portable PVC-backed OSD on {} to the prepare job",
                    placement.crush_hostname, placement.node_name
                );
            }
            ""
        } else {
            placement.crush_hostname.as_str()
        };
        entries.push(builders::crushmap_hostname(crushmap_hostname));

        entries.extend(builders::ceph_volume_environment());

        let tuning = &desc.store_tuning;
        if tuning.database_size_mb != 0 {
            entries.push(builders::database_size(tuning.database_size_mb));
        }
        if tuning.wal_size_mb != 0 {
            entries.push(builders::wal_size(tuning.wal_size_mb));
        }
        if tuning.osds_per_device != 0 {
            entries.push(builders::osds_per_device(tuning.osds_per_device));
        }
        if desc.encryption {
            entries.push(builders::encrypted_device(true));
        }

        if let Some(entry) = self.drive_group_entry(&desc.drive_groups)? {
            entries.push(entry);
        }

        debug!(
            "Materialized {} base environment entries for node {}",
            entries.len(),
            placement.node_name
        );

        Ok(entries)
    }

    /// Drive groups blob entry; `None` when no groups are declared
    pub fn drive_group_entry(&self, groups: &[DriveGroup]) -> Result<Option<EnvironmentEntry>> {
        if groups.is_empty() {
            return Ok(None);
        }

        let blob = self
            .serializer
            .serialize(groups)
            .map_err(Error::drive_group_marshal)?;

        Ok(Some(builders::drive_groups(&blob)))
    }

    /// Environment of the OSD prepare job: the base sequence followed by
    /// device selection and agent runtime settings
    pub fn materialize_prepare(
        &self,
        desc: &DeploymentDescriptor,
    ) -> Result<Vec<EnvironmentEntry>> {
        let mut entries = self.materialize_base(desc)?;

        entries.extend(device_selection_environment(&desc.device_selectors));
        entries.push(builders::log_level(desc.debug));

        if let Some(class) = desc.crush_device_class.as_deref().filter(|c| !c.is_empty()) {
            entries.push(builders::crush_device_class(class));
        }

        if let Some(claim) = desc.volume_backing.claim_name() {
            entries.push(builders::pvc_backed_osd(true));
            if desc.encryption {
                entries.push(builders::encryption_key_secret(self.resolver(), claim));
            }
        }

        debug!(
            "Materialized {} prepare environment entries for node {}",
            entries.len(),
            desc.placement.node_name
        );

        Ok(entries)
    }

    /// Environment of the OSD activation step
    pub fn materialize_activate(&self) -> Vec<EnvironmentEntry> {
        builders::activate_environment(self.resolver())
    }
}

/// Entries for whichever device selectors are set, in a fixed order.
///
/// The selector families are alternatives but nothing here checks that only
/// one is used.
pub fn device_selection_environment(selectors: &DeviceSelectors) -> Vec<EnvironmentEntry> {
    let present = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());

    let mut entries = Vec::new();
    if let Some(v) = present(&selectors.data_devices) {
        entries.push(builders::data_devices(&v));
    }
    if let Some(v) = present(&selectors.device_filter) {
        entries.push(builders::device_filter(&v));
    }
    if let Some(v) = present(&selectors.device_path_filter) {
        entries.push(builders::device_path_filter(&v));
    }
    if let Some(v) = present(&selectors.metadata_device) {
        entries.push(builders::metadata_device(&v));
    }
    if let Some(v) = present(&selectors.wal_device) {
        entries.push(builders::wal_device(&v));
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{ConfigMapKeyRef, SecretKeyRef};
    use crate::env::entry::{find, EnvValue};
    use crate::env::vocabulary::EnvName;
    use crate::model::{ClusterIdentity, Placement, StoreTuning, VolumeBacking};
    use assert_matches::assert_matches;
    use serde_json::json;
    use std::collections::HashSet;

    struct FailingSerializer;

    impl DriveGroupSerializer for FailingSerializer {
        fn serialize(&self, _groups: &[DriveGroup]) -> Result<String> {
            Err(Error::BlobSerialization("unsupported spec".into()))
        }
    }

    fn descriptor() -> DeploymentDescriptor {
        DeploymentDescriptor {
            cluster: ClusterIdentity {
                owner_uid: "0a1b2c3d".into(),
                namespace: "rook-ceph".into(),
            },
            placement: Placement {
                node_name: "node-a".into(),
                portable: true,
                crush_hostname: "node-a".into(),
            },
            data_dir: "/var/lib/rook".into(),
            ..Default::default()
        }
    }

    fn pvc(claim: &str) -> VolumeBacking {
        VolumeBacking::PersistentVolumeClaim {
            claim_name: claim.into(),
        }
    }

    fn literal(entries: &[EnvironmentEntry], name: EnvName) -> Option<String> {
        find(entries, name).and_then(|e| e.literal_value().map(str::to_string))
    }

    fn assert_unique_names(entries: &[EnvironmentEntry]) {
        let names: HashSet<EnvName> = entries.iter().map(|e| e.name).collect();
        assert_eq!(names.len(), entries.len());
    }

    #[test]
    fn test_base_order() {
        let entries = Materializer::default().materialize_base(&descriptor()).unwrap();
        let names: Vec<EnvName> = entries.iter().map(|e| e.name).collect();
        assert_eq!(
            names,
            vec![
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
            ]
        );
    }

    #[test]
    fn test_identity_sources() {
        let entries = Materializer::default().materialize_base(&descriptor()).unwrap();
        assert_eq!(literal(&entries, EnvName::ClusterId).as_deref(), Some("0a1b2c3d"));
        assert_eq!(literal(&entries, EnvName::PodNamespace).as_deref(), Some("rook-ceph"));
        assert_eq!(
            literal(&entries, EnvName::ConfigOverride).as_deref(),
            Some("/etc/rook/config/override.conf")
        );
        assert_eq!(
            find(&entries, EnvName::Fsid).unwrap().value,
            EnvValue::SecretKeyRef(SecretKeyRef::new("rook-ceph-mon", "fsid"))
        );
        assert_eq!(
            find(&entries, EnvName::MonEndpoints).unwrap().value,
            EnvValue::ConfigMapKeyRef(ConfigMapKeyRef::new("rook-ceph-mon-endpoints", "data"))
        );
        assert_eq!(
            find(&entries, EnvName::PrivateIp).unwrap().value,
            EnvValue::FieldRef("status.podIP".into())
        );
    }

    #[test]
    fn test_end_to_end_tuning() {
        let mut desc = descriptor();
        desc.store_tuning = StoreTuning {
            database_size_mb: 1024,
            wal_size_mb: 0,
            journal_size_mb: 0,
            osds_per_device: 2,
        };
        desc.encryption = true;

        let entries = Materializer::default().materialize_base(&desc).unwrap();
        assert_eq!(literal(&entries, EnvName::DatabaseSize).as_deref(), Some("1024"));
        assert!(find(&entries, EnvName::WalSize).is_none());
        assert_eq!(literal(&entries, EnvName::OsdsPerDevice).as_deref(), Some("2"));
        assert_eq!(literal(&entries, EnvName::EncryptedDevice).as_deref(), Some("true"));
        assert_eq!(literal(&entries, EnvName::CrushmapHostname).as_deref(), Some("node-a"));
        assert!(find(&entries, EnvName::DriveGroups).is_none());

        // tuning follows the fixed ceph-volume block, in declared order
        let tail: Vec<EnvName> = entries[17..].iter().map(|e| e.name).collect();
        assert_eq!(
            tail,
            vec![EnvName::DatabaseSize, EnvName::OsdsPerDevice, EnvName::EncryptedDevice]
        );
        assert_unique_names(&entries);
    }

    #[test]
    fn test_zero_tuning_omitted() {
        let entries = Materializer::default().materialize_base(&descriptor()).unwrap();
        for name in [
            EnvName::DatabaseSize,
            EnvName::WalSize,
            EnvName::OsdsPerDevice,
            EnvName::EncryptedDevice,
            EnvName::JournalSize,
        ] {
            assert!(find(&entries, name).is_none(), "{} should be omitted", name);
        }
    }

    #[test]
    fn test_wal_size_emitted() {
        let mut desc = descriptor();
        desc.store_tuning.wal_size_mb = 576;
        let entries = Materializer::default().materialize_base(&desc).unwrap();
        assert_eq!(literal(&entries, EnvName::WalSize).as_deref(), Some("576"));
    }

    #[test]
    fn test_crush_hostname_blank_for_non_portable_pvc() {
        let mut desc = descriptor();
        desc.placement.portable = false;
        desc.volume_backing = pvc("set1-data-0");

        let entries = Materializer::default().materialize_base(&desc).unwrap();
        assert_eq!(literal(&entries, EnvName::CrushmapHostname).as_deref(), Some(""));
        // the node name keeps the supplied hostname
        assert_eq!(literal(&entries, EnvName::NodeName).as_deref(), Some("node-a"));
    }

    #[test]
    fn test_blank_crush_hostname_does_not_warn() {
        use std::sync::Mutex;
        use tracing::{Event, Level, Subscriber};
        use tracing_subscriber::layer::{Context, SubscriberExt};
        use tracing_subscriber::Layer;

        struct LevelRecorder(Arc<Mutex<Vec<Level>>>);

        impl<S: Subscriber> Layer<S> for LevelRecorder {
            fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
                self.0.lock().unwrap().push(*event.metadata().level());
            }
        }

        let mut desc = descriptor();
        desc.placement.portable = false;
        desc.volume_backing = pvc("set1-data-0");

        let levels = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(LevelRecorder(levels.clone()));
        tracing::subscriber::with_default(subscriber, || {
            Materializer::default().materialize_base(&desc).unwrap();
        });

        let levels = levels.lock().unwrap();
        assert!(!levels.is_empty());
        assert!(levels.iter().all(|l| *l > Level::WARN));
    }

    #[test]
    fn test_crush_hostname_kept_otherwise() {
        let materializer = Materializer::default();

        let mut desc = descriptor();
        desc.volume_backing = pvc("set1-data-0");
        let entries = materializer.materialize_base(&desc).unwrap();
        assert_eq!(literal(&entries, EnvName::CrushmapHostname).as_deref(), Some("node-a"));

        let mut desc = descriptor();
        desc.placement.portable = false;
        let entries = materializer.materialize_base(&desc).unwrap();
        assert_eq!(literal(&entries, EnvName::CrushmapHostname).as_deref(), Some("node-a"));
    }

    #[test]
    fn test_drive_groups_entry_last() {
        let mut desc = descriptor();
        desc.store_tuning.database_size_mb = 10;
        desc.drive_groups =
            vec![DriveGroup::new("all").with_spec("data_devices", json!({"all": true}))];

        let entries = Materializer::default().materialize_base(&desc).unwrap();
        let last = entries.last().unwrap();
        assert_eq!(last.name, EnvName::DriveGroups);
        assert_eq!(
            last.literal_value(),
            Some(r#"{"all":"{\"data_devices\":{\"all\":true}}"}"#)
        );
    }

    #[test]
    fn test_drive_group_failure_aborts() {
        let mut desc = descriptor();
        desc.drive_groups = vec![DriveGroup::new("all")];

        let materializer = Materializer::default().with_serializer(Arc::new(FailingSerializer));
        let result = materializer.materialize_base(&desc);
        assert_matches!(result, Err(Error::DriveGroupMarshal { .. }));

        // empty groups never reach the serializer
        desc.drive_groups.clear();
        assert!(materializer.materialize_base(&desc).is_ok());
    }

    #[test]
    fn test_repeated_and_empty_group_names_materialize() {
        let mut desc = descriptor();
        desc.drive_groups = vec![
            DriveGroup::new("all").with_spec("n", json!(1)),
            DriveGroup::new("all").with_spec("n", json!(2)),
            DriveGroup::new(""),
        ];

        let entries = Materializer::default().materialize_base(&desc).unwrap();
        assert_eq!(
            literal(&entries, EnvName::DriveGroups).as_deref(),
            Some(r#"{"":"{}","all":"{\"n\":2}"}"#)
        );
    }

    #[test]
    fn test_idempotent() {
        let mut desc = descriptor();
        desc.encryption = true;
        desc.drive_groups = vec![
            DriveGroup::new("b").with_spec("x", json!(1)),
            DriveGroup::new("a").with_spec("y", json!([1, 2])),
        ];
        let materializer = Materializer::default();
        let first = materializer.materialize_base(&desc).unwrap();
        let second = materializer.materialize_base(&desc.clone()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_device_selection_order() {
        let selectors = DeviceSelectors {
            data_devices: None,
            device_filter: Some("^sd[b-d]".into()),
            device_path_filter: Some(String::new()),
            metadata_device: Some("nvme0n1".into()),
            wal_device: Some("nvme1n1".into()),
        };
        let entries = device_selection_environment(&selectors);
        let names: Vec<EnvName> = entries.iter().map(|e| e.name).collect();
        assert_eq!(
            names,
            vec![EnvName::DeviceFilter, EnvName::MetadataDevice, EnvName::WalDevice]
        );
    }

    #[test]
    fn test_prepare_on_encrypted_pvc() {
        let mut desc = descriptor();
        desc.volume_backing = pvc("set1-data-0");
        desc.encryption = true;
        desc.debug = true;
        desc.crush_device_class = Some("ssd".into());
        desc.device_selectors.metadata_device = Some("nvme0n1".into());

        let entries = Materializer::default().materialize_prepare(&desc).unwrap();
        assert_eq!(literal(&entries, EnvName::LogLevel).as_deref(), Some("DEBUG"));
        assert_eq!(literal(&entries, EnvName::CrushDeviceClass).as_deref(), Some("ssd"));
        assert_eq!(literal(&entries, EnvName::PvcBackedOsd).as_deref(), Some("true"));
        assert_eq!(literal(&entries, EnvName::MetadataDevice).as_deref(), Some("nvme0n1"));
        assert_eq!(
            find(&entries, EnvName::DmcryptSecret).unwrap().value,
            EnvValue::SecretKeyRef(SecretKeyRef::new(
                "rook-ceph-osd-encryption-key-set1-data-0",
                "dmcrypt-key"
            ))
        );
        assert_unique_names(&entries);
    }

    #[test]
    fn test_prepare_on_node_devices() {
        let entries = Materializer::default().materialize_prepare(&descriptor()).unwrap();
        assert_eq!(literal(&entries, EnvName::LogLevel).as_deref(), Some("INFO"));
        assert!(find(&entries, EnvName::PvcBackedOsd).is_none());
        assert!(find(&entries, EnvName::CrushDeviceClass).is_none());
        assert!(find(&entries, EnvName::DmcryptSecret).is_none());
    }

    #[test]
    fn test_custom_naming_flows_through() {
        let mut config = MaterializerConfig::default();
        config.naming.mon_secret_name = "alt-mon".into();
        let entries = Materializer::new(config).materialize_base(&descriptor()).unwrap();
        assert_eq!(
            find(&entries, EnvName::MonSecret).unwrap().value,
            EnvValue::SecretKeyRef(SecretKeyRef::new("alt-mon", "mon-secret"))
        );
    }

    #[test]
    fn test_activate_interpolation_order() {
        let entries = Materializer::default().materialize_activate();
        let host = entries.iter().position(|e| e.name == EnvName::MonHost).unwrap();
        let args = entries.iter().position(|e| e.name == EnvName::CephArgs).unwrap();
        assert!(host < args);
    }
}
