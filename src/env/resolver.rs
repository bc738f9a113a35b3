//! Default secret reference resolver
//!
//! Maps logical secrets onto the names configured in [`SecretNaming`].

use crate::config::SecretNaming;
use crate::domain::ports::{
    ConfigMapKeyRef, LogicalConfigMap, LogicalSecret, SecretKeyRef, SecretReferenceResolver,
};
use tracing::trace;

/// Resolver backed by a static naming table
#[derive(Debug, Clone, Default)]
pub struct RookSecretResolver {
    naming: SecretNaming,
}

impl RookSecretResolver {
    pub fn new(naming: SecretNaming) -> Self {
        Self { naming }
    }
}

impl SecretReferenceResolver for RookSecretResolver {
    fn secret(&self, secret: &LogicalSecret) -> SecretKeyRef {
        let n = &self.naming;
        let resolved = match secret {
            LogicalSecret::MonSecret => SecretKeyRef::new(&n.mon_secret_name, &n.mon_secret_key),
            LogicalSecret::CephUsername => {
                SecretKeyRef::new(&n.mon_secret_name, &n.ceph_username_key)
            }
            LogicalSecret::CephSecret => SecretKeyRef::new(&n.mon_secret_name, &n.ceph_secret_key),
            LogicalSecret::Fsid => SecretKeyRef::new(&n.mon_secret_name, &n.fsid_key),
            LogicalSecret::MonHost => SecretKeyRef::new(&n.config_secret_name, &n.mon_host_key),
            LogicalSecret::OsdEncryptionKey { claim_name } => SecretKeyRef::new(
                n.encryption_secret_name(claim_name),
                &n.encryption_key_name,
            ),
        };
        trace!("Resolved secret {} to {}/{}", secret, resolved.store, resolved.key);
        resolved
    }

    fn config_map(&self, map: LogicalConfigMap) -> ConfigMapKeyRef {
        match map {
            LogicalConfigMap::MonEndpoints => ConfigMapKeyRef::new(
                &self.naming.mon_endpoints_config_map,
                &self.naming.mon_endpoints_key,
            ),
        }
    }
}
