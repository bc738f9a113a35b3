//! OSD Environment Materializer
//!
//! Converts a declarative description of an OSD deployment into the ordered
//! environment entries attached to the daemon's container. The variable
//! names, their conditional presence and the secret indirections form the
//! contract with the provisioning agent that reads them.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐     ┌──────────────────────────────────────────┐
//! │ DeploymentDescriptor │ ──▶ │          Environment Materializer        │
//! └──────────────────────┘     │  ┌──────────────┐  ┌──────────────────┐  │
//!                              │  │  DriveGroup  │  │ SecretReference  │  │
//!                              │  │  Serializer  │  │    Resolver      │  │
//!                              │  └──────────────┘  └──────────────────┘  │
//!                              └─────────────────────┬────────────────────┘
//!                                                    ▼
//!                                     Vec<EnvironmentEntry> ──▶ Vec<EnvVar>
//! ```
//!
//! # Modules
//!
//! - [`env`]: name registry, entries, builders and the materializer
//! - [`model`]: the deployment descriptor
//! - [`domain`]: collaborator traits
//! - [`config`]: naming configuration and file loading
//! - [`error`]: Error types and handling

pub mod config;
pub mod domain;
pub mod env;
pub mod error;
pub mod model;

// Re-export commonly used types
pub use config::{MaterializerConfig, SecretNaming};

pub use domain::ports::{
    ConfigMapKeyRef, DriveGroupSerializer, LogicalConfigMap, LogicalSecret, SecretKeyRef,
    SecretReferenceResolver,
};

pub use env::{
    EnvName, EnvValue, EnvironmentEntry, JsonDriveGroupSerializer, Materializer,
    RookSecretResolver,
};

pub use error::{Error, ErrorAction, Result};

pub use model::{
    ClusterIdentity, DeploymentDescriptor, DeviceSelectors, DriveGroup, Placement, StoreTuning,
    VolumeBacking,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
