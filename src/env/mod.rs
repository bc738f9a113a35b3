//! OSD container environment
//!
//! - [`vocabulary`]: the registry of environment variable names
//! - [`entry`]: entries and their value sources
//! - [`builders`]: single-purpose entry builders
//! - [`drive_groups`]: drive group blob encoding
//! - [`resolver`]: default secret reference resolver
//! - [`materializer`]: descriptor to ordered environment

pub mod builders;
pub mod drive_groups;
pub mod entry;
pub mod materializer;
pub mod resolver;
pub mod vocabulary;

pub use builders::CephVolumeMode;
pub use drive_groups::JsonDriveGroupSerializer;
pub use entry::{to_env_vars, EnvValue, EnvironmentEntry};
pub use materializer::{device_selection_environment, Materializer};
pub use resolver::RookSecretResolver;
pub use vocabulary::EnvName;
