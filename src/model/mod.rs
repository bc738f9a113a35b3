//! Input data model
//!
//! This module contains the deployment description handed to the
//! materializer:
//! - DeploymentDescriptor: identity, placement, backing and tuning of one OSD
//! - DriveGroup: device-selection group carried as an opaque blob

pub mod descriptor;
pub mod drive_group;

pub use descriptor::*;
pub use drive_group::*;
