//! Drive group blob encoding
//!
//! The blob is a JSON object keyed by group name whose values are the
//! JSON-encoded spec of each group. Keys are sorted so equal inputs always
//! produce equal blobs. A later group replaces an earlier one of the same
//! name.

use crate::domain::ports::DriveGroupSerializer;
use crate::error::{Error, Result};
use crate::model::DriveGroup;
use serde::Serialize;
use std::collections::BTreeMap;

/// JSON blob serializer
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDriveGroupSerializer;

impl DriveGroupSerializer for JsonDriveGroupSerializer {
    fn serialize(&self, groups: &[DriveGroup]) -> Result<String> {
        let mut blobs: BTreeMap<&str, String> = BTreeMap::new();

        for group in groups {
            blobs.insert(&group.name, encode(&group.spec)?);
        }

        encode(&blobs)
    }
}

fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| Error::BlobSerialization(e.to_string()))
}
