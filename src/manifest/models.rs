// SPDX-License-Identifier: GPL-3.0-only
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::utils::validate_package_name;

/// One package entry: name plus an opaque version token.
///
/// Version tokens are compared for exact string equality only; no ordering
/// or semantic-version meaning is implied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub name: String,
    pub version: String,
}

/// Mapping from package name to version token, in document order.
///
/// The wire format is a JSON object, and its key order is the order packages
/// are downloaded and reported in. A plain map type would lose that order,
/// so entries are kept as a list and looked up linearly; manifests hold a
/// handful of packages at most.
///
/// A manifest is immutable once fetched. The mutating helpers exist for
/// assembling manifests in tests and tooling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a manifest document body.
    ///
    /// Fails with `ParseError` when the body is not a JSON object of string
    /// values, contains a duplicate package name, or contains a name that
    /// cannot be used as a cache entry.
    pub fn from_json(body: &str) -> Result<Self, SyncError> {
        serde_json::from_str(body).map_err(|e| SyncError::ParseError(e.to_string()))
    }

    /// Serialize to the manifest document body, entries in order.
    pub fn to_json(&self) -> Result<String, SyncError> {
        serde_json::to_string(self).map_err(|e| SyncError::ParseError(e.to_string()))
    }

    /// Version token of a package, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.version.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Insert or replace an entry. A replaced entry keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, version: impl Into<String>) {
        let name = name.into();
        let version = version.into();
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.version = version,
            None => self.entries.push(ManifestEntry { name, version }),
        }
    }

    /// Package names in document order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Manifest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.name, &entry.version)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Manifest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ManifestVisitor;

        impl<'de> Visitor<'de> for ManifestVisitor {
            type Value = Manifest;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a JSON object mapping package names to version tokens")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Manifest, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut manifest = Manifest::new();
                while let Some((name, version)) = access.next_entry::<String, String>()? {
                    validate_package_name(&name).map_err(de::Error::custom)?;
                    if manifest.contains(&name) {
                        return Err(de::Error::custom(format!(
                            "duplicate package name '{}'",
                            name
                        )));
                    }
                    manifest.entries.push(ManifestEntry { name, version });
                }
                Ok(manifest)
            }
        }

        deserializer.deserialize_map(ManifestVisitor)
    }
}
