// SPDX-License-Identifier: GPL-3.0-only
pub mod models;

pub use models::{Manifest, ManifestEntry};

/// File name of the persisted manifest record, both remotely and in the
/// local cache directory. Never a valid package name.
pub const MANIFEST_FILE: &str = "manifest.json";
