// SPDX-License-Identifier: GPL-3.0-only
use crate::manifest::MANIFEST_FILE;

/// Maximum length of a package name in bytes.
const MAX_NAME_LENGTH: usize = 255;

/// Validate a package name from a manifest.
///
/// A package name doubles as the file name of its cache entry, so it must
/// be a single plain path component. Names are rejected rather than
/// rewritten: a sanitized name would no longer match its manifest key.
pub fn validate_package_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("package name is empty".to_string());
    }

    if name.len() > MAX_NAME_LENGTH {
        let prefix: String = name.chars().take(32).collect();
        return Err(format!(
            "package name exceeds {} bytes: '{}...'",
            MAX_NAME_LENGTH, prefix
        ));
    }

    // A leading dot covers "..", hidden files and temp-file prefixes.
    if name.starts_with('.') {
        return Err(format!("package name '{}' may not start with '.'", name));
    }

    if name
        .chars()
        .any(|c| c == '/' || c == '\\' || c == ':' || c.is_control())
    {
        return Err(format!(
            "package name '{}' contains a path separator or control character",
            name
        ));
    }

    // The manifest record shares the cache directory with package entries.
    if name == MANIFEST_FILE {
        return Err(format!("package name '{}' is reserved", name));
    }

    Ok(())
}
