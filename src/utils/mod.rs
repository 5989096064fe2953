// SPDX-License-Identifier: GPL-3.0-only
pub mod package_name;
pub mod url_validator;

pub use package_name::validate_package_name;
pub use url_validator::validate_remote_url;
