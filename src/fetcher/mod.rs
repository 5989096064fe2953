// SPDX-License-Identifier: GPL-3.0-only
pub mod http;
pub mod traits;

pub use http::HttpFetcher;
pub use traits::{PackageFetcher, ProgressFn};
