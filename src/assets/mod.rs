//! Discovery of content-hashed client assets and rewriting of their public paths.
//!
//! Scanning and rewriting live in separate submodules so the filename classification can be
//! tested without touching stylesheet contents.

mod paths;
mod scanning;

pub use paths::{prefix_css_urls, rewrite_asset_paths};
pub use scanning::{AssetKind, classify_asset, scan_assets};
