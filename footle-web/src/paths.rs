//! Data endpoint URLs that respect the deployment's data host.
//!
//! When `FOOTLE_DATA_URL` is set at compile time (e.g. a staging CDN),
//! generated URLs are prefixed accordingly. Builds without it use the
//! production CDN.

const DEFAULT_DATA_URL: &str = "https://cdn.footle.xyz";

pub const CATALOG_FILE: &str = "footballers.json";
pub const DAILY_FILE: &str = "daily_challenge.json";

/// Base URL for data fetches, without a trailing slash.
#[must_use]
pub fn data_base() -> String {
    option_env!("FOOTLE_DATA_URL")
        .unwrap_or(DEFAULT_DATA_URL)
        .trim_end_matches('/')
        .to_string()
}

/// URL of a data file under the configured base.
#[must_use]
pub fn data_url(file: &str) -> String {
    data_url_with_base(file, &data_base())
}

pub(crate) fn data_url_with_base(file: &str, base: &str) -> String {
    let base = base.trim().trim_end_matches('/');
    let rel = file.trim_start_matches('/');
    if base.is_empty() {
        format!("/{rel}")
    } else {
        format!("{base}/{rel}")
    }
}
