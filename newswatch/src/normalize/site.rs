//! Site-name canonicalization.

use regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static WWW_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^www\d*\.").expect("built-in host pattern compiles"));

/// Turns a display link into a bare site name.
#[derive(Debug, Clone, Copy, Default)]
pub struct SiteNameResolver;

impl SiteNameResolver {
    /// Host part before the first `/`, minus a leading `www.`, `www2.`, ...
    #[must_use]
    pub fn resolve(&self, display_link: &str) -> String {
        let host = display_link.split('/').next().unwrap_or_default();
        WWW_PREFIX.replace(host, "").into_owned()
    }
}
