//! Version-range sanitizing and CDN script URLs.

use serde::{Deserialize, Serialize};

use crate::manifest::PackageManifest;

/// Strip a version-range string down to `[0-9a-z.-]`, keeping order.
///
/// No validation happens here: `^1.2.3-alpha.1` becomes `1.2.3-alpha.1`,
/// and garbage in becomes (URL-safe) garbage out.
///
/// ```
/// use duet_config::sanitize_version;
///
/// assert_eq!(sanitize_version("^1.2.3-alpha.1"), "1.2.3-alpha.1");
/// assert_eq!(sanitize_version(">= 16.8 < 17"), "16.817");
/// ```
pub fn sanitize_version(range: &str) -> String {
    range
        .chars()
        .filter(|c| c.is_ascii_digit() || c.is_ascii_lowercase() || matches!(c, '.' | '-'))
        .collect()
}

/// A `<script>` the client page loads from a CDN instead of the bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CdnScript {
    pub package: String,
    pub version: String,
    pub url: String,
}

/// Build CDN script URLs for `packages` from the versions pinned in `manifest`.
///
/// `url_template` understands `{package}` and `{version}`. Packages the
/// manifest does not list are skipped; the runtime reports them when the
/// script is missing.
pub fn cdn_scripts(
    manifest: &PackageManifest,
    packages: &[String],
    url_template: &str,
) -> Vec<CdnScript> {
    packages
        .iter()
        .filter_map(|package| {
            let version = sanitize_version(manifest.version_of(package)?);
            let url = url_template
                .replace("{package}", package)
                .replace("{version}", &version);
            Some(CdnScript {
                package: package.clone(),
                version,
                url,
            })
        })
        .collect()
}
