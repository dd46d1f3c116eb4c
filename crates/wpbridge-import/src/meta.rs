//! Sidecar meta files shipped inside backups.
//!
//! Each flavor has its own JSON shape; all of them are folded into
//! [`MetaFileData`].

use serde::Deserialize;

use crate::content::MetaFileData;

/// Which JSON shape a meta file uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetaFormat {
    /// `studio.json` in Jetpack exports.
    Studio,
    /// `local-site.json` in Local exports.
    LocalSite,
    /// `package.json` in wpress archives.
    WpressPackage,
}

impl MetaFormat {
    pub fn parse(self, raw: &str) -> serde_json::Result<MetaFileData> {
        match self {
            Self::Studio => {
                let meta: StudioMeta = serde_json::from_str(raw)?;
                Ok(MetaFileData {
                    php_version: meta.php_version.as_deref().map(coerce_php_version),
                    wordpress_version: meta.wordpress_version,
                    template: meta.template,
                    stylesheet: meta.stylesheet,
                    plugins: meta.plugins,
                })
            }
            Self::LocalSite => {
                let meta: LocalSite = serde_json::from_str(raw)?;
                Ok(MetaFileData {
                    php_version: meta
                        .services
                        .php
                        .and_then(|php| php.version)
                        .as_deref()
                        .map(coerce_php_version),
                    wordpress_version: meta.wordpress_version,
                    ..Default::default()
                })
            }
            Self::WpressPackage => {
                let meta: WpressPackage = serde_json::from_str(raw)?;
                Ok(MetaFileData {
                    php_version: meta
                        .php
                        .and_then(|php| php.version)
                        .as_deref()
                        .map(coerce_php_version),
                    wordpress_version: meta.wordpress.and_then(|wp| wp.version),
                    template: meta.template,
                    stylesheet: meta.stylesheet,
                    plugins: meta.plugins,
                })
            }
        }
    }
}

/// Keep only `major.minor` of a PHP version: `8.1.27` becomes `8.1`.
pub fn coerce_php_version(version: &str) -> String {
    let version = version.trim();
    let mut parts = version.splitn(3, '.');
    match (parts.next(), parts.next()) {
        (Some(major), Some(minor)) => format!("{major}.{minor}"),
        _ => version.to_owned(),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StudioMeta {
    php_version: Option<String>,
    wordpress_version: Option<String>,
    template: Option<String>,
    stylesheet: Option<String>,
    #[serde(default)]
    plugins: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocalSite {
    #[serde(default)]
    services: LocalServices,
    wordpress_version: Option<String>,
}

#[derive(Default, Deserialize)]
struct LocalServices {
    php: Option<VersionedService>,
}

#[derive(Deserialize)]
struct VersionedService {
    version: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WpressPackage {
    #[serde(rename = "PHP")]
    php: Option<PascalVersion>,
    #[serde(rename = "WordPress")]
    wordpress: Option<PascalVersion>,
    template: Option<String>,
    stylesheet: Option<String>,
    #[serde(default)]
    plugins: Vec<String>,
}

#[derive(Deserialize)]
struct PascalVersion {
    #[serde(rename = "Version")]
    version: Option<String>,
}
