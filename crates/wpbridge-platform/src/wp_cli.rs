use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::command::Command;
use crate::error::{Error, Result};
use crate::runtime::{CommandOptions, CommandOutput, SiteRuntime};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WpCliConfig {
    /// Path to `wp-cli.phar`.
    pub wp_cli: PathBuf,
    /// Explicit interpreter. Overrides any PATH lookup.
    pub php_binary: Option<PathBuf>,
}

impl Default for WpCliConfig {
    fn default() -> Self {
        Self {
            wp_cli: PathBuf::from("wp-cli.phar"),
            php_binary: None,
        }
    }
}

/// Runs wp-cli through a local PHP interpreter against a site directory.
#[derive(Clone, Debug)]
pub struct WpCliRuntime {
    site_path: PathBuf,
    port: u16,
    config: WpCliConfig,
}

impl WpCliRuntime {
    pub fn new(site_path: impl Into<PathBuf>, port: u16, config: WpCliConfig) -> Self {
        Self {
            site_path: site_path.into(),
            port,
            config,
        }
    }

    pub fn config(&self) -> &WpCliConfig {
        &self.config
    }

    /// Pick the interpreter: the configured binary, else `php<version>`, else `php`.
    pub fn resolve_php(&self, version: Option<&str>) -> Result<PathBuf> {
        if let Some(bin) = &self.config.php_binary {
            return Ok(bin.clone());
        }
        if let Some(version) = version {
            if let Ok(path) = which::which(format!("php{version}")) {
                return Ok(path);
            }
            debug!(version, "no versioned php on PATH, falling back to php");
        }
        which::which("php").map_err(|_| Error::PhpNotFound {
            version: version.unwrap_or("any").to_owned(),
        })
    }

    /// Full argument vector handed to the interpreter.
    pub fn invocation(&self, args: &[String]) -> Vec<String> {
        let mut argv = Vec::with_capacity(args.len() + 2);
        argv.push(self.config.wp_cli.to_string_lossy().into_owned());
        argv.push(format!("--path={}", self.site_path.display()));
        argv.extend(args.iter().cloned());
        argv
    }
}

#[async_trait]
impl SiteRuntime for WpCliRuntime {
    async fn execute_command(
        &self,
        args: &[String],
        opts: CommandOptions,
    ) -> Result<CommandOutput> {
        if !self.config.wp_cli.exists() {
            return Err(Error::WpCliMissing {
                path: self.config.wp_cli.clone(),
            });
        }
        let php = self.resolve_php(opts.target_php_version.as_deref())?;
        info!(php = %php.display(), command = ?args, "running wp-cli");

        let output = Command::new(&php)
            .args(self.invocation(args))
            .current_dir(&self.site_path)
            .output()
            .await?;
        Ok(output.into())
    }

    fn site_path(&self) -> &Path {
        &self.site_path
    }

    fn port(&self) -> u16 {
        self.port
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_prepends_phar_and_path() {
        let rt = WpCliRuntime::new(
            "/sites/blog",
            8881,
            WpCliConfig {
                wp_cli: PathBuf::from("/opt/wp-cli.phar"),
                php_binary: None,
            },
        );
        let argv = rt.invocation(&["option".into(), "get".into(), "siteurl".into()]);
        assert_eq!(
            argv,
            ["/opt/wp-cli.phar", "--path=/sites/blog", "option", "get", "siteurl"]
        );
    }

    #[test]
    fn test_explicit_php_binary_wins() {
        let rt = WpCliRuntime::new(
            "/sites/blog",
            80,
            WpCliConfig {
                php_binary: Some(PathBuf::from("/usr/local/bin/php-custom")),
                ..Default::default()
            },
        );
        assert_eq!(
            rt.resolve_php(Some("8.3")).unwrap(),
            PathBuf::from("/usr/local/bin/php-custom")
        );
    }

    #[tokio::test]
    async fn test_missing_phar_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let rt = WpCliRuntime::new(
            dir.path(),
            80,
            WpCliConfig {
                wp_cli: dir.path().join("absent.phar"),
                php_binary: Some(PathBuf::from("php")),
            },
        );
        let err = rt
            .execute_command(&["core".into(), "version".into()], CommandOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::WpCliMissing { .. }));
    }
}
