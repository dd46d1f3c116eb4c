use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

/// Captured result of one command run against a site.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

impl From<std::process::Output> for CommandOutput {
    fn from(output: std::process::Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            // Killed by a signal.
            exit_code: output.status.code().unwrap_or(-1),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOptions {
    /// Run under this PHP version instead of the site's own.
    pub target_php_version: Option<String>,
}

impl CommandOptions {
    pub fn with_php(version: impl Into<String>) -> Self {
        Self {
            target_php_version: Some(version.into()),
        }
    }
}

/// The running site an import mutates.
///
/// Commands are wp-cli argument vectors, e.g. `["option", "get", "siteurl"]`.
#[async_trait]
pub trait SiteRuntime: Send + Sync {
    async fn execute_command(
        &self,
        args: &[String],
        opts: CommandOptions,
    ) -> Result<CommandOutput>;

    fn site_path(&self) -> &Path;

    fn port(&self) -> u16;
}
