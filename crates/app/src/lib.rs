//! ycs3 command-line interface.
//!
//! Argument definitions and command execution live here so integration
//! tests can drive them without spawning the binary.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ycs3_domain::{ConfigurationError, Settings};
use ycs3_infrastructure::{SettingsLoader, Ycs3Services};

/// Exchanges a long-lived OAuth token for IAM tokens and uses them.
#[derive(Debug, Parser)]
#[command(name = "ycs3", version, about)]
pub struct Cli {
    /// Settings file (defaults to `<config dir>/ycs3/config.toml`).
    #[arg(long, global = true, env = "YCS3_CONFIG")]
    pub config: Option<PathBuf>,

    /// Command to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Obtain a token and print how long it stays valid.
    TokenStatus,
    /// Print the object-store URL of a key.
    ObjectStoreUrl {
        /// Object key.
        key: String,
        /// Bucket name (defaults to the `bucket` setting).
        #[arg(long)]
        bucket: Option<String>,
    },
    /// List clouds.
    Clouds,
    /// List the folders of a cloud.
    Folders {
        /// Cloud id.
        cloud_id: String,
    },
    /// Look up a user account by login.
    User {
        /// Passport login.
        login: String,
    },
}

impl Cli {
    /// Loads settings from the configured file and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Load`] if a source cannot be read.
    pub fn load_settings(&self) -> Result<Settings, ConfigurationError> {
        let loader = SettingsLoader::new();
        match &self.config {
            Some(path) => loader.with_file(path).load(),
            None => loader.load(),
        }
    }
}

/// Runs `command`, writing its output to `out`.
///
/// # Errors
///
/// Returns any configuration, authentication or API error, with context.
pub async fn execute(
    command: &Commands,
    services: &Ycs3Services,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Commands::TokenStatus => {
            let token = services
                .provider()
                .get_valid_token()
                .await
                .context("could not obtain an IAM token")?;
            let status = services.provider().status().await;
            writeln!(out, "{}", status.display_message())?;
            writeln!(out, "token:      {}", token.value().preview())?;
            writeln!(out, "expires at: {}", token.expires_at().to_rfc3339())?;
        }
        Commands::ObjectStoreUrl { key, bucket } => {
            let bucket = bucket
                .as_deref()
                .or_else(|| services.settings().bucket.as_deref())
                .ok_or_else(|| ConfigurationError::MissingSetting("bucket".to_string()))?;
            let handle = services
                .object_store()
                .await
                .context("could not build the object-store client")?;
            let client = handle.fresh_client().await?;
            writeln!(out, "{}", client.object_url(bucket, key)?)?;
        }
        Commands::Clouds => {
            let clouds = services.resource_manager().list_clouds().await?;
            for cloud in clouds {
                writeln!(out, "{}\t{}", cloud.id, cloud.name)?;
            }
        }
        Commands::Folders { cloud_id } => {
            let folders = services
                .resource_manager()
                .list_folders(cloud_id)
                .await
                .with_context(|| format!("could not list folders of {cloud_id}"))?;
            for folder in folders {
                writeln!(out, "{}\t{}", folder.id, folder.name)?;
            }
        }
        Commands::User { login } => {
            let account = services.resource_manager().get_user_by_login(login).await?;
            writeln!(out, "{}", account.id)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_object_store_url() {
        let args = ["ycs3", "object-store-url", "a/b.txt", "--bucket", "media"];
        let cli = Cli::try_parse_from(args).unwrap();

        assert!(matches!(
            cli.command,
            Commands::ObjectStoreUrl { ref key, bucket: Some(ref bucket) }
                if bucket == "media" && key == "a/b.txt"
        ));
    }

    #[test]
    fn test_object_store_url_bucket_is_optional() {
        let cli = Cli::try_parse_from(["ycs3", "object-store-url", "a/b.txt"]).unwrap();

        assert!(matches!(cli.command, Commands::ObjectStoreUrl { bucket: None, .. }));
    }

    #[test]
    fn test_folders_requires_cloud_id() {
        assert!(Cli::try_parse_from(["ycs3", "folders"]).is_err());
    }
}
