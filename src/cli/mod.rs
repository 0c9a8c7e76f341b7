//! Command-line interface for Lifedesk.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::Config;

/// Lifedesk - personal organizer API server
#[derive(Parser)]
#[command(name = "lifedesk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a config file, instead of the default search locations
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP API server (default)
    #[command(alias = "daemon")]
    Serve,

    /// Create default config file
    Init,

    /// Load and validate the config, then exit
    #[command(alias = "check")]
    CheckConfig,
}

impl Cli {
    #[must_use]
    pub fn command(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Serve)
    }

    /// Loads the config named by `--config`, or searches the default
    /// locations. `init` only writes a file, so it starts from defaults.
    pub fn load_config(&self) -> anyhow::Result<Config> {
        if self.command() == &Commands::Init {
            return Ok(Config::default());
        }

        match &self.config {
            Some(path) => {
                let mut config = Config::load_from_path(path)?;
                config.apply_env_overrides();
                Ok(config)
            }
            None => Config::load(),
        }
    }

    /// The file the config was read from, if any.
    #[must_use]
    pub fn config_source(&self) -> Option<PathBuf> {
        self.config.clone().or_else(Config::find_config_path)
    }

    /// Where `init` writes the default config.
    #[must_use]
    pub fn init_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_is_default() {
        let cli = Cli::parse_from(["lifedesk"]);
        assert_eq!(cli.command(), &Commands::Serve);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::parse_from(["lifedesk", "check-config", "--config", "/tmp/ld.toml"]);
        assert_eq!(cli.command(), &Commands::CheckConfig);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/ld.toml")));

        let cli = Cli::parse_from(["lifedesk", "init"]);
        assert_eq!(cli.command(), &Commands::Init);
        assert_eq!(cli.init_path(), PathBuf::from("config.toml"));
    }

    #[test]
    fn test_init_does_not_read_missing_config() {
        let path = std::env::temp_dir().join(format!("lifedesk-init-{}.toml", uuid::Uuid::new_v4()));
        let cli = Cli::parse_from(["lifedesk", "init", "--config", path.to_str().unwrap()]);

        let config = cli.load_config().unwrap();
        assert_eq!(config.server.port, Config::default().server.port);
        assert_eq!(cli.init_path(), path);
        assert_eq!(cli.config_source(), Some(path.clone()));
        assert!(!path.exists());

        let cli = Cli::parse_from(["lifedesk", "serve", "--config", path.to_str().unwrap()]);
        assert!(cli.load_config().is_err());
    }
}
