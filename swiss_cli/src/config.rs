//! CLI configuration management.
//!
//! Consolidates all environment variable reads and applies command-line overrides.

use swiss_tournament::db::{ConfigError, DatabaseConfig};
use swiss_tournament::tournament::TournamentConfig;

/// Complete CLI configuration
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Database configuration
    pub database: DatabaseConfig,
    /// Tournament rules
    pub tournament: TournamentConfig,
}

impl CliConfig {
    /// Load configuration from environment variables
    ///
    /// `database_url_override` (from `--db-url`) takes precedence over
    /// `DATABASE_URL`; without either the development URL is used.
    pub fn from_env(database_url_override: Option<String>) -> Result<Self, ConfigError> {
        let database = match database_url_override {
            Some(database_url) => DatabaseConfig {
                database_url,
                ..Self::database_defaults()?
            },
            None => Self::database_defaults()?,
        };
        database.validate()?;

        Ok(Self {
            database,
            tournament: TournamentConfig::from_env()?,
        })
    }

    fn database_defaults() -> Result<DatabaseConfig, ConfigError> {
        match DatabaseConfig::from_env() {
            Ok(config) => Ok(config),
            Err(ConfigError::MissingRequired { .. }) => Ok(DatabaseConfig::development()),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        let config = CliConfig::from_env(Some("postgres://example/override".to_string()))
            .expect("config");
        assert_eq!(config.database.database_url, "postgres://example/override");
    }
}
