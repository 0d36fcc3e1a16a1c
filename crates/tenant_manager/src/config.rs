use clap::{Parser, ValueEnum};
use thiserror::Error;

use tenant_manager_core::storage::StoreSettings;

/// Storage backend selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreBackend {
    /// AWS DynamoDB (requires the `dynamodb` feature).
    Dynamodb,
    /// Process-local store, for development and tests.
    Memory,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Tenant manager - create, read, update, delete and list tenants
///
/// Loaded once at startup from flags and environment variables, then shared
/// read-only for the lifetime of the process.
#[derive(Parser, Debug, Clone)]
#[command(name = "tenant_manager")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "3003", env = "PORT")]
    pub port: u16,

    /// Name of the tenant table
    #[arg(long, default_value = "TenantBootstrap", env = "TENANT_TABLE_NAME")]
    pub table_name: String,

    /// AWS region of the tenant table
    #[arg(long, default_value = "us-east-1", env = "AWS_REGION")]
    pub region: String,

    /// Custom store endpoint (local DynamoDB, LocalStack)
    #[arg(long, env = "AWS_ENDPOINT_URL")]
    pub endpoint_url: Option<String>,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty", env = "LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Service name reported by the health check
    #[arg(long, default_value = "Tenant Manager", env = "SERVICE_NAME")]
    pub service_name: String,

    /// Storage backend
    #[arg(long = "store", value_enum, default_value = "dynamodb", env = "TENANT_STORE")]
    pub store: StoreBackend,

    /// HS256 secret used to verify caller tokens
    #[arg(long, env = "TOKEN_SECRET", hide_env_values = true)]
    pub token_secret: Option<String>,

    /// Expected token issuer (not checked when unset)
    #[arg(long, env = "TOKEN_ISSUER")]
    pub token_issuer: Option<String>,

    /// Token claim carrying the caller's tenant id
    #[arg(long, default_value = "custom:tenant_id", env = "TENANT_CLAIM")]
    pub tenant_claim: String,

    /// Token claim carrying the caller's role
    #[arg(long, default_value = "custom:role", env = "SYSTEM_ROLE_CLAIM")]
    pub system_role_claim: String,

    /// Role value granting access to every tenant (blank disables it)
    #[arg(long, default_value = "SystemAdmin", env = "SYSTEM_ROLE")]
    pub system_role: String,

    /// Report failure classes through HTTP status codes instead of a flat 400
    #[arg(long, env = "DETAILED_ERRORS")]
    pub detailed_errors: bool,
}

impl Config {
    /// Checks settings that have no usable default.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.table_name.trim().is_empty() {
            return Err(ConfigError::Empty("table name"));
        }
        if self.service_name.trim().is_empty() {
            return Err(ConfigError::Empty("service name"));
        }
        if self.tenant_claim.trim().is_empty() {
            return Err(ConfigError::Empty("tenant claim"));
        }
        match self.token_secret.as_deref() {
            Some(secret) if !secret.is_empty() => Ok(()),
            _ => Err(ConfigError::Empty("token secret")),
        }
    }

    /// The role claim and value that grant system scope, if enabled.
    pub fn system_role(&self) -> Option<(&str, &str)> {
        let claim = self.system_role_claim.trim();
        let value = self.system_role.trim();
        if claim.is_empty() || value.is_empty() {
            return None;
        }
        Some((claim, value))
    }

    /// Store location settings handed to every table handle.
    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            region: self.region.clone(),
            endpoint_url: self.endpoint_url.clone(),
        }
    }

    /// Default tracing directives for this service.
    pub fn default_log_directives(&self) -> String {
        format!(
            "tenant_manager={level},tower_http={level}",
            level = self.log_level
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::parse_from(["tenant_manager"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["tenant_manager"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = parse(&[
            "--port",
            "8080",
            "--table-name",
            "Tenants",
            "--store",
            "memory",
            "--log-format",
            "json",
            "--token-secret",
            "s3cret",
            "--detailed-errors",
        ]);

        assert_eq!(config.port, 8080);
        assert_eq!(config.table_name, "Tenants");
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.token_secret.as_deref(), Some("s3cret"));
        assert!(config.detailed_errors);
    }

    #[test]
    fn test_validate_requires_token_secret() {
        let mut config = parse(&["--token-secret", "s3cret"]);
        assert_eq!(config.validate(), Ok(()));

        config.token_secret = None;
        assert_eq!(config.validate(), Err(ConfigError::Empty("token secret")));
    }

    #[test]
    fn test_validate_rejects_blank_table_name() {
        let mut config = parse(&["--token-secret", "s3cret"]);
        config.table_name = "  ".to_string();
        assert_eq!(config.validate(), Err(ConfigError::Empty("table name")));
    }

    #[test]
    fn test_store_settings_carry_region_and_endpoint() {
        let config = parse(&[
            "--region",
            "eu-west-1",
            "--endpoint-url",
            "http://localhost:8000",
        ]);

        let settings = config.store_settings();

        assert_eq!(settings.region, "eu-west-1");
        assert_eq!(
            settings.endpoint_url.as_deref(),
            Some("http://localhost:8000")
        );
    }

    #[test]
    fn test_system_role_defaults_and_disabling() {
        let config = parse(&[]);
        assert_eq!(config.system_role(), Some(("custom:role", "SystemAdmin")));

        let config = parse(&["--system-role", ""]);
        assert_eq!(config.system_role(), None);
    }

    #[test]
    fn test_default_log_directives() {
        let config = parse(&["--log-level", "debug"]);
        assert_eq!(
            config.default_log_directives(),
            "tenant_manager=debug,tower_http=debug"
        );
    }
}
