use anyhow::{Context, Result};

/// CLI configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Upper bound on pooled connections (default: `5`).
    pub max_connections: u32,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                    | Default    |
    /// |----------------------------|------------|
    /// | `DATABASE_URL`             | (required) |
    /// | `DATABASE_MAX_CONNECTIONS` | `5`        |
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let max_connections = parse_max_connections(std::env::var("DATABASE_MAX_CONNECTIONS").ok())?;

        Ok(Self {
            database_url,
            max_connections,
        })
    }
}

fn parse_max_connections(raw: Option<String>) -> Result<u32> {
    match raw {
        None => Ok(5),
        Some(value) => value
            .trim()
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_connections_defaults_to_five() {
        assert_eq!(parse_max_connections(None).unwrap(), 5);
    }

    #[test]
    fn max_connections_parsed() {
        assert_eq!(parse_max_connections(Some(" 12 ".to_string())).unwrap(), 12);
        assert!(parse_max_connections(Some("many".to_string())).is_err());
    }
}
