//! Connection configuration and establishment.
//!
//! Both databases are configured the same way: discrete host/port/database/
//! user/password parameters, each overridable through its own environment
//! variable, each with a local-default fallback matching the docker-compose
//! setup this tool is normally pointed at.

use crate::error::SinkError;
use clap::Args;
use tokio_postgres::{Client, NoTls};
use tracing::{debug, error};

/// Transactional source database options.
#[derive(Args, Clone, Debug)]
pub struct SourceDbOpts {
    /// Source database host
    #[arg(long, env = "SOURCE_DB_HOST", default_value = "localhost")]
    pub source_db_host: String,

    /// Source database port
    #[arg(long, env = "SOURCE_DB_PORT", default_value = "5433")]
    pub source_db_port: u16,

    /// Source database name
    #[arg(long, env = "SOURCE_DB_NAME", default_value = "source_db")]
    pub source_db_name: String,

    /// Source database user
    #[arg(long, env = "SOURCE_DB_USER", default_value = "user")]
    pub source_db_user: String,

    /// Source database password
    #[arg(long, env = "SOURCE_DB_PASSWORD", default_value = "password")]
    pub source_db_password: String,
}

impl SourceDbOpts {
    pub fn params(&self) -> ConnParams {
        ConnParams {
            host: self.source_db_host.clone(),
            port: self.source_db_port,
            dbname: self.source_db_name.clone(),
            user: self.source_db_user.clone(),
            password: self.source_db_password.clone(),
        }
    }
}

/// Warehouse database options.
#[derive(Args, Clone, Debug)]
pub struct WarehouseDbOpts {
    /// Warehouse database host
    #[arg(long, env = "DWH_DB_HOST", default_value = "localhost")]
    pub dwh_db_host: String,

    /// Warehouse database port
    #[arg(long, env = "DWH_DB_PORT", default_value = "5434")]
    pub dwh_db_port: u16,

    /// Warehouse database name
    #[arg(long, env = "DWH_DB_NAME", default_value = "warehouse_db")]
    pub dwh_db_name: String,

    /// Warehouse database user
    #[arg(long, env = "DWH_DB_USER", default_value = "user")]
    pub dwh_db_user: String,

    /// Warehouse database password
    #[arg(long, env = "DWH_DB_PASSWORD", default_value = "password")]
    pub dwh_db_password: String,
}

impl WarehouseDbOpts {
    pub fn params(&self) -> ConnParams {
        ConnParams {
            host: self.dwh_db_host.clone(),
            port: self.dwh_db_port,
            dbname: self.dwh_db_name.clone(),
            user: self.dwh_db_user.clone(),
            password: self.dwh_db_password.clone(),
        }
    }
}

/// Resolved connection parameters for one database.
#[derive(Clone, Debug)]
pub struct ConnParams {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
}

impl ConnParams {
    /// Reject parameters that cannot possibly connect.
    pub fn validate(&self) -> Result<(), SinkError> {
        for (field, value) in [
            ("host", &self.host),
            ("dbname", &self.dbname),
            ("user", &self.user),
        ] {
            if value.trim().is_empty() {
                return Err(SinkError::Config(format!(
                    "connection parameter {field} must not be empty"
                )));
            }
        }
        if self.port == 0 {
            return Err(SinkError::Config("connection port must not be 0".into()));
        }
        Ok(())
    }

    /// Connect and smoke-test the session.
    ///
    /// The returned client owns the session; dropping it closes the
    /// connection on every exit path.
    pub async fn connect(&self) -> Result<Client, SinkError> {
        self.validate()?;

        debug!(
            host = %self.host,
            port = self.port,
            dbname = %self.dbname,
            "connecting to PostgreSQL"
        );

        let mut config = tokio_postgres::Config::new();
        config
            .host(&self.host)
            .port(self.port)
            .dbname(&self.dbname)
            .user(&self.user)
            .password(&self.password);

        let (client, connection) = config.connect(NoTls).await?;

        // Drive the connection until the client drops.
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("PostgreSQL connection error: {e}");
            }
        });

        client.simple_query("SELECT 1").await?;
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_params() -> ConnParams {
        ConnParams {
            host: "localhost".to_string(),
            port: 5433,
            dbname: "source_db".to_string(),
            user: "user".to_string(),
            password: "password".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_local_defaults() {
        local_params().validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        let mut params = local_params();
        params.host = "  ".to_string();
        assert!(matches!(params.validate(), Err(SinkError::Config(_))));

        let mut params = local_params();
        params.dbname = String::new();
        assert!(matches!(params.validate(), Err(SinkError::Config(_))));

        let mut params = local_params();
        params.port = 0;
        assert!(matches!(params.validate(), Err(SinkError::Config(_))));
    }

    #[test]
    fn test_connect_fails_fast_on_invalid_params() {
        let mut params = local_params();
        params.host = String::new();
        let result = tokio_test::block_on(params.connect());
        assert!(matches!(result, Err(SinkError::Config(_))));
    }

    #[test]
    fn test_opts_lower_into_params() {
        let opts = SourceDbOpts {
            source_db_host: "db.internal".to_string(),
            source_db_port: 5432,
            source_db_name: "fixtures".to_string(),
            source_db_user: "seeder".to_string(),
            source_db_password: "secret".to_string(),
        };
        let params = opts.params();
        assert_eq!(params.host, "db.internal");
        assert_eq!(params.port, 5432);
        assert_eq!(params.dbname, "fixtures");
    }
}
