//! HTTP server command for the todo API

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use todo_server::db::{create_pool_with_options, migrations, pool, MemoryTodoStore, PgTodoStore, TodoStore};
use todo_server::http::{run_server, ServerConfig};
use todo_server::{TimestampPolicy, TodoService};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "TODO_BIND", default_value = "127.0.0.1:3030")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Keep todos in memory instead of PostgreSQL (lost on exit)
    #[arg(long)]
    pub in_memory: bool,

    /// Stamp createdAt/updatedAt with the server clock instead of trusting the client
    #[arg(long, env = "TODO_SERVER_TIMESTAMPS")]
    pub server_timestamps: bool,

    /// Maximum database connections in the pool
    #[arg(long, default_value_t = pool::DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Don't create the todos table on startup
    #[arg(long)]
    pub skip_migrations: bool,
}

impl ServeArgs {
    fn timestamp_policy(&self) -> TimestampPolicy {
        if self.server_timestamps {
            TimestampPolicy::ServerAssigned
        } else {
            TimestampPolicy::ClientSupplied
        }
    }

    async fn store(&self) -> Result<Arc<dyn TodoStore>> {
        if self.in_memory {
            if self.database_url.is_some() {
                tracing::warn!("--in-memory set, ignoring database URL");
            }
            tracing::info!("Using in-memory todo store");
            return Ok(Arc::new(MemoryTodoStore::new()));
        }

        let database_url = self
            .database_url
            .as_deref()
            .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env or .env, or pass --in-memory")?;

        let pool = create_pool_with_options(database_url, self.max_connections)
            .await
            .context("Failed to create database pool")?;

        if !self.skip_migrations {
            migrations::run(&pool)
                .await
                .context("Failed to run migrations")?;
        }

        Ok(Arc::new(PgTodoStore::new(pool)))
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    tracing::info!("Starting todo server on {}", args.bind);

    let service = TodoService::new(args.store().await?, args.timestamp_policy());
    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    // Blocks until shutdown
    run_server(service, config).await.context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ServeArgs {
        ServeArgs::try_parse_from(std::iter::once("serve").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn timestamp_flag_selects_policy() {
        assert_eq!(
            parse(&["--in-memory"]).timestamp_policy(),
            TimestampPolicy::ClientSupplied
        );
        assert_eq!(
            parse(&["--in-memory", "--server-timestamps"]).timestamp_policy(),
            TimestampPolicy::ServerAssigned
        );
    }

    #[test]
    fn bind_address_parses() {
        let args = parse(&["--bind", "0.0.0.0:8080", "--in-memory"]);
        assert_eq!(args.bind.port(), 8080);
    }

    #[tokio::test]
    async fn in_memory_store_needs_no_database() {
        let args = parse(&["--in-memory"]);
        assert!(args.store().await.is_ok());
    }
}
