use std::time::Duration;

use anyhow::{Context, Result};
use diesel::{
    Connection, PgConnection,
    connection::CacheSize,
    r2d2::{ConnectionManager, CustomizeConnection, Error as R2d2Error, Pool},
};

use crate::config::config_model::Database;

const CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);

pub type PgPoolSquad = Pool<ConnectionManager<PgConnection>>;

/// Poolers in transaction mode cannot share server-side prepared statements.
#[derive(Debug, Default)]
struct NoStatementCache;

impl CustomizeConnection<PgConnection, R2d2Error> for NoStatementCache {
    fn on_acquire(&self, conn: &mut PgConnection) -> std::result::Result<(), R2d2Error> {
        conn.set_prepared_statement_cache_size(CacheSize::Disabled);
        Ok(())
    }
}

/// Builds the shared pool. Fails when no connection opens within the timeout.
pub fn establish_connection(database: &Database) -> Result<PgPoolSquad> {
    let manager = ConnectionManager::<PgConnection>::new(&database.url);
    Pool::builder()
        .max_size(database.max_connections.max(1))
        .connection_timeout(CONNECTION_TIMEOUT)
        .test_on_check_out(true)
        .connection_customizer(Box::new(NoStatementCache))
        .build(manager)
        .context("failed to build postgres connection pool")
}
