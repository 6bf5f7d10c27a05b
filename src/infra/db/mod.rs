//! Database connection and schema management.
//!
//! The server boots through [`Database::connect`], which applies pending
//! migrations before any request is served. The schema subcommands use
//! the plain connection and drive the migrator explicitly.

use sea_orm::{Database as SeaDatabase, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;

use crate::config::Config;

pub mod migrations;

pub use migrations::Migrator;

/// Owns the sea-orm connection handle shared by the repositories.
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Connect and bring the schema up to date.
    ///
    /// # Panics
    /// Panics if the database is unreachable or a migration fails;
    /// the server cannot serve requests without its store.
    pub async fn connect(config: &Config) -> Self {
        let connection = SeaDatabase::connect(&config.database_url)
            .await
            .expect("Failed to connect to database");

        match Migrator::up(&connection, None).await {
            Ok(()) => tracing::info!("Database connected and migrations applied"),
            Err(e) => {
                tracing::error!("Failed to run migrations: {}", e);
                panic!("Failed to run migrations: {}", e);
            }
        }

        Self { connection }
    }

    /// Connect without touching the schema (migrate and jobs subcommands).
    pub async fn connect_without_migrations(config: &Config) -> Result<Self, DbErr> {
        Ok(Self {
            connection: SeaDatabase::connect(&config.database_url).await?,
        })
    }

    /// Clone of the underlying connection handle for repository wiring.
    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// Apply every pending migration.
    pub async fn run_migrations(&self) -> Result<(), DbErr> {
        Migrator::up(&self.connection, None).await
    }

    /// Undo the most recent migration.
    pub async fn rollback_migration(&self) -> Result<(), DbErr> {
        Migrator::down(&self.connection, Some(1)).await
    }

    /// Every defined migration paired with whether it has been applied.
    pub async fn migration_status(&self) -> Result<Vec<(String, bool)>, DbErr> {
        use sea_orm::{EntityTrait, QueryOrder};
        use sea_orm_migration::seaql_migrations;

        let applied: std::collections::HashSet<String> = seaql_migrations::Entity::find()
            .order_by_asc(seaql_migrations::Column::Version)
            .all(&self.connection)
            .await?
            .into_iter()
            .map(|m| m.version)
            .collect();

        let mut status = Vec::new();
        for migration in Migrator::migrations() {
            let name = migration.name().to_string();
            let is_applied = applied.contains(&name);
            status.push((name, is_applied));
        }

        Ok(status)
    }

    /// Drop everything and rebuild the schema from scratch.
    pub async fn fresh_migrations(&self) -> Result<(), DbErr> {
        Migrator::fresh(&self.connection).await
    }
}
