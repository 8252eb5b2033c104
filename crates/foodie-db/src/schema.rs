//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1: initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Users (provisioned, never mutated by the core)
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD username ON TABLE user TYPE string;
DEFINE FIELD full_name ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD role ON TABLE user TYPE string \
    ASSERT $value IN ['ADMIN', 'MANAGER', 'MEMBER'];
DEFINE FIELD country ON TABLE user TYPE string \
    ASSERT $value IN ['India', 'America'];
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_username ON TABLE user \
    COLUMNS username UNIQUE;

-- =======================================================================
-- Sessions
-- =======================================================================
DEFINE TABLE session SCHEMAFULL;
DEFINE FIELD user_id ON TABLE session TYPE string;
DEFINE FIELD token_hash ON TABLE session TYPE string;
DEFINE FIELD expires_at ON TABLE session TYPE datetime;
DEFINE FIELD created_at ON TABLE session TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_session_token_hash ON TABLE session \
    COLUMNS token_hash UNIQUE;
DEFINE INDEX idx_session_user ON TABLE session COLUMNS user_id;

-- =======================================================================
-- Restaurants (country scope)
-- =======================================================================
DEFINE TABLE restaurant SCHEMAFULL;
DEFINE FIELD name ON TABLE restaurant TYPE string;
DEFINE FIELD description ON TABLE restaurant TYPE option<string>;
DEFINE FIELD country ON TABLE restaurant TYPE string \
    ASSERT $value IN ['India', 'America'];
DEFINE FIELD address ON TABLE restaurant TYPE option<string>;
DEFINE FIELD phone ON TABLE restaurant TYPE option<string>;
DEFINE FIELD created_at ON TABLE restaurant TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_restaurant_country ON TABLE restaurant COLUMNS country;

-- =======================================================================
-- Menu items (country scope via restaurant)
-- =======================================================================
DEFINE TABLE menu_item SCHEMAFULL;
DEFINE FIELD restaurant_id ON TABLE menu_item TYPE string;
DEFINE FIELD name ON TABLE menu_item TYPE string;
DEFINE FIELD description ON TABLE menu_item TYPE option<string>;
DEFINE FIELD price_cents ON TABLE menu_item TYPE int \
    ASSERT $value >= 0;
DEFINE FIELD created_at ON TABLE menu_item TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_menu_item_restaurant ON TABLE menu_item \
    COLUMNS restaurant_id;

-- =======================================================================
-- Payment methods (global)
-- =======================================================================
DEFINE TABLE payment_method SCHEMAFULL;
DEFINE FIELD name ON TABLE payment_method TYPE string;
DEFINE FIELD description ON TABLE payment_method TYPE string \
    DEFAULT '';
DEFINE FIELD active ON TABLE payment_method TYPE bool DEFAULT true;
DEFINE FIELD created_at ON TABLE payment_method TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_payment_method_name ON TABLE payment_method \
    COLUMNS name UNIQUE;

-- =======================================================================
-- Orders (country scope, lines embedded)
-- =======================================================================
DEFINE TABLE food_order SCHEMAFULL;
DEFINE FIELD owner_id ON TABLE food_order TYPE string;
DEFINE FIELD restaurant_id ON TABLE food_order TYPE string;
DEFINE FIELD country ON TABLE food_order TYPE string \
    ASSERT $value IN ['India', 'America'];
DEFINE FIELD status ON TABLE food_order TYPE string \
    ASSERT $value IN ['DRAFT', 'PLACED', 'CANCELLED'];
DEFINE FIELD lines ON TABLE food_order TYPE array<object> DEFAULT [];
DEFINE FIELD lines[*].id ON TABLE food_order TYPE string;
DEFINE FIELD lines[*].menu_item_id ON TABLE food_order TYPE string;
DEFINE FIELD lines[*].quantity ON TABLE food_order TYPE int \
    ASSERT $value >= 1;
DEFINE FIELD lines[*].unit_price_cents ON TABLE food_order TYPE int;
DEFINE FIELD total_cents ON TABLE food_order TYPE int DEFAULT 0;
DEFINE FIELD payment_method_id ON TABLE food_order TYPE option<string>;
DEFINE FIELD notes ON TABLE food_order TYPE option<string>;
DEFINE FIELD revision ON TABLE food_order TYPE int DEFAULT 0;
DEFINE FIELD created_at ON TABLE food_order TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE food_order TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD placed_at ON TABLE food_order TYPE option<datetime>;
DEFINE FIELD cancelled_at ON TABLE food_order TYPE option<datetime>;
DEFINE INDEX idx_order_country ON TABLE food_order COLUMNS country;
DEFINE INDEX idx_order_owner_restaurant ON TABLE food_order \
    COLUMNS owner_id, restaurant_id, status;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
