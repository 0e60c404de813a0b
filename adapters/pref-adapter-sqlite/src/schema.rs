//! Database schema initialization
//!
//! Creates the preference row table on first open. One row per scalar
//! value, one row per sequence index; the primary key makes writes
//! idempotent per (client, key, index).

use sqlx::SqlitePool;

pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS prefs (
		client_id text NOT NULL,
		name text NOT NULL,
		idx integer NOT NULL DEFAULT 0,
		value text,
		PRIMARY KEY(client_id, name, idx)
	)",
	)
	.execute(&mut *tx)
	.await?;

	sqlx::query("CREATE INDEX IF NOT EXISTS idx_prefs_client ON prefs (client_id)")
		.execute(&mut *tx)
		.await?;

	tx.commit().await?;
	Ok(())
}

// vim: ts=4
