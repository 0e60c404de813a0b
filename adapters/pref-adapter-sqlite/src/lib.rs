//! SQLite row store.
//!
//! Stores preferences as per-client, per-index rows. A sequence write
//! replaces the key's full row set inside one transaction so readers never
//! see a mix of old and new indexes.

use std::path::Path;

use async_trait::async_trait;
use sqlx::{
	Row,
	sqlite::{self, SqlitePool},
};

use tonehub_types::prelude::*;
use tonehub_types::store_adapter::{PrefRow, RowStore};

mod schema;
use schema::init_db;

fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

#[derive(Debug)]
pub struct PrefAdapterSqlite {
	db: SqlitePool,
}

impl PrefAdapterSqlite {
	pub async fn new(path: impl AsRef<Path>) -> ThResult<Self> {
		let opts = sqlite::SqliteConnectOptions::new()
			.filename(path.as_ref())
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(inspect)
			.or(Err(Error::DbError))?;

		init_db(&db).await.inspect_err(inspect).or(Err(Error::DbError))?;

		Ok(Self { db })
	}
}

#[async_trait]
impl RowStore for PrefAdapterSqlite {
	/// Reads a key's rows in index order
	async fn read_rows(&self, client_id: &str, key: &str) -> ThResult<Vec<PrefRow>> {
		let rows = sqlx::query(
			"SELECT idx, value FROM prefs WHERE client_id = ? AND name = ? ORDER BY idx",
		)
		.bind(client_id)
		.bind(key)
		.fetch_all(&self.db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

		Ok(rows
			.into_iter()
			.map(|row| {
				let value: Option<String> = row.get("value");
				PrefRow { idx: row.get("idx"), value: value.unwrap_or_default().into() }
			})
			.collect())
	}

	/// Replaces a key's row set with a single scalar row
	async fn write_scalar(&self, client_id: &str, key: &str, value: &str) -> ThResult<()> {
		let mut tx = self.db.begin().await.inspect_err(inspect).map_err(|_| Error::DbError)?;

		sqlx::query("DELETE FROM prefs WHERE client_id = ? AND name = ?")
			.bind(client_id)
			.bind(key)
			.execute(&mut *tx)
			.await
			.inspect_err(inspect)
			.map_err(|_| Error::DbError)?;

		sqlx::query("INSERT INTO prefs (client_id, name, idx, value) VALUES (?, ?, 0, ?)")
			.bind(client_id)
			.bind(key)
			.bind(value)
			.execute(&mut *tx)
			.await
			.inspect_err(inspect)
			.map_err(|_| Error::DbError)?;

		tx.commit().await.inspect_err(inspect).map_err(|_| Error::DbError)
	}

	/// Replaces a key's row set with one row per sequence index
	async fn write_sequence(&self, client_id: &str, key: &str, values: &[Box<str>]) -> ThResult<()> {
		let mut tx = self.db.begin().await.inspect_err(inspect).map_err(|_| Error::DbError)?;

		sqlx::query("DELETE FROM prefs WHERE client_id = ? AND name = ?")
			.bind(client_id)
			.bind(key)
			.execute(&mut *tx)
			.await
			.inspect_err(inspect)
			.map_err(|_| Error::DbError)?;

		for (idx, value) in values.iter().enumerate() {
			sqlx::query("INSERT INTO prefs (client_id, name, idx, value) VALUES (?, ?, ?, ?)")
				.bind(client_id)
				.bind(key)
				.bind(idx as i64)
				.bind(value.as_ref())
				.execute(&mut *tx)
				.await
				.inspect_err(inspect)
				.map_err(|_| Error::DbError)?;
		}

		tx.commit().await.inspect_err(inspect).map_err(|_| Error::DbError)
	}

	/// Drops a key's rows
	async fn clear_rows(&self, client_id: &str, key: &str) -> ThResult<()> {
		sqlx::query("DELETE FROM prefs WHERE client_id = ? AND name = ?")
			.bind(client_id)
			.bind(key)
			.execute(&self.db)
			.await
			.inspect_err(inspect)
			.map_err(|_| Error::DbError)?;
		Ok(())
	}
}

// vim: ts=4
