//! Tonehub server core.
//!
//! Wires a preference engine onto HTTP: builds the [`app::AppState`] from
//! the configured store adapters and exposes the settings API under
//! `/api/prefs`. Everything preference-semantic lives in `tonehub-prefs`;
//! this crate is request/response glue.

#![forbid(unsafe_code)]

pub mod app;
pub mod prefs;
pub mod prelude;
pub mod routes;
pub mod types;

use crate::prelude::*;

pub use crate::app::{App, AppState, ServerMode, TonehubOpts};

/// Builds the app state and serves the API until shutdown
pub async fn run(opts: TonehubOpts) -> ThResult<()> {
	tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_target(false)
		.init();
	info!("Tonehub v{}", app::VERSION);

	let app = AppState::new(opts)?;
	let listen = app.opts.listen.clone();
	let router = routes::init(app);

	let listener = tokio::net::TcpListener::bind(listen.as_ref()).await?;
	info!("Listening on {}", listen);
	axum::serve(listener, router).await?;
	Ok(())
}

// vim: ts=4
