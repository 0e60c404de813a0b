use axum::{
	Router,
	routing::{delete, get, put},
};

use crate::app::App;
use crate::prefs;

pub fn init(app: App) -> Router {
	Router::new()
		.route("/api/prefs/{ns}", get(prefs::handler::list_prefs))
		.route("/api/prefs/{ns}/{name}", get(prefs::handler::get_pref))
		.route("/api/prefs/{ns}/{name}", put(prefs::handler::update_pref))
		.route("/api/prefs/{ns}/{name}", delete(prefs::handler::delete_pref))
		.with_state(app)
}

// vim: ts=4
