pub use crate::app::App;
pub use tonehub_types::error::{Error, ThResult};
pub use tonehub_types::types::{ClientCtx, Timestamp, now};

pub use tracing::{debug, debug_span, error, error_span, info, info_span, warn, warn_span};

// vim: ts=4
