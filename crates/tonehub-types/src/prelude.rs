pub use crate::error::{Error, ThResult};
pub use crate::types::{ClientCtx, Timestamp, now};
pub use crate::value::{Entry, EntryMap, PrefValue, Scalar, Snapshot};

pub use tracing::{debug, debug_span, error, error_span, info, info_span, warn, warn_span};

// vim: ts=4
