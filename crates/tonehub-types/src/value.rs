//! Preference value model.
//!
//! Values carry an explicit shape tag: a bare `Scalar`, a `Sequence` of
//! scalars, or a `Mapping` of scalars. Containers are never nested further.
//! Shape-coercion decisions in the engine are driven by this tag, never by
//! sniffing runtime types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::Timestamp;

/// Names starting with this prefix are internal: excluded from `all()`
/// enumeration and rejected by the public `set` path outside remote mode.
pub const INTERNAL_PREFIX: char = '_';

/// Remote rows whose text starts with this marker carry a JSON-encoded
/// composite value in the remainder of the row.
pub const JSON_MARKER: &str = "json:";

/// A single scalar preference value
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
	Bool(bool), // Must be before Int to avoid bool -> int coercion
	Int(i64),
	Float(f64),
	Str(Box<str>),
}

/// Scalar equality is numeric across Int/Float and plain otherwise.
/// This is the "equal" of redundant-write suppression: a `set` with a new
/// scalar equal to the current one is a no-op.
impl PartialEq for Scalar {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Scalar::Bool(a), Scalar::Bool(b)) => a == b,
			(Scalar::Int(a), Scalar::Int(b)) => a == b,
			(Scalar::Float(a), Scalar::Float(b)) => a == b,
			(Scalar::Int(a), Scalar::Float(b)) | (Scalar::Float(b), Scalar::Int(a)) => {
				*a as f64 == *b
			}
			(Scalar::Str(a), Scalar::Str(b)) => a == b,
			_ => false,
		}
	}
}

impl Scalar {
	pub fn type_name(&self) -> &'static str {
		match self {
			Scalar::Bool(_) => "bool",
			Scalar::Int(_) => "int",
			Scalar::Float(_) => "float",
			Scalar::Str(_) => "string",
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Scalar::Str(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			Scalar::Int(i) => Some(*i),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Scalar::Bool(b) => Some(*b),
			_ => None,
		}
	}

	/// Row text representation for the remote row store
	pub fn to_row_text(&self) -> Box<str> {
		match self {
			Scalar::Bool(b) => if *b { "1" } else { "0" }.into(),
			Scalar::Int(i) => i.to_string().into(),
			Scalar::Float(f) => f.to_string().into(),
			Scalar::Str(s) => s.clone(),
		}
	}

	/// Reconstruct a scalar from remote row text. Numeric-looking text
	/// becomes a number so values round-trip through the row store.
	pub fn from_row_text(text: &str) -> Self {
		if let Ok(i) = text.parse::<i64>() {
			return Scalar::Int(i);
		}
		if let Ok(f) = text.parse::<f64>() {
			return Scalar::Float(f);
		}
		Scalar::Str(text.into())
	}
}

impl From<bool> for Scalar {
	fn from(v: bool) -> Self {
		Scalar::Bool(v)
	}
}

impl From<i64> for Scalar {
	fn from(v: i64) -> Self {
		Scalar::Int(v)
	}
}

impl From<f64> for Scalar {
	fn from(v: f64) -> Self {
		Scalar::Float(v)
	}
}

impl From<&str> for Scalar {
	fn from(v: &str) -> Self {
		Scalar::Str(v.into())
	}
}

impl From<String> for Scalar {
	fn from(v: String) -> Self {
		Scalar::Str(v.into())
	}
}

/// A stored preference value with its shape tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
	Scalar(Scalar),
	Sequence(Vec<Scalar>),
	Mapping(HashMap<Box<str>, Scalar>),
}

impl PrefValue {
	pub fn shape_name(&self) -> &'static str {
		match self {
			PrefValue::Scalar(_) => "scalar",
			PrefValue::Sequence(_) => "sequence",
			PrefValue::Mapping(_) => "mapping",
		}
	}

	pub fn is_scalar(&self) -> bool {
		matches!(self, PrefValue::Scalar(_))
	}

	pub fn is_sequence(&self) -> bool {
		matches!(self, PrefValue::Sequence(_))
	}

	pub fn as_scalar(&self) -> Option<&Scalar> {
		match self {
			PrefValue::Scalar(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_sequence(&self) -> Option<&[Scalar]> {
		match self {
			PrefValue::Sequence(seq) => Some(seq),
			_ => None,
		}
	}

	pub fn as_mapping(&self) -> Option<&HashMap<Box<str>, Scalar>> {
		match self {
			PrefValue::Mapping(map) => Some(map),
			_ => None,
		}
	}

	/// Force sequence shape: a bare scalar becomes a one-element sequence.
	/// Used both for sticky sequence shape on remote `set` and for the
	/// legacy preference names coerced on remote `get`.
	pub fn into_sequence_value(self) -> PrefValue {
		match self {
			PrefValue::Scalar(s) => PrefValue::Sequence(vec![s]),
			other => other,
		}
	}

	/// Flatten into scalar elements: the multi-value return convention
	pub fn into_elements(self) -> Vec<Scalar> {
		match self {
			PrefValue::Scalar(s) => vec![s],
			PrefValue::Sequence(seq) => seq,
			PrefValue::Mapping(map) => map.into_values().collect(),
		}
	}
}

impl From<Scalar> for PrefValue {
	fn from(v: Scalar) -> Self {
		PrefValue::Scalar(v)
	}
}

impl From<bool> for PrefValue {
	fn from(v: bool) -> Self {
		PrefValue::Scalar(Scalar::Bool(v))
	}
}

impl From<i64> for PrefValue {
	fn from(v: i64) -> Self {
		PrefValue::Scalar(Scalar::Int(v))
	}
}

impl From<f64> for PrefValue {
	fn from(v: f64) -> Self {
		PrefValue::Scalar(Scalar::Float(v))
	}
}

impl From<&str> for PrefValue {
	fn from(v: &str) -> Self {
		PrefValue::Scalar(Scalar::Str(v.into()))
	}
}

impl From<String> for PrefValue {
	fn from(v: String) -> Self {
		PrefValue::Scalar(Scalar::Str(v.into()))
	}
}

impl From<Vec<Scalar>> for PrefValue {
	fn from(v: Vec<Scalar>) -> Self {
		PrefValue::Sequence(v)
	}
}

impl From<HashMap<Box<str>, Scalar>> for PrefValue {
	fn from(v: HashMap<Box<str>, Scalar>) -> Self {
		PrefValue::Mapping(v)
	}
}

/// A stored entry: the value plus its last-modified time.
/// Remote mode does not track modification times and leaves it at 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
	#[serde(rename = "v")]
	pub value: PrefValue,
	#[serde(rename = "t", default)]
	pub modified: Timestamp,
}

impl Entry {
	pub fn new(value: PrefValue, modified: Timestamp) -> Self {
		Self { value, modified }
	}
}

/// Entry map of one scope
pub type EntryMap = HashMap<Box<str>, Entry>;

/// The durable unit handed to a snapshot store: a namespace's global
/// entries plus the per-client entry maps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
	#[serde(default)]
	pub prefs: EntryMap,
	#[serde(default)]
	pub clients: HashMap<Box<str>, EntryMap>,
}


// vim: ts=4
