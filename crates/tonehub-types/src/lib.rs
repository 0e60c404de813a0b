//! Shared types, adapter traits, and core utilities for the Tonehub
//! preference engine.
//!
//! This crate contains the foundational types that are shared between the
//! engine crate and all adapter implementations. Extracting these into a
//! separate crate allows adapter crates to compile in parallel with the
//! engine and server crates.

pub mod error;
pub mod notify;
pub mod prelude;
pub mod store_adapter;
pub mod types;
pub mod value;

// vim: ts=4
