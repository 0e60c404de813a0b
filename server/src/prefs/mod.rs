//! Preference API surface

pub mod handler;

// vim: ts=4
