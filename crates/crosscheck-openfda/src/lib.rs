//! OpenFDA label ingestion for the crosscheck knowledge base.
//!
//! This crate turns OpenFDA `drug/label.json` payloads into
//! [`InteractionRecord`](crosscheck_core::models::InteractionRecord)s:
//! parsing and severity classification are pure and always available; the
//! HTTP client behind the `remote` feature adds live lookups.

pub mod client;
pub mod labels;

pub use client::*;
pub use labels::*;
