//! Crosscheck Core Library
//!
//! Pairwise drug-interaction resolution and aggregation engine for
//! multi-prescription safety checks.
//!
//! # Architecture
//!
//! ```text
//! Drug list / Prescriptions
//!         │
//!         ▼
//!   Pair Resolver ──── normalize + dedupe ── C(n,2) pair enumeration
//!         │                                        │
//!         │                        concurrent, bounded lookups
//!         │                                        │
//!         ▼                                        ▼
//!   Knowledge Source (local SQLite / builtin / layered / remote)
//!         │
//!         ▼
//!   Severity Aggregator ── counts, sort, safe flag
//!         │
//!         ├──────────────► AggregateReport (single-list mode)
//!         │
//!         ▼  (multi-prescription mode)
//!   Provenance Tracker ── cross-source flags
//!         │
//!         ▼
//!   Schedule Merge ── unified daily slots + conflict markers
//!         │
//!         ▼
//!     MultiRxReport
//! ```
//!
//! # Core Principle
//!
//! **An unresolved pair is never "safe".** A failed lookup lands in the
//! `unknown` tier and blocks the all-clear exactly like a critical finding;
//! partial failure must never look identical to confirmed safety.
//!
//! # Modules
//!
//! - [`db`]: SQLite knowledge base (interactions + drug aliases)
//! - [`models`]: Domain types (Drug, InteractionRecord, reports, schedule)
//! - [`source`]: Knowledge source trait and implementations
//! - [`resolver`]: Normalizer and concurrent pair resolver
//! - [`aggregate`]: Severity aggregation
//! - [`provenance`]: Cross-prescription provenance tracking
//! - [`schedule`]: Daily schedule merge
//! - [`dosage`]: Daily dose sanity checks
//! - [`engine`]: Entry points for the presentation layer

pub mod aggregate;
pub mod db;
pub mod dosage;
pub mod engine;
pub mod models;
pub mod provenance;
pub mod resolver;
pub mod schedule;
pub mod source;

// Re-export commonly used types
pub use aggregate::aggregate as aggregate_outcome;
pub use db::Database;
pub use engine::InteractionEngine;
pub use models::{
    AggregateReport, AnnotatedInteraction, Drug, DrugPair, InteractionRecord, MultiRxReport,
    Prescription, ScheduleEntry, Severity, SeverityCounts, Slot, UnresolvedPair,
};
pub use provenance::{annotate, ProvenanceMap};
pub use resolver::{CancelFlag, Normalizer, PairResolver, ResolveOutcome, ResolverError};
pub use source::{KnowledgeSource, LayeredSource, MemorySource, SourceError, SqliteSource};
