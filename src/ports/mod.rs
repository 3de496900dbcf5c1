//! Ports (trait boundaries) for external dependencies.
//!
//! These traits are owned by the domain and implemented by adapters in the
//! infrastructure layer, keeping the stores independent of any particular
//! storage mechanism.

pub mod repository;

pub use repository::{HistoryRepository, KnowledgeRepository};
