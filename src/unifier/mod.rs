//! Alignment of channel spend with business metrics on a shared date key.

pub mod join;

pub use join::{unify, BusinessDay, JoinMode, JoinSummary, UnifiedRecord, UnifiedTable};
