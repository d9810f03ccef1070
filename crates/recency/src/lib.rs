//! Recency classification and aggregation engine.
//!
//! Pure transforms over an immutable snapshot of purchase records: no I/O,
//! no retained state, deterministic for a given record set and reference
//! time. Missing or malformed inputs degrade to absent derived fields
//! rather than errors.

pub mod aggregate;
pub mod classify;
pub mod filter;

pub use aggregate::aggregate;
pub use classify::classify;
pub use filter::{filter_by_band, list_inactive, search};
