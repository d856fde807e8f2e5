// crates/gasledger-core/src/error.rs

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Structural failures detected before or during stream processing. Any of
/// these aborts the whole customer stream; the processor never returns a
/// partial or silently truncated row list.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("duplicate reading id {id} in input stream")]
    DuplicateId { id: i64 },

    #[error("reading {id} at {recorded_at} breaks ascending order (previous reading {prev_id} at {prev_recorded_at})")]
    OutOfOrder {
        id: i64,
        recorded_at: DateTime<Utc>,
        prev_id: i64,
        prev_recorded_at: DateTime<Utc>,
    },

    #[error("readings {prev_id} and {id} share recorded_at {recorded_at} outside a sanctioned transaction tie")]
    UnsanctionedTie {
        id: i64,
        prev_id: i64,
        recorded_at: DateTime<Utc>,
    },
}

pub type Result<T> = std::result::Result<T, ProcessError>;
