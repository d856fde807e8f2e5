// crates/gasledger-core/src/edit_window.rs

use chrono::{DateTime, Duration, Utc};

use crate::types::{Caller, RawReading, Role};

/// How long after persistence an operator may still touch their own reading.
pub const EDIT_WINDOW_HOURS: i64 = 2;

/// Decides whether `caller` may mutate `reading` at instant `now`.
///
/// Admins always may. Operators may only touch their own readings, and only
/// while the window after `created_at` is still open. This single rule gates
/// both the `isEditable` display flag and direct update/delete requests, so
/// the two can never disagree for the same instant.
pub fn is_editable(reading: &RawReading, caller: &Caller, now: DateTime<Utc>) -> bool {
    match caller.role {
        Role::Admin => true,
        Role::Operator => {
            reading.operator_id == caller.id
                && now - reading.created_at <= Duration::hours(EDIT_WINDOW_HOURS)
        }
    }
}
