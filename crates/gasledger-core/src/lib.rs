pub mod edit_window;
pub mod error;
pub mod flow;
pub mod operations;
pub mod pipeline;
pub mod segment;
pub mod types;
pub mod validation;

pub use edit_window::{is_editable, EDIT_WINDOW_HOURS};
pub use error::{ProcessError, Result};
pub use operations::{change_rows, dumping_rows, DumpingTransfer, StorageChange};
pub use pipeline::process;
pub use types::{
    remarks, AnnotatedReading, Caller, DumpingTotalRow, FlowMeter, NewReading, OperationType,
    ProcessedRow, RawReading, ReadingRow, Role, SummaryRow,
};

#[cfg(test)]
mod tests;
