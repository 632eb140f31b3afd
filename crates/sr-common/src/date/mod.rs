pub mod received_at;
pub mod precision;
pub mod start_date;

pub use received_at::resolve_received_at;
pub use precision::{DatePrecision, NormalizedDate};
pub use start_date::{normalize_start_date, NormalizedStartDate, StartDatePrecision};
