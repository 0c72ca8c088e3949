pub mod amortization;
pub mod analysis;
pub mod brrrr;
pub mod error;
pub mod income;
pub mod kpi;
pub mod returns;
pub mod scenario;
pub mod types;

pub use error::DealMetricsError;
pub use types::*;

/// Standard result type for all deal-metrics operations
pub type DealMetricsResult<T> = Result<T, DealMetricsError>;
