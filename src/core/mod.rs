//! Core business logic abstractions

pub mod allocation;
pub mod config;
pub mod input;
pub mod log;
pub mod price;
pub mod spreadsheet;
pub mod validation;

// Re-export main types for cleaner imports
pub use allocation::{AllocationRequest, ResultRow, ResultTable};
pub use price::{DateRange, HistoryProvider, PricePoint, PriceSeries};
