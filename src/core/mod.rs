//! Core business logic abstractions

pub mod analytics;
pub mod auth;
pub mod cache;
pub mod calculator;
pub mod config;
pub mod deposit;
pub mod error;
pub mod log;
pub mod market;
pub mod view;

// Re-export main types for cleaner imports
pub use calculator::{
    ComparisonData, FinancialCalculation, GrowthPoint, InstrumentType, ReferenceRates,
    compute_comparisons, compute_maturity,
};
pub use error::{AuthError, CalcError};
pub use market::{MarketDataProvider, MarketSnapshot};
pub use view::View;
