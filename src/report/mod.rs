//! Report rendering and shop-level dashboard metrics.

pub mod csv;
mod dashboard;

pub use dashboard::{CoverageRiskScorer, DashboardService, DashboardSummary, RiskScorer};
