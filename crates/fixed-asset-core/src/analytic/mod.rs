//! Analytic (cost-centre) distribution of invoice lines.
//!
//! Template resolution from partner/product/company stays with the caller;
//! this module only applies an already-resolved template.

pub mod distribution;
pub mod model;

pub use model::{
    Account, AccountConfig, AnalyticAccount, AnalyticDistributionLine,
    AnalyticDistributionTemplate, AnalyticDistributionType, AnalyticMoveLine,
    AnalyticMoveLineStatus, InvoiceLine, AXIS_COUNT,
};
