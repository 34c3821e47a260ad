pub mod analytic;
pub mod depreciation;
