use clap::Args;
use serde_json::Value;

use fixed_asset_core::analytic::distribution::{self, AnalyticDistributionRequest};

use crate::input;

/// Arguments for invoice line analytic distribution
#[derive(Args)]
pub struct AnalyticDistributionArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_distribution(
    args: AnalyticDistributionArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request: AnalyticDistributionRequest =
        input::read_input(args.input.as_deref(), "analytic distribution")?;
    let result = distribution::distribute(&request)?;
    Ok(serde_json::to_value(result)?)
}
