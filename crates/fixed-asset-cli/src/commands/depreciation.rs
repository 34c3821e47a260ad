use clap::{Args, ValueEnum};
use serde_json::Value;

use fixed_asset_core::fixed_asset::generation::{self, ScheduleRequest};
use fixed_asset_core::fixed_asset::model::{FixedAsset, ScheduleKind};
use fixed_asset_core::fixed_asset::prorata::compute_prorata_temporis;
use fixed_asset_core::fixed_asset::revaluation::{self, RescaleRequest, SplitRequest};
use fixed_asset_core::fixed_asset::schedule::ScheduleContext;

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ScheduleChoice {
    Fiscal,
    Economic,
    Both,
}

impl ScheduleChoice {
    fn kinds(self) -> Vec<ScheduleKind> {
        match self {
            Self::Fiscal => vec![ScheduleKind::Fiscal],
            Self::Economic => vec![ScheduleKind::Economic],
            Self::Both => vec![ScheduleKind::Fiscal, ScheduleKind::Economic],
        }
    }
}

/// Arguments for schedule generation
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON input file (a schedule request)
    #[arg(long)]
    pub input: Option<String>,

    /// Override the schedules listed in the request
    #[arg(long)]
    pub schedule: Option<ScheduleChoice>,
}

/// Arguments for the prorata temporis factor
#[derive(Args)]
pub struct ProrataArgs {
    /// Path to JSON input file (an asset)
    #[arg(long)]
    pub input: Option<String>,

    /// Schedule whose start date bounds the first period
    #[arg(long, default_value = "fiscal")]
    pub schedule: ScheduleChoice,
}

/// Arguments for rescaling an asset
#[derive(Args)]
pub struct RescaleArgs {
    /// Path to JSON input file (asset and ratio)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for splitting an asset
#[derive(Args)]
pub struct SplitArgs {
    /// Path to JSON input file (asset, ratio and new reference)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut request: ScheduleRequest =
        input::read_input(args.input.as_deref(), "schedule generation")?;
    if let Some(choice) = args.schedule {
        request.schedules = choice.kinds();
    }
    let result = generation::generate_depreciation(&request)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_prorata(args: ProrataArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let asset: FixedAsset = input::read_input(args.input.as_deref(), "prorata temporis")?;
    let mut factors = serde_json::Map::new();
    for kind in args.schedule.kinds() {
        let ctx = ScheduleContext::for_schedule(&asset, kind)?;
        let prorata = compute_prorata_temporis(&ctx)?;
        factors.insert(
            format!("{kind}_prorata_temporis"),
            serde_json::to_value(prorata)?,
        );
    }
    Ok(serde_json::json!({ "result": factors }))
}

pub fn run_rescale(args: RescaleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: RescaleRequest = input::read_input(args.input.as_deref(), "rescale")?;
    let result = revaluation::rescale(&request)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_split(args: SplitArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: SplitRequest = input::read_input(args.input.as_deref(), "asset split")?;
    let result = revaluation::split(&request)?;
    Ok(serde_json::to_value(result)?)
}
