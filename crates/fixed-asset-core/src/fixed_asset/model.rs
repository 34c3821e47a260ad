//! Fixed-asset entities as seen by the depreciation engine.
//!
//! A [`FixedAsset`] carries two independently parameterised depreciation
//! plans: the fiscal plan (statutory books) and the economic plan
//! (management books). Each plan owns its own ordered list of
//! [`FixedAssetLine`]s.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// How each period's depreciation is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComputationMethod {
    /// Constant share of the original base every period.
    #[default]
    Linear,
    /// Declining balance with a coefficient, switching to linear when the
    /// straight-line amount over the remaining periods is larger.
    Degressive,
}

/// Lifecycle state of a depreciation line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStatus {
    #[default]
    Planned,
    Realized,
}

/// Which of the two parallel schedules a line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleKind {
    Fiscal,
    Economic,
}

impl std::fmt::Display for ScheduleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fiscal => write!(f, "fiscal"),
            Self::Economic => write!(f, "economic"),
        }
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// Category flags controlling the first-period proration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedAssetCategory {
    #[serde(default)]
    pub name: String,
    /// Prorate the first period when acquisition and first depreciation differ
    #[serde(default)]
    pub is_prorata_temporis: bool,
    /// Use the US 30/360 day count instead of the European one
    #[serde(default)]
    pub is_us_prorata_temporis: bool,
}

/// Parameters of one depreciation schedule plus the lines generated so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepreciationPlan {
    pub number_of_depreciation: u32,
    #[serde(default)]
    pub computation_method: ComputationMethod,
    /// Required for the degressive method
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degressive_coef: Option<Rate>,
    pub periodicity_in_month: u32,
    /// Start date of the schedule. Only read for the economic plan; the
    /// fiscal plan starts on the asset's first depreciation date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_depreciation_date: Option<NaiveDate>,
    /// `None` means the plan has never been generated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<FixedAssetLine>>,
}

/// An asset with its acquisition data and both depreciation plans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedAsset {
    pub reference: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: FixedAssetCategory,
    pub acquisition_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_depreciation_date: Option<NaiveDate>,
    pub gross_value: Money,
    /// Excluded from the economic depreciation base
    #[serde(default)]
    pub residual_value: Money,
    pub fiscal: DepreciationPlan,
    pub economic: DepreciationPlan,
}

impl FixedAsset {
    pub fn plan(&self, kind: ScheduleKind) -> &DepreciationPlan {
        match kind {
            ScheduleKind::Fiscal => &self.fiscal,
            ScheduleKind::Economic => &self.economic,
        }
    }

    pub fn plan_mut(&mut self, kind: ScheduleKind) -> &mut DepreciationPlan {
        match kind {
            ScheduleKind::Fiscal => &mut self.fiscal,
            ScheduleKind::Economic => &mut self.economic,
        }
    }
}

/// One depreciation period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedAssetLine {
    /// Reference of the owning asset
    pub asset_reference: String,
    #[serde(default)]
    pub status: LineStatus,
    pub depreciation_date: NaiveDate,
    pub depreciation: Money,
    pub cumulative_depreciation: Money,
    /// Net book value after this period
    pub accounting_value: Money,
    pub depreciation_base: Money,
    /// Non-zero when the line was adjusted by hand
    #[serde(default)]
    pub corrected_accounting_value: Money,
    #[serde(default)]
    pub impairment_value: Money,
    pub type_select: ScheduleKind,
}

impl FixedAssetLine {
    /// A line the engine may still treat as untouched: planned and not corrected.
    pub fn is_uncorrected_planned(&self) -> bool {
        self.status == LineStatus::Planned && self.corrected_accounting_value == Decimal::ZERO
    }
}
