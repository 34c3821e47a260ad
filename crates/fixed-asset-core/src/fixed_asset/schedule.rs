//! Binding between an asset and one of its two depreciation schedules.
//!
//! The engine never reads [`FixedAsset`] directly. It receives a
//! [`ScheduleContext`] resolved once per schedule plus a
//! [`ScheduleProgress`] describing the lines already generated.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::FixedAssetError;
use crate::types::{Money, Rate};
use crate::FixedAssetResult;

use super::model::{ComputationMethod, FixedAsset, FixedAssetLine, ScheduleKind};

/// Read-only parameters of one schedule of one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleContext {
    pub kind: ScheduleKind,
    pub asset_reference: String,
    /// Date of the first generated line
    pub start_date: NaiveDate,
    /// Start of the prorata-temporis window
    pub acquisition_date: NaiveDate,
    pub initial_base: Money,
    pub number_of_depreciation: u32,
    pub computation_method: ComputationMethod,
    /// `1` for linear plans
    pub degressive_coef: Rate,
    pub periodicity_in_month: u32,
    pub is_prorata_temporis: bool,
    pub is_us_prorata_temporis: bool,
}

impl ScheduleContext {
    /// Resolve the parameters of `kind` on `asset`.
    pub fn for_schedule(asset: &FixedAsset, kind: ScheduleKind) -> FixedAssetResult<Self> {
        match kind {
            ScheduleKind::Fiscal => Self::fiscal(asset),
            ScheduleKind::Economic => Self::economic(asset),
        }
    }

    /// Statutory books: starts on the asset's first depreciation date and
    /// depreciates the full gross value.
    pub fn fiscal(asset: &FixedAsset) -> FixedAssetResult<Self> {
        let start_date =
            asset
                .first_depreciation_date
                .ok_or_else(|| FixedAssetError::Configuration {
                    field: "first_depreciation_date".into(),
                    reason: "The fiscal schedule requires a first depreciation date.".into(),
                })?;
        Self::build(asset, ScheduleKind::Fiscal, start_date, asset.gross_value)
    }

    /// Management books: starts on the plan's own date (acquisition date when
    /// unset) and excludes the residual value from the base.
    pub fn economic(asset: &FixedAsset) -> FixedAssetResult<Self> {
        let start_date = asset
            .economic
            .first_depreciation_date
            .unwrap_or(asset.acquisition_date);
        let base = asset.gross_value - asset.residual_value;
        Self::build(asset, ScheduleKind::Economic, start_date, base)
    }

    fn build(
        asset: &FixedAsset,
        kind: ScheduleKind,
        start_date: NaiveDate,
        initial_base: Money,
    ) -> FixedAssetResult<Self> {
        validate_asset(asset)?;
        let plan = asset.plan(kind);

        if plan.number_of_depreciation == 0 {
            return Err(FixedAssetError::Configuration {
                field: format!("{kind}.number_of_depreciation"),
                reason: "Number of depreciation periods must be positive.".into(),
            });
        }
        if plan.periodicity_in_month == 0 {
            return Err(FixedAssetError::Configuration {
                field: format!("{kind}.periodicity_in_month"),
                reason: "Periodicity must be at least one month.".into(),
            });
        }

        let degressive_coef = match plan.computation_method {
            ComputationMethod::Linear => Decimal::ONE,
            ComputationMethod::Degressive => match plan.degressive_coef {
                Some(coef) if coef > Decimal::ZERO => coef,
                _ => {
                    return Err(FixedAssetError::Configuration {
                        field: format!("{kind}.degressive_coef"),
                        reason: "Degressive plans require a positive coefficient.".into(),
                    })
                }
            },
        };

        Ok(Self {
            kind,
            asset_reference: asset.reference.clone(),
            start_date,
            acquisition_date: asset.acquisition_date,
            initial_base,
            number_of_depreciation: plan.number_of_depreciation,
            computation_method: plan.computation_method,
            degressive_coef,
            periodicity_in_month: plan.periodicity_in_month,
            is_prorata_temporis: asset.category.is_prorata_temporis,
            is_us_prorata_temporis: asset.category.is_us_prorata_temporis,
        })
    }
}

fn validate_asset(asset: &FixedAsset) -> FixedAssetResult<()> {
    if asset.gross_value < Decimal::ZERO {
        return Err(FixedAssetError::InvalidInput {
            field: "gross_value".into(),
            reason: "Gross value cannot be negative.".into(),
        });
    }
    if asset.residual_value < Decimal::ZERO || asset.residual_value > asset.gross_value {
        return Err(FixedAssetError::InvalidInput {
            field: "residual_value".into(),
            reason: "Residual value must lie between zero and the gross value.".into(),
        });
    }
    Ok(())
}

/// What the engine needs to know about the lines already in a schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleProgress {
    /// `None` when the schedule has no line list at all
    pub lines_generated: Option<usize>,
    /// Lines still planned and never corrected by hand
    pub uncorrected_planned_lines: usize,
}

impl ScheduleProgress {
    pub fn from_lines(lines: Option<&[FixedAssetLine]>) -> Self {
        match lines {
            None => Self::default(),
            Some(lines) => Self {
                lines_generated: Some(lines.len()),
                uncorrected_planned_lines: lines
                    .iter()
                    .filter(|line| line.is_uncorrected_planned())
                    .count(),
            },
        }
    }

    pub fn generated(&self) -> usize {
        self.lines_generated.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed_asset::model::{DepreciationPlan, FixedAssetCategory, LineStatus};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn plan(method: ComputationMethod, coef: Option<Rate>) -> DepreciationPlan {
        DepreciationPlan {
            number_of_depreciation: 5,
            computation_method: method,
            degressive_coef: coef,
            periodicity_in_month: 12,
            first_depreciation_date: None,
            lines: None,
        }
    }

    fn asset() -> FixedAsset {
        FixedAsset {
            reference: "FA-001".into(),
            name: "Press".into(),
            category: FixedAssetCategory::default(),
            acquisition_date: date(2024, 3, 15),
            first_depreciation_date: Some(date(2024, 12, 31)),
            gross_value: dec!(10000),
            residual_value: dec!(1000),
            fiscal: plan(ComputationMethod::Degressive, Some(dec!(1.75))),
            economic: plan(ComputationMethod::Linear, None),
        }
    }

    #[test]
    fn test_fiscal_binding_reads_fiscal_fields() {
        let ctx = ScheduleContext::fiscal(&asset()).unwrap();
        assert_eq!(ctx.kind, ScheduleKind::Fiscal);
        assert_eq!(ctx.start_date, date(2024, 12, 31));
        assert_eq!(ctx.initial_base, dec!(10000));
        assert_eq!(ctx.computation_method, ComputationMethod::Degressive);
        assert_eq!(ctx.degressive_coef, dec!(1.75));
    }

    #[test]
    fn test_economic_binding_defaults_to_acquisition_date() {
        let ctx = ScheduleContext::economic(&asset()).unwrap();
        assert_eq!(ctx.kind, ScheduleKind::Economic);
        assert_eq!(ctx.start_date, date(2024, 3, 15));
        assert_eq!(ctx.initial_base, dec!(9000));
        assert_eq!(ctx.degressive_coef, Decimal::ONE);
    }

    #[test]
    fn test_zero_periods_is_configuration_error() {
        let mut a = asset();
        a.economic.number_of_depreciation = 0;
        let err = ScheduleContext::economic(&a).unwrap_err();
        assert!(matches!(err, FixedAssetError::Configuration { .. }));
    }

    #[test]
    fn test_degressive_without_coefficient_is_configuration_error() {
        let mut a = asset();
        a.fiscal.degressive_coef = None;
        let err = ScheduleContext::fiscal(&a).unwrap_err();
        assert!(matches!(err, FixedAssetError::Configuration { .. }));
    }

    #[test]
    fn test_fiscal_requires_first_depreciation_date() {
        let mut a = asset();
        a.first_depreciation_date = None;
        assert!(ScheduleContext::fiscal(&a).is_err());
        assert!(ScheduleContext::economic(&a).is_ok());
    }

    #[test]
    fn test_progress_counts_uncorrected_planned_lines() {
        let line = |status, corrected| FixedAssetLine {
            asset_reference: "FA-001".into(),
            status,
            depreciation_date: date(2024, 12, 31),
            depreciation: dec!(100),
            cumulative_depreciation: dec!(100),
            accounting_value: dec!(900),
            depreciation_base: dec!(1000),
            corrected_accounting_value: corrected,
            impairment_value: Decimal::ZERO,
            type_select: ScheduleKind::Fiscal,
        };
        let lines = vec![
            line(LineStatus::Realized, Decimal::ZERO),
            line(LineStatus::Planned, dec!(850)),
            line(LineStatus::Planned, Decimal::ZERO),
        ];
        let progress = ScheduleProgress::from_lines(Some(lines.as_slice()));
        assert_eq!(progress.lines_generated, Some(3));
        assert_eq!(progress.uncorrected_planned_lines, 1);
        assert_eq!(ScheduleProgress::from_lines(None).lines_generated, None);
    }
}
