//! Proportional rescaling of whole assets: value revisions and partial
//! disposals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::FixedAssetError;
use crate::types::{round_returned, Rate};
use crate::FixedAssetResult;

use super::line_computation::{multiply_line_by, multiply_lines_by};
use super::model::{FixedAsset, FixedAssetLine, LineStatus, ScheduleKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescaleRequest {
    pub asset: FixedAsset,
    pub ratio: Rate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RescaleSummary {
    pub rescaled_lines: usize,
    pub skipped_realized_lines: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescaleOutput {
    pub asset: FixedAsset,
    pub summary: RescaleSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitRequest {
    pub asset: FixedAsset,
    /// Share of the asset moved to the new asset, strictly between 0 and 1
    pub ratio: Rate,
    pub new_reference: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitOutput {
    pub retained: FixedAsset,
    pub disposed: FixedAsset,
}

/// Scale the gross and residual values and every planned line of both
/// schedules by `ratio`. Realized lines are left untouched.
pub fn rescale_asset(asset: &mut FixedAsset, ratio: Rate) -> FixedAssetResult<RescaleSummary> {
    if ratio <= Decimal::ZERO {
        return Err(FixedAssetError::InvalidInput {
            field: "ratio".into(),
            reason: "Rescale ratio must be positive.".into(),
        });
    }

    ensure_scalable(asset, ratio, |line| line.status != LineStatus::Realized)?;
    asset.gross_value = round_returned(ratio * asset.gross_value);
    asset.residual_value = round_returned(ratio * asset.residual_value);

    let mut summary = RescaleSummary::default();
    for kind in [ScheduleKind::Fiscal, ScheduleKind::Economic] {
        let Some(lines) = asset.plan_mut(kind).lines.as_mut() else {
            continue;
        };
        for line in lines.iter_mut() {
            if line.status == LineStatus::Realized {
                summary.skipped_realized_lines += 1;
            } else {
                multiply_line_by(line, ratio);
                summary.rescaled_lines += 1;
            }
        }
    }

    if summary.skipped_realized_lines > 0 {
        warn!(
            asset = %asset.reference,
            skipped = summary.skipped_realized_lines,
            "realized lines were not rescaled"
        );
    }
    Ok(summary)
}

pub fn rescale(request: &RescaleRequest) -> FixedAssetResult<RescaleOutput> {
    let mut asset = request.asset.clone();
    let summary = rescale_asset(&mut asset, request.ratio)?;
    Ok(RescaleOutput { asset, summary })
}

/// Split `asset` into a retained part and a disposed part carrying `ratio`
/// of every value. Assets with realized lines cannot be split.
pub fn split_asset(
    asset: &FixedAsset,
    ratio: Rate,
    new_reference: &str,
) -> FixedAssetResult<SplitOutput> {
    if ratio <= Decimal::ZERO || ratio >= Decimal::ONE {
        return Err(FixedAssetError::InvalidInput {
            field: "ratio".into(),
            reason: "Split ratio must lie strictly between 0 and 1.".into(),
        });
    }
    if new_reference.is_empty() || new_reference == asset.reference {
        return Err(FixedAssetError::InvalidInput {
            field: "new_reference".into(),
            reason: "The disposed part needs its own reference.".into(),
        });
    }
    let has_realized = [ScheduleKind::Fiscal, ScheduleKind::Economic]
        .iter()
        .filter_map(|kind| asset.plan(*kind).lines.as_ref())
        .flatten()
        .any(|line| line.status == LineStatus::Realized);
    if has_realized {
        return Err(FixedAssetError::InvalidState(format!(
            "asset {} has realized lines and cannot be split",
            asset.reference
        )));
    }

    let mut disposed = asset.clone();
    disposed.reference = new_reference.to_string();
    scale_asset(&mut disposed, ratio)?;

    let mut retained = asset.clone();
    scale_asset(&mut retained, Decimal::ONE - ratio)?;

    Ok(SplitOutput { retained, disposed })
}

pub fn split(request: &SplitRequest) -> FixedAssetResult<SplitOutput> {
    split_asset(&request.asset, request.ratio, &request.new_reference)
}

fn scale_asset(asset: &mut FixedAsset, ratio: Rate) -> FixedAssetResult<()> {
    ensure_scalable(asset, ratio, |_| true)?;
    asset.gross_value = round_returned(ratio * asset.gross_value);
    asset.residual_value = round_returned(ratio * asset.residual_value);
    let reference = asset.reference.clone();
    for kind in [ScheduleKind::Fiscal, ScheduleKind::Economic] {
        let plan = asset.plan_mut(kind);
        multiply_lines_by(plan.lines.as_deref_mut(), ratio);
        if let Some(lines) = plan.lines.as_mut() {
            lines
                .iter_mut()
                .for_each(|line| line.asset_reference = reference.clone());
        }
    }
    Ok(())
}

/// Reject the ratio before anything is mutated when a scaled value would
/// not fit in a `Decimal`.
fn ensure_scalable(
    asset: &FixedAsset,
    ratio: Rate,
    selected: impl Fn(&FixedAssetLine) -> bool,
) -> FixedAssetResult<()> {
    let line_values = [ScheduleKind::Fiscal, ScheduleKind::Economic]
        .into_iter()
        .filter_map(|kind| asset.plan(kind).lines.as_deref())
        .flatten()
        .filter(|line| selected(line))
        .flat_map(|line| {
            [
                line.depreciation_base,
                line.depreciation,
                line.cumulative_depreciation,
                line.accounting_value,
                line.corrected_accounting_value,
                line.impairment_value,
            ]
        });
    let overflows = [asset.gross_value, asset.residual_value]
        .into_iter()
        .chain(line_values)
        .any(|value| value.checked_mul(ratio).is_none());
    if overflows {
        return Err(FixedAssetError::InvalidInput {
            field: "ratio".into(),
            reason: format!(
                "Scaling asset {} by {ratio} overflows the decimal range.",
                asset.reference
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed_asset::generation::compute_depreciation_lines;
    use crate::fixed_asset::model::{ComputationMethod, DepreciationPlan, FixedAssetCategory};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn generated_asset() -> FixedAsset {
        let plan = DepreciationPlan {
            number_of_depreciation: 4,
            computation_method: ComputationMethod::Linear,
            degressive_coef: None,
            periodicity_in_month: 12,
            first_depreciation_date: Some(d(2024, 12, 31)),
            lines: None,
        };
        let mut asset = FixedAsset {
            reference: "FA-300".into(),
            name: "Server rack".into(),
            category: FixedAssetCategory::default(),
            acquisition_date: d(2024, 1, 1),
            first_depreciation_date: Some(d(2024, 12, 31)),
            gross_value: dec!(8000.00),
            residual_value: Decimal::ZERO,
            fiscal: plan.clone(),
            economic: plan,
        };
        compute_depreciation_lines(&mut asset).unwrap();
        asset
    }

    #[test]
    fn test_rescale_skips_realized_lines() {
        let mut asset = generated_asset();
        asset.fiscal.lines.as_mut().unwrap()[0].status = LineStatus::Realized;

        let summary = rescale_asset(&mut asset, dec!(0.5)).unwrap();
        assert_eq!(summary.skipped_realized_lines, 1);
        assert_eq!(summary.rescaled_lines, 7);
        assert_eq!(asset.gross_value, dec!(4000.00));

        let fiscal = asset.fiscal.lines.as_ref().unwrap();
        assert_eq!(fiscal[0].depreciation, dec!(2000.00));
        assert_eq!(fiscal[1].depreciation, dec!(1000.00));
    }

    #[test]
    fn test_rescale_rejects_non_positive_ratio() {
        let mut asset = generated_asset();
        assert!(rescale_asset(&mut asset, Decimal::ZERO).is_err());
    }

    #[test]
    fn test_rescale_overflow_is_rejected_untouched() {
        let mut asset = generated_asset();
        asset.gross_value = Decimal::MAX;
        let before = asset.clone();

        let err = rescale_asset(&mut asset, dec!(2)).unwrap_err();
        assert!(matches!(err, FixedAssetError::InvalidInput { .. }));
        assert_eq!(asset.gross_value, before.gross_value);
        assert_eq!(asset.fiscal.lines, before.fiscal.lines);
    }

    #[test]
    fn test_split_shares_values() {
        let asset = generated_asset();
        let out = split_asset(&asset, dec!(0.25), "FA-300-B").unwrap();
        assert_eq!(out.disposed.gross_value, dec!(2000.00));
        assert_eq!(out.retained.gross_value, dec!(6000.00));
        assert_eq!(out.disposed.reference, "FA-300-B");

        let disposed_lines = out.disposed.economic.lines.as_ref().unwrap();
        assert!(disposed_lines.iter().all(|l| l.asset_reference == "FA-300-B"));
        assert_eq!(disposed_lines[0].depreciation, dec!(500.00));
        assert_eq!(
            out.retained.economic.lines.as_ref().unwrap()[0].depreciation,
            dec!(1500.00)
        );
    }

    #[test]
    fn test_split_rejects_realized_lines() {
        let mut asset = generated_asset();
        asset.economic.lines.as_mut().unwrap()[0].status = LineStatus::Realized;
        let err = split_asset(&asset, dec!(0.5), "FA-300-B").unwrap_err();
        assert!(matches!(err, FixedAssetError::InvalidState(_)));
    }

    #[test]
    fn test_split_rejects_bad_ratio() {
        let asset = generated_asset();
        assert!(split_asset(&asset, Decimal::ONE, "FA-300-B").is_err());
        assert!(split_asset(&asset, dec!(0.5), "FA-300").is_err());
    }
}
