//! Schedule generation: drives the line engine until a schedule is paid off.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::FixedAssetError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::FixedAssetResult;

use super::line_computation::{compute_initial_planned_line, compute_planned_line};
use super::model::{ComputationMethod, FixedAsset, FixedAssetLine, LineStatus, ScheduleKind};
use super::prorata::compute_prorata_temporis;
use super::schedule::{ScheduleContext, ScheduleProgress};

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub asset: FixedAsset,
    /// Schedules to generate; both when empty
    #[serde(default)]
    pub schedules: Vec<ScheduleKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub kind: ScheduleKind,
    pub computation_method: ComputationMethod,
    pub initial_base: Money,
    pub prorata_temporis: Rate,
    pub line_count: usize,
    pub total_depreciation: Money,
    pub final_accounting_value: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepreciationOutput {
    pub asset_reference: String,
    pub summaries: Vec<ScheduleSummary>,
    /// Lines of every requested schedule, fiscal first
    pub lines: Vec<FixedAssetLine>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Continue (or start) the `kind` schedule of `asset` until its accounting
/// value reaches zero. Existing lines are kept as-is and returned first.
pub fn generate_schedule(
    asset: &FixedAsset,
    kind: ScheduleKind,
) -> FixedAssetResult<Vec<FixedAssetLine>> {
    let ctx = ScheduleContext::for_schedule(asset, kind)?;
    let existing = asset.plan(kind).lines.as_deref();
    let mut lines: Vec<FixedAssetLine> = existing.map(<[_]>::to_vec).unwrap_or_default();

    if lines.is_empty() {
        let first = compute_initial_planned_line(&ctx, &ScheduleProgress::from_lines(existing))?;
        lines.push(first);
    }

    // Realized lines may stretch a linear plan beyond its period count.
    let limit = ctx.number_of_depreciation as usize + existing.map_or(0, <[_]>::len);

    loop {
        let previous = match lines.last() {
            Some(line) if line.accounting_value > Decimal::ZERO => line.clone(),
            _ => break,
        };
        if lines.len() >= limit {
            return Err(FixedAssetError::ScheduleOverflow {
                kind: kind.to_string(),
                limit,
                remaining: previous.accounting_value,
            });
        }
        let progress = ScheduleProgress::from_lines(Some(lines.as_slice()));
        let next = compute_planned_line(&ctx, &progress, &previous)?;
        lines.push(next);
    }

    debug!(
        %kind,
        asset = %asset.reference,
        lines = lines.len(),
        "schedule generated"
    );
    Ok(lines)
}

/// Generate both schedules and store them on the asset.
pub fn compute_depreciation_lines(asset: &mut FixedAsset) -> FixedAssetResult<()> {
    for kind in [ScheduleKind::Fiscal, ScheduleKind::Economic] {
        let lines = generate_schedule(asset, kind)?;
        asset.plan_mut(kind).lines = Some(lines);
    }
    Ok(())
}

/// Generate the requested schedules with summaries, wrapped in the standard
/// output envelope.
pub fn generate_depreciation(
    request: &ScheduleRequest,
) -> FixedAssetResult<ComputationOutput<DepreciationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let asset = &request.asset;

    let kinds = if request.schedules.is_empty() {
        vec![ScheduleKind::Fiscal, ScheduleKind::Economic]
    } else {
        request.schedules.clone()
    };

    let mut summaries = Vec::with_capacity(kinds.len());
    let mut all_lines = Vec::new();

    for kind in kinds {
        let ctx = ScheduleContext::for_schedule(asset, kind)?;
        let prorata_temporis = compute_prorata_temporis(&ctx)?;
        let lines = generate_schedule(asset, kind)?;

        let realized = lines
            .iter()
            .filter(|l| l.status == LineStatus::Realized)
            .count();
        if realized > 0 {
            warnings.push(format!(
                "{kind} schedule: {realized} realized line(s) kept unchanged"
            ));
        }
        if prorata_temporis > Decimal::ONE {
            warnings.push(format!(
                "{kind} schedule: first period spans more than one period (prorata {prorata_temporis})"
            ));
        }

        summaries.push(ScheduleSummary {
            kind,
            computation_method: ctx.computation_method,
            initial_base: ctx.initial_base,
            prorata_temporis,
            line_count: lines.len(),
            total_depreciation: lines.iter().map(|l| l.depreciation).sum(),
            final_accounting_value: lines
                .last()
                .map(|l| l.accounting_value)
                .unwrap_or(ctx.initial_base),
        });
        all_lines.extend(lines);
    }

    if asset.residual_value > Decimal::ZERO {
        warnings.push(format!(
            "Economic base excludes a residual value of {}",
            asset.residual_value
        ));
    }

    let output = DepreciationOutput {
        asset_reference: asset.reference.clone(),
        summaries,
        lines: all_lines,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "day_count": "30/360",
        "rounding": "half-up to 2 dp on every monetary result",
        "degressive_switch": "max(declining balance, straight line over remaining periods)",
        "last_period": "depreciates the remaining accounting value",
    });

    Ok(with_metadata(
        "Fixed-asset depreciation schedule (linear / degressive, prorata temporis)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed_asset::model::{DepreciationPlan, FixedAssetCategory};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn monthly_plan(method: ComputationMethod, coef: Option<Rate>) -> DepreciationPlan {
        DepreciationPlan {
            number_of_depreciation: 12,
            computation_method: method,
            degressive_coef: coef,
            periodicity_in_month: 1,
            first_depreciation_date: Some(d(2024, 1, 31)),
            lines: None,
        }
    }

    fn asset(method: ComputationMethod, coef: Option<Rate>) -> FixedAsset {
        FixedAsset {
            reference: "FA-200".into(),
            name: "Forklift".into(),
            category: FixedAssetCategory::default(),
            acquisition_date: d(2024, 1, 1),
            first_depreciation_date: Some(d(2024, 1, 31)),
            gross_value: dec!(12000.00),
            residual_value: Decimal::ZERO,
            fiscal: monthly_plan(method, coef),
            economic: monthly_plan(method, coef),
        }
    }

    #[test]
    fn test_linear_schedule_has_twelve_lines() {
        let lines = generate_schedule(&asset(ComputationMethod::Linear, None), ScheduleKind::Fiscal)
            .unwrap();
        assert_eq!(lines.len(), 12);
        assert!(lines.iter().all(|l| l.depreciation == dec!(1000.00)));
        assert_eq!(lines[11].accounting_value, Decimal::ZERO);
        // Month-end clamping from February carries forward.
        assert_eq!(lines[1].depreciation_date, d(2024, 2, 29));
        assert_eq!(lines[11].depreciation_date, d(2024, 12, 29));
    }

    #[test]
    fn test_existing_lines_are_continued() {
        let a = asset(ComputationMethod::Linear, None);
        let full = generate_schedule(&a, ScheduleKind::Fiscal).unwrap();

        let mut partial = a.clone();
        partial.fiscal.lines = Some(full[..4].to_vec());
        let continued = generate_schedule(&partial, ScheduleKind::Fiscal).unwrap();
        assert_eq!(continued, full);
    }

    #[test]
    fn test_oversized_periodicity_is_a_date_error() {
        let mut a = asset(ComputationMethod::Linear, None);
        a.fiscal.periodicity_in_month = u32::MAX;
        let err = generate_schedule(&a, ScheduleKind::Fiscal).unwrap_err();
        assert!(matches!(err, FixedAssetError::DateError(_)));
    }

    #[test]
    fn test_compute_depreciation_lines_fills_both_plans() {
        let mut a = asset(ComputationMethod::Degressive, Some(dec!(2)));
        compute_depreciation_lines(&mut a).unwrap();
        let fiscal = a.fiscal.lines.as_ref().unwrap();
        let economic = a.economic.lines.as_ref().unwrap();
        assert_eq!(fiscal.len(), 12);
        assert_eq!(economic.len(), 12);
        assert!(fiscal.iter().all(|l| l.type_select == ScheduleKind::Fiscal));
        assert!(economic.iter().all(|l| l.type_select == ScheduleKind::Economic));
    }

    #[test]
    fn test_generate_depreciation_envelope() {
        let mut a = asset(ComputationMethod::Linear, None);
        a.residual_value = dec!(1200.00);
        let request = ScheduleRequest {
            asset: a,
            schedules: vec![],
        };
        let out = generate_depreciation(&request).unwrap();
        assert_eq!(out.result.summaries.len(), 2);
        assert_eq!(out.result.lines.len(), 24);

        let economic = &out.result.summaries[1];
        assert_eq!(economic.kind, ScheduleKind::Economic);
        assert_eq!(economic.initial_base, dec!(10800.00));
        assert_eq!(economic.total_depreciation, dec!(10800.00));
        assert_eq!(economic.final_accounting_value, Decimal::ZERO);
        assert!(out.warnings.iter().any(|w| w.contains("residual value")));
    }

    #[test]
    fn test_generate_depreciation_single_schedule() {
        let request = ScheduleRequest {
            asset: asset(ComputationMethod::Linear, None),
            schedules: vec![ScheduleKind::Economic],
        };
        let out = generate_depreciation(&request).unwrap();
        assert_eq!(out.result.summaries.len(), 1);
        assert!(out
            .result
            .lines
            .iter()
            .all(|l| l.type_select == ScheduleKind::Economic));
    }
}
