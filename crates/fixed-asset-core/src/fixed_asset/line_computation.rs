//! Depreciation line engine shared by the fiscal and economic schedules.
//!
//! The engine is side-effect free: it builds one [`FixedAssetLine`] per call
//! from a [`ScheduleContext`], a [`ScheduleProgress`] and, for subsequent
//! lines, the previous line. Appending the result to the schedule is the
//! caller's job.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::dates::add_months;
use crate::error::FixedAssetError;
use crate::types::{round_calculation, round_returned, Money, Rate};
use crate::FixedAssetResult;

use super::model::{ComputationMethod, FixedAssetLine, LineStatus};
use super::prorata::compute_prorata_temporis;
use super::schedule::{ScheduleContext, ScheduleProgress};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the first planned line of a schedule.
pub fn compute_initial_planned_line(
    ctx: &ScheduleContext,
    progress: &ScheduleProgress,
) -> FixedAssetResult<FixedAssetLine> {
    let base = ctx.initial_base;
    let depreciation = compute_initial_depreciation(ctx, progress, base)?.min(base);
    let line = planned_line(
        ctx,
        ctx.start_date,
        depreciation,
        depreciation,
        base - depreciation,
        base,
    );
    debug!(
        kind = %ctx.kind,
        asset = %ctx.asset_reference,
        date = %line.depreciation_date,
        depreciation = %line.depreciation,
        accounting_value = %line.accounting_value,
        "initial planned line"
    );
    Ok(line)
}

/// Compute the line following `previous`.
///
/// `progress` must describe a schedule that already holds at least the
/// previous line.
pub fn compute_planned_line(
    ctx: &ScheduleContext,
    progress: &ScheduleProgress,
    previous: &FixedAssetLine,
) -> FixedAssetResult<FixedAssetLine> {
    if progress.generated() == 0 {
        return Err(FixedAssetError::InvalidState(format!(
            "next {} line requested for {} before an initial line exists",
            ctx.kind, ctx.asset_reference
        )));
    }

    let depreciation = compute_depreciation(ctx, progress, previous)?;
    let depreciation_base = match ctx.computation_method {
        ComputationMethod::Degressive => previous.accounting_value,
        ComputationMethod::Linear => previous.depreciation_base,
    };
    let cumulative_depreciation = previous.cumulative_depreciation + depreciation;
    let accounting_value = previous.accounting_value - depreciation;
    let depreciation_date = add_months(previous.depreciation_date, ctx.periodicity_in_month)?;

    let line = planned_line(
        ctx,
        depreciation_date,
        depreciation,
        cumulative_depreciation,
        accounting_value,
        depreciation_base,
    );
    debug!(
        kind = %ctx.kind,
        asset = %ctx.asset_reference,
        date = %line.depreciation_date,
        depreciation = %line.depreciation,
        accounting_value = %line.accounting_value,
        "planned line"
    );
    Ok(line)
}

/// Scale the six monetary fields of `line` by `ratio`, each rounded
/// half-up to the returned scale. Realized lines must not be passed here.
pub fn multiply_line_by(line: &mut FixedAssetLine, ratio: Rate) {
    line.depreciation_base = round_returned(ratio * line.depreciation_base);
    line.depreciation = round_returned(ratio * line.depreciation);
    line.cumulative_depreciation = round_returned(ratio * line.cumulative_depreciation);
    line.accounting_value = round_returned(ratio * line.accounting_value);
    line.corrected_accounting_value = round_returned(ratio * line.corrected_accounting_value);
    line.impairment_value = round_returned(ratio * line.impairment_value);
}

/// Apply [`multiply_line_by`] to every line; no-op when there are none.
pub fn multiply_lines_by(lines: Option<&mut [FixedAssetLine]>, ratio: Rate) {
    if let Some(lines) = lines {
        lines
            .iter_mut()
            .for_each(|line| multiply_line_by(line, ratio));
    }
}

/// `1 / number_of_depreciation` at the calculation scale.
pub fn depreciation_rate(number_of_depreciation: u32) -> Rate {
    if number_of_depreciation == 0 {
        return Decimal::ZERO;
    }
    round_calculation(Decimal::ONE / Decimal::from(number_of_depreciation))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn planned_line(
    ctx: &ScheduleContext,
    depreciation_date: NaiveDate,
    depreciation: Money,
    cumulative_depreciation: Money,
    accounting_value: Money,
    depreciation_base: Money,
) -> FixedAssetLine {
    FixedAssetLine {
        asset_reference: ctx.asset_reference.clone(),
        status: LineStatus::Planned,
        depreciation_date,
        depreciation,
        cumulative_depreciation,
        accounting_value,
        depreciation_base,
        corrected_accounting_value: Decimal::ZERO,
        impairment_value: Decimal::ZERO,
        type_select: ctx.kind,
    }
}

fn compute_initial_depreciation(
    ctx: &ScheduleContext,
    progress: &ScheduleProgress,
    base: Money,
) -> FixedAssetResult<Money> {
    let periods = ctx.number_of_depreciation;
    match ctx.computation_method {
        ComputationMethod::Degressive => {
            // Depreciate everything in one line.
            let single_period_left = match progress.lines_generated {
                Some(generated) => generated + 1 == periods as usize,
                None => periods == 1,
            };
            if single_period_left {
                debug!(kind = %ctx.kind, asset = %ctx.asset_reference, "single-period payoff");
                return Ok(base);
            }
            let numerator = initial_depreciation_numerator(ctx, base)?;
            Ok(round_returned(numerator * ctx.degressive_coef))
        }
        ComputationMethod::Linear => Ok(round_returned(initial_depreciation_numerator(ctx, base)?)),
    }
}

fn initial_depreciation_numerator(ctx: &ScheduleContext, base: Money) -> FixedAssetResult<Decimal> {
    let prorata = compute_prorata_temporis(ctx)?;
    Ok(base * depreciation_rate(ctx.number_of_depreciation) * prorata)
}

fn compute_depreciation(
    ctx: &ScheduleContext,
    progress: &ScheduleProgress,
    previous: &FixedAssetLine,
) -> FixedAssetResult<Money> {
    let periods = ctx.number_of_depreciation as usize;
    let remaining_value = previous.accounting_value;

    let depreciation = match ctx.computation_method {
        ComputationMethod::Degressive => {
            if progress.generated() + 1 == periods {
                debug!(kind = %ctx.kind, asset = %ctx.asset_reference, "final degressive period");
                remaining_value
            } else {
                ongoing_degressive_depreciation(ctx, progress, remaining_value)?
            }
        }
        ComputationMethod::Linear => {
            // Realized and hand-corrected lines do not count towards the plan.
            if progress.uncorrected_planned_lines + 1 == periods {
                debug!(kind = %ctx.kind, asset = %ctx.asset_reference, "final linear period");
                remaining_value
            } else {
                round_returned(
                    previous.depreciation_base * depreciation_rate(ctx.number_of_depreciation),
                )
            }
        }
    };

    if remaining_value - depreciation < Decimal::ZERO {
        return Ok(remaining_value);
    }
    Ok(depreciation)
}

/// Larger of the declining-balance amount and the straight-line amount over
/// the periods still to come.
fn ongoing_degressive_depreciation(
    ctx: &ScheduleContext,
    progress: &ScheduleProgress,
    remaining_value: Money,
) -> FixedAssetResult<Money> {
    let generated = progress.generated();
    let periods = ctx.number_of_depreciation as usize;
    if generated >= periods {
        return Err(FixedAssetError::InvalidState(format!(
            "{} schedule of {} already holds {generated} lines for {periods} periods",
            ctx.kind, ctx.asset_reference
        )));
    }

    let degressive = round_returned(
        remaining_value * depreciation_rate(ctx.number_of_depreciation) * ctx.degressive_coef,
    );
    let linear = round_returned(remaining_value / Decimal::from((periods - generated) as u64));
    Ok(degressive.max(linear))
}
