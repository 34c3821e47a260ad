//! Prorata-temporis factor for the first depreciation period.
//!
//! Day counts use a 360-day year of twelve 30-day months. The window starts
//! the day before acquisition and ends on the first depreciation date; the
//! ratio against one full period is kept at the calculation scale.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dates::is_last_day_of_february;
use crate::error::FixedAssetError;
use crate::types::{round_calculation, Rate};
use crate::FixedAssetResult;

use super::schedule::ScheduleContext;

/// 30/360 day-count flavour used when clamping month-end days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayCountConvention {
    European,
    Us,
}

/// Factor applied to the first period of a schedule; `1` when prorata is
/// disabled or the schedule starts on the acquisition date.
pub fn compute_prorata_temporis(ctx: &ScheduleContext) -> FixedAssetResult<Rate> {
    if !ctx.is_prorata_temporis || ctx.acquisition_date == ctx.start_date {
        return Ok(Decimal::ONE);
    }
    let convention = if ctx.is_us_prorata_temporis {
        DayCountConvention::Us
    } else {
        DayCountConvention::European
    };
    let prorata = prorata_between(
        ctx.acquisition_date,
        ctx.start_date,
        ctx.periodicity_in_month,
        convention,
    )?;
    debug!(
        kind = %ctx.kind,
        asset = %ctx.asset_reference,
        %prorata,
        "computed prorata temporis"
    );
    Ok(prorata)
}

/// Fraction of a `periodicity_in_month` period between the two dates.
pub fn prorata_between(
    acquisition_date: NaiveDate,
    depreciation_date: NaiveDate,
    periodicity_in_month: u32,
    convention: DayCountConvention,
) -> FixedAssetResult<Rate> {
    if periodicity_in_month == 0 {
        return Err(FixedAssetError::Configuration {
            field: "periodicity_in_month".into(),
            reason: "Periodicity must be at least one month.".into(),
        });
    }

    let day_before = acquisition_date.pred_opt().ok_or_else(|| {
        FixedAssetError::DateError(format!("No day precedes {acquisition_date}"))
    })?;
    let acquisition_year = day_before.year();
    let acquisition_month = day_before.month();
    let mut acquisition_day = day_before.day();
    let depreciation_year = depreciation_date.year();
    let depreciation_month = depreciation_date.month();
    let mut depreciation_day = depreciation_date.day();

    match convention {
        // Sequential clamps, order matters.
        DayCountConvention::Us => {
            let acquisition_end_of_feb = acquisition_month == 2
                && is_last_day_of_february(acquisition_year, acquisition_day);
            if acquisition_end_of_feb
                && depreciation_month == 2
                && is_last_day_of_february(depreciation_year, depreciation_day)
            {
                depreciation_day = 30;
            }
            if acquisition_end_of_feb {
                acquisition_day = 30;
            }
            if acquisition_day >= 30 && depreciation_day > 30 {
                depreciation_day = 30;
            }
            if acquisition_day > 30 {
                acquisition_day = 30;
            }
        }
        DayCountConvention::European => {
            if acquisition_day == 31 {
                acquisition_day = 30;
            }
            if depreciation_day == 31 {
                depreciation_day = 30;
            }
        }
    }

    let days = 360 * i64::from(depreciation_year - acquisition_year)
        + 30 * (i64::from(depreciation_month) - i64::from(acquisition_month))
        + (i64::from(depreciation_day) - i64::from(acquisition_day));
    let days_in_period = Decimal::from(periodicity_in_month) * Decimal::from(30);

    Ok(round_calculation(Decimal::from(days) / days_in_period))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_full_year_is_one() {
        let p = prorata_between(d(2024, 1, 1), d(2024, 12, 31), 12, DayCountConvention::European)
            .unwrap();
        assert_eq!(p, Decimal::ONE);
    }

    #[test]
    fn test_half_year() {
        let p = prorata_between(d(2024, 7, 1), d(2024, 12, 31), 12, DayCountConvention::European)
            .unwrap();
        assert_eq!(p, dec!(0.5));
    }

    #[test]
    fn test_european_day_31_counts_as_30() {
        // Day before 2024-02-01 is 2024-01-31, treated as the 30th.
        let p = prorata_between(d(2024, 2, 1), d(2024, 12, 31), 12, DayCountConvention::European)
            .unwrap();
        assert_eq!(p, dec!(0.91666666666666666667));
    }

    #[test]
    fn test_us_end_of_february_pair_normalised() {
        // 2023-02-28 and 2024-02-29 are both month ends of February.
        let us = prorata_between(d(2023, 3, 1), d(2024, 2, 29), 12, DayCountConvention::Us)
            .unwrap();
        assert_eq!(us, Decimal::ONE);

        let eu = prorata_between(d(2023, 3, 1), d(2024, 2, 29), 12, DayCountConvention::European)
            .unwrap();
        assert_eq!(eu, dec!(1.00277777777777777778));
    }

    #[test]
    fn test_us_keeps_day_31_when_start_is_mid_month() {
        let us = prorata_between(d(2024, 7, 15), d(2024, 12, 31), 12, DayCountConvention::Us)
            .unwrap();
        let eu = prorata_between(d(2024, 7, 15), d(2024, 12, 31), 12, DayCountConvention::European)
            .unwrap();
        assert_eq!(us, round_calculation(dec!(167) / dec!(360)));
        assert_eq!(eu, round_calculation(dec!(166) / dec!(360)));
    }

    #[test]
    fn test_us_february_acquisition_then_day_31_depreciation() {
        // Day before is 2023-02-28 -> 30, which then pulls 2023-12-31 to 30.
        let p = prorata_between(d(2023, 3, 1), d(2023, 12, 31), 12, DayCountConvention::Us)
            .unwrap();
        assert_eq!(p, dec!(0.83333333333333333333));
    }

    #[test]
    fn test_us_february_acquisition_alone() {
        let us = prorata_between(d(2023, 3, 1), d(2023, 12, 15), 12, DayCountConvention::Us)
            .unwrap();
        assert_eq!(us, dec!(0.79166666666666666667));

        // European leaves the 28th alone.
        let eu = prorata_between(d(2023, 3, 1), d(2023, 12, 15), 12, DayCountConvention::European)
            .unwrap();
        assert_eq!(eu, round_calculation(dec!(287) / dec!(360)));
    }

    #[test]
    fn test_us_day_31_on_both_sides() {
        // 2023-12-31 and 2024-12-31 both fall back to the 30th.
        let p = prorata_between(d(2024, 1, 1), d(2024, 12, 31), 12, DayCountConvention::Us)
            .unwrap();
        assert_eq!(p, Decimal::ONE);
    }

    #[test]
    fn test_us_day_31_acquisition_only() {
        let p = prorata_between(d(2024, 1, 1), d(2024, 12, 15), 12, DayCountConvention::Us)
            .unwrap();
        assert_eq!(p, dec!(0.95833333333333333333));
    }

    #[test]
    fn test_monthly_periodicity() {
        let p = prorata_between(d(2024, 1, 16), d(2024, 1, 31), 1, DayCountConvention::European)
            .unwrap();
        // 15th -> 30th: 15 days of a 30-day period
        assert_eq!(p, dec!(0.5));
    }

    #[test]
    fn test_zero_periodicity_rejected() {
        assert!(
            prorata_between(d(2024, 1, 1), d(2024, 12, 31), 0, DayCountConvention::Us).is_err()
        );
    }
}
