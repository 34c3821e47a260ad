use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::FixedAssetError;
use crate::types::{round_returned, with_metadata, ComputationOutput, Money};
use crate::FixedAssetResult;

use super::model::{
    AccountConfig, AnalyticAccount, AnalyticDistributionTemplate, AnalyticDistributionType,
    AnalyticMoveLine, AnalyticMoveLineStatus, InvoiceLine,
};

const HUNDRED: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticDistributionRequest {
    pub invoice_line: InvoiceLine,
    #[serde(default)]
    pub config: AccountConfig,
    /// Template resolved for the invoice's partner, product and company
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_template: Option<AnalyticDistributionTemplate>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticDistributionOutput {
    pub invoice_line: InvoiceLine,
    pub total_distributed: Money,
    /// One row per analytic move line
    pub lines: Vec<AnalyticMoveLine>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Check every percentage lies in 0..=100 and that they sum to 100.
pub fn validate_template(template: &AnalyticDistributionTemplate) -> FixedAssetResult<()> {
    if let Some(line) = template
        .lines
        .iter()
        .find(|l| l.percentage < Decimal::ZERO || l.percentage > HUNDRED)
    {
        return Err(FixedAssetError::InvalidInput {
            field: format!("{}.percentage", template.name),
            reason: format!(
                "Percentage {} for {} must lie between 0 and 100.",
                line.percentage, line.analytic_account.code
            ),
        });
    }
    let total: Decimal = template.lines.iter().map(|l| l.percentage).sum();
    if total != HUNDRED {
        return Err(FixedAssetError::InvalidInput {
            field: template.name.clone(),
            reason: format!("Template percentages sum to {total}, expected 100."),
        });
    }
    Ok(())
}

/// One analytic move line per template line, sharing `amount` by percentage.
pub fn generate_lines(
    template: &AnalyticDistributionTemplate,
    amount: Money,
    status: AnalyticMoveLineStatus,
    date: NaiveDate,
) -> FixedAssetResult<Vec<AnalyticMoveLine>> {
    validate_template(template)?;
    Ok(template
        .lines
        .iter()
        .map(|line| AnalyticMoveLine {
            analytic_account: line.analytic_account.clone(),
            analytic_axis: line.analytic_account.axis.clone(),
            percentage: line.percentage,
            amount: share_of(amount, line.percentage),
            date,
            status,
        })
        .collect())
}

/// Recompute `line`'s amount from its own percentage of `total`.
pub fn update_analytic_move_line(line: &mut AnalyticMoveLine, total: Money, date: NaiveDate) {
    line.amount = share_of(total, line.percentage);
    line.date = date;
}

/// Distribute the line from its template when it has no analytic lines yet,
/// otherwise refresh the existing lines against the current total.
pub fn compute_analytic_distribution(
    invoice_line: &mut InvoiceLine,
    date: NaiveDate,
) -> FixedAssetResult<Vec<AnalyticMoveLine>> {
    if invoice_line.analytic_move_lines.is_empty() {
        return create_analytic_distribution_with_template(invoice_line, date);
    }
    let total = invoice_line.company_ex_tax_total;
    for line in invoice_line.analytic_move_lines.iter_mut() {
        update_analytic_move_line(line, total, date);
    }
    Ok(invoice_line.analytic_move_lines.clone())
}

/// Lines generated from the invoice line's template; empty without one.
pub fn create_analytic_distribution_with_template(
    invoice_line: &InvoiceLine,
    date: NaiveDate,
) -> FixedAssetResult<Vec<AnalyticMoveLine>> {
    match &invoice_line.analytic_distribution_template {
        Some(template) => generate_lines(
            template,
            invoice_line.company_ex_tax_total,
            AnalyticMoveLineStatus::ForecastInvoice,
            date,
        ),
        None => Ok(Vec::new()),
    }
}

/// Apply the company's distribution rule. Free distribution keeps the
/// existing lines; any other rule replaces them from `resolved_template`.
pub fn get_and_compute_analytic_distribution(
    invoice_line: &mut InvoiceLine,
    config: &AccountConfig,
    resolved_template: Option<AnalyticDistributionTemplate>,
    date: NaiveDate,
) -> FixedAssetResult<Vec<AnalyticMoveLine>> {
    if config.analytic_distribution_type == AnalyticDistributionType::Free {
        return Ok(invoice_line.analytic_move_lines.clone());
    }
    invoice_line.analytic_distribution_template = resolved_template;
    invoice_line.analytic_move_lines.clear();
    let lines = compute_analytic_distribution(invoice_line, date)?;
    invoice_line.analytic_move_lines = lines.clone();
    Ok(lines)
}

/// Copy the account's template onto the line under per-product distribution.
pub fn select_default_distribution_template(
    invoice_line: &mut InvoiceLine,
    config: &AccountConfig,
) {
    match &invoice_line.account {
        Some(account) => {
            if account.analytic_distribution_authorized
                && account.analytic_distribution_template.is_some()
                && config.analytic_distribution_type == AnalyticDistributionType::PerProduct
            {
                invoice_line.analytic_distribution_template =
                    account.analytic_distribution_template.clone();
            }
        }
        None => invoice_line.analytic_distribution_template = None,
    }
}

/// Rebuild the analytic lines from the axis accounts, one full-amount line
/// per account present.
pub fn analyze_invoice_line(invoice_line: &mut InvoiceLine, date: NaiveDate) {
    let total = invoice_line.company_ex_tax_total;
    invoice_line.analytic_move_lines = invoice_line
        .axis_analytic_accounts
        .iter()
        .flatten()
        .map(|account| axis_move_line(account, total, date))
        .collect();
    debug!(
        product = %invoice_line.product_code,
        lines = invoice_line.analytic_move_lines.len(),
        "analysed invoice line axes"
    );
}

pub fn clear_analytic_accounting(invoice_line: &mut InvoiceLine) {
    invoice_line.axis_analytic_accounts = Default::default();
    invoice_line.analytic_move_lines.clear();
}

/// Run the full distribution for one invoice line, wrapped in the standard
/// output envelope.
pub fn distribute(
    request: &AnalyticDistributionRequest,
) -> FixedAssetResult<ComputationOutput<AnalyticDistributionOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let mut invoice_line = request.invoice_line.clone();

    select_default_distribution_template(&mut invoice_line, &request.config);
    let resolved = request
        .resolved_template
        .clone()
        .or_else(|| invoice_line.analytic_distribution_template.clone());
    let lines = get_and_compute_analytic_distribution(
        &mut invoice_line,
        &request.config,
        resolved,
        request.date,
    )?;

    if lines.is_empty() {
        warnings.push("No analytic distribution template applies to this line".into());
    }
    let total_distributed: Money = lines.iter().map(|l| l.amount).sum();
    if !lines.is_empty() && total_distributed != round_returned(invoice_line.company_ex_tax_total)
    {
        warnings.push(format!(
            "Rounding left {} undistributed",
            invoice_line.company_ex_tax_total - total_distributed
        ));
    }

    let output = AnalyticDistributionOutput {
        invoice_line,
        total_distributed,
        lines,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "distribution_type": request.config.analytic_distribution_type,
        "rounding": "half-up to 2 dp per analytic line",
    });

    Ok(with_metadata(
        "Invoice line analytic distribution",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn share_of(total: Money, percentage: Decimal) -> Money {
    round_returned(total * percentage / HUNDRED)
}

fn axis_move_line(account: &AnalyticAccount, total: Money, date: NaiveDate) -> AnalyticMoveLine {
    AnalyticMoveLine {
        analytic_account: account.clone(),
        analytic_axis: account.axis.clone(),
        percentage: HUNDRED,
        amount: round_returned(total),
        date,
        status: AnalyticMoveLineStatus::ForecastInvoice,
    }
}
