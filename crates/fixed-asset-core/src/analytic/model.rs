use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

/// Number of analytic axes carried by an invoice line.
pub const AXIS_COUNT: usize = 5;

/// Company-level rule for where an invoice line's template comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticDistributionType {
    /// Lines are entered by hand and never recomputed
    #[default]
    Free,
    PerPartner,
    PerProduct,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticMoveLineStatus {
    ForecastOrder,
    #[default]
    ForecastInvoice,
    RealAccounting,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    #[serde(default)]
    pub analytic_distribution_type: AnalyticDistributionType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticAccount {
    pub code: String,
    #[serde(default)]
    pub name: String,
    /// Axis the account belongs to, e.g. "department"
    pub axis: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticDistributionLine {
    pub analytic_account: AnalyticAccount,
    /// Percentage of the line total, 0..=100
    pub percentage: Rate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticDistributionTemplate {
    pub name: String,
    pub lines: Vec<AnalyticDistributionLine>,
}

/// General-ledger account of an invoice line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub code: String,
    #[serde(default)]
    pub analytic_distribution_authorized: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytic_distribution_template: Option<AnalyticDistributionTemplate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticMoveLine {
    pub analytic_account: AnalyticAccount,
    pub analytic_axis: String,
    pub percentage: Rate,
    pub amount: Money,
    pub date: NaiveDate,
    #[serde(default)]
    pub status: AnalyticMoveLineStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    #[serde(default)]
    pub product_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<Account>,
    pub company_ex_tax_total: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytic_distribution_template: Option<AnalyticDistributionTemplate>,
    #[serde(default)]
    pub analytic_move_lines: Vec<AnalyticMoveLine>,
    /// One optional analytic account per axis
    #[serde(default)]
    pub axis_analytic_accounts: [Option<AnalyticAccount>; AXIS_COUNT],
}
