//! Transaction aggregation for the dashboard and reports.
//!
//! Provides functions to summarise a month, bucket a year by month, and total
//! a month's transactions by category. All of them are pure: they read a
//! snapshot of transactions and return fresh values.

use std::collections::HashMap;

use serde::Serialize;
use time::Month;

use crate::transaction::{Transaction, TransactionType, month_key};

/// Income, expense and balance over a period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// The year summarised, `None` for an all-time summary.
    pub year: Option<i32>,
    /// The month (1-12) summarised, `None` for an all-time summary.
    pub month: Option<u8>,
    /// Total income.
    pub income: f64,
    /// Total expenses.
    pub expense: f64,
    /// Income minus expenses, negative when more was spent than earned.
    pub balance: f64,
    /// The number of transactions in the period.
    pub transaction_count: usize,
}

/// Income and expense totals for one month of a year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPoint {
    /// Three-letter month name, e.g. "Jan".
    pub month: &'static str,
    /// The "YYYY-MM" key for the month.
    pub key: String,
    /// Total income in the month.
    pub income: f64,
    /// Total expenses in the month.
    pub expense: f64,
}

/// The total amount for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// The tag or category label.
    pub category: String,
    /// The summed amount.
    pub amount: f64,
}

/// A category total with its share of all categories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRow {
    /// The tag or category label.
    pub category: String,
    /// The summed amount.
    pub amount: f64,
    /// The share of the grand total as a percentage from 0 to 100.
    pub percent: f64,
}

fn summarize<'a>(transactions: impl Iterator<Item = &'a Transaction>) -> Summary {
    let mut income = 0.0;
    let mut expense = 0.0;
    let mut transaction_count = 0;

    for transaction in transactions {
        match transaction.kind {
            TransactionType::Income => income += transaction.amount,
            TransactionType::Expense => expense += transaction.amount,
        }
        transaction_count += 1;
    }

    Summary {
        year: None,
        month: None,
        income,
        expense,
        balance: income - expense,
        transaction_count,
    }
}

/// Summarises the transactions dated in `month` (1-12) of `year`.
///
/// Transactions with unparseable dates are left out.
pub fn build_summary(transactions: &[Transaction], year: i32, month: u8) -> Summary {
    let in_month = transactions
        .iter()
        .filter(|transaction| transaction.is_in_month(year, month));

    Summary {
        year: Some(year),
        month: Some(month),
        ..summarize(in_month)
    }
}

/// Summarises every transaction regardless of date.
pub fn build_total_summary(transactions: &[Transaction]) -> Summary {
    summarize(transactions.iter())
}

/// Formats a month as a three-letter abbreviation.
fn month_label(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

/// Totals income and expenses for each month of `year`.
///
/// Always returns twelve points, January first, so chart axes do not depend
/// on which months have data. Transactions from other years or with
/// unparseable dates are ignored.
pub fn build_monthly_series(transactions: &[Transaction], year: i32) -> [MonthlyPoint; 12] {
    let mut series: [MonthlyPoint; 12] = std::array::from_fn(|index| {
        let month_number = index as u8 + 1;
        let month = Month::try_from(month_number).unwrap_or(Month::January);

        MonthlyPoint {
            month: month_label(month),
            key: month_key(year, month_number),
            income: 0.0,
            expense: 0.0,
        }
    });

    for transaction in transactions {
        let Some(date) = transaction.parsed_date.filter(|date| date.year() == year) else {
            continue;
        };

        let point = &mut series[usize::from(u8::from(date.month())) - 1];
        match transaction.kind {
            TransactionType::Income => point.income += transaction.amount,
            TransactionType::Expense => point.expense += transaction.amount,
        }
    }

    series
}

/// Totals the `kind` transactions in `month` (1-12) of `year` by category.
///
/// The result is sorted by amount, largest first. Categories with equal
/// amounts keep the order they were first seen in.
pub fn build_category_series(
    transactions: &[Transaction],
    year: i32,
    month: u8,
    kind: TransactionType,
) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    let matching = transactions
        .iter()
        .filter(|transaction| transaction.kind == kind && transaction.is_in_month(year, month));

    for transaction in matching {
        match positions.get(transaction.category.as_str()) {
            Some(&position) => totals[position].amount += transaction.amount,
            None => {
                positions.insert(&transaction.category, totals.len());
                totals.push(CategoryTotal {
                    category: transaction.category.clone(),
                    amount: transaction.amount,
                });
            }
        }
    }

    totals.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    totals
}

/// Adds each category's percentage of the grand total.
///
/// All percentages are zero when the total is zero.
pub fn with_percentages(totals: Vec<CategoryTotal>) -> Vec<CategoryRow> {
    let grand_total: f64 = totals.iter().map(|total| total.amount).sum();

    totals
        .into_iter()
        .map(|total| CategoryRow {
            percent: if grand_total > 0.0 {
                total.amount / grand_total * 100.0
            } else {
                0.0
            },
            category: total.category,
            amount: total.amount,
        })
        .collect()
}
