//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/transactions/{transaction_id}', use [format_endpoint].

use std::fmt::Display;

/// The combined dashboard view for one month.
pub const DASHBOARD: &str = "/api/dashboard";
/// The income, expense and balance for one month.
pub const SUMMARY: &str = "/api/reports/summary";
/// The income, expense and balance over all time.
pub const TOTAL_SUMMARY: &str = "/api/reports/summary/total";
/// The monthly income and expense totals for one year.
pub const MONTHLY_SERIES: &str = "/api/reports/monthly";
/// The category totals and percentages for one month.
pub const CATEGORIES: &str = "/api/reports/categories";
/// The category totals for one month as chart slices.
pub const CATEGORY_SLICES: &str = "/api/reports/categories/slices";
/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The latest transactions, newest first.
pub const RECENT_TRANSACTIONS: &str = "/api/transactions/recent";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to list tags.
pub const TAGS: &str = "/api/tags";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/transactions/{transaction_id}',
/// '{transaction_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: impl Display) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
