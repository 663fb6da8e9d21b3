//! Dashboard module
//!
//! Derives summaries, monthly series, category breakdowns and the recent
//! transactions list from a snapshot of the user's transactions.

mod aggregation;
mod handlers;
mod other;
mod query;
mod recent;

pub use aggregation::{
    CategoryRow, CategoryTotal, MonthlyPoint, Summary, build_category_series,
    build_monthly_series, build_summary, build_total_summary, with_percentages,
};
pub use handlers::{
    DashboardState, get_categories, get_category_slices, get_dashboard, get_monthly_series,
    get_recent_transactions, get_summary, get_total_summary,
};
pub use other::{CompressedSlices, DEFAULT_OTHER_THRESHOLD, Slice, compress_slices};
pub use query::{
    CategoryQuery, CategoryType, DEFAULT_CATEGORY_TYPE, Period, PeriodQuery, RecentQuery,
    YearQuery, resolve_category_type,
};
pub use recent::{RecentRow, build_recent};
