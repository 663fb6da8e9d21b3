//! Dashboard and report route handlers.
//!
//! Each handler fetches a fresh snapshot of the user's transactions from the
//! upstream API and derives the requested view from it.

use axum::{
    Json,
    extract::{FromRef, Query, State, rejection::QueryRejection},
};
use serde::Serialize;

use crate::{
    AppState, Error,
    dashboard::{
        aggregation::{
            CategoryRow, MonthlyPoint, Summary, build_category_series, build_monthly_series,
            build_summary, build_total_summary, with_percentages,
        },
        other::{CompressedSlices, DEFAULT_OTHER_THRESHOLD, Slice, compress_slices},
        query::{
            CategoryQuery, DEFAULT_CATEGORY_TYPE, PeriodQuery, RecentQuery, YearQuery,
            parse_query, resolve_category_type,
        },
        recent::{RecentRow, build_recent},
    },
    session::Session,
    timezone::local_today,
    transaction::{Transaction, TransactionType, normalize_all},
    upstream::UpstreamClient,
};

/// The number of recent transactions shown on the dashboard.
const DASHBOARD_RECENT_COUNT: usize = 5;

/// The state needed by the dashboard and report handlers.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The client for fetching transactions.
    pub upstream: UpstreamClient,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The number of recent transactions to list when no limit is given.
    pub recent_limit: usize,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            upstream: state.upstream.clone(),
            local_timezone: state.local_timezone.clone(),
            recent_limit: state.recent_limit,
        }
    }
}

/// Everything the dashboard page shows for one month.
#[derive(Debug, Serialize)]
pub struct DashboardData {
    summary: Summary,
    monthly: [MonthlyPoint; 12],
    categories: Vec<CategoryRow>,
    recent: Vec<RecentRow>,
}

/// The category breakdown for one month and transaction type.
#[derive(Debug, Serialize)]
pub struct CategoryReport {
    #[serde(rename = "type")]
    kind: TransactionType,
    year: i32,
    month: u8,
    total: f64,
    rows: Vec<CategoryRow>,
}

async fn fetch_snapshot(
    upstream: &UpstreamClient,
    session: &Session,
) -> Result<Vec<Transaction>, Error> {
    let raw = upstream
        .transactions(session.token())
        .await
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    Ok(normalize_all(raw))
}

/// Get the summary, monthly series, expense categories and latest
/// transactions for a month.
pub async fn get_dashboard(
    State(state): State<DashboardState>,
    session: Session,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Result<Json<DashboardData>, Error> {
    let query = parse_query(query)?;
    let period = query.resolve(local_today(&state.local_timezone)?)?;
    let transactions = fetch_snapshot(&state.upstream, &session).await?;

    let categories = build_category_series(
        &transactions,
        period.year,
        period.month,
        DEFAULT_CATEGORY_TYPE,
    );
    let mut recent = build_recent(&transactions);
    recent.truncate(DASHBOARD_RECENT_COUNT);

    Ok(Json(DashboardData {
        summary: build_summary(&transactions, period.year, period.month),
        monthly: build_monthly_series(&transactions, period.year),
        categories: with_percentages(categories),
        recent,
    }))
}

/// Get the income, expense and balance for a month.
pub async fn get_summary(
    State(state): State<DashboardState>,
    session: Session,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Result<Json<Summary>, Error> {
    let query = parse_query(query)?;
    let period = query.resolve(local_today(&state.local_timezone)?)?;
    let transactions = fetch_snapshot(&state.upstream, &session).await?;

    Ok(Json(build_summary(&transactions, period.year, period.month)))
}

/// Get the income, expense and balance over all time.
pub async fn get_total_summary(
    State(state): State<DashboardState>,
    session: Session,
) -> Result<Json<Summary>, Error> {
    let transactions = fetch_snapshot(&state.upstream, &session).await?;

    Ok(Json(build_total_summary(&transactions)))
}

/// Get the monthly income and expense totals for a year.
pub async fn get_monthly_series(
    State(state): State<DashboardState>,
    session: Session,
    query: Result<Query<YearQuery>, QueryRejection>,
) -> Result<Json<[MonthlyPoint; 12]>, Error> {
    let query = parse_query(query)?;
    let year = match query.year {
        Some(year) => year,
        None => local_today(&state.local_timezone)?.year(),
    };
    let transactions = fetch_snapshot(&state.upstream, &session).await?;

    Ok(Json(build_monthly_series(&transactions, year)))
}

/// Get the category totals and percentages for a month.
pub async fn get_categories(
    State(state): State<DashboardState>,
    session: Session,
    query: Result<Query<CategoryQuery>, QueryRejection>,
) -> Result<Json<CategoryReport>, Error> {
    let query = parse_query(query)?;
    let period = query
        .period()
        .resolve(local_today(&state.local_timezone)?)?;
    let kind = resolve_category_type(query.kind);
    let transactions = fetch_snapshot(&state.upstream, &session).await?;

    let rows = with_percentages(build_category_series(
        &transactions,
        period.year,
        period.month,
        kind,
    ));

    Ok(Json(CategoryReport {
        kind,
        year: period.year,
        month: period.month,
        total: rows.iter().map(|row| row.amount).sum(),
        rows,
    }))
}

/// Get the category totals for a month as chart slices, with the smallest
/// folded into "Other".
pub async fn get_category_slices(
    State(state): State<DashboardState>,
    session: Session,
    query: Result<Query<CategoryQuery>, QueryRejection>,
) -> Result<Json<CompressedSlices>, Error> {
    let query = parse_query(query)?;
    let period = query
        .period()
        .resolve(local_today(&state.local_timezone)?)?;
    let kind = resolve_category_type(query.kind);
    let threshold = query
        .threshold
        .filter(|threshold| threshold.is_finite())
        .unwrap_or(DEFAULT_OTHER_THRESHOLD)
        .clamp(0.0, 100.0);
    let transactions = fetch_snapshot(&state.upstream, &session).await?;

    let slices: Vec<Slice> =
        build_category_series(&transactions, period.year, period.month, kind)
            .into_iter()
            .map(|total| Slice {
                name: total.category,
                value: total.amount,
            })
            .collect();

    Ok(Json(compress_slices(&slices, threshold)))
}

/// Get the latest transactions, newest first.
pub async fn get_recent_transactions(
    State(state): State<DashboardState>,
    session: Session,
    query: Result<Query<RecentQuery>, QueryRejection>,
) -> Result<Json<Vec<RecentRow>>, Error> {
    let query = parse_query(query)?;
    let limit = query.limit.unwrap_or(state.recent_limit);
    let transactions = fetch_snapshot(&state.upstream, &session).await?;

    let mut recent = build_recent(&transactions);
    recent.truncate(limit);

    Ok(Json(recent))
}
