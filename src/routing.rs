//! Application router configuration.

use axum::{
    Router,
    routing::{delete, get},
};

use crate::{
    AppState,
    dashboard::{
        get_categories, get_category_slices, get_dashboard, get_monthly_series,
        get_recent_transactions, get_summary, get_total_summary,
    },
    endpoints,
    not_found::get_404_not_found,
    tag::get_tags,
    transaction::{create_transaction, delete_transaction, get_transactions},
};

/// Return a router with all the app's routes.
///
/// Every route reads the caller's session token from the `token` cookie, so
/// there is no separate set of unprotected routes.
pub fn build_router(state: AppState) -> Router {
    let report_routes = Router::new()
        .route(endpoints::DASHBOARD, get(get_dashboard))
        .route(endpoints::SUMMARY, get(get_summary))
        .route(endpoints::TOTAL_SUMMARY, get(get_total_summary))
        .route(endpoints::MONTHLY_SERIES, get(get_monthly_series))
        .route(endpoints::CATEGORIES, get(get_categories))
        .route(endpoints::CATEGORY_SLICES, get(get_category_slices));

    let transaction_routes = Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions).post(create_transaction),
        )
        .route(
            endpoints::RECENT_TRANSACTIONS,
            get(get_recent_transactions),
        )
        .route(endpoints::TRANSACTION, delete(delete_transaction))
        .route(endpoints::TAGS, get(get_tags));

    report_routes
        .merge(transaction_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}
