//! Query string parameters for the dashboard and report routes.

use axum::extract::{Query, rejection::QueryRejection};
use serde::Deserialize;
use time::Date;

use crate::{Error, transaction::TransactionType};

/// The transaction type category views fall back to when asked for "all" or
/// when no type is given.
pub const DEFAULT_CATEGORY_TYPE: TransactionType = TransactionType::Expense;

/// The transaction type requested by a category view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    /// Income categories.
    Income,
    /// Expense categories.
    Expense,
    /// Both, which category views do not support.
    All,
}

/// Resolve the requested category type, using [DEFAULT_CATEGORY_TYPE] for
/// "all" or a missing type.
pub fn resolve_category_type(requested: Option<CategoryType>) -> TransactionType {
    match requested {
        Some(CategoryType::Income) => TransactionType::Income,
        Some(CategoryType::Expense) => TransactionType::Expense,
        Some(CategoryType::All) | None => DEFAULT_CATEGORY_TYPE,
    }
}

/// Unwrap a query string, turning a rejection into [Error::InvalidQuery].
pub fn parse_query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, Error> {
    query.map(|Query(query)| query).map_err(|rejection| {
        tracing::debug!("rejected query string: {rejection}");
        Error::InvalidQuery(rejection.body_text())
    })
}

/// A month of a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    /// The year.
    pub year: i32,
    /// The month from 1 to 12.
    pub month: u8,
}

/// `?year=2025&month=1`, both optional.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    /// The year, defaults to the current year.
    pub year: Option<i32>,
    /// The month from 1 to 12, defaults to the current month.
    pub month: Option<u8>,
}

impl PeriodQuery {
    /// Fill in missing fields from `today`.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if the month is not from 1 to 12.
    pub fn resolve(&self, today: Date) -> Result<Period, Error> {
        let month = self.month.unwrap_or_else(|| today.month().into());

        if !(1..=12).contains(&month) {
            return Err(Error::InvalidMonth(month));
        }

        Ok(Period {
            year: self.year.unwrap_or_else(|| today.year()),
            month,
        })
    }
}

/// `?year=2025`, defaults to the current year.
#[derive(Debug, Default, Deserialize)]
pub struct YearQuery {
    /// The year.
    pub year: Option<i32>,
}

/// `?year=2025&month=1&type=expense&threshold=10`, all optional.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    /// The year.
    pub year: Option<i32>,
    /// The month from 1 to 12.
    pub month: Option<u8>,
    /// "income", "expense" or "all".
    #[serde(rename = "type")]
    pub kind: Option<CategoryType>,
    /// The largest share, in percent, of the "Other" slice.
    pub threshold: Option<f64>,
}

impl CategoryQuery {
    /// The period part of the query.
    pub fn period(&self) -> PeriodQuery {
        PeriodQuery {
            year: self.year,
            month: self.month,
        }
    }
}

/// `?limit=10`.
#[derive(Debug, Default, Deserialize)]
pub struct RecentQuery {
    /// The maximum number of rows to return.
    pub limit: Option<usize>,
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{Error, transaction::TransactionType};

    use super::{
        CategoryType, DEFAULT_CATEGORY_TYPE, Period, PeriodQuery, resolve_category_type,
    };

    #[test]
    fn all_and_missing_types_default_to_expense() {
        assert_eq!(DEFAULT_CATEGORY_TYPE, TransactionType::Expense);
        assert_eq!(
            resolve_category_type(Some(CategoryType::All)),
            TransactionType::Expense
        );
        assert_eq!(resolve_category_type(None), TransactionType::Expense);
    }

    #[test]
    fn explicit_types_are_kept() {
        assert_eq!(
            resolve_category_type(Some(CategoryType::Income)),
            TransactionType::Income
        );
        assert_eq!(
            resolve_category_type(Some(CategoryType::Expense)),
            TransactionType::Expense
        );
    }

    #[test]
    fn period_defaults_to_today() {
        let period = PeriodQuery::default().resolve(date!(2025 - 06 - 15));

        assert_eq!(period, Ok(Period { year: 2025, month: 6 }));
    }

    #[test]
    fn period_keeps_explicit_values() {
        let query = PeriodQuery {
            year: Some(2020),
            month: Some(2),
        };

        assert_eq!(
            query.resolve(date!(2025 - 06 - 15)),
            Ok(Period { year: 2020, month: 2 })
        );
    }

    #[test]
    fn period_rejects_invalid_months() {
        for month in [0, 13] {
            let query = PeriodQuery {
                year: None,
                month: Some(month),
            };

            assert_eq!(
                query.resolve(date!(2025 - 06 - 15)),
                Err(Error::InvalidMonth(month))
            );
        }
    }
}
