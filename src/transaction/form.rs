//! Validation for transactions submitted by the client before they are
//! forwarded upstream.

use serde::{Deserialize, Serialize};
use time::{
    Date, Time,
    format_description::BorrowedFormatItem,
    macros::format_description,
};

use crate::{
    Error,
    transaction::{TransactionType, parse_date},
};

const TIME_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[hour]:[minute]");
const TIME_WITH_SECONDS_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[hour]:[minute]:[second]");

/// The JSON body for creating a transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionForm {
    /// The date of the transaction as "YYYY-MM-DD".
    pub date: String,
    /// The time of day as "HH:MM".
    #[serde(default)]
    pub time: Option<String>,
    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// The amount, must be positive.
    pub amount: f64,
    /// The tag name.
    #[serde(default)]
    pub tag: Option<String>,
    /// Free text.
    #[serde(default)]
    pub note: Option<String>,
}

/// A transaction that passed validation, in the shape the upstream API expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTransaction {
    /// The date as "YYYY-MM-DD".
    pub date: String,
    /// The time of day, if given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// The amount, always positive.
    pub amount: f64,
    /// The tag name, if given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Free text, if given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

fn trimmed(text: Option<String>) -> Option<String> {
    text.map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

impl TransactionForm {
    /// Check the form and convert it into a [NewTransaction].
    ///
    /// `today` is the current date in the user's timezone.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::InvalidTransaction] if the date, time or amount is malformed.
    /// - [Error::FutureDate] if the date is after `today`.
    pub fn validate(self, today: Date) -> Result<NewTransaction, Error> {
        let date = parse_date(&self.date)
            .filter(|_| self.date.trim().len() == 10)
            .ok_or_else(|| {
                Error::InvalidTransaction(format!(
                    "\"{}\" is not a date, expected YYYY-MM-DD",
                    self.date
                ))
            })?;

        if date > today {
            return Err(Error::FutureDate(date));
        }

        let time = trimmed(self.time);
        if let Some(time) = &time {
            let is_valid = Time::parse(time, TIME_FORMAT).is_ok()
                || Time::parse(time, TIME_WITH_SECONDS_FORMAT).is_ok();

            if !is_valid {
                return Err(Error::InvalidTransaction(format!(
                    "\"{time}\" is not a time, expected HH:MM"
                )));
            }
        }

        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::InvalidTransaction(format!(
                "the amount must be greater than zero, got {}",
                self.amount
            )));
        }

        Ok(NewTransaction {
            date: date.to_string(),
            time,
            kind: self.kind,
            amount: self.amount,
            tag: trimmed(self.tag),
            note: trimmed(self.note),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::date;

    use crate::{Error, transaction::TransactionType};

    use super::{NewTransaction, TransactionForm};

    const TODAY: time::Date = date!(2025 - 03 - 10);

    fn form(amount: f64) -> TransactionForm {
        TransactionForm {
            date: "2025-03-01".to_owned(),
            time: Some("14:05".to_owned()),
            kind: TransactionType::Expense,
            amount,
            tag: Some("  Food ".to_owned()),
            note: Some("".to_owned()),
        }
    }

    #[test]
    fn accepts_a_valid_form() {
        let got = form(12.5).validate(TODAY).unwrap();

        assert_eq!(
            got,
            NewTransaction {
                date: "2025-03-01".to_owned(),
                time: Some("14:05".to_owned()),
                kind: TransactionType::Expense,
                amount: 12.5,
                tag: Some("Food".to_owned()),
                note: None,
            }
        );
    }

    #[test]
    fn accepts_today() {
        let mut today_form = form(1.0);
        today_form.date = "2025-03-10".to_owned();

        assert!(today_form.validate(TODAY).is_ok());
    }

    #[test]
    fn rejects_future_dates() {
        let mut future_form = form(1.0);
        future_form.date = "2025-03-11".to_owned();

        assert_eq!(
            future_form.validate(TODAY),
            Err(Error::FutureDate(date!(2025 - 03 - 11)))
        );
    }

    #[test]
    fn rejects_date_times() {
        let mut bad_form = form(1.0);
        bad_form.date = "2025-03-01T10:00:00Z".to_owned();

        assert!(matches!(
            bad_form.validate(TODAY),
            Err(Error::InvalidTransaction(_))
        ));
    }

    #[test]
    fn rejects_non_positive_amounts() {
        assert!(matches!(
            form(0.0).validate(TODAY),
            Err(Error::InvalidTransaction(_))
        ));
        assert!(matches!(
            form(-5.0).validate(TODAY),
            Err(Error::InvalidTransaction(_))
        ));
    }

    #[test]
    fn rejects_bad_times() {
        let mut bad_form = form(1.0);
        bad_form.time = Some("25:00".to_owned());

        assert!(matches!(
            bad_form.validate(TODAY),
            Err(Error::InvalidTransaction(_))
        ));
    }

    #[test]
    fn serializes_in_the_upstream_shape() {
        let new_transaction = form(3.0).validate(TODAY).unwrap();

        assert_eq!(
            serde_json::to_value(&new_transaction).unwrap(),
            json!({
                "date": "2025-03-01",
                "time": "14:05",
                "type": "expense",
                "amount": 3.0,
                "tag": "Food"
            })
        );
    }
}
