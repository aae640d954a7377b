//! Validation of transaction payloads received from clients.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error, ValidationErrors,
    transaction::core::{NewTransaction, TransactionKind},
};

/// The most characters a description may have.
pub const MAX_DESCRIPTION_LENGTH: usize = 200;
/// The most digits an amount may have, including the fractional digits.
pub const MAX_AMOUNT_DIGITS: u32 = 12;
/// The most digits an amount may have after the decimal point.
pub const MAX_AMOUNT_DECIMAL_PLACES: u32 = 2;

const ENTRY_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");
const ISO_DATE_LENGTH: usize = "YYYY-MM-DD".len();

/// An amount as sent by a client, either a JSON number or a decimal string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    /// e.g. `100.5`
    Number(serde_json::Number),
    /// e.g. `"100.50"`
    Text(String),
}

/// The payload for creating a transaction, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionForm {
    /// Either "income" or "expense".
    pub kind: String,
    /// The value of the transaction in dollars.
    pub amount: RawAmount,
    /// Text detailing the transaction.
    pub description: String,
    /// The date when the transaction occurred, formatted as YYYY-MM-DD.
    pub entry_date: String,
}

impl TransactionForm {
    /// Check every field and convert the form into a [NewTransaction].
    ///
    /// # Errors
    ///
    /// Returns an [Error::Validation] listing every field that failed.
    pub fn validate(self) -> Result<NewTransaction, Error> {
        let mut errors = ValidationErrors::default();

        let kind = TransactionKind::from_str(&self.kind)
            .map_err(|_| errors.push("kind", "must be either \"income\" or \"expense\""))
            .ok();
        let amount = validate_amount(&self.amount)
            .map_err(|message| errors.push("amount", message))
            .ok();
        let description = validate_description(&self.description)
            .map_err(|message| errors.push("description", message))
            .ok();
        let entry_date = validate_entry_date(&self.entry_date)
            .map_err(|message| errors.push("entry_date", message))
            .ok();

        match (kind, amount, description, entry_date) {
            (Some(kind), Some(amount), Some(()), Some(entry_date)) => {
                Ok(NewTransaction {
                    kind,
                    amount,
                    description: self.description,
                    entry_date,
                })
            }
            _ => Err(Error::Validation(errors)),
        }
    }
}

/// Parse and range check an amount, returning it with exactly two decimal places.
fn validate_amount(raw_amount: &RawAmount) -> Result<Decimal, String> {
    let text = match raw_amount {
        RawAmount::Number(number) => number.to_string(),
        RawAmount::Text(text) => text.clone(),
    };

    // Decimal rounds away digits it cannot hold, so count them before parsing.
    if written_significant_digits(&text) > MAX_AMOUNT_DIGITS as usize {
        return Err(format!(
            "must have no more than {MAX_AMOUNT_DIGITS} digits in total and \
             {MAX_AMOUNT_DECIMAL_PLACES} decimal places"
        ));
    }

    let amount = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| format!("\"{text}\" is not a valid decimal number"))?;

    if amount <= Decimal::ZERO {
        return Err("must be greater than 0".to_owned());
    }

    let normalized = amount.normalize();
    let decimal_places = normalized.scale();
    let significant_digits = normalized.mantissa().unsigned_abs().to_string().len() as u32;
    let total_digits = significant_digits.max(decimal_places);
    let whole_digits = total_digits - decimal_places;

    if decimal_places > MAX_AMOUNT_DECIMAL_PLACES {
        return Err(format!(
            "must have no more than {MAX_AMOUNT_DECIMAL_PLACES} decimal places"
        ));
    }

    if total_digits > MAX_AMOUNT_DIGITS {
        return Err(format!(
            "must have no more than {MAX_AMOUNT_DIGITS} digits in total"
        ));
    }

    if whole_digits > MAX_AMOUNT_DIGITS - MAX_AMOUNT_DECIMAL_PLACES {
        return Err(format!(
            "must have no more than {} digits before the decimal point",
            MAX_AMOUNT_DIGITS - MAX_AMOUNT_DECIMAL_PLACES
        ));
    }

    let mut amount = normalized;
    amount.rescale(MAX_AMOUNT_DECIMAL_PLACES);

    Ok(amount)
}

/// The digits from the first to the last non-zero digit of `text`, ignoring any exponent.
fn written_significant_digits(text: &str) -> usize {
    let mantissa = text.split(['e', 'E']).next().unwrap_or_default();
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();

    digits.trim_matches('0').len()
}

fn validate_description(description: &str) -> Result<(), String> {
    let length = description.chars().count();

    if length == 0 {
        Err("must not be empty".to_owned())
    } else if length > MAX_DESCRIPTION_LENGTH {
        Err(format!(
            "must be at most {MAX_DESCRIPTION_LENGTH} characters, got {length}"
        ))
    } else {
        Ok(())
    }
}

/// Parse a date written as exactly four digit year, month and day, with a year from 1 to 9999.
fn validate_entry_date(entry_date: &str) -> Result<Date, String> {
    let date = Date::parse(entry_date, ENTRY_DATE_FORMAT)
        .map_err(|error| format!("\"{entry_date}\" is not a valid date (YYYY-MM-DD): {error}"))?;

    // `[year]` also accepts a sign and year zero, which would not sort as text.
    if entry_date.len() != ISO_DATE_LENGTH
        || !entry_date.starts_with(|c: char| c.is_ascii_digit())
        || !(1..=9999).contains(&date.year())
    {
        return Err(format!(
            "\"{entry_date}\" is not a valid date (YYYY-MM-DD): the year must be from 0001 to 9999"
        ));
    }

    Ok(date)
}
