use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::transaction::TransactionInput;

/// A monetary field as it arrives on the wire.
///
/// Browsers send numbers, spreadsheet-shaped clients send strings; both are
/// accepted, but a string that does not parse as a decimal is rejected
/// instead of being coerced to zero.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum MoneyInput {
    Number(Decimal),
    Text(String),
}

/// Parses an optional monetary field into a non-negative decimal.
///
/// An absent field or an empty string stays absent, not zero; the balance
/// fold treats the two the same but the stored row keeps the distinction.
pub fn parse_money(field: &str, value: Option<&MoneyInput>) -> Result<Option<Decimal>> {
    let amount = match value {
        None => return Ok(None),
        Some(MoneyInput::Number(n)) => *n,
        Some(MoneyInput::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed.parse::<Decimal>().map_err(|_| {
                AppError::Validation(format!("{} must be a number", field))
            })?
        }
    };

    if amount.is_sign_negative() {
        return Err(AppError::Validation(format!(
            "{} must not be negative",
            field
        )));
    }
    Ok(Some(amount))
}

/// Validates a transaction body (create, bulk row or update).
pub fn validate_transaction(
    date: Option<NaiveDate>,
    description: Option<&str>,
    debit: Option<&MoneyInput>,
    credit: Option<&MoneyInput>,
) -> Result<TransactionInput> {
    let (date, description) = match (date, description) {
        (Some(date), Some(description)) if !description.trim().is_empty() => {
            (date, description.trim().to_string())
        }
        _ => {
            return Err(AppError::Validation(
                "Date and description are required".to_string(),
            ))
        }
    };

    Ok(TransactionInput {
        date,
        description,
        debit: parse_money("Debit", debit)?,
        credit: parse_money("Credit", credit)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn date() -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2024, 1, 1)
    }

    #[test]
    fn missing_date_or_description_is_rejected() {
        let err = validate_transaction(None, Some("rent"), None, None).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = validate_transaction(date(), None, None, None).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = validate_transaction(date(), Some("   "), None, None).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn absent_amounts_stay_absent() {
        let input = validate_transaction(date(), Some("rent"), None, None).unwrap();
        assert_eq!(input.debit, None);
        assert_eq!(input.credit, None);
    }

    #[test]
    fn empty_string_amount_is_absent_not_zero() {
        let debit = MoneyInput::Text("".to_string());
        let input = validate_transaction(date(), Some("rent"), Some(&debit), None).unwrap();
        assert_eq!(input.debit, None);
    }

    #[test]
    fn textual_amount_is_parsed() {
        let debit = MoneyInput::Text("100.50".to_string());
        let input = validate_transaction(date(), Some("rent"), Some(&debit), None).unwrap();
        assert_eq!(input.debit, Some(dec("100.50")));
    }

    #[test]
    fn unparseable_text_is_rejected_not_zeroed() {
        let debit = MoneyInput::Text("abc".to_string());
        let err = validate_transaction(date(), Some("rent"), Some(&debit), None).unwrap_err();
        match err {
            AppError::Validation(msg) => assert!(msg.contains("Debit")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let credit = MoneyInput::Number(dec("-5"));
        assert!(validate_transaction(date(), Some("fee"), None, Some(&credit)).is_err());
    }

    #[test]
    fn both_debit_and_credit_may_be_present() {
        let debit = MoneyInput::Number(dec("10"));
        let credit = MoneyInput::Number(dec("4"));
        let input =
            validate_transaction(date(), Some("mixed"), Some(&debit), Some(&credit)).unwrap();
        assert_eq!(input.debit, Some(dec("10")));
        assert_eq!(input.credit, Some(dec("4")));
    }
}
