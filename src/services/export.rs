use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::transaction::Transaction;
use crate::services::ledger;

/// One exported ledger row. `Balance` is the running balance after this
/// row, fixed to two decimal places.
#[derive(Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "Debit")]
    debit: String,
    #[serde(rename = "Credit")]
    credit: String,
    #[serde(rename = "Balance")]
    balance: String,
}

/// Renders a ledger as a CSV document, one row per transaction in storage
/// order, with the derived running balance in the last column.
pub fn export_ledger(transactions: &[Transaction]) -> Result<String> {
    let balances = ledger::running_balance(transactions);
    let mut writer = csv::Writer::from_writer(Vec::new());

    for (transaction, balance) in transactions.iter().zip(&balances) {
        writer
            .serialize(ExportRow {
                date: transaction.date.format("%Y-%m-%d").to_string(),
                description: &transaction.description,
                debit: transaction.debit.map(|d| d.to_string()).unwrap_or_default(),
                credit: transaction.credit.map(|c| c.to_string()).unwrap_or_default(),
                balance: format!("{:.2}", balance),
            })
            .map_err(|e| AppError::Internal(format!("CSV write error: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV flush error: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("CSV encoding error: {}", e)))
}

/// A parsed salary-slip record: column name → cell value.
pub type SlipRecord = serde_json::Map<String, serde_json::Value>;

/// Parses an arbitrary tabular document into key→value records.
///
/// Schema-agnostic by design: whatever columns the document has become the
/// record keys. The output feeds a generic render step, not the ledger.
pub fn import_salary_slips(document: &str) -> Result<Vec<SlipRecord>> {
    let mut reader = csv::Reader::from_reader(document.as_bytes());
    let headers = reader
        .headers()
        .map_err(|e| AppError::Validation(format!("Invalid document: {}", e)))?
        .clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| AppError::Validation(format!("Invalid document: {}", e)))?;
        let mut record = SlipRecord::new();
        for (header, value) in headers.iter().zip(row.iter()) {
            record.insert(
                header.to_string(),
                serde_json::Value::String(value.to_string()),
            );
        }
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::TransactionInput;
    use crate::validation::transactions::{validate_transaction, MoneyInput};
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn tx(date: &str, description: &str, debit: Option<&str>, credit: Option<&str>) -> Transaction {
        let now = Utc::now();
        Transaction {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            description: description.to_string(),
            debit: debit.map(dec),
            credit: credit.map(dec),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn export_has_the_expected_columns_and_balances() {
        let ledger = vec![
            tx("2024-01-01", "open", Some("100"), None),
            tx("2024-01-02", "fee", None, Some("20")),
        ];
        let csv = export_ledger(&ledger).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Date,Description,Debit,Credit,Balance"));
        assert_eq!(lines.next(), Some("2024-01-01,open,100,,100.00"));
        assert_eq!(lines.next(), Some("2024-01-02,fee,,20,80.00"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn empty_ledger_exports_headers_or_nothing() {
        // csv only writes headers alongside the first record; an empty
        // ledger therefore exports an empty document.
        let csv = export_ledger(&[]).unwrap();
        assert!(csv.is_empty());
    }

    #[test]
    fn import_is_schema_agnostic() {
        let doc = "Name,Month,Net Salary\nJane,January,4200\nOmar,January,3900\n";
        let records = import_salary_slips(doc).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["Name"], "Jane");
        assert_eq!(records[1]["Net Salary"], "3900");
    }

    #[test]
    fn import_of_empty_document_yields_no_records() {
        assert!(import_salary_slips("").unwrap().is_empty());
    }

    #[test]
    fn export_then_reimport_reproduces_the_balance_sequence() {
        let original = vec![
            tx("2024-02-01", "invoice", Some("1250.75"), None),
            tx("2024-01-15", "backdated fee", None, Some("12.50")),
            tx("2024-02-03", "payment", None, Some("1000")),
            tx("2024-02-04", "mixed", Some("10"), Some("4")),
        ];
        let exported = export_ledger(&original).unwrap();

        // Re-read Date/Description/Debit/Credit (Balance is derived and
        // deliberately ignored) and rebuild the ledger.
        let reimported: Vec<Transaction> = import_salary_slips(&exported)
            .unwrap()
            .into_iter()
            .map(|record| {
                let cell = |key: &str| record[key].as_str().unwrap().to_string();
                let date = NaiveDate::parse_from_str(&cell("Date"), "%Y-%m-%d").unwrap();
                let debit = MoneyInput::Text(cell("Debit"));
                let credit = MoneyInput::Text(cell("Credit"));
                let input: TransactionInput = validate_transaction(
                    Some(date),
                    Some(&cell("Description")),
                    Some(&debit),
                    Some(&credit),
                )
                .unwrap();
                let now = Utc::now();
                Transaction {
                    id: Uuid::new_v4(),
                    client_id: Uuid::new_v4(),
                    date: input.date,
                    description: input.description,
                    debit: input.debit,
                    credit: input.credit,
                    created_at: now,
                    updated_at: now,
                }
            })
            .collect();

        assert_eq!(
            ledger::running_balance(&original),
            ledger::running_balance(&reimported)
        );
    }
}
