//! Normalizes raw income and expense records into [Transaction]s.

use crate::{
    ValidationError,
    model::{RawExpense, RawIncome, RawTransaction, Transaction, TransactionKind, UNCATEGORIZED_LABEL},
    normalize::{Normalized, RecordSource, non_blank, parse_amount, parse_date},
};

const DEFAULT_INCOME_LABEL: &str = "Income";

/// Normalize the income and expense records of `owner_id`.
///
/// Incomes come first in the output, followed by expenses, each in input
/// order. Incomes are labelled by their source and expenses by their
/// category.
pub fn normalize_transactions(
    owner_id: &str,
    incomes: &[RawIncome],
    expenses: &[RawExpense],
) -> Normalized<Transaction> {
    let mut normalized = Normalized::default();

    for income in incomes {
        let record = RawTransaction::from(income.clone());
        let result = normalize_one(owner_id, TransactionKind::Income, &record);
        normalized.push(RecordSource::Income, income.id.as_deref(), result);
    }

    for expense in expenses {
        let record = RawTransaction::from(expense.clone());
        let result = normalize_one(owner_id, TransactionKind::Expense, &record);
        normalized.push(RecordSource::Expense, expense.id.as_deref(), result);
    }

    normalized
}

/// Normalize kind-tagged transaction records of `owner_id`, keeping input
/// order.
///
/// Records whose kind is missing or not one of "Income" and "Expense" are
/// skipped.
pub fn normalize_records(owner_id: &str, records: &[RawTransaction]) -> Normalized<Transaction> {
    let mut normalized = Normalized::default();

    for record in records {
        let result = match record.kind.as_deref() {
            Some(tag) => match TransactionKind::from_tag(tag) {
                Some(kind) => normalize_one(owner_id, kind, record),
                None => Err(ValidationError::UnknownKind(tag.to_owned())),
            },
            None => Err(ValidationError::UnknownKind(String::new())),
        };

        normalized.push(RecordSource::Transaction, record.id.as_deref(), result);
    }

    normalized
}

fn normalize_one(
    owner_id: &str,
    kind: TransactionKind,
    record: &RawTransaction,
) -> Result<Transaction, ValidationError> {
    let amount = parse_amount(record.amount.as_ref())?;
    let date = parse_date(record.date.as_deref())?;
    let title = non_blank(record.title.as_deref());

    let label = match (kind, non_blank(record.label.as_deref())) {
        (_, Some(label)) => label,
        (TransactionKind::Income, None) => title
            .clone()
            .unwrap_or_else(|| DEFAULT_INCOME_LABEL.to_owned()),
        (TransactionKind::Expense, None) => UNCATEGORIZED_LABEL.to_owned(),
    };

    Ok(Transaction {
        id: record.id.clone().unwrap_or_default(),
        owner_id: owner_id.to_owned(),
        kind,
        amount,
        label,
        date,
        title,
        notes: non_blank(record.notes.as_deref()),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::date;

    use super::{normalize_records, normalize_transactions};
    use crate::{
        ValidationError,
        model::{RawExpense, RawIncome, RawTransaction, TransactionKind},
        normalize::RecordSource,
    };

    fn income(id: &str, amount: serde_json::Value, source: Option<&str>, date: &str) -> RawIncome {
        RawIncome {
            id: Some(id.to_owned()),
            amount: Some(amount),
            source: source.map(str::to_owned),
            title: None,
            date: Some(date.to_owned()),
            notes: None,
        }
    }

    fn expense(id: &str, amount: serde_json::Value, category: Option<&str>, date: &str) -> RawExpense {
        RawExpense {
            id: Some(id.to_owned()),
            amount: Some(amount),
            category: category.map(str::to_owned),
            title: None,
            date: Some(date.to_owned()),
            notes: None,
        }
    }

    #[test]
    fn labels_incomes_by_source_and_expenses_by_category() {
        let normalized = normalize_transactions(
            "owner",
            &[income("i1", json!(2000), Some("Salary"), "2024-01-10")],
            &[expense("e1", json!(100), Some("Food"), "2024-01-05")],
        );

        assert!(normalized.skipped.is_empty());
        assert_eq!(normalized.records.len(), 2);

        let salary = &normalized.records[0];
        assert_eq!(salary.kind, TransactionKind::Income);
        assert_eq!(salary.label, "Salary");
        assert_eq!(salary.amount, 2000);
        assert_eq!(salary.owner_id, "owner");

        let food = &normalized.records[1];
        assert_eq!(food.kind, TransactionKind::Expense);
        assert_eq!(food.label, "Food");
        assert_eq!(food.date, date!(2024 - 01 - 05));
    }

    #[test]
    fn skips_bad_records_instead_of_zeroing_them() {
        let mut missing_amount = expense("e2", json!(0), Some("Food"), "2024-01-05");
        missing_amount.amount = None;
        let mut missing_date = expense("e3", json!(10), Some("Food"), "2024-01-05");
        missing_date.date = None;

        let normalized = normalize_transactions(
            "owner",
            &[income("i1", json!(-20), Some("Salary"), "2024-01-10")],
            &[
                expense("e1", json!(100), Some("Food"), "2024-01-05"),
                missing_amount,
                missing_date,
            ],
        );

        assert_eq!(normalized.records.len(), 1);
        assert_eq!(normalized.records[0].id, "e1");

        let reasons: Vec<_> = normalized
            .skipped
            .iter()
            .map(|skipped| (skipped.source, skipped.id.as_deref(), skipped.error.clone()))
            .collect();
        assert_eq!(
            reasons,
            vec![
                (
                    RecordSource::Income,
                    Some("i1"),
                    ValidationError::NegativeAmount("-20".to_owned())
                ),
                (RecordSource::Expense, Some("e2"), ValidationError::MissingAmount),
                (RecordSource::Expense, Some("e3"), ValidationError::MissingDate),
            ]
        );
    }

    #[test]
    fn falls_back_to_default_labels() {
        let mut titled_income = income("i1", json!(500), None, "2024-01-01");
        titled_income.title = Some("Freelance".to_owned());

        let normalized = normalize_transactions(
            "owner",
            &[titled_income, income("i2", json!(5), Some("  "), "2024-01-01")],
            &[expense("e1", json!(100), None, "2024-01-05")],
        );

        let labels: Vec<_> = normalized.records.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["Freelance", "Income", "Other"]);
    }

    #[test]
    fn normalizes_kind_tagged_records() {
        let records = vec![
            RawTransaction {
                id: Some("t1".to_owned()),
                kind: Some("Expense".to_owned()),
                amount: Some(json!(30)),
                label: Some("Rent".to_owned()),
                title: None,
                date: Some("2024-02-01".to_owned()),
                notes: Some("  February  ".to_owned()),
            },
            RawTransaction {
                id: Some("t2".to_owned()),
                kind: Some("Refund".to_owned()),
                amount: Some(json!(30)),
                label: None,
                title: None,
                date: Some("2024-02-01".to_owned()),
                notes: None,
            },
        ];

        let normalized = normalize_records("owner", &records);

        assert_eq!(normalized.records.len(), 1);
        assert_eq!(normalized.records[0].label, "Rent");
        assert_eq!(normalized.records[0].notes.as_deref(), Some("February"));
        assert_eq!(
            normalized.skipped[0].error,
            ValidationError::UnknownKind("Refund".to_owned())
        );
        assert_eq!(normalized.skipped[0].source, RecordSource::Transaction);
    }

    #[test]
    fn skips_mistyped_years_and_oversized_amounts() {
        let records: Vec<_> = [
            ("typo", json!(10), "9999-12-31"),
            ("huge1", json!(4_611_686_018_427_387_904_i64), "2024-01-05"),
            ("huge2", json!(4_611_686_018_427_387_904_i64), "2024-01-06"),
            ("fine", json!(10), "2024-01-07"),
        ]
        .into_iter()
        .map(|(id, amount, date)| RawTransaction {
            id: Some(id.to_owned()),
            kind: Some("Expense".to_owned()),
            amount: Some(amount),
            date: Some(date.to_owned()),
            ..Default::default()
        })
        .collect();

        let normalized = normalize_records("owner", &records);

        let kept: Vec<_> = normalized.records.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(kept, vec!["fine"]);
        assert_eq!(
            normalized.skipped[0].error,
            ValidationError::UnsupportedDate("9999-12-31".to_owned())
        );
        assert_eq!(
            normalized.skipped[1].error,
            ValidationError::AmountTooLarge("4611686018427387904".to_owned())
        );
        assert_eq!(normalized.skipped.len(), 3);
    }
}
