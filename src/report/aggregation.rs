//! Budget versus actual arithmetic over categories and transactions.
//!
//! These functions do no I/O; [super::query] loads the records and hands them
//! over. All sums are exact integer sums of whole currency units, and a sum
//! that does not fit in an `i64` is reported as [Error::AmountOverflow].

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    Error,
    amount::{checked_add, checked_sum},
    category::{Category, CategoryKind},
    database_id::CategoryId,
    transaction::Transaction,
};

/// Budgeted, actual and difference for one category in a month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRow {
    pub category: Category,
    pub budgeted: i64,
    pub actual: i64,
    pub difference: i64,
}

/// The totals over all category rows of one kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindTotals {
    pub budgeted: i64,
    pub actual: i64,
    pub difference: i64,
}

/// Income, expense and their balance over a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IncomeExpenseTotals {
    pub income: i64,
    pub expense: i64,
    pub balance: i64,
}

/// The budgeted versus actual delta, signed so that a positive value is good news.
///
/// For expenses that means spending less than budgeted, for income it means
/// earning more than the target.
pub fn difference(kind: CategoryKind, budgeted: i64, actual: i64) -> i64 {
    match kind {
        CategoryKind::Expense => budgeted - actual,
        CategoryKind::Income => actual - budgeted,
    }
}

/// Sums transaction amounts per category.
///
/// # Returns
/// HashMap mapping each category ID to the sum of its transactions' amounts.
/// Categories without transactions are absent.
///
/// # Errors
/// Returns [Error::AmountOverflow] if a category's sum does not fit in an `i64`.
pub fn sum_by_category(transactions: &[Transaction]) -> Result<HashMap<CategoryId, i64>, Error> {
    let mut totals = HashMap::new();

    for transaction in transactions {
        let total = totals.entry(transaction.category_id).or_insert(0);
        *total = checked_add(*total, transaction.amount)?;
    }

    Ok(totals)
}

/// Builds one row per category, in the order the categories are given.
///
/// Categories missing from `budgeted` or `actual` count as zero.
pub fn build_rows(
    categories: &[Category],
    budgeted: &HashMap<CategoryId, i64>,
    actual: &HashMap<CategoryId, i64>,
) -> Vec<CategoryRow> {
    categories
        .iter()
        .map(|category| {
            let budgeted = budgeted.get(&category.id).copied().unwrap_or(0);
            let actual = actual.get(&category.id).copied().unwrap_or(0);

            CategoryRow {
                category: category.clone(),
                budgeted,
                actual,
                difference: difference(category.kind, budgeted, actual),
            }
        })
        .collect()
}

/// Totals the rows of one kind.
///
/// The difference is taken between the totals rather than summed from the rows.
///
/// # Errors
/// Returns [Error::AmountOverflow] if either total does not fit in an `i64`.
pub fn kind_totals(kind: CategoryKind, rows: &[CategoryRow]) -> Result<KindTotals, Error> {
    let budgeted = checked_sum(rows.iter().map(|row| row.budgeted))?;
    let actual = checked_sum(rows.iter().map(|row| row.actual))?;

    Ok(KindTotals {
        budgeted,
        actual,
        difference: difference(kind, budgeted, actual),
    })
}

/// Sums transactions into income and expense by their category's kind,
/// regardless of any budgets.
///
/// Transactions whose category is not in `categories` are skipped.
///
/// # Errors
/// Returns [Error::AmountOverflow] if the income or expense total does not fit
/// in an `i64`.
pub fn income_expense_totals(
    categories: &[Category],
    transactions: &[Transaction],
) -> Result<IncomeExpenseTotals, Error> {
    let kinds: HashMap<CategoryId, CategoryKind> = categories
        .iter()
        .map(|category| (category.id, category.kind))
        .collect();

    let mut totals = IncomeExpenseTotals::default();

    for transaction in transactions {
        match kinds.get(&transaction.category_id) {
            Some(CategoryKind::Income) => {
                totals.income = checked_add(totals.income, transaction.amount)?;
            }
            Some(CategoryKind::Expense) => {
                totals.expense = checked_add(totals.expense, transaction.amount)?;
            }
            None => {}
        }
    }

    // Both totals are sums of non-negative amounts, so the balance cannot overflow.
    totals.balance = totals.income - totals.expense;
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use time::{OffsetDateTime, macros::date};

    use crate::{
        Error,
        category::{Category, CategoryKind, CategoryName},
        transaction::Transaction,
    };

    use super::{
        CategoryRow, IncomeExpenseTotals, KindTotals, build_rows, difference,
        income_expense_totals, kind_totals, sum_by_category,
    };

    fn category(id: i64, name: &str, kind: CategoryKind) -> Category {
        Category {
            id,
            name: CategoryName::new_unchecked(name),
            kind,
        }
    }

    fn transaction(id: i64, amount: i64, category_id: i64) -> Transaction {
        Transaction {
            id,
            description: String::new(),
            amount,
            date: date!(2025 - 03 - 10),
            category_id,
            monthly_budget_id: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn difference_sign_depends_on_kind() {
        assert_eq!(difference(CategoryKind::Expense, 500000, 300000), 200000);
        assert_eq!(difference(CategoryKind::Expense, 100, 250), -150);
        assert_eq!(difference(CategoryKind::Income, 1000, 1250), 250);
        assert_eq!(difference(CategoryKind::Income, 1000, 600), -400);
    }

    #[test]
    fn sums_amounts_per_category() {
        let transactions = [
            transaction(1, 100, 1),
            transaction(2, 250, 2),
            transaction(3, 50, 1),
        ];

        let totals = sum_by_category(&transactions);

        assert_eq!(totals, Ok(HashMap::from([(1, 150), (2, 250)])));
    }

    #[test]
    fn category_sum_overflow_is_an_error() {
        let transactions = [transaction(1, i64::MAX, 1), transaction(2, i64::MAX, 1)];

        assert_eq!(sum_by_category(&transactions), Err(Error::AmountOverflow));
    }

    #[test]
    fn rows_default_missing_amounts_to_zero() {
        let food = category(1, "Food", CategoryKind::Expense);
        let rent = category(2, "Rent", CategoryKind::Expense);
        let budgeted = HashMap::from([(1, 500000)]);
        let actual = HashMap::from([(2, 80000)]);

        let rows = build_rows(&[food.clone(), rent.clone()], &budgeted, &actual);

        assert_eq!(
            rows,
            vec![
                CategoryRow {
                    category: food,
                    budgeted: 500000,
                    actual: 0,
                    difference: 500000,
                },
                CategoryRow {
                    category: rent,
                    budgeted: 0,
                    actual: 80000,
                    difference: -80000,
                },
            ]
        );
    }

    #[test]
    fn totals_difference_matches_totals() {
        let rows = build_rows(
            &[
                category(1, "Food", CategoryKind::Expense),
                category(2, "Rent", CategoryKind::Expense),
            ],
            &HashMap::from([(1, 500000), (2, 1000000)]),
            &HashMap::from([(1, 300000), (2, 1200000)]),
        );

        let totals = kind_totals(CategoryKind::Expense, &rows).unwrap();

        assert_eq!(
            totals,
            KindTotals {
                budgeted: 1500000,
                actual: 1500000,
                difference: 0,
            }
        );
        assert_eq!(
            totals.difference,
            rows.iter().map(|row| row.difference).sum::<i64>()
        );
    }

    #[test]
    fn empty_rows_total_zero() {
        assert_eq!(
            kind_totals(CategoryKind::Income, &[]),
            Ok(KindTotals::default())
        );
    }

    #[test]
    fn kind_total_overflow_is_an_error() {
        let rows = build_rows(
            &[
                category(1, "Food", CategoryKind::Expense),
                category(2, "Rent", CategoryKind::Expense),
            ],
            &HashMap::from([(1, i64::MAX), (2, i64::MAX)]),
            &HashMap::new(),
        );

        assert_eq!(
            kind_totals(CategoryKind::Expense, &rows),
            Err(Error::AmountOverflow)
        );
    }

    #[test]
    fn income_and_expense_are_split_by_category_kind() {
        let categories = [
            category(1, "Salary", CategoryKind::Income),
            category(2, "Food", CategoryKind::Expense),
        ];
        let transactions = [
            transaction(1, 1000000, 1),
            transaction(2, 250000, 1),
            transaction(3, 400000, 2),
        ];

        assert_eq!(
            income_expense_totals(&categories, &transactions),
            Ok(IncomeExpenseTotals {
                income: 1250000,
                expense: 400000,
                balance: 850000,
            })
        );
    }

    #[test]
    fn income_total_overflow_is_an_error() {
        let categories = [category(1, "Salary", CategoryKind::Income)];
        let transactions = [transaction(1, i64::MAX, 1), transaction(2, i64::MAX, 1)];

        assert_eq!(
            income_expense_totals(&categories, &transactions),
            Err(Error::AmountOverflow)
        );
    }
}
