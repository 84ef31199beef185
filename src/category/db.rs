//! Database operations for categories.

use rusqlite::{Connection, Row, ffi::SQLITE_CONSTRAINT_FOREIGNKEY};

use crate::{
    Error,
    category::{Category, CategoryKind, CategoryName},
    database_id::CategoryId,
    error::is_constraint_violation,
};

/// Create a category and return it with its generated ID.
pub fn create_category(
    name: CategoryName,
    kind: CategoryKind,
    connection: &Connection,
) -> Result<Category, Error> {
    connection.execute(
        "INSERT INTO category (name, kind) VALUES (?1, ?2);",
        (name.as_ref(), kind),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Category { id, name, kind })
}

/// Retrieve a single category by ID.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, kind FROM category WHERE id = :id;")?
        .query_row(&[(":id", &category_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve categories grouped by kind (income first) and then ordered by name.
///
/// If `kind` is given, only categories of that kind are returned.
pub fn get_categories(
    kind: Option<CategoryKind>,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, name, kind FROM category
             WHERE ?1 IS NULL OR kind = ?1
             ORDER BY CASE kind WHEN 'income' THEN 0 ELSE 1 END, name ASC, id ASC;",
        )?
        .query_map([kind], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Count the transactions and category budgets that refer to a category.
pub fn count_category_references(
    category_id: CategoryId,
    connection: &Connection,
) -> Result<u32, Error> {
    connection
        .query_row(
            "SELECT (SELECT COUNT(id) FROM \"transaction\" WHERE category_id = ?1)
                  + (SELECT COUNT(id) FROM category_budget WHERE category_id = ?1);",
            [category_id],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Update a category's name and kind.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingCategory] if the category does not exist,
/// - [Error::CategoryKindLocked] if the kind changes while transactions or
///   budgets still refer to the category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_category(
    category_id: CategoryId,
    new_name: CategoryName,
    new_kind: CategoryKind,
    connection: &Connection,
) -> Result<Category, Error> {
    let current = get_category(category_id, connection).map_err(|error| match error {
        Error::NotFound => Error::UpdateMissingCategory,
        error => error,
    })?;

    if current.kind != new_kind && count_category_references(category_id, connection)? > 0 {
        return Err(Error::CategoryKindLocked(category_id));
    }

    connection.execute(
        "UPDATE category SET name = ?1, kind = ?2 WHERE id = ?3",
        (new_name.as_ref(), new_kind, category_id),
    )?;

    Ok(Category {
        id: category_id,
        name: new_name,
        kind: new_kind,
    })
}

/// Delete a category by ID.
///
/// The delete never cascades: a category that is still referenced by a
/// transaction or a category budget is left untouched.
///
/// # Errors
/// This function will return a:
/// - [Error::CategoryInUse] if the category is still referenced,
/// - [Error::DeleteMissingCategory] if the category does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_category(category_id: CategoryId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection
        .execute("DELETE FROM category WHERE id = ?1", [category_id])
        .map_err(|error| {
            if is_constraint_violation(&error, SQLITE_CONSTRAINT_FOREIGNKEY) {
                Error::CategoryInUse(category_id)
            } else {
                error.into()
            }
        })?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    Ok(())
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            kind TEXT NOT NULL CHECK (kind IN ('income', 'expense'))
        );

        CREATE INDEX IF NOT EXISTS idx_category_kind_name ON category(kind, name);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);
    let kind = row.get(2)?;

    Ok(Category { id, name, kind })
}

#[cfg(test)]
mod category_query_tests {
    use time::macros::date;

    use crate::{
        Error,
        category::{
            CategoryKind, CategoryName, count_category_references, create_category,
            delete_category, get_categories, get_category, update_category,
        },
        category_budget::upsert_category_budget,
        monthly_budget::{YearMonth, create_monthly_budget},
        test_utils::get_test_connection,
        transaction::{Transaction, count_transactions, create_transaction},
    };

    #[test]
    fn create_category_succeeds() {
        let connection = get_test_connection();
        let name = CategoryName::new("Food").unwrap();

        let category = create_category(name.clone(), CategoryKind::Expense, &connection)
            .expect("Could not create category");

        assert!(category.id > 0);
        assert_eq!(category.name, name);
        assert_eq!(category.kind, CategoryKind::Expense);
    }

    #[test]
    fn get_category_with_invalid_id_returns_not_found() {
        let connection = get_test_connection();

        assert_eq!(get_category(42, &connection), Err(Error::NotFound));
    }

    #[test]
    fn categories_are_grouped_by_kind_then_name() {
        let connection = get_test_connection();
        for (name, kind) in [
            ("Rent", CategoryKind::Expense),
            ("Salary", CategoryKind::Income),
            ("Food", CategoryKind::Expense),
            ("Bonus", CategoryKind::Income),
        ] {
            create_category(CategoryName::new_unchecked(name), kind, &connection)
                .expect("Could not create test category");
        }

        let names: Vec<String> = get_categories(None, &connection)
            .expect("Could not get categories")
            .into_iter()
            .map(|category| category.name.to_string())
            .collect();

        assert_eq!(names, ["Bonus", "Salary", "Food", "Rent"]);
    }

    #[test]
    fn categories_can_be_filtered_by_kind() {
        let connection = get_test_connection();
        create_category(
            CategoryName::new_unchecked("Salary"),
            CategoryKind::Income,
            &connection,
        )
        .unwrap();
        let food = create_category(
            CategoryName::new_unchecked("Food"),
            CategoryKind::Expense,
            &connection,
        )
        .unwrap();

        let expenses = get_categories(Some(CategoryKind::Expense), &connection).unwrap();

        assert_eq!(expenses, vec![food]);
    }

    #[test]
    fn update_category_succeeds() {
        let connection = get_test_connection();
        let category = create_category(
            CategoryName::new_unchecked("Original"),
            CategoryKind::Expense,
            &connection,
        )
        .unwrap();

        let updated = update_category(
            category.id,
            CategoryName::new_unchecked("Updated"),
            CategoryKind::Income,
            &connection,
        )
        .expect("Could not update category");

        assert_eq!(Ok(updated), get_category(category.id, &connection));
    }

    #[test]
    fn update_category_with_invalid_id_returns_error() {
        let connection = get_test_connection();

        let result = update_category(
            999,
            CategoryName::new_unchecked("Updated"),
            CategoryKind::Income,
            &connection,
        );

        assert_eq!(result, Err(Error::UpdateMissingCategory));
    }

    #[test]
    fn update_category_cannot_change_kind_once_used() {
        let connection = get_test_connection();
        let category = create_category(
            CategoryName::new_unchecked("Food"),
            CategoryKind::Expense,
            &connection,
        )
        .unwrap();
        create_transaction(
            Transaction::build(100, date!(2025 - 03 - 02), "Lunch", category.id),
            &connection,
        )
        .unwrap();

        let result = update_category(
            category.id,
            CategoryName::new_unchecked("Food"),
            CategoryKind::Income,
            &connection,
        );

        assert_eq!(result, Err(Error::CategoryKindLocked(category.id)));

        let renamed = update_category(
            category.id,
            CategoryName::new_unchecked("Groceries"),
            CategoryKind::Expense,
            &connection,
        );
        assert!(renamed.is_ok(), "renaming a used category should succeed");
    }

    #[test]
    fn delete_unused_category_succeeds() {
        let connection = get_test_connection();
        let category = create_category(
            CategoryName::new_unchecked("ToDelete"),
            CategoryKind::Expense,
            &connection,
        )
        .unwrap();

        assert_eq!(delete_category(category.id, &connection), Ok(()));
        assert_eq!(get_category(category.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_category_with_invalid_id_returns_error() {
        let connection = get_test_connection();

        assert_eq!(
            delete_category(999, &connection),
            Err(Error::DeleteMissingCategory)
        );
    }

    #[test]
    fn delete_category_with_transactions_is_blocked() {
        let connection = get_test_connection();
        let category = create_category(
            CategoryName::new_unchecked("Food"),
            CategoryKind::Expense,
            &connection,
        )
        .unwrap();
        create_transaction(
            Transaction::build(300000, date!(2025 - 03 - 10), "Groceries", category.id),
            &connection,
        )
        .unwrap();

        let result = delete_category(category.id, &connection);

        assert_eq!(result, Err(Error::CategoryInUse(category.id)));
        assert_eq!(Ok(category.clone()), get_category(category.id, &connection));
        assert_eq!(count_transactions(&connection), Ok(1));
    }

    #[test]
    fn delete_category_with_budget_is_blocked() {
        let connection = get_test_connection();
        let category = create_category(
            CategoryName::new_unchecked("Food"),
            CategoryKind::Expense,
            &connection,
        )
        .unwrap();
        let monthly_budget =
            create_monthly_budget(YearMonth::new(2025, 3).unwrap(), &connection).unwrap();
        upsert_category_budget(monthly_budget.id, category.id, 500000, &connection).unwrap();

        let result = delete_category(category.id, &connection);

        assert_eq!(result, Err(Error::CategoryInUse(category.id)));
        assert_eq!(count_category_references(category.id, &connection), Ok(1));
    }
}
