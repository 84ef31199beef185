use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::macros::date;

use monthly_budget::{
    category::{CategoryKind, CategoryName, create_category},
    category_budget::upsert_category_budget,
    initialize_db,
    monthly_budget::{YearMonth, create_monthly_budget},
    transaction::{Transaction, create_transaction},
};

/// A utility for creating a test database for the monthly budget REST API server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating categories...");
    let salary = create_category(CategoryName::new("Salary")?, CategoryKind::Income, &conn)?;
    let interest = create_category(CategoryName::new("Interest")?, CategoryKind::Income, &conn)?;
    let rent = create_category(CategoryName::new("Rent")?, CategoryKind::Expense, &conn)?;
    let food = create_category(CategoryName::new("Food")?, CategoryKind::Expense, &conn)?;
    let transport = create_category(CategoryName::new("Transport")?, CategoryKind::Expense, &conn)?;

    println!("Creating monthly budgets...");
    let february = create_monthly_budget(YearMonth::new(2025, 2)?, &conn)?;
    let march = create_monthly_budget(YearMonth::new(2025, 3)?, &conn)?;

    for (monthly_budget, category, amount) in [
        (&february, &salary, 1000000),
        (&february, &rent, 400000),
        (&february, &food, 500000),
        (&march, &salary, 1000000),
        (&march, &interest, 5000),
        (&march, &rent, 400000),
        (&march, &food, 450000),
        (&march, &transport, 80000),
    ] {
        upsert_category_budget(monthly_budget.id, category.id, amount, &conn)?;
    }

    println!("Creating transactions...");
    let transactions = [
        Transaction::build(1000000, date!(2025 - 02 - 01), "Pay", salary.id)
            .monthly_budget_id(Some(february.id)),
        Transaction::build(400000, date!(2025 - 02 - 03), "Rent", rent.id)
            .monthly_budget_id(Some(february.id)),
        Transaction::build(123450, date!(2025 - 02 - 14), "Groceries", food.id)
            .monthly_budget_id(Some(february.id)),
        Transaction::build(1000000, date!(2025 - 03 - 01), "Pay", salary.id)
            .monthly_budget_id(Some(march.id)),
        Transaction::build(250000, date!(2025 - 03 - 15), "Bonus", salary.id)
            .monthly_budget_id(Some(march.id)),
        Transaction::build(400000, date!(2025 - 03 - 03), "Rent", rent.id)
            .monthly_budget_id(Some(march.id)),
        Transaction::build(98760, date!(2025 - 03 - 09), "Groceries", food.id),
        Transaction::build(4200, date!(2025 - 03 - 31), "Bus fare", transport.id),
    ];

    for transaction in transactions {
        create_transaction(transaction, &conn)?;
    }

    println!("Success!");

    Ok(())
}
