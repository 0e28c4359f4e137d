use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use expense_tracker::{NewExpense, create_expense, initialize_db};

/// A utility for creating a test database for the expense_tracker server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Descriptions, categories and amounts cycled through when seeding expenses.
const SAMPLE_EXPENSES: [(&str, &str, f64); 8] = [
    ("Groceries", "Food", 84.2),
    ("Coffee", "Food", 5.5),
    ("Bus fare", "Transport", 3.4),
    ("Rent", "Housing", 450.0),
    ("Electricity", "Utilities", 96.75),
    ("Movie tickets", "Entertainment", 32.0),
    ("Returned shoes", "Clothing", -60.0),
    ("Petrol", "Transport", 72.1),
];

/// How many expenses to create, spread out over roughly the last three months.
const EXPENSE_COUNT: i64 = 45;

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

    println!("Creating {EXPENSE_COUNT} test expenses...");

    let today = OffsetDateTime::now_utc().date();

    for i in 0..EXPENSE_COUNT {
        let (description, category, amount) = SAMPLE_EXPENSES[i as usize % SAMPLE_EXPENSES.len()];
        let date = today - Duration::days(i * 2);

        create_expense(NewExpense::new(date, description, category, amount)?, &conn)?;
    }

    println!("Success!");

    Ok(())
}
