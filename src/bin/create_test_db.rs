use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rust_decimal::Decimal;
use time::macros::date;

use spendly::{
    NewTransaction, Storage,
    TransactionKind::{Expense, Income},
    count_transactions, create_transaction,
};

/// A utility for creating a test database for the REST API server of spendly.
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
    let storage = Storage::new(output_path);
    storage.initialize_schema()?;

    println!("Creating test transactions...");

    let connection = storage.open_connection()?;
    let sample_transactions = [
        (Income, Decimal::new(350000, 2), "Salary", date!(2024 - 01 - 01)),
        (Expense, Decimal::new(145000, 2), "Rent", date!(2024 - 01 - 02)),
        (Expense, Decimal::new(8745, 2), "Groceries", date!(2024 - 01 - 05)),
        (Expense, Decimal::new(450, 2), "Coffee", date!(2024 - 01 - 05)),
        (Income, Decimal::new(12000, 2), "Freelance work", date!(2024 - 01 - 12)),
        (Expense, Decimal::new(6320, 2), "Power bill", date!(2024 - 01 - 15)),
    ];

    for (kind, amount, description, entry_date) in sample_transactions {
        create_transaction(
            NewTransaction {
                kind,
                amount,
                description: description.to_owned(),
                entry_date,
            },
            &connection,
        )?;
    }

    println!(
        "Success! Created {} transactions.",
        count_transactions(&connection)?
    );

    Ok(())
}
