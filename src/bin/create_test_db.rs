use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration, OffsetDateTime};

use khata_rs::{EXPENSE_CATEGORIES, initialize_db};

/// A utility for creating a test database for the khata report tool.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The owner ID of the seeded records.
    #[arg(long, default_value = "test")]
    owner: String,

    /// The number of months of records to create, ending this month.
    #[arg(long, default_value_t = 6)]
    months: u32,
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

    let today = OffsetDateTime::now_utc().date();

    println!("Creating {} months of income and expenses...", args.months);
    seed_transactions(&conn, &args.owner, today, args.months)?;

    println!("Creating khata entries...");
    seed_khata(&conn, &args.owner, today)?;

    println!("Success!");

    Ok(())
}

fn seed_transactions(
    conn: &Connection,
    owner: &str,
    today: Date,
    months: u32,
) -> Result<(), Box<dyn Error>> {
    let mut month_start = today.replace_day(1)?;

    for month_index in 0..months {
        // Skip the salary every third month so that carry-forward can be tried out.
        if month_index % 3 != 1 {
            conn.execute(
                "INSERT INTO income (owner_id, amount, source, title, date) VALUES (?1, ?2, ?3, ?4, ?5)",
                (owner, 4_500_000, "Salary", "Monthly salary", month_start),
            )?;
        }

        for (offset, category) in EXPENSE_CATEGORIES.iter().enumerate() {
            let day = month_start + Duration::days(offset as i64 * 2);

            if day > today {
                break;
            }

            let amount = 15_000 + (offset as i64 * 7_350) + i64::from(month_index) * 1_000;
            conn.execute(
                "INSERT INTO expense (owner_id, amount, category, title, date) VALUES (?1, ?2, ?3, ?4, ?5)",
                (owner, amount, category, format!("{category} spending"), day),
            )?;
        }

        month_start = previous_month_start(month_start)?;
    }

    // A malformed row to show how skipped records are reported.
    conn.execute(
        "INSERT INTO expense (owner_id, amount, category, title, date) VALUES (?1, ?2, ?3, ?4, ?5)",
        (owner, "twelve", "Food", "Typo", today),
    )?;

    Ok(())
}

fn seed_khata(conn: &Connection, owner: &str, today: Date) -> Result<(), Box<dyn Error>> {
    let entries = [
        ("Taken", "Ravi", 50_000, "Cash", 20),
        ("Given", "Ravi", 20_000, "UPI", 12),
        ("Given", "Asha", 120_000, "Card", 9),
        ("Taken", "Asha", 30_000, "UPI", 3),
        ("Given", "Meera", 7_500, "Cash", 1),
    ];

    for (direction, person, amount, method, days_ago) in entries {
        conn.execute(
            "INSERT INTO khata (owner_id, type, person, amount, payment_method, date) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (owner, direction, person, amount, method, today - Duration::days(days_ago)),
        )?;
    }

    Ok(())
}

fn previous_month_start(month_start: Date) -> Result<Date, Box<dyn Error>> {
    let last_day_of_previous = month_start - Duration::days(1);

    Ok(last_day_of_previous.replace_day(1)?)
}
