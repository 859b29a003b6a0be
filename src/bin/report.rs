use std::{
    error::Error,
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use rusqlite::Connection;
use serde::Serialize;
use time::{Date, macros::format_description};

use khata_rs::{
    Activity, BalanceReport, BucketSummary, CancellationToken, CarryForwardPolicy, DateRange,
    Granularity, LedgerMonth, LedgerPage, LedgerQuery, LedgerSummary, PaymentMethod, Predicate,
    Report, ReportConfig, ReportService, SQLiteRecordStore, Session, SummaryQuery,
    WalletSnapshot, WeekPolicy, format_minor_units, setup_logging,
};

/// Print reports from a khata SQLite database.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database.
    #[arg(long)]
    db_path: PathBuf,

    /// The user to report on.
    #[arg(long)]
    owner: String,

    /// The canonical name of the user's timezone.
    #[arg(long, default_value = "Asia/Kolkata")]
    timezone: String,

    /// Report as of this date (YYYY-MM-DD) instead of today.
    #[arg(long, value_parser = parse_date)]
    today: Option<Date>,

    /// How to print the report.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Use last month's income for a month without income.
    #[arg(long)]
    carry_forward_income: bool,

    /// Use last month's expenses for a month without expenses.
    #[arg(long)]
    carry_forward_expense: bool,

    /// Seconds to wait for the database.
    #[arg(long, default_value_t = 10)]
    fetch_timeout_secs: u64,

    /// Also write debug logs to this file.
    #[arg(long)]
    debug_log: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Income, expense and category totals per bucket.
    Summary {
        /// The bucket size.
        #[arg(long, value_enum, default_value_t = Granularity::Month)]
        granularity: Granularity,

        /// How to split weeks. Required with `--granularity week`.
        #[arg(long, value_enum)]
        week_policy: Option<WeekPolicy>,

        /// The first date to include.
        #[arg(long, value_parser = parse_date)]
        from: Date,

        /// The last date to include.
        #[arg(long, value_parser = parse_date)]
        to: Date,

        /// Only include this expense category or income source.
        #[arg(long)]
        category: Option<String>,

        /// Also print buckets without transactions.
        #[arg(long)]
        include_empty: bool,
    },
    /// Lifetime balance and the savings of every month.
    Balance,
    /// This month's figures and today's spending.
    Wallet,
    /// The khata book.
    Ledger {
        #[command(flatten)]
        filters: LedgerFilters,

        /// What to show.
        #[arg(long, value_enum, default_value_t = LedgerView::People)]
        view: LedgerView,

        /// The page to show with `--view page`.
        #[arg(long, default_value_t = 1)]
        page: u64,

        /// Entries per page.
        #[arg(long, default_value_t = 20)]
        page_size: u64,
    },
    /// The most recent transactions.
    Activity {
        /// The number of transactions to show.
        #[arg(long, default_value_t = khata_rs::DEFAULT_ACTIVITY_LIMIT)]
        limit: usize,
    },
}

#[derive(ClapArgs, Debug)]
struct LedgerFilters {
    /// Only entries with this person.
    #[arg(long)]
    person: Option<String>,

    /// Only entries paid by Cash, UPI or Card.
    #[arg(long, value_parser = parse_payment_method)]
    payment_method: Option<PaymentMethod>,

    /// The first date to include.
    #[arg(long, value_parser = parse_date, requires = "to")]
    from: Option<Date>,

    /// The last date to include.
    #[arg(long, value_parser = parse_date, requires = "from")]
    to: Option<Date>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LedgerView {
    /// Net balance per person.
    People,
    /// Entries grouped by month and day.
    Groups,
    /// One page of entries.
    Page,
}

fn parse_date(text: &str) -> Result<Date, String> {
    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .map_err(|error| format!("expected a date like 2024-01-31: {error}"))
}

fn parse_payment_method(text: &str) -> Result<PaymentMethod, String> {
    PaymentMethod::from_tag(text).ok_or_else(|| format!("unknown payment method \"{text}\""))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    setup_logging(args.debug_log.as_deref())?;

    let session = Session::new(&args.owner, &args.timezone)?;
    let reference_date = args.today.unwrap_or_else(|| session.today());

    let page_size = match &args.command {
        Command::Ledger { page_size, .. } => *page_size,
        _ => ReportConfig::default().ledger_page_size,
    };
    let activity_limit = match &args.command {
        Command::Activity { limit } => *limit,
        _ => ReportConfig::default().activity_limit,
    };
    let config = ReportConfig {
        fetch_timeout: Duration::from_secs(args.fetch_timeout_secs),
        carry_forward: CarryForwardPolicy {
            income: args.carry_forward_income,
            expense: args.carry_forward_expense,
        },
        activity_limit,
        ledger_page_size: page_size,
    };

    let connection = Connection::open(&args.db_path)?;
    let store = SQLiteRecordStore::new(Arc::new(Mutex::new(connection)));
    let service = ReportService::new(store, config);

    let token = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(token.clone()));

    tracing::debug!("reporting for {} as of {reference_date}", session.owner_id());

    match args.command {
        Command::Summary {
            granularity,
            week_policy,
            from,
            to,
            category,
            include_empty,
        } => {
            let mut predicate = Predicate::new();
            if let Some(category) = &category {
                predicate = predicate.category_equals(category);
            }

            let mut query = SummaryQuery::new(DateRange::new(from, to)?, granularity)
                .predicate(predicate);
            query.week_policy = week_policy;
            query.include_empty = include_empty;

            let report = service
                .bucket_summaries(&session, &query, reference_date, &token)
                .await?;
            output(args.format, &report, print_summaries)?;
        }
        Command::Balance => {
            let report = service
                .balance_report(&session, reference_date, &token)
                .await?;
            output(args.format, &report, print_balance)?;
        }
        Command::Wallet => {
            let report = service
                .wallet_snapshot(&session, reference_date, &token)
                .await?;
            output(args.format, &report, print_wallet)?;
        }
        Command::Ledger {
            filters,
            view,
            page,
            ..
        } => {
            let query = LedgerQuery {
                person: filters.person,
                payment_method: filters.payment_method,
                date_range: match (filters.from, filters.to) {
                    (Some(from), Some(to)) => Some(DateRange::new(from, to)?),
                    _ => None,
                },
            };

            match view {
                LedgerView::People => {
                    let report = service.ledger_summary(&session, Some(&query), &token).await?;
                    output(args.format, &report, print_ledger_people)?;
                }
                LedgerView::Groups => {
                    let report = service.ledger_groups(&session, Some(&query), &token).await?;
                    output(args.format, &report, print_ledger_groups)?;
                }
                LedgerView::Page => {
                    let report = service
                        .ledger_page(&session, Some(&query), page, &token)
                        .await?;
                    output(args.format, &report, print_ledger_page)?;
                }
            }
        }
        Command::Activity { .. } => {
            let report = service.recent_activity(&session, &token).await?;
            output(args.format, &report, print_activity)?;
        }
    }

    Ok(())
}

async fn cancel_on_ctrl_c(token: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("cancelling report");
        token.cancel();
    }
}

fn output<T: Serialize>(
    format: OutputFormat,
    report: &Report<T>,
    print_text: fn(&T),
) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Text => {
            print_text(&report.value);

            for skipped in &report.skipped {
                eprintln!(
                    "skipped {:?} record {}: {}",
                    skipped.source,
                    skipped.id.as_deref().unwrap_or("<no id>"),
                    skipped.error
                );
            }
        }
    }

    Ok(())
}

fn print_summaries(summaries: &Vec<BucketSummary>) {
    if summaries.is_empty() {
        println!("No transactions in range.");
        return;
    }

    for summary in summaries {
        println!(
            "{:<24} income {:>14}  expense {:>14}  net {:>14}",
            summary.bucket.key.to_string(),
            format_minor_units(summary.income_total),
            format_minor_units(summary.expense_total),
            format_minor_units(summary.net)
        );

        for category in &summary.categories {
            println!(
                "    {:<20} {:>14} {:>5.1}%",
                category.label,
                format_minor_units(category.amount),
                category.share * 100.0
            );
        }
    }
}

fn print_balance(report: &BalanceReport) {
    println!("Lifetime balance: {}", format_minor_units(report.lifetime_balance));

    for (month, running) in report.months.iter().zip(&report.running_balances) {
        let carried = if month.income_carried_forward || month.expense_carried_forward {
            " (carried forward)"
        } else {
            ""
        };

        println!(
            "{:<8} savings {:>14}  balance {:>14}{carried}",
            month.month.to_string(),
            format_minor_units(month.savings),
            format_minor_units(running.balance)
        );
    }
}

fn print_wallet(snapshot: &WalletSnapshot) {
    println!("Balance:         {}", format_minor_units(snapshot.lifetime_balance));
    println!("Monthly income:  {}", format_minor_units(snapshot.monthly_income));
    println!("Monthly expense: {}", format_minor_units(snapshot.monthly_expense));
    println!("Monthly savings: {}", format_minor_units(snapshot.monthly_savings));
    println!("Spent today:     {}", format_minor_units(snapshot.today_expense));

    if snapshot.income_carried_forward {
        println!("Income carried forward from last month.");
    }

    if snapshot.expense_carried_forward {
        println!("Expenses carried forward from last month.");
    }
}

fn print_ledger_people(summaries: &Vec<LedgerSummary>) {
    for summary in summaries {
        let status = match summary.net.signum() {
            1 => "you owe",
            -1 => "owes you",
            _ => "settled",
        };

        println!(
            "{:<20} taken {:>14}  given {:>14}  {status} {}",
            summary.person,
            format_minor_units(summary.taken),
            format_minor_units(summary.given),
            format_minor_units(summary.net.abs())
        );
    }
}

fn print_ledger_groups(months: &Vec<LedgerMonth>) {
    for month in months {
        println!(
            "{}  taken {}  given {}",
            month.month,
            format_minor_units(month.totals.taken),
            format_minor_units(month.totals.given)
        );

        for day in &month.days {
            println!("  {}", day.date);

            for entry in &day.entries {
                println!(
                    "    {:?} {:<20} {:>14} {}",
                    entry.direction,
                    entry.person,
                    format_minor_units(entry.amount),
                    entry.payment_method
                );
            }
        }
    }
}

fn print_ledger_page(page: &LedgerPage) {
    for entry in &page.entries {
        println!(
            "{} {:?} {:<20} {:>14} {}",
            entry.date,
            entry.direction,
            entry.person,
            format_minor_units(entry.amount),
            entry.payment_method
        );
    }

    println!(
        "Page {} of {} ({} entries)",
        page.page, page.page_count, page.total_entries
    );
}

fn print_activity(activity: &Vec<Activity>) {
    for item in activity {
        println!(
            "{} {:<24} {:<16} {:>14}",
            item.date,
            item.title,
            item.label,
            format_minor_units(item.signed_amount)
        );
    }
}
