use std::error::Error;

use clap::{Args, Parser, Subcommand};
use session::BudgetSession;
use ynab_types::transaction::{SaveTransaction, SaveTransactionBody, SaveTransactionsBody};

mod settings;
mod statement;

#[derive(Parser, Debug)]
#[command(name = "ynup")]
#[command(about = "Keep YNAB accounts in line with bank statements")]
struct Cli {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the budget's accounts.
    Accounts,
    /// List transactions for the account whose note matches an account number.
    Transactions(AccountArgs),
    /// Show one category's activity for a budget month.
    Activity(ActivityArgs),
    /// Submit a balance correction for an account.
    BalanceUpdate(BalanceUpdateArgs),
    /// Import statement rows from a CSV file.
    Import(ImportArgs),
}

#[derive(Args, Debug)]
struct AccountArgs {
    /// Bank account number to look for in the account notes.
    #[arg(long)]
    account_number: String,
}

#[derive(Args, Debug)]
struct ActivityArgs {
    /// Budget month, `YYYY-MM-DD` or `current`.
    #[arg(long, default_value = "current")]
    month: String,
    /// Category id.
    #[arg(long)]
    category: String,
}

#[derive(Args, Debug)]
struct BalanceUpdateArgs {
    /// Bank account number to look for in the account notes.
    #[arg(long)]
    account_number: String,
    /// Corrective amount in major units, e.g. `-12.34`.
    #[arg(long, allow_negative_numbers = true)]
    amount: f64,
}

#[derive(Args, Debug)]
struct ImportArgs {
    /// Bank account number to look for in the account notes.
    #[arg(long)]
    account_number: String,
    /// CSV file with `date,amount,memo` columns.
    #[arg(long)]
    file: std::path::PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    let settings = settings::Settings::load(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "ynup={level},session={level}",
            level = settings.level
        ))
        .init();

    let session = BudgetSession::new(&settings.token)?;

    match cli.command {
        Command::Accounts => {
            let accounts = session.list_accounts(&settings.budget_id).await?;
            for account in &accounts {
                println!("{}  {}  {}", account.id, account.name, account.balance);
            }
        }
        Command::Transactions(args) => {
            let account_id =
                resolve_account_id(&session, &settings.budget_id, &args.account_number).await?;
            let transactions = session
                .list_transactions(&settings.budget_id, &account_id)
                .await?;
            for transaction in &transactions {
                println!(
                    "{}  {:>12}  {}",
                    transaction.date,
                    transaction.amount,
                    transaction.memo.as_deref().unwrap_or("-"),
                );
            }
        }
        Command::Activity(args) => {
            let category = session
                .category_activity(&settings.budget_id, &args.month, &args.category)
                .await?;
            println!(
                "{}: budgeted {}, activity {}, balance {}",
                category.name, category.budgeted, category.activity, category.balance,
            );
        }
        Command::BalanceUpdate(args) => {
            let Some(payee_id) = settings.payee_id.as_deref() else {
                eprintln!("balance corrections need a payee_id in the settings");
                std::process::exit(1);
            };
            let account_id =
                resolve_account_id(&session, &settings.budget_id, &args.account_number).await?;

            let body = SaveTransactionBody {
                transaction: SaveTransaction::balance_correction(
                    &account_id,
                    args.amount,
                    payee_id,
                ),
            };
            match session.submit(&settings.budget_id, &account_id, &body).await {
                Ok(()) => println!(
                    "submitted balance correction of {} to {account_id}",
                    body.transaction.amount
                ),
                Err(err) => {
                    eprintln!("upload rejected: {err}");
                    std::process::exit(2);
                }
            }
        }
        Command::Import(args) => {
            let account_id =
                resolve_account_id(&session, &settings.budget_id, &args.account_number).await?;

            let rows = statement::read_rows(&args.file)?;
            if rows.is_empty() {
                println!("no statement rows in {}", args.file.display());
                return Ok(());
            }

            let body = SaveTransactionsBody::from(
                rows.iter()
                    .map(|row| SaveTransaction::from_statement(&account_id, row))
                    .collect::<Vec<_>>(),
            );
            match session.submit(&settings.budget_id, &account_id, &body).await {
                Ok(()) => println!(
                    "imported {} transactions into {account_id}",
                    body.transactions.len()
                ),
                Err(err) => {
                    eprintln!("upload rejected: {err}");
                    std::process::exit(2);
                }
            }
        }
    }

    Ok(())
}

async fn resolve_account_id(
    session: &BudgetSession,
    budget_id: &str,
    account_number: &str,
) -> Result<String, Box<dyn Error + Send + Sync>> {
    let accounts = session.list_accounts(budget_id).await?;
    match session::find_account_id(&accounts, account_number) {
        Some(id) => {
            tracing::debug!("account number {account_number} maps to {id}");
            Ok(id.to_string())
        }
        None => {
            eprintln!("no account note mentions {account_number}");
            std::process::exit(1);
        }
    }
}
