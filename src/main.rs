//! toshokan: catalogue the books you own.

mod catalogue;
mod error;
mod manual;

use crate::error::{ErrorKind, Result};
use crate::manual::Prompter;
use clap::{Parser, Subcommand};
use exn::{OptionExt, ResultExt};
use std::path::PathBuf;
use std::process::ExitCode;
use toshokan_catalog::{BorrowerId, Database, Repository, VolumeId};
use toshokan_config::Config;
use toshokan_extract::{Book, BookId, Identifiers, LookupId};
use toshokan_lookup::HttpClient;
use toshokan_reconcile::{CatalogRecord, Policy};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "toshokan", version, about = "Catalogue books into a personal library database")]
struct Cli {
    /// Configuration file, instead of the one in the platform config directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// How conflicting data from different sources is resolved.
    #[arg(long, global = true, value_parser = parse_policy)]
    policy: Option<Policy>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Look a book up and print the reconciled record without storing it.
    Lookup {
        /// Identifier as `kind:value` (isbn, lccn, oclc); a bare value is an ISBN.
        id: String,
    },
    /// Catalogue a volume of a book, looking it up if it is new.
    Add {
        /// Identifier as `kind:value` (isbn, lccn, oclc); a bare value is an ISBN.
        id: String,
        /// Library to keep the volume in.
        #[arg(long)]
        library: Option<String>,
    },
    /// Catalogue a volume of a book by typing in its details.
    Manual {
        #[arg(long)]
        library: Option<String>,
    },
    /// Print a catalogued book and its volumes.
    Show { book_id: BookId },
    /// Manage libraries.
    Library {
        #[command(subcommand)]
        action: LibraryAction,
    },
    /// Manage borrowers.
    Borrower {
        #[command(subcommand)]
        action: BorrowerAction,
    },
    /// Lend a volume to a borrower.
    Lend { volume_id: VolumeId, borrower_id: BorrowerId },
    /// Record a lent volume as returned.
    Return { volume_id: VolumeId, borrower_id: BorrowerId },
    /// List every volume currently lent out.
    Borrowings,
}

#[derive(Subcommand)]
enum LibraryAction {
    /// Create a library.
    Add { name: String },
    /// Keep a volume in a library, creating the library if needed.
    Assign { volume_id: VolumeId, library: String },
}

#[derive(Subcommand)]
enum BorrowerAction {
    /// Register a borrower; the contact must be unique.
    Add { name: String, contact: String },
}

fn parse_policy(raw: &str) -> std::result::Result<Policy, String> {
    raw.parse::<Policy>().map_err(|e| (*e).to_string())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config) {
        Ok(config) => config,
        Err(err) => {
            // Logging is configured from the configuration, so not set up yet.
            eprintln!("Error: {err:?}");
            return ExitCode::FAILURE;
        },
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)))
        .with_writer(std::io::stderr)
        .init();

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = ?err, retryable = err.is_retryable(), "command failed");
            eprintln!("Error: {}", *err);
            ExitCode::FAILURE
        },
    }
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    let policy = cli.policy.unwrap_or(config.policy);
    if let Command::Lookup { id } = &cli.command {
        return lookup(&config, policy, &parse_id(id)?).await;
    }

    let db = Database::connect(&config.database).await.or_raise(|| ErrorKind::Catalog)?;
    let repo = Repository::from(&db);
    let result = match cli.command {
        Command::Lookup { .. } => Ok(()),
        Command::Add { id, library } => add(&repo, &config, policy, &parse_id(&id)?, library.as_deref()).await,
        Command::Manual { library } => {
            let book = Book::new(Prompter::stdio().metadata(&Identifiers::new())?);
            shelve(&repo, book, library.as_deref()).await
        },
        Command::Show { book_id } => show(&repo, book_id).await,
        Command::Library { action: LibraryAction::Add { name } } => {
            let keyed = repo.add_library(&name).await.or_raise(|| ErrorKind::Catalog)?;
            println!("library {name:?}: {}", keyed.id());
            Ok(())
        },
        Command::Library { action: LibraryAction::Assign { volume_id, library } } => {
            let library_id = repo.add_library(&library).await.or_raise(|| ErrorKind::Catalog)?.id();
            repo.assign_volume_to_library(volume_id, library_id)
                .await
                .or_raise(|| ErrorKind::Catalog)
        },
        Command::Borrower { action: BorrowerAction::Add { name, contact } } => {
            let keyed = repo.add_borrower(&name, &contact).await.or_raise(|| ErrorKind::Catalog)?;
            println!("borrower {name:?}: {}", keyed.id());
            Ok(())
        },
        Command::Lend { volume_id, borrower_id } => {
            repo.borrow(volume_id, borrower_id).await.or_raise(|| ErrorKind::Catalog)
        },
        Command::Return { volume_id, borrower_id } => {
            repo.return_volume(volume_id, borrower_id).await.or_raise(|| ErrorKind::Catalog)
        },
        Command::Borrowings => {
            for borrowing in repo.list_borrowings().await.or_raise(|| ErrorKind::Catalog)? {
                println!(
                    "volume {} ({}) lent to {} <{}> since {}",
                    borrowing.volume_id, borrowing.title, borrowing.borrower, borrowing.contact, borrowing.borrowed_at
                );
            }
            Ok(())
        },
    };
    db.close().await;
    result
}

fn parse_id(raw: &str) -> Result<LookupId> {
    raw.parse::<LookupId>().or_raise(|| ErrorKind::Identifier)
}

fn fetcher(config: &Config) -> Result<HttpClient> {
    HttpClient::new(config.timeout(), &config.user_agent).or_raise(|| ErrorKind::Lookup)
}

async fn lookup(config: &Config, policy: Policy, id: &LookupId) -> Result<()> {
    let reconciled =
        catalogue::reconciled(&fetcher(config)?, &config.sources, id, &mut policy.resolver()).await?;
    match reconciled {
        Some(reconciled) => print_json(&reconciled.metadata),
        None => {
            println!("No source knows {id}.");
            Ok(())
        },
    }
}

async fn add(repo: &Repository, config: &Config, policy: Policy, id: &LookupId, library: Option<&str>) -> Result<()> {
    if let Some(book) = catalogue::existing(repo, id).await? {
        info!(%id, "book already catalogued, adding another volume");
        return shelve(repo, book, library).await;
    }
    // The resolver may hold stdin; it is dropped before manual entry asks.
    let record = catalogue::record(&fetcher(config)?, &config.sources, id, &mut policy.resolver()).await?;
    let book = match record {
        CatalogRecord::Ready(book) => book,
        CatalogRecord::NeedsManualEntry => {
            let known = Identifiers::new().with(id.identifier_kind(), id.value());
            Book::new(Prompter::stdio().metadata(&known)?)
        },
    };
    shelve(repo, book, library).await
}

async fn shelve(repo: &Repository, mut book: Book, library: Option<&str>) -> Result<()> {
    let (book_id, volume_id) = catalogue::shelve(repo, &mut book, library).await?;
    println!("book {book_id} {:?}: volume {volume_id}", book.metadata().title);
    Ok(())
}

async fn show(repo: &Repository, book_id: BookId) -> Result<()> {
    let book = repo
        .get_book(book_id)
        .await
        .or_raise(|| ErrorKind::Catalog)?
        .ok_or_raise(|| ErrorKind::NoSuchBook(book_id))?;
    print_json(&book)?;
    for volume in repo.list_volumes(book_id).await.or_raise(|| ErrorKind::Catalog)? {
        let library = volume.library.as_deref().unwrap_or("no library");
        match volume.borrowed_by {
            Some(borrower) => println!("volume {} ({library}), lent to borrower {borrower}", volume.id),
            None => println!("volume {} ({library})", volume.id),
        }
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).or_raise(|| ErrorKind::Output)?;
    println!("{json}");
    Ok(())
}
