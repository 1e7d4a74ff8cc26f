//! Administrative CLI for the contact submission store.
//!
//! # Responsibility
//! - Act as composition root: resolve config, start logging, open the store.
//! - Expose list/add/delete/show/count over the same store the form uses.

use clap::{Parser, Subcommand};
use contactdesk_core::{ContactFormData, ContactSubmission, StoreConfig, StoreError};
use log::warn;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "contactdesk",
    version,
    about = "Inspect and manage stored contact-form submissions."
)]
struct Cli {
    /// SQLite database file; overrides CONTACTDESK_DB_PATH.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List submissions, newest first.
    List {
        /// Print the raw JSON array instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Record a submission as if sent through the contact form.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        business_field: String,
    },
    /// Delete a submission by id.
    Delete { id: String },
    /// Print one submission.
    Show { id: String },
    /// Print the number of stored submissions.
    Count,
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = StoreConfig::from_env();
    if let Some(db) = cli.db {
        config = config.with_db_path(db);
    }
    if let Err(err) = config.init_logging() {
        eprintln!("warning: logging disabled: {err}");
    }

    match run(&config, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &StoreConfig, command: Commands) -> Result<(), String> {
    let mut store = config
        .open_store()
        .map_err(|err| format!("cannot open `{}`: {err}", config.db_path.display()))?;

    match command {
        Commands::List { json } => {
            if json {
                let raw = serde_json::to_string_pretty(store.submissions())
                    .map_err(|err| err.to_string())?;
                println!("{raw}");
            } else if store.is_empty() {
                println!("No submissions.");
            } else {
                for submission in store.submissions() {
                    println!("{}", display_row(submission));
                }
            }
        }
        Commands::Add {
            name,
            email,
            phone,
            business_field,
        } => {
            let input = ContactFormData::new(name, email, phone, business_field);
            let created = store.add(input).map_err(describe_store_error)?;
            println!("{}", created.id);
        }
        Commands::Delete { id } => {
            let existed = store.get(&id).is_some();
            store.delete(&id).map_err(describe_store_error)?;
            if existed {
                println!("Deleted {id}.");
            } else {
                println!("No submission with id {id}.");
            }
        }
        Commands::Show { id } => match store.get(&id) {
            Some(submission) => println!("{}", display_detail(submission)),
            None => return Err(format!("no submission with id {id}")),
        },
        Commands::Count => println!("{}", store.len()),
    }

    Ok(())
}

fn describe_store_error(err: StoreError) -> String {
    if let StoreError::Persist { operation, .. } = &err {
        warn!("event=cli_persist module=cli status=error operation={operation}");
    }
    err.to_string()
}

fn display_row(submission: &ContactSubmission) -> String {
    format!(
        "{}  {}  {} <{}>  {}  [{}]",
        submission.created_at,
        submission.id,
        submission.name,
        submission.email,
        submission.phone,
        submission.business_field
    )
}

fn display_detail(submission: &ContactSubmission) -> String {
    format!(
        "id:             {}\ncreated at:     {}\nname:           {}\nemail:          {}\nphone:          {}\nbusiness field: {}",
        submission.id,
        submission.created_at,
        submission.name,
        submission.email,
        submission.phone,
        submission.business_field
    )
}

#[cfg(test)]
mod tests {
    use super::{display_row, run, Cli, Commands};
    use clap::Parser;
    use contactdesk_core::{ContactFormData, ContactSubmission, StoreConfig};

    fn config_in(dir: &tempfile::TempDir) -> StoreConfig {
        StoreConfig::from_lookup(|_| None).with_db_path(dir.path().join("cli.sqlite3"))
    }

    #[test]
    fn parses_add_with_kebab_case_flags() {
        let cli = Cli::try_parse_from([
            "contactdesk",
            "--db",
            "/tmp/x.sqlite3",
            "add",
            "--name",
            "Ali",
            "--email",
            "a@x.com",
            "--phone",
            "0500000000",
            "--business-field",
            "retail",
        ])
        .unwrap();

        let business_field = match &cli.command {
            Commands::Add { business_field, .. } => business_field.as_str(),
            other => panic!("expected add, got {other:?}"),
        };
        assert_eq!(business_field, "retail");
        assert_eq!(
            cli.db.as_deref(),
            Some(std::path::Path::new("/tmp/x.sqlite3"))
        );
    }

    #[test]
    fn add_then_delete_round_trips_through_the_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);

        run(
            &config,
            Commands::Add {
                name: "Ali".to_string(),
                email: "a@x.com".to_string(),
                phone: "0500000000".to_string(),
                business_field: "retail".to_string(),
            },
        )
        .unwrap();

        let id = config.open_store().unwrap().submissions()[0].id.clone();
        run(&config, Commands::Show { id: id.clone() }).unwrap();
        run(&config, Commands::Delete { id: id.clone() }).unwrap();

        assert!(config.open_store().unwrap().is_empty());
        assert!(run(&config, Commands::Show { id }).is_err());
    }

    #[test]
    fn row_lists_every_field() {
        let submission = ContactSubmission::from_form(ContactFormData::new(
            "Ali",
            "a@x.com",
            "0500000000",
            "retail",
        ));

        let row = display_row(&submission);
        for field in ["Ali", "a@x.com", "0500000000", "retail", submission.id.as_str()] {
            assert!(row.contains(field), "missing {field} in {row}");
        }
    }
}
