//! Faculty CLI
//!
//! Command-line front end for the faculty publication registry.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use faculty_core::{
    parse_date, AuthorshipLink, FacultyConfig, FacultyStore, NewPublication, PersonId,
    PersonType, PublicationId, PublicationType,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "faculty", version, about = "Faculty publication registry")]
struct Cli {
    /// Config file (default: <config dir>/faculty/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database file, overriding the configuration
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a person
    AddPerson {
        #[arg(long)]
        surname: String,
        /// student | phd_candidate | lecturer | other
        #[arg(long = "type", value_parser = parse_person_type)]
        person_type: PersonType,
    },
    /// Register a publication with its authors
    AddPublication {
        #[arg(long)]
        name: String,
        /// YYYY-MM-DD
        #[arg(long, value_parser = parse_date_arg)]
        date: chrono::NaiveDate,
        #[arg(long)]
        place: String,
        /// book | article | report | thesis | other
        #[arg(long = "type", value_parser = parse_publication_type)]
        publication_type: PublicationType,
        /// Author person id, repeatable, in order
        #[arg(long = "author")]
        authors: Vec<i64>,
    },
    /// Link an existing person to an existing publication
    Link {
        #[arg(long)]
        person: i64,
        #[arg(long)]
        publication: i64,
    },
    /// Move an existing link to another person or publication
    Relink {
        #[arg(long)]
        person: i64,
        #[arg(long)]
        publication: i64,
        #[arg(long)]
        to_person: i64,
        #[arg(long)]
        to_publication: i64,
    },
    /// Verify that every link references an existing person and publication
    Check,
}

fn parse_person_type(s: &str) -> Result<PersonType, String> {
    s.parse().map_err(|e: faculty_core::FacultyError| e.to_string())
}

fn parse_publication_type(s: &str) -> Result<PublicationType, String> {
    s.parse().map_err(|e: faculty_core::FacultyError| e.to_string())
}

fn parse_date_arg(s: &str) -> Result<chrono::NaiveDate, String> {
    parse_date(s).map_err(|e| e.to_string())
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = FacultyConfig::load_standard(cli.config.as_deref())?;

    // Setup logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter.as_str()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    if let Some(db) = cli.db {
        config.database.path = Some(db);
    }
    tracing::debug!("Using database {:?}", config.database.resolved_path()?);
    let store = FacultyStore::open_with_config(&config.database)?;

    let output = match cli.command {
        Command::AddPerson {
            surname,
            person_type,
        } => {
            let id = store.create_person(&surname, person_type)?;
            json!({ "id": id, "surname": surname, "type": person_type })
        }
        Command::AddPublication {
            name,
            date,
            place,
            publication_type,
            authors,
        } => {
            let draft = NewPublication::new(name, date, place, publication_type);
            let authors: Vec<PersonId> = authors.into_iter().map(PersonId).collect();
            let id = store.add_publication(&draft, &authors)?;
            json!({ "id": id, "publication": draft, "authors": authors })
        }
        Command::Link {
            person,
            publication,
        } => {
            store.add_authorship_link(PersonId(person), PublicationId(publication))?;
            json!(AuthorshipLink::new(PersonId(person), PublicationId(publication)))
        }
        Command::Relink {
            person,
            publication,
            to_person,
            to_publication,
        } => {
            let from = AuthorshipLink::new(PersonId(person), PublicationId(publication));
            let to = AuthorshipLink::new(PersonId(to_person), PublicationId(to_publication));
            store.update_authorship_link(from, to)?;
            json!({ "from": from, "to": to })
        }
        Command::Check => {
            store.verify_integrity()?;
            json!({ "ok": true, "links": store.authorship_links()?.len() })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
