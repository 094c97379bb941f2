//! Faculty Core - publication registry for a faculty
//!
//! - **Model**: people, publications and the many-to-many authorship link
//! - **Store**: SQLite persistence with surrogate keys that are never reused
//! - **Guard**: write-time triggers rejecting authorship rows that reference
//!   missing people or publications
//! - **Registrar**: validates an author list and creates a publication with
//!   its links in one transaction
//! - **Config**: TOML configuration for the database location and logging
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use faculty_core::{FacultyStore, NewPublication, PersonType, PublicationType};
//!
//! let store = FacultyStore::open_in_memory()?;
//! let author = store.create_person("Ivanov", PersonType::Student)?;
//! let draft = NewPublication::new(
//!     "Article: X",
//!     NaiveDate::from_ymd_opt(2020, 9, 1).unwrap(),
//!     "Minsk",
//!     PublicationType::Article,
//! );
//! let publication = store.add_publication(&draft, &[author])?;
//! # Ok::<(), faculty_core::FacultyError>(())
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod guard;
pub mod model;
pub mod registrar;
pub mod schema;
pub mod store;

pub use config::{DatabaseConfig, FacultyConfig};
pub use error::{FacultyError, Result};
pub use event::FacultyEvent;
pub use guard::IntegrityGuard;
pub use model::{
    parse_date, AuthorshipLink, NewPublication, Person, PersonId, PersonType, Publication,
    PublicationId, PublicationType,
};
pub use schema::{Schema, SCHEMA_VERSION};
pub use store::FacultyStore;
