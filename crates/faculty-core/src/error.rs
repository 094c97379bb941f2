//! Error types for faculty-core

use thiserror::Error;

use crate::model::{AuthorshipLink, PersonId, PublicationId};

/// Result type alias for faculty operations
pub type Result<T> = std::result::Result<T, FacultyError>;

/// Main error type for faculty operations
#[derive(Error, Debug)]
pub enum FacultyError {
    /// A publication must have at least one author
    #[error("Author list is empty")]
    EmptyAuthorList,

    /// Author ids that are not known persons, in first-occurrence order
    #[error("Unknown author ids: {}", join_ids(.0))]
    UnknownAuthor(Vec<PersonId>),

    /// Authorship link references a person that does not exist
    #[error("Unknown person: {0}")]
    UnknownPerson(PersonId),

    /// Authorship link references a publication that does not exist
    #[error("Unknown publication: {0}")]
    UnknownPublication(PublicationId),

    /// Value outside a closed enumeration
    #[error("Invalid {kind} value: {value:?}")]
    InvalidEnumValue { kind: &'static str, value: String },

    /// The (person, publication) pair is already linked
    #[error("Person {person_id} is already linked to publication {publication_id}")]
    UniquenessViolation {
        person_id: PersonId,
        publication_id: PublicationId,
    },

    /// No authorship link with the given key exists
    #[error("Authorship link not found: {0}")]
    LinkNotFound(AuthorshipLink),

    /// Stored or supplied date is not a calendar date
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Configuration could not be read or parsed
    #[error("Config error: {0}")]
    Config(String),

    /// Underlying database failure
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FacultyError {
    /// Whether the registrar rejected its input before touching storage.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyAuthorList | Self::UnknownAuthor(_))
    }

    /// Whether the integrity guard rejected an authorship write.
    pub fn is_referential(&self) -> bool {
        matches!(self, Self::UnknownPerson(_) | Self::UnknownPublication(_))
    }
}

impl From<rusqlite::Error> for FacultyError {
    fn from(e: rusqlite::Error) -> Self {
        FacultyError::Storage(e.to_string())
    }
}

fn join_ids(ids: &[PersonId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
