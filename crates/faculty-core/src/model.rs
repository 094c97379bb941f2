//! Faculty data model: people, publications and the authorship link between them.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::error::FacultyError;

/// Surrogate key of a [`Person`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub i64);

/// Surrogate key of a [`Publication`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicationId(pub i64);

macro_rules! surrogate_key {
    ($name:ident) => {
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                self.0.to_sql()
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                i64::column_result(value).map(Self)
            }
        }
    };
}

surrogate_key!(PersonId);
surrogate_key!(PublicationId);

/// Academic role of a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonType {
    Student,
    PhdCandidate,
    Lecturer,
    Other,
}

impl PersonType {
    pub const ALL: [PersonType; 4] = [
        PersonType::Student,
        PersonType::PhdCandidate,
        PersonType::Lecturer,
        PersonType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PersonType::Student => "student",
            PersonType::PhdCandidate => "phd_candidate",
            PersonType::Lecturer => "lecturer",
            PersonType::Other => "other",
        }
    }
}

/// Kind of publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicationType {
    Book,
    Article,
    Report,
    Thesis,
    Other,
}

impl PublicationType {
    pub const ALL: [PublicationType; 5] = [
        PublicationType::Book,
        PublicationType::Article,
        PublicationType::Report,
        PublicationType::Thesis,
        PublicationType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PublicationType::Book => "book",
            PublicationType::Article => "article",
            PublicationType::Report => "report",
            PublicationType::Thesis => "thesis",
            PublicationType::Other => "other",
        }
    }
}

// Both enumerations share their text form in storage, config and CLI input.
// Rows are read back as text and parsed, so an unknown stored value surfaces
// as `InvalidEnumValue` rather than a generic conversion failure.
macro_rules! closed_enum {
    ($name:ident, $kind:literal) => {
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = FacultyError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .into_iter()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| FacultyError::InvalidEnumValue {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }
    };
}

closed_enum!(PersonType, "person type");
closed_enum!(PublicationType, "publication type");

/// A member of the faculty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub surname: String,
    #[serde(rename = "type")]
    pub person_type: PersonType,
}

/// A registered publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub id: PublicationId,
    pub name: String,
    pub date: NaiveDate,
    pub place: String,
    #[serde(rename = "type")]
    pub publication_type: PublicationType,
}

/// Publication fields supplied by the caller before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPublication {
    pub name: String,
    pub date: NaiveDate,
    pub place: String,
    #[serde(rename = "type")]
    pub publication_type: PublicationType,
}

impl NewPublication {
    pub fn new(
        name: impl Into<String>,
        date: NaiveDate,
        place: impl Into<String>,
        publication_type: PublicationType,
    ) -> Self {
        Self {
            name: name.into(),
            date,
            place: place.into(),
            publication_type,
        }
    }

    pub(crate) fn with_id(&self, id: PublicationId) -> Publication {
        Publication {
            id,
            name: self.name.clone(),
            date: self.date,
            place: self.place.clone(),
            publication_type: self.publication_type,
        }
    }
}

/// Many-to-many row connecting one person to one publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthorshipLink {
    pub person_id: PersonId,
    pub publication_id: PublicationId,
}

impl AuthorshipLink {
    pub fn new(person_id: PersonId, publication_id: PublicationId) -> Self {
        Self {
            person_id,
            publication_id,
        }
    }
}

impl fmt::Display for AuthorshipLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.person_id, self.publication_id)
    }
}

/// Storage format for publication dates.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, FacultyError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| FacultyError::InvalidDate(s.to_string()))
}
