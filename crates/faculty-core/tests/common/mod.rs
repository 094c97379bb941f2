//! Shared fixtures for faculty-core integration tests

use chrono::NaiveDate;
use faculty_core::{FacultyStore, NewPublication, PersonId, PersonType, PublicationType};

/// The five-person faculty used across scenario tests.
pub const FACULTY: [(&str, PersonType); 5] = [
    ("Ivanov", PersonType::Student),
    ("Petrov", PersonType::Student),
    ("Nesterov", PersonType::PhdCandidate),
    ("Antonava", PersonType::Lecturer),
    ("Zaya", PersonType::Other),
];

pub fn seed(store: &FacultyStore) -> Vec<PersonId> {
    FACULTY
        .iter()
        .map(|(surname, person_type)| store.create_person(surname, *person_type).unwrap())
        .collect()
}

pub fn article(name: &str) -> NewPublication {
    NewPublication::new(
        name,
        NaiveDate::from_ymd_opt(2021, 4, 12).unwrap(),
        "Minsk",
        PublicationType::Article,
    )
}

pub fn ids(raw: impl IntoIterator<Item = i64>) -> Vec<PersonId> {
    raw.into_iter().map(PersonId).collect()
}
