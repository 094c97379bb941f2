//! Publication registrar: creates a publication together with its authors.
//!
//! Validation and every write share one immediate transaction. Nothing is
//! written until the author list has been checked, and any failure after
//! that (a guard rejection, a repeated author) rolls the publication row
//! back with its links.

use std::collections::HashSet;

use rusqlite::{Connection, TransactionBehavior};

use crate::error::{FacultyError, Result};
use crate::event::FacultyEvent;
use crate::guard::IntegrityGuard;
use crate::model::{AuthorshipLink, NewPublication, PersonId, PublicationId};
use crate::store::FacultyStore;

impl FacultyStore {
    /// Register a publication and link each of `author_ids` to it, in order.
    ///
    /// Fails with [`FacultyError::EmptyAuthorList`] for an empty list and with
    /// [`FacultyError::UnknownAuthor`] naming every id that is not a known
    /// person; in both cases the store is untouched.
    pub fn add_publication(
        &self,
        draft: &NewPublication,
        author_ids: &[PersonId],
    ) -> Result<PublicationId> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let publication_id = match register(&tx, draft, author_ids) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Publication {:?} rejected: {}", draft.name, e);
                return Err(e);
            }
        };
        tx.commit()?;
        drop(conn);

        tracing::info!(
            "Registered publication {} ({:?}) with {} author(s)",
            publication_id,
            draft.name,
            author_ids.len()
        );
        self.emit(FacultyEvent::PublicationRegistered {
            publication: draft.with_id(publication_id),
            authors: author_ids.to_vec(),
        });
        Ok(publication_id)
    }
}

fn register(
    conn: &Connection,
    draft: &NewPublication,
    author_ids: &[PersonId],
) -> Result<PublicationId> {
    validate_authors(conn, author_ids)?;

    let publication_id = FacultyStore::insert_publication(conn, draft)?;
    for &person_id in author_ids {
        FacultyStore::insert_link(conn, AuthorshipLink::new(person_id, publication_id))?;
        tracing::debug!("Linked author {} to publication {}", person_id, publication_id);
    }
    Ok(publication_id)
}

fn validate_authors(conn: &Connection, author_ids: &[PersonId]) -> Result<()> {
    if author_ids.is_empty() {
        return Err(FacultyError::EmptyAuthorList);
    }

    let missing = missing_authors(conn, author_ids)?;
    if !missing.is_empty() {
        return Err(FacultyError::UnknownAuthor(missing));
    }
    Ok(())
}

/// Ids from `author_ids` with no matching person, deduplicated, in
/// first-occurrence order.
fn missing_authors(conn: &Connection, author_ids: &[PersonId]) -> Result<Vec<PersonId>> {
    let mut seen = HashSet::with_capacity(author_ids.len());
    let mut missing = Vec::new();
    for &id in author_ids {
        if seen.insert(id) && !IntegrityGuard::person_exists(conn, id)? {
            missing.push(id);
        }
    }
    Ok(missing)
}
