//! Integrity guard for the authorship table.
//!
//! Every insert into `authorship`, and every update touching either key
//! column, passes through a `BEFORE` trigger that aborts the statement when
//! the referenced person or publication does not exist. Because the check
//! lives in the database, direct SQL writes are guarded the same way as
//! writes made through [`FacultyStore`](crate::FacultyStore).
//!
//! The trigger aborts with a fixed marker message; [`IntegrityGuard::classify`]
//! turns that back into a typed error naming the offending id. The person is
//! always checked before the publication.

use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use crate::error::{FacultyError, Result};
use crate::model::{AuthorshipLink, PersonId, PublicationId};

const UNKNOWN_PERSON: &str = "authorship: unknown person";
const UNKNOWN_PUBLICATION: &str = "authorship: unknown publication";

/// Write-time referential checks for authorship links.
pub struct IntegrityGuard;

impl IntegrityGuard {
    /// Trigger DDL installed alongside the tables.
    pub fn triggers() -> String {
        let body = format!(
            "
    SELECT RAISE(ABORT, '{UNKNOWN_PERSON}')
    WHERE NOT EXISTS (SELECT 1 FROM person WHERE id = NEW.person_id);
    SELECT RAISE(ABORT, '{UNKNOWN_PUBLICATION}')
    WHERE NOT EXISTS (SELECT 1 FROM publication WHERE id = NEW.publication_id);"
        );

        format!(
            "
CREATE TRIGGER IF NOT EXISTS authorship_guard_insert
BEFORE INSERT ON authorship
BEGIN{body}
END;

CREATE TRIGGER IF NOT EXISTS authorship_guard_update
BEFORE UPDATE OF person_id, publication_id ON authorship
BEGIN{body}
END;
"
        )
    }

    /// Map a failed authorship write to the error it represents.
    ///
    /// `attempted` is the key the statement tried to write.
    pub fn classify(err: rusqlite::Error, attempted: AuthorshipLink) -> FacultyError {
        if let rusqlite::Error::SqliteFailure(ref failure, ref message) = err {
            if failure.code == ErrorCode::ConstraintViolation {
                match message.as_deref() {
                    Some(UNKNOWN_PERSON) => {
                        return FacultyError::UnknownPerson(attempted.person_id)
                    }
                    Some(UNKNOWN_PUBLICATION) => {
                        return FacultyError::UnknownPublication(attempted.publication_id)
                    }
                    _ => {}
                }
                if matches!(
                    failure.extended_code,
                    rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                        | rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                ) {
                    return FacultyError::UniquenessViolation {
                        person_id: attempted.person_id,
                        publication_id: attempted.publication_id,
                    };
                }
            }
        }
        FacultyError::Storage(format!("authorship {}: {}", attempted, err))
    }

    /// Indexed existence check on the person table.
    pub fn person_exists(conn: &Connection, id: PersonId) -> Result<bool> {
        let found = conn
            .query_row("SELECT 1 FROM person WHERE id = ?1", params![id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    /// Indexed existence check on the publication table.
    pub fn publication_exists(conn: &Connection, id: PublicationId) -> Result<bool> {
        let found = conn
            .query_row(
                "SELECT 1 FROM publication WHERE id = ?1",
                params![id],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Audit every stored link; fails on the first one that dangles.
    pub fn verify(conn: &Connection) -> Result<()> {
        let mut stmt = conn.prepare(
            "SELECT a.person_id, a.publication_id,
                    EXISTS (SELECT 1 FROM person p WHERE p.id = a.person_id),
                    EXISTS (SELECT 1 FROM publication q WHERE q.id = a.publication_id)
             FROM authorship a
             ORDER BY a.rowid",
        )?;

        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let person_id: PersonId = row.get(0)?;
            let publication_id: PublicationId = row.get(1)?;
            let person_ok: bool = row.get(2)?;
            let publication_ok: bool = row.get(3)?;

            if !person_ok {
                return Err(FacultyError::UnknownPerson(person_id));
            }
            if !publication_ok {
                return Err(FacultyError::UnknownPublication(publication_id));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(&Schema::create_all()).unwrap();
        conn.execute_batch(
            "INSERT INTO person (surname, type) VALUES ('Ivanov', 'student');
             INSERT INTO publication (name, date, place, type)
                 VALUES ('Article: X', '2020-05-01', 'Minsk', 'article');",
        )
        .unwrap();
        conn
    }

    fn link(person: i64, publication: i64) -> AuthorshipLink {
        AuthorshipLink::new(PersonId(person), PublicationId(publication))
    }

    fn insert(conn: &Connection, l: AuthorshipLink) -> Result<()> {
        conn.execute(
            "INSERT INTO authorship (person_id, publication_id) VALUES (?1, ?2)",
            params![l.person_id, l.publication_id],
        )
        .map(|_| ())
        .map_err(|e| IntegrityGuard::classify(e, l))
    }

    fn count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM authorship", [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn raw_insert_with_known_ids_passes() {
        let conn = setup();
        insert(&conn, link(1, 1)).unwrap();
        assert_eq!(count(&conn), 1);
        IntegrityGuard::verify(&conn).unwrap();
    }

    #[test]
    fn raw_insert_with_unknown_person_is_blocked() {
        let conn = setup();
        let err = insert(&conn, link(42, 1)).unwrap_err();
        assert!(matches!(err, FacultyError::UnknownPerson(PersonId(42))));
        assert_eq!(count(&conn), 0);
    }

    #[test]
    fn raw_insert_with_unknown_publication_is_blocked() {
        let conn = setup();
        let err = insert(&conn, link(1, 42)).unwrap_err();
        assert!(matches!(
            err,
            FacultyError::UnknownPublication(PublicationId(42))
        ));
        assert_eq!(count(&conn), 0);
    }

    #[test]
    fn person_is_reported_before_publication() {
        let conn = setup();
        let err = insert(&conn, link(42, 43)).unwrap_err();
        assert!(matches!(err, FacultyError::UnknownPerson(PersonId(42))));
    }

    #[test]
    fn raw_update_is_guarded() {
        let conn = setup();
        insert(&conn, link(1, 1)).unwrap();

        let err = conn
            .execute(
                "UPDATE authorship SET person_id = 10 WHERE person_id = 1",
                [],
            )
            .map_err(|e| IntegrityGuard::classify(e, link(10, 1)))
            .unwrap_err();
        assert!(matches!(err, FacultyError::UnknownPerson(PersonId(10))));

        let person: i64 = conn
            .query_row("SELECT person_id FROM authorship", [], |r| r.get(0))
            .unwrap();
        assert_eq!(person, 1);
    }

    #[test]
    fn duplicate_pair_is_a_uniqueness_violation() {
        let conn = setup();
        insert(&conn, link(1, 1)).unwrap();
        let err = insert(&conn, link(1, 1)).unwrap_err();
        assert!(matches!(err, FacultyError::UniquenessViolation { .. }));
    }

    #[test]
    fn existence_checks() {
        let conn = setup();
        assert!(IntegrityGuard::person_exists(&conn, PersonId(1)).unwrap());
        assert!(!IntegrityGuard::person_exists(&conn, PersonId(2)).unwrap());
        assert!(IntegrityGuard::publication_exists(&conn, PublicationId(1)).unwrap());
        assert!(!IntegrityGuard::publication_exists(&conn, PublicationId(2)).unwrap());
    }

    #[test]
    fn verify_reports_rows_written_with_guards_bypassed() {
        let conn = setup();
        conn.execute_batch(
            "DROP TRIGGER authorship_guard_insert;
             PRAGMA foreign_keys = OFF;
             INSERT INTO authorship (person_id, publication_id) VALUES (7, 1);",
        )
        .unwrap();
        let err = IntegrityGuard::verify(&conn).unwrap_err();
        assert!(matches!(err, FacultyError::UnknownPerson(PersonId(7))));
    }
}
