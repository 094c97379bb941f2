//! SQLite-backed entity store for people, publications and authorship links.

use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use crate::config::DatabaseConfig;
use crate::error::{FacultyError, Result};
use crate::event::FacultyEvent;
use crate::guard::IntegrityGuard;
use crate::model::{
    AuthorshipLink, NewPublication, Person, PersonId, PersonType, Publication, PublicationId,
    DATE_FORMAT,
};
use crate::schema::{Schema, SCHEMA_VERSION};

/// Durable store for the faculty registry.
///
/// Every public write runs in its own `BEGIN IMMEDIATE` transaction, so the
/// checks it performs see every row committed before it took the write lock.
pub struct FacultyStore {
    conn: Mutex<Connection>,
    // Created by `subscribe`; events are dropped while nobody listens.
    event_tx: Mutex<Option<Sender<FacultyEvent>>>,
}

impl FacultyStore {
    /// Open (or create) a database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_config(&DatabaseConfig {
            path: Some(path.to_path_buf()),
            ..DatabaseConfig::default()
        })
    }

    /// Open the database described by `config`, creating parent directories.
    pub fn open_with_config(config: &DatabaseConfig) -> Result<Self> {
        let path = config.resolved_path()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&path)?;
        conn.busy_timeout(config.busy_timeout())?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })?;

        let store = Self::init_with_connection(conn)?;
        tracing::info!("Opened faculty database at {:?}", path);
        Ok(store)
    }

    /// Create an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_with_connection(conn)
    }

    fn init_with_connection(mut conn: Connection) -> Result<Self> {
        Self::initialize(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            event_tx: Mutex::new(None),
        })
    }

    /// Create the schema and record its version. Both happen under one write
    /// lock so concurrent openers of a fresh file record the version once.
    fn initialize(conn: &mut Connection) -> Result<()> {
        // Has no effect inside a transaction
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute_batch(&Schema::create_all())?;

        let current_version: u32 = tx
            .query_row(
                "SELECT version FROM schema_version ORDER BY rowid DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?
            .unwrap_or(0);

        if current_version < SCHEMA_VERSION {
            for version in current_version.max(1)..SCHEMA_VERSION {
                if let Some(migration) = Schema::migration(version, version + 1) {
                    tx.execute_batch(migration)?;
                }
            }
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                [SCHEMA_VERSION],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| FacultyError::Storage(format!("connection lock poisoned: {}", e)))
    }

    pub(crate) fn emit(&self, event: FacultyEvent) {
        let Ok(mut sender) = self.event_tx.lock() else {
            return;
        };
        if let Some(tx) = sender.as_ref() {
            // Receiver dropped: stop sending and allow a new subscriber
            if tx.send(event).is_err() {
                *sender = None;
            }
        }
    }

    /// Open the change feed. Only events committed after this call are
    /// delivered, and only one subscriber is supported at a time.
    pub fn subscribe(&self) -> Result<Receiver<FacultyEvent>> {
        let mut sender = self
            .event_tx
            .lock()
            .map_err(|e| FacultyError::Storage(e.to_string()))?;
        if sender.is_some() {
            return Err(FacultyError::Storage(
                "change feed already subscribed".to_string(),
            ));
        }
        let (tx, rx) = mpsc::channel();
        *sender = Some(tx);
        Ok(rx)
    }

    // ==================== Entity Operations ====================

    /// Create a person, returning its new id.
    pub fn create_person(&self, surname: &str, person_type: PersonType) -> Result<PersonId> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let id = Self::insert_person(&tx, surname, person_type)?;
        tx.commit()?;
        drop(conn);

        tracing::info!("Created person {} ({}, {})", id, surname, person_type);
        self.emit(FacultyEvent::PersonCreated(Person {
            id,
            surname: surname.to_string(),
            person_type,
        }));
        Ok(id)
    }

    pub(crate) fn insert_person(
        conn: &Connection,
        surname: &str,
        person_type: PersonType,
    ) -> Result<PersonId> {
        conn.execute(
            "INSERT INTO person (surname, type) VALUES (?1, ?2)",
            params![surname, person_type],
        )?;
        Ok(PersonId(conn.last_insert_rowid()))
    }

    /// Insert a publication row. Only the registrar calls this, inside its
    /// own transaction.
    pub(crate) fn insert_publication(
        conn: &Connection,
        draft: &NewPublication,
    ) -> Result<PublicationId> {
        conn.execute(
            "INSERT INTO publication (name, date, place, type) VALUES (?1, ?2, ?3, ?4)",
            params![
                draft.name,
                draft.date.format(DATE_FORMAT).to_string(),
                draft.place,
                draft.publication_type,
            ],
        )?;
        Ok(PublicationId(conn.last_insert_rowid()))
    }

    // ==================== Authorship Operations ====================

    /// Insert one authorship row through the guard.
    pub(crate) fn insert_link(conn: &Connection, link: AuthorshipLink) -> Result<()> {
        conn.execute(
            "INSERT INTO authorship (person_id, publication_id) VALUES (?1, ?2)",
            params![link.person_id, link.publication_id],
        )
        .map_err(|e| IntegrityGuard::classify(e, link))?;
        Ok(())
    }

    /// Link an existing person to an existing publication.
    pub fn add_authorship_link(
        &self,
        person_id: PersonId,
        publication_id: PublicationId,
    ) -> Result<()> {
        let link = AuthorshipLink::new(person_id, publication_id);

        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        Self::insert_link(&tx, link)?;
        tx.commit()?;
        drop(conn);

        tracing::debug!("Linked author {} to publication {}", person_id, publication_id);
        self.emit(FacultyEvent::AuthorLinked(link));
        Ok(())
    }

    /// Rewrite the key of an existing link. The new key is guarded exactly
    /// like an insert.
    pub fn update_authorship_link(&self, from: AuthorshipLink, to: AuthorshipLink) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx
            .execute(
                "UPDATE authorship SET person_id = ?1, publication_id = ?2
                 WHERE person_id = ?3 AND publication_id = ?4",
                params![
                    to.person_id,
                    to.publication_id,
                    from.person_id,
                    from.publication_id
                ],
            )
            .map_err(|e| IntegrityGuard::classify(e, to))?;
        if changed == 0 {
            return Err(FacultyError::LinkNotFound(from));
        }
        tx.commit()?;
        drop(conn);

        tracing::debug!("Relinked authorship {} -> {}", from, to);
        self.emit(FacultyEvent::AuthorRelinked { from, to });
        Ok(())
    }

    // ==================== Lookups ====================

    /// Get a person by id.
    pub fn person(&self, id: PersonId) -> Result<Option<Person>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT surname, type FROM person WHERE id = ?1",
                params![id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        row.map(|(surname, person_type)| -> Result<Person> {
            Ok(Person {
                id,
                surname,
                person_type: person_type.parse()?,
            })
        })
        .transpose()
    }

    /// Get a publication by id.
    pub fn publication(&self, id: PublicationId) -> Result<Option<Publication>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT name, date, place, type FROM publication WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        row.map(|(name, date, place, publication_type)| -> Result<Publication> {
            Ok(Publication {
                id,
                name,
                date: NaiveDate::parse_from_str(&date, DATE_FORMAT)
                    .map_err(|_| FacultyError::InvalidDate(date.clone()))?,
                place,
                publication_type: publication_type.parse()?,
            })
        })
        .transpose()
    }

    /// All authorship links in insertion order.
    pub fn authorship_links(&self) -> Result<Vec<AuthorshipLink>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT person_id, publication_id FROM authorship ORDER BY rowid")?;
        let links = stmt
            .query_map([], |row| Ok(AuthorshipLink::new(row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(links)
    }

    /// Number of stored publications.
    pub fn publication_count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM publication", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Check that every stored link references an existing person and publication.
    pub fn verify_integrity(&self) -> Result<()> {
        let conn = self.lock()?;
        IntegrityGuard::verify(&conn)
    }
}
