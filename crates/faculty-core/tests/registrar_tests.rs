//! Registrar scenario tests against a seeded faculty

mod common;

use common::{article, ids, seed};
use faculty_core::{AuthorshipLink, FacultyError, FacultyStore, PersonId, PublicationId};

#[test]
fn test_seeded_ids_are_sequential() {
    let store = FacultyStore::open_in_memory().unwrap();
    assert_eq!(seed(&store), ids(1..=5));
}

#[test]
fn test_faculty_scenario() {
    let store = FacultyStore::open_in_memory().unwrap();
    seed(&store);

    // No authors
    let err = store.add_publication(&article("Article: X"), &[]).unwrap_err();
    assert!(matches!(err, FacultyError::EmptyAuthorList));
    assert_eq!(store.publication_count().unwrap(), 0);

    // Authors 6..10 do not exist
    let err = store
        .add_publication(&article("Article: X"), &ids(1..=10))
        .unwrap_err();
    match err {
        FacultyError::UnknownAuthor(missing) => assert_eq!(missing, ids(6..=10)),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(store.publication_count().unwrap(), 0);
    assert!(store.authorship_links().unwrap().is_empty());

    // All authors known
    let n = store
        .add_publication(&article("Article: X"), &ids(1..=3))
        .unwrap();
    assert_eq!(store.publication_count().unwrap(), 1);
    assert_eq!(
        store.authorship_links().unwrap(),
        vec![
            AuthorshipLink::new(PersonId(1), n),
            AuthorshipLink::new(PersonId(2), n),
            AuthorshipLink::new(PersonId(3), n),
        ]
    );

    // Moving an existing link to an unknown person
    let before = store.authorship_links().unwrap();
    let err = store
        .update_authorship_link(
            AuthorshipLink::new(PersonId(1), n),
            AuthorshipLink::new(PersonId(10), n),
        )
        .unwrap_err();
    assert!(matches!(err, FacultyError::UnknownPerson(PersonId(10))));
    assert_eq!(store.authorship_links().unwrap(), before);

    store.verify_integrity().unwrap();
}

#[test]
fn test_error_message_names_missing_authors() {
    let store = FacultyStore::open_in_memory().unwrap();
    seed(&store);
    let err = store
        .add_publication(&article("Article: X"), &ids([4, 8, 5, 6]))
        .unwrap_err();
    assert_eq!(err.to_string(), "Unknown author ids: 8, 6");
}

#[test]
fn test_each_publication_gets_a_fresh_id() {
    let store = FacultyStore::open_in_memory().unwrap();
    seed(&store);
    let first = store.add_publication(&article("A"), &ids([1])).unwrap();
    let second = store.add_publication(&article("B"), &ids([1])).unwrap();
    assert_eq!(first, PublicationId(1));
    assert_eq!(second, PublicationId(2));

    // Same author may write many publications
    let links = store.authorship_links().unwrap();
    assert_eq!(links.len(), 2);
    assert!(links.iter().all(|l| l.person_id == PersonId(1)));
}

#[test]
fn test_direct_link_to_registered_publication() {
    let store = FacultyStore::open_in_memory().unwrap();
    seed(&store);
    let p = store.add_publication(&article("A"), &ids([1])).unwrap();

    store.add_authorship_link(PersonId(4), p).unwrap();
    let err = store.add_authorship_link(PersonId(4), PublicationId(2)).unwrap_err();
    assert!(matches!(err, FacultyError::UnknownPublication(PublicationId(2))));

    assert_eq!(store.authorship_links().unwrap().len(), 2);
    store.verify_integrity().unwrap();
}
