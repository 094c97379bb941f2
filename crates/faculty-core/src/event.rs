use serde::{Deserialize, Serialize};

use crate::model::{AuthorshipLink, Person, PersonId, Publication};

/// Events emitted by the store after a change commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FacultyEvent {
    PersonCreated(Person),
    PublicationRegistered {
        publication: Publication,
        authors: Vec<PersonId>,
    },
    AuthorLinked(AuthorshipLink),
    AuthorRelinked {
        from: AuthorshipLink,
        to: AuthorshipLink,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PersonType, PublicationId};

    #[test]
    fn event_serializes_with_variant_tag() {
        let event = FacultyEvent::PersonCreated(Person {
            id: PersonId(1),
            surname: "Ivanov".into(),
            person_type: PersonType::Student,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["PersonCreated"]["surname"], "Ivanov");

        let event = FacultyEvent::AuthorLinked(AuthorshipLink::new(PersonId(1), PublicationId(2)));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["AuthorLinked"]["publication_id"], 2);
    }
}
