use domaid_domain::domain_event::{DomainEvent, Event, EventMetadata};
use domaid_domain::uuid::Uuid;
use domaid_macros::domain_event;

#[domain_event]
struct FakeDomainEvent {
    note: String,
}

#[domain_event(event_type = "user.registered")]
struct UserRegistered {
    metadata: EventMetadata,
    email: String,
}

fn main() {
    let code = Uuid::new_v4();
    let fake = FakeDomainEvent {
        metadata: EventMetadata::new(code),
        note: "n".into(),
    };
    assert_eq!(fake.event_type(), "FakeDomainEvent");
    assert_eq!(fake.aggregate_id(), code);
    assert!(!fake.is_published());

    let mut registered = UserRegistered {
        metadata: EventMetadata::new(Uuid::nil()),
        email: "a@b.c".into(),
    };
    registered.set_aggregate_id(code);
    assert_eq!(registered.event_type(), "user.registered");
    assert_eq!(registered.aggregate_id(), code);
    assert!(registered.date_occurred() <= domaid_domain::chrono::Utc::now());
    assert_eq!(registered.email, "a@b.c");
}
