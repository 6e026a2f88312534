use domaid_domain::domain_event::{DomainEvent, Event, EventMetadata};
use domaid_domain::uuid::Uuid;
use domaid_macros::domain_event;

#[domain_event]
enum MixedEvent {
    Started {},
    Updated { value: String },
    #[event(event_type = "mixed.completed")]
    Completed { result: i32 },
}

fn main() {
    let code = Uuid::new_v4();
    let started = MixedEvent::Started {
        metadata: EventMetadata::new(code),
    };
    let updated = MixedEvent::Updated {
        metadata: EventMetadata::new(code),
        value: "v".into(),
    };
    let mut completed = MixedEvent::Completed {
        metadata: EventMetadata::new(code),
        result: 100,
    };

    assert_eq!(started.event_type(), "MixedEvent.Started");
    assert_eq!(updated.event_type(), "MixedEvent.Updated");
    assert_eq!(completed.event_type(), "mixed.completed");
    assert_eq!(completed.aggregate_id(), code);
    assert_ne!(started.event_id(), updated.event_id());

    completed.set_published(true);
    assert!(completed.is_published());
    assert_eq!(completed.clone(), completed);
}
