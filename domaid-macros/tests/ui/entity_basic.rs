use domaid_domain::entity::{Entity, EntityBase};
use domaid_domain::domain_event::EventMetadata;
use domaid_macros::{domain_event, entity};

#[domain_event]
enum AccountEvent {
    Opened { owner: String },
}

#[entity(event = AccountEvent)]
#[derive(Clone)]
struct Account {
    owner: String,
}

#[entity(event = AccountEvent, debug = false)]
struct Ledger {
    entries: Vec<i64>,
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ledger({} entries)", self.entries.len())
    }
}

fn main() {
    let mut account = Account {
        base: EntityBase::new(),
        owner: "alice".into(),
    };
    let event = AccountEvent::Opened {
        metadata: EventMetadata::new(account.code()),
        owner: account.owner.clone(),
    };
    account.add_domain_event(event);
    assert_eq!(account.domain_events().len(), 1);
    assert_eq!(account.id(), 0);

    let copy = account.clone();
    assert_eq!(copy.code(), account.code());

    let ledger = Ledger {
        base: EntityBase::new(),
        entries: vec![1, 2],
    };
    assert_eq!(format!("{:?}", ledger), "Ledger(2 entries)");
    assert!(!ledger.deleted());
}
