//! Participant registration with an exact capacity check.
//!
//! The seat is claimed with one conditional `UPDATE` and the join row is
//! inserted in the same transaction, so concurrent registrations can never
//! push an event past `max_participants` or let the counter drift from the
//! number of registrations.

use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use models::{event, event_participant, participant};
use crate::errors::ServiceError;

/// Registration form fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationRequest {
    pub name: String,
    pub email: String,
}

impl RegistrationRequest {
    fn validate(&self) -> Result<(), ServiceError> {
        let (name, email) = (self.name.trim(), self.email.trim());
        if name.is_empty() {
            return Err(ServiceError::Validation("name required".into()));
        }
        if !email.contains('@') {
            return Err(ServiceError::Validation("invalid email".into()));
        }
        participant::validate_identity(name, email)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationOutcome {
    Registered { participant: participant::Model, num_participants: i32 },
    EventFull,
    AlreadyRegistered,
}

impl RegistrationOutcome {
    pub fn is_registered(&self) -> bool { matches!(self, RegistrationOutcome::Registered { .. }) }

    fn label(&self) -> &'static str {
        match self {
            RegistrationOutcome::Registered { .. } => "registered",
            RegistrationOutcome::EventFull => "event_full",
            RegistrationOutcome::AlreadyRegistered => "already_registered",
        }
    }
}

/// Register `(name, email)` for the event.
///
/// Checks run in order: capacity, then duplicate. The participant row is
/// created (or reused) before either check and is kept even when the
/// registration is rejected.
#[instrument(skip(db, req), fields(email = %req.email))]
pub async fn register_participant(
    db: &DatabaseConnection,
    event_id: Uuid,
    req: &RegistrationRequest,
) -> Result<RegistrationOutcome, ServiceError> {
    req.validate()?;
    if event::find(db, event_id).await?.is_none() {
        return Err(ServiceError::not_found("event"));
    }
    let name = req.name.trim();
    let email = req.email.trim();
    let (person, created) = participant::find_or_create(db, name, email).await?;

    let txn = db.begin().await?;
    let outcome = if !event::reserve_seat(&txn, event_id).await? {
        // zero rows: either full or deleted since the lookup above
        if event::find(&txn, event_id).await?.is_none() {
            txn.rollback().await?;
            return Err(ServiceError::not_found("event"));
        }
        RegistrationOutcome::EventFull
    } else if event_participant::is_registered(&txn, event_id, person.id).await?
        || !event_participant::link(&txn, event_id, person.id).await?
    {
        RegistrationOutcome::AlreadyRegistered
    } else {
        let num_participants = event::find(&txn, event_id)
            .await?
            .map(|e| e.num_participants)
            .ok_or_else(|| ServiceError::not_found("event"))?;
        RegistrationOutcome::Registered { participant: person, num_participants }
    };

    if outcome.is_registered() {
        txn.commit().await?;
    } else {
        txn.rollback().await?;
    }
    info!(event_id = %event_id, participant_created = created, outcome = outcome.label(), "registration");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use chrono::{Duration, Utc};
    use models::event::NewEvent;
    use crate::test_support::{get_db, seed_user};

    fn req(name: &str, email: &str) -> RegistrationRequest {
        RegistrationRequest { name: name.into(), email: email.into() }
    }

    async fn event_with_capacity(db: &DatabaseConnection, max: i32) -> Result<event::Model, anyhow::Error> {
        let owner = seed_user(db, &format!("owner{}", Uuid::new_v4().simple())).await?;
        Ok(event::create(db, NewEvent {
            user_id: owner.id,
            title: "Capacity test".into(),
            description: String::new(),
            date: Utc::now() + Duration::days(7),
            location: "Room 1".into(),
            max_participants: max,
        })
        .await?)
    }

    #[tokio::test]
    async fn n_plus_first_registration_is_rejected() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let ev = event_with_capacity(&db, 3).await?;

        for i in 0..3 {
            let out = register_participant(&db, ev.id, &req(&format!("P{i}"), &format!("p{i}@example.com"))).await?;
            match out {
                RegistrationOutcome::Registered { num_participants, .. } => assert_eq!(num_participants, i + 1),
                other => panic!("expected registration, got {other:?}"),
            }
        }
        let out = register_participant(&db, ev.id, &req("P3", "p3@example.com")).await?;
        assert_eq!(out, RegistrationOutcome::EventFull);

        let ev = event::find(&db, ev.id).await?.unwrap();
        assert_eq!(ev.num_participants, 3);
        assert_eq!(event::count_participants(&db, ev.id).await?, 3);
        // the rejected registrant still got a participant row
        assert!(participant::find_by_identity(&db, "P3", "p3@example.com").await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn same_pair_twice_is_a_duplicate() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let ev = event_with_capacity(&db, 10).await?;

        assert!(register_participant(&db, ev.id, &req("Ada", "ada@example.com")).await?.is_registered());
        let again = register_participant(&db, ev.id, &req("Ada", "ada@example.com")).await?;
        assert_eq!(again, RegistrationOutcome::AlreadyRegistered);

        let ev = event::find(&db, ev.id).await?.unwrap();
        assert_eq!(ev.num_participants, 1);
        assert_eq!(event::count_participants(&db, ev.id).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn capacity_is_checked_before_duplicates() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let ev = event_with_capacity(&db, 1).await?;
        register_participant(&db, ev.id, &req("Solo", "solo@example.com")).await?;
        let again = register_participant(&db, ev.id, &req("Solo", "solo@example.com")).await?;
        assert_eq!(again, RegistrationOutcome::EventFull);
        Ok(())
    }

    #[tokio::test]
    async fn participant_is_shared_across_events() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let a = event_with_capacity(&db, 5).await?;
        let b = event_with_capacity(&db, 5).await?;
        let first = register_participant(&db, a.id, &req("Kim", "kim@example.com")).await?;
        let second = register_participant(&db, b.id, &req("Kim", "kim@example.com")).await?;
        match (first, second) {
            (
                RegistrationOutcome::Registered { participant: p1, .. },
                RegistrationOutcome::Registered { participant: p2, .. },
            ) => assert_eq!(p1.id, p2.id),
            other => panic!("expected two registrations, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn zero_capacity_event_is_always_full() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let ev = event_with_capacity(&db, 0).await?;
        let out = register_participant(&db, ev.id, &req("Nobody", "nobody@example.com")).await?;
        assert_eq!(out, RegistrationOutcome::EventFull);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_event_and_bad_input() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let missing = register_participant(&db, Uuid::new_v4(), &req("A", "a@example.com")).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));

        let ev = event_with_capacity(&db, 5).await?;
        let blank = register_participant(&db, ev.id, &req("  ", "a@example.com")).await;
        assert!(matches!(blank, Err(ServiceError::Validation(_))));
        let bad_mail = register_participant(&db, ev.id, &req("A", "not-an-email")).await;
        assert!(matches!(bad_mail, Err(ServiceError::Validation(_))));
        Ok(())
    }

    #[tokio::test]
    async fn over_long_identity_is_rejected_before_any_write() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let ev = event_with_capacity(&db, 5).await?;
        let long_name = "a".repeat(201);
        let err = register_participant(&db, ev.id, &req(&long_name, "a@example.com")).await.unwrap_err();
        assert!(err.validation_message().is_some_and(|m| m.contains("name")));
        assert!(participant::find_by_identity(&db, &long_name, "a@example.com").await?.is_none());

        let long_email = format!("{}@example.com", "e".repeat(250));
        let err = register_participant(&db, ev.id, &req("Ann", &long_email)).await.unwrap_err();
        assert!(err.validation_message().is_some_and(|m| m.contains("email")));
        assert_eq!(event::find(&db, ev.id).await?.unwrap().num_participants, 0);
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_registrations_never_exceed_capacity() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let ev = event_with_capacity(&db, 4).await?;
        let db = Arc::new(db);

        let mut handles = Vec::new();
        for i in 0..12 {
            let db = Arc::clone(&db);
            let id = ev.id;
            handles.push(tokio::spawn(async move {
                register_participant(&db, id, &req(&format!("C{i}"), &format!("c{i}@example.com"))).await
            }));
        }
        let mut registered = 0;
        let mut full = 0;
        for h in handles {
            match h.await?? {
                RegistrationOutcome::Registered { .. } => registered += 1,
                RegistrationOutcome::EventFull => full += 1,
                RegistrationOutcome::AlreadyRegistered => panic!("distinct emails cannot collide"),
            }
        }
        assert_eq!((registered, full), (4, 8));

        let ev = event::find(db.as_ref(), ev.id).await?.unwrap();
        assert_eq!(ev.num_participants, 4);
        assert_eq!(event::count_participants(db.as_ref(), ev.id).await?, 4);
        Ok(())
    }
}
