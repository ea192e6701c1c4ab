use super::{in_days, new_event, seed_user, setup_test_db};
use crate::{event, event_participant, participant, user, user_credentials};
use crate::errors::ModelError;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use chrono::Utc;
use anyhow::Result;

/// Test user create and lookup, including the unique username
#[tokio::test]
async fn test_user_crud() -> Result<()> {
    let db = setup_test_db().await?;

    let u = user::create(&db, "alice").await?;
    let found = user::find_by_username(&db, "alice").await?.expect("user exists");
    assert_eq!(found.id, u.id);
    assert!(user::find_by_username(&db, "bob").await?.is_none());

    // duplicate username is rejected by the unique key
    assert!(matches!(user::create(&db, "alice").await, Err(ModelError::Db(_))));
    Ok(())
}

#[test]
fn test_username_rules() {
    assert!(user::validate_username("jane.doe+events@x").is_ok());
    assert!(user::validate_username("   ").is_err());
    assert!(user::validate_username("has space").is_err());
    assert!(user::validate_username(&"a".repeat(151)).is_err());
}

/// Credentials are replaced, not duplicated
#[tokio::test]
async fn test_credentials_upsert() -> Result<()> {
    let db = setup_test_db().await?;
    let u = seed_user(&db, "carol").await?;

    let first = user_credentials::upsert_password(&db, u.id, "hash-1".into(), "argon2").await?;
    let second = user_credentials::upsert_password(&db, u.id, "hash-2".into(), "argon2").await?;
    assert_eq!(first.id, second.id);
    assert_eq!(second.password_hash, "hash-2");

    let err = user_credentials::upsert_password(&db, u.id, " ".into(), "argon2").await;
    assert!(matches!(err, Err(ModelError::Validation(_))));
    Ok(())
}

/// Event create/read/update/delete
#[tokio::test]
async fn test_event_crud() -> Result<()> {
    let db = setup_test_db().await?;
    let owner = seed_user(&db, "owner").await?;

    let created = event::create(&db, new_event(&owner, "Rust meetup", in_days(3), 25)).await?;
    assert_eq!(created.num_participants, 0);
    assert_eq!(created.max_participants, 25);
    assert_eq!(created.user_id, owner.id);

    let found = event::find(&db, created.id).await?.expect("event exists");
    assert_eq!(found.title, "Rust meetup");
    assert_eq!(found.date.timestamp(), created.date.timestamp());

    let mut am: event::ActiveModel = found.into();
    am.location = Set("Room 2".into());
    let updated = am.update(&db).await?;
    assert_eq!(updated.location, "Room 2");

    assert!(event::delete(&db, created.id).await?);
    assert!(event::find(&db, created.id).await?.is_none());
    // second delete is a no-op
    assert!(!event::delete(&db, created.id).await?);
    Ok(())
}

#[tokio::test]
async fn test_event_rejects_negative_capacity() -> Result<()> {
    let db = setup_test_db().await?;
    let owner = seed_user(&db, "neg").await?;
    let res = event::create(&db, new_event(&owner, "Broken", in_days(1), -1)).await;
    assert!(matches!(res, Err(ModelError::Validation(_))));
    Ok(())
}

/// Listings split on `now` and are ordered by date
#[tokio::test]
async fn test_event_listings() -> Result<()> {
    let db = setup_test_db().await?;
    let owner = seed_user(&db, "lister").await?;
    let other = seed_user(&db, "other").await?;

    let later = event::create(&db, new_event(&owner, "later", in_days(10), 5)).await?;
    let soon = event::create(&db, new_event(&other, "soon", in_days(1), 5)).await?;
    let old = event::create(&db, new_event(&owner, "old", in_days(-2), 5)).await?;
    let older = event::create(&db, new_event(&owner, "older", in_days(-20), 5)).await?;

    let now = Utc::now();
    let upcoming: Vec<_> = event::list_from(&db, now).await?.into_iter().map(|e| e.id).collect();
    assert_eq!(upcoming, vec![soon.id, later.id]);

    let past: Vec<_> = event::list_before(&db, now).await?.into_iter().map(|e| e.id).collect();
    assert_eq!(past, vec![older.id, old.id]);

    let mine: Vec<_> = event::list_by_owner(&db, owner.id).await?.into_iter().map(|e| e.id).collect();
    assert_eq!(mine, vec![older.id, old.id, later.id]);
    Ok(())
}

/// Participant dedup on (name, email)
#[tokio::test]
async fn test_participant_find_or_create() -> Result<()> {
    let db = setup_test_db().await?;

    let (p1, created) = participant::find_or_create(&db, "Ann", "ann@example.com").await?;
    assert!(created);
    let (p2, created) = participant::find_or_create(&db, "Ann", "ann@example.com").await?;
    assert!(!created);
    assert_eq!(p1.id, p2.id);

    // same email, different name is a different participant
    let (p3, created) = participant::find_or_create(&db, "Annie", "ann@example.com").await?;
    assert!(created);
    assert_ne!(p1.id, p3.id);
    Ok(())
}

/// Seat reservation respects the cap and join rows are unique
#[tokio::test]
async fn test_reserve_seat_and_link() -> Result<()> {
    let db = setup_test_db().await?;
    let owner = seed_user(&db, "seats").await?;
    let ev = event::create(&db, new_event(&owner, "Tiny", in_days(2), 2)).await?;

    assert!(event::reserve_seat(&db, ev.id).await?);
    assert!(event::reserve_seat(&db, ev.id).await?);
    assert!(!event::reserve_seat(&db, ev.id).await?);
    let ev = event::find(&db, ev.id).await?.unwrap();
    assert_eq!(ev.num_participants, 2);
    assert!(ev.is_full());

    // unknown event never reserves
    assert!(!event::reserve_seat(&db, uuid::Uuid::new_v4()).await?);

    let (p, _) = participant::find_or_create(&db, "Bo", "bo@example.com").await?;
    assert!(event_participant::link(&db, ev.id, p.id).await?);
    assert!(!event_participant::link(&db, ev.id, p.id).await?);
    assert!(event_participant::is_registered(&db, ev.id, p.id).await?);
    assert_eq!(event::count_participants(&db, ev.id).await?, 1);

    let people = event::participants(&db, &ev).await?;
    assert_eq!(people.len(), 1);
    assert_eq!(people[0].email, "bo@example.com");
    Ok(())
}

/// Deleting an event drops its registrations but keeps participants
#[tokio::test]
async fn test_delete_event_keeps_participants() -> Result<()> {
    let db = setup_test_db().await?;
    let owner = seed_user(&db, "deleter").await?;
    let ev = event::create(&db, new_event(&owner, "Gone soon", in_days(2), 10)).await?;
    let (p, _) = participant::find_or_create(&db, "Cy", "cy@example.com").await?;
    event_participant::link(&db, ev.id, p.id).await?;

    assert!(event::delete(&db, ev.id).await?);
    assert_eq!(event::count_participants(&db, ev.id).await?, 0);
    assert!(participant::Entity::find_by_id(p.id).one(&db).await?.is_some());
    Ok(())
}

/// Over-long text is refused before it reaches a VARCHAR column
#[tokio::test]
async fn test_text_length_limits() -> Result<()> {
    let db = setup_test_db().await?;
    let owner = seed_user(&db, "wordy").await?;

    let mut long_title = new_event(&owner, &"T".repeat(event::TITLE_MAX_LEN + 1), in_days(2), 5);
    assert!(matches!(event::create(&db, long_title.clone()).await, Err(ModelError::Validation(_))));
    long_title.title = "T".repeat(event::TITLE_MAX_LEN);
    assert!(event::create(&db, long_title).await.is_ok());

    let mut long_place = new_event(&owner, "Fine", in_days(2), 5);
    long_place.location = "L".repeat(event::LOCATION_MAX_LEN + 1);
    assert!(matches!(event::create(&db, long_place).await, Err(ModelError::Validation(_))));

    let long_name = "a".repeat(participant::NAME_MAX_LEN + 1);
    let res = participant::find_or_create(&db, &long_name, "a@example.com").await;
    assert!(matches!(res, Err(ModelError::Validation(_))));
    let long_email = format!("{}@example.com", "e".repeat(participant::EMAIL_MAX_LEN));
    assert!(participant::validate_identity("Ann", &long_email).is_err());
    // multi-byte characters count once each
    assert!(participant::validate_identity(&"é".repeat(participant::NAME_MAX_LEN), "a@b").is_ok());
    Ok(())
}
