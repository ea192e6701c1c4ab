use super::{in_days, new_event, seed_user, setup_test_db};
use crate::{event, event_participant, participant};
use sea_orm::TransactionTrait;
use anyhow::Result;

/// Seat + link committed together
#[tokio::test]
async fn test_transaction_commit() -> Result<()> {
    let db = setup_test_db().await?;
    let owner = seed_user(&db, "tx_commit").await?;
    let ev = event::create(&db, new_event(&owner, "Commit", in_days(1), 3)).await?;
    let (p, _) = participant::find_or_create(&db, "Dee", "dee@example.com").await?;

    let txn = db.begin().await?;
    assert!(event::reserve_seat(&txn, ev.id).await?);
    assert!(event_participant::link(&txn, ev.id, p.id).await?);
    txn.commit().await?;

    let ev = event::find(&db, ev.id).await?.unwrap();
    assert_eq!(ev.num_participants, 1);
    assert_eq!(event::count_participants(&db, ev.id).await?, 1);
    Ok(())
}

/// Rolling back undoes the counter increment as well as the join row
#[tokio::test]
async fn test_transaction_rollback() -> Result<()> {
    let db = setup_test_db().await?;
    let owner = seed_user(&db, "tx_rollback").await?;
    let ev = event::create(&db, new_event(&owner, "Rollback", in_days(1), 3)).await?;
    let (p, _) = participant::find_or_create(&db, "Eve", "eve@example.com").await?;

    let txn = db.begin().await?;
    assert!(event::reserve_seat(&txn, ev.id).await?);
    assert!(event_participant::link(&txn, ev.id, p.id).await?);
    txn.rollback().await?;

    let ev = event::find(&db, ev.id).await?.unwrap();
    assert_eq!(ev.num_participants, 0);
    assert_eq!(event::count_participants(&db, ev.id).await?, 0);
    Ok(())
}
