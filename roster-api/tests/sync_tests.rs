//! Roster synchronizer tests: transactional batch application, stale-row
//! tolerance, and derivation rules

mod helpers;

use helpers::{seed_bhajan, seed_pitch, seed_singer, setup_db};
use roster_api::registry;
use roster_api::sync::{self, RosterRowInput};
use sqlx::SqlitePool;

async fn session_with_singers(pool: &SqlitePool) -> String {
    seed_singer(pool, "asha", "Asha", Some("ladies")).await;
    seed_singer(pool, "mohan", "Mohan", Some("gents")).await;
    seed_singer(pool, "kiran", "Kiran", None).await;
    registry::ensure_session(pool, "2024-02-05").await.unwrap()
}

fn input(singer_id: &str) -> RosterRowInput {
    RosterRowInput {
        singer_id: singer_id.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_slots_follow_submitted_order() {
    let (_dir, pool) = setup_db().await;
    let sid = session_with_singers(&pool).await;

    sync::synchronize(&pool, &sid, &[input("mohan"), input("asha"), input("kiran")])
        .await
        .unwrap();

    let rows = sync::session_rows(&pool, &sid).await.unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows.iter().map(|r| r.slot).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    assert_eq!(
        rows.iter().map(|r| r.singer_id.as_str()).collect::<Vec<_>>(),
        vec!["mohan", "asha", "kiran"]
    );
}

#[tokio::test]
async fn test_resubmit_reorders_existing_rows() {
    let (_dir, pool) = setup_db().await;
    let sid = session_with_singers(&pool).await;

    sync::synchronize(&pool, &sid, &[input("mohan"), input("asha")])
        .await
        .unwrap();
    let rows = sync::session_rows(&pool, &sid).await.unwrap();
    let (first, second) = (rows[0].clone(), rows[1].clone());

    // Resubmit in reverse order with persisted ids: update path, no inserts
    let resubmit = vec![
        RosterRowInput {
            id: Some(second.id.clone()),
            singer_id: second.singer_id.clone(),
            ..Default::default()
        },
        RosterRowInput {
            id: Some(first.id.clone()),
            singer_id: first.singer_id.clone(),
            ..Default::default()
        },
    ];
    sync::synchronize(&pool, &sid, &resubmit).await.unwrap();

    let rows = sync::session_rows(&pool, &sid).await.unwrap();
    assert_eq!(rows.len(), 2, "updates must not duplicate rows");
    assert_eq!(rows[0].id, second.id);
    assert_eq!(rows[0].slot, 1);
    assert_eq!(rows[1].id, first.id);
    assert_eq!(rows[1].slot, 2);
}

#[tokio::test]
async fn test_placeholder_ids_insert_fresh_rows() {
    let (_dir, pool) = setup_db().await;
    let sid = session_with_singers(&pool).await;

    let rows = vec![
        RosterRowInput {
            id: Some("new_17".to_string()),
            singer_id: "asha".to_string(),
            ..Default::default()
        },
        RosterRowInput {
            id: Some("".to_string()),
            singer_id: "mohan".to_string(),
            ..Default::default()
        },
    ];
    sync::synchronize(&pool, &sid, &rows).await.unwrap();

    let stored = sync::session_rows(&pool, &sid).await.unwrap();
    assert_eq!(stored.len(), 2);
    for row in &stored {
        assert!(!row.id.starts_with("new_"), "placeholder id persisted: {}", row.id);
        assert!(!row.id.is_empty());
    }
}

#[tokio::test]
async fn test_stale_row_is_skipped_and_batch_commits() {
    let (_dir, pool) = setup_db().await;
    let sid = session_with_singers(&pool).await;

    sync::synchronize(&pool, &sid, &[input("asha"), input("mohan")])
        .await
        .unwrap();
    let rows = sync::session_rows(&pool, &sid).await.unwrap();
    let (gone, kept) = (rows[0].clone(), rows[1].clone());

    // Concurrent caller deleted the first row between read and save
    sync::delete_row(&pool, &gone.id).await.unwrap();

    let resubmit = vec![
        RosterRowInput {
            id: Some(gone.id.clone()),
            singer_id: gone.singer_id.clone(),
            ..Default::default()
        },
        RosterRowInput {
            id: Some(kept.id.clone()),
            singer_id: kept.singer_id.clone(),
            confirmed_pitch: Some("C".to_string()),
            ..Default::default()
        },
    ];
    sync::synchronize(&pool, &sid, &resubmit).await.unwrap();

    let rows = sync::session_rows(&pool, &sid).await.unwrap();
    assert_eq!(rows.len(), 1, "stale row must not resurrect");
    assert_eq!(rows[0].id, kept.id);
    assert_eq!(rows[0].confirmed_pitch.as_deref(), Some("C"));
    assert_eq!(rows[0].slot, 2, "remaining rows keep their submitted positions");
}

#[tokio::test]
async fn test_recommended_pitch_fills_only_empty_fields() {
    let (_dir, pool) = setup_db().await;
    let sid = session_with_singers(&pool).await;
    seed_bhajan(&pool, "b1", "Ram Bhajan One", Some("C"), Some("F")).await;

    let rows = vec![RosterRowInput {
        singer_id: "asha".to_string(),
        bhajan_id: Some("b1".to_string()),
        ..Default::default()
    }];
    sync::synchronize(&pool, &sid, &rows).await.unwrap();

    let stored = sync::session_rows(&pool, &sid).await.unwrap();
    assert_eq!(
        stored[0].recommended_pitch.as_deref(),
        Some("F"),
        "ladies singer takes the ladies reference pitch"
    );

    // Human overrides the recommendation; a later sync must not touch it
    let resubmit = vec![RosterRowInput {
        id: Some(stored[0].id.clone()),
        singer_id: "asha".to_string(),
        bhajan_id: Some("b1".to_string()),
        recommended_pitch: Some("D#".to_string()),
        ..Default::default()
    }];
    sync::synchronize(&pool, &sid, &resubmit).await.unwrap();
    let stored = sync::session_rows(&pool, &sid).await.unwrap();
    assert_eq!(stored[0].recommended_pitch.as_deref(), Some("D#"));

    // And a third sync with the saved value keeps it stable
    let resubmit = vec![RosterRowInput {
        id: Some(stored[0].id.clone()),
        singer_id: "asha".to_string(),
        bhajan_id: Some("b1".to_string()),
        recommended_pitch: stored[0].recommended_pitch.clone(),
        ..Default::default()
    }];
    sync::synchronize(&pool, &sid, &resubmit).await.unwrap();
    let stored = sync::session_rows(&pool, &sid).await.unwrap();
    assert_eq!(stored[0].recommended_pitch.as_deref(), Some("D#"));
}

#[tokio::test]
async fn test_tabla_pitch_follows_confirmed_pitch() {
    let (_dir, pool) = setup_db().await;
    let sid = session_with_singers(&pool).await;
    seed_pitch(&pool, "C", Some("D"), 1).await;

    let rows = vec![RosterRowInput {
        singer_id: "mohan".to_string(),
        confirmed_pitch: Some("C".to_string()),
        ..Default::default()
    }];
    sync::synchronize(&pool, &sid, &rows).await.unwrap();
    let stored = sync::session_rows(&pool, &sid).await.unwrap();
    assert_eq!(stored[0].tabla_pitch.as_deref(), Some("D"));

    // Clearing the confirmed pitch must clear the tabla pitch too
    let resubmit = vec![RosterRowInput {
        id: Some(stored[0].id.clone()),
        singer_id: "mohan".to_string(),
        confirmed_pitch: None,
        ..Default::default()
    }];
    sync::synchronize(&pool, &sid, &resubmit).await.unwrap();
    let stored = sync::session_rows(&pool, &sid).await.unwrap();
    assert!(stored[0].tabla_pitch.is_none(), "stale tabla pitch survived");
}

#[tokio::test]
async fn test_free_text_title_preserved_verbatim() {
    let (_dir, pool) = setup_db().await;
    let sid = session_with_singers(&pool).await;

    let title = "  Unlinked Title (hand-typed) ";
    let rows = vec![RosterRowInput {
        singer_id: "kiran".to_string(),
        bhajan_title: Some(title.to_string()),
        ..Default::default()
    }];
    sync::synchronize(&pool, &sid, &rows).await.unwrap();

    let stored = sync::session_rows(&pool, &sid).await.unwrap();
    assert_eq!(stored[0].bhajan_title.as_deref(), Some(title));
    assert!(stored[0].bhajan_id.is_none());
}

#[tokio::test]
async fn test_singer_fields_denormalized_on_sync() {
    let (_dir, pool) = setup_db().await;
    let sid = session_with_singers(&pool).await;

    sync::synchronize(&pool, &sid, &[input("asha")]).await.unwrap();
    let stored = sync::session_rows(&pool, &sid).await.unwrap();
    assert_eq!(stored[0].singer_name, "Asha");
    assert_eq!(stored[0].singer_gender.as_deref(), Some("ladies"));
}

#[tokio::test]
async fn test_synchronize_unknown_session_is_not_found() {
    let (_dir, pool) = setup_db().await;

    let err = sync::synchronize(&pool, "nope", &[input("asha")]).await.unwrap_err();
    assert!(matches!(err, roster_common::Error::NotFound(_)));
}

#[tokio::test]
async fn test_delete_row_nonexistent_is_noop() {
    let (_dir, pool) = setup_db().await;
    sync::delete_row(&pool, "no-such-row").await.unwrap();
}

#[tokio::test]
async fn test_instrument_rows() {
    let (_dir, pool) = setup_db().await;
    let sid = registry::ensure_session(&pool, "2024-02-05").await.unwrap();

    // Blank instrument name inserts nothing
    sync::add_instrument(&pool, &sid, "   ", "Ravi").await.unwrap();
    assert!(sync::session_instruments(&pool, &sid).await.unwrap().is_empty());

    sync::add_instrument(&pool, &sid, "Tabla", " Ravi ").await.unwrap();
    sync::add_instrument(&pool, &sid, "Harmonium", "").await.unwrap();

    let instruments = sync::session_instruments(&pool, &sid).await.unwrap();
    assert_eq!(instruments.len(), 2);
    assert_eq!(instruments[0].instrument, "Harmonium");
    assert!(instruments[0].person.is_none(), "blank person stored as NULL");
    assert_eq!(instruments[1].person.as_deref(), Some("Ravi"));

    sync::delete_instrument(&pool, &instruments[0].id).await.unwrap();
    assert_eq!(sync::session_instruments(&pool, &sid).await.unwrap().len(), 1);

    // Deleting a missing instrument row is a no-op
    sync::delete_instrument(&pool, "no-such-id").await.unwrap();
}
