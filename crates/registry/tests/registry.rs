use migration::MigratorTrait;
use sea_orm::Database;

use registry::{EventKind, Registry, RegistryError, Role};

async fn registry_with_db() -> Registry {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Registry::builder().database(db).build().await.unwrap()
}

#[tokio::test]
async fn upsert_creates_a_member_by_default() {
    let registry = registry_with_db().await;

    let user = registry
        .upsert_user(42, Some("alice"), Some("Alice"), None, None)
        .await
        .unwrap();

    assert_eq!(user.telegram_id, 42);
    assert_eq!(user.username.as_deref(), Some("alice"));
    assert_eq!(user.first_name.as_deref(), Some("Alice"));
    assert_eq!(user.role, Role::Member);
    assert!(user.is_active);
    assert!(user.left_at.is_none());
}

#[tokio::test]
async fn upsert_twice_keeps_one_row_and_existing_fields() {
    let registry = registry_with_db().await;

    registry
        .upsert_user(42, Some("alice"), Some("Alice"), Some("Smith"), None)
        .await
        .unwrap();
    // A second sighting without display data must not erase what we know.
    let user = registry.upsert_user(42, None, Some(""), None, None).await.unwrap();

    assert_eq!(user.username.as_deref(), Some("alice"));
    assert_eq!(user.first_name.as_deref(), Some("Alice"));
    assert_eq!(user.last_name.as_deref(), Some("Smith"));

    let all = registry.list_users().await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn upsert_without_role_preserves_role() {
    let registry = registry_with_db().await;

    registry
        .upsert_user(42, Some("alice"), None, None, Some(Role::Admin))
        .await
        .unwrap();
    let user = registry
        .upsert_user(42, Some("alice"), None, None, None)
        .await
        .unwrap();

    assert_eq!(user.role, Role::Admin);
}

#[tokio::test]
async fn upsert_reactivates_a_user_who_left() {
    let registry = registry_with_db().await;

    registry
        .upsert_user(42, Some("alice"), None, None, None)
        .await
        .unwrap();
    let left = registry.mark_inactive(42).await.unwrap().unwrap();
    assert!(!left.is_active);
    assert!(left.left_at.is_some());

    let back = registry
        .upsert_user(42, Some("alice"), None, None, None)
        .await
        .unwrap();
    assert!(back.is_active);
    assert!(back.left_at.is_none());
    assert_eq!(back.created_at, left.created_at);
}

#[tokio::test]
async fn set_role_on_unknown_id_creates_no_row() {
    let registry = registry_with_db().await;

    let updated = registry.set_role(7, Role::Admin).await.unwrap();
    assert!(updated.is_none());
    assert!(registry.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn set_role_updates_a_known_user() {
    let registry = registry_with_db().await;

    registry
        .upsert_user(7, Some("bob"), None, None, None)
        .await
        .unwrap();
    let updated = registry.set_role(7, Role::Admin).await.unwrap().unwrap();

    assert_eq!(updated.role, Role::Admin);
    assert!(registry.has_role(7, &[Role::Admin]).await.unwrap());
}

#[tokio::test]
async fn remove_is_a_hard_delete_and_idempotent() {
    let registry = registry_with_db().await;

    registry
        .upsert_user(7, Some("bob"), None, None, None)
        .await
        .unwrap();

    assert!(registry.remove_user(7).await.unwrap());
    assert!(registry.user(7).await.unwrap().is_none());
    assert!(!registry.remove_user(7).await.unwrap());
}

#[tokio::test]
async fn mark_inactive_on_unknown_id_creates_no_row() {
    let registry = registry_with_db().await;

    assert!(registry.mark_inactive(7).await.unwrap().is_none());
    assert!(registry.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn has_role_is_false_for_unknown_users() {
    let registry = registry_with_db().await;

    assert!(!registry.has_role(7, &[Role::Member, Role::Admin]).await.unwrap());
}

#[tokio::test]
async fn has_admin_tracks_registered_admins() {
    let registry = registry_with_db().await;

    assert!(!registry.has_admin().await.unwrap());
    registry
        .upsert_user(1, Some("alice"), None, None, Some(Role::Admin))
        .await
        .unwrap();
    assert!(registry.has_admin().await.unwrap());
}

#[tokio::test]
async fn list_users_is_ordered_by_registration() {
    let registry = registry_with_db().await;

    registry.upsert_user(1, Some("alice"), None, None, None).await.unwrap();
    registry.upsert_user(2, Some("bob"), None, None, None).await.unwrap();
    // Updating the first user must not reorder the listing.
    registry
        .upsert_user(1, Some("alice2"), None, None, None)
        .await
        .unwrap();

    let ids: Vec<u64> = registry
        .list_users()
        .await
        .unwrap()
        .iter()
        .map(|user| user.telegram_id)
        .collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn membership_events_accumulate_without_dedup() {
    let registry = registry_with_db().await;

    registry
        .record_membership_event(42, -100, "join", Some("testers"), Some("alice"))
        .await
        .unwrap();
    registry
        .record_membership_event(42, -100, "leave", Some("testers"), Some("alice"))
        .await
        .unwrap();
    registry
        .record_membership_event(42, -100, "join", Some("testers"), Some("alice"))
        .await
        .unwrap();

    let events = registry.membership_events(42).await.unwrap();
    let kinds: Vec<EventKind> = events.iter().map(|event| event.event).collect();
    assert_eq!(kinds, vec![EventKind::Join, EventKind::Leave, EventKind::Join]);
    assert!(events.iter().all(|event| event.chat_id == -100));
}

#[tokio::test]
async fn record_membership_event_rejects_unknown_kinds() {
    let registry = registry_with_db().await;

    let err = registry
        .record_membership_event(42, -100, "kick", None, None)
        .await
        .unwrap_err();

    assert_eq!(err, RegistryError::InvalidEventKind("kick".to_string()));
    assert!(registry.membership_events(42).await.unwrap().is_empty());
}

#[tokio::test]
async fn record_membership_event_does_not_touch_users() {
    let registry = registry_with_db().await;

    registry
        .record_membership_event(42, -100, "join", None, Some("alice"))
        .await
        .unwrap();

    assert!(registry.user(42).await.unwrap().is_none());
}
