//! Integration tests for `VideoRepo` against a real database.

use sqlx::PgPool;
use vidsqueeze_db::models::video::CreateVideo;
use vidsqueeze_db::repositories::VideoRepo;

fn new_video(public_id: &str) -> CreateVideo {
    CreateVideo {
        title: format!("title {public_id}"),
        description: Some("a description".to_string()),
        public_id: public_id.to_string(),
        original_size: "259328".to_string(),
        compressed_size: "77414".to_string(),
        duration: 38.0,
    }
}

/// Migrations apply and the database answers a trivial query.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bootstrap(pool: PgPool) {
    vidsqueeze_db::health_check(&pool).await.unwrap();
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM videos")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_and_find(pool: PgPool) {
    let created = VideoRepo::create(&pool, &new_video("video-uploads/a"))
        .await
        .unwrap();
    assert_eq!(created.public_id, "video-uploads/a");
    assert_eq!(created.original_size, "259328");
    assert_eq!(created.duration, 38.0);
    assert_eq!(created.created_at, created.updated_at);

    let found = VideoRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .expect("row should exist");
    assert_eq!(found.id, created.id);
    assert_eq!(found.description.as_deref(), Some("a description"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_missing_returns_none(pool: PgPool) {
    let found = VideoRepo::find_by_id(&pool, uuid::Uuid::now_v7())
        .await
        .unwrap();
    assert!(found.is_none());
}

/// `public_id` is unique per remote asset.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_public_id_rejected(pool: PgPool) {
    VideoRepo::create(&pool, &new_video("video-uploads/dup"))
        .await
        .unwrap();
    let err = VideoRepo::create(&pool, &new_video("video-uploads/dup"))
        .await
        .unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_videos_public_id"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_recent_is_newest_first(pool: PgPool) {
    let old = VideoRepo::create(&pool, &new_video("video-uploads/old"))
        .await
        .unwrap();
    let mid = VideoRepo::create(&pool, &new_video("video-uploads/mid"))
        .await
        .unwrap();
    let new = VideoRepo::create(&pool, &new_video("video-uploads/new"))
        .await
        .unwrap();

    sqlx::query("UPDATE videos SET created_at = now() - interval '2 days' WHERE id = $1")
        .bind(old.id)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("UPDATE videos SET created_at = now() - interval '1 day' WHERE id = $1")
        .bind(mid.id)
        .execute(&pool)
        .await
        .unwrap();

    let listed = VideoRepo::list_recent(&pool).await.unwrap();
    let ids: Vec<_> = listed.iter().map(|v| v.id).collect();
    assert_eq!(ids, vec![new.id, mid.id, old.id]);

    for pair in listed.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }
}

/// The trigger bumps `updated_at` on every update.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_updated_at_trigger(pool: PgPool) {
    let created = VideoRepo::create(&pool, &new_video("video-uploads/t"))
        .await
        .unwrap();
    sqlx::query("UPDATE videos SET title = 'renamed' WHERE id = $1")
        .bind(created.id)
        .execute(&pool)
        .await
        .unwrap();
    let found = VideoRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.title, "renamed");
    assert!(found.updated_at >= created.updated_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete(pool: PgPool) {
    let created = VideoRepo::create(&pool, &new_video("video-uploads/gone"))
        .await
        .unwrap();

    assert!(VideoRepo::delete(&pool, created.id).await.unwrap());
    assert!(VideoRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .is_none());

    // Second delete finds nothing.
    assert!(!VideoRepo::delete(&pool, created.id).await.unwrap());
}
