//! Repository for the `videos` table.

use sqlx::PgPool;
use vidsqueeze_core::types::VideoId;

use crate::models::video::{CreateVideo, Video};

/// Column list for `videos` queries.
const COLUMNS: &str = "\
    id, title, description, public_id, original_size, compressed_size, \
    duration, created_at, updated_at";

/// Provides CRUD operations for uploaded videos.
pub struct VideoRepo;

impl VideoRepo {
    /// Insert a new video, returning the created row.
    ///
    /// The id is generated here (UUID v7, so ids sort roughly by creation);
    /// timestamps come from the database defaults.
    pub async fn create(pool: &PgPool, input: &CreateVideo) -> Result<Video, sqlx::Error> {
        let query = format!(
            "INSERT INTO videos \
                 (id, title, description, public_id, original_size, compressed_size, duration) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(VideoId::now_v7())
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.public_id)
            .bind(&input.original_size)
            .bind(&input.compressed_size)
            .bind(input.duration)
            .fetch_one(pool)
            .await
    }

    /// Find a video by its id.
    pub async fn find_by_id(pool: &PgPool, id: VideoId) -> Result<Option<Video>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE id = $1");
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every video, most recently created first.
    pub async fn list_recent(pool: &PgPool) -> Result<Vec<Video>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Video>(&query).fetch_all(pool).await
    }

    /// Delete a video row. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: VideoId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::debug!(video_id = %id, "Video row deleted");
        }
        Ok(deleted)
    }
}
