/// Video primary keys are UUIDs generated by the application at insert time.
pub type VideoId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
