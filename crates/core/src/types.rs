/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Users come from the external identity provider and are keyed by its UUID.
pub type UserId = uuid::Uuid;
