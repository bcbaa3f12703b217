use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Soft-deleted rows older than this are permanently removed by the
/// daily purge task.
pub const PURGE_RETENTION_DAYS: i64 = 30;

