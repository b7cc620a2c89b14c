/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Latency values are whole milliseconds.
pub type LatencyMs = u32;
