/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Profession name as typed by the user (e.g. `"Tailoring"`).
pub type ProfessionName = String;
