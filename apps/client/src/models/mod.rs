// Wire shapes of the backend contract. Fields the backend owns but this
// client never interprets are kept as `serde_json::Value`.

pub mod career;
pub mod job_description;
pub mod optimization;
pub mod payment;
pub mod resume;
pub mod user;
