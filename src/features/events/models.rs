use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct EventTemplateRow {
    pub event_id: i32,
    pub name: String,
    pub event_type: Option<String>,
    pub description: Option<String>,
    pub recurrence_pattern: Option<String>,
    pub default_capacity: Option<i32>,
}

#[derive(Debug, Clone, FromRow)]
pub struct OccurrenceListRow {
    pub occurrence_id: i32,
    pub event_id: i32,
    pub name: String,
    pub event_type: Option<String>,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub registration_deadline: Option<DateTime<Utc>>,
}

pub const TEMPLATE_COLUMNS: &str = r#""EventID" AS event_id, "EventName" AS name, "EventType" AS event_type, "EventDescription" AS description, "EventRecurrencePattern" AS recurrence_pattern, "EventDefaultCapacity" AS default_capacity"#;

pub const OCCURRENCE_LIST_COLUMNS: &str = r#"o."OccurrenceID" AS occurrence_id, t."EventID" AS event_id, t."EventName" AS name, t."EventType" AS event_type, t."EventDescription" AS description, o."EventDateTimeStart" AS start, o."EventDateTimeEnd" AS "end", o."EventLocation" AS location, COALESCE(o."EventCapacity", t."EventDefaultCapacity") AS capacity, o."EventRegistrationDeadline" AS registration_deadline"#;
