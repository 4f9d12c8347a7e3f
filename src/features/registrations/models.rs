use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct RegistrationListRow {
    pub registration_id: i32,
    pub participant_id: i32,
    pub occurrence_id: i32,
    pub status: Option<String>,
    pub attended: Option<bool>,
    pub check_in_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub event_name: String,
    pub event_start: DateTime<Utc>,
    pub event_location: Option<String>,
}

pub const REGISTRATION_LIST_COLUMNS: &str = r#"r."RegistrationID" AS registration_id, r."ParticipantID" AS participant_id, r."OccurrenceID" AS occurrence_id, r."RegistrationStatus" AS status, r."RegistrationAttendedFlag" AS attended, r."RegistrationCheckInTime" AS check_in_time, r."RegistrationCreatedAt" AS created_at, p."ParticipantEmail" AS email, p."ParticipantFirstName" AS first_name, p."ParticipantLastName" AS last_name, t."EventName" AS event_name, o."EventDateTimeStart" AS event_start, o."EventLocation" AS event_location"#;

pub const REGISTRATION_JOINS: &str = r#" FROM "Registration" r
    JOIN "Participants" p ON p."ParticipantID" = r."ParticipantID"
    JOIN "Event_Occurrence" o ON o."OccurrenceID" = r."OccurrenceID"
    JOIN "Event_Templates" t ON t."EventID" = o."EventID""#;
