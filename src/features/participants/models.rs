use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// Select list mapping the original column names onto the row struct.
pub const PARTICIPANT_COLUMNS: &str = r#""ParticipantID" AS participant_id, "ParticipantEmail" AS email, "ParticipantFirstName" AS first_name, "ParticipantLastName" AS last_name, "ParticipantDOB" AS dob, "ParticipantRole" AS role_code, "ParticipantPassword" AS password_hash, "ParticipantPhone" AS phone, "ParticipantCity" AS city, "ParticipantState" AS state, "ParticipantZip" AS zip, "ParticipantSchoolOrEmployer" AS school_or_employer, "ParticipantFieldOfInterest" AS field_of_interest, "AccountCreatedDate" AS account_created"#;

#[derive(Debug, Clone, FromRow)]
pub struct ParticipantRow {
    pub participant_id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub dob: Option<NaiveDate>,
    pub role_code: Option<String>,
    /// NULL marks a visitor record (created via a donation, no account yet)
    pub password_hash: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub school_or_employer: Option<String>,
    pub field_of_interest: Option<String>,
    pub account_created: DateTime<Utc>,
}
