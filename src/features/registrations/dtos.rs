use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::registrations::models::RegistrationListRow;
use crate::shared::dates::display_date;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDto {
    pub registration_id: i32,
    pub participant_id: i32,
    pub occurrence_id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub event_name: String,
    pub event_start: DateTime<Utc>,
    pub event_start_display: String,
    pub event_location: Option<String>,
    pub status: Option<String>,
    pub attended: bool,
    pub check_in_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<RegistrationListRow> for RegistrationDto {
    fn from(row: RegistrationListRow) -> Self {
        Self {
            registration_id: row.registration_id,
            participant_id: row.participant_id,
            occurrence_id: row.occurrence_id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            event_name: row.event_name,
            event_start_display: display_date(row.event_start.date_naive()),
            event_start: row.event_start,
            event_location: row.event_location,
            status: row.status,
            attended: row.attended.unwrap_or(false),
            check_in_time: row.check_in_time,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRegistrationDto {
    pub occurrence_id: i32,
}
