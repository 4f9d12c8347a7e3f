use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::events::models::{EventTemplateRow, OccurrenceListRow};
use crate::shared::dates::display_date;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventTemplateDto {
    pub event_id: i32,
    pub name: String,
    pub event_type: Option<String>,
    pub description: Option<String>,
    pub recurrence_pattern: Option<String>,
    pub default_capacity: Option<i32>,
}

impl From<EventTemplateRow> for EventTemplateDto {
    fn from(row: EventTemplateRow) -> Self {
        Self {
            event_id: row.event_id,
            name: row.name,
            event_type: row.event_type,
            description: row.description,
            recurrence_pattern: row.recurrence_pattern,
            default_capacity: row.default_capacity,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OccurrenceDto {
    pub occurrence_id: i32,
    pub event_id: i32,
    pub name: String,
    pub event_type: Option<String>,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub start_display: String,
    pub end: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub registration_deadline: Option<DateTime<Utc>>,
}

impl From<OccurrenceListRow> for OccurrenceDto {
    fn from(row: OccurrenceListRow) -> Self {
        Self {
            occurrence_id: row.occurrence_id,
            event_id: row.event_id,
            name: row.name,
            event_type: row.event_type,
            description: row.description,
            start_display: display_date(row.start.date_naive()),
            start: row.start,
            end: row.end,
            location: row.location,
            capacity: row.capacity,
            registration_deadline: row.registration_deadline,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateDto {
    #[validate(length(min = 1, max = 255, message = "Event name is required"))]
    pub name: String,

    #[validate(length(max = 100, message = "Event type is too long"))]
    pub event_type: Option<String>,

    pub description: Option<String>,

    #[validate(length(max = 100, message = "Recurrence pattern is too long"))]
    pub recurrence_pattern: Option<String>,

    #[validate(range(min = 1, message = "Capacity must be positive"))]
    pub default_capacity: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOccurrenceDto {
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,

    #[validate(length(max = 255, message = "Location is too long"))]
    pub location: Option<String>,

    #[validate(range(min = 1, message = "Capacity must be positive"))]
    pub capacity: Option<i32>,

    pub registration_deadline: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOccurrenceDto {
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,

    #[validate(length(max = 255, message = "Location is too long"))]
    pub location: Option<String>,

    #[validate(range(min = 1, message = "Capacity must be positive"))]
    pub capacity: Option<i32>,

    pub registration_deadline: Option<DateTime<Utc>>,
}
