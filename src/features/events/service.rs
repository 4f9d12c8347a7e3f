use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::CurrentUser;
use crate::features::events::dtos::{
    CreateOccurrenceDto, CreateTemplateDto, EventTemplateDto, OccurrenceDto, UpdateOccurrenceDto,
};
use crate::features::events::models::{
    EventTemplateRow, OccurrenceListRow, OCCURRENCE_LIST_COLUMNS, TEMPLATE_COLUMNS,
};

pub struct EventService {
    pool: PgPool,
}

impl EventService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Occurrences joined with their templates. Admins get the full calendar
    /// ordered by start; everyone else gets only events that have not ended,
    /// soonest-ending first.
    pub async fn list(&self, user: &CurrentUser) -> Result<Vec<OccurrenceDto>> {
        let sql = if user.is_admin() {
            format!(
                r#"SELECT {} FROM "Event_Occurrence" o JOIN "Event_Templates" t ON t."EventID" = o."EventID"
                ORDER BY o."EventDateTimeStart" ASC, o."OccurrenceID" DESC"#,
                OCCURRENCE_LIST_COLUMNS
            )
        } else {
            format!(
                r#"SELECT {} FROM "Event_Occurrence" o JOIN "Event_Templates" t ON t."EventID" = o."EventID"
                WHERE o."EventDateTimeEnd" IS NULL OR o."EventDateTimeEnd" >= NOW()
                ORDER BY o."EventDateTimeEnd" ASC NULLS LAST, o."OccurrenceID" DESC"#,
                OCCURRENCE_LIST_COLUMNS
            )
        };

        let rows = sqlx::query_as::<_, OccurrenceListRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list events: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn create_template(
        &self,
        user: &CurrentUser,
        dto: CreateTemplateDto,
    ) -> Result<EventTemplateDto> {
        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        let sql = format!(
            r#"INSERT INTO "Event_Templates" (
                "EventName", "EventType", "EventDescription",
                "EventRecurrencePattern", "EventDefaultCapacity"
            ) VALUES ($1, $2, $3, $4, $5)
            RETURNING {}"#,
            TEMPLATE_COLUMNS
        );

        let row = sqlx::query_as::<_, EventTemplateRow>(&sql)
            .bind(&dto.name)
            .bind(&dto.event_type)
            .bind(&dto.description)
            .bind(&dto.recurrence_pattern)
            .bind(dto.default_capacity)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::from_write_error(e, "An event template with this name already exists")
            })?;

        Ok(row.into())
    }

    pub async fn create_occurrence(
        &self,
        user: &CurrentUser,
        event_id: i32,
        dto: CreateOccurrenceDto,
    ) -> Result<OccurrenceDto> {
        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        let exists = sqlx::query_scalar::<_, i32>(
            r#"SELECT "EventID" FROM "Event_Templates" WHERE "EventID" = $1"#,
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check event template: {:?}", e);
            AppError::Database(e)
        })?;
        if exists.is_none() {
            return Err(AppError::NotFound("Event template not found".to_string()));
        }

        let sql = format!(
            r#"WITH inserted AS (
                INSERT INTO "Event_Occurrence" (
                    "EventID", "EventDateTimeStart", "EventDateTimeEnd",
                    "EventLocation", "EventCapacity", "EventRegistrationDeadline"
                ) VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
            )
            SELECT {} FROM inserted o JOIN "Event_Templates" t ON t."EventID" = o."EventID""#,
            OCCURRENCE_LIST_COLUMNS
        );

        let row = sqlx::query_as::<_, OccurrenceListRow>(&sql)
            .bind(event_id)
            .bind(dto.start)
            .bind(dto.end)
            .bind(&dto.location)
            .bind(dto.capacity)
            .bind(dto.registration_deadline)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::from_write_error(e, "An occurrence already exists at this start time")
            })?;

        Ok(row.into())
    }

    pub async fn update_occurrence(
        &self,
        user: &CurrentUser,
        occurrence_id: i32,
        dto: UpdateOccurrenceDto,
    ) -> Result<OccurrenceDto> {
        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        let sql = format!(
            r#"WITH updated AS (
                UPDATE "Event_Occurrence"
                SET "EventDateTimeStart" = $1, "EventDateTimeEnd" = $2,
                    "EventLocation" = $3, "EventCapacity" = $4,
                    "EventRegistrationDeadline" = $5
                WHERE "OccurrenceID" = $6
                RETURNING *
            )
            SELECT {} FROM updated o JOIN "Event_Templates" t ON t."EventID" = o."EventID""#,
            OCCURRENCE_LIST_COLUMNS
        );

        sqlx::query_as::<_, OccurrenceListRow>(&sql)
            .bind(dto.start)
            .bind(dto.end)
            .bind(&dto.location)
            .bind(dto.capacity)
            .bind(dto.registration_deadline)
            .bind(occurrence_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::from_write_error(e, "An occurrence already exists at this start time")
            })?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound("Occurrence not found".to_string()))
    }

    pub async fn delete_occurrence(&self, user: &CurrentUser, occurrence_id: i32) -> Result<()> {
        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        let result = sqlx::query(r#"DELETE FROM "Event_Occurrence" WHERE "OccurrenceID" = $1"#)
            .bind(occurrence_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::from_write_error(
                    e,
                    "Occurrence has registrations and cannot be deleted",
                )
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Occurrence not found".to_string()));
        }
        Ok(())
    }
}
