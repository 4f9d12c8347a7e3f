use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::core::error::{AppError, Result};
use crate::features::auth::model::CurrentUser;
use crate::features::registrations::dtos::{CreateRegistrationDto, RegistrationDto};
use crate::features::registrations::models::{
    RegistrationListRow, REGISTRATION_JOINS, REGISTRATION_LIST_COLUMNS,
};

const STATUS_REGISTERED: &str = "registered";

#[derive(Debug, FromRow)]
struct OccurrenceCheckRow {
    occurrence_id: i32,
    registration_deadline: Option<DateTime<Utc>>,
}

pub struct RegistrationService {
    pool: PgPool,
}

impl RegistrationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Registrations newest first. Admins see everyone's, participants see
    /// their own.
    pub async fn list(&self, user: &CurrentUser) -> Result<Vec<RegistrationDto>> {
        let rows = if user.is_admin() {
            let sql = format!(
                r#"SELECT {} {} ORDER BY r."RegistrationCreatedAt" DESC, r."RegistrationID" DESC"#,
                REGISTRATION_LIST_COLUMNS, REGISTRATION_JOINS
            );
            sqlx::query_as::<_, RegistrationListRow>(&sql)
                .fetch_all(&self.pool)
                .await
        } else {
            let sql = format!(
                r#"SELECT {} {} WHERE r."ParticipantID" = $1 ORDER BY r."RegistrationCreatedAt" DESC, r."RegistrationID" DESC"#,
                REGISTRATION_LIST_COLUMNS, REGISTRATION_JOINS
            );
            sqlx::query_as::<_, RegistrationListRow>(&sql)
                .bind(user.participant_id)
                .fetch_all(&self.pool)
                .await
        }
        .map_err(|e| {
            tracing::error!("Failed to list registrations: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Self-register for an occurrence. Closed once the registration
    /// deadline has passed; one registration per participant per occurrence.
    pub async fn create(
        &self,
        user: &CurrentUser,
        dto: CreateRegistrationDto,
    ) -> Result<RegistrationDto> {
        let occurrence = sqlx::query_as::<_, OccurrenceCheckRow>(
            r#"SELECT "OccurrenceID" AS occurrence_id, "EventRegistrationDeadline" AS registration_deadline
            FROM "Event_Occurrence" WHERE "OccurrenceID" = $1"#,
        )
        .bind(dto.occurrence_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up occurrence: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound("Occurrence not found".to_string()))?;

        if let Some(deadline) = occurrence.registration_deadline {
            if Utc::now() > deadline {
                return Err(AppError::BadRequest(
                    "Registration for this event has closed".to_string(),
                ));
            }
        }

        let sql = format!(
            r#"WITH inserted AS (
                INSERT INTO "Registration" ("ParticipantID", "OccurrenceID", "RegistrationStatus")
                VALUES ($1, $2, $3)
                RETURNING *
            )
            SELECT {} FROM inserted r
                JOIN "Participants" p ON p."ParticipantID" = r."ParticipantID"
                JOIN "Event_Occurrence" o ON o."OccurrenceID" = r."OccurrenceID"
                JOIN "Event_Templates" t ON t."EventID" = o."EventID""#,
            REGISTRATION_LIST_COLUMNS
        );

        let row = sqlx::query_as::<_, RegistrationListRow>(&sql)
            .bind(user.participant_id)
            .bind(occurrence.occurrence_id)
            .bind(STATUS_REGISTERED)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::from_write_error(e, "You are already registered for this event")
            })?;

        Ok(row.into())
    }

    /// Mark a registration attended and stamp the check-in time (admin only).
    pub async fn check_in(
        &self,
        user: &CurrentUser,
        registration_id: i32,
    ) -> Result<RegistrationDto> {
        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        let sql = format!(
            r#"WITH updated AS (
                UPDATE "Registration"
                SET "RegistrationAttendedFlag" = TRUE, "RegistrationCheckInTime" = NOW()
                WHERE "RegistrationID" = $1
                RETURNING *
            )
            SELECT {} FROM updated r
                JOIN "Participants" p ON p."ParticipantID" = r."ParticipantID"
                JOIN "Event_Occurrence" o ON o."OccurrenceID" = r."OccurrenceID"
                JOIN "Event_Templates" t ON t."EventID" = o."EventID""#,
            REGISTRATION_LIST_COLUMNS
        );

        sqlx::query_as::<_, RegistrationListRow>(&sql)
            .bind(registration_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to check in registration: {:?}", e);
                AppError::Database(e)
            })?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound("Registration not found".to_string()))
    }

    /// Cancel a registration. Participants may cancel their own; admins any.
    pub async fn cancel(&self, user: &CurrentUser, registration_id: i32) -> Result<()> {
        let owner = sqlx::query_scalar::<_, i32>(
            r#"SELECT "ParticipantID" FROM "Registration" WHERE "RegistrationID" = $1"#,
        )
        .bind(registration_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up registration: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound("Registration not found".to_string()))?;

        if owner != user.participant_id && !user.is_admin() {
            return Err(AppError::Forbidden(
                "You may only cancel your own registration".to_string(),
            ));
        }

        sqlx::query(r#"DELETE FROM "Registration" WHERE "RegistrationID" = $1"#)
            .bind(registration_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to cancel registration: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(())
    }
}
