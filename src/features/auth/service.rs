use std::sync::Arc;

use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::RegisterRequestDto;
use crate::features::auth::model::Role;
use crate::features::auth::password::{hash_password, verify_password};
use crate::features::auth::token::TokenService;
use crate::features::participants::models::{ParticipantRow, PARTICIPANT_COLUMNS};

/// Account registration and login against the `Participants` table.
pub struct AuthService {
    pool: PgPool,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(pool: PgPool, tokens: Arc<TokenService>) -> Self {
        Self { pool, tokens }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<ParticipantRow>> {
        let sql = format!(
            r#"SELECT {} FROM "Participants" WHERE "ParticipantEmail" = $1"#,
            PARTICIPANT_COLUMNS
        );
        sqlx::query_as::<_, ParticipantRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to look up participant by email: {:?}", e);
                AppError::Database(e)
            })
    }

    pub async fn find_by_id(&self, participant_id: i32) -> Result<ParticipantRow> {
        let sql = format!(
            r#"SELECT {} FROM "Participants" WHERE "ParticipantID" = $1"#,
            PARTICIPANT_COLUMNS
        );
        sqlx::query_as::<_, ParticipantRow>(&sql)
            .bind(participant_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to look up participant {}: {:?}", participant_id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound("Participant not found".to_string()))
    }

    /// Create a new account, or upgrade a visitor row (email exists but
    /// password is NULL) in place, keeping whatever role it already had.
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<ParticipantRow> {
        let existing = self.find_by_email(&dto.email).await?;

        if let Some(ref row) = existing {
            if row.password_hash.is_some() {
                return Err(AppError::Conflict(
                    "An account with that email already exists. Please log in.".to_string(),
                ));
            }
        }

        let password_hash = hash_password(&dto.password)?;

        match existing {
            Some(row) => {
                let role = row.role_code.clone().unwrap_or_else(|| Role::Participant.code().to_string());
                let sql = format!(
                    r#"UPDATE "Participants" SET
                        "ParticipantPassword" = $1,
                        "ParticipantFirstName" = $2,
                        "ParticipantLastName" = $3,
                        "ParticipantDOB" = $4,
                        "ParticipantPhone" = $5,
                        "ParticipantCity" = $6,
                        "ParticipantState" = $7,
                        "ParticipantZip" = $8,
                        "ParticipantSchoolOrEmployer" = $9,
                        "ParticipantFieldOfInterest" = $10,
                        "ParticipantRole" = $11
                    WHERE "ParticipantID" = $12
                    RETURNING {}"#,
                    PARTICIPANT_COLUMNS
                );
                sqlx::query_as::<_, ParticipantRow>(&sql)
                    .bind(&password_hash)
                    .bind(&dto.first_name)
                    .bind(&dto.last_name)
                    .bind(dto.dob)
                    .bind(&dto.phone)
                    .bind(&dto.city)
                    .bind(&dto.state)
                    .bind(&dto.zip)
                    .bind(&dto.school_or_employer)
                    .bind(&dto.field_of_interest)
                    .bind(&role)
                    .bind(row.participant_id)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| {
                        tracing::error!("Failed to upgrade visitor record: {:?}", e);
                        AppError::Database(e)
                    })
            }
            None => {
                let sql = format!(
                    r#"INSERT INTO "Participants" (
                        "ParticipantEmail", "ParticipantPassword",
                        "ParticipantFirstName", "ParticipantLastName",
                        "ParticipantDOB", "ParticipantPhone", "ParticipantCity",
                        "ParticipantState", "ParticipantZip",
                        "ParticipantSchoolOrEmployer", "ParticipantFieldOfInterest",
                        "ParticipantRole"
                    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                    RETURNING {}"#,
                    PARTICIPANT_COLUMNS
                );
                sqlx::query_as::<_, ParticipantRow>(&sql)
                    .bind(&dto.email)
                    .bind(&password_hash)
                    .bind(&dto.first_name)
                    .bind(&dto.last_name)
                    .bind(dto.dob)
                    .bind(&dto.phone)
                    .bind(&dto.city)
                    .bind(&dto.state)
                    .bind(&dto.zip)
                    .bind(&dto.school_or_employer)
                    .bind(&dto.field_of_interest)
                    .bind(Role::Participant.code())
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| {
                        AppError::from_write_error(
                            e,
                            "An account with that email already exists",
                        )
                    })
            }
        }
    }

    /// Verify credentials and issue a bearer token.
    pub async fn login(&self, email: &str, password: &str) -> Result<(String, ParticipantRow)> {
        let row = self.find_by_email(email).await?;

        let row = match row {
            Some(row) => row,
            None => return Err(AppError::Unauthorized("Invalid email or password".to_string())),
        };

        let valid = row
            .password_hash
            .as_deref()
            .map(|hash| verify_password(password, hash))
            .unwrap_or(false);
        if !valid {
            return Err(AppError::Unauthorized("Invalid email or password".to_string()));
        }

        let token = self
            .tokens
            .issue(row.participant_id, Role::from_db(row.role_code.as_deref()))?;
        Ok((token, row))
    }
}
