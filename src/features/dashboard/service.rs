use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::CurrentUser;
use crate::features::dashboard::dtos::{CategoryCountDto, DonationsTotalDto, EventNpsDto};
use crate::features::dashboard::models::{CategoryCountRow, DonationsTotalRow, EventNpsRow};

pub struct DashboardService {
    pool: PgPool,
}

impl DashboardService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn require_admin(user: &CurrentUser) -> Result<()> {
        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }
        Ok(())
    }

    pub async fn donations_total(&self, user: &CurrentUser) -> Result<DonationsTotalDto> {
        Self::require_admin(user)?;

        let row = sqlx::query_as::<_, DonationsTotalRow>(
            r#"SELECT COUNT(*) AS donation_count, COALESCE(SUM("DonationAmount"), 0) AS total_amount
            FROM "Participant_Donation""#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to total donations: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(row.into())
    }

    pub async fn milestones_by_category(&self, user: &CurrentUser) -> Result<Vec<CategoryCountDto>> {
        Self::require_admin(user)?;

        let rows = sqlx::query_as::<_, CategoryCountRow>(
            r#"SELECT COALESCE("MilestoneCategory", 'Uncategorized') AS category, COUNT(*) AS count
            FROM "Participant_Milestone"
            GROUP BY COALESCE("MilestoneCategory", 'Uncategorized')
            ORDER BY count DESC, category ASC"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to break down milestones: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn participants_by_interest(
        &self,
        user: &CurrentUser,
    ) -> Result<Vec<CategoryCountDto>> {
        Self::require_admin(user)?;

        let rows = sqlx::query_as::<_, CategoryCountRow>(
            r#"SELECT COALESCE("ParticipantFieldOfInterest", 'Unspecified') AS category, COUNT(*) AS count
            FROM "Participants"
            GROUP BY COALESCE("ParticipantFieldOfInterest", 'Unspecified')
            ORDER BY count DESC, category ASC"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to break down participants: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Per-event Promoter / Passive / Detractor counts for the NPS chart.
    pub async fn surveys_nps(&self, user: &CurrentUser) -> Result<Vec<EventNpsDto>> {
        Self::require_admin(user)?;

        let rows = sqlx::query_as::<_, EventNpsRow>(
            r#"SELECT t."EventName" AS event_name,
                COUNT(*) FILTER (WHERE s."SurveyNPSBucket" = 'Promoter') AS promoters,
                COUNT(*) FILTER (WHERE s."SurveyNPSBucket" = 'Passive') AS passives,
                COUNT(*) FILTER (WHERE s."SurveyNPSBucket" = 'Detractor') AS detractors
            FROM "Surveys" s
                JOIN "Registration" r ON r."RegistrationID" = s."RegistrationID"
                JOIN "Event_Occurrence" o ON o."OccurrenceID" = r."OccurrenceID"
                JOIN "Event_Templates" t ON t."EventID" = o."EventID"
            GROUP BY t."EventName"
            ORDER BY t."EventName" ASC"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to compute NPS breakdown: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
