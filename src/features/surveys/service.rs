use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::core::error::{AppError, Result};
use crate::features::auth::model::CurrentUser;
use crate::features::surveys::dtos::{
    CreateSurveyDto, SurveyAggregatesDto, SurveyDto, SurveyFiltersDto, SurveyListDto,
    SurveyListQuery, SurveySort,
};
use crate::features::surveys::models::{
    SurveyAggregateRow, SurveyListRow, SURVEY_JOINS, SURVEY_LIST_COLUMNS,
};
use crate::shared::constants::LIST_PAGE_SIZE;
use crate::shared::listing::{
    self, fetch_aggregates, fetch_page, non_empty, push_search_group, ListPage, PageWindow,
    SortDir, SortKey,
};

const SEARCH_EXPRS: &[&str] = &[
    r#"p."ParticipantFirstName""#,
    r#"p."ParticipantLastName""#,
    r#"p."ParticipantEmail""#,
    r#"(p."ParticipantFirstName" || ' ' || p."ParticipantLastName")"#,
    r#"t."EventName""#,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NpsBucket {
    Promoter,
    Passive,
    Detractor,
}

impl NpsBucket {
    pub fn label(self) -> &'static str {
        match self {
            Self::Promoter => "Promoter",
            Self::Passive => "Passive",
            Self::Detractor => "Detractor",
        }
    }

    fn from_label(raw: &str) -> Option<Self> {
        match raw {
            "Promoter" => Some(Self::Promoter),
            "Passive" => Some(Self::Passive),
            "Detractor" => Some(Self::Detractor),
            _ => None,
        }
    }
}

/// Overall score and NPS bucket are always derived together. The overall is
/// the mean of the four sub-scores; the bucket looks only at the
/// recommendation score.
pub fn score_survey(
    satisfaction: i32,
    usefulness: i32,
    instructor: i32,
    recommendation: i32,
) -> (Decimal, NpsBucket) {
    let sum = satisfaction + usefulness + instructor + recommendation;
    let overall = (Decimal::from(sum) / Decimal::from(4)).round_dp(2);
    let bucket = if recommendation >= 4 {
        NpsBucket::Promoter
    } else if recommendation == 3 {
        NpsBucket::Passive
    } else {
        NpsBucket::Detractor
    };
    (overall, bucket)
}

#[derive(Debug, Default, Clone)]
struct Filters {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    min_overall: Option<Decimal>,
    max_overall: Option<Decimal>,
    bucket: Option<NpsBucket>,
}

fn normalize_filters(query: &SurveyListQuery) -> Filters {
    Filters {
        start_date: listing::lenient_date(query.filter_start_date.as_deref()),
        end_date: listing::lenient_date(query.filter_end_date.as_deref()),
        min_overall: listing::lenient::<Decimal>(query.filter_min_overall.as_deref()),
        max_overall: listing::lenient::<Decimal>(query.filter_max_overall.as_deref()),
        bucket: non_empty(query.filter_bucket.as_deref()).and_then(NpsBucket::from_label),
    }
}

fn push_filtered(
    qb: &mut QueryBuilder<'_, Postgres>,
    user: &CurrentUser,
    search: Option<&str>,
    filters: &Filters,
) {
    qb.push(SURVEY_JOINS);
    if user.is_admin() {
        qb.push("TRUE");
    } else {
        qb.push(r#"r."ParticipantID" = "#);
        qb.push_bind(user.participant_id);
    }

    if let Some(term) = search {
        push_search_group(qb, SEARCH_EXPRS, term);
    }
    if let Some(start) = filters.start_date {
        qb.push(r#" AND s."SurveySubmissionDate"::date >= "#);
        qb.push_bind(start);
    }
    if let Some(end) = filters.end_date {
        qb.push(r#" AND s."SurveySubmissionDate"::date <= "#);
        qb.push_bind(end);
    }
    if let Some(min) = filters.min_overall {
        qb.push(r#" AND s."SurveyOverallScore" >= "#);
        qb.push_bind(min);
    }
    if let Some(max) = filters.max_overall {
        qb.push(r#" AND s."SurveyOverallScore" <= "#);
        qb.push_bind(max);
    }
    if let Some(bucket) = filters.bucket {
        qb.push(r#" AND s."SurveyNPSBucket" = "#);
        qb.push_bind(bucket.label());
    }
}

pub struct SurveyService {
    pool: PgPool,
}

impl SurveyService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, user: &CurrentUser, query: &SurveyListQuery) -> Result<SurveyListDto> {
        let sort = SurveySort::parse(query.sort.as_deref());
        let dir = SortDir::parse(query.sort_dir.as_deref(), sort.default_dir());
        let filters = normalize_filters(query);
        let search = non_empty(query.search.as_deref()).map(str::to_string);

        let push = {
            let user = *user;
            let filters = filters.clone();
            let search = search.clone();
            move |qb: &mut QueryBuilder<'_, Postgres>| {
                push_filtered(qb, &user, search.as_deref(), &filters);
            }
        };

        let aggregates: SurveyAggregateRow = fetch_aggregates(
            &self.pool,
            r#"SELECT COUNT(*) AS total_count, AVG(s."SurveyOverallScore") AS average_overall"#,
            &push,
        )
        .await
        .map_err(|e| {
            tracing::error!("Failed to aggregate surveys: {:?}", e);
            AppError::Database(e)
        })?;

        let window = PageWindow::resolve(
            listing::requested_page(query.page.as_deref()),
            aggregates.total_count,
            LIST_PAGE_SIZE,
        );

        let select = format!("SELECT {}", SURVEY_LIST_COLUMNS);
        let rows: Vec<SurveyListRow> = fetch_page(
            &self.pool,
            &select,
            &push,
            sort.order_sql(),
            dir,
            r#"s."SurveyID""#,
            &window,
        )
        .await
        .map_err(|e| {
            tracing::error!("Failed to list surveys: {:?}", e);
            AppError::Database(e)
        })?;

        let projected: Vec<SurveyDto> = rows.into_iter().map(Into::into).collect();

        Ok(SurveyListDto {
            page: ListPage::assemble(
                projected,
                aggregates.total_count,
                &window,
                sort,
                dir,
                search.as_deref(),
            ),
            filters: SurveyFiltersDto {
                start_date: filters.start_date,
                end_date: filters.end_date,
                min_overall: filters.min_overall,
                max_overall: filters.max_overall,
                bucket: filters.bucket.map(|b| b.label().to_string()),
            },
            aggregates: SurveyAggregatesDto {
                average_overall: aggregates.average_overall.map(|a| a.round_dp(2)),
            },
        })
    }

    /// Submit a survey for a registration. Only the registration's owner (or
    /// an admin) may submit, and a registration takes at most one survey.
    pub async fn create(&self, user: &CurrentUser, dto: CreateSurveyDto) -> Result<SurveyDto> {
        let owner = sqlx::query_scalar::<_, i32>(
            r#"SELECT "ParticipantID" FROM "Registration" WHERE "RegistrationID" = $1"#,
        )
        .bind(dto.registration_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up registration: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound("Registration not found".to_string()))?;

        if owner != user.participant_id && !user.is_admin() {
            return Err(AppError::Forbidden(
                "You may only submit a survey for your own registration".to_string(),
            ));
        }

        let (overall, bucket) = score_survey(
            dto.satisfaction_score,
            dto.usefulness_score,
            dto.instructor_score,
            dto.recommendation_score,
        );

        let sql = format!(
            r#"WITH inserted AS (
                INSERT INTO "Surveys" (
                    "RegistrationID", "SurveySatisfactionScore", "SurveyUsefulnessScore",
                    "SurveyInstructorScore", "SurveyRecommendationScore",
                    "SurveyOverallScore", "SurveyNPSBucket", "SurveyComments"
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING *
            )
            SELECT {} FROM inserted s
                JOIN "Registration" r ON r."RegistrationID" = s."RegistrationID"
                JOIN "Participants" p ON p."ParticipantID" = r."ParticipantID"
                JOIN "Event_Occurrence" o ON o."OccurrenceID" = r."OccurrenceID"
                JOIN "Event_Templates" t ON t."EventID" = o."EventID""#,
            SURVEY_LIST_COLUMNS
        );

        let row = sqlx::query_as::<_, SurveyListRow>(&sql)
            .bind(dto.registration_id)
            .bind(dto.satisfaction_score)
            .bind(dto.usefulness_score)
            .bind(dto.instructor_score)
            .bind(dto.recommendation_score)
            .bind(overall)
            .bind(bucket.label())
            .bind(&dto.comments)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::from_write_error(e, "A survey already exists for this registration")
            })?;

        Ok(row.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::Role;

    #[test]
    fn overall_is_the_mean_of_all_four_scores() {
        let (overall, _) = score_survey(5, 5, 5, 2);
        assert_eq!(overall, Decimal::new(425, 2));
    }

    #[test]
    fn bucket_ignores_everything_but_the_recommendation() {
        let (_, bucket) = score_survey(5, 5, 5, 2);
        assert_eq!(bucket, NpsBucket::Detractor);

        let (_, bucket) = score_survey(0, 0, 0, 4);
        assert_eq!(bucket, NpsBucket::Promoter);

        let (_, bucket) = score_survey(0, 0, 0, 3);
        assert_eq!(bucket, NpsBucket::Passive);
    }

    #[test]
    fn overall_keeps_two_decimals() {
        let (overall, _) = score_survey(1, 1, 1, 2);
        assert_eq!(overall, Decimal::new(125, 2));
    }

    #[test]
    fn bucket_filter_rejects_unknown_labels() {
        let query = SurveyListQuery {
            filter_bucket: Some("Superfan".to_string()),
            ..SurveyListQuery::default()
        };
        assert_eq!(normalize_filters(&query).bucket, None);
    }

    #[test]
    fn own_rows_predicate_for_participants() {
        let user = CurrentUser {
            participant_id: 7,
            role: Role::Participant,
        };
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
        push_filtered(&mut qb, &user, None, &Filters::default());
        assert!(qb.sql().contains(r#"r."ParticipantID" = $1"#));
    }
}
