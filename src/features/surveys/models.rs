use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct SurveyListRow {
    pub survey_id: i32,
    pub registration_id: i32,
    pub satisfaction_score: Option<i32>,
    pub usefulness_score: Option<i32>,
    pub instructor_score: Option<i32>,
    pub recommendation_score: Option<i32>,
    pub overall_score: Option<Decimal>,
    pub nps_bucket: Option<String>,
    pub comments: Option<String>,
    pub submission_date: DateTime<Utc>,
    pub participant_id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub event_name: String,
    pub event_start: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct SurveyAggregateRow {
    pub total_count: i64,
    pub average_overall: Option<Decimal>,
}

pub const SURVEY_LIST_COLUMNS: &str = r#"s."SurveyID" AS survey_id, s."RegistrationID" AS registration_id, s."SurveySatisfactionScore" AS satisfaction_score, s."SurveyUsefulnessScore" AS usefulness_score, s."SurveyInstructorScore" AS instructor_score, s."SurveyRecommendationScore" AS recommendation_score, s."SurveyOverallScore" AS overall_score, s."SurveyNPSBucket" AS nps_bucket, s."SurveyComments" AS comments, s."SurveySubmissionDate" AS submission_date, p."ParticipantID" AS participant_id, p."ParticipantEmail" AS email, p."ParticipantFirstName" AS first_name, p."ParticipantLastName" AS last_name, t."EventName" AS event_name, o."EventDateTimeStart" AS event_start"#;

pub const SURVEY_JOINS: &str = r#" FROM "Surveys" s
    JOIN "Registration" r ON r."RegistrationID" = s."RegistrationID"
    JOIN "Participants" p ON p."ParticipantID" = r."ParticipantID"
    JOIN "Event_Occurrence" o ON o."OccurrenceID" = r."OccurrenceID"
    JOIN "Event_Templates" t ON t."EventID" = o."EventID" WHERE "#;
