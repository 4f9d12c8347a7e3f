use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::surveys::models::SurveyListRow;
use crate::shared::dates::display_date;
use crate::shared::listing::{ListPage, SortDir, SortKey};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SurveyDto {
    pub survey_id: i32,
    pub registration_id: i32,
    pub participant_id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub event_name: String,
    pub event_start: DateTime<Utc>,
    pub satisfaction_score: Option<i32>,
    pub usefulness_score: Option<i32>,
    pub instructor_score: Option<i32>,
    pub recommendation_score: Option<i32>,
    pub overall_score: Option<String>,
    pub nps_bucket: Option<String>,
    pub comments: Option<String>,
    pub submission_date: DateTime<Utc>,
    pub submission_date_display: String,
}

impl From<SurveyListRow> for SurveyDto {
    fn from(row: SurveyListRow) -> Self {
        Self {
            survey_id: row.survey_id,
            registration_id: row.registration_id,
            participant_id: row.participant_id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            event_name: row.event_name,
            event_start: row.event_start,
            satisfaction_score: row.satisfaction_score,
            usefulness_score: row.usefulness_score,
            instructor_score: row.instructor_score,
            recommendation_score: row.recommendation_score,
            overall_score: row.overall_score.map(|s| format!("{:.2}", s.round_dp(2))),
            nps_bucket: row.nps_bucket,
            comments: row.comments,
            submission_date: row.submission_date,
            submission_date_display: display_date(row.submission_date.date_naive()),
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct SurveyListQuery {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub sort_dir: Option<String>,
    pub page: Option<String>,
    pub filter_start_date: Option<String>,
    pub filter_end_date: Option<String>,
    pub filter_min_overall: Option<String>,
    pub filter_max_overall: Option<String>,
    /// Exact bucket match: Promoter, Passive, or Detractor
    pub filter_bucket: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SurveyFiltersDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_overall: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_overall: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SurveyAggregatesDto {
    pub average_overall: Option<Decimal>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SurveyListDto {
    #[serde(flatten)]
    pub page: ListPage<SurveyDto>,
    pub filters: SurveyFiltersDto,
    pub aggregates: SurveyAggregatesDto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurveySort {
    #[default]
    Submitted,
    Overall,
    Event,
    Id,
    LastName,
}

impl SortKey for SurveySort {
    fn from_param(raw: &str) -> Option<Self> {
        match raw {
            "SurveySubmissionDate" => Some(Self::Submitted),
            "SurveyOverallScore" => Some(Self::Overall),
            "EventName" => Some(Self::Event),
            "SurveyID" => Some(Self::Id),
            "ParticipantLastName" => Some(Self::LastName),
            _ => None,
        }
    }

    fn order_sql(self) -> &'static str {
        match self {
            Self::Submitted => r#"s."SurveySubmissionDate""#,
            Self::Overall => r#"s."SurveyOverallScore""#,
            Self::Event => r#"t."EventName""#,
            Self::Id => r#"s."SurveyID""#,
            Self::LastName => r#"p."ParticipantLastName""#,
        }
    }

    fn as_param(self) -> &'static str {
        match self {
            Self::Submitted => "SurveySubmissionDate",
            Self::Overall => "SurveyOverallScore",
            Self::Event => "EventName",
            Self::Id => "SurveyID",
            Self::LastName => "ParticipantLastName",
        }
    }

    fn default_dir(self) -> SortDir {
        match self {
            Self::Submitted => SortDir::Desc,
            _ => SortDir::Asc,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSurveyDto {
    pub registration_id: i32,

    #[validate(range(min = 0, max = 5, message = "Scores must be between 0 and 5"))]
    pub satisfaction_score: i32,

    #[validate(range(min = 0, max = 5, message = "Scores must be between 0 and 5"))]
    pub usefulness_score: i32,

    #[validate(range(min = 0, max = 5, message = "Scores must be between 0 and 5"))]
    pub instructor_score: i32,

    #[validate(range(min = 0, max = 5, message = "Scores must be between 0 and 5"))]
    pub recommendation_score: i32,

    #[validate(length(max = 5000, message = "Comments are too long"))]
    pub comments: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survey_sort_defaults_to_submission_descending() {
        let sort = SurveySort::parse(None);
        assert_eq!(sort, SurveySort::Submitted);
        assert_eq!(sort.default_dir(), SortDir::Desc);
    }

    #[test]
    fn unknown_sort_param_falls_back_to_default() {
        assert_eq!(SurveySort::parse(Some("SurveyComments")), SurveySort::Submitted);
    }
}
