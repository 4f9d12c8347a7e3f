use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::milestones::models::MilestoneListRow;
use crate::shared::dates::display_date;
use crate::shared::listing::{ListPage, SortDir, SortKey};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneDto {
    pub milestone_id: i32,
    pub participant_id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub date_display: Option<String>,
}

impl From<MilestoneListRow> for MilestoneDto {
    fn from(row: MilestoneListRow) -> Self {
        Self {
            milestone_id: row.milestone_id,
            participant_id: row.participant_id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            title: row.title,
            category: row.category,
            date: row.milestone_date,
            date_display: row.milestone_date.map(display_date),
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneListQuery {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub sort_dir: Option<String>,
    pub page: Option<String>,
    pub filter_start_date: Option<String>,
    pub filter_end_date: Option<String>,
    /// Exact category match, case-insensitive
    pub filter_category: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneFiltersDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneListDto {
    #[serde(flatten)]
    pub page: ListPage<MilestoneDto>,
    pub filters: MilestoneFiltersDto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MilestoneSort {
    #[default]
    Date,
    Title,
    Category,
    Id,
    LastName,
}

impl SortKey for MilestoneSort {
    fn from_param(raw: &str) -> Option<Self> {
        match raw {
            "MilestoneDate" => Some(Self::Date),
            "MilestoneTitle" => Some(Self::Title),
            "MilestoneCategory" => Some(Self::Category),
            "MilestoneID" => Some(Self::Id),
            "ParticipantLastName" => Some(Self::LastName),
            _ => None,
        }
    }

    fn order_sql(self) -> &'static str {
        match self {
            Self::Date => r#"m."MilestoneDate""#,
            Self::Title => r#"m."MilestoneTitle""#,
            Self::Category => r#"m."MilestoneCategory""#,
            Self::Id => r#"m."MilestoneID""#,
            Self::LastName => r#"p."ParticipantLastName""#,
        }
    }

    fn as_param(self) -> &'static str {
        match self {
            Self::Date => "MilestoneDate",
            Self::Title => "MilestoneTitle",
            Self::Category => "MilestoneCategory",
            Self::Id => "MilestoneID",
            Self::LastName => "ParticipantLastName",
        }
    }

    fn default_dir(self) -> SortDir {
        match self {
            Self::Date => SortDir::Desc,
            _ => SortDir::Asc,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMilestoneDto {
    pub participant_id: i32,

    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,

    #[validate(length(max = 100, message = "Category is too long"))]
    pub category: Option<String>,

    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMilestoneDto {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,

    #[validate(length(max = 100, message = "Category is too long"))]
    pub category: Option<String>,

    pub date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn milestone_sort_defaults_to_date_descending() {
        let sort = MilestoneSort::parse(None);
        assert_eq!(sort, MilestoneSort::Date);
        assert_eq!(sort.default_dir(), SortDir::Desc);
    }
}
