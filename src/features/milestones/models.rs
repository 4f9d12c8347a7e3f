use chrono::NaiveDate;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct MilestoneListRow {
    pub milestone_id: i32,
    pub title: String,
    pub category: Option<String>,
    pub milestone_date: Option<NaiveDate>,
    pub participant_id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

pub const MILESTONE_LIST_COLUMNS: &str = r#"m."MilestoneID" AS milestone_id, m."MilestoneTitle" AS title, m."MilestoneCategory" AS category, m."MilestoneDate" AS milestone_date, p."ParticipantID" AS participant_id, p."ParticipantEmail" AS email, p."ParticipantFirstName" AS first_name, p."ParticipantLastName" AS last_name"#;
