use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::auth::model::Role;
use crate::features::participants::models::ParticipantRow;
use crate::shared::dates::{age_on, today_utc};
use crate::shared::listing::{ListPage, SortDir, SortKey};
use crate::shared::validation::{PHONE_REGEX, ZIP_REGEX};

/// Projected participant as shown in responses. `age` is derived from the
/// birth date as of now (UTC).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDto {
    pub participant_id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub dob: Option<NaiveDate>,
    pub age: Option<i32>,
    pub role: Role,
    /// True for rows created without a password (e.g. from a donation)
    pub is_visitor: bool,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub school_or_employer: Option<String>,
    pub field_of_interest: Option<String>,
    pub account_created: DateTime<Utc>,
}

impl From<ParticipantRow> for ParticipantDto {
    fn from(row: ParticipantRow) -> Self {
        let today = today_utc();
        Self {
            participant_id: row.participant_id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            dob: row.dob,
            age: row.dob.map(|dob| age_on(dob, today)),
            role: Role::from_db(row.role_code.as_deref()),
            is_visitor: row.password_hash.is_none(),
            phone: row.phone,
            city: row.city,
            state: row.state,
            zip: row.zip,
            school_or_employer: row.school_or_employer,
            field_of_interest: row.field_of_interest,
            account_created: row.account_created,
        }
    }
}

/// Untrusted list parameters; every field is lenient (unparseable values are
/// treated as absent).
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantListQuery {
    /// Free-text search over id, names, email, school, "first last"
    pub search: Option<String>,
    pub sort: Option<String>,
    pub sort_dir: Option<String>,
    pub page: Option<String>,
    /// Exact role code (`a`, `p`, `d`)
    pub filter_role: Option<String>,
    pub filter_city: Option<String>,
    pub filter_state: Option<String>,
    pub filter_interest: Option<String>,
    pub filter_min_age: Option<String>,
    pub filter_max_age: Option<String>,
}

/// Normalized filters echoed back with the page.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantFiltersDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantListDto {
    #[serde(flatten)]
    pub page: ListPage<ParticipantDto>,
    pub filters: ParticipantFiltersDto,
}

/// Sortable columns for the participants list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParticipantSort {
    #[default]
    Id,
    FirstName,
    LastName,
    Email,
    SchoolOrEmployer,
    Role,
    Created,
}

impl SortKey for ParticipantSort {
    fn from_param(raw: &str) -> Option<Self> {
        match raw {
            "ParticipantID" => Some(Self::Id),
            "ParticipantFirstName" => Some(Self::FirstName),
            "ParticipantLastName" => Some(Self::LastName),
            "ParticipantEmail" => Some(Self::Email),
            "ParticipantSchoolOrEmployer" => Some(Self::SchoolOrEmployer),
            "ParticipantRole" => Some(Self::Role),
            "AccountCreatedDate" => Some(Self::Created),
            _ => None,
        }
    }

    fn order_sql(self) -> &'static str {
        match self {
            Self::Id => r#""ParticipantID""#,
            Self::FirstName => r#""ParticipantFirstName""#,
            Self::LastName => r#""ParticipantLastName""#,
            Self::Email => r#""ParticipantEmail""#,
            Self::SchoolOrEmployer => r#""ParticipantSchoolOrEmployer""#,
            Self::Role => r#""ParticipantRole""#,
            Self::Created => r#""AccountCreatedDate""#,
        }
    }

    fn as_param(self) -> &'static str {
        match self {
            Self::Id => "ParticipantID",
            Self::FirstName => "ParticipantFirstName",
            Self::LastName => "ParticipantLastName",
            Self::Email => "ParticipantEmail",
            Self::SchoolOrEmployer => "ParticipantSchoolOrEmployer",
            Self::Role => "ParticipantRole",
            Self::Created => "AccountCreatedDate",
        }
    }

    fn default_dir(self) -> SortDir {
        match self {
            Self::Created => SortDir::Desc,
            _ => SortDir::Asc,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddParticipantDto {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,

    pub dob: Option<NaiveDate>,

    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub phone: Option<String>,

    pub city: Option<String>,
    pub state: Option<String>,

    #[validate(regex(path = *ZIP_REGEX, message = "Invalid ZIP code"))]
    pub zip: Option<String>,

    pub school_or_employer: Option<String>,
    pub field_of_interest: Option<String>,

    /// Defaults to `participant` when absent
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleDto {
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sort_falls_back_to_id() {
        assert_eq!(ParticipantSort::parse(Some("ParticipantLastName")), ParticipantSort::LastName);
        assert_eq!(ParticipantSort::parse(Some("NotAColumn")), ParticipantSort::Id);
        assert_eq!(ParticipantSort::parse(None), ParticipantSort::Id);
    }

    #[test]
    fn created_sorts_descending_by_default() {
        assert_eq!(ParticipantSort::Created.default_dir(), SortDir::Desc);
        assert_eq!(ParticipantSort::LastName.default_dir(), SortDir::Asc);
    }
}
