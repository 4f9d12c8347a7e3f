use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::donations::models::DonationListRow;
use crate::shared::dates::display_date;
use crate::shared::listing::{ListPage, SortDir, SortKey};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationDto {
    pub donation_id: i32,
    pub participant_id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub amount: Option<Decimal>,
    /// Amount formatted to two decimal places
    pub amount_display: Option<String>,
    pub date: Option<NaiveDate>,
    pub date_display: Option<String>,
}

impl From<DonationListRow> for DonationDto {
    fn from(row: DonationListRow) -> Self {
        Self {
            donation_id: row.donation_id,
            participant_id: row.participant_id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            amount: row.donation_amount,
            amount_display: row.donation_amount.map(|a| format!("{:.2}", a.round_dp(2))),
            date: row.donation_date,
            date_display: row.donation_date.map(display_date),
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DonationListQuery {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub sort_dir: Option<String>,
    pub page: Option<String>,
    pub filter_start_date: Option<String>,
    pub filter_end_date: Option<String>,
    pub filter_min_amount: Option<String>,
    pub filter_max_amount: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationFiltersDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<Decimal>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationAggregatesDto {
    pub total_amount: Decimal,
    pub average_amount: Option<Decimal>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationListDto {
    #[serde(flatten)]
    pub page: ListPage<DonationDto>,
    pub filters: DonationFiltersDto,
    pub aggregates: DonationAggregatesDto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DonationSort {
    #[default]
    Date,
    Amount,
    Id,
    LastName,
}

impl SortKey for DonationSort {
    fn from_param(raw: &str) -> Option<Self> {
        match raw {
            "DonationDate" => Some(Self::Date),
            "DonationAmount" => Some(Self::Amount),
            "DonationID" => Some(Self::Id),
            "ParticipantLastName" => Some(Self::LastName),
            _ => None,
        }
    }

    fn order_sql(self) -> &'static str {
        match self {
            Self::Date => r#"d."DonationDate""#,
            Self::Amount => r#"d."DonationAmount""#,
            Self::Id => r#"d."DonationID""#,
            Self::LastName => r#"p."ParticipantLastName""#,
        }
    }

    fn as_param(self) -> &'static str {
        match self {
            Self::Date => "DonationDate",
            Self::Amount => "DonationAmount",
            Self::Id => "DonationID",
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

/// Public donation submission. An unknown email creates a visitor
/// participant record (no password) before the donation row.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDonationDto {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,

    pub amount: Decimal,
    pub date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn donation_sort_defaults_to_date_descending() {
        let sort = DonationSort::parse(Some("definitely-not-a-column"));
        assert_eq!(sort, DonationSort::Date);
        assert_eq!(sort.default_dir(), SortDir::Desc);
        assert_eq!(DonationSort::parse(Some("DonationAmount")), DonationSort::Amount);
    }

    #[test]
    fn amount_display_has_two_decimals() {
        let row = DonationListRow {
            donation_id: 1,
            donation_date: NaiveDate::from_ymd_opt(2024, 3, 9),
            donation_amount: Some(Decimal::new(1005, 1)), // 100.5
            participant_id: 7,
            email: "d@example.org".to_string(),
            first_name: "Dana".to_string(),
            last_name: "Reyes".to_string(),
        };
        let dto = DonationDto::from(row);
        assert_eq!(dto.amount_display.as_deref(), Some("100.50"));
        assert_eq!(dto.date_display.as_deref(), Some("2024-03-09"));
    }
}
