use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::features::dashboard::models::{CategoryCountRow, DonationsTotalRow, EventNpsRow};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationsTotalDto {
    pub donation_count: i64,
    pub total_amount: Decimal,
    pub total_amount_display: String,
}

impl From<DonationsTotalRow> for DonationsTotalDto {
    fn from(row: DonationsTotalRow) -> Self {
        Self {
            donation_count: row.donation_count,
            total_amount_display: format!("{:.2}", row.total_amount.round_dp(2)),
            total_amount: row.total_amount,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCountDto {
    pub category: String,
    pub count: i64,
}

impl From<CategoryCountRow> for CategoryCountDto {
    fn from(row: CategoryCountRow) -> Self {
        Self {
            category: row.category,
            count: row.count,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventNpsDto {
    pub event_name: String,
    pub promoters: i64,
    pub passives: i64,
    pub detractors: i64,
}

impl From<EventNpsRow> for EventNpsDto {
    fn from(row: EventNpsRow) -> Self {
        Self {
            event_name: row.event_name,
            promoters: row.promoters,
            passives: row.passives,
            detractors: row.detractors,
        }
    }
}
