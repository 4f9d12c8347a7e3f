use rust_decimal::Decimal;
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub struct DonationsTotalRow {
    pub donation_count: i64,
    pub total_amount: Decimal,
}

#[derive(Debug, FromRow)]
pub struct CategoryCountRow {
    pub category: String,
    pub count: i64,
}

#[derive(Debug, FromRow)]
pub struct EventNpsRow {
    pub event_name: String,
    pub promoters: i64,
    pub passives: i64,
    pub detractors: i64,
}
