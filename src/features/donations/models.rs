use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::FromRow;

/// Donation joined with its owning participant, as listed.
#[derive(Debug, Clone, FromRow)]
pub struct DonationListRow {
    pub donation_id: i32,
    pub donation_date: Option<NaiveDate>,
    pub donation_amount: Option<Decimal>,
    pub participant_id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Count plus money aggregates computed over the same filtered, unpaged
/// predicate as the page itself.
#[derive(Debug, Clone, FromRow)]
pub struct DonationAggregateRow {
    pub total_count: i64,
    pub total_amount: Decimal,
    pub average_amount: Option<Decimal>,
}

pub const DONATION_LIST_COLUMNS: &str = r#"d."DonationID" AS donation_id, d."DonationDate" AS donation_date, d."DonationAmount" AS donation_amount, p."ParticipantID" AS participant_id, p."ParticipantEmail" AS email, p."ParticipantFirstName" AS first_name, p."ParticipantLastName" AS last_name"#;
