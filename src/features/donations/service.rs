use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::core::error::{AppError, Result};
use crate::features::auth::model::{CurrentUser, Role};
use crate::features::donations::dtos::{
    CreateDonationDto, DonationAggregatesDto, DonationDto, DonationFiltersDto, DonationListDto,
    DonationListQuery, DonationSort,
};
use crate::features::donations::models::{
    DonationAggregateRow, DonationListRow, DONATION_LIST_COLUMNS,
};
use crate::shared::constants::LIST_PAGE_SIZE;
use crate::shared::listing::{
    self, fetch_aggregates, fetch_page, non_empty, push_search_group, ListPage, PageWindow,
    SortDir, SortKey,
};

const SEARCH_EXPRS: &[&str] = &[
    r#"CAST(d."DonationID" AS TEXT)"#,
    r#"p."ParticipantFirstName""#,
    r#"p."ParticipantLastName""#,
    r#"p."ParticipantEmail""#,
    r#"(p."ParticipantFirstName" || ' ' || p."ParticipantLastName")"#,
];

#[derive(Debug, Default, Clone)]
struct Filters {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    min_amount: Option<Decimal>,
    max_amount: Option<Decimal>,
}

fn normalize_filters(query: &DonationListQuery) -> Filters {
    Filters {
        start_date: listing::lenient_date(query.filter_start_date.as_deref()),
        end_date: listing::lenient_date(query.filter_end_date.as_deref()),
        min_amount: listing::lenient::<Decimal>(query.filter_min_amount.as_deref()),
        max_amount: listing::lenient::<Decimal>(query.filter_max_amount.as_deref()),
    }
}

/// Shared FROM/WHERE for the aggregate and page queries: the join, the
/// identity predicate (non-admins see only their own donations), the search
/// OR-group, and the independent range filters.
fn push_filtered(
    qb: &mut QueryBuilder<'_, Postgres>,
    user: &CurrentUser,
    search: Option<&str>,
    filters: &Filters,
) {
    qb.push(
        r#" FROM "Participant_Donation" d JOIN "Participants" p ON p."ParticipantID" = d."ParticipantID" WHERE "#,
    );
    if user.is_admin() {
        qb.push("TRUE");
    } else {
        qb.push(r#"d."ParticipantID" = "#);
        qb.push_bind(user.participant_id);
    }

    if let Some(term) = search {
        push_search_group(qb, SEARCH_EXPRS, term);
    }
    if let Some(start) = filters.start_date {
        qb.push(r#" AND d."DonationDate" >= "#);
        qb.push_bind(start);
    }
    if let Some(end) = filters.end_date {
        qb.push(r#" AND d."DonationDate" <= "#);
        qb.push_bind(end);
    }
    if let Some(min) = filters.min_amount {
        qb.push(r#" AND d."DonationAmount" >= "#);
        qb.push_bind(min);
    }
    if let Some(max) = filters.max_amount {
        qb.push(r#" AND d."DonationAmount" <= "#);
        qb.push_bind(max);
    }
}

pub struct DonationService {
    pool: PgPool,
}

impl DonationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        user: &CurrentUser,
        query: &DonationListQuery,
    ) -> Result<DonationListDto> {
        let sort = DonationSort::parse(query.sort.as_deref());
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

        let aggregates: DonationAggregateRow = fetch_aggregates(
            &self.pool,
            r#"SELECT COUNT(*) AS total_count, COALESCE(SUM(d."DonationAmount"), 0) AS total_amount, AVG(d."DonationAmount") AS average_amount"#,
            &push,
        )
        .await
        .map_err(|e| {
            tracing::error!("Failed to aggregate donations: {:?}", e);
            AppError::Database(e)
        })?;

        let window = PageWindow::resolve(
            listing::requested_page(query.page.as_deref()),
            aggregates.total_count,
            LIST_PAGE_SIZE,
        );

        let select = format!("SELECT {}", DONATION_LIST_COLUMNS);
        let rows: Vec<DonationListRow> = fetch_page(
            &self.pool,
            &select,
            &push,
            sort.order_sql(),
            dir,
            r#"d."DonationID""#,
            &window,
        )
        .await
        .map_err(|e| {
            tracing::error!("Failed to list donations: {:?}", e);
            AppError::Database(e)
        })?;

        let projected: Vec<DonationDto> = rows.into_iter().map(Into::into).collect();

        Ok(DonationListDto {
            page: ListPage::assemble(
                projected,
                aggregates.total_count,
                &window,
                sort,
                dir,
                search.as_deref(),
            ),
            filters: DonationFiltersDto {
                start_date: filters.start_date,
                end_date: filters.end_date,
                min_amount: filters.min_amount,
                max_amount: filters.max_amount,
            },
            aggregates: DonationAggregatesDto {
                total_amount: aggregates.total_amount,
                average_amount: aggregates.average_amount,
            },
        })
    }

    /// Record a donation. An unknown email creates a visitor participant
    /// record first (no password, donor role); a later registration with the
    /// same email upgrades that row into a full account.
    pub async fn create(&self, dto: CreateDonationDto) -> Result<DonationDto> {
        if dto.amount <= Decimal::ZERO {
            return Err(AppError::Validation(
                "Donation amount must be greater than zero".to_string(),
            ));
        }

        let participant_id = self.resolve_donor_id(&dto).await?;

        let sql = format!(
            r#"WITH inserted AS (
                INSERT INTO "Participant_Donation" ("ParticipantID", "DonationDate", "DonationAmount")
                VALUES ($1, $2, $3)
                RETURNING "DonationID", "ParticipantID", "DonationDate", "DonationAmount"
            )
            SELECT {} FROM inserted d JOIN "Participants" p ON p."ParticipantID" = d."ParticipantID""#,
            DONATION_LIST_COLUMNS
        );

        let row = sqlx::query_as::<_, DonationListRow>(&sql)
            .bind(participant_id)
            .bind(dto.date)
            .bind(dto.amount)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to record donation: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(row.into())
    }

    async fn find_donor_id(&self, email: &str) -> Result<Option<i32>> {
        sqlx::query_scalar::<_, i32>(
            r#"SELECT "ParticipantID" FROM "Participants" WHERE "ParticipantEmail" = $1"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up donor: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Find the participant for this email, creating a visitor record when
    /// none exists. A concurrent donation for the same new email can win the
    /// insert; on a unique violation the lookup is retried so the loser still
    /// resolves to the existing row.
    async fn resolve_donor_id(&self, dto: &CreateDonationDto) -> Result<i32> {
        if let Some(id) = self.find_donor_id(&dto.email).await? {
            return Ok(id);
        }

        let inserted = sqlx::query_scalar::<_, i32>(
            r#"INSERT INTO "Participants" (
                "ParticipantEmail", "ParticipantFirstName", "ParticipantLastName",
                "ParticipantRole"
            ) VALUES ($1, $2, $3, $4)
            RETURNING "ParticipantID""#,
        )
        .bind(&dto.email)
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(Role::Donor.code())
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(id) => Ok(id),
            Err(e) if e.as_database_error().is_some_and(|d| d.is_unique_violation()) => self
                .find_donor_id(&dto.email)
                .await?
                .ok_or_else(|| {
                    AppError::Conflict(
                        "A donor record for this email is being created, please retry".to_string(),
                    )
                }),
            Err(e) => {
                tracing::error!("Failed to create visitor record: {:?}", e);
                Err(AppError::Database(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> CurrentUser {
        CurrentUser {
            participant_id: 1,
            role: Role::Admin,
        }
    }

    fn participant(id: i32) -> CurrentUser {
        CurrentUser {
            participant_id: id,
            role: Role::Participant,
        }
    }

    fn filtered_sql(user: &CurrentUser, search: Option<&str>, filters: &Filters) -> String {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
        push_filtered(&mut qb, user, search, filters);
        qb.sql().to_string()
    }

    #[test]
    fn admin_sees_all_rows() {
        let sql = filtered_sql(&admin(), None, &Filters::default());
        assert!(sql.contains("WHERE TRUE"));
        assert!(!sql.contains(r#"d."ParticipantID" ="#));
    }

    #[test]
    fn non_admin_is_restricted_to_own_rows() {
        let sql = filtered_sql(&participant(9), None, &Filters::default());
        assert!(sql.contains(r#"WHERE d."ParticipantID" = $1"#));
    }

    #[test]
    fn amount_range_uses_inclusive_bounds() {
        let filters = Filters {
            min_amount: Some(Decimal::new(10000, 2)),
            max_amount: Some(Decimal::new(50000, 2)),
            ..Filters::default()
        };
        let sql = filtered_sql(&admin(), None, &filters);
        assert!(sql.contains(r#"d."DonationAmount" >="#));
        assert!(sql.contains(r#"d."DonationAmount" <="#));
    }

    #[test]
    fn unparseable_amount_filters_are_skipped() {
        let query = DonationListQuery {
            filter_min_amount: Some("lots".to_string()),
            filter_max_amount: Some("100.00".to_string()),
            ..DonationListQuery::default()
        };
        let filters = normalize_filters(&query);
        assert_eq!(filters.min_amount, None);
        assert_eq!(filters.max_amount, Some(Decimal::new(10000, 2)));
    }

    #[test]
    fn aggregate_and_page_share_the_same_predicate() {
        let filters = Filters {
            min_amount: Some(Decimal::new(10000, 2)),
            ..Filters::default()
        };
        let user = admin();
        let agg_sql = filtered_sql(&user, Some("smith"), &filters);
        let mut page_qb = QueryBuilder::<Postgres>::new(format!("SELECT {}", DONATION_LIST_COLUMNS));
        push_filtered(&mut page_qb, &user, Some("smith"), &filters);
        let page_sql = page_qb.sql().to_string();
        // Identical FROM/WHERE section after the select list
        let agg_from = agg_sql.split_once(" FROM ").unwrap().1;
        let page_from = page_sql.split_once(" FROM ").unwrap().1;
        assert_eq!(agg_from, page_from);
    }
}
