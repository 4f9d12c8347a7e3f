use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::core::error::{AppError, Result};
use crate::features::auth::model::{CurrentUser, Role};
use crate::features::auth::password::hash_password;
use crate::features::participants::dtos::{
    AddParticipantDto, ParticipantDto, ParticipantFiltersDto, ParticipantListDto,
    ParticipantListQuery, ParticipantSort,
};
use crate::features::participants::models::{ParticipantRow, PARTICIPANT_COLUMNS};
use crate::shared::constants::LIST_PAGE_SIZE;
use crate::shared::dates::{birthdate_cutoff, today_utc};
use crate::shared::listing::{
    self, fetch_count, fetch_page, non_empty, push_search_group, ListPage, PageWindow, SortDir,
    SortKey,
};

/// Allow-listed search expressions for the participants list.
const SEARCH_EXPRS: &[&str] = &[
    r#"CAST("ParticipantID" AS TEXT)"#,
    r#""ParticipantFirstName""#,
    r#""ParticipantLastName""#,
    r#""ParticipantEmail""#,
    r#""ParticipantSchoolOrEmployer""#,
    r#"("ParticipantFirstName" || ' ' || "ParticipantLastName")"#,
];

#[derive(Debug, Default, Clone)]
struct Filters {
    role: Option<Role>,
    city: Option<String>,
    state: Option<String>,
    interest: Option<String>,
    min_age: Option<i32>,
    max_age: Option<i32>,
}

fn normalize_filters(query: &ParticipantListQuery) -> Filters {
    Filters {
        role: non_empty(query.filter_role.as_deref())
            .map(str::to_ascii_lowercase)
            .and_then(|code| Role::from_code(&code)),
        city: non_empty(query.filter_city.as_deref()).map(str::to_string),
        state: non_empty(query.filter_state.as_deref()).map(str::to_string),
        interest: non_empty(query.filter_interest.as_deref()).map(str::to_string),
        min_age: listing::lenient::<i32>(query.filter_min_age.as_deref()).filter(|n| *n >= 0),
        max_age: listing::lenient::<i32>(query.filter_max_age.as_deref()).filter(|n| *n >= 0),
    }
}

/// Shared FROM/WHERE section for the count and page queries. The age bounds
/// arrive pre-converted to birth-date cutoffs; rows with a NULL birth date
/// fail the comparison and drop out whenever an age bound is set.
fn push_filtered(
    qb: &mut QueryBuilder<'_, Postgres>,
    search: Option<&str>,
    filters: &Filters,
    min_age_cutoff: Option<NaiveDate>,
    max_age_cutoff: Option<NaiveDate>,
) {
    qb.push(r#" FROM "Participants" WHERE TRUE"#);

    if let Some(term) = search {
        push_search_group(qb, SEARCH_EXPRS, term);
    }
    if let Some(role) = filters.role {
        qb.push(r#" AND "ParticipantRole" = "#);
        qb.push_bind(role.code());
    }
    if let Some(ref city) = filters.city {
        qb.push(r#" AND "ParticipantCity" ILIKE "#);
        qb.push_bind(listing::like_pattern(city));
    }
    if let Some(ref state) = filters.state {
        qb.push(r#" AND "ParticipantState" ILIKE "#);
        qb.push_bind(listing::like_pattern(state));
    }
    if let Some(ref interest) = filters.interest {
        // Exact match, case-insensitive (no wildcard wrapping)
        qb.push(r#" AND "ParticipantFieldOfInterest" ILIKE "#);
        qb.push_bind(interest.clone());
    }
    if let Some(cutoff) = min_age_cutoff {
        qb.push(r#" AND "ParticipantDOB" <= "#);
        qb.push_bind(cutoff);
    }
    if let Some(cutoff) = max_age_cutoff {
        qb.push(r#" AND "ParticipantDOB" >= "#);
        qb.push_bind(cutoff);
    }
}

pub struct ParticipantService {
    pool: PgPool,
}

impl ParticipantService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Filtered, sorted, paginated participants list. Admin only.
    pub async fn list(
        &self,
        user: &CurrentUser,
        query: &ParticipantListQuery,
    ) -> Result<ParticipantListDto> {
        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        let sort = ParticipantSort::parse(query.sort.as_deref());
        let dir = SortDir::parse(query.sort_dir.as_deref(), sort.default_dir());
        let filters = normalize_filters(query);
        let search = non_empty(query.search.as_deref()).map(str::to_string);

        let today = today_utc();
        let min_age_cutoff = filters.min_age.map(|n| birthdate_cutoff(today, n));
        let max_age_cutoff = filters.max_age.map(|n| birthdate_cutoff(today, n));

        let push = {
            let filters = filters.clone();
            let search = search.clone();
            move |qb: &mut QueryBuilder<'_, Postgres>| {
                push_filtered(qb, search.as_deref(), &filters, min_age_cutoff, max_age_cutoff);
            }
        };

        let total = fetch_count(&self.pool, &push).await.map_err(|e| {
            tracing::error!("Failed to count participants: {:?}", e);
            AppError::Database(e)
        })?;

        let window = PageWindow::resolve(
            listing::requested_page(query.page.as_deref()),
            total,
            LIST_PAGE_SIZE,
        );

        let select = format!("SELECT {}", PARTICIPANT_COLUMNS);
        let rows: Vec<ParticipantRow> = fetch_page(
            &self.pool,
            &select,
            &push,
            sort.order_sql(),
            dir,
            r#""ParticipantID""#,
            &window,
        )
        .await
        .map_err(|e| {
            tracing::error!("Failed to list participants: {:?}", e);
            AppError::Database(e)
        })?;

        let projected: Vec<ParticipantDto> = rows.into_iter().map(Into::into).collect();

        Ok(ParticipantListDto {
            page: ListPage::assemble(projected, total, &window, sort, dir, search.as_deref()),
            filters: ParticipantFiltersDto {
                role: filters.role,
                city: filters.city,
                state: filters.state,
                interest: filters.interest,
                min_age: filters.min_age,
                max_age: filters.max_age,
            },
        })
    }

    /// Admin-created participant account.
    pub async fn add(&self, user: &CurrentUser, dto: AddParticipantDto) -> Result<ParticipantRow> {
        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        let password_hash = hash_password(&dto.password)?;
        let role = dto.role.unwrap_or(Role::Participant);

        let sql = format!(
            r#"INSERT INTO "Participants" (
                "ParticipantEmail", "ParticipantPassword",
                "ParticipantFirstName", "ParticipantLastName",
                "ParticipantDOB", "ParticipantPhone", "ParticipantCity",
                "ParticipantState", "ParticipantZip",
                "ParticipantSchoolOrEmployer", "ParticipantFieldOfInterest",
                "ParticipantRole"
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {}"#,
            PARTICIPANT_COLUMNS
        );

        sqlx::query_as::<_, ParticipantRow>(&sql)
            .bind(&dto.email)
            .bind(&password_hash)
            .bind(&dto.first_name)
            .bind(&dto.last_name)
            .bind(dto.dob)
            .bind(&dto.phone)
            .bind(&dto.city)
            .bind(&dto.state)
            .bind(&dto.zip)
            .bind(&dto.school_or_employer)
            .bind(&dto.field_of_interest)
            .bind(role.code())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::from_write_error(e, "An account with that email already exists")
            })
    }

    pub async fn update_role(
        &self,
        user: &CurrentUser,
        participant_id: i32,
        role: Role,
    ) -> Result<ParticipantRow> {
        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        let sql = format!(
            r#"UPDATE "Participants" SET "ParticipantRole" = $1
            WHERE "ParticipantID" = $2
            RETURNING {}"#,
            PARTICIPANT_COLUMNS
        );

        sqlx::query_as::<_, ParticipantRow>(&sql)
            .bind(role.code())
            .bind(participant_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update participant role: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound("Participant not found".to_string()))
    }

    /// Delete a participant. Deletion is blocked by foreign-key policy when
    /// dependent rows (registrations, milestones, donations) exist.
    pub async fn delete(&self, user: &CurrentUser, participant_id: i32) -> Result<()> {
        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        let result = sqlx::query(r#"DELETE FROM "Participants" WHERE "ParticipantID" = $1"#)
            .bind(participant_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::from_write_error(
                    e,
                    "Participant has related records and cannot be deleted",
                )
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Participant not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_query(filters: &Filters, search: Option<&str>) -> String {
        let today = chrono::NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let min_cut = filters.min_age.map(|n| birthdate_cutoff(today, n));
        let max_cut = filters.max_age.map(|n| birthdate_cutoff(today, n));
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
        push_filtered(&mut qb, search, filters, min_cut, max_cut);
        qb.sql().to_string()
    }

    #[test]
    fn filters_are_independent_and_anded() {
        let filters = Filters {
            role: Some(Role::Admin),
            city: Some("Provo".to_string()),
            ..Filters::default()
        };
        let sql = base_query(&filters, None);
        assert!(sql.contains(r#"AND "ParticipantRole" = $1"#));
        assert!(sql.contains(r#"AND "ParticipantCity" ILIKE $2"#));
        assert!(!sql.contains("ParticipantDOB"));
    }

    #[test]
    fn search_covers_all_allow_listed_paths() {
        let sql = base_query(&Filters::default(), Some("smith"));
        assert!(sql.contains(r#"CAST("ParticipantID" AS TEXT) ILIKE"#));
        assert!(sql.contains(r#""ParticipantFirstName" ILIKE"#));
        assert!(sql.contains(r#""ParticipantLastName" ILIKE"#));
        assert!(sql.contains(r#"("ParticipantFirstName" || ' ' || "ParticipantLastName") ILIKE"#));
    }

    #[test]
    fn age_bounds_compare_against_birth_date_cutoffs() {
        let filters = Filters {
            min_age: Some(18),
            max_age: Some(30),
            ..Filters::default()
        };
        let sql = base_query(&filters, None);
        // min age -> latest acceptable birth date, max age -> earliest
        assert!(sql.contains(r#""ParticipantDOB" <="#));
        assert!(sql.contains(r#""ParticipantDOB" >="#));
    }

    #[test]
    fn normalize_drops_unparseable_and_negative_ages() {
        let query = ParticipantListQuery {
            filter_min_age: Some("abc".to_string()),
            filter_max_age: Some("-3".to_string()),
            filter_role: Some("A".to_string()),
            ..ParticipantListQuery::default()
        };
        let filters = normalize_filters(&query);
        assert_eq!(filters.min_age, None);
        assert_eq!(filters.max_age, None);
        assert_eq!(filters.role, Some(Role::Admin));
    }
}
