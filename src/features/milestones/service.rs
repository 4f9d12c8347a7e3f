use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::core::error::{AppError, Result};
use crate::features::auth::model::CurrentUser;
use crate::features::milestones::dtos::{
    CreateMilestoneDto, MilestoneDto, MilestoneFiltersDto, MilestoneListDto, MilestoneListQuery,
    MilestoneSort, UpdateMilestoneDto,
};
use crate::features::milestones::models::{MilestoneListRow, MILESTONE_LIST_COLUMNS};
use crate::shared::constants::LIST_PAGE_SIZE;
use crate::shared::listing::{
    self, fetch_count, fetch_page, non_empty, push_search_group, ListPage, PageWindow, SortDir,
    SortKey,
};

const SEARCH_EXPRS: &[&str] = &[
    r#"m."MilestoneTitle""#,
    r#"m."MilestoneCategory""#,
    r#"p."ParticipantFirstName""#,
    r#"p."ParticipantLastName""#,
    r#"p."ParticipantEmail""#,
    r#"(p."ParticipantFirstName" || ' ' || p."ParticipantLastName")"#,
];

#[derive(Debug, Default, Clone)]
struct Filters {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    category: Option<String>,
}

fn normalize_filters(query: &MilestoneListQuery) -> Filters {
    Filters {
        start_date: listing::lenient_date(query.filter_start_date.as_deref()),
        end_date: listing::lenient_date(query.filter_end_date.as_deref()),
        category: non_empty(query.filter_category.as_deref()).map(str::to_string),
    }
}

fn push_filtered(
    qb: &mut QueryBuilder<'_, Postgres>,
    user: &CurrentUser,
    search: Option<&str>,
    filters: &Filters,
) {
    qb.push(
        r#" FROM "Participant_Milestone" m JOIN "Participants" p ON p."ParticipantID" = m."ParticipantID" WHERE "#,
    );
    if user.is_admin() {
        qb.push("TRUE");
    } else {
        qb.push(r#"m."ParticipantID" = "#);
        qb.push_bind(user.participant_id);
    }

    if let Some(term) = search {
        push_search_group(qb, SEARCH_EXPRS, term);
    }
    if let Some(start) = filters.start_date {
        qb.push(r#" AND m."MilestoneDate" >= "#);
        qb.push_bind(start);
    }
    if let Some(end) = filters.end_date {
        qb.push(r#" AND m."MilestoneDate" <= "#);
        qb.push_bind(end);
    }
    if let Some(ref category) = filters.category {
        // Exact match, case-insensitive (no wildcard wrapping)
        qb.push(r#" AND m."MilestoneCategory" ILIKE "#);
        qb.push_bind(category.clone());
    }
}

pub struct MilestoneService {
    pool: PgPool,
}

impl MilestoneService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        user: &CurrentUser,
        query: &MilestoneListQuery,
    ) -> Result<MilestoneListDto> {
        let sort = MilestoneSort::parse(query.sort.as_deref());
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

        let total = fetch_count(&self.pool, &push).await.map_err(|e| {
            tracing::error!("Failed to count milestones: {:?}", e);
            AppError::Database(e)
        })?;

        let window = PageWindow::resolve(
            listing::requested_page(query.page.as_deref()),
            total,
            LIST_PAGE_SIZE,
        );

        let select = format!("SELECT {}", MILESTONE_LIST_COLUMNS);
        let rows: Vec<MilestoneListRow> = fetch_page(
            &self.pool,
            &select,
            &push,
            sort.order_sql(),
            dir,
            r#"m."MilestoneID""#,
            &window,
        )
        .await
        .map_err(|e| {
            tracing::error!("Failed to list milestones: {:?}", e);
            AppError::Database(e)
        })?;

        let projected: Vec<MilestoneDto> = rows.into_iter().map(Into::into).collect();

        Ok(MilestoneListDto {
            page: ListPage::assemble(projected, total, &window, sort, dir, search.as_deref()),
            filters: MilestoneFiltersDto {
                start_date: filters.start_date,
                end_date: filters.end_date,
                category: filters.category,
            },
        })
    }

    pub async fn create(&self, user: &CurrentUser, dto: CreateMilestoneDto) -> Result<MilestoneDto> {
        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        let exists = sqlx::query_scalar::<_, i32>(
            r#"SELECT "ParticipantID" FROM "Participants" WHERE "ParticipantID" = $1"#,
        )
        .bind(dto.participant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check participant: {:?}", e);
            AppError::Database(e)
        })?;
        if exists.is_none() {
            return Err(AppError::NotFound("Participant not found".to_string()));
        }

        let sql = format!(
            r#"WITH inserted AS (
                INSERT INTO "Participant_Milestone"
                    ("ParticipantID", "MilestoneTitle", "MilestoneCategory", "MilestoneDate")
                VALUES ($1, $2, $3, $4)
                RETURNING "MilestoneID", "ParticipantID", "MilestoneTitle", "MilestoneCategory", "MilestoneDate"
            )
            SELECT {} FROM inserted m JOIN "Participants" p ON p."ParticipantID" = m."ParticipantID""#,
            MILESTONE_LIST_COLUMNS
        );

        let row = sqlx::query_as::<_, MilestoneListRow>(&sql)
            .bind(dto.participant_id)
            .bind(&dto.title)
            .bind(&dto.category)
            .bind(dto.date)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create milestone: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(row.into())
    }

    pub async fn update(
        &self,
        user: &CurrentUser,
        milestone_id: i32,
        dto: UpdateMilestoneDto,
    ) -> Result<MilestoneDto> {
        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        let sql = format!(
            r#"WITH updated AS (
                UPDATE "Participant_Milestone"
                SET "MilestoneTitle" = $1, "MilestoneCategory" = $2, "MilestoneDate" = $3
                WHERE "MilestoneID" = $4
                RETURNING "MilestoneID", "ParticipantID", "MilestoneTitle", "MilestoneCategory", "MilestoneDate"
            )
            SELECT {} FROM updated m JOIN "Participants" p ON p."ParticipantID" = m."ParticipantID""#,
            MILESTONE_LIST_COLUMNS
        );

        sqlx::query_as::<_, MilestoneListRow>(&sql)
            .bind(&dto.title)
            .bind(&dto.category)
            .bind(dto.date)
            .bind(milestone_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update milestone: {:?}", e);
                AppError::Database(e)
            })?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound("Milestone not found".to_string()))
    }

    pub async fn delete(&self, user: &CurrentUser, milestone_id: i32) -> Result<()> {
        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        let result =
            sqlx::query(r#"DELETE FROM "Participant_Milestone" WHERE "MilestoneID" = $1"#)
                .bind(milestone_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to delete milestone: {:?}", e);
                    AppError::Database(e)
                })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Milestone not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::Role;

    #[test]
    fn category_filter_is_exact_not_substring() {
        let user = CurrentUser {
            participant_id: 1,
            role: Role::Admin,
        };
        let filters = Filters {
            category: Some("Education".to_string()),
            ..Filters::default()
        };
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
        push_filtered(&mut qb, &user, None, &filters);
        let sql = qb.sql();
        assert!(sql.contains(r#"m."MilestoneCategory" ILIKE $1"#));
    }

    #[test]
    fn own_rows_predicate_for_participants() {
        let user = CurrentUser {
            participant_id: 12,
            role: Role::Participant,
        };
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
        push_filtered(&mut qb, &user, None, &Filters::default());
        assert!(qb.sql().contains(r#"WHERE m."ParticipantID" = $1"#));
    }
}
