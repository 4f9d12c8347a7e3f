//! Shared listing engine for the filtered/paginated/sortable list endpoints.
//!
//! The Participants, Donations, Milestones, and Surveys lists all follow the
//! same shape: a base query (joins + visibility predicate), an optional
//! free-text search OR-group over an allow-listed set of columns, a set of
//! independent AND-ed filters, a count plus any aggregates over the filtered
//! set, then a validated sort with a primary-key tie-break and a fixed-size
//! page window. Each feature service supplies one `push_filtered` closure
//! that writes the shared FROM/WHERE section; the count, aggregate, and page
//! queries all reuse it so their predicates can never drift apart.
//!
//! Sort columns are closed enumerations (`SortKey` impls) and every caller
//! value reaches SQL through `push_bind`; no request data is ever
//! interpolated into query text.

use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use std::str::FromStr;
use utoipa::ToSchema;

/// Sort direction with silent fallback on unrecognized input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    /// Parse `sortDir`, case-insensitively; anything else yields `fallback`.
    pub fn parse(raw: Option<&str>, fallback: SortDir) -> SortDir {
        match raw.map(str::trim).map(str::to_ascii_lowercase).as_deref() {
            Some("asc") => SortDir::Asc,
            Some("desc") => SortDir::Desc,
            _ => fallback,
        }
    }

    pub fn sql(self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }

    pub fn as_param(self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }
}

/// Closed enumeration of sortable columns for one entity.
///
/// `order_sql` values are `&'static str` by construction, which is the sole
/// path from the `sort` request parameter into query text.
pub trait SortKey: Copy + Default {
    /// Parse the raw `sort` parameter; unknown values fall back to the
    /// entity default.
    fn parse(raw: Option<&str>) -> Self {
        raw.map(str::trim).and_then(Self::from_param).unwrap_or_default()
    }

    fn from_param(raw: &str) -> Option<Self>;

    /// Qualified column this key orders by.
    fn order_sql(self) -> &'static str;

    /// Canonical parameter name echoed back to the caller.
    fn as_param(self) -> &'static str;

    /// Direction used when `sortDir` is absent or unrecognized.
    fn default_dir(self) -> SortDir {
        SortDir::Asc
    }
}

/// Resolved pagination window. The requested page is clamped into
/// `[1, total_pages]` once the total is known, so an out-of-range page lands
/// on the last page instead of erroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub current_page: i64,
    pub total_pages: i64,
    pub page_size: i64,
    pub offset: i64,
    pub has_next_page: bool,
}

impl PageWindow {
    pub fn resolve(requested_page: i64, total_count: i64, page_size: i64) -> Self {
        let total_pages = if total_count > 0 {
            (total_count + page_size - 1) / page_size
        } else {
            1
        };
        let current_page = requested_page.clamp(1, total_pages);
        PageWindow {
            current_page,
            total_pages,
            page_size,
            offset: (current_page - 1) * page_size,
            has_next_page: current_page < total_pages,
        }
    }
}

/// One page of projected rows plus the echoed, normalized list parameters.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListPage<T> {
    pub rows: Vec<T>,
    pub total_count: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub page_size: i64,
    pub has_next_page: bool,
    /// Normalized sort column actually applied
    pub sort: String,
    /// Normalized sort direction actually applied
    pub sort_dir: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl<T> ListPage<T> {
    pub fn assemble<K: SortKey>(
        rows: Vec<T>,
        total_count: i64,
        window: &PageWindow,
        sort: K,
        dir: SortDir,
        search: Option<&str>,
    ) -> Self {
        ListPage {
            rows,
            total_count,
            total_pages: window.total_pages,
            current_page: window.current_page,
            page_size: window.page_size,
            has_next_page: window.has_next_page,
            sort: sort.as_param().to_string(),
            sort_dir: dir.as_param().to_string(),
            search: search.map(|s| s.to_string()),
        }
    }
}

/// Lenient parse for untrusted numeric parameters: whitespace and empty
/// strings are absent, unparseable values are absent, never an error.
pub fn lenient<T: FromStr>(raw: Option<&str>) -> Option<T> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

/// Lenient ISO date (`YYYY-MM-DD`) parse with the same absence semantics.
pub fn lenient_date(raw: Option<&str>) -> Option<chrono::NaiveDate> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

/// Trimmed, non-empty text parameter or absent.
pub fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// `%term%` pattern for case-insensitive substring search.
pub fn like_pattern(term: &str) -> String {
    format!("%{}%", term.trim())
}

/// Append the free-text search as one OR-group of ILIKE conditions over the
/// entity's allow-listed expressions, AND-ed onto the query.
pub fn push_search_group(qb: &mut QueryBuilder<'_, Postgres>, exprs: &[&str], term: &str) {
    let pattern = like_pattern(term);
    qb.push(" AND (");
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            qb.push(" OR ");
        }
        qb.push(*expr);
        qb.push(" ILIKE ");
        qb.push_bind(pattern.clone());
    }
    qb.push(")");
}

/// Append the validated ORDER BY with its primary-key tie-break (descending,
/// so ordering stays stable across pages when the sort column has duplicate
/// values) and the LIMIT/OFFSET window.
pub fn push_order_and_window(
    qb: &mut QueryBuilder<'_, Postgres>,
    order_sql: &str,
    dir: SortDir,
    tiebreak_pk: &str,
    window: &PageWindow,
) {
    qb.push(" ORDER BY ");
    qb.push(order_sql);
    qb.push(" ");
    qb.push(dir.sql());
    qb.push(", ");
    qb.push(tiebreak_pk);
    qb.push(" DESC LIMIT ");
    qb.push_bind(window.page_size);
    qb.push(" OFFSET ");
    qb.push_bind(window.offset);
}

/// `COUNT(*)` over the filtered, unpaged predicate.
pub async fn fetch_count<F>(pool: &PgPool, push_filtered: &F) -> sqlx::Result<i64>
where
    F: for<'a> Fn(&mut QueryBuilder<'a, Postgres>),
{
    let mut qb = QueryBuilder::new("SELECT COUNT(*)");
    push_filtered(&mut qb);
    qb.build_query_scalar::<i64>().fetch_one(pool).await
}

/// Count-plus-aggregates over the filtered, unpaged predicate. The caller's
/// select list runs against the exact same FROM/WHERE as the page query, so
/// aggregates always agree with what the page shows.
pub async fn fetch_aggregates<A, F>(
    pool: &PgPool,
    select: &str,
    push_filtered: &F,
) -> sqlx::Result<A>
where
    A: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    F: for<'a> Fn(&mut QueryBuilder<'a, Postgres>),
{
    let mut qb = QueryBuilder::new(select);
    push_filtered(&mut qb);
    qb.build_query_as::<A>().fetch_one(pool).await
}

/// One page of rows: shared predicate, validated order, window.
pub async fn fetch_page<T, F>(
    pool: &PgPool,
    select: &str,
    push_filtered: &F,
    order_sql: &str,
    dir: SortDir,
    tiebreak_pk: &str,
    window: &PageWindow,
) -> sqlx::Result<Vec<T>>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    F: for<'a> Fn(&mut QueryBuilder<'a, Postgres>),
{
    let mut qb = QueryBuilder::new(select);
    push_filtered(&mut qb);
    push_order_and_window(&mut qb, order_sql, dir, tiebreak_pk, window);
    qb.build_query_as::<T>().fetch_all(pool).await
}

/// Requested page number with lenient parsing, defaulting to 1.
pub fn requested_page(raw: Option<&str>) -> i64 {
    lenient::<i64>(raw).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    enum TestSort {
        #[default]
        Id,
        Amount,
    }

    impl SortKey for TestSort {
        fn from_param(raw: &str) -> Option<Self> {
            match raw {
                "DonationID" => Some(TestSort::Id),
                "DonationAmount" => Some(TestSort::Amount),
                _ => None,
            }
        }

        fn order_sql(self) -> &'static str {
            match self {
                TestSort::Id => r#"d."DonationID""#,
                TestSort::Amount => r#"d."DonationAmount""#,
            }
        }

        fn as_param(self) -> &'static str {
            match self {
                TestSort::Id => "DonationID",
                TestSort::Amount => "DonationAmount",
            }
        }
    }

    #[test]
    fn page_window_basic_math() {
        let w = PageWindow::resolve(1, 120, 50);
        assert_eq!(w.total_pages, 3);
        assert_eq!(w.current_page, 1);
        assert_eq!(w.offset, 0);
        assert!(w.has_next_page);

        let w = PageWindow::resolve(3, 120, 50);
        assert_eq!(w.current_page, 3);
        assert_eq!(w.offset, 100);
        assert!(!w.has_next_page);
    }

    #[test]
    fn page_window_clamps_out_of_range_pages() {
        // Requesting page 999 when only 2 pages exist yields page 2
        let w = PageWindow::resolve(999, 80, 50);
        assert_eq!(w.total_pages, 2);
        assert_eq!(w.current_page, 2);
        assert_eq!(w.offset, 50);
        assert!(!w.has_next_page);

        let w = PageWindow::resolve(0, 80, 50);
        assert_eq!(w.current_page, 1);
        let w = PageWindow::resolve(-5, 80, 50);
        assert_eq!(w.current_page, 1);
    }

    #[test]
    fn page_window_empty_set_has_one_page() {
        let w = PageWindow::resolve(7, 0, 50);
        assert_eq!(w.total_pages, 1);
        assert_eq!(w.current_page, 1);
        assert_eq!(w.offset, 0);
        assert!(!w.has_next_page);
    }

    #[test]
    fn page_window_exact_multiple() {
        let w = PageWindow::resolve(2, 100, 50);
        assert_eq!(w.total_pages, 2);
        assert_eq!(w.current_page, 2);
        assert!(!w.has_next_page);
    }

    #[test]
    fn sort_dir_parses_case_insensitively_with_fallback() {
        assert_eq!(SortDir::parse(Some("desc"), SortDir::Asc), SortDir::Desc);
        assert_eq!(SortDir::parse(Some("DESC"), SortDir::Asc), SortDir::Desc);
        assert_eq!(SortDir::parse(Some("Asc"), SortDir::Desc), SortDir::Asc);
        assert_eq!(SortDir::parse(Some("sideways"), SortDir::Desc), SortDir::Desc);
        assert_eq!(SortDir::parse(None, SortDir::Desc), SortDir::Desc);
        assert_eq!(SortDir::parse(Some(""), SortDir::Asc), SortDir::Asc);
    }

    #[test]
    fn sort_key_falls_back_to_default_on_unknown_column() {
        assert_eq!(TestSort::parse(Some("DonationAmount")), TestSort::Amount);
        assert_eq!(TestSort::parse(Some("; DROP TABLE x")), TestSort::Id);
        assert_eq!(TestSort::parse(None), TestSort::Id);
    }

    #[test]
    fn lenient_parsing_treats_garbage_as_absent() {
        assert_eq!(lenient::<i64>(Some("42")), Some(42));
        assert_eq!(lenient::<i64>(Some(" 42 ")), Some(42));
        assert_eq!(lenient::<i64>(Some("forty-two")), None);
        assert_eq!(lenient::<i64>(Some("")), None);
        assert_eq!(lenient::<i64>(None), None);

        assert_eq!(
            lenient_date(Some("2024-06-01")),
            chrono::NaiveDate::from_ymd_opt(2024, 6, 1)
        );
        assert_eq!(lenient_date(Some("June 1st")), None);
        assert_eq!(lenient_date(Some("  ")), None);
    }

    #[test]
    fn requested_page_defaults_to_one() {
        assert_eq!(requested_page(Some("3")), 3);
        assert_eq!(requested_page(Some("not-a-page")), 1);
        assert_eq!(requested_page(None), 1);
    }

    #[test]
    fn search_group_is_one_or_group_of_binds() {
        let mut qb = QueryBuilder::<Postgres>::new(r#"SELECT COUNT(*) FROM "Participants" p WHERE TRUE"#);
        push_search_group(
            &mut qb,
            &[
                r#"p."ParticipantFirstName""#,
                r#"p."ParticipantLastName""#,
                r#"(p."ParticipantFirstName" || ' ' || p."ParticipantLastName")"#,
            ],
            "smith",
        );
        let sql = qb.sql();
        assert!(sql.contains(r#"AND (p."ParticipantFirstName" ILIKE $1"#));
        assert!(sql.contains(r#"OR p."ParticipantLastName" ILIKE $2"#));
        assert!(sql.contains("|| ' ' ||"));
        assert!(sql.ends_with(")"));
        // All three match paths bind the same wrapped pattern
        assert!(sql.contains("$3"));
    }

    #[test]
    fn order_and_window_applies_tiebreak_and_binds_window() {
        let window = PageWindow::resolve(2, 120, 50);
        let mut qb = QueryBuilder::<Postgres>::new(r#"SELECT * FROM "Participant_Donation" d WHERE TRUE"#);
        push_order_and_window(
            &mut qb,
            TestSort::Amount.order_sql(),
            SortDir::Desc,
            r#"d."DonationID""#,
            &window,
        );
        let sql = qb.sql();
        assert!(sql.contains(r#"ORDER BY d."DonationAmount" DESC, d."DonationID" DESC"#));
        assert!(sql.contains("LIMIT $1 OFFSET $2"));
    }

    #[test]
    fn like_pattern_wraps_and_trims() {
        assert_eq!(like_pattern(" smith "), "%smith%");
    }
}
