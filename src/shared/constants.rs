/// Fixed page size for every listing endpoint
pub const LIST_PAGE_SIZE: i64 = 50;

/// Display pattern for projected dates
pub const DISPLAY_DATE_FORMAT: &str = "%Y-%m-%d";
