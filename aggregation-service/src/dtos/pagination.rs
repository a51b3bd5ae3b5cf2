use serde::Deserialize;

pub const DEFAULT_LIMIT: u64 = 2;
pub const DEFAULT_PAGE: u64 = 1;

/// Raw `limit` / `page` query parameters.
///
/// Kept as strings so that a non-numeric value falls back to the default
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<String>,
    pub page: Option<String>,
}

impl PaginationParams {
    pub fn limit(&self) -> u64 {
        parse_positive(self.limit.as_deref()).unwrap_or(DEFAULT_LIMIT)
    }

    /// Falls back to [`DEFAULT_PAGE`] when `limit * page` would not fit in a
    /// BSON `Int64`.
    pub fn page(&self) -> u64 {
        let limit = self.limit();
        parse_positive(self.page.as_deref())
            .filter(|page| checked_offset(limit, *page).is_some())
            .unwrap_or(DEFAULT_PAGE)
    }

    /// `limit * page - limit`
    pub fn skip(&self) -> u64 {
        let limit = self.limit();
        checked_offset(limit, self.page())
            .map(|end| end - limit)
            .unwrap_or(0)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit())
    }
}

/// Accepts only `1..=i64::MAX`, the range MongoDB takes for `$skip`/`$limit`.
fn parse_positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
        .and_then(|v| u64::try_from(v).ok())
}

fn checked_offset(limit: u64, page: u64) -> Option<u64> {
    limit
        .checked_mul(page)
        .filter(|end| i64::try_from(*end).is_ok())
}
