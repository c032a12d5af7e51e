//! Pagination query parameters.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

/// Pagination query parameters.
///
/// Uses `serde_with` to parse page numbers from query strings as integers.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl PaginationParams {
    /// Validates pagination parameters and converts to database offset/limit.
    ///
    /// # Defaults
    ///
    /// - `page`: 1
    /// - `page_size`: 25
    ///
    /// # Validation
    ///
    /// - Page must be > 0
    /// - Page size must be between 1 and 100
    ///
    /// # Returns
    ///
    /// `(offset, limit)` tuple for SQL queries.
    pub fn validate_and_get_offset_limit(&self) -> Result<(i64, i64), String> {
        let page = self.page.unwrap_or(1);
        let page_size = self.page_size.unwrap_or(25);

        if page == 0 {
            return Err("Page must be greater than 0".to_string());
        }

        if !(1..=100).contains(&page_size) {
            return Err("Page size must be between 1 and 100".to_string());
        }

        let offset = ((page - 1) * page_size) as i64;
        let limit = page_size as i64;

        Ok((offset, limit))
    }

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(25)
    }
}

/// Pagination metadata for responses.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: i64,
    pub total_pages: u32,
}

impl PaginationMeta {
    pub fn new(page: u32, page_size: u32, total_items: i64) -> Self {
        let total_pages = if total_items == 0 {
            0
        } else {
            ((total_items as u64).div_ceil(u64::from(page_size))) as u32
        };

        Self {
            page,
            page_size,
            total_items,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<u32>, page_size: Option<u32>) -> PaginationParams {
        PaginationParams { page, page_size }
    }

    #[test]
    fn test_defaults() {
        let (offset, limit) = params(None, None).validate_and_get_offset_limit().unwrap();
        assert_eq!(offset, 0);
        assert_eq!(limit, 25);
    }

    #[test]
    fn test_page_2_with_default_size() {
        let (offset, limit) = params(Some(2), None).validate_and_get_offset_limit().unwrap();
        assert_eq!(offset, 25);
        assert_eq!(limit, 25);
    }

    #[test]
    fn test_custom_page_and_size() {
        let (offset, limit) = params(Some(3), Some(50))
            .validate_and_get_offset_limit()
            .unwrap();
        assert_eq!(offset, 100);
        assert_eq!(limit, 50);
    }

    #[test]
    fn test_page_zero_is_error() {
        assert!(params(Some(0), None).validate_and_get_offset_limit().is_err());
    }

    #[test]
    fn test_page_size_bounds() {
        assert!(params(None, Some(0)).validate_and_get_offset_limit().is_err());
        assert!(params(None, Some(1)).validate_and_get_offset_limit().is_ok());
        assert!(params(None, Some(100)).validate_and_get_offset_limit().is_ok());
        assert!(params(None, Some(101)).validate_and_get_offset_limit().is_err());
    }

    #[test]
    fn test_query_string_numbers_parse() {
        let parsed: PaginationParams =
            serde_json::from_str(r#"{"page": "3", "page_size": "10"}"#).unwrap();
        assert_eq!(parsed.page, Some(3));
        assert_eq!(parsed.page_size, Some(10));
    }

    #[test]
    fn test_pagination_meta_total_pages() {
        assert_eq!(PaginationMeta::new(1, 25, 0).total_pages, 0);
        assert_eq!(PaginationMeta::new(1, 25, 25).total_pages, 1);
        assert_eq!(PaginationMeta::new(1, 25, 26).total_pages, 2);
    }
}
