use serde::Deserialize;

pub const PER_PAGE: i64 = 10;

/// `?page=` as sent by the list views. Anything unparsable or below 1 means page 1.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1)
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: i64,
    pub per_page: i64,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn offset(page: i64, per_page: i64) -> i64 {
        page.saturating_sub(1).saturating_mul(per_page)
    }

    pub fn last_page(&self) -> i64 {
        if self.total == 0 {
            1
        } else {
            (self.total + self.per_page - 1) / self.per_page
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.last_page()
    }

    pub fn previous_page(&self) -> i64 {
        (self.current_page - 1).clamp(1, self.last_page())
    }

    pub fn next_page(&self) -> i64 {
        self.current_page + 1
    }

    /// 1-based position of the first item shown, 0 for an empty page.
    pub fn first_item(&self) -> i64 {
        if self.items.is_empty() {
            0
        } else {
            Self::offset(self.current_page, self.per_page) + 1
        }
    }

    pub fn last_item(&self) -> i64 {
        if self.items.is_empty() {
            0
        } else {
            Self::offset(self.current_page, self.per_page) + self.items.len() as i64
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            per_page: self.per_page,
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: &str) -> PageQuery {
        PageQuery {
            page: Some(page.to_string()),
        }
    }

    #[test]
    fn test_page_query_defaults_to_first_page() {
        assert_eq!(PageQuery::default().page(), 1);
        assert_eq!(query("0").page(), 1);
        assert_eq!(query("-4").page(), 1);
        assert_eq!(query("abc").page(), 1);
        assert_eq!(query("3").page(), 3);
    }

    #[test]
    fn test_page_bounds() {
        let page = Page {
            items: vec![11],
            current_page: 2,
            per_page: PER_PAGE,
            total: 11,
        };
        assert_eq!(page.last_page(), 2);
        assert!(page.has_previous());
        assert!(!page.has_next());
        assert_eq!(page.first_item(), 11);
        assert_eq!(page.last_item(), 11);
    }

    #[test]
    fn test_out_of_range_page_is_empty_not_error() {
        let page: Page<i64> = Page {
            items: vec![],
            current_page: 99,
            per_page: PER_PAGE,
            total: 3,
        };
        assert!(page.is_empty());
        assert_eq!(page.first_item(), 0);
        assert_eq!(page.previous_page(), 1);
    }

    #[test]
    fn test_offset_saturates() {
        assert_eq!(Page::<()>::offset(1, PER_PAGE), 0);
        assert_eq!(Page::<()>::offset(3, PER_PAGE), 20);
        assert_eq!(Page::<()>::offset(i64::MAX, PER_PAGE), i64::MAX);
    }
}
