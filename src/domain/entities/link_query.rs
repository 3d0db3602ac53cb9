//! Listing parameters: sort column, direction and substring filter.
//!
//! Sort inputs come straight from query strings, so parsing never fails:
//! anything outside the allow-list falls back to the default.

/// Maximum number of filter characters used for matching.
pub const MAX_FILTER_LENGTH: usize = 100;

/// Columns a link listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    #[default]
    CreatedAt,
    Clicks,
    Code,
    OriginalUrl,
}

impl SortColumn {
    /// Parses a `sortBy` value, accepting camelCase and snake_case names.
    ///
    /// Unknown values fall back to [`SortColumn::CreatedAt`].
    pub fn parse(value: &str) -> Self {
        match value {
            "createdAt" | "created_at" => Self::CreatedAt,
            "clicks" => Self::Clicks,
            "code" => Self::Code,
            "originalUrl" | "original_url" => Self::OriginalUrl,
            _ => Self::default(),
        }
    }

    /// SQL column name. Only these static strings ever reach the ORDER BY clause.
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::Clicks => "clicks",
            Self::Code => "code",
            Self::OriginalUrl => "original_url",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Parses an `order` value case-insensitively; unknown values mean descending.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("asc") {
            Self::Asc
        } else {
            Self::Desc
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Parameters for listing links.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkQuery {
    pub sort_by: SortColumn,
    pub order: SortOrder,
    /// Case-insensitive substring matched against code and URL.
    pub filter: Option<String>,
}

impl LinkQuery {
    /// Builds a query from raw request values.
    ///
    /// The filter is trimmed, capped at [`MAX_FILTER_LENGTH`] characters and
    /// dropped when empty.
    pub fn from_raw(sort_by: Option<&str>, order: Option<&str>, filter: Option<&str>) -> Self {
        let filter = filter
            .map(|f| f.trim().chars().take(MAX_FILTER_LENGTH).collect::<String>())
            .filter(|f| !f.is_empty());

        Self {
            sort_by: sort_by.map(SortColumn::parse).unwrap_or_default(),
            order: order.map(SortOrder::parse).unwrap_or_default(),
            filter,
        }
    }

    /// `ILIKE` pattern for the filter, with `%`, `_` and `\` escaped so the
    /// filter is matched literally.
    pub fn filter_pattern(&self) -> Option<String> {
        self.filter.as_ref().map(|f| {
            let mut pattern = String::with_capacity(f.len() + 2);
            pattern.push('%');
            for c in f.chars() {
                if matches!(c, '%' | '_' | '\\') {
                    pattern.push('\\');
                }
                pattern.push(c);
            }
            pattern.push('%');
            pattern
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_column_allow_list() {
        assert_eq!(SortColumn::parse("clicks"), SortColumn::Clicks);
        assert_eq!(SortColumn::parse("code"), SortColumn::Code);
        assert_eq!(SortColumn::parse("originalUrl"), SortColumn::OriginalUrl);
        assert_eq!(SortColumn::parse("original_url"), SortColumn::OriginalUrl);
        assert_eq!(SortColumn::parse("created_at"), SortColumn::CreatedAt);
    }

    #[test]
    fn test_sort_column_falls_back() {
        assert_eq!(SortColumn::parse("id; DROP TABLE links"), SortColumn::CreatedAt);
        assert_eq!(SortColumn::parse("CLICKS"), SortColumn::CreatedAt);
        assert_eq!(SortColumn::parse(""), SortColumn::CreatedAt);
    }

    #[test]
    fn test_sort_order() {
        assert_eq!(SortOrder::parse("asc"), SortOrder::Asc);
        assert_eq!(SortOrder::parse("ASC"), SortOrder::Asc);
        assert_eq!(SortOrder::parse("desc"), SortOrder::Desc);
        assert_eq!(SortOrder::parse("sideways"), SortOrder::Desc);
    }

    #[test]
    fn test_defaults() {
        let query = LinkQuery::from_raw(None, None, None);
        assert_eq!(query.sort_by, SortColumn::CreatedAt);
        assert_eq!(query.order, SortOrder::Desc);
        assert!(query.filter.is_none());
    }

    #[test]
    fn test_blank_filter_is_dropped() {
        let query = LinkQuery::from_raw(None, None, Some("   "));
        assert!(query.filter.is_none());
        assert!(query.filter_pattern().is_none());
    }

    #[test]
    fn test_filter_is_capped() {
        let long = "x".repeat(250);
        let query = LinkQuery::from_raw(None, None, Some(&long));
        assert_eq!(query.filter.unwrap().chars().count(), MAX_FILTER_LENGTH);
    }

    #[test]
    fn test_filter_pattern_escapes_wildcards() {
        let query = LinkQuery::from_raw(None, None, Some("50%_off\\"));
        assert_eq!(query.filter_pattern().unwrap(), "%50\\%\\_off\\\\%");
    }
}
