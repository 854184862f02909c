//! Invitation search queries
//!
//! The search form's inputs are encoded into the query string of
//! `GET /invitations` and decoded again on the results side. Tags are joined
//! with [`TAG_DELIMITER`] and date-times use [`DATE_FORMAT`] (minute
//! precision). Both directions trim the title and tags and drop blank ones,
//! so `parse(q.to_query_string())` is always `q.normalized()`.

use chrono::NaiveDateTime;
use url::form_urlencoded;

/// Separator between tag names in the `tags` parameter
pub const TAG_DELIMITER: char = ',';

/// Date-time format of `startAfter` / `startBefore`
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Filters for the invitation list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub title: Option<String>,
    pub tags: Vec<String>,
    pub start_after: Option<NaiveDateTime>,
    pub start_before: Option<NaiveDateTime>,
    pub min_capacity: Option<u32>,
    pub max_capacity: Option<u32>,
    pub page: Option<u32>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same filters, another page
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: Some(page),
            ..self.clone()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Title and tags trimmed, blank ones dropped, tags split on the delimiter
    pub fn normalized(&self) -> Self {
        Self {
            title: self
                .title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from),
            tags: split_tags(self.tags.iter().map(String::as_str)),
            ..self.clone()
        }
    }

    /// Encode as `key=value&...` (no leading `?`); empty fields are omitted
    pub fn to_query_string(&self) -> String {
        let query = self.normalized();
        let mut out = form_urlencoded::Serializer::new(String::new());
        if let Some(ref title) = query.title {
            out.append_pair("title", title);
        }
        if !query.tags.is_empty() {
            out.append_pair("tags", &query.tags.join(&TAG_DELIMITER.to_string()));
        }
        if let Some(at) = self.start_after {
            out.append_pair("startAfter", &at.format(DATE_FORMAT).to_string());
        }
        if let Some(at) = self.start_before {
            out.append_pair("startBefore", &at.format(DATE_FORMAT).to_string());
        }
        if let Some(n) = self.min_capacity {
            out.append_pair("minCapacity", &n.to_string());
        }
        if let Some(n) = self.max_capacity {
            out.append_pair("maxCapacity", &n.to_string());
        }
        if let Some(n) = self.page {
            out.append_pair("page", &n.to_string());
        }
        out.finish()
    }

    /// `base` with this query appended
    pub fn path_with(&self, base: &str) -> String {
        let qs = self.to_query_string();
        if qs.is_empty() {
            base.to_string()
        } else {
            format!("{}?{}", base, qs)
        }
    }

    /// Decode a query string (a leading `?` is allowed)
    ///
    /// Unknown keys and malformed values are skipped.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut parsed = Self::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "title" => parsed.title = Some(value.to_string()),
                "tags" => parsed.tags = split_tags([value]),
                "startAfter" => parsed.start_after = parse_datetime(value),
                "startBefore" => parsed.start_before = parse_datetime(value),
                "minCapacity" => parsed.min_capacity = value.parse().ok(),
                "maxCapacity" => parsed.max_capacity = value.parse().ok(),
                "page" => parsed.page = value.parse().ok(),
                _ => {}
            }
        }

        parsed
    }
}

fn split_tags<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    values
        .into_iter()
        .flat_map(|v| v.split(TAG_DELIMITER))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Parse a form date-time
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DATE_FORMAT).ok()
}
