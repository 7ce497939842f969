//! Custom axum extractors and list-endpoint helpers

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use validator::Validate;

use crate::Error;

/// Fixed page size for every list endpoint
pub const PAGE_SIZE: i64 = 20;

/// Page-number pagination query parameters (`?page=2`)
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub page: Option<i64>,
}

impl PageParams {
    /// 1-based page number, defaulting to 1
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Saturates for absurd page numbers; such a page is simply empty
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(PAGE_SIZE)
    }

    pub fn limit(&self) -> i64 {
        PAGE_SIZE
    }
}

/// Paginated response envelope
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub count: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(results: Vec<T>, count: i64, params: &PageParams) -> Self {
        let total_pages = if count == 0 {
            0
        } else {
            (count + PAGE_SIZE - 1) / PAGE_SIZE
        };
        Self {
            count,
            page: params.page(),
            page_size: PAGE_SIZE,
            total_pages,
            results,
        }
    }
}

/// One resolved `ORDER BY` term
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderField {
    pub column: &'static str,
    pub descending: bool,
}

/// Validated ordering, resolved against a whitelist of public field names.
///
/// The whitelist maps each public name to a trusted SQL expression, so the
/// rendered clause never contains caller-supplied text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordering(Vec<OrderField>);

impl Ordering {
    /// Resolve `raw` against `allowed`. Falls back to `default` when `raw`
    /// is absent or names no field at all (`""`, `","`).
    pub fn parse(
        raw: Option<&str>,
        allowed: &[(&str, &'static str)],
        default: &[&str],
    ) -> crate::Result<Self> {
        let mut requested: Vec<&str> = raw
            .map(|s| s.split(',').map(str::trim).filter(|t| !t.is_empty()).collect())
            .unwrap_or_default();
        if requested.is_empty() {
            requested = default.to_vec();
        }

        let mut fields = Vec::with_capacity(requested.len());
        for term in requested {
            let (name, descending) = match term.strip_prefix('-') {
                Some(name) => (name, true),
                None => (term, false),
            };
            let column = allowed
                .iter()
                .find(|(public, _)| *public == name)
                .map(|(_, column)| *column)
                .ok_or_else(|| {
                    Error::Validation(format!("Unknown ordering field '{}'", name))
                })?;
            fields.push(OrderField { column, descending });
        }

        Ok(Self(fields))
    }

    pub fn fields(&self) -> &[OrderField] {
        &self.0
    }

    /// Render as the body of an `ORDER BY` clause
    pub fn to_sql(&self) -> String {
        self.0
            .iter()
            .map(|f| format!("{} {}", f.column, if f.descending { "DESC" } else { "ASC" }))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// `Json<T>` that also runs `T::validate`.
///
/// Malformed bodies and failed validation are reported as 400s, bodies over
/// the route's `DefaultBodyLimit` as 413.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| Error::rejected_body(e.status(), e.body_text()))?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}
