use serde::Serialize;

use crate::error::AppError;

pub const MAX_NAME_CHARS: usize = 256;

/// Pagination metadata included in list responses.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct Pagination {
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 20)]
    pub per_page: u64,
    /// Total number of matching items across all pages.
    #[schema(example = 47)]
    pub total: u64,
    /// Total number of pages.
    #[schema(example = 3)]
    pub total_pages: u64,
}

impl Pagination {
    /// Clamp raw query values: page >= 1, per_page in 1..=100 (default 20).
    pub fn normalize(page: Option<u64>, per_page: Option<u64>) -> (u64, u64) {
        (
            Ord::max(page.unwrap_or(1), 1),
            per_page.unwrap_or(20).clamp(1, 100),
        )
    }

    pub fn new(page: u64, per_page: u64, total: u64) -> Self {
        Self {
            page,
            per_page,
            total,
            total_pages: total.div_ceil(per_page),
        }
    }
}

/// Body returned by delete endpoints.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SuccessResponse {
    #[schema(example = true)]
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Validate a trimmed name (1-256 Unicode characters). `field` names it in the error.
pub fn validate_name(name: &str, field: &str) -> Result<(), AppError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > MAX_NAME_CHARS {
        return Err(AppError::Validation(format!(
            "{field} must be 1-{MAX_NAME_CHARS} characters"
        )));
    }
    Ok(())
}

pub fn validate_non_negative(value: i32, field: &str) -> Result<(), AppError> {
    if value < 0 {
        return Err(AppError::Validation(format!("{field} must be >= 0")));
    }
    Ok(())
}

/// Trim an optional free-text field, mapping blank input to `None`.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
