//! Domain rules for the book catalog.
//!
//! Everything here is pure: payload validation and the derived `thickness`
//! label. Store-dependent checks (does the referenced category exist?) live in
//! the catalog service, which merges them into the same [`ValidationErrors`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Earliest accepted `release_year`, inclusive.
pub const MIN_RELEASE_YEAR: i32 = 1980;

/// Latest accepted `release_year`, inclusive.
pub const MAX_RELEASE_YEAR: i32 = 2024;

/// Books with more pages than this are [`Thickness::Thick`].
pub const THICK_PAGE_THRESHOLD: i32 = 100;

pub const MAX_TITLE_LEN: usize = 255;

pub const MAX_IMAGE_URL_LEN: usize = 500;

pub const MAX_NAME_LEN: usize = 100;

/// Page-count label stored with every book.
///
/// Serialized with the catalog's original labels: `"tebal"` (thick) and
/// `"tipis"` (thin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Thickness {
    #[serde(rename = "tebal")]
    Thick,
    #[serde(rename = "tipis")]
    Thin,
}

impl Thickness {
    /// Derives the label from a page count. This is the only way a book's
    /// thickness is ever set.
    #[must_use]
    pub const fn from_total_page(total_page: i32) -> Self {
        if total_page > THICK_PAGE_THRESHOLD {
            Self::Thick
        } else {
            Self::Thin
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Thick => "tebal",
            Self::Thin => "tipis",
        }
    }
}

impl fmt::Display for Thickness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every field-level problem found in one payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// `Ok(value)` when nothing was recorded, otherwise `Err(self)`.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Client payload for creating or replacing a book.
///
/// Numeric fields are optional at the serde level so a missing field becomes
/// a field-level "is required" error instead of a deserialization failure.
/// A `thickness` key in the JSON body is accepted and discarded.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub price: Option<i32>,
    #[serde(default)]
    pub total_page: Option<i32>,
    #[serde(default)]
    pub category_id: Option<i32>,
}

/// A book payload that passed every store-independent rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidBook {
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub release_year: i32,
    pub price: i32,
    pub total_page: i32,
    pub thickness: Thickness,
    pub category_id: Option<i32>,
}

impl BookRequest {
    /// Checks required fields and ranges, collecting every violation.
    pub fn validate(&self) -> Result<ValidBook, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let title = self.title.as_deref().map(str::trim).unwrap_or_default();
        if title.is_empty() {
            errors.push("title", "title is required");
        } else if title.chars().count() > MAX_TITLE_LEN {
            errors.push(
                "title",
                format!("title must be {MAX_TITLE_LEN} characters or less"),
            );
        }

        if let Some(url) = &self.image_url
            && url.chars().count() > MAX_IMAGE_URL_LEN
        {
            errors.push(
                "image_url",
                format!("image_url must be {MAX_IMAGE_URL_LEN} characters or less"),
            );
        }

        match self.release_year {
            None => errors.push("release_year", "release_year is required"),
            Some(year) if !(MIN_RELEASE_YEAR..=MAX_RELEASE_YEAR).contains(&year) => {
                errors.push(
                    "release_year",
                    format!(
                        "release_year must be between {MIN_RELEASE_YEAR} and {MAX_RELEASE_YEAR}, got {year}"
                    ),
                );
            }
            Some(_) => {}
        }

        match self.price {
            None => errors.push("price", "price is required"),
            Some(price) if price < 0 => {
                errors.push("price", format!("price must be >= 0, got {price}"));
            }
            Some(_) => {}
        }

        match self.total_page {
            None => errors.push("total_page", "total_page is required"),
            Some(pages) if pages < 1 => {
                errors.push("total_page", format!("total_page must be >= 1, got {pages}"));
            }
            Some(_) => {}
        }

        if let Some(id) = self.category_id
            && id <= 0
        {
            errors.push(
                "category_id",
                format!("category_id must be a positive integer, got {id}"),
            );
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let total_page = self.total_page.unwrap_or_default();
        Ok(ValidBook {
            title: title.to_string(),
            description: self.description.clone(),
            image_url: self.image_url.clone(),
            release_year: self.release_year.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            total_page,
            thickness: Thickness::from_total_page(total_page),
            category_id: self.category_id,
        })
    }
}

/// Validates and normalizes a category name.
pub fn validate_category_name(name: Option<&str>) -> Result<String, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let name = name.map(str::trim).unwrap_or_default();

    if name.is_empty() {
        errors.push("name", "name is required");
    } else if name.chars().count() > MAX_NAME_LEN {
        errors.push("name", format!("name must be {MAX_NAME_LEN} characters or less"));
    }

    errors.into_result(name.to_string())
}

/// Validates a username for registration.
pub fn validate_username(username: &str) -> Result<&str, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let trimmed = username.trim();

    if trimmed.is_empty() {
        errors.push("username", "username is required");
    } else if trimmed.chars().count() > MAX_NAME_LEN {
        errors.push(
            "username",
            format!("username must be {MAX_NAME_LEN} characters or less"),
        );
    } else if trimmed.len() != username.len() {
        errors.push("username", "username cannot start or end with whitespace");
    }

    errors.into_result(username)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dune(year: i32, pages: i32) -> BookRequest {
        BookRequest {
            title: Some("Dune".to_string()),
            description: Some("Desert planet".to_string()),
            image_url: None,
            release_year: Some(year),
            price: Some(10),
            total_page: Some(pages),
            category_id: None,
        }
    }

    #[test]
    fn thickness_boundary() {
        assert_eq!(Thickness::from_total_page(1), Thickness::Thin);
        assert_eq!(Thickness::from_total_page(100), Thickness::Thin);
        assert_eq!(Thickness::from_total_page(101), Thickness::Thick);
        assert_eq!(Thickness::from_total_page(250), Thickness::Thick);
    }

    #[test]
    fn thickness_labels() {
        assert_eq!(Thickness::Thick.to_string(), "tebal");
        assert_eq!(Thickness::Thin.as_str(), "tipis");
        assert_eq!(serde_json::to_string(&Thickness::Thin).unwrap(), "\"tipis\"");
    }

    #[test]
    fn valid_book_derives_thickness() {
        let book = dune(1990, 50).validate().unwrap();
        assert_eq!(book.thickness, Thickness::Thin);
        assert_eq!(book.title, "Dune");

        let book = dune(1990, 250).validate().unwrap();
        assert_eq!(book.thickness, Thickness::Thick);
    }

    #[test]
    fn release_year_bounds_are_inclusive() {
        assert!(dune(1980, 10).validate().is_ok());
        assert!(dune(2024, 10).validate().is_ok());

        let errors = dune(1965, 10).validate().unwrap_err();
        assert!(errors.contains("release_year"));

        let errors = dune(2025, 10).validate().unwrap_err();
        assert!(errors.contains("release_year"));
    }

    #[test]
    fn missing_fields_are_all_reported() {
        let errors = BookRequest::default().validate().unwrap_err();
        for field in ["title", "release_year", "price", "total_page"] {
            assert!(errors.contains(field), "missing error for {field}");
        }
        assert_eq!(errors.fields().len(), 4);
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut request = dune(1990, 10);
        request.title = Some("   ".to_string());
        assert!(request.validate().unwrap_err().contains("title"));
    }

    #[test]
    fn price_and_pages_ranges() {
        let mut request = dune(1990, 10);
        request.price = Some(0);
        assert!(request.validate().is_ok());

        request.price = Some(-1);
        request.total_page = Some(0);
        let errors = request.validate().unwrap_err();
        assert!(errors.contains("price"));
        assert!(errors.contains("total_page"));
    }

    #[test]
    fn non_positive_category_id_is_rejected() {
        let mut request = dune(1990, 10);
        request.category_id = Some(0);
        assert!(request.validate().unwrap_err().contains("category_id"));
    }

    #[test]
    fn submitted_thickness_is_ignored() {
        let request: BookRequest = serde_json::from_value(serde_json::json!({
            "title": "Dune",
            "release_year": 1990,
            "price": 10,
            "total_page": 500,
            "thickness": "tipis"
        }))
        .unwrap();

        assert_eq!(request.validate().unwrap().thickness, Thickness::Thick);
    }

    #[test]
    fn category_name_rules() {
        assert_eq!(validate_category_name(Some(" Sci-Fi ")).unwrap(), "Sci-Fi");
        assert!(validate_category_name(None).is_err());
        assert!(validate_category_name(Some("")).is_err());
        assert!(validate_category_name(Some(&"x".repeat(101))).is_err());
    }

    #[test]
    fn username_rules() {
        assert!(validate_username("reader").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username(" padded").is_err());
    }

    #[test]
    fn validation_errors_display() {
        let mut errors = ValidationErrors::default();
        errors.push("title", "title is required");
        errors.push("price", "price is required");
        assert_eq!(
            errors.to_string(),
            "title: title is required; price: price is required"
        );
    }
}
