//! Book status enumeration and form validation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::filter::EnumFilter;

/// Message shown when any book form field fails validation.
pub const INVALID_BOOK_FORM: &str = "Please fill in all fields correctly.";

// ---------------------------------------------------------------------------
// Book status
// ---------------------------------------------------------------------------

/// Condition/collection status of a book.
///
/// Stored values are the display names, including the accented `Coleção`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookStatus {
    #[default]
    Comum,
    Raro,
    #[serde(rename = "Coleção")]
    Colecao,
    Avulso,
    Autografado,
}

impl BookStatus {
    /// Return the status name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Comum => "Comum",
            Self::Raro => "Raro",
            Self::Colecao => "Coleção",
            Self::Avulso => "Avulso",
            Self::Autografado => "Autografado",
        }
    }

    /// Parse a status string (exact match). Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Comum" => Some(Self::Comum),
            "Raro" => Some(Self::Raro),
            "Coleção" => Some(Self::Colecao),
            "Avulso" => Some(Self::Avulso),
            "Autografado" => Some(Self::Autografado),
            _ => None,
        }
    }

    /// All valid status values.
    pub const ALL: &'static [&'static str] = &["Comum", "Raro", "Coleção", "Avulso", "Autografado"];
}

/// Unknown stored values fall back to [`BookStatus::Comum`].
impl From<String> for BookStatus {
    fn from(value: String) -> Self {
        Self::from_str(&value).unwrap_or_default()
    }
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl EnumFilter for BookStatus {
    fn parse_filter(raw: &str) -> Option<Self> {
        Self::from_str(raw)
    }

    fn filter_value(&self) -> &'static str {
        self.as_str()
    }
}

// ---------------------------------------------------------------------------
// Form validation
// ---------------------------------------------------------------------------

/// A validated book, ready to insert or update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub quantity: i32,
    pub price: f64,
    pub status: BookStatus,
}

impl BookDraft {
    /// Validate raw form values.
    ///
    /// Text fields are trimmed and must be non-empty, quantity must be an
    /// integer of at least 1, price accepts `,` or `.` as decimal separator
    /// and must be positive, and status must be one of [`BookStatus::ALL`].
    /// Every failure yields the same [`INVALID_BOOK_FORM`] message.
    pub fn parse(
        title: &str,
        author: &str,
        publisher: &str,
        quantity: &str,
        price: &str,
        status: &str,
    ) -> Result<Self, CoreError> {
        let invalid = || CoreError::Validation(INVALID_BOOK_FORM.to_string());

        let title = title.trim();
        let author = author.trim();
        let publisher = publisher.trim();
        if title.is_empty() || author.is_empty() || publisher.is_empty() {
            return Err(invalid());
        }

        let quantity: i32 = quantity.trim().parse().map_err(|_| invalid())?;
        if quantity < 1 {
            return Err(invalid());
        }

        let price: f64 = price
            .trim()
            .replace(',', ".")
            .parse()
            .map_err(|_| invalid())?;
        if !price.is_finite() || price <= 0.0 {
            return Err(invalid());
        }

        let status = BookStatus::from_str(status.trim()).ok_or_else(invalid)?;

        Ok(Self {
            title: title.to_string(),
            author: author.to_string(),
            publisher: publisher.to_string(),
            quantity,
            price,
            status,
        })
    }
}
