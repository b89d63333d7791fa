//! Structured error types for seatplan.
//!
//! Fatal failures are errors; recoverable problems (skipped rows,
//! recomputed capacities) travel alongside successful results as
//! [`RowError`](crate::types::RowError) and
//! [`LoadWarning`](crate::types::LoadWarning) values.

/// All errors that can occur while loading, allocating and rendering.
#[derive(Debug, thiserror::Error)]
pub enum SeatplanError {
    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// ZIP archive error.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Required columns are missing or the table has no usable content.
    #[error("{0}")]
    Schema(String),

    /// The uploaded file could not be read as a spreadsheet.
    #[error("{0}")]
    Upstream(String),

    /// Request input is missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// PDF generation failure.
    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

impl SeatplanError {
    /// True for errors caused by an unreadable or corrupt upload.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Xml(_) | Self::Zip(_) | Self::Io(_) | Self::Upstream(_)
        )
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SeatplanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_classification() {
        assert!(SeatplanError::Upstream("empty file".into()).is_upstream());
        assert!(SeatplanError::Zip(zip::result::ZipError::InvalidArchive("bad")).is_upstream());
        assert!(!SeatplanError::Schema("missing column".into()).is_upstream());
        assert!(!SeatplanError::Validation("rows".into()).is_upstream());
    }

    #[test]
    fn test_schema_message_is_passed_through() {
        let err = SeatplanError::Schema("missing required column(s): Name".into());
        assert_eq!(err.to_string(), "missing required column(s): Name");
    }
}
