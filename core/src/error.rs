use thiserror::Error;

/// Result type for de-identification operations
pub type Result<T> = std::result::Result<T, DeidError>;

/// Error types for de-identification operations
#[derive(Error, Debug)]
pub enum DeidError {
    /// DICOM reading or writing error
    #[error("DICOM error: {0}")]
    DicomError(String),

    /// A caller-supplied identifier does not match the syntax of its target field
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The rule engine failed for a reason other than a missing attribute
    #[error("Rule engine error: {0}")]
    RuleEngineError(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// Convert dicom-object errors
impl From<dicom_object::ReadError> for DeidError {
    fn from(e: dicom_object::ReadError) -> Self {
        DeidError::DicomError(format!("{}", e))
    }
}

impl From<dicom_object::WriteError> for DeidError {
    fn from(e: dicom_object::WriteError) -> Self {
        DeidError::DicomError(format!("{}", e))
    }
}
