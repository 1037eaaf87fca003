use crate::types::TimeShift;

/// Substitute identifiers and time shift for one record
///
/// Created fresh for every input record and handed back to the caller with
/// the de-identified record, so the caller can learn which SOP Instance UID
/// was assigned. Never shared between records.
///
/// # Example
///
/// ```
/// use dicomdeid_core::{LookupRecord, TimeShift};
///
/// let lookup = LookupRecord::new()
///     .with_study_uid("1.25.220703380105900291585793573")
///     .with_time_shift(16);
///
/// assert_eq!(lookup.time_shift, Some(TimeShift::Days(16)));
/// assert!(lookup.deid_sop_uid.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct LookupRecord {
    /// Destination name for the output record
    pub filename: Option<String>,

    /// Substitute Patient ID
    pub deid_patient_id: Option<String>,

    /// Substitute Study Instance UID
    pub deid_study_uid: Option<String>,

    /// Substitute Series Instance UID
    pub deid_series_uid: Option<String>,

    /// Substitute SOP Instance UID, filled in during substitution when absent
    pub deid_sop_uid: Option<String>,

    /// Day offset for dates; `None` or zero deletes dates instead
    pub time_shift: Option<TimeShift>,
}

impl LookupRecord {
    /// Creates an empty lookup: every identifier is generated, dates are deleted
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: Set the destination filename
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Builder: Set the substitute Patient ID
    pub fn with_patient_id(mut self, patient_id: impl Into<String>) -> Self {
        self.deid_patient_id = Some(patient_id.into());
        self
    }

    /// Builder: Set the substitute Study Instance UID
    pub fn with_study_uid(mut self, uid: impl Into<String>) -> Self {
        self.deid_study_uid = Some(uid.into());
        self
    }

    /// Builder: Set the substitute Series Instance UID
    pub fn with_series_uid(mut self, uid: impl Into<String>) -> Self {
        self.deid_series_uid = Some(uid.into());
        self
    }

    /// Builder: Set the substitute SOP Instance UID
    pub fn with_sop_uid(mut self, uid: impl Into<String>) -> Self {
        self.deid_sop_uid = Some(uid.into());
        self
    }

    /// Builder: Set the time shift
    pub fn with_time_shift(mut self, time_shift: impl Into<TimeShift>) -> Self {
        self.time_shift = Some(time_shift.into());
        self
    }
}
