use crate::error::{DeidError, Result};
use crate::record::tags::{PATIENT_ID, SERIES_INSTANCE_UID, SOP_INSTANCE_UID, STUDY_INSTANCE_UID};
use crate::record::DicomRecord;
use crate::types::LookupRecord;
use dicom_core::{DataElement, PrimitiveValue, Tag, VR};
use log::debug;
use regex::Regex;
use std::sync::OnceLock;
use uuid::Uuid;

/// Maximum length of UI and LO values
pub const MAX_IDENTIFIER_LENGTH: usize = 64;

/// Source of fresh, globally unique identifiers
pub trait UidGenerator: Send + Sync {
    /// Returns a new dotted numeric UID
    fn generate(&self) -> String;
}

/// Generates UUID-derived UIDs under the `2.25` root
///
/// The random 128-bit UUID is written as a decimal integer, so the result
/// never exceeds 44 characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomUidGenerator;

impl UidGenerator for RandomUidGenerator {
    fn generate(&self) -> String {
        format!("2.25.{}", Uuid::new_v4().as_u128())
    }
}

/// Checks UI syntax: numeric components separated by dots, without leading
/// zeros, at most 64 characters
pub fn is_valid_uid(uid: &str) -> bool {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let re = REGEX.get_or_init(|| {
        Regex::new(r"^(0|[1-9][0-9]*)(\.(0|[1-9][0-9]*))*$").expect("Failed to compile regex")
    });

    uid.len() <= MAX_IDENTIFIER_LENGTH && re.is_match(uid)
}

/// Checks LO syntax: at most 64 characters, no backslash, no control characters
pub fn is_valid_long_string(value: &str) -> bool {
    value.chars().count() <= MAX_IDENTIFIER_LENGTH
        && !value.contains('\\')
        && !value.chars().any(|c| c.is_control() && c != '\u{1b}')
}

fn validated_uid(field: &str, uid: Option<&String>) -> Result<Option<String>> {
    match uid {
        Some(uid) if !is_valid_uid(uid) => Err(DeidError::ValidationError(format!(
            "{} '{}' is not a valid UID",
            field, uid
        ))),
        _ => Ok(uid.cloned()),
    }
}

/// Writes the substitute identifiers into a record
///
/// Patient ID, Study and Series Instance UID are taken from the lookup when
/// present, otherwise freshly generated (the generated values are not written
/// back). The SOP Instance UID is reused when the lookup has one; otherwise a
/// new one is generated and stored in `lookup.deid_sop_uid`. The file meta
/// group's MediaStorageSOPInstanceUID (0002,0003) is set to the same value,
/// the group length is recomputed. MediaStorageSOPClassUID (0002,0002) keeps
/// the storage class and is never overwritten with an instance UID.
///
/// # Errors
///
/// Returns [`DeidError::ValidationError`] when a lookup value does not match
/// the syntax of its target field. Nothing is written in that case.
pub fn substitute_identifiers(
    record: &mut DicomRecord,
    lookup: &mut LookupRecord,
    generator: &dyn UidGenerator,
) -> Result<()> {
    // Validate everything before touching the record
    let patient_id = match &lookup.deid_patient_id {
        Some(id) if !is_valid_long_string(id) => {
            return Err(DeidError::ValidationError(format!(
                "patient ID '{}' is not a valid LO value",
                id
            )));
        }
        id => id.clone(),
    };
    let study_uid = validated_uid("study UID", lookup.deid_study_uid.as_ref())?;
    let series_uid = validated_uid("series UID", lookup.deid_series_uid.as_ref())?;
    let sop_uid = validated_uid("SOP instance UID", lookup.deid_sop_uid.as_ref())?;

    let patient_id = patient_id.unwrap_or_else(|| generator.generate());
    let study_uid = study_uid.unwrap_or_else(|| generator.generate());
    let series_uid = series_uid.unwrap_or_else(|| generator.generate());
    let sop_uid = sop_uid.unwrap_or_else(|| generator.generate());

    put_identifier(record, PATIENT_ID, VR::LO, &patient_id);
    put_identifier(record, STUDY_INSTANCE_UID, VR::UI, &study_uid);
    put_identifier(record, SERIES_INSTANCE_UID, VR::UI, &series_uid);
    put_identifier(record, SOP_INSTANCE_UID, VR::UI, &sop_uid);

    record.meta.media_storage_sop_instance_uid = sop_uid.clone();
    record.meta.update_information_group_length();

    debug!("Assigned SOP instance UID {}", sop_uid);
    lookup.deid_sop_uid = Some(sop_uid);

    Ok(())
}

fn put_identifier(record: &mut DicomRecord, tag: Tag, vr: VR, value: &str) {
    record
        .dataset
        .put(DataElement::new(tag, vr, PrimitiveValue::from(value)));
}
