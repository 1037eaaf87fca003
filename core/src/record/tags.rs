use dicom_core::dictionary::DataDictionary;
use dicom_core::Tag;
use dicom_dictionary_std::StandardDataDictionary;
use dicom_object::InMemDicomObject;

// Identifier Tags
pub const PATIENT_ID: Tag = Tag(0x0010, 0x0020);
pub const STUDY_INSTANCE_UID: Tag = Tag(0x0020, 0x000D);
pub const SERIES_INSTANCE_UID: Tag = Tag(0x0020, 0x000E);
pub const SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x0018);
pub const SOP_CLASS_UID: Tag = Tag(0x0008, 0x0016);

// Date Tags
pub const PATIENT_BIRTH_DATE: Tag = Tag(0x0010, 0x0030);
pub const STUDY_DATE: Tag = Tag(0x0008, 0x0020);
pub const SERIES_DATE: Tag = Tag(0x0008, 0x0021);
pub const ACQUISITION_DATE: Tag = Tag(0x0008, 0x0022);
pub const CONTENT_DATE: Tag = Tag(0x0008, 0x0023);
pub const ACQUISITION_DATE_TIME: Tag = Tag(0x0008, 0x002A);

// Time Tags
pub const STUDY_TIME: Tag = Tag(0x0008, 0x0030);
pub const ACQUISITION_TIME: Tag = Tag(0x0008, 0x0032);
pub const PATIENT_BIRTH_TIME: Tag = Tag(0x0010, 0x0032);

// Patient Tags
pub const PATIENT_NAME: Tag = Tag(0x0010, 0x0010);
pub const OTHER_PATIENT_IDS: Tag = Tag(0x0010, 0x1000);
pub const OTHER_PATIENT_NAMES: Tag = Tag(0x0010, 0x1001);
pub const PATIENT_BIRTH_NAME: Tag = Tag(0x0010, 0x1005);
pub const PATIENT_ADDRESS: Tag = Tag(0x0010, 0x1040);
pub const PATIENT_MOTHER_BIRTH_NAME: Tag = Tag(0x0010, 0x1060);
pub const PATIENT_TELEPHONE_NUMBERS: Tag = Tag(0x0010, 0x2154);
pub const MEDICAL_RECORD_LOCATOR: Tag = Tag(0x0010, 0x1090);

// Study/Visit Tags
pub const ACCESSION_NUMBER: Tag = Tag(0x0008, 0x0050);
pub const STUDY_ID: Tag = Tag(0x0020, 0x0010);
pub const REFERRING_PHYSICIAN_NAME: Tag = Tag(0x0008, 0x0090);
pub const PERFORMING_PHYSICIAN_NAME: Tag = Tag(0x0008, 0x1050);
pub const NAME_OF_PHYSICIANS_READING_STUDY: Tag = Tag(0x0008, 0x1060);
pub const OPERATORS_NAME: Tag = Tag(0x0008, 0x1070);
pub const REQUESTING_PHYSICIAN: Tag = Tag(0x0032, 0x1032);

// Institution/Device Tags
pub const INSTITUTION_NAME: Tag = Tag(0x0008, 0x0080);
pub const INSTITUTION_ADDRESS: Tag = Tag(0x0008, 0x0081);
pub const INSTITUTIONAL_DEPARTMENT_NAME: Tag = Tag(0x0008, 0x1040);
pub const STATION_NAME: Tag = Tag(0x0008, 0x1010);
pub const DEVICE_SERIAL_NUMBER: Tag = Tag(0x0018, 0x1000);

// Bulk Data Tags
pub const PIXEL_DATA: Tag = Tag(0x7FE0, 0x0010);

/// Group of retired curve data elements (50xx,eeee)
pub const CURVE_DATA_GROUP: u16 = 0x5000;

/// Helper to get string value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to string
pub fn get_string_value(dcm: &InMemDicomObject, tag: Tag) -> Option<String> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_str().ok())
        .map(|s| s.trim_end_matches(['\0', ' ']).trim().to_string())
}

/// Returns the dictionary keyword for a tag, or its `(gggg,eeee)` form when unknown
pub fn keyword_of(tag: Tag) -> String {
    StandardDataDictionary
        .by_tag(tag)
        .map(|entry| entry.alias.to_string())
        .unwrap_or_else(|| tag.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_core::{DataElement, PrimitiveValue, VR};

    #[test]
    fn test_tag_values() {
        assert_eq!(PATIENT_ID, Tag(0x0010, 0x0020));
        assert_eq!(SOP_INSTANCE_UID, Tag(0x0008, 0x0018));
        assert_eq!(PATIENT_BIRTH_DATE, Tag(0x0010, 0x0030));
        assert_eq!(PIXEL_DATA, Tag(0x7FE0, 0x0010));
    }

    #[test]
    fn test_keyword_of() {
        assert_eq!(keyword_of(PATIENT_BIRTH_DATE), "PatientBirthDate");
        assert_eq!(keyword_of(ACQUISITION_DATE_TIME), "AcquisitionDateTime");
        assert_eq!(keyword_of(Tag(0x0011, 0x1010)), "(0011,1010)");
    }

    #[test]
    fn test_get_string_value_trims_padding() {
        let mut dcm = InMemDicomObject::new_empty();
        dcm.put(DataElement::new(
            STUDY_DATE,
            VR::DA,
            PrimitiveValue::from("20190202 "),
        ));
        assert_eq!(get_string_value(&dcm, STUDY_DATE).as_deref(), Some("20190202"));
        assert_eq!(get_string_value(&dcm, SERIES_DATE), None);
    }
}
