use crate::record::tags::{keyword_of, PATIENT_BIRTH_DATE};
use crate::types::TimeShift;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use dicom_core::header::Header;
use dicom_core::{DataElement, PrimitiveValue, Tag, VR};
use dicom_object::InMemDicomObject;
use log::debug;
use std::collections::BTreeMap;

const DATE_FORMAT: &str = "%Y%m%d";
const DATE_TIME_FORMAT: &str = "%Y%m%d%H%M%S";

/// Years that fit the four digit year of DA and DT values
const MIN_YEAR: i32 = 0;
const MAX_YEAR: i32 = 9999;

/// Collects the top-level DA and DT elements of a data set
///
/// Maps each tag to its trimmed text value, or `None` when the element is
/// empty or its value cannot be read as text. A data set without date
/// elements yields an empty map.
pub fn date_elements(dcm: &InMemDicomObject) -> BTreeMap<Tag, Option<String>> {
    dcm.iter()
        .filter(|elem| matches!(elem.vr(), VR::DA | VR::DT))
        .map(|elem| {
            let value = elem
                .to_str()
                .ok()
                .map(|s| s.trim_end_matches(['\0', ' ']).trim().to_string())
                .filter(|s| !s.is_empty());
            (elem.tag(), value)
        })
        .collect()
}

/// Shifts every date and datetime of a data set by a whole number of days
///
/// # Algorithm
///
/// 1. Without a shift (absent or zero), every DA/DT value is deleted
/// 2. PatientBirthDate is always deleted
/// 3. `YYYYMMDD` values are shifted and rewritten as `YYYYMMDD`
/// 4. `YYYYMMDDHHMMSS[.FFFFFF]` values are shifted on the date only, the
///    fraction is dropped and the result is rewritten as `YYYYMMDDHHMMSS`
/// 5. Anything else (other lengths, unparseable values, an invalid shift,
///    results outside the years 0000 to 9999) is deleted
///
/// Deleting keeps the element with an empty value.
pub fn shift_dates(dcm: &mut InMemDicomObject, time_shift: Option<&TimeShift>) {
    for (tag, value) in date_elements(dcm) {
        let shifted = match (time_shift, value) {
            (None, _) | (Some(TimeShift::Days(0)), _) | (_, None) => None,
            (Some(_), Some(_)) if tag == PATIENT_BIRTH_DATE => None,
            (Some(shift), Some(value)) => shift.days().and_then(|days| shift_value(&value, days)),
        };

        let Some(vr) = dcm.element(tag).ok().map(|elem| elem.vr()) else {
            continue;
        };

        match shifted {
            Some(new_value) => {
                debug!("Shifted {} to {}", keyword_of(tag), new_value);
                dcm.put(DataElement::new(tag, vr, PrimitiveValue::from(new_value)));
            }
            None => {
                debug!("Deleted value of {}", keyword_of(tag));
                dcm.put(DataElement::new(tag, vr, PrimitiveValue::Empty));
            }
        }
    }
}

/// Shifts one date or datetime value, returning `None` when it must be deleted
fn shift_value(value: &str, days: i64) -> Option<String> {
    let delta = Duration::try_days(days)?;

    if value.len() == 8 {
        let date = NaiveDate::parse_from_str(value, DATE_FORMAT).ok()?;
        return date
            .checked_add_signed(delta)
            .filter(|d| has_dicom_year(d.year()))
            .map(|d| d.format(DATE_FORMAT).to_string());
    }

    let whole_seconds = value.split('.').next().unwrap_or(value);
    if whole_seconds.len() == 14 {
        let date_time = NaiveDateTime::parse_from_str(whole_seconds, DATE_TIME_FORMAT).ok()?;
        return date_time
            .checked_add_signed(delta)
            .filter(|dt| has_dicom_year(dt.year()))
            .map(|dt| dt.format(DATE_TIME_FORMAT).to_string());
    }

    None
}

fn has_dicom_year(year: i32) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::tags::*;
    use crate::record::test_support::{datetime_dataset, quick_dataset};
    use rstest::rstest;

    fn value_of(dcm: &InMemDicomObject, tag: Tag) -> Option<String> {
        get_string_value(dcm, tag).filter(|s| !s.is_empty())
    }

    #[test]
    fn test_date_elements() {
        let elements = date_elements(&datetime_dataset());

        let expected: BTreeMap<Tag, Option<String>> = [
            (ACQUISITION_DATE, "19800501"),
            (ACQUISITION_DATE_TIME, "19800501163601"),
            (PATIENT_BIRTH_DATE, "19800501"),
            (SERIES_DATE, "19730825121212.120000"),
            (STUDY_DATE, "20190202"),
        ]
        .into_iter()
        .map(|(tag, value)| (tag, Some(value.to_string())))
        .collect();

        assert_eq!(elements, expected);
    }

    #[test]
    fn test_date_elements_empty_without_dates() {
        let dcm = quick_dataset(&[
            (PATIENT_ID, VR::LO, "12345"),
            (Tag(0x0008, 0x0060), VR::CS, "CT"),
            (PATIENT_NAME, VR::PN, "Martha"),
        ]);
        assert!(date_elements(&dcm).is_empty());
    }

    #[rstest]
    #[case(None)]
    #[case(Some(TimeShift::Days(0)))]
    fn test_dates_deleted_without_shift(#[case] shift: Option<TimeShift>) {
        let mut dcm = datetime_dataset();
        shift_dates(&mut dcm, shift.as_ref());

        assert_eq!(value_of(&dcm, PATIENT_BIRTH_DATE), None);
        assert_eq!(value_of(&dcm, STUDY_DATE), None);
        assert_eq!(value_of(&dcm, SERIES_DATE), None);
        assert_eq!(value_of(&dcm, ACQUISITION_DATE_TIME), None);
        // Elements are emptied, not removed
        assert!(dcm.element(STUDY_DATE).is_ok());
        // Times are not dates
        assert_eq!(value_of(&dcm, ACQUISITION_TIME).as_deref(), Some("163601"));
    }

    #[test]
    fn test_birth_date_deleted_with_shift() {
        let mut dcm = datetime_dataset();
        shift_dates(&mut dcm, Some(&TimeShift::Days(13)));
        assert_eq!(value_of(&dcm, PATIENT_BIRTH_DATE), None);
        assert!(value_of(&dcm, STUDY_DATE).is_some());

        let mut dcm = quick_dataset(&[(PATIENT_BIRTH_DATE, VR::DA, "19730825121212.120000")]);
        shift_dates(&mut dcm, Some(&TimeShift::Days(13)));
        assert_eq!(value_of(&dcm, PATIENT_BIRTH_DATE), None);
    }

    #[rstest]
    #[case("")]
    #[case("  ")]
    fn test_empty_date_stays_empty_with_shift(#[case] value: &str) {
        let mut dcm = quick_dataset(&[(SERIES_DATE, VR::DA, value)]);
        shift_dates(&mut dcm, Some(&TimeShift::Days(13)));
        assert_eq!(value_of(&dcm, SERIES_DATE), None);
    }

    #[test]
    fn test_positive_shift() {
        let mut dcm = datetime_dataset();
        shift_dates(&mut dcm, Some(&TimeShift::Days(16)));

        assert_eq!(value_of(&dcm, SERIES_DATE).as_deref(), Some("19730910121212"));
        assert_eq!(value_of(&dcm, STUDY_DATE).as_deref(), Some("20190218"));
        assert_eq!(
            value_of(&dcm, ACQUISITION_DATE_TIME).as_deref(),
            Some("19800517163601")
        );
        assert_eq!(value_of(&dcm, ACQUISITION_DATE).as_deref(), Some("19800517"));
        assert_eq!(value_of(&dcm, PATIENT_BIRTH_DATE), None);
    }

    #[test]
    fn test_negative_shift() {
        let mut dcm = datetime_dataset();
        shift_dates(&mut dcm, Some(&TimeShift::Days(-30)));

        assert_eq!(value_of(&dcm, SERIES_DATE).as_deref(), Some("19730726121212"));
        assert_eq!(value_of(&dcm, STUDY_DATE).as_deref(), Some("20190103"));
        assert_eq!(
            value_of(&dcm, ACQUISITION_DATE_TIME).as_deref(),
            Some("19800401163601")
        );
        assert_eq!(value_of(&dcm, ACQUISITION_DATE).as_deref(), Some("19800401"));
        assert_eq!(value_of(&dcm, PATIENT_BIRTH_DATE), None);
    }

    #[rstest]
    #[case("1973082", "19730825121212120000")]
    #[case("197382", "1973085121212120000")]
    #[case("19732", "197308512212120000")]
    fn test_wrong_length_deleted(#[case] date: &str, #[case] date_time: &str) {
        let mut dcm = quick_dataset(&[
            (SERIES_DATE, VR::DA, date),
            (ACQUISITION_DATE_TIME, VR::DT, date_time),
        ]);
        shift_dates(&mut dcm, Some(&TimeShift::Days(30)));

        assert_eq!(value_of(&dcm, SERIES_DATE), None);
        assert_eq!(value_of(&dcm, ACQUISITION_DATE_TIME), None);
    }

    #[test]
    fn test_unparseable_values_deleted() {
        let mut dcm = quick_dataset(&[
            (STUDY_DATE, VR::DA, "19801301"),
            (SERIES_DATE, VR::DA, "1980-5-1"),
            (ACQUISITION_DATE_TIME, VR::DT, "19800501256001"),
        ]);
        shift_dates(&mut dcm, Some(&TimeShift::Days(1)));

        assert_eq!(value_of(&dcm, STUDY_DATE), None);
        assert_eq!(value_of(&dcm, SERIES_DATE), None);
        assert_eq!(value_of(&dcm, ACQUISITION_DATE_TIME), None);
    }

    #[test]
    fn test_invalid_shift_deletes_dates() {
        let mut dcm = datetime_dataset();
        shift_dates(&mut dcm, Some(&TimeShift::Invalid("e".to_string())));

        assert!(date_elements(&dcm).values().all(Option::is_none));
        assert_eq!(value_of(&dcm, SERIES_DATE), None);
        assert_eq!(value_of(&dcm, ACQUISITION_DATE_TIME), None);
    }

    #[test]
    fn test_shift_keeps_vr() {
        let mut dcm = datetime_dataset();
        shift_dates(&mut dcm, Some(&TimeShift::Days(1)));

        assert_eq!(dcm.element(ACQUISITION_DATE_TIME).unwrap().vr(), VR::DT);
        assert_eq!(dcm.element(STUDY_DATE).unwrap().vr(), VR::DA);
    }

    #[test]
    fn test_shift_across_leap_day() {
        let mut dcm = quick_dataset(&[(STUDY_DATE, VR::DA, "20200228")]);
        shift_dates(&mut dcm, Some(&TimeShift::Days(2)));
        assert_eq!(value_of(&dcm, STUDY_DATE).as_deref(), Some("20200301"));
    }

    #[test]
    fn test_overflowing_shift_deletes_dates() {
        let mut dcm = quick_dataset(&[(STUDY_DATE, VR::DA, "20200228")]);
        shift_dates(&mut dcm, Some(&TimeShift::Days(i64::MAX)));
        assert_eq!(value_of(&dcm, STUDY_DATE), None);
    }

    #[rstest]
    #[case("99991231", "99991231235959", 1)]
    #[case("00000101", "00000101000000", -1)]
    fn test_shift_past_four_digit_years_deletes_dates(
        #[case] date: &str,
        #[case] date_time: &str,
        #[case] days: i64,
    ) {
        let mut dcm = quick_dataset(&[
            (STUDY_DATE, VR::DA, date),
            (CONTENT_DATE, VR::DA, "20200228"),
            (ACQUISITION_DATE_TIME, VR::DT, date_time),
        ]);
        shift_dates(&mut dcm, Some(&TimeShift::Days(days)));

        assert_eq!(value_of(&dcm, STUDY_DATE), None);
        assert_eq!(value_of(&dcm, ACQUISITION_DATE_TIME), None);
        assert!(value_of(&dcm, CONTENT_DATE).is_some());
    }

    #[test]
    fn test_shift_up_to_last_four_digit_year() {
        let mut dcm = quick_dataset(&[
            (STUDY_DATE, VR::DA, "99991230"),
            (ACQUISITION_DATE_TIME, VR::DT, "99991230120000"),
        ]);
        shift_dates(&mut dcm, Some(&TimeShift::Days(1)));

        assert_eq!(value_of(&dcm, STUDY_DATE).as_deref(), Some("99991231"));
        assert_eq!(
            value_of(&dcm, ACQUISITION_DATE_TIME).as_deref(),
            Some("99991231120000")
        );
    }
}
