//! DICOM Part 10 records and the tags the de-identification steps touch
//!
//! A [`DicomRecord`] splits a file into the data set that gets transformed and
//! the framing that must pass through untouched: the 128-byte preamble and the
//! file meta group (which carries the transfer syntax).

pub mod tags;

use crate::error::Result;
use dicom_object::meta::FileMetaTable;
use dicom_object::{open_file, DefaultDicomObject, InMemDicomObject};
use log::debug;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Length of the Part 10 preamble
pub const PREAMBLE_LEN: usize = 128;

const MAGIC: &[u8; 4] = b"DICM";

/// A DICOM record with its framing metadata
#[derive(Debug, Clone)]
pub struct DicomRecord {
    /// Destination name for the output record
    pub filename: Option<String>,

    /// Preamble bytes, when the source had a standard Part 10 header
    pub preamble: Option<[u8; PREAMBLE_LEN]>,

    /// File meta information group (0002,xxxx)
    pub meta: FileMetaTable,

    /// Main data set
    pub dataset: InMemDicomObject,
}

impl DicomRecord {
    /// Creates a record from its parts, without a preamble or filename
    pub fn new(meta: FileMetaTable, dataset: InMemDicomObject) -> Self {
        Self {
            filename: None,
            preamble: None,
            meta,
            dataset,
        }
    }

    /// Splits an already-opened file object into meta group and data set
    pub fn from_object(obj: DefaultDicomObject) -> Self {
        let meta = obj.meta().clone();
        Self::new(meta, obj.into_inner())
    }

    /// Reads a record from a DICOM file, keeping its preamble
    pub fn from_file(path: &Path) -> Result<Self> {
        let preamble = read_preamble(path)?;
        let obj = open_file(path)?;
        debug!(
            "Read {} (transfer syntax {})",
            path.display(),
            obj.meta().transfer_syntax()
        );

        let mut record = Self::from_object(obj);
        record.preamble = preamble;
        Ok(record)
    }

    /// Transfer syntax UID from the file meta group
    pub fn transfer_syntax(&self) -> &str {
        self.meta.transfer_syntax()
    }

    /// Serializes the record as a Part 10 file
    ///
    /// The original preamble is written back when one was read, otherwise
    /// the preamble is zero-filled.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let obj = self.dataset.clone().with_exact_meta(self.meta.clone());
        let mut buffer = Vec::new();
        obj.write_all(&mut buffer)?;

        if let Some(preamble) = &self.preamble {
            if buffer.len() >= PREAMBLE_LEN + MAGIC.len()
                && &buffer[PREAMBLE_LEN..PREAMBLE_LEN + MAGIC.len()] == MAGIC
            {
                buffer[..PREAMBLE_LEN].copy_from_slice(preamble);
            }
        }

        Ok(buffer)
    }

    /// Writes the record to `path` as a Part 10 file
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}

/// Reads the 128-byte preamble of a file
///
/// Returns `None` when the file has no "DICM" magic at offset 128.
pub fn read_preamble(path: &Path) -> Result<Option<[u8; PREAMBLE_LEN]>> {
    let mut file = File::open(path)?;
    let mut buffer = [0u8; PREAMBLE_LEN + 4];

    match file.read_exact(&mut buffer) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }

    if &buffer[PREAMBLE_LEN..] != MAGIC {
        return Ok(None);
    }

    let mut preamble = [0u8; PREAMBLE_LEN];
    preamble.copy_from_slice(&buffer[..PREAMBLE_LEN]);
    Ok(Some(preamble))
}

/// Checks whether a file starts with a Part 10 header
pub fn has_dicom_header(path: &Path) -> bool {
    matches!(read_preamble(path), Ok(Some(_)))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::tags::*;
    use super::DicomRecord;
    use dicom_core::{DataElement, PrimitiveValue, Tag, VR};
    use dicom_object::meta::FileMetaTableBuilder;
    use dicom_object::InMemDicomObject;

    pub const CT_IMAGE_STORAGE: &str = "1.2.840.10008.5.1.4.1.1.2";
    pub const EXPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2.1";

    /// Builds a data set from `(tag, vr, value)` triples
    pub fn quick_dataset(elements: &[(Tag, VR, &str)]) -> InMemDicomObject {
        InMemDicomObject::from_element_iter(
            elements
                .iter()
                .map(|(tag, vr, value)| DataElement::new(*tag, *vr, PrimitiveValue::from(*value))),
        )
    }

    /// Data set with a mix of date, datetime and time fields
    pub fn datetime_dataset() -> InMemDicomObject {
        quick_dataset(&[
            (PATIENT_BIRTH_DATE, VR::DA, "19800501"),
            (ACQUISITION_DATE, VR::DA, "19800501"),
            (ACQUISITION_DATE_TIME, VR::DT, "19800501163601"),
            (ACQUISITION_TIME, VR::TM, "163601"),
            (SERIES_DATE, VR::DA, "19730825121212.120000"),
            (STUDY_DATE, VR::DA, "20190202"),
        ])
    }

    /// Wraps a data set into a record with an explicit VR little endian meta group
    pub fn record_with(dataset: InMemDicomObject) -> DicomRecord {
        let meta = FileMetaTableBuilder::new()
            .media_storage_sop_class_uid(CT_IMAGE_STORAGE)
            .media_storage_sop_instance_uid("1.2.3.4.5")
            .transfer_syntax(EXPLICIT_VR_LITTLE_ENDIAN)
            .build()
            .expect("valid file meta group");
        DicomRecord::new(meta, dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::tags::*;
    use super::test_support::*;
    use super::*;
    use dicom_core::VR;
    use std::io::Write;
    use tempfile::TempDir;

    fn sample_record() -> DicomRecord {
        record_with(quick_dataset(&[
            (SOP_CLASS_UID, VR::UI, CT_IMAGE_STORAGE),
            (SOP_INSTANCE_UID, VR::UI, "1.2.3.4.5"),
            (STUDY_DATE, VR::DA, "20190202"),
            (ACQUISITION_TIME, VR::TM, "163601"),
        ]))
    }

    #[test]
    fn test_read_preamble_without_magic() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("not_dicom");
        File::create(&path)
            .unwrap()
            .write_all(b"This is not a DICOM file")
            .unwrap();

        assert_eq!(read_preamble(&path).unwrap(), None);
        assert!(!has_dicom_header(&path));
    }

    #[test]
    fn test_read_preamble_with_magic() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("with_header");
        let mut file = File::create(&path).unwrap();
        file.write_all(&[7u8; PREAMBLE_LEN]).unwrap();
        file.write_all(b"DICM").unwrap();
        file.write_all(b"rest").unwrap();

        assert_eq!(read_preamble(&path).unwrap(), Some([7u8; PREAMBLE_LEN]));
        assert!(has_dicom_header(&path));
    }

    #[test]
    fn test_to_bytes_writes_preamble_back() {
        let mut record = sample_record();
        record.preamble = Some([b'b'; PREAMBLE_LEN]);

        let bytes = record.to_bytes().unwrap();
        assert_eq!(&bytes[..PREAMBLE_LEN], &[b'b'; PREAMBLE_LEN]);
        assert_eq!(&bytes[PREAMBLE_LEN..PREAMBLE_LEN + 4], b"DICM");
    }

    #[test]
    fn test_file_roundtrip_keeps_framing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("record.dcm");

        let mut record = sample_record();
        record.preamble = Some([3u8; PREAMBLE_LEN]);
        record.write_to_file(&path).unwrap();

        let read_back = DicomRecord::from_file(&path).unwrap();
        assert_eq!(read_back.preamble, Some([3u8; PREAMBLE_LEN]));
        assert_eq!(read_back.transfer_syntax(), EXPLICIT_VR_LITTLE_ENDIAN);
        assert_eq!(
            get_string_value(&read_back.dataset, STUDY_DATE).as_deref(),
            Some("20190202")
        );
    }
}
