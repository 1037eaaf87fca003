use crate::deid::{
    remove_pixel_data, BasicRuleEngine, Deidentifier, RandomUidGenerator, RuleEngine,
    UidGenerator,
};
use crate::error::Result;
use crate::record::DicomRecord;
use crate::types::{DeidConfig, LookupRecord};
use log::info;

/// Prepares records for export according to a [`DeidConfig`]
///
/// # Example
///
/// ```
/// use dicomdeid_core::{DeidConfig, DicomRecord, Exporter, LookupRecord};
/// use dicom_core::{DataElement, PrimitiveValue, Tag, VR};
/// use dicom_object::meta::FileMetaTableBuilder;
/// use dicom_object::InMemDicomObject;
///
/// let mut dcm = InMemDicomObject::new_empty();
/// dcm.put(DataElement::new(
///     Tag(0x7FE0, 0x0010), // PixelData
///     VR::OB,
///     PrimitiveValue::from(vec![0u8; 16]),
/// ));
///
/// let meta = FileMetaTableBuilder::new()
///     .media_storage_sop_class_uid("1.2.840.10008.5.1.4.1.1.7")
///     .media_storage_sop_instance_uid("1.2.3.4")
///     .transfer_syntax("1.2.840.10008.1.2.1")
///     .build()
///     .unwrap();
///
/// let exporter = Exporter::new(DeidConfig::default().remove_pixel_data(true));
/// let (record, lookup) = exporter
///     .export(DicomRecord::new(meta, dcm), LookupRecord::new().with_filename("out.dcm"))
///     .unwrap();
///
/// assert!(record.dataset.element(Tag(0x7FE0, 0x0010)).is_err());
/// assert_eq!(record.filename.as_deref(), Some("out.dcm"));
/// assert!(lookup.deid_sop_uid.is_some());
/// ```
pub struct Exporter<E = BasicRuleEngine, G = RandomUidGenerator> {
    config: DeidConfig,
    deidentifier: Deidentifier<E, G>,
}

impl Exporter {
    /// Creates an exporter with the default de-identifier
    pub fn new(config: DeidConfig) -> Self {
        Self {
            config,
            deidentifier: Deidentifier::new(),
        }
    }
}

impl<E: RuleEngine, G: UidGenerator> Exporter<E, G> {
    /// Creates an exporter around a configured de-identifier
    pub fn with_deidentifier(config: DeidConfig, deidentifier: Deidentifier<E, G>) -> Self {
        Self {
            config,
            deidentifier,
        }
    }

    /// Returns the export configuration
    pub fn config(&self) -> &DeidConfig {
        &self.config
    }

    /// Applies the configured steps to one record
    ///
    /// Pixel data is removed first (when enabled), then the record is
    /// de-identified (when enabled). Without de-identification, only the
    /// destination filename from the lookup is applied.
    ///
    /// # Errors
    ///
    /// Propagates de-identification errors, see [`Deidentifier::deidentify`].
    pub fn export(
        &self,
        mut record: DicomRecord,
        lookup: LookupRecord,
    ) -> Result<(DicomRecord, LookupRecord)> {
        if self.config.remove_pixel_data && remove_pixel_data(&mut record.dataset) {
            info!("Removed pixel data for export");
        }

        if !self.config.deidentify {
            record.filename = lookup.filename.clone();
            return Ok((record, lookup));
        }

        self.deidentifier.deidentify(record, lookup)
    }
}
