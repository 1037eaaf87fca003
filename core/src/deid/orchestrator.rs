use crate::deid::dates::shift_dates;
use crate::deid::identifiers::{self, RandomUidGenerator, UidGenerator};
use crate::deid::rules::{
    remove_times_rule_set, time_shift_rule_set, BasicRuleEngine, Profile, RuleApplication,
    RuleEngine, RuleSet,
};
use crate::error::Result;
use crate::record::tags::keyword_of;
use crate::record::DicomRecord;
use crate::types::{is_unshifted, LookupRecord, TimeShift};
use log::{debug, warn};

/// De-identifies records: identifiers, rule profile, then dates
///
/// The steps run in a fixed order and later steps win on overlapping
/// elements:
///
/// 1. Substitute Patient ID, Study/Series/SOP Instance UID
/// 2. Apply the rule profile: the time shift rules, plus the "remove all
///    times" rules when there is no time shift
/// 3. Shift (or delete) dates
/// 4. Re-attach the original preamble and file meta group
///
/// # Example
///
/// ```
/// use dicomdeid_core::{Deidentifier, DicomRecord, LookupRecord};
/// use dicom_core::{DataElement, PrimitiveValue, Tag, VR};
/// use dicom_object::meta::FileMetaTableBuilder;
/// use dicom_object::InMemDicomObject;
///
/// let mut dcm = InMemDicomObject::new_empty();
/// dcm.put(DataElement::new(
///     Tag(0x0008, 0x0020), // StudyDate
///     VR::DA,
///     PrimitiveValue::from("19800501"),
/// ));
/// dcm.put(DataElement::new(
///     Tag(0x0010, 0x0010), // PatientName
///     VR::PN,
///     PrimitiveValue::from("Doe^John"),
/// ));
///
/// let meta = FileMetaTableBuilder::new()
///     .media_storage_sop_class_uid("1.2.840.10008.5.1.4.1.1.2")
///     .media_storage_sop_instance_uid("1.2.3.4")
///     .transfer_syntax("1.2.840.10008.1.2.1")
///     .build()
///     .unwrap();
///
/// let lookup = LookupRecord::new()
///     .with_study_uid("1.2.826.0.1.3680043.2.1125.1")
///     .with_time_shift(16);
///
/// let (record, lookup) = Deidentifier::new()
///     .deidentify(DicomRecord::new(meta, dcm), lookup)
///     .unwrap();
///
/// let study_date = record.dataset.element(Tag(0x0008, 0x0020)).unwrap();
/// assert_eq!(study_date.to_str().unwrap(), "19800517");
/// assert_eq!(
///     record.meta.media_storage_sop_instance_uid,
///     lookup.deid_sop_uid.unwrap()
/// );
/// ```
pub struct Deidentifier<E = BasicRuleEngine, G = RandomUidGenerator> {
    engine: E,
    generator: G,
    time_shift_rules: RuleSet,
    remove_times_rules: RuleSet,
}

impl Deidentifier {
    /// Creates a de-identifier with the basic rule engine, random UIDs and
    /// the built-in rule sets
    pub fn new() -> Self {
        Self {
            engine: BasicRuleEngine,
            generator: RandomUidGenerator,
            time_shift_rules: time_shift_rule_set(),
            remove_times_rules: remove_times_rule_set(),
        }
    }
}

impl Default for Deidentifier {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: RuleEngine, G: UidGenerator> Deidentifier<E, G> {
    /// Builder: Use another rule engine
    pub fn with_rule_engine<E2: RuleEngine>(self, engine: E2) -> Deidentifier<E2, G> {
        Deidentifier {
            engine,
            generator: self.generator,
            time_shift_rules: self.time_shift_rules,
            remove_times_rules: self.remove_times_rules,
        }
    }

    /// Builder: Use another UID generator
    pub fn with_uid_generator<G2: UidGenerator>(self, generator: G2) -> Deidentifier<E, G2> {
        Deidentifier {
            engine: self.engine,
            generator,
            time_shift_rules: self.time_shift_rules,
            remove_times_rules: self.remove_times_rules,
        }
    }

    /// Builder: Replace the two rule sets the profile is built from
    pub fn with_rule_sets(mut self, time_shift_rules: RuleSet, remove_times_rules: RuleSet) -> Self {
        self.time_shift_rules = time_shift_rules;
        self.remove_times_rules = remove_times_rules;
        self
    }

    /// Selects the rule profile for a time shift
    ///
    /// Without a shift (absent or zero) times are removed as well.
    pub fn profile_for(&self, time_shift: Option<&TimeShift>) -> Profile {
        if is_unshifted(time_shift) {
            Profile::new(vec![
                self.time_shift_rules.clone(),
                self.remove_times_rules.clone(),
            ])
        } else {
            Profile::new(vec![self.time_shift_rules.clone()])
        }
    }

    /// Substitutes the identifiers of a record, see [`identifiers::substitute_identifiers`]
    pub fn substitute_identifiers(
        &self,
        record: &mut DicomRecord,
        lookup: &mut LookupRecord,
    ) -> Result<()> {
        identifiers::substitute_identifiers(record, lookup, &self.generator)
    }

    /// De-identifies one record
    ///
    /// Returns the transformed record, named after `lookup.filename`, and
    /// the lookup with `deid_sop_uid` filled in.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A lookup identifier does not match the syntax of its field
    /// - The rule engine fails for a reason other than a missing attribute
    pub fn deidentify(
        &self,
        mut record: DicomRecord,
        mut lookup: LookupRecord,
    ) -> Result<(DicomRecord, LookupRecord)> {
        self.substitute_identifiers(&mut record, &mut lookup)?;

        let DicomRecord {
            preamble,
            meta,
            dataset,
            ..
        } = record;

        let profile = self.profile_for(lookup.time_shift.as_ref());
        debug!("Applying rule sets {:?}", profile.names());

        let mut dataset = match self.engine.apply(&dataset, &profile)? {
            RuleApplication::Applied(result) => result,
            RuleApplication::AttributeMissing(tag) => {
                warn!(
                    "Rule engine is missing attribute {}, continuing without rule profile",
                    keyword_of(tag)
                );
                dataset
            }
        };

        shift_dates(&mut dataset, lookup.time_shift.as_ref());

        let record = DicomRecord {
            filename: lookup.filename.clone(),
            preamble,
            meta,
            dataset,
        };

        Ok((record, lookup))
    }
}
