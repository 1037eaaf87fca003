//! Rule profiles and the rule engine seam
//!
//! The orchestrator only decides which [`RuleSet`]s make up a [`Profile`];
//! how the rules are matched is left to a [`RuleEngine`]. [`BasicRuleEngine`]
//! is a small tag/VR matcher over the top-level elements of a data set.

use crate::error::Result;
use crate::record::tags::*;
use dicom_core::header::Header;
use dicom_core::{DataElement, PrimitiveValue, Tag, VR};
use dicom_object::InMemDicomObject;
use log::debug;

/// What to do with a matched element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Leave the element as it is
    Keep,
    /// Keep the element with an empty value
    Empty,
    /// Delete the element
    Remove,
    /// Replace the value, keeping the VR
    Replace(String),
}

/// Which elements a rule applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// A single tag
    Tag(Tag),
    /// Every element with this VR
    Vr(VR),
    /// Every private element (odd group)
    Private,
    /// Repeating groups such as curve data (50xx): the high byte of the group must match
    RepeatingGroup(u16),
}

impl Selector {
    /// Checks whether an element with this tag and VR is selected
    pub fn matches(&self, tag: Tag, vr: VR) -> bool {
        match *self {
            Selector::Tag(t) => t == tag,
            Selector::Vr(v) => v == vr,
            Selector::Private => tag.group() % 2 == 1,
            Selector::RepeatingGroup(group) => tag.group() & 0xFF00 == group & 0xFF00,
        }
    }
}

/// A selector paired with an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub selector: Selector,
    pub action: Action,
}

impl Rule {
    pub fn new(selector: Selector, action: Action) -> Self {
        Self { selector, action }
    }
}

/// A named, ordered list of rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    pub name: String,
    pub rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(name: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }

    /// Builder: Append a rule
    pub fn with_rule(mut self, selector: Selector, action: Action) -> Self {
        self.rules.push(Rule::new(selector, action));
        self
    }
}

/// Ordered rule sets; for any element, later rules overrule earlier ones
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub rule_sets: Vec<RuleSet>,
}

impl Profile {
    pub fn new(rule_sets: Vec<RuleSet>) -> Self {
        Self { rule_sets }
    }

    /// Names of the rule sets, in order
    pub fn names(&self) -> Vec<&str> {
        self.rule_sets.iter().map(|set| set.name.as_str()).collect()
    }

    /// Returns the action of the last rule matching the element, if any
    pub fn action_for(&self, tag: Tag, vr: VR) -> Option<&Action> {
        self.rule_sets
            .iter()
            .flat_map(|set| set.rules.iter())
            .filter(|rule| rule.selector.matches(tag, vr))
            .last()
            .map(|rule| &rule.action)
    }
}

/// Outcome of applying a profile
#[derive(Debug, Clone, PartialEq)]
pub enum RuleApplication {
    /// The profile was applied; holds the resulting data set
    Applied(InMemDicomObject),
    /// An attribute the engine requires is absent; the data set should be left as it was
    AttributeMissing(Tag),
}

/// Engine that executes a rule profile against a data set
///
/// Any error other than a missing attribute is returned as `Err` and
/// aborts de-identification of the record.
pub trait RuleEngine {
    fn apply(&self, dcm: &InMemDicomObject, profile: &Profile) -> Result<RuleApplication>;
}

/// Matches rules against the top-level elements of a data set
///
/// Elements not matched by any rule are kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicRuleEngine;

impl RuleEngine for BasicRuleEngine {
    fn apply(&self, dcm: &InMemDicomObject, profile: &Profile) -> Result<RuleApplication> {
        let mut result = dcm.clone();

        let actions: Vec<(Tag, VR, Action)> = dcm
            .iter()
            .filter_map(|elem| {
                profile
                    .action_for(elem.tag(), elem.vr())
                    .map(|action| (elem.tag(), elem.vr(), action.clone()))
            })
            .collect();

        for (tag, vr, action) in actions {
            match &action {
                Action::Keep => {}
                Action::Empty => {
                    result.put(DataElement::new(tag, vr, PrimitiveValue::Empty));
                }
                Action::Remove => {
                    result.remove_element(tag);
                }
                Action::Replace(value) => {
                    result.put(DataElement::new(tag, vr, PrimitiveValue::from(value.as_str())));
                }
            }
            debug!("{} -> {}", keyword_of(tag), action_name(&action));
        }

        Ok(RuleApplication::Applied(result))
    }
}

fn action_name(action: &Action) -> &'static str {
    match action {
        Action::Keep => "keep",
        Action::Empty => "empty",
        Action::Remove => "remove",
        Action::Replace(_) => "replace",
    }
}

/// Rules applied to every record
///
/// Removes or empties direct identifiers. Dates are left to the date shift,
/// times to the "remove all times" set, and the substituted identifiers are
/// left alone.
pub fn time_shift_rule_set() -> RuleSet {
    use Action::{Empty, Remove};
    use Selector::{Private, RepeatingGroup};
    let tag = Selector::Tag;

    RuleSet::new("custom time shift", Vec::new())
        .with_rule(tag(PATIENT_NAME), Empty)
        .with_rule(tag(OTHER_PATIENT_IDS), Remove)
        .with_rule(tag(OTHER_PATIENT_NAMES), Remove)
        .with_rule(tag(PATIENT_BIRTH_NAME), Remove)
        .with_rule(tag(PATIENT_ADDRESS), Remove)
        .with_rule(tag(PATIENT_MOTHER_BIRTH_NAME), Remove)
        .with_rule(tag(PATIENT_TELEPHONE_NUMBERS), Remove)
        .with_rule(tag(MEDICAL_RECORD_LOCATOR), Remove)
        .with_rule(tag(ACCESSION_NUMBER), Empty)
        .with_rule(tag(STUDY_ID), Empty)
        .with_rule(tag(REFERRING_PHYSICIAN_NAME), Empty)
        .with_rule(tag(PERFORMING_PHYSICIAN_NAME), Remove)
        .with_rule(tag(NAME_OF_PHYSICIANS_READING_STUDY), Remove)
        .with_rule(tag(OPERATORS_NAME), Remove)
        .with_rule(tag(REQUESTING_PHYSICIAN), Remove)
        .with_rule(tag(INSTITUTION_NAME), Remove)
        .with_rule(tag(INSTITUTION_ADDRESS), Remove)
        .with_rule(tag(INSTITUTIONAL_DEPARTMENT_NAME), Remove)
        .with_rule(tag(STATION_NAME), Remove)
        .with_rule(tag(DEVICE_SERIAL_NUMBER), Remove)
        .with_rule(RepeatingGroup(CURVE_DATA_GROUP), Remove)
        .with_rule(Private, Remove)
}

/// Removes every TM element; selected when dates are not shifted
pub fn remove_times_rule_set() -> RuleSet {
    RuleSet::new("remove all times", Vec::new()).with_rule(Selector::Vr(VR::TM), Action::Remove)
}
