pub mod dates;
pub mod identifiers;
pub mod orchestrator;
pub mod pixel;
pub mod rules;

pub use dates::{date_elements, shift_dates};
pub use identifiers::{
    is_valid_long_string, is_valid_uid, substitute_identifiers, RandomUidGenerator, UidGenerator,
};
pub use orchestrator::Deidentifier;
pub use pixel::remove_pixel_data;
pub use rules::{
    remove_times_rule_set, time_shift_rule_set, Action, BasicRuleEngine, Profile, Rule,
    RuleApplication, RuleEngine, RuleSet, Selector,
};
