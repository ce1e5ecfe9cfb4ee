/*!
Bit layout of mesytec VME data words.

Every category is described by one or more [`BitPattern`]s and every field by
a [`BitField`]. [`CLASSIFICATION_RULES`] lists the categories in the order
they are tested; the first rule whose pattern matches decides the category.
Nothing outside this module knows a mask or a shift.
*/

use serde::{Deserialize, Serialize};

/// A fixed bit pattern: the word matches when `word & mask == expect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitPattern {
    pub mask: u32,
    pub expect: u32,
}

impl BitPattern {
    pub const fn new(mask: u32, expect: u32) -> Self {
        Self { mask, expect }
    }

    /// Check if a word carries this pattern
    pub const fn matches(self, word: u32) -> bool {
        word & self.mask == self.expect
    }

    /// Check that no word can match both patterns.
    ///
    /// Two patterns are disjoint when they disagree on at least one bit that
    /// both of them test.
    pub const fn is_disjoint(self, other: BitPattern) -> bool {
        (self.expect ^ other.expect) & self.mask & other.mask != 0
    }
}

/// An unsigned field of `mask.count_ones()` bits starting at bit `shift`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    pub shift: u32,
    pub mask: u32,
}

impl BitField {
    pub const fn new(shift: u32, mask: u32) -> Self {
        Self { shift, mask }
    }

    /// Extract the field value from a word
    pub const fn extract(self, word: u32) -> u32 {
        (word >> self.shift) & self.mask
    }

    /// Number of bits in the field
    pub const fn width(self) -> u32 {
        self.mask.count_ones()
    }

    /// Largest value the field can hold
    pub const fn max_value(self) -> u32 {
        self.mask
    }

    /// The bits the field occupies within the word
    pub const fn span(self) -> u32 {
        self.mask << self.shift
    }
}

/// A named field of a category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field: BitField,
}

// Category patterns
pub const MODULE_HEADER: BitPattern = BitPattern::new(0xC000_0000, 0x4000_0000);
pub const DATA_WORD_MDPP: BitPattern = BitPattern::new(0xF000_0000, 0x1000_0000);
pub const DATA_WORD_MXDC: BitPattern = BitPattern::new(0xFF80_0000, 0x0400_0000);
pub const EXTENDED_TIMESTAMP: BitPattern = BitPattern::new(0xFF80_0000, 0x0480_0000);
pub const END_OF_EVENT: BitPattern = BitPattern::new(0xC000_0000, 0xC000_0000);
pub const FILL_WORD: BitPattern = BitPattern::new(0xFFFF_FFFF, 0x0000_0000);

// Module header fields
pub const DATA_LENGTH: BitField = BitField::new(0, 0x3FF);
pub const MODULE_SETTING: BitField = BitField::new(10, 0x3F);
pub const MODULE_ID: BitField = BitField::new(16, 0xFF);

// Data word fields
pub const CHANNEL_ADDRESS: BitField = BitField::new(16, 0x3F);
pub const MDPP_FLAGS: BitField = BitField::new(22, 0x3F);

// Extended timestamp fields
pub const HIGH_STAMP: BitField = BitField::new(0, 0xFFFF);

// End of event fields
pub const LOW_STAMP: BitField = BitField::new(0, 0x3FFF_FFFF);

/// Word categories, in classification priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    ModuleHeader,
    DataWord,
    ExtendedTimestamp,
    EndOfEvent,
    FillWord,
    Unrecognized,
}

impl Category {
    /// All categories, in classification priority order
    pub const ALL: [Category; 6] = [
        Self::ModuleHeader,
        Self::DataWord,
        Self::ExtendedTimestamp,
        Self::EndOfEvent,
        Self::FillWord,
        Self::Unrecognized,
    ];

    /// Label used when rendering a word of this category
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ModuleHeader => "module_header",
            Self::DataWord => "data_word",
            Self::ExtendedTimestamp => "extended_ts",
            Self::EndOfEvent => "end_of_event",
            Self::FillWord => "fill_word",
            Self::Unrecognized => "unrecognized",
        }
    }

    /// Position in [`Category::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The classification rule of this category.
    ///
    /// `Unrecognized` has no rule: it is what is left when no rule matches.
    pub fn rule(self) -> Option<&'static ClassificationRule> {
        CLASSIFICATION_RULES.iter().find(|rule| rule.category == self)
    }

    /// Test this category's patterns alone, ignoring priority
    pub fn matches(self, word: u32) -> bool {
        match self.rule() {
            Some(rule) => rule.matches(word),
            None => !CLASSIFICATION_RULES.iter().any(|rule| rule.matches(word)),
        }
    }

    /// Fields carried by words of this category
    pub fn fields(self) -> &'static [FieldSpec] {
        match self.rule() {
            Some(rule) => rule.fields,
            None => &[],
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the classification table
#[derive(Debug)]
pub struct ClassificationRule {
    pub category: Category,
    /// The rule matches when any of these patterns matches
    pub patterns: &'static [BitPattern],
    pub fields: &'static [FieldSpec],
}

impl ClassificationRule {
    pub fn matches(&self, word: u32) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(word))
    }
}

/// Classification table, highest priority first
pub static CLASSIFICATION_RULES: [ClassificationRule; 5] = [
    ClassificationRule {
        category: Category::ModuleHeader,
        patterns: &[MODULE_HEADER],
        fields: &[
            FieldSpec { name: "module_id", field: MODULE_ID },
            FieldSpec { name: "module_setting", field: MODULE_SETTING },
            FieldSpec { name: "data_length", field: DATA_LENGTH },
        ],
    },
    ClassificationRule {
        category: Category::DataWord,
        patterns: &[DATA_WORD_MDPP, DATA_WORD_MXDC],
        fields: &[
            FieldSpec { name: "channel_address", field: CHANNEL_ADDRESS },
            FieldSpec { name: "mdpp_flags", field: MDPP_FLAGS },
        ],
    },
    ClassificationRule {
        category: Category::ExtendedTimestamp,
        patterns: &[EXTENDED_TIMESTAMP],
        fields: &[FieldSpec { name: "high_stamp", field: HIGH_STAMP }],
    },
    ClassificationRule {
        category: Category::EndOfEvent,
        patterns: &[END_OF_EVENT],
        fields: &[FieldSpec { name: "low_stamp", field: LOW_STAMP }],
    },
    ClassificationRule {
        category: Category::FillWord,
        patterns: &[FILL_WORD],
        fields: &[],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{HIGH_STAMP_BITS, LOW_STAMP_BITS, MAX_DATA_LENGTH};

    #[test]
    fn test_patterns_are_well_formed() {
        for rule in &CLASSIFICATION_RULES {
            for pattern in rule.patterns {
                assert_eq!(
                    pattern.expect & !pattern.mask,
                    0,
                    "{} pattern expects bits outside its mask",
                    rule.category
                );
            }
        }
    }

    #[test]
    fn test_patterns_of_different_categories_are_disjoint() {
        for (i, a) in CLASSIFICATION_RULES.iter().enumerate() {
            for b in &CLASSIFICATION_RULES[i + 1..] {
                for pa in a.patterns {
                    for pb in b.patterns {
                        assert!(
                            pa.is_disjoint(*pb),
                            "{} and {} patterns overlap",
                            a.category,
                            b.category
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_mxdc_data_and_extended_timestamp_differ_in_bit_23() {
        assert_eq!(DATA_WORD_MXDC.mask, EXTENDED_TIMESTAMP.mask);
        assert_eq!(DATA_WORD_MXDC.expect ^ EXTENDED_TIMESTAMP.expect, 1 << 23);
    }

    #[test]
    fn test_fields_within_a_category_do_not_overlap() {
        for category in Category::ALL {
            let fields = category.fields();
            for (i, a) in fields.iter().enumerate() {
                for b in &fields[i + 1..] {
                    assert_eq!(a.field.span() & b.field.span(), 0, "{} overlaps {}", a.name, b.name);
                }
            }
        }
    }

    #[test]
    fn test_fields_stay_clear_of_their_category_bits() {
        // MxDC data words reuse bits 23..27 for flags, so only single-pattern rules are checked
        for rule in CLASSIFICATION_RULES.iter().filter(|rule| rule.patterns.len() == 1) {
            for spec in rule.fields {
                assert_eq!(spec.field.span() & rule.patterns[0].mask, 0, "{} overlaps its pattern", spec.name);
            }
        }
    }

    #[test]
    fn test_field_widths() {
        assert_eq!(DATA_LENGTH.max_value(), MAX_DATA_LENGTH as u32);
        assert_eq!(MODULE_SETTING.width(), 6);
        assert_eq!(MODULE_ID.width(), 8);
        assert_eq!(CHANNEL_ADDRESS.width(), 6);
        assert_eq!(MDPP_FLAGS.width(), 6);
        assert_eq!(HIGH_STAMP.width(), HIGH_STAMP_BITS);
        assert_eq!(LOW_STAMP.width(), LOW_STAMP_BITS);
    }

    #[test]
    fn test_field_extraction() {
        assert_eq!(DATA_LENGTH.extract(0x4001_0c07), 7);
        assert_eq!(MODULE_SETTING.extract(0x4001_0c07), 0x3);
        assert_eq!(MODULE_ID.extract(0x4001_0c07), 0x01);
        assert_eq!(CHANNEL_ADDRESS.extract(0x1030_02aa), 48);
        assert_eq!(MDPP_FLAGS.extract(0x1FC0_0000), 0x3F);
        assert_eq!(LOW_STAMP.extract(0xc18d_01bd), 26_018_237);
    }

    #[test]
    fn test_rule_order_is_priority_order() {
        let order: Vec<Category> = CLASSIFICATION_RULES.iter().map(|rule| rule.category).collect();
        assert_eq!(order, &Category::ALL[..5]);
        assert!(Category::Unrecognized.rule().is_none());
        assert!(Category::Unrecognized.fields().is_empty());
        assert!(Category::FillWord.fields().is_empty());
    }

    #[test]
    fn test_category_matches() {
        assert!(Category::ModuleHeader.matches(0x4001_0c07));
        assert!(Category::DataWord.matches(0x0400_1234));
        assert!(!Category::DataWord.matches(0x0480_1234));
        assert!(Category::ExtendedTimestamp.matches(0x0480_1234));
        assert!(Category::FillWord.matches(0));
        assert!(!Category::Unrecognized.matches(0));
        assert!(Category::Unrecognized.matches(0x8000_0000));
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::ExtendedTimestamp.to_string(), "extended_ts");
        assert_eq!(Category::EndOfEvent.as_str(), "end_of_event");
        for (i, category) in Category::ALL.into_iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }
}
