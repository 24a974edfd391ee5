use crate::core::errors::{ClassifierError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::EnumCount;
use strum_macros::{Display, EnumCount, EnumIter, EnumString, IntoStaticStr};

/// Tumor categories the classifier distinguishes.
///
/// Declaration order is the positional order of the model's output vector:
/// probability `i` belongs to `ClassLabel::ALL[i]`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum ClassLabel {
    Glioma,
    Meningioma,
    #[serde(rename = "No Tumor")]
    #[strum(to_string = "No Tumor", serialize = "no-tumor", serialize = "notumor")]
    NoTumor,
    Pituitary,
}

impl ClassLabel {
    pub const ALL: [ClassLabel; ClassLabel::COUNT] = [
        ClassLabel::Glioma,
        ClassLabel::Meningioma,
        ClassLabel::NoTumor,
        ClassLabel::Pituitary,
    ];

    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Checks that a model emitting `width` scores lines up with the table.
    pub fn validate_output_width(width: usize) -> Result<()> {
        if width == Self::COUNT {
            Ok(())
        } else {
            Err(ClassifierError::DimensionMismatch {
                expected: Self::COUNT,
                actual: width,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn table_order_matches_declaration_order() {
        let iterated: Vec<ClassLabel> = ClassLabel::iter().collect();
        assert_eq!(iterated, ClassLabel::ALL.to_vec());
        for (i, label) in ClassLabel::ALL.iter().enumerate() {
            assert_eq!(label.index(), i);
            assert_eq!(ClassLabel::from_index(i), Some(*label));
        }
        assert_eq!(ClassLabel::from_index(4), None);
    }

    #[test]
    fn display_uses_human_readable_names() {
        let names: Vec<String> = ClassLabel::ALL.iter().map(|l| l.to_string()).collect();
        assert_eq!(names, ["Glioma", "Meningioma", "No Tumor", "Pituitary"]);
        let s: &'static str = ClassLabel::NoTumor.into();
        assert_eq!(s, "No Tumor");
    }

    #[test]
    fn parses_common_spellings() {
        assert_eq!(ClassLabel::from_str("No Tumor").unwrap(), ClassLabel::NoTumor);
        assert_eq!(ClassLabel::from_str("no-tumor").unwrap(), ClassLabel::NoTumor);
        assert_eq!(ClassLabel::from_str("glioma").unwrap(), ClassLabel::Glioma);
        assert!(ClassLabel::from_str("astrocytoma").is_err());
    }

    #[test]
    fn serializes_with_display_names() {
        let v = serde_json::to_value(ClassLabel::NoTumor).unwrap();
        assert_eq!(v, serde_json::json!("No Tumor"));
        let back: ClassLabel = serde_json::from_value(v).unwrap();
        assert_eq!(back, ClassLabel::NoTumor);
    }

    #[test]
    fn output_width_must_equal_class_count() {
        assert!(ClassLabel::validate_output_width(4).is_ok());
        match ClassLabel::validate_output_width(3) {
            Err(ClassifierError::DimensionMismatch { expected, actual }) => {
                assert_eq!((expected, actual), (4, 3));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
