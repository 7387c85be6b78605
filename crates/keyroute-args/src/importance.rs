//! Whether an argument must be present.

use std::fmt;

/// How a missing argument is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ArgumentImportance {
    /// Absence is an error.
    #[default]
    Required,
    /// Absence yields an empty argument.
    Optional,
}

impl ArgumentImportance {
    /// Returns `true` for [`ArgumentImportance::Required`].
    #[must_use]
    pub const fn is_required(self) -> bool {
        matches!(self, Self::Required)
    }

    /// Returns `true` for [`ArgumentImportance::Optional`].
    #[must_use]
    pub const fn is_optional(self) -> bool {
        matches!(self, Self::Optional)
    }
}

impl fmt::Display for ArgumentImportance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Required => "required",
            Self::Optional => "optional",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_importance() {
        assert!(ArgumentImportance::Required.is_required());
        assert!(ArgumentImportance::Optional.is_optional());
        assert_eq!(ArgumentImportance::default(), ArgumentImportance::Required);
        assert_eq!(ArgumentImportance::Optional.to_string(), "optional");
    }
}
