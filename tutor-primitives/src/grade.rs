//! Grade level selection.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// School grade used to tailor the difficulty of an explanation.
///
/// Variants are declared in curriculum order; [`GradeLevel::ALL`] preserves it.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GradeLevel {
    /// Elementary school, first year.
    Elementary1,
    /// Elementary school, second year.
    Elementary2,
    /// Elementary school, third year.
    Elementary3,
    /// Elementary school, fourth year.
    Elementary4,
    /// Elementary school, fifth year.
    Elementary5,
    /// Elementary school, sixth year.
    Elementary6,
    /// Middle school, first year.
    Middle1,
    /// Middle school, second year.
    Middle2,
    /// Middle school, third year.
    Middle3,
    /// High school, first year.
    #[default]
    High1,
    /// High school, second year.
    High2,
    /// High school, third year.
    High3,
}

impl GradeLevel {
    /// Every grade, in display order.
    pub const ALL: [Self; 12] = [
        Self::Elementary1,
        Self::Elementary2,
        Self::Elementary3,
        Self::Elementary4,
        Self::Elementary5,
        Self::Elementary6,
        Self::Middle1,
        Self::Middle2,
        Self::Middle3,
        Self::High1,
        Self::High2,
        Self::High3,
    ];

    /// Returns the label shown to students and interpolated into prompts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Elementary1 => "초1",
            Self::Elementary2 => "초2",
            Self::Elementary3 => "초3",
            Self::Elementary4 => "초4",
            Self::Elementary5 => "초5",
            Self::Elementary6 => "초6",
            Self::Middle1 => "중1",
            Self::Middle2 => "중2",
            Self::Middle3 => "중3",
            Self::High1 => "고1",
            Self::High2 => "고2",
            Self::High3 => "고3",
        }
    }

    /// Returns the position of this grade within [`GradeLevel::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the grade at `index`, if any.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Looks up a grade by its label.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGradeLevel`] when no grade carries the label.
    pub fn from_label(label: &str) -> crate::Result<Self> {
        let trimmed = label.trim();
        Self::ALL
            .into_iter()
            .find(|grade| grade.label() == trimmed)
            .ok_or_else(|| Error::InvalidGradeLevel {
                label: label.to_owned(),
            })
    }
}

impl Display for GradeLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GradeLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s)
    }
}

impl TryFrom<String> for GradeLevel {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_label(&value)
    }
}

impl From<GradeLevel> for String {
    fn from(value: GradeLevel) -> Self {
        value.label().to_owned()
    }
}
