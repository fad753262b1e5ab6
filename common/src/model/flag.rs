use serde::{Deserialize, Serialize};
use std::fmt;

/// Quality rating an intern assigns to one CSV row.
///
/// Serialized as its integer value (`1` to `4`), which is also the value written
/// to the `intern_flag` column of the exported CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Flag {
    Absent = 1,
    Good = 2,
    Bad = 3,
    VeryBad = 4,
}

impl Flag {
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Flag::Absent => "Absent",
            Flag::Good => "Good",
            Flag::Bad => "Bad",
            Flag::VeryBad => "Very Bad",
        }
    }
}

impl TryFrom<u8> for Flag {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Flag::Absent),
            2 => Ok(Flag::Good),
            3 => Ok(Flag::Bad),
            4 => Ok(Flag::VeryBad),
            other => Err(format!("invalid flag value {other}, expected 1 to 4")),
        }
    }
}

impl From<Flag> for u8 {
    fn from(flag: Flag) -> u8 {
        flag.value()
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}
