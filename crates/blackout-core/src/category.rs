//! Redaction categories

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of sensitive text a span belongs to.
///
/// The declaration order is the fixed pass order and also the tie-break priority used by the
/// conflict resolver (names win over dates, dates over phones, and so on).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Personal names
    Name,

    /// Calendar dates
    Date,

    /// Phone numbers
    Phone,

    /// Postal addresses
    Address,

    /// Sentences related to a user supplied concept
    Concept,
}

impl Category {
    /// All categories in pass order.
    pub const ALL: [Category; 5] = [
        Category::Name,
        Category::Date,
        Category::Phone,
        Category::Address,
        Category::Concept,
    ];

    /// Singular tag used in redaction records (`"name"`, `"date"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Name => "name",
            Category::Date => "date",
            Category::Phone => "phone",
            Category::Address => "address",
            Category::Concept => "concept",
        }
    }

    /// Plural key used in redaction count maps (`"names"`, `"addresses"`, ...).
    pub fn plural(self) -> &'static str {
        match self {
            Category::Name => "names",
            Category::Date => "dates",
            Category::Phone => "phones",
            Category::Address => "addresses",
            Category::Concept => "concepts",
        }
    }

    /// Tie-break priority, lower wins.
    pub fn priority(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
