//! Domain types representing expense categories.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::common::ParseEnumError;

/// Closed set of spending categories.
///
/// Declaration order is the canonical order used for stable aggregation and
/// for breaking ties between equal totals.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
pub enum Category {
    Food,
    Transportation,
    Entertainment,
    Shopping,
    Bills,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Food,
        Category::Transportation,
        Category::Entertainment,
        Category::Shopping,
        Category::Bills,
        Category::Other,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transportation => "Transportation",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Other => "Other",
        }
    }

    /// Position of the category within [`Category::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Comma separated list of every category name, for prompts and errors.
    pub fn names() -> String {
        Category::ALL
            .iter()
            .map(|category| category.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| {
                ParseEnumError::new(
                    "category",
                    needle,
                    "Food, Transportation, Entertainment, Shopping, Bills, Other",
                )
            })
    }
}
