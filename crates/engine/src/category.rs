//! Free-text category labels used as grouping keys.

use std::{borrow::Borrow, fmt};

/// Colors handed out to categories in breakdown charts.
pub const CATEGORY_PALETTE: [&str; 8] = [
    "#8470FF", "#4CAF50", "#FF9800", "#E91E63", "#03A9F4", "#9C27B0", "#FFC107", "#607D8B",
];

/// A category label as typed by the user.
///
/// Categories are compared byte for byte: "Food" and "food" are two
/// different groups, matching how the store filters them.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Category(String);

impl Category {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display color for this category, picked from [`CATEGORY_PALETTE`].
    ///
    /// The index is the 32-bit FNV-1a hash of the label, so the same label
    /// maps to the same color in every process.
    pub fn color(&self) -> &'static str {
        let index = fnv1a(self.0.as_bytes()) as usize % CATEGORY_PALETTE.len();
        CATEGORY_PALETTE[index]
    }
}

fn fnv1a(bytes: &[u8]) -> u32 {
    const OFFSET_BASIS: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;

    bytes.iter().fold(OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(*byte)).wrapping_mul(PRIME)
    })
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Category {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv1a_matches_reference_vectors() {
        assert_eq!(fnv1a(b""), 0x811c_9dc5);
        assert_eq!(fnv1a(b"a"), 0xe40c_292c);
        assert_eq!(fnv1a(b"foobar"), 0xbf9c_f968);
    }

    #[test]
    fn color_is_stable_for_same_label() {
        let first = Category::from("Food").color();
        let second = Category::new(String::from("Food")).color();
        assert_eq!(first, second);
        assert!(CATEGORY_PALETTE.contains(&first));
    }
}
