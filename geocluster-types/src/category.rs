use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;

/// A point's categorical "type" tag.
///
/// Categories compare by raw integer equality. Values outside
/// [`Category::KNOWN`] are legal: they never match the default enumeration
/// but still filter and cluster like any other value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(pub i64);

impl Category {
    /// The fixed enumeration offered by the category controls.
    pub const KNOWN: RangeInclusive<i64> = 1..=10;

    /// Raw integer value.
    pub fn value(self) -> i64 {
        self.0
    }

    /// Whether this category belongs to the fixed enumeration.
    pub fn is_known(self) -> bool {
        Self::KNOWN.contains(&self.0)
    }
}

impl From<i64> for Category {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered set of selected categories.
///
/// Ordered so that two sets with the same members hash and compare equal
/// regardless of insertion order.
///
/// # Examples
///
/// ```
/// use geocluster_types::category::{Category, CategorySet};
///
/// let all = CategorySet::all();
/// assert_eq!(all.len(), 10);
/// assert!(all.is_all());
///
/// let some: CategorySet = [1, 2].into_iter().collect();
/// assert!(some.contains(Category(2)));
/// assert!(!some.is_all());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorySet(BTreeSet<Category>);

impl CategorySet {
    /// An empty selection.
    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    /// Every category of the fixed enumeration.
    pub fn all() -> Self {
        Category::KNOWN.map(Category).collect()
    }

    pub fn contains(&self, category: Category) -> bool {
        self.0.contains(&category)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True exactly when the set equals the full enumeration.
    pub fn is_all(&self) -> bool {
        self.0.len() == Category::KNOWN.count() && self.0.iter().all(|c| c.is_known())
    }

    /// Returns a copy with `category` added.
    pub fn with(&self, category: Category) -> Self {
        let mut next = self.0.clone();
        next.insert(category);
        Self(next)
    }

    /// Returns a copy with `category` removed.
    pub fn without(&self, category: Category) -> Self {
        let mut next = self.0.clone();
        next.remove(&category);
        Self(next)
    }

    /// Returns the union of both sets.
    pub fn union(&self, other: &CategorySet) -> Self {
        Self(self.0.union(&other.0).copied().collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = Category> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Category> for CategorySet {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromIterator<i64> for CategorySet {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self(iter.into_iter().map(Category).collect())
    }
}
