//! Immutable selection state for the category and precision controls.

use geocluster_types::category::{Category, CategorySet};
use geocluster_types::precision::Precision;
use serde::{Deserialize, Serialize};

/// Enabled categories plus the grouping precision.
///
/// Every interaction returns a new value; the previous one is left untouched.
/// The "all" checkbox has no state of its own: it is checked exactly when
/// the individual selection equals the full enumeration.
///
/// # Examples
///
/// ```
/// use geocluster::SelectionState;
/// use geocluster_types::category::Category;
///
/// let state = SelectionState::default();
/// assert!(state.is_all_selected());
///
/// let state = state.toggle(Category(3));
/// assert!(!state.is_all_selected());
///
/// let state = state.toggle(Category(3));
/// assert!(state.is_all_selected());
///
/// let state = state.with_all(false);
/// assert!(state.categories().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionState {
    #[serde(default = "CategorySet::all")]
    categories: CategorySet,
    #[serde(default)]
    precision: Precision,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            categories: CategorySet::all(),
            precision: Precision::None,
        }
    }
}

impl SelectionState {
    pub fn new(categories: CategorySet, precision: Precision) -> Self {
        Self {
            categories,
            precision,
        }
    }

    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn is_selected(&self, category: Category) -> bool {
        self.categories.contains(category)
    }

    /// State of the "all" checkbox.
    pub fn is_all_selected(&self) -> bool {
        self.categories.is_all()
    }

    /// Flip one category checkbox.
    pub fn toggle(&self, category: Category) -> Self {
        let categories = if self.categories.contains(category) {
            self.categories.without(category)
        } else {
            self.categories.with(category)
        };
        Self {
            categories,
            precision: self.precision,
        }
    }

    /// Set one category checkbox explicitly.
    pub fn with_category(&self, category: Category, selected: bool) -> Self {
        if self.categories.contains(category) == selected {
            return self.clone();
        }
        self.toggle(category)
    }

    /// Checking "all" selects every category; unchecking clears the selection.
    pub fn with_all(&self, checked: bool) -> Self {
        Self {
            categories: if checked {
                CategorySet::all()
            } else {
                CategorySet::empty()
            },
            precision: self.precision,
        }
    }

    pub fn with_categories(&self, categories: CategorySet) -> Self {
        Self {
            categories,
            precision: self.precision,
        }
    }

    pub fn with_precision(&self, precision: Precision) -> Self {
        Self {
            categories: self.categories.clone(),
            precision,
        }
    }
}
