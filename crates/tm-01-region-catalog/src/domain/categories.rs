//! Attack category lookup table.

use rand::Rng;
use shared_types::Category;

use crate::domain::builtin::builtin_categories;

/// Label of the category used when the table is empty.
pub const FALLBACK_CATEGORY_LABEL: &str = "Unknown";

/// Colour token of the fallback category.
pub const FALLBACK_CATEGORY_COLOR: &str = "#9ca3af";

/// Immutable table of attack categories.
#[derive(Debug, Clone, Default)]
pub struct CategoryTable {
    categories: Vec<Category>,
}

impl CategoryTable {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn builtin() -> Self {
        Self::new(builtin_categories())
    }

    pub fn fallback() -> Category {
        Category::new(FALLBACK_CATEGORY_LABEL, FALLBACK_CATEGORY_COLOR)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a category by label, case-insensitively.
    pub fn by_label(&self, label: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|c| c.label.eq_ignore_ascii_case(label))
    }

    /// Uniform pick; the fallback category when the table is empty.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Category {
        if self.categories.is_empty() {
            return Self::fallback();
        }
        self.categories[rng.gen_range(0..self.categories.len())].clone()
    }
}
