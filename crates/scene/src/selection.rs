use catalog::PoiCategory;
use serde::{Deserialize, Serialize};

/// Set of POI categories backed by a bitset.
///
/// Membership is tracked by `PoiCategory::index()`.
///
/// Ordering contract:
/// - Iteration yields categories in `PoiCategory::ALL` order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<PoiCategory>", from = "Vec<PoiCategory>")]
pub struct CategorySet {
    bits: u8,
}

impl CategorySet {
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Every category selected (the initial filter).
    pub fn all() -> Self {
        PoiCategory::ALL.into_iter().collect()
    }

    pub fn clear(&mut self) {
        self.bits = 0;
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn contains(&self, category: PoiCategory) -> bool {
        self.bits & mask(category) != 0
    }

    /// Returns `true` if the set changed.
    pub fn insert(&mut self, category: PoiCategory) -> bool {
        let before = self.bits;
        self.bits |= mask(category);
        before != self.bits
    }

    /// Returns `true` if the set changed.
    pub fn remove(&mut self, category: PoiCategory) -> bool {
        let before = self.bits;
        self.bits &= !mask(category);
        before != self.bits
    }

    /// Flip membership. Returns whether `category` is selected afterwards.
    pub fn toggle(&mut self, category: PoiCategory) -> bool {
        self.bits ^= mask(category);
        self.contains(category)
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            bits: self.bits & other.bits,
        }
    }

    /// Set difference: `self \ other`.
    pub fn diff(&self, other: &Self) -> Self {
        Self {
            bits: self.bits & !other.bits,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = PoiCategory> + '_ {
        PoiCategory::ALL.into_iter().filter(|c| self.contains(*c))
    }
}

impl Default for CategorySet {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<PoiCategory> for CategorySet {
    fn from_iter<I: IntoIterator<Item = PoiCategory>>(iter: I) -> Self {
        let mut set = Self::empty();
        for category in iter {
            set.insert(category);
        }
        set
    }
}

impl From<Vec<PoiCategory>> for CategorySet {
    fn from(categories: Vec<PoiCategory>) -> Self {
        categories.into_iter().collect()
    }
}

impl From<CategorySet> for Vec<PoiCategory> {
    fn from(set: CategorySet) -> Self {
        set.iter().collect()
    }
}

fn mask(category: PoiCategory) -> u8 {
    1u8 << category.index()
}
