//! Deterministic key ordering for maps.
//!
//! [`sorted_keys`] projects a mapping onto an ordered vector of its keys, either
//! by key or by value. One routine serves every key/value type pair: keys only
//! need [`Ord`], values implement [`SortValue`].
//!
//! ```
//! use anyfile::ordering::{sorted_keys, SortRule};
//! use std::collections::HashMap;
//!
//! let weights: HashMap<&str, f64> = [("p", -5.0), ("q", 3.0), ("r", -4.0)].into();
//! assert_eq!(
//!     sorted_keys(&weights, SortRule::ByValueAbsDescending),
//!     vec!["p", "r", "q"]
//! );
//! ```

mod sort_value;

pub use sort_value::SortValue;

use crate::error::{AnyfileError, Result};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

/// Ordering applied to the keys of a mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortRule {
    /// Natural order of the keys
    #[default]
    ByKeyAscending,
    /// Smallest value first
    ByValueAscending,
    /// Smallest magnitude first
    ByValueAbsAscending,
    /// Largest value first
    ByValueDescending,
    /// Largest magnitude first
    ByValueAbsDescending,
}

impl SortRule {
    /// All rules, in declaration order
    pub const ALL: [SortRule; 5] = [
        SortRule::ByKeyAscending,
        SortRule::ByValueAscending,
        SortRule::ByValueAbsAscending,
        SortRule::ByValueDescending,
        SortRule::ByValueAbsDescending,
    ];

    /// Short name accepted by [`FromStr`]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ByKeyAscending => "key",
            Self::ByValueAscending => "value-asc",
            Self::ByValueAbsAscending => "value-abs-asc",
            Self::ByValueDescending => "value-desc",
            Self::ByValueAbsDescending => "value-abs-desc",
        }
    }

    /// Compare two entries under this rule. Equal values fall back to key order.
    fn compare<K: Ord, V: SortValue>(&self, left: (&K, &V), right: (&K, &V)) -> Ordering {
        let by_value = match self {
            Self::ByKeyAscending => Ordering::Equal,
            Self::ByValueAscending => left.1.compare(right.1),
            Self::ByValueAbsAscending => left.1.compare_abs(right.1),
            Self::ByValueDescending => right.1.compare(left.1),
            Self::ByValueAbsDescending => right.1.compare_abs(left.1),
        };
        by_value.then_with(|| left.0.cmp(right.0))
    }
}

impl fmt::Display for SortRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortRule {
    type Err = AnyfileError;

    fn from_str(s: &str) -> Result<Self> {
        SortRule::ALL
            .into_iter()
            .find(|rule| rule.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                AnyfileError::invalid_argument(format!(
                    "unknown sort rule '{s}' (expected one of: key, value-asc, value-abs-asc, value-desc, value-abs-desc)"
                ))
            })
    }
}

/// Return every key of `mapping`, ordered by `rule`.
///
/// Accepts anything iterable as `(&K, &V)` pairs, so `&HashMap` and `&BTreeMap`
/// both work. The result is a permutation of the input keys. Entries comparing
/// equal under a value rule are ordered by key, which keeps output identical
/// across runs regardless of hash iteration order.
pub fn sorted_keys<'a, K, V, M>(mapping: M, rule: SortRule) -> Vec<K>
where
    M: IntoIterator<Item = (&'a K, &'a V)>,
    K: Ord + Clone + 'a,
    V: SortValue + 'a,
{
    let mut entries: Vec<(&K, &V)> = mapping.into_iter().collect();
    entries.sort_by(|left, right| rule.compare(*left, *right));
    entries.into_iter().map(|(key, _)| key.clone()).collect()
}

/// Concatenate `lists`, dropping repeated items. The first occurrence wins.
pub fn unique_keys<T, L>(lists: &[L]) -> Vec<T>
where
    T: Eq + Hash + Clone,
    L: AsRef<[T]>,
{
    let mut seen = HashSet::new();
    let mut keys = Vec::new();
    for item in lists.iter().flat_map(|list| list.as_ref()) {
        if seen.insert(item) {
            keys.push(item.clone());
        }
    }
    keys
}

/// Distinct items of `lists`, ascending.
pub fn sorted_unique_keys<T, L>(lists: &[L]) -> Vec<T>
where
    T: Eq + Hash + Ord + Clone,
    L: AsRef<[T]>,
{
    let mut keys = unique_keys(lists);
    keys.sort();
    keys
}
