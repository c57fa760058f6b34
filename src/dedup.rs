use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;

/// Insertion-ordered set: first occurrence wins, later duplicates are no-ops.
pub(crate) type OrderedSet<T> = IndexSet<T, FxBuildHasher>;
