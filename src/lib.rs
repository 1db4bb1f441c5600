//! rw-rbmap: A thread-safe ordered map with structurally ordered keys.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: an in-memory key/value container that keeps entries sorted by
//!   a total order derived from the key's structure (no caller-supplied
//!   comparator) and is safe to use from many threads at once.
//! - Layers:
//!   - StructuralOrd (`order`): the comparison contract. A fallible
//!     `structural_cmp` so the dynamically-shaped key path can report
//!     shape mismatches as errors; static impls cover primitives,
//!     floats (IEEE total order), text, `Complex`, tuples, sequences,
//!     references, `Option`, and records via `structural_ord_fields!`.
//!   - Value (`value`): a runtime-shaped key enum; the one place
//!     `OrderError::ShapeMismatch` and `OrderError::Unorderable` occur.
//!   - RbTree (`tree`): a red-black tree over a `SlotMap` arena.
//!     Generational keys replace parent/child pointers, so the whole
//!     structure is safe Rust. Single-threaded; every comparing
//!     operation is fallible and fails before mutating any link.
//!   - RbMap (`map`): public facade owning `RwLock<RbTree>`. Shared
//!     lock for reads and traversal, exclusive for writes, all guards
//!     scoped RAII.
//!
//! Constraints
//! - Key equality is comparator equality: `put` on an equal key replaces
//!   the value in place, keeping the node (no rebalancing).
//! - Comparator failures are ordinary `Err` returns; they never unwind
//!   while a guard is held and never leave the tree partially rotated.
//! - Red-black violations are programming defects and panic (loudly),
//!   never an error variant.
//! - No entry escapes the map by reference: `get` and the iterators
//!   clone values out under the lock.
//!
//! Traversal and the read lock
//! - `iter`/`keys`/`values` are three projections over one in-order walk
//!   whose iterator owns a read guard. The guard drops exactly once,
//!   when the iterator is dropped (after natural exhaustion or on early
//!   abandonment), so an abandoned traversal cannot leak the lock.
//! - The cost of that consistency: writers block for as long as a
//!   traversal is alive. Consumers that hold iterators across slow work
//!   starve writers by construction.
//!
//! Notes and non-goals
//! - Not persistent, not distributed; one lock per map, never nested,
//!   so lock-ordering deadlocks are impossible by construction.
//! - No timeout or deadline machinery; traversal cancellation is
//!   cooperative (drop the iterator).
//! - `Set` keys (unordered collections) are deliberately unorderable and
//!   fail fast rather than sorting arbitrarily.

mod map;
mod order;
mod tree;
mod tree_proptest;
mod value;

// Public surface
pub use map::{Entries, Keys, RbMap, Values};
pub use order::{Complex, OrderError, Shape, StructuralOrd};
pub use tree::{InOrder, RbTree};
pub use value::Value;
