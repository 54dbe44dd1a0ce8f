//! chained-hashtable: a single-threaded separate-chaining hashtable with a
//! character-sum hash and load-factor driven resizing.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small associative container whose every moving part (hash,
//!   chains, resize policy) is explicit and testable in isolation.
//! - Layers:
//!   - `hash::bucket_index`: sums the UTF-16 code units of a key's
//!     `Display` text, reducing modulo the bucket count at each step.
//!   - `policy`: fixed thresholds. Grow x2 when the pre-insert load factor
//!     reaches 2; shrink /2 when the pre-delete load factor is at most 0.5;
//!     never below one bucket.
//!   - `HashTable<K, V>`: bucket array of chain heads over a `SlotMap`
//!     arena of entries, each linking to its successor.
//!
//! Constraints
//! - Single-threaded: `HashTable` is `Send` but not `Sync`. Share it behind
//!   one `Mutex` if several threads need it.
//! - Unique keys; duplicate inserts fail and leave the table untouched.
//! - No iteration API and no in-place update; values are written once on
//!   insert and moved out on delete.
//! - Keys need `Display` (for hashing) and `Eq` (for identity). Borrowed
//!   lookup forms must render the same text as the owned key.
//!
//! Resize
//! - Resize is a two-pass relink: detach all entries from the old chains,
//!   then append each one to the tail of its chain in the new bucket array.
//!   Entries never leave the arena, so `len()` is unaffected, and the relink
//!   pass does not consult the load policy, so resizes cannot cascade.
//! - Both checks run before the operation's own effect: insert looks at the
//!   load factor before the new entry is counted, delete before the entry
//!   is removed. After an insert the load factor is therefore at most 2.
//! - Failed operations never resize. Insert checks for a duplicate, and
//!   delete for a missing key, before the policy is consulted.
//!
//! Reentrancy policy
//! - Each public operation holds a debug-only guard. User code (`Display`,
//!   `Eq`) that re-enters the same table panics in debug builds. Resize
//!   holds a second guard that asserts it is never nested.
//!
//! Logging
//! - Resizes are reported through `tracing` at debug level. The crate does
//!   not install a subscriber.

pub mod error;
pub mod hash;
pub mod policy;
mod reentrancy;
mod table;
mod table_proptest;

// Public surface
pub use error::TableError;
pub use table::HashTable;
