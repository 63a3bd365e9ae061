pub mod instant;
pub mod skiplist;
pub mod slot_arena;

pub use instant::UniqueInstant;
pub use skiplist::{Entry, Iter, ScoreSkipList, SkipListConfig};
pub use slot_arena::{SlotArena, SlotId};
