pub mod memory;
pub mod trait_def;

pub use memory::MemorySessionStore;
pub use trait_def::{SessionStore, StoreError, StoreResult};

use uuid::Uuid;

/// Mint an opaque tracking identifier.
///
/// 128 random bits, so collisions over a process lifetime are negligible
/// and ids are not guessable from one another.
pub fn generate_tracking_id() -> String {
    Uuid::new_v4().to_string()
}
