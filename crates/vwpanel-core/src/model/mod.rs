// ── Domain model ──

pub mod entry;
pub mod group;
pub mod ssl;

pub use entry::{ConfigEntry, Comment, Section, Variable, entries_from_wire, entries_to_wire};
pub use group::{EntryGroup, group_by_section};
pub use ssl::{SlotStatus, SslStatus};
