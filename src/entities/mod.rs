// Entity Models
// "Identity persists, values change"
//
// - Club: stable id, editable values, owned past events
// - College / Branch: fixed enumerations
// - ClubRegistry: the in-memory list every other component reads from

pub mod club;
pub mod college;

pub use club::{default_clubs, Club, ClubFields, ClubRegistry, CollegeClubs, PastEvent};
pub use college::{Branch, College};
