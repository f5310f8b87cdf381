pub mod catalog;
pub mod identifiers;
pub mod session;

pub use catalog::{Category, VideoRecord};
pub use identifiers::{MediaRef, SessionId};
pub use session::{
    CountdownState, MiniSnapshot, PlaybackSession, SavedSession, is_known_duration,
};
