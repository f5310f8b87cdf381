pub mod engine;
pub mod headless;
pub mod traits;
pub mod types;

pub use engine::PlaybackEngine;
pub use headless::HeadlessMedia;
pub use traits::MediaElement;
pub use types::{EngineUpdate, MediaEvent, MediaSlot, PlayerState, ProgressReport, ResumeOutcome};
