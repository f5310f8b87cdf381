use crate::models::VideoRecord;

/// Transport boundary to a single media resource handle.
///
/// Commands are fire-and-forget; the backend reports readiness, position,
/// completion and failures back as [`MediaEvent`](super::MediaEvent)s.
pub trait MediaElement: Send {
    /// Attach `video`'s resource, replacing whatever was loaded
    fn load(&mut self, video: &VideoRecord);
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, position_secs: f64);
    /// Release the resource handle
    fn unload(&mut self);
}
