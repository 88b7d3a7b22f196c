use ratatui::{backend::Backend, Frame, Terminal};

use crate::clock::{AnimationClock, FrameScheduler};

/// Trait for rendering a terminal on the samples of an [`AnimationClock`].
pub trait RenderOnClock {
    /// Redraws the terminal on every sample published by `clock`.
    ///
    /// The callback receives the frame to draw and the sampled time in
    /// milliseconds. It replaces any previous subscriber of the clock.
    fn render_on_clock<S, F>(self, clock: &AnimationClock<S>, render_callback: F)
    where
        S: FrameScheduler + 'static,
        F: FnMut(&mut Frame, i64) + 'static;
}

/// Implement [`RenderOnClock`] for Ratatui's [`Terminal`].
impl<T> RenderOnClock for Terminal<T>
where
    T: Backend + 'static,
{
    fn render_on_clock<S, F>(mut self, clock: &AnimationClock<S>, mut render_callback: F)
    where
        S: FrameScheduler + 'static,
        F: FnMut(&mut Frame, i64) + 'static,
    {
        clock.on_sample(move |time| {
            if let Err(error) = self.draw(|frame| render_callback(frame, time)) {
                tracing::error!(%error, time, "unable to draw frame");
            }
        });
    }
}
