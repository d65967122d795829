//! Progress indicator for key derivation using indicatif.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::context::UiContext;
use super::theme::spinner_frames;

/// A spinner for indeterminate progress, drawn on stderr.
///
/// Stays silent outside an interactive pretty terminal so piped stdout and
/// JSON output are never disturbed.
pub struct Spinner {
    bar: Option<ProgressBar>,
}

impl Spinner {
    /// Create and start a spinner with the given message.
    pub fn start(ctx: &UiContext, message: &str) -> Self {
        if !ctx.allows_animation() {
            return Self { bar: None };
        }

        let template = if ctx.color {
            "{spinner:.cyan} {msg}..."
        } else {
            "{spinner} {msg}..."
        };
        let style = match ProgressStyle::default_spinner().template(template) {
            Ok(style) => style.tick_strings(spinner_frames(ctx.unicode)),
            Err(_) => ProgressStyle::default_spinner(),
        };

        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        bar.set_style(style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar: Some(bar) }
    }

    /// Stop the spinner and clear its line.
    pub fn finish(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}
