//! One spinner per build phase.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

pub(crate) struct Phase {
    pb: ProgressBar,
    label: &'static str,
}

impl Phase {
    pub(crate) fn start(label: &'static str) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("  {spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars("/-\\|"));
        }
        pb.set_message(label);
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { pb, label }
    }

    /// Close the phase with a check mark and `detail`, or a cross on error.
    pub(crate) fn finish<T, E>(
        self,
        result: Result<T, E>,
        detail: impl FnOnce(&T) -> String,
    ) -> Result<T, E> {
        match &result {
            Ok(value) => {
                let detail = detail(value);
                self.done(detail);
            }
            Err(_) => self.fail(),
        }
        result
    }

    fn done(self, detail: String) {
        self.pb.finish_and_clear();
        eprintln!(
            "  {} {} {}",
            "\u{2713}".if_supports_color(Stderr, |t| t.green()),
            self.label,
            detail.if_supports_color(Stderr, |t| t.dimmed()),
        );
    }

    fn fail(self) {
        self.pb.finish_and_clear();
        eprintln!(
            "  {} {}",
            "\u{2717}".if_supports_color(Stderr, |t| t.red()),
            self.label
        );
    }
}
