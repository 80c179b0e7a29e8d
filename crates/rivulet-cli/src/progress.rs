//! Terminal progress bars for propagation passes.

use indicatif::{ProgressBar, ProgressStyle};
use rivulet_core::{Progress, ProgressObserver};

/// Draws one bar per top-level propagation pass on stderr.
pub struct BarObserver {
    style: ProgressStyle,
    bar: Option<ProgressBar>,
}

impl BarObserver {
    pub fn new() -> Self {
        let style = ProgressStyle::with_template("{msg:>20} [{bar:30.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-");
        Self { style, bar: None }
    }
}

impl Default for BarObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for BarObserver {
    fn begin(&mut self, label: &'static str, estimate: usize) {
        let bar = ProgressBar::new(estimate as u64);
        bar.set_style(self.style.clone());
        bar.set_message(label);
        self.bar = Some(bar);
    }

    fn step(&mut self, progress: Progress) {
        if let Some(bar) = &self.bar {
            bar.set_length(progress.max as u64);
            bar.set_position(progress.current as u64);
        }
    }

    fn finish(&mut self, recomputed: usize) {
        if let Some(bar) = self.bar.take() {
            bar.finish_with_message(format!("{recomputed} recomputed"));
        }
    }
}
