//! Progress display while aggregating implementations

use evalboard_core::report::{BuildProgress, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Progress bar over the implementations of one leaderboard build
pub struct AggregationProgress {
    bar: ProgressBar,
}

impl AggregationProgress {
    /// Create a bar for `total` implementations; hidden when `hidden` is set
    pub fn new(total: usize, hidden: bool) -> Self {
        let bar = ProgressBar::new(total as u64);
        if hidden {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        } else if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.blue} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("=> "));
        }
        Self { bar }
    }

    /// A callback that advances this bar
    pub fn callback(&self) -> ProgressCallback {
        let bar = self.bar.clone();
        Box::new(move |progress: BuildProgress| {
            bar.set_message(format_message(&progress));
            bar.inc(1);
        })
    }

    /// Clear the bar once the build is done
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

fn format_message(progress: &BuildProgress) -> String {
    let suffix = if progress.included { "" } else { " (no runs)" };
    format!(
        "{}/{}{}",
        progress.server_group, progress.implementation, suffix
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(included: bool) -> BuildProgress {
        BuildProgress {
            current: 0,
            total: 1,
            server_group: "github".to_string(),
            implementation: "agent".to_string(),
            included,
        }
    }

    #[test]
    fn test_format_message() {
        assert_eq!(format_message(&progress(true)), "github/agent");
        assert_eq!(format_message(&progress(false)), "github/agent (no runs)");
    }

    #[test]
    fn test_callback_advances_bar() {
        let tracker = AggregationProgress::new(2, true);
        let callback = tracker.callback();
        callback(progress(true));
        callback(progress(false));
        assert_eq!(tracker.bar.position(), 2);
        tracker.finish();
    }
}
