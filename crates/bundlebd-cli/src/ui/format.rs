//! Formatting for durations and target outcomes.

use std::time::Duration;

use bundlebd_bundler::{BuildCycle, OutcomeStatus, TargetOutcome};
use owo_colors::Style;

use super::messages::{self, paint};

/// Format duration in human-readable format.
///
/// ```
/// use std::time::Duration;
/// use bundlebd_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Print one target outcome: the status line, then its warnings or the
/// failure reason.
pub fn print_outcome(outcome: &TargetOutcome) {
    let line = match outcome.cycle {
        BuildCycle::Initial => outcome.to_string(),
        BuildCycle::Rebuild(n) => format!(
            "{} {}",
            outcome,
            paint(&format!("(rebuild #{})", n), Style::new().dimmed())
        ),
    };

    match &outcome.status {
        OutcomeStatus::Built => messages::success(&line),
        OutcomeStatus::Failed { reason } => {
            messages::error(&line);
            for reason_line in reason.lines() {
                eprintln!("    {}", reason_line);
            }
        }
    }

    for warning in &outcome.warnings {
        messages::warning(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_boundaries() {
        assert_eq!(format_duration(Duration::from_millis(999)), "999ms");
        assert_eq!(format_duration(Duration::from_millis(1000)), "1.00s");
        assert_eq!(format_duration(Duration::from_secs(60)), "1m 0s");
    }

    #[test]
    fn test_print_outcome() {
        print_outcome(&TargetOutcome::built("lib", BuildCycle::Initial, vec!["w".into()]));
        print_outcome(&TargetOutcome::failed("bin", BuildCycle::Rebuild(2), "a\nb"));
    }
}
