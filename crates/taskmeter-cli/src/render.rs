//! Text rendering for the terminal.

use taskmeter_core::format::{format_clock, format_currency, format_projection};
use taskmeter_core::{CurrencyConfig, ProjectionRecord, Session, Timer};

const BAR_WIDTH: usize = 20;

fn progress_bar(pct: f64) -> String {
    let filled = ((pct / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

pub fn timer_line(timer: &Timer) -> String {
    format!(
        "{:>3}  {}  {} {}  {}",
        timer.id,
        format_clock(timer.remaining_secs()),
        progress_bar(timer.progress_pct()),
        if timer.is_running() { "Pause" } else { "Start" },
        timer.title,
    )
}

/// Compact one-line view of running clocks, refreshed on every tick.
pub fn running_line(session: &Session) -> String {
    session
        .timers()
        .timers()
        .iter()
        .filter(|t| t.is_running())
        .map(|t| format!("[{}] {}", t.id, format_clock(t.remaining_secs())))
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn projection_caption(record: &ProjectionRecord) -> String {
    format!(
        "If you earn this amount daily for {} years with a {}% daily interest:",
        record.params.years,
        record.params.daily_rate_pct.normalize()
    )
}

pub fn status(session: &Session, currency: &CurrencyConfig) -> String {
    let mut out = String::new();
    for timer in session.timers().timers() {
        out.push_str(&timer_line(timer));
        out.push('\n');
    }
    if let Some(total) = session.total_earnings() {
        out.push_str(&format!(
            "Total Earnings From This Session: {}\n",
            format_currency(total, currency)
        ));
    }
    let params = session.params();
    out.push_str(&format!(
        "Projection inputs: {} years, {}% daily\n",
        params.years,
        params.daily_rate_pct.normalize()
    ));
    if let Some(record) = session.projection() {
        out.push_str(&projection_caption(record));
        out.push('\n');
        out.push_str(&format_projection(&record.outcome, currency));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskmeter_core::Config;

    #[test]
    fn progress_bar_bounds() {
        assert_eq!(progress_bar(0.0), format!("[{}]", "-".repeat(BAR_WIDTH)));
        assert_eq!(progress_bar(100.0), format!("[{}]", "#".repeat(BAR_WIDTH)));
        assert_eq!(progress_bar(50.0).matches('#').count(), BAR_WIDTH / 2);
    }

    #[test]
    fn status_shows_totals_and_projection() {
        let config = Config::default();
        let mut session = Session::from_config(&config);
        session.record_elapsed(1, 600);
        session.stop_all_and_compute_earnings().unwrap();
        session.set_years(1);
        session.project();

        let text = status(&session, &config.currency);
        assert!(text.contains("20:00"));
        assert!(text.contains("Total Earnings From This Session: 100.000 ₫"));
        assert!(text.contains("for 1 years with a 0.5% daily interest"));
        assert!(text.contains("103.493.055 ₫"));
    }

    #[test]
    fn running_line_lists_only_running() {
        let mut session = Session::from_config(&Config::default());
        assert_eq!(running_line(&session), "");
        session.toggle(2);
        session.tick();
        assert_eq!(running_line(&session), "[2] 29:59");
    }
}
