//! Statistics over finished sessions.
//!
//! Every function here is pure and read-only over a snapshot of sessions.
//! Empty input always yields a zero-valued result, never an error.

pub mod blast;
pub mod practice;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// `numerator / denominator`, or 0.0 when the denominator is zero.
pub fn ratio(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        f64::from(numerator) / f64::from(denominator)
    }
}

/// "X per event" ratio. With no events the numerator itself is returned, so
/// the value stays non-negative and grows with the numerator.
pub fn per_event_ratio(numerator: u32, events: u32) -> f64 {
    if events == 0 {
        f64::from(numerator)
    } else {
        f64::from(numerator) / f64::from(events)
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance.
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// Whether a bigger value of a metric is an improvement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    HigherIsBetter,
    LowerIsBetter,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Declining,
    #[default]
    Steady,
}

/// Recent sessions compared against the whole history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecentForm {
    pub recent: f64,
    pub overall: f64,
    pub sample: usize,
    pub polarity: Polarity,
    pub trend: Trend,
}

impl RecentForm {
    pub fn is_improving(&self) -> bool {
        self.trend == Trend::Improving
    }
}

/// Compare the mean of the last `window` values (fewer if not available)
/// with the mean of all values. `values` must be in chronological order.
pub fn recent_form(values: &[f64], window: usize, polarity: Polarity) -> RecentForm {
    let sample = window.min(values.len());
    let recent = mean(&values[values.len() - sample..]);
    let overall = mean(values);

    let trend = if recent == overall {
        Trend::Steady
    } else {
        let better = match polarity {
            Polarity::HigherIsBetter => recent > overall,
            Polarity::LowerIsBetter => recent < overall,
        };
        if better {
            Trend::Improving
        } else {
            Trend::Declining
        }
    };

    RecentForm {
        recent,
        overall,
        sample,
        polarity,
        trend,
    }
}

/// Consecutive-hit tracker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub current: u32,
    pub best: u32,
}

impl Streak {
    pub fn record(&mut self, hit: bool) {
        if hit {
            self.current += 1;
            self.best = self.best.max(self.current);
        } else {
            self.current = 0;
        }
    }

    pub fn from_outcomes<I: IntoIterator<Item = bool>>(outcomes: I) -> Self {
        let mut streak = Streak::default();
        for hit in outcomes {
            streak.record(hit);
        }
        streak
    }
}

/// One point of a per-session time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_guards_zero_denominator() {
        assert_eq!(ratio(3, 0), 0.0);
        assert!((ratio(1, 4) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn per_event_ratio_falls_back_to_numerator() {
        assert_eq!(per_event_ratio(12, 0), 12.0);
        assert!((per_event_ratio(12, 3) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn streak_resets_after_miss() {
        let mut streak = Streak::default();
        streak.record(true);
        streak.record(true);
        streak.record(false);
        assert_eq!(streak.current, 0);
        assert_eq!(streak.best, 2);

        let streak = Streak::from_outcomes([true, true, false, true, true, true]);
        assert_eq!(streak.best, 3);
        assert_eq!(streak.current, 3);
    }

    #[test]
    fn recent_form_respects_polarity() {
        let rising = [0.4, 0.5, 0.6, 0.7, 0.8, 0.9];
        let form = recent_form(&rising, 5, Polarity::HigherIsBetter);
        assert_eq!(form.sample, 5);
        assert!(form.is_improving());

        let form = recent_form(&rising, 5, Polarity::LowerIsBetter);
        assert_eq!(form.trend, Trend::Declining);
    }

    #[test]
    fn recent_form_on_short_history_uses_everything() {
        let form = recent_form(&[0.5, 0.7], 5, Polarity::HigherIsBetter);
        assert_eq!(form.sample, 2);
        assert_eq!(form.trend, Trend::Steady);
    }

    #[test]
    fn empty_inputs_are_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(variance(&[]), 0.0);
        let form = recent_form(&[], 5, Polarity::HigherIsBetter);
        assert_eq!(form.recent, 0.0);
        assert_eq!(form.sample, 0);
        assert_eq!(form.trend, Trend::Steady);
    }

    #[test]
    fn variance_is_population_variance() {
        assert!((variance(&[0.2, 0.4, 0.6]) - 0.08 / 3.0).abs() < 1e-12);
    }
}
