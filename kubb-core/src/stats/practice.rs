//! Statistics over 8-meter practice sessions.

use serde::{Deserialize, Serialize};

use super::{mean, ratio, recent_form, variance, Polarity, RecentForm, Streak, TrendPoint};
use crate::config::StatsConfig;
use crate::practice::{PracticeRound, PracticeSession};

/// Best values reached in any single session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalRecords {
    pub best_accuracy: f64,
    pub longest_streak: u32,
    pub perfect_rounds: u32,
    pub most_baseline_clears: u32,
}

/// Early rounds against late rounds, pooled over all sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    pub early_accuracy: f64,
    pub late_accuracy: f64,
    /// `early_accuracy - late_accuracy`; positive means accuracy fades.
    pub drop_off: f64,
}

/// Everything the history screen shows for practice sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeStats {
    pub sessions: usize,
    pub total_throws: u32,
    pub total_hits: u32,
    pub accuracy: f64,
    pub streak: Streak,
    pub recent_form: RecentForm,
    pub records: PersonalRecords,
    pub clutch_accuracy: f64,
    pub first_throw_accuracy: f64,
    pub king_accuracy: f64,
    pub consistency: f64,
    pub progression: Progression,
    pub accuracy_trend: Vec<TrendPoint>,
}

pub fn practice_stats(sessions: &[PracticeSession], config: &StatsConfig) -> PracticeStats {
    let total_throws = sessions.iter().map(PracticeSession::total_batons).sum();
    let total_hits = sessions.iter().map(PracticeSession::hits).sum();

    PracticeStats {
        sessions: sessions.len(),
        total_throws,
        total_hits,
        accuracy: ratio(total_hits, total_throws),
        streak: streak(sessions),
        recent_form: form(sessions, config.recent_window),
        records: personal_records(sessions),
        clutch_accuracy: clutch_accuracy(sessions, config),
        first_throw_accuracy: first_throw_accuracy(sessions),
        king_accuracy: king_accuracy(sessions),
        consistency: consistency_score(sessions),
        progression: progression(sessions, config.early_round_limit),
        accuracy_trend: accuracy_trend(sessions),
    }
}

fn chronological(sessions: &[PracticeSession]) -> Vec<&PracticeSession> {
    let mut ordered: Vec<_> = sessions.iter().collect();
    ordered.sort_by_key(|s| s.start_time());
    ordered
}

fn rounds(sessions: &[PracticeSession]) -> impl Iterator<Item = &PracticeRound> {
    sessions.iter().flat_map(|s| s.rounds().iter())
}

/// Pooled hits over pooled throws.
pub fn accuracy(sessions: &[PracticeSession]) -> f64 {
    let hits = sessions.iter().map(PracticeSession::hits).sum();
    let throws = sessions.iter().map(PracticeSession::total_batons).sum();
    ratio(hits, throws)
}

/// Hit streak over every throw, sessions in chronological order and rounds
/// in sequence.
pub fn streak(sessions: &[PracticeSession]) -> Streak {
    Streak::from_outcomes(
        chronological(sessions)
            .into_iter()
            .flat_map(|s| s.rounds().iter())
            .flat_map(|r| r.throws().iter())
            .map(|t| t.is_hit()),
    )
}

fn session_streak(session: &PracticeSession) -> Streak {
    Streak::from_outcomes(
        session
            .rounds()
            .iter()
            .flat_map(|r| r.throws().iter())
            .map(|t| t.is_hit()),
    )
}

/// Session accuracy of the last `window` sessions against all sessions.
pub fn form(sessions: &[PracticeSession], window: usize) -> RecentForm {
    let values: Vec<f64> = chronological(sessions)
        .into_iter()
        .map(PracticeSession::accuracy)
        .collect();
    recent_form(&values, window, Polarity::HigherIsBetter)
}

pub fn personal_records(sessions: &[PracticeSession]) -> PersonalRecords {
    sessions
        .iter()
        .fold(PersonalRecords::default(), |mut records, session| {
            records.best_accuracy = records.best_accuracy.max(session.accuracy());
            records.longest_streak = records.longest_streak.max(session_streak(session).best);
            records.perfect_rounds += session.perfect_rounds();
            records.most_baseline_clears =
                records.most_baseline_clears.max(session.baseline_clears());
            records
        })
}

/// Accuracy of throws made while the round's hit count (before the throw)
/// sat inside the configured clutch band.
pub fn clutch_accuracy(sessions: &[PracticeSession], config: &StatsConfig) -> f64 {
    let mut throws = 0;
    let mut hits = 0;
    for round in rounds(sessions) {
        let mut hits_before = 0;
        for throw in round.throws() {
            if config.is_clutch(hits_before) {
                throws += 1;
                hits += u32::from(throw.is_hit());
            }
            hits_before += u32::from(throw.is_hit());
        }
    }
    ratio(hits, throws)
}

pub fn first_throw_accuracy(sessions: &[PracticeSession]) -> f64 {
    let firsts: Vec<bool> = rounds(sessions)
        .filter_map(|r| r.throws().first())
        .map(|t| t.is_hit())
        .collect();
    let hits = firsts.iter().filter(|&&hit| hit).count() as u32;
    ratio(hits, firsts.len() as u32)
}

pub fn king_accuracy(sessions: &[PracticeSession]) -> f64 {
    let throws = sessions.iter().map(PracticeSession::king_throws).sum();
    let hits = sessions.iter().map(PracticeSession::king_hits).sum();
    ratio(hits, throws)
}

/// `1 / (1 + variance)` of per-session accuracy. 0.0 with no sessions,
/// 1.0 with exactly one.
pub fn consistency_score(sessions: &[PracticeSession]) -> f64 {
    match sessions.len() {
        0 => 0.0,
        1 => 1.0,
        _ => {
            let accuracies: Vec<f64> = sessions.iter().map(PracticeSession::accuracy).collect();
            1.0 / (1.0 + variance(&accuracies))
        }
    }
}

pub fn progression(sessions: &[PracticeSession], early_round_limit: u32) -> Progression {
    let (mut early_hits, mut early_throws) = (0, 0);
    let (mut late_hits, mut late_throws) = (0, 0);
    for round in rounds(sessions) {
        if round.round_number() <= early_round_limit {
            early_hits += round.hits();
            early_throws += round.total_throws();
        } else {
            late_hits += round.hits();
            late_throws += round.total_throws();
        }
    }

    let early_accuracy = ratio(early_hits, early_throws);
    let late_accuracy = ratio(late_hits, late_throws);
    Progression {
        early_accuracy,
        late_accuracy,
        drop_off: early_accuracy - late_accuracy,
    }
}

pub fn accuracy_trend(sessions: &[PracticeSession]) -> Vec<TrendPoint> {
    chronological(sessions)
        .into_iter()
        .map(|s| TrendPoint {
            date: s.date(),
            value: s.accuracy(),
        })
        .collect()
}

/// Mean of per-session accuracies, each session weighted equally.
pub fn average_session_accuracy(sessions: &[PracticeSession]) -> f64 {
    let accuracies: Vec<f64> = sessions.iter().map(PracticeSession::accuracy).collect();
    mean(&accuracies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn session(days_ago: i64, rounds: &[&[bool]]) -> PracticeSession {
        let start = Utc::now() - Duration::days(days_ago);
        let target = rounds.iter().map(|r| r.len() as u32).sum::<u32>().max(1);
        let mut session = PracticeSession::starting_at(target, start).unwrap();
        for (i, outcomes) in rounds.iter().enumerate() {
            if i > 0 {
                session.start_next_round().unwrap();
            }
            for &hit in outcomes.iter() {
                session.record_throw(hit).unwrap();
            }
        }
        session
    }

    const PERFECT: &[bool] = &[true; 6];
    const BLANK: &[bool] = &[false; 6];

    #[test]
    fn empty_history_is_all_zero() {
        let stats = practice_stats(&[], &StatsConfig::default());
        assert_eq!(stats.accuracy, 0.0);
        assert_eq!(stats.records.longest_streak, 0);
        assert_eq!(stats.consistency, 0.0);
        assert_eq!(stats.clutch_accuracy, 0.0);
        assert_eq!(stats.first_throw_accuracy, 0.0);
        assert_eq!(stats.progression, Progression::default());
        assert!(stats.accuracy_trend.is_empty());
        assert_eq!(accuracy(&[]), 0.0);
    }

    #[test]
    fn streak_runs_across_rounds_and_sessions_in_date_order() {
        let newer = session(0, &[&[true, true, false, true, true, true]]);
        let older = session(1, &[&[false, false, false, false, true, true]]);
        // older ends with two hits, newer opens with two more
        let stats = streak(&[newer, older]);
        assert_eq!(stats.best, 4);
        assert_eq!(stats.current, 3);
    }

    #[test]
    fn records_pick_session_maxima() {
        let sessions = [
            session(2, &[PERFECT, BLANK]),
            session(1, &[PERFECT, &[true, true, true, true, true, false]]),
        ];
        let records = personal_records(&sessions);
        assert!((records.best_accuracy - 11.0 / 12.0).abs() < 1e-9);
        assert_eq!(records.longest_streak, 6 + 5);
        assert_eq!(records.perfect_rounds, 2);
        assert_eq!(records.most_baseline_clears, 2);
    }

    #[test]
    fn clutch_counts_throws_at_three_or_four_hits() {
        // hits before each throw: 0,1,2,3,3,4
        let sessions = [session(0, &[&[true, true, true, false, true, true]])];
        let clutch = clutch_accuracy(&sessions, &StatsConfig::default());
        assert!((clutch - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn first_throw_accuracy_uses_round_openers() {
        let sessions = [session(0, &[PERFECT, BLANK, &[true, false, false, false, false, false]])];
        assert!((first_throw_accuracy(&sessions) - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn consistency_penalizes_spread() {
        assert_eq!(consistency_score(&[session(0, &[PERFECT])]), 1.0);

        let same = [session(1, &[PERFECT]), session(0, &[PERFECT])];
        assert_eq!(consistency_score(&same), 1.0);

        let spread = [session(1, &[PERFECT]), session(0, &[BLANK])];
        // accuracies 1.0 and 0.0: variance 0.25
        assert!((consistency_score(&spread) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn progression_splits_after_round_three() {
        let sessions = [session(0, &[PERFECT, PERFECT, PERFECT, BLANK])];
        let p = progression(&sessions, 3);
        assert_eq!(p.early_accuracy, 1.0);
        assert_eq!(p.late_accuracy, 0.0);
        assert_eq!(p.drop_off, 1.0);
    }

    #[test]
    fn recent_form_looks_at_latest_sessions() {
        let mut sessions: Vec<_> = (0..6).map(|d| session(10 + d, &[BLANK])).collect();
        sessions.push(session(0, &[PERFECT]));
        let form = form(&sessions, 5);
        assert_eq!(form.sample, 5);
        assert!((form.recent - 0.2).abs() < 1e-9);
        assert!((form.overall - 1.0 / 7.0).abs() < 1e-9);
        assert!(form.is_improving());
    }

    #[test]
    fn king_accuracy_pools_king_throws() {
        let sessions = [session(
            0,
            &[PERFECT, &[true, true, true, true, true, false], BLANK],
        )];
        assert!((king_accuracy(&sessions) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn trend_is_chronological() {
        let sessions = [session(0, &[PERFECT]), session(3, &[BLANK])];
        let trend = accuracy_trend(&sessions);
        assert_eq!(trend.len(), 2);
        assert!(trend[0].date < trend[1].date);
        assert_eq!(trend[0].value, 0.0);
        assert_eq!(trend[1].value, 1.0);
        assert!((average_session_accuracy(&sessions) - 0.5).abs() < 1e-9);
    }
}
