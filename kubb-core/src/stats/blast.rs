//! Statistics over Inkast & Blast sessions.
//!
//! Sign convention: a round's `performance_vs_target` is par minus batons
//! used, so positive is good. [`Handicap`] is the only type that converts it
//! for display; nothing else should flip the sign.

use serde::{Deserialize, Serialize};

use super::{per_event_ratio, ratio, recent_form, Polarity, RecentForm, TrendPoint};
use crate::blast::{BlastRound, BlastSession};
use crate::config::StatsConfig;
use crate::phase::{phase_of, GamePhase};

/// Mean performance against par over a set of rounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handicap {
    rounds: u32,
    total_performance: i64,
}

impl Handicap {
    pub fn from_rounds<'a, I>(rounds: I) -> Self
    where
        I: IntoIterator<Item = &'a BlastRound>,
    {
        rounds
            .into_iter()
            .fold(Handicap::default(), |mut handicap, round| {
                handicap.rounds += 1;
                handicap.total_performance += i64::from(round.performance_vs_target());
                handicap
            })
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Average batons under par per round. Higher is better.
    pub fn batons_under_target(&self) -> f64 {
        if self.rounds == 0 {
            return 0.0;
        }
        self.total_performance as f64 / f64::from(self.rounds)
    }

    /// Golf-style score: average batons over par. Lower is better.
    pub fn golf_score(&self) -> f64 {
        0.0 - self.batons_under_target()
    }

    /// Golf-style score of one round: batons over par.
    pub fn round_golf_score(performance_vs_target: i32) -> i32 {
        -performance_vs_target
    }
}

/// Pooled counters over any set of rounds.
#[derive(Debug, Clone, Copy, Default)]
struct RoundPool {
    rounds: u32,
    inkast_kubbs: u32,
    first_cast_in_bounds: u32,
    penalty_kubbs: u32,
    neighbor_kubbs: u32,
    initial_blast: u32,
    kubbs_cleared: u32,
    batons_used: u32,
    at_or_under_par: u32,
    best_performance: Option<i32>,
}

impl RoundPool {
    fn add(&mut self, round: &BlastRound) {
        self.rounds += 1;
        self.inkast_kubbs += round.inkast_kubbs();
        self.first_cast_in_bounds += round.first_cast_in_bounds();
        self.penalty_kubbs += round.penalty_kubbs();
        self.neighbor_kubbs += round.neighbor_kubbs();
        self.initial_blast += round.initial_blast();
        self.kubbs_cleared += round.kubbs_cleared();
        self.batons_used += round.batons_used();
        let performance = round.performance_vs_target();
        if performance >= 0 {
            self.at_or_under_par += 1;
        }
        self.best_performance = Some(
            self.best_performance
                .map_or(performance, |best| best.max(performance)),
        );
    }

    fn from_rounds<'a, I: IntoIterator<Item = &'a BlastRound>>(rounds: I) -> Self {
        let mut pool = RoundPool::default();
        for round in rounds {
            pool.add(round);
        }
        pool
    }
}

/// Breakdown for one difficulty band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseStats {
    pub phase: GamePhase,
    pub rounds: u32,
    /// Share of inkast kubbs that landed in bounds on the first attempt.
    pub first_cast_success_rate: f64,
    pub penalty_rate: f64,
    pub neighbor_rate: f64,
    /// Kubbs knocked down by the first baton, averaged per round.
    pub average_initial_blast: f64,
    pub kubbs_per_baton: f64,
    pub handicap: Handicap,
}

impl PhaseStats {
    fn from_pool(phase: GamePhase, pool: &RoundPool, handicap: Handicap) -> Self {
        Self {
            phase,
            rounds: pool.rounds,
            first_cast_success_rate: ratio(pool.first_cast_in_bounds, pool.inkast_kubbs),
            penalty_rate: ratio(pool.penalty_kubbs, pool.inkast_kubbs),
            neighbor_rate: ratio(pool.neighbor_kubbs, pool.inkast_kubbs),
            average_initial_blast: ratio(pool.initial_blast, pool.rounds),
            kubbs_per_baton: ratio(pool.kubbs_cleared, pool.batons_used),
            handicap,
        }
    }
}

/// Rounds whose kubb count falls in `phase`. `All` matches every round that
/// classifies into some band.
pub fn rounds_in_phase(
    sessions: &[BlastSession],
    phase: GamePhase,
) -> impl Iterator<Item = &BlastRound> {
    sessions
        .iter()
        .flat_map(|s| s.rounds().iter())
        .filter(move |r| match (phase, phase_of(r.inkast_kubbs())) {
            (_, None) => false,
            (GamePhase::All, Some(_)) => true,
            (wanted, Some(actual)) => wanted == actual,
        })
}

pub fn phase_stats(sessions: &[BlastSession], phase: GamePhase) -> PhaseStats {
    let pool = RoundPool::from_rounds(rounds_in_phase(sessions, phase));
    let handicap = Handicap::from_rounds(rounds_in_phase(sessions, phase));
    PhaseStats::from_pool(phase, &pool, handicap)
}

/// Early, Mid and End breakdowns, in that order.
pub fn phase_breakdown(sessions: &[BlastSession]) -> Vec<PhaseStats> {
    GamePhase::CLASSIFIED
        .iter()
        .map(|&phase| phase_stats(sessions, phase))
        .collect()
}

pub fn handicap(sessions: &[BlastSession]) -> Handicap {
    Handicap::from_rounds(sessions.iter().flat_map(|s| s.rounds().iter()))
}

/// Everything the history screen shows for Inkast & Blast sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlastStats {
    pub sessions: usize,
    pub rounds: u32,
    pub handicap: Handicap,
    /// Best single-round performance against par.
    pub best_round: Option<i32>,
    pub rounds_at_or_under_par: u32,
    pub average_kubbs_per_baton: f64,
    pub penalty_rate: f64,
    pub neighbor_rate: f64,
    pub inkasts_per_penalty: f64,
    pub first_cast_success_rate: f64,
    pub average_initial_blast: f64,
    /// Session golf scores, recent against overall.
    pub recent_form: RecentForm,
    pub handicap_trend: Vec<TrendPoint>,
    pub phases: Vec<PhaseStats>,
}

impl BlastStats {
    /// Best round as batons over par, on the same scale as the handicap.
    pub fn best_round_golf(&self) -> Option<i32> {
        self.best_round.map(Handicap::round_golf_score)
    }
}

pub fn blast_stats(sessions: &[BlastSession], config: &StatsConfig) -> BlastStats {
    let all_rounds = || sessions.iter().flat_map(|s| s.rounds().iter());
    let pool = RoundPool::from_rounds(all_rounds());
    let trend = handicap_trend(sessions);
    let scores: Vec<f64> = trend.iter().map(|p| p.value).collect();

    BlastStats {
        sessions: sessions.len(),
        rounds: pool.rounds,
        handicap: Handicap::from_rounds(all_rounds()),
        best_round: pool.best_performance,
        rounds_at_or_under_par: pool.at_or_under_par,
        average_kubbs_per_baton: ratio(pool.kubbs_cleared, pool.batons_used),
        penalty_rate: ratio(pool.penalty_kubbs, pool.inkast_kubbs),
        neighbor_rate: ratio(pool.neighbor_kubbs, pool.inkast_kubbs),
        inkasts_per_penalty: per_event_ratio(pool.inkast_kubbs, pool.penalty_kubbs),
        first_cast_success_rate: ratio(pool.first_cast_in_bounds, pool.inkast_kubbs),
        average_initial_blast: ratio(pool.initial_blast, pool.rounds),
        recent_form: recent_form(&scores, config.recent_window, Polarity::LowerIsBetter),
        handicap_trend: trend,
        phases: phase_breakdown(sessions),
    }
}

/// Per-session golf score in chronological order.
pub fn handicap_trend(sessions: &[BlastSession]) -> Vec<TrendPoint> {
    let mut ordered: Vec<_> = sessions.iter().collect();
    ordered.sort_by_key(|s| s.start_time());
    ordered
        .into_iter()
        .map(|s| TrendPoint {
            date: s.date(),
            value: s.handicap().golf_score(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Trend;
    use chrono::{Duration, Utc};

    fn round(inkast: u32, outs: (u32, u32, u32), blasts: &[u32]) -> BlastRound {
        let mut round = BlastRound::new(1, inkast).unwrap();
        round.record_inkast_results(outs.0, outs.1, outs.2).unwrap();
        for &kubbs in blasts {
            round.add_baton_throw(kubbs > 0, kubbs).unwrap();
        }
        assert!(round.is_complete());
        round
    }

    fn session(days_ago: i64, rounds: Vec<BlastRound>) -> BlastSession {
        let start = Utc::now() - Duration::days(days_ago);
        let mut session = BlastSession::starting_at(GamePhase::All, start);
        for r in rounds {
            session.add_round(r).unwrap();
        }
        session
    }

    #[test]
    fn handicap_signs() {
        // par 2 for four kubbs
        let under = round(4, (0, 0, 0), &[4]);
        let over = round(4, (0, 0, 0), &[1, 1, 1, 1]);
        assert_eq!(under.performance_vs_target(), 1);
        assert_eq!(over.performance_vs_target(), -2);

        let handicap = Handicap::from_rounds([&under, &over]);
        assert!((handicap.batons_under_target() + 0.5).abs() < 1e-9);
        assert!((handicap.golf_score() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn empty_handicap_is_positive_zero() {
        let handicap = handicap(&[]);
        assert_eq!(handicap.rounds(), 0);
        assert_eq!(handicap.golf_score(), 0.0);
        assert!(handicap.golf_score().is_sign_positive());
    }

    #[test]
    fn phases_bucket_by_inkast_count() {
        let sessions = [session(
            0,
            vec![
                round(2, (1, 0, 0), &[2]),
                round(6, (2, 1, 1), &[3, 0, 3]),
                round(9, (0, 0, 2), &[5, 4]),
                round(3, (0, 0, 0), &[1, 2]),
            ],
        )];
        let phases = phase_breakdown(&sessions);
        assert_eq!(phases.len(), 3);

        let early = &phases[0];
        assert_eq!(early.phase, GamePhase::Early);
        assert_eq!(early.rounds, 2);
        assert!((early.first_cast_success_rate - 4.0 / 5.0).abs() < 1e-9);
        assert!((early.average_initial_blast - 1.5).abs() < 1e-9);
        assert_eq!(early.penalty_rate, 0.0);

        let mid = &phases[1];
        assert_eq!(mid.rounds, 1);
        assert!((mid.penalty_rate - 1.0 / 6.0).abs() < 1e-9);
        assert!((mid.neighbor_rate - 1.0 / 6.0).abs() < 1e-9);
        assert!((mid.kubbs_per_baton - 2.0).abs() < 1e-9);
        assert_eq!(mid.handicap.batons_under_target(), 0.0);

        let end = &phases[2];
        assert_eq!(end.rounds, 1);
        assert_eq!(end.handicap.batons_under_target(), 2.0);

        assert_eq!(phase_stats(&sessions, GamePhase::All).rounds, 4);
    }

    #[test]
    fn empty_history_is_all_zero() {
        let stats = blast_stats(&[], &StatsConfig::default());
        assert_eq!(stats.rounds, 0);
        assert_eq!(stats.best_round, None);
        assert_eq!(stats.best_round_golf(), None);
        assert_eq!(stats.average_kubbs_per_baton, 0.0);
        assert_eq!(stats.inkasts_per_penalty, 0.0);
        assert_eq!(stats.recent_form.trend, Trend::Steady);
        assert!(stats.phases.iter().all(|p| p.rounds == 0));
    }

    #[test]
    fn overall_stats_pool_every_round() {
        let sessions = [
            session(1, vec![round(5, (1, 1, 0), &[2, 3])]),
            session(
                0,
                vec![
                    round(5, (0, 0, 1), &[5]),
                    round(8, (0, 0, 0), &[2, 2, 2, 1, 1]),
                ],
            ),
        ];
        let stats = blast_stats(&sessions, &StatsConfig::default());
        assert_eq!(stats.sessions, 2);
        assert_eq!(stats.rounds, 3);
        assert_eq!(stats.best_round, Some(2));
        assert_eq!(stats.best_round_golf(), Some(-2));
        assert_eq!(stats.rounds_at_or_under_par, 2);
        assert!((stats.inkasts_per_penalty - 18.0).abs() < 1e-9);
        assert!((stats.average_kubbs_per_baton - 18.0 / 8.0).abs() < 1e-9);
        assert_eq!(stats.handicap_trend.len(), 2);
        // older session: par 3 in 2 batons; newer: +2 and -1
        assert_eq!(stats.handicap_trend[0].value, -1.0);
        assert_eq!(stats.handicap_trend[1].value, -0.5);
    }

    #[test]
    fn no_penalties_uses_sentinel_ratio() {
        let sessions = [session(0, vec![round(7, (0, 0, 0), &[7])])];
        let stats = blast_stats(&sessions, &StatsConfig::default());
        assert_eq!(stats.inkasts_per_penalty, 7.0);
    }
}
