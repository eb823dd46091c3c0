//! Plain-text statistics report.

use chrono::NaiveDate;
use kubb_core::session::finished_sessions;
use kubb_core::stats::blast::{blast_stats, BlastStats, PhaseStats};
use kubb_core::stats::practice::{practice_stats, PracticeStats};
use kubb_core::stats::Trend;
use kubb_core::{Session, StatsConfig};

pub fn render(history: &[Session], today: NaiveDate, config: &StatsConfig) -> String {
    let (practice, blast) = finished_sessions(history, today);
    if practice.is_empty() && blast.is_empty() {
        return "No finished sessions.".to_string();
    }

    let mut out = String::new();
    if !practice.is_empty() {
        out.push_str(&render_practice(&practice_stats(&practice, config)));
    }
    if !blast.is_empty() {
        out.push_str(&render_blast(&blast_stats(&blast, config)));
    }
    out
}

fn pct(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

fn trend_label(trend: Trend) -> &'static str {
    match trend {
        Trend::Improving => "improving",
        Trend::Declining => "declining",
        Trend::Steady => "steady",
    }
}

fn render_practice(stats: &PracticeStats) -> String {
    let records = &stats.records;
    format!(
        "== 8m practice ({} sessions) ==\n\
         accuracy:        {} ({}/{})\n\
         recent form:     {} vs {} overall, {}\n\
         first throw:     {}\n\
         clutch:          {}\n\
         king:            {}\n\
         consistency:     {:.3}\n\
         early/late:      {} / {} (drop-off {:+.1} pts)\n\
         streak:          best {}, current {}\n\
         records:         best session {}, longest streak {}, perfect rounds {}, most baseline clears {}\n",
        stats.sessions,
        pct(stats.accuracy),
        stats.total_hits,
        stats.total_throws,
        pct(stats.recent_form.recent),
        pct(stats.recent_form.overall),
        trend_label(stats.recent_form.trend),
        pct(stats.first_throw_accuracy),
        pct(stats.clutch_accuracy),
        pct(stats.king_accuracy),
        stats.consistency,
        pct(stats.progression.early_accuracy),
        pct(stats.progression.late_accuracy),
        stats.progression.drop_off * 100.0,
        stats.streak.best,
        stats.streak.current,
        pct(records.best_accuracy),
        records.longest_streak,
        records.perfect_rounds,
        records.most_baseline_clears,
    )
}

fn render_blast(stats: &BlastStats) -> String {
    let best_round = stats
        .best_round_golf()
        .map(|golf| format!("best round:      {:+} batons vs par\n", golf))
        .unwrap_or_default();
    let phases: String = stats
        .phases
        .iter()
        .filter(|p| p.rounds > 0)
        .map(render_phase)
        .collect();

    format!(
        "== Inkast & Blast ({} sessions, {} rounds) ==\n\
         handicap:        {:+.2} (golf score, lower is better)\n\
         recent form:     {:+.2} vs {:+.2} overall, {}\n\
         {}\
         at or under par: {}/{}\n\
         kubbs/baton:     {:.2}\n\
         inkast:          first cast {}, penalty {}, neighbors {}, {:.1} kubbs per penalty\n\
         initial blast:   {:.2} kubbs\n\
         {}",
        stats.sessions,
        stats.rounds,
        stats.handicap.golf_score(),
        stats.recent_form.recent,
        stats.recent_form.overall,
        trend_label(stats.recent_form.trend),
        best_round,
        stats.rounds_at_or_under_par,
        stats.rounds,
        stats.average_kubbs_per_baton,
        pct(stats.first_cast_success_rate),
        pct(stats.penalty_rate),
        pct(stats.neighbor_rate),
        stats.inkasts_per_penalty,
        stats.average_initial_blast,
        phases,
    )
}

fn render_phase(phase: &PhaseStats) -> String {
    format!(
        "  {:<22} rounds {:>3}  handicap {:+.2}  kubbs/baton {:.2}  penalty {}\n",
        phase.phase.to_string(),
        phase.rounds,
        phase.handicap.golf_score(),
        phase.kubbs_per_baton,
        pct(phase.penalty_rate)
    )
}
