//! Simulated training sessions driven by a pluggable thrower.
//!
//! The drivers only use the public session and round operations, so a
//! simulated session obeys exactly the same rules as a recorded one.

use log::warn;
use rand::{Rng, RngCore};

use crate::blast::BlastSession;
use crate::error::{KubbError, KubbResult};
use crate::phase::GamePhase;
use crate::practice::PracticeSession;
use crate::throw::ThrowKind;

/// Batons a simulated thrower gets before a blast round is abandoned.
pub const MAX_BATONS_PER_ROUND: u32 = 60;

/// State of a practice round right before a throw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrowContext {
    pub round_number: u32,
    /// 1-based position of the upcoming throw in its round.
    pub throw_number: u32,
    pub hits_in_round: u32,
    pub kind: ThrowKind,
}

/// State of a blast round right before a baton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlastContext {
    pub round_number: u32,
    pub baton: u32,
    pub inkast_kubbs: u32,
    pub kubbs_remaining: u32,
}

/// Where an inkast landed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InkastOutcome {
    pub first_attempt_out: u32,
    pub second_attempt_out: u32,
    pub neighbors: u32,
}

/// A simulated player.
pub trait Thrower {
    fn name(&self) -> &'static str;

    /// Whether a practice throw hits.
    fn throw_baton(&self, ctx: &ThrowContext, rng: &mut dyn RngCore) -> bool;

    /// Kubbs knocked down by one blast baton; 0 is a miss.
    fn blast(&self, ctx: &BlastContext, rng: &mut dyn RngCore) -> u32;

    /// Inkast `kubbs` kubbs. Each kubb lands out 10% of the time, each
    /// rethrow stays out 30% of the time and 15% of kubbs end up neighbors.
    fn inkast(&self, kubbs: u32, rng: &mut dyn RngCore) -> InkastOutcome {
        let first_attempt_out = (0..kubbs).filter(|_| rng.gen_bool(0.10)).count() as u32;
        let second_attempt_out = (0..first_attempt_out)
            .filter(|_| rng.gen_bool(0.30))
            .count() as u32;
        let neighbors = (0..kubbs).filter(|_| rng.gen_bool(0.15)).count() as u32;
        InkastOutcome {
            first_attempt_out,
            second_attempt_out,
            neighbors,
        }
    }
}

/// Play a practice session until `target` throws, then complete it.
pub fn simulate_practice_session(
    thrower: &dyn Thrower,
    target: u32,
    rng: &mut dyn RngCore,
) -> KubbResult<PracticeSession> {
    let mut session = PracticeSession::new(target)?;

    while !session.is_target_reached() {
        let round = session.active_round().ok_or(KubbError::NoActiveRound {
            index: session.active_round_index(),
        })?;
        if round.is_complete() {
            session.start_next_round()?;
            continue;
        }

        let ctx = ThrowContext {
            round_number: round.round_number(),
            throw_number: round.total_throws() + 1,
            hits_in_round: round.hits(),
            kind: round.next_throw_kind(),
        };
        let hit = thrower.throw_baton(&ctx, rng);
        session.record_throw(hit)?;
    }

    session.complete_session()?;
    Ok(session)
}

/// Play `rounds` blast rounds in `phase`, then complete the session.
///
/// A round the thrower cannot clear within [`MAX_BATONS_PER_ROUND`] is
/// dropped and the session is ended early instead of completed.
pub fn simulate_blast_session(
    thrower: &dyn Thrower,
    phase: GamePhase,
    rounds: u32,
    rng: &mut dyn RngCore,
) -> KubbResult<BlastSession> {
    let mut session = BlastSession::new(phase);

    for _ in 0..rounds {
        let mut round = session.generate_round(&mut *rng);
        let inkast = thrower.inkast(round.inkast_kubbs(), rng);
        round.record_inkast_results(
            inkast.first_attempt_out,
            inkast.second_attempt_out,
            inkast.neighbors,
        )?;

        while !round.is_complete() {
            if round.batons_used() >= MAX_BATONS_PER_ROUND {
                warn!(
                    "{} could not clear round {}, ending session early",
                    thrower.name(),
                    round.round_number()
                );
                session.end_session_early()?;
                return Ok(session);
            }
            let ctx = BlastContext {
                round_number: round.round_number(),
                baton: round.batons_used() + 1,
                inkast_kubbs: round.inkast_kubbs(),
                kubbs_remaining: round.kubbs_remaining(),
            };
            let kubbs = thrower.blast(&ctx, rng);
            round.add_baton_throw(kubbs > 0, kubbs)?;
        }

        session.add_round(round)?;
    }

    session.complete_session()?;
    Ok(session)
}
