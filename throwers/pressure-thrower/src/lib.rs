use kubb_core::{BlastContext, RngCore, ThrowContext, ThrowKind, Thrower};
use rand::Rng;

/// PressureThrower starts strong but tightens up when it matters: accuracy
/// drops with three or four kubbs down, drops further on the king, and fades
/// a little every round after the third.
///
/// In Inkast & Blast it goes big with the first baton and picks off single
/// kubbs afterwards.
pub struct PressureThrower {
    base_rate: f64,
}

/// Accuracy lost with three or four kubbs already down.
const CLUTCH_PENALTY: f64 = 0.15;
/// Accuracy lost on the king throw.
const KING_PENALTY: f64 = 0.25;
/// Accuracy lost per round after the third.
const FATIGUE_PER_ROUND: f64 = 0.02;

impl PressureThrower {
    pub fn new(base_rate: f64) -> Self {
        Self {
            base_rate: base_rate.clamp(0.0, 1.0),
        }
    }

    /// Hit probability for the throw described by `ctx`.
    pub fn hit_chance(&self, ctx: &ThrowContext) -> f64 {
        let mut chance = self.base_rate;
        if (3..=4).contains(&ctx.hits_in_round) {
            chance -= CLUTCH_PENALTY;
        }
        if ctx.kind == ThrowKind::King {
            chance -= KING_PENALTY;
        }
        chance -= FATIGUE_PER_ROUND * f64::from(ctx.round_number.saturating_sub(3));
        chance.clamp(0.0, 1.0)
    }
}

impl Default for PressureThrower {
    fn default() -> Self {
        Self::new(0.7)
    }
}

impl Thrower for PressureThrower {
    fn name(&self) -> &'static str {
        "pressure-thrower"
    }

    fn throw_baton(&self, ctx: &ThrowContext, rng: &mut dyn RngCore) -> bool {
        rng.gen_bool(self.hit_chance(ctx))
    }

    fn blast(&self, ctx: &BlastContext, rng: &mut dyn RngCore) -> u32 {
        if ctx.kubbs_remaining == 0 || !rng.gen_bool(self.base_rate) {
            return 0;
        }
        if ctx.baton == 1 {
            rng.gen_range(1..=ctx.kubbs_remaining.min(5))
        } else {
            1
        }
    }
}
