use kubb_core::{BlastContext, RngCore, ThrowContext, Thrower};
use rand::Rng;

/// SteadyThrower hits with the same probability on every throw, whatever the
/// round looks like. A blast hit knocks down between one and three kubbs.
pub struct SteadyThrower {
    hit_rate: f64,
}

impl SteadyThrower {
    pub fn new(hit_rate: f64) -> Self {
        Self {
            hit_rate: hit_rate.clamp(0.0, 1.0),
        }
    }

    pub fn hit_rate(&self) -> f64 {
        self.hit_rate
    }
}

impl Default for SteadyThrower {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl Thrower for SteadyThrower {
    fn name(&self) -> &'static str {
        "steady-thrower"
    }

    fn throw_baton(&self, _ctx: &ThrowContext, rng: &mut dyn RngCore) -> bool {
        rng.gen_bool(self.hit_rate)
    }

    fn blast(&self, ctx: &BlastContext, rng: &mut dyn RngCore) -> u32 {
        if ctx.kubbs_remaining == 0 || !rng.gen_bool(self.hit_rate) {
            return 0;
        }
        rng.gen_range(1..=ctx.kubbs_remaining.min(3))
    }
}
