//! Draft state encoding
//!
//! Turns a partial or complete draft into the fixed-length numeric vector
//! the win classifier consumes. Layout, for registry size `H`:
//!
//! `[t1 pick one-hot | t1 ban one-hot | t1 weighted picks |
//!   t2 pick one-hot | t2 ban one-hot | t2 weighted picks |
//!   t1-vs-t2 counter mean, t2-vs-t1 counter mean,
//!   t1 synergy mean, t2 synergy mean]`
//!
//! for a total length of `6H + 4`. Unknown hero identifiers contribute
//! nothing to any component.

use crate::data::HeroRegistry;
use crate::features::DraftStatistics;
use crate::DraftState;

/// Draft-order weights: the i-th pick contributes 1/(i+1), clamped at the
/// fifth slot for any later picks.
pub const PICK_WEIGHTS: [f32; 5] = [1.0, 1.0 / 2.0, 1.0 / 3.0, 1.0 / 4.0, 1.0 / 5.0];

/// Number of scalar summary features appended after the hero vectors
pub const SUMMARY_DIM: usize = 4;

/// Encoder over a frozen registry and frozen statistic matrices
#[derive(Debug, Clone, Copy)]
pub struct DraftEncoder<'a> {
    registry: &'a HeroRegistry,
    stats: &'a DraftStatistics,
}

impl<'a> DraftEncoder<'a> {
    pub fn new(registry: &'a HeroRegistry, stats: &'a DraftStatistics) -> Self {
        DraftEncoder { registry, stats }
    }

    /// Length of every encoded vector: `6H + 4`
    pub fn dim(&self) -> usize {
        6 * self.registry.len() + SUMMARY_DIM
    }

    /// Encode a draft state into a feature vector of length `dim()`
    pub fn encode(&self, state: &DraftState) -> Vec<f32> {
        let h = self.registry.len();
        let mut features = vec![0.0f32; self.dim()];

        let t1_picks = self.registry.resolve_all(&state.team1_picks);
        let t2_picks = self.registry.resolve_all(&state.team2_picks);
        let t1_bans = self.registry.resolve_all(&state.team1_bans);
        let t2_bans = self.registry.resolve_all(&state.team2_bans);

        // Field order: picks, bans, weighted picks for each team
        one_hot(&mut features[0..h], &t1_picks);
        one_hot(&mut features[h..2 * h], &t1_bans);
        self.weighted_picks(&mut features[2 * h..3 * h], &state.team1_picks);
        one_hot(&mut features[3 * h..4 * h], &t2_picks);
        one_hot(&mut features[4 * h..5 * h], &t2_bans);
        self.weighted_picks(&mut features[5 * h..6 * h], &state.team2_picks);

        features[6 * h] = self.counter_mean(&t1_picks, &t2_picks);
        features[6 * h + 1] = self.counter_mean_reversed(&t1_picks, &t2_picks);
        features[6 * h + 2] = self.synergy_mean(&t1_picks);
        features[6 * h + 3] = self.synergy_mean(&t2_picks);

        features
    }

    /// Order-weighted pick vector. Positions are counted over the raw
    /// sequence, so an unknown name still occupies its draft slot while
    /// contributing no weight itself.
    fn weighted_picks(&self, out: &mut [f32], picks: &[String]) {
        for (i, name) in picks.iter().enumerate() {
            if let Some(idx) = self.registry.resolve(name) {
                let weight = PICK_WEIGHTS[i.min(PICK_WEIGHTS.len() - 1)];
                out[idx] += weight;
            }
        }
    }

    /// Mean counter probability from team1's attacking perspective
    fn counter_mean(&self, team: &[usize], opponents: &[usize]) -> f32 {
        if team.is_empty() || opponents.is_empty() {
            return 0.0;
        }
        let sum: f32 = team
            .iter()
            .flat_map(|&a| opponents.iter().map(move |&b| self.stats.counter(a, b)))
            .sum();
        sum / (team.len() * opponents.len()) as f32
    }

    /// Same pair set read with attacker and defender roles swapped
    fn counter_mean_reversed(&self, team: &[usize], opponents: &[usize]) -> f32 {
        self.counter_mean(opponents, team)
    }

    /// Mean synergy probability over unordered pairs within one team
    fn synergy_mean(&self, team: &[usize]) -> f32 {
        if team.len() < 2 {
            return 0.0;
        }
        let mut sum = 0.0f32;
        let mut count = 0usize;
        for i in 0..team.len() {
            for j in (i + 1)..team.len() {
                sum += self.stats.synergy(team[i], team[j]);
                count += 1;
            }
        }
        sum / count as f32
    }
}

fn one_hot(out: &mut [f32], indices: &[usize]) {
    for &idx in indices {
        out[idx] = 1.0;
    }
}
