//! Recommendation engine
//!
//! Greedy exhaustive-candidate search over the hero pool: each available
//! hero is tentatively added to the draft, the resulting state is re-scored
//! by the win classifier, and candidates are ranked by the counterfactual
//! win rate. The registry, matrices, and model are frozen at construction;
//! each call works on a private copy of the caller's draft state.

use std::collections::HashSet;

use crate::data::HeroRegistry;
use crate::features::{DraftEncoder, DraftStatistics};
use crate::model::WinPredictor;
use crate::{DraftState, Recommendation, Team};

/// Immutable serving engine over a frozen registry, matrices, and predictor
pub struct DraftEngine<P: WinPredictor> {
    registry: HeroRegistry,
    stats: DraftStatistics,
    predictor: P,
}

impl<P: WinPredictor> DraftEngine<P> {
    pub fn new(registry: HeroRegistry, stats: DraftStatistics, predictor: P) -> Self {
        DraftEngine {
            registry,
            stats,
            predictor,
        }
    }

    pub fn registry(&self) -> &HeroRegistry {
        &self.registry
    }

    /// Predicted win probability for the given team.
    ///
    /// The model always scores team1; team2's probability is the exact
    /// complement, so the two perspectives sum to 1.
    pub fn predict_winrate(&self, state: &DraftState, team: Team) -> f32 {
        let encoder = DraftEncoder::new(&self.registry, &self.stats);
        let p = self.predictor.predict(&encoder.encode(state));
        match team {
            Team::Team1 => p,
            Team::Team2 => 1.0 - p,
        }
    }

    /// Rank the available heroes as the next pick for `team`.
    ///
    /// Each candidate is appended to the team's picks, scored, and removed
    /// again before the next candidate. Ties keep ascending index order.
    pub fn recommend_pick(&self, state: &DraftState, team: Team, top_k: usize) -> Vec<Recommendation> {
        self.search(state, team, team, top_k)
    }

    /// Rank the available heroes as ban candidates for `target_team`.
    ///
    /// A candidate is tentatively scored as if the opposing side had picked
    /// it; the priority is the resulting win probability for
    /// `target_team`. This is a proxy for ban value, not a causal
    /// estimate.
    pub fn recommend_ban(
        &self,
        state: &DraftState,
        target_team: Team,
        top_k: usize,
    ) -> Vec<Recommendation> {
        self.search(state, target_team.opponent(), target_team, top_k)
    }

    /// Exhaustive candidate search: append each available hero to
    /// `pick_side`'s picks, score from `score_team`'s perspective, revert.
    fn search(
        &self,
        state: &DraftState,
        pick_side: Team,
        score_team: Team,
        top_k: usize,
    ) -> Vec<Recommendation> {
        let used: HashSet<usize> = state
            .all_names()
            .filter_map(|n| self.registry.resolve(n))
            .collect();

        let mut working = state.clone();
        let mut candidates = Vec::with_capacity(self.registry.len() - used.len());

        for idx in 0..self.registry.len() {
            if used.contains(&idx) {
                continue;
            }
            let hero = self.registry.name(idx).to_string();

            working.picks_mut(pick_side).push(hero.clone());
            let score = self.predict_winrate(&working, score_team);
            working.picks_mut(pick_side).pop();

            candidates.push(Recommendation { hero, score });
        }

        // Stable sort over the ascending-index traversal keeps tie order
        candidates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates.truncate(top_k);
        candidates
    }
}
