//! Smoothed counter and synergy win-rate matrices
//!
//! For every ordered hero pair `(a, b)` the counter matrix holds the
//! smoothed probability that `a` wins when facing `b` on the opposite team;
//! the synergy matrix holds the smoothed probability of winning when `a`
//! and `b` are picked together. Both are dense `H x H` arrays built once
//! from training data and frozen for serving.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::HeroRegistry;
use crate::{DraftError, MatchRecord, Result};

/// Dense row-major `H x H` probability matrix
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairMatrix {
    size: usize,
    values: Vec<f32>,
}

impl PairMatrix {
    fn new(size: usize) -> Self {
        PairMatrix {
            size,
            values: vec![0.0; size * size],
        }
    }

    pub fn get(&self, a: usize, b: usize) -> f32 {
        self.values[a * self.size + b]
    }

    fn set(&mut self, a: usize, b: usize, value: f32) {
        self.values[a * self.size + b] = value;
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn is_consistent(&self) -> bool {
        self.values.len() == self.size * self.size
    }
}

/// Frozen counter and synergy probability matrices
#[derive(Debug, Clone)]
pub struct DraftStatistics {
    counter: PairMatrix,
    synergy: PairMatrix,
    alpha: f32,
}

impl DraftStatistics {
    /// Compute both matrices from historical records.
    ///
    /// Co-occurrence counts are symmetric by construction; the win
    /// numerators are directional. Laplace smoothing with pseudo-count
    /// `alpha` keeps every probability strictly inside (0, 1), and an
    /// unobserved pair comes out at exactly 0.5 for `alpha = 1`.
    pub fn compute(records: &[MatchRecord], registry: &HeroRegistry, alpha: f32) -> Self {
        let h = registry.len();
        let mut counts_vs = vec![0u32; h * h];
        let mut wins_vs = vec![0u32; h * h];
        let mut counts_sy = vec![0u32; h * h];
        let mut wins_sy = vec![0u32; h * h];

        for record in records {
            let t1 = registry.resolve_all(&record.team1_picks);
            let t2 = registry.resolve_all(&record.team2_picks);
            let t1_win = u32::from(record.team1_won);

            // Counter pairs: every (a in t1, b in t2), both perspectives
            for &a in &t1 {
                for &b in &t2 {
                    counts_vs[a * h + b] += 1;
                    wins_vs[a * h + b] += t1_win;
                    counts_vs[b * h + a] += 1;
                    wins_vs[b * h + a] += 1 - t1_win;
                }
            }

            // Synergy pairs: unordered pairs within each team
            accumulate_synergy(&t1, t1_win, h, &mut counts_sy, &mut wins_sy);
            accumulate_synergy(&t2, 1 - t1_win, h, &mut counts_sy, &mut wins_sy);
        }

        let mut counter = PairMatrix::new(h);
        let mut synergy = PairMatrix::new(h);
        for a in 0..h {
            for b in 0..h {
                counter.set(a, b, smooth(wins_vs[a * h + b], counts_vs[a * h + b], alpha));
                synergy.set(a, b, smooth(wins_sy[a * h + b], counts_sy[a * h + b], alpha));
            }
        }

        DraftStatistics {
            counter,
            synergy,
            alpha,
        }
    }

    /// Smoothed probability that `a` beats `b` across the draft
    pub fn counter(&self, a: usize, b: usize) -> f32 {
        self.counter.get(a, b)
    }

    /// Smoothed probability of winning with `a` and `b` on the same team
    pub fn synergy(&self, a: usize, b: usize) -> f32 {
        self.synergy.get(a, b)
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

fn accumulate_synergy(team: &[usize], win: u32, h: usize, counts: &mut [u32], wins: &mut [u32]) {
    for i in 0..team.len() {
        for j in (i + 1)..team.len() {
            let (a, b) = (team[i], team[j]);
            counts[a * h + b] += 1;
            wins[a * h + b] += win;
            counts[b * h + a] += 1;
            wins[b * h + a] += win;
        }
    }
}

fn smooth(wins: u32, counts: u32, alpha: f32) -> f32 {
    (wins as f32 + alpha) / (counts as f32 + 2.0 * alpha)
}

/// Persisted form of the registry and statistic matrices.
///
/// Saved alongside the trained model so serving can reconstruct the exact
/// index mapping and frozen matrices the model was trained against.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsArtifact {
    pub heroes: Vec<String>,
    pub alpha: f32,
    counter: PairMatrix,
    synergy: PairMatrix,
}

impl StatsArtifact {
    pub fn new(registry: &HeroRegistry, stats: &DraftStatistics) -> Self {
        StatsArtifact {
            heroes: registry.names().to_vec(),
            alpha: stats.alpha,
            counter: stats.counter.clone(),
            synergy: stats.synergy.clone(),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path.as_ref())?;
        serde_json::to_writer(std::io::BufWriter::new(file), self)
            .map_err(|e| DraftError::Model(format!("Failed to write statistics: {}", e)))
    }

    /// Load a persisted artifact. A missing, corrupt, or dimensionally
    /// inconsistent file is fatal.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref()).map_err(|e| {
            DraftError::Model(format!(
                "Statistics artifact {} not found: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let artifact: StatsArtifact = serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| {
                DraftError::Model(format!(
                    "Statistics artifact {} is corrupt: {}",
                    path.as_ref().display(),
                    e
                ))
            })?;
        artifact.validate(path.as_ref())?;
        Ok(artifact)
    }

    /// Both matrices must be `H x H` for the persisted hero list, or every
    /// downstream lookup would index out of bounds.
    fn validate(&self, path: &Path) -> Result<()> {
        let h = self.heroes.len();
        let square = |m: &PairMatrix| m.size() == h && m.is_consistent();
        if !square(&self.counter) || !square(&self.synergy) {
            return Err(DraftError::Model(format!(
                "Statistics artifact {} is corrupt: matrices do not match {} heroes",
                path.display(),
                h
            )));
        }
        Ok(())
    }

    /// Split the artifact back into a registry and frozen matrices
    pub fn into_parts(self) -> (HeroRegistry, DraftStatistics) {
        let registry = HeroRegistry::from_names(self.heroes);
        let stats = DraftStatistics {
            counter: self.counter,
            synergy: self.synergy,
            alpha: self.alpha,
        };
        (registry, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn one_game() -> (Vec<MatchRecord>, HeroRegistry) {
        // Registry {A, B, C, D}; team1 = [A, B] beats team2 = [C, D]
        let records = vec![MatchRecord {
            team1_picks: names(&["A", "B"]),
            team2_picks: names(&["C", "D"]),
            team1_bans: vec![],
            team2_bans: vec![],
            team1_won: true,
        }];
        let registry = HeroRegistry::build(&records);
        (records, registry)
    }

    #[test]
    fn test_counter_scenario() {
        let (records, registry) = one_game();
        let stats = DraftStatistics::compute(&records, &registry, 1.0);

        let a = registry.resolve("A").unwrap();
        let c = registry.resolve("C").unwrap();

        // (1 + 1) / (1 + 2) from A's perspective, (0 + 1) / (1 + 2) from C's
        assert!((stats.counter(a, c) - 2.0 / 3.0).abs() < 1e-6);
        assert!((stats.counter(c, a) - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_synergy_directions_match() {
        let (records, registry) = one_game();
        let stats = DraftStatistics::compute(&records, &registry, 1.0);

        let a = registry.resolve("A").unwrap();
        let b = registry.resolve("B").unwrap();
        let c = registry.resolve("C").unwrap();
        let d = registry.resolve("D").unwrap();

        // Winning pair: (1 + 1) / (1 + 2); losing pair: (0 + 1) / (1 + 2)
        assert!((stats.synergy(a, b) - 2.0 / 3.0).abs() < 1e-6);
        assert!((stats.synergy(b, a) - 2.0 / 3.0).abs() < 1e-6);
        assert!((stats.synergy(c, d) - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_unobserved_pair_is_half() {
        let (records, registry) = one_game();
        let stats = DraftStatistics::compute(&records, &registry, 1.0);

        let a = registry.resolve("A").unwrap();
        let b = registry.resolve("B").unwrap();

        // A and B never faced each other, never synergized with C
        assert_eq!(stats.counter(a, b), 0.5);
        assert_eq!(stats.synergy(a, registry.resolve("C").unwrap()), 0.5);
        assert_eq!(stats.counter(b, a), 0.5);
    }

    #[test]
    fn test_entries_strictly_in_unit_interval() {
        let mut records = Vec::new();
        // A+B always beat C+D, so unsmoothed rates would be 0 or 1
        for _ in 0..50 {
            records.push(MatchRecord {
                team1_picks: names(&["A", "B"]),
                team2_picks: names(&["C", "D"]),
                team1_bans: vec![],
                team2_bans: vec![],
                team1_won: true,
            });
        }
        let registry = HeroRegistry::build(&records);

        for alpha in [0.1, 1.0, 5.0] {
            let stats = DraftStatistics::compute(&records, &registry, alpha);
            for a in 0..registry.len() {
                for b in 0..registry.len() {
                    assert!(stats.counter(a, b) > 0.0 && stats.counter(a, b) < 1.0);
                    assert!(stats.synergy(a, b) > 0.0 && stats.synergy(a, b) < 1.0);
                }
            }
        }
    }

    #[test]
    fn test_cooccurrence_symmetry() {
        // Mixed outcomes; counts must stay symmetric even though win
        // numerators are directional. Smoothed values on a symmetric-count
        // matrix satisfy p(a,b) + p(b,a) == 1 for counter pairs.
        let records = vec![
            MatchRecord {
                team1_picks: names(&["A", "B"]),
                team2_picks: names(&["C", "D"]),
                team1_bans: vec![],
                team2_bans: vec![],
                team1_won: true,
            },
            MatchRecord {
                team1_picks: names(&["A", "C"]),
                team2_picks: names(&["B", "D"]),
                team1_bans: vec![],
                team2_bans: vec![],
                team1_won: false,
            },
        ];
        let registry = HeroRegistry::build(&records);
        let stats = DraftStatistics::compute(&records, &registry, 1.0);

        for a in 0..registry.len() {
            for b in 0..registry.len() {
                let sum = stats.counter(a, b) + stats.counter(b, a);
                assert!((sum - 1.0).abs() < 1e-6, "counter({a},{b}) asymmetric counts");
            }
        }
    }

    #[test]
    fn test_unknown_heroes_excluded() {
        let (records, registry) = one_game();
        // A record mentioning a hero the registry never saw
        let mut extended = records.clone();
        extended.push(MatchRecord {
            team1_picks: names(&["A", "Ghost"]),
            team2_picks: names(&["C"]),
            team1_bans: vec![],
            team2_bans: vec![],
            team1_won: true,
        });

        // Must not panic; Ghost simply contributes nothing
        let stats = DraftStatistics::compute(&extended, &registry, 1.0);
        let a = registry.resolve("A").unwrap();
        let c = registry.resolve("C").unwrap();
        // A vs C observed twice now, both team1 wins
        assert!((stats.counter(a, c) - 3.0 / 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_artifact_roundtrip() {
        let (records, registry) = one_game();
        let stats = DraftStatistics::compute(&records, &registry, 1.0);
        let artifact = StatsArtifact::new(&registry, &stats);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        artifact.save(&path).unwrap();

        let (registry2, stats2) = StatsArtifact::load(&path).unwrap().into_parts();
        assert_eq!(registry2.names(), registry.names());
        assert_eq!(stats2.alpha(), 1.0);
        let a = registry2.resolve("A").unwrap();
        let c = registry2.resolve("C").unwrap();
        assert_eq!(stats2.counter(a, c), stats.counter(a, c));
    }

    #[test]
    fn test_artifact_load_missing_is_model_error() {
        let err = StatsArtifact::load("/nonexistent/stats.json").unwrap_err();
        assert!(matches!(err, crate::DraftError::Model(_)));
    }

    #[test]
    fn test_artifact_dimension_mismatch_is_model_error() {
        let dir = tempfile::tempdir().unwrap();

        // Two heroes but 1x1 matrices
        let path = dir.path().join("undersized.json");
        std::fs::write(
            &path,
            r#"{"heroes":["A","B"],"alpha":1.0,
                "counter":{"size":1,"values":[0.5]},
                "synergy":{"size":1,"values":[0.5]}}"#,
        )
        .unwrap();
        let err = StatsArtifact::load(&path).unwrap_err();
        assert!(matches!(err, crate::DraftError::Model(_)));

        // Declared size right, value buffer truncated
        let path = dir.path().join("truncated.json");
        std::fs::write(
            &path,
            r#"{"heroes":["A","B"],"alpha":1.0,
                "counter":{"size":2,"values":[0.5,0.5,0.5]},
                "synergy":{"size":2,"values":[0.5,0.5,0.5,0.5]}}"#,
        )
        .unwrap();
        let err = StatsArtifact::load(&path).unwrap_err();
        assert!(matches!(err, crate::DraftError::Model(_)));
    }
}
