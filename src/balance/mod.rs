//! Monte-Carlo drop-rate simulation
//!
//! Rolls millions of rarities across CPU cores to check that the observed
//! distribution matches the configured rates, and measures how often bad-luck
//! protection actually fires. Each rayon chunk gets its own SHA3-derived seed,
//! so a report is reproducible from `base_seed` regardless of thread count.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::luck::LuckState;
use crate::rarity::RarityTier;
use crate::rng::{self, derive_seed};
use crate::session::LootSession;

/// Chi-square critical values for 6 degrees of freedom
const CHI_SQUARE_P05: f64 = 12.592;
const CHI_SQUARE_P001: f64 = 22.458;

/// Configuration for a rarity distribution run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropSimConfig {
    pub roll_count: u64,
    pub chunk_size: u64,
    pub luck_multiplier: f32,
    pub base_seed: u64,
}

impl Default for DropSimConfig {
    fn default() -> Self {
        Self {
            roll_count: 100_000,
            chunk_size: 10_000,
            luck_multiplier: 1.0,
            base_seed: 42,
        }
    }
}

/// Observed vs expected share for one tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierFrequency {
    pub rarity: RarityTier,
    pub count: u64,
    pub observed: f64,
    pub expected: f64,
}

/// How well observed counts fit the expected distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistributionFit {
    Consistent, // chi-square below p = 0.05
    Marginal,   // between p = 0.05 and p = 0.001
    Divergent,  // beyond p = 0.001
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RarityReport {
    pub total_rolls: u64,
    pub luck_multiplier: f32,
    pub tiers: Vec<TierFrequency>,
    pub chi_square: f64,
    pub max_abs_deviation: f64,
    pub fit: DistributionFit,
}

impl RarityReport {
    pub fn frequency(&self, rarity: RarityTier) -> Option<&TierFrequency> {
        self.tiers.iter().find(|t| t.rarity == rarity)
    }

    /// Combined observed share of Rare and above
    pub fn rare_or_above_share(&self) -> f64 {
        self.tiers
            .iter()
            .filter(|t| t.rarity.is_rare_or_above())
            .map(|t| t.observed)
            .sum()
    }
}

/// Exact probability of each tier (in `RarityTier::ALL` order) for one roll.
///
/// Mirrors the rarest-first cumulative walk, including the Common fallback
/// when the scaled table sums to less than 1.
pub fn expected_distribution(luck_multiplier: f32) -> [f64; 7] {
    let mut probabilities = [0.0_f64; 7];
    let mut cumulative = 0.0_f64;

    for tier in RarityTier::RAREST_FIRST {
        let rate = tier.modified_drop_rate(luck_multiplier) as f64;
        if rate <= 0.0 {
            continue;
        }
        let start = cumulative.min(1.0);
        cumulative += rate;
        probabilities[tier.tier() as usize] += cumulative.min(1.0) - start;
    }
    probabilities[RarityTier::Common.tier() as usize] += (1.0 - cumulative).max(0.0);
    probabilities
}

/// Parallel Monte-Carlo run over `RarityTier::roll`
pub fn simulate_rarity_distribution(config: &DropSimConfig) -> RarityReport {
    let chunk_size = config.chunk_size.max(1);
    let chunk_count = config.roll_count.div_ceil(chunk_size);

    let counts = (0..chunk_count)
        .into_par_iter()
        .map(|chunk| {
            let mut rng = rng::stream(config.base_seed, chunk);
            let rolls = chunk_size.min(config.roll_count - chunk * chunk_size);
            let mut counts = [0u64; 7];
            for _ in 0..rolls {
                let rarity = RarityTier::roll(config.luck_multiplier, &mut rng);
                counts[rarity.tier() as usize] += 1;
            }
            counts
        })
        .reduce(
            || [0u64; 7],
            |mut acc, counts| {
                for (a, c) in acc.iter_mut().zip(counts) {
                    *a += c;
                }
                acc
            },
        );

    analyze_counts(&counts, config)
}

fn analyze_counts(counts: &[u64; 7], config: &DropSimConfig) -> RarityReport {
    let total = counts.iter().sum::<u64>();
    let expected = expected_distribution(config.luck_multiplier);

    let tiers: Vec<TierFrequency> = RarityTier::ALL
        .iter()
        .map(|&rarity| {
            let index = rarity.tier() as usize;
            TierFrequency {
                rarity,
                count: counts[index],
                observed: if total > 0 {
                    counts[index] as f64 / total as f64
                } else {
                    0.0
                },
                expected: expected[index],
            }
        })
        .collect();

    let chi_square = tiers
        .iter()
        .filter(|t| t.expected > 0.0)
        .map(|t| {
            let expected_count = t.expected * total as f64;
            (t.count as f64 - expected_count).powi(2) / expected_count
        })
        .sum::<f64>();

    let max_abs_deviation = tiers
        .iter()
        .map(|t| (t.observed - t.expected).abs())
        .fold(0.0, f64::max);

    let fit = if chi_square < CHI_SQUARE_P05 {
        DistributionFit::Consistent
    } else if chi_square < CHI_SQUARE_P001 {
        DistributionFit::Marginal
    } else {
        DistributionFit::Divergent
    };

    tracing::info!(
        total,
        chi_square,
        max_abs_deviation,
        ?fit,
        "Rarity distribution simulated"
    );

    RarityReport {
        total_rolls: total,
        luck_multiplier: config.luck_multiplier,
        tiers,
        chi_square,
        max_abs_deviation,
        fit,
    }
}

/// Configuration for a bad-luck protection run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PitySimConfig {
    pub runs: u64,
    pub kills_per_run: u64,
    pub luck_multiplier: f32,
    pub pity_threshold: u32,
    pub base_seed: u64,
}

impl Default for PitySimConfig {
    fn default() -> Self {
        Self {
            runs: 64,
            kills_per_run: 2_000,
            luck_multiplier: 1.0,
            pity_threshold: crate::constants::PITY_THRESHOLD,
            base_seed: 42,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PityReport {
    pub total_kills: u64,
    pub legendary_drops: u64,
    pub forced_drops: u64,
    /// Mean kills from one Legendary+ drop to the next (inclusive)
    pub avg_kills_between: f64,
    pub max_kills_between: u64,
}

impl PityReport {
    pub fn forced_share(&self) -> f64 {
        if self.legendary_drops == 0 {
            0.0
        } else {
            self.forced_drops as f64 / self.legendary_drops as f64
        }
    }
}

#[derive(Default)]
struct PityTally {
    kills: u64,
    legendary: u64,
    forced: u64,
    gap_sum: u64,
    gap_count: u64,
    max_gap: u64,
}

impl PityTally {
    fn merge(mut self, other: Self) -> Self {
        self.kills += other.kills;
        self.legendary += other.legendary;
        self.forced += other.forced;
        self.gap_sum += other.gap_sum;
        self.gap_count += other.gap_count;
        self.max_gap = self.max_gap.max(other.max_gap);
        self
    }
}

/// Independent sessions roll one rarity per kill with pity active
pub fn simulate_pity(config: &PitySimConfig) -> PityReport {
    let tally = (0..config.runs)
        .into_par_iter()
        .map(|run| {
            let mut session = LootSession::new(derive_seed(config.base_seed, run));
            session.luck = LuckState::new(config.pity_threshold);

            let mut tally = PityTally::default();
            let mut since_last = 0u64;
            for _ in 0..config.kills_per_run {
                since_last += 1;
                tally.kills += 1;
                let roll = session.roll_rarity(config.luck_multiplier);
                if roll.rarity.is_legendary_tier() {
                    tally.legendary += 1;
                    tally.forced += u64::from(roll.forced);
                    tally.gap_sum += since_last;
                    tally.gap_count += 1;
                    tally.max_gap = tally.max_gap.max(since_last);
                    since_last = 0;
                }
            }
            tally
        })
        .reduce(PityTally::default, PityTally::merge);

    let report = PityReport {
        total_kills: tally.kills,
        legendary_drops: tally.legendary,
        forced_drops: tally.forced,
        avg_kills_between: if tally.gap_count > 0 {
            tally.gap_sum as f64 / tally.gap_count as f64
        } else {
            0.0
        },
        max_kills_between: tally.max_gap,
    };
    tracing::info!(
        kills = report.total_kills,
        legendary = report.legendary_drops,
        forced = report.forced_drops,
        "Pity simulated"
    );
    report
}
