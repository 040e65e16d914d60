//! Aggregate statistics over evaluation runs.

use serde::{Deserialize, Serialize};

/// Mean / standard deviation / median / median absolute deviation of a
/// sample set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub mean: f64,
    pub std_dev: f64,
    pub median: f64,
    pub median_abs_deviation: f64,
}

/// Summarize a sample set. Empty input yields all zeros.
pub fn summarize(samples: &[f64]) -> SummaryStats {
    if samples.is_empty() {
        return SummaryStats::default();
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;

    let med = median(samples);
    let deviations: Vec<f64> = samples.iter().map(|x| (x - med).abs()).collect();

    SummaryStats {
        mean,
        std_dev: variance.sqrt(),
        median: med,
        median_abs_deviation: median(&deviations),
    }
}

fn median(samples: &[f64]) -> f64 {
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Aggregate results of a CTF evaluation run, from red's perspective
/// (outcome samples are +1 win, 0 draw, -1 loss).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CtfEvaluation {
    pub episodes: usize,
    pub red_wins: usize,
    pub draws: usize,
    pub blue_wins: usize,
    /// Episodes in which at least one red agent was tagged.
    pub tagged_episodes: usize,
    pub outcome: SummaryStats,
}

/// Aggregate results of an attack/defend evaluation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttackDefendEvaluation {
    pub episodes: usize,
    pub collisions: SummaryStats,
    pub episode_length: SummaryStats,
    /// Captured flags over total flags, per episode.
    pub score: SummaryStats,
}
