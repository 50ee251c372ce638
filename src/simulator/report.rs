//! Simulation report generation.

use super::runner::RunStats;
use serde::Serialize;
use std::collections::BTreeMap;

/// Width of each score bucket in the distribution.
const SCORE_BUCKET: u32 = 5;

/// Aggregated results from multiple simulation runs.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub num_runs: u32,
    pub runs_timed_out: u32,

    // Score
    pub avg_score: f64,
    pub median_score: u32,
    pub max_score: u32,
    pub avg_ticks: f64,
    pub avg_taps: f64,

    // Power-ups
    pub avg_coins: f64,
    pub avg_coins_collected: f64,
    pub avg_viruses_collected: f64,
    pub nyan_cat_rate: f64,

    /// Runs per score bucket, keyed by the bucket's lower bound
    pub score_distribution: BTreeMap<u32, u32>,

    // Individual run stats for detailed analysis
    #[serde(skip)]
    pub run_stats: Vec<RunStats>,
}

fn average<F>(runs: &[RunStats], f: F) -> f64
where
    F: Fn(&RunStats) -> f64,
{
    if runs.is_empty() {
        return 0.0;
    }
    runs.iter().map(f).sum::<f64>() / runs.len() as f64
}

impl SimReport {
    /// Create a new report from completed run stats.
    pub fn from_runs(runs: Vec<RunStats>) -> Self {
        let num_runs = runs.len() as u32;
        let runs_timed_out = runs.iter().filter(|r| r.timed_out).count() as u32;

        let mut scores: Vec<u32> = runs.iter().map(|r| r.final_score).collect();
        scores.sort_unstable();
        let median_score = scores.get(scores.len() / 2).copied().unwrap_or(0);
        let max_score = scores.last().copied().unwrap_or(0);

        let mut score_distribution = BTreeMap::new();
        for score in &scores {
            *score_distribution
                .entry(score / SCORE_BUCKET * SCORE_BUCKET)
                .or_insert(0) += 1;
        }

        let nyan_cats = runs.iter().filter(|r| r.became_nyan_cat).count();
        let nyan_cat_rate = if runs.is_empty() {
            0.0
        } else {
            nyan_cats as f64 / runs.len() as f64
        };

        Self {
            num_runs,
            runs_timed_out,
            avg_score: average(&runs, |r| r.final_score as f64),
            median_score,
            max_score,
            avg_ticks: average(&runs, |r| r.total_ticks as f64),
            avg_taps: average(&runs, |r| r.taps as f64),
            avg_coins: average(&runs, |r| r.coins as f64),
            avg_coins_collected: average(&runs, |r| r.coins_collected as f64),
            avg_viruses_collected: average(&runs, |r| r.viruses_collected as f64),
            nyan_cat_rate,
            score_distribution,
            run_stats: runs,
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Runs: {} total, {} timed out\n\n",
            self.num_runs, self.runs_timed_out
        ));

        report.push_str("── SCORE ────────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Score:       {:.1}\n", self.avg_score));
        report.push_str(&format!("  Median Score:    {}\n", self.median_score));
        report.push_str(&format!("  Max Score:       {}\n", self.max_score));
        report.push_str(&format!("  Avg Ticks:       {:.0}\n", self.avg_ticks));
        report.push_str(&format!("  Avg Taps:        {:.0}\n\n", self.avg_taps));

        report.push_str("── POWER-UPS ────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Coins Held:  {:.2}\n", self.avg_coins));
        report.push_str(&format!(
            "  Avg Coins Taken: {:.2}\n",
            self.avg_coins_collected
        ));
        report.push_str(&format!(
            "  Avg Viruses:     {:.2}\n",
            self.avg_viruses_collected
        ));
        report.push_str(&format!(
            "  Nyan Cat Rate:   {:.1}%\n\n",
            self.nyan_cat_rate * 100.0
        ));

        report.push_str("── SCORE DISTRIBUTION ───────────────────────────────────────────\n");
        for (bucket, count) in &self.score_distribution {
            let pct = (*count as f64 / self.num_runs.max(1) as f64) * 100.0;
            let bar: String = "█".repeat((pct / 5.0) as usize);
            report.push_str(&format!(
                "  {:>4}-{:<4} {:>5.1}% {}\n",
                bucket,
                bucket + SCORE_BUCKET - 1,
                pct,
                bar
            ));
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");

        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
