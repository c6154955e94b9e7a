//! Prediction counters and latency statistics for the placement predictor.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Latency samples kept for percentile calculation
const MAX_SAMPLES: usize = 10_000;

/// Metrics collector shared by all request handlers
pub struct PredictionMetrics {
    /// Successful predictions
    pub predictions: AtomicU64,
    /// Predictions with a positive verdict
    pub placed: AtomicU64,
    /// Predictions with a negative verdict
    pub not_placed: AtomicU64,
    /// Predictions that raised an error
    pub failures: AtomicU64,
    /// Submissions rejected by input validation
    pub rejected_inputs: AtomicU64,
    /// Processing times (in microseconds)
    processing_times: RwLock<Vec<u64>>,
    /// Placement probability distribution buckets (10% wide)
    probability_buckets: RwLock<[u64; 10]>,
    /// Start time for uptime
    start_time: Instant,
}

impl PredictionMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            predictions: AtomicU64::new(0),
            placed: AtomicU64::new(0),
            not_placed: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            rejected_inputs: AtomicU64::new(0),
            processing_times: RwLock::new(Vec::with_capacity(1000)),
            probability_buckets: RwLock::new([0; 10]),
            start_time: Instant::now(),
        }
    }

    /// Record a successful prediction
    pub fn record_prediction(&self, processing_time: Duration, placed: bool, probability_percent: f64) {
        self.predictions.fetch_add(1, Ordering::Relaxed);
        if placed {
            self.placed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.not_placed.fetch_add(1, Ordering::Relaxed);
        }

        if let Ok(mut times) = self.processing_times.write() {
            times.push(processing_time.as_micros() as u64);
            if times.len() > MAX_SAMPLES {
                times.drain(0..MAX_SAMPLES / 2);
            }
        }

        let bucket = (probability_percent / 10.0).clamp(0.0, 9.0) as usize;
        if let Ok(mut buckets) = self.probability_buckets.write() {
            buckets[bucket] += 1;
        }
    }

    /// Record a failed prediction
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a submission rejected before prediction
    pub fn record_rejected_input(&self) {
        self.rejected_inputs.fetch_add(1, Ordering::Relaxed);
    }

    /// Seconds since the collector was created
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Get processing time statistics
    pub fn get_processing_stats(&self) -> ProcessingStats {
        let sorted = match self.processing_times.read() {
            Ok(times) if !times.is_empty() => {
                let mut sorted = times.clone();
                sorted.sort_unstable();
                sorted
            }
            _ => return ProcessingStats::default(),
        };

        let count = sorted.len();
        let sum: u64 = sorted.iter().sum();

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[((count as f64 * 0.95) as usize).min(count - 1)],
            max_us: sorted[count - 1],
        }
    }

    /// Get probability distribution
    pub fn get_probability_distribution(&self) -> [u64; 10] {
        self.probability_buckets
            .read()
            .map(|buckets| *buckets)
            .unwrap_or_default()
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            predictions: self.predictions.load(Ordering::Relaxed),
            placed: self.placed.load(Ordering::Relaxed),
            not_placed: self.not_placed.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            rejected_inputs: self.rejected_inputs.load(Ordering::Relaxed),
            processing: self.get_processing_stats(),
            probability_distribution: self.get_probability_distribution(),
        }
    }

    /// Log summary statistics
    pub fn print_summary(&self) {
        let snapshot = self.snapshot();
        let placement_rate = if snapshot.predictions > 0 {
            (snapshot.placed as f64 / snapshot.predictions as f64) * 100.0
        } else {
            0.0
        };

        info!("╔══════════════════════════════════════════════════════════════╗");
        info!("║            PLACEMENT PREDICTOR - METRICS SUMMARY             ║");
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Predictions: {:>8}  │  Placed: {:>6.1}%  │  Failures: {:>6} ║",
            snapshot.predictions, placement_rate, snapshot.failures
        );
        info!(
            "║ Rejected inputs: {:>6}  │  Uptime: {:>8}s                  ║",
            snapshot.rejected_inputs,
            self.uptime_seconds()
        );
        info!(
            "║ Processing Time (μs): mean={:>6} p50={:>6} p95={:>6} max={:>6} ║",
            snapshot.processing.mean_us,
            snapshot.processing.p50_us,
            snapshot.processing.p95_us,
            snapshot.processing.max_us
        );
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Placement Probability Distribution:                          ║");
        let total: u64 = snapshot.probability_distribution.iter().sum();
        for (i, &count) in snapshot.probability_distribution.iter().enumerate() {
            let pct = if total > 0 { (count as f64 / total as f64) * 100.0 } else { 0.0 };
            let bar: String = "█".repeat(((pct / 2.0) as usize).min(20));
            info!(
                "║   {:>3}-{:>3}%: {:>6} ({:>5.1}%) {}",
                i * 10,
                (i + 1) * 10,
                count,
                pct,
                bar
            );
        }
        info!("╚══════════════════════════════════════════════════════════════╝");
    }
}

impl Default for PredictionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Processing time statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub max_us: u64,
}

/// Serializable view of the counters, served by the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub predictions: u64,
    pub placed: u64,
    pub not_placed: u64,
    pub failures: u64,
    pub rejected_inputs: u64,
    pub processing: ProcessingStats,
    pub probability_distribution: [u64; 10],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = PredictionMetrics::new();

        metrics.record_prediction(Duration::from_micros(100), true, 91.0);
        metrics.record_prediction(Duration::from_micros(300), false, 25.0);
        metrics.record_failure();
        metrics.record_rejected_input();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.predictions, 2);
        assert_eq!(snapshot.placed, 1);
        assert_eq!(snapshot.not_placed, 1);
        assert_eq!(snapshot.failures, 1);
        assert_eq!(snapshot.rejected_inputs, 1);
        assert_eq!(snapshot.processing.count, 2);
        assert_eq!(snapshot.processing.mean_us, 200);
        assert_eq!(snapshot.processing.max_us, 300);
    }

    #[test]
    fn test_probability_buckets() {
        let metrics = PredictionMetrics::new();

        metrics.record_prediction(Duration::from_micros(10), false, 0.0);
        metrics.record_prediction(Duration::from_micros(10), true, 85.0);
        metrics.record_prediction(Duration::from_micros(10), true, 100.0);

        let dist = metrics.get_probability_distribution();
        assert_eq!(dist[0], 1);
        assert_eq!(dist[8], 1);
        // 100% lands in the top bucket
        assert_eq!(dist[9], 1);
    }

    #[test]
    fn test_empty_stats() {
        let metrics = PredictionMetrics::new();
        let stats = metrics.get_processing_stats();
        assert_eq!(stats.count, 0);
        assert_eq!(stats.p95_us, 0);
    }
}
