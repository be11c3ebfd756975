use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use bottletap_domain::{ClassifierConfig, DomainError};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct KMeansConfig {
    pub clusters: usize,
    pub max_iter: usize,
    pub n_init: usize,
    /// Convergence threshold on centroid movement, relative to the mean
    /// per-column variance of the data.
    pub tolerance: f64,
    pub seed: u64,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self::from(&ClassifierConfig::default())
    }
}

impl From<&ClassifierConfig> for KMeansConfig {
    fn from(config: &ClassifierConfig) -> Self {
        Self {
            clusters: config.clusters,
            max_iter: config.max_iter,
            n_init: config.n_init,
            tolerance: config.tolerance,
            seed: config.seed,
        }
    }
}

/// Fitted k-means partition.
#[derive(Clone, Debug, PartialEq)]
pub struct KMeans {
    centroids: Array2<f64>,
    labels: Vec<usize>,
    inertia: f64,
    iterations: usize,
}

struct Run {
    centroids: Array2<f64>,
    labels: Vec<usize>,
    inertia: f64,
    iterations: usize,
}

impl KMeans {
    /// Runs k-means++ seeded Lloyd iterations `n_init` times from a single
    /// seeded generator and keeps the run with the lowest inertia.
    pub fn fit(data: ArrayView2<'_, f64>, config: &KMeansConfig) -> Result<Self, DomainError> {
        let samples = data.nrows();
        if config.clusters == 0 {
            return Err(DomainError::validation("cluster count must be positive"));
        }
        if samples < config.clusters {
            return Err(DomainError::InsufficientSamples {
                samples,
                clusters: config.clusters,
            });
        }

        let mean_variance = data.var_axis(Axis(0), 0.0).mean().unwrap_or(0.0);
        let tolerance = config.tolerance * mean_variance;
        let mut rng = StdRng::seed_from_u64(config.seed);

        let mut best: Option<Run> = None;
        for attempt in 0..config.n_init.max(1) {
            let seeds = plus_plus_init(data, config.clusters, &mut rng);
            let run = lloyd(data, seeds, config.max_iter, tolerance);
            trace!(attempt, inertia = run.inertia, iterations = run.iterations, "k-means run");
            if best.as_ref().map_or(true, |b| run.inertia < b.inertia) {
                best = Some(run);
            }
        }

        let run = best.ok_or_else(|| DomainError::validation("k-means produced no run"))?;
        debug!(
            clusters = config.clusters,
            samples,
            inertia = run.inertia,
            iterations = run.iterations,
            "fitted k-means"
        );
        Ok(Self {
            centroids: run.centroids,
            labels: run.labels,
            inertia: run.inertia,
            iterations: run.iterations,
        })
    }

    /// Index of the nearest centroid; ties go to the lower index.
    pub fn predict(&self, point: ArrayView1<'_, f64>) -> usize {
        nearest(self.centroids.view(), point).0
    }

    pub fn centroids(&self) -> ArrayView2<'_, f64> {
        self.centroids.view()
    }

    /// Cluster of each training row.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn clusters(&self) -> usize {
        self.centroids.nrows()
    }
}

fn squared_distance(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

fn nearest(centroids: ArrayView2<'_, f64>, point: ArrayView1<'_, f64>) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (index, centroid) in centroids.rows().into_iter().enumerate() {
        let distance = squared_distance(centroid, point);
        if distance < best.1 {
            best = (index, distance);
        }
    }
    best
}

/// Greedy k-means++: each new centre is the best of `2 + ln k` candidates
/// drawn proportionally to squared distance from the centres chosen so far.
fn plus_plus_init(data: ArrayView2<'_, f64>, k: usize, rng: &mut StdRng) -> Array2<f64> {
    let samples = data.nrows();
    let local_trials = 2 + (k as f64).ln() as usize;
    let mut centroids = Array2::zeros((k, data.ncols()));

    let first = rng.gen_range(0..samples);
    centroids.row_mut(0).assign(&data.row(first));
    let mut closest: Array1<f64> = data
        .rows()
        .into_iter()
        .map(|row| squared_distance(row, data.row(first)))
        .collect();
    let mut potential = closest.sum();

    for c in 1..k {
        let mut chosen: Option<(usize, Array1<f64>, f64)> = None;
        for _ in 0..local_trials {
            let candidate = if potential > 0.0 {
                sample_weighted(closest.view(), rng.gen::<f64>() * potential)
            } else {
                rng.gen_range(0..samples)
            };
            let updated: Array1<f64> = data
                .rows()
                .into_iter()
                .zip(closest.iter())
                .map(|(row, &current)| current.min(squared_distance(row, data.row(candidate))))
                .collect();
            let candidate_potential = updated.sum();
            if chosen
                .as_ref()
                .map_or(true, |(_, _, best)| candidate_potential < *best)
            {
                chosen = Some((candidate, updated, candidate_potential));
            }
        }
        if let Some((index, updated, candidate_potential)) = chosen {
            centroids.row_mut(c).assign(&data.row(index));
            closest = updated;
            potential = candidate_potential;
        }
    }
    centroids
}

/// First index whose running weight exceeds `target`.
fn sample_weighted(weights: ArrayView1<'_, f64>, target: f64) -> usize {
    let mut cumulative = 0.0;
    for (index, weight) in weights.iter().enumerate() {
        cumulative += weight;
        if cumulative > target {
            return index;
        }
    }
    weights.len().saturating_sub(1)
}

fn assign(data: ArrayView2<'_, f64>, centroids: ArrayView2<'_, f64>) -> (Vec<usize>, Vec<f64>) {
    data.rows()
        .into_iter()
        .map(|row| nearest(centroids, row))
        .unzip()
}

fn lloyd(data: ArrayView2<'_, f64>, seeds: Array2<f64>, max_iter: usize, tolerance: f64) -> Run {
    let k = seeds.nrows();
    let mut centroids = seeds;
    let (mut labels, mut distances) = assign(data.view(), centroids.view());
    let mut iterations = 0;

    for _ in 0..max_iter {
        iterations += 1;
        let mut sums = Array2::<f64>::zeros(centroids.raw_dim());
        let mut counts = vec![0usize; k];
        for (row, &label) in data.rows().into_iter().zip(labels.iter()) {
            let mut target = sums.row_mut(label);
            target += &row;
            counts[label] += 1;
        }

        let mut updated = centroids.clone();
        let mut taken: Vec<usize> = Vec::new();
        for cluster in 0..k {
            if counts[cluster] > 0 {
                let mean = &sums.row(cluster) / counts[cluster] as f64;
                updated.row_mut(cluster).assign(&mean);
            } else {
                // an emptied cluster restarts at the worst-fitting point
                let far = distances
                    .iter()
                    .enumerate()
                    .filter(|(index, _)| !taken.contains(index))
                    .fold(None, |acc: Option<(usize, f64)>, (index, &d)| match acc {
                        Some((_, best)) if d <= best => acc,
                        _ => Some((index, d)),
                    });
                if let Some((index, _)) = far {
                    taken.push(index);
                    updated.row_mut(cluster).assign(&data.row(index));
                }
            }
        }

        let shift: f64 = updated
            .rows()
            .into_iter()
            .zip(centroids.rows())
            .map(|(a, b)| squared_distance(a, b))
            .sum();
        centroids = updated;
        let (next_labels, next_distances) = assign(data.view(), centroids.view());
        let stable = next_labels == labels;
        labels = next_labels;
        distances = next_distances;
        if stable || shift <= tolerance {
            break;
        }
    }

    let inertia = distances.iter().sum();
    Run {
        centroids,
        labels,
        inertia,
        iterations,
    }
}
