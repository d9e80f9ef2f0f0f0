//! K-means over arbitrary items via a feature extractor.
//!
//! Extract a feature vector per item, z-score the features, cluster, and
//! report centroids back in the original feature units.


use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::clusterer::{
    ClusterMatch, ClusterResult, DEFAULT_K, KMeansOptions, kmeans, nearest_centroid,
};
use crate::error::Result;
use crate::extract::SpatialObject;
use crate::matrix::FeatureMatrix;
use crate::normalize::{NormalizationStats, normalize_features};
use crate::rng::SeededRng;

/// Maps an item to a fixed-length feature vector
pub trait FeatureExtractor<T: ?Sized> {
    fn extract(&self, item: &T) -> Vec<f64>;
}

impl<T: ?Sized, F> FeatureExtractor<T> for F
where
    F: Fn(&T) -> Vec<f64>,
{
    fn extract(&self, item: &T) -> Vec<f64> {
        self(item)
    }
}

/// `[area, mean_value, max_value, centroid_x, centroid_y]` of a grid object
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectFeatureExtractor;

impl FeatureExtractor<SpatialObject> for ObjectFeatureExtractor {
    fn extract(&self, item: &SpatialObject) -> Vec<f64> {
        item.feature_vector()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioOptions {
    pub kmeans: KMeansOptions,
    /// Z-score features before clustering
    pub normalize: bool,
    /// Fixed seed for reproducible runs; `None` draws one from entropy
    pub seed: Option<u32>,
}

impl Default for ScenarioOptions {
    fn default() -> Self {
        Self::new(DEFAULT_K)
    }
}

impl ScenarioOptions {
    pub fn new(k: usize) -> Self {
        Self {
            kmeans: KMeansOptions::new(k),
            normalize: true,
            seed: None,
        }
    }

    pub fn with_kmeans(mut self, kmeans: KMeansOptions) -> Self {
        self.kmeans = kmeans;
        self
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Per-cluster view in original feature units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub cluster: usize,
    pub size: usize,
    pub centroid: Vec<f64>,
    pub members: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioClustering {
    /// K-means output in the (possibly normalized) clustering space
    pub result: ClusterResult,
    /// Present when features were normalized
    pub stats: Option<NormalizationStats>,
    /// Centroids in original feature units
    pub centroids: Vec<Vec<f64>>,
    /// Item indices per cluster
    pub members: Vec<Vec<usize>>,
}

impl ScenarioClustering {
    pub fn k(&self) -> usize {
        self.centroids.len()
    }

    /// Nearest cluster for a new item, measured in clustering space
    pub fn assign<T, E>(&self, item: &T, extractor: &E) -> Result<ClusterMatch>
    where
        T: ?Sized,
        E: FeatureExtractor<T> + ?Sized,
    {
        let features = extractor.extract(item);
        let features = match &self.stats {
            Some(stats) => stats.normalize(&features)?,
            None => features,
        };
        nearest_centroid(&features, &self.result.centroids)
    }

    pub fn summaries(&self) -> Vec<ScenarioSummary> {
        self.centroids
            .iter()
            .zip(&self.members)
            .enumerate()
            .map(|(cluster, (centroid, members))| ScenarioSummary {
                cluster,
                size: members.len(),
                centroid: centroid.clone(),
                members: members.clone(),
            })
            .collect()
    }
}

/// Cluster `items` by the features `extractor` pulls from them.
///
/// Fails if the extractor yields vectors of differing lengths, on empty input
/// and on `k == 0`.
pub fn cluster_scenarios<T, E, R>(
    items: &[T],
    extractor: &E,
    options: &ScenarioOptions,
    rng: &mut R,
) -> Result<ScenarioClustering>
where
    E: FeatureExtractor<T> + ?Sized,
    R: Rng + ?Sized,
{
    let raw: Vec<Vec<f64>> = items.iter().map(|item| extractor.extract(item)).collect();
    let features = FeatureMatrix::from_rows(&raw)?;

    let (space, stats) = if options.normalize && !features.is_empty() {
        let normalized = normalize_features(&features, None)?;
        (normalized.features, Some(normalized.stats))
    } else {
        (features, None)
    };

    let result = kmeans(&space, &options.kmeans, rng)?;

    let centroids = match &stats {
        Some(stats) => result
            .centroids
            .iter()
            .map(|c| stats.denormalize(c))
            .collect::<Result<Vec<_>>>()?,
        None => result.centroids.clone(),
    };

    let members = (0..result.k()).map(|c| result.members(c)).collect();

    tracing::debug!(
        items = items.len(),
        k = result.k(),
        inertia = result.metrics.inertia,
        "scenario clustering finished"
    );

    Ok(ScenarioClustering {
        result,
        stats,
        centroids,
        members,
    })
}

/// [`cluster_scenarios`] with a generator built from `options.seed`, or from
/// entropy when no seed is set.
pub fn cluster_scenarios_with_seed<T, E>(
    items: &[T],
    extractor: &E,
    options: &ScenarioOptions,
) -> Result<ScenarioClustering>
where
    E: FeatureExtractor<T> + ?Sized,
{
    let mut rng = match options.seed {
        Some(seed) => SeededRng::new(seed),
        None => SeededRng::from_entropy(),
    };
    cluster_scenarios(items, extractor, options, &mut rng)
}

/// Cluster grid-extracted objects by their default feature vector
pub fn cluster_objects<R>(
    objects: &[SpatialObject],
    options: &ScenarioOptions,
    rng: &mut R,
) -> Result<ScenarioClustering>
where
    R: Rng + ?Sized,
{
    cluster_scenarios(objects, &ObjectFeatureExtractor, options, rng)
}
