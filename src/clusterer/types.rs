use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A vector to be clustered, with a caller-chosen id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    pub id: String,
    pub vector: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl Embedding {
    pub fn new(id: impl Into<String>, vector: Vec<f64>) -> Self {
        Self {
            id: id.into(),
            vector,
            metadata: None,
        }
    }

    /// Attach a metadata entry, creating the map on first use
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterMetadata {
    pub size: usize,
    /// Id of the member with the smallest total distance to the others
    pub medoid_id: String,
    /// Mean pairwise distance between members, 0 for a single member
    pub mean_intra_distance: f64,
}

/// A group found by density clustering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: usize,
    pub label: String,
    pub members: Vec<Embedding>,
    pub centroid: Vec<f64>,
    pub metadata: ClusterMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusteringMetrics {
    pub silhouette: Option<f64>,
}

/// Output of density clustering. Every input lands in exactly one cluster
/// or in `outliers`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusteringResult {
    pub clusters: Vec<Cluster>,
    pub outliers: Vec<Embedding>,
    pub metrics: ClusteringMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterMetrics {
    /// Sum of squared distances from each point to its centroid
    pub inertia: f64,
    /// Mean silhouette with Euclidean distance, when requested
    pub silhouette: Option<f64>,
}

/// Output of k-means
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterResult {
    pub centroids: Vec<Vec<f64>>,
    /// `assignments[i]` indexes `centroids` for point `i`
    pub assignments: Vec<usize>,
    pub iterations: usize,
    pub converged: bool,
    pub metrics: ClusterMetrics,
    /// Inertia after each assignment step
    pub inertia_history: Vec<f64>,
}

impl ClusterResult {
    pub fn k(&self) -> usize {
        self.centroids.len()
    }

    /// Number of points assigned to each centroid
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.k()];
        for &a in &self.assignments {
            sizes[a] += 1;
        }
        sizes
    }

    /// Indices of the points assigned to `cluster`
    pub fn members(&self, cluster: usize) -> Vec<usize> {
        self.assignments
            .iter()
            .enumerate()
            .filter(|&(_, &a)| a == cluster)
            .map(|(i, _)| i)
            .collect()
    }
}
