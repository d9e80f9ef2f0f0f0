// Public API exports
pub mod clusterer;
pub mod error;
pub mod extract;
pub mod matrix;
pub mod normalize;
pub mod rng;
pub mod scenario;

// Re-export main types for convenience
pub use error::{ClusterError, Result};
pub use matrix::FeatureMatrix;
pub use rng::SeededRng;

pub use clusterer::{
    Cluster, ClusterMatch, ClusterMetadata, ClusterMetrics, ClusterResult, ClusteringMetrics,
    ClusteringResult, DensityOptions, DistanceMatrix, DistanceMetric, Embedding, KMeansOptions,
    cluster_embeddings, compute_centroid, compute_distance_matrix, compute_medoid, cosine_distance,
    cosine_similarity, euclidean_distance, find_cluster_for_embedding, kmeans,
    kmeans_plus_plus_init, nearest_centroid, random_init, silhouette_score, squared_distance,
};

pub use extract::{
    Cell, Grid, Mask, ObjectFeatures, SpatialObject, compute_object_features,
    extract_objects_from_ensemble, find_connected_components, threshold_field,
};

pub use normalize::{
    NormalizationStats, Normalized, compute_normalization_stats, denormalize_features,
    normalize_features,
};

pub use scenario::{
    FeatureExtractor, ObjectFeatureExtractor, ScenarioClustering, ScenarioOptions, ScenarioSummary,
    cluster_objects, cluster_scenarios, cluster_scenarios_with_seed,
};
