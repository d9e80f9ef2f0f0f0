mod assign;
mod centroid;
mod density;
mod kmeans;
mod silhouette;
mod similarity;
mod types;


pub use assign::{ClusterMatch, find_cluster_for_embedding, nearest_centroid};
pub use centroid::{compute_centroid, compute_medoid};
pub use density::{DensityOptions, cluster_embeddings};
pub use kmeans::{
    DEFAULT_K, DEFAULT_MAX_ITERATIONS, DEFAULT_SILHOUETTE_SAMPLE, KMeansOptions, kmeans,
    kmeans_plus_plus_init, random_init,
};
pub use silhouette::silhouette_score;
pub use similarity::{
    DistanceMatrix, DistanceMetric, compute_distance_matrix, cosine_distance, cosine_similarity,
    euclidean_distance, squared_distance,
};
pub use types::{
    Cluster, ClusterMetadata, ClusterMetrics, ClusterResult, ClusteringMetrics, ClusteringResult,
    Embedding,
};
