use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clusterkit::{
    DensityOptions, DistanceMetric, Embedding, Grid, ObjectFeatureExtractor, ScenarioOptions,
    cluster_embeddings, cluster_scenarios_with_seed, extract_objects_from_ensemble,
};
use serde::de::DeserializeOwned;
use serde_json::json;

#[derive(Parser)]
#[command(name = "clusterkit", about = "Cluster embeddings and grid-derived objects")]
struct Cli {
    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Density-cluster a JSON array of embeddings
    Embeddings {
        /// File containing `[{"id": ..., "vector": [...]}, ...]`
        input: PathBuf,

        /// JSON file with density options; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        min_cluster_size: Option<usize>,

        #[arg(long)]
        min_samples: Option<usize>,

        /// Neighbour distance threshold
        #[arg(long)]
        threshold: Option<f64>,

        #[arg(long, value_enum)]
        metric: Option<MetricArg>,
    },

    /// Extract objects from an ensemble of grids and k-means them
    Grids {
        /// File containing an array of grids, each an array of rows
        input: PathBuf,

        /// Number of clusters
        #[arg(long)]
        k: usize,

        /// JSON file with scenario options; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,

        /// Cells at or above this value belong to objects
        #[arg(long, default_value_t = 6.0)]
        threshold: f64,

        /// Drop objects with fewer cells than this
        #[arg(long, default_value_t = 1)]
        min_area: usize,

        #[arg(long)]
        seed: Option<u32>,

        #[arg(long)]
        max_iterations: Option<usize>,

        /// Cluster raw features instead of z-scores
        #[arg(long)]
        no_normalize: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MetricArg {
    Cosine,
    Euclidean,
}

impl From<MetricArg> for DistanceMetric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Cosine => DistanceMetric::Cosine,
            MetricArg::Euclidean => DistanceMetric::Euclidean,
        }
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    // RUST_LOG wins over the warn default; --verbose wins over both
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Embeddings {
            input,
            config,
            min_cluster_size,
            min_samples,
            threshold,
            metric,
        } => {
            let mut options: DensityOptions = match config {
                Some(path) => read_json(&path)?,
                None => DensityOptions::default(),
            };
            if let Some(v) = min_cluster_size {
                options.min_cluster_size = v;
            }
            if let Some(v) = min_samples {
                options.min_samples = v;
            }
            if let Some(v) = threshold {
                options.distance_threshold = v;
            }
            if let Some(v) = metric {
                options.metric = v.into();
            }
            cmd_embeddings(&input, &options)
        }
        Commands::Grids {
            input,
            k,
            config,
            threshold,
            min_area,
            seed,
            max_iterations,
            no_normalize,
        } => {
            let mut options: ScenarioOptions = match config {
                Some(path) => read_json(&path)?,
                None => ScenarioOptions::new(k),
            };
            options.kmeans.k = k;
            if let Some(v) = max_iterations {
                options.kmeans.max_iterations = v;
            }
            if seed.is_some() {
                options.seed = seed;
            }
            if no_normalize {
                options.normalize = false;
            }
            cmd_grids(&input, threshold, min_area, &options)
        }
    }
}

fn cmd_embeddings(input: &Path, options: &DensityOptions) -> Result<()> {
    let start = Instant::now();
    let embeddings: Vec<Embedding> = read_json(input)?;
    tracing::info!(count = embeddings.len(), "loaded embeddings");

    let result = cluster_embeddings(&embeddings, options).context("Clustering failed")?;
    tracing::info!(
        clusters = result.clusters.len(),
        outliers = result.outliers.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "density clustering complete"
    );

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn cmd_grids(input: &Path, threshold: f64, min_area: usize, options: &ScenarioOptions) -> Result<()> {
    let start = Instant::now();
    let raw: Vec<Vec<Vec<f64>>> = read_json(input)?;
    let grids = raw
        .iter()
        .enumerate()
        .map(|(i, rows)| Grid::from_rows(rows).with_context(|| format!("Grid {i} is malformed")))
        .collect::<Result<Vec<_>>>()?;

    let objects = extract_objects_from_ensemble(&grids, threshold, min_area)?;
    tracing::info!(grids = grids.len(), objects = objects.len(), "extracted objects");

    if objects.is_empty() {
        println!("{}", serde_json::to_string_pretty(&json!({ "objects": 0, "clusters": [] }))?);
        return Ok(());
    }

    let clustering = cluster_scenarios_with_seed(&objects, &ObjectFeatureExtractor, options)
        .context("Clustering failed")?;
    tracing::info!(
        k = clustering.k(),
        iterations = clustering.result.iterations,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "scenario clustering complete"
    );

    let report = json!({
        "objects": objects.len(),
        "k": clustering.k(),
        "iterations": clustering.result.iterations,
        "converged": clustering.result.converged,
        "inertia": clustering.result.metrics.inertia,
        "silhouette": clustering.result.metrics.silhouette,
        "features": ["area", "meanValue", "maxValue", "centroidX", "centroidY"],
        "clusters": clustering.summaries(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
