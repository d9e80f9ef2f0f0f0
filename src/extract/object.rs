use serde::{Deserialize, Serialize};

use super::components::find_connected_components;
use super::grid::{Cell, Grid, threshold_field};
use crate::error::{ClusterError, Result};

/// A connected region above threshold in one ensemble member's grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatialObject {
    /// Unique across every grid passed to one extraction call
    pub id: usize,
    /// Index of the originating grid
    pub member_index: usize,
    pub cells: Vec<Cell>,
    pub area: usize,
    pub mean_value: f64,
    pub max_value: f64,
    pub centroid_x: f64,
    pub centroid_y: f64,
}

/// Scalar summary of a set of cells
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectFeatures {
    pub area: usize,
    pub mean_value: f64,
    pub max_value: f64,
    pub centroid_x: f64,
    pub centroid_y: f64,
}

impl SpatialObject {
    /// `[area, mean_value, max_value, centroid_x, centroid_y]`
    pub fn feature_vector(&self) -> Vec<f64> {
        vec![
            self.area as f64,
            self.mean_value,
            self.max_value,
            self.centroid_x,
            self.centroid_y,
        ]
    }
}

/// Area, value statistics and coordinate centroid of `cells` within `grid`.
///
/// Fails if `cells` is empty or any cell lies outside the grid.
pub fn compute_object_features(cells: &[Cell], grid: &Grid) -> Result<ObjectFeatures> {
    if cells.is_empty() {
        return Err(ClusterError::EmptyInput("cannot compute features of zero cells"));
    }

    let mut sum = 0.0;
    let mut max = f64::NEG_INFINITY;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;

    for cell in cells {
        let value = grid.get(cell.x, cell.y).ok_or(ClusterError::IndexOutOfBounds {
            x: cell.x,
            y: cell.y,
            width: grid.width(),
            height: grid.height(),
        })?;

        sum += value;
        max = max.max(value);
        sum_x += cell.x as f64;
        sum_y += cell.y as f64;
    }

    let n = cells.len() as f64;
    Ok(ObjectFeatures {
        area: cells.len(),
        mean_value: sum / n,
        max_value: max,
        centroid_x: sum_x / n,
        centroid_y: sum_y / n,
    })
}

/// Extract thresholded objects from every grid in an ensemble.
///
/// Components smaller than `min_area` are dropped. Surviving objects are
/// numbered consecutively from 0 across all grids, in grid order.
pub fn extract_objects_from_ensemble(
    grids: &[Grid],
    threshold: f64,
    min_area: usize,
) -> Result<Vec<SpatialObject>> {
    let mut objects = Vec::new();

    for (member_index, grid) in grids.iter().enumerate() {
        let mask = threshold_field(grid, threshold);
        let components = find_connected_components(&mask);
        let before = objects.len();

        for cells in components {
            if cells.len() < min_area {
                continue;
            }

            let features = compute_object_features(&cells, grid)?;
            objects.push(SpatialObject {
                id: objects.len(),
                member_index,
                cells,
                area: features.area,
                mean_value: features.mean_value,
                max_value: features.max_value,
                centroid_x: features.centroid_x,
                centroid_y: features.centroid_y,
            });
        }

        tracing::debug!(
            member_index,
            objects = objects.len() - before,
            "extracted objects from grid"
        );
    }

    Ok(objects)
}
