//! Turns raw scalar grids into discrete, clusterable objects.
//!
//! Pipeline per grid: threshold into a mask, label 4-connected components,
//! drop components below a minimum area, summarise the rest.

mod components;
mod grid;
mod object;


pub use components::find_connected_components;
pub use grid::{Cell, Grid, Mask, threshold_field};
pub use object::{
    ObjectFeatures, SpatialObject, compute_object_features, extract_objects_from_ensemble,
};
