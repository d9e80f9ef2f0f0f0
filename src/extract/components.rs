use std::collections::VecDeque;

use super::grid::{Cell, Mask};

/// Label 4-connected regions of `true` cells.
///
/// Breadth-first flood fill from each unvisited set cell, scanning rows top to
/// bottom. Diagonal neighbours are not connected. Cells inside a component
/// are listed in visit order.
pub fn find_connected_components(mask: &Mask) -> Vec<Vec<Cell>> {
    let (width, height) = (mask.width(), mask.height());
    if width == 0 || height == 0 {
        return vec![];
    }

    let mut visited = vec![false; width * height];
    let mut components = Vec::new();
    let mut queue = VecDeque::new();

    for y in 0..height {
        for x in 0..width {
            if visited[y * width + x] || !mask.get(x, y) {
                continue;
            }

            let mut component = Vec::new();
            visited[y * width + x] = true;
            queue.push_back(Cell::new(x, y));

            while let Some(cell) = queue.pop_front() {
                component.push(cell);

                for (nx, ny) in neighbors(cell, width, height) {
                    let idx = ny * width + nx;
                    if !visited[idx] && mask.get(nx, ny) {
                        visited[idx] = true;
                        queue.push_back(Cell::new(nx, ny));
                    }
                }
            }

            components.push(component);
        }
    }

    components
}

/// In-bounds N/S/W/E neighbours
fn neighbors(cell: Cell, width: usize, height: usize) -> impl Iterator<Item = (usize, usize)> {
    let Cell { x, y } = cell;
    [
        (y > 0).then(|| (x, y - 1)),
        (y + 1 < height).then(|| (x, y + 1)),
        (x > 0).then(|| (x - 1, y)),
        (x + 1 < width).then(|| (x + 1, y)),
    ]
    .into_iter()
    .flatten()
}
