use super::bbox::BoundingBox;
use super::grid::{Color, Grid};
use super::object::GridObject;
use std::collections::{HashSet, VecDeque};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Four,
    Eight,
}

impl Connectivity {
    fn offsets(self) -> &'static [(isize, isize)] {
        match self {
            Connectivity::Four => &[(-1, 0), (1, 0), (0, -1), (0, 1)],
            Connectivity::Eight => &[
                (-1, 0),
                (1, 0),
                (0, -1),
                (0, 1),
                (-1, -1),
                (-1, 1),
                (1, -1),
                (1, 1),
            ],
        }
    }
}

/// Extracts connected components of non-background pixels via BFS, visiting unvisited
/// pixels in top-left scan order so output is deterministic and stable.
pub fn extract_objects(grid: &Grid, background: Color, connectivity: Connectivity) -> Vec<GridObject> {
    let mut visited = HashSet::new();
    let mut objects = Vec::new();
    let mut next_id = 0usize;

    for row in 0..grid.height() {
        for col in 0..grid.width() {
            if visited.contains(&(row, col)) {
                continue;
            }
            let color = grid.get(row, col).expect("in-bounds scan");
            if color == background {
                continue;
            }
            let component = flood_fill(grid, background, connectivity, row, col, &mut visited);
            objects.push(build_object(next_id, component));
            next_id += 1;
        }
    }
    objects
}

fn flood_fill(
    grid: &Grid,
    background: Color,
    connectivity: Connectivity,
    start_row: usize,
    start_col: usize,
    visited: &mut HashSet<(usize, usize)>,
) -> Vec<(usize, usize, Color)> {
    let mut queue = VecDeque::from([(start_row, start_col)]);
    visited.insert((start_row, start_col));
    let mut pixels = Vec::new();

    while let Some((r, c)) = queue.pop_front() {
        let color = grid.get(r, c).expect("in-bounds traversal");
        pixels.push((r, c, color));
        for &(dr, dc) in connectivity.offsets() {
            let nr = r as isize + dr;
            let nc = c as isize + dc;
            if nr < 0 || nc < 0 {
                continue;
            }
            let (nr, nc) = (nr as usize, nc as usize);
            if visited.contains(&(nr, nc)) {
                continue;
            }
            if let Some(neighbor_color) = grid.get(nr, nc) {
                if neighbor_color != background {
                    visited.insert((nr, nc));
                    queue.push_back((nr, nc));
                }
            }
        }
    }
    pixels
}

fn build_object(object_id: usize, global_pixels: Vec<(usize, usize, Color)>) -> GridObject {
    let bbox = BoundingBox::of_points(global_pixels.iter().map(|&(r, c, _)| (r, c)))
        .expect("non-empty component");
    let pixels = global_pixels
        .into_iter()
        .map(|(r, c, color)| (r - bbox.min_row, c - bbox.min_col, color))
        .collect();
    GridObject {
        object_id,
        pixels,
        bbox,
    }
}

/// Extraction restricted to a single foreground color, treating every other color as background.
pub fn extract_single_color(
    grid: &Grid,
    target: Color,
    background: Color,
    connectivity: Connectivity,
) -> Vec<GridObject> {
    if target == background {
        return Vec::new();
    }
    let masked = grid.map_colors(|c| if c == target { target } else { background });
    extract_objects(&masked, background, connectivity)
}

/// Extracts components for each non-background color independently, renumbering
/// object ids sequentially across colors in ascending color order.
pub fn extract_per_color(grid: &Grid, background: Color, connectivity: Connectivity) -> Vec<GridObject> {
    let mut objects = Vec::new();
    let mut next_id = 0usize;
    for color in grid.palette() {
        if color == background {
            continue;
        }
        for mut obj in extract_single_color(grid, color, background, connectivity) {
            obj.object_id = next_id;
            next_id += 1;
            objects.push(obj);
        }
    }
    objects
}

/// Merges every disjoint component into a single bbox-spanning object. Used as a
/// fallback when a caller expects exactly one object rather than failing outright.
pub fn extract_merged(grid: &Grid, background: Color, connectivity: Connectivity) -> Option<GridObject> {
    let objects = extract_objects(grid, background, connectivity);
    if objects.is_empty() {
        return None;
    }
    let global_pixels: Vec<(usize, usize, Color)> = objects
        .iter()
        .flat_map(|o| {
            o.pixels
                .iter()
                .map(move |&(r, c, color)| (r + o.bbox.min_row, c + o.bbox.min_col, color))
        })
        .collect();
    Some(build_object(0, global_pixels))
}
