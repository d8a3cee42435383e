use super::bbox::BoundingBox;
use super::grid::{Color, Grid};
use std::collections::HashMap;

/// A connected component extracted from a grid. Pixel coordinates are local to `bbox`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridObject {
    pub object_id: usize,
    pub pixels: Vec<(usize, usize, Color)>,
    pub bbox: BoundingBox,
}

impl GridObject {
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// The modal color among this object's pixels.
    pub fn primary_color(&self) -> Color {
        let mut counts: HashMap<Color, usize> = HashMap::new();
        for &(_, _, c) in &self.pixels {
            *counts.entry(c).or_default() += 1;
        }
        counts
            .into_iter()
            .max_by_key(|&(color, count)| (count, std::cmp::Reverse(color)))
            .map(|(color, _)| color)
            .unwrap_or(0)
    }

    /// Renders this object as a standalone grid, background-filled outside its own pixels.
    pub fn to_grid(&self, background: Color) -> Grid {
        let mut grid = Grid::filled(self.bbox.height(), self.bbox.width(), background);
        for &(r, c, color) in &self.pixels {
            grid.set(r, c, color);
        }
        grid
    }
}

/// A richer per-component view computed alongside `GridObject` when constraint or
/// feature code needs more than bbox + pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct EnhancedObject {
    pub base: GridObject,
    pub histogram: HashMap<Color, usize>,
    pub centroid: (f64, f64),
    pub fill_ratio: f64,
    pub is_rectangular: bool,
    pub is_monochrome: bool,
    pub perimeter: usize,
    pub compactness: f64,
}

impl EnhancedObject {
    pub fn from_object(obj: GridObject) -> Self {
        let mut histogram: HashMap<Color, usize> = HashMap::new();
        let mut sum_row = 0.0;
        let mut sum_col = 0.0;
        for &(r, c, color) in &obj.pixels {
            *histogram.entry(color).or_default() += 1;
            sum_row += r as f64;
            sum_col += c as f64;
        }
        let n = obj.pixels.len().max(1) as f64;
        let centroid = (sum_row / n, sum_col / n);
        let fill_ratio = obj.pixels.len() as f64 / obj.bbox.area().max(1) as f64;
        let is_rectangular = (fill_ratio - 1.0).abs() < 1e-9;
        let is_monochrome = histogram.len() <= 1;
        let perimeter = Self::compute_perimeter(&obj);
        let area = obj.pixels.len() as f64;
        let compactness = if perimeter == 0 {
            0.0
        } else {
            4.0 * std::f64::consts::PI * area / (perimeter as f64 * perimeter as f64)
        };
        Self {
            base: obj,
            histogram,
            centroid,
            fill_ratio,
            is_rectangular,
            is_monochrome,
            perimeter,
            compactness,
        }
    }

    fn compute_perimeter(obj: &GridObject) -> usize {
        let occupied: std::collections::HashSet<(usize, usize)> =
            obj.pixels.iter().map(|&(r, c, _)| (r, c)).collect();
        let mut perimeter = 0;
        for &(r, c, _) in &obj.pixels {
            let neighbors = [
                (r.checked_sub(1), Some(c)),
                (Some(r + 1), Some(c)),
                (Some(r), c.checked_sub(1)),
                (Some(r), Some(c + 1)),
            ];
            let on_boundary = neighbors.iter().any(|&(nr, nc)| match (nr, nc) {
                (Some(nr), Some(nc)) => !occupied.contains(&(nr, nc)),
                _ => true,
            });
            if on_boundary {
                perimeter += 1;
            }
        }
        perimeter
    }
}
