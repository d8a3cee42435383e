//! Implementations backing the primitive registry. Every function here is a pure,
//! deterministic, side-effect-free transform over host `Value`s.

use super::value::Value;
use crate::grid::{Color, Grid};
use std::collections::HashMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimError(pub String);

impl Display for PrimError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for PrimError {}

type PrimResult = Result<Value, PrimError>;

fn expect_grid(args: &[Value], idx: usize) -> Result<&Grid, PrimError> {
    args.get(idx)
        .and_then(Value::as_grid)
        .ok_or_else(|| PrimError(format!("expected a Grid argument at position {idx}")))
}

fn expect_int(args: &[Value], idx: usize) -> Result<i64, PrimError> {
    args.get(idx)
        .and_then(Value::as_int)
        .ok_or_else(|| PrimError(format!("expected an Int argument at position {idx}")))
}

fn expect_color_map(args: &[Value], idx: usize) -> Result<&HashMap<Color, Color>, PrimError> {
    args.get(idx)
        .and_then(Value::as_color_map)
        .ok_or_else(|| PrimError(format!("expected a ColorMap argument at position {idx}")))
}

pub fn identity(args: &[Value]) -> PrimResult {
    Ok(Value::Grid(expect_grid(args, 0)?.clone()))
}

/// Crops to the bounding box of non-background pixels. An all-background grid has no
/// content to crop to, so it returns the original grid unchanged.
pub fn crop_to_content(args: &[Value]) -> PrimResult {
    let grid = expect_grid(args, 0)?;
    let points: Vec<(usize, usize)> = grid
        .iter_cells()
        .filter(|&(_, _, c)| c != 0)
        .map(|(r, c, _)| (r, c))
        .collect();
    let Some(bbox) = crate::grid::BoundingBox::of_points(points) else {
        return Ok(Value::Grid(grid.clone()));
    };
    let mut rows = Vec::with_capacity(bbox.height());
    for r in bbox.min_row..=bbox.max_row {
        let mut row = Vec::with_capacity(bbox.width());
        for c in bbox.min_col..=bbox.max_col {
            row.push(grid.get(r, c).unwrap_or(0));
        }
        rows.push(row);
    }
    Ok(Value::Grid(Grid::from_rows(&rows)))
}

/// Rotates clockwise 90 degrees, `n` times (`n` taken mod 4).
pub fn rotate90(args: &[Value]) -> PrimResult {
    let grid = expect_grid(args, 0)?;
    let n = expect_int(args, 1)?.rem_euclid(4);
    let mut current = grid.clone();
    for _ in 0..n {
        current = rotate_once(&current);
    }
    Ok(Value::Grid(current))
}

fn rotate_once(grid: &Grid) -> Grid {
    let (h, w) = (grid.height(), grid.width());
    let mut rows = vec![vec![0; h]; w];
    for r in 0..h {
        for c in 0..w {
            rows[c][h - 1 - r] = grid.get(r, c).unwrap();
        }
    }
    Grid::from_rows(&rows)
}

pub fn reflect_h(args: &[Value]) -> PrimResult {
    let grid = expect_grid(args, 0)?;
    let rows: Vec<Vec<Color>> = grid
        .rows()
        .map(|row| row.iter().rev().copied().collect())
        .collect();
    Ok(Value::Grid(Grid::from_rows(&rows)))
}

pub fn reflect_v(args: &[Value]) -> PrimResult {
    let grid = expect_grid(args, 0)?;
    let mut rows = grid.to_rows();
    rows.reverse();
    Ok(Value::Grid(Grid::from_rows(&rows)))
}

pub fn transpose(args: &[Value]) -> PrimResult {
    let grid = expect_grid(args, 0)?;
    let (h, w) = (grid.height(), grid.width());
    let mut rows = vec![vec![0; h]; w];
    for r in 0..h {
        for c in 0..w {
            rows[c][r] = grid.get(r, c).unwrap();
        }
    }
    Ok(Value::Grid(Grid::from_rows(&rows)))
}

pub fn scale(args: &[Value]) -> PrimResult {
    let grid = expect_grid(args, 0)?;
    let factor = expect_int(args, 1)?;
    if factor < 1 {
        return Err(PrimError(format!("scale factor must be >= 1, got {factor}")));
    }
    let factor = factor as usize;
    let mut rows = Vec::with_capacity(grid.height() * factor);
    for row in grid.rows() {
        let mut scaled_row = Vec::with_capacity(row.len() * factor);
        for &c in row {
            for _ in 0..factor {
                scaled_row.push(c);
            }
        }
        for _ in 0..factor {
            rows.push(scaled_row.clone());
        }
    }
    Ok(Value::Grid(Grid::from_rows(&rows)))
}

pub fn tile_h(args: &[Value]) -> PrimResult {
    let grid = expect_grid(args, 0)?;
    let n = expect_int(args, 1)?;
    if n < 1 {
        return Err(PrimError(format!("tile_h count must be >= 1, got {n}")));
    }
    let rows: Vec<Vec<Color>> = grid
        .rows()
        .map(|row| row.iter().cycle().take(row.len() * n as usize).copied().collect())
        .collect();
    Ok(Value::Grid(Grid::from_rows(&rows)))
}

pub fn tile_v(args: &[Value]) -> PrimResult {
    let grid = expect_grid(args, 0)?;
    let n = expect_int(args, 1)?;
    if n < 1 {
        return Err(PrimError(format!("tile_v count must be >= 1, got {n}")));
    }
    let base = grid.to_rows();
    let mut rows = Vec::with_capacity(base.len() * n as usize);
    for _ in 0..n {
        rows.extend(base.iter().cloned());
    }
    Ok(Value::Grid(Grid::from_rows(&rows)))
}

pub fn tile_repeat(args: &[Value]) -> PrimResult {
    let grid = expect_grid(args, 0)?;
    let rows_n = expect_int(args, 1)?;
    let cols_n = expect_int(args, 2)?;
    if rows_n < 1 || cols_n < 1 {
        return Err(PrimError(format!(
            "tile_repeat counts must be >= 1, got ({rows_n}, {cols_n})"
        )));
    }
    let base = grid.to_rows();
    let mut rows = Vec::with_capacity(base.len() * rows_n as usize);
    for _ in 0..rows_n {
        for row in &base {
            let tiled_row: Vec<Color> = row
                .iter()
                .cycle()
                .take(row.len() * cols_n as usize)
                .copied()
                .collect();
            rows.push(tiled_row);
        }
    }
    Ok(Value::Grid(Grid::from_rows(&rows)))
}

pub fn fill_background(args: &[Value]) -> PrimResult {
    let grid = expect_grid(args, 0)?;
    let color = expect_int(args, 1)?;
    if !(0..=9).contains(&color) {
        return Err(PrimError(format!("color out of palette range: {color}")));
    }
    let color = color as Color;
    Ok(Value::Grid(grid.map_colors(|c| if c == 0 { color } else { c })))
}

/// Swaps foreground and background: non-background cells become background, and
/// background cells take on the grid's modal foreground color (or stay `0` if the
/// grid has no foreground color at all).
pub fn invert_mask(args: &[Value]) -> PrimResult {
    let grid = expect_grid(args, 0)?;
    let mut counts: HashMap<Color, usize> = HashMap::new();
    for (_, _, c) in grid.iter_cells() {
        if c != 0 {
            *counts.entry(c).or_default() += 1;
        }
    }
    let foreground = counts
        .into_iter()
        .max_by_key(|&(color, count)| (count, std::cmp::Reverse(color)))
        .map(|(color, _)| color)
        .unwrap_or(0);
    Ok(Value::Grid(
        grid.map_colors(|c| if c == 0 { foreground } else { 0 }),
    ))
}

pub fn recolor_map(args: &[Value]) -> PrimResult {
    let grid = expect_grid(args, 0)?;
    let map = expect_color_map(args, 1)?;
    Ok(Value::Grid(
        grid.map_colors(|c| map.get(&c).copied().unwrap_or(c)),
    ))
}

/// Shifts content by `(dx, dy)` within the same-size grid; vacated cells become
/// background and content shifted out of bounds is dropped.
pub fn translate(args: &[Value]) -> PrimResult {
    let grid = expect_grid(args, 0)?;
    let dx = expect_int(args, 1)?;
    let dy = expect_int(args, 2)?;
    let mut out = Grid::filled(grid.height(), grid.width(), 0);
    for (r, c, color) in grid.iter_cells() {
        let nr = r as i64 + dy;
        let nc = c as i64 + dx;
        if nr >= 0 && nc >= 0 && (nr as usize) < grid.height() && (nc as usize) < grid.width() {
            out.set(nr as usize, nc as usize, color);
        }
    }
    Ok(Value::Grid(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(g: Grid) -> Value {
        Value::Grid(g)
    }

    #[test]
    fn rotate90_four_times_is_identity() {
        let g = Grid::from_rows(&[vec![1, 0], vec![0, 0]]);
        let out = rotate90(&[v(g.clone()), Value::Int(4)]).unwrap();
        assert_eq!(out.as_grid().unwrap(), &g);
    }

    #[test]
    fn reflect_h_twice_is_identity() {
        let g = Grid::from_rows(&[vec![1, 2, 3]]);
        let once = reflect_h(&[v(g.clone())]).unwrap();
        let twice = reflect_h(&[once]).unwrap();
        assert_eq!(twice.as_grid().unwrap(), &g);
    }

    #[test]
    fn scale_doubles_each_cell() {
        let g = Grid::from_rows(&[vec![1]]);
        let out = scale(&[v(g), Value::Int(2)]).unwrap();
        assert_eq!(out.as_grid().unwrap(), &Grid::from_rows(&[vec![1, 1], vec![1, 1]]));
    }

    #[test]
    fn crop_to_content_on_all_zero_returns_original() {
        let g = Grid::filled(2, 2, 0);
        let out = crop_to_content(&[v(g.clone())]).unwrap();
        assert_eq!(out.as_grid().unwrap(), &g);
    }

    #[test]
    fn translate_zero_fills_vacated_cells() {
        let g = Grid::from_rows(&[vec![1, 0], vec![0, 0]]);
        let out = translate(&[v(g), Value::Int(1), Value::Int(0)]).unwrap();
        assert_eq!(out.as_grid().unwrap(), &Grid::from_rows(&[vec![0, 1], vec![0, 0]]));
    }
}
