use std::collections::BTreeSet;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// A color is one of the ten palette values `0..=9`. `0` is conventionally background.
pub type Color = u8;

pub const MAX_DIMENSION: usize = 30;
pub const PALETTE_SIZE: usize = 10;

/// An immutable-by-convention, dense, row-major 2D grid of colors.
#[derive(Debug, Clone, Eq, Hash)]
pub struct Grid {
    height: usize,
    width: usize,
    cells: Vec<Color>,
}

impl Grid {
    /// Panics if `cells.len() != height * width`; callers that parse untrusted input
    /// should validate shape via `crate::controller::refusal` before constructing a `Grid`.
    pub fn new(height: usize, width: usize, cells: Vec<Color>) -> Self {
        assert_eq!(cells.len(), height * width, "grid cell count mismatch");
        Self {
            height,
            width,
            cells,
        }
    }

    pub fn filled(height: usize, width: usize, color: Color) -> Self {
        Self::new(height, width, vec![color; height * width])
    }

    /// Panics on a ragged `rows` (a row whose length disagrees with the first row's).
    /// Trusted call sites (tests, internal construction) that know their rows are
    /// rectangular should use this; untrusted input (JSON ingestion) should use
    /// `try_from_rows` instead so a malformed task can be refused, not panic.
    pub fn from_rows(rows: &[Vec<Color>]) -> Self {
        Self::try_from_rows(rows).expect("ragged grid rows")
    }

    /// Fallible counterpart to `from_rows`: `Err` describes the first ragged row
    /// found instead of panicking, so untrusted input can be turned into a
    /// structured refusal (see `task::ARCTaskJson::into_task`).
    pub fn try_from_rows(rows: &[Vec<Color>]) -> Result<Self, String> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        let mut cells = Vec::with_capacity(height * width);
        for (index, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(format!(
                    "ragged grid: row {index} has length {}, expected {width}",
                    row.len()
                ));
            }
            cells.extend_from_slice(row);
        }
        Ok(Self::new(height, width, cells))
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn area(&self) -> usize {
        self.height * self.width
    }

    pub fn cells(&self) -> &[Color] {
        &self.cells
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Color> {
        if row < self.height && col < self.width {
            Some(self.cells[row * self.width + col])
        } else {
            None
        }
    }

    pub fn set(&mut self, row: usize, col: usize, color: Color) {
        assert!(row < self.height && col < self.width, "out of bounds set");
        self.cells[row * self.width + col] = color;
    }

    /// The set of colors actually present in the grid.
    pub fn palette(&self) -> BTreeSet<Color> {
        self.cells.iter().copied().collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Color]> {
        self.cells.chunks(self.width)
    }

    pub fn to_rows(&self) -> Vec<Vec<Color>> {
        self.rows().map(|r| r.to_vec()).collect()
    }

    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, Color)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &c)| (i / width, i % width, c))
    }

    pub fn map_colors(&self, mut f: impl FnMut(Color) -> Color) -> Grid {
        Grid::new(
            self.height,
            self.width,
            self.cells.iter().map(|&c| f(c)).collect(),
        )
    }
}

impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.height == other.height && self.width == other.width && self.cells == other.cells
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        for row in self.rows() {
            for &c in row {
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_round_trips() {
        let rows = vec![vec![0, 1, 0], vec![1, 1, 1]];
        let g = Grid::from_rows(&rows);
        assert_eq!(g.height(), 2);
        assert_eq!(g.width(), 3);
        assert_eq!(g.to_rows(), rows);
    }

    #[test]
    fn palette_includes_background() {
        let g = Grid::filled(2, 2, 0);
        assert_eq!(g.palette(), BTreeSet::from([0]));
    }

    #[test]
    fn equality_is_elementwise() {
        let a = Grid::from_rows(&[vec![1, 2], vec![3, 4]]);
        let b = Grid::from_rows(&[vec![1, 2], vec![3, 4]]);
        assert_eq!(a, b);
    }

    #[test]
    fn try_from_rows_rejects_ragged_input_instead_of_panicking() {
        let rows = vec![vec![0, 1, 0], vec![1, 1]];
        let err = Grid::try_from_rows(&rows).unwrap_err();
        assert!(err.contains("row 1"));
    }

    #[test]
    fn try_from_rows_accepts_rectangular_input() {
        let rows = vec![vec![0, 1], vec![1, 0]];
        let g = Grid::try_from_rows(&rows).unwrap();
        assert_eq!(g.to_rows(), rows);
    }
}
