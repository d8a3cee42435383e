use super::{Counterfactual, ExpectedBehavior};
use crate::grid::Grid;

const MAX_DIMENSION: usize = 30;
const RESIZE_FACTORS: [f64; 2] = [0.5, 2.0];
const PAD_WIDTHS: [usize; 2] = [1, 2];

/// Nearest-neighbor resize, zero-padding, and a random non-background color
/// permutation -- the structural-family generators. A resize factor that would
/// exceed the 30x30 bound is skipped rather than clamped, so the report reflects
/// what was actually evaluated.
pub fn generate(base: &Grid, remap_seed: u64) -> Vec<Counterfactual> {
    let mut out = Vec::with_capacity(5);
    for &factor in &RESIZE_FACTORS {
        if let Some(resized) = resize_nearest(base, factor) {
            out.push(Counterfactual {
                label: if factor < 1.0 { "resize_down" } else { "resize_up" },
                input: resized,
                expected_behavior: ExpectedBehavior::SameStructure,
            });
        }
    }
    for &width in &PAD_WIDTHS {
        if let Some(padded) = zero_pad(base, width) {
            out.push(Counterfactual {
                label: if width == 1 { "zero_pad_1" } else { "zero_pad_2" },
                input: padded,
                expected_behavior: ExpectedBehavior::SameStructure,
            });
        }
    }
    if let Some(remapped) = color_remap(base, remap_seed) {
        out.push(Counterfactual {
            label: "color_remap",
            input: remapped,
            expected_behavior: ExpectedBehavior::SameTransformation,
        });
    }
    out
}

fn resize_nearest(base: &Grid, factor: f64) -> Option<Grid> {
    let new_h = ((base.height() as f64) * factor).round().max(1.0) as usize;
    let new_w = ((base.width() as f64) * factor).round().max(1.0) as usize;
    if new_h == 0 || new_w == 0 || new_h > MAX_DIMENSION || new_w > MAX_DIMENSION {
        return None;
    }
    let mut cells = Vec::with_capacity(new_h * new_w);
    for row in 0..new_h {
        let src_row = ((row as f64 + 0.5) / factor).floor() as usize;
        let src_row = src_row.min(base.height() - 1);
        for col in 0..new_w {
            let src_col = ((col as f64 + 0.5) / factor).floor() as usize;
            let src_col = src_col.min(base.width() - 1);
            cells.push(base.get(src_row, src_col).unwrap_or(0));
        }
    }
    Some(Grid::new(new_h, new_w, cells))
}

fn zero_pad(base: &Grid, width: usize) -> Option<Grid> {
    let new_h = base.height() + 2 * width;
    let new_w = base.width() + 2 * width;
    if new_h > MAX_DIMENSION || new_w > MAX_DIMENSION {
        return None;
    }
    let mut out = Grid::filled(new_h, new_w, 0);
    for (row, col, color) in base.iter_cells() {
        out.set(row + width, col + width, color);
    }
    Some(out)
}

/// Permutes the non-background palette via a fixed-seed shuffle, skipped when
/// there are fewer than two non-background colors to permute.
fn color_remap(base: &Grid, seed: u64) -> Option<Grid> {
    let mut non_background: Vec<u8> = base.palette().into_iter().filter(|&c| c != 0).collect();
    if non_background.len() < 2 {
        return None;
    }
    let mut permuted = non_background.clone();
    let n = permuted.len();
    let mut state = seed.wrapping_add(1);
    for i in (1..n).rev() {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let j = (state >> 33) as usize % (i + 1);
        permuted.swap(i, j);
    }
    non_background.sort_unstable();
    let mapping: std::collections::HashMap<u8, u8> = non_background.into_iter().zip(permuted).collect();
    Some(base.map_colors(|c| *mapping.get(&c).unwrap_or(&c)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_down_halves_dimensions() {
        let base = Grid::from_rows(&[vec![1, 1], vec![1, 1]]);
        let resized = resize_nearest(&base, 0.5).unwrap();
        assert_eq!((resized.height(), resized.width()), (1, 1));
    }

    #[test]
    fn resize_up_skipped_when_it_would_exceed_the_bound() {
        let base = Grid::filled(20, 20, 1);
        assert!(resize_nearest(&base, 2.0).is_none());
    }

    #[test]
    fn zero_pad_surrounds_content_with_background() {
        let base = Grid::from_rows(&[vec![1]]);
        let padded = zero_pad(&base, 1).unwrap();
        assert_eq!((padded.height(), padded.width()), (3, 3));
        assert_eq!(padded.get(1, 1), Some(1));
        assert_eq!(padded.get(0, 0), Some(0));
    }

    #[test]
    fn color_remap_is_none_on_mostly_background_grid() {
        let base = Grid::from_rows(&[vec![0, 1]]);
        assert!(color_remap(&base, 1).is_none());
    }

    #[test]
    fn color_remap_preserves_palette() {
        let base = Grid::from_rows(&[vec![1, 2, 3]]);
        let remapped = color_remap(&base, 42).unwrap();
        assert_eq!(remapped.palette(), base.palette());
    }
}
