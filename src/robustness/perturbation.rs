use super::Counterfactual;
use crate::grid::Grid;
use rand::rngs::SmallRng;
use rand::Rng;

/// Which comparison rule a counterfactual's output should be judged against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedBehavior {
    /// The transformation should still "look the same": same dimensions, similar
    /// output palette.
    SameTransformation,
    /// The transformation should preserve structure (the shape of the non-background
    /// mask) even though its dimensions may legitimately change.
    SameStructure,
    /// No particular relationship is expected beyond "it ran and produced something".
    Unconstrained,
}

/// Pixel noise, color swap, a one-cell shift, and a single-pixel flip -- the four
/// perturbation-family generators. Each is skipped (not substituted with a no-op)
/// when the base grid can't support it, per `RobustnessReport`'s accounting of what
/// was actually evaluated.
pub fn generate(base: &Grid, perturbation_rate: f64, rng: &mut SmallRng) -> Vec<Counterfactual> {
    let mut out = Vec::with_capacity(4);
    out.push(Counterfactual {
        label: "pixel_noise",
        input: pixel_noise(base, perturbation_rate, rng),
        expected_behavior: ExpectedBehavior::SameTransformation,
    });
    if let Some(swapped) = color_swap(base, rng) {
        out.push(Counterfactual {
            label: "color_swap",
            input: swapped,
            expected_behavior: ExpectedBehavior::SameTransformation,
        });
    }
    out.push(Counterfactual {
        label: "shift",
        input: one_cell_shift(base, rng),
        expected_behavior: ExpectedBehavior::SameTransformation,
    });
    out.push(Counterfactual {
        label: "pixel_flip",
        input: pixel_flip(base, rng),
        expected_behavior: ExpectedBehavior::SameTransformation,
    });
    out
}

/// Overwrites `perturbation_rate * area` cells with a random color, floored at one
/// cell so the rate can never silently become a no-op on tiny grids.
fn pixel_noise(base: &Grid, perturbation_rate: f64, rng: &mut SmallRng) -> Grid {
    let mut out = base.clone();
    let area = base.area();
    let count = ((perturbation_rate * area as f64).round() as usize).max(1).min(area);
    for _ in 0..count {
        let row = rng.gen_range(0..base.height());
        let col = rng.gen_range(0..base.width());
        let color = rng.gen_range(0..=9u8);
        out.set(row, col, color);
    }
    out
}

fn color_swap(base: &Grid, rng: &mut SmallRng) -> Option<Grid> {
    let palette: Vec<u8> = base.palette().into_iter().collect();
    if palette.len() < 2 {
        return None;
    }
    let i = rng.gen_range(0..palette.len());
    let mut j = rng.gen_range(0..palette.len());
    while j == i {
        j = rng.gen_range(0..palette.len());
    }
    let (a, b) = (palette[i], palette[j]);
    Some(base.map_colors(|c| if c == a { b } else if c == b { a } else { c }))
}

/// Shifts content by `(dr, dc)` with `dr, dc in {-1, 0, 1}`, excluding the no-op
/// `(0, 0)`, zero-filling vacated cells.
fn one_cell_shift(base: &Grid, rng: &mut SmallRng) -> Grid {
    let offsets = [(-1i64, -1i64), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)];
    let (dr, dc) = offsets[rng.gen_range(0..offsets.len())];
    let mut out = Grid::filled(base.height(), base.width(), 0);
    for (row, col, color) in base.iter_cells() {
        let nr = row as i64 + dr;
        let nc = col as i64 + dc;
        if nr >= 0 && nc >= 0 && (nr as usize) < base.height() && (nc as usize) < base.width() {
            out.set(nr as usize, nc as usize, color);
        }
    }
    out
}

fn pixel_flip(base: &Grid, rng: &mut SmallRng) -> Grid {
    let mut out = base.clone();
    let row = rng.gen_range(0..base.height());
    let col = rng.gen_range(0..base.width());
    let value = out.get(row, col).unwrap_or(0);
    out.set(row, col, (value + 1) % 10);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    #[test]
    fn pixel_noise_touches_at_least_one_cell_on_a_one_by_one_grid() {
        let base = Grid::from_rows(&[vec![1]]);
        let noisy = pixel_noise(&base, 0.0, &mut rng());
        assert_eq!(noisy.area(), 1);
    }

    #[test]
    fn color_swap_is_none_on_a_monochrome_grid() {
        let base = Grid::filled(2, 2, 3);
        assert!(color_swap(&base, &mut rng()).is_none());
    }

    #[test]
    fn color_swap_preserves_palette_size() {
        let base = Grid::from_rows(&[vec![1, 2], vec![2, 1]]);
        let swapped = color_swap(&base, &mut rng()).unwrap();
        assert_eq!(swapped.palette(), base.palette());
    }

    #[test]
    fn shift_preserves_dimensions() {
        let base = Grid::from_rows(&[vec![1, 2], vec![3, 4]]);
        let shifted = one_cell_shift(&base, &mut rng());
        assert_eq!((shifted.height(), shifted.width()), (base.height(), base.width()));
    }

    #[test]
    fn generate_skips_color_swap_on_monochrome_base() {
        let base = Grid::filled(2, 2, 0);
        let cfs = generate(&base, 0.1, &mut rng());
        assert!(cfs.iter().all(|c| c.label != "color_swap"));
    }
}
