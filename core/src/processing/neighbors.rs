use crate::math::matrix::MatrixHelper;
use crate::prelude::NeighborStrategy;
use ndarray::ArrayView2;
use rustc_hash::FxHashMap;

/// Slack on the grid cell size so that two points closer than epsilon never
/// land more than one cell apart after floating-point division.
const CELL_PADDING: f64 = 1.0 + 1e-9;

/// Epsilon-neighborhood lookup over a `n x 2` coordinate matrix.
///
/// A point is a neighbor of `index` when its planar distance is strictly less
/// than epsilon; `index` itself is always part of its own neighborhood.
/// Implementations must return indices in ascending order.
pub trait NeighborSearch {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn region(&self, index: usize) -> Vec<usize>;
}

/// Brute-force scan over every point.
pub struct LinearScan<'a> {
    features: ArrayView2<'a, f64>,
    epsilon: f64,
}

impl<'a> LinearScan<'a> {
    pub fn new(features: ArrayView2<'a, f64>, epsilon: f64) -> Self {
        Self { features, epsilon }
    }
}

impl NeighborSearch for LinearScan<'_> {
    fn len(&self) -> usize {
        self.features.nrows()
    }

    fn region(&self, index: usize) -> Vec<usize> {
        (0..self.len())
            .filter(|&other| {
                other == index
                    || MatrixHelper::planar_distance(self.features, index, other) < self.epsilon
            })
            .collect()
    }
}

/// Uniform grid bucketed by epsilon-sized cells; only the 3x3 block of cells
/// around a point is scanned.
pub struct GridIndex<'a> {
    features: ArrayView2<'a, f64>,
    epsilon: f64,
    cell_size: f64,
    cells: FxHashMap<(i64, i64), Vec<usize>>,
}

impl<'a> GridIndex<'a> {
    pub fn new(features: ArrayView2<'a, f64>, epsilon: f64) -> Self {
        let cell_size = epsilon * CELL_PADDING;
        let mut cells: FxHashMap<(i64, i64), Vec<usize>> = FxHashMap::default();
        if Self::usable(epsilon) {
            for index in 0..features.nrows() {
                let key = cell_of(features[[index, 0]], features[[index, 1]], cell_size);
                cells.entry(key).or_default().push(index);
            }
        }
        Self {
            features,
            epsilon,
            cell_size,
            cells,
        }
    }

    fn usable(epsilon: f64) -> bool {
        epsilon.is_finite() && epsilon > 0.0
    }
}

impl NeighborSearch for GridIndex<'_> {
    fn len(&self) -> usize {
        self.features.nrows()
    }

    fn region(&self, index: usize) -> Vec<usize> {
        if !Self::usable(self.epsilon) {
            // Nothing is strictly closer than a non-positive radius.
            return vec![index];
        }

        let (row, col) = cell_of(
            self.features[[index, 0]],
            self.features[[index, 1]],
            self.cell_size,
        );
        let mut candidates = Vec::new();
        for d_row in -1i64..=1 {
            for d_col in -1i64..=1 {
                let key = (row.saturating_add(d_row), col.saturating_add(d_col));
                if let Some(bucket) = self.cells.get(&key) {
                    candidates.extend(bucket.iter().copied().filter(|&other| {
                        other == index
                            || MatrixHelper::planar_distance(self.features, index, other)
                                < self.epsilon
                    }));
                }
            }
        }
        candidates.sort_unstable();
        candidates.dedup();
        candidates
    }
}

fn cell_of(latitude: f64, longitude: f64, cell_size: f64) -> (i64, i64) {
    (
        (latitude / cell_size).floor() as i64,
        (longitude / cell_size).floor() as i64,
    )
}

/// Builds the neighbor search for a strategy.
pub fn build_search<'a>(
    strategy: NeighborStrategy,
    features: ArrayView2<'a, f64>,
    epsilon: f64,
) -> Box<dyn NeighborSearch + 'a> {
    match strategy {
        NeighborStrategy::Linear => Box::new(LinearScan::new(features, epsilon)),
        NeighborStrategy::Grid => Box::new(GridIndex::new(features, epsilon)),
    }
}
