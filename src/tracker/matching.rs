//! Matching utilities for centroid tracking.

use ndarray::{Array2, ArrayView1};

use crate::tracker::bounding_box::BoundingBox;

/// Compute the Euclidean centroid distance matrix between objects and detections.
///
/// Returns a matrix of shape (M, N) where M is the length of `object_boxes`
/// and N is the length of `det_boxes`.
pub fn centroid_distance(object_boxes: &[BoundingBox], det_boxes: &[BoundingBox]) -> Array2<f64> {
    let mut dists = Array2::zeros((object_boxes.len(), det_boxes.len()));
    for (i, o) in object_boxes.iter().enumerate() {
        let (ox, oy) = o.centroid();
        for (j, d) in det_boxes.iter().enumerate() {
            let (dx, dy) = d.centroid();
            dists[[i, j]] = (ox - dx).hypot(oy - dy);
        }
    }
    dists
}

/// Outcome of matching the rows (objects) of a distance matrix to its columns
/// (detections).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentResult {
    pub matches: Vec<(usize, usize)>,
    pub unmatched_objects: Vec<usize>,
    pub unmatched_detections: Vec<usize>,
}

impl AssignmentResult {
    /// Build a result from matched pairs, deriving the unmatched indices in
    /// ascending order.
    pub fn from_matches(matches: Vec<(usize, usize)>, num_rows: usize, num_cols: usize) -> Self {
        let mut row_used = vec![false; num_rows];
        let mut col_used = vec![false; num_cols];
        for &(row, col) in &matches {
            row_used[row] = true;
            col_used[col] = true;
        }

        let unused = |used: Vec<bool>| -> Vec<usize> {
            used.iter()
                .enumerate()
                .filter_map(|(i, &u)| if u { None } else { Some(i) })
                .collect()
        };

        Self {
            matches,
            unmatched_objects: unused(row_used),
            unmatched_detections: unused(col_used),
        }
    }
}

/// Strategy that pairs existing objects with new detections.
///
/// Implementations receive an (objects x detections) distance matrix and
/// must never use a row or a column twice.
pub trait AssignmentStrategy {
    fn assign(&self, distances: &Array2<f64>) -> AssignmentResult;
}

/// Greedy nearest-neighbour assignment.
///
/// Rows are visited in ascending order of their smallest distance and each
/// row claims its closest column unless that row or column was already
/// taken. Not globally optimal.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyAssignment;

impl AssignmentStrategy for GreedyAssignment {
    fn assign(&self, distances: &Array2<f64>) -> AssignmentResult {
        let (num_rows, num_cols) = distances.dim();

        if num_rows == 0 || num_cols == 0 {
            return AssignmentResult::from_matches(vec![], num_rows, num_cols);
        }

        let mut candidates: Vec<(usize, usize, f64)> = distances
            .outer_iter()
            .enumerate()
            .map(|(row, dists)| {
                let (col, dist) = arg_min(dists);
                (row, col, dist)
            })
            .collect();
        // Stable sort: equal minima keep row order.
        candidates.sort_by(|a, b| a.2.total_cmp(&b.2));

        let mut used_rows = vec![false; num_rows];
        let mut used_cols = vec![false; num_cols];
        let mut matches = Vec::new();

        for (row, col, _) in candidates {
            if used_rows[row] || used_cols[col] {
                continue;
            }
            used_rows[row] = true;
            used_cols[col] = true;
            matches.push((row, col));
        }

        AssignmentResult::from_matches(matches, num_rows, num_cols)
    }
}

/// Index and value of the first minimum in a non-empty row.
fn arg_min(row: ArrayView1<f64>) -> (usize, f64) {
    let mut best = (0, row[0]);
    for (j, &d) in row.iter().enumerate().skip(1) {
        if d < best.1 {
            best = (j, d);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_centroid_distance() {
        let objects = [BoundingBox::new(0, 0, 10, 10)];
        let dets = [BoundingBox::new(0, 0, 10, 10), BoundingBox::new(3, 4, 13, 14)];
        let dists = centroid_distance(&objects, &dets);
        assert_eq!(dists.dim(), (1, 2));
        assert_eq!(dists[[0, 0]], 0.0);
        assert!((dists[[0, 1]] - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_greedy_takes_smallest_distance_first() {
        // Row 1 is closer to column 0 than row 0 is, so it wins that column.
        let dists = array![[2.0, 9.0], [1.0, 8.0]];
        let result = GreedyAssignment.assign(&dists);
        assert_eq!(result.matches, vec![(1, 0)]);
        assert_eq!(result.unmatched_objects, vec![0]);
        assert_eq!(result.unmatched_detections, vec![1]);
    }

    #[test]
    fn test_greedy_matches_disjoint_minima() {
        let dists = array![[1.0, 50.0, 70.0], [60.0, 2.0, 40.0]];
        let result = GreedyAssignment.assign(&dists);
        assert_eq!(result.matches, vec![(0, 0), (1, 1)]);
        assert!(result.unmatched_objects.is_empty());
        assert_eq!(result.unmatched_detections, vec![2]);
    }

    #[test]
    fn test_empty_matrix() {
        let dists = Array2::<f64>::zeros((0, 3));
        let result = GreedyAssignment.assign(&dists);
        assert!(result.matches.is_empty());
        assert_eq!(result.unmatched_detections, vec![0, 1, 2]);

        let dists = Array2::<f64>::zeros((2, 0));
        let result = GreedyAssignment.assign(&dists);
        assert_eq!(result.unmatched_objects, vec![0, 1]);
    }
}
