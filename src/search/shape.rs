//! Pipeline shapes.
//!
//! A shape is an ordered subset of production stages plus the share of the
//! time budget each stage receives. Stages run back to back: stage `k`'s
//! window opens when stage `k - 1`'s closes.

use serde::{Deserialize, Serialize};

use crate::models::TimeWindow;

/// An ordered stage sequence with its time split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineShape {
    /// Shape name, carried into every plan built from it.
    pub name: String,
    /// Catalog stages in pipeline order.
    pub stages: Vec<usize>,
    /// Fraction of the time budget per stage (sums to 1).
    pub proportions: Vec<f64>,
}

impl PipelineShape {
    /// Creates a shape.
    pub fn new(name: impl Into<String>, stages: Vec<usize>, proportions: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            stages,
            proportions,
        }
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// True for a shape without stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Consecutive stage windows for a budget starting at `now`.
    pub fn stage_windows(&self, now: f64, budget: f64) -> Vec<TimeWindow> {
        let mut start = now;
        self.proportions
            .iter()
            .map(|p| {
                let window = TimeWindow::starting_at(start, p * budget);
                start = window.end;
                window
            })
            .collect()
    }
}

/// The shapes a search tries, plus the two stage sequences used to derive
/// time budgets when a job has no deadline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeCatalog {
    /// Shapes in evaluation order.
    pub shapes: Vec<PipelineShape>,
    /// Fastest sequence (lower time budget).
    pub fastest: Vec<usize>,
    /// Slowest, most sequential sequence (upper time budget).
    pub slowest: Vec<usize>,
}

impl ShapeCatalog {
    /// Creates a catalog. The fastest sequence is the first shape with the
    /// fewest stages, the slowest the first with the most.
    pub fn new(shapes: Vec<PipelineShape>) -> Self {
        let fastest = shapes
            .iter()
            .min_by_key(|s| s.len())
            .map(|s| s.stages.clone())
            .unwrap_or_default();
        // max_by_key keeps the last maximum; reverse to keep the first.
        let slowest = shapes
            .iter()
            .rev()
            .max_by_key(|s| s.len())
            .map(|s| s.stages.clone())
            .unwrap_or_default();
        Self {
            shapes,
            fastest,
            slowest,
        }
    }

    /// Translation-market catalog over stages 0 (single-pass), 1
    /// (translate), 2 (edit) and 3 (proofread).
    ///
    /// | Shape | Stages    | Split           |
    /// |-------|-----------|-----------------|
    /// | A     | 0         | 1               |
    /// | B     | 1         | 1               |
    /// | C     | 1, 2      | 2/3, 1/3        |
    /// | D     | 1, 2, 3   | 6/9, 2/9, 1/9   |
    pub fn standard() -> Self {
        Self {
            shapes: vec![
                PipelineShape::new("A", vec![0], vec![1.0]),
                PipelineShape::new("B", vec![1], vec![1.0]),
                PipelineShape::new("C", vec![1, 2], vec![2.0 / 3.0, 1.0 / 3.0]),
                PipelineShape::new("D", vec![1, 2, 3], vec![6.0 / 9.0, 2.0 / 9.0, 1.0 / 9.0]),
            ],
            fastest: vec![1],
            slowest: vec![1, 2, 3],
        }
    }

    /// Every stage the catalog refers to, ascending.
    pub fn stages(&self) -> Vec<usize> {
        let mut stages: Vec<usize> = self
            .shapes
            .iter()
            .flat_map(|s| s.stages.iter().copied())
            .chain(self.fastest.iter().copied())
            .chain(self.slowest.iter().copied())
            .collect();
        stages.sort_unstable();
        stages.dedup();
        stages
    }

    /// Finds a shape by name.
    pub fn shape(&self, name: &str) -> Option<&PipelineShape> {
        self.shapes.iter().find(|s| s.name == name)
    }
}

impl Default for ShapeCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog() {
        let catalog = ShapeCatalog::standard();
        assert_eq!(catalog.shapes.len(), 4);
        assert_eq!(catalog.fastest, vec![1]);
        assert_eq!(catalog.slowest, vec![1, 2, 3]);
        assert_eq!(catalog.stages(), vec![0, 1, 2, 3]);
        for shape in &catalog.shapes {
            let sum: f64 = shape.proportions.iter().sum();
            assert!((sum - 1.0).abs() < 1e-12, "{}", shape.name);
        }
    }

    #[test]
    fn test_stage_windows_are_consecutive() {
        let catalog = ShapeCatalog::standard();
        let windows = catalog.shape("D").unwrap().stage_windows(5.0, 9.0);

        let expected = [(5.0, 11.0), (11.0, 13.0), (13.0, 14.0)];
        assert_eq!(windows.len(), 3);
        for (w, (start, end)) in windows.iter().zip(expected) {
            assert!((w.start - start).abs() < 1e-10);
            assert!((w.end - end).abs() < 1e-10);
        }
    }

    #[test]
    fn test_derived_budget_sequences() {
        let catalog = ShapeCatalog::new(vec![
            PipelineShape::new("long", vec![0, 1], vec![0.5, 0.5]),
            PipelineShape::new("short", vec![2], vec![1.0]),
            PipelineShape::new("short2", vec![3], vec![1.0]),
            PipelineShape::new("long2", vec![4, 5], vec![0.5, 0.5]),
        ]);
        assert_eq!(catalog.fastest, vec![2]);
        assert_eq!(catalog.slowest, vec![0, 1]);
    }

    #[test]
    fn test_empty_catalog_has_empty_sequences() {
        let catalog = ShapeCatalog::new(vec![]);
        assert!(catalog.fastest.is_empty());
        assert!(catalog.slowest.is_empty());
    }
}
