//! Win patterns: which of the 25 card cells must be covered.

use crate::errors::PatternError;
use crate::game::card::GRID_SIZE;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 5x5 boolean mask; `true` marks a cell that must be covered for a win.
///
/// An all-false mask would make every card an instant winner, so it is
/// rejected here at construction and can never reach the evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMask {
    cells: [[bool; GRID_SIZE]; GRID_SIZE],
}

impl PatternMask {
    pub fn new(cells: [[bool; GRID_SIZE]; GRID_SIZE]) -> Result<Self, PatternError> {
        if !cells.iter().flatten().any(|&required| required) {
            return Err(PatternError::EmptyMask);
        }
        Ok(Self { cells })
    }

    /// Build a mask from a `(row, col)` position list, the persisted pattern
    /// format. Out-of-grid positions are rejected; duplicates collapse.
    pub fn from_positions(positions: &[(usize, usize)]) -> Result<Self, PatternError> {
        let mut cells = [[false; GRID_SIZE]; GRID_SIZE];
        for &(row, col) in positions {
            if row >= GRID_SIZE || col >= GRID_SIZE {
                return Err(PatternError::PositionOutOfBounds { row, col });
            }
            cells[row][col] = true;
        }
        Self::new(cells)
    }

    /// Whether the cell at (row, col) must be covered
    pub fn requires(&self, row: usize, col: usize) -> bool {
        self.cells[row][col]
    }

    /// Required positions in row-major order
    pub fn positions(&self) -> Vec<(usize, usize)> {
        let mut positions = Vec::new();
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                if self.cells[row][col] {
                    positions.push((row, col));
                }
            }
        }
        positions
    }

    pub fn required_count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&required| required).count()
    }

    // Built-in masks matching the shapes administrators configure most.

    pub fn row(row: usize) -> Result<Self, PatternError> {
        if row >= GRID_SIZE {
            return Err(PatternError::PositionOutOfBounds { row, col: 0 });
        }
        let mut cells = [[false; GRID_SIZE]; GRID_SIZE];
        cells[row] = [true; GRID_SIZE];
        Self::new(cells)
    }

    pub fn column(col: usize) -> Result<Self, PatternError> {
        if col >= GRID_SIZE {
            return Err(PatternError::PositionOutOfBounds { row: 0, col });
        }
        let mut cells = [[false; GRID_SIZE]; GRID_SIZE];
        for row_cells in cells.iter_mut() {
            row_cells[col] = true;
        }
        Self::new(cells)
    }

    pub fn diagonal() -> Self {
        let mut cells = [[false; GRID_SIZE]; GRID_SIZE];
        for i in 0..GRID_SIZE {
            cells[i][i] = true;
        }
        Self { cells }
    }

    pub fn anti_diagonal() -> Self {
        let mut cells = [[false; GRID_SIZE]; GRID_SIZE];
        for i in 0..GRID_SIZE {
            cells[i][GRID_SIZE - 1 - i] = true;
        }
        Self { cells }
    }

    pub fn four_corners() -> Self {
        let mut cells = [[false; GRID_SIZE]; GRID_SIZE];
        let last = GRID_SIZE - 1;
        cells[0][0] = true;
        cells[0][last] = true;
        cells[last][0] = true;
        cells[last][last] = true;
        Self { cells }
    }

    pub fn full_house() -> Self {
        Self {
            cells: [[true; GRID_SIZE]; GRID_SIZE],
        }
    }
}

impl Serialize for PatternMask {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.positions().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PatternMask {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;
        let positions = Vec::<(usize, usize)>::deserialize(deserializer)?;
        PatternMask::from_positions(&positions).map_err(D::Error::custom)
    }
}

/// Administrator-authored pattern: a named, immutable mask referenced by
/// rounds and bets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub mask: PatternMask,
}

impl Pattern {
    pub fn new(name: impl Into<String>, mask: PatternMask) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            mask,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The stock patterns shipped with a fresh install
    pub fn builtin_catalog() -> Vec<Pattern> {
        let mut catalog = Vec::new();
        let row_names = ["top-row", "second-row", "middle-row", "fourth-row", "bottom-row"];
        for (row, name) in row_names.into_iter().enumerate() {
            if let Ok(mask) = PatternMask::row(row) {
                catalog.push(Pattern::new(name, mask));
            }
        }
        catalog.push(Pattern::new("diagonal", PatternMask::diagonal()));
        catalog.push(Pattern::new("anti-diagonal", PatternMask::anti_diagonal()));
        catalog.push(Pattern::new("four-corners", PatternMask::four_corners()));
        catalog.push(Pattern::new("full-house", PatternMask::full_house()));
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mask_rejected() {
        let cells = [[false; GRID_SIZE]; GRID_SIZE];
        assert_eq!(PatternMask::new(cells), Err(PatternError::EmptyMask));
        assert_eq!(
            PatternMask::from_positions(&[]),
            Err(PatternError::EmptyMask)
        );
    }

    #[test]
    fn test_position_out_of_bounds_rejected() {
        assert_eq!(
            PatternMask::from_positions(&[(0, 5)]),
            Err(PatternError::PositionOutOfBounds { row: 0, col: 5 })
        );
    }

    #[test]
    fn test_top_row_positions() {
        let mask = PatternMask::row(0).unwrap();
        assert_eq!(
            mask.positions(),
            vec![(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)]
        );
        assert_eq!(mask.required_count(), 5);
    }

    #[test]
    fn test_diagonal_includes_center() {
        let mask = PatternMask::diagonal();
        assert!(mask.requires(2, 2));
        assert_eq!(mask.required_count(), 5);
    }

    #[test]
    fn test_four_corners() {
        let mask = PatternMask::four_corners();
        assert_eq!(mask.positions(), vec![(0, 0), (0, 4), (4, 0), (4, 4)]);
    }

    #[test]
    fn test_full_house_requires_everything() {
        assert_eq!(PatternMask::full_house().required_count(), 25);
    }

    #[test]
    fn test_mask_serde_round_trip_as_positions() {
        let mask = PatternMask::from_positions(&[(0, 0), (1, 1), (2, 2)]).unwrap();
        let json = serde_json::to_string(&mask).unwrap();
        assert_eq!(json, "[[0,0],[1,1],[2,2]]");
        let back: PatternMask = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mask);
    }

    #[test]
    fn test_serde_rejects_empty_position_list() {
        assert!(serde_json::from_str::<PatternMask>("[]").is_err());
    }

    #[test]
    fn test_builtin_catalog_names_are_unique() {
        let catalog = Pattern::builtin_catalog();
        let names: std::collections::HashSet<_> =
            catalog.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names.len(), catalog.len());
    }
}
