//! Card layout: the 5x5 grid of drawn numbers with a free center cell.
//!
//! All shape and range invariants are enforced when a layout is constructed
//! or deserialized; a `CardLayout` in hand is always well-formed, so the
//! win evaluator never has to re-check it.

use crate::errors::CardError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Rows and columns per card
pub const GRID_SIZE: usize = 5;
/// Numbers owned by each column band
pub const NUMBERS_PER_COLUMN: u8 = 15;
/// Highest callable number
pub const MAX_NUMBER: u8 = 75;
/// Grid position of the free cell
pub const FREE_POSITION: (usize, usize) = (2, 2);

/// Canonical marker emitted for the free cell in the column-keyed format
const FREE_MARKER: &str = "FREE";

/// The five fixed column bands of a bingo card
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Column {
    B,
    I,
    N,
    G,
    O,
}

impl Column {
    /// All columns in grid order
    pub const ALL: [Column; GRID_SIZE] = [Column::B, Column::I, Column::N, Column::G, Column::O];

    /// Grid column index, 0..=4
    pub fn index(self) -> usize {
        match self {
            Column::B => 0,
            Column::I => 1,
            Column::N => 2,
            Column::G => 3,
            Column::O => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The disjoint 15-wide number range owned by this column
    pub fn range(self) -> RangeInclusive<u8> {
        let min = self.index() as u8 * NUMBERS_PER_COLUMN + 1;
        min..=min + NUMBERS_PER_COLUMN - 1
    }

    /// Column that owns `number`, if it is callable at all
    pub fn of_number(number: u8) -> Option<Self> {
        if number == 0 || number > MAX_NUMBER {
            return None;
        }
        Self::from_index((number - 1) as usize / NUMBERS_PER_COLUMN as usize)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Column::B => "B",
            Column::I => "I",
            Column::N => "N",
            Column::G => "G",
            Column::O => "O",
        };
        write!(f, "{}", letter)
    }
}

/// One cell of a card: a drawn number or the free space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Number(u8),
    Free,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Free => write!(f, "{}", FREE_MARKER),
        }
    }
}

/// Immutable 5x5 card grid, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardLayout {
    grid: [[Cell; GRID_SIZE]; GRID_SIZE],
}

impl CardLayout {
    /// Build a layout from a row-major grid, enforcing all card invariants:
    /// the center cell (and only the center cell) is free, and each column's
    /// numbers are distinct and within that column's range.
    pub fn from_grid(grid: [[Cell; GRID_SIZE]; GRID_SIZE]) -> Result<Self, CardError> {
        let (free_row, free_col) = FREE_POSITION;
        if grid[free_row][free_col] != Cell::Free {
            return Err(CardError::CenterNotFree);
        }

        for col_idx in 0..GRID_SIZE {
            let column = Column::from_index(col_idx).unwrap_or(Column::B);
            let range = column.range();
            let mut seen = [false; NUMBERS_PER_COLUMN as usize];

            for row in 0..GRID_SIZE {
                match grid[row][col_idx] {
                    Cell::Free => {
                        if (row, col_idx) != FREE_POSITION {
                            return Err(CardError::MisplacedFree { row, col: col_idx });
                        }
                    }
                    Cell::Number(number) => {
                        if !range.contains(&number) {
                            return Err(CardError::OutOfRange {
                                column,
                                number,
                                min: *range.start(),
                                max: *range.end(),
                            });
                        }
                        let slot = (number - range.start()) as usize;
                        if seen[slot] {
                            return Err(CardError::DuplicateInColumn { column, number });
                        }
                        seen[slot] = true;
                    }
                }
            }
        }

        Ok(Self { grid })
    }

    /// Build a layout from per-column cell vectors (the persisted shape),
    /// mapping column `c`, row `r` to grid position `[r][c]`.
    pub fn from_columns(columns: [Vec<Cell>; GRID_SIZE]) -> Result<Self, CardError> {
        let mut grid = [[Cell::Free; GRID_SIZE]; GRID_SIZE];
        for (col_idx, cells) in columns.iter().enumerate() {
            if cells.len() != GRID_SIZE {
                let column = Column::from_index(col_idx).unwrap_or(Column::B);
                return Err(CardError::BadColumnLength {
                    column,
                    len: cells.len(),
                });
            }
            for (row, cell) in cells.iter().enumerate() {
                grid[row][col_idx] = *cell;
            }
        }
        Self::from_grid(grid)
    }

    /// Internal constructor for callers that uphold the invariants themselves
    /// (the generator draws without replacement from each column range).
    pub(crate) fn from_parts(grid: [[Cell; GRID_SIZE]; GRID_SIZE]) -> Self {
        Self { grid }
    }

    /// Cell at (row, col). Panics if either index is out of the 5x5 grid.
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.grid[row][col]
    }

    /// Row-major view of the grid
    pub fn rows(&self) -> &[[Cell; GRID_SIZE]; GRID_SIZE] {
        &self.grid
    }

    /// Cells of one column, top to bottom
    pub fn column(&self, column: Column) -> [Cell; GRID_SIZE] {
        let col = column.index();
        std::array::from_fn(|row| self.grid[row][col])
    }
}

/// Column-keyed persisted form: `{"B": [..], "N": [31, 32, "FREE", 33, 34], ..}`
#[derive(Serialize, Deserialize)]
struct ColumnsRepr {
    #[serde(rename = "B")]
    b: Vec<CellRepr>,
    #[serde(rename = "I")]
    i: Vec<CellRepr>,
    #[serde(rename = "N")]
    n: Vec<CellRepr>,
    #[serde(rename = "G")]
    g: Vec<CellRepr>,
    #[serde(rename = "O")]
    o: Vec<CellRepr>,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum CellRepr {
    Number(u8),
    Marker(String),
}

impl From<Cell> for CellRepr {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Number(n) => CellRepr::Number(n),
            Cell::Free => CellRepr::Marker(FREE_MARKER.to_string()),
        }
    }
}

impl TryFrom<CellRepr> for Cell {
    type Error = CardError;

    fn try_from(repr: CellRepr) -> Result<Self, CardError> {
        match repr {
            CellRepr::Number(n) => Ok(Cell::Number(n)),
            // Legacy data carries both "free" and "FREE"; accept either.
            CellRepr::Marker(m) if m.eq_ignore_ascii_case(FREE_MARKER) => Ok(Cell::Free),
            CellRepr::Marker(m) => Err(CardError::BadCellMarker(m)),
        }
    }
}

impl Serialize for CardLayout {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let col = |c: Column| self.column(c).into_iter().map(CellRepr::from).collect();
        ColumnsRepr {
            b: col(Column::B),
            i: col(Column::I),
            n: col(Column::N),
            g: col(Column::G),
            o: col(Column::O),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CardLayout {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let repr = ColumnsRepr::deserialize(deserializer)?;
        let convert = |cells: Vec<CellRepr>| -> Result<Vec<Cell>, D::Error> {
            cells
                .into_iter()
                .map(|c| Cell::try_from(c).map_err(D::Error::custom))
                .collect()
        };

        let columns = [
            convert(repr.b)?,
            convert(repr.i)?,
            convert(repr.n)?,
            convert(repr.g)?,
            convert(repr.o)?,
        ];
        CardLayout::from_columns(columns).map_err(D::Error::custom)
    }
}
