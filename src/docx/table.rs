//! Table geometry: logical columns, column spans and vertical merges.

use crate::schema::{Table, VMerge};
use serde::Serialize;

/// Merge markers declared on one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellMerge {
    /// `w:gridSpan`, at least 1
    pub grid_span: u32,
    /// `w:vMerge`
    pub v_merge: Option<VMerge>,
}

impl CellMerge {
    pub fn new(grid_span: u32, v_merge: Option<VMerge>) -> Self {
        Self {
            grid_span: grid_span.max(1),
            v_merge,
        }
    }

    /// A cell without any merge.
    pub fn single() -> Self {
        Self::new(1, None)
    }
}

/// Merge markers of one row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GridRow {
    /// Grid columns skipped before the first cell
    pub grid_before: u32,
    pub cells: Vec<CellMerge>,
}

impl GridRow {
    pub fn new(cells: Vec<CellMerge>) -> Self {
        Self {
            grid_before: 0,
            cells,
        }
    }

    pub fn with_grid_before(mut self, grid_before: u32) -> Self {
        self.grid_before = grid_before;
        self
    }
}

/// How one physical cell appears in the rendered grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CellGeometry {
    /// The cell produces output covering `colspan` x `rowspan` grid slots.
    Origin {
        row: usize,
        cell: usize,
        column: usize,
        colspan: u32,
        rowspan: u32,
    },
    /// Vertically continued from above; produces no output of its own.
    Continuation { row: usize, cell: usize, column: usize },
}

/// Where a cell sits in its table, for conditional formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellPosition {
    pub row: usize,
    /// Logical column
    pub column: usize,
    pub row_count: usize,
    pub column_count: usize,
    pub row_span: usize,
    pub column_span: usize,
}

impl CellPosition {
    pub fn new(row: usize, column: usize, row_count: usize, column_count: usize) -> Self {
        Self {
            row,
            column,
            row_count,
            column_count,
            row_span: 1,
            column_span: 1,
        }
    }

    pub fn with_spans(mut self, row_span: usize, column_span: usize) -> Self {
        self.row_span = row_span.max(1);
        self.column_span = column_span.max(1);
        self
    }

    pub fn is_first_row(&self) -> bool {
        self.row == 0
    }

    pub fn is_last_row(&self) -> bool {
        self.row + self.row_span >= self.row_count
    }

    pub fn is_first_column(&self) -> bool {
        self.column == 0
    }

    pub fn is_last_column(&self) -> bool {
        self.column + self.column_span >= self.column_count
    }
}

/// Merge matrix of a table.
#[derive(Debug, Clone, Default)]
pub struct TableGrid {
    rows: Vec<GridRow>,
    /// Logical start column of every cell, per row
    starts: Vec<Vec<usize>>,
    /// Columns declared by `w:tblGrid`
    declared_columns: usize,
}

impl TableGrid {
    /// Build from raw per-row markers.
    pub fn new(rows: Vec<GridRow>) -> Self {
        let starts = rows
            .iter()
            .map(|row| {
                let mut column = row.grid_before as usize;
                row.cells
                    .iter()
                    .map(|cell| {
                        let start = column;
                        column += cell.grid_span as usize;
                        start
                    })
                    .collect()
            })
            .collect();
        Self {
            rows,
            starts,
            declared_columns: 0,
        }
    }

    /// Build from a bound `w:tbl`.
    pub fn from_table(table: &Table<'_>) -> Self {
        let rows = table
            .rows()
            .iter()
            .map(|row| GridRow {
                grid_before: row.grid_before(),
                cells: row
                    .cells()
                    .iter()
                    .map(|cell| CellMerge::new(cell.grid_span(), cell.v_merge()))
                    .collect(),
            })
            .collect();
        let mut grid = Self::new(rows);
        grid.declared_columns = table.grid().map(|g| g.columns().len()).unwrap_or(0);
        grid
    }

    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widest row in grid columns, or the declared grid if wider.
    pub fn column_count(&self) -> usize {
        let widest = self
            .rows
            .iter()
            .zip(&self.starts)
            .filter_map(|(row, starts)| {
                let last = row.cells.last()?;
                Some(starts.last()? + last.grid_span as usize)
            })
            .max()
            .unwrap_or(0);
        widest.max(self.declared_columns)
    }

    /// Logical column of a physical cell.
    pub fn logical_column(&self, row: usize, cell: usize) -> Option<usize> {
        self.starts.get(row)?.get(cell).copied()
    }

    /// Physical index of the cell starting at a logical column.
    pub fn cell_at(&self, row: usize, column: usize) -> Option<usize> {
        self.starts.get(row)?.iter().position(|&start| start == column)
    }

    /// The cell's declared span, default 1.
    pub fn colspan_for(&self, row: usize, cell: usize) -> Option<u32> {
        self.rows.get(row)?.cells.get(cell).map(|c| c.grid_span)
    }

    /// Rows covered by the cell starting at `column` in `row`: itself plus
    /// every following row continuing the merge at the same logical column.
    pub fn rowspan_for(&self, row: usize, column: usize) -> u32 {
        let mut span = 1;
        for next in row + 1..self.rows.len() {
            let continues = self
                .cell_at(next, column)
                .map(|i| self.rows[next].cells[i].v_merge == Some(VMerge::Continue))
                .unwrap_or(false);
            if !continues {
                break;
            }
            span += 1;
        }
        span
    }

    /// Whether the cell only continues a merge from above.
    pub fn is_continuation(&self, row: usize, cell: usize) -> bool {
        self.rows
            .get(row)
            .and_then(|r| r.cells.get(cell))
            .map(|c| c.v_merge == Some(VMerge::Continue))
            .unwrap_or(false)
    }

    /// Geometry of every physical cell, row by row.
    pub fn layout(&self) -> Vec<Vec<CellGeometry>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(r, row)| {
                row.cells
                    .iter()
                    .enumerate()
                    .map(|(c, cell)| {
                        let column = self.starts[r][c];
                        if cell.v_merge == Some(VMerge::Continue) {
                            CellGeometry::Continuation { row: r, cell: c, column }
                        } else {
                            CellGeometry::Origin {
                                row: r,
                                cell: c,
                                column,
                                colspan: cell.grid_span,
                                rowspan: self.rowspan_for(r, column),
                            }
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// Position of a physical cell for table-style conditionals.
    pub fn position(&self, row: usize, cell: usize) -> Option<CellPosition> {
        let column = self.logical_column(row, cell)?;
        let colspan = self.colspan_for(row, cell)? as usize;
        let rowspan = self.rowspan_for(row, column) as usize;
        Some(
            CellPosition::new(row, column, self.row_count(), self.column_count())
                .with_spans(rowspan, colspan),
        )
    }
}
