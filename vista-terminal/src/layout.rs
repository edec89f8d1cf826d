//! Card grid layout in terminal cells, with pixel conversion for the engine
use vista_core::{Point, Rect};

/// Nominal size of one terminal cell in CSS pixels
pub const CELL_WIDTH_PX: f32 = 8.0;
pub const CELL_HEIGHT_PX: f32 = 16.0;

/// Rows taken by the status line at the top of the screen
pub const HEADER_ROWS: u16 = 1;

const CARD_ROWS: u32 = 6;
const GUTTER: u16 = 2;
const TWO_COLUMN_MIN_WIDTH: u16 = 60;

/// Position of a card in document cells (row 0 is the top of the grid)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub column: u16,
    pub row: u32,
    pub width: u16,
    pub height: u32,
}

impl CellRect {
    pub fn bottom(&self) -> u32 {
        self.row + self.height
    }

    pub fn contains(&self, column: u16, row: u32) -> bool {
        column >= self.column && column < self.column + self.width && row >= self.row && row < self.bottom()
    }
}

/// Lays out `count` cards in one or two columns depending on terminal width
#[derive(Debug, Clone)]
pub struct CardGrid {
    count: usize,
    columns: u16,
    card_width: u16,
}

impl CardGrid {
    pub fn new(count: usize, term_width: u16) -> Self {
        let columns = if term_width >= TWO_COLUMN_MIN_WIDTH { 2 } else { 1 };
        let usable = term_width.saturating_sub(GUTTER * (columns + 1));
        Self {
            count,
            columns,
            card_width: (usable / columns).max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn cell_rect(&self, index: usize) -> CellRect {
        let column_index = (index % self.columns as usize) as u16;
        let row_index = (index / self.columns as usize) as u32;
        CellRect {
            column: GUTTER + column_index * (self.card_width + GUTTER),
            row: row_index * (CARD_ROWS + 1),
            width: self.card_width,
            height: CARD_ROWS,
        }
    }

    /// Total document height in rows
    pub fn content_rows(&self) -> u32 {
        let rows = self.count.div_ceil(self.columns as usize) as u32;
        rows * (CARD_ROWS + 1)
    }

    /// Card bounds in document pixels
    pub fn document_rect(&self, index: usize) -> Rect {
        let cell = self.cell_rect(index);
        Rect::new(
            cell.column as f32 * CELL_WIDTH_PX,
            cell.row as f32 * CELL_HEIGHT_PX,
            cell.width as f32 * CELL_WIDTH_PX,
            cell.height as f32 * CELL_HEIGHT_PX,
        )
    }

    /// Card bounds in screen pixels for a given scroll offset
    pub fn client_rect(&self, index: usize, scroll: u32) -> Rect {
        let mut rect = self.document_rect(index);
        rect.top += (HEADER_ROWS as f32 - scroll as f32) * CELL_HEIGHT_PX;
        rect
    }

    /// Card under a screen cell, if any
    pub fn hit_test(&self, column: u16, screen_row: u16, scroll: u32) -> Option<usize> {
        let row = (screen_row.checked_sub(HEADER_ROWS)? as u32) + scroll;
        (0..self.count).find(|&index| self.cell_rect(index).contains(column, row))
    }
}

/// Visible part of the document, in pixels
pub fn viewport(term_width: u16, term_height: u16, scroll: u32) -> Rect {
    Rect::new(
        0.0,
        scroll as f32 * CELL_HEIGHT_PX,
        term_width as f32 * CELL_WIDTH_PX,
        term_height.saturating_sub(HEADER_ROWS) as f32 * CELL_HEIGHT_PX,
    )
}

/// Center of a screen cell in client pixels
pub fn cell_center(column: u16, row: u16) -> Point {
    Point::new(
        (column as f32 + 0.5) * CELL_WIDTH_PX,
        (row as f32 + 0.5) * CELL_HEIGHT_PX,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_columns_on_wide_terminal() {
        let grid = CardGrid::new(5, 80);
        assert_eq!(grid.cell_rect(0).column, 2);
        assert_eq!(grid.cell_rect(1).row, 0);
        assert_eq!(grid.cell_rect(2).row, 7);
        assert_eq!(grid.content_rows(), 21);
    }

    #[test]
    fn test_single_column_on_narrow_terminal() {
        let grid = CardGrid::new(3, 40);
        assert_eq!(grid.cell_rect(1).column, 2);
        assert_eq!(grid.cell_rect(1).row, 7);
        assert_eq!(grid.cell_rect(0).width, 36);
    }

    #[test]
    fn test_hit_test_respects_scroll_and_header() {
        let grid = CardGrid::new(4, 80);
        assert_eq!(grid.hit_test(3, 1, 0), Some(0));
        assert_eq!(grid.hit_test(3, 0, 0), None);
        // Gutter between the rows
        assert_eq!(grid.hit_test(3, 7, 0), None);
        assert_eq!(grid.hit_test(3, 1, 7), Some(2));
    }

    #[test]
    fn test_pointer_over_card_is_inside_client_rect() {
        let grid = CardGrid::new(4, 80);
        let rect = grid.client_rect(2, 3);
        // Card 2 starts at document row 7, so screen row 7 - 3 + 1 = 5
        assert!(rect.contains(cell_center(3, 5)));
        assert!(!rect.contains(cell_center(3, 4)));
    }
}
