//! Character-cell renderer for the card grid
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use vista_core::{Point, TiltTransform};

use crate::layout::{CellRect, CELL_WIDTH_PX, HEADER_ROWS};

/// Fill for cards that have not been revealed yet
const PLACEHOLDER: char = '·';

/// Cells of lean per unit of projected center shift (as a fraction of the
/// card's half width). A few degrees of tilt only moves the center by a
/// pixel or two, well below one cell.
const LEAN_GAIN: f32 = 240.0;

/// How a single card should be drawn this frame
#[derive(Debug, Clone, Copy)]
pub struct CardStyle<'a> {
    pub title: &'a str,
    pub revealed: bool,
    pub focused: bool,
    pub transform: TiltTransform,
}

/// Screen-sized character and color buffers, flushed in one pass
pub struct CardRenderer {
    width: usize,
    height: usize,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
}

impl CardRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
        }
    }

    pub fn clear(&mut self) {
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::Reset);
    }

    /// Characters of one screen row, for inspection
    pub fn row_text(&self, row: usize) -> String {
        let start = row * self.width;
        self.char_buffer[start..start + self.width].iter().collect()
    }

    pub fn put_text(&mut self, column: usize, row: usize, text: &str, color: Color) {
        for (offset, c) in text.chars().enumerate() {
            self.put(column + offset, row, c, color);
        }
    }

    /// Draw a card at document position `rect`, shifted up by `scroll` rows.
    /// Rows that fall outside the card area of the screen are clipped.
    pub fn draw_card(&mut self, rect: &CellRect, scroll: u32, style: &CardStyle<'_>) {
        let first_row = HEADER_ROWS as i64;
        for line in 0..rect.height {
            let screen_row = rect.row as i64 + line as i64 - scroll as i64 + first_row;
            if screen_row < first_row || screen_row >= self.height as i64 {
                continue;
            }
            self.draw_card_line(rect, line, screen_row as usize, style);
        }
    }

    fn draw_card_line(&mut self, rect: &CellRect, line: u32, row: usize, style: &CardStyle<'_>) {
        let left = rect.column as usize;
        let width = rect.width as usize;

        if !style.revealed {
            for column in left..left + width {
                self.put(column, row, PLACEHOLDER, Color::DarkGrey);
            }
            return;
        }

        let border = if style.focused { Color::Cyan } else { Color::Grey };
        let last = rect.height - 1;
        if line == 0 || line == last {
            self.put(left, row, '+', border);
            for column in left + 1..left + width.saturating_sub(1) {
                self.put(column, row, '-', border);
            }
            self.put(left + width.saturating_sub(1), row, '+', border);
            return;
        }

        self.put(left, row, '|', border);
        self.put(left + width.saturating_sub(1), row, '|', border);

        let inner = width.saturating_sub(4);
        match line {
            1 => {
                // Lean the title toward the pointer by up to two cells
                let lean = lean_offset(&style.transform, rect.width);
                let column = (left as i64 + 2 + lean).max(left as i64 + 1) as usize;
                let title: String = style.title.chars().take(inner).collect();
                self.put_text(column, row, &title, Color::White);
            }
            3 if style.focused && !style.transform.is_identity() => {
                let text = format!(
                    "tilt x {:+.1}° y {:+.1}° x{:.2}",
                    style.transform.rotation.x_deg, style.transform.rotation.y_deg, style.transform.scale
                );
                let text: String = text.chars().take(inner).collect();
                self.put_text(left + 2, row, &text, Color::Yellow);
            }
            _ => {}
        }
    }

    fn put(&mut self, column: usize, row: usize, c: char, color: Color) {
        if column >= self.width || row >= self.height {
            return;
        }
        let idx = row * self.width + column;
        self.char_buffer[idx] = c;
        self.color_buffer[idx] = color;
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = Color::Reset;
        writer.queue(ResetColor)?;
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let color = self.color_buffer[idx];
                if color != current {
                    writer.queue(SetForegroundColor(color))?;
                    current = color;
                }
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Horizontal title shift, from where the card's projected center lands
/// once its left and right edges go through the tilt matrix
fn lean_offset(transform: &TiltTransform, width_cells: u16) -> i64 {
    let half_width = width_cells as f32 * CELL_WIDTH_PX / 2.0;
    if half_width <= 0.0 {
        return 0;
    }
    let (Some(left), Some(right)) = (
        transform.project(Point::new(-half_width, 0.0)),
        transform.project(Point::new(half_width, 0.0)),
    ) else {
        return 0;
    };

    let shift = (left.x + right.x) / 2.0 / half_width;
    (shift * LEAN_GAIN).round().clamp(-2.0, 2.0) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use vista_core::Rotation;

    fn rect() -> CellRect {
        CellRect {
            column: 0,
            row: 0,
            width: 30,
            height: 6,
        }
    }

    #[test]
    fn test_hidden_card_draws_placeholder() {
        let mut renderer = CardRenderer::new(40, 10);
        let style = CardStyle {
            title: "Brand Identity",
            revealed: false,
            focused: false,
            transform: TiltTransform::identity(),
        };
        renderer.draw_card(&rect(), 0, &style);
        assert!(renderer.row_text(1).starts_with(&PLACEHOLDER.to_string().repeat(30)));
        assert!(!renderer.row_text(2).contains("Brand"));
    }

    #[test]
    fn test_revealed_card_shows_title_and_tilt() {
        let mut renderer = CardRenderer::new(40, 10);
        let style = CardStyle {
            title: "Brand Identity",
            revealed: true,
            focused: true,
            transform: TiltTransform::new(Rotation::new(1.5, 0.0), 1.02, 900.0),
        };
        renderer.draw_card(&rect(), 0, &style);
        assert!(renderer.row_text(1).starts_with("+---"));
        assert!(renderer.row_text(2).contains("Brand Identity"));
        assert!(renderer.row_text(4).contains("tilt x +1.5°"));
    }

    #[test]
    fn test_scrolled_rows_are_clipped() {
        let mut renderer = CardRenderer::new(40, 10);
        let style = CardStyle {
            title: "Brand Identity",
            revealed: true,
            focused: false,
            transform: TiltTransform::identity(),
        };
        // Scrolled past the top border and title
        renderer.draw_card(&rect(), 2, &style);
        assert_eq!(renderer.row_text(0).trim(), "");
        assert!(renderer.row_text(1).starts_with('|'));
        assert!(!renderer.row_text(1).contains("Brand"));
    }

    #[test]
    fn test_lean_follows_pointer() {
        let right = TiltTransform::new(Rotation::new(0.0, -3.0), 1.02, 900.0);
        let left = TiltTransform::new(Rotation::new(0.0, 3.0), 1.02, 900.0);
        assert_eq!(lean_offset(&right, 30), 2);
        assert_eq!(lean_offset(&left, 30), -2);
        assert_eq!(lean_offset(&TiltTransform::identity(), 30), 0);

        // A slight tilt stays under one cell
        let slight = TiltTransform::new(Rotation::new(0.0, -0.5), 1.02, 900.0);
        assert_eq!(lean_offset(&slight, 30), 0);
    }
}
