use crate::types::{Bin, Rect};

const MAX_COLS: f64 = 80.0;
const MAX_ROWS: f64 = 40.0;

struct Canvas {
    cells: Vec<Vec<char>>,
}

impl Canvas {
    fn new(cols: usize, rows: usize) -> Self {
        Self {
            cells: vec![vec![' '; cols + 1]; rows + 1],
        }
    }

    fn set(&mut self, col: usize, row: usize, ch: char) {
        let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) else {
            return;
        };
        *cell = match (*cell, ch) {
            ('+', _) | ('-', '|') | ('|', '-') => '+',
            _ => ch,
        };
    }

    fn frame(&mut self, col: usize, row: usize, w: usize, h: usize) {
        for c in col..=col + w {
            self.set(c, row, '-');
            self.set(c, row + h, '-');
        }
        for r in row..=row + h {
            self.set(col, r, '|');
            self.set(col + w, r, '|');
        }
        for (c, r) in [(col, row), (col + w, row), (col, row + h), (col + w, row + h)] {
            if let Some(cell) = self.cells.get_mut(r).and_then(|line| line.get_mut(c)) {
                *cell = '+';
            }
        }
    }

    /// Writes `text` centred in the interior of a frame, clipped to it.
    fn label(&mut self, col: usize, row: usize, w: usize, h: usize, text: &str) {
        if w < 2 || h < 2 {
            return;
        }
        let mid_row = row + h / 2;
        let start = (col + w / 2).saturating_sub(text.len() / 2).max(col + 1);
        for (i, ch) in text.chars().enumerate() {
            let c = start + i;
            if c >= col + w {
                break;
            }
            if let Some(cell) = self.cells.get_mut(mid_row).and_then(|line| line.get_mut(c)) {
                *cell = ch;
            }
        }
    }

    fn into_string(self) -> String {
        let mut out = String::new();
        // y grows upwards in bin coordinates
        for line in self.cells.iter().rev() {
            let line: String = line.iter().collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

/// ASCII drawing of one bin, origin at the bottom-left. Boxes are labelled `#id`.
pub fn render_bin(size: Rect, bin: &Bin) -> String {
    let scale = f64::min(MAX_COLS / size.w as f64, MAX_ROWS / size.h as f64);
    let cols = (size.w as f64 * scale).round() as usize;
    let rows = (size.h as f64 * scale).round() as usize;
    if cols == 0 || rows == 0 {
        return String::new();
    }

    let mut canvas = Canvas::new(cols, rows);
    canvas.frame(0, 0, cols, rows);

    for p in &bin.placements {
        let col = (p.x as f64 * scale).round() as usize;
        let row = (p.y as f64 * scale).round() as usize;
        let w = (p.rect.w as f64 * scale).round() as usize;
        let h = (p.rect.h as f64 * scale).round() as usize;
        if w == 0 || h == 0 {
            continue;
        }
        canvas.frame(col, row, w, h);
        canvas.label(col, row, w, h, &format!("#{}", p.id));
    }

    canvas.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Placement;

    fn placed(id: usize, x: u32, y: u32, w: u32, h: u32) -> Placement {
        Placement {
            id,
            rect: Rect::new(w, h),
            x,
            y,
        }
    }

    #[test]
    fn test_render_single_box() {
        let bin = Bin {
            placements: vec![placed(3, 0, 0, 100, 50)],
        };
        let output = render_bin(Rect::new(100, 50), &bin);
        assert!(output.contains('+'));
        assert!(output.contains('-'));
        assert!(output.contains('|'));
        assert!(output.contains("#3"));
    }

    #[test]
    fn test_render_two_boxes() {
        let bin = Bin {
            placements: vec![placed(0, 0, 0, 50, 100), placed(1, 50, 0, 50, 100)],
        };
        let output = render_bin(Rect::new(100, 100), &bin);
        assert!(output.contains("#0"));
        assert!(output.contains("#1"));
    }

    #[test]
    fn test_bottom_box_is_drawn_last_line_first() {
        let bin = Bin {
            placements: vec![placed(0, 0, 0, 10, 2), placed(1, 0, 8, 10, 2)],
        };
        let output = render_bin(Rect::new(10, 10), &bin);
        let top = output.find("#1").unwrap();
        let bottom = output.find("#0").unwrap();
        assert!(top < bottom);
    }

    #[test]
    fn test_render_empty() {
        let output = render_bin(Rect::new(100, 100), &Bin::default());
        assert!(output.contains('+'));
    }
}
