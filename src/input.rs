//! Shared input handling: coordinate conversion, click targets, and event types.
//!
//! Game-agnostic. Each game maps `InputEvent`s to its own actions.

use ratzilla::event::KeyCode;
use ratzilla::ratatui::layout::Rect;

/// Escape is delivered as this control character.
pub const KEY_ESC: char = '\u{1b}';

/// Input normalized from keyboard, mouse, and touch sources.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A key press from keyboard (lowercased).
    Key(char),
    /// A tap on a registered target, identified by a semantic action ID.
    Click(u16),
}

/// Map a keyboard code to an input event. Unmapped keys yield `None`.
pub fn key_to_input(code: &KeyCode) -> Option<InputEvent> {
    match code {
        KeyCode::Char(c) => Some(InputEvent::Key(c.to_ascii_lowercase())),
        KeyCode::Esc => Some(InputEvent::Key(KEY_ESC)),
        _ => None,
    }
}

/// A clickable region in terminal cell coordinates.
#[derive(Debug, Clone)]
pub struct ClickTarget {
    pub rect: Rect,
    pub action_id: u16,
}

/// Shared between the render loop (which registers targets) and the
/// mouse handler (which hit-tests them).
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            terminal_cols: 0,
            terminal_rows: 0,
        }
    }

    /// Called at the start of every frame; targets live for one frame only.
    pub fn clear_targets(&mut self) {
        self.targets.clear();
    }

    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        if rect.width == 0 || rect.height == 0 {
            return;
        }
        self.targets.push(ClickTarget { rect, action_id });
    }

    /// Full-width single-row target, ignored if `row` is outside `area`.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if row >= area.y && row < area.y + area.height {
            self.add_click_target(Rect::new(area.x, row, area.width, 1), action_id);
        }
    }

    /// Register targets for a row of labels laid out left to right.
    ///
    /// `label_widths` holds `(display_width, action_id)` per label and
    /// `separator_width` the width of the gap between labels. Each target
    /// covers its label plus half of each neighbouring gap; the first and
    /// last extend to the edges so the whole bar is tappable.
    pub fn register_tab_targets(
        &mut self,
        label_widths: &[(u16, u16)],
        separator_width: u16,
        x: u16,
        y: u16,
        total_width: u16,
        height: u16,
    ) {
        let n = label_widths.len();
        if n == 0 || total_width == 0 {
            return;
        }

        let mut starts: Vec<u16> = Vec::with_capacity(n);
        let mut cursor: u16 = 0;
        for (i, &(w, _)) in label_widths.iter().enumerate() {
            if i > 0 {
                cursor += separator_width;
            }
            starts.push(cursor);
            cursor += w;
        }

        for (i, &(width, action_id)) in label_widths.iter().enumerate() {
            let left = if i == 0 {
                0
            } else {
                let prev_end = starts[i - 1] + label_widths[i - 1].0;
                prev_end + (starts[i] - prev_end) / 2
            };
            let right = if i == n - 1 {
                total_width
            } else {
                let end = starts[i] + width;
                end + (starts[i + 1] - end) / 2
            };

            let w = right.min(total_width).saturating_sub(left);
            if w > 0 {
                self.add_click_target(Rect::new(x + left, y, w, height), action_id);
            }
        }
    }

    /// Action ID under a cell. Later targets win where they overlap.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets.iter().rev().find_map(|t| {
            let r = &t.rect;
            if col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height {
                Some(t.action_id)
            } else {
                None
            }
        })
    }
}

/// Screens narrower than this stack panels vertically.
pub fn is_narrow_layout(width: u16) -> bool {
    width < 60
}

/// Pixel offset (relative to the grid's top edge) to a terminal row.
pub fn pixel_y_to_row(click_y: f64, grid_height: f64, terminal_rows: u16) -> Option<u16> {
    pixel_to_cell(click_y, grid_height, terminal_rows)
}

/// Pixel offset (relative to the grid's left edge) to a terminal column.
pub fn pixel_x_to_col(click_x: f64, grid_width: f64, terminal_cols: u16) -> Option<u16> {
    pixel_to_cell(click_x, grid_width, terminal_cols)
}

fn pixel_to_cell(offset: f64, extent: f64, cells: u16) -> Option<u16> {
    if extent <= 0.0 || cells == 0 || offset < 0.0 || !offset.is_finite() {
        return None;
    }
    let cell = (offset / (extent / cells as f64)) as u16;
    if cell >= cells {
        None
    } else {
        Some(cell)
    }
}
