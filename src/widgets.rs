//! Clickable UI components that render and register their own click targets.
//!
//! - [`TabBar`]: a single row of labels (shop tabs, footer buttons).
//! - [`ClickableList`]: lines where some rows are purchase buttons.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::style::{Color, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Paragraph};
use ratzilla::ratatui::Frame;

use crate::input::ClickState;

struct BarLabel {
    text: String,
    style: Style,
    action_id: u16,
}

/// Labels on one row, separated by `separator`, each tappable.
///
/// ```ignore
/// TabBar::new(" │ ")
///     .tab("Generators", active, TAB_GENERATORS)
///     .tab("Upgrades (3)", inactive, TAB_UPGRADES)
///     .render(f, area, &mut cs);
/// ```
pub struct TabBar<'a> {
    labels: Vec<BarLabel>,
    separator: &'a str,
    block: Option<Block<'a>>,
}

impl<'a> TabBar<'a> {
    pub fn new(separator: &'a str) -> Self {
        Self {
            labels: Vec::new(),
            separator,
            block: None,
        }
    }

    pub fn tab(mut self, label: impl Into<String>, style: Style, action_id: u16) -> Self {
        self.labels.push(BarLabel {
            text: format!(" {} ", label.into()),
            style,
            action_id,
        });
        self
    }

    /// Targets are placed inside the block's borders horizontally but keep
    /// the full outer height so the border rows are tappable too.
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Display widths paired with action IDs, in render order.
    fn label_widths(&self) -> Vec<(u16, u16)> {
        self.labels
            .iter()
            .map(|l| (Line::from(l.text.as_str()).width() as u16, l.action_id))
            .collect()
    }

    pub fn render(self, f: &mut Frame, area: Rect, cs: &mut ClickState) {
        let widths = self.label_widths();
        let sep_width = Line::from(self.separator).width() as u16;
        let inner = match &self.block {
            Some(block) => block.inner(area),
            None => area,
        };

        let mut spans: Vec<Span> = Vec::with_capacity(self.labels.len() * 2);
        for (i, label) in self.labels.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(self.separator, Style::default().fg(Color::DarkGray)));
            }
            spans.push(Span::styled(label.text, label.style));
        }

        let paragraph = Paragraph::new(Line::from(spans));
        let paragraph = match self.block {
            Some(block) => paragraph.block(block),
            None => paragraph,
        };
        f.render_widget(paragraph, area);

        cs.register_tab_targets(
            &widths,
            sep_width,
            inner.x,
            area.y,
            inner.width,
            area.height.max(1),
        );
    }
}

/// Lines with optional per-line actions. Targets follow their lines, so
/// inserting a header shifts every button below it.
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// `(line_index, action_id)`
    actions: Vec<(usize, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        self.actions.push((self.lines.len(), action_id));
        self.lines.push(line);
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Register targets for all clickable lines.
    ///
    /// `top_offset`/`bottom_offset` are border rows, `scroll` the vertical
    /// scroll in visual rows. With `inner_width > 0` lines wider than the
    /// content area count as several wrapped rows, each of them tappable;
    /// `0` means one row per line.
    pub fn register_targets(
        &self,
        area: Rect,
        cs: &mut ClickState,
        top_offset: u16,
        bottom_offset: u16,
        scroll: u16,
        inner_width: u16,
    ) {
        let content_y = area.y + top_offset;
        let content_end = area.y + area.height.saturating_sub(bottom_offset);

        let mut row_starts: Vec<u16> = Vec::with_capacity(self.lines.len());
        let mut row_counts: Vec<u16> = Vec::with_capacity(self.lines.len());
        let mut cursor: u16 = 0;
        for line in &self.lines {
            let rows = if inner_width == 0 {
                1
            } else {
                (line.width().max(1)).div_ceil(inner_width as usize) as u16
            };
            row_starts.push(cursor);
            row_counts.push(rows);
            cursor = cursor.saturating_add(rows);
        }

        for &(idx, action_id) in &self.actions {
            for r in 0..row_counts[idx] {
                let visual = row_starts[idx] + r;
                if visual < scroll {
                    continue;
                }
                let screen_row = content_y + (visual - scroll);
                if screen_row >= content_end {
                    break;
                }
                cs.add_row_target(area, screen_row, action_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shop_list() -> ClickableList<'static> {
        let mut cl = ClickableList::new();
        cl.push(Line::from("Generators"));
        cl.push_clickable(Line::from("[1] Taster Spoon"), 100);
        cl.push(Line::from("[2] Parlor Nonna (too expensive)"));
        cl.push_clickable(Line::from("[3] Freezer"), 102);
        cl
    }

    #[test]
    fn only_clickable_lines_get_targets() {
        let cl = shop_list();
        let area = Rect::new(0, 10, 60, 8);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 1, 1, 0, 0);

        assert_eq!(cs.targets.len(), 2);
        assert_eq!(cs.hit_test(5, 11), None); // header
        assert_eq!(cs.hit_test(5, 12), Some(100));
        assert_eq!(cs.hit_test(5, 13), None); // disabled row
        assert_eq!(cs.hit_test(5, 14), Some(102));
    }

    #[test]
    fn scrolled_out_lines_are_skipped() {
        let cl = shop_list();
        let area = Rect::new(0, 0, 60, 8);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 1, 1, 2, 0);

        assert_eq!(cs.targets.len(), 1);
        assert_eq!(cs.hit_test(5, 2), Some(102));
    }

    #[test]
    fn rows_past_bottom_border_are_clipped() {
        let mut cl = ClickableList::new();
        for i in 0..10u16 {
            cl.push_clickable(Line::from(format!("item {}", i)), 200 + i);
        }
        let area = Rect::new(0, 0, 40, 4); // two content rows
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 1, 1, 0, 0);

        assert_eq!(cs.targets.len(), 2);
        assert_eq!(cs.hit_test(0, 2), Some(201));
        assert_eq!(cs.hit_test(0, 3), None);
    }

    #[test]
    fn wrapped_line_is_tappable_on_every_row() {
        let mut cl = ClickableList::new();
        cl.push(Line::from("0123456789abcde")); // 2 rows at width 10
        cl.push_clickable(Line::from("0123456789012345678901"), 7); // 3 rows
        cl.push_clickable(Line::from("short"), 8);

        let area = Rect::new(0, 0, 12, 12);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 1, 1, 0, 10);

        assert_eq!(cs.hit_test(0, 2), None);
        assert_eq!(cs.hit_test(0, 3), Some(7));
        assert_eq!(cs.hit_test(0, 5), Some(7));
        assert_eq!(cs.hit_test(0, 6), Some(8));
    }

    #[test]
    fn empty_list_registers_nothing() {
        let cl = ClickableList::new();
        let mut cs = ClickState::new();
        cl.register_targets(Rect::new(0, 0, 20, 5), &mut cs, 1, 1, 0, 18);
        assert!(cs.targets.is_empty());
        assert!(cl.into_lines().is_empty());
    }

    #[test]
    fn tab_bar_label_widths_include_padding() {
        let bar = TabBar::new(" │ ")
            .tab("Generators", Style::default(), 10)
            .tab("Upgrades (8)", Style::default(), 11);
        assert_eq!(bar.label_widths(), vec![(12, 10), (14, 11)]);
    }
}
