//! Scoop Parlor rendering: stats header, scoop button, sundae banner, shop, footer, log.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::{ClickableList, TabBar};

use super::actions::*;
use super::config::SUNDAE_MULTIPLIER_VALUE;
use super::display::format_number;
use super::{ParlorGame, ShopTab, UPGRADE_KEYS};

const CONE_ART: [&str; 3] = ["  (@@)  ", "  \\  /  ", "   \\/   "];

pub fn render(game: &ParlorGame, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let narrow = is_narrow_layout(area.width);

    let (main_area, log_area) = if area.width >= 80 {
        let h = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);
        (h[0], h[1])
    } else {
        let v = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(18), Constraint::Length(6)])
            .split(area);
        (v[0], v[1])
    };

    let banner_height = if game.scheduler.is_visible() || game.economy.multiplier_active(game.now_ms) {
        1
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),             // stats
            Constraint::Length(5),             // scoop button
            Constraint::Length(banner_height), // sundae / multiplier
            Constraint::Length(3),             // tabs
            Constraint::Min(4),                // shop
            Constraint::Length(3),             // footer
        ])
        .split(main_area);

    render_stats(game, f, chunks[0], narrow);
    render_scoop_button(game, f, chunks[1], click_state);
    if banner_height > 0 {
        render_banner(game, f, chunks[2], click_state);
    }
    render_tabs(game, f, chunks[3], click_state);
    match game.tab {
        ShopTab::Generators => render_generators(game, f, chunks[4], click_state),
        ShopTab::Upgrades => render_upgrades(game, f, chunks[4], click_state),
    }
    render_footer(game, f, chunks[5], click_state);
    render_log(game, f, log_area);
}

fn render_stats(game: &ParlorGame, f: &mut Frame, area: Rect, narrow: bool) {
    let multiplier = game.economy.multiplier_active(game.now_ms);
    let sps_style = if multiplier {
        Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let label = Style::default().fg(Color::DarkGray);

    let lines = vec![
        Line::from(vec![
            Span::styled("Scoops: ", label),
            Span::styled(
                game.stats.banked.as_str(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Per second: ", label),
            Span::styled(game.stats.sps.as_str(), sps_style),
        ]),
        Line::from(vec![
            Span::styled(if narrow { "Total: " } else { "Lifetime scoops: " }, label),
            Span::styled(game.stats.lifetime.as_str(), Style::default().fg(Color::White)),
        ]),
    ];

    let borders = if narrow { Borders::TOP | Borders::BOTTOM } else { Borders::ALL };
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(borders)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Scoop Parlor "),
    );
    f.render_widget(widget, area);
}

/// The whole panel is one click target.
fn render_scoop_button(
    game: &ParlorGame,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let power = format_number(game.economy.click_power());
    let art = Style::default().fg(Color::LightMagenta);
    let lines = vec![
        Line::from(Span::styled(CONE_ART[0], art)),
        Line::from(vec![
            Span::styled(CONE_ART[1], Style::default().fg(Color::Rgb(210, 160, 90))),
            Span::styled(
                format!(" [C] Scoop! +{}", power),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(CONE_ART[2], Style::default().fg(Color::Rgb(210, 160, 90)))),
    ];
    let widget = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::LightMagenta)),
    );
    f.render_widget(widget, area);

    click_state.borrow_mut().add_click_target(area, CLICK_SCOOP);
}

fn render_banner(
    game: &ParlorGame,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    if let Some(remaining) = game.scheduler.remaining_ms(game.now_ms) {
        let secs = remaining.div_ceil(1000);
        let text = format!(" ✨ [G] Golden Sundae! Tap to claim ({}s) ✨", secs);
        let style = Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        f.render_widget(Paragraph::new(Line::from(Span::styled(text, style))), area);
        click_state.borrow_mut().add_click_target(area, CLAIM_SUNDAE);
        return;
    }

    let until = game.economy.state().sundae.multiplier_until;
    let secs = until.saturating_sub(game.now_ms).div_ceil(1000);
    let text = format!(" ⚡ Production x{}! {}s left", SUNDAE_MULTIPLIER_VALUE, secs);
    let style = Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD);
    f.render_widget(Paragraph::new(Line::from(Span::styled(text, style))), area);
}

fn render_tabs(
    game: &ParlorGame,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let tab_style = |active: bool, color: Color| -> Style {
        if active {
            Style::default()
                .fg(Color::Black)
                .bg(color)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        }
    };
    let on_generators = game.tab == ShopTab::Generators;
    let upgrades_label = format!("Upgrades ({})", game.shown_upgrades().len());

    let mut cs = click_state.borrow_mut();
    TabBar::new(" │ ")
        .tab("Generators", tab_style(on_generators, Color::Green), TAB_GENERATORS)
        .tab(upgrades_label, tab_style(!on_generators, Color::Magenta), TAB_UPGRADES)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" [U] Shop "),
        )
        .render(f, area, &mut cs);
}

fn disabled() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn render_generators(
    game: &ParlorGame,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let eco = &game.economy;
    let banked = eco.state().scoops_banked;
    let mut cl = ClickableList::new();

    for (i, gen) in eco.config().generators.iter().enumerate() {
        let cost = eco.generator_cost(gen.id).unwrap_or(f64::INFINITY);
        let output = eco.generator_output(gen.id).unwrap_or(0.0);
        let owned = eco.state().generator_count(gen.id);
        let affordable = banked >= cost;

        let (key_style, name_style, cost_style) = if affordable {
            (
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::White),
                Style::default().fg(Color::Green),
            )
        } else {
            (disabled(), disabled(), disabled())
        };
        let line = Line::from(vec![
            Span::styled(format!(" [{}] ", i + 1), key_style),
            Span::styled(format!("{:<16}", gen.name), name_style),
            Span::styled(format!("x{:<4}", owned), Style::default().fg(Color::Cyan)),
            Span::styled(format!("+{}/s each  ", format_number(output)), name_style),
            Span::styled(format!("Cost: {}", format_number(cost)), cost_style),
        ]);

        if affordable {
            cl.push_clickable(line, BUY_GENERATOR_BASE + i as u16);
        } else {
            cl.push(line);
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(" Generators ");
    let inner_width = block.inner(area).width;
    cl.register_targets(area, &mut click_state.borrow_mut(), 1, 1, 0, inner_width);
    let widget = Paragraph::new(cl.into_lines())
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn render_upgrades(
    game: &ParlorGame,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let banked = game.economy.state().scoops_banked;
    let shown = game.shown_upgrades();
    let mut cl = ClickableList::new();

    if shown.is_empty() {
        cl.push(Line::from(Span::styled(
            " Every upgrade is yours. Enjoy the scoops!",
            Style::default().fg(Color::Green),
        )));
    }

    for (pos, (config_index, upg)) in shown.iter().enumerate() {
        let affordable = banked >= upg.cost;
        let key = UPGRADE_KEYS.get(pos).copied().unwrap_or(' ');
        let (key_style, name_style, cost_style) = if affordable {
            (
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::Green),
            )
        } else {
            (disabled(), disabled(), disabled())
        };
        let line = Line::from(vec![
            Span::styled(format!(" [{}] ", key.to_ascii_uppercase()), key_style),
            Span::styled(upg.name, name_style),
            Span::styled(format!(" ({})", upg.description), disabled()),
            Span::styled(format!("  Cost: {}", format_number(upg.cost)), cost_style),
        ]);

        if affordable {
            cl.push_clickable(line, BUY_UPGRADE_BASE + *config_index as u16);
        } else {
            cl.push(line);
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(" Upgrades ");
    let inner_width = block.inner(area).width;
    cl.register_targets(area, &mut click_state.borrow_mut(), 1, 1, 0, inner_width);
    let widget = Paragraph::new(cl.into_lines())
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn render_footer(
    game: &ParlorGame,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let button = Style::default().fg(Color::White);
    let mut cs = click_state.borrow_mut();

    if game.confirm_reset {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(" Reset all progress? ");
        TabBar::new("   ")
            .tab("[Y] Yes, reset", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD), CONFIRM_RESET)
            .tab("[N] Cancel", button, CANCEL_RESET)
            .block(block)
            .render(f, area, &mut cs);
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    TabBar::new("   ")
        .tab("[S] Save", button, SAVE)
        .tab("[R] Reset", Style::default().fg(Color::Red), RESET)
        .block(block)
        .render(f, area, &mut cs);
}

fn render_log(game: &ParlorGame, f: &mut Frame, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;

    // Newest first
    let lines: Vec<Line> = game
        .log
        .iter()
        .rev()
        .take(visible)
        .enumerate()
        .map(|(i, entry)| {
            let style = match (entry.is_important, i < 3) {
                (true, true) => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                (true, false) => Style::default().fg(Color::Yellow),
                (false, true) => Style::default().fg(Color::White),
                (false, false) => Style::default().fg(Color::DarkGray),
            };
            Line::from(Span::styled(entry.text.as_str(), style))
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue))
                .title(" Log "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}
