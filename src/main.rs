mod games;
mod input;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use ratzilla::event::{MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use games::parlor::ParlorGame;
use games::Game;
use input::{key_to_input, pixel_x_to_col, pixel_y_to_row, ClickState, InputEvent};

fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

/// Convert a mouse position to a terminal cell using the grid container's rect.
fn dom_pixel_to_cell(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<(u16, u16)> {
    let document = web_sys::window()?.document()?;

    // DomBackend renders into a <div> directly under <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let col = pixel_x_to_col(mouse_x as f64 - rect.left(), rect.width(), cs.terminal_cols)?;
    let row = pixel_y_to_row(mouse_y as f64 - rect.top(), rect.height(), cs.terminal_rows)?;
    Some((col, row))
}

/// Best-effort final save when the page is closed or reloaded.
fn install_unload_save(game: Rc<RefCell<ParlorGame>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let on_unload = Closure::<dyn FnMut()>::new(move || {
        game.borrow_mut().persist(now_ms());
    });
    if window
        .add_event_listener_with_callback("beforeunload", on_unload.as_ref().unchecked_ref())
        .is_err()
    {
        web_sys::console::warn_1(&"Scoop Parlor: could not register beforeunload save".into());
    }
    // Lives for the whole page.
    on_unload.forget();
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let game = Rc::new(RefCell::new(ParlorGame::new(now_ms())));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    install_unload_save(game.clone());

    terminal.on_mouse_event({
        let game = game.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let action = {
                let cs = click_state.borrow();
                if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                    return;
                }
                dom_pixel_to_cell(mouse_event.x, mouse_event.y, &cs)
                    .and_then(|(col, row)| cs.hit_test(col, row))
            };

            if let Some(action_id) = action {
                game.borrow_mut().handle_input(&InputEvent::Click(action_id));
            }
        }
    });

    terminal.on_key_event({
        let game = game.clone();
        move |key_event| {
            if let Some(event) = key_to_input(&key_event.code) {
                game.borrow_mut().handle_input(&event);
            }
        }
    });

    web_sys::console::log_1(&"Scoop Parlor: Game Initialized".into());

    terminal.draw_web({
        let click_state = click_state.clone();
        move |f| {
            let mut game = game.borrow_mut();
            game.tick(now_ms());

            let size = f.area();
            {
                let mut cs = click_state.borrow_mut();
                cs.terminal_cols = size.width;
                cs.terminal_rows = size.height;
                cs.clear_targets();
            }

            game.render(f, size, &click_state);
        }
    });

    Ok(())
}
