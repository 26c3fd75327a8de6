//! Terminal UI rendering with ratatui
//!
//! Layout units map to the terminal as two columns by one row, so a grid cell
//! (2x2 units) is drawn 4 columns wide and 2 rows tall.

use blastrs::board::{Cell, GRID_SIZE};
use blastrs::block::Block as TrayBlock;
use blastrs::cue::CueSink;
use blastrs::game::{Callout, Game};
use blastrs::layout::Vec2;
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

/// Play field: 10 cells * 4 columns + 2 for borders
const FIELD_WIDTH: u16 = 42;
const SIDEBAR_WIDTH: u16 = 20;
const GAME_WIDTH: u16 = FIELD_WIDTH + SIDEBAR_WIDTH;
/// Grid (20 rows) + tray (7 rows) + 2 for borders
const GAME_HEIGHT: u16 = 29;

/// Everything the HUD shows that the game itself doesn't track
pub struct Hud {
    pub best: u64,
    pub callout: Option<Callout>,
    pub show_game_over: bool,
    pub music: bool,
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn field_block() -> Block<'static> {
    Block::default()
        .title(" BLASTRS ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
}

fn field_outer(area: Rect) -> Rect {
    let game_area = center_rect(area, GAME_WIDTH, GAME_HEIGHT);
    Rect {
        width: FIELD_WIDTH.min(game_area.width),
        ..game_area
    }
}

/// Inner area of the play field, origin of layout space
pub fn field_area(area: Rect) -> Rect {
    field_block().inner(field_outer(area))
}

/// Render the entire game UI
pub fn render_game<S: CueSink>(frame: &mut Frame, game: &Game<S>, hud: &Hud) {
    let area = frame.area();
    let outer = field_outer(area);
    let field = field_area(area);
    frame.render_widget(field_block(), outer);

    let game_area = center_rect(area, GAME_WIDTH, GAME_HEIGHT);
    let sidebar = Rect {
        x: outer.x + outer.width,
        width: game_area.width.saturating_sub(outer.width),
        ..game_area
    };

    let buf = frame.buffer_mut();
    render_grid(buf, field, game);
    render_tray(buf, field, game);
    render_particles(buf, field, game);

    render_sidebar(frame, sidebar, game, hud);

    if hud.show_game_over {
        render_overlay(
            frame,
            area,
            "GAME OVER",
            &format!("Final Score: {}", game.score()),
        );
    }
}

/// Write a symbol if it lands inside `clip`
fn put(buf: &mut Buffer, clip: Rect, x: i32, y: i32, symbol: &str, style: Style) {
    if x < clip.x as i32
        || y < clip.y as i32
        || x >= (clip.x + clip.width) as i32
        || y >= (clip.y + clip.height) as i32
    {
        return;
    }
    if let Some(cell) = buf.cell_mut((x as u16, y as u16)) {
        cell.set_symbol(symbol).set_style(style);
    }
}

/// Draw a 4x2 grid cell with its top-left at (x, y)
fn put_cell(buf: &mut Buffer, clip: Rect, x: i32, y: i32, symbol: &str, style: Style) {
    for dy in 0..2 {
        for dx in 0..4 {
            put(buf, clip, x + dx, y + dy, symbol, style);
        }
    }
}

fn render_grid<S: CueSink>(buf: &mut Buffer, field: Rect, game: &Game<S>) {
    let (ox, oy) = (field.x as i32, field.y as i32);

    for (row, cells) in game.board().rows().iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            let (x, y) = (ox + col as i32 * 4, oy + row as i32 * 2);
            match cell {
                Cell::Empty => {
                    put_cell(buf, field, x, y, " ", Style::default());
                    put(buf, field, x + 1, y, "·", Style::default().fg(Color::DarkGray));
                    put(buf, field, x + 2, y, "·", Style::default().fg(Color::DarkGray));
                }
                Cell::Filled { color, scale } => {
                    let style = Style::default().fg(color.color());
                    if *scale < 0.5 {
                        put_cell(buf, field, x, y, " ", Style::default());
                        put(buf, field, x + 1, y, "▪", style);
                        put(buf, field, x + 2, y, "▪", style);
                    } else {
                        put_cell(buf, field, x, y, "█", style);
                    }
                }
            }
        }
    }

    // Ghost of where the dragged block would land
    if let (Some(block), Some((gx, gy))) = (game.dragging(), game.preview()) {
        let style = Style::default().fg(block.color.color());
        for (r, c) in block.shape.cells() {
            let x = ox + (gx + c as i32) * 4;
            let y = oy + (gy + r as i32) * 2;
            put_cell(buf, field, x, y, "▒", style);
        }
    }

    // Divider between grid and tray
    let divider_y = oy + GRID_SIZE as i32 * 2;
    for x in 0..field.width as i32 {
        put(buf, field, ox + x, divider_y, "─", Style::default().fg(Color::DarkGray));
    }
}

fn render_tray<S: CueSink>(buf: &mut Buffer, field: Rect, game: &Game<S>) {
    let dragged = game.dragging().map(|b| b.slot);
    for block in game.tray().iter().filter(|b| Some(b.slot) != dragged) {
        render_block(buf, field, block, 0.5);
    }
    // Dragged block on top, full size
    if let Some(block) = game.dragging() {
        render_block(buf, field, block, 1.0);
    }
}

/// Draw a tray block centred on its position. At scale 1 a cell is 2 units.
fn render_block(buf: &mut Buffer, field: Rect, block: &TrayBlock, scale: f64) {
    let cell = 2.0 * scale;
    let left = block.pos.x - block.shape.cols() as f64 * cell / 2.0;
    let top = block.pos.y - block.shape.rows() as f64 * cell / 2.0;
    let symbol = if block.scale < 0.75 { "▓" } else { "█" };
    let style = Style::default().fg(block.color.color());

    // Columns and rows each cell covers on screen
    let width = (cell * 2.0).round().max(1.0) as i32;
    let height = cell.round().max(1.0) as i32;

    for (r, c) in block.shape.cells() {
        let (x, y) = to_screen(field, Vec2::new(left + c as f64 * cell, top + r as f64 * cell));
        for dy in 0..height {
            for dx in 0..width {
                put(buf, field, x + dx, y + dy, symbol, style);
            }
        }
    }
}

fn render_particles<S: CueSink>(buf: &mut Buffer, field: Rect, game: &Game<S>) {
    for p in game.particles().iter() {
        let (x, y) = to_screen(field, p.pos);
        let symbol = if p.alpha > 0.5 { "•" } else { "·" };
        put(buf, field, x, y, symbol, Style::default().fg(p.color.color()));
    }
}

fn to_screen(field: Rect, p: Vec2) -> (i32, i32) {
    (
        field.x as i32 + (p.x * 2.0).round() as i32,
        field.y as i32 + p.y.round() as i32,
    )
}

fn render_sidebar<S: CueSink>(frame: &mut Frame, area: Rect, game: &Game<S>, hud: &Hud) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let label = |text: &'static str| Line::from(Span::styled(text, Style::default().fg(Color::Gray)));
    let undo_style = if game.can_undo() {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let score = game.session().score();
    let stat = |name: &'static str, value: String| {
        Line::from(vec![
            Span::styled(name, Style::default().fg(Color::Gray)),
            Span::styled(value, Style::default().fg(Color::White)),
        ])
    };

    let mut lines = vec![
        label("SCORE"),
        Line::from(Span::styled(
            score.points.to_string(),
            Style::default().fg(Color::Yellow).bold(),
        )),
        stat("Lines: ", score.lines.to_string()),
        stat("Blocks: ", score.placed.to_string()),
        Line::raw(""),
        label("BEST"),
        Line::from(Span::styled(
            hud.best.to_string(),
            Style::default().fg(Color::Cyan),
        )),
        Line::raw(""),
    ];

    match hud.callout {
        Some(callout) => lines.push(Line::styled(
            callout.text,
            Style::default().fg(callout.color.color()).bold(),
        )),
        None => lines.push(Line::raw("")),
    }

    lines.extend([
        Line::raw(""),
        label("Drag blocks"),
        label("with the mouse"),
        Line::raw(""),
        Line::styled("u  undo", undo_style),
        label("r  restart"),
        label(if hud.music { "m  music: on" } else { "m  music: off" }),
        label("q  quit"),
    ]);

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_width = 28u16;
    let popup_height = 7u16;
    let popup_area = center_rect(area, popup_width, popup_height);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title, Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle, Style::default().fg(Color::White)),
        Line::raw(""),
        Line::styled("Press R to play again", Style::default().fg(Color::Gray)),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_fits_grid_and_tray() {
        let field = field_area(Rect::new(0, 0, 120, 40));
        assert_eq!(field.width, GRID_SIZE as u16 * 4);
        assert_eq!(field.height, GAME_HEIGHT - 2);
        assert_eq!(field.x, (120 - GAME_WIDTH) / 2 + 1);
    }

    #[test]
    fn test_to_screen() {
        let field = Rect::new(10, 5, 40, 27);
        assert_eq!(to_screen(field, Vec2::new(0.0, 0.0)), (10, 5));
        assert_eq!(to_screen(field, Vec2::new(2.0, 2.0)), (14, 7));
    }

    #[test]
    fn test_put_clips() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 10));
        let clip = Rect::new(2, 2, 4, 4);
        put(&mut buf, clip, 0, 0, "x", Style::default());
        put(&mut buf, clip, 3, 3, "x", Style::default());
        put(&mut buf, clip, 6, 3, "x", Style::default());
        assert_eq!(buf[(0, 0)].symbol(), " ");
        assert_eq!(buf[(3, 3)].symbol(), "x");
        assert_eq!(buf[(6, 3)].symbol(), " ");
    }
}
