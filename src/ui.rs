//! Layout and drawing: playfields for the three games, sidebar, pause and game-over overlays.

use crate::app::{Flash, Session};
use crate::theme::Theme;
use droptris::pong::{
    self, AI_X, BALL_SIZE, FIELD_HEIGHT, FIELD_WIDTH, PADDLE_HEIGHT, PADDLE_WIDTH, PLAYER_X,
    PongGame, Side,
};
use droptris::snake::{GRID_SIZE, SnakeGame};
use droptris::tetris::{EMPTY, GameState};
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use std::collections::HashSet;
use std::time::Instant;
use tachyonfx::{CellFilter, Duration as TfxDuration, EffectRenderer, Interpolation, fx, ref_count};

/// Each grid cell is two terminal columns wide so cells look square.
const CELL_WIDTH: u16 = 2;
const SIDEBAR_WIDTH: u16 = 24;
/// Duration of the line-clear flash (TachyonFX).
const LINE_CLEAR_FLASH_MS: u32 = 250;
/// Largest pong field in terminal cells (border included).
const PONG_MAX_COLS: u16 = 100;
const PONG_MAX_ROWS: u16 = 32;

/// Draw the active game, then the pause overlay and the line-clear flash if any.
pub fn draw(
    frame: &mut Frame,
    session: &Session,
    theme: &Theme,
    paused: bool,
    flash: &mut Option<Flash>,
    now: Instant,
) {
    let area = frame.area();
    match session {
        Session::Tetris(state) => {
            let board = draw_tetris(frame, state, theme, area);
            if let Some(flash) = flash {
                apply_line_clear_effect(frame, board, flash, now);
            }
        }
        Session::Snake(game) => {
            draw_snake(frame, game, theme, area);
            if game.is_game_over() {
                draw_snake_game_over(frame, game, theme, area);
            }
        }
        Session::Pong(game) => draw_pong(frame, game, theme, area),
    }
    if paused {
        draw_pause_overlay(frame, theme, area);
    }
}

/// Centre a `width` x `height` box in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(width),
            Constraint::Fill(1),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(horiz[1])[1]
}

fn board_block(theme: &Theme, title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(title, Style::default().fg(theme.title)))
}

/// Write one grid cell (two columns) if it falls inside `board`.
fn put_cell(buf: &mut Buffer, board: Rect, x: i32, y: i32, symbol: &str, style: Style) {
    if x < 0 || y < 0 {
        return;
    }
    let ry = board.y + y as u16;
    for i in 0..CELL_WIDTH {
        let rx = board.x + x as u16 * CELL_WIDTH + i;
        if rx < board.right() && ry < board.bottom() {
            buf[(rx, ry)].set_symbol(symbol).set_style(style);
        }
    }
}

fn block_style(theme: &Theme, color: Color) -> Style {
    Style::default().fg(color).bg(theme.bg)
}

/// Playfield plus sidebar; returns the board rect (inside the border).
fn draw_tetris(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) -> Rect {
    let pf = state.playfield();
    let pw = pf.width() as u16 * CELL_WIDTH + 2;
    let ph = pf.height() as u16 + 2;
    let active = centered(area, pw + SIDEBAR_WIDTH, ph);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(pw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(active);

    let block = board_block(theme, format!(" droptris  Score: {} ", state.score()));
    let inner = block.inner(chunks[0]);
    block.render(chunks[0], frame.buffer_mut());
    let board = Rect {
        x: inner.x,
        y: inner.y,
        width: (pf.width() as u16 * CELL_WIDTH).min(inner.width),
        height: (pf.height() as u16).min(inner.height),
    };

    let buf = frame.buffer_mut();
    for (y, row) in pf.rows().enumerate() {
        for (x, &value) in row.iter().enumerate() {
            let symbol = if value == EMPTY { " " } else { "█" };
            put_cell(
                buf,
                board,
                x as i32,
                y as i32,
                symbol,
                block_style(theme, theme.piece_color(value)),
            );
        }
    }
    for (x, y, value) in state.piece().cells() {
        put_cell(buf, board, x, y, "█", block_style(theme, theme.piece_color(value)));
    }

    draw_tetris_sidebar(frame, state, theme, chunks[1]);
    board
}

fn draw_tetris_sidebar(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let border_style = Style::default().fg(theme.div_line).bg(theme.bg);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Next (border + title + preview)
            Constraint::Length(1), // gap
            Constraint::Length(5), // Stats (border + score, lines, pieces)
            Constraint::Length(1), // gap
            Constraint::Length(9), // Controls
        ])
        .split(area);

    // --- Next ---
    let next_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled("Next", title_style));
    let next_inner = next_block.inner(chunks[0]);
    next_block.render(chunks[0], frame.buffer_mut());
    let shape = state.next_kind().shape();
    let preview = Rect {
        x: next_inner.x + next_inner.width.saturating_sub(shape.width() as u16 * CELL_WIDTH) / 2,
        y: next_inner.y + next_inner.height.saturating_sub(shape.height() as u16) / 2,
        width: (shape.width() as u16 * CELL_WIDTH).min(next_inner.width),
        height: (shape.height() as u16).min(next_inner.height),
    };
    for (dx, dy, value) in shape.filled() {
        put_cell(
            frame.buffer_mut(),
            preview,
            dx,
            dy,
            "█",
            block_style(theme, theme.piece_color(value)),
        );
    }

    // --- Stats ---
    let stats_block = Block::default().borders(Borders::ALL).border_style(border_style);
    let stats_inner = stats_block.inner(chunks[2]);
    stats_block.render(chunks[2], frame.buffer_mut());
    let stat = |label: &'static str, value: u32| {
        Line::from(vec![
            Span::styled(label, title_style),
            Span::styled(value.to_string(), fg_style),
        ])
    };
    Paragraph::new(Text::from(vec![
        stat("Score: ", state.score()),
        stat("Lines: ", state.lines_cleared()),
        stat("Pieces: ", state.pieces_locked()),
    ]))
    .render(stats_inner, frame.buffer_mut());

    draw_controls(
        frame,
        theme,
        chunks[4],
        &[
            ("←/→", "move"),
            ("↓", "soft drop"),
            ("Space", "hard drop"),
            ("W/↑", "rotate cw"),
            ("Q", "rotate ccw"),
            ("P", "pause"),
            ("Esc", "quit"),
        ],
    );
}

fn draw_controls(frame: &mut Frame, theme: &Theme, area: Rect, keys: &[(&str, &str)]) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());
    let lines: Vec<Line> = keys
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!("{key:>6} "), Style::default().fg(theme.main_fg)),
                Span::styled(*what, Style::default().fg(theme.inactive_fg)),
            ])
        })
        .collect();
    Paragraph::new(Text::from(lines)).render(inner, frame.buffer_mut());
}

/// Create the flash effect on first use and process it (TachyonFX: cleared rows fade in from white).
fn apply_line_clear_effect(
    frame: &mut Frame,
    board: Rect,
    flash: &mut Flash,
    now: Instant,
) {
    let delta = flash
        .process_time
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    let tfx_delta = TfxDuration::from_millis(delta_ms);
    flash.process_time = Some(now);

    if flash.effect.is_none() {
        let rows: HashSet<u16> = flash.rows.iter().map(|&r| board.y + r as u16).collect();
        let filter = CellFilter::PositionFn(ref_count(move |pos: Position| rows.contains(&pos.y)));
        let effect = fx::fade_from(
            Color::White,
            Color::White,
            (LINE_CLEAR_FLASH_MS, Interpolation::Linear),
        )
        .with_filter(filter)
        .with_area(board);
        flash.effect = Some(effect);
    }

    if let Some(effect) = &mut flash.effect {
        frame.render_effect(effect, board, tfx_delta);
    }
}

fn draw_snake(frame: &mut Frame, game: &SnakeGame, theme: &Theme, area: Rect) {
    let size = GRID_SIZE as u16;
    let outer = centered(area, size * CELL_WIDTH + 2 + SIDEBAR_WIDTH, size + 2);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(size * CELL_WIDTH + 2),
            Constraint::Length(SIDEBAR_WIDTH),
        ])
        .split(outer);

    let block = board_block(theme, format!(" Snake  Score: {} ", game.score()));
    let board = block.inner(chunks[0]);
    block.render(chunks[0], frame.buffer_mut());

    let buf = frame.buffer_mut();
    for y in 0..GRID_SIZE {
        for x in 0..GRID_SIZE {
            put_cell(buf, board, x, y, " ", Style::default().bg(theme.bg));
        }
    }
    if let Some(food) = game.food() {
        put_cell(buf, board, food.x, food.y, "█", block_style(theme, theme.food));
    }
    for (i, p) in game.body().enumerate() {
        if i == 0 {
            let head = Style::default()
                .fg(Color::White)
                .bg(theme.snake)
                .add_modifier(Modifier::BOLD);
            put_cell(buf, board, p.x, p.y, "▪", head);
        } else {
            put_cell(buf, board, p.x, p.y, "█", block_style(theme, theme.snake));
        }
    }

    draw_controls(
        frame,
        theme,
        chunks[1],
        &[("Arrows", "turn"), ("Enter", "restart"), ("P", "pause"), ("Esc", "quit")],
    );
}

fn draw_snake_game_over(frame: &mut Frame, game: &SnakeGame, theme: &Theme, area: Rect) {
    let popup = centered(area, 30, 7);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Game Over ",
            Style::default().fg(Color::White).bg(Color::Red),
        )),
        Line::from(Span::styled(
            format!(" Score: {} ", game.score()),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " Space/Enter  Restart ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().bg(theme.bg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
        )
        .render(popup, frame.buffer_mut());
}

/// Pong field (border included) for the given terminal area.
fn pong_outer_rect(area: Rect) -> Rect {
    centered(
        area,
        area.width.min(PONG_MAX_COLS),
        area.height.min(PONG_MAX_ROWS),
    )
}

fn pong_field_rect(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(pong_outer_rect(area))
}

/// Field y for a pointer on terminal row `row`, or `None` outside the field.
pub fn pong_pointer_y(area: Rect, row: u16) -> Option<f32> {
    let field = pong_field_rect(area);
    if field.height == 0 || row < field.y || row >= field.bottom() {
        return None;
    }
    let rel = f32::from(row - field.y) + 0.5;
    Some(rel * FIELD_HEIGHT / f32::from(field.height))
}

/// Terminal cells covering the field-space rectangle (x, y, w, h); at least one cell.
fn field_cells(field: Rect, x: f32, y: f32, w: f32, h: f32) -> Rect {
    let sx = f32::from(field.width) / FIELD_WIDTH;
    let sy = f32::from(field.height) / FIELD_HEIGHT;
    let x0 = ((x * sx).floor().max(0.0) as u16).min(field.width.saturating_sub(1));
    let y0 = ((y * sy).floor().max(0.0) as u16).min(field.height.saturating_sub(1));
    let x1 = (((x + w) * sx).ceil() as u16).clamp(x0 + 1, field.width.max(x0 + 1));
    let y1 = (((y + h) * sy).ceil() as u16).clamp(y0 + 1, field.height.max(y0 + 1));
    Rect {
        x: field.x + x0,
        y: field.y + y0,
        width: x1 - x0,
        height: y1 - y0,
    }
    .intersection(field)
}

fn fill(buf: &mut Buffer, rect: Rect, symbol: &str, style: Style) {
    for y in rect.top()..rect.bottom() {
        for x in rect.left()..rect.right() {
            buf[(x, y)].set_symbol(symbol).set_style(style);
        }
    }
}

fn draw_pong(frame: &mut Frame, game: &PongGame, theme: &Theme, area: Rect) {
    let outer = pong_outer_rect(area);
    let title = format!(
        " Pong  You {} : {} CPU ",
        game.points(Side::Player),
        game.points(Side::Ai)
    );
    let block = board_block(theme, title);
    let field = block.inner(outer);
    block.render(outer, frame.buffer_mut());
    if field.width == 0 || field.height == 0 {
        return;
    }

    let buf = frame.buffer_mut();
    fill(buf, field, " ", Style::default().bg(theme.bg));

    let mid = field.x + field.width / 2;
    for y in (field.top()..field.bottom()).step_by(2) {
        buf[(mid, y)]
            .set_symbol("┆")
            .set_style(Style::default().fg(theme.main_fg).bg(theme.bg));
    }

    let paddle = |x: f32, y: f32| field_cells(field, x, y, PADDLE_WIDTH, PADDLE_HEIGHT);
    fill(
        buf,
        paddle(PLAYER_X, game.player_y()),
        "█",
        block_style(theme, theme.player_paddle),
    );
    fill(buf, paddle(AI_X, game.ai_y()), "█", block_style(theme, theme.ai_paddle));

    let ball: pong::Ball = game.ball();
    let cells = field_cells(field, ball.x, ball.y, BALL_SIZE, BALL_SIZE);
    let centre = Rect {
        x: cells.x + cells.width.saturating_sub(1) / 2,
        y: cells.y + cells.height.saturating_sub(1) / 2,
        width: 1,
        height: 1,
    }
    .intersection(field);
    fill(buf, centre, "●", block_style(theme, theme.ball));
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup = centered(area, 28, 5);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Paused ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " P  Resume    Esc  Quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    let p = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().bg(theme.bg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
        );
    p.render(popup, frame.buffer_mut());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_cells_stay_inside() {
        let field = Rect::new(1, 1, 98, 30);
        let r = field_cells(field, AI_X, FIELD_HEIGHT - PADDLE_HEIGHT, PADDLE_WIDTH, PADDLE_HEIGHT);
        assert!(r.width >= 1 && r.height >= 1);
        assert!(r.right() <= field.right() && r.bottom() <= field.bottom());
        let r = field_cells(field, -50.0, -50.0, BALL_SIZE, BALL_SIZE);
        assert_eq!((r.x, r.y), (field.x, field.y));
    }

    #[test]
    fn test_pointer_maps_into_field() {
        let area = Rect::new(0, 0, 100, 32);
        let field = pong_field_rect(area);
        assert_eq!(pong_pointer_y(area, 0), None);
        let top = pong_pointer_y(area, field.y).unwrap();
        let bottom = pong_pointer_y(area, field.bottom() - 1).unwrap();
        assert!(top > 0.0 && top < FIELD_HEIGHT / 10.0);
        assert!(bottom < FIELD_HEIGHT && bottom > FIELD_HEIGHT * 0.9);
    }
}
