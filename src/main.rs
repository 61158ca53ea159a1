use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::{
    io::{stdout, Stdout},
    time::{Duration, Instant},
};

use blockfall::{piece, Command, Config, Game, GameEvent, GameLoop, Position};
use clap::Parser;

// ============================================================================
// Visual Constants
// ============================================================================

const CELL_WIDTH: u16 = 2;
const BLOCK_CHAR: &str = "██";
const EMPTY_CHAR: &str = "  ";
const INFO_WIDTH: u16 = 16;

// How long the score stays highlighted after it changes.
const SCORE_FLASH: Duration = Duration::from_secs(3);
// Input poll timeout while gravity is paused.
const IDLE_POLL: Duration = Duration::from_millis(100);

// ============================================================================
// Color Mapping
// ============================================================================

fn block_color(color: piece::Color) -> Color {
    match color {
        piece::Color::Green => Color::Green,
        piece::Color::Blue => Color::Blue,
        piece::Color::Orange => Color::Rgb(255, 165, 0),
        piece::Color::Maroon => Color::Rgb(128, 0, 0),
        piece::Color::Red => Color::Red,
        piece::Color::Purple => Color::Rgb(128, 0, 128),
        piece::Color::OrangeRed => Color::Rgb(255, 69, 0),
    }
}

// ============================================================================
// View State
// ============================================================================

/// Presentation-only state fed from the game's events.
#[derive(Default)]
struct View {
    paused: bool,
    score_flash_until: Option<Instant>,
    last_clear: u32,
    games_played: u32,
}

impl View {
    fn observe(&mut self, event: GameEvent, now: Instant) {
        match event {
            GameEvent::ScoreChanged(_) => self.score_flash_until = Some(now + SCORE_FLASH),
            GameEvent::RowsCleared { count, .. } => self.last_clear = count,
            GameEvent::GameReset => {
                self.games_played += 1;
                self.last_clear = 0;
            }
            GameEvent::PieceChanged { .. } | GameEvent::PieceLocked(_) => {}
        }
    }

    fn score_highlighted(&self, now: Instant) -> bool {
        self.score_flash_until.is_some_and(|until| now < until)
    }
}

// ============================================================================
// Rendering
// ============================================================================

fn render(frame: &mut Frame, game: &Game, view: &View, now: Instant) {
    let area = frame.size();
    let board = game.board();

    let grid_display_width = (board.width() as u16 * CELL_WIDTH) + 2;
    let grid_display_height = board.height() as u16 + 2;
    let total_width = grid_display_width + INFO_WIDTH + 2;
    let total_height = grid_display_height + 3;

    let main_area = centered_rect(total_width, total_height, area);

    let vertical = Layout::vertical([
        Constraint::Length(grid_display_height),
        Constraint::Fill(1),
    ])
    .split(main_area);
    let game_row = vertical[0];

    let horizontal = Layout::horizontal([
        Constraint::Length(grid_display_width),
        Constraint::Length(INFO_WIDTH),
    ])
    .split(game_row);

    render_grid(frame, game, horizontal[0]);
    render_info(frame, game, view, horizontal[1], now);

    let controls_area = Rect {
        x: area.x,
        y: game_row.y + game_row.height,
        width: area.width,
        height: 2,
    };
    if controls_area.y + 1 < area.height {
        let controls = Paragraph::new(vec![Line::from(
            "←→/AD: Move | ↑/W: Rotate | ↓/S/Space: Drop | P: Pause | R: Restart | Q/ESC: Quit",
        )])
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(controls, controls_area);
    }

    if view.paused {
        render_paused(frame, area);
    }
}

/// Cell colors for the settled blocks with the active piece drawn on top.
fn visual_grid(game: &Game) -> Vec<Vec<Option<piece::Color>>> {
    let board = game.board();
    let mut grid = vec![vec![None; board.width()]; board.height()];

    let mut paint = |pos: Position, color: piece::Color| {
        if board.contains(pos) {
            grid[pos.y as usize][pos.x as usize] = Some(color);
        }
    };

    for block in game.settled_blocks().iter() {
        paint(block.position, block.color);
    }
    if let Some(active) = game.active_piece() {
        for pos in active.blocks() {
            paint(pos, active.kind.color());
        }
    }

    grid
}

fn render_grid(frame: &mut Frame, game: &Game, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Blockfall ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = visual_grid(game)
        .into_iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .into_iter()
                .map(|cell| match cell {
                    Some(color) => Span::styled(BLOCK_CHAR, Style::default().fg(block_color(color))),
                    None => Span::raw(EMPTY_CHAR),
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_info(frame: &mut Frame, game: &Game, view: &View, area: Rect, now: Instant) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Info ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let score_style = if view.score_highlighted(now) {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Score", Style::default().fg(Color::Yellow))),
        Line::from(Span::styled(format!("{}", game.score()), score_style)),
        Line::from(""),
        Line::from(Span::styled("Last clear", Style::default().fg(Color::Cyan))),
        Line::from(format!("{}", view.last_clear)),
        Line::from(""),
        Line::from(Span::styled("Game", Style::default().fg(Color::Green))),
        Line::from(format!("{}", view.games_played + 1)),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

fn render_paused(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("PAUSED", Style::default().fg(Color::Yellow))),
        Line::from(""),
        Line::from(Span::styled(
            "Press P to continue",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Paused ")
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black)),
    );

    frame.render_widget(paragraph, centered_rect(24, 7, area));
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(area);

    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .split(horizontal[1]);

    vertical[1]
}

// ============================================================================
// Input
// ============================================================================

fn command_for(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Command::MoveLeft),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Command::MoveRight),
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Command::Rotate),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Char(' ') => {
            Some(Command::HardDrop)
        }
        _ => None,
    }
}

// ============================================================================
// Main Loop
// ============================================================================

fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, game_loop: &mut GameLoop) -> anyhow::Result<()> {
    let mut view = View::default();
    let mut now = Instant::now();
    game_loop.start(now);

    loop {
        terminal.draw(|frame| render(frame, game_loop.game(), &view, now))?;

        let timeout = game_loop
            .time_until_tick(now)
            .unwrap_or(IDLE_POLL)
            .min(IDLE_POLL);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => break,
                        KeyCode::Char('p') | KeyCode::Char('P') => {
                            if view.paused {
                                game_loop.start(Instant::now());
                            } else {
                                game_loop.stop();
                            }
                            view.paused = !view.paused;
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') if !view.paused => {
                            game_loop.reset(Instant::now());
                        }
                        code if !view.paused => {
                            if let Some(command) = command_for(code) {
                                game_loop.submit(command);
                            }
                        }
                        _ => {}
                    }
                }
            }
        }

        now = Instant::now();
        game_loop.pump(now);
        for event in game_loop.take_events() {
            view.observe(event, now);
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    let mut game_loop = config.build()?;

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut game_loop);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_highlight_follows_caller_clock() {
        let mut view = View::default();
        let t0 = Instant::now();
        view.observe(GameEvent::ScoreChanged(15), t0);

        assert!(view.score_highlighted(t0));
        assert!(view.score_highlighted(t0 + SCORE_FLASH - Duration::from_millis(1)));
        assert!(!view.score_highlighted(t0 + SCORE_FLASH));
    }

    #[test]
    fn info_panel_renders_highlight_at_given_instant() {
        use ratatui::backend::TestBackend;

        let game_loop = Config::default().build().expect("build");
        let mut view = View::default();
        let t0 = Instant::now();
        view.observe(GameEvent::ScoreChanged(15), t0);

        let score_is_bold = |now: Instant| {
            let mut terminal = Terminal::new(TestBackend::new(80, 30)).expect("terminal");
            terminal
                .draw(|frame| render(frame, game_loop.game(), &view, now))
                .expect("draw");
            let buffer = terminal.backend().buffer().clone();
            buffer
                .content
                .iter()
                .any(|cell| cell.fg == Color::Yellow && cell.modifier.contains(Modifier::BOLD))
        };

        assert!(score_is_bold(t0));
        assert!(!score_is_bold(t0 + SCORE_FLASH));
    }
}
