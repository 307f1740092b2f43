use std::io::{self, Stdout};

use crossterm::{
    cursor::Show,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    Frame, Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{GameState, Position};

/// Observer that draws a game state
pub trait Renderer {
    fn render(&mut self, state: &GameState) -> io::Result<()>;
}

/// Leaves the alternate screen and shows the cursor again when dropped
struct AlternateScreen;

impl AlternateScreen {
    fn enter(out: &mut Stdout) -> io::Result<Self> {
        execute!(out, EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for AlternateScreen {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen, Show);
    }
}

/// Draws every frame in place on a ratatui terminal
pub struct TerminalRenderer<B: Backend> {
    terminal: Terminal<B>,
    _screen: Option<AlternateScreen>,
}

impl<B: Backend> TerminalRenderer<B> {
    /// Render to an arbitrary backend, e.g. ratatui's `TestBackend`
    pub fn new(backend: B) -> io::Result<Self> {
        Ok(Self {
            terminal: Terminal::new(backend)?,
            _screen: None,
        })
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }
}

impl TerminalRenderer<CrosstermBackend<Stdout>> {
    /// Take over stdout with an alternate screen, restored on drop
    pub fn stdout() -> io::Result<Self> {
        let mut stdout = io::stdout();
        let screen = AlternateScreen::enter(&mut stdout)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;
        terminal.clear()?;
        Ok(Self {
            terminal,
            _screen: Some(screen),
        })
    }
}

impl<B: Backend> Renderer for TerminalRenderer<B> {
    fn render(&mut self, state: &GameState) -> io::Result<()> {
        self.terminal.draw(|frame| draw(frame, state))?;
        Ok(())
    }
}

/// Lay out the stats header and the board (or the game over panel)
pub fn draw(frame: &mut Frame, state: &GameState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Board
        ])
        .split(frame.area());

    frame.render_widget(stats_line(state), chunks[0]);
    if state.is_alive {
        frame.render_widget(grid(state), chunks[1]);
    } else {
        frame.render_widget(game_over(state), chunks[1]);
    }
}

fn grid(state: &GameState) -> Paragraph<'static> {
    let columns = state.width / state.block_size;
    let rows = state.height / state.block_size;
    let head = state.head();

    let lines: Vec<Line> = (0..rows)
        .map(|row| {
            let spans: Vec<Span> = (0..columns)
                .map(|col| {
                    let pos = Position::new(col * state.block_size, row * state.block_size);
                    if pos == head {
                        Span::styled(
                            "■ ",
                            Style::default()
                                .fg(Color::Cyan)
                                .add_modifier(Modifier::BOLD),
                        )
                    } else if state.is_occupied_by_snake(pos) {
                        Span::styled("□ ", Style::default().fg(Color::Green))
                    } else if pos == state.food {
                        Span::styled(
                            "O ",
                            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                        )
                    } else {
                        Span::styled(". ", Style::default().fg(Color::DarkGray))
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .title(" Snake "),
        )
        .alignment(Alignment::Center)
}

fn stats_line(state: &GameState) -> Paragraph<'static> {
    let label = Style::default().fg(Color::Yellow);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);

    Paragraph::new(Line::from(vec![
        Span::styled("Score: ", label),
        Span::styled(state.score.to_string(), value),
        Span::raw("    "),
        Span::styled("Length: ", label),
        Span::styled(state.snake.len().to_string(), value),
        Span::raw("    "),
        Span::styled("Frame: ", label),
        Span::styled(state.frame_iteration.to_string(), value),
    ]))
    .alignment(Alignment::Center)
}

fn game_over(state: &GameState) -> Paragraph<'static> {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "GAME OVER",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                state.score.to_string(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    )
}
