pub mod components;
mod renderfns;

use crate::app::App;
use crate::github::RepoSource;
use crate::profile;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Rows taken by the header and the prompt line
pub const CHROME_HEIGHT: u16 = 2;

/// Main draw function
pub fn draw<P: RepoSource>(frame: &mut Frame, app: &App<P>) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Scrollback
      Constraint::Length(1), // Prompt
    ])
    .split(frame.area());

  let console = app.console();
  renderfns::draw_header(
    frame,
    chunks[0],
    app.api_url(),
    console.state(),
    console.queued(),
  );
  draw_scrollback(frame, chunks[1], app);
  draw_prompt(frame, chunks[2], app);
}

fn draw_scrollback<P: RepoSource>(frame: &mut Frame, area: Rect, app: &App<P>) {
  let scrollback = app.console().scrollback();
  let range = scrollback.visible_range(area.height as usize);

  let lines: Vec<Line> = scrollback.lines()[range]
    .iter()
    .map(renderfns::to_line)
    .collect();

  frame.render_widget(Paragraph::new(lines), area);
}

fn prompt_spans() -> Vec<Span<'static>> {
  vec![
    Span::styled(
      format!("visitor@{}", profile::HOST),
      Style::default().fg(Color::Green).bold(),
    ),
    Span::styled(":", Style::default().fg(Color::White)),
    Span::styled("~", Style::default().fg(Color::Blue).bold()),
    Span::styled("$ ", Style::default().fg(Color::White)),
  ]
}

fn draw_prompt<P: RepoSource>(frame: &mut Frame, area: Rect, app: &App<P>) {
  let input = app.input();
  let mut spans = prompt_spans();
  let prompt_width: usize = spans.iter().map(Span::width).sum();

  let before_cursor: String = input.value().chars().take(input.cursor_position()).collect();
  let cursor_offset = Span::raw(before_cursor).width();

  spans.push(Span::styled(input.value(), Style::default().fg(Color::White)));
  if app.console().scrollback().offset() > 0 {
    spans.push(Span::styled(
      format!("  [↑{}]", app.console().scrollback().offset()),
      Style::default().fg(Color::DarkGray),
    ));
  }

  frame.render_widget(Paragraph::new(Line::from(spans)), area);

  let x = area.x + (prompt_width + cursor_offset) as u16;
  frame.set_cursor_position((x.min(area.right().saturating_sub(1)), area.y));
}
