use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::console::ConsoleState;

/// Draw the header bar with logo, data source, state and shortcuts
pub fn draw_header(
  frame: &mut Frame,
  area: Rect,
  api_url: &str,
  state: ConsoleState,
  queued: usize,
) {
  let domain = extract_domain(api_url);

  let (label, color) = match state {
    ConsoleState::Idle => ("ready".to_string(), Color::Green),
    ConsoleState::Animating => ("welcome".to_string(), Color::Magenta),
    ConsoleState::Executing if queued > 0 => {
      (format!("running (+{} queued)", queued), Color::Yellow)
    }
    ConsoleState::Executing => ("running".to_string(), Color::Yellow),
  };

  let header = Line::from(vec![
    Span::styled(" folio ", Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", domain), Style::default().fg(Color::White)),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", label), Style::default().fg(color).bold()),
    Span::raw("  "),
    // Shortcuts - keys highlighted, descriptions dimmed
    Span::styled("<Tab>", Style::default().fg(Color::Cyan)),
    Span::styled(" complete", Style::default().fg(Color::DarkGray)),
    Span::raw("   "),
    Span::styled("<↑↓>", Style::default().fg(Color::Cyan)),
    Span::styled(" history", Style::default().fg(Color::DarkGray)),
    Span::raw("   "),
    Span::styled("<PgUp/PgDn>", Style::default().fg(Color::Cyan)),
    Span::styled(" scroll", Style::default().fg(Color::DarkGray)),
    Span::raw("   "),
    Span::styled("<Ctrl-C>", Style::default().fg(Color::Cyan)),
    Span::styled(" quit", Style::default().fg(Color::DarkGray)),
  ]);

  let paragraph = Paragraph::new(header).style(Style::default().bg(Color::Black));

  frame.render_widget(paragraph, area);
}

/// Extract domain from the API URL
fn extract_domain(url: &str) -> &str {
  url
    .strip_prefix("https://")
    .or_else(|| url.strip_prefix("http://"))
    .unwrap_or(url)
    .split('/')
    .next()
    .unwrap_or(url)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_extract_domain() {
    assert_eq!(extract_domain("https://api.github.com"), "api.github.com");
    assert_eq!(
      extract_domain("https://github.example.com/api/v3"),
      "github.example.com"
    );
    assert_eq!(extract_domain("http://127.0.0.1:1234"), "127.0.0.1:1234");
  }
}
