use ratatui::prelude::*;

use crate::console::{OutputLine, SegmentKind};

/// Get the display style for a segment kind
pub fn segment_style(kind: &SegmentKind) -> Style {
  match kind {
    SegmentKind::Plain => Style::default().fg(Color::White),
    SegmentKind::Prompt => Style::default().fg(Color::Cyan).bold(),
    SegmentKind::Highlight => Style::default().fg(Color::Magenta).bold(),
    SegmentKind::Success => Style::default().fg(Color::Green),
    SegmentKind::Info => Style::default().fg(Color::Cyan),
    SegmentKind::Warning => Style::default().fg(Color::Yellow),
    SegmentKind::Error => Style::default().fg(Color::Red),
    SegmentKind::Dim => Style::default().fg(Color::DarkGray),
    SegmentKind::Match => Style::default().fg(Color::Black).bg(Color::Yellow).bold(),
    SegmentKind::Art => Style::default().fg(Color::LightRed),
    SegmentKind::Link(_) => Style::default().fg(Color::Blue).underlined(),
    SegmentKind::Copy(_) => Style::default().fg(Color::Green).bg(Color::Black),
  }
}

/// Convert a scrollback line into a styled ratatui line
pub fn to_line(line: &OutputLine) -> Line<'_> {
  Line::from(
    line
      .segments
      .iter()
      .map(|s| Span::styled(s.text.as_str(), segment_style(&s.kind)))
      .collect::<Vec<_>>(),
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_match_stands_out() {
    assert_eq!(segment_style(&SegmentKind::Match).bg, Some(Color::Yellow));
    assert_eq!(segment_style(&SegmentKind::Plain).bg, None);
  }

  #[test]
  fn test_error_is_red() {
    assert_eq!(segment_style(&SegmentKind::Error).fg, Some(Color::Red));
  }

  #[test]
  fn test_link_style_ignores_url() {
    assert_eq!(
      segment_style(&SegmentKind::Link("a".to_string())),
      segment_style(&SegmentKind::Link("b".to_string()))
    );
  }

  #[test]
  fn test_to_line_keeps_segments() {
    let line = OutputLine::blank().plain("Type ").highlight("help");
    let rendered = to_line(&line);
    assert_eq!(rendered.spans.len(), 2);
    assert_eq!(rendered.spans[1].content, "help");
  }
}
