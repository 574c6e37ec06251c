//! Line-oriented output model and scrollback buffer.
//!
//! Handlers produce [`OutputLine`]s made of styled [`Segment`]s. The kinds are
//! semantic; mapping them to terminal colors is the UI's business.

/// Semantic style of a run of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
  Plain,
  /// Echo of a submitted command line
  Prompt,
  Highlight,
  Success,
  Info,
  Warning,
  Error,
  Dim,
  /// A span that matched a search term
  Match,
  Art,
  /// Text pointing at a URL
  Link(String),
  /// Text whose payload is copied when clicked
  Copy(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
  pub text: String,
  pub kind: SegmentKind,
}

impl Segment {
  pub fn new(kind: SegmentKind, text: impl Into<String>) -> Self {
    Self {
      text: text.into(),
      kind,
    }
  }
}

/// One rendered line of scrollback
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputLine {
  pub segments: Vec<Segment>,
}

impl OutputLine {
  pub fn blank() -> Self {
    Self::default()
  }

  pub fn with(mut self, kind: SegmentKind, text: impl Into<String>) -> Self {
    let text = text.into();
    if !text.is_empty() {
      self.segments.push(Segment::new(kind, text));
    }
    self
  }

  pub fn extend(mut self, segments: impl IntoIterator<Item = Segment>) -> Self {
    self.segments.extend(segments);
    self
  }

  pub fn plain(self, text: impl Into<String>) -> Self {
    self.with(SegmentKind::Plain, text)
  }

  pub fn highlight(self, text: impl Into<String>) -> Self {
    self.with(SegmentKind::Highlight, text)
  }

  pub fn success(self, text: impl Into<String>) -> Self {
    self.with(SegmentKind::Success, text)
  }

  pub fn info(self, text: impl Into<String>) -> Self {
    self.with(SegmentKind::Info, text)
  }

  pub fn warning(self, text: impl Into<String>) -> Self {
    self.with(SegmentKind::Warning, text)
  }

  pub fn error(self, text: impl Into<String>) -> Self {
    self.with(SegmentKind::Error, text)
  }

  pub fn dim(self, text: impl Into<String>) -> Self {
    self.with(SegmentKind::Dim, text)
  }

  pub fn art(self, text: impl Into<String>) -> Self {
    self.with(SegmentKind::Art, text)
  }

  pub fn link(self, url: impl Into<String>) -> Self {
    let url = url.into();
    self.with(SegmentKind::Link(url.clone()), url)
  }

  pub fn copy(self, text: impl Into<String>) -> Self {
    let text = text.into();
    self.with(SegmentKind::Copy(text.clone()), text)
  }

  /// The echo of a submitted command
  pub fn prompt(raw: &str) -> Self {
    Self::blank().with(SegmentKind::Prompt, format!("$ {}", raw))
  }

  /// Concatenated text without styling
  #[cfg(test)]
  pub fn text(&self) -> String {
    self.segments.iter().map(|s| s.text.as_str()).collect()
  }

  /// Payload of the first copyable segment, if any
  #[cfg(test)]
  pub fn copy_payload(&self) -> Option<&str> {
    self.segments.iter().find_map(|s| match &s.kind {
      SegmentKind::Copy(payload) => Some(payload.as_str()),
      _ => None,
    })
  }
}

/// Cut `s` to at most `max` characters, marking the cut with "..."
pub fn clip(s: &str, max: usize) -> String {
  match s.char_indices().nth(max) {
    Some((idx, _)) => format!("{}...", &s[..idx]),
    None => s.to_string(),
  }
}

/// Append-only scrollback with a viewport offset.
#[derive(Debug, Clone, Default)]
pub struct Scrollback {
  lines: Vec<OutputLine>,
  /// Lines scrolled up from the bottom
  offset: usize,
}

impl Scrollback {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, line: OutputLine) {
    self.lines.push(line);
  }

  pub fn extend(&mut self, lines: impl IntoIterator<Item = OutputLine>) {
    self.lines.extend(lines);
  }

  pub fn lines(&self) -> &[OutputLine] {
    &self.lines
  }

  pub fn len(&self) -> usize {
    self.lines.len()
  }

  #[cfg(test)]
  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  pub fn get_mut(&mut self, index: usize) -> Option<&mut OutputLine> {
    self.lines.get_mut(index)
  }

  pub fn clear(&mut self) {
    self.lines.clear();
    self.offset = 0;
  }

  pub fn scroll_to_bottom(&mut self) {
    self.offset = 0;
  }

  pub fn scroll_up(&mut self, n: usize) {
    self.offset = (self.offset + n).min(self.lines.len().saturating_sub(1));
  }

  pub fn scroll_down(&mut self, n: usize) {
    self.offset = self.offset.saturating_sub(n);
  }

  pub fn offset(&self) -> usize {
    self.offset
  }

  /// Index range of the lines visible in a viewport `height` rows tall
  pub fn visible_range(&self, height: usize) -> std::ops::Range<usize> {
    let end = self.lines.len().saturating_sub(self.offset);
    let start = end.saturating_sub(height);
    start..end
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_segments_are_skipped() {
    let line = OutputLine::blank().plain("").info("x");
    assert_eq!(line.segments.len(), 1);
    assert_eq!(line.text(), "x");
  }

  #[test]
  fn test_prompt_line() {
    let line = OutputLine::prompt("ls -la");
    assert_eq!(line.segments[0].kind, SegmentKind::Prompt);
    assert_eq!(line.text(), "$ ls -la");
  }

  #[test]
  fn test_copy_payload() {
    let line = OutputLine::blank().plain("  ").copy("git clone x");
    assert_eq!(line.copy_payload(), Some("git clone x"));
    assert_eq!(OutputLine::blank().plain("y").copy_payload(), None);
  }

  #[test]
  fn test_clip() {
    assert_eq!(clip("hello", 10), "hello");
    assert_eq!(clip("hello", 5), "hello");
    assert_eq!(clip("hello world", 5), "hello...");
    assert_eq!(clip("héllo wörld", 7), "héllo w...");
  }

  #[test]
  fn test_visible_range_follows_offset() {
    let mut sb = Scrollback::new();
    for i in 0..10 {
      sb.push(OutputLine::blank().plain(i.to_string()));
    }

    assert_eq!(sb.visible_range(4), 6..10);
    sb.scroll_up(3);
    assert_eq!(sb.visible_range(4), 3..7);
    sb.scroll_up(100);
    assert_eq!(sb.visible_range(4), 0..1);
    sb.scroll_to_bottom();
    assert_eq!(sb.visible_range(20), 0..10);
  }
}
