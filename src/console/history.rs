/// Submitted command lines with an Up/Down navigation cursor.
///
/// Navigation only moves the cursor; entries are never rewritten.
#[derive(Debug, Clone, Default)]
pub struct History {
  entries: Vec<String>,
  /// `entries.len()` means "past the newest entry"
  cursor: usize,
}

impl History {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record a submitted line. Blank lines are ignored.
  pub fn push(&mut self, line: &str) {
    let line = line.trim();
    if !line.is_empty() {
      self.entries.push(line.to_string());
    }
    self.cursor = self.entries.len();
  }

  pub fn entries(&self) -> &[String] {
    &self.entries
  }

  /// Step to the previous entry. Stays on the oldest entry once reached.
  pub fn prev(&mut self) -> Option<&str> {
    if self.cursor > 0 {
      self.cursor -= 1;
      self.entries.get(self.cursor).map(String::as_str)
    } else {
      None
    }
  }

  /// Step to the next entry. Returns "" when moving past the newest.
  pub fn next(&mut self) -> &str {
    if self.cursor + 1 < self.entries.len() {
      self.cursor += 1;
      &self.entries[self.cursor]
    } else {
      self.cursor = self.entries.len();
      ""
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn history(lines: &[&str]) -> History {
    let mut h = History::new();
    for l in lines {
      h.push(l);
    }
    h
  }

  #[test]
  fn test_blank_lines_are_not_recorded() {
    let h = history(&["ls", "   ", "", "cat focus"]);
    assert_eq!(h.entries(), &["ls".to_string(), "cat focus".to_string()]);
  }

  #[test]
  fn test_prev_walks_back_and_stops() {
    let mut h = history(&["a", "b", "c"]);
    assert_eq!(h.prev(), Some("c"));
    assert_eq!(h.prev(), Some("b"));
    assert_eq!(h.prev(), Some("a"));
    assert_eq!(h.prev(), None);
  }

  #[test]
  fn test_next_past_newest_clears() {
    let mut h = history(&["a", "b"]);
    h.prev();
    h.prev();
    assert_eq!(h.next(), "b");
    assert_eq!(h.next(), "");
    assert_eq!(h.next(), "");
    assert_eq!(h.prev(), Some("b"));
  }

  #[test]
  fn test_navigation_does_not_mutate_entries() {
    let mut h = history(&["a", "b"]);
    h.prev();
    h.next();
    h.prev();
    assert_eq!(h.entries().len(), 2);
  }

  #[test]
  fn test_push_resets_cursor() {
    let mut h = history(&["a", "b"]);
    h.prev();
    h.prev();
    h.push("c");
    assert_eq!(h.prev(), Some("c"));
  }

  #[test]
  fn test_empty_history() {
    let mut h = History::new();
    assert_eq!(h.prev(), None);
    assert_eq!(h.next(), "");
  }
}
