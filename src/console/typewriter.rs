use std::collections::VecDeque;

use super::output::SegmentKind;

/// One unit of animated output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
  /// Start a new, empty line
  NewLine,
  /// Append a character to the current line
  Char(SegmentKind, char),
}

/// Reveals queued lines one character per tick.
#[derive(Debug, Clone, Default)]
pub struct Typewriter {
  lines: VecDeque<(SegmentKind, VecDeque<char>)>,
  /// Whether the front line has been started
  started: bool,
}

impl Typewriter {
  pub fn new() -> Self {
    Self::default()
  }

  /// Queue a line. An empty `text` yields a blank line.
  pub fn push(&mut self, kind: SegmentKind, text: &str) {
    self.lines.push_back((kind, text.chars().collect()));
  }

  pub fn is_done(&self) -> bool {
    self.lines.is_empty()
  }

  /// Advance by one step, or `None` once everything has been revealed.
  pub fn tick(&mut self) -> Option<Step> {
    loop {
      let (kind, chars) = self.lines.front_mut()?;
      if !self.started {
        self.started = true;
        return Some(Step::NewLine);
      }
      if let Some(c) = chars.pop_front() {
        return Some(Step::Char(kind.clone(), c));
      }
      self.lines.pop_front();
      self.started = false;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_reveals_line_by_line() {
    let mut tw = Typewriter::new();
    tw.push(SegmentKind::Plain, "hi");
    tw.push(SegmentKind::Plain, "");
    tw.push(SegmentKind::Info, "x");

    let steps: Vec<Step> = std::iter::from_fn(|| tw.tick()).collect();

    assert_eq!(
      steps,
      vec![
        Step::NewLine,
        Step::Char(SegmentKind::Plain, 'h'),
        Step::Char(SegmentKind::Plain, 'i'),
        Step::NewLine,
        Step::NewLine,
        Step::Char(SegmentKind::Info, 'x'),
      ]
    );
    assert!(tw.is_done());
  }

  #[test]
  fn test_empty_typewriter_is_done() {
    let mut tw = Typewriter::new();
    assert!(tw.is_done());
    assert_eq!(tw.tick(), None);
  }
}
