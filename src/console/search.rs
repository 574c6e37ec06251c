//! Case-insensitive literal search over repositories.

use crate::github::RepoView;

use super::output::{Segment, SegmentKind};

/// Byte length of the shortest prefix of `text` that covers `term`,
/// comparing the lowercase forms. A match may end inside a character whose
/// lowercase form is several chars long; that character is then included.
fn match_len(text: &str, term: &str) -> Option<usize> {
  let mut want = term.chars().flat_map(char::to_lowercase).peekable();
  for (i, c) in text.char_indices() {
    if want.peek().is_none() {
      return Some(i);
    }
    for lower in c.to_lowercase() {
      match want.next() {
        Some(w) if w == lower => {}
        Some(_) => return None,
        None => break,
      }
    }
  }
  want.peek().is_none().then_some(text.len())
}

/// Whether `text` contains `term`, ignoring case.
pub fn contains(text: &str, term: &str) -> bool {
  term.is_empty()
    || text
      .char_indices()
      .any(|(i, _)| match_len(&text[i..], term).is_some())
}

/// Split `text` into `base` segments with every match of `term` as a
/// [`SegmentKind::Match`] segment.
pub fn highlight(text: &str, term: &str, base: SegmentKind) -> Vec<Segment> {
  if term.is_empty() {
    return vec![Segment::new(base, text)];
  }

  let mut segments = Vec::new();
  let mut plain_start = 0;
  let mut pos = 0;

  while pos < text.len() {
    if let Some(len) = match_len(&text[pos..], term) {
      if plain_start < pos {
        segments.push(Segment::new(base.clone(), &text[plain_start..pos]));
      }
      segments.push(Segment::new(SegmentKind::Match, &text[pos..pos + len]));
      pos += len;
      plain_start = pos;
    } else {
      pos += text[pos..].chars().next().map(char::len_utf8).unwrap_or(1);
    }
  }

  if plain_start < text.len() {
    segments.push(Segment::new(base, &text[plain_start..]));
  }
  segments
}

/// Whether a repository matches by name, description or language.
pub fn matches(view: &RepoView, term: &str) -> bool {
  contains(&view.name, term) || contains(&view.description, term) || contains(&view.language, term)
}
