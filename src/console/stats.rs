use std::collections::HashMap;

use crate::github::Repository;

/// How many languages the histogram shows
pub const TOP_LANGUAGES: usize = 6;
/// Width of a histogram bar in cells
pub const BAR_WIDTH: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoStats {
  pub total_repos: usize,
  pub total_stars: u64,
  /// (language, repository count), most common first
  pub languages: Vec<(String, usize)>,
}

impl RepoStats {
  pub fn collect(repos: &[Repository]) -> Self {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();

    for lang in repos.iter().filter_map(|r| r.language.as_deref()) {
      let count = counts.entry(lang).or_insert(0);
      if *count == 0 {
        first_seen.push(lang);
      }
      *count += 1;
    }

    // Stable sort: equal counts keep first-seen order
    let mut languages: Vec<(String, usize)> = first_seen
      .into_iter()
      .map(|lang| (lang.to_string(), counts[lang]))
      .collect();
    languages.sort_by(|a, b| b.1.cmp(&a.1));
    languages.truncate(TOP_LANGUAGES);

    Self {
      total_repos: repos.len(),
      total_stars: repos.iter().map(|r| r.stargazers_count).sum(),
      languages,
    }
  }

  /// Largest bucket, at least 1
  pub fn max_count(&self) -> usize {
    self
      .languages
      .first()
      .map(|(_, count)| *count)
      .unwrap_or(1)
      .max(1)
  }
}

/// Bar scaled so that `max` fills [`BAR_WIDTH`] cells
pub fn bar(count: usize, max: usize) -> String {
  let max = max.max(1);
  let filled = ((count as f64 / max as f64) * BAR_WIDTH as f64).round() as usize;
  let filled = filled.min(BAR_WIDTH);
  format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}
