//! The command console: scrollback, history, queued execution and the
//! welcome animation.

pub mod commands;
pub mod handlers;
pub mod history;
pub mod output;
pub mod search;
pub mod stats;
pub mod typewriter;

pub use handlers::{Completion, Dispatcher, Effect, Response};
pub use output::{OutputLine, Scrollback, Segment, SegmentKind};

use std::collections::VecDeque;
use std::sync::Arc;

use crate::github::RepoSource;
use crate::profile;

use history::History;
use typewriter::{Step, Typewriter};

/// What the console is busy with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleState {
  Idle,
  /// A command is running
  Executing,
  /// The welcome text is still being typed
  Animating,
}

const WELCOME_ART: &[&str] = &[
  "                    ▲",
  "                   ╱ ╲",
  "                  ╱   ╲",
  "                 ╱  ●  ╲",
  "                ╱ ┌───┐ ╲",
  "               ▕  │   │  ▏",
  "                ╲ └───┘ ╱",
  "                 ╲     ╱",
  "                  ║   ║",
  "             ━━━━━╬═══╬━━━━━━━━┓",
  "                  ║   ║        ┃",
  "                 ╱│   │╲       ┃",
  "                ╱ │   │ ╲      ┃",
  "               ╱  │   │  ╲     ┃",
  "              ╱  ╱     ╲  ╲",
  "             ╱  ╱       ╲  ╲",
  "            ▕  ▕         ▏  ▏",
];

/// A queued command ready to run off the UI thread
pub struct Job<P> {
  pub raw: String,
  history: Vec<String>,
  dispatcher: Dispatcher<P>,
}

impl<P: RepoSource> Job<P> {
  pub async fn run(self) -> Response {
    self.dispatcher.dispatch(&self.raw, &self.history).await
  }
}

/// A Tab completion request
pub struct CompletionJob<P> {
  pub input: String,
  dispatcher: Dispatcher<P>,
}

impl<P: RepoSource> CompletionJob<P> {
  pub async fn run(self) -> Completion {
    self.dispatcher.complete(&self.input).await
  }
}

pub struct Console<P> {
  scrollback: Scrollback,
  history: History,
  dispatcher: Dispatcher<P>,
  typewriter: Typewriter,
  /// Index of the line the typewriter is writing into
  typing: Option<usize>,
  /// Submitted lines with the history length at submit time
  pending: VecDeque<(String, usize)>,
  running: bool,
}

impl<P: RepoSource> Console<P> {
  pub fn new(source: Arc<P>) -> Self {
    Self {
      scrollback: Scrollback::new(),
      history: History::new(),
      dispatcher: Dispatcher::new(source),
      typewriter: Typewriter::new(),
      typing: None,
      pending: VecDeque::new(),
      running: false,
    }
  }

  /// Print the banner and queue the typed welcome lines.
  pub fn welcome(&mut self) {
    self.scrollback.push(OutputLine::blank());
    for art in WELCOME_ART {
      self.scrollback.push(OutputLine::blank().art(*art));
    }

    let title = format!(
      "{}  ·  {}",
      profile::DISPLAY_NAME.to_uppercase(),
      profile::TAGLINE
    );
    self.scrollback.extend([
      OutputLine::blank(),
      OutputLine::blank().highlight(format!("  ╔{}╗", "═".repeat(39))),
      OutputLine::blank().highlight(format!("  ║   {:<36}║", title)),
      OutputLine::blank().highlight(format!("  ╚{}╝", "═".repeat(39))),
      OutputLine::blank(),
    ]);

    self.typewriter.push(SegmentKind::Plain, "Welcome to my portfolio!");
    self.typewriter.push(SegmentKind::Plain, "");
    self
      .typewriter
      .push(SegmentKind::Plain, "Type \"help\" for available commands.");
    self.typewriter.push(SegmentKind::Plain, "");
  }

  pub fn state(&self) -> ConsoleState {
    if !self.typewriter.is_done() {
      ConsoleState::Animating
    } else if self.running {
      ConsoleState::Executing
    } else {
      ConsoleState::Idle
    }
  }

  pub fn scrollback(&self) -> &Scrollback {
    &self.scrollback
  }

  pub fn scrollback_mut(&mut self) -> &mut Scrollback {
    &mut self.scrollback
  }

  #[cfg(test)]
  pub fn history(&self) -> &[String] {
    self.history.entries()
  }

  /// Number of submitted commands not yet started
  pub fn queued(&self) -> usize {
    self.pending.len()
  }

  /// Accept a line from the prompt. Blank lines are dropped.
  pub fn submit(&mut self, raw: &str) {
    if raw.trim().is_empty() {
      return;
    }
    self.history.push(raw);
    self
      .pending
      .push_back((raw.to_string(), self.history.entries().len()));
  }

  /// Start the next queued command, if nothing else is running.
  pub fn next_job(&mut self) -> Option<Job<P>> {
    if self.running || self.state() == ConsoleState::Animating {
      return None;
    }
    let (raw, history_len) = self.pending.pop_front()?;

    self.scrollback.push(OutputLine::prompt(&raw));
    self.scrollback.extend(handlers::preamble(&raw));
    self.scrollback.scroll_to_bottom();
    self.running = true;

    Some(Job {
      history: self.history.entries()[..history_len].to_vec(),
      dispatcher: self.dispatcher.clone(),
      raw,
    })
  }

  /// Record a finished command's output. `Clear` is applied here; other
  /// effects are returned for the host.
  pub fn finish(&mut self, response: Response) -> Option<Effect> {
    self.running = false;
    self.scrollback.extend(response.lines);
    self.scrollback.scroll_to_bottom();

    match response.effect {
      Some(Effect::Clear) => {
        self.clear();
        None
      }
      effect => effect,
    }
  }

  /// Submit and run a line to completion, including anything queued
  /// before it. Returns the last host effect.
  #[cfg(test)]
  pub async fn execute(&mut self, raw: &str) -> Option<Effect> {
    self.submit(raw);
    let mut effect = None;
    while let Some(job) = self.next_job() {
      let response = job.run().await;
      effect = self.finish(response).or(effect);
    }
    effect
  }

  pub fn completion_job(&self, input: &str) -> CompletionJob<P> {
    CompletionJob {
      input: input.to_string(),
      dispatcher: self.dispatcher.clone(),
    }
  }

  /// Apply a completion for `input`. Returns the replacement input line.
  pub fn apply_completion(&mut self, input: &str, completion: Completion) -> Option<String> {
    match completion {
      Completion::None => None,
      Completion::Replace(line) => Some(line),
      Completion::Candidates(names) => {
        self.scrollback.push(OutputLine::prompt(input));
        self.scrollback.push(OutputLine::blank().dim(names.join("  ")));
        self.scrollback.scroll_to_bottom();
        None
      }
    }
  }

  /// Complete `input` in place.
  #[cfg(test)]
  pub async fn autocomplete(&mut self, input: &str) -> Option<String> {
    let completion = self.completion_job(input).run().await;
    self.apply_completion(input, completion)
  }

  pub fn history_prev(&mut self) -> Option<String> {
    self.history.prev().map(String::from)
  }

  pub fn history_next(&mut self) -> String {
    self.history.next().to_string()
  }

  /// Drop all output, including any unfinished animation.
  pub fn clear(&mut self) {
    self.scrollback.clear();
    self.typewriter = Typewriter::new();
    self.typing = None;
  }

  /// Advance the welcome animation. Returns whether anything changed.
  pub fn tick(&mut self) -> bool {
    match self.typewriter.tick() {
      Some(Step::NewLine) => {
        self.scrollback.push(OutputLine::blank());
        self.typing = Some(self.scrollback.len() - 1);
        true
      }
      Some(Step::Char(kind, c)) => {
        if let Some(line) = self.typing.and_then(|i| self.scrollback.get_mut(i)) {
          match line.segments.last_mut() {
            Some(segment) if segment.kind == kind => segment.text.push(c),
            _ => line.segments.push(Segment::new(kind, c.to_string())),
          }
        }
        true
      }
      None => {
        self.typing = None;
        false
      }
    }
  }

  /// Run the welcome animation to its end.
  #[cfg(test)]
  pub fn finish_animation(&mut self) {
    while self.tick() {}
  }
}
