use crate::config::Config;
use crate::console::{Console, Effect};
use crate::event::{Event, EventHandler};
use crate::github::RepoSource;
use crate::ui;
use crate::ui::components::{InputResult, TextInput};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Main application state
pub struct App<P> {
  /// The command console
  console: Console<P>,

  /// Prompt line
  input: TextInput,

  /// Application configuration
  config: Config,

  /// Event sender for async tasks
  event_tx: mpsc::UnboundedSender<Event>,

  /// Scrollback rows, for paging
  page_size: usize,

  /// Whether to quit
  should_quit: bool,
}

impl<P: RepoSource + 'static> App<P> {
  pub fn new(config: Config, source: Arc<P>) -> Self {
    let (tx, _rx) = mpsc::unbounded_channel();

    Self {
      console: Console::new(source),
      input: TextInput::new(),
      config,
      event_tx: tx,
      page_size: 10,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = self.run_loop(&mut terminal).await;

    // Cleanup terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn run_loop(
    &mut self,
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
  ) -> Result<()> {
    // One animation step per tick
    let tick_rate = Duration::from_millis(self.config.ui.typing_speed_ms.max(1));
    let mut events = EventHandler::new(tick_rate);
    self.event_tx = events.sender();

    self.console.welcome();
    info!("console started");

    // Main loop
    while !self.should_quit {
      let rows = terminal.size()?.height.saturating_sub(ui::CHROME_HEIGHT);
      self.page_size = usize::from(rows).max(1);

      // Draw UI
      terminal.draw(|frame| ui::draw(frame, self))?;

      // Handle events
      match events.next().await {
        Some(event) => self.handle_event(event),
        None => break,
      }
    }

    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => {
        self.console.tick();
      }
      Event::Resize => {} // redrawn on the next loop iteration
      Event::CommandDone(response) => match self.console.finish(response) {
        Some(Effect::Open(url)) => open_url(&url),
        Some(Effect::Quit) => self.should_quit = true,
        Some(Effect::Clear) | None => {}
      },
      Event::Completed { input, completion } => {
        // Ignore results for input the user has since changed
        if self.input.value() == input {
          if let Some(line) = self.console.apply_completion(&input, completion) {
            self.input.set_value(line);
          }
        }
      }
    }

    self.start_next_job();
  }

  fn handle_key(&mut self, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
      KeyCode::Char('c') if ctrl => self.should_quit = true,
      KeyCode::Char('l') if ctrl => self.console.clear(),
      KeyCode::Up => {
        if let Some(line) = self.console.history_prev() {
          self.input.set_value(line);
        }
      }
      KeyCode::Down => {
        let line = self.console.history_next();
        self.input.set_value(line);
      }
      KeyCode::Tab => self.request_completion(),
      KeyCode::PageUp => self.console.scrollback_mut().scroll_up(self.page_size),
      KeyCode::PageDown => self.console.scrollback_mut().scroll_down(self.page_size),
      _ => {
        if let InputResult::Submitted(line) = self.input.handle_key(key) {
          self.console.submit(&line);
          self.console.scrollback_mut().scroll_to_bottom();
        }
      }
    }
  }

  fn request_completion(&self) {
    let job = self.console.completion_job(self.input.value());
    let tx = self.event_tx.clone();

    tokio::spawn(async move {
      let input = job.input.clone();
      let completion = job.run().await;
      let _ = tx.send(Event::Completed { input, completion });
    });
  }

  /// Spawn the next queued command; the console only hands out one at a time.
  fn start_next_job(&mut self) {
    let Some(job) = self.console.next_job() else {
      return;
    };
    debug!(command = %job.raw, "running command");
    let tx = self.event_tx.clone();

    tokio::spawn(async move {
      let response = job.run().await;
      let _ = tx.send(Event::CommandDone(response));
    });
  }
}

// Accessors for UI rendering
impl<P> App<P> {
  pub fn console(&self) -> &Console<P> {
    &self.console
  }

  pub fn input(&self) -> &TextInput {
    &self.input
  }

  pub fn api_url(&self) -> &str {
    &self.config.github.api_url
  }
}

/// The platform opener for `url`, with null stdio
fn opener(url: &str) -> Command {
  let mut command = if cfg!(target_os = "macos") {
    Command::new("open")
  } else if cfg!(target_os = "windows") {
    let mut c = Command::new("cmd");
    c.args(["/C", "start", ""]);
    c
  } else {
    Command::new("xdg-open")
  };

  command
    .arg(url)
    .stdin(Stdio::null())
    .stdout(Stdio::null())
    .stderr(Stdio::null());
  command
}

/// Run `command` and wait for it, so the child is reaped.
async fn launch(mut command: Command) -> std::io::Result<ExitStatus> {
  command.spawn()?.wait().await
}

/// Open a URL in the background. Failures are logged only.
fn open_url(url: &str) {
  let command = opener(url);
  let url = url.to_string();

  tokio::spawn(async move {
    match launch(command).await {
      Ok(status) if status.success() => info!(%url, "opened url"),
      Ok(status) => warn!(%url, %status, "url opener failed"),
      Err(e) => warn!(%url, error = %e, "failed to open url"),
    }
  });
}
