//! Command handlers. Every handler renders its failures as text; nothing
//! here returns an error to the caller.

use chrono::Local;
use rand::seq::SliceRandom;
use std::sync::Arc;
use tracing::warn;

use crate::github::{format_repo, RepoSource, RepoView, Repository};
use crate::profile;

use super::commands::{self, lookup, ArgKind, CommandKind};
use super::output::{clip, OutputLine, SegmentKind};
use super::search;
use super::stats::{bar, RepoStats};

/// Description length in listings
const DESCRIPTION_WIDTH: usize = 60;

/// Side effect a command asks the host to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
  Clear,
  Open(String),
  Quit,
}

/// Output of one command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
  pub lines: Vec<OutputLine>,
  pub effect: Option<Effect>,
}

impl Response {
  fn line(mut self, line: OutputLine) -> Self {
    self.lines.push(line);
    self
  }

  fn blank(self) -> Self {
    self.line(OutputLine::blank())
  }

  fn effect(mut self, effect: Effect) -> Self {
    self.effect = Some(effect);
    self
  }

  fn error(text: impl Into<String>) -> Self {
    Self::default().line(OutputLine::blank().error(text))
  }
}

/// Result of Tab completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
  /// Nothing to do
  None,
  /// Replace the input with this line
  Replace(String),
  /// Several candidates; the input stays as is
  Candidates(Vec<String>),
}

/// Why a repository lookup produced no repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
  /// The repository list could not be fetched
  Failed,
  /// The list was fetched but has no such name
  NotFound,
}

impl Lookup {
  fn render(self, name: &str) -> Response {
    match self {
      Lookup::Failed => Response::error("Failed to fetch project data."),
      Lookup::NotFound => Response::error(format!("Project not found: {}", name)),
    }
  }
}

/// Lines shown as soon as a command starts, before its result arrives.
pub fn preamble(raw: &str) -> Vec<OutputLine> {
  let lowered = raw.trim().to_lowercase();
  let mut tokens = lowered.split_whitespace();
  let Some(command) = tokens.next().and_then(lookup) else {
    return Vec::new();
  };
  let args: Vec<&str> = tokens.collect();

  match command.kind {
    CommandKind::Ls => vec![
      OutputLine::blank(),
      OutputLine::blank().plain("Fetching projects from GitHub..."),
    ],
    CommandKind::Grep if !args.is_empty() => vec![
      OutputLine::blank(),
      OutputLine::blank()
        .plain("Searching for \"")
        .highlight(args.join(" "))
        .plain("\"..."),
    ],
    _ => Vec::new(),
  }
}

/// Maps command lines to handlers.
pub struct Dispatcher<P> {
  source: Arc<P>,
}

impl<P> Clone for Dispatcher<P> {
  fn clone(&self) -> Self {
    Self {
      source: Arc::clone(&self.source),
    }
  }
}

impl<P: RepoSource> Dispatcher<P> {
  pub fn new(source: Arc<P>) -> Self {
    Self { source }
  }

  /// Run one command line. `history` includes the line itself when it was
  /// submitted interactively.
  pub async fn dispatch(&self, raw: &str, history: &[String]) -> Response {
    let lowered = raw.trim().to_lowercase();
    let mut tokens = lowered.split_whitespace();
    let Some(token) = tokens.next() else {
      return Response::default();
    };
    let args: Vec<&str> = tokens.collect();

    let Some(command) = lookup(token) else {
      return not_found(token);
    };

    match command.kind {
      CommandKind::Help => help(),
      CommandKind::Ls => self.list().await,
      CommandKind::Cat => self.show(args.first().copied()).await,
      CommandKind::Grep => self.grep(&args.join(" ")).await,
      CommandKind::Open => self.open(args.first().copied()).await,
      CommandKind::Clone => self.clone_repo(args.first().copied()).await,
      CommandKind::Stats => self.stats().await,
      CommandKind::Refresh => self.refresh(),
      CommandKind::About => about(),
      CommandKind::Skills => skills(),
      CommandKind::Social => social(),
      CommandKind::Contact => contact(),
      CommandKind::Clear => Response::default().effect(Effect::Clear),
      CommandKind::History => show_history(history),
      CommandKind::Man => man(args.first().copied()),
      CommandKind::Whoami => Response::default().line(OutputLine::blank().plain("visitor")),
      CommandKind::Pwd => Response::default()
        .line(OutputLine::blank().plain(format!("/home/visitor/{}", profile::HOST))),
      CommandKind::Date => Response::default().line(
        OutputLine::blank().plain(Local::now().format("%a %b %e %H:%M:%S %Z %Y").to_string()),
      ),
      CommandKind::Time => Response::default()
        .line(OutputLine::blank().info(Local::now().format("%H:%M:%S").to_string())),
      CommandKind::Echo => Response::default().line(OutputLine::blank().plain(args.join(" "))),
      CommandKind::Neofetch => neofetch(),
      CommandKind::Fortune => fortune(),
      CommandKind::Matrix => matrix(),
      CommandKind::Sudo => Response::error("Nice try! 😏"),
      CommandKind::Rm => {
        if args.iter().any(|a| *a == "-rf" || *a == "-rf/") {
          Response::error("I don't think so...")
        } else {
          Response::error("Permission denied (this is a portfolio, not a real shell)")
        }
      }
      CommandKind::Editor => Response::default()
        .line(OutputLine::blank().warning(format!("{}: command not found", token)))
        .line(OutputLine::blank().info("I use Neovim btw")),
      CommandKind::Exit => Response::default()
        .line(OutputLine::blank().plain("Goodbye! 👋"))
        .line(OutputLine::blank().info("Just kidding, you can't leave that easily.")),
      CommandKind::Quit => Response::default()
        .line(OutputLine::blank().plain("Goodbye! 👋"))
        .effect(Effect::Quit),
    }
  }

  /// Tab completion for a partial input line.
  pub async fn complete(&self, input: &str) -> Completion {
    let parts: Vec<&str> = input.split_whitespace().collect();
    let trailing_space = input.ends_with(char::is_whitespace);
    if parts.is_empty() {
      return Completion::None;
    }

    // Still typing the command name
    if parts.len() <= 1 && !trailing_space {
      return match commands::complete_name(parts[0]) {
        Some(name) => Completion::Replace(name.to_string()),
        None => Completion::None,
      };
    }

    let cmd = parts[0].to_lowercase();
    let partial = if trailing_space || parts.len() < 2 {
      String::new()
    } else {
      parts[1].to_lowercase()
    };
    if parts.len() > 2 || (parts.len() == 2 && trailing_space) {
      return Completion::None;
    }

    let candidates: Vec<String> = match lookup(&cmd).map(|c| c.arg) {
      Some(ArgKind::Repository) => match self.source.repositories().await {
        Ok(repos) => repos
          .into_iter()
          .map(|r| r.name)
          .filter(|name| name.to_lowercase().starts_with(&partial))
          .collect(),
        Err(e) => {
          warn!(error = %e, "completion could not list repositories");
          return Completion::None;
        }
      },
      Some(ArgKind::Command) => commands::COMMANDS
        .iter()
        .filter(|c| c.visibility != commands::Visibility::Secret)
        .map(|c| c.name.to_string())
        .filter(|name| name.starts_with(&partial))
        .collect(),
      _ => return Completion::None,
    };

    match candidates.len() {
      0 => Completion::None,
      1 => Completion::Replace(format!("{} {}", cmd, candidates[0])),
      _ if !partial.is_empty() => Completion::Candidates(candidates),
      _ => Completion::None,
    }
  }

  async fn repositories(&self) -> Option<Vec<Repository>> {
    match self.source.repositories().await {
      Ok(repos) => Some(repos),
      Err(e) => {
        warn!(error = %e, "failed to fetch repositories");
        None
      }
    }
  }

  fn view(&self, repo: &Repository) -> RepoView {
    format_repo(repo, self.source.owner())
  }

  /// Find a repository by case-insensitive name
  async fn find(&self, name: &str) -> Result<Repository, Lookup> {
    let repos = self.repositories().await.ok_or(Lookup::Failed)?;

    repos
      .into_iter()
      .find(|r| r.name.to_lowercase() == name.to_lowercase())
      .ok_or(Lookup::NotFound)
  }

  async fn list(&self) -> Response {
    let Some(repos) = self.repositories().await else {
      return Response::error("Failed to fetch projects. Try again later.");
    };

    let mut response = Response::default()
      .blank()
      .line(OutputLine::blank().highlight(format!("Projects ({})", repos.len())))
      .blank();

    for repo in &repos {
      let r = self.view(repo);
      let mut title = OutputLine::blank().plain("  ").success(&r.name);
      if self.source.is_featured(&r.name) {
        title = title.warning(" ★ featured");
      }
      if r.is_collab {
        title = title.dim(format!(" ({}/{})", r.owner, r.name));
      }
      if r.stars > 0 {
        title = title.plain(format!(" ⭐{}", r.stars));
      }

      response = response
        .line(title)
        .line(
          OutputLine::blank()
            .plain("  ")
            .info(&r.language)
            .plain(format!(" · {}", clip(&r.description, DESCRIPTION_WIDTH))),
        )
        .blank();
    }

    response
      .line(
        OutputLine::blank()
          .info("Use")
          .plain(" cat <name> ")
          .info("for details"),
      )
      .blank()
  }

  async fn show(&self, name: Option<&str>) -> Response {
    let Some(name) = name else {
      return Response::error("Usage: cat <project-name>");
    };

    let repo = match self.find(name).await {
      Ok(repo) => repo,
      Err(Lookup::NotFound) => {
        return Lookup::NotFound.render(name).line(
          OutputLine::blank()
            .plain("Use ")
            .highlight("ls")
            .plain(" to see available projects."),
        )
      }
      Err(lookup) => return lookup.render(name),
    };
    let r = self.view(&repo);

    let mut response = Response::default()
      .blank()
      .line(OutputLine::blank().highlight(format!("═══ {} ═══", r.name)))
      .blank()
      .line(OutputLine::blank().info("Description:").plain(format!(" {}", r.description)))
      .line(OutputLine::blank().info("Language:").plain(format!("    {}", r.language)))
      .line(OutputLine::blank().info("Stars:").plain(format!("       {}", r.stars)))
      .line(OutputLine::blank().info("Updated:").plain(format!("     {}", r.updated)));
    if r.is_collab {
      response = response
        .line(OutputLine::blank().info("Owner:").plain(format!("       {}", r.owner)));
    }
    response = response
      .blank()
      .line(OutputLine::blank().info("GitHub:").plain("      ").link(&r.url));
    if let Some(homepage) = &r.homepage {
      response = response.line(OutputLine::blank().info("Website:").plain("     ").link(homepage));
    }
    response.blank()
  }

  async fn grep(&self, term: &str) -> Response {
    if term.is_empty() {
      return Response::error("Usage: grep <search-term>");
    }

    let Some(repos) = self.repositories().await else {
      return Response::error("Failed to fetch project data.");
    };

    let matches: Vec<RepoView> = repos
      .iter()
      .map(|r| self.view(r))
      .filter(|r| search::matches(r, term))
      .collect();

    if matches.is_empty() {
      return Response::default()
        .line(OutputLine::blank().warning(format!("No matches found for \"{}\"", term)));
    }

    let plural = if matches.len() > 1 { "es" } else { "" };
    let mut response = Response::default()
      .line(OutputLine::blank().success(format!("Found {} match{}:", matches.len(), plural)))
      .blank();

    for r in &matches {
      let description = clip(&r.description, DESCRIPTION_WIDTH);
      response = response
        .line(
          OutputLine::blank()
            .plain("  ")
            .extend(search::highlight(&r.name, term, SegmentKind::Success)),
        )
        .line(
          OutputLine::blank()
            .plain("  ")
            .extend(search::highlight(&r.language, term, SegmentKind::Info))
            .plain(" · ")
            .extend(search::highlight(&description, term, SegmentKind::Plain)),
        )
        .blank();
    }
    response
  }

  async fn open(&self, name: Option<&str>) -> Response {
    let Some(name) = name else {
      return Response::error("Usage: open <project-name>");
    };

    match self.find(name).await {
      Ok(repo) => Response::default()
        .line(OutputLine::blank().success(format!("Opening {} on GitHub...", repo.name)))
        .effect(Effect::Open(repo.html_url)),
      Err(lookup) => lookup.render(name),
    }
  }

  async fn clone_repo(&self, name: Option<&str>) -> Response {
    let Some(name) = name else {
      return Response::error("Usage: clone <project-name>");
    };

    let repo = match self.find(name).await {
      Ok(repo) => repo,
      Err(lookup) => return lookup.render(name),
    };
    let r = self.view(&repo);

    let https = format!("git clone {}", repo.clone_url);
    let ssh = format!("git clone git@github.com:{}/{}.git", r.owner, r.name);

    Response::default()
      .blank()
      .line(OutputLine::blank().highlight(format!("═══ Clone {} ═══", r.name)))
      .blank()
      .line(OutputLine::blank().info("HTTPS:"))
      .line(OutputLine::blank().plain("  ").copy(https))
      .blank()
      .line(OutputLine::blank().info("SSH:"))
      .line(OutputLine::blank().plain("  ").copy(ssh))
      .blank()
      .line(OutputLine::blank().dim("Select a command to copy it"))
      .blank()
  }

  async fn stats(&self) -> Response {
    let Some(repos) = self.repositories().await else {
      return Response::error("Failed to fetch stats.");
    };
    let stats = RepoStats::collect(&repos);

    let mut response = Response::default()
      .blank()
      .line(OutputLine::blank().highlight("═══ GitHub Stats ═══"))
      .blank()
      .line(OutputLine::blank().info("Total Repos:").plain(format!("  {}", stats.total_repos)))
      .line(OutputLine::blank().info("Total Stars:").plain(format!("  {} ⭐", stats.total_stars)))
      .blank()
      .line(OutputLine::blank().info("Languages:"));

    let max = stats.max_count();
    for (lang, count) in &stats.languages {
      response = response.line(
        OutputLine::blank()
          .plain(format!("  {:<12} ", lang))
          .success(bar(*count, max))
          .plain(format!(" {}", count)),
      );
    }
    response.blank()
  }

  fn refresh(&self) -> Response {
    match self.source.refresh() {
      Ok(()) => Response::default().line(
        OutputLine::blank().success("Cache cleared. Projects will be refetched from GitHub."),
      ),
      Err(e) => {
        warn!(error = %e, "failed to clear cache");
        Response::error("Failed to clear cache.")
      }
    }
  }
}

fn not_found(token: &str) -> Response {
  Response::default()
    .line(OutputLine::blank().error(format!("command not found: {}", token)))
    .line(
      OutputLine::blank()
        .plain("Type ")
        .highlight("help")
        .plain(" for available commands."),
    )
}

fn help() -> Response {
  let mut response = Response::default()
    .blank()
    .line(OutputLine::blank().highlight("Available commands:"))
    .blank();

  for c in commands::listed() {
    response = response.line(
      OutputLine::blank()
        .plain("  ")
        .success(format!("{:<16}", c.usage()))
        .plain(c.description),
    );
  }

  response
    .blank()
    .line(OutputLine::blank().info("Tip: Use Tab for autocomplete, ↑↓ for history"))
    .line(OutputLine::blank().info("Easter eggs: try matrix, sudo, vim, exit..."))
    .blank()
}

fn man(name: Option<&str>) -> Response {
  let Some(name) = name else {
    return Response::error("What manual page do you want?");
  };
  let Some(c) = lookup(name) else {
    return Response::error(format!("No manual entry for {}", name));
  };

  let mut response = Response::default()
    .blank()
    .line(OutputLine::blank().highlight("NAME"))
    .line(OutputLine::blank().plain(format!("  {} - {}", c.name, c.description)))
    .blank()
    .line(OutputLine::blank().highlight("SYNOPSIS"))
    .line(OutputLine::blank().plain("  ").success(c.usage()));
  if !c.aliases.is_empty() {
    response = response
      .blank()
      .line(OutputLine::blank().highlight("ALIASES"))
      .line(OutputLine::blank().plain(format!("  {}", c.aliases.join(", "))));
  }
  response.blank()
}

fn show_history(history: &[String]) -> Response {
  history
    .iter()
    .enumerate()
    .fold(Response::default(), |response, (i, line)| {
      response.line(
        OutputLine::blank()
          .dim(format!("{:>5}", i + 1))
          .plain(format!("  {}", line)),
      )
    })
}

fn about() -> Response {
  let mut response = Response::default()
    .blank()
    .line(OutputLine::blank().highlight("═══ About Me ═══"))
    .blank()
    .line(OutputLine::blank().plain(format!(
      "Hi! I'm {}, a developer and student.",
      profile::DISPLAY_NAME
    )))
    .blank()
    .line(OutputLine::blank().info("Interests:"));
  for interest in profile::INTERESTS {
    response = response.line(OutputLine::blank().plain(format!("  · {}", interest)));
  }
  response
    .blank()
    .line(
      OutputLine::blank()
        .info("Current project:")
        .plain(format!(" {}", profile::CURRENT_PROJECT)),
    )
    .blank()
}

fn skill_line(skill: &profile::Skill) -> OutputLine {
  let level = usize::from(skill.level.min(5));
  OutputLine::blank()
    .plain(format!("  {:<14}", skill.name))
    .success("█".repeat(level))
    .dim("░".repeat(5 - level))
    .plain(format!(" {}", skill.note))
}

fn skills() -> Response {
  let mut response = Response::default()
    .blank()
    .line(OutputLine::blank().highlight("═══ Skills ═══"))
    .blank()
    .line(OutputLine::blank().info("Languages"));
  for skill in profile::LANGUAGE_SKILLS {
    response = response.line(skill_line(skill));
  }
  response = response
    .blank()
    .line(OutputLine::blank().info("Tools & Technologies"));
  for skill in profile::TOOL_SKILLS {
    response = response.line(skill_line(skill));
  }
  response = response.blank().line(OutputLine::blank().info("Interests"));
  for interest in profile::INTERESTS {
    response = response.line(OutputLine::blank().plain(format!("  · {}", interest)));
  }
  response.blank()
}

fn link_lines(response: Response) -> Response {
  response
    .line(
      OutputLine::blank()
        .info("GitHub:")
        .plain("    ")
        .link(profile::github_url()),
    )
    .line(
      OutputLine::blank()
        .info("Email:")
        .plain("     ")
        .link(format!("mailto:{}", profile::EMAIL)),
    )
    .line(
      OutputLine::blank()
        .info("Website:")
        .plain("   ")
        .link(format!("https://{}", profile::WEBSITE)),
    )
}

fn contact() -> Response {
  let response = Response::default()
    .blank()
    .line(OutputLine::blank().highlight("═══ Contact ═══"))
    .blank();
  link_lines(response).blank()
}

fn social() -> Response {
  let response = Response::default()
    .blank()
    .line(OutputLine::blank().highlight("═══ Social ═══"))
    .blank();
  link_lines(response)
    .blank()
    .line(OutputLine::blank().dim("More links coming soon..."))
    .blank()
}

const NEOFETCH_ART: &[&str] = &[
  r#"       _,met$$$$$gg.     "#,
  r#"    ,g$$$$$$$$$$$$$$$P.  "#,
  r#"  ,g$$P"     """Y$$.".   "#,
  r#" ,$$P'              `$$$."#,
  r#"',$$P       ,ggs.     `$$b:"#,
  r#"`d$$'     ,$P"'   .    $$$"#,
  r#" $$P      d$'     ,    $$P"#,
  r#" $$:      $$.   -    ,d$$'"#,
  r#" $$;      Y$b._   _,d$P'  "#,
  r#" Y$$.    `.`"Y$$$$P"'     "#,
  r#" `$$b      "-.__          "#,
  r#"  `Y$$                    "#,
  r#"   `Y$$.                  "#,
  r#"     `$$b.                "#,
  r#"       `Y$$b.             "#,
  r#"          `"Y$b._         "#,
  r#"              `"""        "#,
];

fn neofetch() -> Response {
  let user = format!("visitor@{}", profile::HOST);
  let info: Vec<OutputLine> = vec![
    OutputLine::blank().highlight(user.clone()),
    OutputLine::blank().plain("─".repeat(user.chars().count())),
    OutputLine::blank().info("OS:").plain(format!(" {}", std::env::consts::OS)),
    OutputLine::blank().info("Host:").plain(format!(" {}", profile::HOST)),
    OutputLine::blank().info("Shell:").plain(" portfolio-terminal"),
    OutputLine::blank().info("Theme:").plain(" Hollow Knight"),
    OutputLine::blank().info("Font:").plain(" JetBrains Mono"),
    OutputLine::blank().info("Terminal:").plain(" ratatui + crossterm"),
  ];

  let mut response = Response::default().blank();
  for (i, art) in NEOFETCH_ART.iter().enumerate() {
    let mut line = OutputLine::blank().art(format!("{:<28}", art));
    if let Some(extra) = info.get(i) {
      line = line.plain("  ").extend(extra.segments.clone());
    }
    response = response.line(line);
  }
  response.blank()
}

fn fortune() -> Response {
  let fortune = profile::FORTUNES
    .choose(&mut rand::thread_rng())
    .copied()
    .unwrap_or("The fortune cookie is empty.");
  Response::default()
    .blank()
    .line(OutputLine::blank().success(format!("🔮 {}", fortune)))
    .blank()
}

fn matrix() -> Response {
  Response::default()
    .blank()
    .line(OutputLine::blank().success("Wake up, Neo..."))
    .line(OutputLine::blank().success("The Matrix has you..."))
    .line(OutputLine::blank().success("Follow the white rabbit."))
    .blank()
    .line(OutputLine::blank().info("Knock, knock, Neo."))
    .blank()
}
