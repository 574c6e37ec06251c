//! Available commands and command-name completion

/// Which handler a command runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
  Help,
  Ls,
  Cat,
  Grep,
  Open,
  Clone,
  Stats,
  Refresh,
  About,
  Skills,
  Social,
  Contact,
  Clear,
  History,
  Man,
  Whoami,
  Pwd,
  Date,
  Time,
  Echo,
  Neofetch,
  Fortune,
  Matrix,
  Sudo,
  Rm,
  Editor,
  Exit,
  Quit,
}

/// What a command's first argument names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
  None,
  Repository,
  Term,
  Command,
  Text,
}

/// Where a command shows up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
  /// In `help` and completion
  Listed,
  /// Completion only
  Unlisted,
  /// Easter egg, never advertised
  Secret,
}

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  /// Argument placeholder shown after the name, e.g. "<name>"
  pub args: &'static str,
  pub description: &'static str,
  pub kind: CommandKind,
  pub arg: ArgKind,
  pub visibility: Visibility,
}

impl Command {
  pub fn usage(&self) -> String {
    if self.args.is_empty() {
      self.name.to_string()
    } else {
      format!("{} {}", self.name, self.args)
    }
  }
}

const fn cmd(
  name: &'static str,
  args: &'static str,
  description: &'static str,
  kind: CommandKind,
  arg: ArgKind,
  visibility: Visibility,
) -> Command {
  Command {
    name,
    aliases: &[],
    args,
    description,
    kind,
    arg,
    visibility,
  }
}

const fn with_aliases(mut c: Command, aliases: &'static [&'static str]) -> Command {
  c.aliases = aliases;
  c
}

use ArgKind as A;
use CommandKind as K;
use Visibility as V;

/// All available commands, in `help` order
pub const COMMANDS: &[Command] = &[
  cmd("ls", "", "List all projects", K::Ls, A::None, V::Listed),
  cmd("cat", "<name>", "Show project details", K::Cat, A::Repository, V::Listed),
  cmd("grep", "<term>", "Search projects", K::Grep, A::Term, V::Listed),
  cmd("open", "<name>", "Open project on GitHub", K::Open, A::Repository, V::Listed),
  cmd("clone", "<name>", "Get git clone command", K::Clone, A::Repository, V::Listed),
  cmd("stats", "", "GitHub statistics", K::Stats, A::None, V::Listed),
  cmd("refresh", "", "Refetch projects from GitHub", K::Refresh, A::None, V::Listed),
  cmd("about", "", "About me", K::About, A::None, V::Listed),
  cmd("skills", "", "Languages & tools", K::Skills, A::None, V::Listed),
  cmd("social", "", "Social links", K::Social, A::None, V::Listed),
  cmd("contact", "", "Contact information", K::Contact, A::None, V::Listed),
  with_aliases(
    cmd("neofetch", "", "System info", K::Neofetch, A::None, V::Listed),
    &["fastfetch"],
  ),
  with_aliases(
    cmd("fortune", "", "Random dev wisdom", K::Fortune, A::None, V::Listed),
    &["cowsay"],
  ),
  cmd("history", "", "Command history", K::History, A::None, V::Listed),
  cmd("man", "<command>", "Manual for a command", K::Man, A::Command, V::Listed),
  cmd("clear", "", "Clear terminal (or Ctrl+L)", K::Clear, A::None, V::Listed),
  cmd("help", "", "Show this help", K::Help, A::None, V::Listed),
  with_aliases(
    cmd("quit", "", "Leave the terminal", K::Quit, A::None, V::Listed),
    &["q"],
  ),
  cmd("whoami", "", "Print the current user", K::Whoami, A::None, V::Unlisted),
  cmd("pwd", "", "Print working directory", K::Pwd, A::None, V::Unlisted),
  cmd("date", "", "Print date and time", K::Date, A::None, V::Unlisted),
  cmd("time", "", "Print the time", K::Time, A::None, V::Unlisted),
  cmd("echo", "<text>", "Print text", K::Echo, A::Text, V::Unlisted),
  cmd("matrix", "", "Follow the white rabbit", K::Matrix, A::None, V::Secret),
  cmd("sudo", "<command>", "Become root", K::Sudo, A::Text, V::Secret),
  cmd("rm", "<path>", "Remove files", K::Rm, A::Text, V::Secret),
  with_aliases(
    cmd("vim", "<file>", "Edit a file", K::Editor, A::Text, V::Secret),
    &["nano", "emacs"],
  ),
  with_aliases(
    cmd("exit", "", "Log out", K::Exit, A::None, V::Secret),
    &["logout"],
  ),
];

/// Resolve a (lowercased) token by name or alias
pub fn lookup(token: &str) -> Option<&'static Command> {
  COMMANDS
    .iter()
    .find(|c| c.name == token || c.aliases.contains(&token))
}

/// Complete a partial command name.
///
/// Returns the lexicographically first non-secret command name starting
/// with `prefix`. Aliases are not completed.
pub fn complete_name(prefix: &str) -> Option<&'static str> {
  let prefix = prefix.to_lowercase();
  COMMANDS
    .iter()
    .filter(|c| c.visibility != Visibility::Secret)
    .map(|c| c.name)
    .filter(|name| name.starts_with(&prefix))
    .min()
}

/// Commands shown by `help`
pub fn listed() -> impl Iterator<Item = &'static Command> {
  COMMANDS
    .iter()
    .filter(|c| c.visibility == Visibility::Listed)
}
