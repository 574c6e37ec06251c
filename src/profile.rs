//! Compiled-in identity of the portfolio owner.
//!
//! None of this is runtime configuration: a different owner means a
//! different build.

/// GitHub account whose repositories are listed
pub const OWNER: &str = "felixlynch10";

pub const DISPLAY_NAME: &str = "Felix Lynch";
pub const TAGLINE: &str = "Developer";
pub const EMAIL: &str = "felixlynch10@gmail.com";
pub const WEBSITE: &str = "felixlynch.com";

/// Shown before everything else in listings
pub const FEATURED_REPOS: &[&str] = &["focus", "felixlynch.com"];

/// Externally owned repositories to include, as `owner/name`
pub const COLLAB_REPOS: &[&str] = &[];

/// Hostname used in the fake prompt and `pwd`
pub const HOST: &str = "felixlynch.com";

pub const INTERESTS: &[&str] = &[
  "Rust & systems programming",
  "Terminal UIs & CLI tools",
  "Linux ricing (Hyprland + Hollow Knight theme)",
  "Productivity tools & automation",
];

pub const CURRENT_PROJECT: &str = "Focus - a TUI productivity app";

/// A skill with a 0-5 level and a short note
pub struct Skill {
  pub name: &'static str,
  pub level: u8,
  pub note: &'static str,
}

pub const LANGUAGE_SKILLS: &[Skill] = &[
  Skill {
    name: "Rust",
    level: 4,
    note: "Systems programming, CLI tools",
  },
  Skill {
    name: "JavaScript",
    level: 4,
    note: "Web dev, Node.js",
  },
  Skill {
    name: "Python",
    level: 3,
    note: "Scripting, automation",
  },
  Skill {
    name: "HTML/CSS",
    level: 4,
    note: "Responsive design",
  },
  Skill {
    name: "Bash",
    level: 3,
    note: "Shell scripting",
  },
  Skill {
    name: "Lua",
    level: 2,
    note: "Neovim config",
  },
];

pub const TOOL_SKILLS: &[Skill] = &[
  Skill {
    name: "Git",
    level: 4,
    note: "Version control",
  },
  Skill {
    name: "Linux",
    level: 4,
    note: "Daily driver, Hyprland",
  },
  Skill {
    name: "Neovim",
    level: 4,
    note: "Primary editor",
  },
  Skill {
    name: "Docker",
    level: 2,
    note: "Containers",
  },
];

pub const FORTUNES: &[&str] = &[
  "You will face many merge conflicts in your future.",
  "A bug is just an undocumented feature.",
  "The best code is no code at all.",
  "git push --force is never the answer. Except when it is.",
  "There are only two hard things in CS: cache invalidation and naming things.",
  "It works on my machine ¯\\_(ツ)_/¯",
  "sudo rm -rf / will solve all your problems. Don't actually do this.",
  "The code you write today is tomorrow's legacy code.",
  "Comments lie. Code doesn't.",
  "First, solve the problem. Then, write the code.",
  "Weeks of coding can save hours of planning.",
  "A user interface is like a joke. If you have to explain it, it's not that good.",
];

pub fn github_url() -> String {
  format!("https://github.com/{}", OWNER)
}
