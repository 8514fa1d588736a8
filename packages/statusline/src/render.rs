//! Formatting of repository state as a single status line.

use derive_more::Display;

use crate::{config::DEFAULT_MAX_BRANCH_LEN, repo::RepoInfo};

const ESC: &str = "\x1b";

/// Branch icon shown between the project and the branch.
pub const BRANCH_ICON: &str = "⎇";

/// ANSI 256-color foreground codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Color {
    #[display("38;5;82")]
    Green,

    #[display("38;5;220")]
    Yellow,

    #[display("38;5;196")]
    Red,
}

/// Rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    /// Whether to emit ANSI color codes.
    pub color: bool,

    /// Branch names longer than this many characters are truncated.
    pub max_branch_len: usize,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            color: true,
            max_branch_len: DEFAULT_MAX_BRANCH_LEN,
        }
    }
}

impl Style {
    /// Wrap `text` in the escape codes for `color`.
    pub fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            format!("{ESC}[{color}m{text}{ESC}[0m")
        } else {
            text.to_string()
        }
    }

    /// Wrap `text` in the escape codes for bold `color`.
    pub fn paint_bold(&self, text: &str, color: Color) -> String {
        if self.color {
            format!("{ESC}[1;{color}m{text}{ESC}[0m")
        } else {
            text.to_string()
        }
    }
}

/// Render `info` as `<project> on ⎇ <branch> ↑<ahead> ↓<behind>`.
///
/// Outside a git repository only the project name is shown. The icon is red
/// with untracked files, yellow with tracked changes, and green otherwise.
pub fn render(info: &RepoInfo, style: &Style) -> String {
    if !info.is_git {
        return info.project.clone();
    }

    let icon_color = if info.has_untracked {
        Color::Red
    } else if info.has_tracked {
        Color::Yellow
    } else {
        Color::Green
    };
    let icon = style.paint_bold(BRANCH_ICON, icon_color);

    let mut arrows = String::new();
    if info.ahead > 0 {
        arrows.push(' ');
        arrows.push_str(&style.paint(&format!("↑{}", info.ahead), Color::Green));
    }
    if info.behind > 0 {
        arrows.push(' ');
        arrows.push_str(&style.paint(&format!("↓{}", info.behind), Color::Red));
    }

    let branch = shorten(&info.branch, style.max_branch_len);
    format!("{} on {icon} {branch}{arrows}", info.project)
}

/// Truncate `s` to `max_len` characters, ending in `...` when shortened.
///
/// Limits of 4 or less leave the string untouched since there would be no
/// room for anything but the ellipsis.
pub fn shorten(s: &str, max_len: usize) -> String {
    if max_len <= 4 || s.chars().count() <= max_len {
        return s.to_string();
    }
    let kept = s.chars().take(max_len - 3).collect::<String>();
    format!("{kept}...")
}
