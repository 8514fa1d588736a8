//! Parser for `git status --porcelain=2 --branch` output.
//!
//! Only the parts the status line displays are retained: the branch header,
//! the ahead/behind counts, and whether any tracked or untracked entries exist.

use std::convert::Infallible;
use std::str::FromStr;

use tap::Pipe;

/// Summary of a porcelain v2 status listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PorcelainStatus {
    /// The value of `# branch.head`, e.g. `main` or `(detached)`.
    pub branch: Option<String>,

    /// Commits on the local branch that are not on its upstream.
    pub ahead: u32,

    /// Commits on the upstream that are not on the local branch.
    pub behind: u32,

    /// Whether any tracked file is modified, staged, renamed, or unmerged.
    pub has_tracked: bool,

    /// Whether any untracked file exists.
    pub has_untracked: bool,
}

impl PorcelainStatus {
    /// Parse the full output of `git status --porcelain=2 --branch`.
    ///
    /// Parsing is lenient: unknown or malformed lines are skipped.
    pub fn parse(output: &str) -> Self {
        output
            .lines()
            .filter_map(|line| line.parse::<Line>().ok())
            .fold(Self::default(), Self::apply)
    }

    fn apply(mut self, line: Line) -> Self {
        match line {
            Line::BranchHead(name) => self.branch = Some(name),
            Line::BranchAb { ahead, behind } => {
                self.ahead = ahead;
                self.behind = behind;
            }
            Line::Tracked => self.has_tracked = true,
            Line::Untracked => self.has_untracked = true,
            Line::Other => {}
        }
        self
    }
}

/// A single classified line of porcelain v2 output.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    /// `# branch.head <name>`
    BranchHead(String),

    /// `# branch.ab +<ahead> -<behind>`
    BranchAb { ahead: u32, behind: u32 },

    /// `1 ...`, `2 ...`, or `u ...`: a changed or unmerged tracked entry.
    Tracked,

    /// `? <path>`
    Untracked,

    /// Blank lines, other headers, ignored files, and anything unrecognized.
    Other,
}

impl FromStr for Line {
    type Err = Infallible;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();

        if let Some(header) = line.strip_prefix('#') {
            return parse_header(header).pipe(Ok);
        }

        let line = match line.split_once(' ').map(|(kind, _)| kind) {
            Some("1" | "2" | "u") => Line::Tracked,
            Some("?") => Line::Untracked,
            _ => Line::Other,
        };
        Ok(line)
    }
}

fn parse_header(header: &str) -> Line {
    let header = header.trim_start();
    if let Some(name) = header.strip_prefix("branch.head ") {
        return Line::BranchHead(name.trim().to_string());
    }
    if let Some(counts) = header.strip_prefix("branch.ab ") {
        return match counts.split_whitespace().collect::<Vec<_>>().as_slice() {
            [ahead, behind] => Line::BranchAb {
                ahead: parse_signed(ahead),
                behind: parse_signed(behind),
            },
            _ => Line::Other,
        };
    }
    Line::Other
}

/// Leniently parse a count such as `+3` or `-12`.
///
/// A single leading sign is skipped and the leading run of ASCII digits is
/// read; anything that does not start with a digit after the sign is `0`.
/// Overflow saturates.
pub fn parse_signed(s: &str) -> u32 {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u32, |n, digit| {
            n.saturating_mul(10).saturating_add(u32::from(digit - b'0'))
        })
}
