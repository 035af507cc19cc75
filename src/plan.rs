/*============================================================
  Synavera Project: Apti
  Module: apti::plan
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Parse aptitude's "show both versions" plan lines into
    structured package transition records.

  Security / Safety Notes:
    Pure text processing; arbitrary subprocess output is
    accepted and non-matching lines are dropped.

  Dependencies:
    regex for the plan-line grammar.

  Operational Scope:
    First stage of the parse → layout → render pipeline used by
    install, remove, purge, and upgrade flows.

  Revision History:
    2024-11-04 COD  Introduced shared package data types.
    2025-11-12 COD  Replaced with aptitude plan-line parser.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Best-effort parsing that never fails the whole render
    - Tagged unions instead of nullable field combinations
============================================================*/

use regex::{Captures, Regex};

use crate::error::{AptiError, Result};
use crate::locale::Locale;

/// Why a package appears in the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Requested on the command line.
    Explicit,
    /// Pulled in to satisfy dependencies (`{a}`).
    AutoInstall,
    /// No longer needed by anything (`{u}`).
    AutoRemove,
}

impl Role {
    fn from_flag(flag: Option<&str>) -> Self {
        match flag {
            Some("a") => Role::AutoInstall,
            Some("u") => Role::AutoRemove,
            _ => Role::Explicit,
        }
    }
}

/// Version information carried by a plan line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Versions {
    /// Upstream version unchanged; only the packaging revision moves.
    Revision {
        base: String,
        old: String,
        new: String,
    },
    /// Independent full versions; `new` is absent for installs/removals.
    Plain { old: String, new: Option<String> },
}

impl Versions {
    /// Text shown in the old-version slot of a row.
    pub fn old_len(&self) -> usize {
        match self {
            Versions::Revision { base, old, .. } => text_width(base) + text_width(old),
            Versions::Plain { old, .. } => text_width(old),
        }
    }

    pub fn new_version(&self) -> Option<&str> {
        match self {
            Versions::Revision { new, .. } => Some(new.as_str()),
            Versions::Plain { new, .. } => new.as_deref(),
        }
    }
}

/// Size delta reported by aptitude, split as printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeDelta {
    /// Signed integer part, thousands separators included (`+1,234`).
    pub integer: String,
    /// Decimal part with its leading separator (`.2`), if any.
    pub fraction: Option<String>,
    pub unit: String,
}

/// One parsed package transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRecord {
    pub name: String,
    pub role: Role,
    pub versions: Versions,
    pub size: Option<SizeDelta>,
}

/// Display width of a cell, in terminal columns.
pub fn text_width(text: &str) -> usize {
    use unicode_width::UnicodeWidthStr;
    text.width()
}

/// Parser for a single locale's plan-line grammar.
#[derive(Debug, Clone)]
pub struct PlanParser {
    pattern: Regex,
}

impl PlanParser {
    /// Build the grammar with the locale's number separators.
    pub fn new(locale: &Locale) -> Result<Self> {
        let pattern = plan_pattern(locale.thousands_separator, locale.decimal_separator);
        let pattern = Regex::new(&pattern)
            .map_err(|err| AptiError::Parse(format!("Invalid plan-line grammar: {err}")))?;
        Ok(Self { pattern })
    }

    /// Parse one line; `None` for blank or non-package lines.
    pub fn parse(&self, line: &str) -> Option<PackageRecord> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let caps = self.pattern.captures(line)?;
        let name = caps.get(1)?.as_str();
        if name.is_empty() {
            return None;
        }

        Some(PackageRecord {
            name: name.to_string(),
            role: Role::from_flag(capture(&caps, 2)),
            versions: classify_versions(&caps),
            size: capture(&caps, 7).zip(capture(&caps, 9)).map(|(integer, unit)| {
                SizeDelta {
                    integer: integer.to_string(),
                    fraction: capture(&caps, 8)
                        .filter(|fraction| !fraction.is_empty())
                        .map(str::to_string),
                    unit: unit.to_string(),
                }
            }),
        })
    }

    /// Parse every package line, preserving order.
    pub fn parse_all<'a, I>(&self, lines: I) -> Vec<PackageRecord>
    where
        I: IntoIterator<Item = &'a str>,
    {
        lines.into_iter().filter_map(|line| self.parse(line)).collect()
    }
}

fn capture<'t>(caps: &Captures<'t>, index: usize) -> Option<&'t str> {
    caps.get(index).map(|m| m.as_str())
}

fn classify_versions(caps: &Captures<'_>) -> Versions {
    let old_version = capture(caps, 3).unwrap_or_default();
    let old_revision = capture(caps, 4);
    let new_version = capture(caps, 5);
    let new_revision = capture(caps, 6);

    if new_version == Some(old_version) {
        return Versions::Revision {
            base: old_version.to_string(),
            old: old_revision.unwrap_or_default().to_string(),
            new: new_revision.unwrap_or_default().to_string(),
        };
    }

    Versions::Plain {
        old: join_revision(old_version, old_revision),
        new: new_version.map(|version| join_revision(version, new_revision)),
    }
}

fn join_revision(version: &str, revision: Option<&str>) -> String {
    match revision {
        Some(revision) => format!("{version}-{revision}"),
        None => version.to_string(),
    }
}

// ex: brasero-common{a} [3.8.0-2 -> 3.8.0-5] <+11,2 MB>
fn plan_pattern(thousands: &str, decimal: &str) -> String {
    let thousands = match thousands {
        "" => String::new(),
        sep => format!("[{}]?", regex::escape(sep)),
    };
    // Group 8 must exist even when the locale has no decimal separator.
    let fraction = match decimal {
        "" => "()?".to_string(),
        sep => format!("([{}][[:digit:]]+)?", regex::escape(sep)),
    };

    let size = format!(
        r"(?:\s<([+-]?[[:digit:]]{{1,3}}(?:{thousands}[[:digit:]]{{3}})*){fraction}\s([[:alpha:]]+)>)?$"
    );

    [
        r"^([[:alnum:]+.:-]*)",
        r"(?:\{([[:alpha:]])\})?",
        r"\s\[",
        r"([[:alnum:][:space:]+.:~]*)",
        r"(?:-([[:alnum:][:space:]+.:~-]+))?",
        r"(?:\s->\s([[:alnum:]+.:~]*)(?:-([[:alnum:]+.:~-]+))?)?",
        r"\]",
        size.as_str(),
    ]
    .concat()
}

/// Split raw aptitude output into candidate plan lines.
///
/// aptitude packs several entries per terminal line, separated by two
/// spaces, so both double spaces and newlines delimit entries.
pub fn split_plan_lines(output: &str) -> Vec<&str> {
    output
        .lines()
        .flat_map(|line| line.split("  "))
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}
