/*============================================================
  Synavera Project: Apti
  Module: apti::palette
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Describe configurable terminal colors and resolve the
    semantic roles used by the renderer into opaque tokens.

  Security / Safety Notes:
    Emits ANSI SGR sequences only; no terminal queries.

  Dependencies:
    crossterm for escape sequences, serde for configuration
    decoding.

  Operational Scope:
    Built once from configuration and handed to the renderer,
    which embeds the tokens without interpreting them.

  Revision History:
    2025-11-12 COD  Introduced typed color lookup table.
    2025-11-19 COD  Escape sequences delegated to crossterm.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Closed enums instead of string-path lookups
    - Plain palette for non-terminal output
============================================================*/

use crossterm::style::{
    Attribute, Color as TermColor, ResetColor, SetAttribute, SetBackgroundColor,
    SetForegroundColor,
};
use serde::Deserialize;

/// Terminal foreground/background color names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorName {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl From<ColorName> for TermColor {
    // The eight base SGR colors; crossterm names the bright set without a prefix.
    fn from(name: ColorName) -> Self {
        match name {
            ColorName::Black => TermColor::Black,
            ColorName::Red => TermColor::DarkRed,
            ColorName::Green => TermColor::DarkGreen,
            ColorName::Yellow => TermColor::DarkYellow,
            ColorName::Blue => TermColor::DarkBlue,
            ColorName::Magenta => TermColor::DarkMagenta,
            ColorName::Cyan => TermColor::DarkCyan,
            ColorName::White => TermColor::Grey,
        }
    }
}

/// Text effect applied alongside a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    Normal,
    Bold,
    Underline,
    Blink,
    Reverse,
}

impl From<Effect> for Attribute {
    fn from(effect: Effect) -> Self {
        match effect {
            Effect::Normal => Attribute::Reset,
            Effect::Bold => Attribute::Bold,
            Effect::Underline => Attribute::Underlined,
            Effect::Blink => Attribute::SlowBlink,
            Effect::Reverse => Attribute::Reverse,
        }
    }
}

/// One configurable color: foreground, background, effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Color {
    pub text: Option<ColorName>,
    pub background: Option<ColorName>,
    pub effect: Option<Effect>,
}

impl Color {
    pub const fn new(text: ColorName, effect: Effect) -> Self {
        Self {
            text: Some(text),
            background: None,
            effect: Some(effect),
        }
    }

    /// Escape sequence selecting this color; an empty color resets.
    pub fn to_shell(&self) -> String {
        let mut sequence = String::new();
        if let Some(effect) = self.effect {
            sequence.push_str(&SetAttribute(effect.into()).to_string());
        }
        if let Some(text) = self.text {
            sequence.push_str(&SetForegroundColor(text.into()).to_string());
        }
        if let Some(background) = self.background {
            sequence.push_str(&SetBackgroundColor(background.into()).to_string());
        }
        if sequence.is_empty() {
            return ResetColor.to_string();
        }
        sequence
    }
}

/// Colors for the old/new halves of a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VersionColors {
    pub old: Color,
    pub new: Color,
}

impl Default for VersionColors {
    fn default() -> Self {
        Self {
            old: Color::new(ColorName::Red, Effect::Bold),
            new: Color::new(ColorName::Green, Effect::Bold),
        }
    }
}

/// Colors for revision-only upgrades; adds the shared version prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevisionColors {
    pub old: Color,
    pub new: Color,
    #[serde(rename = "static")]
    pub base: Color,
}

impl Default for RevisionColors {
    fn default() -> Self {
        let version = VersionColors::default();
        Self {
            old: version.old,
            new: version.new,
            base: Color::new(ColorName::White, Effect::Bold),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpgradeColors {
    pub revision: RevisionColors,
    pub version: VersionColors,
}

/// `[colors]` table of the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorsConfig {
    pub install: Color,
    pub remove: Color,
    pub description: Color,
    pub size: Color,
    pub text: Color,
    pub upgrade: UpgradeColors,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            install: Color::new(ColorName::Green, Effect::Bold),
            remove: Color::new(ColorName::Red, Effect::Bold),
            description: Color::new(ColorName::Black, Effect::Bold),
            size: Color::new(ColorName::Black, Effect::Bold),
            text: Color::new(ColorName::White, Effect::Bold),
            upgrade: UpgradeColors::default(),
        }
    }
}

/// Operation family a version cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Install,
    Remove,
    Upgrade,
}

/// Which part of a version cell is being painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    VersionOld,
    VersionNew,
    RevisionStatic,
    RevisionOld,
    RevisionNew,
}

/// Colors that do not depend on the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Install,
    Text,
    Size,
    Description,
}

/// Resolves semantic roles into opaque color tokens.
pub trait Palette {
    fn version(&self, tone: Tone, part: Part) -> &str;
    fn accent(&self, accent: Accent) -> &str;
    fn reset(&self) -> &str;
}

/// Palette emitting ANSI sequences built from configuration.
#[derive(Debug, Clone)]
pub struct ShellPalette {
    install: String,
    remove: String,
    upgrade: [String; 5],
    text: String,
    size: String,
    description: String,
    reset: String,
}

impl ShellPalette {
    pub fn from_config(colors: &ColorsConfig) -> Self {
        let upgrade = &colors.upgrade;
        Self {
            install: colors.install.to_shell(),
            remove: colors.remove.to_shell(),
            upgrade: [
                upgrade.version.old.to_shell(),
                upgrade.version.new.to_shell(),
                upgrade.revision.base.to_shell(),
                upgrade.revision.old.to_shell(),
                upgrade.revision.new.to_shell(),
            ],
            text: colors.text.to_shell(),
            size: colors.size.to_shell(),
            description: colors.description.to_shell(),
            reset: ResetColor.to_string(),
        }
    }
}

fn part_index(part: Part) -> usize {
    match part {
        Part::VersionOld => 0,
        Part::VersionNew => 1,
        Part::RevisionStatic => 2,
        Part::RevisionOld => 3,
        Part::RevisionNew => 4,
    }
}

impl Palette for ShellPalette {
    fn version(&self, tone: Tone, part: Part) -> &str {
        match tone {
            Tone::Install => &self.install,
            Tone::Remove => &self.remove,
            Tone::Upgrade => &self.upgrade[part_index(part)],
        }
    }

    fn accent(&self, accent: Accent) -> &str {
        match accent {
            Accent::Install => &self.install,
            Accent::Text => &self.text,
            Accent::Size => &self.size,
            Accent::Description => &self.description,
        }
    }

    fn reset(&self) -> &str {
        &self.reset
    }
}

/// Palette that emits nothing; used for pipes and `--no-color`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainPalette;

impl Palette for PlainPalette {
    fn version(&self, _tone: Tone, _part: Part) -> &str {
        ""
    }

    fn accent(&self, _accent: Accent) -> &str {
        ""
    }

    fn reset(&self) -> &str {
        ""
    }
}
