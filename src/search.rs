/*============================================================
  Synavera Project: Apti
  Module: apti::search
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Parse `aptitude search` listings and render them with the
    description clipped to the terminal width.

  Security / Safety Notes:
    Pure text processing.

  Dependencies:
    unicode-width for display-width aware truncation.

  Operational Scope:
    Backs the `search` subcommand.

  Revision History:
    2025-11-12 COD  Authored search listing renderer.
    2025-11-19 COD  Installed names painted with their own accent.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Display-only truncation; parsed entries keep full text
============================================================*/

use unicode_width::UnicodeWidthChar;

use crate::palette::{Accent, Palette};
use crate::plan::text_width;

/// Format string handed to `aptitude search -F`.
pub const SEARCH_FORMAT: &str = "%c %M|%p|%d";

/// Width reserved for the state flags (`i A`, `p`, ...).
const STATE_WIDTH: usize = 6;

/// One `aptitude search` result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEntry {
    pub state: String,
    pub name: String,
    pub description: String,
}

impl SearchEntry {
    pub fn is_installed(&self) -> bool {
        self.state.contains('i')
    }
}

/// Parse output produced with [`SEARCH_FORMAT`]; malformed lines are skipped.
pub fn parse_search(output: &str) -> Vec<SearchEntry> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.splitn(3, '|');
            let state = fields.next()?;
            let name = fields.next()?;
            let description = fields.next().unwrap_or_default();
            Some(SearchEntry {
                state: state.to_string(),
                name: name.trim().to_string(),
                description: format!("- {}", description.trim_end()),
            })
        })
        .collect()
}

/// Render search results; `terminal_width` of `None`/0 disables truncation.
pub fn render_search(
    entries: &[SearchEntry],
    palette: &dyn Palette,
    name_width: usize,
    terminal_width: Option<usize>,
) -> Vec<String> {
    let reset = palette.reset();
    let available = terminal_width
        .filter(|width| *width > 0)
        .map(|width| width.saturating_sub(STATE_WIDTH + name_width));

    entries
        .iter()
        .map(|entry| {
            let mut line = entry.state.clone();
            line.push_str(&" ".repeat(STATE_WIDTH.saturating_sub(text_width(&entry.state))));

            if entry.is_installed() {
                line.push_str(palette.accent(Accent::Install));
                line.push_str(&entry.name);
                line.push_str(reset);
            } else {
                line.push_str(&entry.name);
            }
            line.push_str(&" ".repeat(name_width.saturating_sub(text_width(&entry.name))));

            let description = match available {
                Some(width) => truncate_to_width(&entry.description, width),
                None => &entry.description,
            };
            line.push_str(palette.accent(Accent::Description));
            line.push_str(description);
            line.push_str(reset);
            line
        })
        .collect()
}

fn truncate_to_width(text: &str, max_width: usize) -> &str {
    let mut width = 0;
    for (index, c) in text.char_indices() {
        width += c.width().unwrap_or(0);
        if width > max_width {
            return &text[..index];
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{Part, PlainPalette, Tone};

    struct AccentTags;

    impl Palette for AccentTags {
        fn version(&self, _tone: Tone, _part: Part) -> &str {
            "<v>"
        }

        fn accent(&self, accent: Accent) -> &str {
            match accent {
                Accent::Install => "<i>",
                Accent::Description => "<d>",
                _ => "<?>",
            }
        }

        fn reset(&self) -> &str {
            "</>"
        }
    }

    const OUTPUT: &str = "i A |libgtk-4-1|GTK graphical user interface library\n\
                          p   |htop|interactive processes viewer\n\
                          not a search line\n";

    #[test]
    fn parses_pipe_separated_fields() {
        let entries = parse_search(OUTPUT);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].state, "i A ");
        assert_eq!(entries[0].name, "libgtk-4-1");
        assert_eq!(
            entries[0].description,
            "- GTK graphical user interface library"
        );
        assert!(entries[0].is_installed());
        assert!(!entries[1].is_installed());
    }

    #[test]
    fn columns_are_padded() {
        let entries = parse_search(OUTPUT);
        let lines = render_search(&entries, &PlainPalette, 12, None);
        assert_eq!(lines[1], "p     htop        - interactive processes viewer");
    }

    #[test]
    fn long_descriptions_are_clipped_to_the_terminal() {
        let entries = parse_search(OUTPUT);
        let lines = render_search(&entries, &PlainPalette, 12, Some(30));
        assert_eq!(lines[0], "i A   libgtk-4-1  - GTK graphi");
        assert_eq!(lines[0].len(), 30);
        assert_eq!(entries[0].description.len(), 38);
    }

    #[test]
    fn zero_width_means_no_truncation() {
        let entries = parse_search(OUTPUT);
        let lines = render_search(&entries, &PlainPalette, 12, Some(0));
        assert!(lines[0].ends_with("interface library"));
    }

    #[test]
    fn installed_names_take_the_install_accent() {
        let entries = parse_search(OUTPUT);
        let lines = render_search(&entries, &AccentTags, 12, None);
        assert!(lines[0].starts_with("i A   <i>libgtk-4-1</>"));
        assert!(lines[1].starts_with("p     htop"));
        assert!(!lines.iter().any(|line| line.contains("<v>")));
    }

    #[test]
    fn truncation_respects_wide_characters() {
        assert_eq!(truncate_to_width("- 日本語", 5), "- 日");
        assert_eq!(truncate_to_width("- été", 4), "- ét");
    }
}
