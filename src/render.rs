/*============================================================
  Synavera Project: Apti
  Module: apti::render
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Turn parsed plan records into the grouped, column-aligned
    report shown before asking for confirmation.

  Security / Safety Notes:
    Produces text only; color tokens come from the palette and
    are embedded verbatim.

  Dependencies:
    crate::layout for widths, crate::palette for color tokens.

  Operational Scope:
    Final stage of the parse → layout → render pipeline for
    install, remove, purge, and upgrade operations.

  Revision History:
    2025-11-12 COD  Authored grouped plan renderer.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Deterministic output for identical input
    - Widths fixed before the first row is emitted
============================================================*/

use crate::layout::{ColumnWidths, ARROW};
use crate::locale::Locale;
use crate::palette::{Accent, Palette, Part, Tone};
use crate::plan::{text_width, PackageRecord, Role, SizeDelta, Versions};

/// Rule width used when the terminal size is unknown.
pub const FALLBACK_WIDTH: usize = 80;

/// aptitude action being previewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Install,
    Remove,
    Purge,
    Upgrade,
}

impl Operation {
    fn tone(self) -> Tone {
        match self {
            Operation::Install => Tone::Install,
            Operation::Remove | Operation::Purge => Tone::Remove,
            Operation::Upgrade => Tone::Upgrade,
        }
    }

    pub fn label(self, locale: &Locale) -> &'static str {
        match self {
            Operation::Install => locale.installing,
            Operation::Remove => locale.removing,
            Operation::Purge => locale.purging,
            Operation::Upgrade => locale.upgrading,
        }
    }

    pub fn question(self, locale: &Locale) -> &'static str {
        match self {
            Operation::Install => locale.question_install,
            Operation::Remove => locale.question_remove,
            Operation::Purge => locale.question_purge,
            Operation::Upgrade => locale.question_upgrade,
        }
    }
}

/// Section a record is displayed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderGroup {
    Explicit,
    DependencyInstall,
    DependencyRemove,
    UpgradeRevision,
    UpgradeVersion,
}

impl RenderGroup {
    fn title(self, operation: Operation, locale: &Locale) -> String {
        match self {
            RenderGroup::Explicit => operation.label(locale).to_string(),
            RenderGroup::DependencyInstall => locale.installing_for_dependencies.to_string(),
            RenderGroup::DependencyRemove => locale.removing_unused_dependencies.to_string(),
            RenderGroup::UpgradeRevision => format!("{} {}", locale.upgrading, locale.new_revisions),
            RenderGroup::UpgradeVersion => format!("{} {}", locale.upgrading, locale.new_versions),
        }
    }

    fn tone(self, operation: Operation) -> Tone {
        match self {
            RenderGroup::DependencyInstall => Tone::Install,
            RenderGroup::DependencyRemove => Tone::Remove,
            _ => operation.tone(),
        }
    }
}

/// Records bucketed by section, in display order, empty sections omitted.
pub fn partition(
    records: &[PackageRecord],
    operation: Operation,
) -> Vec<(RenderGroup, Vec<&PackageRecord>)> {
    let mut explicit = Vec::new();
    let mut dep_install = Vec::new();
    let mut dep_remove = Vec::new();

    for record in records {
        match record.role {
            Role::AutoInstall => dep_install.push(record),
            Role::AutoRemove => dep_remove.push(record),
            Role::Explicit => explicit.push(record),
        }
    }

    let mut groups = Vec::with_capacity(4);
    if operation != Operation::Upgrade {
        groups.push((RenderGroup::Explicit, explicit));
        groups.push((RenderGroup::DependencyInstall, dep_install));
        groups.push((RenderGroup::DependencyRemove, dep_remove));
    } else {
        // Upgrades are listed after the dependency sections.
        let (revisions, versions): (Vec<_>, Vec<_>) = explicit
            .into_iter()
            .partition(|record| matches!(record.versions, Versions::Revision { .. }));
        groups.push((RenderGroup::DependencyInstall, dep_install));
        groups.push((RenderGroup::DependencyRemove, dep_remove));
        groups.push((RenderGroup::UpgradeRevision, revisions));
        groups.push((RenderGroup::UpgradeVersion, versions));
    }
    groups.retain(|(_, members)| !members.is_empty());
    groups
}

fn has_explicit(records: &[PackageRecord]) -> bool {
    records.iter().any(|record| record.role == Role::Explicit)
}

/// Display switches and spacing taken from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub display_size: bool,
    pub column_gap: usize,
    pub unit_gap: usize,
    /// Terminal width snapshot; `None` or zero when unknown.
    pub terminal_width: Option<usize>,
}

/// Result of rendering a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendering {
    /// No explicitly requested change survived classification.
    NothingToDo,
    Plan {
        lines: Vec<String>,
        /// Colored `<question> (Y/n)` prompt.
        question: String,
    },
}

pub struct Renderer<'a> {
    locale: &'a Locale,
    palette: &'a dyn Palette,
    options: RenderOptions,
}

impl<'a> Renderer<'a> {
    pub fn new(locale: &'a Locale, palette: &'a dyn Palette, options: RenderOptions) -> Self {
        Self {
            locale,
            palette,
            options,
        }
    }

    /// Render the full report: header, grouped rows, and the summary line.
    pub fn render(
        &self,
        records: &[PackageRecord],
        operation: Operation,
        summary: Option<&str>,
    ) -> Rendering {
        if !has_explicit(records) {
            return Rendering::NothingToDo;
        }

        let widths = ColumnWidths::compute(records, self.locale, self.options.column_gap);
        let mut lines = self.header(&widths);

        for (group, members) in partition(records, operation) {
            lines.push(self.paint_text(&group.title(operation, self.locale)));
            let tone = group.tone(operation);
            lines.extend(members.iter().map(|record| self.row(record, &widths, tone)));
            lines.push(String::new());
        }

        if let Some(summary) = summary {
            lines.push(summary.to_string());
        }

        let question = self.paint_text(&format!("{} (Y/n)", operation.question(self.locale)));
        Rendering::Plan { lines, question }
    }

    fn paint_text(&self, text: &str) -> String {
        format!(
            "{}{text}{}",
            self.palette.accent(Accent::Text),
            self.palette.reset()
        )
    }

    fn header(&self, widths: &ColumnWidths) -> Vec<String> {
        let gap = self.options.column_gap;
        let rule = "=".repeat(
            self.options
                .terminal_width
                .filter(|width| *width > 0)
                .unwrap_or(FALLBACK_WIDTH),
        );
        let package = self.locale.header_package;
        let version = self.locale.header_version;

        let mut line = format!("  {package}");
        pad(&mut line, widths.name().saturating_sub(text_width(package)) + gap);
        line.push_str(version);
        if self.options.display_size {
            // +1 skips the sign in front of each size figure.
            pad(
                &mut line,
                widths.version_all().saturating_sub(text_width(version)) + gap + 1,
            );
            line.push_str(self.locale.header_size);
        }

        vec![rule.clone(), line, rule]
    }

    /// One package row, aligned on `widths`.
    pub fn row(&self, record: &PackageRecord, widths: &ColumnWidths, tone: Tone) -> String {
        let palette = self.palette;
        let reset = palette.reset();
        let gap = self.options.column_gap;

        let mut line = format!("  {}", record.name);
        pad(&mut line, widths.name().saturating_sub(text_width(&record.name)) + gap);

        let trailing = match &record.versions {
            Versions::Plain { old, new } => {
                line.push_str(palette.version(tone, Part::VersionOld));
                line.push_str(old);
                line.push_str(reset);
                match new {
                    Some(new) => {
                        pad(&mut line, widths.version_block().saturating_sub(text_width(old)));
                        push_target(&mut line, palette.version(tone, Part::VersionNew), new, reset);
                        widths.version_new().saturating_sub(text_width(new))
                    }
                    None => widths.version_all().saturating_sub(text_width(old)),
                }
            }
            Versions::Revision { base, old, new } => {
                line.push_str(palette.version(tone, Part::RevisionStatic));
                line.push_str(base);
                line.push_str(reset);
                pad(
                    &mut line,
                    widths
                        .version_block()
                        .saturating_sub(record.versions.old_len()),
                );
                line.push_str(palette.version(tone, Part::RevisionOld));
                line.push_str(old);
                line.push_str(reset);
                push_target(&mut line, palette.version(tone, Part::RevisionNew), new, reset);
                widths.version_new().saturating_sub(text_width(new))
            }
        };

        if self.options.display_size {
            if let Some(size) = &record.size {
                self.push_size(&mut line, size, widths, trailing);
            }
        }

        line
    }

    fn push_size(&self, line: &mut String, size: &SizeDelta, widths: &ColumnWidths, trailing: usize) {
        let fraction = size.fraction.as_deref().unwrap_or_default();

        pad(
            line,
            trailing
                + self.options.column_gap
                + widths.size_integer().saturating_sub(text_width(&size.integer)),
        );
        line.push_str(self.palette.accent(Accent::Size));
        line.push_str(&size.integer);
        line.push_str(fraction);
        pad(
            line,
            (widths.size_fraction().saturating_sub(text_width(fraction))
                + widths.size_unit()
                + self.options.unit_gap)
                .saturating_sub(text_width(&size.unit)),
        );
        line.push_str(&size.unit);
        line.push_str(self.palette.reset());
    }
}

fn push_target(line: &mut String, color: &str, new: &str, reset: &str) {
    line.push_str(ARROW);
    line.push_str(color);
    line.push_str(new);
    line.push_str(reset);
}

fn pad(line: &mut String, count: usize) {
    line.extend(std::iter::repeat(' ').take(count));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Language;
    use crate::palette::PlainPalette;
    use crate::plan::PlanParser;

    const OPTIONS: RenderOptions = RenderOptions {
        display_size: true,
        column_gap: 2,
        unit_gap: 1,
        terminal_width: Some(40),
    };

    /// Marks every color slot so tests can see what was painted.
    struct TagPalette;

    impl Palette for TagPalette {
        fn version(&self, tone: Tone, part: Part) -> &str {
            match (tone, part) {
                (Tone::Install, _) => "<i>",
                (Tone::Remove, _) => "<r>",
                (Tone::Upgrade, Part::VersionOld) => "<vo>",
                (Tone::Upgrade, Part::VersionNew) => "<vn>",
                (Tone::Upgrade, Part::RevisionStatic) => "<rs>",
                (Tone::Upgrade, Part::RevisionOld) => "<ro>",
                (Tone::Upgrade, Part::RevisionNew) => "<rn>",
            }
        }

        fn accent(&self, accent: Accent) -> &str {
            match accent {
                Accent::Install => "<i>",
                Accent::Text => "<t>",
                Accent::Size => "<s>",
                Accent::Description => "<d>",
            }
        }

        fn reset(&self) -> &str {
            "</>"
        }
    }

    fn records(lines: &[&str]) -> Vec<PackageRecord> {
        let parser = PlanParser::new(&Locale::default()).unwrap();
        parser.parse_all(lines.iter().copied())
    }

    fn plan_lines(rendering: Rendering) -> Vec<String> {
        match rendering {
            Rendering::Plan { lines, .. } => lines,
            Rendering::NothingToDo => panic!("expected a plan"),
        }
    }

    fn render_plain(input: &[&str], operation: Operation) -> Vec<String> {
        let locale = Locale::default();
        let renderer = Renderer::new(&locale, &PlainPalette, OPTIONS);
        plan_lines(renderer.render(&records(input), operation, Some("Need to get 1 MB.")))
    }

    const MIXED: [&str; 6] = [
        "brasero-common{a} [3.8.0-2 -> 3.8.0-5] <+11.2 MB>",
        "libc6 [2.36-9 -> 2.37-1ubuntu2] <+120 kB>",
        "gir1.2-gtk-4.0 [4.12.0-1 -> 4.12.0-1ubuntu3] <+1,024 kB>",
        "x [1.0 -> 1.1]",
        "old-lib{u} [0.9.8-3] <-2.5 MB>",
        "vim [2:9.0.1378-2 -> 2:9.1~rc1-1] <+3 kB>",
    ];

    #[test]
    fn arrows_line_up_across_row_shapes() {
        let lines = render_plain(&MIXED, Operation::Upgrade);
        let columns: Vec<usize> = lines
            .iter()
            .filter_map(|line| line.find(" -> "))
            .collect();
        assert_eq!(columns.len(), 5);
        assert!(columns.windows(2).all(|pair| pair[0] == pair[1]), "{lines:#?}");
    }

    #[test]
    fn size_columns_end_together() {
        let lines = render_plain(&MIXED, Operation::Upgrade);
        let sized: Vec<usize> = lines
            .iter()
            .filter(|line| line.ends_with("B") && line.starts_with("  "))
            .map(|line| line.len())
            .collect();
        assert_eq!(sized.len(), 5);
        assert!(sized.windows(2).all(|pair| pair[0] == pair[1]), "{lines:#?}");
    }

    #[test]
    fn rows_without_target_pad_to_the_full_version_column() {
        let input = ["newpkg [2.1.0] <+10 kB>", "other [1.0 -> 1.2] <+2 kB>"];
        let lines = render_plain(&input, Operation::Install);
        let new_row = lines.iter().find(|l| l.contains("newpkg")).unwrap();
        let upgrade_row = lines.iter().find(|l| l.contains("other")).unwrap();
        // "+10" and " +2" are right-aligned in the same three columns.
        assert_eq!(new_row.find("+10"), upgrade_row.find(" +2"));
        assert_eq!(new_row.len(), upgrade_row.len());
    }

    #[test]
    fn upgrade_groups_follow_dependencies() {
        let lines = render_plain(&MIXED, Operation::Upgrade);
        let titles: Vec<&str> = lines
            .iter()
            .map(String::as_str)
            .filter(|line| !line.starts_with(' ') && !line.starts_with('=') && !line.is_empty())
            .collect();
        assert_eq!(
            titles,
            [
                "Installing for dependencies",
                "Removing unused dependencies",
                "Upgrading (new revisions)",
                "Upgrading (new versions)",
                "Need to get 1 MB.",
            ]
        );
    }

    #[test]
    fn non_upgrade_lists_explicit_first() {
        let lines = render_plain(
            &["htop [3.2.2-2] <+387 kB>", "libnl{a} [3.7.0-0.2] <+20 kB>"],
            Operation::Install,
        );
        assert_eq!(lines[3], "Installing");
        assert!(lines[4].starts_with("  htop"));
        assert_eq!(lines[5], "");
        assert_eq!(lines[6], "Installing for dependencies");
    }

    #[test]
    fn header_labels_follow_widths() {
        let lines = render_plain(&["htop [3.2.2-2] <+387 kB>"], Operation::Install);
        assert_eq!(lines[0], "=".repeat(40));
        assert_eq!(lines[2], lines[0]);
        // name width 7 + gap 2, version_all 9, gap 2, sign 1
        assert_eq!(lines[1], "  Package  Version     Size");
        assert_eq!(lines[4], "  htop     3.2.2-2    +387 kB");
        assert_eq!(lines[1].find("Size"), Some(lines[4].find("387").unwrap()));
    }

    #[test]
    fn size_column_can_be_disabled() {
        let locale = Locale::default();
        let options = RenderOptions {
            display_size: false,
            terminal_width: None,
            ..OPTIONS
        };
        let renderer = Renderer::new(&locale, &PlainPalette, options);
        let lines = plan_lines(renderer.render(
            &records(&["htop [3.2.2-2] <+387 kB>"]),
            Operation::Install,
            None,
        ));
        assert_eq!(lines[0].len(), FALLBACK_WIDTH);
        assert_eq!(lines[1], "  Package  Version");
        assert_eq!(lines[4], "  htop     3.2.2-2");
        assert_eq!(lines.last().map(String::as_str), Some(""));
    }

    #[test]
    fn colors_wrap_each_segment() {
        let locale = Locale::default();
        let renderer = Renderer::new(&locale, &TagPalette, OPTIONS);
        let rendering = renderer.render(
            &records(&["pkg [1.2.0-1 -> 1.2.0-2] <+1 kB>"]),
            Operation::Upgrade,
            None,
        );
        let Rendering::Plan { lines, question } = rendering else {
            panic!("expected a plan");
        };
        assert_eq!(lines[3], "<t>Upgrading (new revisions)</>");
        assert!(lines[4].contains("<rs>1.2.0</>"));
        assert!(lines[4].contains("<ro>1</> -> <rn>2</>"));
        assert!(lines[4].contains("<s>+1"));
        assert!(lines[4].ends_with("kB</>"));
        assert_eq!(question, "<t>Do you want to upgrade these packages? (Y/n)</>");
    }

    #[test]
    fn dependency_rows_use_install_and_remove_tones() {
        let locale = Locale::default();
        let renderer = Renderer::new(&locale, &TagPalette, OPTIONS);
        let lines = plan_lines(renderer.render(
            &records(&[
                "a [1.0 -> 2.0]",
                "b{a} [1.0]",
                "c{u} [1.0]",
            ]),
            Operation::Upgrade,
            None,
        ));
        assert!(lines.iter().any(|l| l.contains("<i>1.0</>")));
        assert!(lines.iter().any(|l| l.contains("<r>1.0</>")));
        assert!(lines.iter().any(|l| l.contains("<vo>1.0</>")));
    }

    #[test]
    fn nothing_to_do_without_explicit_changes() {
        let locale = Locale::default();
        let renderer = Renderer::new(&locale, &PlainPalette, OPTIONS);
        assert_eq!(
            renderer.render(&records(&["", "garbage without brackets"]), Operation::Install, None),
            Rendering::NothingToDo
        );
        assert_eq!(
            renderer.render(&records(&["dep{a} [1.0]"]), Operation::Install, None),
            Rendering::NothingToDo
        );
    }

    #[test]
    fn rendering_is_deterministic() {
        let first = render_plain(&MIXED, Operation::Upgrade);
        let second = render_plain(&MIXED, Operation::Upgrade);
        assert_eq!(first, second);
    }

    #[test]
    fn french_locale_renders_french_sizes() {
        let locale = Locale::for_language(Language::French);
        let parser = PlanParser::new(&locale).unwrap();
        let records = parser.parse_all(["brasero [3.8.0-2 -> 3.8.0-5] <+11,2 Mo>"]);
        let renderer = Renderer::new(&locale, &PlainPalette, OPTIONS);
        let lines = plan_lines(renderer.render(&records, Operation::Upgrade, None));
        assert_eq!(lines[3], "Mise à jour (nouvelles révisions)");
        assert!(lines[4].ends_with("+11,2 Mo"));
    }
}
