/*============================================================
  Synavera Project: Apti
  Module: apti::layout
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Compute the column widths that keep every rendered plan row
    aligned, including the version arrows and size column.

  Security / Safety Notes:
    Pure computation over in-memory records.

  Dependencies:
    unicode-width (through plan::text_width) for cell widths.

  Operational Scope:
    Runs once over the complete record set before any row is
    rendered; the renderer never adjusts widths afterwards.

  Revision History:
    2025-11-12 COD  Authored two-pass column layout.
    2025-11-19 COD  Widths made read-only outside compute.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Widths derived from the full snapshot, never incrementally
    - Optional fields guarded at every access
============================================================*/

use crate::locale::Locale;
use crate::plan::{text_width, PackageRecord, Versions};

/// Separator printed between old and new versions.
pub const ARROW: &str = " -> ";

/// Widths shared by the header and every data row.
///
/// Only [`ColumnWidths::compute`] sets them; renderers read through the
/// accessors so a row can never widen a column after measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnWidths {
    name: usize,
    version_static: usize,
    version_old: usize,
    version_new: usize,
    size_integer: usize,
    size_fraction: usize,
    size_unit: usize,
    has_targets: bool,
}

impl ColumnWidths {
    /// Measure `records`; `column_gap` separates the revision base from
    /// the old revision when revision rows dominate the version column.
    pub fn compute(records: &[PackageRecord], locale: &Locale, column_gap: usize) -> Self {
        let mut widths = ColumnWidths {
            name: text_width(locale.header_package),
            version_old: text_width(locale.header_version),
            ..ColumnWidths::default()
        };
        // Widest full old version among rows that are not revision-only.
        let mut plain_old = 0;

        for record in records {
            widths.name = widths.name.max(text_width(&record.name));

            match &record.versions {
                Versions::Revision { base, old, .. } => {
                    widths.version_static = widths.version_static.max(text_width(base));
                    widths.version_old = widths.version_old.max(text_width(old));
                }
                Versions::Plain { old, .. } => {
                    plain_old = plain_old.max(text_width(old));
                }
            }

            if let Some(new) = record.versions.new_version() {
                widths.has_targets = true;
                widths.version_new = widths.version_new.max(text_width(new));
            }

            if let Some(size) = &record.size {
                widths.size_integer = widths.size_integer.max(text_width(&size.integer));
                if let Some(fraction) = &size.fraction {
                    widths.size_fraction = widths.size_fraction.max(text_width(fraction));
                }
                widths.size_unit = widths.size_unit.max(text_width(&size.unit));
            }
        }

        if plain_old > widths.version_old + widths.version_static {
            widths.version_static = plain_old - widths.version_old;
        } else {
            widths.version_static += column_gap;
        }

        widths
    }

    pub fn name(&self) -> usize {
        self.name
    }

    pub fn version_static(&self) -> usize {
        self.version_static
    }

    pub fn version_old(&self) -> usize {
        self.version_old
    }

    pub fn version_new(&self) -> usize {
        self.version_new
    }

    pub fn size_integer(&self) -> usize {
        self.size_integer
    }

    pub fn size_fraction(&self) -> usize {
        self.size_fraction
    }

    pub fn size_unit(&self) -> usize {
        self.size_unit
    }

    /// True when at least one row has an upgrade target.
    pub fn has_targets(&self) -> bool {
        self.has_targets
    }

    /// Column where the `->` separator starts, relative to the version column.
    pub fn version_block(&self) -> usize {
        self.version_static + self.version_old
    }

    /// Width of the whole version column, arrow and new version included.
    pub fn version_all(&self) -> usize {
        if self.has_targets {
            self.version_block() + ARROW.len() + self.version_new
        } else {
            self.version_block()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{Role, SizeDelta};

    fn record(name: &str, versions: Versions) -> PackageRecord {
        PackageRecord {
            name: name.into(),
            role: Role::Explicit,
            versions,
            size: None,
        }
    }

    fn revision(name: &str, base: &str, old: &str, new: &str) -> PackageRecord {
        record(
            name,
            Versions::Revision {
                base: base.into(),
                old: old.into(),
                new: new.into(),
            },
        )
    }

    fn plain(name: &str, old: &str, new: Option<&str>) -> PackageRecord {
        record(
            name,
            Versions::Plain {
                old: old.into(),
                new: new.map(str::to_string),
            },
        )
    }

    #[test]
    fn headers_set_the_minimum() {
        let widths = ColumnWidths::compute(&[plain("a", "1", None)], &Locale::default(), 2);
        assert_eq!(widths.name(), "Package".len());
        assert_eq!(widths.version_old(), "Version".len());
        assert_eq!(widths.version_new(), 0);
        assert!(!widths.has_targets());
        assert_eq!(widths.version_all(), widths.version_block());
    }

    #[test]
    fn long_plain_versions_stretch_the_static_column() {
        let records = [
            revision("short", "1.2.0", "1", "2"),
            plain("long", "1:2.30.2-1ubuntu1.4", Some("1:2.30.2-1ubuntu1.5")),
        ];
        let widths = ColumnWidths::compute(&records, &Locale::default(), 2);
        // plain_old (19) > version_old (7) + static (5)
        assert_eq!(widths.version_static(), 19 - 7);
        assert_eq!(widths.version_block(), 19);
    }

    #[test]
    fn revision_rows_dominate_and_get_a_gap() {
        let records = [
            revision("a", "3.8.0.2019", "2ubuntu12", "5"),
            plain("b", "1.0", None),
        ];
        let widths = ColumnWidths::compute(&records, &Locale::default(), 2);
        assert_eq!(widths.version_old(), 9);
        assert_eq!(widths.version_static(), 10 + 2);
        assert_eq!(widths.version_new(), 1);
        assert_eq!(widths.version_all(), 12 + 9 + ARROW.len() + 1);
    }

    #[test]
    fn size_parts_ignore_absent_fields() {
        let mut with_size = plain("a", "1.0", None);
        with_size.size = Some(SizeDelta {
            integer: "+1,234".into(),
            fraction: None,
            unit: "kB".into(),
        });
        let mut with_fraction = plain("b", "1.0", None);
        with_fraction.size = Some(SizeDelta {
            integer: "-5".into(),
            fraction: Some(".25".into()),
            unit: "MB".into(),
        });
        let records = [with_size, with_fraction, plain("c", "1.0", None)];
        let widths = ColumnWidths::compute(&records, &Locale::default(), 2);
        assert_eq!(widths.size_integer(), 6);
        assert_eq!(widths.size_fraction(), 3);
        assert_eq!(widths.size_unit(), 2);
    }

    #[test]
    fn copies_keep_the_measured_widths() {
        let records = [revision("a", "2.4", "1", "2"), plain("bb", "9.9.9", Some("10.0"))];
        let widths = ColumnWidths::compute(&records, &Locale::default(), 2);
        let copy = widths;
        assert_eq!(copy, widths);
        assert_eq!(
            copy.version_block(),
            copy.version_static() + copy.version_old()
        );
        assert_eq!(copy.version_new(), 4);
        assert!(copy.has_targets());
    }

    #[test]
    fn empty_new_revision_still_counts_as_target() {
        let widths =
            ColumnWidths::compute(&[revision("a", "1.0", "", "")], &Locale::default(), 2);
        assert!(widths.has_targets());
        assert_eq!(widths.version_new(), 0);
        assert_eq!(widths.version_all(), widths.version_block() + ARROW.len());
    }
}
