/*============================================================
  Synavera Project: Apti
  Module: apti::locale
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Supply the translated labels, section titles, questions,
    and number separators used when rendering aptitude plans.

  Security / Safety Notes:
    Reads the LANG environment variable only.

  Dependencies:
    None beyond std.

  Operational Scope:
    Consumed by the plan parser (separators) and the renderer
    (labels); never produced by them.

  Revision History:
    2025-11-12 COD  Introduced built-in English/French tables.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Deterministic fallback to English
    - Static tables, no runtime file lookups
============================================================*/

/// Language tables shipped with Apti.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    French,
}

impl Language {
    /// Resolve a language from a `LANG`-style value such as `fr_FR.UTF-8`.
    pub fn from_lang(value: &str) -> Self {
        match value.split(['_', '.']).next().unwrap_or_default() {
            "fr" => Language::French,
            _ => Language::English,
        }
    }

    /// Resolve the language of the current process environment.
    pub fn from_env() -> Self {
        std::env::var("LANG")
            .map(|value| Self::from_lang(&value))
            .unwrap_or(Language::English)
    }
}

/// Label provider consumed by the parser and the renderer.
#[derive(Debug, Clone)]
pub struct Locale {
    pub header_package: &'static str,
    pub header_version: &'static str,
    pub header_size: &'static str,
    pub thousands_separator: &'static str,
    pub decimal_separator: &'static str,
    pub installing: &'static str,
    pub removing: &'static str,
    pub purging: &'static str,
    pub upgrading: &'static str,
    pub new_revisions: &'static str,
    pub new_versions: &'static str,
    pub installing_for_dependencies: &'static str,
    pub removing_unused_dependencies: &'static str,
    pub question_install: &'static str,
    pub question_remove: &'static str,
    pub question_purge: &'static str,
    pub question_upgrade: &'static str,
    pub nothing_to_do: &'static str,
    pub system_up_to_date: &'static str,
    pub package_not_installed: &'static str,
    pub packages_not_found: &'static str,
    pub packages_installed: &'static str,
    pub packages_not_installed: &'static str,
    pub using: &'static str,
    pub stat_total_installed: &'static str,
    pub stat_explicitly_installed: &'static str,
    pub stat_cache_size: &'static str,
    pub upgrade_deprecated: &'static str,
}

const ENGLISH: Locale = Locale {
    header_package: "Package",
    header_version: "Version",
    header_size: "Size",
    thousands_separator: ",",
    decimal_separator: ".",
    installing: "Installing",
    removing: "Removing",
    purging: "Purging",
    upgrading: "Upgrading",
    new_revisions: "(new revisions)",
    new_versions: "(new versions)",
    installing_for_dependencies: "Installing for dependencies",
    removing_unused_dependencies: "Removing unused dependencies",
    question_install: "Do you want to install these packages?",
    question_remove: "Do you want to remove these packages?",
    question_purge: "Do you want to purge these packages?",
    question_upgrade: "Do you want to upgrade these packages?",
    nothing_to_do: "Nothing to do.",
    system_up_to_date: "Your system is up to date.",
    package_not_installed: "Package not installed.",
    packages_not_found: "Package(s) not found:",
    packages_installed: "Package(s) already installed.",
    packages_not_installed: "Package(s) not installed.",
    using: "Using:",
    stat_total_installed: "Total installed packages:",
    stat_explicitly_installed: "Explicitly installed packages:",
    stat_cache_size: "Space used by packages in cache:",
    upgrade_deprecated: "Warning: upgrade is deprecated, use safe-upgrade.",
};

const FRENCH: Locale = Locale {
    header_package: "Paquet",
    header_version: "Version",
    header_size: "Taille",
    thousands_separator: " ",
    decimal_separator: ",",
    installing: "Installation",
    removing: "Suppression",
    purging: "Purge",
    upgrading: "Mise à jour",
    new_revisions: "(nouvelles révisions)",
    new_versions: "(nouvelles versions)",
    installing_for_dependencies: "Installation pour dépendances",
    removing_unused_dependencies: "Suppression des dépendances inutilisées",
    question_install: "Voulez-vous installer ces paquets ?",
    question_remove: "Voulez-vous supprimer ces paquets ?",
    question_purge: "Voulez-vous purger ces paquets ?",
    question_upgrade: "Voulez-vous mettre à jour ces paquets ?",
    nothing_to_do: "Rien à faire.",
    system_up_to_date: "Votre système est à jour.",
    package_not_installed: "Paquet non installé.",
    packages_not_found: "Paquet(s) introuvable(s) :",
    packages_installed: "Paquet(s) déjà installé(s).",
    packages_not_installed: "Paquet(s) non installé(s).",
    using: "Utilise :",
    stat_total_installed: "Nombre total de paquets installés :",
    stat_explicitly_installed: "Paquets installés explicitement :",
    stat_cache_size: "Espace utilisé par les paquets en cache :",
    upgrade_deprecated: "Attention : upgrade est obsolète, utilisez safe-upgrade.",
};

impl Locale {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::English => ENGLISH,
            Language::French => FRENCH,
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        ENGLISH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lang_prefix_selects_table() {
        assert_eq!(Language::from_lang("fr_FR.UTF-8"), Language::French);
        assert_eq!(Language::from_lang("fr"), Language::French);
        assert_eq!(Language::from_lang("de_DE.UTF-8"), Language::English);
        assert_eq!(Language::from_lang(""), Language::English);
    }

    #[test]
    fn french_uses_comma_decimals() {
        let locale = Locale::for_language(Language::French);
        assert_eq!(locale.decimal_separator, ",");
        assert_eq!(locale.thousands_separator, " ");
        assert_eq!(Locale::default().header_package, "Package");
    }
}
