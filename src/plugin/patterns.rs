//! Filename patterns selecting which patched files are scanned
//!
//! A pattern is an include regex with an optional exclusion. The `regex` crate has
//! no look-behind, so "no `marker` anywhere before `anchor`" is checked by finding
//! the first `anchor` match and looking for `marker` ahead of it.

use regex::Regex;
use strum_macros::{Display, EnumIter, EnumString};

/// Rejects a filename when `marker` occurs in the text before the first `anchor`
/// match, leaving out the character right before the anchor
#[derive(Debug, Clone)]
struct Exclusion {
    marker: Regex,
    anchor: Regex,
}

impl Exclusion {
    fn rejects(&self, filename: &str) -> bool {
        let Some(anchor) = self.anchor.find(filename) else {
            return false;
        };
        self.marker
            .find_iter(filename)
            .any(|marker| marker.end() < anchor.start())
    }
}

/// Compiled filename filter
#[derive(Debug, Clone)]
pub struct FilenamePattern {
    include: Regex,
    exclude: Option<Exclusion>,
}

impl FilenamePattern {
    /// Match filenames containing `pattern` (unanchored search)
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            include: Regex::new(pattern)?,
            exclude: None,
        })
    }

    /// Match filenames matching `include` unless `marker` occurs before the first
    /// `anchor` match, not counting a `marker` ending right at the anchor
    pub fn with_exclusion(
        include: &str,
        marker: &str,
        anchor: &str,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            include: Regex::new(include)?,
            exclude: Some(Exclusion {
                marker: Regex::new(marker)?,
                anchor: Regex::new(anchor)?,
            }),
        })
    }

    pub fn from_preset(preset: FilenamePreset) -> Result<Self, regex::Error> {
        match preset.exclusion() {
            Some((marker, anchor)) => Self::with_exclusion(preset.include(), marker, anchor),
            None => Self::new(preset.include()),
        }
    }

    pub fn is_match(&self, filename: &str) -> bool {
        self.include.is_match(filename)
            && !self
                .exclude
                .as_ref()
                .is_some_and(|exclude| exclude.rejects(filename))
    }

    /// Printable form, `include` or `include !marker<anchor`
    pub fn describe(&self) -> String {
        match &self.exclude {
            Some(exclude) => format!(
                "{} !{}<{}",
                self.include.as_str(),
                exclude.marker.as_str(),
                exclude.anchor.as_str()
            ),
            None => self.include.as_str().to_string(),
        }
    }
}

/// Source file families with predefined patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum FilenamePreset {
    /// Apex classes: `.cls` and `.apex`
    ClsSource,
    /// Aura UI components, skipping documentation and rich-text output trees
    AuraCmpUiSource,
    /// Visualforce `.apexp` pages and JavaScript, skipping dev tooling
    ApexpOrJsSource,
    /// JavaScript under a `components` directory, skipping dev tooling
    AuraJsSource,
}

impl FilenamePreset {
    pub fn include(&self) -> &'static str {
        match self {
            FilenamePreset::ClsSource => r"\.(cls|apex)$",
            FilenamePreset::AuraCmpUiSource => r"\.cmp$",
            FilenamePreset::ApexpOrJsSource => r"\.(apexp|js)$",
            FilenamePreset::AuraJsSource => r"/components/.*\.js$",
        }
    }

    /// `(marker, anchor)` of the preset's exclusion
    pub fn exclusion(&self) -> Option<(&'static str, &'static str)> {
        match self {
            FilenamePreset::ClsSource => None,
            FilenamePreset::AuraCmpUiSource => Some(("auradocs|outputRichText", r"\.cmp$")),
            FilenamePreset::ApexpOrJsSource => Some(("aura-devtools", r"\.(apexp|js)$")),
            FilenamePreset::AuraJsSource => Some(("aura-devtools", "/components/")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    fn preset(preset: FilenamePreset) -> FilenamePattern {
        FilenamePattern::from_preset(preset).unwrap()
    }

    #[test]
    fn test_every_preset_compiles() {
        for p in FilenamePreset::iter() {
            assert!(FilenamePattern::from_preset(p).is_ok(), "{} failed", p);
        }
    }

    #[test]
    fn test_preset_names() {
        assert_eq!(FilenamePreset::ClsSource.to_string(), "cls-source");
        assert_eq!(
            FilenamePreset::from_str("aura-js-source").unwrap(),
            FilenamePreset::AuraJsSource
        );
    }

    #[test]
    fn test_cls_source() {
        let pattern = preset(FilenamePreset::ClsSource);
        assert!(pattern.is_match("force-app/classes/Foo.cls"));
        assert!(pattern.is_match("scripts/anon.apex"));
        assert!(!pattern.is_match("Foo.cls-meta.xml"));
        assert!(!pattern.is_match("Foo.class"));
    }

    #[test]
    fn test_aura_cmp_excludes_docs_and_rich_text() {
        let pattern = preset(FilenamePreset::AuraCmpUiSource);
        assert!(pattern.is_match("aura/components/ui/button.cmp"));
        assert!(!pattern.is_match("aura/auradocs/ui/button.cmp"));
        assert!(!pattern.is_match("aura/outputRichText/outputRichText.cmp"));
        // the excluded word right before the extension is still accepted
        assert!(pattern.is_match("ui/auradocs.cmp"));
        assert!(!pattern.is_match("ui/button.cmp.bak"));
    }

    #[test]
    fn test_apexp_or_js_excludes_devtools() {
        let pattern = preset(FilenamePreset::ApexpOrJsSource);
        assert!(pattern.is_match("pages/Home.apexp"));
        assert!(pattern.is_match("static/app.js"));
        assert!(!pattern.is_match("tools/aura-devtools/panel.js"));
        assert!(!pattern.is_match("static/app.json"));
    }

    #[test]
    fn test_aura_js_needs_components_segment() {
        let pattern = preset(FilenamePreset::AuraJsSource);
        assert!(pattern.is_match("aura/components/ui/buttonController.js"));
        assert!(!pattern.is_match("aura/lib/helper.js"));
        assert!(!pattern.is_match("aura-devtools/src/components/panel.js"));
    }

    #[test]
    fn test_aura_js_only_checks_before_first_components() {
        let pattern = preset(FilenamePreset::AuraJsSource);
        assert!(pattern.is_match("a/components/aura-devtools/b/components/x.js"));
        // tooling name directly before the segment is not excluded
        assert!(pattern.is_match("x/aura-devtools/components/a.js"));
        assert!(!pattern.is_match("x/aura-devtools/y/components/a.js"));
    }

    #[test]
    fn test_custom_pattern_and_describe() {
        let pattern = FilenamePattern::new(r"\.trigger$").unwrap();
        assert!(pattern.is_match("triggers/Account.trigger"));
        assert_eq!(pattern.describe(), r"\.trigger$");

        let excluded = FilenamePattern::with_exclusion(r"\.js$", "test/", r"\.js$").unwrap();
        assert!(!excluded.is_match("test/a.js"));
        assert!(excluded.is_match("src/a.js"));
        assert_eq!(excluded.describe(), r"\.js$ !test/<\.js$");

        assert!(FilenamePattern::new("(").is_err());
    }
}
