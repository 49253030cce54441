use std::collections::BTreeSet;

use crate::foundation::error::{BadgeError, BadgeResult};

const GOOGLE_CSS2: &str = "https://fonts.googleapis.com/css2";

/// Families served by default, with the weight axis to request (`None` for single-weight
/// families).
const BUILTIN: &[(&str, Option<&str>)] = &[
    ("Roboto", Some("400;700")),
    ("Open Sans", Some("400;700")),
    ("Lato", Some("400;700")),
    ("Montserrat", Some("400;700")),
    ("Oswald", Some("400;700")),
    ("Poppins", Some("400;700")),
    ("Raleway", Some("400;700")),
    ("Inter", Some("400;700")),
    ("Nunito", Some("400;700")),
    ("Merriweather", Some("400;700")),
    ("Playfair Display", Some("400;700")),
    ("Dancing Script", Some("400;700")),
    ("Bebas Neue", None),
    ("Pacifico", None),
    ("Lobster", None),
    ("Permanent Marker", None),
];

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A font family and the stylesheet that declares its `@font-face` rules.
pub struct FontEntry {
    pub family: String,
    pub stylesheet_url: String,
}

impl FontEntry {
    pub fn new(family: impl Into<String>, stylesheet_url: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            stylesheet_url: stylesheet_url.into(),
        }
    }

    /// Google Fonts css2 entry for `family`, optionally restricted to `weights` (`"400;700"`).
    pub fn google(family: &str, weights: Option<&str>) -> Self {
        let name = family.trim().replace(' ', "+");
        let url = match weights {
            Some(w) => format!("{GOOGLE_CSS2}?family={name}:wght@{w}&display=swap"),
            None => format!("{GOOGLE_CSS2}?family={name}&display=swap"),
        };
        Self::new(family.trim(), url)
    }

    pub fn validate(&self) -> BadgeResult<()> {
        if self.family.trim().is_empty() {
            return Err(BadgeError::validation("font entry family must be non-empty"));
        }
        if !self.stylesheet_url.contains("://") {
            return Err(BadgeError::validation(format!(
                "font entry '{}' needs an absolute stylesheet url",
                self.family
            )));
        }
        Ok(())
    }
}

/// Family name lookup for stylesheet URLs.
#[derive(Clone, Debug, PartialEq)]
pub struct FontCatalog {
    entries: Vec<FontEntry>,
}

impl Default for FontCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FontCatalog {
    pub fn new(entries: Vec<FontEntry>) -> Self {
        Self { entries }
    }

    /// The default Google Fonts set.
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN
                .iter()
                .map(|(family, weights)| FontEntry::google(family, *weights))
                .collect(),
        )
    }

    /// Built-in catalog with `extra` entries taking precedence.
    pub fn with_extra(extra: &[FontEntry]) -> Self {
        let mut entries = extra.to_vec();
        entries.extend(Self::builtin().entries);
        Self::new(entries)
    }

    pub fn entries(&self) -> &[FontEntry] {
        &self.entries
    }

    /// Case-insensitive lookup. Accepts CSS `font-family` values: quotes are stripped and only
    /// the first family of a fallback list is considered.
    pub fn lookup(&self, family: &str) -> Option<&FontEntry> {
        let wanted = normalize_family(family);
        if wanted.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|e| e.family.eq_ignore_ascii_case(&wanted))
    }

    /// `@import` rules for every catalog family in `families`, one per distinct stylesheet.
    pub fn import_css<'a>(&self, families: impl IntoIterator<Item = &'a str>) -> String {
        let mut seen = BTreeSet::new();
        let mut css = String::new();
        for family in families {
            let Some(entry) = self.lookup(family) else {
                tracing::debug!(family, "font family not in catalog, left to the renderer");
                continue;
            };
            if seen.insert(entry.stylesheet_url.as_str()) {
                css.push_str(&format!("@import url('{}');\n", entry.stylesheet_url));
            }
        }
        css
    }
}

/// First family of a CSS `font-family` list, unquoted and trimmed.
pub fn normalize_family(raw: &str) -> String {
    raw.split(',')
        .next()
        .unwrap_or("")
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_string()
}

#[cfg(test)]
#[path = "../../tests/unit/fonts/catalog.rs"]
mod tests;
