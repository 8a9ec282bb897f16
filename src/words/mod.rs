//! Word bank: bilingual word pairs grouped into categories
//!
//! Embeds the default Arabic/English word bank at build time.
//! An external file in the same format can replace it at startup.

use once_cell::sync::Lazy;
use std::path::Path;
use thiserror::Error;

/// Embedded word bank, parsed on first use
static WORD_BANK_DATA: &str = include_str!("../../data/word_bank.txt");

static BUILTIN: Lazy<Catalog> = Lazy::new(|| match Catalog::parse(WORD_BANK_DATA) {
    Ok(catalog) => catalog,
    Err(e) => {
        tracing::error!("embedded word bank is malformed: {}", e);
        Catalog::default()
    }
});

/// Id spacing between categories. Leaves room for a category to grow
/// without colliding with the next one.
pub const CATEGORY_ID_STRIDE: u32 = 250;

/// Section header that opens the uncategorized general list
const GENERAL_SECTION: &str = "*";

/// Word difficulty level (1 easy, 2 medium, 3 hard)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    One = 1,
    Two = 2,
    Three = 3,
}

impl Level {
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Level::One),
            2 => Some(Level::Two),
            3 => Some(Level::Three),
            _ => None,
        }
    }
}

/// One Arabic/English pair. Immutable once the catalog is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordPair {
    pub id: u32,
    /// Arabic text (left column)
    pub source_text: String,
    /// English text (right column)
    pub target_text: String,
    pub level: Level,
}

/// A named group of word pairs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub words: Vec<WordPair>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read word bank: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: expected `arabic<TAB>english<TAB>level`")]
    MalformedEntry { line: usize },
    #[error("line {line}: invalid level `{value}` (expected 1, 2 or 3)")]
    InvalidLevel { line: usize, value: String },
    #[error("line {line}: entry appears before any [section] header")]
    EntryOutsideSection { line: usize },
    #[error("line {line}: category `{name}` is already defined")]
    DuplicateCategory { name: String, line: usize },
    #[error("category `{name}` has {count} words, the limit is {limit}")]
    CategoryTooLarge {
        name: String,
        count: usize,
        limit: u32,
    },
}

/// The full word catalog: categories in file order plus a general list
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    categories: Vec<Category>,
    general: Vec<WordPair>,
}

/// Raw section before ids are assigned
struct Section {
    name: String,
    entries: Vec<(String, String, Level)>,
}

impl Catalog {
    /// The embedded default catalog
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    /// Load a catalog from a word bank file
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse word bank text.
    ///
    /// Category *i* gets ids from `1 + 250 * i`; the general list takes the
    /// offset after the last category.
    pub fn parse(text: &str) -> Result<Self, CatalogError> {
        let mut sections: Vec<Section> = Vec::new();
        let mut general: Option<Section> = None;
        // true while entries go to the general list
        let mut in_general = false;

        // editors on Windows like to prepend a byte order mark
        let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);

        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                let name = name.trim();
                if name == GENERAL_SECTION {
                    in_general = true;
                    general.get_or_insert_with(|| Section {
                        name: String::new(),
                        entries: Vec::new(),
                    });
                } else {
                    in_general = false;
                    if sections.iter().any(|s| s.name == name) {
                        return Err(CatalogError::DuplicateCategory {
                            name: name.to_string(),
                            line: line_no,
                        });
                    }
                    sections.push(Section {
                        name: name.to_string(),
                        entries: Vec::new(),
                    });
                }
                continue;
            }

            let entry = parse_entry(raw, line_no)?;
            let section = if in_general {
                general.as_mut()
            } else {
                sections.last_mut()
            };
            match section {
                Some(section) => section.entries.push(entry),
                None => return Err(CatalogError::EntryOutsideSection { line: line_no }),
            }
        }

        let mut categories = Vec::with_capacity(sections.len());
        for (i, section) in sections.into_iter().enumerate() {
            let words = assign_ids(&section, i as u32)?;
            categories.push(Category {
                name: section.name,
                words,
            });
        }

        let general = match general {
            Some(section) => assign_ids(&section, categories.len() as u32)?,
            None => Vec::new(),
        };

        Ok(Catalog {
            categories,
            general,
        })
    }

    /// Categories in catalog order
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a category by name
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// The uncategorized general list
    #[cfg(test)]
    pub fn general(&self) -> &[WordPair] {
        &self.general
    }

    /// Every word: all categories followed by the general list
    pub fn all_words(&self) -> Vec<WordPair> {
        self.categories
            .iter()
            .flat_map(|c| c.words.iter())
            .chain(self.general.iter())
            .cloned()
            .collect()
    }

    /// Total number of words in the catalog
    pub fn word_count(&self) -> usize {
        self.categories.iter().map(|c| c.words.len()).sum::<usize>() + self.general.len()
    }
}

fn parse_entry(raw: &str, line: usize) -> Result<(String, String, Level), CatalogError> {
    let mut fields = raw.split('\t').map(str::trim);
    let (source, target, level) = match (fields.next(), fields.next(), fields.next(), fields.next()) {
        (Some(s), Some(t), Some(l), None) if !s.is_empty() && !t.is_empty() => (s, t, l),
        _ => return Err(CatalogError::MalformedEntry { line }),
    };

    let level = level
        .parse::<u8>()
        .ok()
        .and_then(Level::from_number)
        .ok_or_else(|| CatalogError::InvalidLevel {
            line,
            value: level.to_string(),
        })?;

    Ok((source.to_string(), target.to_string(), level))
}

fn assign_ids(section: &Section, slot: u32) -> Result<Vec<WordPair>, CatalogError> {
    if section.entries.len() > CATEGORY_ID_STRIDE as usize {
        return Err(CatalogError::CategoryTooLarge {
            name: section.name.clone(),
            count: section.entries.len(),
            limit: CATEGORY_ID_STRIDE,
        });
    }

    let start = 1 + slot * CATEGORY_ID_STRIDE;
    Ok(section
        .entries
        .iter()
        .enumerate()
        .map(|(i, (source, target, level))| WordPair {
            id: start + i as u32,
            source_text: source.clone(),
            target_text: target.clone(),
            level: *level,
        })
        .collect())
}
