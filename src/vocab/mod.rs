use include_dir::{include_dir, Dir};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::path::Path;

static VOCAB_DIR: Dir = include_dir!("src/vocab");

#[derive(Deserialize)]
struct CategoryFile {
    name: String,
    words: Vec<String>,
}

/// Category name to word list, as supplied by a vocabulary source.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VocabSet {
    categories: BTreeMap<String, Vec<String>>,
}

impl VocabSet {
    /// Built-in vocabulary embedded at compile time.
    pub fn builtin() -> Self {
        let mut categories = BTreeMap::new();
        for file in VOCAB_DIR.files() {
            if file.path().extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(text) = file.contents_utf8() else {
                continue;
            };
            if let Ok(cat) = serde_json::from_str::<CategoryFile>(text) {
                categories.insert(cat.name, cat.words);
            }
        }
        Self { categories }
    }

    /// Load a user vocabulary file: a JSON object mapping category names to
    /// word lists.
    pub fn from_path(path: &Path) -> Result<Self, Box<dyn Error>> {
        let text = std::fs::read_to_string(path)?;
        let categories: BTreeMap<String, Vec<String>> = serde_json::from_str(&text)?;
        Ok(Self { categories })
    }

    /// User file if it loads, otherwise the built-in set. A missing or
    /// malformed file degrades silently rather than failing the session.
    pub fn load_or_builtin(path: Option<&Path>) -> Self {
        path.and_then(|p| Self::from_path(p).ok())
            .unwrap_or_else(Self::builtin)
    }

    /// Word list for a category. Unknown categories resolve to an empty
    /// list so spawning quietly no-ops.
    pub fn words(&self, category: &str) -> &[String] {
        self.categories.get(category).map_or(&[], Vec::as_slice)
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }
}
