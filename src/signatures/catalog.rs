//! Signature catalog loading and queries.
//!
//! The catalog is an ordered table: definition order is the output order of the
//! detector. The built-in table ships embedded in the binary; operators can load an
//! alternative JSON table of the same shape from disk.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use log::{debug, info};
use regex::RegexBuilder;

use super::models::{Category, RawSignature, SignatureEntry};
use crate::error_handling::SignatureError;

/// Built-in signature table
const BUILTIN_CATALOG_JSON: &str = include_str!("catalog.json");

static BUILTIN_CATALOG: LazyLock<SignatureCatalog> = LazyLock::new(|| {
    SignatureCatalog::from_json(BUILTIN_CATALOG_JSON).unwrap_or_else(|e| {
        panic!(
            "Failed to load built-in signature catalog: {}. This is a programming error.",
            e
        )
    })
});

/// Ordered, immutable id → signature table.
#[derive(Debug, Clone)]
pub struct SignatureCatalog {
    entries: Vec<SignatureEntry>,
    index: HashMap<String, usize>,
}

impl SignatureCatalog {
    /// Returns the built-in catalog, compiled on first use.
    pub fn builtin() -> &'static SignatureCatalog {
        &BUILTIN_CATALOG
    }

    /// Builds a catalog from a JSON array of signatures.
    ///
    /// # Errors
    ///
    /// Returns a `SignatureError` if the JSON is malformed, an id is empty or
    /// duplicated, or a pattern does not compile.
    pub fn from_json(json: &str) -> Result<Self, SignatureError> {
        let raw: Vec<RawSignature> = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Loads a catalog from a JSON file on disk.
    ///
    /// # Errors
    ///
    /// Returns `SignatureError::Io` if the file cannot be read, otherwise the same
    /// errors as [`SignatureCatalog::from_json`].
    pub fn from_path(path: &Path) -> Result<Self, SignatureError> {
        let json = std::fs::read_to_string(path).map_err(|source| SignatureError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        info!(
            "Loaded {} signatures from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    fn from_raw(raw: Vec<RawSignature>) -> Result<Self, SignatureError> {
        let mut entries = Vec::with_capacity(raw.len());
        let mut index = HashMap::with_capacity(raw.len());

        for (position, signature) in raw.into_iter().enumerate() {
            if signature.id.trim().is_empty() || signature.name.trim().is_empty() {
                return Err(SignatureError::EmptyField(position));
            }
            if index.contains_key(&signature.id) {
                return Err(SignatureError::DuplicateId(signature.id));
            }

            let pattern = RegexBuilder::new(&signature.pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| SignatureError::InvalidPattern {
                    id: signature.id.clone(),
                    source,
                })?;

            index.insert(signature.id.clone(), entries.len());
            entries.push(SignatureEntry {
                id: signature.id,
                name: signature.name,
                category: signature.category,
                jurisdiction: signature.jurisdiction,
                requires_cross_border: signature.requires_cross_border,
                pattern,
            });
        }

        debug!("Compiled {} signatures", entries.len());
        Ok(Self { entries, index })
    }

    /// All entries, in definition order.
    pub fn entries(&self) -> &[SignatureEntry] {
        &self.entries
    }

    /// Entries of one category, in definition order.
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &SignatureEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.category == category)
    }

    /// Looks up an entry by id. Unknown ids yield `None`.
    pub fn get(&self, id: &str) -> Option<&SignatureEntry> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signatures::Jurisdiction;
    use std::io::Write;
    use strum::IntoEnumIterator;

    #[test]
    fn test_builtin_catalog_covers_every_category() {
        let catalog = SignatureCatalog::builtin();
        for category in Category::iter() {
            assert!(
                catalog.by_category(category).count() > 0,
                "no signatures for {}",
                category
            );
        }
    }

    #[test]
    fn test_builtin_catalog_known_entries() {
        let catalog = SignatureCatalog::builtin();

        let jivo = catalog.get("jivo").expect("jivo should exist");
        assert_eq!(jivo.category, Category::Chat);
        assert_eq!(jivo.jurisdiction, Jurisdiction::RU);
        assert!(!jivo.requires_cross_border);

        let ga = catalog.get("googleAnalytics").expect("GA should exist");
        assert_eq!(ga.category, Category::Analytics);
        assert_eq!(ga.jurisdiction, Jurisdiction::US);
        assert!(ga.requires_cross_border);
    }

    #[test]
    fn test_get_unknown_id_is_none() {
        assert!(SignatureCatalog::builtin().get("doesNotExist").is_none());
    }

    #[test]
    fn test_by_category_preserves_definition_order() {
        let catalog = SignatureCatalog::builtin();
        let positions: Vec<usize> = catalog
            .by_category(Category::Chat)
            .map(|entry| {
                catalog
                    .entries()
                    .iter()
                    .position(|e| e.id == entry.id)
                    .expect("entry is in catalog")
            })
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_patterns_are_case_insensitive() {
        let jivo = SignatureCatalog::builtin().get("jivo").expect("jivo");
        assert!(jivo.matches("<script src=\"//CODE.JIVOSITE.COM/widget/abc\"></script>"));
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let json = r#"[
            {"id":"a","name":"A","category":"chat","jurisdiction":"RU","requiresCrossBorder":false,"pattern":"a\\.ru"},
            {"id":"a","name":"A2","category":"analytics","jurisdiction":"US","requiresCrossBorder":true,"pattern":"a\\.com"}
        ]"#;
        assert!(matches!(
            SignatureCatalog::from_json(json),
            Err(SignatureError::DuplicateId(id)) if id == "a"
        ));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let json = r#"[{"id":"broken","name":"Broken","category":"chat","jurisdiction":"EU","requiresCrossBorder":true,"pattern":"(unclosed"}]"#;
        assert!(matches!(
            SignatureCatalog::from_json(json),
            Err(SignatureError::InvalidPattern { id, .. }) if id == "broken"
        ));
    }

    #[test]
    fn test_empty_id_is_rejected() {
        let json = r#"[{"id":" ","name":"Blank","category":"chat","jurisdiction":"EU","requiresCrossBorder":true,"pattern":"x"}]"#;
        assert!(matches!(
            SignatureCatalog::from_json(json),
            Err(SignatureError::EmptyField(0))
        ));
    }

    #[test]
    fn test_from_path_loads_custom_table() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"[{{"id":"custom","name":"Custom Chat","category":"chat","jurisdiction":"EU","requiresCrossBorder":true,"pattern":"custom-chat\\.example"}}]"#
        )
        .expect("write");

        let catalog = SignatureCatalog::from_path(file.path()).expect("load");
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("custom").is_some());
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = SignatureCatalog::from_path(Path::new("/nonexistent/signatures.json"));
        assert!(matches!(result, Err(SignatureError::Io { .. })));
    }
}
