use crate::raga::janya::janya_ragas;
use crate::raga::melakarta::{generate_melakartas, melakarta_number};
use crate::raga::raga::{Raga, RagaError};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while building, loading or saving a raga catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Melakarta generation produced an inconsistent set.
    #[error("Catalog consistency error: {0}")]
    Consistency(String),

    /// A raga with the same name (ignoring case) is already registered.
    #[error("Duplicate raga name: {0}")]
    DuplicateName(String),

    /// A raga definition is invalid.
    #[error("Invalid raga: {0}")]
    Raga(#[from] RagaError),

    /// Catalog JSON could not be read or written.
    #[error("Catalog serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Catalog file could not be read or written.
    #[error("Catalog IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An immutable, ordered set of uniquely named ragas.
///
/// Built once through [`RagaCatalogBuilder`] and read-only afterwards, so one
/// catalog can be shared across threads (by reference or `Arc`) without locks.
#[derive(Debug, Clone, PartialEq)]
pub struct RagaCatalog {
    ragas: Vec<Raga>,
    by_name: HashMap<String, usize>,
}

/// Collects ragas for a [`RagaCatalog`], rejecting duplicate names.
#[derive(Debug, Default)]
pub struct RagaCatalogBuilder {
    ragas: Vec<Raga>,
    by_name: HashMap<String, usize>,
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl RagaCatalogBuilder {
    /// Empty builder; same as [`RagaCatalog::builder`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the 72 generated Melakarta ragas.
    ///
    /// # Errors
    /// * `CatalogError::Consistency` - If generation fails its internal checks
    /// * `CatalogError::DuplicateName` - If a Melakarta name is already registered
    pub fn with_melakartas(mut self) -> Result<Self, CatalogError> {
        for raga in generate_melakartas()? {
            self.register(raga)?;
        }
        Ok(self)
    }

    /// Adds the bundled janya ragas (Mohanam, Hamsadhwani, ...).
    ///
    /// # Errors
    /// * `CatalogError::DuplicateName` - If a janya name is already registered
    pub fn with_janyas(mut self) -> Result<Self, CatalogError> {
        for raga in janya_ragas()? {
            self.register(raga)?;
        }
        Ok(self)
    }

    /// Registers one raga.
    ///
    /// # Errors
    /// * `CatalogError::DuplicateName` - If the name is already taken (case-insensitive)
    pub fn register(&mut self, raga: Raga) -> Result<&mut Self, CatalogError> {
        let key = name_key(raga.name());
        if self.by_name.contains_key(&key) {
            return Err(CatalogError::DuplicateName(raga.name().to_string()));
        }
        self.by_name.insert(key, self.ragas.len());
        self.ragas.push(raga);
        Ok(self)
    }

    /// Builder-style variant of [`RagaCatalogBuilder::register`].
    pub fn with(mut self, raga: Raga) -> Result<Self, CatalogError> {
        self.register(raga)?;
        Ok(self)
    }

    /// Freezes the collected ragas into a catalog.
    pub fn build(self) -> RagaCatalog {
        debug!(ragas = self.ragas.len(), "raga catalog built");
        RagaCatalog {
            ragas: self.ragas,
            by_name: self.by_name,
        }
    }
}

impl RagaCatalog {
    /// Empty builder.
    pub fn builder() -> RagaCatalogBuilder {
        RagaCatalogBuilder::new()
    }

    /// The 72 Melakarta ragas and nothing else.
    pub fn melakarta() -> Result<RagaCatalog, CatalogError> {
        Ok(RagaCatalog::builder().with_melakartas()?.build())
    }

    /// Melakartas plus the bundled janya ragas.
    pub fn standard() -> Result<RagaCatalog, CatalogError> {
        Ok(RagaCatalog::builder().with_melakartas()?.with_janyas()?.build())
    }

    /// Number of registered ragas.
    pub fn len(&self) -> usize {
        self.ragas.len()
    }

    /// True when no raga has been registered.
    pub fn is_empty(&self) -> bool {
        self.ragas.is_empty()
    }

    /// Ragas in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Raga> {
        self.ragas.iter()
    }

    /// Registered ragas as a slice, in registration order.
    pub fn ragas(&self) -> &[Raga] {
        &self.ragas
    }

    /// Finds a raga by name, ignoring case and surrounding whitespace.
    ///
    /// A registered name always wins. Otherwise a Melakarta alias ("Kalyani",
    /// "Shankarabharanam", ...) resolves to the catalog entry carrying that
    /// Melakarta number.
    ///
    /// # Examples
    /// ```
    /// use raga_detect::raga::RagaCatalog;
    /// let catalog = RagaCatalog::melakarta().unwrap();
    /// assert_eq!(catalog.get("kalyani").unwrap().name(), "Mechakalyani");
    /// ```
    pub fn get(&self, name: &str) -> Option<&Raga> {
        if let Some(&i) = self.by_name.get(&name_key(name)) {
            return Some(&self.ragas[i]);
        }
        let number = melakarta_number(name)?;
        self.ragas.iter().find(|raga| raga.melakarta() == Some(number))
    }

    /// Serializes the catalog as a JSON array of `{name, arohana, avarohana}` records.
    pub fn to_json(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(&self.ragas)?)
    }

    /// Rebuilds a catalog from [`RagaCatalog::to_json`] output, re-validating every raga.
    ///
    /// # Errors
    /// * `CatalogError::Json` - If the text is not a valid raga list
    /// * `CatalogError::DuplicateName` - If two records share a name
    pub fn from_json(json: &str) -> Result<RagaCatalog, CatalogError> {
        let ragas: Vec<Raga> = serde_json::from_str(json)?;
        let mut builder = RagaCatalog::builder();
        for raga in ragas {
            builder.register(raga)?;
        }
        Ok(builder.build())
    }

    /// Writes the catalog as JSON to `path`.
    ///
    /// # Errors
    /// * `CatalogError::Json` - If serialization fails
    /// * `CatalogError::Io` - If the file cannot be written
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CatalogError> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        info!(path = %path.as_ref().display(), ragas = self.len(), "raga catalog saved");
        Ok(())
    }

    /// Reads a catalog written by [`RagaCatalog::save`].
    ///
    /// # Errors
    /// * `CatalogError::Io` - If the file cannot be read
    /// * `CatalogError::Json` - If the text is not a valid raga list
    /// * `CatalogError::DuplicateName` - If two records share a name
    pub fn load<P: AsRef<Path>>(path: P) -> Result<RagaCatalog, CatalogError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let catalog = RagaCatalog::from_json(&text)?;
        info!(path = %path.as_ref().display(), ragas = catalog.len(), "raga catalog loaded");
        Ok(catalog)
    }
}

impl<'a> IntoIterator for &'a RagaCatalog {
    type Item = &'a Raga;
    type IntoIter = std::slice::Iter<'a, Raga>;

    fn into_iter(self) -> Self::IntoIter {
        self.ragas.iter()
    }
}

/// The 72-raga Melakarta catalog on its own, for inspection or export.
pub fn melakarta_catalog() -> Result<RagaCatalog, CatalogError> {
    RagaCatalog::melakarta()
}
