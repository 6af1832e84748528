//! The entity vocabulary.
//!
//! A vocabulary maps logical entity keys to canonical shape specs. It is
//! declared once per storyboard, before any frame compiles, and is read-only
//! afterwards: [`VocabularyBuilder`] is the only way to add entries and
//! [`Vocabulary`] has no mutating methods. Frames compiled in parallel share
//! one `&Vocabulary` without locking.

use indexmap::IndexMap;
use log::debug;

use inkframe_core::{
    error::{CompileError, ErrorKind},
    ir::ShapeSpec,
};

/// Collects entity declarations.
#[derive(Debug, Default)]
pub struct VocabularyBuilder {
    entries: IndexMap<String, ShapeSpec>,
}

impl VocabularyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an entity.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateId` if `key` is already declared, and `MalformedInput`
    /// for an empty key.
    pub fn declare(&mut self, key: impl Into<String>, spec: ShapeSpec) -> Result<&mut Self, CompileError> {
        let key = key.into();
        if key.is_empty() {
            return Err(CompileError::new(
                ErrorKind::MalformedInput,
                "vocabulary keys must not be empty",
            ));
        }
        if self.entries.contains_key(&key) {
            return Err(CompileError::new(
                ErrorKind::DuplicateId,
                format!("vocabulary key `{key}` is declared twice"),
            ));
        }
        debug!(key = key.as_str(), kind = spec.kind_tag(); "Declared vocabulary entity");
        self.entries.insert(key, spec);
        Ok(self)
    }

    /// Freezes the declarations.
    pub fn build(self) -> Vocabulary {
        Vocabulary {
            entries: self.entries,
        }
    }
}

/// A frozen set of entity declarations, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vocabulary {
    entries: IndexMap<String, ShapeSpec>,
}

impl Vocabulary {
    /// Returns an empty vocabulary, for frames that reference no entities.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a vocabulary from declarations in order.
    ///
    /// # Errors
    ///
    /// Fails like [`VocabularyBuilder::declare`].
    pub fn from_entries<I, K>(entries: I) -> Result<Self, CompileError>
    where
        I: IntoIterator<Item = (K, ShapeSpec)>,
        K: Into<String>,
    {
        let mut builder = VocabularyBuilder::new();
        for (key, spec) in entries {
            builder.declare(key, spec)?;
        }
        Ok(builder.build())
    }

    /// Looks up the canonical spec of an entity.
    ///
    /// # Errors
    ///
    /// Returns `UnknownVocabularyKey` if `key` was never declared.
    pub fn resolve(&self, key: &str) -> Result<&ShapeSpec, CompileError> {
        self.entries.get(key).ok_or_else(|| {
            CompileError::new(
                ErrorKind::UnknownVocabularyKey,
                format!("entity `{key}` is not declared in the vocabulary"),
            )
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
