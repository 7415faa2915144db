// crates/markup-msg-core/src/catalog.rs
// ============================================================================
// Module: Message Catalog
// Description: Insertion-ordered message entries with references and comments.
// Purpose: Accumulate per-unit messages and merge partial catalogs deterministically.
// Dependencies: serde, crate::location
// ============================================================================

//! ## Overview
//! A [`Catalog`] maps message ids to [`MessageEntry`] values and remembers
//! the order in which ids first appeared, so serialized output is stable.
//!
//! Extraction over many units is a per-unit computation: each unit builds
//! its own catalog, and [`merge_units`] combines them in sorted unit order so
//! the result does not depend on which unit finished first.
//!
//! ## Invariants
//! - Each id appears at most once.
//! - Reference lists contain no duplicates and keep first-seen order.
//! - The extracted comment of an entry is only replaced according to the
//!   chosen [`CommentMergePolicy`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use crate::location::SourceLocation;

// ============================================================================
// SECTION: Entries
// ============================================================================

/// Comments attached to a catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageComments {
    /// Source locations where the message occurs.
    pub reference: Vec<SourceLocation>,
    /// Developer comment for translators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted: Option<String>,
}

/// One message of a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEntry {
    /// Canonical message id.
    pub id: String,
    /// Translations; empty until a translator fills them in.
    #[serde(default)]
    pub translations: Vec<String>,
    /// References and developer comment.
    #[serde(default)]
    pub comments: MessageComments,
}

impl MessageEntry {
    /// Creates an untranslated entry with no references.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            translations: Vec::new(),
            comments: MessageComments::default(),
        }
    }

    /// Appends `location` unless it is already referenced.
    pub fn add_reference(&mut self, location: SourceLocation) {
        if !self.comments.reference.contains(&location) {
            self.comments.reference.push(location);
        }
    }
}

// ============================================================================
// SECTION: Merge Policy
// ============================================================================

/// How to resolve different developer comments for the same id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentMergePolicy {
    /// Keep the comment of the first catalog that supplied one.
    #[default]
    KeepFirst,
    /// Keep every distinct comment, joined by newlines in merge order.
    ConcatenateDistinct,
}

impl CommentMergePolicy {
    /// Combines an existing comment with an incoming one.
    fn combine(self, existing: &mut Option<String>, incoming: Option<&str>) {
        let Some(incoming) = incoming else {
            return;
        };
        match existing {
            None => *existing = Some(incoming.to_string()),
            Some(current) => {
                if self == Self::ConcatenateDistinct
                    && current != incoming
                    && !current.split('\n').any(|line| line == incoming)
                {
                    current.push('\n');
                    current.push_str(incoming);
                }
            }
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Insertion-ordered collection of message entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    /// Entries in first-seen order.
    entries: Vec<MessageEntry>,
    /// Position of each id in `entries`.
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of distinct messages.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the catalog holds no messages.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry for `id`, if present.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&MessageEntry> {
        self.index.get(id).and_then(|&position| self.entries.get(position))
    }

    /// Returns entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[MessageEntry] {
        &self.entries
    }

    /// Iterates over message ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.id.as_str())
    }

    /// Records one occurrence of `id` at `location`.
    ///
    /// The first occurrence creates an untranslated entry. Later occurrences
    /// add the location if it is new and set the comment only if none was
    /// recorded yet. Returns true when a new entry was created.
    pub fn add_message(
        &mut self,
        id: &str,
        location: SourceLocation,
        extracted_comment: Option<&str>,
    ) -> bool {
        let (entry, created) = self.entry_mut(id);
        entry.add_reference(location);
        CommentMergePolicy::KeepFirst.combine(&mut entry.comments.extracted, extracted_comment);
        created
    }

    /// Folds a whole entry into this catalog.
    pub fn merge_entry(&mut self, incoming: MessageEntry, policy: CommentMergePolicy) {
        let (entry, _) = self.entry_mut(&incoming.id);
        for location in incoming.comments.reference {
            entry.add_reference(location);
        }
        policy.combine(&mut entry.comments.extracted, incoming.comments.extracted.as_deref());
        if entry.translations.is_empty() && !incoming.translations.is_empty() {
            entry.translations = incoming.translations;
        }
    }

    /// Returns the entry for `id`, creating it when missing.
    fn entry_mut(&mut self, id: &str) -> (&mut MessageEntry, bool) {
        let (position, created) = match self.index.get(id) {
            Some(&position) => (position, false),
            None => {
                let position = self.entries.len();
                self.entries.push(MessageEntry::new(id));
                self.index.insert(id.to_string(), position);
                (position, true)
            }
        };
        // `position` always indexes `entries`; both maps are updated together.
        let entry = &mut self.entries[position];
        (entry, created)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a MessageEntry;
    type IntoIter = std::slice::Iter<'a, MessageEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ============================================================================
// SECTION: Merging
// ============================================================================

/// Merges catalogs in the order supplied.
///
/// Ids keep the position of their first appearance; reference lists are
/// concatenated without duplicates; comments follow `policy`; the first
/// non-empty translation list wins.
#[must_use]
pub fn merge_catalogs<I>(catalogs: I, policy: CommentMergePolicy) -> Catalog
where
    I: IntoIterator<Item = Catalog>,
{
    let mut merged = Catalog::new();
    for catalog in catalogs {
        for entry in catalog.entries {
            merged.merge_entry(entry, policy);
        }
    }
    merged
}

/// Partial catalog produced by one source unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitCatalog {
    /// Unit identifier (usually a relative path).
    pub unit: String,
    /// Messages found in the unit.
    pub catalog: Catalog,
}

/// Merges per-unit catalogs ordered by unit identifier.
///
/// Sorting first makes the result independent of the order in which
/// parallel workers delivered their units.
#[must_use]
pub fn merge_units(mut units: Vec<UnitCatalog>, policy: CommentMergePolicy) -> Catalog {
    units.sort_by(|left, right| left.unit.cmp(&right.unit));
    merge_catalogs(units.into_iter().map(|unit| unit.catalog), policy)
}
