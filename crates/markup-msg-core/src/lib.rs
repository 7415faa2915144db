// crates/markup-msg-core/src/lib.rs
// ============================================================================
// Module: Markup Message Root
// Description: Public API surface for message templates and catalog extraction.
// Purpose: Wire together the template language, the extractor, and the catalog builder.
// Dependencies: crate::{catalog, error, extract, lexer, location, markup, message_id, parser,
//              po, render, scan, syntax}
// ============================================================================

//! ## Overview
//! Translatable strings with inline markup are written as flat templates:
//! `Click [1:here] to continue`, `{count} items`. This crate defines that
//! template language in both directions:
//! - [`parse`] and [`render`] rebuild an element tree from a template, slot
//!   templates, and placeholder values;
//! - [`extract_message`] produces the template (and its slots) from markup.
//!
//! On top of that, [`scan_unit`] collects messages from one markup document,
//! [`Catalog`] aggregates them with source references, and [`write_po`]
//! emits a gettext-style catalog. Everything here is pure and synchronous;
//! drivers own I/O, clocks, and threads.

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod catalog;
pub mod error;
pub mod extract;
pub mod lexer;
pub mod location;
pub mod markup;
pub mod message_id;
pub mod parser;
pub mod po;
pub mod render;
pub mod scan;
pub mod syntax;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use catalog::Catalog;
pub use catalog::CommentMergePolicy;
pub use catalog::MessageComments;
pub use catalog::MessageEntry;
pub use catalog::UnitCatalog;
pub use catalog::merge_catalogs;
pub use catalog::merge_units;
pub use error::LocatedError;
pub use error::SyntaxErrorKind;
pub use error::TemplateError;
pub use error::TemplateResult;
pub use extract::ExtractOptions;
pub use extract::ExtractedMessage;
pub use extract::MarkupChild;
pub use extract::MarkupTree;
pub use extract::extract_message;
pub use extract::extract_message_with;
pub use lexer::SpannedToken;
pub use lexer::Token;
pub use lexer::tokenize;
pub use location::SourceLocation;
pub use markup::Attribute;
pub use markup::AttributeValue;
pub use markup::ExpressionSlot;
pub use markup::MarkupDocument;
pub use markup::MarkupElement;
pub use markup::MarkupNode;
pub use markup::TextNode;
pub use message_id::MessageId;
pub use message_id::compute_message_id;
pub use parser::MAX_TEMPLATE_BYTES;
pub use parser::MAX_TEMPLATE_DEPTH;
pub use parser::ParsedChild;
pub use parser::ParsedNode;
pub use parser::parse;
pub use po::CatalogDocument;
pub use po::CatalogHeader;
pub use po::CatalogRecord;
pub use po::TranslationSeed;
pub use po::serialize;
pub use po::write_po;
pub use render::ExpressionResolver;
pub use render::NoExpressions;
pub use render::RenderedChild;
pub use render::SlotTemplate;
pub use render::render;
pub use render::render_template;
pub use render::render_text;
pub use scan::ErrorPolicy;
pub use scan::ScanOptions;
pub use scan::UnitReport;
pub use scan::scan_unit;
