//! Fiscal Extract Domain Layer
//!
//! This crate contains the domain model for extracting fiscal statistics from
//! government financial reports. It has ZERO external dependencies and defines
//! the value objects, the reconciliation rule and the trait interfaces that
//! all other layers depend upon.
//!
//! ## Key Concepts
//!
//! - **Indicator catalog**: the fixed, ordered list of figures we try to extract
//! - **Fragment**: one page's or one sheet's worth of tabular content
//! - **Domain scope**: general budget vs. government fund/debt vocabulary
//! - **Extraction record**: indicator → normalized value for one document
//! - **Directory record**: the reconciled record for one leaf directory
//! - **Max-wins reconciliation**: the larger candidate value always survives
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure business logic only
//! - Readers and completion providers live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod figure;
pub mod fragment;
pub mod indicator;
pub mod record;
pub mod scope;
pub mod traits;

// Re-exports for convenience
pub use figure::{Figure, ValueFormatError};
pub use fragment::{FilteredDocument, FilteredSection, FragmentSource, RawFragment, SECTION_SEPARATOR};
pub use indicator::IndicatorCatalog;
pub use record::{DirectoryRecord, ExtractionRecord, OutputRow};
pub use scope::{DomainScope, KeywordSet};
pub use traits::{DocumentKind, SourceDocument};
