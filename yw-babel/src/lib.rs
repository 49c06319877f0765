//! Conversion between yWriter 7 projects and office documents
//!
//!     A yWriter project (`.yw7`) is exported to documents an office suite can edit: manuscripts,
//!     proof copies, description documents and lists as ODT, ODS, HTML or CSV. Edited documents
//!     are read back into a partial project and merged into the stored one, so only what the
//!     document carries is changed.
//!
//!     This is a pure lib. It powers `ywcnv` but is shell agnostic: no code here prints, reads the
//!     environment or exits. Progress is reported through `tracing`.
//!
//! Architecture
//!
//!     .
//!     ├── error.rs                # FormatError and the failure sentinel
//!     ├── format.rs               # Format trait, ExportContext
//!     ├── registry.rs             # FormatRegistry: discovery by `<suffix>.<extension>`
//!     ├── convert.rs              # Export, import and create drivers
//!     ├── fsutil.rs               # Backup-then-replace writes, lock files
//!     ├── model                   # Project, chapters, scenes, world elements
//!     ├── templates               # Template sets and the renderer
//!     ├── common                  # Markup conversion, splitter, merge engine
//!     └── formats
//!         ├── yw7                 # The project store
//!         ├── common              # Document events, ODF packages, list tables
//!         ├── odt, ods, html, csv
//!
//! Round Trip
//!
//!     Every written document carries the IDs of what it shows (`ChID:3`, `ScID:12`, ...) in
//!     sections, comments or cells. Readers recover exactly the fields a document type holds;
//!     the merge engine leaves everything else alone. Divider lines typed into scene text
//!     (`# `, `## `, `* * *`) split scenes and chapters on the way back.

pub mod common;
pub mod convert;
pub mod error;
pub mod format;
pub mod formats;
pub mod fsutil;
pub mod model;
pub mod registry;
pub mod templates;

pub use convert::Converter;
pub use error::FormatError;
pub use format::{ExportContext, Format, SerializedDocument};
pub use model::Project;
pub use registry::FormatRegistry;

/// Prefix of status messages that report a failure.
pub const FAILURE_MARKER: &str = "!";
