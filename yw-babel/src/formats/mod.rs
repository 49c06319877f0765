//! Format implementations
//!
//! One module per file type. ODT and HTML readers share the event state machine in
//! [`common::events`]; ODS and CSV share the list reader in [`common::table`].

pub mod common;
pub mod csv;
pub mod html;
pub mod ods;
pub mod odt;
pub mod yw7;

pub use self::csv::CsvFormat;
pub use html::{HtmlDocument, HtmlFormat};
pub use ods::OdsFormat;
pub use odt::{OdtDocument, OdtFormat};
pub use yw7::{Yw7File, Yw7Format};
