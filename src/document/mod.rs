//! Word document object model
//!
//! This module loads a .docx package into a mutable tree and exposes the
//! body paragraphs, tables, header/footer paragraphs and style sheet that the
//! template engine reads and edits.

pub(crate) mod io;
pub(crate) mod loader;
pub mod models;
pub mod paragraph;
pub mod styles;
pub mod table;
pub mod xml;

pub use io::validate_docx_name;
pub use models::{BodyItem, Document};
pub use styles::StyleSheet;
pub use xml::{XmlElement, XmlNode, XmlPart};
