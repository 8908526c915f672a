//! Doxygen XML ingestion.
//!
//! [`DoxygenXmlSource`] reads `index.xml` and one `<refid>.xml` file per
//! listed compound, converts descriptions to Markdown, and assembles the
//! [`moxydoc_model::CompoundTree`] the rest of the pipeline works on.

mod compound;
mod description;
mod error;
mod source;

pub use description::{plain_text, to_markdown};
pub use error::IngestError;
pub use source::DoxygenXmlSource;
