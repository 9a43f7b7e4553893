//! Streaming METS parser for folio.
//!
//! Reconstructs a volume's page-level structure from its METS document in a
//! single forward pass over the XML event stream; no DOM is built. Two
//! regions of the document matter:
//!
//! - the file group whose `USE` marks page text, where each `file` declares a
//!   page's identifier, size, and checksum, and its `FLocat` names the
//!   physical file;
//! - the physical `structMap`, where each page `div` carries the page's
//!   order, order label, and feature labels, and its `fptr` points back at a
//!   file identifier.
//!
//! Everything else is skipped. Minor irregularities (missing attributes,
//! dangling pointers, duplicate identifiers) are logged and tolerated; only
//! an undecodable or syntactically broken document aborts the parse.
//!
//! ```rust
//! use folio_mets::MetsParser;
//! use folio_types::VolumeId;
//!
//! let doc = r#"<METS:mets xmlns:METS="http://www.loc.gov/METS/"
//!                         xmlns:xlink="http://www.w3.org/1999/xlink">
//!   <METS:fileSec>
//!     <METS:fileGrp USE="ocr">
//!       <METS:file ID="OCR1" SIZE="5" CHECKSUM="abc" CHECKSUMTYPE="MD5">
//!         <METS:FLocat xlink:href="00000001.txt"/>
//!       </METS:file>
//!     </METS:fileGrp>
//!   </METS:fileSec>
//!   <METS:structMap TYPE="physical">
//!     <METS:div TYPE="volume">
//!       <METS:div TYPE="page" ORDER="1" ORDERLABEL="i">
//!         <METS:fptr FILEID="OCR1"/>
//!       </METS:div>
//!     </METS:div>
//!   </METS:structMap>
//! </METS:mets>"#;
//!
//! let volume = MetsParser::default()
//!     .parse_document(VolumeId::parse("mdp.001").unwrap(), doc.to_string())
//!     .unwrap();
//! let page = volume.page_by_filename("00000001.txt").unwrap();
//! assert_eq!(page.order, 1);
//! assert_eq!(page.label.as_deref(), Some("i"));
//! ```

pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod fixture;
pub mod parser;
pub mod phase;

pub use error::{MetsError, MetsResult};
pub use parser::{MetsParser, ParserOptions, METS_NAMESPACE, XLINK_NAMESPACE};
pub use phase::ParsePhase;
