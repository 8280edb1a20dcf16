//! # DMN Model
//!
//! Document side of the DMN view manager:
//!
//! - [`DocumentTree`] / [`Element`]: the parsed document
//! - [`DocumentGateway`]: the async parse/serialize contract the manager consumes
//! - [`XmlGateway`]: a DMN 1.1 XML implementation of that contract
//!
//! ```rust,ignore
//! use dmn_model::{DocumentGateway, XmlGateway};
//!
//! let output = XmlGateway::new().parse(xml).await;
//! for warning in &output.warnings {
//!     eprintln!("{warning}");
//! }
//! ```

pub mod error;
pub mod gateway;
pub mod schema;
pub mod serializer;
pub mod tree;
pub mod xml;

pub use error::{ParseError, SerializeError, Warning};
pub use gateway::{DocumentGateway, ParseOutput, SerializeOptions};
pub use tree::{DocumentTree, Element, ElementBuilder};
pub use xml::XmlGateway;
