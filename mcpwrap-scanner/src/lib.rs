//! Static route scanner for Python web APIs
//!
//! Recovers endpoint definitions (paths, verbs, parameters, request and
//! response shapes) from FastAPI-style source without executing it.
//!
//! ## Pipeline
//!
//! - [`walker`] enumerates candidate files
//! - [`parser`] parses each file with tree-sitter and lowers it into the
//!   owned [`syntax`] model
//! - [`registry`] records import aliases and structured-record types (pass 1)
//! - [`extractor`] turns route-annotated functions into [`Endpoint`]s (pass 2)
//! - [`scan`] runs the above, in parallel across files, with a full barrier
//!   between the two passes
//!
//! ```no_run
//! use mcpwrap_config::ScanSettings;
//! use mcpwrap_scanner::Scanner;
//!
//! let output = Scanner::new("./my-api", ScanSettings::default()).scan()?;
//! for endpoint in &output.endpoints {
//!     println!("{} {}", endpoint.method, endpoint.path);
//! }
//! # Ok::<(), mcpwrap_scanner::ScanError>(())
//! ```

pub mod annotation;
pub mod endpoint;
pub mod error;
pub mod extractor;
pub mod parser;
pub mod registry;
pub mod scan;
pub mod syntax;
pub mod walker;

pub use endpoint::{
    is_object_tag, Endpoint, HttpMethod, ParamLocation, Parameter, Property, SchemaType, Shape,
    ShapeKind, SourceLocation,
};
pub use error::{Result, ScanError};
pub use extractor::{Extraction, RouteExtractor};
pub use parser::SourceParser;
pub use registry::{is_structured_record, ModelMarkers, ModelRegistry};
pub use scan::{ScanOutput, ScanReport, Scanner};
pub use walker::{Discovery, SourceWalker};
