//! Fetch, rewrite and emit remote text documents.
//!
//! The pipeline is three sequential stages behind small traits:
//!
//! - [`Loader`]: fetches raw documents ([`HttpLoader`] over blocking HTTP GET)
//! - [`Converter`]: rewrites every document ([`ReplaceConverter`], literal replace)
//! - [`Printer`]: emits the result ([`StdoutPrinter`] or [`FilePrinter`])
//!
//! [`Document`] owns one of each and runs them in order.
//!
//! # Example
//!
//! ```ignore
//! use rsub_pipeline::{Document, HttpLoader, ReplaceConverter, printer_for};
//!
//! let loader = HttpLoader::new(vec!["https://example.com/feed.xml".to_owned()]);
//! let converter = ReplaceConverter::new("http://", "https://");
//! let mut document = Document::new(loader, converter, printer_for(None));
//! document.run()?;
//! ```

mod converter;
mod document;
mod error;
mod loader;
mod printer;

pub use converter::{Converter, ReplaceConverter};
pub use document::{Document, LoadFailurePolicy, Stage};
pub use error::{LoadError, LoadErrorKind, PipelineError, PrintError};
pub use loader::{DEFAULT_USER_AGENT, HttpLoader, Loader, create_agent};
pub use printer::{FilePrinter, Printer, StdoutPrinter, StreamPrinter, printer_for};
