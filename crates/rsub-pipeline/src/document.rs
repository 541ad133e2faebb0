//! Pipeline coordinator.
//!
//! A [`Document`] walks through `Created -> Loaded -> Converted -> Printed`
//! exactly once. The document collection is replaced wholesale at each stage.

use tracing::{debug, warn};

use crate::converter::Converter;
use crate::error::{LoadError, PipelineError, PrintError};
use crate::loader::Loader;
use crate::printer::Printer;

/// Pipeline stage reached so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Created,
    Loaded,
    Converted,
    Printed,
}

/// What [`Document::run`] does after a failed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadFailurePolicy {
    /// Convert and print whatever was loaded before the failure.
    #[default]
    Continue,
    /// Stop after the load stage.
    Abort,
}

/// Owns the stages and the in-memory document collection.
pub struct Document {
    documents: Vec<String>,
    stage: Stage,
    policy: LoadFailurePolicy,
    loader: Box<dyn Loader>,
    converter: Box<dyn Converter>,
    printer: Box<dyn Printer>,
}

impl Document {
    pub fn new(
        loader: impl Loader + 'static,
        converter: impl Converter + 'static,
        printer: impl Printer + 'static,
    ) -> Self {
        Self {
            documents: Vec::new(),
            stage: Stage::Created,
            policy: LoadFailurePolicy::default(),
            loader: Box::new(loader),
            converter: Box::new(converter),
            printer: Box::new(printer),
        }
    }

    #[must_use]
    pub fn with_load_failure_policy(mut self, policy: LoadFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Current document collection.
    #[must_use]
    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    /// Run the loader and keep its result.
    ///
    /// On failure the partially loaded documents become the collection and
    /// the error is returned without them.
    pub fn load(&mut self) -> Result<(), LoadError> {
        let result = match self.loader.load() {
            Ok(documents) => {
                self.documents = documents;
                Ok(())
            }
            Err(mut err) => {
                self.documents = err.take_partial();
                warn!(
                    "Load failed after {} document(s): {}",
                    self.documents.len(),
                    err
                );
                Err(err)
            }
        };
        self.advance(Stage::Loaded);
        result
    }

    /// Replace the collection with its converted form.
    pub fn convert(&mut self) {
        self.documents = self.converter.convert(&self.documents);
        self.advance(Stage::Converted);
    }

    /// Send the collection to the printer.
    pub fn print(&mut self) -> Result<(), PrintError> {
        let result = self.printer.print(&self.documents);
        self.advance(Stage::Printed);
        result
    }

    /// Run load, convert and print in order.
    ///
    /// Returns the last failure encountered: a print error takes precedence
    /// over an earlier load error.
    pub fn run(&mut self) -> Result<(), PipelineError> {
        let loaded = self.load();
        if loaded.is_err() && self.policy == LoadFailurePolicy::Abort {
            return loaded.map_err(PipelineError::from);
        }

        self.convert();
        self.print()?;
        loaded.map_err(PipelineError::from)
    }

    fn advance(&mut self, stage: Stage) {
        debug!(
            "Pipeline {:?} -> {:?} ({} document(s))",
            self.stage,
            stage,
            self.documents.len()
        );
        self.stage = stage;
    }
}
