//! Batch pipeline: discover, order, parse and apply every document, then
//! dump the ledger.

use crate::config::EngineConfig;
use crate::diagnostics::{LogOnly, Notifier};
use crate::discovery::{order_documents, DocumentHandle, DocumentSource, Scope};
use crate::document::{Document, Requirement};
use crate::engine::{ApplyOutcome, OverrideEngine};
use crate::ledger::Ledger;
use crate::{EngineResult, OverrideError, Severity};
use srd_model::{FormRegistry, FormRemapper};
use std::time::Instant;
use tracing::{error, info, warn};

/// Terminal state of one document.
#[derive(Debug)]
pub enum DocumentOutcome {
    /// The document could not be read or parsed and was skipped.
    ParseFailed(OverrideError),
    /// The requirement list did not hold.
    GatedOut(Vec<Requirement>),
    /// Applied, with any record and field diagnostics.
    Applied(Vec<OverrideError>),
}

#[derive(Debug)]
pub struct DocumentReport {
    pub name: String,
    pub scope: Scope,
    pub outcome: DocumentOutcome,
}

impl DocumentReport {
    /// Diagnostics attributed to this document.
    pub fn diagnostics(&self) -> &[OverrideError] {
        match &self.outcome {
            DocumentOutcome::ParseFailed(e) => std::slice::from_ref(e),
            DocumentOutcome::GatedOut(_) => &[],
            DocumentOutcome::Applied(diagnostics) => diagnostics,
        }
    }
}

/// Result of one batch.
#[derive(Debug)]
pub struct BatchReport {
    /// Documents in application order.
    pub documents: Vec<DocumentReport>,
    pub ledger: Ledger,
}

impl BatchReport {
    pub fn document(&self, name: &str) -> Option<&DocumentReport> {
        self.documents.iter().find(|report| report.name == name)
    }

    /// Number of documents whose sections were applied.
    pub fn applied(&self) -> usize {
        self.documents
            .iter()
            .filter(|report| matches!(report.outcome, DocumentOutcome::Applied(_)))
            .count()
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &OverrideError> {
        self.documents.iter().flat_map(DocumentReport::diagnostics)
    }

    /// Number of error-severity diagnostics.
    pub fn error_count(&self) -> usize {
        self.diagnostics()
            .filter(|e| e.severity() == Severity::Error)
            .count()
    }
}

/// Runs load batches against a host registry.
///
/// Failures below batch scope are logged here, at the document boundary,
/// and error-severity ones are forwarded to the notifier.
pub struct Pipeline<'a> {
    registry: &'a mut dyn FormRegistry,
    remapper: Option<&'a dyn FormRemapper>,
    notifier: &'a dyn Notifier,
    notify_errors: bool,
}

impl<'a> Pipeline<'a> {
    pub fn new(registry: &'a mut dyn FormRegistry) -> Self {
        Self {
            registry,
            remapper: None,
            notifier: &LogOnly,
            notify_errors: true,
        }
    }

    pub fn with_remapper(mut self, remapper: &'a dyn FormRemapper) -> Self {
        self.remapper = Some(remapper);
        self
    }

    pub fn with_notifier(mut self, notifier: &'a dyn Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    /// Applies the surfacing settings of `config`.
    pub fn configure(mut self, config: &EngineConfig) -> Self {
        self.notify_errors = config.notify_errors;
        self
    }

    /// Runs one batch over everything `source` lists.
    ///
    /// Only a discovery failure is returned as `Err`. The ledger always
    /// starts empty and is always dumped.
    pub fn run(&mut self, source: &dyn DocumentSource) -> EngineResult<BatchReport> {
        let started = Instant::now();
        let handles = match source.list_documents() {
            Ok(handles) => handles,
            Err(e) => {
                self.surface(&e);
                return Err(e);
            }
        };
        let handles = order_documents(handles, &self.registry.load_order());
        info!("Searched files in {} milliseconds", started.elapsed().as_millis());

        let started = Instant::now();
        let mut ledger = Ledger::new();
        let mut documents = Vec::with_capacity(handles.len());
        for handle in handles {
            info!("Parsing {}", handle.name);
            let outcome = match load(source, &handle) {
                Ok(document) => self.apply(&document, &mut ledger),
                Err(e) => {
                    self.surface(&e);
                    DocumentOutcome::ParseFailed(e)
                }
            };
            documents.push(DocumentReport {
                name: handle.name,
                scope: handle.scope,
                outcome,
            });
        }
        info!("Parsed documents in {} milliseconds", started.elapsed().as_millis());

        let started = Instant::now();
        for line in ledger.render(&*self.registry) {
            info!("{}", line);
        }
        info!("Printed conflicts in {} milliseconds", started.elapsed().as_millis());

        Ok(BatchReport { documents, ledger })
    }

    fn apply(&mut self, document: &Document, ledger: &mut Ledger) -> DocumentOutcome {
        let mut engine = OverrideEngine::new(&mut *self.registry);
        if let Some(remapper) = self.remapper {
            engine = engine.with_remapper(remapper);
        }

        match engine.apply(document, ledger) {
            ApplyOutcome::GatedOut(missing) => {
                for requirement in &missing {
                    info!("\tMissing requirement {}", requirement);
                }
                DocumentOutcome::GatedOut(missing)
            }
            ApplyOutcome::Applied(diagnostics) => {
                for diagnostic in &diagnostics {
                    self.surface(diagnostic);
                }
                DocumentOutcome::Applied(diagnostics)
            }
        }
    }

    fn surface(&self, failure: &OverrideError) {
        match failure.severity() {
            Severity::Warning => warn!("{}", failure),
            Severity::Error => {
                error!("{}", failure);
                if self.notify_errors {
                    self.notifier.notify(&failure.to_string());
                }
            }
        }
    }
}

fn load(source: &dyn DocumentSource, handle: &DocumentHandle) -> EngineResult<Document> {
    let bytes = source.read(handle).map_err(|e| OverrideError::Parse {
        document: handle.name.clone(),
        message: e.to_string(),
    })?;
    Document::parse(&handle.name, &bytes, handle.format)
}
