//! Core Importer implementation

use crate::config::ImporterConfig;
use crate::content::{normalize_pages, normalize_sheets, NormalizedContent, SourceKind, Upload, UploadContent};
use crate::error::ImportError;
use crate::items::ItemNormalizer;
use crate::progress::{ImportStage, ProgressSink};
use crate::prompt::PromptBuilder;
use crate::raw::RawExtraction;
use crate::repair::{repair, RepairStep};
use crate::resolver::{resolve_in, SupplierResolution};
use chrono::Datelike;
use licita_domain::{IdGenerator, LineItem, RecordHeader, SupplierRegistry, UuidV7Generator};
use licita_ledger::ProcurementRecord;
use licita_llm::{ExtractionProvider, GenerationRequest, InlineDocument};
use std::fmt::{self, Display};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Advisory attached to an otherwise successful import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportWarning {
    /// A document response needed repair; trailing items may be missing
    PossiblyIncomplete,
}

impl Display for ImportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportWarning::PossiblyIncomplete => f.write_str(
                "Long document: the response was cut short. Check that every item was imported.",
            ),
        }
    }
}

/// Metadata about one import
#[derive(Debug, Clone, PartialEq)]
pub struct ImportMetadata {
    /// Detected source kind
    pub source_kind: SourceKind,

    /// Model that answered
    pub model_name: String,

    /// Repair step that recovered the response
    pub repair_step: RepairStep,

    /// Terminal reason reported by the service
    pub finish_reason: Option<String>,

    /// Characters of normalized content sent as text (0 when the original was attached)
    pub content_chars: usize,

    /// Bytes of the attached original document (0 when sent as text)
    pub attachment_bytes: usize,

    /// Whether the content was cut to the character budget
    pub truncated: bool,

    /// Processing time (milliseconds)
    pub processing_time_ms: u64,
}

/// Result of an import; nothing has been persisted yet
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    /// Extracted header fields (missing ones are empty)
    pub header: RecordHeader,

    /// Supplier resolution against the registry
    pub supplier: SupplierResolution,

    /// Normalized line items
    pub items: Vec<LineItem>,

    /// Advisory for the user, if any
    pub warning: Option<ImportWarning>,

    /// Metadata about the import
    pub metadata: ImportMetadata,
}

impl ImportOutcome {
    /// Merge into a draft record, defaulting a missing year to the current one
    pub fn apply_to(&self, record: &ProcurementRecord) -> ProcurementRecord {
        self.apply_to_with_year(record, chrono::Local::now().year())
    }

    /// Merge into a draft record, defaulting a missing year to `current_year`
    ///
    /// The header is replaced, the supplier is set from the resolution
    /// (cleared when unresolved), items are replaced and existing shares are
    /// kept and recomputed against the new total.
    pub fn apply_to_with_year(&self, record: &ProcurementRecord, current_year: i32) -> ProcurementRecord {
        let mut header = self.header.clone();
        if header.year.trim().is_empty() {
            header.year = current_year.to_string();
        }

        record
            .with_header(header)
            .with_supplier(self.supplier.supplier_id().cloned())
            .with_items(self.items.clone())
    }
}

/// The Importer turns an uploaded file into an [`ImportOutcome`]
pub struct Importer<P, R>
where
    P: ExtractionProvider,
    R: SupplierRegistry,
{
    provider: Arc<P>,
    registry: R,
    ids: Arc<dyn IdGenerator>,
    normalizer: ItemNormalizer,
    config: ImporterConfig,
    in_flight: AtomicBool,
}

impl<P, R> Importer<P, R>
where
    P: ExtractionProvider,
    R: SupplierRegistry,
    R::Error: Display,
{
    /// Create a new Importer
    ///
    /// # Errors
    ///
    /// `Config` if the configuration is invalid.
    pub fn new(provider: P, registry: R, config: ImporterConfig) -> Result<Self, ImportError> {
        config.validate().map_err(ImportError::Config)?;

        Ok(Self {
            provider: Arc::new(provider),
            registry,
            ids: Arc::new(UuidV7Generator),
            normalizer: ItemNormalizer::new(config.default_lot.as_str(), config.default_unit.as_str()),
            config,
            in_flight: AtomicBool::new(false),
        })
    }

    /// Use a specific id generator for extracted items
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// The configuration in use
    pub fn config(&self) -> &ImporterConfig {
        &self.config
    }

    /// Whether an import is currently running
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Import one upload
    ///
    /// Issues at most one extraction request. A call made while another is
    /// outstanding fails with `ImportInProgress` without issuing a request.
    pub async fn import(
        &self,
        upload: &Upload,
        progress: &dyn ProgressSink,
    ) -> Result<ImportOutcome, ImportError> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;
        let start_time = Instant::now();

        progress.report(ImportStage::ReadingFile.label());
        let kind = upload.kind()?;

        info!(file = %upload.file_name, kind = %kind, "Starting import");

        let prepared = self.prepare_request(upload, kind, progress)?;

        progress.report(ImportStage::Analyzing.label());

        let generation = timeout(
            self.config.extraction_timeout(),
            self.provider.generate(&prepared.request),
        )
        .await
        .map_err(|_| {
            ImportError::ExtractionService(format!(
                "no response after {} seconds",
                self.config.extraction_timeout_secs
            ))
        })??;

        debug!(
            response_chars = generation.text.chars().count(),
            finish_reason = ?generation.finish_reason,
            "Extraction response received"
        );
        if generation.hit_output_limit() {
            warn!("Response stopped at the output ceiling; the last item is likely lost");
        }

        progress.report(ImportStage::ProcessingResponse.label());

        let repaired = repair(&generation.text)?;
        if !repaired.step.is_clean() {
            warn!(step = %repaired.step, "Response needed repair");
        }

        let raw = RawExtraction::from_value(&repaired.value)?;
        let items = self.normalizer.normalize_all(&raw.items, self.ids.as_ref());
        let supplier = resolve_in(
            raw.supplier_identifier.as_deref(),
            raw.supplier_name.as_deref(),
            &self.registry,
        );

        let warning = (kind == SourceKind::Document && !repaired.step.is_clean())
            .then_some(ImportWarning::PossiblyIncomplete);

        let metadata = ImportMetadata {
            source_kind: kind,
            model_name: self.provider.model_name().to_string(),
            repair_step: repaired.step,
            finish_reason: generation.finish_reason,
            content_chars: prepared.content_chars,
            attachment_bytes: prepared.attachment_bytes,
            truncated: prepared.truncated,
            processing_time_ms: u64::try_from(start_time.elapsed().as_millis()).unwrap_or(u64::MAX),
        };

        info!(
            items = items.len(),
            supplier_resolved = supplier.supplier.is_some(),
            repair_step = %repaired.step,
            elapsed_ms = metadata.processing_time_ms,
            "Import complete"
        );

        progress.report(ImportStage::Done.label());

        Ok(ImportOutcome {
            header: RecordHeader {
                process_number: raw.process_number.unwrap_or_default(),
                modality: raw.modality.unwrap_or_default(),
                object: raw.object.unwrap_or_default(),
                year: raw.year.unwrap_or_default(),
            },
            supplier,
            items,
            warning,
            metadata,
        })
    }

    /// Normalize content and build the single extraction request
    fn prepare_request(
        &self,
        upload: &Upload,
        kind: SourceKind,
        progress: &dyn ProgressSink,
    ) -> Result<PreparedRequest, ImportError> {
        let settings = self.config.generation.clone();

        match (kind, &upload.content) {
            (SourceKind::Spreadsheet, UploadContent::Sheets(sheets)) => {
                progress.report(ImportStage::ReadingSheets.label());
                let content = normalize_sheets(sheets, self.config.max_content_chars)?;
                ensure_not_empty(&content, upload)?;
                debug!(sheets = sheets.len(), chars = content.char_count(), "Sheets normalized");

                let prompt = PromptBuilder::tabular(content.text.as_str()).build();
                Ok(PreparedRequest::text(prompt, &content).with_settings(settings))
            }
            (SourceKind::Document, UploadContent::Pages { pages, original }) => {
                let original = original.as_ref().filter(|bytes| !bytes.is_empty());

                if let (true, Some(bytes)) = (self.config.send_original_documents, original) {
                    debug!(bytes = bytes.len(), "Sending original document");
                    let request = GenerationRequest::text(PromptBuilder::document().build())
                        .with_attachment(InlineDocument {
                            mime_type: upload.original_mime_type(),
                            data: bytes.clone(),
                        });
                    return Ok(PreparedRequest {
                        request,
                        content_chars: 0,
                        attachment_bytes: bytes.len(),
                        truncated: false,
                    }
                    .with_settings(settings));
                }

                let content = normalize_pages(pages, self.config.max_content_chars);
                ensure_not_empty(&content, upload)?;
                debug!(pages = pages.len(), chars = content.char_count(), "Pages normalized");

                let prompt = PromptBuilder::document_text(content.text.as_str()).build();
                Ok(PreparedRequest::text(prompt, &content).with_settings(settings))
            }
            _ => Err(ImportError::UnsupportedInput(format!(
                "{}: content does not match a {}",
                upload.file_name, kind
            ))),
        }
    }
}

fn ensure_not_empty(content: &NormalizedContent, upload: &Upload) -> Result<(), ImportError> {
    if content.text.trim().is_empty() {
        return Err(ImportError::EmptyDocument(upload.file_name.clone()));
    }
    if content.truncated {
        warn!(file = %upload.file_name, "Content cut to the character budget");
    }
    Ok(())
}

struct PreparedRequest {
    request: GenerationRequest,
    content_chars: usize,
    attachment_bytes: usize,
    truncated: bool,
}

impl PreparedRequest {
    fn text(prompt: String, content: &NormalizedContent) -> Self {
        Self {
            request: GenerationRequest::text(prompt),
            content_chars: content.char_count(),
            attachment_bytes: 0,
            truncated: content.truncated,
        }
    }

    fn with_settings(mut self, settings: licita_llm::GenerationSettings) -> Self {
        self.request = self.request.with_settings(settings);
        self
    }
}

/// Holds the in-flight flag for the duration of one import
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, ImportError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self { flag })
            .map_err(|_| ImportError::ImportInProgress)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
