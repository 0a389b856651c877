//! Progress reporting during an import

/// Stages of an import, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStage {
    /// Detecting and decoding the upload
    ReadingFile,
    /// Serializing sheets (spreadsheets only)
    ReadingSheets,
    /// Waiting on the extraction service
    Analyzing,
    /// Repairing, normalizing and resolving
    ProcessingResponse,
    /// Finished
    Done,
}

impl ImportStage {
    /// User-facing label
    pub fn label(&self) -> &'static str {
        match self {
            ImportStage::ReadingFile => "Reading file...",
            ImportStage::ReadingSheets => "Reading sheets...",
            ImportStage::Analyzing => "Analyzing content (this may take a while)...",
            ImportStage::ProcessingResponse => "Processing response...",
            ImportStage::Done => "Done",
        }
    }
}

/// Receiver of free-text progress labels
pub trait ProgressSink: Send + Sync {
    /// Report the current label
    fn report(&self, label: &str);
}

impl<F> ProgressSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn report(&self, label: &str) {
        self(label)
    }
}

/// Sink that drops every label
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _label: &str) {}
}
