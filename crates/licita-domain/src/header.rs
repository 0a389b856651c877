//! Record header fields

use serde::{Deserialize, Serialize};

/// Header of a procurement record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordHeader {
    /// Administrative process number, e.g. "068/2023"
    pub process_number: String,

    /// Bidding modality, e.g. "Pregão Eletrônico 010/2023"
    pub modality: String,

    /// Description of the procurement object
    pub object: String,

    /// Reference year
    pub year: String,
}
