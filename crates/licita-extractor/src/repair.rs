//! Recover a structured extraction from raw, possibly truncated, response text
//!
//! The service is asked for JSON, but long documents regularly hit the output
//! ceiling mid-item. Recovery is an ordered chain of increasingly permissive
//! steps; each is a pure function from text to an optional JSON object, and
//! the first success wins. The salvage steps keep every item that closed
//! before the cut and drop the incomplete one.

use crate::ImportError;
use serde_json::Value;
use tracing::{debug, warn};

/// Key introducing the items collection
const ITEMS_KEY: &str = "\"items\"";

/// Characters of raw text kept for diagnostics
const PREVIEW_CHARS: usize = 500;

/// The step that produced a repaired value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepairStep {
    /// Strict parse after stripping code fences
    Strict,
    /// Parse of the text between the first `{` and the last `}`
    Enclosed,
    /// Cut at the last `}` after the items key, then close the array and object
    ClosedItems,
    /// Cut at the last complete item followed by a separator, then close
    CutAtLastItem,
}

impl RepairStep {
    /// Label used in logs and metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            RepairStep::Strict => "strict",
            RepairStep::Enclosed => "enclosed",
            RepairStep::ClosedItems => "closed-items",
            RepairStep::CutAtLastItem => "cut-at-last-item",
        }
    }

    /// Whether the response parsed without any salvage
    pub fn is_clean(&self) -> bool {
        matches!(self, RepairStep::Strict)
    }
}

impl std::fmt::Display for RepairStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recovered JSON object and the step that recovered it
#[derive(Debug, Clone, PartialEq)]
pub struct Repaired {
    /// The recovered root object
    pub value: Value,

    /// Step that succeeded
    pub step: RepairStep,
}

type RepairFn = fn(&str) -> Option<Value>;

const CHAIN: [(RepairStep, RepairFn); 4] = [
    (RepairStep::Strict, parse_strict),
    (RepairStep::Enclosed, parse_enclosed),
    (RepairStep::ClosedItems, close_items),
    (RepairStep::CutAtLastItem, cut_at_last_item),
];

/// Run the repair chain over a raw response
///
/// # Errors
///
/// `UnparsableResponse` when every step fails; no partial result is returned.
///
/// # Examples
///
/// ```
/// use licita_extractor::{repair, RepairStep};
///
/// let raw = r#"{"items":[{"description":"A","quantity":2},{"descr"#;
/// let repaired = repair(raw).unwrap();
/// assert_eq!(repaired.step, RepairStep::ClosedItems);
/// assert_eq!(repaired.value["items"].as_array().map(Vec::len), Some(1));
/// ```
pub fn repair(raw: &str) -> Result<Repaired, ImportError> {
    let cleaned = strip_fences(raw);

    for (step, attempt) in CHAIN {
        if let Some(value) = attempt(&cleaned) {
            if !step.is_clean() {
                debug!(step = %step, "Response recovered by repair");
            }
            return Ok(Repaired { value, step });
        }
    }

    let preview: String = raw.chars().take(PREVIEW_CHARS).collect();
    warn!(raw_len = raw.len(), preview = %preview, "Response could not be repaired");
    Err(ImportError::UnparsableResponse { preview })
}

/// Remove every code fence marker and surrounding whitespace
fn strip_fences(raw: &str) -> String {
    raw.replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

fn parse_object(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text)
        .ok()
        .filter(Value::is_object)
}

fn parse_strict(text: &str) -> Option<Value> {
    parse_object(text)
}

fn parse_enclosed(text: &str) -> Option<Value> {
    let first = text.find('{')?;
    let last = text.rfind('}')?;
    if last <= first {
        return None;
    }
    parse_object(&text[first..=last])
}

fn close_items(text: &str) -> Option<Value> {
    let key = text.find(ITEMS_KEY)?;
    let last = text.rfind('}').filter(|&last| last > key)?;
    let start = text.find('{').unwrap_or(0);
    if start > last {
        return None;
    }

    let mut fixed = text[start..=last].to_string();
    if !text[key..=last].contains(']') {
        fixed.push(']');
    }
    if !fixed.ends_with('}') {
        fixed.push('}');
    }
    parse_object(&fixed)
}

fn cut_at_last_item(text: &str) -> Option<Value> {
    let key = text.find(ITEMS_KEY)?;
    let cut = last_item_separator(text, key)?;
    let start = text.find('{').unwrap_or(0);
    if start > cut {
        return None;
    }

    let mut fixed = text[start..=cut].to_string();
    fixed.push_str("]}");
    parse_object(&fixed)
}

/// Position of the last `}` after `from` that is followed by optional whitespace and `,`
fn last_item_separator(text: &str, from: usize) -> Option<usize> {
    text.rmatch_indices('}')
        .map(|(index, _)| index)
        .take_while(|&index| index > from)
        .find(|&index| text[index + 1..].trim_start().starts_with(','))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use proptest::sample::Index;
    use serde_json::json;

    fn item_json(description: &str, quantity: u32, unit_price: u32) -> String {
        json!({
            "description": description,
            "quantity": quantity,
            "unitPrice": unit_price,
        })
        .to_string()
    }

    proptest! {
        /// A response cut inside item N+1 recovers exactly the first N items
        #[test]
        fn test_truncation_recovers_complete_items(
            items in proptest::collection::vec(("[a-zA-Z0-9 ]{0,12}", 0u32..1000, 0u32..1000), 2..8),
            split in any::<Index>(),
            cut in any::<Index>(),
        ) {
            let rendered: Vec<String> = items
                .iter()
                .map(|(d, q, p)| item_json(d, *q, *p))
                .collect();
            let complete = 1 + split.index(rendered.len() - 1);
            let partial = &rendered[complete];
            let partial = &partial[..cut.index(partial.len())];

            let raw = format!(
                "{{\"processNumber\":\"P\",\"items\":[{},{}",
                rendered[..complete].join(","),
                partial
            );

            let repaired = repair(&raw).unwrap();
            let recovered = repaired.value["items"].as_array().cloned().unwrap_or_default();
            prop_assert_eq!(recovered.len(), complete);
            for (value, text) in recovered.iter().zip(&rendered) {
                let expected: Value = serde_json::from_str(text).unwrap();
                prop_assert_eq!(value, &expected);
            }
        }

        /// Any serialized object parses in the strict step unchanged
        #[test]
        fn test_strict_round_trip(
            process in "[a-zA-Z0-9/ ]{0,20}",
            quantities in proptest::collection::vec(0u32..10_000, 0..6),
        ) {
            let value = json!({
                "processNumber": process,
                "items": quantities.iter().map(|q| json!({"quantity": q})).collect::<Vec<_>>(),
            });
            let repaired = repair(&value.to_string()).unwrap();
            prop_assert_eq!(repaired.step, RepairStep::Strict);
            prop_assert_eq!(repaired.value, value);
        }
    }
}
