//! Prompt engineering for procurement extraction

/// Builds the extraction prompt for one upload
pub struct PromptBuilder {
    kind: PromptKind,
    content: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptKind {
    Tabular,
    Document,
}

impl PromptBuilder {
    /// Prompt for CSV-serialized sheets
    pub fn tabular(content: impl Into<String>) -> Self {
        Self {
            kind: PromptKind::Tabular,
            content: Some(content.into()),
        }
    }

    /// Prompt for a document sent as an attachment
    pub fn document() -> Self {
        Self {
            kind: PromptKind::Document,
            content: None,
        }
    }

    /// Prompt for a document sent as extracted page text
    pub fn document_text(content: impl Into<String>) -> Self {
        Self {
            kind: PromptKind::Document,
            content: Some(content.into()),
        }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. Task and rules
        prompt.push_str(match self.kind {
            PromptKind::Tabular => TABULAR_INSTRUCTIONS,
            PromptKind::Document => DOCUMENT_INSTRUCTIONS,
        });
        prompt.push_str("\n\n");

        // 2. Target schema
        prompt.push_str("Required JSON structure:\n");
        prompt.push_str(match self.kind {
            PromptKind::Tabular => TABULAR_SCHEMA,
            PromptKind::Document => DOCUMENT_SCHEMA,
        });
        prompt.push_str("\n\n");

        // 3. Inline content, if not attached
        if let Some(content) = &self.content {
            prompt.push_str(match self.kind {
                PromptKind::Tabular => "CSV DATA:\n",
                PromptKind::Document => "DOCUMENT TEXT:\n",
            });
            prompt.push_str("---\n");
            prompt.push_str(content);
            prompt.push_str("\n---\n\n");
        }

        prompt.push_str(OUTPUT_FORMAT_REMINDER);
        prompt
    }
}

const TABULAR_INSTRUCTIONS: &str = r#"You are an expert in public procurement data.
Analyze the CSV data below, extracted from a spreadsheet with one or more sheets.
Each sheet starts with a line "--- SHEET: <name> ---".

GOAL: extract and consolidate ALL items from ALL sheets into a single JSON object.

Rules:
1. Identify the lot from the sheet name or the headers (e.g. "Table 1" -> "Lote 1").
2. Ignore empty rows and repeated header rows.
3. Map columns to: description, brand, unit, quantity, unit price.
4. If a quantity or price contains symbols (R$, thousands dots), convert it to a plain number (e.g. 1050.50).
5. Do NOT add comments."#;

const DOCUMENT_INSTRUCTIONS: &str = r#"Extract the data of this price registration record (Ata de Registro de Preços).
Identify the process number, the bidding modality, the object, the year, the supplier (name and CNPJ)
and the LIST OF ITEMS with lot, item number, description, brand, unit, quantity and unit price.
Pages, when given as text, start with a line "--- PAGE <n> ---"."#;

const TABULAR_SCHEMA: &str = r#"{
  "processNumber": "string",
  "supplierName": "string",
  "items": [
    {
      "lote": "string",
      "itemNumber": number,
      "description": "string",
      "brand": "string",
      "unit": "string",
      "quantity": number,
      "unitPrice": number,
      "totalPrice": number
    }
  ]
}"#;

const DOCUMENT_SCHEMA: &str = r#"{
  "processNumber": "string",
  "modality": "string",
  "object": "string",
  "year": "string",
  "supplierName": "string",
  "supplierIdentifier": "string (CNPJ)",
  "items": [
    { "lote": "string", "itemNumber": number, "description": "string", "brand": "string", "unit": "string", "quantity": number, "unitPrice": number, "totalPrice": number }
  ]
}"#;

const OUTPUT_FORMAT_REMINDER: &str = "Return ONLY valid JSON, no additional text.";
