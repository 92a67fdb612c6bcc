// src/declaration.rs

//! Assembles the ED01 draft from the uploaded documents or a structured
//! shipment payload.

use crate::allocation::{self, AllocatedItem, Allocation, AllocationMode, RawLineItem};
use crate::catalog;
use crate::config::Config;
use crate::error::AllocationError;
use crate::heuristics::{self, ParsedDocument};
use serde::Serialize;
use sha2::{Digest, Sha256};
use time::{Date, OffsetDateTime};
use tracing::{info, warn};

const MISSING_INVOICE: &str = "(No invoice text extracted)";
const MISSING_PACKING: &str = "(No packing list text extracted)";
const MISSING_TRANSPORT: &str = "(No transport document text extracted)";

/// Inputs for one draft.
#[derive(Debug, Clone, Default)]
pub struct DraftRequest {
    /// Catalog part ids to declare when the documents yield no line items.
    /// Empty means the whole catalog.
    pub selected_parts: Vec<String>,
    pub invoice_text: Option<String>,
    pub packing_text: Option<String>,
    pub transport_text: Option<String>,
    /// Structured shipment data; its fields win over anything parsed from
    /// the document texts.
    pub payload: Option<ParsedDocument>,
    /// Defaults to today (UTC).
    pub generated_on: Option<Date>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Document,
    Payload,
    Catalog,
    /// Sum of the per-line gross weights.
    LineWeights,
    Fallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct Parties {
    pub importer: String,
    pub consignee: String,
    pub shipper: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransportInfo {
    pub vessel: Option<String>,
    pub bl_no: Option<String>,
    pub port_loading: String,
    pub port_discharge: String,
    pub origin_country: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceDetails {
    pub invoice_no: Option<String>,
    pub invoice_date: Option<String>,
    pub currency: String,
    /// Grand total printed on the invoice, when it could be read.
    pub total_amount: Option<f64>,
    pub incoterm: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeightSummary {
    pub declared_kg: f64,
    pub declared_source: Source,
    pub allocated_kg: f64,
    pub difference_kg: f64,
    pub mode: AllocationMode,
    pub precision: u32,
    pub reconciled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaxSummary {
    pub customs_value: f64,
    pub duty_rate: f64,
    pub vat_rate: f64,
    pub import_duty: f64,
    pub vat: f64,
    pub total_taxes: f64,
}

impl TaxSummary {
    /// Duty on the customs value, VAT on value plus duty.
    pub fn compute(customs_value: f64, duty_rate: f64, vat_rate: f64) -> Self {
        let duty = customs_value * duty_rate;
        let vat = (customs_value + duty) * vat_rate;
        Self {
            customs_value: allocation::round_to(customs_value, 2),
            duty_rate,
            vat_rate,
            import_duty: allocation::round_to(duty, 2),
            vat: allocation::round_to(vat, 2),
            total_taxes: allocation::round_to(duty + vat, 2),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentTexts {
    pub invoice_text: String,
    pub packing_list_text: String,
    pub transport_doc_text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Ed01Draft {
    pub declaration_number: String,
    pub generated_on: String,
    pub parties: Parties,
    pub transport: TransportInfo,
    pub invoice: InvoiceDetails,
    pub item_source: Source,
    pub items: Vec<AllocatedItem>,
    pub weights: WeightSummary,
    pub taxes: TaxSummary,
    pub documents: DocumentTexts,
    pub warnings: Vec<String>,
}

/// Builds a draft. Fails only when strict validation rejects a line item.
pub fn build_draft(request: &DraftRequest, config: &Config) -> Result<Ed01Draft, AllocationError> {
    let defaults = &config.declaration;

    let parse = |text: &Option<String>| text.as_deref().map(heuristics::parse_document).unwrap_or_default();
    let merged = ParsedDocument::merge(
        parse(&request.invoice_text),
        parse(&request.packing_text),
        parse(&request.transport_text),
    );

    let (parsed, payload_items, payload_weight) = match &request.payload {
        Some(payload) => (
            payload.clone().overlay(merged),
            !payload.items.is_empty(),
            payload.gross_weight_kg.is_some_and(|w| w > 0.0),
        ),
        None => (merged, false, false),
    };

    let (raw_items, item_source): (Vec<RawLineItem>, Source) = if parsed.items.is_empty() {
        (
            catalog::selected_items(&request.selected_parts, defaults.demo_unit_price),
            Source::Catalog,
        )
    } else if payload_items {
        (parsed.items.clone(), Source::Payload)
    } else {
        (parsed.items.clone(), Source::Document)
    };

    let items = allocation::sanitize(&raw_items, config.allocation.validation)?;

    let line_weight_total: f64 = items.iter().filter_map(|i| i.line_weight).sum();
    let (declared_kg, declared_source) = match parsed.gross_weight_kg {
        Some(w) if w > 0.0 && payload_weight => (w, Source::Payload),
        Some(w) if w > 0.0 => (w, Source::Document),
        _ if line_weight_total > 0.0 => (line_weight_total, Source::LineWeights),
        _ => (defaults.fallback_total_weight_kg, Source::Fallback),
    };

    let allocation = allocation::allocate(&items, declared_kg, config.allocation.precision);
    let warnings = weight_warnings(&allocation);
    for w in &warnings {
        warn!(warning = %w, "Draft warning");
    }

    let customs_value: f64 = items.iter().map(|i| i.value()).sum();
    let taxes = TaxSummary::compute(customs_value, defaults.duty_rate, defaults.vat_rate);

    let weights = WeightSummary {
        declared_kg: allocation::round_to(declared_kg, allocation.precision),
        declared_source,
        allocated_kg: allocation.allocated_total,
        difference_kg: allocation.difference(),
        mode: allocation.mode,
        precision: allocation.precision,
        reconciled: allocation.is_reconciled(),
    };

    let generated_on = request
        .generated_on
        .unwrap_or_else(|| OffsetDateTime::now_utc().date());

    let draft = Ed01Draft {
        declaration_number: declaration_number(request),
        generated_on: generated_on.to_string(),
        parties: Parties {
            importer: defaults.importer_name.clone(),
            consignee: parsed.consignee.clone().unwrap_or_else(|| defaults.consignee_name.clone()),
            shipper: parsed.shipper.clone().unwrap_or_else(|| defaults.shipper_name.clone()),
        },
        transport: TransportInfo {
            vessel: parsed.vessel.clone(),
            bl_no: parsed.bl_no.clone(),
            port_loading: parsed.port_loading.clone().unwrap_or_else(|| defaults.port_loading.clone()),
            port_discharge: parsed
                .port_discharge
                .clone()
                .unwrap_or_else(|| defaults.port_discharge.clone()),
            origin_country: parsed.origin_country.clone(),
        },
        invoice: InvoiceDetails {
            invoice_no: parsed.invoice_no.clone(),
            invoice_date: parsed.invoice_date.clone(),
            currency: parsed.currency.clone().unwrap_or_else(|| defaults.currency.clone()),
            total_amount: parsed.total_amount,
            incoterm: parsed.incoterm.clone(),
        },
        item_source,
        items: allocation.items,
        weights,
        taxes,
        documents: DocumentTexts {
            invoice_text: request.invoice_text.clone().unwrap_or_else(|| MISSING_INVOICE.to_string()),
            packing_list_text: request.packing_text.clone().unwrap_or_else(|| MISSING_PACKING.to_string()),
            transport_doc_text: request
                .transport_text
                .clone()
                .unwrap_or_else(|| MISSING_TRANSPORT.to_string()),
        },
        warnings,
    };

    info!(
        declaration = %draft.declaration_number,
        items = draft.items.len(),
        item_source = ?draft.item_source,
        declared_kg = draft.weights.declared_kg,
        allocated_kg = draft.weights.allocated_kg,
        mode = ?draft.weights.mode,
        customs_value = draft.taxes.customs_value,
        "ED01 draft assembled"
    );

    Ok(draft)
}

fn weight_warnings(allocation: &Allocation) -> Vec<String> {
    let mut warnings = Vec::new();
    match allocation.mode {
        AllocationMode::Skipped => {
            warnings.push("No weight was allocated: no line items or no positive gross weight.".to_string())
        }
        AllocationMode::Direct if !allocation.is_reconciled() => warnings.push(format!(
            "Per-line weights total {:.prec$} kg but the declared gross weight is {:.prec$} kg.",
            allocation.allocated_total,
            allocation.declared_total,
            prec = allocation.precision as usize,
        )),
        _ => {}
    }
    warnings
}

/// `ED01-DRAFT-` plus the first 8 hex digits of a SHA-256 over the inputs;
/// the same documents always get the same number.
pub fn declaration_number(request: &DraftRequest) -> String {
    let mut hasher = Sha256::new();
    for text in [&request.invoice_text, &request.packing_text, &request.transport_text] {
        hasher.update(text.as_deref().unwrap_or_default().as_bytes());
        hasher.update([0u8]);
    }
    for part in &request.selected_parts {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    if let Some(payload) = &request.payload {
        hasher.update(serde_json::to_vec(payload).unwrap_or_default());
    }
    let digest = format!("{:x}", hasher.finalize());
    format!("ED01-DRAFT-{}", digest[..8].to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::ValidationMode;
    use time::Month;

    fn on_date() -> Option<Date> {
        Date::from_calendar_date(2026, Month::October, 18).ok()
    }

    #[test]
    fn catalog_draft_uses_fallback_weight() {
        let request = DraftRequest {
            selected_parts: vec!["P001".into(), "P004".into()],
            generated_on: on_date(),
            ..DraftRequest::default()
        };
        let draft = build_draft(&request, &Config::default()).unwrap();

        assert_eq!(draft.item_source, Source::Catalog);
        assert_eq!(draft.items.len(), 2);
        assert_eq!(draft.weights.declared_source, Source::Fallback);
        assert_eq!(draft.weights.declared_kg, 500.0);
        assert_eq!(draft.weights.allocated_kg, 500.0);
        assert_eq!(draft.weights.difference_kg, 0.0);
        assert!(draft.weights.reconciled);
        // values 2×100 and 4×100
        let weights: Vec<_> = draft.items.iter().map(|i| i.allocated_weight).collect();
        assert_eq!(weights, vec![Some(166.667), Some(333.333)]);
        assert_eq!(draft.generated_on, "2026-10-18");
        assert_eq!(draft.documents.invoice_text, MISSING_INVOICE);
    }

    #[test]
    fn tax_maths() {
        let taxes = TaxSummary::compute(600.0, 0.05, 0.07);
        assert_eq!(taxes.import_duty, 30.0);
        assert_eq!(taxes.vat, 44.1);
        assert_eq!(taxes.total_taxes, 74.1);
    }

    #[test]
    fn document_items_and_gross_weight_win() {
        let request = DraftRequest {
            invoice_text: Some(
                "Invoice No: INV-7\n8708.30.50  Brake pads  2  SET  100.00\n8421.31.00  Air filter  1  PCS  100.00\n"
                    .into(),
            ),
            transport_text: Some("B/L No: MAEU12345\nG.W.: 300 KGS\n".into()),
            generated_on: on_date(),
            ..DraftRequest::default()
        };
        let draft = build_draft(&request, &Config::default()).unwrap();

        assert_eq!(draft.item_source, Source::Document);
        assert_eq!(draft.invoice.invoice_no.as_deref(), Some("INV-7"));
        assert_eq!(draft.transport.bl_no.as_deref(), Some("MAEU12345"));
        assert_eq!(draft.weights.declared_source, Source::Document);
        let weights: Vec<_> = draft.items.iter().map(|i| i.allocated_weight).collect();
        assert_eq!(weights, vec![Some(200.0), Some(100.0)]);
        assert_eq!(draft.taxes.customs_value, 300.0);
    }

    #[test]
    fn direct_weight_divergence_is_warned() {
        let request = DraftRequest {
            transport_text: Some(
                "8708.80.35  Shock absorber  4  PCS  22.00  88.00  120.5 KG\n\
                 8708.91.00  Radiator  2  PCS  60.00  120.00  79.5 KG\n\
                 Gross Weight: 250 KG\n"
                    .into(),
            ),
            generated_on: on_date(),
            ..DraftRequest::default()
        };
        let draft = build_draft(&request, &Config::default()).unwrap();

        assert_eq!(draft.weights.mode, AllocationMode::Direct);
        assert_eq!(draft.weights.allocated_kg, 200.0);
        assert_eq!(draft.weights.difference_kg, -50.0);
        assert!(!draft.weights.reconciled);
        assert_eq!(draft.warnings.len(), 1);
        assert!(draft.warnings[0].contains("200.000"));
    }

    #[test]
    fn strict_mode_rejects_bad_invoice_json() {
        let mut config = Config::default();
        config.allocation.validation = ValidationMode::Strict;
        let request = DraftRequest {
            invoice_text: Some(r#"{"items": [{"description": "Seal", "quantity": "three", "unit_price": 4}]}"#.into()),
            ..DraftRequest::default()
        };
        assert!(build_draft(&request, &config).is_err());

        config.allocation.validation = ValidationMode::Permissive;
        let draft = build_draft(&request, &config).unwrap();
        assert_eq!(draft.weights.mode, AllocationMode::Equal);
        assert_eq!(draft.items[0].allocated_weight, Some(500.0));
    }

    const SHIPMENT: &str = r#"{
        "shipper": "Ningbo Auto Components Co., Ltd.",
        "consignee": "Siam Parts Trading Co., Ltd.",
        "invoice_no": "INV-88",
        "invoice_date": "2026-10-01",
        "currency": "USD",
        "incoterm": "CIF",
        "origin_country": "CN",
        "port_loading": "NINGBO, CN",
        "port_discharge": "LAEM CHABANG, TH",
        "items": [
            {"description": "Brake pads", "hs_code": "8708.30", "quantity": 10, "unit_price": 12.5, "gross_weight": 40},
            {"description": "Radiator", "hs_code": "8708.91", "quantity": 2, "unit_price": 60, "gross_weight": "35.5"}
        ]
    }"#;

    #[test]
    fn payload_draft_sums_line_weights() {
        let payload: ParsedDocument = serde_json::from_str(SHIPMENT).unwrap();
        let request = DraftRequest {
            payload: Some(payload),
            generated_on: on_date(),
            ..DraftRequest::default()
        };
        let draft = build_draft(&request, &Config::default()).unwrap();

        assert_eq!(draft.item_source, Source::Payload);
        assert_eq!(draft.parties.shipper, "Ningbo Auto Components Co., Ltd.");
        assert_eq!(draft.invoice.invoice_no.as_deref(), Some("INV-88"));
        assert_eq!(draft.invoice.incoterm.as_deref(), Some("CIF"));
        assert_eq!(draft.transport.origin_country.as_deref(), Some("CN"));
        assert_eq!(draft.transport.port_loading, "NINGBO, CN");

        assert_eq!(draft.weights.declared_source, Source::LineWeights);
        assert_eq!(draft.weights.declared_kg, 75.5);
        assert_eq!(draft.weights.mode, AllocationMode::Direct);
        assert!(draft.weights.reconciled);
        assert!(draft.warnings.is_empty());
        let weights: Vec<_> = draft.items.iter().map(|i| i.allocated_weight).collect();
        assert_eq!(weights, vec![Some(40.0), Some(35.5)]);

        // 125 + 120
        assert_eq!(draft.taxes.customs_value, 245.0);
        assert_eq!(draft.taxes.import_duty, 12.25);
    }

    #[test]
    fn payload_overrides_parsed_text() {
        let payload = ParsedDocument {
            invoice_no: Some("PAY-1".into()),
            gross_weight_kg: Some(90.0),
            ..ParsedDocument::default()
        };
        let request = DraftRequest {
            invoice_text: Some(
                "Invoice No: INV-7\nTerms: FOB\n8708.30.50  Brake pads  2  SET  100.00\n8421.31.00  Air filter  1  PCS  100.00\n"
                    .into(),
            ),
            transport_text: Some("G.W.: 300 KGS\n".into()),
            payload: Some(payload),
            generated_on: on_date(),
            ..DraftRequest::default()
        };
        let draft = build_draft(&request, &Config::default()).unwrap();

        assert_eq!(draft.invoice.invoice_no.as_deref(), Some("PAY-1"));
        assert_eq!(draft.invoice.incoterm.as_deref(), Some("FOB"));
        assert_eq!(draft.item_source, Source::Document);
        assert_eq!(draft.weights.declared_source, Source::Payload);
        let weights: Vec<_> = draft.items.iter().map(|i| i.allocated_weight).collect();
        assert_eq!(weights, vec![Some(60.0), Some(30.0)]);
    }

    #[test]
    fn declaration_number_is_stable() {
        let a = DraftRequest {
            invoice_text: Some("abc".into()),
            ..DraftRequest::default()
        };
        let b = DraftRequest {
            packing_text: Some("abc".into()),
            ..DraftRequest::default()
        };
        assert_eq!(declaration_number(&a), declaration_number(&a.clone()));
        assert_ne!(declaration_number(&a), declaration_number(&b));
        assert!(declaration_number(&a).starts_with("ED01-DRAFT-"));
        assert_eq!(declaration_number(&a).len(), "ED01-DRAFT-".len() + 8);
    }
}
