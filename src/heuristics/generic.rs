use super::ParsedDocument;
use crate::allocation::{ItemInfo, RawLineItem, RawNumber};
use regex::Regex;

/// Main extraction entry point: uses keyword-anchored regex patterns.
pub fn extract(text: &str) -> ParsedDocument {
    ParsedDocument {
        invoice_no: extract_invoice_no(text),
        invoice_date: extract_invoice_date(text),
        currency: extract_currency(text),
        total_amount: extract_total_amount(text),
        incoterm: extract_incoterm(text),
        origin_country: extract_labelled_line(text, r"(?:Country\s+of\s+)?Origin"),
        shipper: extract_labelled_line(text, r"Shipper|Exporter|Seller"),
        consignee: extract_labelled_line(text, r"Consignee|Buyer|Importer"),
        bl_no: extract_bl_no(text),
        vessel: extract_labelled_line(text, r"Vessel(?:\s*/\s*Voy(?:age)?\.?)?|Flight(?:\s+No\.?)?"),
        port_loading: extract_labelled_line(text, r"Port\s+of\s+Loading"),
        port_discharge: extract_labelled_line(text, r"Port\s+of\s+Discharge"),
        gross_weight_kg: extract_gross_weight(text),
        items: extract_line_items(text),
    }
}

// ---------------------------------------------------------------------------
// Scalar field extractors
// ---------------------------------------------------------------------------

fn parse_amount(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse::<f64>().ok()
}

fn extract_invoice_no(text: &str) -> Option<String> {
    // Matches "Invoice No." or "Invoice No" followed by optional punctuation then the value
    let re = Regex::new(r"(?i)Invoice\s+No\.?\s*:?\s*([A-Za-z0-9\-/]+)").ok()?;
    re.captures(text).map(|c| c[1].trim().to_string())
}

fn extract_invoice_date(text: &str) -> Option<String> {
    // "February 16, 2026", "16/02/2026" or "2026-02-16"
    let re = Regex::new(
        r"(?i)(?:Invoice\s+)?Date\s*:?\s*([A-Za-z]+\s+\d{1,2},?\s+\d{4}|\d{1,2}[/\-.]\d{1,2}[/\-.]\d{2,4}|\d{4}-\d{2}-\d{2})",
    )
    .ok()?;
    re.captures(text).map(|c| c[1].trim().to_string())
}

fn extract_currency(text: &str) -> Option<String> {
    let re = Regex::new(r"(?i)(US\$|\b(?:USD|SGD|EUR|GBP|THB|JPY|CNY)\b)").ok()?;
    let cap = re.captures(text)?;
    let raw = cap[1].to_uppercase();
    // Normalise "US$" → "USD"
    Some(if raw == "US$" { "USD".to_string() } else { raw })
}

fn extract_total_amount(text: &str) -> Option<f64> {
    // Last "TOTAL <number>" wins; earlier ones are usually sub-totals.
    let re = Regex::new(
        r"(?i)\b(?:GRAND\s+)?TOTAL(?:\s+(?:AMOUNT|VALUE))?\s*:?\s*(?:US\$|USD|SGD|EUR|THB|CNY)?\s*(\d[\d,]*\.?\d*)",
    )
    .ok()?;
    re.captures_iter(text)
        .filter_map(|cap| parse_amount(&cap[1]))
        .last()
}

fn extract_incoterm(text: &str) -> Option<String> {
    let re = Regex::new(r"(?i)\b(EXW|FCA|FAS|FOB|CFR|CIF|CPT|CIP|DAP|DPU|DDP)\b").ok()?;
    re.captures(text).map(|c| c[1].to_uppercase())
}

/// `<label> : value` on a single line.
fn extract_labelled_line(text: &str, label: &str) -> Option<String> {
    let re = Regex::new(&format!(r"(?im)^\s*(?:{label})\s*:\s*(.+?)\s*$")).ok()?;
    re.captures(text)
        .map(|c| c[1].to_string())
        .filter(|v| !v.is_empty())
}

fn extract_bl_no(text: &str) -> Option<String> {
    let re = Regex::new(
        r"(?i)\b(?:B/L|Bill\s+of\s+Lading|AWB|Air\s*Waybill)\s*(?:No\.?|Number|#)?\s*:?\s*([A-Z0-9][A-Z0-9\-/]{3,})",
    )
    .ok()?;
    re.captures(text).map(|c| c[1].trim().to_uppercase())
}

fn extract_gross_weight(text: &str) -> Option<f64> {
    // "G.W.: 512.5 KGS", "Gross Weight (KG) 1,024", "TOTAL GROSS WT 88 kg".
    // The last figure is normally the shipment total.
    let re = Regex::new(
        r"(?i)(?:G\.\s*W\.?|Gross\s+(?:Weight|Wt\.?))\s*(?:\(\s*KGS?\s*\))?\s*:?\s*(\d[\d,]*\.?\d*)",
    )
    .ok()?;
    re.captures_iter(text)
        .filter_map(|cap| parse_amount(&cap[1]))
        .filter(|w| *w > 0.0)
        .last()
}

// ---------------------------------------------------------------------------
// Line items extraction
// ---------------------------------------------------------------------------

/// Rows shaped like
/// `8708.30.50  Front brake pads  2  SET  45.00  90.00  12.5 KG`
/// (HS code, description, quantity, unit, unit price, optional amount,
/// optional per-line weight).
fn extract_line_items(text: &str) -> Vec<RawLineItem> {
    let Ok(row_re) = Regex::new(
        r"(?i)^(\d{4}\.\d{2}(?:\.\d{2})?)\s+(.+?)\s+(\d[\d,]*(?:\.\d+)?)\s+([A-Z]{2,6})\s+(\d[\d,]*\.\d{2})(?:\s+\d[\d,]*\.\d{2})?(?:\s+(\d[\d,]*(?:\.\d+)?)\s*KGS?)?$",
    ) else {
        return Vec::new();
    };

    text.lines()
        .map(str::trim)
        .filter_map(|line| row_re.captures(line))
        .map(|cap| RawLineItem {
            info: ItemInfo {
                hs_code: Some(cap[1].to_string()),
                description_en: Some(cap[2].trim().to_string()),
                unit: Some(cap[4].to_lowercase()),
                ..ItemInfo::default()
            },
            quantity: Some(RawNumber::Text(cap[3].to_string())),
            unit_price: Some(RawNumber::Text(cap[5].to_string())),
            line_weight: cap.get(6).map(|m| RawNumber::Text(m.as_str().to_string())),
        })
        .collect()
}
