// src/heuristics/mod.rs

mod embedded;
mod generic;

use crate::allocation::RawLineItem;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Everything we can pull out of one trade document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedDocument {
    pub invoice_no: Option<String>,
    pub invoice_date: Option<String>,
    pub currency: Option<String>,
    pub total_amount: Option<f64>,
    /// Delivery term, e.g. `FOB` or `CIF`.
    pub incoterm: Option<String>,
    pub origin_country: Option<String>,
    pub shipper: Option<String>,
    pub consignee: Option<String>,
    pub bl_no: Option<String>,
    pub vessel: Option<String>,
    pub port_loading: Option<String>,
    pub port_discharge: Option<String>,
    pub gross_weight_kg: Option<f64>,
    pub items: Vec<RawLineItem>,
}

impl ParsedDocument {
    /// How many scalar fields were filled (out of the total).
    pub fn coverage(&self) -> (usize, usize) {
        let total = 13;
        let filled = [
            self.invoice_no.is_some(),
            self.invoice_date.is_some(),
            self.currency.is_some(),
            self.total_amount.is_some(),
            self.incoterm.is_some(),
            self.origin_country.is_some(),
            self.shipper.is_some(),
            self.consignee.is_some(),
            self.bl_no.is_some(),
            self.vessel.is_some(),
            self.port_loading.is_some(),
            self.port_discharge.is_some(),
            self.gross_weight_kg.is_some(),
        ]
        .iter()
        .filter(|&&v| v)
        .count();
        (filled, total)
    }

    pub fn is_empty(&self) -> bool {
        self.coverage().0 == 0 && self.items.is_empty()
    }

    /// Combines the three uploaded documents into one view.
    ///
    /// Commercial fields prefer the invoice, shipping fields and the gross
    /// weight prefer the transport document. Line items come from the first
    /// document that has any, in invoice, packing, transport order.
    pub fn merge(invoice: Self, packing: Self, transport: Self) -> Self {
        fn first<T>(a: Option<T>, b: Option<T>, c: Option<T>) -> Option<T> {
            a.or(b).or(c)
        }

        let items = [invoice.items, packing.items, transport.items]
            .into_iter()
            .find(|items| !items.is_empty())
            .unwrap_or_default();

        Self {
            invoice_no: first(invoice.invoice_no, packing.invoice_no, transport.invoice_no),
            invoice_date: first(invoice.invoice_date, packing.invoice_date, transport.invoice_date),
            currency: first(invoice.currency, packing.currency, transport.currency),
            total_amount: first(invoice.total_amount, packing.total_amount, transport.total_amount),
            incoterm: first(invoice.incoterm, packing.incoterm, transport.incoterm),
            origin_country: first(
                invoice.origin_country,
                packing.origin_country,
                transport.origin_country,
            ),
            shipper: first(invoice.shipper, transport.shipper, packing.shipper),
            consignee: first(invoice.consignee, transport.consignee, packing.consignee),
            bl_no: first(transport.bl_no, packing.bl_no, invoice.bl_no),
            vessel: first(transport.vessel, packing.vessel, invoice.vessel),
            port_loading: first(transport.port_loading, packing.port_loading, invoice.port_loading),
            port_discharge: first(
                transport.port_discharge,
                packing.port_discharge,
                invoice.port_discharge,
            ),
            gross_weight_kg: first(
                transport.gross_weight_kg,
                packing.gross_weight_kg,
                invoice.gross_weight_kg,
            ),
            items,
        }
    }

    /// Fields of `self` win; gaps are filled from `fallback`. Line items are
    /// taken whole from whichever side has any, `self` first.
    pub fn overlay(self, fallback: Self) -> Self {
        Self {
            invoice_no: self.invoice_no.or(fallback.invoice_no),
            invoice_date: self.invoice_date.or(fallback.invoice_date),
            currency: self.currency.or(fallback.currency),
            total_amount: self.total_amount.or(fallback.total_amount),
            incoterm: self.incoterm.or(fallback.incoterm),
            origin_country: self.origin_country.or(fallback.origin_country),
            shipper: self.shipper.or(fallback.shipper),
            consignee: self.consignee.or(fallback.consignee),
            bl_no: self.bl_no.or(fallback.bl_no),
            vessel: self.vessel.or(fallback.vessel),
            port_loading: self.port_loading.or(fallback.port_loading),
            port_discharge: self.port_discharge.or(fallback.port_discharge),
            gross_weight_kg: self.gross_weight_kg.or(fallback.gross_weight_kg),
            items: if self.items.is_empty() { fallback.items } else { self.items },
        }
    }
}

/// Parse one document's text: an embedded JSON block wins, otherwise the
/// keyword-anchored regex extractors run.
pub fn parse_document(text: &str) -> ParsedDocument {
    if let Some(doc) = embedded::extract(text) {
        let (filled, total) = doc.coverage();
        info!(filled, total, items = doc.items.len(), "Parsed embedded JSON block");
        return doc;
    }

    let doc = generic::extract(text);
    let (filled, total) = doc.coverage();
    info!(filled, total, items = doc.items.len(), "Parsed document with regex heuristics");
    doc
}
