// src/catalog.rs

//! Demo auto-parts catalog, used when no invoice lines could be parsed.

use crate::allocation::{ItemInfo, RawLineItem};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogPart {
    pub part_id: &'static str,
    pub description_en: &'static str,
    pub description_th: &'static str,
    pub hs_code: &'static str,
    pub default_quantity: u32,
    pub unit: &'static str,
}

impl CatalogPart {
    /// A raw line for this part at the given demo price.
    pub fn to_raw_item(&self, unit_price: f64) -> RawLineItem {
        RawLineItem {
            info: ItemInfo {
                part_id: Some(self.part_id.to_string()),
                description_en: Some(self.description_en.to_string()),
                description_th: Some(self.description_th.to_string()),
                hs_code: Some(self.hs_code.to_string()),
                unit: Some(self.unit.to_string()),
            },
            quantity: Some(f64::from(self.default_quantity).into()),
            unit_price: Some(unit_price.into()),
            line_weight: None,
        }
    }
}

const fn part(
    part_id: &'static str,
    description_en: &'static str,
    description_th: &'static str,
    hs_code: &'static str,
    default_quantity: u32,
    unit: &'static str,
) -> CatalogPart {
    CatalogPart {
        part_id,
        description_en,
        description_th,
        hs_code,
        default_quantity,
        unit,
    }
}

pub static DEMO_PARTS: [CatalogPart; 10] = [
    part("P001", "Front brake pads", "ผ้าเบรกหน้า", "8708.30.50", 2, "set"),
    part("P002", "Air filter", "ไส้กรองอากาศ", "8421.31.00", 1, "piece"),
    part("P003", "Oil filter", "ไส้กรองน้ำมันเครื่อง", "8421.23.00", 1, "piece"),
    part("P004", "Spark plugs", "หัวเทียน", "8511.10.00", 4, "piece"),
    part("P005", "Front shock absorber", "โช้คอัพหน้า", "8708.80.35", 2, "piece"),
    part("P006", "Timing belt", "สายพานไทม์มิ่ง", "4010.36.00", 1, "piece"),
    part("P007", "Oil seal", "ซีลน้ำมัน", "8484.20.00", 3, "piece"),
    part("P008", "Fuel pump", "ปั๊มน้ำมันเชื้อเพลิง", "8413.30.10", 1, "piece"),
    part("P009", "Radiator", "หม้อน้ำรถยนต์", "8708.91.00", 1, "piece"),
    part("P010", "Starter motor", "มอเตอร์สตาร์ท", "8511.40.20", 1, "piece"),
];

/// Six-digit HS headings covered by the catalog. Reference only; no codes
/// are validated against it.
const HS_HEADINGS: [(&str, &str); 10] = [
    ("8708.30", "Brakes and brake parts"),
    ("8421.31", "Air filters for internal combustion engines"),
    ("8421.23", "Oil filters for internal combustion engines"),
    ("8511.10", "Spark plugs"),
    ("8708.80", "Shock absorbers"),
    ("4010.36", "Transmission belts, timing belts"),
    ("8484.20", "Mechanical seals"),
    ("8413.30", "Fuel pumps for engines"),
    ("8708.91", "Radiators"),
    ("8511.40", "Starter motors"),
];

pub fn find_part(part_id: &str) -> Option<&'static CatalogPart> {
    DEMO_PARTS
        .iter()
        .find(|p| p.part_id.eq_ignore_ascii_case(part_id.trim()))
}

/// Description of the `NNNN.NN` heading that `hs_code` falls under.
pub fn heading_description(hs_code: &str) -> Option<&'static str> {
    let heading = hs_code.trim().get(..7)?;
    HS_HEADINGS
        .iter()
        .find(|(code, _)| *code == heading)
        .map(|(_, desc)| *desc)
}

/// Raw lines for the selected part ids, or the whole catalog when none are
/// given. Unknown ids are skipped.
pub fn selected_items(part_ids: &[String], unit_price: f64) -> Vec<RawLineItem> {
    if part_ids.is_empty() {
        return DEMO_PARTS.iter().map(|p| p.to_raw_item(unit_price)).collect();
    }
    part_ids
        .iter()
        .filter_map(|id| {
            let found = find_part(id);
            if found.is_none() {
                tracing::warn!(part_id = %id, "Unknown catalog part — skipping");
            }
            found
        })
        .map(|p| p.to_raw_item(unit_price))
        .collect()
}
