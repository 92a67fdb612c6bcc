// src/render.rs

//! HTML preview of an ED01 draft.

use crate::catalog;
use crate::declaration::Ed01Draft;

const STYLE: &str = r#"<style>
  .ed01-container { font-family: "Segoe UI", system-ui, sans-serif; max-width: 980px; margin: 0 auto;
    border: 1px solid #d0d7de; background: #fff; padding: 16px 24px 32px 24px; color: #111827; }
  .ed01-header { display: flex; justify-content: space-between; align-items: flex-start; gap: 16px; margin-bottom: 12px; }
  .ed01-section-title { font-weight: 700; margin: 18px 0 10px 0; border-bottom: 1px solid #e5e7eb; padding-bottom: 6px; }
  table.ed01-table { width: 100%; border-collapse: collapse; font-size: 12px; }
  table.ed01-table th, table.ed01-table td { border: 1px solid #d1d5db; padding: 6px 8px; vertical-align: top; }
  table.ed01-table th { background: #f3f4f6; font-weight: 700; white-space: nowrap; }
  .muted { color: #6b7280; font-size: 11px; }
  .right { text-align: right; }
  .warn { color: #b45309; font-size: 11px; }
  .ed01-badge-demo { display: inline-block; padding: 2px 10px; border-radius: 999px; background: #facc15; font-size: 10px; font-weight: 800; margin-left: 8px; }
  .ed01-narrative { font-size: 11px; white-space: pre-wrap; background: #f9fafb; border: 1px solid #e5e7eb; padding: 10px 12px; border-radius: 6px; }
  .ed01-print-btn { margin-top: 12px; padding: 10px 16px; background: #2563eb; color: #fff; border-radius: 6px; border: none; cursor: pointer; font-size: 12px; font-weight: 600; }
  .ed01-footer-note { font-size: 10px; color: #6b7280; margin-top: 16px; }
</style>"#;

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn opt(value: &Option<String>) -> String {
    escape_html(value.as_deref().unwrap_or(""))
}

/// `1234567.891` with `decimals = 2` → `1,234,567.89`.
fn fmt_number(x: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, x.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if x < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Renders the declaration widget. `narrative` is shown verbatim (escaped)
/// in the notes section.
pub fn render_declaration(draft: &Ed01Draft, narrative: &str) -> String {
    let prec = draft.weights.precision as usize;
    let currency = escape_html(&draft.invoice.currency);

    let mut commodity_rows = String::new();
    let mut audit_rows = String::new();
    for (idx, it) in draft.items.iter().enumerate() {
        let info = &it.item.info;
        let weight = it
            .allocated_weight
            .map(|w| fmt_number(w, prec))
            .unwrap_or_else(|| "-".to_string());
        let quantity = format!("{} {}", fmt_number(it.item.quantity, 0), opt(&info.unit));

        commodity_rows.push_str(&format!(
            r#"
    <tr>
      <td>{n}</td>
      <td>{th}<br/><small>{en}</small></td>
      <td>{hs}<br/><small>{heading}</small></td>
      <td>{quantity}</td>
      <td class="right">{weight}</td>
      <td class="right">{price}</td>
      <td class="right">{value}</td>
    </tr>"#,
            n = idx + 1,
            th = opt(&info.description_th),
            en = opt(&info.description_en),
            hs = opt(&info.hs_code),
            heading = info
                .hs_code
                .as_deref()
                .and_then(catalog::heading_description)
                .unwrap_or(""),
            price = fmt_number(it.item.unit_price, 2),
            value = fmt_number(it.item.value(), 2),
        ));

        audit_rows.push_str(&format!(
            r#"
    <tr>
      <td>{n}</td>
      <td>{part}</td>
      <td>{hs}</td>
      <td>{quantity}</td>
      <td class="right">{weight}</td>
    </tr>"#,
            n = idx + 1,
            part = opt(&info.part_id),
            hs = opt(&info.hs_code),
        ));
    }

    let declared = fmt_number(draft.weights.declared_kg, prec);
    let allocated = fmt_number(draft.weights.allocated_kg, prec);
    let difference = fmt_number(draft.weights.difference_kg, prec);
    let taxes = &draft.taxes;
    let invoice_total = draft.invoice.total_amount.unwrap_or(taxes.customs_value);

    let warnings: String = draft
        .warnings
        .iter()
        .map(|w| format!(r#"<div class="warn">⚠ {}</div>"#, escape_html(w)))
        .collect();

    format!(
        r#"{STYLE}
<div class="ed01-container">

  <div class="ed01-header">
    <div>
      <div style="font-weight:800;font-size:18px;">ใบขนสินค้านำเข้า (ED01)</div>
      <div class="muted">Thai Customs Import Declaration — Demo Draft ({generated_on})</div>
    </div>
    <div class="right" style="font-size:11px;">
      <div><b>ใบขนเลขที่ (Declaration No.):</b> {number} <span class="ed01-badge-demo">DEMO</span></div>
      <div class="muted">Auto-generated (for demonstration only)</div>
    </div>
  </div>

  <div class="ed01-section-title">1) ข้อมูลคู่ค้า (Parties)</div>
  <table class="ed01-table">
    <tr><th>ผู้นำเข้า (Importer)</th><th>ผู้รับสินค้า (Consignee)</th><th>ผู้ส่งออก (Shipper)</th></tr>
    <tr><td>{importer}</td><td>{consignee}</td><td>{shipper}</td></tr>
  </table>

  <div class="ed01-section-title">2) ข้อมูลการขนส่ง (Transport Information)</div>
  <table class="ed01-table">
    <tr><th>เรือ / เที่ยวบิน (Vessel / Flight)</th><th>เลขที่ B/L หรือ AWB</th><th>ท่าเรือต้นทาง (Port of Loading)</th><th>ท่าเรือปลายทาง (Port of Discharge)</th><th>ประเทศกำเนิด (Country of Origin)</th></tr>
    <tr><td>{vessel}</td><td>{bl_no}</td><td>{port_loading}</td><td>{port_discharge}</td><td>{origin_country}</td></tr>
  </table>

  <div class="ed01-section-title">3) ข้อมูลใบกำกับสินค้า (Invoice Details)</div>
  <table class="ed01-table">
    <tr><th>Invoice No</th><th>Invoice Date</th><th>Incoterm</th><th>Currency</th><th>Total Amount</th></tr>
    <tr><td>{invoice_no}</td><td>{invoice_date}</td><td>{incoterm}</td><td>{currency}</td><td>{invoice_total} {currency}</td></tr>
  </table>

  <div class="ed01-section-title">4) รายการสินค้า (Commodity List)</div>
  <table class="ed01-table">
    <tr><th>ลำดับ</th><th>รายละเอียดสินค้า</th><th>HS Code</th><th>ปริมาณ</th><th>น้ำหนักจัดสรร (kg)</th><th>ราคาต่อหน่วย ({currency})</th><th>ราคารวม ({currency})</th></tr>{commodity_rows}
    <tr><td colspan="4" class="right"><b>Declared Gross Weight (kg)</b></td><td class="right"><b>{declared}</b></td><td colspan="2" class="muted">From packing list / shipment gross weight</td></tr>
    <tr><td colspan="4" class="right"><b>Allocated Total (kg)</b></td><td class="right"><b>{allocated}</b></td><td colspan="2" class="muted">Allocated across HS lines</td></tr>
    <tr><td colspan="4" class="right"><b>Difference (kg)</b></td><td class="right"><b>{difference}</b></td><td colspan="2" class="muted">Should be {zero} after reconciliation</td></tr>
  </table>
  {warnings}

  <div class="ed01-section-title">5) ค่าภาษี (Duty &amp; VAT Summary)</div>
  <table class="ed01-table">
    <tr><th>รายการ</th><th>จำนวนเงิน ({currency})</th><th>อัตรา</th></tr>
    <tr><td>มูลค่าศุลกากร (Customs Value)</td><td>{customs_value} {currency}</td><td>-</td></tr>
    <tr><td>อากรขาเข้า (Import Duty)</td><td>{duty} {currency}</td><td>{duty_rate:.1}%</td></tr>
    <tr><td>ภาษีมูลค่าเพิ่ม (VAT)</td><td>{vat} {currency}</td><td>{vat_rate:.1}%</td></tr>
    <tr><td><b>ภาษีรวมทั้งสิ้น (Total Taxes)</b></td><td><b>{total_taxes} {currency}</b></td><td>-</td></tr>
  </table>

  <div class="ed01-section-title">5b) การจัดสรรน้ำหนัก (Weight Allocation — Audit View)</div>
  <table class="ed01-table">
    <tr><th>ลำดับ</th><th>รหัสสินค้า (Part ID)</th><th>HS Code</th><th>ปริมาณ</th><th>น้ำหนักจัดสรร (kg)</th></tr>{audit_rows}
    <tr><td colspan="4" class="right"><b>Declared Weight (รวม)</b></td><td class="right"><b>{declared}</b></td></tr>
    <tr><td colspan="4" class="right"><b>Allocated Weight (รวม)</b></td><td class="right"><b>{allocated}</b></td></tr>
    <tr><td colspan="4" class="right"><b>Difference</b></td><td class="right"><b>{difference}</b></td></tr>
  </table>

  <div class="ed01-section-title">6) หมายเหตุ / ข้อความประกอบการสำแดง</div>
  <div class="ed01-narrative">{narrative}</div>

  <button class="ed01-print-btn" onclick="window.print()">ดาวน์โหลดเป็น PDF (Print / Save as PDF)</button>

  <div class="ed01-footer-note">
    * เอกสารนี้เป็นฉบับร่างจากระบบอัตโนมัติ ใช้เพื่อการสาธิตเท่านั้น ไม่สามารถนำไปยื่นต่อกรมศุลกากรได้จริง
  </div>
</div>
"#,
        generated_on = escape_html(&draft.generated_on),
        number = escape_html(&draft.declaration_number),
        importer = escape_html(&draft.parties.importer),
        consignee = escape_html(&draft.parties.consignee),
        shipper = escape_html(&draft.parties.shipper),
        vessel = opt(&draft.transport.vessel),
        bl_no = opt(&draft.transport.bl_no),
        port_loading = escape_html(&draft.transport.port_loading),
        port_discharge = escape_html(&draft.transport.port_discharge),
        origin_country = opt(&draft.transport.origin_country),
        invoice_no = opt(&draft.invoice.invoice_no),
        invoice_date = opt(&draft.invoice.invoice_date),
        incoterm = opt(&draft.invoice.incoterm),
        invoice_total = fmt_number(invoice_total, 2),
        zero = fmt_number(0.0, prec),
        customs_value = fmt_number(taxes.customs_value, 2),
        duty = fmt_number(taxes.import_duty, 2),
        duty_rate = taxes.duty_rate * 100.0,
        vat = fmt_number(taxes.vat, 2),
        vat_rate = taxes.vat_rate * 100.0,
        total_taxes = fmt_number(taxes.total_taxes, 2),
        narrative = escape_html(narrative),
    )
}
