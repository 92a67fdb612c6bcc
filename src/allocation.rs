// src/allocation.rs

//! Apportions a shipment's declared gross weight across commodity lines.
//!
//! Shares follow customs value (quantity × unit price), then quantity, then an
//! equal split. Every share is rounded to a fixed number of decimals and the
//! rounding residual is pushed onto a single line, so the rounded weights add
//! up to the declared total exactly. Reconciliation runs on integer units of
//! `10^-precision` to keep that equality exact instead of approximate.

use crate::error::{AllocationError, NumericField};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Decimal places used when the caller has no configured precision.
pub const DEFAULT_PRECISION: u32 = 3;

/// Upper bound on precision; beyond this the unit arithmetic loses headroom.
const MAX_PRECISION: u32 = 6;

/// Largest total or per-line weight (kg) taken at face value. Larger inputs
/// are clamped so `10^MAX_PRECISION`-scaled sums stay well inside `i128`.
pub const MAX_WEIGHT_KG: f64 = 1.0e18;

/// How `sanitize` treats numeric fields it cannot use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Reject non-numeric, non-finite or negative values.
    Strict,
    /// Treat them as zero.
    #[default]
    Permissive,
}

/// A numeric field as it arrives from a parser or a JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl RawNumber {
    /// Best-effort numeric reading. Thousands separators are accepted; a
    /// blank string is not a number.
    pub fn parse(&self) -> Option<f64> {
        match self {
            RawNumber::Number(n) => Some(*n),
            RawNumber::Text(s) => {
                let cleaned: String = s.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
                if cleaned.is_empty() {
                    None
                } else {
                    cleaned.parse::<f64>().ok()
                }
            }
            RawNumber::Other(_) => None,
        }
    }
}

impl std::fmt::Display for RawNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawNumber::Number(n) => write!(f, "{n}"),
            RawNumber::Text(s) => f.write_str(s),
            RawNumber::Other(v) => write!(f, "{v}"),
        }
    }
}

impl From<f64> for RawNumber {
    fn from(n: f64) -> Self {
        RawNumber::Number(n)
    }
}

/// Identity fields carried through allocation untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_id: Option<String>,
    #[serde(default, alias = "description", skip_serializing_if = "Option::is_none")]
    pub description_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_th: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hs_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// An unsanitized commodity line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLineItem {
    #[serde(flatten)]
    pub info: ItemInfo,
    #[serde(default, alias = "qty")]
    pub quantity: Option<RawNumber>,
    #[serde(default, alias = "price")]
    pub unit_price: Option<RawNumber>,
    #[serde(default, alias = "gross_weight")]
    pub line_weight: Option<RawNumber>,
}

/// A commodity line ready for allocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(flatten)]
    pub info: ItemInfo,
    pub quantity: f64,
    pub unit_price: f64,
    /// Per-line gross weight declared on the transport document, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_weight: Option<f64>,
}

impl LineItem {
    /// Customs value of the line; unusable inputs count as zero.
    pub fn value(&self) -> f64 {
        non_negative(self.quantity) * non_negative(self.unit_price)
    }
}

/// A line annotated with its share of the shipment weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocatedItem {
    #[serde(flatten)]
    pub item: LineItem,
    /// `None` when allocation was skipped.
    pub allocated_weight: Option<f64>,
}

/// Which basis produced the allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationMode {
    /// Empty items or a non-positive total; nothing was allocated.
    Skipped,
    /// Every line declared its own weight.
    Direct,
    Value,
    Quantity,
    Equal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Allocation {
    pub items: Vec<AllocatedItem>,
    pub mode: AllocationMode,
    pub precision: u32,
    pub declared_total: f64,
    pub allocated_total: f64,
    #[serde(skip)]
    declared_units: i128,
    #[serde(skip)]
    allocated_units: i128,
}

impl Allocation {
    fn skipped(items: &[LineItem], total_weight: f64, precision: u32) -> Self {
        Self {
            items: items
                .iter()
                .map(|item| AllocatedItem {
                    item: item.clone(),
                    allocated_weight: None,
                })
                .collect(),
            mode: AllocationMode::Skipped,
            precision,
            declared_total: total_weight,
            allocated_total: 0.0,
            declared_units: 0,
            allocated_units: 0,
        }
    }

    fn from_units(
        items: &[LineItem],
        units: &[i128],
        mode: AllocationMode,
        total_weight: f64,
        precision: u32,
    ) -> Self {
        let scale = scale_for(precision);
        let allocated_units: i128 = units.iter().sum();
        Self {
            items: items
                .iter()
                .zip(units)
                .map(|(item, &u)| AllocatedItem {
                    item: item.clone(),
                    allocated_weight: Some(from_units(u, scale)),
                })
                .collect(),
            mode,
            precision,
            declared_total: total_weight,
            allocated_total: from_units(allocated_units, scale),
            declared_units: to_units(total_weight, scale),
            allocated_units,
        }
    }

    /// Allocated minus declared, at the allocation precision.
    pub fn difference(&self) -> f64 {
        if self.mode == AllocationMode::Skipped {
            return 0.0;
        }
        from_units(
            self.allocated_units - self.declared_units,
            scale_for(self.precision),
        )
    }

    /// Whether the allocated weights sum to the declared total.
    pub fn is_reconciled(&self) -> bool {
        self.mode != AllocationMode::Skipped && self.allocated_units == self.declared_units
    }
}

/// Converts raw lines into allocatable ones according to `mode`.
///
/// Missing quantity and price always read as zero. A blank string is present
/// but unusable, so `Strict` rejects it. A `line_weight` that ends up zero is
/// treated as absent.
pub fn sanitize(raw: &[RawLineItem], mode: ValidationMode) -> Result<Vec<LineItem>, AllocationError> {
    raw.iter()
        .enumerate()
        .map(|(line, r)| {
            let quantity = coerce(r.quantity.as_ref(), line, NumericField::Quantity, mode)?;
            let unit_price = coerce(r.unit_price.as_ref(), line, NumericField::UnitPrice, mode)?;
            let line_weight = coerce(r.line_weight.as_ref(), line, NumericField::LineWeight, mode)?;
            Ok(LineItem {
                info: r.info.clone(),
                quantity,
                unit_price,
                line_weight: (line_weight > 0.0).then_some(line_weight),
            })
        })
        .collect()
}

fn coerce(
    value: Option<&RawNumber>,
    line: usize,
    field: NumericField,
    mode: ValidationMode,
) -> Result<f64, AllocationError> {
    let Some(value) = value else {
        return Ok(0.0);
    };
    match value.parse() {
        Some(n) if n.is_finite() && n >= 0.0 => Ok(n),
        _ if mode == ValidationMode::Permissive => {
            warn!(line, field = %field, raw = %value, "Unusable numeric field — treating as zero");
            Ok(0.0)
        }
        _ => Err(AllocationError::MalformedField {
            line,
            field,
            raw: value.to_string(),
        }),
    }
}

/// Distributes `total_weight` across `items`.
///
/// Returns the items unannotated when the list is empty or the total is not
/// a positive finite number. Otherwise the weights are non-negative, rounded
/// to `precision` decimals, and (except in direct mode, where the declared
/// per-line weights are authoritative) sum exactly to the rounded total.
pub fn allocate(items: &[LineItem], total_weight: f64, precision: u32) -> Allocation {
    let precision = precision.min(MAX_PRECISION);

    if items.is_empty() || !total_weight.is_finite() || total_weight <= 0.0 {
        debug!(items = items.len(), total_weight, "Allocation skipped");
        return Allocation::skipped(items, total_weight, precision);
    }
    let total_weight = clamp_weight(total_weight);

    let scale = scale_for(precision);

    if items
        .iter()
        .all(|i| i.line_weight.is_some_and(|w| w.is_finite() && w > 0.0))
    {
        let units: Vec<i128> = items
            .iter()
            .map(|i| to_units(clamp_weight(i.line_weight.unwrap_or(0.0)), scale))
            .collect();
        let allocation =
            Allocation::from_units(items, &units, AllocationMode::Direct, total_weight, precision);
        if !allocation.is_reconciled() {
            warn!(
                declared = total_weight,
                realized = allocation.allocated_total,
                "Declared line weights do not add up to the shipment gross weight"
            );
        }
        return allocation;
    }

    let (mode, raw) = raw_shares(items, total_weight);
    let mut units: Vec<i128> = raw.iter().map(|&w| to_units(w, scale)).collect();
    reconcile(&mut units, to_units(total_weight, scale));

    debug!(?mode, items = items.len(), total_weight, "Weights allocated");
    Allocation::from_units(items, &units, mode, total_weight, precision)
}

fn raw_shares(items: &[LineItem], total_weight: f64) -> (AllocationMode, Vec<f64>) {
    let values: Vec<f64> = items.iter().map(LineItem::value).collect();
    let total_value: f64 = values.iter().sum();
    if total_value > 0.0 && total_value.is_finite() {
        let shares = values.iter().map(|v| v / total_value * total_weight).collect();
        return (AllocationMode::Value, shares);
    }

    let quantities: Vec<f64> = items.iter().map(|i| non_negative(i.quantity)).collect();
    let total_qty: f64 = quantities.iter().sum();
    if total_qty > 0.0 && total_qty.is_finite() {
        let shares = quantities.iter().map(|q| q / total_qty * total_weight).collect();
        return (AllocationMode::Quantity, shares);
    }

    let even = total_weight / items.len() as f64;
    (AllocationMode::Equal, vec![even; items.len()])
}

/// Forces `units` to sum to `total`, keeping every entry non-negative.
fn reconcile(units: &mut [i128], total: i128) {
    let idx = largest(units);
    let diff = total - units.iter().sum::<i128>();
    units[idx] += diff;

    if units[idx] >= 0 {
        return;
    }

    let deficit = -units[idx];
    units[idx] = 0;
    let pool = units.iter().sum::<i128>();
    let pool = if pool > 0 { pool as f64 } else { 1.0 };
    for (i, w) in units.iter_mut().enumerate() {
        if i == idx {
            continue;
        }
        let take = (*w as f64 / pool * deficit as f64).round() as i128;
        *w = (*w - take).max(0);
    }

    settle(units, total);
}

/// Applies the remaining residual to the largest line. A negative residual
/// larger than that line spills onto the next-largest one.
fn settle(units: &mut [i128], total: i128) {
    loop {
        let residual = total - units.iter().sum::<i128>();
        let j = largest(units);
        if residual >= 0 {
            units[j] += residual;
            return;
        }
        let cut = (-residual).min(units[j]);
        if cut == 0 {
            return;
        }
        units[j] -= cut;
    }
}

/// Index of the largest entry; the first one wins ties.
fn largest(units: &[i128]) -> usize {
    units
        .iter()
        .enumerate()
        .fold(0, |best, (i, &w)| if w > units[best] { i } else { best })
}

fn clamp_weight(kg: f64) -> f64 {
    if kg > MAX_WEIGHT_KG {
        warn!(kg, limit = MAX_WEIGHT_KG, "Weight exceeds supported range; clamping");
        MAX_WEIGHT_KG
    } else {
        kg
    }
}

fn non_negative(x: f64) -> f64 {
    if x.is_finite() && x > 0.0 { x } else { 0.0 }
}

fn scale_for(precision: u32) -> f64 {
    10f64.powi(precision as i32)
}

fn to_units(x: f64, scale: f64) -> i128 {
    (x * scale).round() as i128
}

fn from_units(units: i128, scale: f64) -> f64 {
    units as f64 / scale
}

/// Rounds `x` to `precision` decimals, half away from zero.
pub fn round_to(x: f64, precision: u32) -> f64 {
    let scale = scale_for(precision.min(MAX_PRECISION));
    let scaled = x * scale;
    // already integral at this precision (or not a number)
    if !scaled.is_finite() || scaled.abs() >= 2f64.powi(52) {
        return x;
    }
    from_units(to_units(x, scale), scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    impl LineItem {
        fn new(quantity: f64, unit_price: f64) -> Self {
            Self {
                quantity,
                unit_price,
                ..Self::default()
            }
        }

        fn with_line_weight(mut self, weight: f64) -> Self {
            self.line_weight = Some(weight);
            self
        }
    }

    impl Allocation {
        /// Allocated weight per line, zero where nothing was allocated.
        fn weights(&self) -> Vec<f64> {
            self.items
                .iter()
                .map(|i| i.allocated_weight.unwrap_or(0.0))
                .collect()
        }
    }

    fn priced(pairs: &[(f64, f64)]) -> Vec<LineItem> {
        pairs.iter().map(|&(q, p)| LineItem::new(q, p)).collect()
    }

    fn assert_conserved(alloc: &Allocation, total: f64) {
        assert_eq!(alloc.allocated_total, round_to(total, alloc.precision));
        assert!(alloc.is_reconciled());
        assert_eq!(alloc.difference(), 0.0);
        assert!(alloc.weights().iter().all(|w| *w >= 0.0));
    }

    #[test]
    fn value_proportional() {
        let alloc = allocate(&priced(&[(2.0, 100.0), (1.0, 100.0)]), 300.0, 3);
        assert_eq!(alloc.mode, AllocationMode::Value);
        assert_eq!(alloc.weights(), vec![200.0, 100.0]);
        assert_conserved(&alloc, 300.0);
    }

    #[test]
    fn quantity_fallback_when_prices_are_zero() {
        let alloc = allocate(&priced(&[(3.0, 0.0), (1.0, 0.0)]), 40.0, 3);
        assert_eq!(alloc.mode, AllocationMode::Quantity);
        assert_eq!(alloc.weights(), vec![30.0, 10.0]);
        assert_conserved(&alloc, 40.0);
    }

    #[test]
    fn equal_split_when_everything_is_zero() {
        let alloc = allocate(&priced(&[(0.0, 0.0); 3]), 30.0, 3);
        assert_eq!(alloc.mode, AllocationMode::Equal);
        assert_eq!(alloc.weights(), vec![10.0, 10.0, 10.0]);
        assert_conserved(&alloc, 30.0);
    }

    #[test]
    fn direct_weights_take_precedence() {
        let items = vec![
            LineItem::new(5.0, 10.0).with_line_weight(120.5),
            LineItem::new(1.0, 999.0).with_line_weight(79.5),
        ];
        let alloc = allocate(&items, 200.0, 3);
        assert_eq!(alloc.mode, AllocationMode::Direct);
        assert_eq!(alloc.weights(), vec![120.5, 79.5]);
        assert_eq!(alloc.allocated_total, 200.0);
        assert!(alloc.is_reconciled());
    }

    #[test]
    fn direct_weights_may_diverge_from_declared_total() {
        let items = vec![
            LineItem::new(1.0, 1.0).with_line_weight(60.0),
            LineItem::new(1.0, 1.0).with_line_weight(50.0),
        ];
        let alloc = allocate(&items, 100.0, 3);
        assert_eq!(alloc.mode, AllocationMode::Direct);
        assert_eq!(alloc.allocated_total, 110.0);
        assert!(!alloc.is_reconciled());
        assert_eq!(alloc.difference(), 10.0);
    }

    #[test]
    fn partial_line_weights_fall_back_to_value() {
        let items = vec![
            LineItem::new(1.0, 100.0).with_line_weight(10.0),
            LineItem::new(1.0, 100.0),
        ];
        let alloc = allocate(&items, 50.0, 3);
        assert_eq!(alloc.mode, AllocationMode::Value);
        assert_eq!(alloc.weights(), vec![25.0, 25.0]);
    }

    #[test]
    fn residual_lands_on_first_largest_line() {
        let alloc = allocate(&priced(&[(1.0, 10.0); 3]), 100.0, 3);
        assert_eq!(alloc.weights(), vec![33.334, 33.333, 33.333]);
        assert_conserved(&alloc, 100.0);
    }

    #[test]
    fn residual_prefers_largest_share_over_position() {
        let alloc = allocate(&priced(&[(1.0, 1.0), (1.0, 1.0), (4.0, 1.0)]), 10.0, 2);
        // raw shares 1.666.., 1.666.., 6.666..
        assert_eq!(alloc.weights(), vec![1.67, 1.67, 6.66]);
        assert_conserved(&alloc, 10.0);
    }

    #[test]
    fn degenerate_inputs_are_noops() {
        let empty = allocate(&[], 100.0, 3);
        assert!(empty.items.is_empty());
        assert_eq!(empty.mode, AllocationMode::Skipped);

        let items = priced(&[(1.0, 1.0), (2.0, 1.0)]);
        for total in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let alloc = allocate(&items, total, 3);
            assert_eq!(alloc.mode, AllocationMode::Skipped);
            assert!(alloc.items.iter().all(|i| i.allocated_weight.is_none()));
            assert_eq!(
                alloc.items.iter().map(|i| i.item.clone()).collect::<Vec<_>>(),
                items
            );
        }
    }

    #[test]
    fn negative_and_garbage_numbers_count_as_zero() {
        let items = vec![
            LineItem::new(-4.0, 100.0),
            LineItem::new(2.0, f64::NAN),
            LineItem::new(1.0, 50.0),
        ];
        let alloc = allocate(&items, 12.0, 3);
        assert_eq!(alloc.mode, AllocationMode::Value);
        assert_eq!(alloc.weights(), vec![0.0, 0.0, 12.0]);
    }

    #[test]
    fn deterministic_for_identical_input() {
        let items = priced(&[(3.0, 7.1), (11.0, 0.3), (2.0, 19.9), (1.0, 1.0)]);
        let a = allocate(&items, 987.654, 3);
        let b = allocate(&items, 987.654, 3);
        assert_eq!(a, b);
        assert_conserved(&a, 987.654);
    }

    #[test]
    fn reconcile_redistributes_when_largest_line_goes_negative() {
        // five lines rounded up from 0.5 units each against a 3-unit total
        let mut units = vec![1, 1, 1, 1, 1];
        reconcile(&mut units, 3);
        assert_eq!(units.iter().sum::<i128>(), 3);
        assert!(units.iter().all(|u| *u >= 0));
        assert_eq!(units, vec![0, 0, 1, 1, 1]);
    }

    #[test]
    fn reconcile_takes_deficit_proportionally() {
        let mut units = vec![2, 8, 4, 0];
        reconcile(&mut units, 1);
        assert_eq!(units.iter().sum::<i128>(), 1);
        assert!(units.iter().all(|u| *u >= 0));
    }

    #[test]
    fn conservation_over_many_shapes() {
        let totals = [0.001, 0.0025, 1.0, 7.777, 100.0, 333.3335, 12_345.678];
        for n in 1..=12 {
            for (k, &total) in totals.iter().enumerate() {
                let items: Vec<LineItem> = (0..n)
                    .map(|i| LineItem::new(((i * 7 + k) % 5) as f64, ((i * 3) % 4) as f64 * 1.1))
                    .collect();
                let alloc = allocate(&items, total, 3);
                assert_conserved(&alloc, total);
            }
        }
    }

    #[test]
    fn huge_total_is_clamped_not_overflowed() {
        let alloc = allocate(&priced(&[(1.0, 1.0), (1.0, 1.0)]), 1.0e19, 3);
        assert_eq!(alloc.mode, AllocationMode::Value);
        assert_eq!(alloc.declared_total, MAX_WEIGHT_KG);
        assert_eq!(alloc.weights(), vec![5.0e17, 5.0e17]);
        assert_conserved(&alloc, MAX_WEIGHT_KG);

        let alloc = allocate(&priced(&[(1.0, 1.0), (3.0, 1.0)]), f64::MAX, 6);
        assert!(alloc.is_reconciled());
        assert!(alloc.weights().iter().all(|w| w.is_finite() && *w >= 0.0));
    }

    #[test]
    fn huge_direct_weights_sum_without_overflow() {
        let items = vec![
            LineItem::new(1.0, 1.0).with_line_weight(1.0e16),
            LineItem::new(1.0, 1.0).with_line_weight(1.0e16),
        ];
        let alloc = allocate(&items, 2.0e16, 3);
        assert_eq!(alloc.mode, AllocationMode::Direct);
        assert_eq!(alloc.weights(), vec![1.0e16, 1.0e16]);
        assert_eq!(alloc.allocated_total, 2.0e16);
        assert!(alloc.is_reconciled());

        let items = vec![
            LineItem::new(1.0, 1.0).with_line_weight(f64::MAX),
            LineItem::new(1.0, 1.0).with_line_weight(f64::MAX),
        ];
        let alloc = allocate(&items, 1.0, 6);
        assert_eq!(alloc.weights(), vec![MAX_WEIGHT_KG, MAX_WEIGHT_KG]);
        assert!(!alloc.is_reconciled());
    }

    #[test]
    fn round_to_leaves_integral_magnitudes_alone() {
        assert_eq!(round_to(1.0e300, 2), 1.0e300);
        assert_eq!(round_to(-2.5, 0), -3.0);
        assert_eq!(round_to(1.23456, 3), 1.235);
    }

    #[test]
    fn sanitize_permissive_coerces() {
        let raw: Vec<RawLineItem> = serde_json::from_str(
            r#"[
                {"description": "Brake pads", "quantity": "1,200", "unit_price": "abc"},
                {"qty": -3, "unit_price": 2.5, "line_weight": true},
                {"quantity": null, "unit_price": "", "gross_weight": "12.5"}
            ]"#,
        )
        .unwrap();
        let items = sanitize(&raw, ValidationMode::Permissive).unwrap();
        assert_eq!(items[0].quantity, 1200.0);
        assert_eq!(items[0].unit_price, 0.0);
        assert_eq!(items[0].info.description_en.as_deref(), Some("Brake pads"));
        assert_eq!(items[1].quantity, 0.0);
        assert_eq!(items[1].line_weight, None);
        assert_eq!(items[2].quantity, 0.0);
        assert_eq!(items[2].line_weight, Some(12.5));
    }

    #[test]
    fn sanitize_strict_rejects() {
        let raw = vec![
            RawLineItem {
                quantity: Some(2.0.into()),
                unit_price: Some(10.0.into()),
                ..RawLineItem::default()
            },
            RawLineItem {
                quantity: Some(RawNumber::Text("two".into())),
                ..RawLineItem::default()
            },
        ];
        let err = sanitize(&raw, ValidationMode::Strict).unwrap_err();
        assert_eq!(
            err,
            AllocationError::MalformedField {
                line: 1,
                field: NumericField::Quantity,
                raw: "two".to_string(),
            }
        );
    }

    #[test]
    fn sanitize_strict_rejects_negative() {
        let raw = vec![RawLineItem {
            unit_price: Some((-1.0).into()),
            ..RawLineItem::default()
        }];
        assert!(matches!(
            sanitize(&raw, ValidationMode::Strict),
            Err(AllocationError::MalformedField {
                field: NumericField::UnitPrice,
                ..
            })
        ));
    }

    #[test]
    fn sanitize_strict_rejects_blank_string() {
        let raw: Vec<RawLineItem> =
            serde_json::from_str(r#"[{"quantity": "  ", "unit_price": 4}]"#).unwrap();
        assert_eq!(
            sanitize(&raw, ValidationMode::Strict).unwrap_err(),
            AllocationError::MalformedField {
                line: 0,
                field: NumericField::Quantity,
                raw: "  ".to_string(),
            }
        );
        let items = sanitize(&raw, ValidationMode::Permissive).unwrap();
        assert_eq!(items[0].quantity, 0.0);
    }

    #[test]
    fn sanitize_strict_accepts_missing_fields() {
        let raw = vec![RawLineItem::default()];
        let items = sanitize(&raw, ValidationMode::Strict).unwrap();
        assert_eq!(items[0], LineItem::new(0.0, 0.0));
    }
}
