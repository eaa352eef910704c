//! Reconciliation of a bundle's orders against its merchandise list.
//!
//! Every order is scanned once per declared item. A direct line item for the
//! item wins outright; otherwise the first combo selection that carries a slot
//! for the item is used, and that slot earns one even share of the combo price
//! per combo unit.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::bundle::Bundle;
use super::order::{ComboSelection, Order};

/// Placeholder rendered where an order has nothing for an item.
pub const EMPTY_CELL: &str = "-";

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AttributionSource {
    Direct,
    Combo {
        #[serde(rename = "comboName")]
        combo_name: String,
    },
}

/// What one order contributes to one merchandise item.
///
/// Direct line items take precedence over combos. When an order mentions the
/// item in several combos only the first combo, in the order's own sequence,
/// is counted.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attribution {
    pub quantity: u32,
    /// Line unit price, or the per-slot combo share.
    pub unit_price: f64,
    pub revenue: f64,
    pub size: Option<String>,
    pub nick: Option<String>,
    pub source: AttributionSource,
}

impl Attribution {
    /// `"<qty>x <size> - Rs<price>[ (<nick>)][ [Combo: <name>]]"`
    pub fn display(&self) -> String {
        let size = self
            .size
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(EMPTY_CELL);
        let mut out = format!(
            "{}x {} - Rs{}",
            self.quantity,
            size,
            format_amount(self.unit_price)
        );
        if let Some(nick) = self.nick.as_deref().filter(|n| !n.trim().is_empty()) {
            out.push_str(&format!(" ({})", nick));
        }
        if let AttributionSource::Combo { combo_name } = &self.source {
            out.push_str(&format!(" [Combo: {}]", combo_name));
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportCell {
    pub item_name: String,
    pub display: String,
    pub attribution: Option<Attribution>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderRow {
    pub order_id: String,
    pub student_identifier: Option<String>,
    pub student_name: Option<String>,
    pub cells: Vec<ReportCell>,
    pub combos: String,
    pub total_price: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemTotal {
    pub item_name: String,
    pub quantity: u64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub items: Vec<ItemTotal>,
    /// Sum of the totals stored on the orders.
    pub grand_total: f64,
    pub combo_count: usize,
    pub order_count: usize,
}

impl ReportSummary {
    pub fn item(&self, name: &str) -> Option<&ItemTotal> {
        self.items.iter().find(|t| t.item_name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderReport {
    pub bundle_id: String,
    pub bundle_title: String,
    pub item_names: Vec<String>,
    pub rows: Vec<OrderRow>,
    pub summary: ReportSummary,
}

/// JavaScript `Math.round` semantics: halves round towards positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Whole amounts print without decimals; others with at most two.
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        return format!("{:.0}", value);
    }
    let fixed = format!("{:.2}", value);
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// `name (xqty) - Rs<price>` for each combo, joined by `; `.
pub fn combos_summary(combos: &[ComboSelection]) -> String {
    if combos.is_empty() {
        return EMPTY_CELL.to_string();
    }
    combos
        .iter()
        .map(|c| {
            format!(
                "{} (x{}) - Rs{}",
                c.combo_name,
                c.quantity,
                format_amount(c.price)
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Number of slots the combo splits its price over: the bundle's declaration
/// when it has one, otherwise the selections recorded on the order.
fn combo_slot_count(bundle: &Bundle, selection: &ComboSelection) -> usize {
    bundle
        .combo(&selection.combo_name)
        .map(|declared| declared.items.len())
        .unwrap_or(selection.items.len())
}

pub fn attribute(bundle: &Bundle, order: &Order, item_name: &str) -> Option<Attribution> {
    if let Some(line) = order.items.iter().find(|l| l.item_name == item_name) {
        return Some(Attribution {
            quantity: line.quantity,
            unit_price: line.price,
            revenue: f64::from(line.quantity) * line.price,
            size: line.size.clone(),
            nick: line.nick.clone(),
            source: AttributionSource::Direct,
        });
    }

    let mut hits = order.combos.iter().filter_map(|combo| {
        combo
            .items
            .iter()
            .find(|slot| slot.item_name == item_name)
            .map(|slot| (combo, slot))
    });
    let (combo, slot) = hits.next()?;
    if let Some((other, _)) = hits.next() {
        log::warn!(
            "order {} lists '{}' in combos '{}' and '{}'; counting '{}' only",
            order.id,
            item_name,
            combo.combo_name,
            other.combo_name,
            combo.combo_name
        );
    }

    let slots = combo_slot_count(bundle, combo);
    let share = if slots == 0 {
        0.0
    } else {
        round_half_up(combo.price / slots as f64)
    };

    Some(Attribution {
        quantity: combo.quantity,
        unit_price: share,
        revenue: f64::from(combo.quantity) * share,
        size: slot.size.clone(),
        nick: slot.nick.clone(),
        source: AttributionSource::Combo {
            combo_name: combo.combo_name.clone(),
        },
    })
}

pub fn reconcile(bundle: &Bundle, orders: &[Order]) -> OrderReport {
    let item_names: Vec<String> = bundle.merch_items.iter().map(|i| i.name.clone()).collect();
    let mut totals: Vec<ItemTotal> = item_names
        .iter()
        .map(|name| ItemTotal {
            item_name: name.clone(),
            quantity: 0,
            revenue: 0.0,
        })
        .collect();

    let mut rows = Vec::with_capacity(orders.len());
    for order in orders {
        let mut cells = Vec::with_capacity(item_names.len());
        for (name, total) in item_names.iter().zip(totals.iter_mut()) {
            let attribution = attribute(bundle, order, name);
            if let Some(a) = &attribution {
                total.quantity += u64::from(a.quantity);
                total.revenue += a.revenue;
            }
            cells.push(ReportCell {
                item_name: name.clone(),
                display: attribution
                    .as_ref()
                    .map(Attribution::display)
                    .unwrap_or_else(|| EMPTY_CELL.to_string()),
                attribution,
            });
        }
        rows.push(OrderRow {
            order_id: order.id.clone(),
            student_identifier: order.student_identifier().map(str::to_string),
            student_name: order.student_name.clone(),
            cells,
            combos: combos_summary(&order.combos),
            total_price: order.total_price,
            created_at: order.created_at,
        });
    }

    OrderReport {
        bundle_id: bundle.id.clone(),
        bundle_title: bundle.title.clone(),
        item_names,
        rows,
        summary: ReportSummary {
            items: totals,
            grand_total: orders.iter().map(|o| o.total_price).sum(),
            combo_count: orders.iter().map(|o| o.combos.len()).sum(),
            order_count: orders.len(),
        },
    }
}
