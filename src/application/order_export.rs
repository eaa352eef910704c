use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};

use crate::csv;
use crate::domain::bundle::Bundle;
use crate::domain::errors::DomainError;
use crate::domain::order::Order;
use crate::domain::ports::{BundleGateway, OrderGateway};
use crate::domain::reconcile::{format_amount, reconcile, OrderReport};

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";
pub const FILENAME_SUFFIX: &str = "_orders.csv";

/// A finished CSV download.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub filename: String,
    pub body: String,
}

/// Order viewer for one bundle: on-screen report and CSV download.
pub struct OrderExporter {
    bundles: Arc<dyn BundleGateway>,
    orders: Arc<dyn OrderGateway>,
    display_offset: FixedOffset,
}

impl OrderExporter {
    pub fn new(
        bundles: Arc<dyn BundleGateway>,
        orders: Arc<dyn OrderGateway>,
        display_offset: FixedOffset,
    ) -> Self {
        Self {
            bundles,
            orders,
            display_offset,
        }
    }

    async fn load(&self, token: &str, bundle_id: &str) -> Result<(Bundle, Vec<Order>), DomainError> {
        let bundle = self
            .bundles
            .fetch_club_bundle(token, bundle_id)
            .await
            .map_err(|e| e.into_domain("Failed to fetch bundle"))?;
        let orders = self
            .orders
            .list_orders(token, bundle_id)
            .await
            .map_err(|e| e.into_domain("Failed to fetch orders"))?;
        log::debug!("loaded {} orders for bundle {}", orders.len(), bundle_id);
        Ok((bundle, orders))
    }

    pub async fn report(&self, token: &str, bundle_id: &str) -> Result<OrderReport, DomainError> {
        let (bundle, orders) = self.load(token, bundle_id).await?;
        Ok(reconcile(&bundle, &orders))
    }

    /// `None` when there is nothing to export.
    pub async fn export(
        &self,
        token: &str,
        bundle_id: &str,
    ) -> Result<Option<CsvExport>, DomainError> {
        let (bundle, orders) = self.load(token, bundle_id).await?;
        Ok(build_csv(Some(&bundle), &orders, self.display_offset))
    }
}

/// Local calendar date of an order, `DD/MM/YYYY`.
pub fn format_order_date(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format("%d/%m/%Y").to_string()
}

/// Bundle title made safe for a file name, plus the fixed suffix.
pub fn export_filename(title: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    let stem = if stem.is_empty() { "bundle" } else { stem.as_str() };
    format!("{}{}", stem, FILENAME_SUFFIX)
}

/// Render the CSV for `bundle`'s orders. Absent bundle or no orders yields
/// `None`; nothing partial is produced.
pub fn build_csv(
    bundle: Option<&Bundle>,
    orders: &[Order],
    offset: FixedOffset,
) -> Option<CsvExport> {
    let bundle = bundle?;
    if orders.is_empty() {
        return None;
    }

    let report = reconcile(bundle, orders);

    let mut header = vec!["Email / Student ID".to_string(), "Name".to_string()];
    header.extend(report.item_names.iter().cloned());
    header.extend([
        "Combos".to_string(),
        "Total Price".to_string(),
        "Order Date".to_string(),
    ]);

    let rows: Vec<Vec<String>> = report
        .rows
        .iter()
        .map(|row| {
            let mut fields = vec![
                row.student_identifier.clone().unwrap_or_default(),
                row.student_name.clone().unwrap_or_default(),
            ];
            fields.extend(row.cells.iter().map(|c| c.display.clone()));
            fields.push(row.combos.clone());
            fields.push(format_amount(row.total_price));
            fields.push(format_order_date(row.created_at, offset));
            fields
        })
        .collect();

    log::info!(
        "exporting {} orders for bundle {} ({} items)",
        rows.len(),
        bundle.id,
        report.item_names.len()
    );

    Some(CsvExport {
        filename: export_filename(&bundle.title),
        body: csv::document(&header, &rows),
    })
}
