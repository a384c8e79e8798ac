//! Консольные строки статуса по каждой строке таблицы.

use contracts::usecases::u508_sync_to_shopify::{RowOutcome, RowStatus, SyncReport};

/// Строки консольного вывода для одной обработанной строки
pub fn render_outcome(outcome: &RowOutcome) -> Vec<String> {
    let sku = outcome.sku.as_deref().unwrap_or("-");
    let title = outcome.title.as_deref().unwrap_or("-");
    let mut lines = Vec::new();

    match &outcome.status {
        RowStatus::Created { .. } => {
            lines.push(format!("✓ Created: {} (SKU: {})", title, sku));
        }
        RowStatus::Updated { .. } => {
            if outcome.image_added {
                lines.push("   ↳ Image added.".to_string());
            }
            for warning in &outcome.warnings {
                lines.push(format!("   ⚠ Failed to add image: {}", warning));
            }
            lines.push(format!("✓ Updated: {} (SKU: {})", title, sku));
        }
        RowStatus::Skipped { reason } => {
            lines.push(format!("Skipping row {}: {}", outcome.row_number, reason));
        }
        RowStatus::Failed { reason } => {
            lines.push(format!("✗ Error processing {}: {}", sku, reason));
        }
    }
    lines
}

/// Ошибки, пропуски и предупреждения уходят в stderr, остальное в stdout
pub fn print_outcome(outcome: &RowOutcome) {
    let is_problem = matches!(
        outcome.status,
        RowStatus::Skipped { .. } | RowStatus::Failed { .. }
    );
    for line in render_outcome(outcome) {
        if is_problem || line.trim_start().starts_with('⚠') {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

pub fn print_summary(report: &SyncReport) {
    let p = &report.progress;
    println!("Import complete!");
    println!(
        "  created: {}, updated: {}, skipped: {}, failed: {}, image warnings: {}",
        p.created, p.updated, p.skipped, p.failed, p.image_warnings
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(status: RowStatus) -> RowOutcome {
        RowOutcome {
            row_number: 3,
            sku: Some("A1".into()),
            title: Some("Shirt".into()),
            status,
            warnings: vec![],
            image_added: false,
        }
    }

    #[test]
    fn test_render_created_and_failed() {
        let lines = render_outcome(&outcome(RowStatus::Created {
            product_id: "gid://shopify/Product/1".into(),
        }));
        assert_eq!(lines, vec!["✓ Created: Shirt (SKU: A1)"]);

        let lines = render_outcome(&outcome(RowStatus::Failed {
            reason: "price: is invalid".into(),
        }));
        assert_eq!(lines, vec!["✗ Error processing A1: price: is invalid"]);
    }

    #[test]
    fn test_render_update_with_image_warning() {
        let mut o = outcome(RowStatus::Updated {
            product_id: "gid://shopify/Product/1".into(),
        });
        o.warnings.push("Image URL is invalid".into());
        assert_eq!(
            render_outcome(&o),
            vec![
                "   ⚠ Failed to add image: Image URL is invalid",
                "✓ Updated: Shirt (SKU: A1)",
            ]
        );
    }
}
