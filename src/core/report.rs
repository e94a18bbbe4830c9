//! Cost breakdown formatting.
//!
//! Turns a priced [`BomLineItem`] into plain text the bot layer can post. Nothing in
//! here touches the database; item names are passed in already resolved.

use crate::core::{
    costing::{BomLineItem, CostBreakdown, ItemRef, MaterialConsumption, UNIT_RATE_DP, round_to},
    input::LineField,
};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Formats an amount with exactly two decimal places.
#[must_use]
pub fn format_currency(amount: Decimal) -> String {
    format!("{:.2}", round_to(amount, UNIT_RATE_DP))
}

/// Formats a percentage, dropping trailing zeros: `1.75%`, `2%`.
#[must_use]
pub fn format_percent(percent: Decimal) -> String {
    format!("{}%", percent.normalize())
}

/// Summarizes one material row, e.g. `Canvas (rm) 2 x 3 in x 4 @ 1.5 = 36.0000`.
#[must_use]
pub fn format_material_row(row: &MaterialConsumption, item_names: &HashMap<ItemRef, String>) -> String {
    let label = row.item.map_or_else(
        || "(no item)".to_string(),
        |item| {
            let name = item_names
                .get(&item)
                .map_or("unknown item", String::as_str);
            format!("{name} ({})", item.kind)
        },
    );

    format!(
        "{label} {} x {} in x {} @ {} = {:.4}",
        row.height.normalize(),
        row.width.normalize(),
        row.qty.normalize(),
        row.sq_inch_rate.normalize(),
        row.rate
    )
}

/// Multi-line breakdown of a line item: rows, fixed costs, overheads and the three prices.
#[must_use]
pub fn format_cost_breakdown(line: &BomLineItem, item_names: &HashMap<ItemRef, String>) -> String {
    let breakdown = CostBreakdown::of(line);

    let mut lines = vec![format!("**{}**", line.name), "__Materials__".to_string()];
    lines.extend(
        line.materials
            .iter()
            .enumerate()
            .map(|(index, row)| format!("`{}` {}", index + 1, format_material_row(row, item_names))),
    );
    lines.push(format!("Material cost: {}", format_currency(breakdown.material_cost)));

    lines.push("__Fixed costs__".to_string());
    lines.extend(
        LineField::ALL
            .into_iter()
            .filter(|f| !f.is_percent())
            .map(|field| format!("{field}: {}", format_currency(line.field(field)))),
    );
    lines.push(format!("Total raw cost: {}", format_currency(breakdown.total_raw_cost)));

    lines.push("__Overheads__".to_string());
    lines.extend(
        LineField::ALL
            .into_iter()
            .filter(|f| f.is_percent())
            .map(|field| format!("{field}: {}", format_percent(line.field(field)))),
    );
    lines.push(format!("Blended overhead: {}", format_percent(breakdown.overhead_percent)));

    lines.push("__Unit prices__".to_string());
    lines.push(format!("Unit rate: **{}**", format_currency(breakdown.rates.unit_rate)));
    lines.push(format!("B2B rate: **{}**", format_currency(breakdown.rates.unit_b2b_rate)));
    lines.push(format!("D2C rate: **{}**", format_currency(breakdown.rates.unit_d2c_rate)));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::costing::{ItemKind, LineDefaults, recompute};
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(dec!(114)), "114.00");
        assert_eq!(format_currency(dec!(0.005)), "0.01");
        assert_eq!(format_currency(Decimal::ZERO), "0.00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(1.750)), "1.75%");
        assert_eq!(format_percent(dec!(2.00)), "2%");
    }

    #[test]
    fn test_format_material_row() {
        let item = ItemRef {
            kind: ItemKind::RawMaterial,
            id: 3,
        };
        let mut names = HashMap::new();
        names.insert(item, "Canvas".to_string());

        let row = recompute(BomLineItem {
            materials: vec![MaterialConsumption {
                item: Some(item),
                height: dec!(2),
                width: dec!(3),
                qty: dec!(4),
                sq_inch_rate: dec!(1.5),
                rate: Decimal::ZERO,
            }],
            ..BomLineItem::default()
        })
        .materials
        .remove(0);

        assert_eq!(
            format_material_row(&row, &names),
            "Canvas (rm) 2 x 3 in x 4 @ 1.5 = 36.0000"
        );
        assert_eq!(
            format_material_row(&MaterialConsumption::default(), &names),
            "(no item) 0 x 0 in x 0 @ 0 = 0.0000"
        );
    }

    #[test]
    fn test_format_cost_breakdown_lists_prices() {
        let line = BomLineItem::new("Tote", &LineDefaults::default());
        let line = crate::core::input::apply_line_edit(line, LineField::Others, "100");
        let text = format_cost_breakdown(&line, &HashMap::new());

        assert!(text.starts_with("**Tote**"));
        assert!(text.contains("others: 100.00"));
        assert!(text.contains("QC: 0.75%"));
        assert!(text.contains("Blended overhead: 15%"));
        assert!(text.contains("Unit rate: **115.00**"));
        assert!(text.ends_with("D2C rate: **115.00**"));
        assert_eq!(text.lines().filter(|l| l.starts_with("__")).count(), 4);
    }
}
