//! Submit-time flattening of a BOM line item.
//!
//! The editing state keeps one mixed `materials` list. What gets persisted (and sent
//! as a request body) is the line-level fields plus two arrays, `rm` and `sfg`,
//! holding only the rows that are actually consumed.

use crate::{
    core::costing::{
        BomLineItem, ChannelMarkups, FixedCosts, ItemKind, ItemRef, MaterialConsumption,
        Overheads, UnitRates, recompute,
    },
    errors::Result,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A material row counts toward the BOM only with a matched catalog item and a positive quantity.
#[must_use]
pub fn is_consumable(row: &MaterialConsumption) -> bool {
    row.item.is_some() && row.qty > Decimal::ZERO
}

/// One persisted component row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentLine {
    /// Id of the consumed catalog item
    #[serde(rename = "itemId")]
    pub item_id: i64,
    /// Piece height in inches
    pub height: Decimal,
    /// Piece width in inches
    pub width: Decimal,
    /// Pieces per unit
    pub qty: Decimal,
    /// Row cost at submit time
    pub rate: Decimal,
}

impl ComponentLine {
    fn from_row(item_id: i64, row: &MaterialConsumption) -> Self {
        Self {
            item_id,
            height: row.height,
            width: row.width,
            qty: row.qty,
            rate: row.rate,
        }
    }
}

/// The body sent to (and loaded back from) storage for one finished good.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FgSubmission {
    /// Finished good name
    pub name: String,
    /// Fixed per-unit costs
    #[serde(flatten)]
    pub fixed_costs: FixedCosts,
    /// Overhead loadings
    #[serde(flatten)]
    pub overheads: Overheads,
    /// Channel markups
    #[serde(flatten)]
    pub markups: ChannelMarkups,
    /// Derived prices
    #[serde(flatten)]
    pub rates: UnitRates,
    /// Consumed raw materials
    #[serde(default)]
    pub rm: Vec<ComponentLine>,
    /// Consumed semi-finished goods
    #[serde(default)]
    pub sfg: Vec<ComponentLine>,
}

impl FgSubmission {
    /// Serializes the submission into the request body.
    ///
    /// # Errors
    /// Returns an error if JSON serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Into::into)
    }

    /// Rebuilds the editing state from stored rows.
    ///
    /// Raw materials come first, then semi-finished goods. Each row takes the
    /// current square-inch rate from `sq_inch_rates`; items that no longer resolve
    /// price at zero. The result is recomputed.
    #[must_use]
    pub fn into_line_item(self, sq_inch_rates: &HashMap<ItemRef, Decimal>) -> BomLineItem {
        let mut materials: Vec<MaterialConsumption> =
            stored_rows(ItemKind::RawMaterial, self.rm, sq_inch_rates)
                .chain(stored_rows(
                    ItemKind::SemiFinishedGood,
                    self.sfg,
                    sq_inch_rates,
                ))
                .collect();
        if materials.is_empty() {
            materials.push(MaterialConsumption::default());
        }

        recompute(BomLineItem {
            name: self.name,
            materials,
            fixed_costs: self.fixed_costs,
            overheads: self.overheads,
            markups: self.markups,
            rates: self.rates,
        })
    }
}

fn stored_rows(
    kind: ItemKind,
    lines: Vec<ComponentLine>,
    sq_inch_rates: &HashMap<ItemRef, Decimal>,
) -> impl Iterator<Item = MaterialConsumption> + '_ {
    lines.into_iter().map(move |line| {
        let item = ItemRef {
            kind,
            id: line.item_id,
        };
        MaterialConsumption {
            item: Some(item),
            height: line.height,
            width: line.width,
            qty: line.qty,
            sq_inch_rate: sq_inch_rates.get(&item).copied().unwrap_or_default(),
            rate: Decimal::ZERO,
        }
    })
}

/// Recomputes `line`, drops rows that are not consumable, and splits the rest by kind.
#[must_use]
pub fn build_submission(line: BomLineItem) -> FgSubmission {
    let line = recompute(line);

    let mut rm = Vec::new();
    let mut sfg = Vec::new();
    for row in line.materials.iter().filter(|row| is_consumable(row)) {
        let Some(item) = row.item else { continue };
        let component = ComponentLine::from_row(item.id, row);
        match item.kind {
            ItemKind::RawMaterial => rm.push(component),
            ItemKind::SemiFinishedGood => sfg.push(component),
        }
    }

    FgSubmission {
        name: line.name,
        fixed_costs: line.fixed_costs,
        overheads: line.overheads,
        markups: line.markups,
        rates: line.rates,
        rm,
        sfg,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::costing::LineDefaults;
    use rust_decimal_macros::dec;

    fn row(kind: ItemKind, id: i64, qty: Decimal) -> MaterialConsumption {
        MaterialConsumption {
            item: Some(ItemRef { kind, id }),
            height: dec!(2),
            width: dec!(3),
            qty,
            sq_inch_rate: dec!(1.5),
            rate: Decimal::ZERO,
        }
    }

    fn line_with(materials: Vec<MaterialConsumption>) -> BomLineItem {
        BomLineItem {
            materials,
            ..BomLineItem::new("Sling Bag", &LineDefaults::default())
        }
    }

    #[test]
    fn test_is_consumable() {
        assert!(is_consumable(&row(ItemKind::RawMaterial, 1, dec!(1))));
        assert!(!is_consumable(&row(ItemKind::RawMaterial, 1, Decimal::ZERO)));
        assert!(!is_consumable(&MaterialConsumption {
            qty: dec!(3),
            ..MaterialConsumption::default()
        }));
    }

    #[test]
    fn test_submission_drops_rows_without_qty() {
        let submission = build_submission(line_with(vec![
            row(ItemKind::RawMaterial, 1, Decimal::ZERO),
            row(ItemKind::RawMaterial, 2, dec!(4)),
        ]));

        assert_eq!(submission.rm.len(), 1);
        assert_eq!(submission.rm[0].item_id, 2);
        assert_eq!(submission.rm[0].rate, dec!(36.0000));
        assert!(submission.sfg.is_empty());
    }

    #[test]
    fn test_submission_splits_by_kind_in_order() {
        let submission = build_submission(line_with(vec![
            row(ItemKind::SemiFinishedGood, 10, dec!(1)),
            row(ItemKind::RawMaterial, 1, dec!(1)),
            MaterialConsumption::default(),
            row(ItemKind::SemiFinishedGood, 11, dec!(2)),
            row(ItemKind::RawMaterial, 2, dec!(1)),
        ]));

        let rm_ids: Vec<i64> = submission.rm.iter().map(|c| c.item_id).collect();
        let sfg_ids: Vec<i64> = submission.sfg.iter().map(|c| c.item_id).collect();
        assert_eq!(rm_ids, vec![1, 2]);
        assert_eq!(sfg_ids, vec![10, 11]);
    }

    #[test]
    fn test_submission_prices_are_current() {
        // The row's rate is stale on purpose; build_submission must recompute.
        let mut stale = row(ItemKind::RawMaterial, 1, dec!(4));
        stale.rate = dec!(999);
        let submission = build_submission(line_with(vec![stale]));

        assert_eq!(submission.rm[0].rate, dec!(36));
        // 36 * 1.15
        assert_eq!(submission.rates.unit_rate, dec!(41.40));
    }

    #[test]
    fn test_json_uses_wire_names() -> Result<()> {
        let submission = build_submission(line_with(vec![
            row(ItemKind::RawMaterial, 1, dec!(4)),
            row(ItemKind::SemiFinishedGood, 5, dec!(1)),
        ]));
        let json: serde_json::Value = serde_json::from_str(&submission.to_json()?)?;

        for key in [
            "name",
            "stitching",
            "printing",
            "others",
            "rejection",
            "QC",
            "machineMaintainance",
            "materialHandling",
            "packaging",
            "shipping",
            "companyOverHead",
            "indirectExpense",
            "B2B",
            "D2C",
            "unitRate",
            "unitB2BRate",
            "unitD2CRate",
            "rm",
            "sfg",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
        assert!(json.get("materials").is_none());
        assert_eq!(json["rm"][0]["itemId"], 1);
        assert_eq!(json["sfg"][0]["itemId"], 5);
        // Amounts travel as decimal strings so no digits are lost.
        assert_eq!(json["QC"], "0.75");
        assert_eq!(json["unitRate"], "41.40");
        assert_eq!(json["rm"][0]["rate"], "36.0000");
        Ok(())
    }

    #[test]
    fn test_json_keeps_high_precision_amounts() -> Result<()> {
        let amount = dec!(0.1234) * dec!(123456789012345);
        let mut line = line_with(vec![row(ItemKind::RawMaterial, 1, dec!(1))]);
        line.fixed_costs.others = amount;
        let submission = build_submission(line);

        let json: serde_json::Value = serde_json::from_str(&submission.to_json()?)?;
        assert_eq!(json["others"], "15234567764123.3730");

        let parsed: FgSubmission = serde_json::from_str(&submission.to_json()?)?;
        assert_eq!(parsed.fixed_costs.others, amount);
        assert_eq!(parsed.rates, submission.rates);
        Ok(())
    }

    #[test]
    fn test_json_parses_back() -> Result<()> {
        let submission = build_submission(line_with(vec![row(ItemKind::RawMaterial, 1, dec!(4))]));
        let parsed: FgSubmission = serde_json::from_str(&submission.to_json()?)?;
        assert_eq!(parsed, submission);
        Ok(())
    }

    #[test]
    fn test_into_line_item_uses_current_catalog_rates() {
        let submission = build_submission(line_with(vec![
            row(ItemKind::SemiFinishedGood, 10, dec!(1)),
            row(ItemKind::RawMaterial, 1, dec!(4)),
        ]));

        let mut rates = HashMap::new();
        rates.insert(
            ItemRef {
                kind: ItemKind::RawMaterial,
                id: 1,
            },
            dec!(0.5),
        );
        // The sfg is missing from the catalog now and prices at zero.
        let line = submission.into_line_item(&rates);

        assert_eq!(line.materials.len(), 2);
        assert_eq!(line.materials[0].item.unwrap().kind, ItemKind::RawMaterial);
        assert_eq!(line.materials[0].rate, dec!(12));
        assert_eq!(line.materials[1].rate, Decimal::ZERO);
        // 12 * 1.15
        assert_eq!(line.rates.unit_rate, dec!(13.80));
    }

    #[test]
    fn test_into_line_item_without_rows_opens_blank_row() {
        let line = FgSubmission {
            name: "Empty".to_string(),
            ..FgSubmission::default()
        }
        .into_line_item(&HashMap::new());

        assert_eq!(line.materials, vec![MaterialConsumption::default()]);
    }
}
