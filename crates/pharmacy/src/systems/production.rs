use serde::Serialize;

use super::catalog::{CatalogStore, ItemId, Material, Zeny};
use super::prices::PriceBook;
use super::workbench::PharmacySnapshot;

/// What one craft of a final item costs, and what each potion it yields costs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CostRow {
    pub item_id: ItemId,
    pub name: String,
    pub material_cost: Zeny,
    pub expected_yield_centi: u64,
    /// Hundredths of a zeny per potion; `None` when nothing is expected to come out.
    pub unit_cost_centi: Option<i64>,
    pub materials: Vec<Material>,
}

pub fn material_cost(prices: &PriceBook, materials: &[Material]) -> Zeny {
    materials.iter().fold(Zeny::ZERO, |total, material| {
        total.saturating_add(prices.get(material.item).saturating_mul(material.quantity))
    })
}

/// `material_cost * 100 / expected_yield`, in hundredths of a zeny.
pub fn unit_cost_centi(cost: Zeny, expected_yield_centi: u64) -> Option<i64> {
    if expected_yield_centi == 0 {
        return None;
    }
    let divisor = i64::try_from(expected_yield_centi).ok()?;
    Some(cost.as_i64().saturating_mul(10_000) / divisor)
}

/// Cost table for every craftable final item, sorted by case-folded name, then id.
pub fn production_costs(
    catalog: &CatalogStore,
    prices: &PriceBook,
    snapshot: &PharmacySnapshot,
) -> Vec<CostRow> {
    let mut rows: Vec<CostRow> = catalog
        .final_items()
        .filter_map(|item| {
            let recipe = catalog.get_recipe(item.id).ok()?;
            let material_cost = material_cost(prices, &recipe.materials);
            let expected_yield_centi = snapshot
                .row(item.id)
                .map_or(0, |row| row.expected_yield_centi);
            Some(CostRow {
                item_id: item.id,
                name: item.name.clone(),
                material_cost,
                expected_yield_centi,
                unit_cost_centi: unit_cost_centi(material_cost, expected_yield_centi),
                materials: recipe.materials.clone(),
            })
        })
        .collect();
    rows.sort_by(|a, b| (a.name.to_lowercase(), a.item_id).cmp(&(b.name.to_lowercase(), b.item_id)));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_cost_divides_by_expected_yield() {
        // 1_000 zeny over 2.50 potions
        assert_eq!(unit_cost_centi(Zeny(1_000), 250), Some(40_000));
        assert_eq!(unit_cost_centi(Zeny(10), 300), Some(333));
        assert_eq!(unit_cost_centi(Zeny(1_000), 0), None);
    }
}
