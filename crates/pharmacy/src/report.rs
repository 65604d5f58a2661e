//! Plain-text tables for the CLI.

use std::io::{self, Write};

use crate::systems::catalog::{CatalogStore, Item, ItemKind, Material, Recipe};
use crate::systems::pharmacy::YieldTable;
use crate::systems::prices::{PriceRow, PriceSource};
use crate::systems::production::CostRow;
use crate::systems::profile::Profile;
use crate::systems::workbench::{PharmacyRow, PharmacySnapshot};

/// `3187` -> `31.87%`.
pub fn fmt_bp(bp: u64) -> String {
    format!("{}.{:02}%", bp / 100, bp % 100)
}

/// `185` -> `1.85`.
pub fn fmt_centi(centi: u64) -> String {
    format!("{}.{:02}", centi / 100, centi % 100)
}

/// Dot-grouped thousands, the way the game shows zeny: `1234567` -> `1.234.567`.
pub fn fmt_zeny(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

pub fn fmt_unit_cost(centi: Option<i64>) -> String {
    match centi {
        Some(value) => format!("{}.{:02}", value / 100, value % 100),
        None => "-".to_string(),
    }
}

fn kind_label(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Final => "final",
        ItemKind::Intermediate => "intermediate",
        ItemKind::Material => "material",
    }
}

pub fn write_items<'a>(
    out: &mut impl Write,
    items: impl IntoIterator<Item = &'a Item>,
) -> io::Result<()> {
    writeln!(out, "{:>7}  {:<13}  {:>10}  name", "id", "kind", "price")?;
    for item in items {
        writeln!(
            out,
            "{:>7}  {:<13}  {:>10}  {}",
            item.id,
            kind_label(item.kind),
            fmt_zeny(item.base_price.as_i64()),
            item.name
        )?;
    }
    Ok(())
}

pub fn write_materials(
    out: &mut impl Write,
    catalog: &CatalogStore,
    materials: &[Material],
) -> io::Result<()> {
    for material in materials {
        let name = catalog
            .get_item(material.item)
            .map(|item| item.name.as_str())
            .unwrap_or("?");
        writeln!(out, "  {:>3} x {} ({})", material.quantity, name, material.item)?;
    }
    Ok(())
}

pub fn write_recipe(
    out: &mut impl Write,
    catalog: &CatalogStore,
    item: &Item,
    recipe: &Recipe,
    table: &YieldTable,
) -> io::Result<()> {
    writeln!(out, "{} ({})", item.name, item.id)?;
    writeln!(out, "item difficulty: {}", recipe.difficulty)?;
    writeln!(out, "materials:")?;
    write_materials(out, catalog, &recipe.materials)?;
    write_yield_table(out, table)
}

pub fn write_yield_table(out: &mut impl Write, table: &YieldTable) -> io::Result<()> {
    writeln!(out, "yield bands:")?;
    for band in table.bands() {
        writeln!(
            out,
            "  {:<6} score >= {:<5} {} potions",
            band.label, band.threshold, band.count
        )?;
    }
    writeln!(
        out,
        "  {:<6} below          {} potions",
        table.floor_label(),
        table.floor()
    )
}

fn write_row(out: &mut impl Write, row: &PharmacyRow) -> io::Result<()> {
    write!(out, "{:<34} {:>5}", row.name, row.difficulty)?;
    for band in &row.bands {
        write!(out, " {:>8}", fmt_bp(band.share_bp))?;
    }
    writeln!(out, " {:>7}", fmt_centi(row.expected_yield_centi))
}

pub fn write_snapshot(
    out: &mut impl Write,
    snapshot: &PharmacySnapshot,
    only: Option<&PharmacyRow>,
) -> io::Result<()> {
    writeln!(
        out,
        "level {} | max potions {} | min {} | max {}",
        snapshot.level, snapshot.potion_cap, snapshot.range.min, snapshot.range.max
    )?;
    writeln!(
        out,
        "effective INT {} DEX {} LUK {}",
        snapshot.effective.int, snapshot.effective.dex, snapshot.effective.luk
    )?;
    let Some(first) = only.or_else(|| snapshot.rows.first()) else {
        return Ok(());
    };
    write!(out, "{:<34} {:>5}", "item", "dif")?;
    for band in &first.bands {
        write!(out, " {:>8}", band.label)?;
    }
    writeln!(out, " {:>7}", "mean")?;
    match only {
        Some(row) => write_row(out, row),
        None => snapshot.rows.iter().try_for_each(|row| write_row(out, row)),
    }
}

pub fn write_costs(out: &mut impl Write, rows: &[CostRow]) -> io::Result<()> {
    writeln!(
        out,
        "{:<34} {:>12} {:>7} {:>14}",
        "item", "materials", "mean", "per potion"
    )?;
    for row in rows {
        writeln!(
            out,
            "{:<34} {:>12} {:>7} {:>14}",
            row.name,
            fmt_zeny(row.material_cost.as_i64()),
            fmt_centi(row.expected_yield_centi),
            fmt_unit_cost(row.unit_cost_centi)
        )?;
    }
    Ok(())
}

pub fn write_prices(out: &mut impl Write, rows: &[PriceRow], source: PriceSource) -> io::Result<()> {
    writeln!(out, "source: {source} ({} items)", rows.len())?;
    for row in rows {
        writeln!(
            out,
            "{:>7}  {:>10}  {}",
            row.item_id,
            fmt_zeny(row.price.as_i64()),
            row.name
        )?;
    }
    Ok(())
}

pub fn write_profile(out: &mut impl Write, profile: &Profile) -> io::Result<()> {
    let stats = &profile.stats;
    writeln!(
        out,
        "stats: str {} agi {} vit {} int {} dex {} luk {}",
        stats.str, stats.agi, stats.vit, stats.int, stats.dex, stats.luk
    )?;
    writeln!(
        out,
        "levels: base {} job {}",
        profile.levels.base_level, profile.levels.job_level
    )?;
    writeln!(
        out,
        "skills: potion_research {} chemical_protection {} pharmacy_level {}",
        profile.skills.potion_research,
        profile.skills.chemical_protection_full,
        profile.skills.advanced_pharmacy
    )?;
    let active: Vec<&str> = profile.active_buffs().collect();
    if active.is_empty() {
        writeln!(out, "buffs: none")
    } else {
        writeln!(out, "buffs: {}", active.join(", "))
    }
}
