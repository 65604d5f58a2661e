use std::io::Write;

use anyhow::{Context, Result};
use log::{debug, info};

use crate::cli::{CliOptions, Command, EvaluateArgs, PricesAction, ProfileAction, Toggle};
use crate::logs::queries::{write_query, QueryLog};
use crate::paths::AppPaths;
use crate::report;
use crate::systems::catalog::{CatalogStore, Item, ItemId};
use crate::systems::errors::NotFound;
use crate::systems::pharmacy::{parse_field, sample, DetRng};
use crate::systems::prices::PriceBook;
use crate::systems::profile::Profile;
use crate::systems::workbench::{snapshot_for, PharmacySnapshot, Workbench};

/// Item by numeric id or by display name.
pub fn resolve_item<'a>(catalog: &'a CatalogStore, raw: &str) -> Result<&'a Item, NotFound> {
    match raw.trim().parse::<u32>() {
        Ok(id) => catalog.get_item(ItemId(id)),
        Err(_) => catalog.find_item_by_name(raw),
    }
}

pub fn run(opts: &CliOptions, out: &mut impl Write) -> Result<()> {
    let paths = AppPaths::resolve(opts.assets.as_deref(), opts.data_dir.as_deref())?;
    debug!(
        "paths assets={} data={}",
        paths.assets.display(),
        paths.data.display()
    );
    let catalog = CatalogStore::load(&paths.catalog()).with_context(|| {
        format!("loading game data from {}", paths.assets.display())
    })?;

    match &opts.command {
        Command::Evaluate(args) => evaluate(&catalog, &paths, args, out),
        Command::Items { final_only } => {
            if *final_only {
                report::write_items(out, catalog.final_items())?;
            } else {
                report::write_items(out, catalog.items())?;
            }
            Ok(())
        }
        Command::Recipe { item } => {
            let item = resolve_item(&catalog, item)?;
            let recipe = catalog.get_recipe(item.id)?;
            let bench = workbench(&catalog, &paths);
            let (attrs, _) = bench.attributes()?;
            let table = catalog.yield_table(item.id, attrs.pharmacy_level())?;
            writeln!(out, "skill level {}", attrs.pharmacy_level())?;
            report::write_recipe(out, &catalog, item, recipe, &table)?;
            Ok(())
        }
        Command::Cost(overrides) => {
            let bench = workbench(&catalog, &paths);
            let (attrs, effective) =
                bench.attributes_with(&overrides.attrs.to_input(), &overrides.buffs)?;
            let snapshot = snapshot_for(&catalog, &attrs, effective)?;
            log_query("cost", &snapshot);
            let rows = bench.production_costs(&snapshot);
            writeln!(out, "prices: {}", bench.prices().source())?;
            report::write_costs(out, &rows)?;
            Ok(())
        }
        Command::Prices { action } => prices(&catalog, &paths, action, out),
        Command::Profile { action } => profile(&catalog, &paths, action, out),
    }
}

fn load_profile(catalog: &CatalogStore, paths: &AppPaths) -> Profile {
    let mut profile = paths.profile_store().load();
    profile.retain_known_buffs(catalog.buffs());
    profile
}

fn workbench<'a>(catalog: &'a CatalogStore, paths: &AppPaths) -> Workbench<'a> {
    let profile = load_profile(catalog, paths);
    let prices = PriceBook::load(catalog, &paths.user_prices());
    Workbench::new(catalog, profile, prices)
}

fn evaluate(
    catalog: &CatalogStore,
    paths: &AppPaths,
    args: &EvaluateArgs,
    out: &mut impl Write,
) -> Result<()> {
    let bench = workbench(catalog, paths);
    let overrides = &args.overrides;
    let (attrs, effective) =
        bench.attributes_with(&overrides.attrs.to_input(), &overrides.buffs)?;
    let snapshot = snapshot_for(catalog, &attrs, effective)?;
    log_query("evaluate", &snapshot);

    let item = args
        .item
        .as_deref()
        .map(|raw| resolve_item(catalog, raw))
        .transpose()?;
    let row = match item {
        Some(item) => {
            catalog.get_recipe(item.id)?;
            snapshot.row(item.id)
        }
        None => None,
    };
    report::write_snapshot(out, &snapshot, row)?;

    if args.samples == 0 {
        return Ok(());
    }
    let Some(item) = item else {
        anyhow::bail!("--samples needs --item to pick a recipe");
    };
    let recipe = catalog.get_recipe(item.id)?;
    let table = catalog.yield_table(item.id, attrs.pharmacy_level())?;
    let mut rng = DetRng::from_seed(args.seed, item.id.0);
    writeln!(out, "samples (seed {}):", args.seed)?;
    for n in 1..=args.samples {
        let score = sample(&attrs, recipe, &mut rng);
        writeln!(
            out,
            "  #{n:<4} score {score:<5} yield {}",
            table.yield_for(score)
        )?;
    }
    Ok(())
}

fn log_query(command: &str, snapshot: &PharmacySnapshot) {
    if let Err(err) = write_query(QueryLog { command, snapshot }) {
        log::warn!("query_log_failed error={err:#}");
    }
}

fn prices(
    catalog: &CatalogStore,
    paths: &AppPaths,
    action: &PricesAction,
    out: &mut impl Write,
) -> Result<()> {
    let user_path = paths.user_prices();
    let mut book = PriceBook::load(catalog, &user_path);
    match action {
        PricesAction::Show => {}
        PricesAction::Set {
            item,
            price,
            dry_run,
        } => {
            let item = resolve_item(catalog, item)?;
            let price = parse_field("price", price)?;
            book.set_live(catalog, item.id, price)?;
            if !dry_run {
                book.save(&user_path)?;
                writeln!(out, "saved {}", user_path.display())?;
            }
        }
        PricesAction::Save => {
            book.save(&user_path)?;
            writeln!(out, "saved {}", user_path.display())?;
        }
        PricesAction::Reset => {
            book.reset(catalog, &user_path)?;
            writeln!(out, "reset {}", user_path.display())?;
        }
    }
    report::write_prices(out, &book.rows(catalog), book.source())?;
    Ok(())
}

fn profile(
    catalog: &CatalogStore,
    paths: &AppPaths,
    action: &ProfileAction,
    out: &mut impl Write,
) -> Result<()> {
    let store = paths.profile_store();
    let mut profile = load_profile(catalog, paths);
    match action {
        ProfileAction::Show => {}
        ProfileAction::Set { key, value } => {
            profile.set_field(key, value)?;
            store.save(&profile)?;
        }
        ProfileAction::Buff { key, state } => {
            profile.set_buff(catalog.buffs(), key, *state == Toggle::On)?;
            store.save(&profile)?;
        }
        ProfileAction::Save => {
            store.save(&profile)?;
            writeln!(out, "saved {}", store.user_path.display())?;
        }
        ProfileAction::Reset => {
            profile = store.reset()?;
            writeln!(out, "reset {}", store.user_path.display())?;
        }
        ProfileAction::Import { file } => {
            profile = store
                .import(file, catalog.buffs())
                .with_context(|| format!("importing {}", file.display()))?;
            info!("profile_imported from={}", file.display());
        }
        ProfileAction::Export { file } => {
            store.export(&profile, file)?;
            writeln!(out, "exported {}", file.display())?;
        }
    }
    report::write_profile(out, &profile)?;
    Ok(())
}
