use std::env;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use pharmacy::systems::catalog::ItemId;
use pharmacy::systems::pharmacy::{AttributeInput, OutcomeDistribution, Score};
use pharmacy::systems::prices::PriceBook;
use pharmacy::systems::profile::read_profile;
use pharmacy::systems::workbench::Workbench;
use pharmacy::{CatalogPaths, CatalogStore};

const ASSETS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets");

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), String> {
    let args = Args::parse()?;
    let catalog = CatalogStore::load(&CatalogPaths::under(&args.assets))
        .map_err(|err| err.to_string())?;
    run_sim(&args, &catalog)
}

/// Writes the full score histogram of one recipe with the yield each score earns.
fn run_sim(args: &Args, catalog: &CatalogStore) -> Result<(), String> {
    let profile_path = args.assets.join("defaults").join("profile.default.json");
    let profile = read_profile(&profile_path).map_err(|err| err.to_string())?;
    let bench = Workbench::new(catalog, profile, PriceBook::defaults(catalog));
    let (attrs, _) = bench
        .attributes_with(&args.attrs, &args.buffs)
        .map_err(|err| err.to_string())?;
    let recipe = catalog.get_recipe(args.item).map_err(|err| err.to_string())?;
    let table = catalog
        .yield_table(args.item, attrs.pharmacy_level())
        .map_err(|err| err.to_string())?;
    let distribution = OutcomeDistribution::enumerate(&attrs, recipe);

    write_csv(&args.out, &distribution, |score| table.yield_for(score).0)
        .map_err(|err| err.to_string())
}

fn write_csv(
    out: &Path,
    distribution: &OutcomeDistribution,
    yield_for: impl Fn(Score) -> u32,
) -> Result<(), std::io::Error> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut writer = BufWriter::new(File::create(out)?);
    writeln!(writer, "score,combos,yield")?;
    for (score, combos) in distribution.histogram() {
        writeln!(writer, "{},{},{}", score.0, combos, yield_for(score))?;
    }
    writer.flush()
}

struct Args {
    item: ItemId,
    assets: PathBuf,
    attrs: AttributeInput,
    buffs: Vec<String>,
    out: PathBuf,
}

impl Args {
    fn parse() -> Result<Self, String> {
        let mut item = None;
        let mut assets = PathBuf::from(ASSETS_DIR);
        let mut attrs = AttributeInput::default();
        let mut buffs = Vec::new();
        let mut out = PathBuf::from("target/pharmacy_scores.csv");
        let mut iter = env::args().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--item" => item = Some(parse_u32(next_value(&mut iter, "--item")?)?),
                "--assets" => assets = PathBuf::from(next_value(&mut iter, "--assets")?),
                "--int" => attrs.intelligence = Some(next_value(&mut iter, "--int")?),
                "--dex" => attrs.dexterity = Some(next_value(&mut iter, "--dex")?),
                "--luk" => attrs.luck = Some(next_value(&mut iter, "--luk")?),
                "--base-level" => attrs.base_level = Some(next_value(&mut iter, "--base-level")?),
                "--job-level" => attrs.job_level = Some(next_value(&mut iter, "--job-level")?),
                "--potion-research" => {
                    attrs.potion_research = Some(next_value(&mut iter, "--potion-research")?)
                }
                "--chemical-protection" => {
                    attrs.chemical_protection =
                        Some(next_value(&mut iter, "--chemical-protection")?)
                }
                "--pharmacy-level" => {
                    attrs.pharmacy_level = Some(next_value(&mut iter, "--pharmacy-level")?)
                }
                "--buffs" => buffs = parse_list(next_value(&mut iter, "--buffs")?),
                "--out" => out = PathBuf::from(next_value(&mut iter, "--out")?),
                flag => return Err(format!("unknown argument {flag}")),
            }
        }

        Ok(Self {
            item: ItemId(item.ok_or("--item missing")?),
            assets,
            attrs,
            buffs,
            out,
        })
    }
}

fn next_value(iter: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    iter.next().ok_or_else(|| format!("{flag} expects a value"))
}

fn parse_u32(value: String) -> Result<u32, String> {
    value.trim().parse().map_err(|err: std::num::ParseIntError| err.to_string())
}

fn parse_list(raw: String) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
