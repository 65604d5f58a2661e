use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::systems::pharmacy::AttributeInput;

pub const DEFAULT_SEED: u64 = 0x50_4841_524D;

fn parse_u64(value: &str) -> Result<u64, String> {
    let trimmed = value.trim();
    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        u64::from_str_radix(hex, 16).map_err(|err| err.to_string())
    } else {
        trimmed.parse::<u64>().map_err(|err| err.to_string())
    }
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "pharmacy",
    version,
    about = "Advanced Pharmacy score and yield calculator",
    disable_help_subcommand = true
)]
pub struct CliOptions {
    /// Directory holding catalog/, defaults/ and rulepacks/.
    #[arg(long, global = true)]
    pub assets: Option<PathBuf>,
    /// Where profile.json and prices.json live.
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,
    #[arg(long = "debug-logs", global = true)]
    pub debug_logs: bool,
    #[command(subcommand)]
    pub command: Command,
}

impl CliOptions {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Score range and per-item yields for the current character.
    Evaluate(EvaluateArgs),
    /// List catalog items.
    Items {
        #[arg(long = "final")]
        final_only: bool,
    },
    /// Show the materials and yield bands of one item (id or name).
    Recipe { item: String },
    /// Material and per-potion cost of every craftable final item.
    Cost(Overrides),
    Prices {
        #[command(subcommand)]
        action: PricesAction,
    },
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

/// Attribute values as typed. Anything left out comes from the saved profile.
#[derive(Debug, Clone, Default, Args)]
pub struct AttributeArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub int: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub dex: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub luk: Option<String>,
    #[arg(long = "base-level", allow_hyphen_values = true)]
    pub base_level: Option<String>,
    #[arg(long = "job-level", allow_hyphen_values = true)]
    pub job_level: Option<String>,
    #[arg(long = "potion-research", allow_hyphen_values = true)]
    pub potion_research: Option<String>,
    #[arg(long = "chemical-protection", allow_hyphen_values = true)]
    pub chemical_protection: Option<String>,
    #[arg(long = "pharmacy-level", allow_hyphen_values = true)]
    pub pharmacy_level: Option<String>,
}

impl AttributeArgs {
    pub fn to_input(&self) -> AttributeInput {
        AttributeInput {
            intelligence: self.int.clone(),
            dexterity: self.dex.clone(),
            luck: self.luk.clone(),
            base_level: self.base_level.clone(),
            job_level: self.job_level.clone(),
            potion_research: self.potion_research.clone(),
            chemical_protection: self.chemical_protection.clone(),
            pharmacy_level: self.pharmacy_level.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct Overrides {
    #[command(flatten)]
    pub attrs: AttributeArgs,
    /// Enable a buff on top of the profile's (repeatable).
    #[arg(long = "buff")]
    pub buffs: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub overrides: Overrides,
    /// Restrict the table to one item (id or name).
    #[arg(long)]
    pub item: Option<String>,
    /// Simulated crafts to draw.
    #[arg(long, default_value_t = 0)]
    pub samples: u32,
    #[arg(long, value_parser = parse_u64, default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

#[derive(Debug, Clone, Subcommand)]
pub enum PricesAction {
    Show,
    /// Change one price and save the book.
    Set {
        item: String,
        #[arg(allow_hyphen_values = true)]
        price: String,
        /// Print the edited book without writing it.
        #[arg(long = "dry-run")]
        dry_run: bool,
    },
    /// Write the current prices to the user file.
    Save,
    /// Overwrite the user file with the packaged defaults.
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ProfileAction {
    Show,
    /// Set one field (`int`, `dex`, `base_level`, `pharmacy_level`, ...) and save.
    Set {
        key: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    Buff {
        key: String,
        #[arg(value_enum)]
        state: Toggle,
    },
    Save,
    Reset,
    Import { file: PathBuf },
    Export { file: PathBuf },
}
