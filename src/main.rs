//! Grow Calculator CLI
//!
//! Yield, electricity, extraction and setup estimates for indoor grows.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use grow_calculator::calculator::{self, PlanInput};
use grow_calculator::config::{CycleDurations, GrowFile};
use grow_calculator::energy;
use grow_calculator::extraction;
use grow_calculator::models::{
    BiologyInput, DeviceEntry, EnvironmentInput, ExtractionInput, ExtractionParams, LightTech,
    LightingInput, MassUnit, MediumType, SourceMaterial, StrainType, TrainingMethod, YieldResult,
};
use grow_calculator::parse;
use grow_calculator::recommender;
use grow_calculator::yields::{self, YieldMetrics};

/// Main light wattage for the default loadout when no grow is described
const DEFAULT_LIGHT_WATTS: f64 = 600.0;

#[derive(Parser)]
#[command(name = "grow-calc")]
#[command(about = "Yield, energy, extraction and setup calculator for indoor grows")]
struct Cli {
    /// Optional TOML file with [global], [cycle] and [[devices]] sections
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Currency symbol used in output
    #[arg(long, global = true)]
    currency: Option<String>,

    /// Electricity cost per kWh
    #[arg(long, global = true)]
    kwh_cost: Option<f64>,

    /// Grower skill multiplier (0.5 = newbie, 1.5 = master)
    #[arg(long, global = true)]
    skill: Option<f64>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict dry harvest weight and show the limiting factor
    Yield {
        #[command(flatten)]
        grow: GrowArgs,
    },

    /// Electricity use and cost over a full cycle
    Energy {
        #[command(flatten)]
        loadout: LoadoutArgs,

        #[command(flatten)]
        cycle: CycleArgs,

        /// Expected harvest for cost per gram (e.g. "820g", "2lb")
        #[arg(long)]
        harvest: Option<String>,
    },

    /// Rosin (and hash) yield from an input weight
    Extract {
        /// Input weight, bare numbers are ounces (e.g. "28", "1lb", "800g")
        input: String,

        #[command(flatten)]
        extraction: ExtractionArgs,
    },

    /// Recommend hardware for a target harvest
    Recommend {
        /// Target harvest (e.g. "1lb", "500g", "8")
        target: String,

        /// Unit for a bare number target
        #[arg(short, long, value_enum, default_value = "ounces")]
        unit: MassUnit,
    },

    /// Yield, energy and extraction in one pass
    Plan {
        #[command(flatten)]
        grow: GrowArgs,

        #[command(flatten)]
        loadout: LoadoutArgs,

        #[command(flatten)]
        cycle: CycleArgs,

        #[command(flatten)]
        extraction: ExtractionArgs,
    },

    /// Show the equipment loadout that energy calculations will use
    Devices {
        #[command(flatten)]
        loadout: LoadoutArgs,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Args)]
struct GrowArgs {
    /// Tent length in feet
    #[arg(long, default_value = "4")]
    length: f64,

    /// Tent width in feet
    #[arg(long, default_value = "4")]
    width: f64,

    /// True draw at the wall in watts
    #[arg(long, default_value = "600")]
    watts: f64,

    #[arg(long, value_enum, default_value = "high-end-led")]
    light_tech: LightTech,

    /// CO2 supplementation (>1200ppm)
    #[arg(long)]
    co2: bool,

    #[arg(long, default_value = "4")]
    plants: u32,

    /// Pot size in gallons
    #[arg(long, default_value = "5")]
    pot: f64,

    #[arg(long, value_enum, default_value = "photoperiod")]
    strain: StrainType,

    /// Training methods, comma separated
    #[arg(long, value_enum, value_delimiter = ',')]
    training: Vec<TrainingMethod>,

    #[arg(long, value_enum, default_value = "soil")]
    medium: MediumType,
}

impl GrowArgs {
    fn inputs(&self) -> (EnvironmentInput, LightingInput, BiologyInput) {
        (
            EnvironmentInput {
                length_ft: self.length,
                width_ft: self.width,
            },
            LightingInput {
                true_watts: self.watts,
                light_tech: self.light_tech,
                co2_supplemented: self.co2,
            },
            BiologyInput {
                plant_count: self.plants,
                pot_size_gallons: self.pot,
                strain_type: self.strain,
                training_methods: self.training.iter().copied().collect(),
                medium_type: self.medium,
            },
        )
    }
}

#[derive(Args)]
struct LoadoutArgs {
    /// Device as Name:watts:veg:flower:dry[:light|climate]; repeat to build a loadout
    #[arg(long = "device")]
    devices: Vec<String>,

    /// Main light wattage for the default loadout (defaults to --watts where available)
    #[arg(long)]
    light_watts: Option<f64>,
}

impl LoadoutArgs {
    /// Devices from the command line, else the config file, else the default seed list
    fn devices(&self, file: &GrowFile, fallback_watts: f64) -> Result<Vec<DeviceEntry>> {
        if !self.devices.is_empty() {
            return self
                .devices
                .iter()
                .map(|spec| parse::parse_device(spec).map_err(Into::into))
                .collect();
        }
        Ok(file.devices_or_default(self.light_watts.unwrap_or(fallback_watts)))
    }
}

#[derive(Args)]
struct CycleArgs {
    #[arg(long)]
    veg_days: Option<u32>,

    #[arg(long)]
    flower_days: Option<u32>,

    #[arg(long)]
    dry_days: Option<u32>,
}

impl CycleArgs {
    fn resolve(&self, base: CycleDurations) -> CycleDurations {
        CycleDurations {
            veg_days: self.veg_days.unwrap_or(base.veg_days),
            flower_days: self.flower_days.unwrap_or(base.flower_days),
            dry_days: self.dry_days.unwrap_or(base.dry_days),
        }
    }
}

#[derive(Args)]
struct ExtractionArgs {
    #[arg(long, value_enum, default_value = "dry-cured")]
    material: SourceMaterial,

    /// Flower press return in percent
    #[arg(long)]
    press_return: Option<f64>,

    /// Fresh frozen wash yield in percent
    #[arg(long)]
    wash_yield: Option<f64>,

    /// Hash to rosin press yield in percent
    #[arg(long)]
    press_yield: Option<f64>,
}

impl ExtractionArgs {
    fn params(&self) -> ExtractionParams {
        let defaults = ExtractionParams::default();
        let params = ExtractionParams {
            press_return_pct: self.press_return.unwrap_or(defaults.press_return_pct),
            wash_yield_pct: self.wash_yield.unwrap_or(defaults.wash_yield_pct),
            press_yield_pct: self.press_yield.unwrap_or(defaults.press_yield_pct),
        };
        for (field, value, band) in extraction::atypical_params(self.material, &params) {
            warn!(
                "{} = {}% is outside the usual {}-{}% range",
                field,
                value,
                band.start(),
                band.end()
            );
        }
        params
    }
}

#[derive(Serialize)]
struct YieldReport<'a> {
    #[serde(flatten)]
    result: &'a YieldResult,
    metrics: &'a YieldMetrics,
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Print either the JSON form of `value` or its text rendering
fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text());
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let mut file = match &cli.config {
        Some(path) => GrowFile::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GrowFile::default(),
    };
    if let Some(currency) = &cli.currency {
        file.global.currency_symbol = currency.clone();
    }
    if let Some(kwh_cost) = cli.kwh_cost {
        file.global.kwh_cost = kwh_cost;
    }
    if let Some(skill) = cli.skill {
        file.global.grower_skill = skill;
    }
    file.global.validate()?;
    let config = &file.global;
    let currency = config.currency_symbol.as_str();

    match &cli.command {
        Commands::Yield { grow } => {
            let (env, lighting, biology) = grow.inputs();
            let result = yields::compute_yield(&env, &lighting, &biology, config)?;
            let metrics = yields::yield_metrics(&result, &env, &lighting, config);
            let report = YieldReport {
                result: &result,
                metrics: &metrics,
            };
            emit(cli.json, &report, || {
                calculator::format_yield(&result, &metrics, currency)
            })?;
        }

        Commands::Energy {
            loadout,
            cycle,
            harvest,
        } => {
            let devices = loadout.devices(&file, DEFAULT_LIGHT_WATTS)?;
            let cycle = cycle.resolve(file.cycle);
            let harvest_grams = match harvest {
                Some(text) => {
                    let (value, unit) = parse::parse_mass(text, MassUnit::Grams)?;
                    Some(unit.to_grams(value))
                }
                None => None,
            };

            let result =
                energy::compute_energy(&devices, &cycle, config.kwh_cost, harvest_grams)?;
            emit(cli.json, &result, || calculator::format_energy(&result, currency))?;
        }

        Commands::Extract { input, extraction: args } => {
            let (value, unit) = parse::parse_mass(input, MassUnit::Ounces)?;
            let result = extraction::compute_extraction(&ExtractionInput {
                source_material: args.material,
                input_mass_grams: unit.to_grams(value),
                params: args.params(),
            })?;
            emit(cli.json, &result, || calculator::format_extraction(&result))?;
        }

        Commands::Recommend { target, unit } => {
            let (value, unit) = parse::parse_mass(target, *unit)?;
            info!("Recommending setup for {}{}", value, unit);
            let result = recommender::recommend(value, unit)?;
            emit(cli.json, &result, || calculator::format_recommendation(&result))?;
        }

        Commands::Plan {
            grow,
            loadout,
            cycle,
            extraction,
        } => {
            let (env, lighting, biology) = grow.inputs();
            let input = PlanInput {
                env,
                lighting,
                biology,
                devices: loadout.devices(&file, grow.watts)?,
                cycle: cycle.resolve(file.cycle),
                source_material: extraction.material,
                extraction_params: extraction.params(),
            };
            let plan = calculator::calculate_grow_plan(&input, config)?;
            emit(cli.json, &plan, || plan.to_string())?;
        }

        Commands::Devices { loadout } => {
            let devices = loadout.devices(&file, DEFAULT_LIGHT_WATTS)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&devices)?);
            } else {
                println!(
                    "{:<24} {:>8} {:>6} {:>6} {:>6} {:>8}",
                    "Device", "Watts", "Veg", "Flower", "Dry", "Kind"
                );
                println!("{}", "-".repeat(63));
                for d in devices {
                    println!(
                        "{:<24} {:>8.0} {:>6.2} {:>6.2} {:>6.2} {:>8}",
                        d.name,
                        d.watts,
                        d.veg_duty,
                        d.flower_duty,
                        d.dry_duty,
                        format!("{:?}", d.kind()).to_lowercase()
                    );
                }
            }
        }

        Commands::Config => {
            print!("{}", file.to_toml_string()?);
        }
    }

    Ok(())
}
