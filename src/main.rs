use clap::Parser;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use ifc_qto::config::{Config, LookupFailurePolicy, ZeroValuePolicy};
use ifc_qto::export::{export_csv, DirectorySink};
use ifc_qto::model::{FragmentId, Selection};
use ifc_qto::parser::ModelRegistry;
use ifc_qto::qto::QuantityTakeoff;
use ifc_qto::ui::App;

#[derive(Parser, Debug)]
#[command(name = "ifc-qto")]
#[command(about = "IFC QTO - sum element quantity sets over selected IFC elements")]
#[command(version)]
struct Args {
    /// IFC files to load; each becomes a model named after its file stem
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Express ids to select (comma separated, matched in every model)
    #[arg(long, value_delimiter = ',', value_name = "ID")]
    ids: Vec<u64>,

    /// Select elements of this IFC entity class (e.g. IFCWALL)
    #[arg(long, value_name = "TYPE")]
    entity: Option<String>,

    /// Select every element that carries property definitions
    #[arg(long)]
    all: bool,

    /// Export JSON (optional base name, defaults to the config value)
    #[arg(long, value_name = "NAME", num_args = 0..=1, default_missing_value = "")]
    json: Option<String>,

    /// Export CSV to this path
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Directory JSON exports are written into
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Keep zero-valued quantities instead of treating them as missing
    #[arg(long)]
    keep_zero: bool,

    /// Skip elements whose property lookups fail instead of aborting
    #[arg(long)]
    skip_failed: bool,

    /// Config file (defaults to ./ifc-qto.toml when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write logs to this file (the dashboard logs nowhere otherwise)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn headless(&self) -> bool {
        self.json.is_some() || self.csv.is_some()
    }

    /// CLI flags win over the config file.
    fn apply_to(&self, config: &mut Config) {
        if self.keep_zero {
            config.takeoff.zero_values = ZeroValuePolicy::Keep;
        }
        if self.skip_failed {
            config.takeoff.on_lookup_error = LookupFailurePolicy::SkipElement;
        }
        if let Some(dir) = &self.out_dir {
            config.export.directory.clone_from(dir);
        }
        if let Some(name) = self.json.as_deref().filter(|n| !n.is_empty()) {
            config.export.file_name = name.to_string();
        }
        if self.verbose {
            config.logging.level = "debug".to_string();
        }
    }

    /// Builds the selection from `--ids`, `--entity` and `--all`.
    ///
    /// With no selection flags every element is selected.
    fn selection(&self, registry: &ModelRegistry) -> Selection {
        let select_all = self.all || (self.ids.is_empty() && self.entity.is_none());
        let entity = self.entity.as_deref().map(str::to_ascii_uppercase);

        let mut selection = Selection::new();
        for element in registry.elements() {
            let by_id = self.ids.contains(&element.id);
            let by_entity = entity.as_deref() == Some(element.entity_type.as_str());
            if select_all || by_id || by_entity {
                selection.insert(
                    element.model.clone(),
                    FragmentId::new(&element.entity_type),
                    element.id,
                );
            }
        }
        selection
    }
}

fn init_logging(args: &Args, config: &Config) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .wrap_err("invalid log filter")?;

    if let Some(path) = &args.log_file {
        let file = File::create(path)
            .wrap_err_with(|| format!("failed to create log file '{}'", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if args.headless() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let mut config = Config::load_or_default(args.config.as_deref())?;
    args.apply_to(&mut config);
    init_logging(&args, &config)?;

    let registry = ModelRegistry::load(&args.files)?;
    let takeoff = QuantityTakeoff::new(config.takeoff);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .wrap_err("failed to start runtime")?;

    if !args.headless() {
        let terminal = ratatui::init();
        let result = App::new(registry, takeoff, config.export, runtime).run(terminal);
        ratatui::restore();
        return result;
    }

    let selection = args.selection(&registry);
    if selection.is_empty() {
        return Err(eyre!("selection matched no elements with property definitions"));
    }

    let mut takeoff = takeoff;
    let stats = runtime.block_on(takeoff.aggregate_selection(&registry, &selection))?;
    println!(
        "Summed {} quantities from {} elements into {} quantity sets",
        stats.quantities_added,
        stats.elements_visited,
        takeoff.totals().len()
    );

    if args.json.is_some() {
        let mut sink = DirectorySink::new(&config.export.directory);
        let name = takeoff.export_to(&mut sink, Some(&config.export.file_name))?;
        println!("Exported to JSON: {}", sink.dir().join(name).display());
    }

    if let Some(csv_path) = &args.csv {
        export_csv(takeoff.totals(), csv_path)?;
        println!("Exported to CSV: {}", csv_path.display());
    }

    takeoff.dispose();
    Ok(())
}
