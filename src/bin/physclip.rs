use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use physclip::scene::materials::MaterialCatalog;
use physclip::world::capture::HeadlessCapture;
use physclip::world::headless::HeadlessWorld;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "physclip", version)]
struct Cli {
    /// Log debug messages (repeat for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate every scene of a scene list.
    Generate(GenerateArgs),
    /// Print the scenes a scene list schedules, without simulating.
    Plan(PlanArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Scene list JSON.
    scenes: PathBuf,

    /// Output directory; nothing is written when omitted.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Random seed.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Image resolution, `<width>x<height>`.
    #[arg(short, long)]
    resolution: Option<physclip::Resolution>,

    /// Generator settings JSON; command-line flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overwrite a non-empty output directory.
    #[arg(long)]
    force: bool,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Scene list JSON.
    scenes: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn read_scene_list(path: &Path) -> anyhow::Result<physclip::SceneList> {
    physclip::SceneList::from_path(path)
        .with_context(|| format!("load scene list '{}'", path.display()))
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let scenes = read_scene_list(&args.scenes)?;
    for (i, spec) in scenes.scenes().iter().enumerate() {
        let protocol = physclip::Protocol::for_kind(spec.kind);
        println!(
            "{:>4}  {spec}  [{protocol}, {} runs]",
            i + 1,
            protocol.total_runs()
        );
    }
    println!(
        "{} scenes, {} runs in total",
        scenes.len(),
        scenes.total_runs()
    );
    Ok(())
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let scenes = read_scene_list(&args.scenes)?;

    let mut config = match &args.config {
        Some(path) => {
            let s = std::fs::read_to_string(path)
                .with_context(|| format!("read config '{}'", path.display()))?;
            physclip::GeneratorConfig::from_json_str(&s)
                .with_context(|| format!("parse config '{}'", path.display()))?
        }
        None => physclip::GeneratorConfig::default(),
    };
    if args.output_dir.is_some() {
        config.output_dir = args.output_dir;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(resolution) = args.resolution {
        config.resolution = resolution;
    }

    if let Some(dir) = &config.output_dir {
        prepare_output_dir(dir, args.force)?;
    }

    let catalog = MaterialCatalog::builtin();
    let saver = if config.is_dry_mode() {
        physclip::Saver::dry()
    } else {
        physclip::Saver::new(Box::new(HeadlessCapture::new(
            config.resolution,
            catalog.clone(),
        )))
    };

    let mut director =
        physclip::Director::new(HeadlessWorld::new(), saver, config, scenes, catalog)?;
    let seed = director.seed();
    let reports = director
        .run_to_completion()
        .with_context(|| format!("generation failed (seed {seed})"))?;

    let attempts: usize = reports.iter().map(|r| r.attempts).sum();
    eprintln!(
        "generated {} scenes in {attempts} attempts (seed {seed})",
        reports.len()
    );
    Ok(())
}

fn prepare_output_dir(dir: &Path, force: bool) -> anyhow::Result<()> {
    let non_empty = dir.is_dir()
        && std::fs::read_dir(dir)
            .with_context(|| format!("read output dir '{}'", dir.display()))?
            .next()
            .is_some();
    if non_empty {
        if !force {
            anyhow::bail!(
                "output directory '{}' is not empty, use --force to overwrite it",
                dir.display()
            );
        }
        std::fs::remove_dir_all(dir)
            .with_context(|| format!("remove output dir '{}'", dir.display()))?;
    }
    std::fs::create_dir_all(dir).with_context(|| format!("create output dir '{}'", dir.display()))
}
