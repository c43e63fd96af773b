mod braille;
mod config;
mod controls;
mod fractal;
mod help;
mod rotation;
mod settings;
mod surface;
mod terminal;
mod viewer;

use clap::{Args, Parser, Subcommand};
use config::{CellMetrics, Layout, PrintConfig, TreeParams, ViewConfig, FIXED_HEIGHT_RATIO};
use settings::Settings;
use std::io;

#[derive(Parser)]
#[command(name = "fractree")]
#[command(author = "Terminal Art Generator")]
#[command(version)]
#[command(about = "Terminal fractal tree explorer with adjustable branching", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Explore the tree interactively (default)
    Show {
        #[command(flatten)]
        tree: TreeArgs,

        /// Start with auto-rotation enabled
        #[arg(short, long)]
        rotate: bool,

        /// Rotation tick in seconds
        #[arg(short, long, default_value = "0.1")]
        time: f32,
    },

    /// Print a single frame to stdout (no interactive display)
    Print {
        #[command(flatten)]
        tree: TreeArgs,

        /// Output width in columns (defaults to terminal width)
        #[arg(long)]
        cols: Option<u16>,

        /// Output height in rows (defaults to terminal height)
        #[arg(long)]
        rows: Option<u16>,

        /// Draw the rotating tree at this angle in degrees (0 points up)
        #[arg(long, allow_negative_numbers = true)]
        rotation: Option<f64>,

        /// Print segment statistics instead of the tree
        #[arg(long)]
        stats: bool,
    },
}

#[derive(Args, Default)]
struct TreeArgs {
    /// Trunk line width (0.1-2)
    #[arg(long)]
    thickness: Option<f64>,

    /// Length ratio between a branch and its children (0.25-0.75)
    #[arg(short = 'f', long)]
    height_factor: Option<f64>,

    /// Recursion depth (1-7)
    #[arg(short = 'd', long)]
    max_depth: Option<u32>,

    /// Children per branch (1-10)
    #[arg(short = 'b', long)]
    branches: Option<u32>,

    /// Spread between sibling branches in degrees (1-360)
    #[arg(short = 'a', long)]
    angle: Option<f64>,

    /// Use the fixed 8/12 length ratio instead of --height-factor
    #[arg(long)]
    fixed_ratio: bool,

    /// Point the trunk straight up instead of the default 90° base
    #[arg(long)]
    upright: bool,
}

impl TreeArgs {
    /// Built-in defaults, then the settings file, then these flags
    fn resolve(&self, settings: &Settings) -> (TreeParams, Layout) {
        let base = settings.tree.apply(TreeParams::default());
        let requested = TreeParams {
            thickness: self.thickness.unwrap_or(base.thickness),
            height_factor: self.height_factor.unwrap_or(base.height_factor),
            max_depth: self.max_depth.unwrap_or(base.max_depth),
            branch_propagation: self.branches.unwrap_or(base.branch_propagation),
            angle: self.angle.unwrap_or(base.angle),
            ..base
        };
        let params = requested.clamped();
        if params != requested {
            log::warn!("tree parameters clamped to control ranges: {:?}", params);
        }

        let mut layout = Layout::default();
        if self.fixed_ratio || settings.view.fixed_ratio.unwrap_or(false) {
            layout.fixed_height_ratio = Some(FIXED_HEIGHT_RATIO);
        }
        if self.upright {
            layout.root_orientation = 0.0;
        }
        (params, layout)
    }
}

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let settings = Settings::load();
    log::debug!("settings: {:?}", settings);

    let command = cli.command.unwrap_or(Commands::Show {
        tree: TreeArgs::default(),
        rotate: false,
        time: rotation::TICK.as_secs_f32(),
    });

    match command {
        Commands::Show { tree, rotate, time } => {
            let (params, layout) = tree.resolve(&settings);
            let config = ViewConfig {
                params,
                layout,
                cells: CellMetrics::default(),
                rotate: rotate || settings.view.rotate.unwrap_or(false),
                tick: time,
            };
            viewer::run(config)?;
        }
        Commands::Print { tree, cols, rows, rotation, stats } => {
            let (params, layout) = tree.resolve(&settings);
            let (params, layout) = match rotation {
                Some(angle) => (params.with_rotation(angle), layout.rotating()),
                None => (params, layout),
            };
            let config = PrintConfig {
                params,
                layout,
                cells: CellMetrics::default(),
                cols,
                rows,
                stats,
            };
            viewer::print(config)?;
        }
    }

    Ok(())
}
