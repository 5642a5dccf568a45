use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use foldwork::{
    Axis, BlendMode, BorderOptions, BorderShape, BowGeometry, InfinityOptions, InfinityPlan,
    QuarterTurns, RasterCanvas, Recipe, Size, SpiralAspect,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "foldwork", version)]
struct Cli {
    /// More log output (-v for debug, -vv for trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply a JSON recipe to a PNG and write the flattened result.
    Apply(ApplyArgs),
    /// Print the geometry an operation would use for a canvas size, as JSON.
    Plan(PlanArgs),
}

#[derive(Parser, Debug)]
struct ApplyArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Recipe JSON.
    #[arg(long)]
    recipe: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    #[command(subcommand)]
    kind: PlanKind,

    /// Canvas width in pixels.
    #[arg(long, global = true, default_value_t = 1200)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, global = true, default_value_t = 400)]
    height: u32,
}

#[derive(Subcommand, Debug)]
enum PlanKind {
    /// Tile placements of one accordion pass.
    Accordion {
        #[arg(long, value_enum, default_value_t = AxisArg::Horizontal)]
        axis: AxisArg,
        #[arg(long, default_value_t = 2)]
        count: u32,
        /// Do not flip alternate tiles.
        #[arg(long)]
        no_flip: bool,
    },
    /// Fibonacci pair the canvas would be scaled to.
    Fibonacci {
        /// Square the canvas (equal area) first.
        #[arg(long)]
        square: bool,
    },
    /// Spiral tile placements.
    Spiral {
        #[arg(long, value_enum, default_value_t = AspectArg::Square)]
        aspect: AspectArg,
        /// Quarter turns added per tile.
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        turns: i64,
    },
    /// Radii, padding and crop of a pan-to-bow.
    Bow {
        #[arg(long, default_value_t = 180.0)]
        angle: f64,
    },
    /// Quadrant geometry of the infinity composer.
    Infinity {
        #[arg(long, default_value_t = 0.0)]
        pad_degrees: f64,
        #[arg(long, default_value_t = 0)]
        squeeze: u32,
    },
    /// Inset regions of the jagged border passes.
    Border {
        #[arg(long, value_enum, default_value_t = ShapeArg::Rectangular)]
        shape: ShapeArg,
        #[arg(long, default_value_t = 50)]
        size: u32,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AxisArg {
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AspectArg {
    Rectangle,
    Square,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ShapeArg {
    Rectangular,
    Horizontal,
    Vertical,
    Elliptical,
    Rounded,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Apply(args) => cmd_apply(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "foldwork=info",
        1 => "foldwork=debug",
        _ => "foldwork=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_recipe(path: &Path) -> anyhow::Result<Recipe> {
    let f = File::open(path).with_context(|| format!("open recipe '{}'", path.display()))?;
    let recipe = Recipe::from_reader(BufReader::new(f))
        .with_context(|| format!("read recipe '{}'", path.display()))?;
    Ok(recipe)
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    let recipe = read_recipe(&args.recipe)?;
    recipe.validate()?;

    let input = image::open(&args.in_path)
        .with_context(|| format!("open image '{}'", args.in_path.display()))?
        .to_rgba8();
    let mut canvas = RasterCanvas::from_image(input)?;

    let advisories = recipe.apply(&mut canvas)?;
    for advisory in &advisories {
        eprintln!("warning: {advisory}");
    }

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    canvas
        .composite()
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let size = Size::new(args.width, args.height)?;
    let plan = match args.kind {
        PlanKind::Accordion {
            axis,
            count,
            no_flip,
        } => {
            let axis = match axis {
                AxisArg::Horizontal => Axis::Horizontal,
                AxisArg::Vertical => Axis::Vertical,
            };
            let tiles = foldwork::plan_accordion(size, axis, count, !no_flip)?;
            serde_json::json!({
                "canvas": size.repeated(axis, count),
                "tiles": tiles,
            })
        }
        PlanKind::Fibonacci { square } => {
            let start = if square {
                foldwork::square_of_equal_area(size)
            } else {
                size
            };
            serde_json::json!({ "from": start, "to": foldwork::fibonacci_fit(start) })
        }
        PlanKind::Spiral { aspect, turns } => {
            let aspect = match aspect {
                AspectArg::Rectangle => SpiralAspect::Rectangle,
                AspectArg::Square => SpiralAspect::Square,
            };
            let landscape = if size.is_portrait() {
                size.transposed()
            } else {
                size
            };
            let square = aspect == SpiralAspect::Square || landscape.is_square();
            let mut turn = QuarterTurns::new(turns);
            if aspect == SpiralAspect::Rectangle && !turn.is_odd() {
                turn = QuarterTurns::CW;
            }
            let start = if square {
                foldwork::square_of_equal_area(landscape)
            } else {
                landscape
            };
            let fitted = foldwork::fibonacci_fit(start);
            let plan = foldwork::plan_spiral(fitted, square, turn, BlendMode::Normal, 100.0);
            serde_json::json!({ "plan": plan, "bounds": plan.bounds() })
        }
        PlanKind::Bow { angle } => {
            let geometry = BowGeometry::compute(size, angle)?;
            let crop = geometry.crop(geometry.stretched());
            serde_json::json!({
                "geometry": geometry,
                "crop": crop,
                "advisories": geometry.advisories(),
            })
        }
        PlanKind::Infinity {
            pad_degrees,
            squeeze,
        } => {
            let opts = InfinityOptions {
                pad_degrees,
                squeeze_middle: squeeze,
                ..InfinityOptions::default()
            };
            serde_json::to_value(InfinityPlan::compute(size, &opts)?)?
        }
        PlanKind::Border { shape, size: border } => {
            let shape = match shape {
                ShapeArg::Rectangular => BorderShape::Rectangular,
                ShapeArg::Horizontal => BorderShape::HorizontalOnly,
                ShapeArg::Vertical => BorderShape::VerticalOnly,
                ShapeArg::Elliptical => BorderShape::Elliptical,
                ShapeArg::Rounded => BorderShape::RoundedRectangular,
            };
            let opts = BorderOptions {
                shape,
                size: border,
                ..BorderOptions::default()
            };
            serde_json::json!({ "passes": foldwork::border_passes(size, &opts) })
        }
    };

    let stdout = std::io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), &plan).context("write plan JSON")?;
    println!();
    Ok(())
}
