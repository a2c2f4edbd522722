mod app;
mod input;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use thread_arcs::{ArcPlacement, Orientation, RetainedSurface, SortStrategy, ThreadArcsOptions};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SortArg {
    ByGeneration,
    DepthZeroFirst,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OrientationArg {
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PlacementArg {
    Signed,
    Alternating,
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Thread JSON file with `nodes` and `links` or `parents`.
    input: PathBuf,

    /// Options JSON merged over the options embedded in the thread file.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, conflicts_with = "order")]
    sort: Option<SortArg>,

    /// Explicit order, `order[new] = old`, e.g. `--order 2,0,1`.
    #[arg(long, value_delimiter = ',')]
    order: Option<Vec<usize>>,

    #[arg(long, value_enum)]
    orientation: Option<OrientationArg>,

    #[arg(long)]
    space: Option<f64>,

    #[arg(long)]
    max_arc_height: Option<f64>,

    #[arg(long)]
    lambda: Option<f64>,

    #[arg(long)]
    radius: Option<f64>,

    #[arg(long, value_enum)]
    placement: Option<PlacementArg>,

    #[arg(long)]
    no_tooltip: bool,

    /// Render once to this SVG file instead of opening the viewer.
    #[arg(long)]
    svg: Option<PathBuf>,
}

impl Args {
    fn options(&self) -> ThreadArcsOptions {
        ThreadArcsOptions {
            space: self.space,
            max_arc_height: self.max_arc_height,
            lambda: self.lambda,
            radius: self.radius,
            orientation: self.orientation.map(|orientation| match orientation {
                OrientationArg::Horizontal => Orientation::Horizontal,
                OrientationArg::Vertical => Orientation::Vertical,
            }),
            placement: self.placement.map(|placement| match placement {
                PlacementArg::Signed => ArcPlacement::Signed,
                PlacementArg::Alternating => ArcPlacement::Alternating,
            }),
            disable_tooltip: self.no_tooltip,
            ..ThreadArcsOptions::default()
        }
    }

    fn sort_strategy(&self) -> Option<SortStrategy> {
        if let Some(order) = &self.order {
            return Some(SortStrategy::Permutation(order.clone()));
        }
        self.sort.map(|sort| match sort {
            SortArg::ByGeneration => SortStrategy::ByGeneration,
            SortArg::DepthZeroFirst => SortStrategy::DepthZeroFirst,
        })
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn export_svg(
    thread: input::Thread,
    options: &ThreadArcsOptions,
    sort: Option<&SortStrategy>,
    out: &Path,
) -> Result<()> {
    let mut diagram = input::build_diagram(RetainedSurface::new(), thread, options)?;
    if let Some(strategy) = sort {
        diagram
            .sort(strategy)
            .with_context(|| format!("failed to apply {} order", strategy.label()))?;
    }
    diagram.draw();

    let (width, height) = diagram.canvas_size();
    fs::write(out, diagram.surface().to_svg(width, height))
        .with_context(|| format!("failed to write {}", out.display()))?;

    info!(
        path = %out.display(),
        nodes = diagram.graph().len(),
        arcs = diagram.scene().arcs().len(),
        "svg written"
    );
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let (thread, options) =
        input::load_with_overrides(&args.input, args.config.as_deref(), &args.options())?;
    let sort = args.sort_strategy();

    if let Some(out) = &args.svg {
        return export_svg(thread, &options, sort.as_ref(), out);
    }

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 760.0]),
        ..Default::default()
    };

    let source = app::ThreadSource {
        input: args.input.clone(),
        config: args.config.clone(),
        overrides: args.options(),
    };
    eframe::run_native(
        "thread-arcs",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(app::ThreadArcsApp::new(
                cc,
                source,
                (thread, options),
                sort,
            )))
        }),
    )
    .map_err(|error| anyhow!("viewer exited with an error: {error}"))
}
