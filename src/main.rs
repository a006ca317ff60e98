mod render;
mod scene;

use clap::Parser;
use std::error::Error;
use std::path::PathBuf;

use tilelight_edit::Editor;
use tilelight_lighting::{LightJournal, LightRegistry, LightSink, NullSink};
use tilelight_world::LightingConfig;

use render::View;
use scene::Scene;

#[derive(Parser, Debug)]
#[command(name = "tilelight", about = "Replay a tile scene and print its light field")]
struct Args {
    /// Scene file (TOML)
    scene: PathBuf,
    /// Lighting config (TOML); defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = View::Luma)]
    channel: View,
    /// Also print per-cell light write counts
    #[arg(long)]
    journal: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let cfg = match &args.config {
        Some(path) => LightingConfig::from_path(path)?,
        None => LightingConfig::default(),
    };
    let scene = Scene::from_path(&args.scene)?;
    log::info!(
        "scene {}: {} fills, {} ops",
        args.scene.display(),
        scene.fill.len(),
        scene.op.len()
    );
    if args.journal {
        let lights = simulate(&scene, cfg, LightJournal::new(), args.channel);
        let r = &scene.region;
        print!("{}", render::render_touches(lights.sink(), r.min_cell(), r.max_cell()));
    } else {
        simulate(&scene, cfg, NullSink, args.channel);
    }
    Ok(())
}

fn simulate<S: LightSink>(
    scene: &Scene,
    cfg: LightingConfig,
    sink: S,
    view: View,
) -> LightRegistry<S> {
    let mut grid = scene.build_grid(cfg);
    let mut lights = LightRegistry::with_sink(sink);
    let mut editor = Editor::for_grid(&grid);
    let report = scene.apply(&mut grid, &mut lights, &mut editor);
    log::info!(
        "ops applied={} unchanged={} out_of_bounds={} ambient_sources={}; {} sources, {} chunks touched",
        report.applied,
        report.unchanged,
        report.out_of_bounds,
        report.ambient_sources,
        lights.len(),
        editor.dirty_chunks().len()
    );
    let r = &scene.region;
    print!(
        "{}",
        render::render_field(&grid, &lights, r.min_cell(), r.max_cell(), view)
    );
    lights
}
