mod config;
mod events;
mod sys;
mod view;

use crate::config::Config;
use crate::events::PreviewEvent;
use crate::sys::runtime;
use clap::{Parser, Subcommand};
use donut::chart::{Donut, DonutEvent, ResizeBus, Viewport};
use std::cell::Cell;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Parser, Debug)]
#[command(name = "donut-preview", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Chart config file (defaults to the user config directory)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Print the layout as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Keep running: reload on config changes and read commands from stdin
    #[arg(short = 'w', long)]
    watch: bool,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Write the default config file and print its path
    Init,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let path = config::resolve_path(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Init) => {
            let path = config::write_default_config(&path)?;
            println!("{}", path.display());
            Ok(())
        }
        None => run(&path, cli.json, cli.watch),
    }
}

fn render(donut: &Donut, json: bool) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &view::snapshot(donut))?;
        writeln!(out)?;
    } else {
        view::draw(&mut out, donut)?;
    }
    out.flush()?;
    Ok(())
}

fn run(path: &Path, json: bool, watch: bool) -> anyhow::Result<()> {
    let mut config = config::load_config(path)?;

    let bus = ResizeBus::new();
    let width = Rc::new(Cell::new(config.container_width(None)));
    let source = width.clone();
    let (click_tx, clicks) = async_channel::unbounded();
    let mut donut = Donut::mount(
        config.chart.clone(),
        Box::new(move || Some(source.get())),
        &bus,
        click_tx,
    )?;

    render(&donut, json)?;
    if !watch {
        donut.unmount();
        return Ok(());
    }

    let (tx, rx) = async_channel::bounded(32);
    runtime::start_background_services(tx, path.to_path_buf());

    let mut viewport: Option<Viewport> = None;

    while let Ok(event) = rx.recv_blocking() {
        let redraw = match event {
            PreviewEvent::Quit => break,
            PreviewEvent::ConfigReload => {
                reload(path, &mut config, &mut donut, &width, &bus, viewport)
            }
            PreviewEvent::Resize(vp) => {
                viewport = Some(vp);
                width.set(config.container_width(viewport));
                bus.notify(vp);
                donut.handle_resize()
            }
            PreviewEvent::Enter(target) => donut.pointer_enter(target),
            PreviewEvent::Leave(target) => donut.pointer_leave(target),
            PreviewEvent::Click(target) => {
                if donut.click(target).is_none() {
                    log::warn!("Nothing to click at {:?}", target);
                }
                while let Ok(DonutEvent::SectionClick(section)) = clicks.try_recv() {
                    println!("section-click {}", serde_json::to_string(&*section)?);
                }
                false
            }
        };

        if redraw {
            render(&donut, json)?;
        }
    }

    donut.unmount();
    Ok(())
}

fn reload(
    path: &Path,
    config: &mut Config,
    donut: &mut Donut,
    width: &Cell<f64>,
    bus: &ResizeBus,
    viewport: Option<Viewport>,
) -> bool {
    match config::load_config(path) {
        Ok(new_config) => apply_config(new_config, config, donut, width, bus, viewport),
        Err(e) => {
            log::error!("Failed to reload config: {}", e);
            false
        }
    }
}

/// Swaps in a reloaded config, keeping the old one if the chart rejects it.
///
/// A new container width alone leaves the props unchanged, so it is announced
/// on the resize bus like any other container resize.
fn apply_config(
    new_config: Config,
    config: &mut Config,
    donut: &mut Donut,
    width: &Cell<f64>,
    bus: &ResizeBus,
    viewport: Option<Viewport>,
) -> bool {
    let new_width = new_config.container_width(viewport);
    let previous_width = width.replace(new_width);
    match donut.set_props(new_config.chart.clone()) {
        Ok(change) => {
            if !change.remeasure && new_width != previous_width {
                bus.notify(viewport.unwrap_or_default());
                donut.handle_resize();
            }
            *config = new_config;
            log::info!("Configuration reloaded");
            true
        }
        Err(e) => {
            width.set(previous_width);
            log::error!("Rejected reloaded config: {}", e);
            false
        }
    }
}
