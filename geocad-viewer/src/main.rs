use anyhow::{bail, Context, Result};
use clap::Parser;
use geocad_map::{
    drawing::{Drawing, PayloadBuilder},
    swap::HttpSwap,
    LatLng, MapOptions, RenderCycleController, StaticPage,
};
use std::{fs, path::PathBuf, time::Duration};

/// Runs the drawing list render cycle over a saved page and prints the result
#[derive(Parser, Debug)]
#[command(name = "geocad-viewer", version, about)]
struct Cli {
    /// Page snapshot: `{"elements": {"<id>": {"text": "..."}}}`
    #[arg(value_hint = clap::ValueHint::FilePath)]
    page: PathBuf,

    /// Drawing list (JSON array) to build the feature payloads from
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    drawings: Option<PathBuf>,

    /// Prefix of drawing detail paths in marker popups
    #[arg(long, default_value = "/drawing/")]
    detail_prefix: String,

    /// Register a click at LAT LNG after the first cycle
    #[arg(long, num_args = 2, value_names = ["LAT", "LNG"], allow_negative_numbers = true)]
    click: Option<Vec<f64>>,

    /// Open a drawing detail path and swap it into the card region
    #[arg(long, requires = "base_url")]
    open: Option<String>,

    /// Server the detail paths are fetched from
    #[arg(long)]
    base_url: Option<String>,

    /// Map container width in pixels
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Map container height in pixels
    #[arg(long, default_value_t = 600.0)]
    height: f64,

    /// Write the page back here after the run
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    geocad_map::init_logging();
    let cli = Cli::parse();

    let text = fs::read_to_string(&cli.page)
        .with_context(|| format!("reading page {}", cli.page.display()))?;
    let mut page = StaticPage::from_json(&text)?;
    let options = MapOptions::default().with_size(cli.width, cli.height);

    if let Some(path) = &cli.drawings {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading drawings {}", path.display()))?;
        let drawings: Vec<Drawing> = serde_json::from_str(&text)?;
        PayloadBuilder::new(cli.detail_prefix.clone())
            .build(&drawings)
            .write_to(&mut page, &options.ids)?;
        log::info!("embedded payloads for {} drawings", drawings.len());
    }

    let mut controller = RenderCycleController::load(page, options)?;

    if let Some(click) = &cli.click {
        let [lat, lng] = click.as_slice() else {
            bail!("--click takes LAT and LNG");
        };
        if !controller.handle_click(LatLng::new(*lat, *lng))? {
            log::warn!("map_on_click is off, click ignored");
        }
    }

    if let (Some(path), Some(base_url)) = (&cli.open, &cli.base_url) {
        let runtime = tokio::runtime::Runtime::new()?;
        let (swap, fragments) = HttpSwap::new(base_url, runtime.handle().clone())?;
        controller.set_swap(Box::new(swap));
        controller.open_drawing(path)?;

        let fragment = fragments
            .recv_timeout(Duration::from_secs(35))
            .with_context(|| format!("no response for {}", path))?;
        controller.page_mut().apply_fragment(&fragment)?;
    }

    println!("{}", serde_json::to_string_pretty(&controller.snapshot())?);

    if let Some(output) = &cli.output {
        fs::write(output, serde_json::to_string_pretty(controller.page())?)
            .with_context(|| format!("writing {}", output.display()))?;
    }

    Ok(())
}
