use anyhow::Context as _;
use quakemap::{
    core::geo::Point,
    session::MapSession,
    ui::widget::{MapView, MapViewConfig},
    HttpFeedLoader, MapConfig,
};
use std::{sync::Arc, time::Duration};

const WINDOW_SIZE: [f32; 2] = [1200.0, 800.0];

/// How often the window repaints while the plate overlay is still loading
const LOADING_REPAINT_INTERVAL: Duration = Duration::from_millis(250);

struct Args {
    headless: bool,
    config_path: Option<String>,
}

impl Args {
    fn parse() -> anyhow::Result<Self> {
        let mut args = Args {
            headless: false,
            config_path: None,
        };

        let mut iter = std::env::args().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--headless" => args.headless = true,
                "--config" => {
                    let path = iter.next().context("--config needs a path")?;
                    args.config_path = Some(path);
                }
                other => anyhow::bail!("unknown argument '{}' (expected --headless or --config <path>)", other),
            }
        }
        Ok(args)
    }
}

/// Earthquake map viewer
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse()?;

    let config = match &args.config_path {
        Some(path) => MapConfig::from_file(path)
            .with_context(|| format!("reading configuration from {}", path))?,
        None => MapConfig::default(),
    }
    .with_env_overrides();

    if config.access_token.is_empty() {
        log::warn!("No map access token configured; basemap tiles may fail to load");
    }

    let loader = HttpFeedLoader::new(config.feeds.request_timeout())?;
    let config = Arc::new(config);
    let size = Point::new(WINDOW_SIZE[0] as f64, WINDOW_SIZE[1] as f64);
    let session = MapSession::start(config.clone(), Arc::new(loader), size).await?;

    if args.headless {
        let status = session
            .wait_for_plates(config.feeds.request_timeout())
            .await;
        log::info!("Plate boundaries: {}", status);
        println!("{}", serde_json::to_string_pretty(&session.map().summary())?);
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(WINDOW_SIZE)
            .with_title(format!("quakemap: {}", config.container_id)),
        ..Default::default()
    };

    eframe::run_native(
        "quakemap-app",
        options,
        Box::new(|cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Box::new(QuakemapApp::new(session))
        }),
    )
    .map_err(|e| anyhow::anyhow!("window failed: {}", e))?;

    Ok(())
}

struct QuakemapApp {
    session: MapSession,
    view_config: MapViewConfig,
}

impl QuakemapApp {
    fn new(session: MapSession) -> Self {
        Self {
            session,
            view_config: MapViewConfig {
                background_color: egui::Color32::from_rgb(230, 230, 230),
                ..Default::default()
            },
        }
    }
}

impl eframe::App for QuakemapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                ui.add(MapView::new(self.session.map_mut()).with_config(self.view_config.clone()));
            });

        // The plate overlay fills in from a background task
        if self.session.plates_loading() {
            ctx.request_repaint_after(LOADING_REPAINT_INTERVAL);
        }
    }
}
