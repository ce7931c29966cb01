use anyhow::Result;
use metrics_exporter_prometheus::PrometheusHandle;
use nutricheck::config::AppConfig;
use nutricheck::errors::error_logging;
use nutricheck::image_codec::ImageCodec;
use nutricheck::observability;
use nutricheck::services::{Collaborators, FrameSource};
use nutricheck::workflow::{AcquisitionMode, Outcome, Workflow};
use nutricheck::AppResult;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

const HELP: &str = "\
Commands:
  mode scan|upload     select the acquisition panel
  camera               toggle the camera (selects scan mode)
  frame <path>         image file the camera sees
  capture              OCR the current camera frame
  upload <path>        OCR an image file (upload mode only)
  speak                open the speech dialog
  start                start speech recognition
  cancel               close the speech dialog
  draft <text>         type into the product name field
  confirm | edit       confirm or unlock the product name
  search               look up the confirmed product
  profile <user-id>    load a user profile
  remove               remove the image and start over
  reset                start over
  show                 print the session
  metrics              print the metrics snapshot
  quit";

/// Camera backed by an image file chosen with the `frame` command
struct FileCamera {
    frame: Mutex<Option<PathBuf>>,
    codec: ImageCodec,
}

impl FrameSource for FileCamera {
    fn screenshot(&self) -> Option<String> {
        let path = self.frame.lock().clone()?;
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Camera frame unreadable");
                return None;
            }
        };
        self.codec.encode_data_url(&bytes).ok()
    }
}

/// Load and validate configuration at startup
fn load_config() -> Result<AppConfig> {
    let config = AppConfig::from_env()?;
    if let Err(e) = config.validate() {
        error_logging::log_config_error(&e, "AppConfig", "startup_validation");
        return Err(e.into());
    }
    Ok(config)
}

fn report(operation: &str, result: AppResult<Outcome>) {
    match result {
        Ok(Outcome::Applied) => println!("{}: done", operation),
        Ok(Outcome::Ignored) => println!("{}: nothing to do", operation),
        Ok(Outcome::Discarded) => println!("{}: superseded", operation),
        Err(e) => println!("{}: {}", operation, e.user_message()),
    }
}

fn print_session(workflow: &Workflow) {
    let session = workflow.snapshot();
    println!("phase:     {:?}", session.phase());
    println!("capture:   {:?}", session.capture_state());
    println!("speech:    {:?}", session.speech_dialog());
    println!("draft:     {:?}", session.draft());
    println!("confirmed: {:?}", session.confirmed_name());
    println!("loading:   {}", session.is_loading());
    println!("preview:   {}", if session.preview().is_some() { "shown" } else { "none" });
    if let Some(error) = session.error() {
        println!("error:     {}", error);
    }
    if let Some(profile) = session.profile() {
        println!("profile:   {}", serde_json::to_string(profile).unwrap_or_default());
    }
    if let Some(view) = session.view() {
        println!();
        print!("{}", view);
    }
}

async fn handle(
    line: &str,
    workflow: &Arc<Workflow>,
    camera: &FileCamera,
    metrics: Option<&PrometheusHandle>,
) -> bool {
    let (command, argument) = match line.trim().split_once(' ') {
        Some((command, argument)) => (command, argument.trim()),
        None => (line.trim(), ""),
    };

    match command {
        "" => {}
        "mode" => match argument {
            "scan" => workflow.set_mode(AcquisitionMode::Scan),
            "upload" => workflow.set_mode(AcquisitionMode::Upload),
            _ => println!("usage: mode scan|upload"),
        },
        "camera" => workflow.toggle_camera(),
        "frame" => *camera.frame.lock() = Some(PathBuf::from(argument)),
        "capture" => {
            let workflow = Arc::clone(workflow);
            tokio::spawn(async move { report("capture", workflow.capture_frame().await) });
        }
        "upload" => match tokio::fs::read(argument).await {
            Ok(bytes) => {
                let workflow = Arc::clone(workflow);
                tokio::spawn(async move { report("upload", workflow.upload_file(bytes).await) });
            }
            Err(e) => println!("upload: cannot read {}: {}", argument, e),
        },
        "speak" => workflow.open_speech_dialog(),
        "start" => {
            let workflow = Arc::clone(workflow);
            tokio::spawn(async move { report("speech", workflow.confirm_speech().await) });
        }
        "cancel" => workflow.cancel_speech(),
        "draft" => {
            if !workflow.set_draft(argument) {
                println!("draft: the name is confirmed, use edit first");
            }
        }
        "confirm" => match workflow.confirm() {
            Ok(name) => println!("confirmed: {}", name),
            Err(e) => println!("confirm: {}", e.user_message()),
        },
        "edit" => {
            if let Err(e) = workflow.edit() {
                println!("edit: {}", e.user_message());
            }
        }
        "search" => {
            let workflow = Arc::clone(workflow);
            tokio::spawn(async move { report("search", workflow.search().await) });
        }
        "profile" => {
            let workflow = Arc::clone(workflow);
            let user_id = argument.to_string();
            tokio::spawn(async move {
                match workflow.load_profile(&user_id).await {
                    Ok(_) => println!("profile: loaded"),
                    Err(e) => println!("profile: {}", e.user_message()),
                }
            });
        }
        "remove" => workflow.remove_image(),
        "reset" => workflow.reset(),
        "show" => print_session(workflow),
        "metrics" => match metrics {
            Some(handle) => print!("{}", handle.render()),
            None => println!("metrics are disabled"),
        },
        "help" => println!("{}", HELP),
        "quit" | "exit" => return false,
        other => println!("unknown command {:?}, try help", other),
    }
    true
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load environment variables from .env file first
    dotenvy::dotenv().ok();

    let config = load_config()?;
    let metrics = observability::init_observability_with_config(&config.observability)?;
    info!(config = %config.summary(), "Configuration loaded");

    let codec = ImageCodec::new(config.images.clone());
    let camera = Arc::new(FileCamera {
        frame: Mutex::new(None),
        codec: codec.clone(),
    });
    let services = Collaborators::http(&config, camera.clone())?;
    let workflow = Arc::new(Workflow::new(services, codec));

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if !handle(&line, &workflow, &camera, metrics.as_ref()).await {
            break;
        }
    }

    info!("Shutting down");
    Ok(())
}
