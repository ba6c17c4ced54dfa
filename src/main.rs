use anyhow::{bail, Context};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use contractsign::adapters::{FsBlobStore, FsDocumentRenderer, JsonRecordStore, TracingNotifier};
use contractsign::{
    default_config_path, event_bus, init_logging, Collaborators, Config, ConfirmOutcome,
    ContractId, GestureStatus, PointerEvent, ViewportPoint, WorkflowController, BUILD_DATE,
    VERSION,
};

/// Sign a contract with a recorded signature
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Configuration file (JSON or TOML); defaults to the user config directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Contract to sign
    contract_id: String,

    /// JSON array of strokes, each an array of [x, y] surface points
    strokes: PathBuf,

    /// Left edge of the signature box on the preview, in pixels
    #[arg(allow_negative_numbers = true)]
    x: f64,

    /// Top edge of the signature box on the preview, in pixels
    #[arg(allow_negative_numbers = true)]
    y: f64,
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let path = match path {
        Some(path) => return Ok(Config::load_from_file(&path)?),
        None => default_config_path()?,
    };
    Ok(Config::load_or_default(&path)?)
}

/// Strokes file: an array of strokes, each an array of `[x, y]` points
fn load_strokes(path: &Path) -> anyhow::Result<Vec<Vec<[f32; 2]>>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading strokes from {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn replay(controller: &mut WorkflowController, strokes: &[Vec<[f32; 2]>]) -> anyhow::Result<()> {
    for stroke in strokes {
        let Some((first, rest)) = stroke.split_first() else {
            continue;
        };
        controller.pointer(PointerEvent::down(first[0], first[1]))?;
        for point in rest {
            controller.pointer(PointerEvent::moved(point[0], point[1]))?;
        }
        let last = stroke.last().unwrap_or(first);
        controller.pointer(PointerEvent::up(last[0], last[1]))?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;
    tracing::info!("contractsign {} (built {})", VERSION, BUILD_DATE);

    let args = Args::parse();
    let config = load_config(args.config)?;
    config.validate()?;
    let strokes = load_strokes(&args.strokes)?;

    let storage = &config.storage;
    let collaborators = Collaborators {
        renderer: Arc::new(FsDocumentRenderer::new(&storage.documents_dir)),
        blobs: Arc::new(FsBlobStore::from_settings(storage)),
        notifier: Arc::new(TracingNotifier),
        records: Arc::new(JsonRecordStore::new(&storage.records_file)),
    };

    let contract_id = ContractId::new(args.contract_id);
    let mut controller =
        WorkflowController::open(contract_id, collaborators, &config, event_bus()).await?;
    controller.confirm_preview()?;
    replay(&mut controller, &strokes)?;

    match controller.gesture_progress(100.0)? {
        GestureStatus::Accepted => {}
        GestureStatus::Rejected { message } => bail!(message),
        other => bail!("signature was not accepted: {:?}", other),
    }
    if let Some(message) = controller.last_error() {
        tracing::warn!("{}", message);
    }

    let placement = controller.place(ViewportPoint::new(args.x, args.y))?;
    tracing::info!("Signature placed at {}", placement);

    match controller.confirm().await? {
        ConfirmOutcome::Signed(receipt) => {
            if let Some(message) = controller.acknowledgment() {
                println!("{}", message);
            }
            println!("{}", receipt.document_url);
            Ok(())
        }
        ConfirmOutcome::Held { message } => bail!(message),
    }
}
