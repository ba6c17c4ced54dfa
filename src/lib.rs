//! # ContractSign
//!
//! Contract e-signature workflow: review a rendered contract, draw a
//! signature, drop it on the page and submit the signed document.
//!
//! ## Architecture
//!
//! ContractSign is organized as a workspace with multiple crates:
//!
//! 1. **contractsign-core** - Data model, units, errors, collaborator traits, events
//! 2. **contractsign-capture** - Signature capture surface and confirmation gesture
//! 3. **contractsign-document** - Preview transform, PDF inspection and merge
//! 4. **contractsign-settings** - Configuration files
//! 5. **contractsign-workflow** - Stage machine, submission pipeline, adapters
//! 6. **contractsign** - Command-line driver that integrates all crates

pub use contractsign_capture::{
    CaptureOutcome, CaptureSurface, Pen, PointerEvent, PointerKind, PointerPhase, Stroke,
    SurfaceConfig,
};

pub use contractsign_core::{
    event_bus, ContractId, ContractPatch, ContractRecord, ContractStatus, DocumentRect,
    DocumentSize, Error, EventBus, PlacementPoint, Result, SignatureImage, Signer, Stage,
    ViewportPoint, ViewportSize, WorkflowError, WorkflowEvent,
};

pub use contractsign_document::{blank_document, inspect, merge, PageGeometry, PreviewTransform};

pub use contractsign_settings::{default_config_path, Config};

pub use contractsign_workflow::{
    adapters, Collaborators, ConfirmOutcome, GestureStatus, SubmissionReceipt, WorkflowController,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Console output with pretty formatting, filtered by `RUST_LOG` with
/// INFO as the floor.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
