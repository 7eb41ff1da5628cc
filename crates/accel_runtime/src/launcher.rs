//! The single-shot launch pipeline.
//!
//! Drives exactly one kernel invocation through the [`Accelerator`]
//! boundary: discover a device, build the program, submit, block until
//! completion, read the two prices back. No stage is retried; the first
//! failure is terminal.

use std::fmt;

use thiserror::Error;
use tracing::info;

use accel_core::{PricingParameters, PricingResult};

use crate::device::{Accelerator, DeviceError};
use crate::image::{BinaryImage, ImageError};

/// The kernel entry point the pricing binary exports.
pub const DEFAULT_ENTRY_POINT: &str = "blackAsian";

/// The kernel writes two outputs: call price and put price.
const OUTPUT_SLOTS: usize = 2;

/// Options for one launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Kernel entry point to invoke.
    pub entry_point: String,
    /// Which discovered device to build for.
    pub device_index: usize,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            device_index: 0,
        }
    }
}

/// Pipeline stage, for log context and error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchStage {
    /// Enumerating accelerator devices.
    DiscoveringDevices,
    /// Loading and building the binary for the device.
    BuildingProgram,
    /// Submitting the kernel invocation.
    Submitting,
    /// Blocking on job completion.
    AwaitingCompletion,
    /// Copying output buffers back to the host.
    ReadingBack,
}

impl fmt::Display for LaunchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DiscoveringDevices => "discovering devices",
            Self::BuildingProgram => "building program",
            Self::Submitting => "submitting job",
            Self::AwaitingCompletion => "awaiting completion",
            Self::ReadingBack => "reading back results",
        };
        write!(f, "{}", name)
    }
}

/// Launch failures, one variant per taxonomy entry.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The binary image could not be loaded.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Discovery found no usable device.
    #[error("no accelerator device found")]
    NoDevice,

    /// The program failed to build; the log is surfaced verbatim.
    #[error("program build failed:\n{log}")]
    Build {
        /// Device-specific build diagnostics.
        log: String,
    },

    /// Any other device failure, tagged with the stage it occurred in.
    #[error("device error while {stage}: {source}")]
    Device {
        /// Pipeline stage at which the failure occurred.
        stage: LaunchStage,
        /// The underlying device error.
        source: DeviceError,
    },
}

impl LaunchError {
    /// True when this error is a program build failure.
    pub fn is_build_failure(&self) -> bool {
        matches!(self, Self::Build { .. })
    }
}

/// Folds a device error into the launch taxonomy for the given stage.
fn at_stage(stage: LaunchStage, err: DeviceError) -> LaunchError {
    match err {
        DeviceError::BuildFailed { log } => LaunchError::Build { log },
        DeviceError::NoDeviceFound => LaunchError::NoDevice,
        other => LaunchError::Device {
            stage,
            source: other,
        },
    }
}

/// Runs one pricing job to completion on the given backend.
///
/// Submits exactly one kernel invocation; nothing is retried. The call
/// blocks until the device reports completion, which is the only
/// suspension point of the whole program.
pub fn launch(
    accelerator: &mut dyn Accelerator,
    image: &BinaryImage,
    params: &PricingParameters,
    options: &LaunchOptions,
) -> Result<PricingResult, LaunchError> {
    info!(backend = accelerator.backend_name(), stage = %LaunchStage::DiscoveringDevices, "launching pricing job");
    let devices = accelerator
        .discover_devices()
        .map_err(|e| at_stage(LaunchStage::DiscoveringDevices, e))?;
    if devices.is_empty() {
        return Err(LaunchError::NoDevice);
    }
    let device = devices.get(options.device_index).ok_or_else(|| {
        at_stage(
            LaunchStage::DiscoveringDevices,
            DeviceError::Backend(format!(
                "device index {} out of range ({} available)",
                options.device_index,
                devices.len()
            )),
        )
    })?;

    info!(device = %device.name, image_bytes = image.len(), stage = %LaunchStage::BuildingProgram, "building program");
    let program = accelerator
        .load_and_build(image, device)
        .map_err(|e| at_stage(LaunchStage::BuildingProgram, e))?;

    info!(entry_point = %options.entry_point, stage = %LaunchStage::Submitting, "submitting kernel");
    let args = params.kernel_args();
    let job = accelerator
        .submit(program, &options.entry_point, OUTPUT_SLOTS, &args)
        .map_err(|e| at_stage(LaunchStage::Submitting, e))?;

    info!(stage = %LaunchStage::AwaitingCompletion, "waiting for completion");
    accelerator
        .wait(job)
        .map_err(|e| at_stage(LaunchStage::AwaitingCompletion, e))?;

    info!(stage = %LaunchStage::ReadingBack, "reading back results");
    let call = accelerator
        .read_back(job, 0)
        .map_err(|e| at_stage(LaunchStage::ReadingBack, e))?;
    let put = accelerator
        .read_back(job, 1)
        .map_err(|e| at_stage(LaunchStage::ReadingBack, e))?;

    Ok(PricingResult::new(call, put))
}
