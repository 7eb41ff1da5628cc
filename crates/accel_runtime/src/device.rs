//! The accelerator capability boundary.
//!
//! This module provides:
//! - `Accelerator`: the trait a device backend implements
//! - `DeviceInfo`: an enumerated device
//! - `ProgramHandle` / `JobHandle`: opaque backend-owned handles
//! - `DeviceError`: categorised device-layer failures
//!
//! The launcher never talks to a device API directly; everything flows
//! through this trait, one blocking call at a time.

use thiserror::Error;

use crate::image::BinaryImage;

/// Categorised device-layer errors.
///
/// `BuildFailed` is deliberately distinct from the catch-all
/// `Backend` variant: build diagnostics must reach the user verbatim
/// and map to their own exit status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// No accelerator device was found during discovery.
    #[error("no accelerator device found")]
    NoDeviceFound,

    /// The program failed to build for the target device. The log
    /// carries the backend's diagnostics verbatim.
    #[error("program build failed:\n{log}")]
    BuildFailed {
        /// Device-specific build diagnostics.
        log: String,
    },

    /// The requested kernel entry point does not exist in the program.
    #[error("kernel entry point '{entry_point}' not found in program")]
    KernelNotFound {
        /// The entry point that was requested.
        entry_point: String,
    },

    /// A program or job handle did not belong to this backend.
    #[error("stale or unknown accelerator handle")]
    InvalidHandle,

    /// Any other backend failure (allocation, submission, transfer).
    #[error("device error: {0}")]
    Backend(String),
}

impl DeviceError {
    /// True when this error is a program build failure.
    pub fn is_build_failure(&self) -> bool {
        matches!(self, Self::BuildFailed { .. })
    }
}

/// An accelerator device enumerated by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Position of the device in the discovery order.
    pub index: usize,
    /// Backend-assigned device name.
    pub name: String,
}

/// Opaque handle to a program built for a device.
///
/// Only meaningful to the backend that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(u64);

impl ProgramHandle {
    /// Wraps a backend-assigned raw id.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the backend-assigned raw id.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Opaque handle to a submitted job.
///
/// Only meaningful to the backend that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobHandle(u64);

impl JobHandle {
    /// Wraps a backend-assigned raw id.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the backend-assigned raw id.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// A device backend capable of running one pricing kernel.
///
/// All calls are synchronous; [`Accelerator::wait`] blocks until the
/// submitted job has completed. Backends own all device state behind
/// the handles they issue and release it on drop.
pub trait Accelerator {
    /// Short backend name for logs.
    fn backend_name(&self) -> &str;

    /// Enumerates available devices.
    ///
    /// An empty list is a valid return; callers treat it the same as
    /// [`DeviceError::NoDeviceFound`].
    fn discover_devices(&mut self) -> Result<Vec<DeviceInfo>, DeviceError>;

    /// Loads a binary image and builds it for the given device.
    ///
    /// A failed build surfaces [`DeviceError::BuildFailed`] with the
    /// device diagnostics; any other failure is a generic device error.
    fn load_and_build(
        &mut self,
        image: &BinaryImage,
        device: &DeviceInfo,
    ) -> Result<ProgramHandle, DeviceError>;

    /// Submits one invocation of the named kernel entry point.
    ///
    /// The kernel receives `out_slots` output buffers (one `f32` each)
    /// followed by `scalar_args` in order, and runs as a single unit of
    /// work.
    fn submit(
        &mut self,
        program: ProgramHandle,
        entry_point: &str,
        out_slots: usize,
        scalar_args: &[f32],
    ) -> Result<JobHandle, DeviceError>;

    /// Blocks until the job has completed.
    fn wait(&mut self, job: JobHandle) -> Result<(), DeviceError>;

    /// Copies one output slot back to the host.
    ///
    /// Only valid after [`Accelerator::wait`] returned `Ok` for the
    /// same job.
    fn read_back(&mut self, job: JobHandle, slot: usize) -> Result<f32, DeviceError>;
}
