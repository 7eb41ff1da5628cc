//! # accel_runtime
//!
//! The accelerator side of the blackasian launcher: loading the opaque
//! binary image, the [`Accelerator`] capability boundary behind which a
//! device backend lives, and the single-shot launch pipeline that drives
//! one kernel invocation from build to read-back.
//!
//! The crate ships one backend, [`sim::SimAccelerator`], an in-process
//! stand-in device. Hardware adapters are further implementations of
//! [`Accelerator`] and live in their own crates.

pub mod device;
pub mod image;
pub mod launcher;
pub mod sim;

pub use device::{Accelerator, DeviceError, DeviceInfo, JobHandle, ProgramHandle};
pub use image::{BinaryImage, ImageError};
pub use launcher::{launch, LaunchError, LaunchOptions, LaunchStage, DEFAULT_ENTRY_POINT};
pub use sim::SimAccelerator;
