//! In-process simulator backend.
//!
//! `SimAccelerator` stands in for a hardware device the same way the
//! pricing stack's simulated market-data providers stand in for vendor
//! feeds: it speaks the full [`Accelerator`] contract so the launch
//! pipeline can be exercised end to end without an FPGA attached.
//!
//! A sim image is a tiny container: the `SIMK` magic, a format version,
//! the kernel entry-point name, and the canned `f32` outputs the
//! "kernel" writes when invoked. The sim performs no pricing
//! mathematics; whoever builds the image decides the outputs.

use std::collections::HashMap;

use tracing::debug;

use crate::device::{Accelerator, DeviceError, DeviceInfo, JobHandle, ProgramHandle};
use crate::image::BinaryImage;

const MAGIC: &[u8; 4] = b"SIMK";
const FORMAT_VERSION: u8 = 1;

/// Builds sim image bytes for the given entry point and canned outputs.
///
/// # Examples
/// ```
/// let bytes = accel_runtime::sim::image_bytes("blackAsian", &[3.25, 12.5]);
/// assert!(bytes.starts_with(b"SIMK"));
/// ```
///
/// # Panics
/// Panics if the entry-point name exceeds 255 bytes or more than 255
/// outputs are given; both are format limits, not runtime conditions.
pub fn image_bytes(entry_point: &str, outputs: &[f32]) -> Vec<u8> {
    assert!(entry_point.len() <= u8::MAX as usize, "entry point too long");
    assert!(outputs.len() <= u8::MAX as usize, "too many outputs");

    let mut bytes = Vec::with_capacity(7 + entry_point.len() + outputs.len() * 4);
    bytes.extend_from_slice(MAGIC);
    bytes.push(FORMAT_VERSION);
    bytes.push(entry_point.len() as u8);
    bytes.extend_from_slice(entry_point.as_bytes());
    bytes.push(outputs.len() as u8);
    for value in outputs {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

struct SimProgram {
    entry_point: String,
    outputs: Vec<f32>,
}

struct SimJob {
    outputs: Vec<f32>,
    completed: bool,
}

/// An in-process [`Accelerator`] backend.
///
/// Exposes a single device (`sim0`). Programs and jobs live in host
/// memory behind the issued handles and are released when the backend
/// is dropped.
#[derive(Default)]
pub struct SimAccelerator {
    programs: HashMap<u64, SimProgram>,
    jobs: HashMap<u64, SimJob>,
    next_handle: u64,
}

impl SimAccelerator {
    /// Creates a fresh backend with no programs or jobs.
    pub fn new() -> Self {
        Self::default()
    }

    fn issue_handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

/// Parses a sim image, returning the entry point and canned outputs.
///
/// Failures come back as a diagnostic log, the sim's equivalent of a
/// device build log.
fn parse_image(bytes: &[u8]) -> Result<(String, Vec<f32>), String> {
    if bytes.len() < 4 || &bytes[..4] != MAGIC {
        return Err(format!(
            "sim build error: bad magic (expected {:?})\nimage is not a sim kernel container",
            MAGIC
        ));
    }
    let rest = &bytes[4..];
    let (&version, rest) = rest
        .split_first()
        .ok_or("sim build error: truncated header (missing version)")?;
    if version != FORMAT_VERSION {
        return Err(format!(
            "sim build error: unsupported format version {} (supported: {})",
            version, FORMAT_VERSION
        ));
    }
    let (&name_len, rest) = rest
        .split_first()
        .ok_or("sim build error: truncated header (missing entry-point length)")?;
    if rest.len() < name_len as usize {
        return Err("sim build error: truncated entry-point name".to_string());
    }
    let (name, rest) = rest.split_at(name_len as usize);
    let entry_point = std::str::from_utf8(name)
        .map_err(|_| "sim build error: entry-point name is not valid UTF-8".to_string())?
        .to_string();
    let (&out_count, rest) = rest
        .split_first()
        .ok_or("sim build error: truncated header (missing output count)")?;
    if rest.len() != out_count as usize * 4 {
        return Err(format!(
            "sim build error: expected {} output bytes, found {}",
            out_count as usize * 4,
            rest.len()
        ));
    }
    let outputs = rest
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();
    Ok((entry_point, outputs))
}

impl Accelerator for SimAccelerator {
    fn backend_name(&self) -> &str {
        "sim"
    }

    fn discover_devices(&mut self) -> Result<Vec<DeviceInfo>, DeviceError> {
        Ok(vec![DeviceInfo {
            index: 0,
            name: "sim0".to_string(),
        }])
    }

    fn load_and_build(
        &mut self,
        image: &BinaryImage,
        device: &DeviceInfo,
    ) -> Result<ProgramHandle, DeviceError> {
        if device.index != 0 {
            return Err(DeviceError::Backend(format!(
                "unknown sim device index {}",
                device.index
            )));
        }

        let (entry_point, outputs) =
            parse_image(image.bytes()).map_err(|log| DeviceError::BuildFailed { log })?;

        let raw = self.issue_handle();
        debug!(
            program = raw,
            entry_point = %entry_point,
            outputs = outputs.len(),
            "sim program built"
        );
        self.programs.insert(
            raw,
            SimProgram {
                entry_point,
                outputs,
            },
        );
        Ok(ProgramHandle::from_raw(raw))
    }

    fn submit(
        &mut self,
        program: ProgramHandle,
        entry_point: &str,
        out_slots: usize,
        scalar_args: &[f32],
    ) -> Result<JobHandle, DeviceError> {
        let sim_program = self
            .programs
            .get(&program.raw())
            .ok_or(DeviceError::InvalidHandle)?;

        if sim_program.entry_point != entry_point {
            return Err(DeviceError::KernelNotFound {
                entry_point: entry_point.to_string(),
            });
        }
        if sim_program.outputs.len() != out_slots {
            return Err(DeviceError::Backend(format!(
                "kernel '{}' writes {} outputs, {} requested",
                entry_point,
                sim_program.outputs.len(),
                out_slots
            )));
        }

        let outputs = sim_program.outputs.clone();
        let raw = self.issue_handle();
        debug!(
            job = raw,
            entry_point,
            args = scalar_args.len(),
            "sim job submitted"
        );
        self.jobs.insert(
            raw,
            SimJob {
                outputs,
                completed: false,
            },
        );
        Ok(JobHandle::from_raw(raw))
    }

    fn wait(&mut self, job: JobHandle) -> Result<(), DeviceError> {
        let sim_job = self
            .jobs
            .get_mut(&job.raw())
            .ok_or(DeviceError::InvalidHandle)?;
        sim_job.completed = true;
        Ok(())
    }

    fn read_back(&mut self, job: JobHandle, slot: usize) -> Result<f32, DeviceError> {
        let sim_job = self.jobs.get(&job.raw()).ok_or(DeviceError::InvalidHandle)?;
        if !sim_job.completed {
            return Err(DeviceError::Backend(
                "read back before job completion".to_string(),
            ));
        }
        sim_job
            .outputs
            .get(slot)
            .copied()
            .ok_or_else(|| DeviceError::Backend(format!("output slot {} out of range", slot)))
    }
}
