//! Launch pipeline integration tests.
//!
//! Exercises the pipeline against a scripted mock backend (failure
//! injection, call counting) and against the sim backend end to end,
//! including an image loaded from disk.

use std::io::Write;

use accel_core::{PricingParameters, PricingResult};
use accel_runtime::{
    launch, sim, Accelerator, BinaryImage, DeviceError, DeviceInfo, JobHandle, LaunchError,
    LaunchOptions, LaunchStage, ProgramHandle, SimAccelerator, DEFAULT_ENTRY_POINT,
};

/// Stage at which the mock should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailAt {
    Never,
    Discover,
    Build,
    Submit,
    Wait,
    ReadBack,
}

/// A scripted backend that counts every call.
struct MockAccelerator {
    fail_at: FailAt,
    devices: Vec<DeviceInfo>,
    discover_calls: usize,
    build_calls: usize,
    submit_calls: usize,
    wait_calls: usize,
    read_back_calls: usize,
    submitted_args: Vec<f32>,
    submitted_entry: Option<String>,
}

impl MockAccelerator {
    fn new(fail_at: FailAt) -> Self {
        Self {
            fail_at,
            devices: vec![DeviceInfo {
                index: 0,
                name: "mock0".to_string(),
            }],
            discover_calls: 0,
            build_calls: 0,
            submit_calls: 0,
            wait_calls: 0,
            read_back_calls: 0,
            submitted_args: Vec::new(),
            submitted_entry: None,
        }
    }

    fn without_devices() -> Self {
        let mut mock = Self::new(FailAt::Never);
        mock.devices.clear();
        mock
    }
}

impl Accelerator for MockAccelerator {
    fn backend_name(&self) -> &str {
        "mock"
    }

    fn discover_devices(&mut self) -> Result<Vec<DeviceInfo>, DeviceError> {
        self.discover_calls += 1;
        if self.fail_at == FailAt::Discover {
            return Err(DeviceError::Backend("platform query failed".to_string()));
        }
        Ok(self.devices.clone())
    }

    fn load_and_build(
        &mut self,
        _image: &BinaryImage,
        _device: &DeviceInfo,
    ) -> Result<ProgramHandle, DeviceError> {
        self.build_calls += 1;
        if self.fail_at == FailAt::Build {
            return Err(DeviceError::BuildFailed {
                log: "ERROR: [XOCC 60-399] port mismatch on m_axi_gmem".to_string(),
            });
        }
        Ok(ProgramHandle::from_raw(1))
    }

    fn submit(
        &mut self,
        _program: ProgramHandle,
        entry_point: &str,
        _out_slots: usize,
        scalar_args: &[f32],
    ) -> Result<JobHandle, DeviceError> {
        self.submit_calls += 1;
        self.submitted_args = scalar_args.to_vec();
        self.submitted_entry = Some(entry_point.to_string());
        if self.fail_at == FailAt::Submit {
            return Err(DeviceError::Backend("enqueue failed".to_string()));
        }
        Ok(JobHandle::from_raw(2))
    }

    fn wait(&mut self, _job: JobHandle) -> Result<(), DeviceError> {
        self.wait_calls += 1;
        if self.fail_at == FailAt::Wait {
            return Err(DeviceError::Backend("device reset during run".to_string()));
        }
        Ok(())
    }

    fn read_back(&mut self, _job: JobHandle, slot: usize) -> Result<f32, DeviceError> {
        self.read_back_calls += 1;
        if self.fail_at == FailAt::ReadBack {
            return Err(DeviceError::Backend("transfer aborted".to_string()));
        }
        Ok(if slot == 0 { 3.25 } else { 12.5 })
    }
}

fn params() -> PricingParameters {
    PricingParameters::new(100.0, 110.0, 0.05, 0.2, 1.0)
}

fn any_image() -> BinaryImage {
    BinaryImage::from_bytes(vec![0xde, 0xad])
}

#[test]
fn successful_run_submits_exactly_once() {
    let mut mock = MockAccelerator::new(FailAt::Never);
    let result = launch(&mut mock, &any_image(), &params(), &LaunchOptions::default()).unwrap();

    assert_eq!(result, PricingResult::new(3.25, 12.5));
    assert_eq!(mock.submit_calls, 1);
    assert_eq!(mock.build_calls, 1);
    assert_eq!(mock.wait_calls, 1);
    assert_eq!(mock.read_back_calls, 2);
}

#[test]
fn kernel_receives_args_in_fixed_order() {
    let mut mock = MockAccelerator::new(FailAt::Never);
    launch(&mut mock, &any_image(), &params(), &LaunchOptions::default()).unwrap();

    // (T, rate, volatility, S0, K)
    assert_eq!(mock.submitted_args, vec![1.0, 0.05, 0.2, 100.0, 110.0]);
    assert_eq!(mock.submitted_entry.as_deref(), Some(DEFAULT_ENTRY_POINT));
}

#[test]
fn empty_discovery_is_no_device() {
    let mut mock = MockAccelerator::without_devices();
    let err = launch(&mut mock, &any_image(), &params(), &LaunchOptions::default()).unwrap_err();

    assert!(matches!(err, LaunchError::NoDevice));
    assert_eq!(mock.build_calls, 0);
    assert_eq!(mock.submit_calls, 0);
}

#[test]
fn discovery_failure_stops_before_build() {
    let mut mock = MockAccelerator::new(FailAt::Discover);
    let err = launch(&mut mock, &any_image(), &params(), &LaunchOptions::default()).unwrap_err();

    assert!(matches!(
        err,
        LaunchError::Device {
            stage: LaunchStage::DiscoveringDevices,
            ..
        }
    ));
    assert_eq!(mock.build_calls, 0);
    assert_eq!(mock.submit_calls, 0);
}

#[test]
fn build_failure_surfaces_log_and_is_distinct() {
    let mut mock = MockAccelerator::new(FailAt::Build);
    let err = launch(&mut mock, &any_image(), &params(), &LaunchOptions::default()).unwrap_err();

    assert!(err.is_build_failure());
    match err {
        LaunchError::Build { log } => assert!(log.contains("XOCC 60-399")),
        other => panic!("expected Build, got {:?}", other),
    }
    assert_eq!(mock.submit_calls, 0);
}

#[test]
fn submit_failure_is_not_retried() {
    let mut mock = MockAccelerator::new(FailAt::Submit);
    let err = launch(&mut mock, &any_image(), &params(), &LaunchOptions::default()).unwrap_err();

    assert!(matches!(
        err,
        LaunchError::Device {
            stage: LaunchStage::Submitting,
            ..
        }
    ));
    assert_eq!(mock.submit_calls, 1);
    assert_eq!(mock.wait_calls, 0);
}

#[test]
fn wait_failure_aborts_before_read_back() {
    let mut mock = MockAccelerator::new(FailAt::Wait);
    let err = launch(&mut mock, &any_image(), &params(), &LaunchOptions::default()).unwrap_err();

    assert!(matches!(
        err,
        LaunchError::Device {
            stage: LaunchStage::AwaitingCompletion,
            ..
        }
    ));
    assert_eq!(mock.submit_calls, 1);
    assert_eq!(mock.read_back_calls, 0);
}

#[test]
fn read_back_failure_is_device_error() {
    let mut mock = MockAccelerator::new(FailAt::ReadBack);
    let err = launch(&mut mock, &any_image(), &params(), &LaunchOptions::default()).unwrap_err();

    assert!(matches!(
        err,
        LaunchError::Device {
            stage: LaunchStage::ReadingBack,
            ..
        }
    ));
    // Still exactly one submission.
    assert_eq!(mock.submit_calls, 1);
}

#[test]
fn custom_entry_point_is_passed_through() {
    let mut mock = MockAccelerator::new(FailAt::Never);
    let options = LaunchOptions {
        entry_point: "asianGeo".to_string(),
        device_index: 0,
    };
    launch(&mut mock, &any_image(), &params(), &options).unwrap();
    assert_eq!(mock.submitted_entry.as_deref(), Some("asianGeo"));
}

#[test]
fn sim_image_from_disk_end_to_end() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&sim::image_bytes(DEFAULT_ENTRY_POINT, &[3.1, 11.9]))
        .unwrap();

    let image = BinaryImage::from_file(file.path()).unwrap();
    let mut sim = SimAccelerator::new();
    let result = launch(&mut sim, &image, &params(), &LaunchOptions::default()).unwrap();

    assert_eq!(result, PricingResult::new(3.1, 11.9));
}
