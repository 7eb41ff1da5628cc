//! Result reporting.
//!
//! Renders a [`PricingResult`] for the user, optionally annotated with
//! the absolute percentage deviation against supplied reference values.
//! Nothing is persisted; the report goes to standard output.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::types::{PricingResult, ReferenceValues};

/// Absolute percentage deviation of a computed price from a reference.
///
/// Defined as `abs(computed / reference - 1) * 100`.
///
/// # Examples
/// ```
/// use accel_core::deviation_pct;
///
/// let dev = deviation_pct(101.0, 100.0);
/// assert!((dev - 1.0).abs() < 1e-9);
/// ```
pub fn deviation_pct(computed: f32, reference: f64) -> f64 {
    (f64::from(computed) / reference - 1.0).abs() * 100.0
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Human-readable lines (the default).
    #[default]
    Text,
    /// A single JSON object.
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "Unknown format: {}. Supported: text, json",
                other
            )),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// One side (call or put) of the report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SideReport {
    /// Computed price.
    pub price: f32,
    /// Deviation against the reference, present only when a reference
    /// was supplied for this side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deviation_pct: Option<f64>,
}

impl SideReport {
    fn new(price: f32, reference: Option<f64>) -> Self {
        Self {
            price,
            deviation_pct: reference.map(|r| deviation_pct(price, r)),
        }
    }
}

/// Report for one completed pricing job.
///
/// # Examples
/// ```
/// use accel_core::{PricingReport, PricingResult, ReferenceValues};
///
/// let result = PricingResult::new(3.25, 12.5);
/// let report = PricingReport::new(result, ReferenceValues::default());
/// assert!(report.call.deviation_pct.is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricingReport {
    /// Call side.
    pub call: SideReport,
    /// Put side.
    pub put: SideReport,
}

impl PricingReport {
    /// Builds the report, computing deviations for whichever sides have
    /// a reference value.
    pub fn new(result: PricingResult, references: ReferenceValues) -> Self {
        Self {
            call: SideReport::new(result.call, references.call),
            put: SideReport::new(result.put, references.put),
        }
    }

    /// Renders the report as human-readable lines.
    ///
    /// A deviation line is emitted only for sides that carried a
    /// reference value.
    pub fn render_text(&self) -> String {
        let mut lines = Vec::with_capacity(4);
        render_side(&mut lines, "call", &self.call);
        render_side(&mut lines, "put", &self.put);
        lines.join("\n")
    }

    /// Renders the report as a JSON object.
    pub fn render_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Renders in the requested format.
    pub fn render(&self, format: ReportFormat) -> serde_json::Result<String> {
        match format {
            ReportFormat::Text => Ok(self.render_text()),
            ReportFormat::Json => self.render_json(),
        }
    }
}

fn render_side(lines: &mut Vec<String>, name: &str, side: &SideReport) {
    lines.push(format!("the {} price is: {}", name, side.price));
    if let Some(dev) = side.deviation_pct {
        lines.push(format!(
            "  deviation from the reference value: {:.6}%",
            dev
        ));
    }
}
