//! Pricing job parameters and results.
//!
//! All values are constructed once at startup from command-line input,
//! consumed by a single job submission, and never mutated afterwards.

/// Scalar parameters for one Black–Asian pricing job.
///
/// All five parameters are required. No range validation is performed:
/// the kernel defines its own domain and the launcher passes values
/// through as given (best-effort contract).
///
/// # Examples
/// ```
/// use accel_core::PricingParameters;
///
/// let params = PricingParameters::new(100.0, 110.0, 0.05, 0.2, 1.0);
/// assert_eq!(params.spot(), 100.0);
/// assert_eq!(params.strike(), 110.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingParameters {
    spot: f64,
    strike: f64,
    rate: f64,
    volatility: f64,
    maturity: f64,
}

impl PricingParameters {
    /// Creates a new parameter set.
    ///
    /// # Arguments
    /// * `spot` - Stock price at time zero (S0)
    /// * `strike` - Strike price (K)
    /// * `rate` - Risk-free interest rate
    /// * `volatility` - Volatility of the stock
    /// * `maturity` - Time period of the option in years (T)
    pub fn new(spot: f64, strike: f64, rate: f64, volatility: f64, maturity: f64) -> Self {
        Self {
            spot,
            strike,
            rate,
            volatility,
            maturity,
        }
    }

    /// Returns the spot price (S0).
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Returns the strike price (K).
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Returns the risk-free rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Returns the volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Returns the maturity in years (T).
    #[inline]
    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    /// Returns the scalar arguments in the order the kernel expects.
    ///
    /// The kernel signature fixes the order to `(T, rate, volatility,
    /// S0, K)` and consumes single-precision values; the narrowing from
    /// `f64` happens here, at the device boundary, and nowhere else.
    ///
    /// # Examples
    /// ```
    /// use accel_core::PricingParameters;
    ///
    /// let params = PricingParameters::new(100.0, 110.0, 0.05, 0.2, 1.0);
    /// assert_eq!(params.kernel_args(), [1.0, 0.05, 0.2, 100.0, 110.0]);
    /// ```
    pub fn kernel_args(&self) -> [f32; 5] {
        [
            self.maturity as f32,
            self.rate as f32,
            self.volatility as f32,
            self.spot as f32,
            self.strike as f32,
        ]
    }
}

/// Externally known prices used only for deviation reporting.
///
/// Call and put references are independently optional; a missing side
/// simply suppresses that side's deviation line. Reference values never
/// influence the computation or its success.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReferenceValues {
    /// Reference call price, if supplied.
    pub call: Option<f64>,
    /// Reference put price, if supplied.
    pub put: Option<f64>,
}

impl ReferenceValues {
    /// Creates reference values from independently optional sides.
    pub fn new(call: Option<f64>, put: Option<f64>) -> Self {
        Self { call, put }
    }

    /// Returns true when neither side has a reference.
    pub fn is_empty(&self) -> bool {
        self.call.is_none() && self.put.is_none()
    }
}

/// The two scalar outputs of one accelerator invocation.
///
/// Immutable once computed; the accelerator writes single-precision
/// values and the launcher reports them as such.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingResult {
    /// Call option price.
    pub call: f32,
    /// Put option price.
    pub put: f32,
}

impl PricingResult {
    /// Creates a result from the two read-back scalars.
    pub fn new(call: f32, put: f32) -> Self {
        Self { call, put }
    }
}
