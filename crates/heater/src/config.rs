use std::time::Duration;

/// Configuration for a heater controller.
///
/// Uses a builder pattern to configure the controller parameters.
#[derive(Debug, Clone)]
pub struct HeaterConfig {
    min_temp: f64,           // Lowest accepted target temperature
    max_temp: f64,           // Highest accepted target temperature
    step: f64,               // Increment used by the up/down buttons
    history_len: usize,      // Number of samples kept for the graph
    poll_interval: Duration, // How often the device status is refreshed
}

impl Default for HeaterConfig {
    fn default() -> Self {
        HeaterConfig {
            min_temp: 10.0,
            max_temp: 30.0,
            step: 1.0,
            history_len: 50,
            poll_interval: Duration::from_secs(5 * 60),
        }
    }
}

impl HeaterConfig {
    /// Create a new heater configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the accepted target temperature range (min, max), in °C.
    pub fn with_temp_range(mut self, min: f64, max: f64) -> Self {
        self.min_temp = min;
        self.max_temp = max;
        self
    }

    /// Set the increment applied by increase/decrease.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Set how many temperature samples the history keeps.
    pub fn with_history_len(mut self, len: usize) -> Self {
        self.history_len = len;
        self
    }

    /// Set the status polling interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn min_temp(&self) -> f64 {
        self.min_temp
    }

    pub fn max_temp(&self) -> f64 {
        self.max_temp
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn history_len(&self) -> usize {
        self.history_len
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Whether `temp` is an accepted target temperature.
    pub fn contains(&self, temp: f64) -> bool {
        (self.min_temp..=self.max_temp).contains(&temp)
    }
}
