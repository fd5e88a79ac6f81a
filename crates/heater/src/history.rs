use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Lower bound of the temperature graph, in °C.
pub const GRAPH_MIN_TEMP: f64 = 10.0;
/// Upper bound of the temperature graph, in °C.
pub const GRAPH_MAX_TEMP: f64 = 35.0;

/// One reading taken at a status refresh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSample {
    pub current: f64,
    pub set: f64,
}

/// Bounded history of temperature readings, oldest first.
#[derive(Debug, Clone)]
pub struct TemperatureHistory {
    capacity: usize,
    samples: VecDeque<TemperatureSample>,
}

impl TemperatureHistory {
    pub fn new(capacity: usize) -> Self {
        TemperatureHistory {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    /// Record a reading, dropping the oldest one when full.
    pub fn push(&mut self, sample: TemperatureSample) {
        if self.capacity == 0 {
            return;
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> impl Iterator<Item = &TemperatureSample> {
        self.samples.iter()
    }

    pub fn to_vec(&self) -> Vec<TemperatureSample> {
        self.samples.iter().copied().collect()
    }

    /// Map temperatures onto a `width` x `height` chart.
    ///
    /// Points are spread evenly along x; y is scaled from
    /// [`GRAPH_MIN_TEMP`]..[`GRAPH_MAX_TEMP`] with 0 at the top, so the
    /// result can be fed straight into an SVG polyline. Fewer than two
    /// values produce no line.
    pub fn polyline(values: &[f64], width: f64, height: f64) -> Vec<(f64, f64)> {
        if values.len() < 2 {
            return Vec::new();
        }

        let last = (values.len() - 1) as f64;
        let range = GRAPH_MAX_TEMP - GRAPH_MIN_TEMP;
        values
            .iter()
            .enumerate()
            .map(|(i, temp)| {
                let x = i as f64 / last * width;
                let fraction = ((temp - GRAPH_MIN_TEMP) / range).clamp(0.0, 1.0);
                (x, height - fraction * height)
            })
            .collect()
    }
}
