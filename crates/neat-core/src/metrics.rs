//! A small counter/time-statistic telemetry layer, scoped down from the
//! corpus's `radiate-core::stats` module to what this engine's steps
//! actually need: how long evaluation/reproduction took, and a handful of
//! named counters (species count, topology-saturation fallbacks). No
//! distribution or histogram machinery - nothing here needs it.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A running count/sum/min/max over `f32` samples. Deliberately simpler
/// than a full Welford accumulator - this engine never needs variance or
/// skewness, only "how many, how much, the extremes".
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Statistic {
    count: u32,
    sum: f32,
    min: f32,
    max: f32,
    last_value: f32,
}

impl Default for Statistic {
    fn default() -> Self {
        Statistic {
            count: 0,
            sum: 0.0,
            min: f32::INFINITY,
            max: f32::NEG_INFINITY,
            last_value: 0.0,
        }
    }
}

impl Statistic {
    pub fn add(&mut self, value: f32) {
        self.count += 1;
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.last_value = value;
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn sum(&self) -> f32 {
        self.sum
    }

    pub fn mean(&self) -> f32 {
        if self.count == 0 { 0.0 } else { self.sum / self.count as f32 }
    }

    pub fn min(&self) -> f32 {
        if self.count == 0 { 0.0 } else { self.min }
    }

    pub fn max(&self) -> f32 {
        if self.count == 0 { 0.0 } else { self.max }
    }

    pub fn last_value(&self) -> f32 {
        self.last_value
    }
}

/// The time-valued counterpart of [Statistic]: tracks total/mean/last
/// elapsed duration for a repeated operation (e.g. "evaluation" across
/// generations).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeStatistic {
    statistic: Statistic,
}

impl TimeStatistic {
    pub fn add(&mut self, value: Duration) {
        self.statistic.add(value.as_secs_f32());
    }

    pub fn count(&self) -> u32 {
        self.statistic.count()
    }

    pub fn sum(&self) -> Duration {
        Duration::from_secs_f32(self.statistic.sum())
    }

    pub fn mean(&self) -> Duration {
        Duration::from_secs_f32(self.statistic.mean())
    }

    pub fn last_time(&self) -> Duration {
        Duration::from_secs_f32(self.statistic.last_value())
    }
}

/// A single named metric: either a value statistic (a counter - "how many
/// times did X happen this generation"), a time statistic, or both, set up
/// the first time it's recorded.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Metric {
    name: &'static str,
    value: Option<Statistic>,
    time: Option<TimeStatistic>,
}

impl Metric {
    pub fn new(name: &'static str) -> Self {
        Metric {
            name,
            value: None,
            time: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn record(&mut self, value: f32) {
        self.value.get_or_insert_with(Statistic::default).add(value);
    }

    pub fn record_time(&mut self, value: Duration) {
        self.time.get_or_insert_with(TimeStatistic::default).add(value);
    }

    pub fn value_statistic(&self) -> Option<&Statistic> {
        self.value.as_ref()
    }

    pub fn time_statistic(&self) -> Option<&TimeStatistic> {
        self.time.as_ref()
    }

    /// The most recently recorded value, or 0.0 if never recorded -
    /// convenient for callers that just want "the count this generation".
    pub fn last_value(&self) -> f32 {
        self.value.map(|s| s.last_value()).unwrap_or(0.0)
    }
}

/// An ordered collection of [Metric]s, keyed by name, accumulated across a
/// single generation and carried on the [crate::prelude::Generation]
/// snapshot returned by the driver. Lookup is linear, which is fine: a
/// generation records a handful of metrics, never hundreds.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MetricSet {
    metrics: Vec<Metric>,
}

impl MetricSet {
    pub fn new() -> Self {
        MetricSet::default()
    }

    pub fn record(&mut self, name: &'static str, value: f32) {
        self.entry(name).record(value);
    }

    pub fn record_time(&mut self, name: &'static str, value: Duration) {
        self.entry(name).record_time(value);
    }

    pub fn get(&self, name: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Metric> {
        self.metrics.iter()
    }

    fn entry(&mut self, name: &'static str) -> &mut Metric {
        if let Some(index) = self.metrics.iter().position(|m| m.name == name) {
            return &mut self.metrics[index];
        }
        self.metrics.push(Metric::new(name));
        self.metrics.last_mut().expect("just pushed")
    }
}

/// Canonical metric names this engine records, mirroring the corpus's
/// `metric_names` module.
pub mod metric_names {
    pub const EVALUATION_TIME: &str = "evaluation_time";
    pub const REPRODUCTION_TIME: &str = "reproduction_time";
    pub const SPECIES_COUNT: &str = "species_count";
    pub const SATURATED_TOPOLOGY: &str = "saturated_topology";
}
