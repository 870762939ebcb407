//! Masters: design-space locations with shared metrics and guides

use super::guideline::Guideline;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A vertical band used for overshoot snapping and display
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlignmentZone {
    pub position: f64,
    /// Signed height; negative zones extend below `position`
    pub size: f64,
}

impl AlignmentZone {
    pub fn new(position: f64, size: f64) -> Self {
        Self { position, size }
    }

    /// Both edges, lower first
    pub fn edges(&self) -> (f64, f64) {
        let other = self.position + self.size;
        (self.position.min(other), self.position.max(other))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Master {
    pub(crate) name: String,
    /// Axis tag to coordinate
    #[serde(default)]
    pub(crate) location: BTreeMap<String, f64>,
    pub(crate) ascender: f64,
    pub(crate) descender: f64,
    pub(crate) cap_height: f64,
    pub(crate) x_height: f64,
    #[serde(default)]
    pub(crate) alignment_zones: Vec<AlignmentZone>,
    #[serde(default)]
    pub(crate) guidelines: Vec<Guideline>,
}

impl Master {
    /// A master with metrics proportioned to `units_per_em`
    pub fn new(name: impl Into<String>, units_per_em: f64) -> Self {
        Self {
            name: name.into(),
            location: BTreeMap::new(),
            ascender: units_per_em * 0.8,
            descender: -(units_per_em * 0.2),
            cap_height: units_per_em * 0.7,
            x_height: units_per_em * 0.5,
            alignment_zones: Vec::new(),
            guidelines: Vec::new(),
        }
    }

    pub fn with_metrics(mut self, ascender: f64, descender: f64, cap_height: f64, x_height: f64) -> Self {
        self.ascender = ascender;
        self.descender = descender;
        self.cap_height = cap_height;
        self.x_height = x_height;
        self
    }

    pub fn with_location(mut self, axis: impl Into<String>, value: f64) -> Self {
        self.location.insert(axis.into(), value);
        self
    }

    pub fn with_zone(mut self, zone: AlignmentZone) -> Self {
        self.alignment_zones.push(zone);
        self
    }

    pub fn with_guideline(mut self, guideline: Guideline) -> Self {
        self.guidelines.push(guideline);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &BTreeMap<String, f64> {
        &self.location
    }

    pub fn ascender(&self) -> f64 {
        self.ascender
    }

    pub fn descender(&self) -> f64 {
        self.descender
    }

    pub fn cap_height(&self) -> f64 {
        self.cap_height
    }

    pub fn x_height(&self) -> f64 {
        self.x_height
    }

    pub fn alignment_zones(&self) -> &[AlignmentZone] {
        &self.alignment_zones
    }

    pub fn guidelines(&self) -> &[Guideline] {
        &self.guidelines
    }

    /// Heights a point can snap to vertically: baseline, metrics and zone edges
    pub fn snap_heights(&self) -> Vec<f64> {
        let mut heights = vec![
            0.0,
            self.ascender,
            self.descender,
            self.cap_height,
            self.x_height,
        ];
        for zone in &self.alignment_zones {
            let (lo, hi) = zone.edges();
            heights.push(lo);
            heights.push(hi);
        }
        heights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_edges_are_ordered() {
        assert_eq!(AlignmentZone::new(0.0, -16.0).edges(), (-16.0, 0.0));
        assert_eq!(AlignmentZone::new(500.0, 12.0).edges(), (500.0, 512.0));
    }

    #[test]
    fn test_snap_heights_include_zones() {
        let master = Master::new("Regular", 1000.0).with_zone(AlignmentZone::new(0.0, -15.0));
        let heights = master.snap_heights();
        assert!(heights.contains(&800.0));
        assert!(heights.contains(&-15.0));
    }
}
