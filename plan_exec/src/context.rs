//! # Planning context
//!
//! Data produced by other stages of the planning pipeline which is carried alongside the path and
//! speed profile but is not used when aggregating them.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// A point on the reference line (usually the lane centre).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ReferencePoint {
    pub x_m: f64,
    pub y_m: f64,
    pub heading_rad: f64,
    pub curvature_m: f64,
}

/// The line the path was planned relative to.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReferenceLine {
    points: Vec<ReferencePoint>,
}

/// The decision made about a single object in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDecision {
    pub id: String,
    pub decision: DecisionType,
}

/// The behavioural decisions made this planning cycle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DecisionData {
    decisions: Vec<ObjectDecision>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionType {
    Ignore,
    Stop,
    Yield,
    Follow,
    Overtake,
    Nudge,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl ReferenceLine {
    pub fn new(points: Vec<ReferencePoint>) -> Self {
        Self { points }
    }

    pub fn reference_points(&self) -> &[ReferencePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total length of the line joining all reference points.
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| (Vector2::new(w[1].x_m, w[1].y_m) - Vector2::new(w[0].x_m, w[0].y_m)).norm())
            .sum()
    }
}

impl DecisionData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a decision for an object, replacing any previous decision for the same id.
    pub fn add(&mut self, id: &str, decision: DecisionType) {
        match self.decisions.iter_mut().find(|d| d.id == id) {
            Some(d) => d.decision = decision,
            None => self.decisions.push(ObjectDecision {
                id: id.to_string(),
                decision,
            }),
        }
    }

    pub fn decisions(&self) -> &[ObjectDecision] {
        &self.decisions
    }

    pub fn decision_for(&self, id: &str) -> Option<DecisionType> {
        self.decisions
            .iter()
            .find(|d| d.id == id)
            .map(|d| d.decision)
    }

    pub fn clear(&mut self) {
        self.decisions.clear();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_reference_line_length() {
        let line = ReferenceLine::new(vec![
            ReferencePoint::default(),
            ReferencePoint {
                x_m: 3.0,
                y_m: 4.0,
                ..Default::default()
            },
            ReferencePoint {
                x_m: 3.0,
                y_m: 5.0,
                ..Default::default()
            },
        ]);

        assert_eq!(line.len(), 3);
        assert_eq!(line.length(), 6.0);
        assert_eq!(ReferenceLine::default().length(), 0.0);
    }

    #[test]
    fn test_decisions() {
        let mut data = DecisionData::new();
        data.add("car_1", DecisionType::Follow);
        data.add("ped_4", DecisionType::Yield);
        data.add("car_1", DecisionType::Overtake);

        assert_eq!(data.decisions().len(), 2);
        assert_eq!(data.decision_for("car_1"), Some(DecisionType::Overtake));
        assert_eq!(data.decision_for("ped_4"), Some(DecisionType::Yield));
        assert_eq!(data.decision_for("bike_2"), None);

        data.clear();
        assert!(data.decisions().is_empty());
    }
}
