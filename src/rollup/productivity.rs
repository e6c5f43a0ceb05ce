//! Productivity scoring
//!
//! Weighted blend of consistency, engagement, and health components into a
//! single 0-100 score and a letter grade.

use crate::types::{Grade, ProductivityComponents, ProductivityScore};

/// Weight of the consistency component
const CONSISTENCY_WEIGHT: f64 = 0.3;

/// Weight of the engagement component
const ENGAGEMENT_WEIGHT: f64 = 0.4;

/// Weight of the health component
const HEALTH_WEIGHT: f64 = 0.3;

/// Scores productivity from caller-supplied period components.
///
/// Each component is a 0-100 value; out-of-range inputs are clamped before
/// weighting.
pub struct ProductivityScorer;

impl ProductivityScorer {
    pub fn score(components: ProductivityComponents) -> ProductivityScore {
        let clamped = ProductivityComponents {
            consistency: components.consistency.clamp(0.0, 100.0),
            engagement: components.engagement.clamp(0.0, 100.0),
            health: components.health.clamp(0.0, 100.0),
        };

        let overall = (clamped.consistency * CONSISTENCY_WEIGHT
            + clamped.engagement * ENGAGEMENT_WEIGHT
            + clamped.health * HEALTH_WEIGHT)
            .round() as u8;

        ProductivityScore {
            overall,
            grade: grade_for(overall),
            components: clamped,
        }
    }
}

fn grade_for(overall: u8) -> Grade {
    match overall {
        90..=u8::MAX => Grade::A,
        80..=89 => Grade::B,
        70..=79 => Grade::C,
        60..=69 => Grade::D,
        _ => Grade::F,
    }
}
