//! Incident decision engine.
//!
//! Maps one frame's detection summary plus ambient context to at most one
//! incident condition. Evaluation order is fixed and the first matching rule
//! wins, so rules are mutually exclusive per frame. The engine is pure and
//! stateless: every frame is evaluated independently, with no cooldown, and
//! it performs no I/O.

use crate::context::Context;
use crate::detect::DetectionSummary;

/// Which alert rule fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IncidentCondition {
    /// Exactly one woman, no men, during the nighttime bucket.
    LoneWomanAtNight,
    /// The SOS hand gesture was recognized.
    SosGesture,
    /// Exactly one woman with more than one man present.
    WomanSurroundedByMales(u32),
}

impl IncidentCondition {
    /// Human-readable label persisted in the incident store.
    pub fn label(&self) -> String {
        match self {
            IncidentCondition::LoneWomanAtNight => "Woman Alone at Night".to_string(),
            IncidentCondition::SosGesture => "SOS Gesture Detected".to_string(),
            IncidentCondition::WomanSurroundedByMales(n) => {
                format!("1 Female with {} Males", n)
            }
        }
    }
}

/// Evaluate the alert rules against one frame.
///
/// Rule order:
/// 1. lone woman at night
/// 2. SOS gesture
/// 3. one woman with more than one man
pub fn evaluate(summary: &DetectionSummary, context: &Context) -> Option<IncidentCondition> {
    if context.nighttime && summary.female_count == 1 && summary.male_count == 0 {
        return Some(IncidentCondition::LoneWomanAtNight);
    }

    if summary.gesture_detected {
        return Some(IncidentCondition::SosGesture);
    }

    if summary.female_count == 1 && summary.male_count > 1 {
        return Some(IncidentCondition::WomanSurroundedByMales(summary.male_count));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Location;

    fn ctx(nighttime: bool) -> Context {
        Context {
            nighttime,
            location: Location::unknown(),
        }
    }

    fn summary(female: u32, male: u32, gesture: bool) -> DetectionSummary {
        DetectionSummary {
            female_count: female,
            male_count: male,
            gesture_detected: gesture,
        }
    }

    #[test]
    fn lone_woman_fires_at_night() {
        assert_eq!(
            evaluate(&summary(1, 0, false), &ctx(true)),
            Some(IncidentCondition::LoneWomanAtNight)
        );
    }

    #[test]
    fn lone_woman_does_not_fire_during_day() {
        assert_eq!(evaluate(&summary(1, 0, false), &ctx(false)), None);
    }

    #[test]
    fn lone_woman_takes_priority_over_gesture() {
        // Both rule 1 and rule 2 hold; rule 1 must win.
        assert_eq!(
            evaluate(&summary(1, 0, true), &ctx(true)),
            Some(IncidentCondition::LoneWomanAtNight)
        );
    }

    #[test]
    fn gesture_fires_when_lone_woman_rule_does_not_hold() {
        assert_eq!(
            evaluate(&summary(0, 0, true), &ctx(true)),
            Some(IncidentCondition::SosGesture)
        );
        assert_eq!(
            evaluate(&summary(2, 3, true), &ctx(false)),
            Some(IncidentCondition::SosGesture)
        );
    }

    #[test]
    fn gesture_takes_priority_over_surrounded() {
        assert_eq!(
            evaluate(&summary(1, 3, true), &ctx(false)),
            Some(IncidentCondition::SosGesture)
        );
    }

    #[test]
    fn surrounded_fires_with_multiple_males() {
        assert_eq!(
            evaluate(&summary(1, 3, false), &ctx(false)),
            Some(IncidentCondition::WomanSurroundedByMales(3))
        );
        // Also at night: rule 1 requires zero males, so rule 3 applies.
        assert_eq!(
            evaluate(&summary(1, 2, false), &ctx(true)),
            Some(IncidentCondition::WomanSurroundedByMales(2))
        );
    }

    #[test]
    fn surrounded_requires_more_than_one_male() {
        assert_eq!(evaluate(&summary(1, 1, false), &ctx(false)), None);
    }

    #[test]
    fn no_incident_for_empty_or_balanced_scenes() {
        assert_eq!(evaluate(&summary(0, 0, false), &ctx(true)), None);
        assert_eq!(evaluate(&summary(2, 2, false), &ctx(true)), None);
        assert_eq!(evaluate(&summary(0, 4, false), &ctx(false)), None);
        assert_eq!(evaluate(&summary(3, 0, false), &ctx(true)), None);
    }

    #[test]
    fn labels_match_persisted_format() {
        assert_eq!(
            IncidentCondition::LoneWomanAtNight.label(),
            "Woman Alone at Night"
        );
        assert_eq!(
            IncidentCondition::SosGesture.label(),
            "SOS Gesture Detected"
        );
        assert_eq!(
            IncidentCondition::WomanSurroundedByMales(3).label(),
            "1 Female with 3 Males"
        );
    }
}
