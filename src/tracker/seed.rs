//! Built-in trackers installed for a fresh user

use serde_json::{Map, Value};

use crate::primitives::PrimitiveValidation;
use crate::schedule::ScheduleConfig;

use super::draft::{FieldDraft, TrackerDraft};

/// A built-in tracker with its stable id
#[derive(Debug, Clone, PartialEq)]
pub struct SeedTracker {
    pub id: &'static str,
    pub draft: TrackerDraft,
}

/// Water Intake, Meditation and Blood Pressure
pub fn core_trackers() -> Vec<SeedTracker> {
    vec![
        SeedTracker {
            id: "seed-water-intake",
            draft: TrackerDraft {
                name: "Water Intake".into(),
                description: Some("Track daily water intake in ounces.".into()),
                schedule: ScheduleConfig::daily(["09:00", "13:00", "18:00"]),
                fields: vec![FieldDraft::new("ounces", "number")
                    .with_unit("oz")
                    .with_validation(PrimitiveValidation::range(Some(0.0), Some(256.0)))
                    .with_target(target("dailyTarget", 80))
                    .with_sort_order(0)],
            },
        },
        SeedTracker {
            id: "seed-meditation",
            draft: TrackerDraft {
                name: "Meditation".into(),
                description: Some("Log meditation minutes on weekdays.".into()),
                schedule: ScheduleConfig::weekdays(["07:30"]),
                fields: vec![FieldDraft::new("minutes", "duration")
                    .with_unit("sec")
                    .with_validation(PrimitiveValidation::range(Some(60.0), Some(7200.0)))
                    .with_target(target("dailyTargetSec", 600))
                    .with_sort_order(0)],
            },
        },
        SeedTracker {
            id: "seed-blood-pressure",
            draft: TrackerDraft {
                name: "Blood Pressure".into(),
                description: Some("Track systolic and diastolic pressure readings.".into()),
                schedule: ScheduleConfig::daily(["08:00", "20:00"]),
                fields: vec![
                    FieldDraft::new("systolic", "number")
                        .with_unit("mmHg")
                        .with_validation(
                            PrimitiveValidation::range(Some(70.0), Some(260.0)).with_integer(true),
                        )
                        .with_sort_order(0),
                    FieldDraft::new("diastolic", "number")
                        .with_unit("mmHg")
                        .with_validation(
                            PrimitiveValidation::range(Some(40.0), Some(180.0)).with_integer(true),
                        )
                        .with_sort_order(1),
                ],
            },
        },
    ]
}

fn target(key: &str, value: i64) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(key.to_string(), Value::from(value));
    map
}
