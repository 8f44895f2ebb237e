//! Audit reason strings.
//!
//! These strings are part of the external contract: history readers may
//! grep them, so their exact wording is stable.

use gantry_models::{ActiveSchedule, Trigger};

/// Reason for a schedule-end decision.
pub const SCHEDULE_END_REASON: &str = "schedule ends";

/// Renders the reason for a dynamic scaling decision.
#[must_use]
pub fn dynamic_scaling_reason(trigger: &Trigger) -> String {
    format!(
        "{} instance(s) because {} {} {} for {} seconds",
        trigger.adjustment,
        trigger.metric_type,
        trigger.operator,
        trigger.threshold,
        trigger.breach_duration_seconds
    )
}

/// Renders the reason for a schedule-start decision.
#[must_use]
pub fn schedule_start_reason(schedule: &ActiveSchedule) -> String {
    format!(
        "schedule starts with instance min {}, instance max {} and instance min initial {}",
        schedule.instance_min, schedule.instance_max, schedule.instance_min_initial
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_models::AppId;

    #[test]
    fn dynamic_reason_format() {
        let trigger = Trigger {
            app_id: AppId::new("app"),
            metric_type: "memorybytes".into(),
            operator: ">=".into(),
            threshold: 300,
            breach_duration_seconds: 120,
            cool_down_seconds: 300,
            adjustment: "25%".into(),
        };
        assert_eq!(
            dynamic_scaling_reason(&trigger),
            "25% instance(s) because memorybytes >= 300 for 120 seconds"
        );
    }

    #[test]
    fn schedule_start_reason_format() {
        let schedule = ActiveSchedule {
            schedule_id: "schedule-1".into(),
            instance_min: 3,
            instance_max: 10,
            instance_min_initial: 5,
        };
        assert_eq!(
            schedule_start_reason(&schedule),
            "schedule starts with instance min 3, instance max 10 and instance min initial 5"
        );
    }

    #[test]
    fn schedule_end_reason_literal() {
        assert_eq!(SCHEDULE_END_REASON, "schedule ends");
    }
}
