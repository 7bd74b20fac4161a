use chrono::{DateTime, Utc};

use crate::impact::domain::impact_event::ImpactEvent;
use crate::impact::domain::impact_thresholds::ImpactThresholds;
use crate::impact::domain::sensor_reading::SensorReading;

/// Outcome of one completed acceleration + angular velocity pair.
#[derive(Clone, Debug, PartialEq)]
pub struct ImpactAssessment {
    /// 1-based count of acceleration readings seen so far.
    pub hit_number: usize,
    pub acceleration_g: f64,
    pub angular_velocity: f64,
    /// g threshold exceeded and outside the cooldown window.
    pub g_alert: bool,
    /// g threshold exceeded but still cooling down from the previous alert.
    pub g_suppressed: bool,
    pub angular_alert: bool,
    /// Present when the pair should be reported.
    pub event: Option<ImpactEvent>,
}

/// Pairs sensor readings and decides which ones become impact events.
///
/// An acceleration reading arms the monitor; the next angular velocity
/// reading completes the pair. A second acceleration before that replaces
/// the first. Angular readings that arrive unarmed are ignored.
pub struct ImpactMonitor {
    thresholds: ImpactThresholds,
    player_name: String,
    team: String,
    pending_acceleration: Option<i64>,
    hits: usize,
    events: usize,
    last_g_alert: Option<DateTime<Utc>>,
}

impl ImpactMonitor {
    pub fn new(
        thresholds: ImpactThresholds,
        player_name: impl Into<String>,
        team: impl Into<String>,
    ) -> Self {
        Self {
            thresholds,
            player_name: player_name.into(),
            team: team.into(),
            pending_acceleration: None,
            hits: 0,
            events: 0,
            last_g_alert: None,
        }
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Number of assessments that produced an event.
    pub fn events(&self) -> usize {
        self.events
    }

    pub fn observe(
        &mut self,
        reading: SensorReading,
        now: DateTime<Utc>,
    ) -> Option<ImpactAssessment> {
        match reading {
            SensorReading::Acceleration(raw) => {
                self.hits += 1;
                self.pending_acceleration = Some(raw);
                log::debug!(
                    "Hit #{}: {:.2}g",
                    self.hits,
                    raw as f64 / self.thresholds.magnitude_scale
                );
                None
            }
            SensorReading::AngularVelocity(raw) => {
                let Some(accel_raw) = self.pending_acceleration.take() else {
                    log::trace!("Ignoring unpaired angular velocity reading {raw}");
                    return None;
                };
                Some(self.assess(accel_raw, raw, now))
            }
        }
    }

    fn assess(&mut self, accel_raw: i64, gyro_raw: i64, now: DateTime<Utc>) -> ImpactAssessment {
        let t = &self.thresholds;
        let acceleration_g = accel_raw as f64 / t.magnitude_scale;
        let angular_velocity = gyro_raw as f64 / t.gyroscope_scale;

        let g_exceeded = acceleration_g > t.threshold_g;
        let angular_alert = angular_velocity.abs() > t.threshold_gyro;

        let mut g_alert = false;
        let mut g_suppressed = false;
        if g_exceeded {
            let cooled_down = self.last_g_alert.map_or(true, |last| {
                (now - last).num_milliseconds() as f64 / 1000.0 >= t.alert_cooldown_secs
            });
            if cooled_down {
                g_alert = true;
                self.last_g_alert = Some(now);
                log::warn!(
                    "{}: g-force threshold exceeded ({acceleration_g:.2}g)",
                    self.player_name
                );
            } else {
                g_suppressed = true;
                log::info!("g-force threshold exceeded during cooldown ({acceleration_g:.2}g)");
            }
        }
        if angular_alert {
            log::warn!(
                "{}: angular threshold exceeded ({angular_velocity:.2} deg/s)",
                self.player_name
            );
        }

        let normal = !g_exceeded && !angular_alert;
        let report = g_alert || angular_alert || (normal && t.send_all_data);
        let event = report.then(|| ImpactEvent {
            player_name: self.player_name.clone(),
            team: self.team.clone(),
            occurred_at: now,
            acceleration_g,
            angular_velocity,
        });
        if event.is_some() {
            self.events += 1;
        }

        ImpactAssessment {
            hit_number: self.hits,
            acceleration_g,
            angular_velocity,
            g_alert,
            g_suppressed,
            angular_alert,
            event,
        }
    }
}
