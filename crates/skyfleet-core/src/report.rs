//! Read-only summaries for presentation layers.
//!
//! All types are owned copies. Only the numeric fields and their formulas
//! are part of the core contract; the [`Display`] impls render the console
//! layout used by the runner.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::id::VehicleId;

// ---------------------------------------------------------------------------
// Vehicle summary
// ---------------------------------------------------------------------------

/// Lifetime totals of one vehicle. Times are simulated minutes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleSummary {
    pub label: String,
    pub endurance: f64,
    pub total_en_route: f64,
    pub total_charging: f64,
    pub total_waiting: f64,
    /// `(total_en_route / 60) * cruise_speed * passenger_count`.
    pub passenger_miles: f64,
}

impl fmt::Display for VehicleSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Result:")?;
        writeln!(f, "  Model                      : {}", self.label)?;
        writeln!(f, "  Endurance                  : {:.2}", self.endurance)?;
        writeln!(f, "  Total Time In Flight (mins): {:.2}", self.total_en_route)?;
        writeln!(f, "  Total Time Charging (mins) : {:.2}", self.total_charging)?;
        writeln!(f, "  Total Time Waiting (mins)  : {:.2}", self.total_waiting)?;
        write!(f, "  Total Passenger Miles      : {:.2}", self.passenger_miles)
    }
}

// ---------------------------------------------------------------------------
// Profile summary
// ---------------------------------------------------------------------------

/// Fleet-wide totals for one model. Averages are per vehicle of the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSummary {
    pub label: String,
    pub fleet_count: u32,
    pub average_flight_time: f64,
    pub average_waiting_time: f64,
    pub average_charging_time: f64,
    /// `max_faults_per_hour * total_flight_time / 60`.
    pub max_faults: f64,
    pub total_passenger_miles: f64,
    pub average_passenger_miles: f64,
}

impl fmt::Display for ProfileSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} Results:", self.label)?;
        writeln!(f, "   Number of Vehicles           : {}", self.fleet_count)?;
        writeln!(f, "   Average Time in Flight (mins): {:.2}", self.average_flight_time)?;
        writeln!(f, "   Average Time Waiting (mins)  : {:.2}", self.average_waiting_time)?;
        writeln!(f, "   Average Time Charging (mins) : {:.2}", self.average_charging_time)?;
        writeln!(f, "   Max number of faults         : {:.4}", self.max_faults)?;
        writeln!(f, "   Total Passenger Miles        : {:.2}", self.total_passenger_miles)?;
        write!(f, "   Average Passenger Miles      : {:.2}", self.average_passenger_miles)
    }
}

// ---------------------------------------------------------------------------
// Fleet report
// ---------------------------------------------------------------------------

/// Every vehicle summary followed by every model summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetReport {
    #[serde(skip)]
    pub vehicle_ids: Vec<VehicleId>,
    pub vehicles: Vec<VehicleSummary>,
    pub profiles: Vec<ProfileSummary>,
}

impl FleetReport {
    /// Sum of passenger-miles over every model.
    pub fn total_passenger_miles(&self) -> f64 {
        self.profiles.iter().map(|p| p.total_passenger_miles).sum()
    }
}

impl fmt::Display for FleetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Per Vehicle Stats:")?;
        for vehicle in &self.vehicles {
            writeln!(f, "{vehicle}")?;
        }
        writeln!(f)?;
        writeln!(f, "Per Model Stats:")?;
        for profile in &self.profiles {
            writeln!(f, "{profile}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Run summary
// ---------------------------------------------------------------------------

/// Outcome of a complete [`Simulation::run`](crate::simulation::Simulation::run).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub simulated_minutes: f64,
    pub wall_time: Duration,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Simulation finished, total-run-time(seconds)/total-iterations: {:.3}/{}",
            self.wall_time.as_secs_f64(),
            self.ticks
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_vehicle() -> VehicleSummary {
        VehicleSummary {
            label: "Alpha".to_string(),
            endurance: 100.0,
            total_en_route: 120.0,
            total_charging: 36.0,
            total_waiting: 4.5,
            passenger_miles: 960.0,
        }
    }

    fn sample_profile() -> ProfileSummary {
        ProfileSummary {
            label: "Alpha".to_string(),
            fleet_count: 2,
            average_flight_time: 60.0,
            average_waiting_time: 2.25,
            average_charging_time: 18.0,
            max_faults: 0.5,
            total_passenger_miles: 960.0,
            average_passenger_miles: 480.0,
        }
    }

    #[test]
    fn vehicle_summary_renders_every_field() {
        let text = sample_vehicle().to_string();
        assert!(text.contains("Model                      : Alpha"));
        assert!(text.contains("Total Time In Flight (mins): 120.00"));
        assert!(text.contains("Total Time Waiting (mins)  : 4.50"));
        assert!(text.contains("Total Passenger Miles      : 960.00"));
    }

    #[test]
    fn fleet_report_lists_vehicles_then_models() {
        let report = FleetReport {
            vehicle_ids: Vec::new(),
            vehicles: vec![sample_vehicle()],
            profiles: vec![sample_profile()],
        };
        let text = report.to_string();
        let vehicles_at = text.find("Per Vehicle Stats:").unwrap();
        let models_at = text.find("Per Model Stats:").unwrap();
        assert!(vehicles_at < models_at);
        assert!(text.contains("Alpha Results:"));
        assert_eq!(report.total_passenger_miles(), 960.0);
    }

    #[test]
    fn summaries_serialize_to_json() {
        let json = serde_json::to_value(sample_profile()).unwrap();
        assert_eq!(json["fleet_count"], 2);
        assert_eq!(json["average_flight_time"], 60.0);

        let report = FleetReport {
            vehicle_ids: Vec::new(),
            vehicles: vec![sample_vehicle()],
            profiles: Vec::new(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("vehicle_ids").is_none());
        assert_eq!(json["vehicles"][0]["label"], "Alpha");
    }

    #[test]
    fn run_summary_display() {
        let summary = RunSummary {
            ticks: 18_000,
            simulated_minutes: 180.0,
            wall_time: Duration::from_millis(1500),
        };
        assert_eq!(
            summary.to_string(),
            "Simulation finished, total-run-time(seconds)/total-iterations: 1.500/18000"
        );
    }
}
