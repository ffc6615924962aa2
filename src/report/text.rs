use crate::report::SummaryRow;
use std::fmt::Write;

pub fn render_row(row: &SummaryRow) -> String {
    format!(
        "{} | Vehicles: {} | Traffic Level: {} | Emergency: {} | Spillback Risk: {}",
        row.road,
        row.vehicle_count,
        row.traffic_level,
        row.has_emergency_vehicle,
        if row.spillback_risk { "YES" } else { "NO" },
    )
}

pub fn render_table(rows: &[SummaryRow]) -> String {
    let mut out = String::from("--- TRAFFIC SUMMARY ---\n");
    for row in rows {
        let _ = writeln!(out, "{}", render_row(row));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intersection::Road;
    use crate::state::TrafficLevel;

    #[test]
    fn row_matches_summary_layout() {
        let row = SummaryRow {
            road: Road::new("Road D"),
            vehicle_count: 250,
            traffic_level: TrafficLevel::High,
            has_emergency_vehicle: false,
            spillback_risk: true,
            green_time_seconds: 60,
        };

        assert_eq!(
            render_row(&row),
            "Road D | Vehicles: 250 | Traffic Level: High | Emergency: false | Spillback Risk: YES"
        );
    }

    #[test]
    fn table_has_header_and_one_line_per_row() {
        let row = SummaryRow {
            road: Road::new("Road A"),
            vehicle_count: 10,
            traffic_level: TrafficLevel::Low,
            has_emergency_vehicle: true,
            spillback_risk: false,
            green_time_seconds: 15,
        };

        let table = render_table(&[row.clone(), row]);

        assert_eq!(table.lines().count(), 3);
        assert!(table.starts_with("--- TRAFFIC SUMMARY ---"));
    }
}
