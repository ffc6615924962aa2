use crate::error::{AppError, CycleError};
use crate::intersection::Road;
use crate::metrics::MetricsTable;
use crate::state::{RoadReading, SignalPhase, TrafficLevel};
use serde::Serialize;
use std::io::Write;
use std::time::SystemTime;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub mod text;

pub const CHART_TITLE: &str = "Traffic Density with Spillback Prevention";
pub const CHART_X_LABEL: &str = "Roads";
pub const CHART_Y_LABEL: &str = "Vehicle Count";

pub const EMERGENCY_COLOR: &str = "#d62728";
pub const SPILLBACK_COLOR: &str = "#ff7f0e";
pub const NORMAL_COLOR: &str = "#1f77b4";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SummaryRow {
    pub road: Road,
    pub vehicle_count: u32,
    pub traffic_level: TrafficLevel,
    pub has_emergency_vehicle: bool,
    pub spillback_risk: bool,
    pub green_time_seconds: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BarCategory {
    Emergency,
    Spillback,
    Normal,
}

impl BarCategory {
    pub fn color(self) -> &'static str {
        match self {
            BarCategory::Emergency => EMERGENCY_COLOR,
            BarCategory::Spillback => SPILLBACK_COLOR,
            BarCategory::Normal => NORMAL_COLOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ChartBar {
    pub road: Road,
    pub height: u32,
    pub category: BarCategory,
    pub color: &'static str,
    pub annotation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Chart {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub bars: Vec<ChartBar>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CycleReport {
    pub completed_at: String,
    pub rows: Vec<SummaryRow>,
    pub chart: Chart,
    pub phases: Vec<SignalPhase>,
}

/// Receives the final per-road metrics once the cycle has finished.
pub trait SummarySink {
    fn publish(&mut self, report: &CycleReport) -> Result<(), AppError>;
}

pub fn summary_rows(
    readings: &[RoadReading],
    metrics: &MetricsTable,
) -> Result<Vec<SummaryRow>, CycleError> {
    metrics
        .iter()
        .map(|(road, road_metrics)| {
            let reading = readings.iter().find(|r| &r.road == road).ok_or_else(|| {
                CycleError::InvalidReading {
                    road: road.to_string(),
                    reason: "no reading supplied".to_string(),
                }
            })?;
            Ok(SummaryRow {
                road: road.clone(),
                vehicle_count: reading.vehicle_count,
                traffic_level: road_metrics.traffic_level,
                has_emergency_vehicle: reading.has_emergency_vehicle,
                spillback_risk: road_metrics.spillback_risk,
                green_time_seconds: road_metrics.green_time_seconds,
            })
        })
        .collect()
}

pub fn chart_bar(row: &SummaryRow) -> ChartBar {
    let category = if row.has_emergency_vehicle {
        BarCategory::Emergency
    } else if row.spillback_risk {
        BarCategory::Spillback
    } else {
        BarCategory::Normal
    };

    let mut annotation = format!(
        "{} vehicles\n{} sec",
        row.vehicle_count, row.green_time_seconds
    );
    if row.spillback_risk {
        annotation.push_str("\n(spillback)");
    }

    ChartBar {
        road: row.road.clone(),
        height: row.vehicle_count,
        category,
        color: category.color(),
        annotation,
    }
}

pub fn chart(rows: &[SummaryRow]) -> Chart {
    Chart {
        title: CHART_TITLE,
        x_label: CHART_X_LABEL,
        y_label: CHART_Y_LABEL,
        bars: rows.iter().map(chart_bar).collect(),
    }
}

pub fn build_report(
    readings: &[RoadReading],
    metrics: &MetricsTable,
    phases: Vec<SignalPhase>,
    completed_at: SystemTime,
) -> Result<CycleReport, AppError> {
    let rows = summary_rows(readings, metrics)?;
    let chart = chart(&rows);
    Ok(CycleReport {
        completed_at: format_timestamp(completed_at)?,
        rows,
        chart,
        phases,
    })
}

fn format_timestamp(timestamp: SystemTime) -> Result<String, AppError> {
    Ok(OffsetDateTime::from(timestamp).format(&Rfc3339)?)
}

/// Writes the text summary, and optionally the chart as JSON, to any writer.
pub struct WriterSink<W> {
    writer: W,
    chart_json: bool,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W, chart_json: bool) -> Self {
        Self { writer, chart_json }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<std::io::Stdout> {
    pub fn stdout(chart_json: bool) -> Self {
        Self::new(std::io::stdout(), chart_json)
    }
}

impl<W: Write> SummarySink for WriterSink<W> {
    fn publish(&mut self, report: &CycleReport) -> Result<(), AppError> {
        let mut out = text::render_table(&report.rows);
        if self.chart_json {
            let json = serde_json::to_string_pretty(&report.chart)
                .map_err(|err| AppError::Report(format!("chart serialization failed: {err}")))?;
            out.push_str(&json);
            out.push('\n');
        }
        self.writer
            .write_all(out.as_bytes())
            .and_then(|()| self.writer.flush())
            .map_err(|err| AppError::Report(format!("summary write failed: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::metrics_for;
    use serde_json::json;
    use std::io;
    use std::time::{Duration, UNIX_EPOCH};

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn row(road: &str, vehicles: u32, capacity: u32, emergency: bool) -> SummaryRow {
        let metrics = metrics_for(vehicles, capacity);
        SummaryRow {
            road: Road::new(road),
            vehicle_count: vehicles,
            traffic_level: metrics.traffic_level,
            has_emergency_vehicle: emergency,
            spillback_risk: metrics.spillback_risk,
            green_time_seconds: metrics.green_time_seconds,
        }
    }

    #[test]
    fn bar_colors_follow_priority_of_categories() {
        assert_eq!(chart_bar(&row("Road C", 5, 50, true)).color, EMERGENCY_COLOR);
        assert_eq!(chart_bar(&row("Road C", 500, 50, true)).color, EMERGENCY_COLOR);
        assert_eq!(chart_bar(&row("Road B", 80, 10, false)).color, SPILLBACK_COLOR);
        assert_eq!(chart_bar(&row("Road A", 10, 30, false)).color, NORMAL_COLOR);
    }

    #[test]
    fn annotation_marks_spillback() {
        assert_eq!(
            chart_bar(&row("Road B", 80, 10, false)).annotation,
            "80 vehicles\n60 sec\n(spillback)"
        );
        assert_eq!(
            chart_bar(&row("Road A", 10, 30, false)).annotation,
            "10 vehicles\n20 sec"
        );
    }

    #[test]
    fn chart_serializes_for_renderers() {
        let chart = chart(&[row("Road A", 10, 30, false)]);

        let value = serde_json::to_value(&chart).expect("serialize chart");

        assert_eq!(
            value,
            json!({
                "title": "Traffic Density with Spillback Prevention",
                "x_label": "Roads",
                "y_label": "Vehicle Count",
                "bars": [{
                    "road": "Road A",
                    "height": 10,
                    "category": "normal",
                    "color": "#1f77b4",
                    "annotation": "10 vehicles\n20 sec"
                }]
            })
        );
    }

    #[test]
    fn report_timestamp_is_rfc3339() -> Result<(), AppError> {
        let readings = vec![RoadReading {
            road: Road::new("Road A"),
            vehicle_count: 10,
            has_emergency_vehicle: false,
        }];
        let metrics = MetricsTable::from_entries(vec![(Road::new("Road A"), metrics_for(10, 30))]);

        let report = build_report(
            &readings,
            &metrics,
            Vec::new(),
            UNIX_EPOCH + Duration::from_secs(1_768_134_600),
        )?;

        assert_eq!(report.completed_at, "2026-01-11T12:30:00Z");
        assert_eq!(report.rows.len(), 1);
        Ok(())
    }

    #[test]
    fn writer_sink_appends_chart_json_when_enabled() -> Result<(), AppError> {
        let readings = vec![RoadReading {
            road: Road::new("Road A"),
            vehicle_count: 10,
            has_emergency_vehicle: false,
        }];
        let metrics = MetricsTable::from_entries(vec![(Road::new("Road A"), metrics_for(10, 30))]);
        let report = build_report(&readings, &metrics, Vec::new(), UNIX_EPOCH)?;
        let mut sink = WriterSink::new(Vec::new(), true);

        sink.publish(&report)?;

        let written = String::from_utf8(sink.into_inner()).expect("utf8 output");
        assert!(written.contains("Road A | Vehicles: 10"));
        assert!(written.contains("\"title\": \"Traffic Density with Spillback Prevention\""));
        Ok(())
    }

    #[test]
    fn timestamp_outside_rfc3339_range_is_an_error() {
        // Roughly 130 BC; RFC 3339 only covers years 0000-9999
        let before_year_zero = UNIX_EPOCH
            .checked_sub(Duration::from_secs(2_100 * 365 * 86_400))
            .expect("representable system time");

        let result = format_timestamp(before_year_zero);

        assert!(matches!(result, Err(AppError::Timestamp(_))));
    }

    #[test]
    fn failed_write_is_a_report_error() -> Result<(), AppError> {
        let readings = vec![RoadReading {
            road: Road::new("Road A"),
            vehicle_count: 10,
            has_emergency_vehicle: false,
        }];
        let metrics = MetricsTable::from_entries(vec![(Road::new("Road A"), metrics_for(10, 30))]);
        let report = build_report(&readings, &metrics, Vec::new(), UNIX_EPOCH)?;
        let mut sink = WriterSink::new(FailingWriter, false);

        let result = sink.publish(&report);

        assert!(matches!(result, Err(AppError::Report(ref message)) if message.contains("stdout closed")));
        Ok(())
    }
}
