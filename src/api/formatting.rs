//! Report rendering

use serde::{Deserialize, Serialize};

use super::report::WarehouseReport;
use crate::processing::anomaly::Finding;

/// Report output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Human-readable text formatter
#[derive(Debug, Clone)]
pub struct TextFormatter {
    /// List the reasons each vehicle was flagged
    pub include_findings: bool,
    /// Decimal places for speeds and distances
    pub precision: usize,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self {
            include_findings: true,
            precision: 3,
        }
    }
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format_text(&self, report: &WarehouseReport) -> String {
        let mut out = String::new();
        let p = self.precision;

        out.push_str("Pings:\n");
        for ping in &report.pings {
            out.push_str(&format!("  {}: {} @ {}\n", ping.vehicle_id, ping.position, ping.timestamp));
        }

        out.push_str("\nAverage speeds:\n");
        for entry in &report.average_speeds {
            match entry.average_speed {
                Some(speed) => out.push_str(&format!("  {}: {:.p$}\n", entry.vehicle_id, speed)),
                None => out.push_str(&format!(
                    "  {}: undefined ({} pings at one timestamp)\n",
                    entry.vehicle_id, entry.ping_count
                )),
            }
        }

        out.push_str("\nVehicles possibly damaged:\n");
        if report.damage.flagged.is_empty() {
            out.push_str("  none\n");
        }
        for vehicle_id in &report.damage.flagged {
            out.push_str(&format!("  {}\n", vehicle_id));
            if self.include_findings {
                for finding in report.damage.findings_for(vehicle_id) {
                    out.push_str(&format!("    - {}\n", self.describe(finding, vehicle_id)));
                }
            }
        }

        out
    }

    fn describe(&self, finding: &Finding, vehicle_id: &str) -> String {
        let p = self.precision;
        match finding {
            Finding::AbruptMotion {
                index,
                timestamp,
                delta,
                ..
            } => format!(
                "abrupt speed change of {:.p$} at ping {} (t={})",
                delta, index, timestamp
            ),
            Finding::Proximity {
                first,
                second,
                first_timestamp,
                second_timestamp,
                distance,
            } => {
                let (other, own_t, other_t) = if first == vehicle_id {
                    (second, first_timestamp, second_timestamp)
                } else {
                    (first, second_timestamp, first_timestamp)
                };
                format!(
                    "within {:.p$} of {} (t={} vs t={})",
                    distance, other, own_t, other_t
                )
            }
        }
    }
}

/// JSON formatter
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    pub pretty: bool,
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }

    pub fn format_json(&self, report: &WarehouseReport) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        }
    }
}

/// Render with the default formatter for `format`
pub fn render(report: &WarehouseReport, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(TextFormatter::new().format_text(report)),
        OutputFormat::Json => JsonFormatter::new().format_json(report),
    }
}
