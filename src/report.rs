//! Report assembly: filter agents, geocode, optimize, render, summarize.
//!
//! The report is the JSON payload the web layer hands back to dispatchers:
//! metadata about the request, distance/time statistics, the ordered
//! itinerary and a reference to the rendered map. Per-waypoint geocode
//! failures degrade to approximate points and are counted, never fatal; the
//! only terminal condition is an empty agent list, which yields a valid
//! empty report.

use serde::{Deserialize, Serialize};

use crate::geocode::Geocoder;
use crate::optimizer::{RouteOptimizer, Waypoint};
use crate::traits::{GeocodeSource, MapArtifact, MapRenderer};

/// One planning row: an agent with a pickup/drop-off address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRecord {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub hour: Option<HourValue>,
}

/// Agent hours arrive as integers or as "HH:MM" strings depending on the
/// planning source; comparisons are by integer hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HourValue {
    Number(i64),
    Text(String),
}

impl HourValue {
    /// Integer hour, if one can be extracted.
    pub fn as_hour(&self) -> Option<i64> {
        match self {
            HourValue::Number(n) => Some(*n),
            HourValue::Text(s) => {
                let head = s.split(':').next().unwrap_or(s);
                head.trim().parse().ok()
            }
        }
    }

    fn matches_text(&self, filter: &str) -> bool {
        match self {
            HourValue::Number(n) => n.to_string() == filter,
            HourValue::Text(s) => s == filter,
        }
    }
}

/// Filter criteria for report generation, passed in from any call site
/// (HTTP handler, export job) without web-framework baggage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportFilter {
    pub day: String,
    pub transport_type: String,
    /// Integer-hour filter, e.g. "8"; `None` keeps all agents.
    #[serde(default)]
    pub hour: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    pub generated_at: String,
    pub day: String,
    pub transport_type: String,
    pub hour: Option<String>,
    /// Agents retained after the hour filter.
    pub agent_count: usize,
    pub agent_count_total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportStats {
    pub total_distance_km: f64,
    pub average_leg_km: f64,
    pub estimated_savings_km: f64,
    pub estimated_minutes: f64,
    pub geocode_success: usize,
    pub geocode_failure: usize,
}

/// Per-stop detail with geocoding provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopDetail {
    pub agent_id: Option<i64>,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub company: String,
    pub phone: String,
    pub hour: Option<HourValue>,
    pub geocode_success: bool,
    pub geocode_source: GeocodeSource,
}

/// Final report handed back to the web layer. JSON-serializable; lifetime is
/// one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub stats: ReportStats,
    /// Waypoints in visit order.
    pub itinerary: Vec<Waypoint>,
    /// Reference to the rendered map, when the renderer produced one.
    pub visualization: Option<MapArtifact>,
    pub stops: Vec<StopDetail>,
}

/// Assembles optimization reports from agent rows.
pub struct ReportBuilder<R> {
    optimizer: RouteOptimizer,
    renderer: R,
}

impl<R: MapRenderer> ReportBuilder<R> {
    pub fn new(optimizer: RouteOptimizer, renderer: R) -> Self {
        Self {
            optimizer,
            renderer,
        }
    }

    pub fn generate(
        &self,
        geocoder: &Geocoder,
        agents: &[AgentRecord],
        filter: &ReportFilter,
    ) -> Report {
        tracing::info!(
            day = %filter.day,
            transport_type = %filter.transport_type,
            hour = ?filter.hour,
            agents = agents.len(),
            "generating optimization report"
        );

        let filtered = filter_by_hour(agents, filter.hour.as_deref());

        let addresses: Vec<String> = filtered.iter().map(|a| a.address.clone()).collect();
        let geocodes = geocoder.batch_geocode(&addresses);

        let stops: Vec<StopDetail> = filtered
            .iter()
            .zip(&geocodes)
            .map(|(agent, geocode)| StopDetail {
                agent_id: agent.id,
                name: agent.name.clone(),
                address: agent.address.clone(),
                latitude: geocode.latitude,
                longitude: geocode.longitude,
                company: agent.company.clone(),
                phone: agent.phone.clone(),
                hour: agent.hour.clone(),
                geocode_success: geocode.success,
                geocode_source: geocode.source,
            })
            .collect();

        let waypoints: Vec<Waypoint> = stops
            .iter()
            .map(|stop| Waypoint {
                name: stop.name.clone(),
                address: stop.address.clone(),
                latitude: stop.latitude,
                longitude: stop.longitude,
                company: stop.company.clone(),
                phone: stop.phone.clone(),
                original_index: 0,
                visiting_order: 0,
            })
            .collect();

        let route = self.optimizer.optimize(&waypoints, 0);

        let mut title = format!("Itinéraire {} - {}", filter.transport_type, filter.day);
        if let Some(hour) = &filter.hour {
            title = format!("{} - {}h", title, hour);
        }
        let visualization = if route.ordered_waypoints.is_empty() {
            None
        } else {
            match self.renderer.render(&route.ordered_waypoints, &title) {
                Ok(artifact) => Some(artifact),
                Err(err) => {
                    tracing::warn!(error = %err, "map rendering failed");
                    None
                }
            }
        };

        let geocode_success = stops.iter().filter(|s| s.geocode_success).count();

        Report {
            meta: ReportMeta {
                generated_at: chrono::Utc::now().to_rfc3339(),
                day: filter.day.clone(),
                transport_type: filter.transport_type.clone(),
                hour: filter.hour.clone(),
                agent_count: filtered.len(),
                agent_count_total: agents.len(),
            },
            stats: ReportStats {
                total_distance_km: route.total_distance_km,
                average_leg_km: route.average_leg_km,
                estimated_savings_km: route.estimated_savings_km,
                estimated_minutes: route.estimated_minutes,
                geocode_success,
                geocode_failure: stops.len() - geocode_success,
            },
            itinerary: route.ordered_waypoints,
            visualization,
            stops,
        }
    }
}

/// Keep agents whose hour matches the integer-hour filter. An unparsable
/// filter disables filtering; agents whose hour cannot be parsed fall back
/// to exact string comparison.
fn filter_by_hour<'a>(agents: &'a [AgentRecord], hour: Option<&str>) -> Vec<&'a AgentRecord> {
    let Some(filter) = hour else {
        return agents.iter().collect();
    };

    let Ok(filter_hour) = filter.trim().parse::<i64>() else {
        tracing::warn!(hour = %filter, "unparsable hour filter, keeping all agents");
        return agents.iter().collect();
    };

    let kept: Vec<&AgentRecord> = agents
        .iter()
        .filter(|agent| match &agent.hour {
            Some(value) => match value.as_hour() {
                Some(agent_hour) => agent_hour == filter_hour,
                None => value.matches_text(filter),
            },
            None => false,
        })
        .collect();

    tracing::debug!(
        hour = filter_hour,
        kept = kept.len(),
        total = agents.len(),
        "hour filter applied"
    );
    kept
}
