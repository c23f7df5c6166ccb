//! [`StatusService`] – request routing for the radar console.
//!
//! Pure request-to-response mapping, kept separate from the socket handling
//! in [`server`](crate::server) so it can be tested without opening a port.
//!
//! * Requests naming `/angle` → `200 OK` with a JSON [`AngleReport`].
//! * Every other request → `200 OK` with the embedded viewer HTML.

use std::sync::Arc;

use sonarscope_types::{AngleReport, RadarSnapshot};
use tokio::sync::watch;
use tracing::error;

/// The compiled-in radar viewer single-page application (HTML + CSS + JS).
const VIEWER_HTML: &str = include_str!("viewer.html");

// ---------------------------------------------------------------------------
// StatusService
// ---------------------------------------------------------------------------

/// Maps raw HTTP request text to complete HTTP response text, reading the
/// latest published [`RadarSnapshot`] for the JSON endpoint.
///
/// The service never blocks the sweep: it reads whatever snapshot is current
/// on the watch channel, so repeated requests between two sweep steps return
/// byte-identical state.
pub struct StatusService {
    snapshots: watch::Receiver<Arc<RadarSnapshot>>,
}

impl StatusService {
    /// Create a service reading from `snapshots`.
    pub fn new(snapshots: watch::Receiver<Arc<RadarSnapshot>>) -> Self {
        Self { snapshots }
    }

    /// Produce the full HTTP response for `request` (the raw request text as
    /// read off the socket).
    pub fn respond(&self, request: &str) -> String {
        if request.contains("/angle") {
            self.angle_json()
        } else {
            http_response("text/html; charset=utf-8", VIEWER_HTML)
        }
    }

    /// `200 OK` with the current scan state as JSON.
    fn angle_json(&self) -> String {
        let snapshot = Arc::clone(&self.snapshots.borrow());
        let report = AngleReport::from(snapshot.as_ref());
        match serde_json::to_string(&report) {
            Ok(body) => http_response("application/json", &body),
            Err(e) => {
                error!(error = %e, "angle report serialization failed");
                "HTTP/1.1 500 Internal Server Error\r\n\
                 Content-Length: 0\r\n\
                 Connection: close\r\n\
                 \r\n"
                    .to_string()
            }
        }
    }
}

/// Assemble a `200 OK` response with a correct `Content-Length`.
fn http_response(content_type: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\n\
         Content-Type: {}\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n\
         {}",
        content_type,
        body.len(),
        body
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use chrono::Utc;
    use serde_json::Value;
    use sonarscope_types::{Detection, SweepDirection};

    fn snapshot(angle_deg: u16) -> Arc<RadarSnapshot> {
        let mut obstacles: BTreeMap<u16, Option<Detection>> =
            (0..=180).step_by(10).map(|a| (a, None)).collect();
        obstacles.insert(40, Some(Detection::new(120.0)));
        Arc::new(RadarSnapshot {
            angle_deg,
            direction: SweepDirection::Up,
            obstacles,
            taken_at: Utc::now(),
        })
    }

    fn service_at(angle_deg: u16) -> StatusService {
        let (_tx, rx) = watch::channel(snapshot(angle_deg));
        StatusService::new(rx)
    }

    fn body_of(response: &str) -> &str {
        response
            .split_once("\r\n\r\n")
            .map(|(_, body)| body)
            .unwrap_or("")
    }

    // ── /angle endpoint ───────────────────────────────────────────────────────

    #[test]
    fn angle_request_returns_json_report() {
        let service = service_at(40);
        let response = service.respond("GET /angle HTTP/1.1\r\nHost: radar\r\n\r\n");

        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert!(response.contains("Content-Type: application/json"));

        let json: Value = serde_json::from_str(body_of(&response)).unwrap();
        assert_eq!(json["angle"], 40);
        assert_eq!(json["obstacles"]["40"]["distance"], 120.0);
        assert_eq!(json["obstacles"]["90"], Value::Null);
        assert_eq!(json["obstacles"].as_object().unwrap().len(), 19);
    }

    #[test]
    fn angle_json_keys_are_stringified_degrees() {
        let service = service_at(0);
        let response = service.respond("GET /angle HTTP/1.1\r\n\r\n");
        let json: Value = serde_json::from_str(body_of(&response)).unwrap();
        for key in ["0", "10", "90", "180"] {
            assert!(
                json["obstacles"].get(key).is_some(),
                "key {key} must be present"
            );
        }
    }

    #[test]
    fn angle_reads_are_idempotent_between_sweep_steps() {
        let service = service_at(40);
        let first = service.respond("GET /angle HTTP/1.1\r\n\r\n");
        let second = service.respond("GET /angle HTTP/1.1\r\n\r\n");
        assert_eq!(first, second);
    }

    #[test]
    fn angle_report_tracks_newly_published_snapshots() {
        let (tx, rx) = watch::channel(snapshot(40));
        let service = StatusService::new(rx);

        tx.send_replace(snapshot(90));
        let response = service.respond("GET /angle HTTP/1.1\r\n\r\n");
        let json: Value = serde_json::from_str(body_of(&response)).unwrap();
        assert_eq!(json["angle"], 90);
    }

    // ── Viewer page ───────────────────────────────────────────────────────────

    #[test]
    fn root_request_returns_viewer_html() {
        let service = service_at(0);
        let response = service.respond("GET / HTTP/1.1\r\nHost: radar\r\n\r\n");
        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert!(response.contains("Content-Type: text/html"));
        assert!(response.contains("<canvas"));
    }

    #[test]
    fn unknown_paths_fall_back_to_the_viewer() {
        let service = service_at(0);
        let response = service.respond("GET /does-not-exist HTTP/1.1\r\n\r\n");
        assert!(response.contains("Content-Type: text/html"));
    }

    #[test]
    fn content_length_matches_body() {
        let service = service_at(40);
        for request in ["GET /angle HTTP/1.1\r\n\r\n", "GET / HTTP/1.1\r\n\r\n"] {
            let response = service.respond(request);
            let declared: usize = response
                .lines()
                .find_map(|l| l.strip_prefix("Content-Length: "))
                .unwrap()
                .trim()
                .parse()
                .unwrap();
            assert_eq!(declared, body_of(&response).len());
        }
    }

    // ── HTML embedding ────────────────────────────────────────────────────────

    #[test]
    fn viewer_html_polls_the_angle_endpoint() {
        assert!(
            VIEWER_HTML.contains("/angle"),
            "viewer must poll the JSON endpoint"
        );
    }
}
