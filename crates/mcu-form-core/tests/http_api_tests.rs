//! HTTP client tests against a local stub server.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use mcu_form_core::api::{ApiError, HttpPhysiqueApi, PhysiqueApi};
use mcu_form_core::form::{FormController, FormPhase};
use mcu_form_core::{FormConfig, PhysiqueField, PhysiqueRecord};
use serde_json::{json, Value};

/// A request captured by the stub.
struct Captured {
    request_line: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl Captured {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Serve one canned response per connection, in order.
fn serve(responses: Vec<(&'static str, String)>) -> (String, JoinHandle<Vec<Captured>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let mut captured = Vec::new();
        for (status, body) in responses {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();

            let mut headers = Vec::new();
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    headers.push((name.trim().to_string(), value.trim().to_string()));
                }
            }

            let length = headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
                .and_then(|(_, v)| v.parse::<usize>().ok())
                .unwrap_or(0);
            let mut body_bytes = vec![0u8; length];
            reader.read_exact(&mut body_bytes).unwrap();

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let mut stream = stream;
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();

            captured.push(Captured {
                request_line: request_line.trim_end().to_string(),
                headers,
                body: String::from_utf8(body_bytes).unwrap(),
            });
        }
        captured
    });

    (base_url, handle)
}

fn api_for(base_url: &str) -> HttpPhysiqueApi {
    let config = FormConfig {
        base_url: base_url.to_string(),
        request_timeout_ms: Some(5_000),
        ..FormConfig::default()
    };
    HttpPhysiqueApi::new(config).unwrap()
}

#[test]
fn test_fetch_parses_record() {
    let body = json!({
        "_id": "abc",
        "weight": "70",
        "height": "175",
        "bmi": "22.86",
        "heartRate": 80,
    })
    .to_string();
    let (base_url, server) = serve(vec![("200 OK", body)]);

    let record = api_for(&base_url).fetch("p-1").unwrap();

    assert_eq!(record.get(PhysiqueField::Weight), Some("70"));
    assert_eq!(record.get(PhysiqueField::HeartRate), Some("80"));
    assert_eq!(record.get(PhysiqueField::Complaint), None);

    let requests = server.join().unwrap();
    assert_eq!(
        requests[0].request_line,
        "GET /api/v1/patient-physique/p-1 HTTP/1.1"
    );
}

#[test]
fn test_fetch_not_found() {
    let (base_url, server) = serve(vec![("404 Not Found", "{\"message\":\"not found\"}".into())]);

    let err = api_for(&base_url).fetch("p-1").unwrap_err();
    assert_eq!(err, ApiError::NotFound("p-1".into()));
    server.join().unwrap();
}

#[test]
fn test_fetch_server_error() {
    let (base_url, server) = serve(vec![("500 Internal Server Error", "{\"error\":\"boom\"}".into())]);

    let err = api_for(&base_url).fetch("p-1").unwrap_err();
    assert_eq!(
        err,
        ApiError::Status {
            status: 500,
            body: "{\"error\":\"boom\"}".into()
        }
    );
    server.join().unwrap();
}

#[test]
fn test_fetch_rejects_non_object_body() {
    let (base_url, server) = serve(vec![
        ("200 OK", "[1, 2, 3]".into()),
        ("200 OK", "<html>".into()),
    ]);
    let api = api_for(&base_url);

    assert!(matches!(api.fetch("p-1"), Err(ApiError::Decode(_))));
    assert!(matches!(api.fetch("p-1"), Err(ApiError::Decode(_))));
    server.join().unwrap();
}

#[test]
fn test_submit_posts_json() {
    let (base_url, server) = serve(vec![("201 Created", "{}".into())]);

    let mut record = PhysiqueRecord::blank();
    record.set(PhysiqueField::Weight, "70");
    let status = api_for(&base_url).submit("p-1", &record.to_payload()).unwrap();
    assert_eq!(status, 201);

    let requests = server.join().unwrap();
    let request = &requests[0];
    assert_eq!(
        request.request_line,
        "POST /api/v1/patient-physique/p-1 HTTP/1.1"
    );
    assert_eq!(request.header("content-type"), Some("application/json"));

    let body: Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body, record.to_payload());
}

#[test]
fn test_submit_rejected_status() {
    let (base_url, server) = serve(vec![
        ("400 Bad Request", "{\"message\":\"invalid\"}".into()),
        ("202 Accepted", "{}".into()),
    ]);
    let api = api_for(&base_url);
    let payload = PhysiqueRecord::blank().to_payload();

    assert!(matches!(
        api.submit("p-1", &payload),
        Err(ApiError::Status { status: 400, .. })
    ));
    assert!(matches!(
        api.submit("p-1", &payload),
        Err(ApiError::Status { status: 202, .. })
    ));
    server.join().unwrap();
}

#[test]
fn test_connection_refused_is_no_response() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = api_for(&base_url)
        .submit("p-1", &PhysiqueRecord::blank().to_payload())
        .unwrap_err();
    assert!(matches!(err, ApiError::NoResponse(_)), "got {:?}", err);
}

#[test]
fn test_timeout_is_no_response() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    thread::spawn(move || {
        if let Ok((stream, _)) = listener.accept() {
            thread::sleep(Duration::from_secs(2));
            drop(stream);
        }
    });

    let config = FormConfig {
        base_url,
        request_timeout_ms: Some(200),
        ..FormConfig::default()
    };
    let err = HttpPhysiqueApi::new(config).unwrap().fetch("p-1").unwrap_err();
    assert!(matches!(err, ApiError::NoResponse(_)), "got {:?}", err);
}

#[test]
fn test_controller_over_http() {
    let stored = json!({ "height": "160", "weight": "64", "bmi": "25.00" }).to_string();
    let (base_url, server) = serve(vec![("200 OK", stored), ("200 OK", "{}".into())]);
    let config = FormConfig {
        base_url: base_url.clone(),
        ..FormConfig::default()
    };
    let api = HttpPhysiqueApi::new(config.clone()).unwrap();
    let mut form = FormController::new("p-7", config, api);

    form.load().unwrap();
    assert_eq!(form.record().get(PhysiqueField::Bmi), Some("25.00"));

    form.change(PhysiqueField::BloodPressure, "120/80");
    form.change(PhysiqueField::HeartRate, "75");
    form.change(PhysiqueField::Complaint, "Routine check");
    form.change(PhysiqueField::DistanceVisionExamination, "20/20");
    form.change(PhysiqueField::DistanceVisionExaminationWithGlasses, "20/20");
    form.change(PhysiqueField::NearVisionExamination, "J1");
    form.change(PhysiqueField::BloodExamination, "Normal");

    let outcome = form.submit().unwrap();
    assert_eq!(outcome.status, 200);
    assert_eq!(outcome.navigation.route, "/dashboard/form-mcu2/p-7");
    assert_eq!(form.phase(), &FormPhase::Succeeded);

    let requests = server.join().unwrap();
    assert_eq!(requests.len(), 2);
    let body: Value = serde_json::from_str(&requests[1].body).unwrap();
    assert_eq!(body["height"], json!("160"));
    assert_eq!(body["bloodExamination"], json!("Normal"));
}
