//! Verify request building and response parsing against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Comparing parsed JSON (not raw strings) avoids false negatives from
//! field-ordering differences in response bodies.

use console_core::{ApiClient, ApiError, HttpMethod, HttpResponse, RequestConfig, RequestOptions};
use serde_json::Value;

fn pairs(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .map(|arr| {
            arr.iter()
                .map(|h| {
                    let h = h.as_array().unwrap();
                    (h[0].as_str().unwrap().to_string(), h[1].as_str().unwrap().to_string())
                })
                .collect()
        })
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Request building
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/request.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let config = RequestConfig::new(
            case["config"]["base_url"].as_str().unwrap(),
            case["config"]["token"].as_str().map(str::to_string),
        );
        let client = ApiClient::new(config);

        let opts = &case["options"];
        let mut options = RequestOptions::new();
        if let Some(method) = opts["method"].as_str() {
            options = options.method(method.parse::<HttpMethod>().unwrap());
        }
        for (k, v) in pairs(&opts["headers"]) {
            options = options.header(k, v);
        }
        if let Some(body) = opts["body"].as_str() {
            options = options.body(body);
        }

        let req = client.build_request(case["path"].as_str().unwrap(), options);
        let expected = &case["expected_request"];
        assert_eq!(req.method.as_str(), expected["method"].as_str().unwrap(), "{name}: method");
        assert_eq!(req.url, expected["url"].as_str().unwrap(), "{name}: url");
        assert_eq!(req.headers, pairs(&expected["headers"]), "{name}: headers");
        assert_eq!(req.body.as_deref(), expected["body"].as_str(), "{name}: body");
    }
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/response.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let client = ApiClient::new(RequestConfig::default());
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let sim = &case["simulated_response"];
        let response = HttpResponse::new(
            sim["status"].as_u64().unwrap() as u16,
            sim["body"].as_str().unwrap(),
        );
        let result = client.parse_response(response);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            match expected_error["kind"].as_str().unwrap() {
                "Status" => {
                    let status = expected_error["status"].as_u64().unwrap() as u16;
                    assert!(
                        matches!(err, ApiError::Status { status: s } if s == status),
                        "{name}: expected Status({status}), got {err:?}"
                    );
                    assert_eq!(
                        err.to_string(),
                        expected_error["message"].as_str().unwrap(),
                        "{name}: message"
                    );
                }
                "Parse" => assert!(matches!(err, ApiError::Parse(_)), "{name}: expected Parse"),
                other => panic!("{name}: unknown expected_error kind: {other}"),
            }
        } else {
            let value = result.unwrap();
            assert_eq!(value, case["expected_result"], "{name}: parsed result");
        }
    }
}
