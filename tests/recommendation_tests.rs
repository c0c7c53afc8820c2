// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cell::Cell;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use moneytrail::config::AdvisorConfig;
use moneytrail::error::FinanceError;
use moneytrail::recommendation::*;
use rust_decimal::Decimal;

struct CannedAdvisor {
    reply: Result<String, FinanceError>,
    calls: Cell<usize>,
}

impl BudgetAdvisor for CannedAdvisor {
    fn generate_recommendations(
        &self,
        _request: &RecommendationRequest,
    ) -> Result<String, FinanceError> {
        self.calls.set(self.calls.get() + 1);
        self.reply.clone()
    }
}

fn canned(reply: Result<String, FinanceError>) -> CannedAdvisor {
    CannedAdvisor {
        reply,
        calls: Cell::new(0),
    }
}

/// Accepts one HTTP request, answers with `status` and `body`, and hands back
/// the request body it received.
fn serve_once(status: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/recommend", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let header_end = loop {
            let n = stream.read(&mut chunk).unwrap();
            assert!(n > 0, "client closed before sending headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };
        let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
        let len: usize = headers
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .map(|v| v.trim().parse().unwrap())
            .unwrap_or(0);
        while buf.len() < header_end + len {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        let reply = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(reply.as_bytes()).unwrap();
        String::from_utf8_lossy(&buf[header_end..]).to_string()
    });
    (url, handle)
}

fn advisor_for(url: String, timeout: Duration) -> HttpAdvisor {
    HttpAdvisor::from_config(&AdvisorConfig {
        url: Some(url),
        api_key: Some("secret".into()),
        timeout,
    })
    .unwrap()
}

#[test]
fn no_income_and_no_expenses_is_insufficient() {
    assert_eq!(
        build_recommendation_request(Decimal::ZERO, vec![]),
        Err(FinanceError::InsufficientData)
    );
}

#[test]
fn expenses_alone_are_enough() {
    let req =
        build_recommendation_request(Decimal::ZERO, vec![("Food".into(), Decimal::from(50))])
            .unwrap();
    assert_eq!(req.total_income, Decimal::ZERO);
    assert_eq!(
        req.expenses,
        vec![ExpenseLine {
            category: "Food".into(),
            amount: Decimal::from(50),
        }]
    );
}

#[test]
fn income_alone_is_enough() {
    let req = build_recommendation_request(Decimal::from(2000), vec![]).unwrap();
    assert!(req.expenses.is_empty());
}

#[test]
fn invalid_amounts_are_rejected() {
    assert!(matches!(
        build_recommendation_request(Decimal::from(-1), vec![]),
        Err(FinanceError::Validation { field: "total_income", .. })
    ));
    assert!(matches!(
        build_recommendation_request(Decimal::from(10), vec![("Food".into(), Decimal::ZERO)]),
        Err(FinanceError::Validation { field: "amount", .. })
    ));
}

#[test]
fn payload_uses_numbers_and_camel_case() {
    let req = build_recommendation_request(
        Decimal::from(3000),
        vec![("Food".into(), "420.5".parse().unwrap())],
    )
    .unwrap();
    let v = serde_json::to_value(&req).unwrap();
    assert_eq!(v["totalIncome"].as_f64(), Some(3000.0));
    assert_eq!(v["expenses"][0]["category"], "Food");
    assert_eq!(v["expenses"][0]["amount"].as_f64(), Some(420.5));
}

#[test]
fn advisor_text_is_returned_verbatim_with_one_call() {
    let advisor = canned(Ok("  Spend less on *food*.\n".into()));
    let req = build_recommendation_request(Decimal::from(100), vec![]).unwrap();
    let text = request_budget_recommendation(&advisor, &req).unwrap();
    assert_eq!(text, "  Spend less on *food*.\n");
    assert_eq!(advisor.calls.get(), 1);
}

#[test]
fn any_advisor_failure_becomes_unavailable() {
    let req = build_recommendation_request(Decimal::from(100), vec![]).unwrap();

    let advisor = canned(Err(FinanceError::RecommendationUnavailable("quota".into())));
    assert_eq!(
        request_budget_recommendation(&advisor, &req),
        Err(FinanceError::RecommendationUnavailable("quota".into()))
    );
    assert_eq!(advisor.calls.get(), 1);

    let advisor = canned(Err(FinanceError::InsufficientData));
    assert!(matches!(
        request_budget_recommendation(&advisor, &req),
        Err(FinanceError::RecommendationUnavailable(_))
    ));
}

#[test]
fn http_advisor_posts_payload_and_reads_text() {
    let (url, server) = serve_once("200 OK", r#"{"recommendationText":"Save 20% of income."}"#);
    let advisor = advisor_for(url, Duration::from_secs(5));
    let req = build_recommendation_request(
        Decimal::from(1000),
        vec![("Food".into(), Decimal::from(50))],
    )
    .unwrap();
    let text = request_budget_recommendation(&advisor, &req).unwrap();
    assert_eq!(text, "Save 20% of income.");

    let sent: serde_json::Value = serde_json::from_str(&server.join().unwrap()).unwrap();
    assert_eq!(sent["totalIncome"].as_f64(), Some(1000.0));
    assert_eq!(sent["expenses"][0]["category"], "Food");
}

#[test]
fn http_error_status_is_unavailable() {
    let (url, server) = serve_once("503 Service Unavailable", r#"{"error":"busy"}"#);
    let advisor = advisor_for(url, Duration::from_secs(5));
    let req = build_recommendation_request(Decimal::from(1), vec![]).unwrap();
    assert!(matches!(
        request_budget_recommendation(&advisor, &req),
        Err(FinanceError::RecommendationUnavailable(_))
    ));
    server.join().unwrap();
}

#[test]
fn malformed_body_is_unavailable() {
    let (url, server) = serve_once("200 OK", r#"{"text":"wrong field"}"#);
    let advisor = advisor_for(url, Duration::from_secs(5));
    let req = build_recommendation_request(Decimal::from(1), vec![]).unwrap();
    assert!(matches!(
        request_budget_recommendation(&advisor, &req),
        Err(FinanceError::RecommendationUnavailable(_))
    ));
    server.join().unwrap();
}

#[test]
fn unreachable_endpoint_is_unavailable() {
    let port = {
        let l = TcpListener::bind("127.0.0.1:0").unwrap();
        l.local_addr().unwrap().port()
    };
    let advisor = advisor_for(format!("http://127.0.0.1:{}/", port), Duration::from_secs(2));
    let req = build_recommendation_request(Decimal::from(1), vec![]).unwrap();
    assert!(matches!(
        request_budget_recommendation(&advisor, &req),
        Err(FinanceError::RecommendationUnavailable(_))
    ));
}

#[test]
fn silent_endpoint_times_out() {
    // accepted by the kernel backlog, never answered
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    let advisor = advisor_for(url, Duration::from_millis(300));
    let req = build_recommendation_request(Decimal::from(1), vec![]).unwrap();
    assert!(matches!(
        request_budget_recommendation(&advisor, &req),
        Err(FinanceError::RecommendationUnavailable(_))
    ));
    drop(listener);
}

#[test]
fn missing_endpoint_is_reported() {
    let err = HttpAdvisor::from_config(&AdvisorConfig {
        url: None,
        api_key: None,
        timeout: Duration::from_secs(1),
    })
    .err()
    .unwrap();
    assert!(matches!(err, FinanceError::RecommendationUnavailable(_)));
}
