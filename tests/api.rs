use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use practical_grader::grading::ClassifyOptions;
use practical_grader::handlers::router;
use practical_grader::state::AppState;

fn server() -> TestServer {
  TestServer::new(router(AppState::default())).unwrap()
}

fn sequence_problem() -> Value {
  json!({
    "problem_number": 4,
    "question_text": "순서대로 나열하시오.",
    "examples": "ㄱ. 구현\nㄴ. 분석\nㄷ. 설계",
    "input_type": "sequence",
    "correct_answer": "ㄴ-ㄷ-ㄱ"
  })
}

fn multi_blank_problem() -> Value {
  json!({
    "problem_number": 7,
    "question_text": "빈칸에 들어갈 함수를 쓰시오.",
    "input_type": "multi_blank",
    "input_labels": ["(가)", "(나)"],
    "correct_answer": "가: AVG, 나: COUNT"
  })
}

#[tokio::test]
async fn test_health() {
  let response = server().get("/health").await;
  response.assert_status_ok();
  assert_eq!(response.json::<Value>()["status"], "ok");
}

#[tokio::test]
async fn test_shape_endpoint() {
  let response = server().post("/api/practical/shape").json(&sequence_problem()).await;
  response.assert_status_ok();
  let body = response.json::<Value>();
  assert_eq!(body["shape"], "ordered_sequence");
  assert_eq!(body["slot_count"], 3);
  assert_eq!(body["symbol_kind"], "korean_jamo");
}

#[tokio::test]
async fn test_shape_endpoint_multi_blank_labels() {
  let response = server().post("/api/practical/shape").json(&multi_blank_problem()).await;
  response.assert_status_ok();
  let body = response.json::<Value>();
  assert_eq!(body["shape"], "multi_blank");
  assert_eq!(body["labels"], json!(["가", "나"]));
}

#[tokio::test]
async fn test_grade_endpoint() {
  let server = server();

  let accepted = server
    .post("/api/practical/grade")
    .json(&json!({ "problem": sequence_problem(), "answer": "ㄴ, ㄷ, ㄱ" }))
    .await;
  accepted.assert_status_ok();
  assert_eq!(accepted.json::<Value>()["correct"], true);

  let rejected = server
    .post("/api/practical/grade")
    .json(&json!({ "problem": sequence_problem(), "answer": "ㄱ-ㄴ-ㄷ" }))
    .await;
  rejected.assert_status_ok();
  assert_eq!(rejected.json::<Value>()["correct"], false);
}

#[tokio::test]
async fn test_grade_empty_answer_rejected() {
  let response = server()
    .post("/api/practical/grade")
    .json(&json!({ "problem": multi_blank_problem() }))
    .await;
  response.assert_status_ok();
  assert_eq!(response.json::<Value>()["correct"], false);
}

#[tokio::test]
async fn test_grade_named_pairs_follow_config() {
  let problem = json!({
    "question_text": "차수와 카디널리티를 쓰시오.",
    "correct_answer": "차수 3, 카디널리티 4"
  });
  let body = json!({ "problem": problem, "answer": "차수: 3 / 카디널리티: 4" });

  let legacy = server().post("/api/practical/grade").json(&body).await;
  assert_eq!(legacy.json::<Value>()["correct"], true);

  let strict = TestServer::new(router(AppState::new(ClassifyOptions { legacy_inference: false }))).unwrap();
  let response = strict.post("/api/practical/grade").json(&body).await;
  assert_eq!(response.json::<Value>()["correct"], false);
}

#[tokio::test]
async fn test_draft_encode_then_grade() {
  let server = server();

  let encoded = server
    .post("/api/practical/draft/encode")
    .json(&json!({ "problem": multi_blank_problem(), "slots": ["AVG", "COUNT"] }))
    .await;
  encoded.assert_status_ok();
  let answer = encoded.json::<Value>()["answer"].as_str().unwrap().to_string();
  assert_eq!(answer, "가: AVG / 나: COUNT");

  let graded = server
    .post("/api/practical/grade")
    .json(&json!({ "problem": multi_blank_problem(), "answer": answer }))
    .await;
  assert_eq!(graded.json::<Value>()["correct"], true);
}

#[tokio::test]
async fn test_draft_decode() {
  let response = server()
    .post("/api/practical/draft/decode")
    .json(&json!({ "problem": sequence_problem(), "answer": "ㄴ-ㄷ" }))
    .await;
  response.assert_status_ok();
  let body = response.json::<Value>();
  assert_eq!(body["slots"], json!(["ㄴ", "ㄷ", ""]));
  assert_eq!(body["labels"], json!([]));
}

#[tokio::test]
async fn test_draft_single_shape_is_bad_request() {
  let problem = json!({ "input_type": "single", "correct_answer": "HTTP" });
  let response = server()
    .post("/api/practical/draft/encode")
    .json(&json!({ "problem": problem, "slots": ["HTTP"] }))
    .await;
  response.assert_status(StatusCode::BAD_REQUEST);
  assert!(response.json::<Value>()["error"].is_string());
}

#[tokio::test]
async fn test_audit_endpoint() {
  let problems = json!([
    sequence_problem(),
    { "problem_number": 8, "question_text": "프로토콜은?", "correct_answer": "" },
    {
      "problem_number": 9,
      "question_text": "프로토콜은?",
      "input_type": "single",
      "answer_format_hint": "예: HTTP",
      "correct_answer": "HTTP"
    }
  ]);
  let response = server().post("/api/practical/audit").json(&problems).await;
  response.assert_status_ok();

  let body = response.json::<Value>();
  let kinds: Vec<&str> = body["findings"]
    .as_array()
    .unwrap()
    .iter()
    .map(|f| f["kind"].as_str().unwrap())
    .collect();
  assert!(kinds.contains(&"missing_input_type"));
  assert!(kinds.contains(&"missing_answer"));
  assert!(kinds.contains(&"hint_leaks_answer"));
  assert!(kinds.contains(&"duplicate_input_type_mismatch"));
  assert!(!kinds.contains(&"matcher_fail"));
}

#[tokio::test]
async fn test_malformed_body_rejected() {
  let response = server()
    .post("/api/practical/grade")
    .json(&json!({ "answer": "HTTP" }))
    .expect_failure()
    .await;
  assert!(response.status_code().is_client_error());
}
