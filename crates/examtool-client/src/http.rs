//! HTTP implementation of the exam service API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, COOKIE};
use reqwest::RequestBuilder;
use serde_json::Value;
use tracing::instrument;

use crate::api::{AddQuestionBody, ExamApi, SectionEdit};
use crate::config::ExamtoolConfig;
use crate::error::ClientError;
use crate::payload::QuestionData;

/// Text that only appears on the single sign-on login page.
const LOGIN_MARKER: &str = "Aalto University Login";
/// Body of the service's CSRF rejection.
const CSRF_MARKER: &str = "No CSRF token found in headers";

const XSRF_HEADER: &str = "x-xsrf-token";

/// Exam service client over HTTP. One request at a time, no retries.
pub struct HttpExamClient {
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpExamClient {
    /// Build a client carrying the configured session cookies and XSRF token.
    pub fn new(config: &ExamtoolConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let xsrf = HeaderValue::from_str(&config.xsrf_token())
            .map_err(|e| ClientError::Setup(format!("invalid XSRF token: {e}")))?;
        headers.insert(HeaderName::from_static(XSRF_HEADER), xsrf);

        let cookies = config.cookies();
        if !cookies.is_empty() {
            let cookie_header = cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            let value = HeaderValue::from_str(&cookie_header)
                .map_err(|e| ClientError::Setup(format!("invalid cookie: {e}")))?;
            headers.insert(COOKIE, value);
        }

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs));

        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::https(proxy)
                .map_err(|e| ClientError::Setup(format!("invalid proxy {proxy}: {e}")))?;
            builder = builder.proxy(proxy);
        }
        if config.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| ClientError::Setup(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs,
            client,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Send a request and return the body of a successful response.
    #[instrument(skip(self, request))]
    async fn execute(&self, request: RequestBuilder, endpoint: &str) -> Result<String, ClientError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout(self.timeout_secs)
            } else {
                ClientError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        tracing::debug!(status, bytes = body.len(), "response received");

        check_response(endpoint, status, body)
    }

    async fn execute_json(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<Value, ClientError> {
        let body = self.execute(request, endpoint).await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }

    async fn get(&self, endpoint: &str) -> Result<Value, ClientError> {
        let request = self.client.get(self.url(endpoint));
        self.execute_json(request, endpoint).await
    }

    async fn delete(&self, endpoint: &str) -> Result<(), ClientError> {
        let request = self.client.delete(self.url(endpoint));
        self.execute(request, endpoint).await.map(|_| ())
    }
}

/// Classify a response. Login and CSRF pages are detected before the
/// status, since the service may serve them with a 200.
fn check_response(endpoint: &str, status: u16, body: String) -> Result<String, ClientError> {
    if body.contains(LOGIN_MARKER) {
        return Err(ClientError::LoginRequired {
            endpoint: endpoint.to_string(),
        });
    }
    if body.contains(CSRF_MARKER) {
        return Err(ClientError::Csrf {
            endpoint: endpoint.to_string(),
        });
    }
    if status >= 400 {
        return Err(ClientError::Api {
            status,
            endpoint: endpoint.to_string(),
            body,
        });
    }
    Ok(body)
}

#[async_trait]
impl ExamApi for HttpExamClient {
    async fn get_exams(&self) -> Result<Value, ClientError> {
        self.get("/app/reviewerexams").await
    }

    async fn get_exam(&self, exam_id: u64) -> Result<Value, ClientError> {
        self.get(&format!("/app/exams/{exam_id}")).await
    }

    async fn create_section(&self, exam_id: u64) -> Result<Value, ClientError> {
        let endpoint = format!("/app/exams/{exam_id}/sections");
        let request = self.client.post(self.url(&endpoint));
        self.execute_json(request, &endpoint).await
    }

    async fn edit_section(
        &self,
        exam_id: u64,
        section_id: u64,
        edit: &SectionEdit,
    ) -> Result<Value, ClientError> {
        let endpoint = format!("/app/exams/{exam_id}/sections/{section_id}");
        let request = self.client.put(self.url(&endpoint)).json(edit);
        self.execute_json(request, &endpoint).await
    }

    async fn delete_section(&self, exam_id: u64, section_id: u64) -> Result<(), ClientError> {
        self.delete(&format!("/app/exams/{exam_id}/sections/{section_id}"))
            .await
    }

    async fn add_question(
        &self,
        exam_id: u64,
        section_id: u64,
        sequence_number: u32,
        question_id: u64,
    ) -> Result<Value, ClientError> {
        let endpoint = format!("/app/exams/{exam_id}/sections/{section_id}/questions");
        let body = AddQuestionBody {
            sequence_number,
            questions: question_id.to_string(),
        };
        let request = self.client.post(self.url(&endpoint)).json(&body);
        self.execute_json(request, &endpoint).await
    }

    async fn remove_question(
        &self,
        exam_id: u64,
        section_id: u64,
        question_id: u64,
    ) -> Result<(), ClientError> {
        self.delete(&format!(
            "/app/exams/{exam_id}/sections/{section_id}/questions/{question_id}"
        ))
        .await
    }

    async fn get_questions(&self) -> Result<Value, ClientError> {
        self.get("/app/questions").await
    }

    async fn create_question(&self, data: &QuestionData) -> Result<Value, ClientError> {
        let endpoint = "/app/questions";
        let request = self.client.post(self.url(endpoint)).json(data);
        self.execute_json(request, endpoint).await
    }

    async fn edit_question(
        &self,
        question_id: u64,
        data: &QuestionData,
    ) -> Result<Value, ClientError> {
        let endpoint = format!("/app/questions/{question_id}");
        let request = self.client.put(self.url(&endpoint)).json(data);
        self.execute_json(request, &endpoint).await
    }

    async fn delete_question(&self, question_id: u64) -> Result<(), ClientError> {
        self.delete(&format!("/app/questions/{question_id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{build_question, OptionInput};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HttpExamClient {
        let config = ExamtoolConfig {
            base_url: server.uri(),
            cookie: Some("SESSION=abc; XSRF-TOKEN=tok".into()),
            ..Default::default()
        };
        HttpExamClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn sends_session_headers() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/app/reviewerexams"))
            .and(header("X-XSRF-TOKEN", "tok"))
            .and(header("Cookie", "SESSION=abc; XSRF-TOKEN=tok"))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{"id": 1}])))
            .expect(1)
            .mount(&server)
            .await;

        let exams = client_for(&server).get_exams().await.unwrap();
        assert_eq!(exams[0]["id"], 1);
    }

    #[tokio::test]
    async fn edit_section_body() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/app/exams/3/sections/9"))
            .and(body_json(serde_json::json!({
                "name": "Basics",
                "description": "intro\n",
                "lotteryOn": true,
                "lotteryItemCount": 2
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 9})))
            .expect(1)
            .mount(&server)
            .await;

        let edit = SectionEdit {
            name: "Basics".into(),
            description: "intro\n".into(),
            lottery_on: true,
            lottery_item_count: Some(2),
        };
        let response = client_for(&server).edit_section(3, 9, &edit).await.unwrap();
        assert_eq!(response["id"], 9);
    }

    #[tokio::test]
    async fn add_question_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/app/exams/3/sections/9/questions"))
            .and(body_json(serde_json::json!({"sequenceNumber": 0, "questions": "77"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).add_question(3, 9, 0, 77).await.unwrap();
    }

    #[tokio::test]
    async fn create_question_posts_payload() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/app/questions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 100,
                "options": [{"id": 1}, {"id": 2}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let data = build_question(
            5,
            1,
            "<p>q</p>",
            vec![
                OptionInput {
                    option: "a".into(),
                    correct_option: Some(true),
                    ..Default::default()
                },
                OptionInput {
                    option: "b".into(),
                    ..Default::default()
                },
            ],
            &[],
        )
        .unwrap();
        let response = client_for(&server).create_question(&data).await.unwrap();
        assert_eq!(response["id"], 100);

        let requests = server.received_requests().await.unwrap();
        let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(sent["type"], "MultipleChoiceQuestion");
        assert_eq!(sent["options"][0]["option"], "a");
    }

    #[tokio::test]
    async fn delete_ignores_empty_body() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/app/questions/5"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).delete_question(5).await.unwrap();
    }

    #[tokio::test]
    async fn login_page_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/app/questions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><title>Aalto University Login</title></html>"),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).get_questions().await.unwrap_err();
        assert!(matches!(err, ClientError::LoginRequired { .. }));
        assert!(err.is_session_error());
    }

    #[tokio::test]
    async fn csrf_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/app/exams/1/sections"))
            .respond_with(
                ResponseTemplate::new(403).set_body_string("No CSRF token found in headers"),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).create_section(1).await.unwrap_err();
        assert!(matches!(err, ClientError::Csrf { .. }));
    }

    #[tokio::test]
    async fn error_status_keeps_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/app/exams/404"))
            .respond_with(ResponseTemplate::new(404).set_body_string("sitnet_error_not_found"))
            .mount(&server)
            .await;

        let err = client_for(&server).get_exam(404).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().contains("sitnet_error_not_found"));
    }

    #[tokio::test]
    async fn invalid_json_is_a_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/app/exams/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).get_exam(1).await.unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }));
    }

    #[test]
    fn check_response_order() {
        let login = check_response("/x", 500, LOGIN_MARKER.to_string()).unwrap_err();
        assert!(matches!(login, ClientError::LoginRequired { .. }));
        assert_eq!(check_response("/x", 204, String::new()).unwrap(), "");
    }

    #[test]
    fn rejects_invalid_cookie() {
        let config = ExamtoolConfig {
            cookie: Some("SESSION=line\nbreak".into()),
            ..Default::default()
        };
        assert!(matches!(
            HttpExamClient::new(&config),
            Err(ClientError::Setup(_))
        ));
    }
}
