use pitchsight_domain::repositories::inference::{InferenceClient, InferenceError};
use pitchsight_domain::value_objects::prediction::{
    PitchTypeResult, ZoneResult, PITCH_TYPE_COUNT, ZONE_COUNT,
};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Serialize;
use std::time::{Duration, Instant};

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    features: &'a [f64],
}

pub struct InferenceHttpClient {
    pub base_url: String,
    pub timeout_ms: u64,
    pub retries: u32,
    client: Client,
}

impl InferenceHttpClient {
    pub fn new(base_url: String, timeout_ms: u64, retries: u32) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|err| format!("failed to build http client: {err}"))?;
        Ok(Self {
            base_url,
            timeout_ms,
            retries,
            client,
        })
    }

    /// One endpoint call. Server errors and transport failures are retried
    /// up to `retries` times; client errors and malformed bodies fail
    /// immediately.
    fn call(
        &self,
        endpoint: &'static str,
        predicted_key: &'static str,
        features: &[f64],
        expected_len: usize,
    ) -> Result<(Option<usize>, Vec<f64>), InferenceError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint);
        let span = tracing::info_span!(
            "infra.inference.call",
            endpoint,
            base_url = %self.base_url,
            timeout_ms = self.timeout_ms,
            retries = self.retries
        );
        let _enter = span.enter();

        let start = Instant::now();
        let mut attempts = 0u32;
        let request = PredictRequest { features };

        let outcome = loop {
            attempts += 1;
            if attempts > 1 {
                metrics::counter!("pitchsight.infra.inference.retries_total", "endpoint" => endpoint)
                    .increment(1);
                tracing::debug!(attempt = attempts, "retrying inference request");
            }
            metrics::counter!("pitchsight.infra.inference.requests_total", "endpoint" => endpoint)
                .increment(1);

            match self.client.post(&url).json(&request).send() {
                Ok(resp) => {
                    let status = resp.status();
                    if status == StatusCode::OK {
                        break match resp.json::<serde_json::Value>() {
                            Ok(body) => decode_response(&body, predicted_key, expected_len),
                            Err(err) => Err(InferenceError::MalformedResponse(format!(
                                "failed to parse body: {err}"
                            ))),
                        };
                    }
                    if status.is_server_error() && attempts <= self.retries {
                        continue;
                    }
                    break Err(InferenceError::HttpStatus(status.as_u16()));
                }
                Err(err) => {
                    if attempts <= self.retries {
                        continue;
                    }
                    break Err(InferenceError::Transport(err.to_string()));
                }
            }
        };

        let duration_ms = start.elapsed().as_millis() as f64;
        match &outcome {
            Ok(_) => {
                metrics::histogram!(
                    "pitchsight.infra.inference.call_ms",
                    "endpoint" => endpoint,
                    "result" => "ok"
                )
                .record(duration_ms);
            }
            Err(err) => {
                let kind = match err {
                    InferenceError::Transport(_) => "transport",
                    InferenceError::HttpStatus(_) => "http_status",
                    InferenceError::MalformedResponse(_) => "decode",
                };
                metrics::counter!(
                    "pitchsight.infra.inference.errors_total",
                    "endpoint" => endpoint,
                    "kind" => kind
                )
                .increment(1);
                metrics::histogram!(
                    "pitchsight.infra.inference.call_ms",
                    "endpoint" => endpoint,
                    "result" => "err"
                )
                .record(duration_ms);
                tracing::warn!(attempts, error = %err, "inference request failed");
            }
        }
        outcome
    }
}

/// Decodes one prediction body. Both keys are required; the endpoint's own
/// prediction key must be present even when its value is null, so a body
/// missing it (or carrying the other endpoint's key instead) is malformed.
fn decode_response(
    body: &serde_json::Value,
    predicted_key: &'static str,
    expected_len: usize,
) -> Result<(Option<usize>, Vec<f64>), InferenceError> {
    let probabilities = body
        .get("probabilities")
        .and_then(|v| v.as_array())
        .ok_or_else(|| {
            InferenceError::MalformedResponse("missing probabilities array".to_string())
        })?
        .iter()
        .map(|v| {
            v.as_f64().ok_or_else(|| {
                InferenceError::MalformedResponse(format!("non-numeric probability: {v}"))
            })
        })
        .collect::<Result<Vec<f64>, InferenceError>>()?;
    if probabilities.len() != expected_len {
        return Err(InferenceError::MalformedResponse(format!(
            "expected {} probabilities, got {}",
            expected_len,
            probabilities.len()
        )));
    }

    let predicted_value = body.get(predicted_key).ok_or_else(|| {
        InferenceError::MalformedResponse(format!("missing key: {predicted_key}"))
    })?;
    let predicted = if predicted_value.is_null() {
        None
    } else {
        let raw = predicted_value.as_i64().ok_or_else(|| {
            InferenceError::MalformedResponse(format!(
                "non-integer {predicted_key}: {predicted_value}"
            ))
        })?;
        let idx = usize::try_from(raw).map_err(|_| {
            InferenceError::MalformedResponse(format!("negative predicted index: {raw}"))
        })?;
        if idx >= expected_len {
            return Err(InferenceError::MalformedResponse(format!(
                "predicted index {idx} out of range 0..{expected_len}"
            )));
        }
        Some(idx)
    };
    Ok((predicted, probabilities))
}

impl InferenceClient for InferenceHttpClient {
    fn predict_zone(&self, features: &[f64]) -> Result<ZoneResult, InferenceError> {
        let (predicted_zone, probabilities) =
            self.call("predict_zone", "predicted_zone", features, ZONE_COUNT)?;
        Ok(ZoneResult {
            predicted_zone,
            probabilities,
        })
    }

    fn predict_pitch_type(&self, features: &[f64]) -> Result<PitchTypeResult, InferenceError> {
        let (predicted_type, probabilities) = self.call(
            "predict_pitch_type",
            "predicted_pitch_type",
            features,
            PITCH_TYPE_COUNT,
        )?;
        Ok(PitchTypeResult {
            predicted_type,
            probabilities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::InferenceHttpClient;
    use pitchsight_domain::repositories::inference::{InferenceClient, InferenceError};
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    fn http_response(status: u16, reason: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    fn try_spawn_server(responses: Vec<String>) -> Option<String> {
        let listener = TcpListener::bind("127.0.0.1:0").ok()?;
        let addr = listener.local_addr().ok()?;

        thread::spawn(move || {
            for response in responses {
                let (mut stream, _) = listener.accept().expect("accept");
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                stream
                    .write_all(response.as_bytes())
                    .expect("write response");
            }
        });

        Some(format!("http://{}", addr))
    }

    fn zone_body(predicted: i64) -> String {
        let mut probs = vec![0.05; 13];
        probs[predicted as usize] = 0.4;
        format!(
            "{{\"predicted_zone\":{},\"probabilities\":{}}}",
            predicted,
            serde_json::to_string(&probs).unwrap()
        )
    }

    const FEATURES: [f64; 7] = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0];

    #[test]
    fn predict_zone_parses_a_good_response() {
        let Some(base_url) = try_spawn_server(vec![http_response(200, "OK", &zone_body(4))])
        else {
            eprintln!("skipping: cannot bind local test server");
            return;
        };
        let client = InferenceHttpClient::new(base_url, 1000, 0).expect("client");
        let zone = client.predict_zone(&FEATURES).expect("zone");
        assert_eq!(zone.predicted_zone, Some(4));
        assert_eq!(zone.probabilities.len(), 13);
    }

    #[test]
    fn retries_on_server_error_then_succeeds() {
        let Some(base_url) = try_spawn_server(vec![
            http_response(500, "Internal Server Error", "oops"),
            http_response(200, "OK", &zone_body(2)),
        ]) else {
            eprintln!("skipping: cannot bind local test server");
            return;
        };
        let client = InferenceHttpClient::new(base_url, 1000, 3).expect("client");
        let zone = client.predict_zone(&FEATURES).expect("zone after retry");
        assert_eq!(zone.predicted_zone, Some(2));
    }

    #[test]
    fn does_not_retry_on_client_error() {
        let Some(base_url) =
            try_spawn_server(vec![http_response(400, "Bad Request", "nope")])
        else {
            eprintln!("skipping: cannot bind local test server");
            return;
        };
        let client = InferenceHttpClient::new(base_url, 1000, 3).expect("client");
        let err = client.predict_zone(&FEATURES).expect_err("must fail");
        assert_eq!(err, InferenceError::HttpStatus(400));
    }

    #[test]
    fn wrong_length_probability_vector_is_malformed() {
        let body = "{\"predicted_zone\":0,\"probabilities\":[0.5,0.5]}";
        let Some(base_url) = try_spawn_server(vec![http_response(200, "OK", body)]) else {
            eprintln!("skipping: cannot bind local test server");
            return;
        };
        let client = InferenceHttpClient::new(base_url, 1000, 0).expect("client");
        let err = client.predict_zone(&FEATURES).expect_err("must fail");
        assert!(matches!(err, InferenceError::MalformedResponse(_)));
    }

    #[test]
    fn null_prediction_is_accepted() {
        let probs = serde_json::to_string(&vec![0.05; 14]).unwrap();
        let body = format!("{{\"predicted_pitch_type\":null,\"probabilities\":{probs}}}");
        let Some(base_url) = try_spawn_server(vec![http_response(200, "OK", &body)]) else {
            eprintln!("skipping: cannot bind local test server");
            return;
        };
        let client = InferenceHttpClient::new(base_url, 1000, 0).expect("client");
        let pitch = client.predict_pitch_type(&FEATURES).expect("pitch");
        assert_eq!(pitch.predicted_type, None);
        assert_eq!(pitch.probabilities.len(), 14);
    }

    #[test]
    fn missing_predicted_key_is_malformed() {
        let probs = serde_json::to_string(&vec![0.05; 13]).unwrap();
        let body = format!("{{\"probabilities\":{probs}}}");
        let Some(base_url) = try_spawn_server(vec![http_response(200, "OK", &body)]) else {
            eprintln!("skipping: cannot bind local test server");
            return;
        };
        let client = InferenceHttpClient::new(base_url, 1000, 0).expect("client");
        let err = client.predict_zone(&FEATURES).expect_err("must fail");
        assert!(matches!(err, InferenceError::MalformedResponse(_)));
    }

    #[test]
    fn wrong_endpoint_key_is_malformed() {
        let probs = serde_json::to_string(&vec![0.05; 13]).unwrap();
        let body = format!("{{\"predicted_pitch_type\":4,\"probabilities\":{probs}}}");
        let Some(base_url) = try_spawn_server(vec![http_response(200, "OK", &body)]) else {
            eprintln!("skipping: cannot bind local test server");
            return;
        };
        let client = InferenceHttpClient::new(base_url, 1000, 0).expect("client");
        let err = client.predict_zone(&FEATURES).expect_err("must fail");
        assert!(matches!(err, InferenceError::MalformedResponse(_)));
    }

    #[test]
    fn out_of_range_predicted_index_is_malformed() {
        let probs = serde_json::to_string(&vec![0.05; 13]).unwrap();
        let body = format!("{{\"predicted_zone\":13,\"probabilities\":{probs}}}");
        let Some(base_url) = try_spawn_server(vec![http_response(200, "OK", &body)]) else {
            eprintln!("skipping: cannot bind local test server");
            return;
        };
        let client = InferenceHttpClient::new(base_url, 1000, 0).expect("client");
        let err = client.predict_zone(&FEATURES).expect_err("must fail");
        assert!(matches!(err, InferenceError::MalformedResponse(_)));
    }
}
