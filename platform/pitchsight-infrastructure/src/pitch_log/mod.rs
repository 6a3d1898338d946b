use pitchsight_domain::repositories::pitch_log::PitchLogRepository;
use pitchsight_domain::value_objects::game_state::GameState;
use pitchsight_domain::value_objects::pitch_record::PitchRecord;
use reqwest::blocking::Client;
use reqwest::Method;
use std::time::Duration;

const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// HTTP adapter for the pitch-log service.
pub struct HttpPitchLog {
    base_url: String,
    client: Client,
}

impl HttpPitchLog {
    pub fn new(base_url: String, timeout_ms: Option<u64>) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS)))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|err| format!("failed to build http client: {err}"))?;
        Ok(Self { base_url, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&GameState>,
    ) -> Result<reqwest::blocking::Response, String> {
        let url = self.url(path);
        let mut request = self.client.request(method.clone(), &url);
        if let Some(state) = body {
            request = request.json(state);
        }
        let resp = request
            .send()
            .map_err(|err| format!("pitch log request failed ({method} {url}): {err}"))?;
        let status = resp.status();
        if !status.is_success() {
            metrics::counter!("pitchsight.infra.pitch_log.errors_total").increment(1);
            return Err(format!("pitch log http error ({method} {url}): status {status}"));
        }
        Ok(resp)
    }
}

impl PitchLogRepository for HttpPitchLog {
    fn list(&self) -> Result<Vec<PitchRecord>, String> {
        let resp = self.send(Method::GET, "pitches", None)?;
        resp.json::<Vec<PitchRecord>>()
            .map_err(|err| format!("failed to parse pitch list: {err}"))
    }

    fn add(&self, state: &GameState) -> Result<PitchRecord, String> {
        let resp = self.send(Method::POST, "add_pitch", Some(state))?;
        let record = resp
            .json::<PitchRecord>()
            .map_err(|err| format!("failed to parse saved pitch: {err}"))?;
        tracing::info!(id = record.id, "pitch recorded");
        Ok(record)
    }

    fn update(&self, id: u64, state: &GameState) -> Result<(), String> {
        self.send(Method::PATCH, &format!("update_pitch/{id}"), Some(state))?;
        tracing::info!(id, "pitch updated");
        Ok(())
    }

    fn delete(&self, id: u64) -> Result<(), String> {
        self.send(Method::DELETE, &format!("delete_pitch/{id}"), None)?;
        tracing::info!(id, "pitch deleted");
        Ok(())
    }
}
