use pitchsight_application::config::{Config, PitchLogConfig};
use pitchsight_application::prediction;
use pitchsight_domain::repositories::pitch_log::PitchLogRepository;
use pitchsight_domain::value_objects::game_state::GameState;
use pitchsight_domain::value_objects::pitch_record::PitchRecord;
use pitchsight_domain::value_objects::prediction::PredictionResult;
use pitchsight_infrastructure::inference::InferenceHttpClient;
use pitchsight_infrastructure::pitch_log::HttpPitchLog;
use std::sync::Arc;

pub enum TaskEvent {
    Input(crossterm::event::Event),
    /// Carries the submission sequence number so the orchestrator can drop
    /// responses that were overtaken by a newer submission.
    PredictionFinished {
        seq: u64,
        result: Result<PredictionResult, String>,
    },
    HistoryLoaded(Result<Vec<PitchRecord>, String>),
    PitchSaved(Result<PitchRecord, String>),
    PitchMutated {
        id: u64,
        result: Result<(), String>,
    },
}

#[derive(Clone)]
pub struct TaskRunner {
    tx: tokio::sync::mpsc::UnboundedSender<TaskEvent>,
}

impl TaskRunner {
    pub fn new(tx: tokio::sync::mpsc::UnboundedSender<TaskEvent>) -> Self {
        Self { tx }
    }

    pub fn start_prediction(&self, config: Arc<Config>, state: GameState, seq: u64) {
        let tx = self.tx.clone();
        tokio::task::spawn_blocking(move || {
            let result = run_prediction(&config, &state);
            let _ = tx.send(TaskEvent::PredictionFinished { seq, result });
        });
    }

    pub fn load_history(&self, config: PitchLogConfig) {
        let tx = self.tx.clone();
        tokio::task::spawn_blocking(move || {
            let result = build_pitch_log(&config).and_then(|log| log.list());
            let _ = tx.send(TaskEvent::HistoryLoaded(result));
        });
    }

    pub fn save_pitch(&self, config: PitchLogConfig, state: GameState) {
        let tx = self.tx.clone();
        tokio::task::spawn_blocking(move || {
            let result = build_pitch_log(&config).and_then(|log| log.add(&state));
            let _ = tx.send(TaskEvent::PitchSaved(result));
        });
    }

    pub fn update_pitch(&self, config: PitchLogConfig, id: u64, state: GameState) {
        let tx = self.tx.clone();
        tokio::task::spawn_blocking(move || {
            let result = build_pitch_log(&config).and_then(|log| log.update(id, &state));
            let _ = tx.send(TaskEvent::PitchMutated { id, result });
        });
    }

    pub fn delete_pitch(&self, config: PitchLogConfig, id: u64) {
        let tx = self.tx.clone();
        tokio::task::spawn_blocking(move || {
            let result = build_pitch_log(&config).and_then(|log| log.delete(id));
            let _ = tx.send(TaskEvent::PitchMutated { id, result });
        });
    }
}

pub fn build_inference_client(config: &Config) -> Result<InferenceHttpClient, String> {
    InferenceHttpClient::new(
        config.service.base_url.clone(),
        config.service.timeout_ms,
        config.service.retries,
    )
    .map_err(|err| {
        format!(
            "failed to init inference client (url={}): {err}",
            config.service.base_url
        )
    })
}

fn build_pitch_log(config: &PitchLogConfig) -> Result<HttpPitchLog, String> {
    HttpPitchLog::new(config.base_url.clone(), config.timeout_ms).map_err(|err| {
        format!(
            "failed to init pitch log client (url={}): {err}",
            config.base_url
        )
    })
}

fn run_prediction(config: &Config, state: &GameState) -> Result<PredictionResult, String> {
    let client = build_inference_client(config)?;
    prediction::predict(&client, state).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::{TaskEvent, TaskRunner};
    use pitchsight_application::config::{Config, ServiceConfig};
    use pitchsight_domain::value_objects::game_state::GameState;
    use std::sync::Arc;

    fn unreachable_config() -> Arc<Config> {
        Arc::new(Config {
            service: ServiceConfig {
                base_url: "http://127.0.0.1:9".to_string(),
                timeout_ms: 200,
                retries: 0,
            },
            pitch_log: None,
        })
    }

    #[tokio::test]
    async fn prediction_failure_comes_back_with_its_sequence_number() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let runner = TaskRunner::new(tx);
        runner.start_prediction(unreachable_config(), GameState::default(), 7);

        let event = rx.recv().await.expect("event");
        match event {
            TaskEvent::PredictionFinished { seq, result } => {
                assert_eq!(seq, 7);
                assert!(result.is_err());
            }
            _ => panic!("expected PredictionFinished"),
        }
    }
}
