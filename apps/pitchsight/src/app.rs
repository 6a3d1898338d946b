use crate::logging::LogStore;
use crate::tasks::{TaskEvent, TaskRunner};
use crossterm::event::{Event as CtEvent, KeyCode, KeyEvent, KeyModifiers};
use pitchsight_application::config::Config;
use pitchsight_application::prediction::{self, PredictionView};
use pitchsight_domain::services::validation::{self, FieldErrors, FormField, RawGameForm};
use pitchsight_domain::value_objects::game_state::GameState;
use pitchsight_domain::value_objects::pitch_record::PitchRecord;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Lifecycle of the prediction panel. `Submitting` means a request is in
/// flight for `submit_seq`; anything arriving with an older sequence number
/// is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Editing,
    Submitting,
    Displaying,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewId {
    Predict,
    History,
}

pub struct TextInput {
    pub value: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn new(value: String) -> Self {
        let cursor = value.len();
        Self { value, cursor }
    }

    pub fn insert_char(&mut self, ch: char) {
        self.value.insert(self.cursor, ch);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        self.value.remove(self.cursor);
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.value.len() {
            return;
        }
        self.value.remove(self.cursor);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.len());
    }
}

/// Modal edit form for one game situation. `editing_record` is set when the
/// form was seeded from a saved pitch, in which case submitting also patches
/// that record.
pub struct GameForm {
    pub selected: FormField,
    pub inning: TextInput,
    pub balls: TextInput,
    pub strikes: TextInput,
    pub outs_when_up: TextInput,
    pub batting_score: TextInput,
    pub fielding_score: TextInput,
    pub stand: TextInput,
    pub errors: FieldErrors,
    pub editing_record: Option<u64>,
}

impl GameForm {
    pub fn from_state(state: &GameState) -> Self {
        let raw = RawGameForm::from_state(state);
        Self {
            selected: FormField::Inning,
            inning: TextInput::new(raw.inning),
            balls: TextInput::new(raw.balls),
            strikes: TextInput::new(raw.strikes),
            outs_when_up: TextInput::new(raw.outs_when_up),
            batting_score: TextInput::new(raw.batting_score),
            fielding_score: TextInput::new(raw.fielding_score),
            stand: TextInput::new(raw.stand),
            errors: FieldErrors::new(),
            editing_record: None,
        }
    }

    pub fn raw(&self) -> RawGameForm {
        RawGameForm {
            inning: self.inning.value.clone(),
            balls: self.balls.value.clone(),
            strikes: self.strikes.value.clone(),
            outs_when_up: self.outs_when_up.value.clone(),
            batting_score: self.batting_score.value.clone(),
            fielding_score: self.fielding_score.value.clone(),
            stand: self.stand.value.clone(),
        }
    }

    pub fn input(&self, field: FormField) -> &TextInput {
        match field {
            FormField::Inning => &self.inning,
            FormField::Balls => &self.balls,
            FormField::Strikes => &self.strikes,
            FormField::Outs => &self.outs_when_up,
            FormField::BattingScore => &self.batting_score,
            FormField::FieldingScore => &self.fielding_score,
            FormField::Stand => &self.stand,
        }
    }

    fn selected_input_mut(&mut self) -> &mut TextInput {
        match self.selected {
            FormField::Inning => &mut self.inning,
            FormField::Balls => &mut self.balls,
            FormField::Strikes => &mut self.strikes,
            FormField::Outs => &mut self.outs_when_up,
            FormField::BattingScore => &mut self.batting_score,
            FormField::FieldingScore => &mut self.fielding_score,
            FormField::Stand => &mut self.stand,
        }
    }

    /// Loss-of-focus check for the field being left.
    fn blur_selected(&mut self) {
        let raw = self.raw();
        match validation::validate_field(self.selected, raw.field(self.selected)) {
            Ok(()) => {
                self.errors.remove(&self.selected);
            }
            Err(message) => {
                self.errors.insert(self.selected, message);
            }
        }
    }

    fn select_next(&mut self) {
        self.blur_selected();
        self.selected = self.selected.next();
    }

    fn select_prev(&mut self) {
        self.blur_selected();
        self.selected = self.selected.prev();
    }
}

pub struct App {
    pub active_view: ViewId,
    pub phase: Phase,

    pub config: Option<Arc<Config>>,
    pub config_path: Option<PathBuf>,

    pub form: GameForm,
    /// The last validly submitted situation. Updated the moment a submission
    /// passes validation, before the network round trip completes.
    pub committed_state: GameState,
    pub view: Option<PredictionView>,
    submit_seq: u64,

    pub history: Vec<PitchRecord>,
    pub history_selected: usize,
    pub history_loading: bool,

    pub logs: Arc<parking_lot::Mutex<LogStore>>,
    pub log_scroll: usize,

    pub task_runner: TaskRunner,
    pub dirty: bool,
    pub spinner: usize,
    tick_counter: u64,
    pub last_error: Option<String>,
    pub info_message: Option<String>,
    info_expires_at: Option<Instant>,
}

impl App {
    pub fn new(
        initial_config_path: Option<PathBuf>,
        logs: Arc<parking_lot::Mutex<LogStore>>,
        task_runner: TaskRunner,
    ) -> Self {
        let committed_state = GameState::default();
        let mut app = Self {
            active_view: ViewId::Predict,
            phase: Phase::Idle,
            config: None,
            config_path: initial_config_path,
            form: GameForm::from_state(&committed_state),
            committed_state,
            view: None,
            submit_seq: 0,
            history: Vec::new(),
            history_selected: 0,
            history_loading: false,
            logs,
            log_scroll: 0,
            task_runner,
            dirty: true,
            spinner: 0,
            tick_counter: 0,
            last_error: None,
            info_message: None,
            info_expires_at: None,
        };
        app.try_load_config();
        app
    }

    pub fn try_load_config(&mut self) {
        let Some(path) = self.config_path.clone() else {
            return;
        };
        match pitchsight_application::config::load_config(&path) {
            Ok(config) => {
                self.config = Some(Arc::new(config));
                self.last_error = None;
            }
            Err(err) => {
                self.last_error = Some(err);
            }
        }
        self.dirty = true;
    }

    pub fn spawn_input_reader(&self, tx: tokio::sync::mpsc::UnboundedSender<TaskEvent>) {
        std::thread::spawn(move || {
            while let Ok(event) = crossterm::event::read() {
                let _ = tx.send(TaskEvent::Input(event));
            }
        });
    }

    pub fn on_tick(&mut self) {
        if self.phase == Phase::Submitting {
            self.tick_counter = self.tick_counter.wrapping_add(1);
            if self.tick_counter.is_multiple_of(3) {
                self.spinner = (self.spinner + 1) % 4;
                self.dirty = true;
            }
        }

        if let Some(until) = self.info_expires_at {
            if Instant::now() >= until {
                self.info_message = None;
                self.info_expires_at = None;
                self.dirty = true;
            }
        }
    }

    pub fn on_event(&mut self, event: TaskEvent) -> Result<bool, String> {
        match event {
            TaskEvent::Input(ct) => self.on_input(ct),
            TaskEvent::PredictionFinished { seq, result } => {
                if seq != self.submit_seq {
                    tracing::debug!(seq, current = self.submit_seq, "stale prediction dropped");
                    return Ok(false);
                }
                // The operator may have re-opened the form while the request
                // was in flight; publish the outcome but leave the modal up.
                let editing = self.phase == Phase::Editing;
                match result {
                    Ok(merged) => {
                        // Heatmap and ranked list are swapped in together so
                        // the two panels never show different submissions.
                        self.view = Some(prediction::build_view(&merged));
                        self.last_error = None;
                        if !editing {
                            self.phase = Phase::Displaying;
                        }
                    }
                    Err(err) => {
                        self.last_error = Some(err);
                        if !editing {
                            self.phase = Phase::Failed;
                        }
                    }
                }
                self.dirty = true;
                Ok(false)
            }
            TaskEvent::HistoryLoaded(result) => {
                self.history_loading = false;
                match result {
                    Ok(records) => {
                        self.history = records;
                        let max = self.history.len().saturating_sub(1);
                        self.history_selected = self.history_selected.min(max);
                    }
                    Err(err) => {
                        self.last_error = Some(err);
                    }
                }
                self.dirty = true;
                Ok(false)
            }
            TaskEvent::PitchSaved(result) => {
                match result {
                    Ok(record) => {
                        self.set_info(format!("saved pitch #{}", record.id));
                        self.refresh_history();
                    }
                    Err(err) => {
                        self.last_error = Some(err);
                    }
                }
                self.dirty = true;
                Ok(false)
            }
            TaskEvent::PitchMutated { id, result } => {
                match result {
                    Ok(()) => {
                        self.set_info(format!("pitch #{id} updated"));
                        self.refresh_history();
                    }
                    Err(err) => {
                        self.last_error = Some(err);
                    }
                }
                self.dirty = true;
                Ok(false)
            }
        }
    }

    fn on_input(&mut self, event: CtEvent) -> Result<bool, String> {
        match event {
            CtEvent::Key(key) => self.on_key(key),
            CtEvent::Resize(_, _) => {
                self.dirty = true;
                Ok(false)
            }
            _ => Ok(false),
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> Result<bool, String> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(true);
        }

        if self.phase == Phase::Editing {
            return self.handle_form_keys(key);
        }

        match self.active_view {
            ViewId::Predict => self.handle_predict_keys(key),
            ViewId::History => self.handle_history_keys(key),
        }
    }

    fn handle_predict_keys(&mut self, key: KeyEvent) -> Result<bool, String> {
        match key.code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Char('e') | KeyCode::Enter => {
                self.open_form(None);
            }
            KeyCode::Char('h') => {
                self.active_view = ViewId::History;
                self.refresh_history();
                self.dirty = true;
            }
            KeyCode::Char('s') => {
                self.save_committed_state();
            }
            KeyCode::Char('r') => {
                self.try_load_config();
                self.set_info("config reloaded".to_string());
            }
            KeyCode::PageUp => {
                self.log_scroll = self.log_scroll.saturating_add(3);
                self.dirty = true;
            }
            KeyCode::PageDown => {
                self.log_scroll = self.log_scroll.saturating_sub(3);
                self.dirty = true;
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_form_keys(&mut self, key: KeyEvent) -> Result<bool, String> {
        match key.code {
            KeyCode::Esc => {
                self.phase = if self.view.is_some() {
                    Phase::Displaying
                } else {
                    Phase::Idle
                };
                self.dirty = true;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.form.select_next();
                self.dirty = true;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.form.select_prev();
                self.dirty = true;
            }
            KeyCode::Enter => {
                self.submit_form();
            }
            KeyCode::Char(ch) => {
                self.form.selected_input_mut().insert_char(ch);
                self.dirty = true;
            }
            KeyCode::Backspace => {
                self.form.selected_input_mut().backspace();
                self.dirty = true;
            }
            KeyCode::Delete => {
                self.form.selected_input_mut().delete();
                self.dirty = true;
            }
            KeyCode::Left => {
                self.form.selected_input_mut().move_left();
                self.dirty = true;
            }
            KeyCode::Right => {
                self.form.selected_input_mut().move_right();
                self.dirty = true;
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_history_keys(&mut self, key: KeyEvent) -> Result<bool, String> {
        match key.code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Esc | KeyCode::Char('h') => {
                self.active_view = ViewId::Predict;
                self.dirty = true;
            }
            KeyCode::Up => {
                self.history_selected = self.history_selected.saturating_sub(1);
                self.dirty = true;
            }
            KeyCode::Down => {
                let max = self.history.len().saturating_sub(1);
                self.history_selected = (self.history_selected + 1).min(max);
                self.dirty = true;
            }
            KeyCode::Char('g') => {
                self.refresh_history();
                self.set_info("refreshed pitch history".to_string());
            }
            KeyCode::Char('d') => {
                self.delete_selected_record();
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(record) = self.history.get(self.history_selected) {
                    let record = record.clone();
                    self.active_view = ViewId::Predict;
                    self.form = GameForm::from_state(&record.state);
                    self.form.editing_record = Some(record.id);
                    self.phase = Phase::Editing;
                    self.dirty = true;
                }
            }
            _ => {}
        }
        Ok(false)
    }

    /// Opens the modal form, seeded from the committed state unless a saved
    /// record is being edited.
    pub fn open_form(&mut self, record: Option<&PitchRecord>) {
        match record {
            Some(record) => {
                self.form = GameForm::from_state(&record.state);
                self.form.editing_record = Some(record.id);
            }
            None => {
                self.form = GameForm::from_state(&self.committed_state);
            }
        }
        self.phase = Phase::Editing;
        self.dirty = true;
    }

    /// Validates the form and, on success, commits the state and launches the
    /// prediction round trip. Validation failure keeps the form open with
    /// every offending field marked; nothing is submitted.
    pub fn submit_form(&mut self) {
        self.dirty = true;
        match validation::validate(&self.form.raw()) {
            Err(errors) => {
                self.form.errors = errors;
            }
            Ok(state) => {
                self.committed_state = state;
                self.form.errors.clear();

                if let Some(id) = self.form.editing_record.take() {
                    if let Some(log_config) = self.pitch_log_config() {
                        self.task_runner.update_pitch(log_config, id, state);
                    }
                }

                let Some(config) = self.config.clone() else {
                    self.last_error = Some("no config loaded, cannot predict".to_string());
                    self.phase = Phase::Failed;
                    return;
                };
                self.submit_seq += 1;
                self.phase = Phase::Submitting;
                self.task_runner
                    .start_prediction(config, state, self.submit_seq);
            }
        }
    }

    fn save_committed_state(&mut self) {
        let Some(log_config) = self.pitch_log_config() else {
            self.set_info("pitch log is not configured".to_string());
            return;
        };
        self.task_runner
            .save_pitch(log_config, self.committed_state);
    }

    fn delete_selected_record(&mut self) {
        let Some(record) = self.history.get(self.history_selected) else {
            return;
        };
        let id = record.id;
        let Some(log_config) = self.pitch_log_config() else {
            self.set_info("pitch log is not configured".to_string());
            return;
        };
        self.task_runner.delete_pitch(log_config, id);
    }

    fn refresh_history(&mut self) {
        let Some(log_config) = self.pitch_log_config() else {
            self.set_info("pitch log is not configured".to_string());
            return;
        };
        self.history_loading = true;
        self.task_runner.load_history(log_config);
        self.dirty = true;
    }

    fn pitch_log_config(&self) -> Option<pitchsight_application::config::PitchLogConfig> {
        self.config.as_ref().and_then(|c| c.pitch_log.clone())
    }

    fn set_info(&mut self, message: String) {
        self.info_message = Some(message);
        self.info_expires_at = Some(Instant::now() + std::time::Duration::from_secs(2));
        self.dirty = true;
    }
}
