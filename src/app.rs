//! Application state and core logic

use crate::config::TuiConfig;
use crate::platform::COPY_MODIFIER;
use crate::remote::{RecordClient, RecordServiceTrait};
use crate::state::{
    channel_form, AppState, FieldArrayName, FieldBinding, FieldKind, FieldPath, FieldValue, Focus,
    FormButton, FormController, FormValues, PhNumber, SetValueOptions, SubmitOutcome,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::watch;

/// Fields whose changes are logged from the value watch
const WATCHED_FIELDS: [FieldPath; 2] = [FieldPath::Username, FieldPath::Email];

/// Main application struct
pub struct App {
    /// UI state outside the form
    pub state: AppState,
    /// The channel form
    pub form: FormController,
    /// Record service for lookups and submissions
    service: Arc<dyn RecordServiceTrait>,
    config: TuiConfig,
    /// Value snapshots published by the form
    watched: watch::Receiver<FormValues>,
    /// Submission accepted but not yet run; drawn as "Submitting" first
    pending_submit: bool,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App instance talking to the configured record service
    pub async fn new() -> Result<Self> {
        let config = TuiConfig::load().unwrap_or_else(|err| {
            tracing::warn!("Ignoring unreadable config: {err:#}");
            TuiConfig::default()
        });
        let client = RecordClient::new(&config)?;
        tracing::info!("Using record service at {}", client.address());
        Self::with_service(Arc::new(client), config)
    }

    /// Create an App on top of any record service
    pub fn with_service(service: Arc<dyn RecordServiceTrait>, config: TuiConfig) -> Result<Self> {
        let mut form = channel_form(Arc::clone(&service), config.validation_mode())?;
        form.focus(FieldPath::Username);
        let watched = form.watch();

        Ok(Self {
            state: AppState::default(),
            form,
            service,
            config,
            watched,
            pending_submit: false,
            quit: false,
        })
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Drain the value watch; true when the values changed since the last call
    pub fn poll_watch(&mut self) -> bool {
        if !self.watched.has_changed().unwrap_or(false) {
            return false;
        }
        let rows = self.watched.borrow_and_update().ph_numbers.len();
        for (path, value) in self.form.get_values(&WATCHED_FIELDS) {
            tracing::debug!("watch {path} = {:?} ({rows} phone rows)", value.display_value());
        }
        true
    }

    /// Number of rows in the phone number list
    pub fn rows(&self) -> usize {
        self.form.array_len(FieldArrayName::PhNumbers)
    }

    pub fn focus(&self) -> Focus {
        self.state.focus(self.rows())
    }

    /// Submit is disabled on a pristine form and while a submission runs
    pub fn can_submit(&self) -> bool {
        self.form.is_dirty() && !self.form.status().is_submitting
    }

    /// Whether a requested submission still has to run
    pub fn has_pending_submit(&self) -> bool {
        self.pending_submit
    }

    /// Raw text shown in the input for `path`
    pub fn input_text(&self, path: FieldPath) -> String {
        if path == FieldPath::Dob && self.dob_input_in_sync() {
            return self.state.dob_input.clone();
        }
        self.form
            .get_value(path)
            .map(|v| v.display_value())
            .unwrap_or_default()
    }

    /// The typed date buffer still describes the stored date
    fn dob_input_in_sync(&self) -> bool {
        !self.state.dob_input.is_empty()
            && self.form.get_value(FieldPath::Dob)
                == Some(FieldValue::from_input(FieldKind::Date, &self.state.dob_input))
    }

    /// Reseed the date buffer when the date was written other than by typing
    fn sync_dob_input(&mut self) {
        if !self.dob_input_in_sync() {
            self.state.dob_input = self.input_text(FieldPath::Dob);
        }
    }

    fn focused_binding(&self) -> Option<FieldBinding> {
        self.focus().field().and_then(|path| self.form.binding(path))
    }

    /// Handle a key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if self.state.current_error().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }
        if self.state.values_panel.is_some() && key.code == KeyCode::Esc {
            self.state.values_panel = None;
            return Ok(());
        }

        match key.code {
            KeyCode::Char('c') if ctrl => self.quit = true,
            KeyCode::Char('s') if ctrl => self.request_submit(),
            KeyCode::Char('r') if ctrl => self.reset(),
            KeyCode::Char('g') if ctrl => self.get_values(),
            KeyCode::Char('y') if key.modifiers.contains(COPY_MODIFIER) => self.copy_values(),
            KeyCode::Char('u') if ctrl => self.set_username_value().await?,
            KeyCode::Char('t') if ctrl => self.trigger().await,
            KeyCode::Char('a') if ctrl => self.append_phone().await,
            KeyCode::Char('x') if ctrl => self.remove_focused_phone(),
            KeyCode::Tab | KeyCode::Down => self.move_focus(true).await,
            KeyCode::BackTab | KeyCode::Up => self.move_focus(false).await,
            KeyCode::Enter => self.activate().await?,
            KeyCode::Char(c) if !ctrl => self.input_char(c).await?,
            KeyCode::Backspace => self.backspace().await?,
            _ => {}
        }
        Ok(())
    }

    /// Leave the focused field (touching it) and focus the next enabled target
    async fn move_focus(&mut self, forward: bool) {
        let rows = self.rows();
        if let Some(binding) = self.focused_binding() {
            binding.on_blur(&mut self.form).await;
        }

        let count = AppState::focus_targets(rows).len();
        for _ in 0..count {
            if forward {
                self.state.next_focus(rows);
            } else {
                self.state.prev_focus(rows);
            }
            match self.focus().field() {
                Some(path) if self.form.is_disabled(path) => continue,
                _ => break,
            }
        }

        if let Some(binding) = self.focused_binding() {
            binding.on_focus(&mut self.form);
        }
    }

    /// Focus `target` directly, blurring the current field
    async fn focus_on(&mut self, target: Focus) {
        if let Some(binding) = self.focused_binding() {
            binding.on_blur(&mut self.form).await;
        }
        self.state.set_focus(target, self.rows());
        if let Some(binding) = self.focused_binding() {
            binding.on_focus(&mut self.form);
        }
    }

    /// Enter: press the focused button, or move on from a field
    async fn activate(&mut self) -> Result<()> {
        match self.focus() {
            Focus::Field(_) => self.move_focus(true).await,
            Focus::AddPhone => self.append_phone().await,
            Focus::Button(FormButton::Submit) => self.request_submit(),
            Focus::Button(FormButton::Reset) => self.reset(),
            Focus::Button(FormButton::GetValues) => self.get_values(),
            Focus::Button(FormButton::SetValue) => self.set_username_value().await?,
            Focus::Button(FormButton::Trigger) => self.trigger().await,
        }
        Ok(())
    }

    async fn input_char(&mut self, c: char) -> Result<()> {
        self.edit_focused(|raw| raw.push(c), |value| value.push_char(c))
            .await
    }

    async fn backspace(&mut self) -> Result<()> {
        self.edit_focused(
            |raw| {
                raw.pop();
            },
            FieldValue::pop_char,
        )
        .await
    }

    /// Apply a keystroke to the focused input. Dates are edited as raw text
    /// and parsed on every key.
    async fn edit_focused(
        &mut self,
        edit_raw: impl FnOnce(&mut String),
        edit_value: impl FnOnce(&mut FieldValue),
    ) -> Result<()> {
        let Some(binding) = self.focused_binding() else {
            return Ok(());
        };
        if binding.is_disabled(&self.form) {
            return Ok(());
        }

        let value = if binding.path().kind() == FieldKind::Date {
            self.sync_dob_input();
            edit_raw(&mut self.state.dob_input);
            FieldValue::from_input(FieldKind::Date, &self.state.dob_input)
        } else {
            let mut value = binding.value(&self.form).unwrap_or_default();
            edit_value(&mut value);
            value
        };
        binding.on_change(&mut self.form, value).await?;
        Ok(())
    }

    /// Accept a submission; it runs after the next draw so the in-flight
    /// state is visible
    pub fn request_submit(&mut self) {
        if self.form.status().is_submitting {
            self.state.status_message = Some("Submission in progress".to_string());
            return;
        }
        if !self.can_submit() {
            self.state.status_message = Some("Nothing to submit yet".to_string());
            return;
        }
        self.form.begin_submit();
        self.pending_submit = true;
    }

    /// Run a submission accepted by [`App::request_submit`]
    pub async fn run_pending(&mut self) {
        if std::mem::take(&mut self.pending_submit) {
            self.submit().await;
        }
    }

    /// Validate and send the form to the record service
    async fn submit(&mut self) {
        let service = Arc::clone(&self.service);
        let outcome = self
            .form
            .submit(
                |payload| async move { service.submit(&payload).await },
                |errors| tracing::info!("Submission blocked by {} invalid field(s)", errors.len()),
            )
            .await;

        match outcome {
            SubmitOutcome::Submitted => {
                self.state.status_message = Some("Submitted".to_string());
                if self.config.reset_on_submit_success() {
                    self.reset();
                }
            }
            SubmitOutcome::Failed(err) => {
                self.state.push_error(format!("Submission failed: {err:#}"));
            }
            SubmitOutcome::Invalid(errors) => {
                self.state.status_message =
                    Some(format!("{} field(s) need attention", errors.len()));
                if let Some(path) = errors.keys().next() {
                    self.focus_on(Focus::Field(*path)).await;
                }
            }
        }
    }

    /// Restore defaults and clear all flags
    pub fn reset(&mut self) {
        let before = self.focus();
        self.form.reset();
        self.state.clear_form();

        // Rows past the default length are gone
        let rows = self.rows();
        let target = match before {
            Focus::Field(FieldPath::PhNumber(i)) if i >= rows => Focus::AddPhone,
            other => other,
        };
        self.state.set_focus(target, rows);
        if let Some(binding) = self.focused_binding() {
            binding.on_focus(&mut self.form);
        }
        self.state.status_message = Some("Form reset".to_string());
    }

    /// Show the current values without re-evaluating anything
    pub fn get_values(&mut self) {
        match serde_json::to_string_pretty(self.form.values()) {
            Ok(json) => {
                tracing::info!("getValues {json}");
                self.state.values_panel = Some(json);
            }
            Err(err) => self.state.push_error(format!("Could not read values: {err}")),
        }
    }

    fn copy_values(&mut self) {
        let result = serde_json::to_string_pretty(self.form.values())
            .map_err(anyhow::Error::from)
            .and_then(|json| self.copy_to_clipboard(&json));
        match result {
            Ok(()) => self.state.status_message = Some("Values copied".to_string()),
            Err(err) => self.state.push_error(format!("Copy failed: {err}")),
        }
    }

    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        use arboard::Clipboard;
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(text)?;
        Ok(())
    }

    /// Clear the username programmatically, validating, dirtying and touching it
    pub async fn set_username_value(&mut self) -> Result<()> {
        self.form
            .set_value(
                FieldPath::Username,
                FieldValue::text(""),
                SetValueOptions::all(),
            )
            .await?;
        self.state.status_message = Some("Username cleared".to_string());
        Ok(())
    }

    /// Validate username and email only
    pub async fn trigger(&mut self) {
        let result = self
            .form
            .validate(Some(&[FieldPath::Username, FieldPath::Email]))
            .await;
        self.state.status_message = Some(match result {
            Ok(()) => "Username and email are valid".to_string(),
            Err(errors) => format!("{} field(s) invalid", errors.len()),
        });
    }

    /// Append an empty phone row and focus it
    pub async fn append_phone(&mut self) {
        let index = self
            .form
            .append_entry(FieldArrayName::PhNumbers, PhNumber::default());
        self.focus_on(Focus::Field(FieldPath::PhNumber(index))).await;
    }

    /// Remove the focused phone row; the first row stays
    pub fn remove_focused_phone(&mut self) {
        let Some(index) = self.focus().field().and_then(|p| p.array_index()) else {
            self.state.status_message = Some("Focus a phone number row to remove it".to_string());
            return;
        };
        if !self.form.remove_entry(FieldArrayName::PhNumbers, index) {
            self.state.status_message = Some("The first phone number cannot be removed".to_string());
            return;
        }

        let target = Focus::Field(FieldPath::PhNumber(index - 1));
        self.state.set_focus(target, self.rows());
        self.form.focus(FieldPath::PhNumber(index - 1));
    }
}
