//! Application state for the terminal form wizard.
//!
//! This module contains the main application state and mode management
//! for the terminal user interface. The form itself lives behind a
//! [`FormSession`]; this layer tracks focus, text input buffers,
//! notifications, accessibility preferences and the in-flight submission.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use tracing::{debug, info, warn};

use super::wizard::{new_session, FieldView, FormSession, StepOutcome, SubmissionOutcome};
use crate::domain::{
    AccessibilitySettings, DomainError, FieldKind, FieldValue, FormKind, Notification,
    Receipt, SettingsStore, SubmissionError, SubmissionGateway, ValidationContext,
};

/// Represents the current mode of the application.
///
/// The mode determines how key presses are interpreted and which UI
/// elements are displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMode {
    /// Choosing which application to fill in
    SelectForm,
    /// Moving between fields and steps
    Normal,
    /// Typing into a text field
    Editing,
    /// Help screen is displayed
    Help,
    /// Accessibility settings panel is open
    Settings,
    /// Prompting for the path of a document to attach
    AttachFile,
    /// Prompting for the review summary CSV filename
    ExportCsv,
    /// The application was accepted
    Success { location: String, id: String },
}

/// Rows of the accessibility settings panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsItem {
    HighContrast,
    FontSize,
    MotionReduced,
    TextSpacing,
    ColorBlindMode,
    DarkTheme,
}

impl SettingsItem {
    pub const ALL: [SettingsItem; 6] = [
        SettingsItem::HighContrast,
        SettingsItem::FontSize,
        SettingsItem::MotionReduced,
        SettingsItem::TextSpacing,
        SettingsItem::ColorBlindMode,
        SettingsItem::DarkTheme,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SettingsItem::HighContrast => "High contrast",
            SettingsItem::FontSize => "Font size",
            SettingsItem::MotionReduced => "Reduce motion",
            SettingsItem::TextSpacing => "Text spacing",
            SettingsItem::ColorBlindMode => "Color blind mode",
            SettingsItem::DarkTheme => "Dark theme",
        }
    }

    pub fn value(&self, settings: &AccessibilitySettings) -> String {
        let on_off = |flag: bool| if flag { "on" } else { "off" }.to_string();
        match self {
            SettingsItem::HighContrast => on_off(settings.high_contrast),
            SettingsItem::FontSize => format!("{}px", settings.font_size),
            SettingsItem::MotionReduced => on_off(settings.motion_reduced),
            SettingsItem::TextSpacing => format!("{:.1}", settings.text_spacing),
            SettingsItem::ColorBlindMode => settings.color_blind_mode.to_string(),
            SettingsItem::DarkTheme => on_off(settings.dark_theme),
        }
    }
}

const TEXT_SPACING_STEP: f32 = 0.5;

/// Main application state.
///
/// Holds everything needed to render the wizard and react to key presses.
/// A submission runs on a worker thread; its result is picked up by
/// [`App::poll_submission`] from the UI loop.
#[derive(Debug)]
pub struct App {
    /// The form being filled in
    pub session: Box<dyn FormSession>,
    /// Current application mode
    pub mode: AppMode,
    /// Highlighted entry on the form selection screen
    pub form_cursor: usize,
    /// Focused field on the current step
    pub selected_field: usize,
    /// Highlighted option inside a multi-select or document list
    pub option_cursor: usize,
    /// Input buffer for text fields
    pub input: String,
    /// Cursor position within the active buffer, in characters
    pub cursor_position: usize,
    /// Input buffer for path and filename prompts
    pub filename_input: String,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Highlighted row of the settings panel
    pub settings_cursor: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Outcome of the last submission attempt
    pub notification: Option<Notification>,
    /// Current accessibility preferences
    pub settings: AccessibilitySettings,
    /// Bumped on every settings change so appliers know to re-run
    pub settings_generation: u64,
    /// Animation counter advanced by the UI loop
    pub tick: u64,
    editing_kind: Option<FieldKind>,
    return_mode: AppMode,
    gateway: Arc<dyn SubmissionGateway>,
    settings_store: Box<dyn SettingsStore>,
    pending: Option<Receiver<Result<Receipt, SubmissionError>>>,
    context: ValidationContext,
}

impl App {
    /// Creates the application.
    ///
    /// # Arguments
    ///
    /// * `form` - Form to open straight away; `None` shows the selection screen
    /// * `gateway` - Where validated applications are sent
    /// * `settings_store` - Persistence for accessibility preferences
    pub fn new(
        form: Option<FormKind>,
        gateway: Arc<dyn SubmissionGateway>,
        settings_store: Box<dyn SettingsStore>,
    ) -> Self {
        Self::with_context(form, gateway, settings_store, ValidationContext::now())
    }

    pub fn with_context(
        form: Option<FormKind>,
        gateway: Arc<dyn SubmissionGateway>,
        settings_store: Box<dyn SettingsStore>,
        context: ValidationContext,
    ) -> Self {
        let settings = AccessibilitySettings::load(settings_store.as_ref());
        let kind = form.unwrap_or(FormKind::Partnership);
        Self {
            session: new_session(kind, context),
            mode: if form.is_some() { AppMode::Normal } else { AppMode::SelectForm },
            form_cursor: FormKind::ALL.iter().position(|k| *k == kind).unwrap_or(0),
            selected_field: 0,
            option_cursor: 0,
            input: String::new(),
            cursor_position: 0,
            filename_input: String::new(),
            help_scroll: 0,
            settings_cursor: 0,
            status_message: None,
            notification: None,
            settings,
            settings_generation: 0,
            tick: 0,
            editing_kind: None,
            return_mode: AppMode::Normal,
            gateway,
            settings_store,
            pending: None,
            context,
        }
    }

    /// Starts a fresh application of the highlighted kind.
    pub fn open_selected_form(&mut self) {
        let kind = FormKind::ALL[self.form_cursor.min(FormKind::ALL.len() - 1)];
        self.open_form(kind);
    }

    pub fn open_form(&mut self, kind: FormKind) {
        info!(form = %kind, "opening application form");
        self.session = new_session(kind, self.context);
        self.mode = AppMode::Normal;
        self.selected_field = 0;
        self.option_cursor = 0;
        self.notification = None;
        self.status_message = None;
    }

    /// Returns to the selection screen after a completed application.
    pub fn start_over(&mut self) {
        self.mode = AppMode::SelectForm;
        self.notification = None;
        self.status_message = None;
    }

    pub fn current_field(&self) -> Option<FieldView> {
        self.session.field_view(self.selected_field)
    }

    pub fn select_next_field(&mut self) {
        let count = self.session.field_count();
        if self.selected_field + 1 < count {
            self.selected_field += 1;
            self.option_cursor = 0;
        }
    }

    pub fn select_previous_field(&mut self) {
        if self.selected_field > 0 {
            self.selected_field -= 1;
            self.option_cursor = 0;
        }
    }

    /// Acts on the focused field: edit text, cycle a select, toggle a
    /// checkbox or multi-select option, or prompt for a document.
    pub fn activate_field(&mut self) {
        let Some(field) = self.current_field() else {
            return;
        };
        match field.kind {
            FieldKind::Text | FieldKind::Email | FieldKind::Number | FieldKind::Year => {
                self.start_editing();
            }
            FieldKind::Select(_) => self.cycle_choice(1),
            FieldKind::MultiSelect(choices) => {
                if let Some(choice) = choices.get(self.option_cursor) {
                    self.session.toggle_member_at(self.selected_field, choice.value);
                }
            }
            FieldKind::Checkbox => {
                let checked = matches!(field.value, Some(FieldValue::Flag(true)));
                self.session.update_field_at(self.selected_field, FieldValue::Flag(!checked));
            }
            FieldKind::Documents => self.start_attach_file(),
        }
    }

    /// Moves a select field to the next (`delta > 0`) or previous choice.
    pub fn cycle_choice(&mut self, delta: isize) {
        let Some(field) = self.current_field() else {
            return;
        };
        let FieldKind::Select(choices) = field.kind else {
            return;
        };
        if choices.is_empty() {
            return;
        }
        let current = match &field.value {
            Some(FieldValue::Text(value)) => choices.iter().position(|c| c.value == value),
            _ => None,
        };
        let len = choices.len() as isize;
        let next = match current {
            Some(index) => (index as isize + delta).rem_euclid(len),
            None if delta >= 0 => 0,
            None => len - 1,
        };
        let value = choices[next as usize].value;
        self.session.update_field_at(self.selected_field, value.into());
    }

    /// Moves the option highlight inside a multi-select or document list.
    pub fn move_option_cursor(&mut self, delta: isize) {
        let Some(field) = self.current_field() else {
            return;
        };
        let len = match field.kind {
            FieldKind::MultiSelect(choices) => choices.len(),
            FieldKind::Documents => self.session.documents().len(),
            FieldKind::Select(_) => {
                self.cycle_choice(delta);
                return;
            }
            _ => return,
        };
        if len == 0 {
            self.option_cursor = 0;
            return;
        }
        self.option_cursor = (self.option_cursor as isize + delta).clamp(0, len as isize - 1) as usize;
    }

    /// Switches to editing mode for the focused text field.
    ///
    /// Loads the field's value into the input buffer and positions the
    /// cursor at the end.
    pub fn start_editing(&mut self) {
        let Some(field) = self.current_field() else {
            return;
        };
        self.mode = AppMode::Editing;
        self.editing_kind = Some(field.kind);
        self.input = match field.value {
            Some(FieldValue::Text(text)) => text,
            _ => String::new(),
        };
        self.cursor_position = self.input.chars().count();
    }

    /// Writes the input buffer into the focused field and moves focus to
    /// the next field.
    pub fn finish_editing(&mut self) {
        let value = std::mem::take(&mut self.input);
        self.session.update_field_at(self.selected_field, FieldValue::Text(value));
        self.select_next_field();
        self.mode = AppMode::Normal;
        self.editing_kind = None;
        self.cursor_position = 0;
    }

    /// Cancels editing and returns to normal mode without saving changes.
    pub fn cancel_editing(&mut self) {
        self.mode = AppMode::Normal;
        self.editing_kind = None;
        self.input.clear();
        self.cursor_position = 0;
    }

    /// Inserts a character at the cursor of the active buffer.
    ///
    /// Number and year fields only take ASCII digits.
    pub fn insert_char(&mut self, c: char) {
        if self.mode == AppMode::Editing
            && self.editing_kind.is_some_and(|kind| kind.accepts_digits_only())
            && !c.is_ascii_digit()
        {
            return;
        }
        let position = self.cursor_position;
        if let Some(buffer) = self.active_buffer_mut() {
            let index = byte_index(buffer, position);
            buffer.insert(index, c);
            self.cursor_position += 1;
        }
    }

    pub fn delete_char_before_cursor(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        let position = self.cursor_position - 1;
        if let Some(buffer) = self.active_buffer_mut() {
            let index = byte_index(buffer, position);
            buffer.remove(index);
            self.cursor_position = position;
        }
    }

    pub fn delete_char_at_cursor(&mut self) {
        let position = self.cursor_position;
        if let Some(buffer) = self.active_buffer_mut() {
            if position < buffer.chars().count() {
                let index = byte_index(buffer, position);
                buffer.remove(index);
            }
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        let len = self.active_buffer_len();
        if self.cursor_position < len {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_position = self.active_buffer_len();
    }

    fn active_buffer_mut(&mut self) -> Option<&mut String> {
        match self.mode {
            AppMode::Editing => Some(&mut self.input),
            AppMode::AttachFile | AppMode::ExportCsv => Some(&mut self.filename_input),
            _ => None,
        }
    }

    fn active_buffer_len(&self) -> usize {
        match self.mode {
            AppMode::Editing => self.input.chars().count(),
            AppMode::AttachFile | AppMode::ExportCsv => self.filename_input.chars().count(),
            _ => 0,
        }
    }

    /// Moves forward one step, or submits when the last step validates.
    pub fn next_step(&mut self) {
        self.status_message = None;
        match self.session.go_next() {
            StepOutcome::Advanced { .. } => {
                self.selected_field = 0;
                self.option_cursor = 0;
            }
            StepOutcome::Invalid { errors } => {
                self.status_message = Some(format!(
                    "Please correct {} field{} before continuing",
                    errors,
                    if errors == 1 { "" } else { "s" }
                ));
                self.focus_first_error();
            }
            StepOutcome::ReadyToSubmit => self.start_submission(),
            StepOutcome::Busy => {
                self.status_message = Some("Submission in progress...".to_string());
            }
        }
    }

    pub fn previous_step(&mut self) {
        if self.session.go_prev() {
            self.selected_field = 0;
            self.option_cursor = 0;
            self.status_message = None;
        }
    }

    fn focus_first_error(&mut self) {
        let first = (0..self.session.field_count())
            .find(|index| self.session.field_view(*index).is_some_and(|f| f.error.is_some()));
        if let Some(index) = first {
            self.selected_field = index;
            self.option_cursor = 0;
        }
    }

    /// Hands the validated form to a worker thread.
    ///
    /// The wizard refuses a second submission while one is in flight, so
    /// at most one worker exists at a time.
    pub fn start_submission(&mut self) {
        let Some(request) = self.session.begin_submission() else {
            return;
        };
        let gateway = Arc::clone(&self.gateway);
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            let result = gateway.submit(&request);
            if sender.send(result).is_err() {
                warn!("submission finished after the application closed");
            }
        });
        self.pending = Some(receiver);
        self.notification = None;
        self.status_message = Some("Submitting application...".to_string());
    }

    pub fn is_submitting(&self) -> bool {
        self.session.is_submitting()
    }

    /// Applies the submission result if the worker has finished.
    ///
    /// Returns `true` when a result was applied.
    pub fn poll_submission(&mut self) -> bool {
        let Some(receiver) = &self.pending else {
            return false;
        };
        let result = match receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => {
                Err(SubmissionError::Network("submission worker stopped unexpectedly".to_string()))
            }
        };
        self.pending = None;
        self.apply_submission_result(result);
        true
    }

    /// Blocks until the in-flight submission finishes and applies it.
    #[cfg(test)]
    pub(crate) fn wait_for_submission(&mut self) -> bool {
        let Some(receiver) = self.pending.take() else {
            return false;
        };
        let result = receiver.recv().unwrap_or_else(|_| {
            Err(SubmissionError::Network("submission worker stopped unexpectedly".to_string()))
        });
        self.apply_submission_result(result);
        true
    }

    fn apply_submission_result(&mut self, result: Result<Receipt, SubmissionError>) {
        self.status_message = None;
        match self.session.finish_submission(result) {
            SubmissionOutcome::Accepted { receipt, notification, redirect } => {
                self.notification = Some(notification);
                self.editing_kind = None;
                self.input.clear();
                self.filename_input.clear();
                self.cursor_position = 0;
                self.mode = AppMode::Success { location: redirect, id: receipt.id };
            }
            SubmissionOutcome::Failed { notification } => {
                self.notification = Some(notification);
            }
        }
    }

    /// Switches to the attach prompt for the focused document field.
    pub fn start_attach_file(&mut self) {
        self.mode = AppMode::AttachFile;
        self.filename_input.clear();
        self.cursor_position = 0;
        self.status_message = None;
    }

    /// Cancels filename input and returns to normal mode.
    pub fn cancel_filename_input(&mut self) {
        self.mode = AppMode::Normal;
        self.filename_input.clear();
        self.cursor_position = 0;
    }

    pub fn get_attach_path(&self) -> PathBuf {
        PathBuf::from(self.filename_input.trim())
    }

    /// Processes the result of looking up a document on disk.
    ///
    /// # Arguments
    ///
    /// * `path` - The path the user entered
    /// * `size` - File size in bytes, or why the file could not be read
    pub fn set_attach_result(&mut self, path: PathBuf, size: Result<u64, DomainError>) {
        let result = size.and_then(|bytes| self.session.add_document(path.clone(), bytes));
        match result {
            Ok(id) => {
                debug!(id = %id, path = %path.display(), "document attached");
                self.status_message = Some(format!("Attached {}", path.display()));
                self.option_cursor = self.session.documents().len().saturating_sub(1);
            }
            Err(error) => {
                self.status_message = Some(format!("Attach failed: {}", error));
            }
        }
        self.mode = AppMode::Normal;
        self.filename_input.clear();
        self.cursor_position = 0;
    }

    /// Removes the highlighted document from the focused document field.
    pub fn remove_selected_document(&mut self) {
        let Some(field) = self.current_field() else {
            return;
        };
        if field.kind != FieldKind::Documents {
            return;
        }
        let documents = self.session.documents();
        if let Some(document) = documents.get(self.option_cursor) {
            if self.session.remove_document(&document.id) {
                self.status_message = Some(format!("Removed {}", document.file_name()));
            }
        }
        let remaining = self.session.documents().len();
        self.option_cursor = self.option_cursor.min(remaining.saturating_sub(1));
    }

    /// Switches to CSV export mode to prompt for a filename.
    pub fn start_csv_export(&mut self) {
        self.mode = AppMode::ExportCsv;
        self.filename_input = self.default_export_filename();
        self.cursor_position = self.filename_input.chars().count();
        self.status_message = None;
    }

    fn default_export_filename(&self) -> String {
        format!("{}-application.csv", self.session.kind())
    }

    /// Gets the filename to use for CSV export.
    ///
    /// Returns the filename input if not empty, otherwise a default name
    /// derived from the form.
    pub fn get_csv_export_filename(&self) -> String {
        let name = self.filename_input.trim();
        if name.is_empty() {
            self.default_export_filename()
        } else {
            name.to_string()
        }
    }

    /// Processes the result of a CSV export operation.
    pub fn set_csv_export_result(&mut self, result: Result<String, String>) {
        match result {
            Ok(filename) => {
                self.status_message = Some(format!("Exported to {}", filename));
            }
            Err(error) => {
                self.status_message = Some(format!("Export failed: {}", error));
            }
        }
        self.mode = AppMode::Normal;
        self.filename_input.clear();
        self.cursor_position = 0;
    }

    pub fn set_copy_result(&mut self, result: Result<(), String>) {
        self.status_message = Some(match result {
            Ok(()) => "Application id copied to clipboard".to_string(),
            Err(error) => format!("Copy failed: {}", error),
        });
    }

    /// Opens the settings panel over the current screen.
    pub fn open_settings(&mut self) {
        self.return_mode = self.mode.clone();
        self.mode = AppMode::Settings;
        self.settings_cursor = 0;
    }

    pub fn close_settings(&mut self) {
        self.mode = std::mem::replace(&mut self.return_mode, AppMode::Normal);
    }

    pub fn open_help(&mut self) {
        self.return_mode = self.mode.clone();
        self.mode = AppMode::Help;
        self.help_scroll = 0;
    }

    pub fn close_help(&mut self) {
        self.mode = std::mem::replace(&mut self.return_mode, AppMode::Normal);
    }

    /// The screen drawn underneath the help and settings popups.
    pub fn screen_mode(&self) -> &AppMode {
        match self.mode {
            AppMode::Help | AppMode::Settings => &self.return_mode,
            _ => &self.mode,
        }
    }

    pub fn selected_settings_item(&self) -> SettingsItem {
        SettingsItem::ALL[self.settings_cursor.min(SettingsItem::ALL.len() - 1)]
    }

    /// Toggles, cycles or increases the highlighted setting.
    pub fn adjust_setting(&mut self, increase: bool) {
        let item = self.selected_settings_item();
        self.update_settings(|settings| match item {
            SettingsItem::HighContrast => settings.toggle_high_contrast(),
            SettingsItem::MotionReduced => settings.toggle_motion_reduced(),
            SettingsItem::DarkTheme => settings.toggle_dark_theme(),
            SettingsItem::ColorBlindMode => {
                let next = settings.color_blind_mode.next();
                settings.set_color_blind_mode(next);
            }
            SettingsItem::FontSize if increase => settings.increase_font_size(),
            SettingsItem::FontSize => settings.decrease_font_size(),
            SettingsItem::TextSpacing => {
                let delta = if increase { TEXT_SPACING_STEP } else { -TEXT_SPACING_STEP };
                let spacing = settings.text_spacing + delta;
                settings.set_text_spacing(spacing);
            }
        });
    }

    pub fn reset_font_size(&mut self) {
        self.update_settings(AccessibilitySettings::reset_font_size);
    }

    /// Changes the preferences, persists them and bumps the generation.
    pub fn update_settings(&mut self, change: impl FnOnce(&mut AccessibilitySettings)) {
        change(&mut self.settings);
        self.settings_generation += 1;
        if let Err(error) = self.settings.save(self.settings_store.as_mut()) {
            warn!(error = %error, "failed to persist accessibility settings");
            self.status_message = Some(format!("Settings not saved: {}", error));
        }
    }

    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }
}

fn byte_index(text: &str, char_position: usize) -> usize {
    text.char_indices()
        .nth(char_position)
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}
