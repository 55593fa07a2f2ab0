use crate::application::{App, AppMode, SettingsItem};
use crate::domain::FormKind;
use crate::infrastructure::{ClipboardService, FileRepository, SummaryExporter};
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::SelectForm => Self::handle_select_form_mode(app, key),
            AppMode::Normal => Self::handle_normal_mode(app, key, modifiers),
            AppMode::Editing => Self::handle_editing_mode(app, key),
            AppMode::Help => Self::handle_help_mode(app, key),
            AppMode::Settings => Self::handle_settings_mode(app, key),
            AppMode::AttachFile => Self::handle_filename_input_mode(app, key, "attach"),
            AppMode::ExportCsv => Self::handle_filename_input_mode(app, key, "csv_export"),
            AppMode::Success { .. } => Self::handle_success_mode(app, key),
        }
    }

    /// Whether `key` should quit the application in the current mode.
    pub fn is_quit(app: &App, key: KeyCode) -> bool {
        key == KeyCode::Char('q')
            && matches!(app.mode, AppMode::Normal | AppMode::SelectForm | AppMode::Success { .. })
    }

    fn handle_select_form_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                app.form_cursor = app.form_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if app.form_cursor + 1 < FormKind::ALL.len() {
                    app.form_cursor += 1;
                }
            }
            KeyCode::Enter => app.open_selected_form(),
            KeyCode::Char('a') => app.open_settings(),
            KeyCode::F(1) | KeyCode::Char('?') => app.open_help(),
            _ => {}
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            if key == KeyCode::Char('e') {
                app.start_csv_export();
            }
            return;
        }

        app.status_message = None;
        app.notification = None;

        match key {
            KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => app.select_previous_field(),
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => app.select_next_field(),
            KeyCode::Left | KeyCode::Char('h') => app.move_option_cursor(-1),
            KeyCode::Right | KeyCode::Char('l') => app.move_option_cursor(1),
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::F(2) => app.activate_field(),
            KeyCode::Delete | KeyCode::Char('x') => app.remove_selected_document(),
            KeyCode::Char('n') | KeyCode::PageDown => app.next_step(),
            KeyCode::Char('p') | KeyCode::PageUp => app.previous_step(),
            KeyCode::Char('a') => app.open_settings(),
            KeyCode::F(1) | KeyCode::Char('?') => app.open_help(),
            _ => {}
        }
    }

    fn handle_editing_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Tab => app.finish_editing(),
            KeyCode::Esc => app.cancel_editing(),
            KeyCode::Backspace => app.delete_char_before_cursor(),
            KeyCode::Delete => app.delete_char_at_cursor(),
            KeyCode::Left => app.move_cursor_left(),
            KeyCode::Right => app.move_cursor_right(),
            KeyCode::Home => app.move_cursor_home(),
            KeyCode::End => app.move_cursor_end(),
            KeyCode::Char(c) => app.insert_char(c),
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.close_help();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if app.help_scroll > 0 {
                    app.help_scroll -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }

    fn handle_settings_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('a') => app.close_settings(),
            KeyCode::Up | KeyCode::Char('k') => {
                app.settings_cursor = app.settings_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if app.settings_cursor + 1 < SettingsItem::ALL.len() {
                    app.settings_cursor += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Right | KeyCode::Char('+') => {
                app.adjust_setting(true);
            }
            KeyCode::Left | KeyCode::Char('-') => app.adjust_setting(false),
            KeyCode::Char('r') => app.reset_font_size(),
            _ => {}
        }
    }

    fn handle_filename_input_mode(app: &mut App, key: KeyCode, mode: &str) {
        match key {
            KeyCode::Enter => match mode {
                "attach" => {
                    let path = app.get_attach_path();
                    let size = FileRepository::document_size(&path);
                    app.set_attach_result(path, size);
                }
                "csv_export" => {
                    let filename = app.get_csv_export_filename();
                    let result = SummaryExporter::export_to_csv(&app.session.summary(), &filename);
                    app.set_csv_export_result(result);
                }
                _ => {}
            },
            KeyCode::Esc => app.cancel_filename_input(),
            KeyCode::Backspace => app.delete_char_before_cursor(),
            KeyCode::Delete => app.delete_char_at_cursor(),
            KeyCode::Left => app.move_cursor_left(),
            KeyCode::Right => app.move_cursor_right(),
            KeyCode::Home => app.move_cursor_home(),
            KeyCode::End => app.move_cursor_end(),
            KeyCode::Char(c) => app.insert_char(c),
            _ => {}
        }
    }

    fn handle_success_mode(app: &mut App, key: KeyCode) {
        let AppMode::Success { id, .. } = &app.mode else {
            return;
        };
        match key {
            KeyCode::Char('c') => {
                let result = ClipboardService::copy(id);
                app.set_copy_result(result);
            }
            KeyCode::Char('n') | KeyCode::Enter => app.start_over(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::state::tests::{fill_partnership, test_app};
    use crate::domain::FieldValue;
    use std::fs;
    use tempfile::TempDir;

    fn press(app: &mut App, key: KeyCode) {
        InputHandler::handle_key_event(app, key, KeyModifiers::NONE);
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_select_form_navigation() {
        let mut app = test_app(None);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.form_cursor, 2);
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.session.kind(), FormKind::Recognition);
    }

    #[test]
    fn test_enter_edits_and_saves_text_field() {
        let mut app = test_app(Some(FormKind::Partnership));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, AppMode::Editing);

        type_str(&mut app, "Abai University");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.session.field_view(0).unwrap().display, "Abai Universit");
    }

    #[test]
    fn test_escape_cancels_edit() {
        let mut app = test_app(Some(FormKind::Partnership));
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "draft");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.session.field_view(0).unwrap().display, "");
    }

    #[test]
    fn test_quit_only_outside_text_entry() {
        let mut app = test_app(Some(FormKind::Partnership));
        assert!(InputHandler::is_quit(&app, KeyCode::Char('q')));
        press(&mut app, KeyCode::Enter);
        assert!(!InputHandler::is_quit(&app, KeyCode::Char('q')));
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.input, "q");
    }

    #[test]
    fn test_next_step_key_reports_errors() {
        let mut app = test_app(Some(FormKind::Recognition));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.session.current_step(), 1);
        assert_eq!(app.session.errors().len(), 7);
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_arrows_cycle_select_field() {
        let mut app = test_app(Some(FormKind::Accreditation));
        let view = |app: &App| app.session.field_view(0).unwrap();
        press(&mut app, KeyCode::Right);
        assert_eq!(view(&app).value, Some(FieldValue::Text("institutional".to_string())));
        press(&mut app, KeyCode::Right);
        assert_eq!(view(&app).value, Some(FieldValue::Text("program".to_string())));
        press(&mut app, KeyCode::Left);
        assert_eq!(view(&app).display, "Institutional accreditation");
    }

    #[test]
    fn test_ctrl_e_opens_export_prompt() {
        let mut app = test_app(Some(FormKind::Partnership));
        InputHandler::handle_key_event(&mut app, KeyCode::Char('e'), KeyModifiers::CONTROL);
        assert_eq!(app.mode, AppMode::ExportCsv);
        assert_eq!(app.filename_input, "partnership-application.csv");
    }

    #[test]
    fn test_export_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let mut app = test_app(Some(FormKind::Partnership));
        app.start_csv_export();
        app.filename_input = path.to_str().unwrap().to_string();
        app.cursor_position = app.filename_input.chars().count();
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, AppMode::Normal);
        assert!(path.exists());
        assert!(app.status_message.unwrap().starts_with("Exported to"));
    }

    #[test]
    fn test_attach_document_through_prompt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("transcript.png");
        fs::write(&path, vec![0u8; 100]).unwrap();

        let mut app = test_app(Some(FormKind::Recognition));
        app.start_attach_file();
        type_str(&mut app, path.to_str().unwrap());
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, AppMode::Normal);
        let documents = app.session.documents();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].size_bytes, 100);
    }

    #[test]
    fn test_attach_missing_document_reports_error() {
        let mut app = test_app(Some(FormKind::Recognition));
        app.start_attach_file();
        type_str(&mut app, "/definitely/not/here.pdf");
        press(&mut app, KeyCode::Enter);

        assert!(app.session.documents().is_empty());
        assert!(app.status_message.unwrap().starts_with("Attach failed"));
    }

    #[test]
    fn test_settings_panel_keys() {
        let mut app = test_app(Some(FormKind::Partnership));
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.mode, AppMode::Settings);

        press(&mut app, KeyCode::Enter);
        assert!(app.settings.high_contrast);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('-'));
        assert_eq!(app.settings.font_size, 14);
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.settings.font_size, 16);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_space_toggles_declaration() {
        let mut app = test_app(Some(FormKind::Partnership));
        fill_partnership(&mut app);
        let checked = |app: &App| app.session.field_view(0).unwrap().value;
        assert_eq!(checked(&app), Some(FieldValue::Flag(true)));

        press(&mut app, KeyCode::Char(' '));
        assert_eq!(checked(&app), Some(FieldValue::Flag(false)));
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(checked(&app), Some(FieldValue::Flag(true)));
    }

    #[test]
    fn test_help_from_selection_returns_there() {
        let mut app = test_app(None);
        press(&mut app, KeyCode::F(1));
        assert_eq!(app.mode, AppMode::Help);
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.mode, AppMode::SelectForm);
    }

    #[test]
    fn test_help_opens_and_closes() {
        let mut app = test_app(Some(FormKind::Partnership));
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.mode, AppMode::Help);
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.help_scroll, 5);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
    }
}
