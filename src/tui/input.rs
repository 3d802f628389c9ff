//! Key handling

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{App, Pane, View};
use crate::coach::QUICK_PROMPTS;
use crate::exercises::{cycle_option, distinct};
use crate::form::Field;
use crate::store::Intensity;

impl App {
    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
            self.quit();
            return;
        }
        if self.splash_active() {
            return;
        }
        if ctrl && key.code == KeyCode::Char('t') {
            self.toggle_theme();
            return;
        }
        if let KeyCode::F(n) = key.code
            && let Some(view) = View::all().get(usize::from(n).wrapping_sub(1))
        {
            self.view = *view;
            self.status = None;
            return;
        }

        if self.feedback.is_some() {
            self.feedback_key(key);
            return;
        }

        match self.view {
            View::Tracker => match self.pane {
                Pane::Form => self.form_key(key, ctrl, alt),
                Pane::Routine => self.routine_key(key),
            },
            View::Coach => self.coach_key(key, alt),
            View::Search => {
                if key.code == KeyCode::Enter {
                    self.run_search();
                } else if !self.search_loading {
                    edit_text(&mut self.search_input, key);
                }
            }
            View::Analytics => {
                if key.code == KeyCode::Char('q') {
                    self.quit();
                }
            }
            View::Library => self.library_key(key),
        }
    }

    fn form_key(&mut self, key: KeyEvent, ctrl: bool, alt: bool) {
        if alt
            && let KeyCode::Char(c) = key.code
            && let Some(digit) = c.to_digit(10)
        {
            self.apply_suggestion((digit as usize).saturating_sub(1));
            return;
        }
        if ctrl && key.code == KeyCode::Char('s') {
            self.request_suggestions();
            return;
        }

        match key.code {
            KeyCode::Tab => self.pane = Pane::Routine,
            KeyCode::Enter => self.submit_form(),
            KeyCode::Esc if self.form.is_editing() => self.cancel_edit(),
            KeyCode::Up => self.active_field = self.active_field.prev(),
            KeyCode::Down => self.active_field = self.active_field.next(),
            KeyCode::Left | KeyCode::Right if self.active_field == Field::Intensity => {
                let current = self.form.intensity.parse::<Intensity>().ok();
                let all = Intensity::all();
                let next = match (current, key.code) {
                    (None, _) => Intensity::Medium,
                    (Some(i), KeyCode::Right) => {
                        let idx = all.iter().position(|x| *x == i).unwrap_or(0);
                        all[(idx + 1) % all.len()]
                    }
                    (Some(i), _) => {
                        let idx = all.iter().position(|x| *x == i).unwrap_or(0);
                        all[(idx + all.len() - 1) % all.len()]
                    }
                };
                self.form.intensity = next.name().to_string();
            }
            KeyCode::Left => self.select_day(self.form.day().prev()),
            KeyCode::Right => self.select_day(self.form.day().next()),
            _ => {
                if self.active_field == Field::Focus && self.form.focus_locked(&self.snapshot) {
                    return;
                }
                edit_text(self.form.field_mut(self.active_field), key);
            }
        }
    }

    fn routine_key(&mut self, key: KeyEvent) {
        if self.confirm_clear {
            if key.code == KeyCode::Char('y') {
                self.clear_routine();
            } else {
                self.confirm_clear = false;
            }
            return;
        }

        let rows = self.routine_rows().len();
        match key.code {
            KeyCode::Tab | KeyCode::Esc => self.pane = Pane::Form,
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < rows {
                    self.selected += 1;
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_selected(),
            KeyCode::Char('e') => self.start_edit_selected(),
            KeyCode::Char('f') => self.open_feedback(),
            KeyCode::Char('c') if rows > 0 => self.confirm_clear = true,
            KeyCode::Char('q') => self.quit(),
            _ => {}
        }
    }

    fn coach_key(&mut self, key: KeyEvent, alt: bool) {
        if alt
            && self.chat_log.is_empty()
            && let KeyCode::Char(c) = key.code
            && let Some(prompt) = c
                .to_digit(10)
                .and_then(|d| QUICK_PROMPTS.get((d as usize).wrapping_sub(1)))
        {
            self.send_chat(prompt.text.to_string());
            return;
        }

        if key.code == KeyCode::Enter {
            let message = self.chat_input.clone();
            self.send_chat(message);
        } else if !self.chat_loading {
            edit_text(&mut self.chat_input, key);
        }
    }

    fn library_key(&mut self, key: KeyEvent) {
        let filter = &mut self.library_filter;
        match key.code {
            KeyCode::Char('m') => {
                filter.muscle_group = cycle_option(&distinct(|e| e.muscle_group), filter.muscle_group)
            }
            KeyCode::Char('d') => {
                filter.difficulty = cycle_option(&distinct(|e| e.difficulty), filter.difficulty)
            }
            KeyCode::Char('e') => {
                filter.equipment = cycle_option(&distinct(|e| e.equipment), filter.equipment)
            }
            KeyCode::Char('r') => *filter = Default::default(),
            KeyCode::Char('q') => self.quit(),
            _ => {}
        }
    }

    fn feedback_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.feedback = None,
            KeyCode::Enter => self.request_feedback(),
            _ => {
                if let Some(modal) = self.feedback.as_mut()
                    && !modal.loading
                {
                    edit_text(&mut modal.image_path, key);
                }
            }
        }
    }
}

/// Minimal line editing: append printable chars, backspace removes the last
fn edit_text(buffer: &mut String, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => buffer.push(c),
        KeyCode::Backspace => {
            buffer.pop();
        }
        _ => {}
    }
}
