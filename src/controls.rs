//! Keyboard control panel: one labeled numeric control per tree parameter.

use crate::config::{Control, TreeParams};
use crossterm::event::{KeyCode, KeyModifiers};

/// What a key press asks the viewer to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelAction {
    Quit,
    Help,
    ToggleRotate,
    /// Selection moved; only the panel changes
    Select,
    /// New parameters; the frame must be redrawn
    Update(TreeParams),
    Ignored,
}

/// Selection state of the panel
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlPanel {
    selected: usize,
}

impl ControlPanel {
    pub fn selected(&self) -> Control {
        Control::ALL[self.selected]
    }

    /// Handle keypress against the current parameters
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers, params: &TreeParams) -> PanelAction {
        // Shift moves five steps at a time
        let stride = if modifiers.contains(KeyModifiers::SHIFT) { 5 } else { 1 };
        match code {
            KeyCode::Char('q') | KeyCode::Esc => PanelAction::Quit,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => PanelAction::Quit,
            KeyCode::Char('?') => PanelAction::Help,
            KeyCode::Char('r') | KeyCode::Char(' ') => PanelAction::ToggleRotate,
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = (self.selected + Control::ALL.len() - 1) % Control::ALL.len();
                PanelAction::Select
            }
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
                self.selected = (self.selected + 1) % Control::ALL.len();
                PanelAction::Select
            }
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') => self.nudge(params, -stride),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') => self.nudge(params, stride),
            KeyCode::Home => self.jump(params, |c| c.range().min),
            KeyCode::End => self.jump(params, |c| c.range().max),
            _ => PanelAction::Ignored,
        }
    }

    fn nudge(&self, params: &TreeParams, steps: i32) -> PanelAction {
        let control = self.selected();
        let value = control.range().step_by(control.get(params), steps);
        self.update(params, control, value)
    }

    fn jump(&self, params: &TreeParams, target: impl Fn(Control) -> f64) -> PanelAction {
        let control = self.selected();
        self.update(params, control, target(control))
    }

    fn update(&self, params: &TreeParams, control: Control, value: f64) -> PanelAction {
        let next = control.set(*params, value);
        if next == *params {
            PanelAction::Ignored
        } else {
            PanelAction::Update(next)
        }
    }

    /// Panel text, one line per control, selection marked with `>`
    pub fn lines(&self, params: &TreeParams) -> Vec<String> {
        Control::ALL
            .iter()
            .enumerate()
            .map(|(i, control)| {
                let marker = if i == self.selected { '>' } else { ' ' };
                let r = control.range();
                format!(
                    "{} {:<18} {:>6}  [{}..{}]",
                    marker,
                    control.label(),
                    control.format(params),
                    r.min,
                    r.max
                )
            })
            .collect()
    }
}
