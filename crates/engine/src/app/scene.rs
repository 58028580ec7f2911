use super::input::{ActionStates, InputAction};
use super::rendering::FramePainter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    Quit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

/// Per-tick view of collected input. Held actions report their current state;
/// `*_pressed` accessors are edges that fire for exactly one snapshot per
/// physical key press.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    quit_requested: bool,
    actions: ActionStates,
    confirm_pressed: bool,
    regenerate_pressed: bool,
    cancel_pressed: bool,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(
        quit_requested: bool,
        actions: ActionStates,
        confirm_pressed: bool,
        regenerate_pressed: bool,
        cancel_pressed: bool,
    ) -> Self {
        Self {
            quit_requested,
            actions,
            confirm_pressed,
            regenerate_pressed,
            cancel_pressed,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn confirm_pressed(&self) -> bool {
        self.confirm_pressed
    }

    pub fn regenerate_pressed(&self) -> bool {
        self.regenerate_pressed
    }

    pub fn cancel_pressed(&self) -> bool {
        self.cancel_pressed
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_confirm_pressed(mut self, confirm_pressed: bool) -> Self {
        self.confirm_pressed = confirm_pressed;
        self
    }

    pub fn with_regenerate_pressed(mut self, regenerate_pressed: bool) -> Self {
        self.regenerate_pressed = regenerate_pressed;
        self
    }

    pub fn with_cancel_pressed(mut self, cancel_pressed: bool) -> Self {
        self.cancel_pressed = cancel_pressed;
        self
    }

    pub fn with_quit_requested(mut self, quit_requested: bool) -> Self {
        self.quit_requested = quit_requested;
        self
    }
}

/// A scene owns all of its own state. The loop calls `update` once per frame
/// with the scale of the nominal step that frame represents, then `render`
/// into the current frame.
pub trait Scene {
    fn load(&mut self);
    fn update(&mut self, step_scale: f32, input: &InputSnapshot) -> SceneCommand;
    fn render(&mut self, painter: &mut FramePainter<'_>);
    fn unload(&mut self);
    fn debug_title(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_reports_nothing() {
        let snapshot = InputSnapshot::empty();
        assert!(!snapshot.quit_requested());
        assert!(!snapshot.is_down(InputAction::MoveLeft));
        assert!(!snapshot.is_down(InputAction::MoveRight));
        assert!(!snapshot.is_down(InputAction::Jump));
        assert!(!snapshot.confirm_pressed());
        assert!(!snapshot.regenerate_pressed());
        assert!(!snapshot.cancel_pressed());
    }

    #[test]
    fn builders_set_individual_fields() {
        let snapshot = InputSnapshot::empty()
            .with_action_down(InputAction::Jump, true)
            .with_confirm_pressed(true);

        assert!(snapshot.is_down(InputAction::Jump));
        assert!(snapshot.confirm_pressed());
        assert!(!snapshot.is_down(InputAction::MoveLeft));
        assert!(!snapshot.regenerate_pressed());
    }

    #[test]
    fn actions_toggle_independently() {
        let snapshot = InputSnapshot::empty()
            .with_action_down(InputAction::MoveLeft, true)
            .with_action_down(InputAction::MoveRight, true)
            .with_action_down(InputAction::MoveLeft, false);

        assert!(!snapshot.is_down(InputAction::MoveLeft));
        assert!(snapshot.is_down(InputAction::MoveRight));
    }
}
