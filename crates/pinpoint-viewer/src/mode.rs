//! Custom interaction mode trait

use crate::event::SurfaceEvent;

/// A custom interaction mode hosted by a viewer.
///
/// The host forwards surface events to the mode selected on that surface.
/// Handlers return `true` when they consumed the event; every default
/// implementation declines so the host (or another collaborator) can act.
pub trait InteractionMode {
    /// Human-readable name for this mode
    fn name(&self) -> &str;

    /// The surface's active mode or edit-mode flag changed
    fn on_scene_mode_changed(&mut self, _event: &SurfaceEvent<'_>) {}

    fn on_pointer_move(&mut self, _event: &SurfaceEvent<'_>) -> bool {
        false
    }

    /// Pointer left the surface
    fn on_pointer_leave(&mut self, _event: &SurfaceEvent<'_>) {}

    fn on_button_press(&mut self, _event: &SurfaceEvent<'_>) -> bool {
        false
    }

    fn on_button_release(&mut self, _event: &SurfaceEvent<'_>) -> bool {
        false
    }

    fn on_double_click(&mut self, _event: &SurfaceEvent<'_>) -> bool {
        false
    }

    fn on_key_press(&mut self, _event: &SurfaceEvent<'_>) -> bool {
        false
    }

    fn on_key_release(&mut self, _event: &SurfaceEvent<'_>) -> bool {
        false
    }

    /// Contribute entries to a context menu; `false` leaves the menu untouched
    fn on_context_menu_request(&mut self, _event: &SurfaceEvent<'_>) -> bool {
        false
    }

    fn on_undo_request(&mut self) -> bool {
        false
    }

    fn on_redo_request(&mut self) -> bool {
        false
    }
}
