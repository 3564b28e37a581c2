//! Frame-accurate input state tracking
//!
//! Raw events arrive on the platform's event-delivery thread while the
//! scheduler thread clears per-frame latches and the host queries during
//! `update`/`render`, so every operation takes `&self` and locks interior
//! state. Only point queries are exposed — never iteration over the maps.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// A tracked pointer button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

impl PointerButton {
    /// Map a winit mouse button to a tracked button, if it is one of the
    /// three tracked ones
    pub fn from_winit(button: MouseButton) -> Option<Self> {
        match button {
            MouseButton::Left => Some(Self::Left),
            MouseButton::Middle => Some(Self::Middle),
            MouseButton::Right => Some(Self::Right),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Middle => 1,
            Self::Right => 2,
        }
    }
}

/// Per-key classification
#[derive(Debug, Clone, Copy, Default)]
struct KeyFlags {
    held: bool,
    pressed: bool,
    clicked: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct ButtonFlags {
    down: bool,
    clicked: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct PointerState {
    x: f64,
    y: f64,
    inside: bool,
    buttons: [ButtonFlags; 3],
    wheel_delta: f64,
    wheel_total: f64,
}

/// Tri-state keyboard and pointer tracking shared across threads
///
/// Per key: `held` persists until an explicit release, `pressed` latches on
/// every raw key-down (including OS auto-repeat), `clicked` latches only on
/// the down that transitioned the key from released to held. The `pressed`
/// and `clicked` latches are cleared at every frame boundary by the loop
/// controller.
///
/// Key entries are created lazily and never individually removed; a released
/// key stays resident with all flags low until `reset()` drops the map.
pub struct InputTracker {
    keys: Mutex<HashMap<KeyCode, KeyFlags>>,
    pointer: Mutex<PointerState>,
}

impl Default for InputTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl InputTracker {
    pub fn new() -> Self {
        Self {
            keys: Mutex::new(HashMap::new()),
            pointer: Mutex::new(PointerState::default()),
        }
    }

    // The flags are plain values, so a lock poisoned by a panicking holder
    // still yields usable state.
    fn keys(&self) -> MutexGuard<'_, HashMap<KeyCode, KeyFlags>> {
        self.keys.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn pointer(&self) -> MutexGuard<'_, PointerState> {
        self.pointer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // --- Recording (the host's raw-event delivery path) ---

    /// Record a raw key-down signal, including OS auto-repeat deliveries
    pub fn record_key_down(&self, key: KeyCode) {
        let mut keys = self.keys();
        let flags = keys.entry(key).or_default();
        flags.pressed = true;
        if !flags.held {
            flags.held = true;
            flags.clicked = true;
        }
    }

    /// Record a raw key-up signal. Latches already set this frame survive
    /// until the frame boundary.
    pub fn record_key_up(&self, key: KeyCode) {
        self.keys().entry(key).or_default().held = false;
    }

    /// Record the pointer's surface-local position
    pub fn record_pointer_move(&self, x: f64, y: f64) {
        let mut pointer = self.pointer();
        pointer.x = x;
        pointer.y = y;
    }

    /// Record a raw button-down signal
    pub fn record_button_down(&self, button: PointerButton) {
        self.pointer().buttons[button.index()].down = true;
    }

    /// Record a raw button-up signal
    pub fn record_button_up(&self, button: PointerButton) {
        self.pointer().buttons[button.index()].down = false;
    }

    /// Record a raw click signal (a platform click event, distinct from the
    /// down transition)
    pub fn record_button_click(&self, button: PointerButton) {
        self.pointer().buttons[button.index()].clicked = true;
    }

    /// Record a raw wheel signal. The per-frame delta takes the latest
    /// value; the running total accumulates.
    pub fn record_wheel(&self, delta: f64) {
        let mut pointer = self.pointer();
        pointer.wheel_delta = delta;
        pointer.wheel_total += delta;
    }

    /// Record the pointer entering the surface
    pub fn record_enter(&self) {
        self.pointer().inside = true;
    }

    /// Record the pointer leaving the surface
    pub fn record_exit(&self) {
        self.pointer().inside = false;
    }

    // --- Queries (readable from any thread) ---

    /// Is the key currently down?
    pub fn is_held(&self, key: KeyCode) -> bool {
        self.keys().get(&key).is_some_and(|f| f.held)
    }

    /// Was a key-down signal observed since the last frame boundary?
    ///
    /// Follows OS auto-repeat: while the key is held down, platforms that
    /// deliver repeat events keep re-latching this every frame. On platforms
    /// without repeat delivery it coincides with [`is_clicked`](Self::is_clicked).
    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.keys().get(&key).is_some_and(|f| f.pressed)
    }

    /// Did the key transition from released to held since the last frame
    /// boundary?
    pub fn is_clicked(&self, key: KeyCode) -> bool {
        self.keys().get(&key).is_some_and(|f| f.clicked)
    }

    /// Last known surface-local pointer position
    pub fn pointer_position(&self) -> (f64, f64) {
        let pointer = self.pointer();
        (pointer.x, pointer.y)
    }

    /// Is the pointer inside the surface?
    pub fn is_pointer_inside(&self) -> bool {
        self.pointer().inside
    }

    /// Is the button currently down?
    pub fn is_button_down(&self, button: PointerButton) -> bool {
        self.pointer().buttons[button.index()].down
    }

    /// Was a click signal observed since the last frame boundary?
    pub fn is_button_clicked(&self, button: PointerButton) -> bool {
        self.pointer().buttons[button.index()].clicked
    }

    /// Wheel movement since the last frame boundary
    pub fn wheel_delta(&self) -> f64 {
        self.pointer().wheel_delta
    }

    /// Wheel movement accumulated since construction or the last `reset()`
    pub fn wheel_total(&self) -> f64 {
        self.pointer().wheel_total
    }

    // --- Frame boundary and reset ---

    /// Clear every per-frame latch: key `pressed`/`clicked`, button
    /// `clicked`, and the wheel delta
    ///
    /// Called by the loop controller after each iteration that produced at
    /// least one tick. Hosts driving their own loop call it once per frame.
    pub fn end_frame(&self) {
        for flags in self.keys().values_mut() {
            flags.pressed = false;
            flags.clicked = false;
        }
        let mut pointer = self.pointer();
        for button in &mut pointer.buttons {
            button.clicked = false;
        }
        pointer.wheel_delta = 0.0;
    }

    /// Discard all key and pointer state, transient and persistent, back to
    /// freshly-constructed defaults
    pub fn reset(&self) {
        self.keys().clear();
        *self.pointer() = PointerState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_down_transition_rule() {
        let input = InputTracker::new();

        input.record_key_down(KeyCode::KeyW);
        assert!(input.is_held(KeyCode::KeyW));
        assert!(input.is_pressed(KeyCode::KeyW));
        assert!(input.is_clicked(KeyCode::KeyW));

        // A repeat down while held re-latches pressed but not clicked
        input.end_frame();
        input.record_key_down(KeyCode::KeyW);
        assert!(input.is_held(KeyCode::KeyW));
        assert!(input.is_pressed(KeyCode::KeyW));
        assert!(!input.is_clicked(KeyCode::KeyW));
    }

    #[test]
    fn test_down_down_down_up_sequence() {
        let input = InputTracker::new();

        // Frame 1: first down
        input.record_key_down(KeyCode::Space);
        assert!(input.is_clicked(KeyCode::Space));
        assert!(input.is_pressed(KeyCode::Space));
        assert!(input.is_held(KeyCode::Space));
        input.end_frame();

        // Frames 2 and 3: repeats
        for _ in 0..2 {
            input.record_key_down(KeyCode::Space);
            assert!(!input.is_clicked(KeyCode::Space));
            assert!(input.is_pressed(KeyCode::Space));
            assert!(input.is_held(KeyCode::Space));
            input.end_frame();
        }

        // Frame 4: release
        input.record_key_up(KeyCode::Space);
        assert!(!input.is_held(KeyCode::Space));
        assert!(!input.is_pressed(KeyCode::Space));
        assert!(!input.is_clicked(KeyCode::Space));
    }

    #[test]
    fn test_key_up_preserves_latches_until_frame_boundary() {
        let input = InputTracker::new();

        input.record_key_down(KeyCode::KeyA);
        input.record_key_up(KeyCode::KeyA);
        // Down and up within one frame: the press is still observable
        assert!(!input.is_held(KeyCode::KeyA));
        assert!(input.is_pressed(KeyCode::KeyA));
        assert!(input.is_clicked(KeyCode::KeyA));

        input.end_frame();
        assert!(!input.is_pressed(KeyCode::KeyA));
        assert!(!input.is_clicked(KeyCode::KeyA));
    }

    #[test]
    fn test_held_persists_across_frames() {
        let input = InputTracker::new();
        input.record_key_down(KeyCode::KeyD);
        for _ in 0..5 {
            input.end_frame();
            assert!(input.is_held(KeyCode::KeyD));
        }
        input.record_key_up(KeyCode::KeyD);
        assert!(!input.is_held(KeyCode::KeyD));
    }

    #[test]
    fn test_pointer_buttons() {
        let input = InputTracker::new();

        input.record_button_down(PointerButton::Left);
        assert!(input.is_button_down(PointerButton::Left));
        assert!(!input.is_button_clicked(PointerButton::Left));

        // Click is its own signal, cleared at the frame boundary
        input.record_button_click(PointerButton::Left);
        assert!(input.is_button_clicked(PointerButton::Left));
        input.end_frame();
        assert!(!input.is_button_clicked(PointerButton::Left));
        assert!(input.is_button_down(PointerButton::Left));

        input.record_button_up(PointerButton::Left);
        assert!(!input.is_button_down(PointerButton::Left));
        assert!(!input.is_button_down(PointerButton::Middle));
        assert!(!input.is_button_down(PointerButton::Right));
    }

    #[test]
    fn test_pointer_position_and_enter_exit() {
        let input = InputTracker::new();
        assert!(!input.is_pointer_inside());

        input.record_enter();
        input.record_pointer_move(120.5, 42.0);
        assert!(input.is_pointer_inside());
        assert_eq!(input.pointer_position(), (120.5, 42.0));

        input.record_exit();
        assert!(!input.is_pointer_inside());
        // Position is last-known, not cleared on exit
        assert_eq!(input.pointer_position(), (120.5, 42.0));
    }

    #[test]
    fn test_wheel_delta_and_total() {
        let input = InputTracker::new();

        input.record_wheel(1.5);
        input.record_wheel(-0.5);
        // Delta takes the latest signal; the total accumulates
        assert!((input.wheel_delta() - (-0.5)).abs() < 1e-10);
        assert!((input.wheel_total() - 1.0).abs() < 1e-10);

        input.end_frame();
        assert_eq!(input.wheel_delta(), 0.0);
        assert!((input.wheel_total() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_reset_matches_fresh_tracker() {
        let input = InputTracker::new();
        input.record_key_down(KeyCode::KeyW);
        input.record_button_down(PointerButton::Right);
        input.record_button_click(PointerButton::Right);
        input.record_pointer_move(10.0, 20.0);
        input.record_wheel(3.0);
        input.record_enter();

        input.reset();

        let fresh = InputTracker::new();
        assert_eq!(input.is_held(KeyCode::KeyW), fresh.is_held(KeyCode::KeyW));
        assert_eq!(
            input.is_pressed(KeyCode::KeyW),
            fresh.is_pressed(KeyCode::KeyW)
        );
        assert_eq!(
            input.is_clicked(KeyCode::KeyW),
            fresh.is_clicked(KeyCode::KeyW)
        );
        assert_eq!(
            input.is_button_down(PointerButton::Right),
            fresh.is_button_down(PointerButton::Right)
        );
        assert_eq!(
            input.is_button_clicked(PointerButton::Right),
            fresh.is_button_clicked(PointerButton::Right)
        );
        assert_eq!(input.pointer_position(), fresh.pointer_position());
        assert_eq!(input.is_pointer_inside(), fresh.is_pointer_inside());
        assert_eq!(input.wheel_delta(), fresh.wheel_delta());
        assert_eq!(input.wheel_total(), fresh.wheel_total());
    }

    #[test]
    fn test_from_winit_buttons() {
        assert_eq!(
            PointerButton::from_winit(MouseButton::Left),
            Some(PointerButton::Left)
        );
        assert_eq!(
            PointerButton::from_winit(MouseButton::Middle),
            Some(PointerButton::Middle)
        );
        assert_eq!(
            PointerButton::from_winit(MouseButton::Right),
            Some(PointerButton::Right)
        );
        assert_eq!(PointerButton::from_winit(MouseButton::Back), None);
    }

    #[test]
    fn test_concurrent_record_and_query() {
        use std::sync::Arc;

        let input = Arc::new(InputTracker::new());
        let writer = Arc::clone(&input);

        let handle = std::thread::spawn(move || {
            for _ in 0..1000 {
                writer.record_key_down(KeyCode::KeyW);
                writer.record_wheel(1.0);
                writer.record_key_up(KeyCode::KeyW);
            }
        });

        // Concurrent reads and frame clears must not deadlock or panic
        for _ in 0..1000 {
            let _ = input.is_pressed(KeyCode::KeyW);
            input.end_frame();
        }

        handle.join().unwrap();
        assert!(input.wheel_total() > 0.0);
    }
}
