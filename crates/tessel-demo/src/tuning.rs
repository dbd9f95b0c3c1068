//! Keyboard controls for the live scene parameters.

use glam::Vec3;

use tessel_engine::core::AppControl;
use tessel_engine::input::{InputFrame, InputState, Key, MouseButton};
use tessel_engine::render::Scene;

pub const HELP: &str = "controls: Space pause | Up/Down speed | Left/Right/W/S orbit | \
PageUp/PageDown zoom | drag/wheel camera | J/L I/K U/O move light | R reset | Esc quit";

const SPEED_STEP: f32 = 0.05;
/// Radians per second.
const ORBIT_RATE: f32 = 1.0;
/// Units per second.
const ZOOM_RATE: f32 = 40.0;
const LIGHT_RATE: f32 = 20.0;
/// Radians per logical pixel of left-button drag.
const DRAG_RATE: f32 = 0.01;
const WHEEL_STEP: f32 = 2.0;

fn axis(input: &InputState, negative: Key, positive: Key) -> f32 {
    match (input.key_down(negative), input.key_down(positive)) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    }
}

/// Apply this frame's key presses and held keys to `scene`.
///
/// `dt` is the unscaled frame time; pausing does not freeze the controls.
pub fn apply(input: &InputState, frame: &InputFrame, scene: &mut Scene, dt: f32) -> AppControl {
    if frame.pressed(Key::Escape) {
        return AppControl::Exit;
    }

    if frame.pressed(Key::Space) {
        scene.settings.paused = !scene.settings.paused;
        log::info!("paused: {}", scene.settings.paused);
    }
    let speed = (frame.pressed(Key::ArrowUp) as i32 - frame.pressed(Key::ArrowDown) as i32) as f32;
    if speed != 0.0 {
        scene.settings.adjust_speed(speed * SPEED_STEP);
        log::info!("simulation speed: {:.2}", scene.settings.speed_factor);
    }
    if frame.pressed(Key::R) {
        scene.reset();
        log::info!("camera and light reset");
    }

    scene.camera.orbit(
        axis(input, Key::ArrowLeft, Key::ArrowRight) * ORBIT_RATE * dt,
        axis(input, Key::S, Key::W) * ORBIT_RATE * dt,
    );
    scene
        .camera
        .zoom(axis(input, Key::PageUp, Key::PageDown) * ZOOM_RATE * dt);

    if input.button_down(MouseButton::Left) {
        let (dx, dy) = frame.pointer_delta;
        scene.camera.orbit(dx * DRAG_RATE, dy * DRAG_RATE);
    }
    if frame.wheel_lines != 0.0 {
        scene.camera.zoom(-frame.wheel_lines * WHEEL_STEP);
    }

    let light = Vec3::new(
        axis(input, Key::J, Key::L),
        axis(input, Key::K, Key::I),
        axis(input, Key::U, Key::O),
    );
    if light != Vec3::ZERO {
        scene.light.translate(light * LIGHT_RATE * dt);
    }

    AppControl::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessel_engine::gfx::HeadlessDevice;
    use tessel_engine::input::{ButtonState, InputEvent};
    use tessel_engine::render::{Graphics, GraphicsConfig, PointLight, SceneCamera};

    fn scene() -> Scene {
        let mut gfx = Graphics::new(Box::new(HeadlessDevice::new()), GraphicsConfig::default());
        Scene::new(PointLight::new(&mut gfx, 0.5).unwrap())
    }

    fn press(input: &mut InputState, frame: &mut InputFrame, key: Key) {
        input.apply_event(
            frame,
            InputEvent::Key {
                key,
                state: ButtonState::Pressed,
                repeat: false,
            },
        );
    }

    #[test]
    fn space_toggles_pause() {
        let mut scene = scene();
        let (mut input, mut frame) = (InputState::default(), InputFrame::default());
        press(&mut input, &mut frame, Key::Space);
        apply(&input, &frame, &mut scene, 0.016);
        assert!(scene.settings.paused);
        assert_eq!(scene.settings.effective_speed(), 0.0);
    }

    #[test]
    fn arrows_step_speed() {
        let mut scene = scene();
        let (mut input, mut frame) = (InputState::default(), InputFrame::default());
        press(&mut input, &mut frame, Key::ArrowUp);
        apply(&input, &frame, &mut scene, 0.016);
        assert!((scene.settings.speed_factor - 0.26).abs() < 1e-6);
    }

    #[test]
    fn held_keys_orbit_by_time() {
        let mut scene = scene();
        let (mut input, mut frame) = (InputState::default(), InputFrame::default());
        press(&mut input, &mut frame, Key::ArrowRight);
        frame.clear();
        apply(&input, &frame, &mut scene, 0.5);
        assert!((scene.camera.theta - 0.5).abs() < 1e-6);
    }

    #[test]
    fn left_drag_orbits_and_wheel_zooms() {
        let mut scene = scene();
        let (mut input, mut frame) = (InputState::default(), InputFrame::default());
        input.apply_event(&mut frame, InputEvent::PointerMoved { x: 10.0, y: 10.0 });
        input.apply_event(
            &mut frame,
            InputEvent::Button {
                button: MouseButton::Left,
                state: ButtonState::Pressed,
            },
        );
        input.apply_event(&mut frame, InputEvent::PointerMoved { x: 60.0, y: 10.0 });
        input.apply_event(&mut frame, InputEvent::Wheel { lines: 1.0 });
        apply(&input, &frame, &mut scene, 0.0);

        assert!((scene.camera.theta - 0.5).abs() < 1e-6);
        assert_eq!(scene.camera.phi, 0.0);
        assert!((scene.camera.distance - 68.0).abs() < 1e-4);
    }

    #[test]
    fn reset_and_escape() {
        let mut scene = scene();
        scene.camera.distance = 3.0;
        let (mut input, mut frame) = (InputState::default(), InputFrame::default());
        press(&mut input, &mut frame, Key::R);
        assert_eq!(apply(&input, &frame, &mut scene, 0.0), AppControl::Continue);
        assert_eq!(scene.camera, SceneCamera::default());

        press(&mut input, &mut frame, Key::Escape);
        assert_eq!(apply(&input, &frame, &mut scene, 0.0), AppControl::Exit);
    }
}
