//! Scene loop: drawables plus one light, stepped and drawn once per frame.

use rand::Rng;

use super::camera::SceneCamera;
use super::context::Graphics;
use super::drawable::{Drawable, Motion};
use super::error::RenderError;
use super::light::PointLight;
use super::shapes::{Cube, Mesh, Plane, Prism, Pyramid, Shape, Surface};

/// Model spawned alongside the procedural shapes by [`Scene::populate`].
pub const DEMO_MESH: &str = "models/torus.obj";

const MAX_SPEED: f32 = 1.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SceneSettings {
    /// Multiplier on frame time, 0..=1.
    pub speed_factor: f32,
    pub paused: bool,
    pub clear_color: [f32; 4],
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            speed_factor: 0.21,
            paused: false,
            clear_color: [0.2, 0.2, 0.2, 1.0],
        }
    }
}

impl SceneSettings {
    /// Speed actually applied this frame; zero while paused.
    pub fn effective_speed(&self) -> f32 {
        if self.paused { 0.0 } else { self.speed_factor }
    }

    pub fn adjust_speed(&mut self, delta: f32) {
        self.speed_factor = (self.speed_factor + delta).clamp(0.0, MAX_SPEED);
    }
}

pub struct Scene {
    drawables: Vec<Box<dyn Drawable>>,
    pub light: PointLight,
    pub camera: SceneCamera,
    pub settings: SceneSettings,
}

impl Scene {
    pub fn new(light: PointLight) -> Self {
        Self {
            drawables: Vec::new(),
            light,
            camera: SceneCamera::default(),
            settings: SceneSettings::default(),
        }
    }

    pub fn push(&mut self, drawable: impl Drawable + 'static) {
        self.drawables.push(Box::new(drawable));
    }

    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    /// Spawn `per_kind` randomly moving instances of every demo shape.
    pub fn populate(
        &mut self,
        gfx: &mut Graphics,
        rng: &mut impl Rng,
        per_kind: usize,
    ) -> Result<(), RenderError> {
        let mesh = Mesh::new(DEMO_MESH, 1.0);
        for _ in 0..per_kind {
            self.push(Plane.spawn(gfx, Motion::random(rng))?);
            self.push(Cube.spawn(gfx, Motion::random(rng))?);
            self.push(Pyramid.spawn(gfx, Motion::random(rng))?);
            self.push(Prism.spawn(gfx, Motion::random(rng))?);
            self.push(Surface.spawn(gfx, Motion::random(rng))?);
            self.push(mesh.spawn(gfx, Motion::random(rng))?);
        }
        log::info!(
            "scene populated: {} drawables across {} kinds",
            self.drawables.len(),
            gfx.shared().len()
        );
        Ok(())
    }

    /// One frame: bind the light, step and draw every drawable in order, then
    /// draw the light marker. Stops at the first error.
    pub fn frame(&mut self, gfx: &mut Graphics, dt: f32) -> Result<(), RenderError> {
        gfx.set_view(self.camera.view());
        self.light.bind(gfx)?;
        let step = dt * self.settings.effective_speed();
        for drawable in &mut self.drawables {
            drawable.update(step);
            drawable.draw(gfx)?;
        }
        self.light.draw(gfx)
    }

    /// Restore camera and light to their defaults.
    pub fn reset(&mut self) {
        self.camera.reset();
        self.light.reset();
    }

    /// Release what each drawable owns, then the light's constant buffer.
    pub fn release(self, gfx: &mut Graphics) -> Result<(), RenderError> {
        for drawable in self.drawables {
            drawable.release(gfx)?;
        }
        self.light.release(gfx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{Call, HeadlessDevice, ShaderStage};
    use crate::render::context::GraphicsConfig;
    use crate::render::bindable::{Bindable, Texture};
    use crate::render::color::Rgba8;
    use crate::render::drawable::Instance;
    use crate::render::image::Image;
    use glam::Mat4;
    use rand::SeedableRng;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records the steps it is updated with and delegates drawing.
    struct Recorder {
        inner: Instance,
        steps: Rc<RefCell<Vec<f32>>>,
    }

    impl Drawable for Recorder {
        fn update(&mut self, dt: f32) {
            self.steps.borrow_mut().push(dt);
            self.inner.update(dt);
        }

        fn transform(&self) -> Mat4 {
            self.inner.transform()
        }

        fn draw(&self, gfx: &mut Graphics) -> Result<(), RenderError> {
            self.inner.draw(gfx)
        }

        fn release(self: Box<Self>, gfx: &mut Graphics) -> Result<(), RenderError> {
            self.inner.release(gfx)
        }
    }

    fn setup() -> (Graphics, Scene, crate::gfx::CallLog) {
        let dev = HeadlessDevice::new();
        let log = dev.log();
        let mut gfx = Graphics::new(Box::new(dev), GraphicsConfig::default());
        let light = PointLight::new(&mut gfx, 0.5).unwrap();
        (gfx, Scene::new(light), log)
    }

    #[test]
    fn light_binds_before_draws_and_marker_draws_last() {
        let (mut gfx, mut scene, log) = setup();
        scene.push(Cube.spawn(&mut gfx, Motion::at_rest()).unwrap());
        scene.push(Plane.spawn(&mut gfx, Motion::at_rest()).unwrap());
        log.clear();

        scene.frame(&mut gfx, 0.016).unwrap();
        let calls = log.calls();
        let light = calls
            .iter()
            .position(|c| matches!(c, Call::SetConstantBuffer { stage: ShaderStage::Pixel, .. }))
            .unwrap();
        let first_draw = calls.iter().position(Call::is_draw).unwrap();
        assert!(light < first_draw);

        let draws: Vec<u32> = calls
            .iter()
            .filter_map(|c| match c {
                Call::DrawIndexed { count, .. } => Some(*count),
                _ => None,
            })
            .collect();
        assert_eq!(draws.len(), 3);
        assert_eq!(&draws[..2], &[36, 6]);
    }

    #[test]
    fn speed_and_pause_scale_updates() {
        let (mut gfx, mut scene, _) = setup();
        let steps = Rc::new(RefCell::new(Vec::new()));
        scene.push(Recorder {
            inner: Cube.spawn(&mut gfx, Motion::at_rest()).unwrap(),
            steps: steps.clone(),
        });

        scene.settings.speed_factor = 0.5;
        scene.frame(&mut gfx, 0.1).unwrap();
        scene.settings.paused = true;
        scene.frame(&mut gfx, 0.1).unwrap();
        assert_eq!(*steps.borrow(), vec![0.05, 0.0]);
    }

    #[test]
    fn speed_is_clamped() {
        let mut s = SceneSettings::default();
        s.adjust_speed(5.0);
        assert_eq!(s.speed_factor, 1.0);
        s.adjust_speed(-5.0);
        assert_eq!(s.speed_factor, 0.0);
    }

    #[test]
    fn populate_shares_one_slot_per_kind() {
        let (mut gfx, mut scene, _) = setup();
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        scene.populate(&mut gfx, &mut rng, 3).unwrap();
        assert_eq!(scene.len(), 18);
        // Six kinds plus the light marker.
        assert_eq!(gfx.shared().len(), 7);
        scene.frame(&mut gfx, 0.016).unwrap();
    }

    #[test]
    fn release_frees_instance_resources_and_light() {
        let (mut gfx, mut scene, log) = setup();
        let mut plane = Plane.spawn(&mut gfx, Motion::at_rest()).unwrap();
        let image = Image::filled(1, 1, Rgba8::WHITE);
        let texture = Texture::new(gfx.device(), "tint", &image).unwrap();
        plane.attach(Bindable::Texture(texture)).unwrap();
        scene.push(plane);
        scene.push(Recorder {
            inner: Cube.spawn(&mut gfx, Motion::at_rest()).unwrap(),
            steps: Rc::new(RefCell::new(Vec::new())),
        });
        scene.frame(&mut gfx, 0.016).unwrap();

        scene.release(&mut gfx).unwrap();
        gfx.shutdown().unwrap();
        assert_eq!(log.count(Call::is_create), log.count(|c| matches!(c, Call::Release(_))));
    }
}
