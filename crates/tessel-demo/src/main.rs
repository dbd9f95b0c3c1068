mod tuning;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tessel_engine::core::{App, AppControl, FrameCtx};
use tessel_engine::device::{Gpu, GpuInit};
use tessel_engine::gfx::WgpuDevice;
use tessel_engine::logging::{init_logging, LoggingConfig};
use tessel_engine::render::{projection, Graphics, GraphicsConfig, PointLight, Scene};
use tessel_engine::window::{Runtime, RuntimeConfig};

/// Instances spawned per shape kind.
const PER_KIND: usize = 25;
const LIGHT_RADIUS: f32 = 0.5;

fn graphics_config() -> GraphicsConfig {
    let mut config = GraphicsConfig::default();
    if let Some(root) = std::env::var_os("TESSEL_ASSET_ROOT") {
        config.asset_root = PathBuf::from(root);
    }
    config
}

/// Renderer state, created on the first frame once a GPU exists.
struct Live {
    device: WgpuDevice,
    gfx: Graphics,
    scene: Option<Scene>,
}

impl Live {
    fn new(gpu: &Gpu<'_>) -> Result<Self> {
        let device = WgpuDevice::new(
            gpu.device().clone(),
            gpu.queue().clone(),
            gpu.surface_format(),
            gpu.depth_format(),
        );
        let mut gfx = Graphics::new(Box::new(device.clone()), graphics_config());
        let size = gpu.size();
        gfx.set_projection(projection(size.width, size.height));

        let light = PointLight::new(&mut gfx, LIGHT_RADIUS).context("failed to create light")?;
        let mut scene = Scene::new(light);
        scene
            .populate(&mut gfx, &mut rand::thread_rng(), PER_KIND)
            .context("failed to populate scene")?;

        Ok(Self {
            device,
            gfx,
            scene: Some(scene),
        })
    }

    fn shutdown(&mut self) {
        if let Some(scene) = self.scene.take() {
            if let Err(e) = scene.release(&mut self.gfx) {
                log::error!("scene release failed: {e}");
            }
        }
        if let Err(e) = self.gfx.shutdown() {
            log::error!("graphics shutdown failed: {e}");
        }
    }
}

#[derive(Default)]
struct DemoApp {
    live: Option<Live>,
}

impl App for DemoApp {
    fn on_resize(&mut self, width: u32, height: u32) {
        if let Some(live) = self.live.as_mut() {
            live.gfx.set_projection(projection(width, height));
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.live.is_none() {
            match Live::new(ctx.gpu) {
                Ok(live) => self.live = Some(live),
                Err(e) => {
                    log::error!("scene setup failed: {e:#}");
                    return AppControl::Exit;
                }
            }
        }
        let Some(live) = self.live.as_mut() else {
            return AppControl::Exit;
        };
        let Some(scene) = live.scene.as_mut() else {
            return AppControl::Exit;
        };

        if tuning::apply(ctx.input, ctx.input_frame, scene, ctx.time.dt) == AppControl::Exit {
            return AppControl::Exit;
        }

        if let Err(e) = scene.frame(&mut live.gfx, ctx.time.dt) {
            log::error!("frame {} failed: {e}", ctx.time.frame_index);
            live.device.discard();
            return AppControl::Exit;
        }

        let [r, g, b, a] = scene.settings.clear_color.map(f64::from);
        let device = &live.device;
        let mut encoded = false;
        let control = ctx.render(wgpu::Color { r, g, b, a }, |target| {
            device.encode(target);
            encoded = true;
        });
        if !encoded {
            device.discard();
        }
        control
    }

    fn on_exit(&mut self) {
        if let Some(live) = self.live.as_mut() {
            live.shutdown();
        }
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());
    log::info!("{}", tuning::HELP);

    Runtime::run(
        RuntimeConfig {
            title: "tessel demo".into(),
            ..RuntimeConfig::default()
        },
        GpuInit::default(),
        DemoApp::default(),
    )
}
