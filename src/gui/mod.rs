pub mod path_ui;

use anyhow::anyhow;
use egui::FontDefinitions;
use egui_wgpu_backend::{RenderPass, ScreenDescriptor};
use egui_winit_platform::{Platform, PlatformDescriptor};
use winit::{event::Event, window::Window};

pub trait Ui {
    fn ui(&mut self, ctx: &egui::Context);
}

pub struct Gui {
    platform: Platform,
    render_pass: RenderPass,
}

impl Gui {
    pub fn new(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration, window: &Window) -> Gui {
        let size = window.inner_size();
        let platform = Platform::new(PlatformDescriptor {
            physical_width: size.width,
            physical_height: size.height,
            scale_factor: window.scale_factor(),
            font_definitions: FontDefinitions::default(),
            style: Default::default(),
        });

        Gui {
            platform,
            render_pass: RenderPass::new(device, config.format, 1),
        }
    }

    pub fn handle_events(&mut self, event: &Event<()>) {
        self.platform.handle_event(event);
    }

    /// True while the pointer is over a panel, so wheel input belongs to the gui.
    pub fn wants_pointer(&self) -> bool {
        self.platform.context().wants_pointer_input()
    }

    /// Draws the ui on top of whatever is already in the output texture.
    #[allow(clippy::too_many_arguments)]
    pub fn render<T: Ui>(
        &mut self,
        ui: &mut T,
        elapsed: std::time::Duration,
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        queue: &wgpu::Queue,
        window: &Window,
        output: &wgpu::SurfaceTexture,
    ) -> anyhow::Result<wgpu::CommandBuffer> {
        self.platform.update_time(elapsed.as_secs_f64());
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Gui Render Encoder"),
        });
        let output_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.platform.begin_frame();
        ui.ui(&self.platform.context());

        let full_output = self.platform.end_frame(Some(window));
        let paint_jobs = self.platform.context().tessellate(full_output.shapes);

        let screen_descriptor = ScreenDescriptor {
            physical_width: config.width,
            physical_height: config.height,
            scale_factor: window.scale_factor() as f32,
        };
        let tdelta: egui::TexturesDelta = full_output.textures_delta;
        self.render_pass
            .add_textures(device, queue, &tdelta)
            .map_err(|e| anyhow!("failed to upload gui textures: {:?}", e))?;
        self.render_pass
            .update_buffers(device, queue, &paint_jobs, &screen_descriptor);

        // None keeps the scene drawn underneath.
        self.render_pass
            .execute(
                &mut encoder,
                &output_view,
                &paint_jobs,
                &screen_descriptor,
                None,
            )
            .map_err(|e| anyhow!("failed to draw the gui: {:?}", e))?;
        Ok(encoder.finish())
    }
}
