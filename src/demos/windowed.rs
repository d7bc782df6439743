use std::time::Instant;

use winit::{
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::Window,
    window::WindowBuilder,
};

use crate::config::DemoConfig;
use crate::context::SceneContext;
use crate::graphics::camera::CameraBundle;
use crate::graphics::gpu_interface::GPUInterface;
use crate::graphics::lines;
use crate::graphics::rendering::LineRenderer;
use crate::gui;

struct State {
    gpu: GPUInterface,
    camera_bundle: CameraBundle,
    line_renderer: LineRenderer,
    context: SceneContext,
}

impl State {
    fn new(window: &Window, config: DemoConfig) -> anyhow::Result<Self> {
        let gpu = GPUInterface::new(window)?;
        let mut context = SceneContext::new(config, gpu.config.width, gpu.config.height)?;
        context.start_loading()?;

        let camera_bundle = CameraBundle::new(&gpu, context.view_projection());
        let line_renderer = LineRenderer::new(&gpu, &camera_bundle);

        Ok(Self {
            gpu,
            camera_bundle,
            line_renderer,
            context,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.gpu.resize(new_size);
        self.context.resize(new_size.width, new_size.height);
    }

    /// Returns true if the event was used.
    fn input(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                input:
                    KeyboardInput {
                        virtual_keycode: Some(key),
                        state,
                        ..
                    },
                ..
            } => self.context.process_keyboard(*key, *state),
            WindowEvent::MouseWheel { delta, .. } => {
                match delta {
                    MouseScrollDelta::LineDelta(_, lines) => self.context.scroll_lines(*lines),
                    // Pixel deltas are positive when scrolling towards the top.
                    MouseScrollDelta::PixelDelta(position) => {
                        self.context.scroll_by(-position.y as f32)
                    }
                }
                true
            }
            _ => false,
        }
    }

    fn update(&mut self, elapsed: std::time::Duration) {
        self.context.update(elapsed);
        self.camera_bundle
            .update_gpu(&self.gpu, self.context.view_projection());
        let vertices = lines::scene_lines(self.context.scene());
        self.line_renderer.upload(&self.gpu, &vertices);
    }

    fn render(&mut self, output: &wgpu::SurfaceTexture) -> wgpu::CommandBuffer {
        self.line_renderer.render(
            &self.gpu,
            &self.camera_bundle,
            output,
            self.context.scene().background,
        )
    }
}

pub fn run(config: DemoConfig) -> anyhow::Result<()> {
    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title(config.title.clone())
        .build(&event_loop)?;

    let mut state = State::new(&window, config)?;

    let mut gui = gui::Gui::new(&state.gpu.device, &state.gpu.config, &window);
    let mut path_ui = gui::path_ui::PathUi::new(&state.context);

    // Time-driven paths measure from here.
    let start_time = Instant::now();
    let mut last_frame = start_time;
    event_loop.run(move |event, _, control_flow| {
        gui.handle_events(&event);

        *control_flow = ControlFlow::Poll;
        match event {
            Event::MainEventsCleared => {
                let now = Instant::now();
                let frame_time = now - last_frame;
                last_frame = now;

                path_ui.apply_to(&mut state.context);
                state.update(now - start_time);
                path_ui.sync_from(&state.context);

                let output = match state.gpu.surface.get_current_texture() {
                    Ok(output) => output,
                    // Reconfigure the surface if it's lost or outdated.
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        state.resize(state.gpu.size);
                        return;
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("out of graphics memory, exiting");
                        *control_flow = ControlFlow::Exit;
                        return;
                    }
                    Err(e) => {
                        log::warn!("skipping frame: {:?}", e);
                        return;
                    }
                };
                let scene_command_buffer = state.render(&output);
                let gui_command_buffer = match gui.render(
                    &mut path_ui,
                    frame_time,
                    &state.gpu.device,
                    &state.gpu.config,
                    &state.gpu.queue,
                    &window,
                    &output,
                ) {
                    Ok(command_buffer) => command_buffer,
                    Err(e) => {
                        log::error!("{:#}", e);
                        *control_flow = ControlFlow::Exit;
                        return;
                    }
                };

                state
                    .gpu
                    .queue
                    .submit([scene_command_buffer, gui_command_buffer]);
                output.present();
            }
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == window.id() => {
                // Wheel input over the panel scrolls the panel, not the page.
                let gui_owns_wheel =
                    matches!(event, WindowEvent::MouseWheel { .. }) && gui.wants_pointer();
                if !gui_owns_wheel && state.input(event) {
                    return;
                }
                match event {
                    WindowEvent::CloseRequested
                    | WindowEvent::KeyboardInput {
                        input:
                            KeyboardInput {
                                state: ElementState::Pressed,
                                virtual_keycode: Some(VirtualKeyCode::Escape),
                                ..
                            },
                        ..
                    } => *control_flow = ControlFlow::Exit,
                    WindowEvent::Resized(physical_size) => {
                        state.resize(*physical_size);
                    }
                    WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                        state.resize(**new_inner_size);
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    });
}
