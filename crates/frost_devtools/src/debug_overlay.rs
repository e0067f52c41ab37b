//! egui debug overlay composited over the rendered scene.
//!
//! The render integration is split into phases because
//! `egui_wgpu::Renderer::render()` wants a `RenderPass<'static>` while
//! `begin_render_pass` borrows the encoder:
//!
//!   1. `prepare()` -- run egui UI logic, produce tessellated primitives
//!   2. `upload()`  -- upload textures and update GPU buffers (borrows encoder mutably)
//!   3. `paint()`   -- render into a new render pass with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui no longer references
//!
//! UI logic only runs while `visible` is set (F3 toggles it); event handling
//! stays active either way so the window can intercept clicks whenever it is
//! shown.

use frost_core::time::TimeState;
use winit::window::Window;

#[derive(Debug, Clone, Default)]
pub struct OverlayStats {
    pub draw_vertices: u32,
    pub line_vertices: u32,
    pub particle_count: u32,
    pub tree_count: u32,
    pub ice_block_count: u32,
    /// Actor world position (x, z) and heading in degrees.
    pub actor_position: (f32, f32),
    pub actor_heading_deg: f32,
    /// Remaining slash time in seconds, if a slash is running.
    pub slash_remaining: Option<f32>,
    pub paused: bool,
}

#[derive(Debug, Clone, Default)]
pub struct OverlayActions {
    /// User clicked the pause toggle
    pub toggle_pause: bool,
    /// User clicked the single-step button (advance one fixed step while paused)
    pub single_step: bool,
}

pub struct DebugOverlay {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    pub visible: bool,
}

impl DebugOverlay {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
    ) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            visible: false,
        }
    }

    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_winit_state.on_window_event(window, event);
        response.consumed
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        log::info!("Debug overlay: {}", if self.visible { "ON" } else { "OFF" });
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        time: &TimeState,
        stats: Option<OverlayStats>,
    ) -> (
        Vec<egui::ClippedPrimitive>,
        egui::TexturesDelta,
        OverlayActions,
    ) {
        let mut actions = OverlayActions::default();
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            if self.visible {
                egui::Window::new("Debug")
                    .default_pos([10.0, 10.0])
                    .show(ctx, |ui| {
                        ui.label(format!("FPS: {:.1}", time.smoothed_fps));
                        ui.label(format!("Frame time: {:.2} ms", time.smoothed_frame_time_ms));
                        ui.label(format!("Steps this frame: {}", time.steps_this_frame));
                        ui.label(format!("Total steps: {}", time.fixed_step_count));

                        if let Some(ref stats) = stats {
                            ui.separator();
                            ui.label(format!(
                                "Actor: ({:.2}, {:.2}) @ {:.0}\u{b0}",
                                stats.actor_position.0,
                                stats.actor_position.1,
                                stats.actor_heading_deg
                            ));
                            ui.label(match stats.slash_remaining {
                                Some(remaining) => format!("Slash: {:.2}s left", remaining),
                                None => "Slash: idle".to_string(),
                            });
                            ui.separator();
                            ui.label(format!("Footprints: {}", stats.particle_count));
                            ui.label(format!(
                                "Environment: {} trees, {} ice blocks",
                                stats.tree_count, stats.ice_block_count
                            ));
                            ui.label(format!(
                                "Mesh: {} tri verts, {} line verts",
                                stats.draw_vertices, stats.line_vertices
                            ));

                            ui.separator();
                            ui.horizontal(|ui| {
                                let pause_label = if stats.paused { "Resume" } else { "Pause" };
                                if ui.button(pause_label).clicked() {
                                    actions.toggle_pause = true;
                                }
                                if stats.paused && ui.button("Step").clicked() {
                                    actions.single_step = true;
                                }
                            });
                            if stats.paused {
                                ui.label("\u{23f8} PAUSED");
                            }
                        }
                    });
            }
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta, actions)
    }

    /// Upload textures and update buffers. Call before creating the egui render pass.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    /// Render into an existing render pass. Call after `upload()`.
    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    /// Free textures that egui no longer needs. Call after rendering.
    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}
