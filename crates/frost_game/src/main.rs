//! Frostlight -- snowman demo, main loop and application entry point.
//!
//! Architecture: winit drives the event loop via `ApplicationHandler`. All
//! simulation runs inside `RedrawRequested` using a **fixed-timestep** model
//! (see `TimeState`):
//!
//!   1. `begin_frame()` -- measure wall-clock delta, feed accumulator
//!   2. `while should_step()` -- consume fixed-dt slices: actor locomotion,
//!      then footstep particles, in that order
//!   3. Recompose the scene into draw commands and rebuild the CPU mesh
//!   4. Upload camera uniform, issue one lit pass + one line pass, composite
//!      the egui overlay
//!
//! The whole scene is vertex-colored geometry rebuilt on the CPU each
//! simulated frame and streamed into grow-only GPU buffers; the camera alone
//! moves between simulation steps, so pure camera motion never forces a mesh
//! rebuild.

mod environment;
#[cfg(test)]
mod replay;
mod rig;
mod sword;

use std::sync::Arc;

use glam::Vec3;
use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use frost_core::actor::{ActorIntent, ActorState, SlashState};
use frost_core::footsteps::FootstepSystem;
use frost_core::input::{InputState, Key, MouseBtn};
use frost_core::time::TimeState;
use frost_core::tuning::Tuning;
use frost_devtools::{DebugOverlay, OverlayStats};
use frost_platform::window::PlatformConfig;
use frost_render::{
    create_depth_texture, mesh, GpuContext, MeshPipeline, MeshVertex, OrbitCamera,
};

use environment::Environment;
use rig::{DrawCommand, Shape};

const ENVIRONMENT_SEED: u64 = 42;
const FOOTSTEP_SEED: u64 = 1337;

/// The orbit camera looks at the actor at roughly chest height.
const CAMERA_EYE_HEIGHT: f32 = 1.1;
const DRAG_SENSITIVITY_DEG_PER_PX: f32 = 0.3;
const ORBIT_NUDGE_DEG: f32 = 5.0;
const ZOOM_STEP: f32 = 1.1;

const SKY_BLUE: wgpu::Color = wgpu::Color {
    r: 0.65,
    g: 0.85,
    b: 1.0,
    a: 1.0,
};

// Tessellation used when expanding draw commands into triangles.
const SPHERE_STACKS: u32 = 15;
const SPHERE_SLICES: u32 = 15;
const CYLINDER_SLICES: u32 = 20;
const DISK_SLICES: u32 = 16;

/// All mutable engine state lives here. Constructed lazily in
/// `ApplicationHandler::resumed` once the window and GPU surface exist.
///
/// Ownership is split into three conceptual groups:
///  - **Core systems** (time, input, camera) -- updated every frame
///  - **Simulation** (actor, footsteps, environment) -- stepped at fixed dt
///  - **GPU resources** (vertex/index/line/camera buffers) -- rebuilt when
///    the simulation stepped
struct EngineState {
    window: Arc<Window>,
    gpu: GpuContext,
    time: TimeState,
    input: InputState,
    camera: OrbitCamera,
    pipeline: MeshPipeline,
    depth_view: wgpu::TextureView,
    debug_overlay: DebugOverlay,

    tuning: Tuning,
    actor: ActorState,
    footsteps: FootstepSystem,
    environment: Environment,
    paused: bool,
    single_step_requested: bool,

    // Per-frame GPU mesh state. The scene mesh is rebuilt on the CPU after
    // every simulated frame, then streamed into these buffers. Buffers grow
    // (power-of-two) but never shrink.
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    line_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    mesh_vertex_capacity: usize,
    mesh_index_capacity: usize,
    line_vertex_capacity: usize,
    index_count: u32,
    line_vertex_count: u32,
    triangle_vertex_count: u32,
}

impl EngineState {
    fn new(window: Arc<Window>) -> Self {
        let tuning = Tuning::default();
        if let Err(err) = tuning.validate() {
            panic!("Invalid build tuning: {err}");
        }

        let gpu = GpuContext::new(window.clone());
        let time = TimeState::new();
        let input = InputState::new();
        let pipeline = MeshPipeline::new(&gpu.device, gpu.surface_format);
        let depth_view = create_depth_texture(&gpu.device, gpu.size);
        let debug_overlay = DebugOverlay::new(&gpu.device, gpu.surface_format, &window);

        let mut camera = OrbitCamera::new(gpu.size.0, gpu.size.1);
        camera.target = Vec3::new(0.0, CAMERA_EYE_HEIGHT, 0.0);

        let actor = ActorState::new();
        let footsteps = FootstepSystem::new(FOOTSTEP_SEED);
        let environment = environment::generate(ENVIRONMENT_SEED, &tuning);

        let camera_uniform = camera.build_uniform();
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group = pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);
        let vertex_buffer = create_vertex_buffer(&gpu.device, 1, "Scene Vertex Buffer");
        let index_buffer = create_index_buffer(&gpu.device, 1);
        let line_buffer = create_vertex_buffer(&gpu.device, 1, "Scene Line Buffer");

        let mut state = Self {
            window,
            gpu,
            time,
            input,
            camera,
            pipeline,
            depth_view,
            debug_overlay,
            tuning,
            actor,
            footsteps,
            environment,
            paused: false,
            single_step_requested: false,
            vertex_buffer,
            index_buffer,
            line_buffer,
            camera_bind_group,
            camera_buffer,
            mesh_vertex_capacity: 0,
            mesh_index_capacity: 0,
            line_vertex_capacity: 0,
            index_count: 0,
            line_vertex_count: 0,
            triangle_vertex_count: 0,
        };
        state.rebuild_scene_mesh();
        state
    }

    fn rebuild_scene_mesh(&mut self) {
        let commands = rig::compose(
            &self.actor,
            self.footsteps.live_particles(),
            &self.environment,
            &self.tuning,
        );
        let (vertices, indices, lines) = build_mesh(&commands);
        self.ensure_mesh_capacity(vertices.len(), indices.len(), lines.len());
        self.triangle_vertex_count = vertices.len() as u32;
        self.index_count = indices.len() as u32;
        self.line_vertex_count = lines.len() as u32;

        if !vertices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        }
        if !indices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&indices));
        }
        if !lines.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.line_buffer, 0, bytemuck::cast_slice(&lines));
        }
    }

    fn ensure_mesh_capacity(&mut self, vertex_count: usize, index_count: usize, line_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.mesh_vertex_capacity {
            self.mesh_vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(
                &self.gpu.device,
                self.mesh_vertex_capacity,
                "Scene Vertex Buffer",
            );
        }

        let needed_indices = index_count.max(1);
        if needed_indices > self.mesh_index_capacity {
            self.mesh_index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(&self.gpu.device, self.mesh_index_capacity);
        }

        let needed_lines = line_count.max(1);
        if needed_lines > self.line_vertex_capacity {
            self.line_vertex_capacity = needed_lines.next_power_of_two();
            self.line_buffer = create_vertex_buffer(
                &self.gpu.device,
                self.line_vertex_capacity,
                "Scene Line Buffer",
            );
        }
    }
}

struct App {
    config: PlatformConfig,
    state: Option<EngineState>,
}

impl App {
    fn new() -> Self {
        Self {
            config: PlatformConfig {
                title: "Frostlight Snowman - Ice Biome".to_string(),
                ..PlatformConfig::default()
            },
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window = frost_platform::window::create_window(event_loop, &self.config);
        log::info!(
            "Window created: {}x{}",
            self.config.width,
            self.config.height
        );
        self.state = Some(EngineState::new(window));
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state
            .debug_overlay
            .handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    state.depth_view = create_depth_texture(&state.gpu.device, (w, h));
                    state.camera.viewport = (w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(engine_key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(engine_key),
                            ElementState::Released => state.input.key_up(engine_key),
                        }
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                state.input.cursor_moved(position.x, position.y);
            }

            WindowEvent::MouseInput { state: element_state, button, .. } if !egui_consumed => {
                if let Some(btn) = map_mouse_button(button) {
                    match element_state {
                        ElementState::Pressed => state.input.mouse_down(btn),
                        ElementState::Released => state.input.mouse_up(btn),
                    }
                }
            }

            WindowEvent::MouseWheel { delta, .. } if !egui_consumed => {
                let amount = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => (pos.y / 50.0) as f32,
                };
                state.input.scrolled(amount);
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }

                // Fixed-step simulation phase.
                state.time.begin_frame();
                while state.time.should_step() {
                    if state.input.is_just_pressed(Key::Escape) {
                        event_loop.exit();
                        return;
                    }
                    if state.input.is_just_pressed(Key::F3) {
                        state.debug_overlay.toggle();
                    }

                    // Per-press camera controls consume edge state, so they
                    // live inside the step loop where just_pressed is hot.
                    if state.input.is_just_pressed(Key::Left) {
                        state.camera.orbit(-ORBIT_NUDGE_DEG, 0.0);
                    }
                    if state.input.is_just_pressed(Key::Right) {
                        state.camera.orbit(ORBIT_NUDGE_DEG, 0.0);
                    }
                    if state.input.is_just_pressed(Key::Up) {
                        state.camera.orbit(0.0, -ORBIT_NUDGE_DEG);
                    }
                    if state.input.is_just_pressed(Key::Down) {
                        state.camera.orbit(0.0, ORBIT_NUDGE_DEG);
                    }
                    if state.input.is_just_pressed(Key::Z) {
                        state.camera.zoom_by(1.0 / ZOOM_STEP);
                    }
                    if state.input.is_just_pressed(Key::X) {
                        state.camera.zoom_by(ZOOM_STEP);
                    }

                    // Skip simulation update when paused (unless single-step requested)
                    if state.paused && !state.single_step_requested {
                        break;
                    }
                    state.single_step_requested = false;

                    let intent = build_intent(&state.input);
                    let dt = state.time.fixed_dt as f32;
                    let moving = ActorState::is_moving(intent);
                    state.actor.step(intent, dt, &state.tuning);
                    state
                        .footsteps
                        .update(&state.actor, moving, dt, &state.tuning);
                }

                // Mouse-driven camera motion is frame-rate based, not
                // simulation based.
                let (drag_x, drag_y) = state.input.take_drag_delta();
                if drag_x != 0.0 || drag_y != 0.0 {
                    state.camera.orbit(
                        drag_x as f32 * DRAG_SENSITIVITY_DEG_PER_PX,
                        drag_y as f32 * DRAG_SENSITIVITY_DEG_PER_PX,
                    );
                }
                let scroll = state.input.take_scroll_delta();
                if scroll != 0.0 {
                    state.camera.zoom_by(ZOOM_STEP.powf(-scroll));
                }
                state.camera.target = Vec3::new(
                    state.actor.position.x,
                    CAMERA_EYE_HEIGHT,
                    state.actor.position.y,
                );

                if state.time.steps_this_frame > 0 {
                    state.rebuild_scene_mesh();
                }

                // Render phase reads finalized simulation state from this frame.
                let camera_uniform = state.camera.build_uniform();
                state.gpu.queue.write_buffer(
                    &state.camera_buffer,
                    0,
                    bytemuck::cast_slice(&[camera_uniform]),
                );

                let Some((output, view)) = state.gpu.begin_frame() else {
                    return;
                };

                let slash_remaining = match state.actor.slash {
                    SlashState::Slashing { elapsed } => {
                        Some((state.tuning.slash_duration - elapsed).max(0.0))
                    }
                    SlashState::Idle => None,
                };
                let (egui_primitives, egui_textures_delta, overlay_actions) =
                    state.debug_overlay.prepare(
                        &state.window,
                        &state.time,
                        Some(OverlayStats {
                            draw_vertices: state.triangle_vertex_count,
                            line_vertices: state.line_vertex_count,
                            particle_count: state.footsteps.len() as u32,
                            tree_count: state.environment.trees.len() as u32,
                            ice_block_count: state.environment.ice_blocks.len() as u32,
                            actor_position: (state.actor.position.x, state.actor.position.y),
                            actor_heading_deg: state.actor.heading_deg,
                            slash_remaining,
                            paused: state.paused,
                        }),
                    );

                if overlay_actions.toggle_pause {
                    state.paused = !state.paused;
                    log::info!(
                        "Simulation {}",
                        if state.paused { "PAUSED" } else { "RESUMED" }
                    );
                }
                if overlay_actions.single_step {
                    state.single_step_requested = true;
                }
                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [state.gpu.size.0, state.gpu.size.1],
                    pixels_per_point: state.window.scale_factor() as f32,
                };

                let mut encoder =
                    state
                        .gpu
                        .device
                        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("Render Encoder"),
                        });

                {
                    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("Scene Render Pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(SKY_BLUE),
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: Some(
                            wgpu::RenderPassDepthStencilAttachment {
                                view: &state.depth_view,
                                depth_ops: Some(wgpu::Operations {
                                    load: wgpu::LoadOp::Clear(1.0),
                                    store: wgpu::StoreOp::Store,
                                }),
                                stencil_ops: None,
                            },
                        ),
                        ..Default::default()
                    });

                    render_pass.set_pipeline(&state.pipeline.mesh_pipeline);
                    render_pass.set_bind_group(0, &state.camera_bind_group, &[]);
                    render_pass.set_vertex_buffer(0, state.vertex_buffer.slice(..));
                    render_pass
                        .set_index_buffer(state.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    render_pass.draw_indexed(0..state.index_count, 0, 0..1);

                    if state.line_vertex_count > 0 {
                        render_pass.set_pipeline(&state.pipeline.line_pipeline);
                        render_pass.set_vertex_buffer(0, state.line_buffer.slice(..));
                        render_pass.draw(0..state.line_vertex_count, 0..1);
                    }
                }

                state.debug_overlay.upload(
                    &state.gpu.device,
                    &state.gpu.queue,
                    &mut encoder,
                    &egui_primitives,
                    &egui_textures_delta,
                    &screen_descriptor,
                );

                {
                    let mut egui_pass = encoder
                        .begin_render_pass(&wgpu::RenderPassDescriptor {
                            label: Some("egui Render Pass"),
                            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                view: &view,
                                resolve_target: None,
                                ops: wgpu::Operations {
                                    load: wgpu::LoadOp::Load,
                                    store: wgpu::StoreOp::Store,
                                },
                            })],
                            depth_stencil_attachment: None,
                            ..Default::default()
                        })
                        .forget_lifetime();

                    state
                        .debug_overlay
                        .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
                }

                state.debug_overlay.cleanup(&egui_textures_delta);

                state.gpu.queue.submit(std::iter::once(encoder.finish()));
                output.present();

                // Only clear edge-triggered input (just_pressed / just_released)
                // after at least one fixed step consumed it. Otherwise a press
                // that lands on a frame with 0 simulation steps is silently lost.
                if state.time.steps_this_frame > 0 {
                    state.input.end_frame();
                }
            }

            _ => {}
        }
    }
}

/// Expand draw commands into one triangle mesh and one line list, both in
/// world space with per-vertex color. Normals go through the inverse
/// transpose so taper and mirror transforms stay lit correctly; a negative
/// determinant (the mirrored arm) flips them back outward.
fn build_mesh(commands: &[DrawCommand]) -> (Vec<MeshVertex>, Vec<u32>, Vec<MeshVertex>) {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let mut lines = Vec::new();

    for command in commands {
        match command.shape {
            Shape::Cuboid { half_extents } => {
                append_geometry(&mut vertices, &mut indices, &mesh::cuboid(half_extents), command);
            }
            Shape::Cube { size } => {
                append_geometry(
                    &mut vertices,
                    &mut indices,
                    &mesh::cuboid(glam::Vec3::splat(size / 2.0)),
                    command,
                );
            }
            Shape::WireCuboid { half_extents } => {
                for endpoint in mesh::cuboid_edges(half_extents) {
                    lines.push(MeshVertex {
                        position: command.transform.transform_point3(endpoint).to_array(),
                        normal: [0.0, 1.0, 0.0],
                        color: command.color,
                    });
                }
            }
            Shape::Sphere { radius } => {
                append_geometry(
                    &mut vertices,
                    &mut indices,
                    &mesh::uv_sphere(radius, SPHERE_STACKS, SPHERE_SLICES),
                    command,
                );
            }
            Shape::Cylinder {
                base_radius,
                top_radius,
                height,
            } => {
                append_geometry(
                    &mut vertices,
                    &mut indices,
                    &mesh::capped_cylinder(base_radius, top_radius, height, CYLINDER_SLICES),
                    command,
                );
            }
            Shape::Disk { radius } => {
                append_geometry(
                    &mut vertices,
                    &mut indices,
                    &mesh::disk(radius, DISK_SLICES),
                    command,
                );
            }
        }
    }

    (vertices, indices, lines)
}

fn append_geometry(
    vertices: &mut Vec<MeshVertex>,
    indices: &mut Vec<u32>,
    geometry: &mesh::Geometry,
    command: &DrawCommand,
) {
    let base_index = vertices.len() as u32;
    let linear = glam::Mat3::from_mat4(command.transform);
    let normal_matrix = linear.inverse().transpose();
    let orientation = if linear.determinant() < 0.0 { -1.0 } else { 1.0 };

    for (position, normal) in geometry.positions.iter().zip(&geometry.normals) {
        vertices.push(MeshVertex {
            position: command.transform.transform_point3(*position).to_array(),
            normal: (normal_matrix * *normal * orientation).normalize().to_array(),
            color: command.color,
        });
    }
    indices.extend(geometry.indices.iter().map(|i| base_index + i));
}

fn create_vertex_buffer(
    device: &wgpu::Device,
    vertex_capacity: usize,
    label: &str,
) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<MeshVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Scene Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::Space => Some(Key::Space),
        KeyCode::F3 => Some(Key::F3),
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyS => Some(Key::S),
        KeyCode::KeyD => Some(Key::D),
        KeyCode::KeyZ => Some(Key::Z),
        KeyCode::KeyX => Some(Key::X),
        _ => None,
    }
}

fn map_mouse_button(button: MouseButton) -> Option<MouseBtn> {
    match button {
        MouseButton::Left => Some(MouseBtn::Left),
        MouseButton::Right => Some(MouseBtn::Right),
        MouseButton::Middle => Some(MouseBtn::Middle),
        _ => None,
    }
}

/// Level-triggered movement keys become the actor intent; the slash trigger
/// passes the held level through and the actor does its own edge detection.
fn build_intent(input: &InputState) -> ActorIntent {
    ActorIntent {
        turn_left: input.is_held(Key::A),
        turn_right: input.is_held(Key::D),
        move_forward: input.is_held(Key::W),
        move_backward: input.is_held(Key::S),
        slash_held: input.is_held(Key::Space),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Frostlight starting...");

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app).expect("Event loop error");
}
