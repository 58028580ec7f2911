use std::env;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use crate::{resolve_app_paths, StartupError};

use super::input::ActionStates;
use super::metrics::{LoopMetricsSnapshot, MetricsAccumulator};
use super::tools::{draw_overlay, save_screenshot, PerfStats};
use super::{InputAction, InputSnapshot, OverlayData, Renderer, Scene, SceneCommand};

pub const SLOW_FRAME_ENV_VAR: &str = "FLAGRUN_SLOW_FRAME_MS";

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub surface_width: u32,
    pub surface_height: u32,
    pub window_scale: u32,
    pub nominal_step: Duration,
    pub max_step_scale: f32,
    pub metrics_log_interval: Duration,
    pub simulated_slow_frame_ms: u64,
    pub max_render_fps: Option<u32>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Flagrun".to_string(),
            surface_width: 256,
            surface_height: 240,
            window_scale: 3,
            nominal_step: Duration::from_micros(16_667),
            max_step_scale: 2.0,
            metrics_log_interval: Duration::from_secs(1),
            simulated_slow_frame_ms: 0,
            max_render_fps: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

pub fn run_app(config: LoopConfig, mut scene: Box<dyn Scene>) -> Result<(), AppError> {
    let app_paths = resolve_app_paths()?;
    info!(
        root = %app_paths.root.display(),
        screenshots_dir = %app_paths.screenshots_dir.display(),
        "startup"
    );

    let surface_width = config.surface_width.max(1);
    let surface_height = config.surface_height.max(1);
    let window_scale = config.window_scale.max(1);

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                (surface_width * window_scale) as f64,
                (surface_height * window_scale) as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = Renderer::new(Arc::clone(&window), surface_width, surface_height)
        .map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let nominal_step =
        normalize_non_zero_duration(config.nominal_step, Duration::from_micros(16_667));
    let max_step_scale = normalize_step_scale_cap(config.max_step_scale);
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    let slow_frame_delay = resolve_slow_frame_delay(config.simulated_slow_frame_ms);
    let effective_render_cap = normalize_render_fps_cap(config.max_render_fps);
    let render_frame_target = target_frame_duration(effective_render_cap);
    let mut input_collector = InputCollector::default();

    scene.load();
    info!("scene_loaded");

    info!(
        surface_width,
        surface_height,
        window_scale,
        nominal_step_ms = nominal_step.as_millis() as u64,
        max_step_scale,
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        slow_frame_delay_ms = slow_frame_delay.as_millis() as u64,
        render_fps_cap = %format_render_cap(effective_render_cap),
        "loop_config"
    );

    let mut last_frame_instant = Instant::now();
    let mut last_present_instant = Instant::now();
    let mut metrics_accumulator = MetricsAccumulator::new(metrics_log_interval, Instant::now());
    let mut last_metrics = LoopMetricsSnapshot::default();
    let mut perf_stats = PerfStats::new();
    let mut last_applied_title: Option<String> = None;
    let mut overlay_visible = true;

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => {
                match event {
                    WindowEvent::CloseRequested => {
                        input_collector.mark_quit_requested();
                        info!(reason = "window_close", "shutdown_requested");
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                            warn!(error = %error, "renderer_resize_failed");
                            window_target.exit();
                        }
                    }
                    WindowEvent::ScaleFactorChanged { .. } => {
                        let size = window.inner_size();
                        if let Err(error) = renderer.resize(size.width, size.height) {
                            warn!(error = %error, "renderer_resize_failed");
                            window_target.exit();
                        }
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        input_collector.handle_keyboard_input(&event);
                    }
                    WindowEvent::RedrawRequested => {
                        if input_collector.take_overlay_toggle_pressed() {
                            overlay_visible = !overlay_visible;
                            info!(overlay_visible, "overlay_toggled");
                        }

                        if slow_frame_delay > Duration::ZERO {
                            // Explicit debug perturbation only; this is not the FPS cap.
                            thread::sleep(slow_frame_delay);
                        }

                        let now = Instant::now();
                        let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                        last_frame_instant = now;

                        let step_plan = plan_step(raw_frame_dt, nominal_step, max_step_scale);
                        if step_plan.dropped_ms > 0.0 {
                            warn!(
                                dropped_ms = step_plan.dropped_ms,
                                max_step_scale, "sim_clamp_triggered"
                            );
                        }

                        let input_snapshot = input_collector.snapshot_for_tick();
                        let sim_started = Instant::now();
                        let command = scene.update(step_plan.step_scale, &input_snapshot);
                        let sim_duration = sim_started.elapsed();
                        metrics_accumulator.record_tick();
                        if command == SceneCommand::Quit {
                            info!(reason = "scene_command", "shutdown_requested");
                            window_target.exit();
                        }

                        // Single authoritative FPS cap sleep point for render pacing.
                        let elapsed_since_last_present =
                            Instant::now().saturating_duration_since(last_present_instant);
                        let cap_sleep =
                            compute_cap_sleep(elapsed_since_last_present, render_frame_target);
                        if cap_sleep > Duration::ZERO {
                            thread::sleep(cap_sleep);
                        }

                        let next_title = scene.debug_title();
                        let perf_snapshot = perf_stats.snapshot();
                        let overlay = overlay_visible.then(|| OverlayData {
                            fps: last_metrics.fps,
                            tps: last_metrics.tps,
                            frame_time_ms: last_metrics.frame_time_ms,
                            slowest_frame_ms: last_metrics.slowest_frame_ms,
                            sim: perf_snapshot.sim,
                            render: perf_snapshot.render,
                            step_scale: step_plan.step_scale,
                            scene_title: next_title.clone(),
                        });
                        let render_started = Instant::now();
                        let draw_result = renderer.draw_frame(|painter| {
                            scene.render(painter);
                            if let Some(overlay) = &overlay {
                                draw_overlay(painter, overlay);
                            }
                        });
                        let render_duration = render_started.elapsed();
                        if let Err(error) = draw_result {
                            // Dropped frame; the next redraw retries the surface.
                            warn!(error = %error, "renderer_draw_failed");
                        }
                        last_present_instant = Instant::now();

                        if input_collector.take_screenshot_pressed() {
                            match save_screenshot(
                                &app_paths.screenshots_dir,
                                renderer.frame(),
                                surface_width,
                                surface_height,
                            ) {
                                Ok(path) => info!(path = %path.display(), "screenshot_saved"),
                                Err(error) => warn!(error = %error, "screenshot_failed"),
                            }
                        }

                        if next_title != last_applied_title {
                            if let Some(title) = &next_title {
                                window.set_title(title);
                            } else {
                                window.set_title(&config.window_title);
                            }
                            last_applied_title = next_title;
                        }
                        perf_stats.record_frame(sim_duration, render_duration);
                        metrics_accumulator.record_frame(raw_frame_dt);

                        if let Some(snapshot) = metrics_accumulator.maybe_snapshot(now) {
                            last_metrics = snapshot;
                            info!(
                                fps = snapshot.fps,
                                tps = snapshot.tps,
                                frame_time_ms = snapshot.frame_time_ms,
                                slowest_frame_ms = snapshot.slowest_frame_ms,
                                "loop_metrics"
                            );
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                scene.unload();
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

#[derive(Debug, Default)]
struct InputCollector {
    quit_requested: bool,
    left_is_down: bool,
    right_is_down: bool,
    up_is_down: bool,
    space_is_down: bool,
    confirm_is_down: bool,
    confirm_pressed_edge: bool,
    regenerate_is_down: bool,
    regenerate_pressed_edge: bool,
    cancel_is_down: bool,
    cancel_pressed_edge: bool,
    overlay_toggle_is_down: bool,
    overlay_toggle_pressed_edge: bool,
    screenshot_is_down: bool,
    screenshot_pressed_edge: bool,
}

impl InputCollector {
    fn mark_quit_requested(&mut self) {
        self.quit_requested = true;
    }

    fn handle_keyboard_input(&mut self, key_event: &winit::event::KeyEvent) {
        self.handle_physical_key(key_event.physical_key, key_event.state);
    }

    fn handle_physical_key(&mut self, key: PhysicalKey, state: ElementState) {
        let is_pressed = state == ElementState::Pressed;
        match key {
            PhysicalKey::Code(KeyCode::ArrowLeft) => self.left_is_down = is_pressed,
            PhysicalKey::Code(KeyCode::ArrowRight) => self.right_is_down = is_pressed,
            PhysicalKey::Code(KeyCode::ArrowUp) => self.up_is_down = is_pressed,
            PhysicalKey::Code(KeyCode::Space) => self.space_is_down = is_pressed,
            PhysicalKey::Code(KeyCode::Enter) | PhysicalKey::Code(KeyCode::NumpadEnter) => {
                self.handle_confirm_key_state(state);
            }
            PhysicalKey::Code(KeyCode::KeyG) => self.handle_regenerate_key_state(state),
            PhysicalKey::Code(KeyCode::Escape) => self.handle_cancel_key_state(state),
            PhysicalKey::Code(KeyCode::F3) => self.handle_overlay_toggle_key_state(state),
            PhysicalKey::Code(KeyCode::F12) => self.handle_screenshot_key_state(state),
            _ => {}
        }
    }

    fn handle_confirm_key_state(&mut self, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.confirm_is_down {
                    self.confirm_pressed_edge = true;
                }
                self.confirm_is_down = true;
            }
            ElementState::Released => self.confirm_is_down = false,
        }
    }

    fn handle_regenerate_key_state(&mut self, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.regenerate_is_down {
                    self.regenerate_pressed_edge = true;
                }
                self.regenerate_is_down = true;
            }
            ElementState::Released => self.regenerate_is_down = false,
        }
    }

    fn handle_cancel_key_state(&mut self, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.cancel_is_down {
                    self.cancel_pressed_edge = true;
                }
                self.cancel_is_down = true;
            }
            ElementState::Released => self.cancel_is_down = false,
        }
    }

    fn handle_overlay_toggle_key_state(&mut self, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.overlay_toggle_is_down {
                    self.overlay_toggle_pressed_edge = true;
                }
                self.overlay_toggle_is_down = true;
            }
            ElementState::Released => self.overlay_toggle_is_down = false,
        }
    }

    fn handle_screenshot_key_state(&mut self, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.screenshot_is_down {
                    self.screenshot_pressed_edge = true;
                }
                self.screenshot_is_down = true;
            }
            ElementState::Released => self.screenshot_is_down = false,
        }
    }

    fn snapshot_for_tick(&mut self) -> InputSnapshot {
        let mut actions = ActionStates::default();
        actions.set(InputAction::MoveLeft, self.left_is_down);
        actions.set(InputAction::MoveRight, self.right_is_down);
        actions.set(InputAction::Jump, self.space_is_down || self.up_is_down);
        let snapshot = InputSnapshot::new(
            self.quit_requested,
            actions,
            self.confirm_pressed_edge,
            self.regenerate_pressed_edge,
            self.cancel_pressed_edge,
        );
        self.confirm_pressed_edge = false;
        self.regenerate_pressed_edge = false;
        self.cancel_pressed_edge = false;
        snapshot
    }

    fn take_overlay_toggle_pressed(&mut self) -> bool {
        let was_pressed = self.overlay_toggle_pressed_edge;
        self.overlay_toggle_pressed_edge = false;
        was_pressed
    }

    fn take_screenshot_pressed(&mut self) -> bool {
        let was_pressed = self.screenshot_pressed_edge;
        self.screenshot_pressed_edge = false;
        was_pressed
    }
}

#[derive(Debug, Clone, Copy)]
struct StepPlan {
    step_scale: f32,
    dropped_ms: f32,
}

/// One scaled update per frame. A frame longer than `max_step_scale` nominal
/// steps runs at the cap and the remainder of that frame is dropped, so a
/// stall never turns into a teleport.
fn plan_step(frame_dt: Duration, nominal_step: Duration, max_step_scale: f32) -> StepPlan {
    let nominal_seconds = nominal_step.as_secs_f32();
    let ratio = frame_dt.as_secs_f32() / nominal_seconds;
    if !ratio.is_finite() {
        return StepPlan {
            step_scale: 1.0,
            dropped_ms: 0.0,
        };
    }
    if ratio > max_step_scale {
        StepPlan {
            step_scale: max_step_scale,
            dropped_ms: (ratio - max_step_scale) * nominal_seconds * 1000.0,
        }
    } else {
        StepPlan {
            step_scale: ratio,
            dropped_ms: 0.0,
        }
    }
}

fn normalize_step_scale_cap(cap: f32) -> f32 {
    if cap.is_finite() && cap >= 1.0 {
        cap
    } else {
        1.0
    }
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn normalize_render_fps_cap(cap: Option<u32>) -> Option<u32> {
    cap.filter(|value| *value > 0)
}

fn target_frame_duration(max_render_fps: Option<u32>) -> Option<Duration> {
    max_render_fps.map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
}

fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}

fn format_render_cap(cap: Option<u32>) -> String {
    match cap {
        Some(value) => value.to_string(),
        None => "off".to_string(),
    }
}

fn resolve_slow_frame_delay(config_slow_frame_ms: u64) -> Duration {
    match env::var(SLOW_FRAME_ENV_VAR) {
        Ok(value) => match value.parse::<u64>() {
            Ok(ms) => Duration::from_millis(ms),
            Err(_) => {
                warn!(
                    env_var = SLOW_FRAME_ENV_VAR,
                    value = value.as_str(),
                    "invalid slow-frame env var value; falling back to config"
                );
                Duration::from_millis(config_slow_frame_ms)
            }
        },
        Err(env::VarError::NotPresent) => Duration::from_millis(config_slow_frame_ms),
        Err(err) => {
            warn!(
                env_var = SLOW_FRAME_ENV_VAR,
                error = %err,
                "unable to read slow-frame env var; falling back to config"
            );
            Duration::from_millis(config_slow_frame_ms)
        }
    }
}
