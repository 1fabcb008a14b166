//! Starscape - animated space scene
//!
//! Opens a window and runs the scene: drag to orbit, scroll to zoom, hover
//! and click objects, arrow keys for the starfield speed.

use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, KeyEvent, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowId,
};

use starscape::config::{AppConfig, CameraConfig};
use starscape::input::{InputAction, InputMapper};
use starscape::scene::{default_scene, load_scene, PANEL_TAG};
use starscape::systems::{RenderError, RenderSystem, SimulationSystem, TitleStatus, WindowSystem};
use starscape_core::{ActiveScene, AssetSlot, EntityHandle, TextureData, TextureLoader};
use starscape_input::{OrbitController, PointerTracker};
use starscape_math::Vec3;
use starscape_render::{Camera3D, TextureState};

/// Pixels of trackpad scroll that count as one wheel line
const PIXELS_PER_LINE: f32 = 40.0;

/// Main application state
struct App {
    /// Application configuration
    config: AppConfig,
    window: Option<WindowSystem>,
    render: Option<RenderSystem>,
    scene: ActiveScene,
    camera: Camera3D,
    controller: OrbitController,
    pointer: PointerTracker,
    simulation: SimulationSystem,
    /// Background loader for the moon surface
    texture_loader: TextureLoader,
    texture: AssetSlot<TextureData>,
    texture_uploaded: bool,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let scene = load_scene(&config).unwrap_or_else(|e| {
            log::error!("{}. Using the built-in scene.", e);
            default_scene(&config)
        });

        let texture_loader = TextureLoader::new();
        texture_loader.load_async(config.scene.moon_texture.clone());

        let controller = OrbitController::new()
            .with_orbit_sensitivity(config.camera.orbit_sensitivity)
            .with_zoom_sensitivity(config.camera.zoom_sensitivity)
            .with_auto_rotate(config.camera.auto_rotate)
            .with_smoothing(config.camera.smoothing);

        Self {
            camera: build_camera(&config.camera),
            controller,
            pointer: PointerTracker::new(config.camera.drag_threshold),
            simulation: SimulationSystem::new(config.animation.max_frame_dt),
            window: None,
            render: None,
            scene,
            texture_loader,
            texture: AssetSlot::Pending,
            texture_uploaded: false,
            config,
        }
    }

    /// Resolve the texture slot and upload the texture once it is ready
    fn poll_texture(&mut self) {
        for load in self.texture_loader.poll_all() {
            match &load.result {
                Ok(data) => log::info!(
                    "Loaded texture {} ({}x{})",
                    load.path.display(),
                    data.width,
                    data.height
                ),
                Err(e) => log::warn!("{}; drawing untextured", e),
            }
            self.texture.resolve(load.result);
        }

        if self.texture_uploaded {
            return;
        }
        if let (Some(data), Some(render)) = (self.texture.ready(), self.render.as_mut()) {
            render.set_texture(data);
            self.texture_uploaded = true;
        }
    }

    fn panel_handle(&self) -> Option<EntityHandle> {
        self.scene.world.find_by_tag(PANEL_TAG).next()
    }

    fn panel_open(&self) -> bool {
        self.panel_handle()
            .and_then(|h| self.scene.world.get_entity(h))
            .is_some_and(|panel| panel.interaction.is_selected())
    }

    fn refresh_title(&self) {
        let Some(window) = &self.window else {
            return;
        };
        let hovered = self
            .simulation
            .hovered()
            .and_then(|h| self.scene.world.get_entity(h))
            .map(|e| e.label());
        window.update_title(&TitleStatus {
            speed: self.scene.starfield_speed.value(),
            panel_open: self.panel_open(),
            hovered,
        });
    }

    fn handle_action(&mut self, action: InputAction, event_loop: &ActiveEventLoop) {
        match action {
            InputAction::SpeedUp => {
                let speed = self.scene.starfield_speed.increment();
                log::info!("Starfield speed {:.1}", speed);
            }
            InputAction::SpeedDown => {
                let speed = self.scene.starfield_speed.decrement();
                log::info!("Starfield speed {:.1}", speed);
            }
            InputAction::SpeedReset => {
                let speed = self.scene.starfield_speed.reset();
                log::info!("Starfield speed reset to {:.1}", speed);
            }
            InputAction::ResetCamera => {
                self.camera = build_camera(&self.config.camera);
                log::info!("Camera reset");
            }
            InputAction::ToggleFullscreen => {
                if let Some(window) = &self.window {
                    window.toggle_fullscreen();
                }
            }
            InputAction::TogglePanel => {
                let open = !self.panel_open();
                let handle = self.panel_handle();
                if let Some(panel) = handle.and_then(|h| self.scene.world.get_entity_mut(h)) {
                    panel.set_selected(open);
                    log::info!("Control panel {}", if open { "expanded" } else { "collapsed" });
                }
            }
            InputAction::ToggleSmoothing => {
                let enabled = self.controller.toggle_smoothing();
                log::info!("Orbit smoothing: {}", if enabled { "ON" } else { "OFF" });
            }
            InputAction::Exit => event_loop.exit(),
        }
        self.refresh_title();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.poll_texture();

        let Some(render) = self.render.as_mut() else {
            return;
        };

        let aspect = render.aspect_ratio();
        let pointer = self.pointer.take_state();
        let result = self.simulation.update(
            &mut self.scene,
            &mut self.camera,
            &mut self.controller,
            pointer,
            aspect,
        );
        if !result.report.is_clean() {
            log::debug!("{} entities skipped this frame", result.report.failures.len());
        }

        match render.render_frame(&self.scene, &self.camera, TextureState::from(&self.texture)) {
            Ok(()) => {}
            Err(RenderError::SurfaceLost) => {
                log::warn!("Surface lost; reconfiguring");
                render.reconfigure();
            }
            Err(RenderError::OutOfMemory) => {
                log::error!("GPU out of memory");
                event_loop.exit();
                return;
            }
            Err(e) => log::warn!("{}", e),
        }

        if !result.events.is_empty() {
            self.refresh_title();
        }

        // Request next frame
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn build_camera(config: &CameraConfig) -> Camera3D {
    Camera3D::new(Vec3::from(config.position), Vec3::from(config.target))
        .with_projection(config.fov, config.near, config.far)
        .with_zoom_limits(config.min_distance, config.max_distance)
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = WindowSystem::create(event_loop, &self.config.window)
            .expect("Failed to create window");

        let mut render = RenderSystem::new(
            window.window().clone(),
            self.config.postprocessing.chain(),
            self.config.postprocessing.background_color,
            self.config.window.vsync,
        )
        .expect("Failed to initialise the GPU");
        render.upload_starfield(&self.scene);

        let (width, height) = render.size();
        self.pointer.set_viewport(width, height);

        self.window = Some(window);
        self.render = Some(render);
        self.refresh_title();

        log::info!("Controls: drag to orbit, scroll to zoom, click objects, Up/Down speed, P panel, R reset, F fullscreen, Esc quit");
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(render) = &mut self.render {
                    render.resize(size.width, size.height);
                }
                self.pointer.set_viewport(size.width, size.height);
            }

            WindowEvent::KeyboardInput {
                event: KeyEvent { physical_key: PhysicalKey::Code(key), state, .. },
                ..
            } => {
                if let Some(action) = InputMapper::map_keyboard(key, state) {
                    self.handle_action(action, event_loop);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.pointer.cursor_moved(position.x, position.y);
            }

            WindowEvent::CursorLeft { .. } => {
                self.pointer.cursor_left();
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.pointer.mouse_button(button, state);
                self.controller.process_mouse_button(button, state);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                };
                self.controller.process_scroll(lines);
            }

            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }

            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.controller.process_mouse_motion(delta.0, delta.1);
        }
    }
}

fn main() {
    // Configuration decides the default log level, so load it first
    let config = AppConfig::load();
    let log_level = config
        .as_ref()
        .map(|c| c.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = config.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });
    log::info!("Starting Starscape");

    // Create event loop
    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    // Create and run application
    let mut app = App::new(config);
    event_loop.run_app(&mut app).expect("Event loop error");
}
