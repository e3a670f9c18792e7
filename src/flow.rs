//! Application event loop.
//!
//! The viewer runs a single winit loop. Everything that takes time (fetching
//! models and textures, waiting for the default selection) runs as a task on
//! the platform's executor and reports back as a [`ViewerEvent`] through the
//! event loop proxy, so all state changes happen on the loop thread.
//!
//! # Lifecycle
//!
//! 1. `resumed` creates the window and the GPU [`Context`]
//! 2. every enabled model starts loading in the background
//! 3. each loaded model is registered hidden and given the current appearance
//! 4. selecting a variant shows it and applies its camera framing
//! 5. every redraw advances the orbit controls and draws ground plus models
//! 6. closing the window stops the frame driver and aborts pending loads

use std::{collections::HashMap, fmt::Debug, future::Future, iter, sync::Arc};

use futures::future::{AbortHandle, abortable};
use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::Window,
};

use crate::{
    config::ViewerConfig,
    context::{Context, InitContext},
    data_structures::{
        ground::Ground,
        model::DrawModel,
        scene_graph::SceneNode,
        texture::Texture,
    },
    render::{Instanced, Render},
    resources::{load_model_gltf, texture::load_texture},
    showroom::{Input, Showroom, style::SwatchStyle, updater::TextureRequest},
};

/// The showroom as driven by the event loop: GPU scene nodes per variant.
pub type Viewer = Showroom<Box<dyn SceneNode>>;

/// Everything that reaches the loop from outside winit's own events.
pub enum ViewerEvent {
    /// The asynchronously created GPU state (web only).
    #[cfg(target_arch = "wasm32")]
    Initialized(Box<AppState>),
    ModelLoaded {
        name: String,
        node: Box<dyn SceneNode>,
    },
    ModelFailed {
        name: String,
        error: anyhow::Error,
    },
    TextureLoaded {
        request: TextureRequest,
        texture: Texture,
    },
    TextureFailed {
        request: TextureRequest,
        error: anyhow::Error,
    },
    Swatch(SwatchStyle),
    SelectModel(String),
    /// A background task completed with `event`.
    TaskFinished {
        task: TaskId,
        event: Box<ViewerEvent>,
    },
    Exit,
}

impl ViewerEvent {
    /// The page input carried by this event, or the event itself.
    fn into_input(self) -> Result<Input, Self> {
        match self {
            Self::Swatch(style) => Ok(Input::Swatch(style)),
            Self::SelectModel(name) => Ok(Input::SelectModel(name)),
            other => Err(other),
        }
    }
}

impl Debug for ViewerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(target_arch = "wasm32")]
            Self::Initialized(_) => f.write_str("Initialized"),
            Self::ModelLoaded { name, .. } => {
                f.debug_struct("ModelLoaded").field("name", name).finish()
            }
            Self::ModelFailed { name, error } => f
                .debug_struct("ModelFailed")
                .field("name", name)
                .field("error", error)
                .finish(),
            Self::TextureLoaded { request, .. } => f
                .debug_struct("TextureLoaded")
                .field("request", request)
                .finish(),
            Self::TextureFailed { request, error } => f
                .debug_struct("TextureFailed")
                .field("request", request)
                .field("error", error)
                .finish(),
            Self::Swatch(style) => f.debug_tuple("Swatch").field(style).finish(),
            Self::SelectModel(name) => f.debug_tuple("SelectModel").field(name).finish(),
            Self::TaskFinished { task, event } => f
                .debug_struct("TaskFinished")
                .field("task", task)
                .field("event", event)
                .finish(),
            Self::Exit => f.write_str("Exit"),
        }
    }
}

/// GPU context, showroom state, and surface status.
#[derive(Debug)]
pub struct AppState {
    pub(crate) ctx: Context,
    showroom: Viewer,
    is_surface_configured: bool,
}

impl AppState {
    async fn new(window: Arc<Window>, config: &ViewerConfig) -> anyhow::Result<Self> {
        let ctx = Context::new(window, config).await?;
        let showroom = Showroom::new(config.framing.clone(), config.scene.floor);
        Ok(Self {
            ctx,
            showroom,
            is_surface_configured: false,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.is_surface_configured = true;
            self.ctx.projection.resize(width, height);
            self.ctx
                .surface
                .configure(&self.ctx.device, &self.ctx.config);
            self.ctx.depth_texture = Texture::create_depth_texture(
                &self.ctx.device,
                [self.ctx.config.width, self.ctx.config.height],
                "depth_texture",
            );
        }
    }

    /// Step the camera and push pending uniform changes to the GPU.
    ///
    /// Returns whether the frame driver wants another frame.
    fn update(&mut self) -> bool {
        let running = self
            .showroom
            .advance_frame(&mut self.ctx.camera.camera, &mut self.ctx.camera.controller);
        self.ctx
            .camera
            .write_to_buffer(&self.ctx.queue, &self.ctx.projection);
        for (_, node) in self.showroom.registry_mut().iter_mut() {
            node.write_to_buffers(&self.ctx.queue, &self.ctx.device);
        }
        running
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let mut models: Vec<Instanced> = Vec::new();
            let mut grounds: Vec<&Ground> = Vec::new();
            Render::from(&self.ctx.ground).set_pipelines(&mut models, &mut grounds);
            for (_, node) in self.showroom.registry().iter() {
                Render::from(&**node).set_pipelines(&mut models, &mut grounds);
            }

            render_pass.set_pipeline(&self.ctx.pipelines.ground);
            for ground in grounds {
                render_pass.set_bind_group(0, &self.ctx.camera.bind_group, &[]);
                render_pass.set_bind_group(1, &ground.bind_group, &[]);
                render_pass.set_vertex_buffer(0, ground.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(ground.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                render_pass.draw_indexed(0..ground.num_indices, 0, 0..1);
            }

            render_pass.set_pipeline(&self.ctx.pipelines.model);
            for instanced in models {
                if instanced.amount == 0 || instanced.instance.size() == 0 {
                    continue;
                }
                render_pass.set_vertex_buffer(1, instanced.instance.slice(..));
                render_pass.draw_model_instanced(
                    instanced.model,
                    0..instanced.amount as u32,
                    &self.ctx.camera.bind_group,
                    &self.ctx.light.bind_group,
                );
            }
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn request_redraw(&self) {
        self.ctx.window.request_redraw();
    }
}

pub type TaskId = u64;

/// Abort handles of the background tasks still in flight.
#[derive(Debug, Default)]
struct TaskSet {
    next: TaskId,
    handles: HashMap<TaskId, AbortHandle>,
}

impl TaskSet {
    fn insert(&mut self, handle: AbortHandle) -> TaskId {
        let id = self.next;
        self.next += 1;
        self.handles.insert(id, handle);
        id
    }

    /// Forget a task that delivered its result. Returns whether it was known.
    fn finish(&mut self, id: TaskId) -> bool {
        self.handles.remove(&id).is_some()
    }

    fn len(&self) -> usize {
        self.handles.len()
    }

    fn abort_all(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    proxy: EventLoopProxy<ViewerEvent>,
    config: ViewerConfig,
    state: Option<AppState>,
    tasks: TaskSet,
    // Page input that arrived before `state` existed.
    pending: Vec<Input>,
}

impl App {
    fn new(event_loop: &EventLoop<ViewerEvent>, config: ViewerConfig) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            config,
            state: None,
            tasks: TaskSet::default(),
            pending: Vec::new(),
        })
    }

    /// Run `task` in the background and deliver its event to the loop.
    #[cfg(not(target_arch = "wasm32"))]
    fn spawn<T>(&mut self, task: T)
    where
        T: Future<Output = ViewerEvent> + Send + 'static,
    {
        let (task, handle) = abortable(task);
        let id = self.tasks.insert(handle);
        let proxy = self.proxy.clone();
        self.async_runtime.spawn(async move {
            if let Ok(event) = task.await {
                let event = ViewerEvent::TaskFinished {
                    task: id,
                    event: Box::new(event),
                };
                if proxy.send_event(event).is_err() {
                    log::debug!("Event loop closed before a background task finished");
                }
            }
        });
    }

    #[cfg(target_arch = "wasm32")]
    fn spawn<T>(&mut self, task: T)
    where
        T: Future<Output = ViewerEvent> + 'static,
    {
        let (task, handle) = abortable(task);
        let id = self.tasks.insert(handle);
        let proxy = self.proxy.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Ok(event) = task.await {
                let event = ViewerEvent::TaskFinished {
                    task: id,
                    event: Box::new(event),
                };
                if proxy.send_event(event).is_err() {
                    log::debug!("Event loop closed before a background task finished");
                }
            }
        });
    }

    fn start_loading(&mut self) {
        let Some(state) = &self.state else {
            return;
        };
        let init = InitContext::from(&state.ctx);
        let sources: Vec<_> = self.config.enabled_models().cloned().collect();
        for source in sources {
            let init = init.clone();
            log::info!("Loading {} from {}", source.name, source.url);
            self.spawn(async move {
                let started = Instant::now();
                match load_model_gltf(&source.url, &init).await {
                    Ok(node) => {
                        log::debug!("Fetched {} in {:?}", source.name, started.elapsed());
                        ViewerEvent::ModelLoaded {
                            name: source.name,
                            node,
                        }
                    }
                    Err(error) => ViewerEvent::ModelFailed {
                        name: source.name,
                        error,
                    },
                }
            });
        }

        // The web build schedules its default selection through the page.
        #[cfg(not(target_arch = "wasm32"))]
        {
            let name = self.config.default_model.clone();
            let delay = std::time::Duration::from_millis(self.config.default_selection_delay_ms);
            self.spawn(async move {
                tokio::time::sleep(delay).await;
                ViewerEvent::SelectModel(name)
            });
        }
    }

    fn fetch_texture(&mut self, request: TextureRequest) {
        let Some(state) = &self.state else {
            return;
        };
        let init = InitContext::from(&state.ctx);
        self.spawn(async move {
            match load_texture(&request.url, &init.device, &init.queue).await {
                Ok(texture) => ViewerEvent::TextureLoaded { request, texture },
                Err(error) => ViewerEvent::TextureFailed { request, error },
            }
        });
    }

    fn shutdown(&mut self) {
        if let Some(state) = &mut self.state {
            state.showroom.shutdown();
        }
        if self.tasks.len() > 0 {
            log::debug!("Aborting {} background tasks", self.tasks.len());
        }
        self.tasks.abort_all();
    }

    /// Apply page input, or hold it until the GPU state exists.
    fn handle_input(&mut self, input: Input) -> Option<TextureRequest> {
        let Some(state) = self.state.as_mut() else {
            log::debug!("Holding {:?} until the viewer is initialized", input);
            self.pending.push(input);
            return None;
        };
        let request = state.showroom.handle_input(
            input,
            &mut state.ctx.camera.camera,
            &mut state.ctx.camera.controller,
        );
        state.request_redraw();
        request
    }

    /// Apply held input in arrival order.
    fn replay_pending(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        if !pending.is_empty() {
            log::info!("Replaying {} inputs received during startup", pending.len());
        }
        for input in pending {
            if let Some(request) = self.handle_input(input) {
                self.fetch_texture(request);
            }
        }
    }

    /// Apply an event to the showroom; returns a texture that still needs fetching.
    fn dispatch(&mut self, event: ViewerEvent) -> Option<TextureRequest> {
        let event = match event.into_input() {
            Ok(input) => return self.handle_input(input),
            Err(event) => event,
        };
        let Some(state) = self.state.as_mut() else {
            log::warn!("Dropping {:?}: the viewer is not initialized", event);
            return None;
        };
        let request = match event {
            ViewerEvent::ModelLoaded { name, node } => state.showroom.model_loaded(&name, node),
            ViewerEvent::ModelFailed { name, error } => {
                state.showroom.model_failed(&name, &error);
                None
            }
            ViewerEvent::TextureLoaded { request, texture } => {
                state.showroom.texture_loaded(&request, texture);
                None
            }
            ViewerEvent::TextureFailed { request, error } => {
                state.showroom.texture_failed(&request, &error);
                None
            }
            // Handled above or by `user_event`.
            ViewerEvent::Swatch(_)
            | ViewerEvent::SelectModel(_)
            | ViewerEvent::TaskFinished { .. }
            | ViewerEvent::Exit => None,
            #[cfg(target_arch = "wasm32")]
            ViewerEvent::Initialized(_) => None,
        };
        state.request_redraw();
        request
    }
}

impl ApplicationHandler<ViewerEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("Showroom");

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowAttributesExtWebSys;

            match crate::web::mount_canvas() {
                Ok(canvas) => window_attributes = window_attributes.with_canvas(Some(canvas)),
                Err(e) => {
                    log::error!("Cannot mount the viewer: {e:#}");
                    event_loop.exit();
                    return;
                }
            }
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Cannot create a window: {e}");
                event_loop.exit();
                return;
            }
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            match self
                .async_runtime
                .block_on(AppState::new(window, &self.config))
            {
                Ok(app_state) => {
                    app_state.request_redraw();
                    self.state = Some(app_state);
                    self.start_loading();
                    self.replay_pending();
                }
                Err(e) => {
                    log::error!("App initialization failed: {e:#}");
                    event_loop.exit();
                }
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            let config = self.config.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match AppState::new(window, &config).await {
                    Ok(app_state) => {
                        if proxy
                            .send_event(ViewerEvent::Initialized(Box::new(app_state)))
                            .is_err()
                        {
                            log::error!("Event loop closed during initialization");
                        }
                    }
                    Err(e) => {
                        log::error!("App initialization failed: {e:#}");
                        let _ = proxy.send_event(ViewerEvent::Exit);
                    }
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: ViewerEvent) {
        match event {
            #[cfg(target_arch = "wasm32")]
            ViewerEvent::Initialized(app_state) => {
                // This is the message from our wasm `spawn_local`
                let mut app_state = *app_state;
                let size = app_state.ctx.window.inner_size();
                app_state.resize(size.width, size.height);
                app_state.request_redraw();
                self.state = Some(app_state);
                self.start_loading();
                self.replay_pending();
            }
            ViewerEvent::TaskFinished { task, event } => {
                if !self.tasks.finish(task) {
                    log::debug!("Task {} finished after it was aborted", task);
                }
                self.user_event(event_loop, *event);
            }
            ViewerEvent::Exit => {
                self.shutdown();
                event_loop.exit();
            }
            event => {
                if let Some(request) = self.dispatch(event) {
                    self.fetch_texture(request);
                }
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            state.ctx.camera.controller.handle_mouse(dx, dy);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        state.ctx.camera.controller.handle_window_events(&event);

        let follow_up = match event {
            WindowEvent::CloseRequested => Some(ViewerEvent::Exit),
            WindowEvent::Resized(size) => {
                state.resize(size.width, size.height);
                None
            }
            WindowEvent::RedrawRequested => {
                let running = state.update();
                match state.render() {
                    Ok(()) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => log::error!("Unable to render {}", e),
                }
                if running {
                    state.request_redraw();
                }
                None
            }
            #[cfg(not(target_arch = "wasm32"))]
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        logical_key,
                        state: winit::event::ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => keys::binding(
                &self.config,
                state.showroom.framing(),
                state.showroom.appearance().active_model_name(),
                &logical_key,
            ),
            _ => None,
        };

        if let Some(event) = follow_up {
            self.user_event(event_loop, event);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
        log::info!("Viewer stopped");
    }
}

/// Keyboard shortcuts standing in for the page controls on native builds.
#[cfg(not(target_arch = "wasm32"))]
mod keys {
    use winit::keyboard::{Key, NamedKey};

    use super::ViewerEvent;
    use crate::{config::ViewerConfig, showroom::framing::FramingTable};

    /// `1`-`9` pick a configured swatch, Tab cycles the framed variants and
    /// Escape quits.
    pub(super) fn binding(
        config: &ViewerConfig,
        framing: &FramingTable,
        active: &str,
        key: &Key,
    ) -> Option<ViewerEvent> {
        match key {
            Key::Named(NamedKey::Escape) => Some(ViewerEvent::Exit),
            Key::Named(NamedKey::Tab) => next_variant(framing, active).map(ViewerEvent::SelectModel),
            Key::Character(c) => {
                let digit = c.parse::<usize>().ok().filter(|d| *d >= 1)?;
                config
                    .swatches
                    .get(digit - 1)
                    .cloned()
                    .map(ViewerEvent::Swatch)
            }
            _ => None,
        }
    }

    fn next_variant(framing: &FramingTable, active: &str) -> Option<String> {
        let names: Vec<&str> = framing.names().collect();
        let next = match names.iter().position(|name| *name == active) {
            Some(i) => names.get(i + 1).or(names.first()),
            None => names.first(),
        };
        next.map(|name| name.to_string())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn selected(event: Option<ViewerEvent>) -> Option<String> {
            match event {
                Some(ViewerEvent::SelectModel(name)) => Some(name),
                _ => None,
            }
        }

        #[test]
        fn tab_cycles_through_framed_variants() {
            let config = ViewerConfig::default();
            let tab = Key::Named(NamedKey::Tab);
            let first = selected(binding(&config, &config.framing, "", &tab));
            assert_eq!(first.as_deref(), Some("mclaren"));
            let second = selected(binding(&config, &config.framing, "mclaren", &tab));
            assert_eq!(second.as_deref(), Some("porsche"));
            let wrapped = selected(binding(&config, &config.framing, "porsche", &tab));
            assert_eq!(wrapped.as_deref(), Some("mclaren"));
        }

        #[test]
        fn digits_pick_configured_swatches() {
            let config = ViewerConfig::default();
            let key = Key::Character("1".into());
            match binding(&config, &config.framing, "", &key) {
                Some(ViewerEvent::Swatch(style)) => assert_eq!(style, config.swatches[0]),
                other => panic!("unexpected {:?}", other),
            }
            let zero = Key::Character("0".into());
            assert!(binding(&config, &config.framing, "", &zero).is_none());
            let beyond = Key::Character("9".into());
            assert_eq!(
                binding(&config, &config.framing, "", &beyond).is_some(),
                config.swatches.len() >= 9
            );
        }

        #[test]
        fn escape_exits() {
            let config = ViewerConfig::default();
            let key = Key::Named(NamedKey::Escape);
            assert!(matches!(
                binding(&config, &config.framing, "", &key),
                Some(ViewerEvent::Exit)
            ));
        }
    }
}

/// Install the platform logger. Later calls keep the logger already installed.
pub fn init_logging() {
    #[cfg(not(target_arch = "wasm32"))]
    let installed = env_logger::try_init().is_ok();

    #[cfg(target_arch = "wasm32")]
    let installed = console_log::init_with_level(log::Level::Info).is_ok();

    if installed {
        log::debug!("Logger installed");
    }
}

/// Start the viewer and block until its window closes.
///
/// On the web this hands control to the browser and does not return.
pub fn run(config: ViewerConfig) -> anyhow::Result<()> {
    init_logging();

    let event_loop: EventLoop<ViewerEvent> = EventLoop::with_user_event().build()?;

    #[cfg(target_arch = "wasm32")]
    crate::web::bind_controls(
        event_loop.create_proxy(),
        &config.default_model,
        config.default_selection_delay_ms,
    )?;

    let mut app = App::new(&event_loop, config)?;

    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_input_is_separated_from_other_events() {
        let swatch = SwatchStyle::color("#ff0000");
        assert_eq!(
            ViewerEvent::Swatch(swatch.clone()).into_input().ok(),
            Some(Input::Swatch(swatch))
        );
        assert_eq!(
            ViewerEvent::SelectModel("porsche".into()).into_input().ok(),
            Some(Input::SelectModel("porsche".into()))
        );
        assert!(matches!(
            ViewerEvent::Exit.into_input(),
            Err(ViewerEvent::Exit)
        ));
    }

    #[test]
    fn finished_tasks_leave_the_set() {
        let mut tasks = TaskSet::default();
        let (first, _) = AbortHandle::new_pair();
        let (second, _) = AbortHandle::new_pair();
        let a = tasks.insert(first);
        let b = tasks.insert(second);
        assert_ne!(a, b);
        assert_eq!(tasks.len(), 2);

        assert!(tasks.finish(a));
        assert!(!tasks.finish(a));
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn abort_all_cancels_what_is_left() {
        let mut tasks = TaskSet::default();
        let (handle, _) = AbortHandle::new_pair();
        let watcher = handle.clone();
        let id = tasks.insert(handle);

        tasks.abort_all();

        assert!(watcher.is_aborted());
        assert_eq!(tasks.len(), 0);
        assert!(!tasks.finish(id));
    }

    #[test]
    fn logging_can_be_initialized_twice() {
        init_logging();
        init_logging();
        assert_ne!(log::max_level(), log::LevelFilter::Off);
    }
}
