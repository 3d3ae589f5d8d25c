//! Gyro Room entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::{Cell, RefCell};
    use std::rc::{Rc, Weak};

    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{
        DeviceMotionEvent, DeviceOrientationEvent, Element, Event, EventTarget,
        HtmlCanvasElement, KeyboardEvent, PointerEvent,
    };

    use gyro_room::overlay;
    use gyro_room::renderer::SceneRenderState;
    use gyro_room::settings::OrientationConfig;
    use gyro_room::sim::{
        FrameEvent, InputState, MotionTelemetry, OrientationSample, PointerDrag, Scene,
        build_scene, drag_look, frame_update,
    };
    use gyro_room::{AppError, PermissionGate, Settings};

    // JS binding for the sensor permission prompt (iOS Safari and friends)
    #[wasm_bindgen(inline_js = "
        export function sensor_permission_required() {
            return typeof DeviceOrientationEvent !== 'undefined'
                && typeof DeviceOrientationEvent.requestPermission === 'function';
        }

        export async function request_sensor_permission() {
            const orientation = await DeviceOrientationEvent.requestPermission();
            if (orientation !== 'granted') {
                return orientation;
            }
            if (typeof DeviceMotionEvent !== 'undefined'
                && typeof DeviceMotionEvent.requestPermission === 'function') {
                return await DeviceMotionEvent.requestPermission();
            }
            return orientation;
        }
    ")]
    extern "C" {
        fn sensor_permission_required() -> bool;
        fn request_sensor_permission() -> js_sys::Promise;
    }

    const COLLISION_MESSAGE: &str = "You hit an enemy!";

    thread_local! {
        static GATE: RefCell<PermissionGate> = RefCell::new(PermissionGate::new(true));
        static GATE_LISTENERS: RefCell<Option<ListenerSet>> = const { RefCell::new(None) };
        static MOUNT: RefCell<Option<Mount>> = const { RefCell::new(None) };
    }

    /// DOM listeners that are removed again when the set is dropped
    #[derive(Default)]
    struct ListenerSet {
        entries: Vec<(EventTarget, &'static str, Closure<dyn FnMut(Event)>)>,
    }

    impl ListenerSet {
        fn add(
            &mut self,
            target: &EventTarget,
            event: &'static str,
            handler: impl FnMut(Event) + 'static,
        ) -> Result<(), AppError> {
            let closure = Closure::<dyn FnMut(Event)>::new(handler);
            target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
            self.entries.push((target.clone(), event, closure));
            Ok(())
        }
    }

    impl Drop for ListenerSet {
        fn drop(&mut self) {
            for (target, event, closure) in self.entries.drain(..) {
                let _ = target
                    .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            }
        }
    }

    /// Everything one mounted scene owns
    struct Session {
        scene: Scene,
        input: InputState,
        drag: PointerDrag,
        orientation: OrientationSample,
        motion: MotionTelemetry,
        settings: Settings,
        orientation_config: OrientationConfig,
        render_state: SceneRenderState,
        canvas: HtmlCanvasElement,
        overlay: Option<Element>,
    }

    impl Session {
        fn on_key(&mut self, event: &KeyboardEvent, pressed: bool) {
            let key = event.key();
            if pressed {
                self.input.key_down(&key);
            } else {
                self.input.key_up(&key);
            }
        }

        /// Focus lost: drop held keys and the drag, rebaseline motion
        fn on_blur(&mut self) {
            self.input.clear();
            self.drag.release();
            self.motion.pause();
        }

        fn on_pointer_down(&mut self, event: &PointerEvent) {
            self.drag.press(event.client_x() as f64, event.client_y() as f64);
        }

        /// Drag look; the next orientation sample overrides it
        fn on_pointer_move(&mut self, event: &PointerEvent) {
            let Some((dx, dy)) = self
                .drag
                .move_to(event.client_x() as f64, event.client_y() as f64)
            else {
                return;
            };
            let camera = &mut self.scene.camera;
            camera.apply_orientation(drag_look(camera.orientation, dx, dy));
        }

        fn on_orientation(&mut self, event: &DeviceOrientationEvent) {
            let Some(sample) =
                OrientationSample::from_angles(event.alpha(), event.beta(), event.gamma())
            else {
                return;
            };
            self.orientation = sample;
            self.scene
                .camera
                .apply_orientation(sample.to_euler(&self.orientation_config));
            self.update_overlay();
        }

        fn on_motion(&mut self, event: &DeviceMotionEvent) {
            if !self.settings.motion_telemetry {
                return;
            }
            let Some(accel) = event.acceleration_including_gravity() else {
                return;
            };
            if self.motion.sample(event.time_stamp(), accel.x(), accel.z()) {
                self.update_overlay();
            }
        }

        fn resize(&mut self) {
            if let Some(window) = web_sys::window() {
                let (width, height) = fit_canvas(&window, &self.canvas);
                self.render_state.resize(width, height);
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            match self.render_state.render(&self.scene) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    self.render_state.reconfigure();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Refresh the sensor readout
        fn update_overlay(&self) {
            let Some(el) = &self.overlay else {
                return;
            };
            let motion = self.settings.motion_telemetry.then_some(&self.motion);
            el.set_text_content(Some(&overlay::readout(&self.orientation, motion)));
        }
    }

    /// A mounted scene; dropping it tears everything down
    struct Mount {
        session: Rc<RefCell<Session>>,
        listeners: ListenerSet,
        frame_handle: Rc<Cell<Option<i32>>>,
    }

    impl Drop for Mount {
        fn drop(&mut self) {
            if let Some(handle) = self.frame_handle.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(handle);
                }
            }
            let seed = self.session.borrow().scene.seed;
            log::info!(
                "Scene {} unmounted, removing {} listeners",
                seed,
                self.listeners.entries.len()
            );
        }
    }

    fn alert(message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }

    fn report(err: &AppError) {
        log::error!("{}", err);
        alert(&err.to_string());
    }

    /// Size the canvas backing store to its CSS size at device pixel ratio
    fn fit_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    async fn init_gpu(
        canvas: &HtmlCanvasElement,
        width: u32,
        height: u32,
    ) -> Result<SceneRenderState, AppError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| AppError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| AppError::Adapter(e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        SceneRenderState::new(surface, &adapter, width, height).await
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"logger already initialised".into());
        }

        log::info!("Gyro Room starting...");

        let required = sensor_permission_required();
        GATE.with(|g| *g.borrow_mut() = PermissionGate::new(required));

        if !required {
            log::info!("Sensor permission not required");
            start().await;
        } else if let Err(e) = setup_permission_button() {
            report(&e);
        }
    }

    /// Mount if the permission gate is open
    pub async fn start() {
        if !GATE.with(|g| g.borrow().is_granted()) {
            log::warn!("Sensor permission not granted yet, scene not mounted");
            return;
        }
        if let Err(e) = mount().await {
            report(&e);
        }
    }

    /// Tear down the current scene (no-op when nothing is mounted)
    pub fn unmount() {
        let old = MOUNT.with(|m| m.borrow_mut().take());
        drop(old);
    }

    fn setup_permission_button() -> Result<(), AppError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or(AppError::NoWindow)?;
        let button = document
            .get_element_by_id("permission-btn")
            .ok_or(AppError::MissingElement("permission-btn"))?;
        button.class_list().remove_1("hidden")?;

        let mut listeners = ListenerSet::default();
        let btn = button.clone();
        listeners.add(&button, "click", move |_event: Event| {
            if !GATE.with(|g| g.borrow_mut().begin_request()) {
                return;
            }
            // Must be called synchronously inside the click
            let promise = request_sensor_permission();
            let btn = btn.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let outcome: Result<String, String> = match JsFuture::from(promise).await {
                    Ok(value) => Ok(value.as_string().unwrap_or_default()),
                    Err(e) => Err(format!("{e:?}")),
                };
                let result = GATE.with(|g| {
                    g.borrow_mut()
                        .resolve(outcome.as_deref().map_err(|e| e.clone()))
                });
                match result {
                    Ok(()) => {
                        log::info!("Sensor permission granted");
                        let _ = btn.class_list().add_1("hidden");
                        let gate_listeners = GATE_LISTENERS.with(|g| g.borrow_mut().take());
                        drop(gate_listeners);
                        start().await;
                    }
                    Err(e) => report(&AppError::from(e)),
                }
            });
        })?;

        GATE_LISTENERS.with(|g| *g.borrow_mut() = Some(listeners));
        log::info!("Waiting for sensor permission");
        Ok(())
    }

    async fn mount() -> Result<(), AppError> {
        unmount();

        let window = web_sys::window().ok_or(AppError::NoWindow)?;
        let document = window.document().ok_or(AppError::NoWindow)?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or(AppError::MissingElement("canvas"))?
            .dyn_into()
            .map_err(|_| AppError::MissingElement("canvas"))?;

        let (width, height) = fit_canvas(&window, &canvas);

        let settings = Settings::load();
        // Write back so every field is present for hand editing
        settings.save();

        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let scene = build_scene(&settings.scene_config(), seed);

        let render_state = init_gpu(&canvas, width, height).await?;

        let overlay = document.get_element_by_id("overlay");
        if let Some(el) = &overlay {
            if settings.show_overlay {
                el.class_list().remove_1("hidden")?;
            } else {
                el.class_list().add_1("hidden")?;
            }
        }

        let session = Rc::new(RefCell::new(Session {
            scene,
            input: InputState::default(),
            drag: PointerDrag::default(),
            orientation: OrientationSample::default(),
            motion: MotionTelemetry::default(),
            orientation_config: settings.orientation_config(),
            overlay: overlay.filter(|_| settings.show_overlay),
            settings,
            render_state,
            canvas,
        }));
        session.borrow().update_overlay();

        let listeners = attach_listeners(&window, &session)?;
        let frame_handle = Rc::new(Cell::new(None));
        request_frame(Rc::downgrade(&session), frame_handle.clone());

        let previous = MOUNT.with(|m| {
            m.borrow_mut().replace(Mount {
                session,
                listeners,
                frame_handle,
            })
        });
        drop(previous);

        log::info!("Scene mounted with seed {}", seed);
        Ok(())
    }

    fn attach_listeners(
        window: &web_sys::Window,
        session: &Rc<RefCell<Session>>,
    ) -> Result<ListenerSet, AppError> {
        let mut listeners = ListenerSet::default();

        // Keyboard
        {
            let session = session.clone();
            listeners.add(window, "keydown", move |event: Event| {
                if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                    session.borrow_mut().on_key(event, true);
                }
            })?;
        }
        {
            let session = session.clone();
            listeners.add(window, "keyup", move |event: Event| {
                if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                    session.borrow_mut().on_key(event, false);
                }
            })?;
        }

        // Pointer drag look: starts on the canvas, tracked on the window
        let canvas = session.borrow().canvas.clone();
        {
            let session = session.clone();
            listeners.add(&canvas, "pointerdown", move |event: Event| {
                if let Some(event) = event.dyn_ref::<PointerEvent>() {
                    session.borrow_mut().on_pointer_down(event);
                }
            })?;
        }
        {
            let session = session.clone();
            listeners.add(window, "pointermove", move |event: Event| {
                if let Some(event) = event.dyn_ref::<PointerEvent>() {
                    session.borrow_mut().on_pointer_move(event);
                }
            })?;
        }
        for name in ["pointerup", "pointercancel"] {
            let session = session.clone();
            listeners.add(window, name, move |_event: Event| {
                session.borrow_mut().drag.release();
            })?;
        }

        {
            let session = session.clone();
            listeners.add(window, "blur", move |_event: Event| {
                session.borrow_mut().on_blur();
            })?;
        }

        // Device orientation
        {
            let session = session.clone();
            listeners.add(window, "deviceorientation", move |event: Event| {
                if let Some(event) = event.dyn_ref::<DeviceOrientationEvent>() {
                    session.borrow_mut().on_orientation(event);
                }
            })?;
        }

        // Device motion
        {
            let session = session.clone();
            listeners.add(window, "devicemotion", move |event: Event| {
                if let Some(event) = event.dyn_ref::<DeviceMotionEvent>() {
                    session.borrow_mut().on_motion(event);
                }
            })?;
        }

        // Resize
        {
            let session = session.clone();
            listeners.add(window, "resize", move |_event: Event| {
                session.borrow_mut().resize();
            })?;
        }

        // Page going away; unmount after this handler returns
        listeners.add(window, "pagehide", move |_event: Event| {
            wasm_bindgen_futures::spawn_local(async { unmount() });
        })?;

        Ok(listeners)
    }

    fn request_frame(session: Weak<RefCell<Session>>, handle: Rc<Cell<Option<i32>>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let next = handle.clone();
        let closure = Closure::once(move |_time: f64| {
            next.set(None);
            frame(session, next);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => handle.set(Some(id)),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn frame(session: Weak<RefCell<Session>>, handle: Rc<Cell<Option<i32>>>) {
        // Unmounted: let the loop die
        let Some(strong) = session.upgrade() else {
            return;
        };

        let event = {
            let mut s = strong.borrow_mut();
            let s = &mut *s;
            let event = frame_update(&mut s.scene, &s.input);
            s.render();
            event
        };
        drop(strong);

        if let Some(FrameEvent::EnemyCollision { enemy_id }) = event {
            log::info!("Enemy {} reached, camera reset to spawn", enemy_id);
            alert(COLLISION_MESSAGE);
        }

        request_frame(session, handle);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

/// Mount (or remount) the scene from JS
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub async fn mount_scene() {
    wasm_app::start().await;
}

/// Tear the scene down from JS
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn unmount_scene() {
    wasm_app::unmount();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Gyro Room (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    walk_scene();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Walk out from spawn along eight headings and report what gets hit
#[cfg(not(target_arch = "wasm32"))]
fn walk_scene() {
    use gyro_room::Settings;
    use gyro_room::consts::SPAWN_POINT;
    use gyro_room::sim::{CameraEuler, FrameEvent, InputState, build_scene, frame_update};
    use std::f32::consts::FRAC_PI_4;

    let settings = Settings::load();
    let seed = settings.seed.unwrap_or(12345);
    let mut scene = build_scene(&settings.scene_config(), seed);

    let mut input = InputState::default();
    input.key_down("w");

    let mut hits = 0;
    for heading in 0..8 {
        scene.camera.position = SPAWN_POINT;
        scene.camera.apply_orientation(CameraEuler {
            yaw: heading as f32 * FRAC_PI_4,
            ..Default::default()
        });
        for frame in 0..100 {
            if let Some(FrameEvent::EnemyCollision { enemy_id }) = frame_update(&mut scene, &input) {
                log::info!("Heading {}: enemy {} hit on frame {}", heading, enemy_id, frame);
                hits += 1;
                break;
            }
        }
    }

    println!("Seed {}: {} of 8 headings ran into an enemy", seed, hits);
}
