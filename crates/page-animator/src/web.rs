//! Browser entry points.
//!
//! `start()` wires a [`PageAnimator`] to the live document once it has been
//! parsed: window resizes, contact form submissions and a
//! `requestAnimationFrame` loop that drives both timers and animations.

use crate::animator::PageAnimator;
use crate::clock::to_millis;
use crate::config::AnimatorConfig;
use crate::dom::BrowserDom;
use crate::logging;
use crate::result::{AnimatorError, AnimatorResult};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, Window};

type SharedAnimator = Rc<RefCell<PageAnimator<BrowserDom>>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

struct Runtime {
    _animator: SharedAnimator,
    _subscriptions: Vec<EventSubscription>,
    _frame: FrameCallback,
}

thread_local! {
    static RUNTIME: RefCell<Option<Runtime>> = const { RefCell::new(None) };
    static PENDING: Parked<EventSubscription> = const { Parked::new() };
}

/// A value kept alive until the runtime is up.
///
/// The DOMContentLoaded listener boots the runtime from inside its own
/// callback, so it cannot drop itself there. It is parked here and released
/// from the first animation frame instead.
struct Parked<T>(RefCell<Option<T>>);

impl<T> Parked<T> {
    const fn new() -> Self {
        Self(RefCell::new(None))
    }

    fn park(&self, value: T) {
        let previous = self.0.borrow_mut().replace(value);
        drop(previous);
    }

    /// Drop the parked value, if any
    fn release(&self) -> bool {
        let value = self.0.borrow_mut().take();
        value.is_some()
    }
}

/// An event listener that is removed from its target when dropped.
pub struct EventSubscription {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl std::fmt::Debug for EventSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSubscription")
            .field("event", &self.event)
            .finish_non_exhaustive()
    }
}

impl EventSubscription {
    /// Listen for `event` on `target`
    pub fn new<F>(target: &EventTarget, event: &'static str, handler: F) -> AnimatorResult<Self>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(js_error("add_event_listener"))?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

fn js_error(operation: &'static str) -> impl Fn(JsValue) -> AnimatorError {
    move |value| AnimatorError::Dom {
        operation,
        message: value.as_string().unwrap_or_else(|| format!("{value:?}")),
    }
}

fn to_js(error: AnimatorError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn now_ms(window: &Window) -> u64 {
    to_millis(window.performance().map_or(0.0, |p| p.now()))
}

/// Start with the default configuration
#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
    when_ready(AnimatorConfig::default()).map_err(to_js)
}

/// Start with a JSON configuration; missing fields take their defaults
#[wasm_bindgen(js_name = startWithConfig)]
pub fn start_with_config(json: &str) -> Result<(), JsValue> {
    let config = AnimatorConfig::from_json(json).map_err(to_js)?;
    when_ready(config).map_err(to_js)
}

/// Whether the page animator is running
#[wasm_bindgen(js_name = isRunning)]
pub fn is_running() -> bool {
    RUNTIME.with(|slot| slot.borrow().is_some())
}

fn when_ready(config: AnimatorConfig) -> AnimatorResult<()> {
    console_error_panic_hook::set_once();
    logging::init(None);

    if RUNTIME.with(|slot| slot.borrow().is_some()) {
        tracing::debug!("page animator already running");
        return Ok(());
    }
    let window = web_sys::window().ok_or(AnimatorError::MissingGlobal { name: "window" })?;
    let document = window
        .document()
        .ok_or(AnimatorError::MissingGlobal { name: "document" })?;
    if document.ready_state() != "loading" {
        return boot(config);
    }

    let mut config = Some(config);
    let subscription = EventSubscription::new(&document, "DOMContentLoaded", move |_| {
        if let Some(config) = config.take() {
            if let Err(e) = boot(config) {
                tracing::error!(error = %e, "page animator failed to start");
            }
        }
    })?;
    PENDING.with(|pending| pending.park(subscription));
    Ok(())
}

fn boot(config: AnimatorConfig) -> AnimatorResult<()> {
    let dom = BrowserDom::new()?;
    let window = dom.window().clone();
    let form = dom
        .document()
        .query_selector(&config.selectors.contact_form)
        .ok()
        .flatten();

    let animator: SharedAnimator = Rc::new(RefCell::new(PageAnimator::new(dom, config)?));
    animator.borrow_mut().start(now_ms(&window));

    let mut subscriptions = Vec::new();
    {
        let animator = Rc::clone(&animator);
        let clock = window.clone();
        subscriptions.push(EventSubscription::new(&window, "resize", move |_| {
            animator.borrow_mut().resize(now_ms(&clock));
        })?);
    }
    if let Some(form) = form {
        let animator = Rc::clone(&animator);
        let clock = window.clone();
        subscriptions.push(EventSubscription::new(&form, "submit", move |event: Event| {
            event.prevent_default();
            if let Err(e) = animator.borrow_mut().submit_contact(now_ms(&clock)) {
                tracing::warn!(error = %e, "contact submission failed");
            }
        })?);
    }

    let frame = run_frames(&window, Rc::clone(&animator))?;
    RUNTIME.with(|slot| {
        *slot.borrow_mut() = Some(Runtime {
            _animator: animator,
            _subscriptions: subscriptions,
            _frame: frame,
        });
    });
    Ok(())
}

fn request_frame(window: &Window, callback: &Closure<dyn FnMut(f64)>) -> AnimatorResult<i32> {
    window
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .map_err(js_error("request_animation_frame"))
}

/// Drive `animator` from `requestAnimationFrame` for the life of the page
fn run_frames(window: &Window, animator: SharedAnimator) -> AnimatorResult<FrameCallback> {
    let callback: FrameCallback = Rc::new(RefCell::new(None));
    let next = Rc::clone(&callback);
    let loop_window = window.clone();

    let mut booted = false;
    *callback.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
        if !booted {
            booted = true;
            if PENDING.with(Parked::release) {
                tracing::debug!("released DOMContentLoaded listener");
            }
        }
        animator.borrow_mut().frame(to_millis(timestamp));
        if let Some(cb) = next.borrow().as_ref() {
            if let Err(e) = request_frame(&loop_window, cb) {
                tracing::warn!(error = %e, "animation loop stopped");
            }
        }
    }));

    if let Some(cb) = callback.borrow().as_ref() {
        request_frame(window, cb)?;
    }
    Ok(callback)
}
