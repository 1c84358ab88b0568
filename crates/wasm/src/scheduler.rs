//! Browser timing primitives: `requestAnimationFrame` behind
//! [`FrameScheduler`], and one-shot `setTimeout` calls.

use crate::dom;
use portfolio_fx_core::animation::FrameCallback;
use portfolio_fx_core::{CancellationToken, FrameHandle, FrameScheduler};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

type FrameClosure = Closure<dyn FnMut()>;

/// Values owned per frame request until that frame has run or been
/// cancelled. A value whose frame just ran is only released on a later call,
/// never from inside its own callback.
#[derive(Debug)]
struct FrameSlots<T> {
    held: HashMap<i32, T>,
    spent: Vec<i32>,
}

impl<T> FrameSlots<T> {
    fn new() -> Self {
        Self {
            held: HashMap::new(),
            spent: Vec::new(),
        }
    }

    fn insert(&mut self, id: i32, value: T) {
        self.held.insert(id, value);
    }

    /// Marks `id` as run; its value goes out on the next release.
    fn ran(&mut self, id: i32) {
        self.spent.push(id);
    }

    /// Takes the values of every frame that has run.
    fn release_spent(&mut self) -> Vec<T> {
        let spent = std::mem::take(&mut self.spent);
        spent
            .into_iter()
            .filter_map(|id| self.held.remove(&id))
            .collect()
    }

    /// Takes the value of a frame that has not run yet.
    fn cancel(&mut self, id: i32) -> Option<T> {
        if self.spent.contains(&id) {
            return None;
        }
        self.held.remove(&id)
    }

    fn len(&self) -> usize {
        self.held.len()
    }
}

/// Frame scheduler backed by the window's animation frame queue.
pub struct BrowserScheduler {
    window: Window,
    slots: Rc<RefCell<FrameSlots<FrameClosure>>>,
}

impl BrowserScheduler {
    pub fn new() -> Option<Self> {
        Some(Self {
            window: dom::window()?,
            slots: Rc::new(RefCell::new(FrameSlots::new())),
        })
    }

    fn release_spent(&self) {
        let released = self.slots.borrow_mut().release_spent();
        drop(released);
    }
}

impl FrameScheduler for BrowserScheduler {
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameHandle> {
        self.release_spent();
        let id = Rc::new(Cell::new(None::<i32>));
        let own_id = Rc::clone(&id);
        let slots: Weak<RefCell<FrameSlots<FrameClosure>>> = Rc::downgrade(&self.slots);
        let mut callback = Some(callback);
        let closure: FrameClosure = Closure::wrap(Box::new(move || {
            if let Some(callback) = callback.take() {
                callback();
            }
            if let (Some(slots), Some(id)) = (slots.upgrade(), own_id.get()) {
                slots.borrow_mut().ran(id);
            }
        }) as Box<dyn FnMut()>);

        let handle = self
            .window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .ok()?;
        id.set(Some(handle));
        self.slots.borrow_mut().insert(handle, closure);
        Some(FrameHandle(handle))
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.window.cancel_animation_frame(handle.0).ok();
        let cancelled = self.slots.borrow_mut().cancel(handle.0);
        drop(cancelled);
        self.release_spent();
    }
}

impl Drop for BrowserScheduler {
    fn drop(&mut self) {
        let pending = self.slots.borrow().len();
        if pending > 0 {
            log::debug!("frame scheduler dropped with {pending} closures held");
        }
    }
}

/// Runs `f` once after `delay_ms` unless `token` is cancelled by then.
///
/// Returns `false` if the timer could not be armed.
pub fn set_timeout(delay_ms: u32, token: &CancellationToken, f: impl FnOnce() + 'static) -> bool {
    let Some(window) = dom::window() else {
        return false;
    };
    let token = token.clone();
    let js = Closure::once_into_js(move || {
        if !token.is_cancelled() {
            f();
        }
    });
    let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
    window
        .set_timeout_with_callback_and_timeout_and_arguments_0(js.unchecked_ref(), delay)
        .is_ok()
}
