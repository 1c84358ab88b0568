//! Per-frame repeating tasks with explicit cancellation.
//!
//! An [`AnimationLoop`] runs a task once per frame by asking a
//! [`FrameScheduler`] for the next frame after each run. Every start creates a
//! fresh [`CancellationToken`]; the scheduled callback checks it before doing
//! work and again before scheduling the next frame, so once
//! [`AnimationLoop::stop`] returns no further frame runs, even if the host
//! delivers a callback that was already in flight.
//!
//! Browsers provide `requestAnimationFrame`; [`ManualScheduler`] is a
//! deterministic stand-in that runs queued frames on demand.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Opaque id of a pending frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// Callback run once on the next frame.
pub type FrameCallback = Box<dyn FnOnce()>;

/// Host primitive for "run this before the next repaint".
pub trait FrameScheduler {
    /// Queues `callback` for the next frame. Returns `None` if the host
    /// refused the request.
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameHandle>;

    /// Cancels a pending request. Unknown or already-run handles are ignored.
    fn cancel_frame(&self, handle: FrameHandle);
}

/// Shared flag flipped once to stop a run of an [`AnimationLoop`].
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Rc<Cell<bool>>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the token cancelled. Calling it again has no effect.
    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

struct LoopInner {
    scheduler: Rc<dyn FrameScheduler>,
    task: RefCell<Box<dyn FnMut()>>,
    token: RefCell<Option<CancellationToken>>,
    pending: Cell<Option<FrameHandle>>,
    frames: Cell<u64>,
}

/// A task re-run every frame until stopped.
///
/// Dropping the loop stops it.
pub struct AnimationLoop {
    inner: Rc<LoopInner>,
}

impl AnimationLoop {
    /// Wraps `task` without starting it.
    pub fn new(scheduler: Rc<dyn FrameScheduler>, task: impl FnMut() + 'static) -> Self {
        Self {
            inner: Rc::new(LoopInner {
                scheduler,
                task: RefCell::new(Box::new(task)),
                token: RefCell::new(None),
                pending: Cell::new(None),
                frames: Cell::new(0),
            }),
        }
    }

    /// Runs one frame immediately and keeps running every frame after.
    /// Does nothing if already running.
    pub fn start(&self) {
        if self.is_running() {
            return;
        }
        let token = CancellationToken::new();
        *self.inner.token.borrow_mut() = Some(token.clone());
        log::debug!("animation loop started");
        run_frame(&self.inner, token);
    }

    /// Cancels the current run and any pending frame request.
    ///
    /// Safe to call repeatedly and before [`start`](Self::start).
    pub fn stop(&self) {
        if let Some(token) = self.inner.token.borrow_mut().take() {
            token.cancel();
            log::debug!("animation loop stopped after {} frames", self.frames());
        }
        if let Some(handle) = self.inner.pending.take() {
            self.inner.scheduler.cancel_frame(handle);
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner
            .token
            .borrow()
            .as_ref()
            .is_some_and(|t| !t.is_cancelled())
    }

    /// Total frames executed across all runs.
    pub fn frames(&self) -> u64 {
        self.inner.frames.get()
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for AnimationLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationLoop")
            .field("running", &self.is_running())
            .field("frames", &self.frames())
            .finish()
    }
}

fn run_frame(inner: &Rc<LoopInner>, token: CancellationToken) {
    if token.is_cancelled() {
        return;
    }
    inner.pending.set(None);
    (inner.task.borrow_mut())();
    inner.frames.set(inner.frames.get() + 1);
    if token.is_cancelled() {
        return;
    }
    let next = Rc::clone(inner);
    let next_token = token.clone();
    match inner
        .scheduler
        .request_frame(Box::new(move || run_frame(&next, next_token)))
    {
        Some(handle) => inner.pending.set(Some(handle)),
        None => {
            log::warn!("frame request refused; animation loop halted");
            token.cancel();
        }
    }
}

/// Scheduler that queues callbacks until [`ManualScheduler::run_frame`].
#[derive(Default)]
pub struct ManualScheduler {
    next_id: Cell<i32>,
    queue: RefCell<Vec<(FrameHandle, FrameCallback)>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of callbacks waiting for the next frame.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Runs every callback queued before this call and returns how many ran.
    /// Callbacks queued while running wait for the following frame.
    pub fn run_frame(&self) -> usize {
        let due = std::mem::take(&mut *self.queue.borrow_mut());
        let count = due.len();
        for (_, callback) in due {
            callback();
        }
        count
    }

    /// Runs up to `frames` frames, stopping early once nothing is queued.
    pub fn run_frames(&self, frames: usize) -> usize {
        (0..frames).take_while(|_| self.run_frame() > 0).count()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameHandle> {
        let id = self.next_id.get().wrapping_add(1);
        self.next_id.set(id);
        let handle = FrameHandle(id);
        self.queue.borrow_mut().push((handle, callback));
        Some(handle)
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.queue.borrow_mut().retain(|(h, _)| *h != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting_loop(scheduler: &Rc<ManualScheduler>) -> (AnimationLoop, Rc<Cell<u32>>) {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let lp = AnimationLoop::new(scheduler.clone(), move || c.set(c.get() + 1));
        (lp, count)
    }

    /// Scheduler that refuses every request.
    struct RefusingScheduler;

    impl FrameScheduler for RefusingScheduler {
        fn request_frame(&self, _callback: FrameCallback) -> Option<FrameHandle> {
            None
        }
        fn cancel_frame(&self, _handle: FrameHandle) {}
    }

    #[test]
    fn token_cancel_is_idempotent() {
        let t = CancellationToken::new();
        assert!(!t.is_cancelled());
        t.cancel();
        t.cancel();
        assert!(t.is_cancelled());
        assert!(t.clone().is_cancelled());
    }

    #[test]
    fn start_runs_first_frame_immediately_and_schedules_next() {
        let sched = Rc::new(ManualScheduler::new());
        let (lp, count) = counting_loop(&sched);
        lp.start();
        assert_eq!(count.get(), 1);
        assert_eq!(sched.pending(), 1);
        assert!(lp.is_running());
        sched.run_frames(4);
        assert_eq!(count.get(), 5);
        assert_eq!(lp.frames(), 5);
    }

    #[test]
    fn start_while_running_does_not_double_schedule() {
        let sched = Rc::new(ManualScheduler::new());
        let (lp, count) = counting_loop(&sched);
        lp.start();
        lp.start();
        assert_eq!(count.get(), 1);
        assert_eq!(sched.pending(), 1);
    }

    #[test]
    fn stop_twice_is_safe_and_no_frame_runs_after() {
        let sched = Rc::new(ManualScheduler::new());
        let (lp, count) = counting_loop(&sched);
        lp.start();
        sched.run_frame();
        lp.stop();
        lp.stop();
        assert!(!lp.is_running());
        assert_eq!(sched.pending(), 0);
        assert_eq!(sched.run_frames(10), 0);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn stop_before_start_is_a_no_op() {
        let sched = Rc::new(ManualScheduler::new());
        let (lp, count) = counting_loop(&sched);
        lp.stop();
        assert_eq!(count.get(), 0);
        assert!(!lp.is_running());
    }

    #[test]
    fn in_flight_callback_is_ignored_after_stop() {
        // A scheduler that ignores cancel models a host that already
        // dequeued the callback.
        struct StickyScheduler(ManualScheduler);
        impl FrameScheduler for StickyScheduler {
            fn request_frame(&self, callback: FrameCallback) -> Option<FrameHandle> {
                self.0.request_frame(callback)
            }
            fn cancel_frame(&self, _handle: FrameHandle) {}
        }

        let sched = Rc::new(StickyScheduler(ManualScheduler::new()));
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let lp = AnimationLoop::new(sched.clone(), move || c.set(c.get() + 1));
        lp.start();
        lp.stop();
        assert_eq!(sched.0.pending(), 1);
        sched.0.run_frame();
        assert_eq!(count.get(), 1);
        assert_eq!(sched.0.pending(), 0);
    }

    #[test]
    fn restart_after_stop_resumes() {
        let sched = Rc::new(ManualScheduler::new());
        let (lp, count) = counting_loop(&sched);
        lp.start();
        lp.stop();
        lp.start();
        sched.run_frame();
        assert_eq!(count.get(), 3);
        assert_eq!(sched.pending(), 1);
    }

    #[test]
    fn task_can_stop_its_own_loop() {
        let sched = Rc::new(ManualScheduler::new());
        let slot: Rc<RefCell<Option<Rc<AnimationLoop>>>> = Rc::new(RefCell::new(None));
        let count = Rc::new(Cell::new(0));
        let (s, c) = (Rc::clone(&slot), Rc::clone(&count));
        let lp = Rc::new(AnimationLoop::new(sched.clone(), move || {
            c.set(c.get() + 1);
            if c.get() == 3 {
                if let Some(lp) = s.borrow().as_ref() {
                    lp.stop();
                }
            }
        }));
        *slot.borrow_mut() = Some(Rc::clone(&lp));
        lp.start();
        sched.run_frames(10);
        assert_eq!(count.get(), 3);
        assert!(!lp.is_running());
        slot.borrow_mut().take();
    }

    #[test]
    fn refused_request_halts_loop() {
        let lp = AnimationLoop::new(Rc::new(RefusingScheduler), || {});
        lp.start();
        assert_eq!(lp.frames(), 1);
        assert!(!lp.is_running());
    }

    #[test]
    fn drop_cancels_pending_frame() {
        let sched = Rc::new(ManualScheduler::new());
        let (lp, count) = counting_loop(&sched);
        lp.start();
        drop(lp);
        assert_eq!(sched.pending(), 0);
        sched.run_frame();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn manual_scheduler_cancel_unknown_handle_is_ignored() {
        let sched = ManualScheduler::new();
        sched.request_frame(Box::new(|| {}));
        sched.cancel_frame(FrameHandle(999));
        assert_eq!(sched.pending(), 1);
    }
}
