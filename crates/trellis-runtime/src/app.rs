#![forbid(unsafe_code)]

//! The application loop.
//!
//! [`App`] owns the container tree and the focus tracker and runs the
//! cooperative cycle: draw when dirty, poll the backend, dispatch the event
//! to the focused leaf (global Tab/BackTab cycling catches what the leaf
//! ignores), drain queued requests, repeat. Handlers never touch the app
//! directly; they capture an [`Exiter`] or [`Requests`] handle, which keeps
//! every mutation on the UI thread and in a known part of the cycle.

use crate::backend::Backend;
use crate::repaint::{RepaintHandle, RepaintSignal};
use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;
use trellis_core::event::{Event, KeyCode};
use trellis_core::geometry::Rect;
use trellis_render::Frame;
use trellis_widgets::FocusTracker;
use trellis_widgets::tree::{NodeId, Tree};

/// Loop configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// How long one poll waits for input before checking the repaint flag.
    pub poll_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            poll_timeout: Duration::from_millis(100),
        }
    }
}

impl AppConfig {
    /// Set the poll timeout.
    #[must_use]
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }
}

/// A deferred focus mutation, queued by a handler and applied by the loop
/// between dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Focus a specific leaf (silently ignored if it is not registered).
    Focus(NodeId),
    /// Advance focus in tab order.
    FocusNext,
    /// Move focus back in tab order.
    FocusPrevious,
}

/// Handle for queueing [`Request`]s from handlers. Cheap to clone;
/// UI-thread only.
#[derive(Clone, Default)]
pub struct Requests {
    queue: Rc<RefCell<Vec<Request>>>,
}

impl Requests {
    /// Queue focusing a specific leaf.
    pub fn focus(&self, id: NodeId) {
        self.queue.borrow_mut().push(Request::Focus(id));
    }

    /// Queue a tab-order advance.
    pub fn focus_next(&self) {
        self.queue.borrow_mut().push(Request::FocusNext);
    }

    /// Queue a tab-order retreat.
    pub fn focus_previous(&self) {
        self.queue.borrow_mut().push(Request::FocusPrevious);
    }

    fn take(&self) -> Vec<Request> {
        std::mem::take(&mut self.queue.borrow_mut())
    }
}

/// Hands the loop its return value. Cloned into handlers; UI-thread only
/// (a background worker reports through shared state plus the repaint
/// handle, and a frame hook or handler decides to exit).
pub struct Exiter<R> {
    slot: Rc<RefCell<Option<R>>>,
}

impl<R> Clone for Exiter<R> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<R> Exiter<R> {
    /// Set the return value; the loop exits before its next draw. The
    /// first value wins.
    pub fn set(&self, value: R) {
        let mut slot = self.slot.borrow_mut();
        if slot.is_none() {
            *slot = Some(value);
        }
    }
}

/// Handles a UI under construction captures into its handlers: the exit
/// slot, the request queue, and the repaint signal, all created before the
/// tree exists. Obtained through [`App::build`].
pub struct Handles<R> {
    exit_slot: Rc<RefCell<Option<R>>>,
    requests: Requests,
    repaint: RepaintSignal,
}

impl<R> Handles<R> {
    /// The exit handle; a handler calls [`Exiter::set`] to end the loop.
    #[must_use]
    pub fn exiter(&self) -> Exiter<R> {
        Exiter {
            slot: self.exit_slot.clone(),
        }
    }

    /// The request queue handle for deferred focus changes.
    #[must_use]
    pub fn requests(&self) -> Requests {
        self.requests.clone()
    }

    /// The thread-safe repaint handle for background workers.
    #[must_use]
    pub fn repaint(&self) -> RepaintHandle {
        self.repaint.handle()
    }
}

/// The application: tree, focus, and the run loop.
pub struct App<R = ()> {
    tree: Tree,
    root: NodeId,
    focus: FocusTracker,
    requests: Requests,
    exit_slot: Rc<RefCell<Option<R>>>,
    repaint: RepaintSignal,
    hooks: Vec<Box<dyn FnMut(&mut Tree)>>,
    config: AppConfig,
    dirty: bool,
}

impl<R> App<R> {
    /// An app over a resolved-later tree rooted at `root`.
    pub fn new(tree: Tree, root: NodeId) -> Self {
        Self::with_config(tree, root, AppConfig::default())
    }

    /// An app with explicit loop configuration.
    pub fn with_config(tree: Tree, root: NodeId, config: AppConfig) -> Self {
        Self {
            tree,
            root,
            focus: FocusTracker::new(),
            requests: Requests::default(),
            exit_slot: Rc::new(RefCell::new(None)),
            repaint: RepaintSignal::new(),
            hooks: Vec::new(),
            config,
            dirty: true,
        }
    }

    /// Build an app whose handlers need its handles.
    ///
    /// The closure receives the exit/request/repaint handles before the
    /// tree exists, so button and menu handlers can capture them at
    /// construction time:
    ///
    /// ```ignore
    /// let app: App<bool> = App::build(|handles| {
    ///     let exit = handles.exiter();
    ///     let mut tree = Tree::new();
    ///     let ok = tree.leaf(Button::new("Ok").on_press(move || exit.set(true)));
    ///     (tree, ok)
    /// });
    /// ```
    pub fn build(f: impl FnOnce(&Handles<R>) -> (Tree, NodeId)) -> Self {
        let handles = Handles {
            exit_slot: Rc::new(RefCell::new(None)),
            requests: Requests::default(),
            repaint: RepaintSignal::new(),
        };
        let (tree, root) = f(&handles);
        Self {
            tree,
            root,
            focus: FocusTracker::new(),
            requests: handles.requests,
            exit_slot: handles.exit_slot,
            repaint: handles.repaint,
            hooks: Vec::new(),
            config: AppConfig::default(),
            dirty: true,
        }
    }

    /// Replace the loop configuration.
    #[must_use]
    pub fn configured(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Run `hook` against the tree right before every resolve. The menu
    /// layer's float sync is the typical use.
    #[must_use]
    pub fn with_frame_hook(mut self, hook: impl FnMut(&mut Tree) + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// The exit handle for handlers and frame hooks.
    #[must_use]
    pub fn exiter(&self) -> Exiter<R> {
        Exiter {
            slot: self.exit_slot.clone(),
        }
    }

    /// The request queue handle for handlers.
    #[must_use]
    pub fn requests(&self) -> Requests {
        self.requests.clone()
    }

    /// A thread-safe repaint handle for background workers.
    #[must_use]
    pub fn repaint_handle(&self) -> RepaintHandle {
        self.repaint.handle()
    }

    /// The container tree.
    #[must_use]
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Mutable access to the container tree.
    pub fn tree_mut(&mut self) -> &mut Tree {
        self.dirty = true;
        &mut self.tree
    }

    /// The focus tracker.
    #[must_use]
    pub fn focus(&self) -> &FocusTracker {
        &self.focus
    }

    /// Register every focusable leaf (document order) and focus the first.
    ///
    /// [`App::run`] calls this; call it yourself when driving the loop
    /// manually in tests.
    pub fn init_focus(&mut self) {
        for id in self.tree.focusable_leaves(self.root) {
            self.focus.register(id);
        }
        if self.focus.current().is_none()
            && let Some(&first) = self.focus.order().first()
        {
            self.apply_focus_change(|focus| focus.focus(first));
        }
    }

    /// Focus a leaf immediately (with change notification).
    pub fn focus_leaf(&mut self, id: NodeId) {
        self.apply_focus_change(|focus| focus.focus(id));
    }

    fn apply_focus_change(&mut self, change: impl FnOnce(&mut FocusTracker)) {
        let before = self.focus.current();
        change(&mut self.focus);
        let after = self.focus.current();
        if before != after {
            if let Some(old) = before {
                self.tree.notify_focus(old, false);
            }
            if let Some(new) = after {
                self.tree.notify_focus(new, true);
            }
            self.dirty = true;
        }
    }

    /// Feed one event through dispatch: the focused leaf first, then the
    /// global bindings (Tab/BackTab cycle focus), then queued requests.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Resize { width, height } => {
                tracing::debug!(width, height, "terminal resized");
            }
            Event::Key(key) => {
                let consumed = match self.focus.current() {
                    Some(id) => self
                        .tree
                        .surface_mut(id)
                        .map(|surface| surface.on_key(key).is_consumed())
                        .unwrap_or(false),
                    None => false,
                };
                if !consumed {
                    match key.code {
                        KeyCode::Tab => self.requests.focus_next(),
                        KeyCode::BackTab => self.requests.focus_previous(),
                        _ => {}
                    }
                }
            }
        }
        self.dirty = true;
        self.drain_requests();
    }

    fn drain_requests(&mut self) {
        for request in self.requests.take() {
            self.apply_focus_change(|focus| match request {
                Request::Focus(id) => focus.focus(id),
                Request::FocusNext => focus.next(),
                Request::FocusPrevious => focus.previous(),
            });
        }
    }

    /// Resolve and paint one frame to the backend.
    pub fn draw(&mut self, backend: &mut dyn Backend) -> io::Result<()> {
        let size = backend.size()?;
        for hook in &mut self.hooks {
            hook(&mut self.tree);
        }
        let area = Rect::from_size(size);
        let faults = self.tree.resolve(self.root, area);
        if !faults.is_empty() {
            tracing::debug!(count = faults.len(), "layout faults this pass");
        }
        let mut frame = Frame::new(size.width, size.height);
        self.tree.render(self.root, &mut frame, &self.focus);
        backend.present(&frame)?;
        self.dirty = false;
        Ok(())
    }

    /// Whether an exit value is waiting.
    #[must_use]
    pub fn finished(&self) -> bool {
        self.exit_slot.borrow().is_some()
    }

    /// Run until a value is handed to the [`Exiter`], then return it.
    pub fn run(&mut self, backend: &mut dyn Backend) -> io::Result<Option<R>> {
        self.init_focus();
        self.dirty = true;
        loop {
            if self.finished() {
                break;
            }
            if self.repaint.take() {
                self.dirty = true;
            }
            if self.dirty {
                self.draw(backend)?;
            }
            if self.finished() {
                break;
            }
            if let Some(event) = backend.poll_event(self.config.poll_timeout)? {
                self.handle_event(event);
            }
        }
        Ok(self.exit_slot.borrow_mut().take())
    }
}
