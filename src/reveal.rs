//! Reveal-on-scroll: one-shot visibility tracking for content blocks.
//!
//! The viewport primitive is a capability ([`ViewportObserver`]) supplied by
//! the host. [`TerminalViewport`] is the TUI's implementation; tests drive it
//! directly. [`VisibilityRevealer`] sits on top and turns intersection
//! records into a latched boolean per handle.
//!
//! Lifetimes: a [`RevealHandle`] owns its registration. Dropping it
//! unobserves the target and removes the registration, so a released handle
//! can never emit again. The revealer is single-threaded (`Rc`/`RefCell`).

use std::cell::{RefCell, RefMut};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use thiserror::Error;
use tracing::{debug, warn};

// ============================================================================
// GEOMETRY
// ============================================================================

/// Vertical extent of a target in document rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub top: u32,
    pub height: u32,
}

impl Bounds {
    pub fn new(top: u32, height: u32) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> u32 {
        self.top.saturating_add(self.height)
    }
}

/// Adjustment applied to the viewport box before intersecting, in rows.
///
/// Negative values shrink the box, so a target must scroll further in
/// before it counts as visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RootMargin(pub i32);

/// Whether `target` intersects the viewport `[scroll_top, scroll_top+height)`
/// grown (or shrunk) by `margin` on both edges.
///
/// Shrinking stops at one row, so a short terminal still reveals whatever
/// crosses its middle.
pub fn intersects(target: Bounds, margin: RootMargin, scroll_top: u32, height: u32) -> bool {
    let max_shrink = i64::from(height.saturating_sub(1) / 2);
    let margin = i64::from(margin.0).max(-max_shrink);
    let root_top = i64::from(scroll_top) - margin;
    let root_bottom = i64::from(scroll_top) + i64::from(height) + margin;
    if root_bottom <= root_top || target.height == 0 {
        return false;
    }
    i64::from(target.top) < root_bottom && i64::from(target.bottom()) > root_top
}

// ============================================================================
// CAPABILITY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObservationId(u64);

/// One intersection change reported by the observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntersectionRecord {
    pub id: ObservationId,
    pub is_intersecting: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ObserverError {
    #[error("viewport observation is unavailable in this environment")]
    Unavailable,
}

/// Host-provided viewport intersection tracking.
pub trait ViewportObserver {
    /// Start tracking `target`. The observer reports the initial state as
    /// its first record.
    fn observe(&mut self, target: Bounds, margin: RootMargin)
    -> Result<ObservationId, ObserverError>;

    /// Stop tracking; no further records are produced for `id`.
    fn unobserve(&mut self, id: ObservationId);

    /// Drain records queued since the last call.
    fn take_records(&mut self) -> Vec<IntersectionRecord>;
}

// ============================================================================
// TERMINAL VIEWPORT
// ============================================================================

#[derive(Debug)]
struct Target {
    bounds: Bounds,
    margin: RootMargin,
    last: Option<bool>,
}

/// Viewport over a vertically scrolled document.
///
/// The TUI pushes the scroll offset and each target's bounds; a record is
/// queued whenever a target's intersection state changes, and once when it
/// is first observed.
#[derive(Debug)]
pub struct TerminalViewport {
    available: bool,
    scroll_top: u32,
    height: u32,
    next_id: u64,
    targets: BTreeMap<ObservationId, Target>,
    records: Vec<IntersectionRecord>,
}

impl TerminalViewport {
    pub fn new(scroll_top: u32, height: u32) -> Self {
        Self {
            available: true,
            scroll_top,
            height,
            next_id: 0,
            targets: BTreeMap::new(),
            records: Vec::new(),
        }
    }

    /// A viewport that cannot observe anything (reveal disabled).
    pub fn disabled() -> Self {
        Self {
            available: false,
            ..Self::new(0, 0)
        }
    }

    /// Move or resize the viewport and queue records for changed targets.
    pub fn set_viewport(&mut self, scroll_top: u32, height: u32) {
        if (scroll_top, height) == (self.scroll_top, self.height) {
            return;
        }
        self.scroll_top = scroll_top;
        self.height = height;
        let ids: Vec<ObservationId> = self.targets.keys().copied().collect();
        for id in ids {
            self.evaluate(id);
        }
    }

    /// Update a target's bounds after relayout.
    pub fn set_bounds(&mut self, id: ObservationId, bounds: Bounds) {
        if let Some(target) = self.targets.get_mut(&id) {
            if target.bounds != bounds {
                target.bounds = bounds;
                self.evaluate(id);
            }
        }
    }

    fn evaluate(&mut self, id: ObservationId) {
        let (scroll_top, height) = (self.scroll_top, self.height);
        if let Some(target) = self.targets.get_mut(&id) {
            let now = intersects(target.bounds, target.margin, scroll_top, height);
            if target.last != Some(now) {
                target.last = Some(now);
                self.records.push(IntersectionRecord {
                    id,
                    is_intersecting: now,
                });
            }
        }
    }
}

impl ViewportObserver for TerminalViewport {
    fn observe(
        &mut self,
        target: Bounds,
        margin: RootMargin,
    ) -> Result<ObservationId, ObserverError> {
        if !self.available {
            return Err(ObserverError::Unavailable);
        }
        let id = ObservationId(self.next_id);
        self.next_id += 1;
        self.targets.insert(
            id,
            Target {
                bounds: target,
                margin,
                last: None,
            },
        );
        self.evaluate(id);
        Ok(id)
    }

    fn unobserve(&mut self, id: ObservationId) {
        self.targets.remove(&id);
        self.records.retain(|r| r.id != id);
    }

    fn take_records(&mut self) -> Vec<IntersectionRecord> {
        std::mem::take(&mut self.records)
    }
}

// ============================================================================
// REVEALER
// ============================================================================

type Listener = Box<dyn FnMut(bool)>;

struct Registration {
    observation: Option<ObservationId>,
    visible: bool,
    listeners: Vec<Listener>,
}

struct Registry<O> {
    observer: O,
    next_key: u64,
    entries: BTreeMap<u64, Registration>,
}

impl<O: ViewportObserver> Registry<O> {
    fn release(&mut self, key: u64) {
        if let Some(entry) = self.entries.remove(&key) {
            if let Some(id) = entry.observation {
                self.observer.unobserve(id);
            }
            debug!(key, "reveal observation released");
        }
    }
}

/// Latching visibility tracker over an injected observer.
pub struct VisibilityRevealer<O> {
    inner: Rc<RefCell<Registry<O>>>,
}

impl<O: ViewportObserver + 'static> VisibilityRevealer<O> {
    pub fn new(observer: O) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry {
                observer,
                next_key: 0,
                entries: BTreeMap::new(),
            })),
        }
    }

    /// Register a block. The handle reads `false` until the block is seen,
    /// then `true` for good. If the observer is unavailable the handle is
    /// visible immediately.
    pub fn observe(&self, target: Bounds, margin: RootMargin) -> RevealHandle<O> {
        let mut registry = self.inner.borrow_mut();
        let key = registry.next_key;
        registry.next_key += 1;

        let (observation, visible) = match registry.observer.observe(target, margin) {
            Ok(id) => (Some(id), false),
            Err(e) => {
                warn!(error = %e, "revealing block unconditionally");
                (None, true)
            }
        };
        registry.entries.insert(
            key,
            Registration {
                observation,
                visible,
                listeners: Vec::new(),
            },
        );

        RevealHandle {
            key,
            observation,
            registry: Rc::downgrade(&self.inner),
        }
    }

    /// Deliver pending intersection records. Returns how many handles
    /// flipped to visible.
    pub fn dispatch(&self) -> usize {
        let records = self.inner.borrow_mut().observer.take_records();

        let mut revealed = Vec::new();
        {
            let mut registry = self.inner.borrow_mut();
            for record in records.iter().filter(|r| r.is_intersecting) {
                let hit = registry
                    .entries
                    .iter_mut()
                    .find(|(_, e)| e.observation == Some(record.id));
                if let Some((key, entry)) = hit {
                    if !entry.visible {
                        entry.visible = true;
                        revealed.push(*key);
                    }
                }
            }
        }

        for &key in &revealed {
            notify(&self.inner, key, true);
        }
        revealed.len()
    }

    /// Mutable access to the observer, e.g. to push new geometry.
    pub fn observer_mut(&self) -> RefMut<'_, O> {
        RefMut::map(self.inner.borrow_mut(), |r| &mut r.observer)
    }

    /// Number of live registrations.
    pub fn live(&self) -> usize {
        self.inner.borrow().entries.len()
    }
}

/// Call a registration's listeners without holding the registry borrow, so
/// listeners may themselves use the revealer.
fn notify<O: ViewportObserver>(inner: &Rc<RefCell<Registry<O>>>, key: u64, value: bool) {
    let mut listeners = match inner.borrow_mut().entries.get_mut(&key) {
        Some(entry) => std::mem::take(&mut entry.listeners),
        None => return,
    };
    for listener in listeners.iter_mut() {
        listener(value);
    }
    if let Some(entry) = inner.borrow_mut().entries.get_mut(&key) {
        listeners.append(&mut entry.listeners);
        entry.listeners = listeners;
    }
}

/// Owned registration of one observed block.
pub struct RevealHandle<O: ViewportObserver> {
    key: u64,
    observation: Option<ObservationId>,
    registry: Weak<RefCell<Registry<O>>>,
}

impl<O: ViewportObserver> RevealHandle<O> {
    /// Current latched value. Reads true once the revealer itself is gone,
    /// since nothing is left to hide the block.
    pub fn is_visible(&self) -> bool {
        let Some(inner) = self.registry.upgrade() else {
            return true;
        };
        let visible = inner.borrow().entries.get(&self.key).is_some_and(|e| e.visible);
        visible
    }

    /// The observer's id for this block, if observation is available.
    pub fn observation(&self) -> Option<ObservationId> {
        self.observation
    }

    /// Subscribe to the stream. The listener receives the current value
    /// immediately, then each change.
    pub fn on_change(&self, mut listener: impl FnMut(bool) + 'static) {
        let Some(inner) = self.registry.upgrade() else {
            return;
        };
        let current = match inner.borrow().entries.get(&self.key) {
            Some(entry) => entry.visible,
            None => return,
        };
        listener(current);
        if let Some(entry) = inner.borrow_mut().entries.get_mut(&self.key) {
            entry.listeners.push(Box::new(listener));
        }
    }

    /// Release explicitly; equivalent to dropping the handle.
    pub fn release(self) {}
}

impl<O: ViewportObserver> Drop for RevealHandle<O> {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            inner.borrow_mut().release(self.key);
        }
    }
}

impl<O: ViewportObserver> std::fmt::Debug for RevealHandle<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealHandle")
            .field("key", &self.key)
            .field("observation", &self.observation)
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
