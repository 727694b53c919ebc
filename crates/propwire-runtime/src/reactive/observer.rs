#![forbid(unsafe_code)]

//! Observer registration and synchronous change dispatch.
//!
//! # Design
//!
//! [`PropertyChanged<S, F>`] is an ordered list of registrations. Each
//! registration holds a `Weak` reference to its observer: the source never
//! keeps an observer alive. Registrations are not deduplicated, so an
//! observer subscribed twice is called twice per change.
//!
//! Dispatch first snapshots the live observers, releases every borrow, then
//! calls them in registration order. Consequences:
//!
//! - An observer may mutate the source (or subscribe/unsubscribe) from inside
//!   its callback. A nested change runs a complete nested dispatch before the
//!   outer one resumes (depth-first).
//! - Observers registered during a dispatch are not called by that dispatch.
//! - Observers unregistered during a dispatch are still called by it.
//!
//! # Failure Modes
//!
//! - **Observer panic**: governed by [`DispatchPolicy`]. `Propagate` lets the
//!   panic unwind through `raise`; `Isolate` catches and logs it.
//! - **Unbounded recursion**: an observer that unconditionally re-sets the
//!   field it is notified about recurses until the stack overflows.
//! - **Dead observers**: dropped observers stay in the list until the next
//!   dispatch prunes them.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::ptr;
use std::rc::{Rc, Weak};

use tracing::{debug, error, trace};

use crate::config::DispatchPolicy;

/// Receiver of change notifications from a source of type `S` whose fields
/// are identified by `F`.
///
/// Closures `Fn(&S, F)` implement this trait.
pub trait PropertyObserver<S: ?Sized, F> {
    /// Called once per registration after `field` of `source` changed.
    fn property_changed(&self, source: &S, field: F);
}

impl<S: ?Sized, F, C> PropertyObserver<S, F> for C
where
    C: Fn(&S, F),
{
    fn property_changed(&self, source: &S, field: F) {
        self(source, field);
    }
}

/// The change-notification capability.
///
/// Implemented by anything that can announce field changes to registered
/// observers. Binding layers depend on this trait rather than on a concrete
/// record handle.
pub trait NotifyPropertyChanged: Sized + 'static {
    /// Field identifier carried by notifications.
    type Field: Copy + Eq + fmt::Debug + 'static;

    /// Register `observer`. The source keeps only a weak reference.
    fn subscribe<O>(&self, observer: &Rc<O>) -> SubscriptionId
    where
        O: PropertyObserver<Self, Self::Field> + 'static;

    /// Remove the most recent registration of `observer`.
    ///
    /// Returns `false` if it was not registered.
    fn unsubscribe<O>(&self, observer: &Rc<O>) -> bool
    where
        O: PropertyObserver<Self, Self::Field> + 'static;

    /// Notify all observers that `field` changed.
    fn notify(&self, field: Self::Field);
}

/// Handle identifying one registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Raw id value. Ids increase monotonically per observer list.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

type ObserverRc<S, F> = Rc<dyn PropertyObserver<S, F>>;
type ObserverWeak<S, F> = Weak<dyn PropertyObserver<S, F>>;

struct Registration<S: ?Sized, F> {
    id: SubscriptionId,
    observer: ObserverWeak<S, F>,
}

/// Ordered list of weakly held observers with synchronous dispatch.
pub struct PropertyChanged<S: ?Sized, F> {
    registrations: RefCell<Vec<Registration<S, F>>>,
    next_id: Cell<u64>,
    policy: Cell<DispatchPolicy>,
    /// Current dispatch nesting depth (0 when idle).
    depth: Cell<usize>,
}

impl<S: ?Sized + 'static, F: Copy + fmt::Debug + 'static> Default for PropertyChanged<S, F> {
    fn default() -> Self {
        Self::new(DispatchPolicy::default())
    }
}

impl<S: ?Sized, F> fmt::Debug for PropertyChanged<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyChanged")
            .field("registrations", &self.registrations.borrow().len())
            .field("policy", &self.policy.get())
            .field("depth", &self.depth.get())
            .finish()
    }
}

impl<S: ?Sized + 'static, F: Copy + fmt::Debug + 'static> PropertyChanged<S, F> {
    /// Create an empty list with the given panic policy.
    #[must_use]
    pub fn new(policy: DispatchPolicy) -> Self {
        Self {
            registrations: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
            policy: Cell::new(policy),
            depth: Cell::new(0),
        }
    }

    /// Current panic policy.
    #[must_use]
    pub fn policy(&self) -> DispatchPolicy {
        self.policy.get()
    }

    /// Change the panic policy. Takes effect for the next observer call.
    pub fn set_policy(&self, policy: DispatchPolicy) {
        self.policy.set(policy);
    }

    /// Register `observer`, keeping only a weak reference to it.
    pub fn subscribe<O>(&self, observer: &Rc<O>) -> SubscriptionId
    where
        O: PropertyObserver<S, F> + 'static,
    {
        let weak: Weak<O> = Rc::downgrade(observer);
        self.push(weak)
    }

    /// Register a closure and return a guard that owns it.
    ///
    /// Dropping the [`Subscription`] unsubscribes the closure. A dispatch that
    /// is already running still calls it; later dispatches do not, and its
    /// slot lingers until the next dispatch prunes it.
    pub fn subscribe_fn(&self, callback: impl Fn(&S, F) + 'static) -> Subscription {
        let strong: ObserverRc<S, F> = Rc::new(callback);
        let id = self.push(Rc::downgrade(&strong));
        Subscription {
            id,
            _guard: Box::new(strong),
        }
    }

    fn push(&self, observer: ObserverWeak<S, F>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let mut regs = self.registrations.borrow_mut();
        regs.push(Registration { id, observer });
        debug!(subscription = id.0, registrations = regs.len(), "observer subscribed");
        id
    }

    /// Remove the most recent registration of `observer`.
    ///
    /// Returns `false` if `observer` has no registration in this list.
    pub fn unsubscribe<O>(&self, observer: &Rc<O>) -> bool
    where
        O: PropertyObserver<S, F> + 'static,
    {
        let target = Rc::as_ptr(observer);
        let mut regs = self.registrations.borrow_mut();
        let Some(pos) = regs
            .iter()
            .rposition(|r| ptr::addr_eq(r.observer.as_ptr(), target))
        else {
            return false;
        };
        let removed = regs.remove(pos);
        debug!(
            subscription = removed.id.0,
            registrations = regs.len(),
            "observer unsubscribed"
        );
        true
    }

    /// Remove the registration with the given id.
    pub fn unsubscribe_id(&self, id: SubscriptionId) -> bool {
        let mut regs = self.registrations.borrow_mut();
        let before = regs.len();
        regs.retain(|r| r.id != id);
        let removed = regs.len() != before;
        if removed {
            debug!(subscription = id.0, registrations = regs.len(), "observer unsubscribed");
        }
        removed
    }

    /// Number of registrations whose observer is still alive.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.registrations
            .borrow()
            .iter()
            .filter(|r| r.observer.strong_count() > 0)
            .count()
    }

    /// Number of registrations, including dead ones not yet pruned.
    #[must_use]
    pub fn registration_count(&self) -> usize {
        self.registrations.borrow().len()
    }

    /// Current dispatch nesting depth; 0 outside of any dispatch.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    /// Call every live observer with `(source, field)`, in registration
    /// order, and return how many were called.
    pub fn raise(&self, source: &S, field: F) -> usize {
        let observers: Vec<ObserverRc<S, F>> = {
            let mut regs = self.registrations.borrow_mut();
            let before = regs.len();
            regs.retain(|r| r.observer.strong_count() > 0);
            if regs.len() != before {
                debug!(pruned = before - regs.len(), "pruned dead observers");
            }
            regs.iter().filter_map(|r| r.observer.upgrade()).collect()
        };

        let _depth = DepthGuard::enter(&self.depth);
        let depth = self.depth.get();
        trace!(?field, observers = observers.len(), depth, "dispatching change");

        for observer in &observers {
            match self.policy.get() {
                DispatchPolicy::Propagate => observer.property_changed(source, field),
                DispatchPolicy::Isolate => {
                    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                        observer.property_changed(source, field);
                    }));
                    if let Err(payload) = outcome {
                        error!(
                            ?field,
                            depth,
                            panic = panic_message(payload.as_ref()),
                            "observer panicked; continuing dispatch"
                        );
                    }
                }
            }
        }
        observers.len()
    }
}

/// Restores the dispatch depth even when an observer panic unwinds.
struct DepthGuard<'a>(&'a Cell<usize>);

impl<'a> DepthGuard<'a> {
    fn enter(depth: &'a Cell<usize>) -> Self {
        depth.set(depth.get() + 1);
        Self(depth)
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}

/// RAII guard for a closure registration.
///
/// Dropping the `Subscription` drops the strong `Rc` to the callback, so the
/// `Weak` in the observer list fails to upgrade on the next dispatch. A
/// dispatch already in progress holds its own snapshot and still calls it.
pub struct Subscription {
    id: SubscriptionId,
    /// Type-erased strong reference keeping the callback `Rc` alive.
    _guard: Box<dyn Any>,
}

impl Subscription {
    /// Id of the underlying registration.
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
