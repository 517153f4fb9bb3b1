//! `Handle<T>`: a shared, observable indirection cell.
//!
//! Consumers hold a `Handle<T>` instead of the target itself.  All clones of
//! a handle share one *link*; a [`RelinkableHandle`] can swap the link's
//! target and every consumer sees the new target on its next dereference.
//!
//! The link is itself observable:
//! * relinking always notifies the handle's observers;
//! * changes of the target are forwarded only when the link was created
//!   (or relinked) with `register_as_observer = true`.
//!
//! A link either owns its target (`Rc`) or borrows it (`Weak`).  A borrowed
//! target can be dropped behind the handle's back, after which
//! dereferencing fails with [`Error::DanglingHandle`].

use std::cell::{Cell, RefCell};
use std::fmt;
use std::ops::Deref;
use std::rc::{Rc, Weak};

use crate::errors::{Error, Result};
use crate::patterns::observable::{Observable, ObservableImpl, Observer};

enum Target<T: ?Sized> {
    Empty,
    Owned(Rc<T>),
    Borrowed(Weak<T>),
}

impl<T: ?Sized> Target<T> {
    fn current(&self) -> Result<Rc<T>> {
        match self {
            Target::Empty => Err(Error::EmptyHandle),
            Target::Owned(rc) => Ok(Rc::clone(rc)),
            Target::Borrowed(weak) => weak.upgrade().ok_or(Error::DanglingHandle),
        }
    }
}

struct Link<T: ?Sized> {
    target: RefCell<Target<T>>,
    is_observer: Cell<bool>,
    observers: ObservableImpl,
    me: Weak<Link<T>>,
}

impl<T: ?Sized + Observable + 'static> Link<T> {
    fn new(target: Target<T>, register_as_observer: bool) -> Rc<Self> {
        let link = Rc::new_cyclic(|me| Link {
            target: RefCell::new(Target::Empty),
            is_observer: Cell::new(false),
            observers: ObservableImpl::new(),
            me: me.clone(),
        });
        link.attach(target, register_as_observer);
        link
    }

    fn as_observer(&self) -> Weak<dyn Observer> {
        self.me.clone()
    }

    fn attach(&self, target: Target<T>, register_as_observer: bool) {
        let old = self.target.replace(target);
        if self.is_observer.get() {
            if let Ok(old) = old.current() {
                old.unregister_observer(&self.as_observer());
            }
        }
        self.is_observer.set(register_as_observer);
        if register_as_observer {
            let current = self.target.borrow().current();
            if let Ok(current) = current {
                current.register_observer(self.as_observer());
            }
        }
    }

    fn link_to(&self, target: Target<T>, register_as_observer: bool) -> Result<()> {
        self.attach(target, register_as_observer);
        self.observers.notify()
    }
}

impl<T: ?Sized> Observer for Link<T> {
    fn update(&self) -> Result<()> {
        self.observers.notify()
    }
}

/// A shared, possibly empty reference to a `T`.
///
/// The target of a plain `Handle` never changes after construction; use a
/// [`RelinkableHandle`] to swap it.
pub struct Handle<T: ?Sized> {
    link: Rc<Link<T>>,
}

impl<T: ?Sized + Observable + 'static> Handle<T> {
    /// An owning handle that forwards the target's notifications.
    pub fn new(target: Rc<T>) -> Self {
        Self::with_observation(target, true)
    }

    /// An owning handle; `register_as_observer` controls forwarding.
    pub fn with_observation(target: Rc<T>, register_as_observer: bool) -> Self {
        Self {
            link: Link::new(Target::Owned(target), register_as_observer),
        }
    }

    /// A non-owning handle.  The target must be kept alive elsewhere.
    pub fn borrowed(target: &Rc<T>, register_as_observer: bool) -> Self {
        Self {
            link: Link::new(Target::Borrowed(Rc::downgrade(target)), register_as_observer),
        }
    }

    /// A handle with no target.
    pub fn empty() -> Self {
        Self {
            link: Link::new(Target::Empty, false),
        }
    }

    /// The current target.
    ///
    /// Fails with [`Error::EmptyHandle`] if nothing is linked and with
    /// [`Error::DanglingHandle`] if a borrowed target has been dropped.
    pub fn current(&self) -> Result<Rc<T>> {
        self.link.target.borrow().current()
    }

    /// `true` if dereferencing would fail.
    pub fn is_empty(&self) -> bool {
        self.current().is_err()
    }

    /// `true` if the handle forwards its target's notifications.
    pub fn is_observing(&self) -> bool {
        self.link.is_observer.get()
    }
}

impl<T: ?Sized> Handle<T> {
    /// `true` if both handles share the same link.
    pub fn ptr_eq(&self, other: &Handle<T>) -> bool {
        Rc::ptr_eq(&self.link, &other.link)
    }
}

impl<T: ?Sized> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            link: Rc::clone(&self.link),
        }
    }
}

impl<T: ?Sized + Observable + 'static> Default for Handle<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: ?Sized> Observable for Handle<T> {
    fn observers(&self) -> &ObservableImpl {
        &self.link.observers
    }
}

impl<T: ?Sized> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &*self.link.target.borrow() {
            Target::Empty => "empty",
            Target::Owned(_) => "owned",
            Target::Borrowed(w) if w.strong_count() > 0 => "borrowed",
            Target::Borrowed(_) => "dangling",
        };
        f.debug_struct("Handle")
            .field("target", &state)
            .field("observing", &self.link.is_observer.get())
            .finish()
    }
}

/// A [`Handle`] whose target can be swapped at runtime.
///
/// Every handle obtained through [`handle`][Self::handle] (or by cloning)
/// shares the same link and follows relinks.
pub struct RelinkableHandle<T: ?Sized> {
    handle: Handle<T>,
}

impl<T: ?Sized + Observable + 'static> RelinkableHandle<T> {
    /// A relinkable handle initially owning and observing `target`.
    pub fn new(target: Rc<T>) -> Self {
        Self {
            handle: Handle::new(target),
        }
    }

    /// A relinkable handle with no target.
    pub fn empty() -> Self {
        Self {
            handle: Handle::empty(),
        }
    }

    /// Link to an owned target and notify observers.
    pub fn link_to(&self, target: Rc<T>, register_as_observer: bool) -> Result<()> {
        self.handle
            .link
            .link_to(Target::Owned(target), register_as_observer)
    }

    /// Link to a target owned elsewhere and notify observers.
    pub fn link_to_borrowed(&self, target: &Rc<T>, register_as_observer: bool) -> Result<()> {
        self.handle
            .link
            .link_to(Target::Borrowed(Rc::downgrade(target)), register_as_observer)
    }

    /// Detach from the current target and notify observers.
    pub fn unlink(&self) -> Result<()> {
        self.handle.link.link_to(Target::Empty, false)
    }

    /// A handle sharing this link.
    pub fn handle(&self) -> Handle<T> {
        self.handle.clone()
    }
}

impl<T: ?Sized> Clone for RelinkableHandle<T> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
        }
    }
}

impl<T: ?Sized + Observable + 'static> Default for RelinkableHandle<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: ?Sized> Deref for RelinkableHandle<T> {
    type Target = Handle<T>;

    fn deref(&self) -> &Handle<T> {
        &self.handle
    }
}

impl<T: ?Sized> Observable for RelinkableHandle<T> {
    fn observers(&self) -> &ObservableImpl {
        &self.handle.link.observers
    }
}

impl<T: ?Sized> fmt::Debug for RelinkableHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Relinkable{:?}", self.handle)
    }
}
