use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll, Waker};

/// How an animation completion was reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Settled {
    /// The element did not move; nothing was animated.
    Unchanged,
    /// The host reported `transitionend` for the element.
    TransitionEnd,
    /// The fallback timer fired before any `transitionend`.
    Timeout,
    /// A newer gesture cut the animation short.
    Interrupted,
}

#[derive(Debug, Default)]
struct Inner {
    settled: Cell<Option<Settled>>,
    waker: RefCell<Option<Waker>>,
}

/// A single-resolution completion signal.
///
/// The first `resolve` wins; later calls are ignored. Clones observe the same signal. This is
/// single-threaded by construction (`Rc`), matching the event loop that drives it.
#[derive(Clone, Debug, Default)]
pub struct Completion {
    inner: Rc<Inner>,
}

impl Completion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolved(how: Settled) -> Self {
        let c = Self::new();
        c.resolve(how);
        c
    }

    /// Resolves the signal. Returns `false` if it had already been resolved.
    pub fn resolve(&self, how: Settled) -> bool {
        if self.inner.settled.get().is_some() {
            return false;
        }
        self.inner.settled.set(Some(how));
        if let Some(waker) = self.inner.waker.borrow_mut().take() {
            waker.wake();
        }
        true
    }

    pub fn is_resolved(&self) -> bool {
        self.inner.settled.get().is_some()
    }

    pub fn settled(&self) -> Option<Settled> {
        self.inner.settled.get()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Future for Completion {
    type Output = Settled;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Settled> {
        match self.inner.settled.get() {
            Some(how) => Poll::Ready(how),
            None => {
                *self.inner.waker.borrow_mut() = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

/// Fan-in over several completions: resolved once every part is.
#[derive(Clone, Debug, Default)]
pub struct Join {
    parts: Vec<Completion>,
}

impl Join {
    pub fn new(parts: Vec<Completion>) -> Self {
        Self { parts }
    }

    pub fn parts(&self) -> &[Completion] {
        &self.parts
    }

    pub fn is_resolved(&self) -> bool {
        self.parts.iter().all(Completion::is_resolved)
    }

    /// Number of parts that settled through the fallback timer.
    pub fn timed_out(&self) -> usize {
        self.parts
            .iter()
            .filter(|p| p.settled() == Some(Settled::Timeout))
            .count()
    }
}

impl Future for Join {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        let mut pending = false;
        for part in &mut this.parts {
            if Pin::new(part).poll(cx).is_pending() {
                pending = true;
            }
        }
        if pending { Poll::Pending } else { Poll::Ready(()) }
    }
}
