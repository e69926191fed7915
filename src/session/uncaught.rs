//! Thread-wide handler for exceptions escaping a session callback.

use crate::model::Thrown;
use std::cell::RefCell;
use std::rc::Rc;

/// Handler receiving errors raised by session callbacks.
pub type UncaughtHandler = Rc<dyn Fn(Thrown)>;

thread_local! {
    static HANDLER: RefCell<Option<UncaughtHandler>> = const { RefCell::new(None) };
}

/// Register `handler`, returning the one it replaces.
pub fn set_uncaught_handler(handler: impl Fn(Thrown) + 'static) -> Option<UncaughtHandler> {
    HANDLER.with(|slot| slot.borrow_mut().replace(Rc::new(handler)))
}

/// Remove and return the registered handler.
pub fn take_uncaught_handler() -> Option<UncaughtHandler> {
    HANDLER.with(|slot| slot.borrow_mut().take())
}

/// Whether a handler is registered on this thread.
pub fn has_uncaught_handler() -> bool {
    HANDLER.with(|slot| slot.borrow().is_some())
}

/// The registered handler, cloned out so it may re-register while running.
pub(crate) fn uncaught_handler() -> Option<UncaughtHandler> {
    HANDLER.with(|slot| slot.borrow().clone())
}
