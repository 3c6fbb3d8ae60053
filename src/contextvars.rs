//! Ambient per-thread context merged into every event.
//!
//! Values bound here are picked up by the
//! [`MergeContextvars`](crate::processors::MergeContextvars) processor.
//! The store is thread-local, so bindings made by one test thread are never
//! seen by another.

use std::cell::RefCell;

use serde_json::Value;

use crate::event::{EventDict, IntoFields};

thread_local! {
    static CONTEXT: RefCell<EventDict> = RefCell::new(EventDict::new());
}

/// Binds fields into the current thread's context, replacing existing keys.
pub fn bind_contextvars(fields: impl IntoFields) {
    let fields = fields.into_fields();
    CONTEXT.with(|ctx| ctx.borrow_mut().extend(fields));
}

/// Removes the given keys from the current thread's context.
pub fn unbind_contextvars<I, K>(keys: I)
where
    I: IntoIterator<Item = K>,
    K: AsRef<str>,
{
    CONTEXT.with(|ctx| {
        let mut ctx = ctx.borrow_mut();
        for key in keys {
            ctx.remove(key.as_ref());
        }
    });
}

/// Clears the current thread's context.
pub fn clear_contextvars() {
    CONTEXT.with(|ctx| ctx.borrow_mut().clear());
}

/// Returns a copy of the current thread's context.
pub fn get_contextvars() -> EventDict {
    CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// Returns one bound value, if present.
pub fn get_contextvar(key: &str) -> Option<Value> {
    CONTEXT.with(|ctx| ctx.borrow().get(key).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bind_unbind_clear() {
        clear_contextvars();
        bind_contextvars([("a", 1), ("b", 2)]);
        bind_contextvars([("b", 3)]);
        assert_eq!(get_contextvar("b"), Some(json!(3)));

        unbind_contextvars(["a"]);
        assert_eq!(get_contextvar("a"), None);

        clear_contextvars();
        assert!(get_contextvars().is_empty());
    }

    #[test]
    fn context_is_per_thread() {
        clear_contextvars();
        bind_contextvars([("ctx", "main")]);

        let seen = std::thread::spawn(get_contextvars).join().expect("thread");
        assert!(seen.is_empty());

        assert_eq!(get_contextvar("ctx"), Some(json!("main")));
        clear_contextvars();
    }
}
