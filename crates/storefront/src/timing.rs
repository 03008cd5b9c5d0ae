//! Timers for background tasks.

use leptos::{prelude::*, task};

/// Counter that invalidates in-flight tasks when bumped.
///
/// A task captures the current value when it starts and checks it after
/// every await; tasks from an older generation stop without touching state.
#[derive(Debug, Clone, Copy)]
pub struct Generation {
    current: RwSignal<u64>,
}

impl Generation {
    /// Fresh counter owned by the current reactive scope.
    pub fn new() -> Self {
        Self {
            current: RwSignal::new(0),
        }
    }

    /// Invalidate every running task and return the new generation.
    pub fn bump(self) -> u64 {
        self.current
            .try_update(|generation| {
                *generation = generation.saturating_add(1);
                *generation
            })
            .unwrap_or(u64::MAX)
    }

    /// Generation new tasks should capture.
    pub fn run_id(self) -> u64 {
        self.current.try_get_untracked().unwrap_or(u64::MAX)
    }

    /// Whether a task started at `run_id` may still write.
    ///
    /// A disposed counter (the owning component was torn down) is never
    /// current.
    pub fn is_current(self, run_id: u64) -> bool {
        self.current.try_get_untracked() == Some(run_id)
    }

    /// Bump the counter when the owning component is cleaned up.
    pub fn cancel_on_cleanup(self) {
        on_cleanup(move || {
            self.bump();
        });
    }
}

impl Default for Generation {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve after `delay_ms` using the browser's `setTimeout`.
#[cfg(target_arch = "wasm32")]
pub async fn wait_for_timeout(delay_ms: i32) {
    use js_sys::{Function, Promise};
    use wasm_bindgen::{JsCast, JsValue, closure::Closure};
    use wasm_bindgen_futures::JsFuture;

    let mut executor = move |resolve: Function, _reject: Function| {
        let Some(window) = web_sys::window() else {
            resolve.call0(&JsValue::NULL).ok();
            return;
        };

        let callback = Closure::once_into_js(move || {
            resolve.call0(&JsValue::NULL).ok();
        });

        window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                delay_ms,
            )
            .ok();
    };

    let promise = Promise::new(&mut executor);
    JsFuture::from(promise).await.ok();
}

/// Yield once; native builds have no browser timer.
#[cfg(not(target_arch = "wasm32"))]
pub async fn wait_for_timeout(_delay_ms: i32) {
    task::tick().await;
}

/// Spawn `future` on the UI thread.
pub fn spawn<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    task::spawn_local(future);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bump_invalidates_older_runs() {
        let generation = Generation::new();
        let first = generation.run_id();

        assert!(generation.is_current(first));

        let second = generation.bump();

        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
    }

    #[test]
    fn disposed_generation_is_never_current() {
        let generation = Generation::new();
        let run_id = generation.run_id();

        generation.current.dispose();

        assert!(!generation.is_current(run_id));
    }
}
