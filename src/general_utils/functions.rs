use log::warn;
use serde_json::Value;

/// Run `f`, turning an error into `None`. The error is logged, not returned.
pub fn safe_call<T, F>(f: F) -> Option<T>
where
    F: FnOnce() -> anyhow::Result<T>,
{
    match f() {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("safe_call: {:#}", err);
            None
        }
    }
}

/// Call `f` with `value` unless it is JSON null.
pub fn call_on<R, F>(value: &Value, f: F) -> Option<R>
where
    F: FnOnce(&Value) -> R,
{
    if value.is_null() {
        None
    } else {
        Some(f(value))
    }
}

/// Start a dispatch on `key`. See [`Switch`].
pub fn switch_on<K: PartialEq, R>(key: K) -> Switch<K, R> {
    Switch { key, result: None }
}

/// Lazily evaluated dispatch table.
///
/// The first case whose key equals the switched-on key runs; later cases
/// are skipped without evaluating their bodies.
///
/// ```
/// use utils_toolkit::general_utils::switch_on;
///
/// let label = switch_on("b")
///     .case("a", || "first")
///     .case("b", || "second")
///     .otherwise(|| "unknown");
/// assert_eq!(label, "second");
/// ```
#[derive(Debug)]
#[must_use]
pub struct Switch<K, R> {
    key: K,
    result: Option<R>,
}

impl<K: PartialEq, R> Switch<K, R> {
    pub fn case<F>(mut self, candidate: K, f: F) -> Self
    where
        F: FnOnce() -> R,
    {
        if self.result.is_none() && self.key == candidate {
            self.result = Some(f());
        }
        self
    }

    pub fn otherwise<F>(self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.result.unwrap_or_else(f)
    }

    pub fn finish(self) -> Option<R> {
        self.result
    }
}
