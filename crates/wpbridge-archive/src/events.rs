use std::fmt;
use std::sync::Arc;

/// Lifecycle of one extraction.
#[derive(Clone, Debug, PartialEq)]
pub enum HandlerEvent {
    Start,
    /// Fraction of the archive consumed, in `0.0..=1.0`.
    Progress { progress: f64 },
    Complete,
    Error { error: String },
}

impl HandlerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "backup_extract_start",
            Self::Progress { .. } => "backup_extract_progress",
            Self::Complete => "backup_extract_complete",
            Self::Error { .. } => "backup_extract_error",
        }
    }
}

/// Explicit event channel handed to every pipeline call.
///
/// Cloning is cheap; a silent reporter drops everything.
pub struct Reporter<E> {
    callback: Option<Arc<dyn Fn(E) + Send + Sync>>,
}

impl<E> Clone for Reporter<E> {
    fn clone(&self) -> Self {
        Self {
            callback: self.callback.clone(),
        }
    }
}

impl<E> fmt::Debug for Reporter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("enabled", &self.callback.is_some())
            .finish()
    }
}

impl<E> Default for Reporter<E> {
    fn default() -> Self {
        Self::silent()
    }
}

impl<E> Reporter<E> {
    pub fn new(callback: impl Fn(E) + Send + Sync + 'static) -> Self {
        Self {
            callback: Some(Arc::new(callback)),
        }
    }

    pub fn silent() -> Self {
        Self { callback: None }
    }

    pub fn emit(&self, event: E) {
        if let Some(callback) = &self.callback {
            callback(event);
        }
    }
}

impl<E: 'static> Reporter<E> {
    /// Derive a reporter for a narrower event family that forwards into this one.
    pub fn map<F>(&self, wrap: impl Fn(F) -> E + Send + Sync + 'static) -> Reporter<F> {
        match &self.callback {
            Some(callback) => {
                let callback = Arc::clone(callback);
                Reporter::new(move |event| callback(wrap(event)))
            }
            None => Reporter::silent(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_map_forwards_wrapped_events() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let outer: Reporter<String> = Reporter::new(move |e| sink.lock().unwrap().push(e));
        let inner = outer.map(|e: HandlerEvent| e.name().to_owned());

        inner.emit(HandlerEvent::Start);
        inner.emit(HandlerEvent::Complete);

        assert_eq!(
            *seen.lock().unwrap(),
            ["backup_extract_start", "backup_extract_complete"]
        );
    }

    #[test]
    fn test_silent_reporter_drops_events() {
        let r: Reporter<HandlerEvent> = Reporter::silent();
        r.emit(HandlerEvent::Start);
        let mapped = r.map(|e: HandlerEvent| e);
        mapped.emit(HandlerEvent::Complete);
    }
}
