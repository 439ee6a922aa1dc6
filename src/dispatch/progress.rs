/// Observer notified as segment fetches finish.
///
/// Wraps a callback receiving `(completed, total)`. The dispatcher calls it
/// exactly once per finished segment, successful or not, so `completed` rises
/// by one on each call and ends at `total`.
pub struct DispatchProgress {
    callback: Box<dyn Fn(usize, usize) + Send + Sync>,
}

impl DispatchProgress {
    pub fn new(callback: impl Fn(usize, usize) + Send + Sync + 'static) -> Self {
        Self {
            callback: Box::new(callback),
        }
    }

    /// A progress observer that ignores every report.
    pub fn noop() -> Self {
        Self {
            callback: Box::new(|_, _| {}),
        }
    }

    pub fn send(&self, completed: usize, total: usize) {
        (self.callback)(completed, total);
    }
}

impl Default for DispatchProgress {
    fn default() -> Self {
        Self::noop()
    }
}

impl std::fmt::Debug for DispatchProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchProgress").finish_non_exhaustive()
    }
}
