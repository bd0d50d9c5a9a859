use std::collections::VecDeque;

use crate::chart::VisualizerError;
use crate::types::SampleWindow;

/// Pull-style accessor for the current sample window.
///
/// `Ok(None)` (or a window with no frames) means no data has arrived yet.
pub trait DataAccessor {
    fn current_window(&mut self) -> Result<Option<SampleWindow>, VisualizerError>;
}

impl<F> DataAccessor for F
where
    F: FnMut() -> Result<Option<SampleWindow>, VisualizerError>,
{
    fn current_window(&mut self) -> Result<Option<SampleWindow>, VisualizerError> {
        self()
    }
}

/// Scripted accessor useful for tests and deterministic playback.
/// Yields the queued results in order, then reports no data.
pub struct ManualSource {
    queue: VecDeque<Result<Option<SampleWindow>, VisualizerError>>,
}

impl ManualSource {
    pub fn new(
        results: impl IntoIterator<Item = Result<Option<SampleWindow>, VisualizerError>>,
    ) -> Self {
        Self {
            queue: results.into_iter().collect(),
        }
    }

    pub fn from_windows(windows: impl IntoIterator<Item = SampleWindow>) -> Self {
        Self::new(windows.into_iter().map(|w| Ok(Some(w))))
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl DataAccessor for ManualSource {
    fn current_window(&mut self) -> Result<Option<SampleWindow>, VisualizerError> {
        self.queue.pop_front().unwrap_or(Ok(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_accessors() {
        let mut calls = 0;
        let mut accessor = || -> Result<Option<SampleWindow>, VisualizerError> {
            calls += 1;
            Ok(Some(SampleWindow::default()))
        };
        assert!(accessor.current_window().unwrap().is_some());
        assert!(accessor.current_window().unwrap().is_some());
        drop(accessor);
        assert_eq!(calls, 2);
    }

    #[test]
    fn manual_source_drains_then_reports_no_data() {
        let mut source = ManualSource::new(vec![
            Ok(Some(SampleWindow::default())),
            Err(VisualizerError::Accessor("sensor unplugged".into())),
        ]);
        assert!(source.current_window().unwrap().is_some());
        assert!(source.current_window().is_err());
        assert_eq!(source.remaining(), 0);
        assert!(source.current_window().unwrap().is_none());
    }
}
