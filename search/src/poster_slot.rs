//! A reusable display slot for one poster image.
//!
//! Each slot owns at most one fetch task. Loading a new path aborts the
//! previous task, and a task that finishes anyway only applies its image if
//! the slot still wants the same path. Fetch failures are logged and leave
//! the slot empty; a missing poster is never fatal.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use log::{debug, warn};
use tokio::task::JoinHandle;

use crate::{error::SearchError, repositories::PosterImagesRepository};

#[derive(Default)]
struct SlotState {
    current_path: Option<String>,
    image: Option<Bytes>,
    task: Option<JoinHandle<()>>,
}

fn lock(state: &Mutex<SlotState>) -> MutexGuard<'_, SlotState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Stores `result` only if `path` is still the slot's current path.
fn apply_result(state: &Mutex<SlotState>, path: &str, result: Result<Bytes, SearchError>) {
    let mut state = lock(state);
    if state.current_path.as_deref() != Some(path) {
        debug!("discarding stale poster {path}");
        return;
    }
    match result {
        Ok(image) => state.image = Some(image),
        Err(e) => warn!("failed to load poster {path}: {e}"),
    }
}

pub struct PosterImageSlot {
    repository: Arc<dyn PosterImagesRepository>,
    state: Arc<Mutex<SlotState>>,
}

impl PosterImageSlot {
    pub fn new(repository: Arc<dyn PosterImagesRepository>) -> Self {
        Self {
            repository,
            state: Arc::new(Mutex::new(SlotState::default())),
        }
    }

    /// Starts fetching `path`, superseding any fetch in flight.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn load(&self, path: impl Into<String>, width: u32) {
        let path = path.into();
        let mut state = lock(&self.state);
        if let Some(previous) = state.task.take() {
            previous.abort();
        }
        state.current_path = Some(path.clone());
        state.image = None;

        let repository = self.repository.clone();
        let shared = self.state.clone();
        state.task = Some(tokio::spawn(async move {
            let result = repository.fetch_image(&path, width).await;
            apply_result(&shared, &path, result);
        }));
    }

    /// Waits for the fetch that is in flight when called, if any.
    pub async fn finished(&self) {
        let task = lock(&self.state).task.take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    warn!("poster task failed: {e}");
                }
            }
        }
    }

    /// Aborts any fetch and forgets the current image.
    pub fn clear(&self) {
        let mut state = lock(&self.state);
        if let Some(task) = state.task.take() {
            task.abort();
        }
        state.current_path = None;
        state.image = None;
    }

    pub fn image(&self) -> Option<Bytes> {
        lock(&self.state).image.clone()
    }

    pub fn current_path(&self) -> Option<String> {
        lock(&self.state).current_path.clone()
    }
}

impl Drop for PosterImageSlot {
    fn drop(&mut self) {
        if let Some(task) = lock(&self.state).task.take() {
            task.abort();
        }
    }
}
