use std::{
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
  },
  thread,
};

use parking_lot::Mutex;
use tracing::debug;

use crate::engine::Document;

/// Runs document batch loads off the coordinating thread.
///
/// At most one load is in flight per worker; a second request while one
/// runs is a no-op, so batches never duplicate or overlap. Loader state
/// mutates only inside the single in-flight thread, and readers
/// synchronize through the mutex.
#[derive(Clone)]
pub struct LoadWorker {
  document: Arc<Mutex<Document>>,
  in_flight: Arc<AtomicBool>,
}

impl LoadWorker {
  pub fn new(document: Document) -> Self {
    Self {
      document: Arc::new(Mutex::new(document)),
      in_flight: Arc::new(AtomicBool::new(false)),
    }
  }

  /// Spawn one batch load. Returns false without spawning when a load is
  /// already in flight or the document is complete.
  pub fn spawn_next_batch(&self) -> bool {
    self.spawn(false)
  }

  /// Spawn a drain of everything remaining, same no-op rules.
  pub fn spawn_load_all(&self) -> bool {
    self.spawn(true)
  }

  fn spawn(&self, drain: bool) -> bool {
    if self.in_flight.swap(true, Ordering::SeqCst) {
      return false;
    }
    if self.document.lock().is_complete() {
      self.in_flight.store(false, Ordering::SeqCst);
      return false;
    }

    let document = self.document.clone();
    let in_flight = self.in_flight.clone();
    thread::spawn(move || {
      let appended = {
        let mut doc = document.lock();
        if drain {
          doc.load_all_remaining()
        } else {
          doc.load_next_batch()
        }
      };
      debug!(appended, drain, "background load finished");
      in_flight.store(false, Ordering::SeqCst);
    });
    true
  }

  pub fn is_loading(&self) -> bool {
    self.in_flight.load(Ordering::SeqCst)
  }

  /// Read the document from the coordinating context.
  pub fn with_document<T>(&self, f: impl FnOnce(&Document) -> T) -> T {
    f(&self.document.lock())
  }

  /// Mutate the document from the coordinating context (e.g. run a search
  /// once loading has settled).
  pub fn with_document_mut<T>(&self, f: impl FnOnce(&mut Document) -> T) -> T {
    f(&mut self.document.lock())
  }
}
