use crate::value::Value;

pub const DEFAULT_REVEAL_THRESHOLD: usize = 100;
pub const DEFAULT_REVEAL_BATCH_SIZE: usize = 50;

/// Reveals an already-fully-parsed root array in fixed-size slices.
///
/// Unlike the record loader there is no parsing left to amortize, only
/// rendering cost: revealing a batch is pure slicing. Arrays at or below
/// the threshold are fully visible from the start.
#[derive(Debug)]
pub struct ArrayRevealer {
  items: Vec<Value>,
  visible: usize,
  batch_size: usize,
  needs_lazy_loading: bool,
}

impl ArrayRevealer {
  pub fn new(items: Vec<Value>, threshold: usize, batch_size: usize) -> Self {
    let total = items.len();
    let batch_size = batch_size.max(1);
    let needs_lazy_loading = total > threshold;
    let visible = if needs_lazy_loading {
      batch_size.min(total)
    } else {
      total
    };
    Self {
      items,
      visible,
      batch_size,
      needs_lazy_loading,
    }
  }

  pub fn load_next_batch(&mut self) {
    self.visible = (self.visible + self.batch_size).min(self.items.len());
  }

  pub fn load_all_remaining(&mut self) {
    self.visible = self.items.len();
  }

  pub fn visible_items(&self) -> &[Value] {
    &self.items[..self.visible]
  }

  pub fn total_count(&self) -> usize {
    self.items.len()
  }

  /// Reveals are synchronous slices; nothing is ever in flight.
  pub fn is_loading(&self) -> bool {
    false
  }

  pub fn is_complete(&self) -> bool {
    self.visible == self.items.len()
  }

  pub fn needs_lazy_loading(&self) -> bool {
    self.needs_lazy_loading
  }
}
