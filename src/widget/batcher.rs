use crate::widget::surface::Surface;

/// Frame-batched output buffer.
///
/// Producers may append chunks at arbitrary frequency; the display is written
/// at most once per refresh tick. `append` is O(1) and never blocks. The
/// buffer between flushes is deliberately unbounded; a flush runs every frame,
/// so it only grows for as long as the display is stalled.
#[derive(Debug, Default)]
pub struct OutputBatcher {
    chunks: Vec<String>,
    flush_scheduled: bool,
}

impl OutputBatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one chunk in arrival order.
    ///
    /// Returns `true` when this call newly scheduled a flush; any number of
    /// further appends before the next tick coalesce into that one flush.
    pub fn append(&mut self, chunk: impl Into<String>) -> bool {
        self.chunks.push(chunk.into());
        if self.flush_scheduled {
            false
        } else {
            self.flush_scheduled = true;
            true
        }
    }

    /// Check if a flush is currently scheduled
    pub fn flush_scheduled(&self) -> bool {
        self.flush_scheduled
    }

    /// Number of chunks waiting for the next flush
    pub fn pending(&self) -> usize {
        self.chunks.len()
    }

    /// Move all buffered chunks to the surface in one write.
    ///
    /// Invoked by the refresh-tick driver, never by producers. Idempotent on
    /// an empty buffer: a flush that raced with `clear` writes nothing.
    pub fn flush(&mut self, surface: &mut dyn Surface) {
        self.flush_scheduled = false;
        if self.chunks.is_empty() {
            return;
        }
        let text = self.chunks.concat();
        self.chunks.clear();
        surface.write(&text);
        surface.scroll_to_end();
    }

    /// Drop buffered chunks without cancelling a scheduled flush.
    ///
    /// A new execute resets the display; an already-scheduled flush must
    /// still run harmlessly rather than being cancelled unsafely.
    pub fn clear(&mut self) {
        self.chunks.clear();
    }
}
