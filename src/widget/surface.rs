/// Display surface the widget writes batched output to.
///
/// Rendering itself is out of scope; the widget only needs an append-style
/// text sink that can be cleared and scrolled.
pub trait Surface {
    /// Append text to the display
    fn write(&mut self, text: &str);

    /// Clear all displayed text
    fn clear(&mut self);

    /// Scroll the display to the newest output
    fn scroll_to_end(&mut self);

    /// Apply a cosmetic theme change (default: ignore)
    fn set_theme(&mut self, _theme: &str) {}
}

/// In-memory surface for headless embedding and tests.
///
/// Records everything written along with write/clear counts so tests can
/// assert on batching behavior, not just final text.
#[derive(Debug, Default)]
pub struct TextSurface {
    text: String,
    theme: Option<String>,
    writes: usize,
    clears: usize,
    scrolls: usize,
}

impl TextSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// All text currently displayed
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn theme(&self) -> Option<&str> {
        self.theme.as_deref()
    }

    /// Number of write calls observed
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Number of clear calls observed
    pub fn clears(&self) -> usize {
        self.clears
    }

    /// Number of scroll-to-end calls observed
    pub fn scrolls(&self) -> usize {
        self.scrolls
    }
}

impl Surface for TextSurface {
    fn write(&mut self, text: &str) {
        self.text.push_str(text);
        self.writes += 1;
    }

    fn clear(&mut self) {
        self.text.clear();
        self.clears += 1;
    }

    fn scroll_to_end(&mut self) {
        self.scrolls += 1;
    }

    fn set_theme(&mut self, theme: &str) {
        self.theme = Some(theme.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_surface_write_appends_and_counts() {
        let mut surface = TextSurface::new();
        surface.write("hello ");
        surface.write("world");

        assert_eq!(surface.text(), "hello world");
        assert_eq!(surface.writes(), 2);
    }

    #[test]
    fn text_surface_clear_drops_text() {
        let mut surface = TextSurface::new();
        surface.write("stale");
        surface.clear();

        assert_eq!(surface.text(), "");
        assert_eq!(surface.clears(), 1);
    }

    #[test]
    fn text_surface_set_theme_records_theme() {
        let mut surface = TextSurface::new();
        assert_eq!(surface.theme(), None);

        surface.set_theme("light");
        assert_eq!(surface.theme(), Some("light"));
    }
}
