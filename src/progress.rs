//! Reading-progress math for the bar along the top of an open article.

/// A snapshot of the window's vertical scroll state, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// `window.scrollY`.
    pub scroll_y: f64,

    /// `document.documentElement.scrollHeight`.
    pub scroll_height: f64,

    /// `window.innerHeight`.
    pub viewport_height: f64,
}

impl ScrollMetrics {
    /// How far through the page the reader is, as a percentage in
    /// `[0, 100]`. `None` when the page is too short to scroll.
    pub fn percent(&self) -> Option<f64> {
        let max = self.scroll_height - self.viewport_height;
        if max <= 0.0 {
            return None;
        }
        Some((self.scroll_y / max * 100.0).clamp(0.0, 100.0))
    }
}

/// The displayed state of the progress bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressBar {
    pub visible: bool,
    pub percent: f64,
}

impl ProgressBar {
    pub fn hidden() -> Self {
        ProgressBar {
            visible: false,
            percent: 0.0,
        }
    }

    pub fn at(percent: f64) -> Self {
        ProgressBar {
            visible: true,
            percent: percent.clamp(0.0, 100.0),
        }
    }

    /// The CSS `width` value.
    pub fn width(&self) -> String {
        format!("{}%", self.percent)
    }
}
