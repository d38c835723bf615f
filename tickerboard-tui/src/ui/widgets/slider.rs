//! Labeled horizontal slider rendered as a text bar.

/// `[=====     ]` with `width` cells filled in proportion to `value` within `[min, max]`.
pub fn render_slider_inline(value: f64, min: f64, max: f64, width: usize) -> String {
    let range = max - min;
    if range <= 0.0 {
        return format!("[{}]", "=".repeat(width));
    }
    let frac = ((value - min) / range).clamp(0.0, 1.0);
    let filled = (frac * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "=".repeat(filled), " ".repeat(empty))
}

/// Two-handle bar: `=` between `lo` and `hi`, `|` at each handle.
pub fn render_range_inline(lo: f64, hi: f64, min: f64, max: f64, width: usize) -> String {
    let range = max - min;
    if range <= 0.0 || width == 0 {
        return format!("[{}]", "=".repeat(width));
    }
    let cell = |v: f64| {
        let frac = ((v - min) / range).clamp(0.0, 1.0);
        ((frac * (width - 1) as f64).round() as usize).min(width - 1)
    };
    let (a, b) = (cell(lo.min(hi)), cell(lo.max(hi)));
    let bar: String = (0..width)
        .map(|i| {
            if i == a || i == b {
                '|'
            } else if i > a && i < b {
                '='
            } else {
                ' '
            }
        })
        .collect();
    format!("[{bar}]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slider_endpoints() {
        assert_eq!(render_slider_inline(1.0, 1.0, 50.0, 10), "[          ]");
        assert_eq!(render_slider_inline(50.0, 1.0, 50.0, 10), "[==========]");
    }

    #[test]
    fn slider_clamps_out_of_range_values() {
        assert_eq!(render_slider_inline(99.0, 0.0, 10.0, 4), "[====]");
        assert_eq!(render_slider_inline(-5.0, 0.0, 10.0, 4), "[    ]");
    }

    #[test]
    fn degenerate_range_is_full() {
        assert_eq!(render_slider_inline(3.0, 3.0, 3.0, 3), "[===]");
    }

    #[test]
    fn range_bar_marks_both_handles() {
        let bar = render_range_inline(0.0, 3500.0, 0.0, 3500.0, 8);
        assert_eq!(bar, "[|======|]");

        let bar = render_range_inline(1750.0, 1750.0, 0.0, 3500.0, 8);
        assert_eq!(bar.matches('|').count(), 1);
        assert_eq!(bar.len(), 10);
    }
}
