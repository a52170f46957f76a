/// Dimensions that fit `width x height` inside `max_width x max_height`
/// while keeping the aspect ratio. Images already inside the box are
/// returned unchanged; nothing is ever enlarged.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let scale = f64::min(
        max_width as f64 / width as f64,
        max_height as f64 / height as f64,
    );

    let new_width = ((width as f64 * scale).round() as u32).clamp(1, max_width.max(1));
    let new_height = ((height as f64 * scale).round() as u32).clamp(1, max_height.max(1));

    (new_width, new_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_within_wide_image() {
        assert_eq!(fit_within(2000, 500, 1200, 1200), (1200, 300));
    }

    #[test]
    fn test_fit_within_tall_image() {
        assert_eq!(fit_within(1000, 3000, 1200, 1200), (400, 1200));
    }

    #[test]
    fn test_fit_within_never_upscales() {
        assert_eq!(fit_within(400, 300, 1200, 1200), (400, 300));
        assert_eq!(fit_within(1200, 1200, 1200, 1200), (1200, 1200));
    }

    #[test]
    fn test_fit_within_one_axis_over() {
        assert_eq!(fit_within(1300, 100, 1200, 1200), (1200, 92));
    }

    #[test]
    fn test_fit_within_extreme_ratio_keeps_one_pixel() {
        assert_eq!(fit_within(4096, 10, 100, 100), (100, 1));
    }
}
