use image::{imageops::FilterType, DynamicImage, GenericImageView};

pub fn fit_within(width: u32, height: u32, max_pixel_dimension: f64) -> (u32, u32) {
    let longest = width.max(height);
    if !max_pixel_dimension.is_finite()
        || max_pixel_dimension <= 0.0
        || longest == 0
        || max_pixel_dimension >= longest as f64
    {
        return (width, height);
    }

    let scale = |side: u32| {
        ((side as f64 * max_pixel_dimension / longest as f64).floor() as u32)
            .clamp(1, max_pixel_dimension.floor().max(1.0) as u32)
    };
    (scale(width), scale(height))
}

pub fn downsample(image: &DynamicImage, max_pixel_dimension: f64) -> Option<DynamicImage> {
    let (width, height) = image.dimensions();
    let (new_width, new_height) = fit_within(width, height, max_pixel_dimension);

    if (new_width, new_height) == (width, height) {
        return None;
    }

    Some(image.resize_exact(new_width, new_height, FilterType::Lanczos3))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_longest_side() {
        assert_eq!(fit_within(400, 200, 100.0), (100, 50));
        assert_eq!(fit_within(200, 400, 100.0), (50, 100));
        assert_eq!(fit_within(300, 300, 150.0), (150, 150));
    }

    #[test]
    fn fractional_maximum_is_not_exceeded() {
        assert_eq!(fit_within(400, 200, 100.6), (100, 50));
        assert_eq!(fit_within(200, 400, 100.6), (50, 100));
        assert_eq!(fit_within(999, 333, 137.5), (137, 45));

        for (width, height) in [(400, 200), (123, 457), (1000, 999), (7, 3)] {
            for max in [1.5, 2.75, 33.3, 99.99, 150.5] {
                let (w, h) = fit_within(width, height, max);
                assert!(w.max(h) as f64 <= max, "{w}x{h} exceeds {max}");
            }
        }
    }

    #[test]
    fn never_upscales() {
        assert_eq!(fit_within(40, 20, 100.0), (40, 20));
        assert_eq!(fit_within(40, 20, 40.0), (40, 20));
    }

    #[test]
    fn degenerate_maximum_keeps_source() {
        assert_eq!(fit_within(40, 20, 0.0), (40, 20));
        assert_eq!(fit_within(40, 20, -5.0), (40, 20));
        assert_eq!(fit_within(40, 20, f64::NAN), (40, 20));
        assert_eq!(fit_within(40, 20, f64::INFINITY), (40, 20));
    }

    #[test]
    fn thin_images_keep_one_pixel() {
        assert_eq!(fit_within(1000, 1, 10.0), (10, 1));
    }

    #[test]
    fn downsample_resizes_only_when_needed() {
        let image = DynamicImage::new_rgba8(64, 32);
        let scaled = downsample(&image, 16.0).unwrap();
        assert_eq!(scaled.dimensions(), (16, 8));
        assert!(downsample(&image, 64.0).is_none());
    }
}
