#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetSize {
    Size { width: f64, height: f64, scale: f64 },
    Width { width: f64, scale: f64 },
    Height { height: f64, scale: f64 },
}

impl TargetSize {
    pub fn size(width: f64, height: f64, scale: f64) -> Self {
        Self::Size {
            width,
            height,
            scale,
        }
    }

    pub fn width(width: f64, scale: f64) -> Self {
        Self::Width { width, scale }
    }

    pub fn height(height: f64, scale: f64) -> Self {
        Self::Height { height, scale }
    }

    pub fn target_width(&self) -> Option<f64> {
        match *self {
            Self::Size { width, .. } | Self::Width { width, .. } => Some(width),
            Self::Height { .. } => None,
        }
    }

    pub fn target_height(&self) -> Option<f64> {
        match *self {
            Self::Size { height, .. } | Self::Height { height, .. } => Some(height),
            Self::Width { .. } => None,
        }
    }

    pub fn scale(&self) -> f64 {
        match *self {
            Self::Size { scale, .. } | Self::Width { scale, .. } | Self::Height { scale, .. } => {
                scale
            }
        }
    }

    pub fn max_pixel_dimension(&self) -> f64 {
        match *self {
            Self::Size {
                width,
                height,
                scale,
            } => width.max(height) * scale,
            Self::Width { width, scale } => width * scale,
            Self::Height { height, scale } => height * scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_dimension_per_shape() {
        assert_eq!(TargetSize::size(120.0, 80.0, 2.0).max_pixel_dimension(), 240.0);
        assert_eq!(TargetSize::size(80.0, 120.0, 3.0).max_pixel_dimension(), 360.0);
        assert_eq!(TargetSize::width(100.0, 2.0).max_pixel_dimension(), 200.0);
        assert_eq!(TargetSize::height(50.0, 1.5).max_pixel_dimension(), 75.0);
    }

    #[test]
    fn absent_dimensions() {
        let size = TargetSize::width(100.0, 2.0);
        assert_eq!(size.target_width(), Some(100.0));
        assert_eq!(size.target_height(), None);

        let size = TargetSize::height(40.0, 1.0);
        assert_eq!(size.target_width(), None);
        assert_eq!(size.target_height(), Some(40.0));
        assert_eq!(size.scale(), 1.0);
    }
}
