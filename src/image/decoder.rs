use crate::{
    image::{raster::DecodedImage, transform},
    utils::error::DecodeError,
};
use image::{DynamicImage, GenericImageView, ImageDecoder, ImageError, ImageReader};
use log::debug;
use std::{io::Cursor, sync::Arc};

pub trait Downscaler: Send + Sync {
    fn decode_and_scale(
        &self,
        bytes: &[u8],
        max_pixel_dimension: f64,
    ) -> Result<DecodedImage, DecodeError>;
}

impl<T: Downscaler + ?Sized> Downscaler for Arc<T> {
    fn decode_and_scale(
        &self,
        bytes: &[u8],
        max_pixel_dimension: f64,
    ) -> Result<DecodedImage, DecodeError> {
        (**self).decode_and_scale(bytes, max_pixel_dimension)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThumbnailDownscaler;

impl ThumbnailDownscaler {
    fn decode_oriented(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
        let mut decoder = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(ImageError::IoError)?
            .into_decoder()?;
        let orientation = decoder.orientation()?;
        let mut image = DynamicImage::from_decoder(decoder)?;
        image.apply_orientation(orientation);
        Ok(image)
    }
}

impl Downscaler for ThumbnailDownscaler {
    fn decode_and_scale(
        &self,
        bytes: &[u8],
        max_pixel_dimension: f64,
    ) -> Result<DecodedImage, DecodeError> {
        if bytes.is_empty() {
            return Err(DecodeError::Empty);
        }

        let image = Self::decode_oriented(bytes)?;
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(DecodeError::InvalidDimensions(width, height));
        }

        let image = match transform::downsample(&image, max_pixel_dimension) {
            Some(scaled) => {
                debug!(
                    "Downsampled {}x{} to {}x{}",
                    width,
                    height,
                    scaled.width(),
                    scaled.height()
                );
                scaled
            }
            None => image,
        };

        Ok(DecodedImage::new(image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([200, 10, 10, 255]),
        ));
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn shrinks_to_max_dimension() {
        let image = ThumbnailDownscaler
            .decode_and_scale(&png(80, 40), 20.0)
            .unwrap();
        assert_eq!(image.size(), (20, 10));
    }

    #[test]
    fn small_sources_keep_their_size() {
        let image = ThumbnailDownscaler
            .decode_and_scale(&png(8, 6), 200.0)
            .unwrap();
        assert_eq!(image.size(), (8, 6));
    }

    #[test]
    fn rejects_garbage_and_empty_input() {
        assert!(matches!(
            ThumbnailDownscaler.decode_and_scale(b"definitely not an image", 10.0),
            Err(DecodeError::Image(_))
        ));
        assert!(matches!(
            ThumbnailDownscaler.decode_and_scale(&[], 10.0),
            Err(DecodeError::Empty)
        ));
    }
}
