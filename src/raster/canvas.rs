use image::imageops::{self, FilterType};
use image::GrayImage;

use crate::error::{Error, Result};
use crate::raster::matrix::GrayMatrix;
use crate::schema::RecordSchema;

/// Reusable square compositing surface.
///
/// Variable native image sizes become one common output shape by pasting
/// each expanded image onto a blank white canvas at its schema's offset
/// and resampling the canvas down to the target size. One canvas serves
/// many records sequentially; it must be reset before each composite and
/// is never shared between concurrent tasks (each worker owns its own).
#[derive(Debug, Clone)]
pub struct Canvas {
    side: u32,
    data: Vec<u8>,
}

impl Canvas {
    /// Blank white canvas of `side` x `side` pixels.
    pub fn new(side: u32) -> Canvas {
        Canvas {
            side,
            data: vec![255; side as usize * side as usize],
        }
    }

    /// Canvas sized for a schema's native images plus paste padding.
    pub fn for_schema(schema: &RecordSchema) -> Canvas {
        Canvas::new(schema.canvas_size)
    }

    pub fn side(&self) -> u32 {
        self.side
    }

    /// Repaints the whole canvas white. Call before each record's
    /// composite; skipping this ghosts the previous record through.
    pub fn reset(&mut self) {
        self.data.fill(255);
    }

    /// Copies `image` onto the canvas with its top-left corner at (x, y).
    pub fn paste(&mut self, image: &GrayMatrix, x: u32, y: u32) -> Result<()> {
        let side = self.side as usize;
        let (x, y) = (x as usize, y as usize);
        if x + image.cols > side || y + image.rows > side {
            return Err(Error::CanvasOverflow {
                width: image.cols as u32,
                height: image.rows as u32,
                x: x as u32,
                y: y as u32,
                canvas: self.side,
            });
        }
        for row in 0..image.rows {
            let src = &image.data[row * image.cols..(row + 1) * image.cols];
            let start = (y + row) * side + x;
            self.data[start..start + image.cols].copy_from_slice(src);
        }
        Ok(())
    }

    /// Resamples the canvas to exactly `target_w` x `target_h` pixels with
    /// a Lanczos3 filter, the smooth antialiasing resampler the source
    /// corpus was built with.
    pub fn resize(&self, target_w: u32, target_h: u32) -> Result<GrayMatrix> {
        if target_w == 0 || target_h == 0 {
            return Err(Error::TargetSize {
                width: target_w,
                height: target_h,
            });
        }
        let buffer = GrayImage::from_raw(self.side, self.side, self.data.clone())
            .expect("canvas buffer length matches its dimensions");
        let resized = imageops::resize(&buffer, target_w, target_h, FilterType::Lanczos3);
        Ok(GrayMatrix {
            rows: target_h as usize,
            cols: target_w as usize,
            data: resized.into_raw(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{c_type, g_type, m_type};

    #[test]
    fn new_canvas_is_white() {
        let canvas = Canvas::new(8);
        assert!(canvas.data.iter().all(|&p| p == 255));
    }

    #[test]
    fn schema_canvases_cover_native_size_plus_offset() {
        assert_eq!(Canvas::for_schema(&m_type()).side(), 64);
        assert_eq!(Canvas::for_schema(&c_type()).side(), 76);
        assert_eq!(Canvas::for_schema(&g_type()).side(), 128);
    }

    #[test]
    fn paste_lands_at_the_requested_offset() {
        let mut canvas = Canvas::new(4);
        let image = GrayMatrix::filled(2, 2, 0);
        canvas.paste(&image, 1, 2).unwrap();
        // Rows 2..4, cols 1..3 are inked, the rest untouched.
        for row in 0..4 {
            for col in 0..4 {
                let expected = if (2..4).contains(&row) && (1..3).contains(&col) { 0 } else { 255 };
                assert_eq!(canvas.data[row * 4 + col], expected, "({}, {})", row, col);
            }
        }
    }

    #[test]
    fn paste_past_the_edge_is_rejected() {
        let mut canvas = Canvas::new(4);
        let image = GrayMatrix::filled(3, 3, 0);
        assert!(matches!(
            canvas.paste(&image, 2, 0),
            Err(Error::CanvasOverflow { .. })
        ));
    }

    #[test]
    fn reset_clears_the_previous_record() {
        let mut canvas = Canvas::new(4);
        canvas.paste(&GrayMatrix::filled(4, 4, 7), 0, 0).unwrap();
        canvas.reset();
        assert!(canvas.data.iter().all(|&p| p == 255));
    }

    #[test]
    fn resize_always_yields_the_target_shape() {
        // All three native geometries normalize to the same output shape.
        for schema in [m_type(), c_type(), g_type()] {
            let mut canvas = Canvas::for_schema(&schema);
            let native = GrayMatrix::filled(
                schema.pixel_height as usize,
                schema.pixel_width as usize,
                128,
            );
            canvas.paste(&native, schema.paste_offset.0, schema.paste_offset.1).unwrap();
            let out = canvas.resize(32, 32).unwrap();
            assert_eq!((out.rows, out.cols), (32, 32), "{}", schema.name);
            assert_eq!(out.len(), 32 * 32);
        }
    }

    #[test]
    fn uniform_canvas_resamples_to_itself() {
        let canvas = Canvas::new(64);
        for (w, h) in [(64, 64), (32, 32), (17, 9)] {
            let out = canvas.resize(w, h).unwrap();
            assert!(out.data.iter().all(|&p| p == 255), "{}x{}", w, h);
        }
    }

    #[test]
    fn zero_target_size_is_a_config_error() {
        let canvas = Canvas::new(8);
        let err = canvas.resize(0, 32).unwrap_err();
        assert!(matches!(err, Error::TargetSize { width: 0, height: 32 }));
        assert!(!err.is_recoverable());
    }
}
