//! Raster loading and PNG export with transparency for undefined tiles

use crate::io::error::{Result, SynthesisError};
use crate::spatial::tiles::{Rgb, TileRaster};
use image::{ImageBuffer, Rgba};
use std::path::Path;

/// Load an image file and cut it into `tile_size` tiles
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be opened or decoded
/// - The image is smaller than a single tile
pub fn load_tile_raster<P: AsRef<Path>>(path: P, tile_size: usize) -> Result<TileRaster> {
    let path_buf = path.as_ref().to_path_buf();
    let img = image::open(&path_buf).map_err(|e| SynthesisError::ImageLoad {
        path: path_buf,
        source: e,
    })?;
    let rgb_img = img.to_rgb8();

    let (width, height) = (rgb_img.width() as usize, rgb_img.height() as usize);
    let pixels: Vec<Rgb> = rgb_img.pixels().map(|pixel| pixel.0).collect();

    TileRaster::extract_tiles(&pixels, width, height, tile_size)
}

/// Export the raster as a PNG image, undefined tiles fully transparent
///
/// # Errors
///
/// Returns an error if:
/// - No tile has been placed in the raster
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_raster_as_png<P: AsRef<Path>>(raster: &TileRaster, output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    if raster.undefined_count() == raster.width() * raster.height() {
        return Err(SynthesisError::InvalidSourceData {
            reason: "No tiles have been placed in the raster".to_string(),
        });
    }

    let tile_size = raster.tile_size();
    let width = (raster.width() * tile_size) as u32;
    let height = (raster.height() * tile_size) as u32;

    let mut img = ImageBuffer::new(width, height);

    for y in 0..raster.height() {
        for x in 0..raster.width() {
            let tile_pixels = raster.get(x, y).map(|tile| tile.pixels());

            for ty in 0..tile_size {
                for tx in 0..tile_size {
                    let color = tile_pixels
                        .and_then(|pixels| pixels.get(ty * tile_size + tx))
                        .map_or(Rgba([0, 0, 0, 0]), |&[r, g, b]| Rgba([r, g, b, 255]));

                    let pixel_x = (x * tile_size + tx) as u32;
                    let pixel_y = (y * tile_size + ty) as u32;
                    img.put_pixel(pixel_x, pixel_y, color);
                }
            }
        }
    }

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| SynthesisError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }
    }

    img.save(output_path)
        .map_err(|e| SynthesisError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}
