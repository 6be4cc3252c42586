//! Tiles and the rasters built from them
//!
//! A tile is a square block of RGB pixels, compared structurally. Rasters
//! hold one optional tile per position so partially generated output can be
//! represented directly.

use crate::io::error::{Result, SynthesisError, invalid_parameter};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// One RGB pixel
pub type Rgb = [u8; 3];

/// A `size x size` block of pixels stored row-major
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tile {
    pixels: Vec<Rgb>,
}

impl Tile {
    /// Build a tile from row-major pixels
    pub const fn new(pixels: Vec<Rgb>) -> Self {
        Self { pixels }
    }

    /// A single-pixel tile
    pub fn pixel(color: Rgb) -> Self {
        Self {
            pixels: vec![color],
        }
    }

    /// Row-major pixel data
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Number of pixels in the tile
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// Per-channel mean color; the raw pixel value for single-pixel tiles
    pub fn average_color(&self) -> [f64; 3] {
        if self.pixels.is_empty() {
            return [0.0; 3];
        }

        let mut sums = [0.0_f64; 3];
        for pixel in &self.pixels {
            for (sum, &channel) in sums.iter_mut().zip(pixel) {
                *sum += f64::from(channel);
            }
        }

        let count = self.pixels.len() as f64;
        sums.map(|sum| sum / count)
    }
}

/// Width x height grid of optional tiles, indexed by (x, y)
///
/// Every stored tile holds exactly `tile_size * tile_size` pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileRaster {
    tiles: Array2<Option<Tile>>,
    tile_size: usize,
}

impl TileRaster {
    /// Create a raster with every position undefined
    ///
    /// # Errors
    ///
    /// Returns an error if the tile size is zero
    pub fn new(width: usize, height: usize, tile_size: usize) -> Result<Self> {
        if tile_size == 0 {
            return Err(invalid_parameter(
                "tile_size",
                &tile_size,
                &"tiles must be at least one pixel wide",
            ));
        }

        Ok(Self {
            tiles: Array2::from_elem((height, width), None),
            tile_size,
        })
    }

    /// Cut a row-major pixel buffer of `pixel_width x pixel_height` into tiles
    ///
    /// Trailing columns and rows that do not fill a whole tile are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The tile size is zero
    /// - The buffer length does not match the stated dimensions
    /// - The image is smaller than a single tile
    pub fn extract_tiles(
        pixels: &[Rgb],
        pixel_width: usize,
        pixel_height: usize,
        tile_size: usize,
    ) -> Result<Self> {
        if pixels.len() != pixel_width * pixel_height {
            return Err(SynthesisError::InvalidSourceData {
                reason: format!(
                    "pixel buffer holds {} pixels, expected {pixel_width}x{pixel_height}",
                    pixels.len()
                ),
            });
        }

        let width = pixel_width.checked_div(tile_size).unwrap_or(0);
        let height = pixel_height.checked_div(tile_size).unwrap_or(0);
        let mut raster = Self::new(width, height, tile_size)?;

        if width == 0 || height == 0 {
            return Err(SynthesisError::InvalidSourceData {
                reason: format!(
                    "{pixel_width}x{pixel_height} image is smaller than one {tile_size}x{tile_size} tile"
                ),
            });
        }

        for ((y, x), slot) in raster.tiles.indexed_iter_mut() {
            let mut block = Vec::with_capacity(tile_size * tile_size);
            for ty in 0..tile_size {
                let row_start = (y * tile_size + ty) * pixel_width + x * tile_size;
                if let Some(row) = pixels.get(row_start..row_start + tile_size) {
                    block.extend_from_slice(row);
                }
            }
            *slot = Some(Tile::new(block));
        }

        Ok(raster)
    }

    /// Width in tiles
    pub fn width(&self) -> usize {
        self.tiles.ncols()
    }

    /// Height in tiles
    pub fn height(&self) -> usize {
        self.tiles.nrows()
    }

    /// Tile edge length in pixels
    pub const fn tile_size(&self) -> usize {
        self.tile_size
    }

    /// Tile at (x, y), if defined
    pub fn get(&self, x: usize, y: usize) -> Option<&Tile> {
        self.tiles.get([y, x]).and_then(Option::as_ref)
    }

    /// Store a tile at (x, y)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The position lies outside the raster
    /// - The tile is not `tile_size x tile_size` pixels
    pub fn set(&mut self, x: usize, y: usize, tile: Tile) -> Result<()> {
        let expected = self.tile_size.saturating_mul(self.tile_size);
        if tile.pixel_count() != expected {
            return Err(invalid_parameter(
                "tile",
                &tile.pixel_count(),
                &format!("raster tiles hold {expected} pixels"),
            ));
        }
        let dimensions = (self.width(), self.height());
        let slot = self
            .tiles
            .get_mut([y, x])
            .ok_or(SynthesisError::PositionOutOfBounds {
                position: (x, y),
                dimensions,
            })?;
        *slot = Some(tile);
        Ok(())
    }

    /// Number of positions without a tile
    pub fn undefined_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_none()).count()
    }
}
