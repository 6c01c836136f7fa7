use std::path::Path;

use anyhow::{Context, Result};
use image::imageops::{flip_vertical_in_place, resize, FilterType};
use image::RgbaImage;
use wgpu::util::{DeviceExt, TextureDataOrder};

/// Where the bound overlay texels came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OverlaySource {
    Image { width: u32, height: u32 },
    Placeholder,
}

/// The overlay image as sampled by the fragment stage.
pub(crate) struct OverlayTexture {
    _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub source: OverlaySource,
}

impl OverlayTexture {
    /// Loads the overlay from disk, falling back to a transparent 1x1 texture
    /// when the file cannot be read or decoded, or is larger than the device
    /// can hold.
    pub fn load(device: &wgpu::Device, queue: &wgpu::Queue, path: &Path) -> Self {
        let max_dimension = device.limits().max_texture_dimension_2d;
        let decoded = load_overlay_image(path).and_then(|image| {
            check_texture_limit(image.width(), image.height(), max_dimension)?;
            Ok(image)
        });
        match decoded {
            Ok(image) => {
                let levels = mip_chain(image);
                let (width, height) = levels[0].dimensions();
                tracing::info!(
                    path = %path.display(),
                    width,
                    height,
                    mip_levels = levels.len(),
                    "loaded overlay texture"
                );
                Self::upload(device, queue, &levels, OverlaySource::Image { width, height })
            }
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %format!("{error:#}"),
                    "failed to load overlay texture; using transparent placeholder"
                );
                let placeholder = RgbaImage::from_pixel(1, 1, image::Rgba([0, 0, 0, 0]));
                Self::upload(device, queue, &[placeholder], OverlaySource::Placeholder)
            }
        }
    }

    fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        levels: &[RgbaImage],
        source: OverlaySource,
    ) -> Self {
        let (width, height) = levels[0].dimensions();
        let data: Vec<u8> = levels
            .iter()
            .flat_map(|level| level.as_raw().iter().copied())
            .collect();

        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("overlay texture"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: levels.len() as u32,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            TextureDataOrder::LayerMajor,
            &data,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("overlay sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            _texture: texture,
            view,
            sampler,
            source,
        }
    }
}

/// Decodes an image as RGBA8 with its rows flipped so row 0 is the bottom edge,
/// matching texture coordinates that grow upward from the bottom-left corner.
pub(crate) fn load_overlay_image(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path)
        .with_context(|| format!("failed to open overlay image at {}", path.display()))?;
    tracing::debug!(
        channels = image.color().channel_count(),
        color = ?image.color(),
        "decoded overlay image"
    );
    let mut rgba = image.to_rgba8();
    flip_vertical_in_place(&mut rgba);
    Ok(rgba)
}

/// Fails when either side exceeds the device's 2D texture limit.
pub(crate) fn check_texture_limit(width: u32, height: u32, max_dimension: u32) -> Result<()> {
    if width > max_dimension || height > max_dimension {
        anyhow::bail!(
            "overlay is {width}x{height} but the device allows at most {max_dimension} pixels per side"
        );
    }
    Ok(())
}

/// Number of levels in a full mip chain down to 1x1.
pub(crate) fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Builds the full mip chain, base level first, halving each axis (never below 1).
pub(crate) fn mip_chain(base: RgbaImage) -> Vec<RgbaImage> {
    let count = mip_level_count(base.width(), base.height()) as usize;
    let mut levels = Vec::with_capacity(count);
    levels.push(base);
    while levels.len() < count {
        let previous = &levels[levels.len() - 1];
        let width = (previous.width() / 2).max(1);
        let height = (previous.height() / 2).max(1);
        let next = resize(previous, width, height, FilterType::Triangle);
        levels.push(next);
    }
    levels
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn texture_limit_rejects_either_oversized_side() {
        assert!(check_texture_limit(2048, 2048, 2048).is_ok());
        assert!(check_texture_limit(1, 1, 2048).is_ok());

        let err = check_texture_limit(4096, 16, 2048).unwrap_err();
        assert!(err.to_string().contains("4096x16"), "{err}");
        assert!(check_texture_limit(16, 2049, 2048).is_err());
    }

    #[test]
    fn downlevel_limit_rejects_a_decodable_large_image() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wide.png");
        let max_dimension = wgpu::Limits::downlevel_webgl2_defaults().max_texture_dimension_2d;
        RgbaImage::new(max_dimension + 1, 1).save(&path).unwrap();

        let image = load_overlay_image(&path).unwrap();
        assert!(check_texture_limit(image.width(), image.height(), max_dimension).is_err());
    }

    #[test]
    fn mip_level_count_covers_both_axes() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(2, 1), 2);
        assert_eq!(mip_level_count(256, 256), 9);
        assert_eq!(mip_level_count(300, 20), 9);
    }

    #[test]
    fn mip_chain_halves_down_to_one_pixel() {
        let base = RgbaImage::from_pixel(8, 2, image::Rgba([255, 0, 0, 255]));
        let chain = mip_chain(base);
        let sizes: Vec<_> = chain.iter().map(|level| level.dimensions()).collect();
        assert_eq!(sizes, vec![(8, 2), (4, 1), (2, 1), (1, 1)]);
        assert_eq!(chain[3].get_pixel(0, 0), &image::Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn loaded_image_is_rgba_and_flipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("overlay.png");
        let mut source = image::RgbImage::new(1, 2);
        source.put_pixel(0, 0, image::Rgb([200, 0, 0]));
        source.put_pixel(0, 1, image::Rgb([0, 0, 200]));
        source.save(&path).unwrap();

        let loaded = load_overlay_image(&path).unwrap();
        assert_eq!(loaded.dimensions(), (1, 2));
        assert_eq!(loaded.get_pixel(0, 0), &image::Rgba([0, 0, 200, 255]));
        assert_eq!(loaded.get_pixel(0, 1), &image::Rgba([200, 0, 0, 255]));
    }

    #[test]
    fn missing_image_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.png");
        let err = load_overlay_image(&path).unwrap_err();
        assert!(format!("{err:#}").contains("absent.png"));
    }
}
