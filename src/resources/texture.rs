use anyhow::Context;

use crate::data_structures::texture;

/// Material bind group: surface map, its sampler and the material uniform.
pub fn material_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
        ],
        label: Some("Model material_bind_group_layout"),
    })
}

pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Resolve `reference` relative to the file at `base`.
///
/// Absolute URLs are returned unchanged.
pub fn resolve_location(base: &str, reference: &str) -> anyhow::Result<String> {
    if is_remote(reference) {
        return Ok(reference.to_string());
    }
    if is_remote(base) {
        let base = reqwest::Url::parse(base).with_context(|| format!("invalid url {base}"))?;
        let joined = base
            .join(reference)
            .with_context(|| format!("cannot resolve {reference} against {base}"))?;
        return Ok(joined.to_string());
    }
    match base.rfind('/') {
        Some(idx) => Ok(format!("{}/{}", &base[..idx], reference)),
        None => Ok(reference.to_string()),
    }
}

/// Extension of the last path segment, ignoring query and fragment.
pub fn extension(location: &str) -> Option<&str> {
    let path = location.split(['?', '#']).next()?;
    let file = path.rsplit('/').next()?;
    let (stem, ext) = file.rsplit_once('.')?;
    (!stem.is_empty() && !ext.is_empty()).then_some(ext)
}

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().context("no window")?;
    let origin = window
        .location()
        .origin()
        .map_err(|e| anyhow::anyhow!("no page origin: {:?}", e))?;
    let base = reqwest::Url::parse(&format!("{}/assets/", origin))?;
    Ok(base.join(file_name)?)
}

async fn fetch(url: reqwest::Url) -> anyhow::Result<Vec<u8>> {
    let response = reqwest::get(url.clone())
        .await
        .with_context(|| format!("requesting {url}"))?
        .error_for_status()
        .with_context(|| format!("requesting {url}"))?;
    Ok(response.bytes().await?.to_vec())
}

/// Fetch a file over HTTP(S), or from `assets/` for relative paths.
///
/// On the web relative paths are resolved against the page origin.
pub async fn load_binary(location: &str) -> anyhow::Result<Vec<u8>> {
    if is_remote(location) {
        let url = reqwest::Url::parse(location).with_context(|| format!("invalid url {location}"))?;
        return fetch(url).await;
    }

    #[cfg(target_arch = "wasm32")]
    let data = fetch(format_url(location)?).await?;
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = std::path::Path::new("./").join("assets").join(location);
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))?
    };

    Ok(data)
}

pub async fn load_texture(
    location: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<texture::Texture> {
    let data = load_binary(location).await?;
    // The extension is only a hint; the decoder sniffs the data otherwise.
    let format = extension(location).filter(|ext| image::ImageFormat::from_extension(ext).is_some());
    texture::Texture::from_bytes(device, queue, &data, location, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_to_remote_model() {
        assert_eq!(
            resolve_location(
                "https://hadi-rgb.github.io/viewerbucket/models/mclaren.gltf",
                "textures/paint.png"
            )
            .unwrap(),
            "https://hadi-rgb.github.io/viewerbucket/models/textures/paint.png"
        );
    }

    #[test]
    fn keeps_absolute_references() {
        assert_eq!(
            resolve_location("models/car.gltf", "https://example.com/a.png").unwrap(),
            "https://example.com/a.png"
        );
    }

    #[test]
    fn resolves_relative_to_local_model() {
        assert_eq!(
            resolve_location("models/car.gltf", "car.bin").unwrap(),
            "models/car.bin"
        );
        assert_eq!(resolve_location("car.gltf", "car.bin").unwrap(), "car.bin");
    }

    #[test]
    fn extension_ignores_query() {
        assert_eq!(extension("https://x.io/img/carbon.jpg?v=2"), Some("jpg"));
        assert_eq!(extension("swatches/leather.PNG"), Some("PNG"));
        assert_eq!(extension("https://x.io/texture"), None);
        assert_eq!(extension(".hidden"), None);
    }
}
