use sketchbook_assets::AssetError;
use sketchbook_render::MeshError;

/// Errors from GPU setup, resource upload and drawing.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no suitable GPU adapter found")]
    NoAdapter,
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("shader {label} failed to compile: {message}")]
    ShaderCompile { label: String, message: String },
    #[error("mesh {key} is invalid: {source}")]
    Mesh {
        key: u32,
        #[source]
        source: MeshError,
    },
    #[error("frame draws mesh {0}, which was never uploaded")]
    UnknownMesh(u32),
    #[error(transparent)]
    Asset(#[from] AssetError),
}
