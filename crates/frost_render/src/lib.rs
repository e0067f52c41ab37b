pub mod camera;
pub mod gpu_context;
pub mod mesh;
pub mod pipeline;
pub mod vertex;

pub use camera::{CameraUniform, OrbitCamera};
pub use gpu_context::GpuContext;
pub use pipeline::{create_depth_texture, MeshPipeline, DEPTH_FORMAT};
pub use vertex::MeshVertex;
