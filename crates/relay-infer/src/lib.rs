pub mod backend;
pub mod backends;
pub mod device;
pub mod error;
pub mod landmark;
pub mod modelsource;
pub mod session;

pub use backend::Backend;
pub use backends::OnnxBackend;
pub use device::Device;
pub use error::InferError;
pub use landmark::{
    HandConfig, HandDetector, LandmarkModelSpec, OnnxHandDetector, OnnxPoseDetector,
    PalmModelSpec, PoseConfig, PoseDetector,
};
pub use modelsource::ModelSource;
pub use session::Session;
