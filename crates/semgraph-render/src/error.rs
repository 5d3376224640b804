#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("angle must be between 0 and 180 degrees, got {angle}")]
    InvalidAngle { angle: f64 },
    #[error("invalid option {name}: {value}")]
    InvalidOption { name: &'static str, value: f64 },
    #[error("edge {from} -> {to}: curvature must be between -180 and 180 degrees, got {curvature}")]
    InvalidCurvature {
        from: String,
        to: String,
        curvature: f64,
    },
    #[error("node {name} has no position; apply a layout first")]
    MissingPosition { name: String },
    #[error("prepared graph JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
