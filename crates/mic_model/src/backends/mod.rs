pub mod dummy;
pub mod onnx;

/// Sigmoid over the raw output logit.
pub(crate) fn sigmoid(logit: f64) -> f64 {
    1.0 / (1.0 + (-logit).exp())
}
