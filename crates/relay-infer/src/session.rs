use crate::InferError;
use relay_base::Tensor;
use std::collections::HashMap;

/// A loaded model ready to run. Outputs are keyed by name; `output_names`
/// keeps the model's declared order.
pub trait Session {
    fn run(
        &mut self,
        inputs: &[(&str, Tensor<f32>)],
    ) -> Result<HashMap<String, Tensor<f32>>, InferError>;
    fn input_names(&self) -> &[String];
    fn output_names(&self) -> &[String];
}
