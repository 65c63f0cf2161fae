#![allow(dead_code)]

use relay_base::Tensor;
use relay_infer::{InferError, Session};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub type Outputs = HashMap<String, Tensor<f32>>;

/// Replays canned outputs, repeating the last one, and records input shapes.
pub struct FakeSession {
    inputs: Vec<String>,
    outputs: Vec<String>,
    responses: Vec<Outputs>,
    pub calls: Rc<RefCell<Vec<Vec<usize>>>>,
}

impl FakeSession {
    pub fn new(outputs: &[&str], responses: Vec<Outputs>) -> Self {
        Self {
            inputs: vec!["input".to_string()],
            outputs: outputs.iter().map(|s| s.to_string()).collect(),
            responses,
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Rc<RefCell<Vec<Vec<usize>>>> {
        self.calls.clone()
    }
}

impl Session for FakeSession {
    fn run(&mut self, inputs: &[(&str, Tensor<f32>)]) -> Result<Outputs, InferError> {
        let index = self.calls.borrow().len().min(self.responses.len().saturating_sub(1));
        self.calls.borrow_mut().push(inputs[0].1.shape.clone());
        self.responses
            .get(index)
            .cloned()
            .ok_or_else(|| InferError::BackendError("no response".to_string()))
    }

    fn input_names(&self) -> &[String] {
        &self.inputs
    }

    fn output_names(&self) -> &[String] {
        &self.outputs
    }
}

pub fn outputs(entries: Vec<(&str, Tensor<f32>)>) -> Outputs {
    entries
        .into_iter()
        .map(|(name, tensor)| (name.to_string(), tensor))
        .collect()
}

/// Landmark model output: `count` points spread over the input square.
pub fn landmark_output(count: usize, values: usize, size: f32, score: f32) -> Outputs {
    let mut data = Vec::with_capacity(count * values);
    for i in 0..count {
        let x = size * (0.25 + 0.5 * (i % 5) as f32 / 4.0);
        let y = size * (0.25 + 0.5 * (i % 7) as f32 / 6.0);
        data.push(x);
        data.push(y);
        data.push(0.0);
        data.extend(std::iter::repeat_n(1.0, values - 3));
    }
    outputs(vec![
        ("Identity", Tensor::new(vec![1, count * values], data).unwrap()),
        ("Identity_1", Tensor::new(vec![1, 1], vec![score]).unwrap()),
    ])
}

pub fn blank_frame(width: usize, height: usize) -> Tensor<u8> {
    Tensor::new(vec![height, width, 3], vec![0; width * height * 3]).unwrap()
}
