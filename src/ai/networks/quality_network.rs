use burn::nn::{Linear, LinearConfig, Relu};
use burn::prelude::*;

/// Action-value network for 2048.
///
/// ```text
/// Input:  [batch, size * size]
/// FC1:    size*size -> 64, ReLU
/// FC2:    64 -> 32, ReLU
/// FC3:    32 -> 4  (one value per direction)
/// ```
#[derive(Module, Debug)]
pub struct QualityNetwork<B: Backend> {
    fc1: Linear<B>,
    fc2: Linear<B>,
    fc3: Linear<B>,
    relu: Relu,
}

#[derive(Config, Debug)]
pub struct QualityNetworkConfig {
    pub input_size: usize,
    pub output_size: usize,
    #[config(default = 64)]
    pub first_hidden: usize,
    #[config(default = 32)]
    pub second_hidden: usize,
}

impl QualityNetworkConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> QualityNetwork<B> {
        QualityNetwork {
            fc1: LinearConfig::new(self.input_size, self.first_hidden).init(device),
            fc2: LinearConfig::new(self.first_hidden, self.second_hidden).init(device),
            fc3: LinearConfig::new(self.second_hidden, self.output_size).init(device),
            relu: Relu::new(),
        }
    }
}

impl<B: Backend> QualityNetwork<B> {
    /// Forward pass: input [batch, input_size] -> output [batch, output_size].
    pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.relu.forward(self.fc1.forward(input));
        let x = self.relu.forward(self.fc2.forward(x));
        self.fc3.forward(x)
    }
}
