use burn::prelude::*;

#[derive(Config, Debug)]
pub struct MlpConfig {
    pub dim: usize,
    pub hidden_dim: usize,
    #[config(default = 0.0)]
    pub dropout: f64,
}

impl MlpConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Mlp<B> {
        Mlp::new(device, self.clone())
    }
}

/// Transformer feed-forward: Linear -> GELU -> Linear with dropout after
/// each projection.
#[derive(Module, Debug)]
pub struct Mlp<B: Backend> {
    fc1: nn::Linear<B>,
    fc2: nn::Linear<B>,
    act: nn::Gelu,
    dropout: nn::Dropout,
}

impl<B: Backend> Mlp<B> {
    fn new(device: &B::Device, config: MlpConfig) -> Self {
        let fc1 = nn::LinearConfig::new(config.dim, config.hidden_dim).init(device);
        let fc2 = nn::LinearConfig::new(config.hidden_dim, config.dim).init(device);

        Self {
            fc1,
            fc2,
            act: nn::Gelu::new(),
            dropout: nn::DropoutConfig::new(config.dropout).init(),
        }
    }

    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let x = self.fc1.forward(x);
        let x = self.act.forward(x);
        let x = self.dropout.forward(x);
        let x = self.fc2.forward(x);
        self.dropout.forward(x)
    }
}
