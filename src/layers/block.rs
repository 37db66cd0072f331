use burn::prelude::*;

use crate::layers::{
    attention::{Attention, AttentionConfig},
    mlp::{Mlp, MlpConfig},
};

#[derive(Config, Debug)]
pub struct BlockConfig {
    pub attn: AttentionConfig,
    pub mlp_dim: usize,
}

impl BlockConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Block<B> {
        Block::new(device, self.clone())
    }
}

/// Pre-norm transformer block: attention and feed-forward sublayers, each
/// wrapped in a residual connection.
#[derive(Module, Debug)]
pub struct Block<B: Backend> {
    norm1: nn::LayerNorm<B>,
    attn: Attention<B>,
    norm2: nn::LayerNorm<B>,
    mlp: Mlp<B>,
}

impl<B: Backend> Block<B> {
    pub fn new(device: &B::Device, config: BlockConfig) -> Self {
        let norm1 = nn::LayerNormConfig::new(config.attn.dim).init(device);
        let attn = config.attn.init(device);

        let norm2 = nn::LayerNormConfig::new(config.attn.dim).init(device);
        let mlp = MlpConfig::new(config.attn.dim, config.mlp_dim)
            .with_dropout(config.attn.dropout)
            .init(device);

        Self {
            norm1,
            attn,
            norm2,
            mlp,
        }
    }

    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let x = x.clone() + self.attn.forward(self.norm1.forward(x));
        x.clone() + self.mlp.forward(self.norm2.forward(x))
    }
}
