use burn::prelude::*;

use crate::layers::init::LayerKind;

#[derive(Config, Debug)]
pub struct PatchEmbedConfig {
    pub patch_size: usize,
    pub input_channels: usize,
    pub hidden_dim: usize,
}

impl Default for PatchEmbedConfig {
    fn default() -> Self {
        Self {
            patch_size: 8,
            input_channels: 3,
            hidden_dim: 256,
        }
    }
}

impl PatchEmbedConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> PatchEmbed<B> {
        PatchEmbed::new(device, self.clone())
    }
}

/// Projects an image into a sequence of flattened patch embeddings with a
/// convolution whose kernel and stride both equal the patch size.
#[derive(Module, Debug)]
pub struct PatchEmbed<B: Backend> {
    proj: nn::conv::Conv2d<B>,
}

impl<B: Backend> PatchEmbed<B> {
    pub fn new(device: &B::Device, config: PatchEmbedConfig) -> Self {
        let kernel_size = [config.patch_size, config.patch_size];
        let mut proj_config = nn::conv::Conv2dConfig::new(
            [config.input_channels, config.hidden_dim],
            kernel_size,
        )
        .with_stride(kernel_size);

        if let Some(initializer) = LayerKind::Convolution.initializer() {
            proj_config = proj_config.with_initializer(initializer);
        }

        Self {
            proj: proj_config.init(device),
        }
    }

    /// (batch, channels, height, width) -> (batch, patches, hidden)
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 3> {
        self.proj.forward(x).flatten(2, 3).swap_dims(1, 2)
    }
}
