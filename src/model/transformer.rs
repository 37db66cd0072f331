use burn::prelude::*;

use crate::layers::{
    attention::AttentionConfig,
    block::{Block, BlockConfig},
    patch_embed::{PatchEmbed, PatchEmbedConfig},
    pos_embed::sincos_pos_embed_2d,
};

#[derive(Config, Debug)]
pub struct PatchTransformerDiscriminatorConfig {
    #[config(default = "128")]
    pub image_size: usize,
    pub patch_size: usize,
    pub input_channels: usize,
    pub hidden_dim: usize,
    pub depth: usize,
    pub num_heads: usize,
    #[config(default = "64")]
    pub head_dim: usize,
    pub mlp_dim: usize,
}

impl Default for PatchTransformerDiscriminatorConfig {
    fn default() -> Self {
        Self {
            image_size: 128,
            patch_size: 8,
            input_channels: 3,
            hidden_dim: 256,
            depth: 3,
            num_heads: 4,
            head_dim: 64,
            mlp_dim: 1024,
        }
    }
}

impl PatchTransformerDiscriminatorConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> PatchTransformerDiscriminator<B> {
        PatchTransformerDiscriminator::new(device, self.clone())
    }

    pub fn num_patches(&self) -> usize {
        let grid = self.image_size / self.patch_size;
        grid * grid
    }
}

/// Transformer discriminator scoring an image with a single logit.
///
/// The image is patchified by a strided convolution, offset by a fixed
/// sinusoidal positional table, run through a pre-norm transformer, then
/// mean-pooled over the patch sequence and projected to one scalar per
/// image. The positional table is a constant and never receives gradient
/// updates.
#[derive(Module, Debug)]
pub struct PatchTransformerDiscriminator<B: Backend> {
    patch_embed: PatchEmbed<B>,
    pos_embed: Tensor<B, 3>,
    blocks: Vec<Block<B>>,
    norm: nn::LayerNorm<B>,
    head: nn::Linear<B>,
}

impl<B: Backend> PatchTransformerDiscriminator<B> {
    pub fn new(device: &B::Device, config: PatchTransformerDiscriminatorConfig) -> Self {
        assert!(
            config.image_size % config.patch_size == 0,
            "image size {} must be divisible by the patch size {}",
            config.image_size,
            config.patch_size,
        );
        assert!(
            config.head_dim * config.num_heads == config.hidden_dim,
            "attention heads must tile the hidden dimension: {} heads x {} != {}",
            config.num_heads,
            config.head_dim,
            config.hidden_dim,
        );

        let patch_embed = PatchEmbedConfig::new(
            config.patch_size,
            config.input_channels,
            config.hidden_dim,
        )
        .init(device);

        let grid = config.image_size / config.patch_size;
        let pos_embed = sincos_pos_embed_2d(config.hidden_dim, (grid, grid), device);

        let block_config = BlockConfig::new(
            AttentionConfig::new(config.hidden_dim, config.num_heads, config.head_dim),
            config.mlp_dim,
        );
        let mut blocks = Vec::with_capacity(config.depth);
        for _ in 0..config.depth {
            blocks.push(block_config.init(device));
        }

        let norm = nn::LayerNormConfig::new(config.hidden_dim).init(device);
        let head = nn::LinearConfig::new(config.hidden_dim, 1).init(device);

        Self {
            patch_embed,
            pos_embed,
            blocks,
            norm,
            head,
        }
    }

    /// (batch, channels, height, width) -> (batch, 1)
    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        let mut x = self.patch_embed.forward(images) + self.pos_embed.clone();

        for block in &self.blocks {
            x = block.forward(x);
        }

        let x = self.norm.forward(x);
        let pooled = x.mean_dim(1).squeeze(1);
        self.head.forward(pooled)
    }

    /// The fixed positional table, exposed for inspection.
    pub fn pos_embed(&self) -> Tensor<B, 3> {
        self.pos_embed.clone()
    }
}
