use burn::{prelude::*, tensor::activation::softmax};

#[derive(Config, Debug)]
pub struct AttentionConfig {
    pub dim: usize,
    pub num_heads: usize,
    pub head_dim: usize,
    #[config(default = 0.0)]
    pub dropout: f64,
}

impl Default for AttentionConfig {
    fn default() -> Self {
        Self {
            dim: 256,
            num_heads: 4,
            head_dim: 64,
            dropout: 0.0,
        }
    }
}

impl AttentionConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Attention<B> {
        Attention::new(device, self.clone())
    }
}

/// Multi-head self-attention with a fused, bias-free qkv projection and an
/// explicit per-head dimension.
#[derive(Module, Debug)]
pub struct Attention<B: Backend> {
    qkv: nn::Linear<B>,
    attn_drop: nn::Dropout,
    proj: nn::Linear<B>,
    proj_drop: nn::Dropout,
    num_heads: usize,
    head_dim: usize,
    scale: f32,
}

impl<B: Backend> Attention<B> {
    pub fn new(device: &B::Device, config: AttentionConfig) -> Self {
        let inner_dim = config.num_heads * config.head_dim;
        let scale = (config.head_dim as f32).powf(-0.5);

        let qkv = nn::LinearConfig::new(config.dim, inner_dim * 3)
            .with_bias(false)
            .init(device);

        let attn_drop = nn::DropoutConfig::new(config.dropout).init();

        let proj = nn::LinearConfig::new(inner_dim, config.dim).init(device);

        let proj_drop = nn::DropoutConfig::new(config.dropout).init();

        Self {
            qkv,
            attn_drop,
            proj,
            proj_drop,
            num_heads: config.num_heads,
            head_dim: config.head_dim,
            scale,
        }
    }

    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let [batch, tokens, _] = x.dims();
        let inner_dim = self.num_heads * self.head_dim;

        let qkv = self
            .qkv
            .forward(x)
            .reshape([batch, tokens, 3, self.num_heads, self.head_dim])
            .permute([2, 0, 3, 1, 4]);

        let q: Tensor<B, 4> = qkv.clone().slice([0..1]).squeeze(0);
        let k: Tensor<B, 4> = qkv.clone().slice([1..2]).squeeze(0);
        let v: Tensor<B, 4> = qkv.slice([2..3]).squeeze(0);

        let q = q * self.scale;
        let attn = softmax(q.matmul(k.swap_dims(2, 3)), 3);
        let attn = self.attn_drop.forward(attn);

        let x = attn
            .matmul(v)
            .swap_dims(1, 2)
            .reshape([batch, tokens, inner_dim]);

        let x = self.proj.forward(x);
        self.proj_drop.forward(x)
    }
}
