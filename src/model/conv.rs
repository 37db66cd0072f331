use burn::{
    nn::{conv::Conv2d, conv::Conv2dConfig, PaddingConfig2d},
    prelude::*,
    tensor::activation::leaky_relu,
};

use crate::layers::{
    init::LayerKind,
    norm::{NormKind, PatchNorm},
};

const NEGATIVE_SLOPE: f64 = 0.2;
const MAX_FILTER_MULT: usize = 8;

#[derive(Config, Debug)]
pub struct PatchConvDiscriminatorConfig {
    pub input_channels: usize,
    pub base_filters: usize,
    #[config(default = "3")]
    pub num_layers: usize,
    #[config(default = "NormKind::Batch")]
    pub norm: NormKind,
}

impl Default for PatchConvDiscriminatorConfig {
    fn default() -> Self {
        Self {
            input_channels: 3,
            base_filters: 64,
            num_layers: 3,
            norm: NormKind::Batch,
        }
    }
}

impl PatchConvDiscriminatorConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> PatchConvDiscriminator<B> {
        PatchConvDiscriminator::new(device, self.clone())
    }

    /// Edge length of the score map produced for a square input.
    pub fn output_size(&self, image_size: usize) -> usize {
        let mut size = conv_out(image_size, 4, 2, 1);
        for _ in 1..self.num_layers {
            size = conv_out(size, 4, 2, 1);
        }
        size = conv_out(size, 4, 1, 1);
        conv_out(size, 4, 1, 1)
    }
}

/// Patch-level convolutional discriminator.
///
/// A stack of strided convolutions halves the spatial resolution while the
/// filter count doubles up to an 8x cap, ending in a stride-1 projection to
/// a single channel. The output is a spatial map of raw logits, one score
/// per receptive-field patch of the input.
#[derive(Module, Debug)]
pub struct PatchConvDiscriminator<B: Backend> {
    input: Conv2d<B>,
    stages: Vec<ConvNormBlock<B>>,
    output: Conv2d<B>,
}

impl<B: Backend> PatchConvDiscriminator<B> {
    pub fn new(device: &B::Device, config: PatchConvDiscriminatorConfig) -> Self {
        let base = config.base_filters;

        // input stage keeps its bias and skips normalization
        let input = conv(config.input_channels, base, 2, true, device);

        let mut stages = Vec::with_capacity(config.num_layers);
        let mut mult = 1;
        for n in 1..config.num_layers {
            let mult_prev = mult;
            mult = (1 << n).min(MAX_FILTER_MULT);
            stages.push(ConvNormBlock::new(
                base * mult_prev,
                base * mult,
                2,
                config.norm,
                device,
            ));
        }

        let mult_prev = mult;
        mult = (1 << config.num_layers).min(MAX_FILTER_MULT);
        stages.push(ConvNormBlock::new(
            base * mult_prev,
            base * mult,
            1,
            config.norm,
            device,
        ));

        let output = conv(base * mult, 1, 1, true, device);

        Self {
            input,
            stages,
            output,
        }
    }

    /// (batch, channels, height, width) -> (batch, 1, height', width')
    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 4> {
        let mut x = leaky_relu(self.input.forward(images), NEGATIVE_SLOPE);
        for stage in &self.stages {
            x = stage.forward(x);
        }
        self.output.forward(x)
    }
}

/// Convolution + normalization + leaky rectification stage.
#[derive(Module, Debug)]
struct ConvNormBlock<B: Backend> {
    conv: Conv2d<B>,
    norm: PatchNorm<B>,
}

impl<B: Backend> ConvNormBlock<B> {
    fn new(
        in_channels: usize,
        out_channels: usize,
        stride: usize,
        norm: NormKind,
        device: &B::Device,
    ) -> Self {
        Self {
            conv: conv(in_channels, out_channels, stride, norm.conv_bias(), device),
            norm: norm.init(out_channels, device),
        }
    }

    fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        leaky_relu(self.norm.forward(self.conv.forward(x)), NEGATIVE_SLOPE)
    }
}

fn conv<B: Backend>(
    in_channels: usize,
    out_channels: usize,
    stride: usize,
    bias: bool,
    device: &B::Device,
) -> Conv2d<B> {
    let mut config = Conv2dConfig::new([in_channels, out_channels], [4, 4])
        .with_stride([stride, stride])
        .with_padding(PaddingConfig2d::Explicit(1, 1))
        .with_bias(bias);

    if let Some(initializer) = LayerKind::Convolution.initializer() {
        config = config.with_initializer(initializer);
    }

    config.init(device)
}

fn conv_out(input: usize, kernel: usize, stride: usize, padding: usize) -> usize {
    (input + 2 * padding - (kernel - 1) - 1) / stride + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deeper_stacks_shrink_the_score_map_further() {
        let deep = PatchConvDiscriminatorConfig::default().with_num_layers(6);
        let shallow = PatchConvDiscriminatorConfig::default().with_num_layers(3);

        assert!(deep.output_size(256) < shallow.output_size(256));
    }
}
