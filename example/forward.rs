use burn::{backend::NdArray, prelude::*};

use burn_patchgan::model::{
    conv::PatchConvDiscriminatorConfig, transformer::PatchTransformerDiscriminatorConfig,
};

type B = NdArray<f32>;

fn main() {
    let device = Default::default();

    let conv_config = PatchConvDiscriminatorConfig::default();
    let conv = conv_config.init::<B>(&device);

    let input: Tensor<B, 4> = Tensor::zeros([1, conv_config.input_channels, 128, 128], &device);
    let patch_scores = conv.forward(input.clone());
    println!("patch score map: {:?}", patch_scores.dims());

    let transformer = PatchTransformerDiscriminatorConfig::default().init::<B>(&device);
    let image_scores = transformer.forward(input);
    println!("image score: {:?}", image_scores.dims());
}
