#![cfg(feature = "backend_ndarray")]

use burn::{backend::NdArray, prelude::*, tensor::Distribution};
use burn_patchgan::{
    layers::{init::LayerKind, norm::NormKind, pos_embed::sincos_pos_embed_2d},
    model::conv::PatchConvDiscriminatorConfig,
    model::transformer::PatchTransformerDiscriminatorConfig,
};

type TestBackend = NdArray<f32>;

fn device() -> <TestBackend as Backend>::Device {
    Default::default()
}

fn random_images(batch: usize, size: usize) -> Tensor<TestBackend, 4> {
    Tensor::random(
        [batch, 3, size, size],
        Distribution::Normal(0.0, 1.0),
        &device(),
    )
}

#[test]
fn conv_discriminator_emits_patch_score_map() {
    let config = PatchConvDiscriminatorConfig::default();
    let model = config.init::<TestBackend>(&device());

    let scores = model.forward(random_images(2, 128));

    assert_eq!(scores.dims(), [2, 1, 14, 14]);
    assert_eq!(config.output_size(128), 14);
}

#[test]
fn conv_discriminator_shrinks_spatial_resolution() {
    let config = PatchConvDiscriminatorConfig::default();

    let mut previous = 128;
    for num_layers in 1..=4 {
        let size = config.clone().with_num_layers(num_layers).output_size(128);
        assert!(size < previous);
        previous = size;
    }
}

#[test]
fn act_norm_variant_matches_batch_norm_shapes() {
    let batch = PatchConvDiscriminatorConfig::default();
    let act = PatchConvDiscriminatorConfig::default().with_norm(NormKind::Act);

    let images = random_images(1, 64);
    let batch_scores = batch.init::<TestBackend>(&device()).forward(images.clone());
    let act_scores = act.init::<TestBackend>(&device()).forward(images);

    assert_eq!(batch_scores.dims(), act_scores.dims());
}

#[test]
fn transformer_discriminator_emits_scalar_score() {
    let model = PatchTransformerDiscriminatorConfig::default().init::<TestBackend>(&device());

    let scores = model.forward(random_images(2, 128));

    assert_eq!(scores.dims(), [2, 1]);
}

#[test]
#[should_panic(expected = "divisible by the patch size")]
fn transformer_rejects_indivisible_image_size() {
    let _ = PatchTransformerDiscriminatorConfig::default()
        .with_image_size(100)
        .init::<TestBackend>(&device());
}

#[test]
#[should_panic(expected = "tile the hidden dimension")]
fn transformer_rejects_mismatched_head_geometry() {
    let _ = PatchTransformerDiscriminatorConfig::default()
        .with_head_dim(32)
        .init::<TestBackend>(&device());
}

#[test]
fn positional_table_is_fixed_across_forward_calls() {
    let config = PatchTransformerDiscriminatorConfig::default();
    let grid = config.image_size / config.patch_size;
    let model = config.init::<TestBackend>(&device());

    let reference = sincos_pos_embed_2d::<TestBackend>(256, (grid, grid), &device());
    model
        .pos_embed()
        .into_data()
        .assert_approx_eq(&reference.clone().into_data(), 6);

    let _ = model.forward(random_images(1, 128));

    model
        .pos_embed()
        .into_data()
        .assert_approx_eq(&reference.into_data(), 6);
}

#[test]
fn repeated_forward_calls_are_identical() {
    let images = random_images(2, 128);

    let conv = PatchConvDiscriminatorConfig::default().init::<TestBackend>(&device());
    conv.forward(images.clone())
        .into_data()
        .assert_approx_eq(&conv.forward(images.clone()).into_data(), 6);

    let transformer =
        PatchTransformerDiscriminatorConfig::default().init::<TestBackend>(&device());
    transformer
        .forward(images.clone())
        .into_data()
        .assert_approx_eq(&transformer.forward(images).into_data(), 6);
}

#[test]
fn convolution_rule_draws_tight_zero_mean_weights() {
    let initializer = LayerKind::Convolution
        .initializer()
        .expect("convolutions carry an override");
    let weights: burn::module::Param<Tensor<TestBackend, 1>> =
        initializer.init([4096], &device());

    let (mean, std) = stats(&weights.val());
    assert!(mean.abs() < 2e-3, "mean {mean} drifted from 0");
    assert!((std - 0.02).abs() < 2e-3, "std {std} drifted from 0.02");
}

#[test]
fn normalization_rule_centers_gain_at_one_and_zeroes_bias() {
    let norm = burn_patchgan::layers::init::batch_norm::<TestBackend>(512, &device());

    let (gamma_mean, _) = stats(&norm.gamma.val());
    assert!((gamma_mean - 1.0).abs() < 5e-3, "gamma mean {gamma_mean}");

    let beta_max = norm.beta.val().abs().max().into_scalar();
    assert_eq!(beta_max, 0.0);
}

fn stats(tensor: &Tensor<TestBackend, 1>) -> (f32, f32) {
    let values: Vec<f32> = tensor.to_data().to_vec().unwrap();
    let n = values.len() as f32;
    let mean = values.iter().sum::<f32>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n;
    (mean, var.sqrt())
}
