#![cfg_attr(not(feature = "backend_wgpu"), allow(dead_code))]

#[cfg(feature = "backend_wgpu")]
use burn::{backend::wgpu::Wgpu, prelude::*};
#[cfg(feature = "backend_wgpu")]
use burn_patchgan::model::{
    conv::PatchConvDiscriminatorConfig, transformer::PatchTransformerDiscriminatorConfig,
};
#[cfg(feature = "backend_wgpu")]
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

#[cfg(feature = "backend_wgpu")]
criterion_group! {
    name = patchgan_benchmarks;
    config = Criterion::default().sample_size(100);
    targets = conv_benchmark, transformer_benchmark,
}
#[cfg(feature = "backend_wgpu")]
criterion_main!(patchgan_benchmarks);

#[cfg(feature = "backend_wgpu")]
fn conv_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("patchgan_conv_inference");
    for image_size in [128usize, 256] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::new("conv", image_size),
            &image_size,
            |b, &image_size| {
                let device = Default::default();
                let config = PatchConvDiscriminatorConfig::default();
                let model = config.init(&device);
                let input: Tensor<Wgpu, 4> =
                    Tensor::zeros([1, config.input_channels, image_size, image_size], &device);

                b.iter(|| model.forward(input.clone()).to_data());
            },
        );
    }
}

#[cfg(feature = "backend_wgpu")]
fn transformer_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("patchgan_transformer_inference");
    group.throughput(Throughput::Elements(1));
    group.bench_function(BenchmarkId::new("transformer", 128), |b| {
        let device = Default::default();
        let config = PatchTransformerDiscriminatorConfig::default();
        let image_size = config.image_size;
        let channels = config.input_channels;
        let model = config.init(&device);
        let input: Tensor<Wgpu, 4> =
            Tensor::zeros([1, channels, image_size, image_size], &device);

        b.iter(|| model.forward(input.clone()).to_data());
    });
}

#[cfg(not(feature = "backend_wgpu"))]
fn main() {
    eprintln!(
        "discriminator benchmark requires `--features backend_wgpu`. \
         Re-run with `cargo bench --features backend_wgpu`."
    );
}
