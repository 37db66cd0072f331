use burn::{
    nn::{BatchNorm, BatchNormConfig, Initializer},
    prelude::*,
};

/// Kinds of layers that receive a dedicated weight initialization rule
/// when a discriminator is constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    Convolution,
    Normalization,
    Other,
}

impl LayerKind {
    /// Initializer override carried by this layer kind, if any.
    ///
    /// Convolution weights are drawn from a zero-mean Gaussian and
    /// normalization gains from a Gaussian centered at one, both with
    /// std 0.02. `Other` keeps the framework default.
    pub fn initializer(self) -> Option<Initializer> {
        match self {
            Self::Convolution => Some(Initializer::Normal {
                mean: 0.0,
                std: 0.02,
            }),
            Self::Normalization => Some(Initializer::Normal {
                mean: 1.0,
                std: 0.02,
            }),
            Self::Other => None,
        }
    }
}

/// Batch normalization with the `Normalization` rule applied: gamma drawn
/// around one, beta zeroed.
pub fn batch_norm<B: Backend>(channels: usize, device: &B::Device) -> BatchNorm<B, 2> {
    let mut norm = BatchNormConfig::new(channels).init(device);

    if let Some(initializer) = LayerKind::Normalization.initializer() {
        norm.gamma = initializer.init([channels], device);
    }
    norm.beta = Initializer::Zeros.init([channels], device);

    norm
}
