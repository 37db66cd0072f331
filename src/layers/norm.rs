use burn::{module::Param, nn::Initializer, prelude::*};
use serde::{Deserialize, Serialize};

use crate::layers::init::batch_norm;

/// Normalization used between the convolutional discriminator stages.
///
/// `Batch` is the standard choice; `Act` swaps in an invertible
/// per-channel affine normalization that stays stable at batch size one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormKind {
    Batch,
    Act,
}

impl NormKind {
    pub fn init<B: Backend>(self, channels: usize, device: &B::Device) -> PatchNorm<B> {
        match self {
            Self::Batch => PatchNorm {
                batch: Some(batch_norm(channels, device)),
                act: None,
            },
            Self::Act => PatchNorm {
                batch: None,
                act: Some(ActNormConfig::new(channels).init(device)),
            },
        }
    }

    /// Whether convolutions feeding this normalization need their own bias.
    /// Batch normalization already applies an affine shift.
    pub fn conv_bias(self) -> bool {
        matches!(self, Self::Act)
    }
}

#[derive(Config, Debug)]
pub struct ActNormConfig {
    pub channels: usize,
}

impl ActNormConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ActNorm<B> {
        ActNorm::new(device, self)
    }
}

/// Per-channel invertible affine normalization, `y = scale * (x + shift)`.
///
/// Starts out as the identity; both parameters are learned.
#[derive(Module, Debug)]
pub struct ActNorm<B: Backend> {
    pub scale: Param<Tensor<B, 1>>,
    pub shift: Param<Tensor<B, 1>>,
}

impl<B: Backend> ActNorm<B> {
    pub fn new(device: &B::Device, config: &ActNormConfig) -> Self {
        let scale = Initializer::Ones.init([config.channels], device);
        let shift = Initializer::Zeros.init([config.channels], device);

        Self { scale, shift }
    }

    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let [_, channels, _, _] = x.dims();

        let shift = self.shift.val().reshape([1, channels, 1, 1]);
        let scale = self.scale.val().reshape([1, channels, 1, 1]);

        x.add(shift).mul(scale)
    }
}

/// Normalization applied inside a discriminator stage; exactly one of the
/// variants is populated, per the configured [`NormKind`].
#[derive(Module, Debug)]
pub struct PatchNorm<B: Backend> {
    batch: Option<nn::BatchNorm<B, 2>>,
    act: Option<ActNorm<B>>,
}

impl<B: Backend> PatchNorm<B> {
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let x = if let Some(norm) = &self.batch {
            norm.forward(x)
        } else {
            x
        };

        if let Some(norm) = &self.act {
            norm.forward(x)
        } else {
            x
        }
    }
}
