use crate::common::*;

/// The network-ready image/target pair handed to the training loop.
#[derive(Debug, TensorLike)]
pub struct PatchRecord {
    pub image: Tensor,
    pub target: Tensor,
}
