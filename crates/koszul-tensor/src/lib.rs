//! # koszul-tensor — Structure Tensor & Koszul Flattening
//!
//! Builds the structure tensor of sl(n) from brackets of elementary
//! generators and composes it into the Koszul flattening whose rank
//! bounds the tensor's border rank.
//!
//! ## Mathematical Model
//!
//! ```text
//! [e_i, e_j] = Σ_k T[i,j,k] e_k                      (structure tensor)
//! TAp : Λ^p A ⊗ B* → Λ^{p+1} A ⊗ C                   (Koszul flattening)
//! ```
//!
//! The pipeline is leaves-first: [`bracket`] evaluates commutators,
//! [`structure`] accumulates them into `T`, [`antisym`] builds the
//! exterior-power operator, and [`flattening`] composes everything with
//! sparse Kronecker products.

pub mod antisym;
pub mod bracket;
pub mod flattening;
pub mod structure;

// Re-export primary types.
pub use antisym::antisymmetrization_operator;
pub use bracket::{bracket, bracket_diag, bracket_tuple, Bracket};
pub use flattening::{reshape_tensor, FlatteningShapes, KoszulFlattening, Shape};
pub use structure::{BuildStats, StructureTensor};
