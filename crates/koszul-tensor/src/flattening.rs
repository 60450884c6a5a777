//! # Koszul Flattening Assembler
//!
//! Composes the structure tensor with the antisymmetrization operator:
//!
//! ```text
//! Tf  = reshape(T, m × m²)                 B* → A ⊗ C
//! K   = I_d ⊗ Tf                           Λ^p A ⊗ B* → Λ^p A ⊗ A ⊗ C
//! P   = a(m, p)ᵀ ⊗ I_m                     Λ^{p+1} A ⊗ C → Λ^p A ⊗ A ⊗ C
//! TAp = K · P                              (d·m) × (d'·m)
//! ```
//!
//! with `d = C(m, p)` and `d' = C(m, p+1)`. Row `i` of `Tf` is the first
//! tensor index; column `j·m + k` is the `(j, k)` pair in row-major
//! order. All entries are exact `i64`.

use serde::Serialize;
use sprs::{CsMat, TriMat};

use koszul_core::{binomial, checked_dim, FlatteningParams, KoszulError, Limits};

use crate::antisym::antisymmetrization_operator;
use crate::structure::StructureTensor;

/// Matrix dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shape {
    /// Row count.
    pub rows: usize,
    /// Column count.
    pub cols: usize,
}

impl Shape {
    fn of(m: &CsMat<i64>) -> Self {
        let (rows, cols) = m.shape();
        Self { rows, cols }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.rows, self.cols)
    }
}

/// Shapes of every operator formed while assembling a flattening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlatteningShapes {
    /// Reshaped tensor `Tf`.
    pub tf: Shape,
    /// `I_d ⊗ Tf`.
    pub k: Shape,
    /// Antisymmetrization operator `a(m, p)`.
    pub aop: Shape,
    /// `a(m, p)ᵀ ⊗ I_m`.
    pub p: Shape,
    /// The flattening `K · P`.
    pub tap: Shape,
}

/// Reshape `T` to the `m × m²` sparse matrix `Tf`.
pub fn reshape_tensor(tensor: &StructureTensor) -> CsMat<i64> {
    let m = tensor.dim();
    let mut tri = TriMat::with_capacity((m, m * m), tensor.nnz());
    for (i, j, k, v) in tensor.nonzeros() {
        tri.add_triplet(i, j * m + k, v);
    }
    tri.to_csr()
}

/// The Koszul flattening `TAp` of a structure tensor.
#[derive(Debug, Clone)]
pub struct KoszulFlattening {
    params: FlatteningParams,
    shapes: FlatteningShapes,
    matrix: CsMat<i64>,
}

impl KoszulFlattening {
    /// Assemble the degree-`p` flattening of `tensor`.
    ///
    /// # Errors
    ///
    /// - [`KoszulError::InvalidParameter`] if `p >= m`.
    /// - [`KoszulError::Overflow`] / [`KoszulError::ResourceLimit`] if an
    ///   operator dimension is not representable or exceeds `limits`.
    /// - [`KoszulError::Shape`] if the product has an unexpected shape.
    pub fn assemble(
        tensor: &StructureTensor,
        p: usize,
        limits: &Limits,
    ) -> Result<Self, KoszulError> {
        let params = FlatteningParams::new(tensor.algebra().n(), p)?;
        let m = tensor.dim();
        let d = binomial(m, p)?;
        let d_next = binomial(m, p + 1)?;

        let k_rows = checked_dim("K rows", &[d, m])?;
        let k_cols = checked_dim("K columns", &[d, m, m])?;
        let tap_cols = checked_dim("flattening columns", &[d_next, m])?;
        limits.check_dimension("K rows", k_rows)?;
        limits.check_dimension("K columns", k_cols)?;
        limits.check_dimension("flattening columns", tap_cols)?;

        let tf = reshape_tensor(tensor);
        let k = sprs::kronecker_product(CsMat::<i64>::eye(d).view(), tf.view());
        tracing::debug!(shape = %Shape::of(&k), nnz = k.nnz(), "formed I_d ⊗ Tf");

        let aop = antisymmetrization_operator(m, p)?;
        let aop_t: CsMat<i64> = aop.transpose_view().to_csr();
        let proj = sprs::kronecker_product(aop_t.view(), CsMat::<i64>::eye(m).view());
        tracing::debug!(shape = %Shape::of(&proj), nnz = proj.nnz(), "formed a(m,p)ᵀ ⊗ I_m");

        let matrix = &k * &proj;
        let shapes = FlatteningShapes {
            tf: Shape::of(&tf),
            k: Shape::of(&k),
            aop: Shape::of(&aop),
            p: Shape::of(&proj),
            tap: Shape::of(&matrix),
        };
        let expected = Shape {
            rows: k_rows,
            cols: tap_cols,
        };
        if shapes.tap != expected {
            return Err(KoszulError::Shape(format!(
                "flattening is {} but C(m,p)·m × C(m,p+1)·m is {expected}",
                shapes.tap
            )));
        }

        tracing::info!(
            n = params.algebra().n(),
            p,
            shape = %shapes.tap,
            nnz = matrix.nnz(),
            "Koszul flattening assembled"
        );

        Ok(Self {
            params,
            shapes,
            matrix,
        })
    }

    /// Build the structure tensor for `params` and assemble its flattening.
    pub fn compute(
        params: FlatteningParams,
        limits: &Limits,
    ) -> Result<(StructureTensor, Self), KoszulError> {
        let tensor = StructureTensor::build(params.algebra(), limits)?;
        let flattening = Self::assemble(&tensor, params.p(), limits)?;
        Ok((tensor, flattening))
    }

    /// The validated run parameters.
    pub fn params(&self) -> FlatteningParams {
        self.params
    }

    /// Shapes of every intermediate operator.
    pub fn shapes(&self) -> FlatteningShapes {
        self.shapes
    }

    /// The flattening matrix `TAp`.
    pub fn matrix(&self) -> &CsMat<i64> {
        &self.matrix
    }

    /// Number of stored entries that are actually nonzero.
    pub fn nnz(&self) -> usize {
        self.matrix.iter().filter(|(&v, _)| v != 0).count()
    }
}
