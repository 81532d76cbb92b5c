//! Seam to the external fisheye projection routine.
//!
//! The projection mathematics (lens distortion model, Jacobian derivation)
//! lives in a geometry library owned by the host embedding; this crate only
//! marshals arguments in and results out. [`ProjectPoints`] captures the
//! routine's call signature so the embedding (or a test) supplies the
//! implementation, and [`Projection`] carries its results back.

use nalgebra::{DMatrix, DVector, Matrix2xX, Matrix3, Matrix3xX, Vector3};

/// Result of one projection call.
#[derive(Debug, Clone)]
pub struct Projection {
    /// Projected 2-D image points, one column per input point.
    pub image_points: Matrix2xX<f64>,
    /// Partial derivatives of the image points with respect to the
    /// projection parameters. `Some` exactly when the Jacobian was
    /// requested.
    pub jacobian: Option<DMatrix<f64>>,
}

/// Failure raised inside the projection routine.
///
/// The binding treats the routine as opaque: whatever message it produces
/// is carried to the host untranslated.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ProjectionError(pub String);

/// The fisheye point-projection routine.
///
/// Implementations must satisfy the following, which the binding relies on
/// without re-checking:
///
/// * `image_points` holds exactly one column per column of `points`.
/// * `jacobian` is `Some` and non-empty when `compute_jacobian` is true,
///   and the derivative computation is skipped entirely when it is false.
/// * An empty `dist` vector behaves as an all-zero distortion vector.
///
/// # Arguments
///
/// * `points` - 3-D points in world coordinates, one column per point.
/// * `rvec` - Rotation vector of the camera pose.
/// * `tvec` - Translation vector of the camera pose.
/// * `k` - 3x3 camera intrinsic matrix.
/// * `dist` - Distortion coefficients, possibly empty.
/// * `alpha` - Skew coefficient.
/// * `compute_jacobian` - Whether to also compute the Jacobian.
pub trait ProjectPoints {
    #[allow(clippy::too_many_arguments)]
    fn project_points(
        &self,
        points: &Matrix3xX<f64>,
        rvec: &Vector3<f64>,
        tvec: &Vector3<f64>,
        k: &Matrix3<f64>,
        dist: &DVector<f64>,
        alpha: f64,
        compute_jacobian: bool,
    ) -> Result<Projection, ProjectionError>;
}

/// Plain functions and closures with the matching signature are routines.
impl<F> ProjectPoints for F
where
    F: Fn(
        &Matrix3xX<f64>,
        &Vector3<f64>,
        &Vector3<f64>,
        &Matrix3<f64>,
        &DVector<f64>,
        f64,
        bool,
    ) -> Result<Projection, ProjectionError>,
{
    fn project_points(
        &self,
        points: &Matrix3xX<f64>,
        rvec: &Vector3<f64>,
        tvec: &Vector3<f64>,
        k: &Matrix3<f64>,
        dist: &DVector<f64>,
        alpha: f64,
        compute_jacobian: bool,
    ) -> Result<Projection, ProjectionError> {
        self(points, rvec, tvec, k, dist, alpha, compute_jacobian)
    }
}
