//! The fisheye point-projection binding.
//!
//! [`fisheye_project_points`] is the single entry point the host dispatcher
//! routes to. It validates the call shape, marshals the tagged argument
//! list into `nalgebra` matrices, invokes the projection routine once, and
//! marshals the results back into host [`Value`]s whose container
//! convention mirrors the input's.

use log::{debug, trace};
use nalgebra::{DMatrix, DVector, Matrix3xX};

use crate::projection::{ProjectPoints, ProjectionError};
use crate::value::{Value, ValueError};

/// Failures raised by the binding before, during, or after the projection
/// call. Routine failures pass through transparently.
#[derive(thiserror::Error, Debug)]
pub enum BindingError {
    #[error("wrong number of arguments")]
    InvalidArgumentCount,
    #[error("Unrecognized option {0}")]
    UnrecognizedOption(String),
    #[error("Invalid points argument: expected a numeric matrix or a list of points, got a {0}")]
    InvalidPointsArgument(&'static str),
    #[error("points matrix of {rows}x{cols} does not hold 3-component points")]
    InvalidPointsShape { rows: usize, cols: usize },
    #[error(transparent)]
    Value(#[from] ValueError),
    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

/// Optional parameters of the projection call, populated from the trailing
/// key/value pairs of the argument list.
#[derive(Debug, Clone, Default)]
pub struct ProjectOptions {
    /// Distortion coefficient vector. `None` is forwarded as an empty
    /// vector, which the routine treats as zero distortion.
    pub distortion_coeffs: Option<DVector<f64>>,
    /// Skew coefficient.
    pub alpha: f64,
}

impl ProjectOptions {
    /// Parses the trailing option pairs of an argument list.
    ///
    /// Recognized keys are `DistortionCoeffs` and `Alpha`; any other key
    /// fails with [`BindingError::UnrecognizedOption`] carrying the key
    /// verbatim.
    pub fn parse(pairs: &[Value]) -> Result<Self, BindingError> {
        if pairs.len() % 2 != 0 {
            return Err(BindingError::InvalidArgumentCount);
        }
        let mut options = ProjectOptions::default();
        for pair in pairs.chunks_exact(2) {
            let key = pair[0].to_str()?;
            match key {
                "DistortionCoeffs" => options.distortion_coeffs = Some(pair[1].to_dvector()?),
                "Alpha" => options.alpha = pair[1].to_scalar()?,
                _ => return Err(BindingError::UnrecognizedOption(key.to_string())),
            }
        }
        Ok(options)
    }
}

/// How the caller handed over the object points, resolved once at entry.
/// The projected points are marshaled back in the same convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PointsLayout {
    /// Nx3 matrix, each row a point; image points go back as Nx2.
    Rows,
    /// 3xN matrix, each column a point; image points go back as 2xN.
    Columns,
    /// List of records; image points go back as a list of 1x2 records.
    Records,
}

/// Resolves the first argument into a column-per-point matrix plus the
/// layout to mirror on output.
///
/// A 3x3 matrix is ambiguous and resolves as three row points.
fn resolve_object_points(value: &Value) -> Result<(Matrix3xX<f64>, PointsLayout), BindingError> {
    match value {
        Value::Matrix(m) => {
            if m.ncols() == 3 {
                let points = Matrix3xX::from_fn(m.nrows(), |i, j| m[(j, i)]);
                Ok((points, PointsLayout::Rows))
            } else if m.nrows() == 3 {
                let points = Matrix3xX::from_fn(m.ncols(), |i, j| m[(i, j)]);
                Ok((points, PointsLayout::Columns))
            } else {
                Err(BindingError::InvalidPointsShape {
                    rows: m.nrows(),
                    cols: m.ncols(),
                })
            }
        }
        Value::List(_) => {
            let records = value.to_points3()?;
            let points = Matrix3xX::from_fn(records.len(), |i, j| records[j][i]);
            Ok((points, PointsLayout::Records))
        }
        other => Err(BindingError::InvalidPointsArgument(other.kind())),
    }
}

/// Projects 3-D object points through the fisheye routine on behalf of the
/// host.
///
/// The argument list holds four positional inputs followed by zero or more
/// key/value option pairs:
///
/// 1. Object points: an Nx3 or 3xN numeric matrix, or a list of 3-element
///    records.
/// 2. Rotation vector (3 elements).
/// 3. Translation vector (3 elements).
/// 4. Camera intrinsic matrix (3x3).
/// 5. Options: `DistortionCoeffs` (numeric vector, default empty) and
///    `Alpha` (scalar, default 0).
///
/// `nargout` is the number of outputs the host requested. With one output
/// the routine is invoked without Jacobian computation; with two, the
/// Jacobian is appended to the outputs unmodified.
///
/// # Errors
///
/// * [`BindingError::InvalidArgumentCount`] - fewer than 4 positional
///   arguments, an odd option tail, or more than 2 requested outputs.
/// * [`BindingError::UnrecognizedOption`] - an unknown option key.
/// * [`BindingError::InvalidPointsArgument`] - first argument neither a
///   matrix nor a list.
/// * [`BindingError::Value`] - an argument that does not convert to its
///   expected numeric shape.
/// * [`BindingError::Projection`] - whatever the routine itself raised,
///   verbatim.
///
/// # Examples
///
/// ```rust
/// use fisheye_bridge::{fisheye_project_points, Projection, ProjectionError, Value};
/// use nalgebra::{DMatrix, DVector, Matrix2xX, Matrix3, Matrix3xX, Vector3};
///
/// // A stand-in routine: perspective division plus the intrinsic matrix.
/// let routine = |points: &Matrix3xX<f64>,
///                _rvec: &Vector3<f64>,
///                tvec: &Vector3<f64>,
///                k: &Matrix3<f64>,
///                _dist: &DVector<f64>,
///                _alpha: f64,
///                _jac: bool|
///  -> Result<Projection, ProjectionError> {
///     let image_points = Matrix2xX::from_fn(points.ncols(), |i, j| {
///         let p = points.column(j) + tvec;
///         k[(i, i)] * p[i] / p[2] + k[(i, 2)]
///     });
///     Ok(Projection { image_points, jacobian: None })
/// };
///
/// let args = [
///     Value::Matrix(DMatrix::from_row_slice(1, 3, &[0.1, 0.2, 1.0])),
///     Value::Matrix(DMatrix::zeros(3, 1)),
///     Value::Matrix(DMatrix::zeros(3, 1)),
///     Value::Matrix(DMatrix::from_row_slice(
///         3,
///         3,
///         &[500.0, 0.0, 320.0, 0.0, 500.0, 240.0, 0.0, 0.0, 1.0],
///     )),
/// ];
/// let outputs = fisheye_project_points(&routine, &args, 1).unwrap();
/// let image_points = outputs[0].as_matrix().unwrap();
/// assert_eq!((image_points.nrows(), image_points.ncols()), (1, 2));
/// assert!((image_points[(0, 0)] - 370.0).abs() < 1e-9);
/// ```
pub fn fisheye_project_points<P>(
    routine: &P,
    args: &[Value],
    nargout: usize,
) -> Result<Vec<Value>, BindingError>
where
    P: ProjectPoints + ?Sized,
{
    if args.len() < 4 || (args.len() - 4) % 2 != 0 || nargout > 2 {
        return Err(BindingError::InvalidArgumentCount);
    }

    let options = ProjectOptions::parse(&args[4..])?;
    trace!("parsed options: {:?}", options);

    let (points, layout) = resolve_object_points(&args[0])?;
    let rvec = args[1].to_vector3()?;
    let tvec = args[2].to_vector3()?;
    let k = args[3].to_matrix3()?;
    let dist = options.distortion_coeffs.unwrap_or_else(|| DVector::zeros(0));
    let compute_jacobian = nargout > 1;

    debug!(
        "projecting {} points ({:?} layout), jacobian: {}",
        points.ncols(),
        layout,
        compute_jacobian
    );

    let projection =
        routine.project_points(&points, &rvec, &tvec, &k, &dist, options.alpha, compute_jacobian)?;
    let image_points = &projection.image_points;

    let image = match layout {
        PointsLayout::Rows => Value::Matrix(DMatrix::from_fn(image_points.ncols(), 2, |i, j| {
            image_points[(j, i)]
        })),
        PointsLayout::Columns => Value::Matrix(DMatrix::from_fn(2, image_points.ncols(), |i, j| {
            image_points[(i, j)]
        })),
        PointsLayout::Records => Value::List(
            (0..image_points.ncols())
                .map(|j| Value::Matrix(DMatrix::from_fn(1, 2, |_, c| image_points[(c, j)])))
                .collect(),
        ),
    };

    let mut outputs = vec![image];
    if compute_jacobian {
        let jacobian = projection.jacobian.unwrap_or_else(|| DMatrix::zeros(0, 0));
        outputs.push(Value::Matrix(jacobian));
    }
    Ok(outputs)
}
