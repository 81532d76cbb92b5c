//! Dynamically typed host values and their conversions.
//!
//! The embedding host hands the binding an ordered list of loosely typed
//! arguments. [`Value`] models that surface: a dense numeric matrix, a
//! numeric scalar, a string (option keys), or a list of numeric records
//! (the host's cell-array form for discrete points). The conversion
//! methods pull strongly typed `nalgebra` containers out of a [`Value`],
//! copying the data so nothing aliases host memory after the call returns.

use nalgebra::{DMatrix, DVector, Matrix3, Point3, Vector3};

/// A single argument as received from the embedding host.
///
/// All numeric payloads are already double precision; the host side is
/// responsible for widening narrower numeric types before crossing the
/// boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Dense numeric matrix.
    Matrix(DMatrix<f64>),
    /// Numeric scalar.
    Scalar(f64),
    /// String, used for option keys.
    Str(String),
    /// List of records, the host's representation of discrete points.
    List(Vec<Value>),
}

/// Conversion failures raised while marshaling a [`Value`].
#[derive(thiserror::Error, Debug)]
pub enum ValueError {
    #[error("expected a numeric matrix, got a {0}")]
    ExpectedMatrix(&'static str),
    #[error("expected a numeric scalar, got a {0}")]
    ExpectedScalar(&'static str),
    #[error("expected a string, got a {0}")]
    ExpectedString(&'static str),
    #[error("expected a list of point records, got a {0}")]
    ExpectedList(&'static str),
    #[error("expected a vector, got a {rows}x{cols} matrix")]
    NotAVector { rows: usize, cols: usize },
    #[error("expected a vector of {expected} elements, got {actual}")]
    BadVectorLength { expected: usize, actual: usize },
    #[error("expected a 3x3 matrix, got {rows}x{cols}")]
    BadMatrixShape { rows: usize, cols: usize },
}

impl Value {
    /// Name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Matrix(_) => "matrix",
            Value::Scalar(_) => "scalar",
            Value::Str(_) => "string",
            Value::List(_) => "list",
        }
    }

    /// Borrows the dense matrix payload. Scalars do not coerce.
    pub fn as_matrix(&self) -> Result<&DMatrix<f64>, ValueError> {
        match self {
            Value::Matrix(m) => Ok(m),
            other => Err(ValueError::ExpectedMatrix(other.kind())),
        }
    }

    /// Converts to a scalar. Accepts [`Value::Scalar`] and 1x1 matrices.
    pub fn to_scalar(&self) -> Result<f64, ValueError> {
        match self {
            Value::Scalar(s) => Ok(*s),
            Value::Matrix(m) if m.nrows() == 1 && m.ncols() == 1 => Ok(m[(0, 0)]),
            other => Err(ValueError::ExpectedScalar(other.kind())),
        }
    }

    /// Borrows the string payload.
    pub fn to_str(&self) -> Result<&str, ValueError> {
        match self {
            Value::Str(s) => Ok(s),
            other => Err(ValueError::ExpectedString(other.kind())),
        }
    }

    /// Flattens a row or column matrix (or a scalar) into a dense vector.
    ///
    /// An empty matrix yields an empty vector, which is how the host spells
    /// "no distortion coefficients".
    pub fn to_dvector(&self) -> Result<DVector<f64>, ValueError> {
        match self {
            Value::Scalar(s) => Ok(DVector::from_element(1, *s)),
            Value::Matrix(m) => {
                if m.nrows() > 1 && m.ncols() > 1 {
                    return Err(ValueError::NotAVector {
                        rows: m.nrows(),
                        cols: m.ncols(),
                    });
                }
                Ok(DVector::from_iterator(m.len(), m.iter().copied()))
            }
            other => Err(ValueError::ExpectedMatrix(other.kind())),
        }
    }

    /// Like [`Value::to_dvector`], but the result must hold exactly `len`
    /// elements.
    pub fn to_vector(&self, len: usize) -> Result<DVector<f64>, ValueError> {
        let v = self.to_dvector()?;
        if v.len() != len {
            return Err(ValueError::BadVectorLength {
                expected: len,
                actual: v.len(),
            });
        }
        Ok(v)
    }

    /// Converts to a fixed 3-vector (rotation and translation vectors).
    pub fn to_vector3(&self) -> Result<Vector3<f64>, ValueError> {
        let v = self.to_vector(3)?;
        Ok(Vector3::new(v[0], v[1], v[2]))
    }

    /// Converts to a fixed 3x3 matrix (camera intrinsics).
    pub fn to_matrix3(&self) -> Result<Matrix3<f64>, ValueError> {
        let m = self.as_matrix()?;
        if m.nrows() != 3 || m.ncols() != 3 {
            return Err(ValueError::BadMatrixShape {
                rows: m.nrows(),
                cols: m.ncols(),
            });
        }
        Ok(m.fixed_view::<3, 3>(0, 0).into_owned())
    }

    /// Converts a list of records into discrete 3-D points. Every record
    /// must flatten to exactly three elements.
    pub fn to_points3(&self) -> Result<Vec<Point3<f64>>, ValueError> {
        match self {
            Value::List(records) => records
                .iter()
                .map(|record| {
                    let v = record.to_vector(3)?;
                    Ok(Point3::new(v[0], v[1], v[2]))
                })
                .collect(),
            other => Err(ValueError::ExpectedList(other.kind())),
        }
    }
}

impl From<f64> for Value {
    fn from(s: f64) -> Self {
        Value::Scalar(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<DMatrix<f64>> for Value {
    fn from(m: DMatrix<f64>) -> Self {
        Value::Matrix(m)
    }
}
