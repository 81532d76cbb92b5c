//! Fisheye Bridge Library
//!
//! A Rust binding layer that exposes a fisheye camera point-projection
//! routine to an external scripting host. This library provides:
//! - A dynamically typed [`Value`] surface for arguments crossing the host
//!   boundary, with checked conversions into `nalgebra` containers
//! - The [`ProjectPoints`] seam through which the embedding supplies the
//!   actual projection routine
//! - The [`fisheye_project_points`] binding: call-shape validation, option
//!   parsing, input dispatch, and result marshaling
//!
//! The projection mathematics itself (distortion model, Jacobian
//! derivation) is owned by the embedding's geometry library and is never
//! re-implemented here.

pub mod binding;
pub mod projection;
pub mod value;

// Re-export commonly used types
pub use binding::{fisheye_project_points, BindingError, ProjectOptions};
pub use projection::{ProjectPoints, Projection, ProjectionError};
pub use value::{Value, ValueError};
