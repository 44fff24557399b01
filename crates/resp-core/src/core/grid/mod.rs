pub mod sphere;
pub mod surface;

pub use sphere::{connolly_sphere, unit_sphere_points};
pub use surface::{ConnollyShell, SurfaceError, connolly_shells, sample_vdw_surface, vdw_surface};
