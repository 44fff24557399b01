pub mod radii;

pub use radii::{RadiiConfig, RadiiError, RadiiSet};
