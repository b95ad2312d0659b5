use super::*;

mod basis_points;
mod shares;

pub use self::{basis_points::*, shares::*};
