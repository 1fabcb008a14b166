//! Animation primitives for Starscape
//!
//! Every animator here is a pure function of elapsed time, its own parameters
//! and (where relevant) its owner's interaction state. None of them look at
//! any other object, so each can be evaluated and tested in isolation.

mod orbit;
mod pulse;
mod funnel;
mod follow;
mod motion;
mod interaction;
pub mod procedural;
mod starfield;

pub use orbit::Orbit;
pub use pulse::Pulse;
pub use funnel::{Funnel, RingPose};
pub use follow::{CameraPose, PanelFollow};
pub use motion::{Spin, Drift};
pub use interaction::{Interaction, InteractionState, PointerEvent};
pub use procedural::{Asteroid, AsteroidFieldParams, seeded_rng};
pub use starfield::{StarPoint, Starfield};
