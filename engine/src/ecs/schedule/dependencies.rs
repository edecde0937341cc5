//! Standard dependency slots shared by engine and game tasks.

use crate::define_slot;

define_slot!(
    /// Input devices are polled and their events dispatched.
    ReceiveInput,
    /// Physics worlds are stepped. Fulfilled by the physics world task.
    ProcessPhysics,
    /// Scene state is handed to the renderer.
    Render,
);
