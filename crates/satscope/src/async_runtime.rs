//! Background task spawning on the Tokio runtime.
//!
//! `reqwest` needs a Tokio reactor, so network and file lookups run on the
//! runtime provided by `bevy_tokio_tasks` rather than Bevy's task pools.

use std::future::Future;

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

/// Plugin that installs the Tokio runtime.
pub struct AsyncRuntimePlugin;

impl Plugin for AsyncRuntimePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(bevy_tokio_tasks::TokioTasksPlugin::default());
    }
}

/// A system parameter for spawning background tasks.
#[derive(SystemParam)]
pub struct TaskSpawner<'w> {
    runtime: Res<'w, bevy_tokio_tasks::TokioTasksRuntime>,
}

impl TaskSpawner<'_> {
    /// Spawn a background task that runs to completion.
    ///
    /// Tasks that produce values send them back over an `async_channel`.
    pub fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.runtime.spawn_background_task(move |_ctx| future);
    }
}
