use bevy::prelude::*;
use std::sync::Arc;

use crate::{
    components::{AirData, AircraftParameters, AircraftState, ControlInputs},
    resources::AtmosphereConfig,
    simulation::{SimulationLoop, Snapshot, SnapshotReader},
};

/// Marks the entity that mirrors the simulated aircraft.
#[derive(Component, Debug, Default)]
pub struct SimulatedAircraft;

/// Handle to the running loop, shared with the ECS world.
#[derive(Resource, Clone)]
pub struct FlightLoop(pub Arc<SimulationLoop>);

/// Latest snapshot seen by the world, refreshed once per frame.
#[derive(Resource)]
pub struct LatestFlightData {
    reader: SnapshotReader,
    pub snapshot: Option<Arc<Snapshot>>,
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, SystemSet)]
pub enum FlightBridgeSet {
    Inputs,
    Sync,
}

/// Bridges a [`SimulationLoop`] into a bevy app: the aircraft entity
/// follows the published snapshots and changes to the [`ControlInputs`] and
/// [`AtmosphereConfig`] resources are forwarded to the loop.
pub struct FlightDynamicsPlugin {
    simulation: Arc<SimulationLoop>,
    params: AircraftParameters,
    autostart: bool,
}

impl FlightDynamicsPlugin {
    pub fn new(simulation: Arc<SimulationLoop>, params: AircraftParameters) -> Self {
        Self {
            simulation,
            params,
            autostart: true,
        }
    }

    /// Leaves the loop stopped; start it through [`FlightLoop`].
    pub fn paused(mut self) -> Self {
        self.autostart = false;
        self
    }

    fn spawn_aircraft(
        mut commands: Commands,
        feed: Res<LatestFlightData>,
        params: AircraftParameters,
    ) {
        let (state, air_data) = feed
            .snapshot
            .as_ref()
            .map(|s| (s.state, s.air_data))
            .unwrap_or_default();
        commands.spawn((
            Name::new(params.name.clone()),
            params,
            state,
            air_data,
            SimulatedAircraft,
        ));
    }

    fn start_loop(flight_loop: Res<FlightLoop>) {
        if let Err(e) = flight_loop.0.start() {
            error!("Failed to start flight dynamics loop: {}", e);
        }
    }
}

impl Plugin for FlightDynamicsPlugin {
    fn build(&self, app: &mut App) {
        let latest = self.simulation.latest_snapshot();
        let controls = latest.as_ref().map(|s| s.controls).unwrap_or_default();
        let params = self.params.clone();
        let atmosphere = self.simulation.atmosphere();

        app.insert_resource(FlightLoop(Arc::clone(&self.simulation)))
            .insert_resource(LatestFlightData {
                reader: self.simulation.subscribe(),
                snapshot: latest,
            })
            .insert_resource(controls)
            .insert_resource(atmosphere)
            .configure_sets(Update, (FlightBridgeSet::Inputs, FlightBridgeSet::Sync).chain())
            .add_systems(
                Startup,
                move |commands: Commands, feed: Res<LatestFlightData>| {
                    Self::spawn_aircraft(commands, feed, params.clone())
                },
            )
            .add_systems(
                Update,
                (
                    (forward_controls_system, forward_atmosphere_system)
                        .in_set(FlightBridgeSet::Inputs),
                    sync_snapshot_system.in_set(FlightBridgeSet::Sync),
                ),
            );

        if self.autostart {
            app.add_systems(PostStartup, Self::start_loop);
        }
    }
}

/// Sends the control resource to the loop whenever it changes.
pub fn forward_controls_system(controls: Res<ControlInputs>, flight_loop: Res<FlightLoop>) {
    if controls.is_changed() && !controls.is_added() {
        flight_loop.0.send_controls(*controls);
    }
}

pub fn forward_atmosphere_system(
    atmosphere: Res<AtmosphereConfig>,
    flight_loop: Res<FlightLoop>,
) {
    if atmosphere.is_changed() && !atmosphere.is_added() {
        flight_loop.0.set_atmosphere(*atmosphere);
    }
}

/// Copies a newly published snapshot onto the aircraft entity.
pub fn sync_snapshot_system(
    mut feed: ResMut<LatestFlightData>,
    mut query: Query<(&mut AircraftState, &mut AirData), With<SimulatedAircraft>>,
) {
    let Some(snapshot) = feed.reader.poll() else {
        return;
    };
    for (mut state, mut air_data) in query.iter_mut() {
        *state = snapshot.state;
        *air_data = snapshot.air_data;
    }
    feed.snapshot = Some(snapshot);
}
