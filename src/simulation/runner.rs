use bevy::prelude::*;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering},
        Arc, Mutex, MutexGuard,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use crate::{
    components::ControlInputs,
    resources::{AtmosphereConfig, ExecutionMode},
    simulation::{Simulation, Snapshot, SnapshotReader, SnapshotSlot},
    utils::{NumericFault, SimError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LoopStatus {
    Stopped = 0,
    Running = 1,
    Paused = 2,
}

impl LoopStatus {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => LoopStatus::Running,
            2 => LoopStatus::Paused,
            _ => LoopStatus::Stopped,
        }
    }
}

#[derive(Debug)]
enum Command {
    Pause,
    Resume,
    Stop,
    SetAtmosphere(AtmosphereConfig),
}

/// State visible to every handle and the stepping thread.
#[derive(Debug)]
struct Shared {
    slot: Arc<SnapshotSlot>,
    elapsed_bits: AtomicU64,
    status: AtomicU8,
    stop_requested: AtomicBool,
    last_fault: Mutex<Option<NumericFault>>,
    /// Newest atmosphere handed to the run.
    atmosphere: Mutex<AtmosphereConfig>,
}

impl Shared {
    fn set_status(&self, status: LoopStatus) {
        self.status.store(status as u8, Ordering::Release);
    }

    fn status(&self) -> LoopStatus {
        LoopStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    /// Moves `from` to `to` unless the thread changed the status first.
    /// Returns the status actually found on failure.
    fn transition(&self, from: LoopStatus, to: LoopStatus) -> Result<(), LoopStatus> {
        self.status
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(LoopStatus::from_u8)
    }

    fn stopping(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    fn last_fault(&self) -> MutexGuard<'_, Option<NumericFault>> {
        self.last_fault.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn atmosphere(&self) -> MutexGuard<'_, AtmosphereConfig> {
        self.atmosphere.lock().unwrap_or_else(|e| e.into_inner())
    }
}

enum Worker {
    Idle(Box<Simulation>),
    Running {
        handle: JoinHandle<Box<Simulation>>,
        commands: Sender<Command>,
    },
    /// The stepping thread panicked; the run cannot continue.
    Lost,
}

/// Timing parameters copied out of the run's config.
#[derive(Debug, Clone, Copy)]
struct Pacing {
    mode: ExecutionMode,
    period: Duration,
    max_catch_up_steps: u32,
}

/// Drives a [`Simulation`] on a dedicated thread.
///
/// Real-time mode paces steps to the wall clock; analysis mode steps as
/// fast as possible. Snapshots go to a single-slot channel that readers
/// poll at their own rate. Control inputs are taken without blocking: the
/// newest queued vector is used, or the previous one is held.
///
/// Every method takes `&self`, so the loop can be shared behind an `Arc`
/// and stopped from any thread.
pub struct SimulationLoop {
    shared: Arc<Shared>,
    worker: Mutex<Worker>,
    controls_tx: Sender<ControlInputs>,
    controls_rx: Receiver<ControlInputs>,
    pacing: Pacing,
}

impl SimulationLoop {
    pub fn new(simulation: Simulation) -> Self {
        let config = simulation.config();
        let pacing = Pacing {
            mode: config.mode,
            period: Duration::from_secs_f64(config.time_step),
            max_catch_up_steps: config.max_catch_up_steps.max(1),
        };
        let initial = simulation.latest_snapshot();
        let (controls_tx, controls_rx) = unbounded();

        Self {
            shared: Arc::new(Shared {
                elapsed_bits: AtomicU64::new(initial.time.to_bits()),
                slot: Arc::new(SnapshotSlot::with_initial(initial)),
                status: AtomicU8::new(LoopStatus::Stopped as u8),
                stop_requested: AtomicBool::new(false),
                last_fault: Mutex::new(None),
                atmosphere: Mutex::new(*simulation.atmosphere()),
            }),
            worker: Mutex::new(Worker::Idle(Box::new(simulation))),
            controls_tx,
            controls_rx,
            pacing,
        }
    }

    fn worker(&self) -> MutexGuard<'_, Worker> {
        self.worker.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Starts or continues stepping. A run that was stopped by a numeric
    /// fault cannot be restarted.
    pub fn start(&self) -> Result<(), SimError> {
        let mut worker = self.worker();
        reap_finished(&mut worker, &self.shared);

        let simulation = match std::mem::replace(&mut *worker, Worker::Lost) {
            Worker::Idle(simulation) => simulation,
            running @ Worker::Running { .. } => {
                *worker = running;
                return Err(SimError::LoopState("loop is already running".to_string()));
            }
            Worker::Lost => {
                return Err(SimError::LoopState(
                    "simulation thread terminated abnormally".to_string(),
                ))
            }
        };

        if let Some(fault) = self.shared.last_fault().clone() {
            *worker = Worker::Idle(simulation);
            return Err(SimError::LoopState(format!("run ended with a fault: {}", fault)));
        }

        let (commands, command_rx) = unbounded();
        let shared = Arc::clone(&self.shared);
        let controls_rx = self.controls_rx.clone();
        let pacing = self.pacing;

        self.shared.stop_requested.store(false, Ordering::Release);
        self.shared.set_status(LoopStatus::Running);

        let spawned = thread::Builder::new()
            .name("flight6dof-step".to_string())
            .spawn(move || run_steps(simulation, shared, command_rx, controls_rx, pacing));

        match spawned {
            Ok(handle) => {
                info!("Simulation loop started ({:?})", pacing.mode);
                *worker = Worker::Running { handle, commands };
                Ok(())
            }
            Err(e) => {
                // The closure, and with it the simulation, is gone
                self.shared.set_status(LoopStatus::Stopped);
                Err(SimError::LoopState(format!(
                    "failed to spawn simulation thread: {}",
                    e
                )))
            }
        }
    }

    /// Stops stepping and waits for the thread to finish. Once this returns
    /// no further step runs and no further snapshot is published. Safe to
    /// call at any time and from any thread.
    pub fn stop(&self) {
        self.shared.stop_requested.store(true, Ordering::Release);
        let mut worker = self.worker();
        match std::mem::replace(&mut *worker, Worker::Lost) {
            Worker::Running { handle, commands } => {
                // A finished thread has dropped its receiver
                let _ = commands.send(Command::Stop);
                *worker = join_worker(handle);
                info!("Simulation loop stopped at t={:.3}s", self.elapsed_time());
            }
            other => *worker = other,
        }
        self.shared.set_status(LoopStatus::Stopped);
    }

    /// Holds the current state until [`SimulationLoop::resume`].
    pub fn pause(&self) -> Result<(), SimError> {
        self.command(Command::Pause, LoopStatus::Running, LoopStatus::Paused)
    }

    pub fn resume(&self) -> Result<(), SimError> {
        self.command(Command::Resume, LoopStatus::Paused, LoopStatus::Running)
    }

    fn command(&self, command: Command, from: LoopStatus, to: LoopStatus) -> Result<(), SimError> {
        let mut worker = self.worker();
        reap_finished(&mut worker, &self.shared);
        let status = self.shared.status();
        match &*worker {
            Worker::Running { commands, .. } if status == from => {
                commands
                    .send(command)
                    .map_err(|_| SimError::LoopState("simulation thread has exited".to_string()))?;
                // A fault may stop the thread between the check and the send
                match self.shared.transition(from, to) {
                    Ok(()) => Ok(()),
                    Err(actual) if actual == to => Ok(()),
                    Err(actual) => Err(SimError::LoopState(format!(
                        "loop became {:?} before reaching {:?}",
                        actual, to
                    ))),
                }
            }
            _ => Err(SimError::LoopState(format!(
                "cannot go from {:?} to {:?}",
                status, to
            ))),
        }
    }

    pub fn status(&self) -> LoopStatus {
        self.shared.status()
    }

    pub fn is_running(&self) -> bool {
        self.status() == LoopStatus::Running
    }

    pub fn latest_snapshot(&self) -> Option<Arc<Snapshot>> {
        self.shared.slot.latest()
    }

    pub fn subscribe(&self) -> SnapshotReader {
        self.shared.slot.reader()
    }

    /// Simulation time of the last accepted step (s). Never decreases.
    pub fn elapsed_time(&self) -> f64 {
        f64::from_bits(self.shared.elapsed_bits.load(Ordering::Acquire))
    }

    pub fn last_fault(&self) -> Option<NumericFault> {
        self.shared.last_fault().clone()
    }

    /// Queues a control vector for the next step. Never blocks.
    pub fn send_controls(&self, controls: ControlInputs) {
        // The receiver lives as long as self
        let _ = self.controls_tx.send(controls);
    }

    pub fn controls_sender(&self) -> Sender<ControlInputs> {
        self.controls_tx.clone()
    }

    /// Atmosphere the run uses, including changes still queued for the
    /// stepping thread.
    pub fn atmosphere(&self) -> AtmosphereConfig {
        *self.shared.atmosphere()
    }

    /// Applied between steps, never during one.
    pub fn set_atmosphere(&self, atmosphere: AtmosphereConfig) {
        let mut worker = self.worker();
        *self.shared.atmosphere() = atmosphere;
        match &mut *worker {
            Worker::Idle(simulation) => simulation.set_atmosphere(atmosphere),
            Worker::Running { commands, .. } => {
                if commands.send(Command::SetAtmosphere(atmosphere)).is_err() {
                    // The thread ended on its own; apply to the returned run
                    reap_finished(&mut worker, &self.shared);
                    if let Worker::Idle(simulation) = &mut *worker {
                        simulation.set_atmosphere(atmosphere);
                    }
                }
            }
            Worker::Lost => warn!("Atmosphere update ignored: simulation thread is gone"),
        }
    }
}

impl Drop for SimulationLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Joins a thread that already returned, e.g. after a fault.
fn reap_finished(worker: &mut Worker, shared: &Shared) {
    let finished = matches!(&*worker, Worker::Running { handle, .. } if handle.is_finished());
    if finished {
        if let Worker::Running { handle, .. } = std::mem::replace(worker, Worker::Lost) {
            *worker = join_worker(handle);
            shared.set_status(LoopStatus::Stopped);
        }
    }
}

fn join_worker(handle: JoinHandle<Box<Simulation>>) -> Worker {
    match handle.join() {
        Ok(simulation) => Worker::Idle(simulation),
        Err(_) => {
            error!("Simulation thread panicked");
            Worker::Lost
        }
    }
}

/// Body of the stepping thread. Returns the simulation so a stopped loop
/// can be started again.
fn run_steps(
    mut simulation: Box<Simulation>,
    shared: Arc<Shared>,
    commands: Receiver<Command>,
    controls: Receiver<ControlInputs>,
    pacing: Pacing,
) -> Box<Simulation> {
    let mut paused = false;
    let mut deadline = Instant::now();

    'run: loop {
        if shared.stopping() {
            break;
        }

        let received = if paused {
            commands.recv().map(Some).map_err(|_| ())
        } else {
            match pacing.mode {
                ExecutionMode::Analysis => match commands.try_recv() {
                    Ok(command) => Ok(Some(command)),
                    Err(TryRecvError::Empty) => Ok(None),
                    Err(TryRecvError::Disconnected) => Err(()),
                },
                ExecutionMode::RealTime => {
                    let wait = deadline.saturating_duration_since(Instant::now());
                    match commands.recv_timeout(wait) {
                        Ok(command) => Ok(Some(command)),
                        Err(RecvTimeoutError::Timeout) => Ok(None),
                        Err(RecvTimeoutError::Disconnected) => Err(()),
                    }
                }
            }
        };

        let command = match received {
            Ok(command) => command,
            Err(()) => break,
        };

        if let Some(command) = command {
            match command {
                Command::Stop => break,
                Command::Pause => {
                    paused = true;
                    shared.set_status(LoopStatus::Paused);
                    info!("Simulation paused at t={:.3}s", simulation.time());
                }
                Command::Resume => {
                    paused = false;
                    deadline = Instant::now();
                    shared.set_status(LoopStatus::Running);
                    info!("Simulation resumed at t={:.3}s", simulation.time());
                }
                Command::SetAtmosphere(atmosphere) => simulation.set_atmosphere(atmosphere),
            }
            continue;
        }

        let steps = match pacing.mode {
            ExecutionMode::Analysis => 1,
            ExecutionMode::RealTime => {
                let now = Instant::now();
                let lag = now.saturating_duration_since(deadline).as_secs_f64();
                let due = 1 + (lag / pacing.period.as_secs_f64()).floor() as u32;
                if due > pacing.max_catch_up_steps {
                    debug!(
                        "Step overrun: {} steps due, running {}",
                        due, pacing.max_catch_up_steps
                    );
                    deadline = now + pacing.period;
                } else {
                    deadline += pacing.period * due;
                }
                due.min(pacing.max_catch_up_steps)
            }
        };

        for _ in 0..steps {
            if shared.stopping() {
                break 'run;
            }
            let latest_controls = controls.try_iter().last();
            match simulation.step(latest_controls.as_ref()) {
                Ok(snapshot) => {
                    shared
                        .elapsed_bits
                        .store(snapshot.time.to_bits(), Ordering::Release);
                    shared.slot.publish(snapshot);
                }
                Err(e) => {
                    error!("Simulation stopped: {}", e);
                    *shared.last_fault() = e.as_numeric_fault().cloned();
                    shared.set_status(LoopStatus::Stopped);
                    return simulation;
                }
            }
        }
    }

    shared.set_status(LoopStatus::Stopped);
    simulation
}
