//! Ejecución asíncrona de la sesión
//!
//! Un único worker de tokio procesa los eventos en orden. El temporizador de
//! refresco es un handle cancelable que se libera explícitamente en
//! `shutdown` e implícitamente al soltarlo.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::map::surface::SurfaceFactory;
use crate::session::events::{DashboardUpdate, SessionEvent};
use crate::session::monitor::MonitoringSession;
use crate::utils::errors::{internal_error, session_closed_error, AppResult};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Temporizador de refresco cancelable
///
/// El primer tick llega un periodo después de arrancar.
#[derive(Debug)]
pub struct RefreshTimer {
    handle: Option<JoinHandle<()>>,
    period: Duration,
}

impl RefreshTimer {
    pub fn start(period: Duration, events: mpsc::Sender<SessionEvent>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                debug!("⏱️ Tick de refresco");
                if events.send(SessionEvent::Refresh).await.is_err() {
                    break;
                }
            }
        });

        info!("⏱️ Temporizador de refresco iniciado ({:?})", period);
        Self {
            handle: Some(handle),
            period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().map_or(false, |h| !h.is_finished())
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            info!("⏱️ Temporizador de refresco cancelado");
        }
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Arranque del worker de la sesión
pub struct SessionRuntime;

impl SessionRuntime {
    /// Montar el mapa, publicar el estado inicial y arrancar worker y temporizador
    ///
    /// Debe llamarse dentro de un runtime de tokio.
    pub fn spawn<F>(mut session: MonitoringSession<F>, period: Duration) -> SessionHandle<F>
    where
        F: SurfaceFactory + 'static,
        F::Surface: 'static,
    {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (updates_tx, updates_rx) = watch::channel(session.render());
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let worker = tokio::spawn(run_worker(session, events_rx, shutdown_rx, updates_tx));
        let timer = RefreshTimer::start(period, events_tx.clone());
        info!("🚚 Sesión de monitorización en marcha");

        SessionHandle {
            events: events_tx,
            updates: updates_rx,
            shutdown: Some(shutdown_tx),
            timer,
            worker: Some(worker),
        }
    }
}

async fn run_worker<F: SurfaceFactory>(
    mut session: MonitoringSession<F>,
    mut events: mpsc::Receiver<SessionEvent>,
    mut shutdown: oneshot::Receiver<()>,
    updates: watch::Sender<DashboardUpdate>,
) -> MonitoringSession<F> {
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            event = events.recv() => match event {
                Some(event) => {
                    let update = session.step(event);
                    updates.send_replace(update);
                }
                None => break,
            },
        }
    }

    session.teardown();
    session
}

/// Handle de una sesión en marcha
pub struct SessionHandle<F: SurfaceFactory> {
    events: mpsc::Sender<SessionEvent>,
    updates: watch::Receiver<DashboardUpdate>,
    shutdown: Option<oneshot::Sender<()>>,
    timer: RefreshTimer,
    worker: Option<JoinHandle<MonitoringSession<F>>>,
}

impl<F: SurfaceFactory> SessionHandle<F> {
    /// Encolar un evento detrás de los pendientes
    pub async fn send(&self, event: SessionEvent) -> AppResult<()> {
        self.events
            .send(event)
            .await
            .map_err(|_| session_closed_error("send event"))
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardUpdate> {
        self.updates.clone()
    }

    pub fn latest(&self) -> DashboardUpdate {
        self.updates.borrow().clone()
    }

    pub fn timer(&self) -> &RefreshTimer {
        &self.timer
    }

    /// Cancelar el temporizador, parar el worker y desmontar el mapa
    ///
    /// Devuelve la sesión ya desmontada.
    pub async fn shutdown(mut self) -> AppResult<MonitoringSession<F>> {
        self.timer.cancel();
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }

        let worker = self
            .worker
            .take()
            .ok_or_else(|| session_closed_error("shut down"))?;
        worker.await.map_err(|e| {
            error!("❌ El worker de la sesión terminó con error: {}", e);
            internal_error(&format!("session worker failed: {}", e))
        })
    }
}

impl<F: SurfaceFactory> Drop for SessionHandle<F> {
    fn drop(&mut self) {
        self.timer.cancel();
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_timer_ticks_after_one_period() {
        let (tx, mut rx) = mpsc::channel(8);
        let timer = RefreshTimer::start(Duration::from_secs(5), tx);

        time::sleep(Duration::from_millis(4_900)).await;
        assert!(rx.try_recv().is_err());

        time::sleep(Duration::from_millis(200)).await;
        assert_eq!(rx.try_recv(), Ok(SessionEvent::Refresh));
        assert!(timer.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_ticks() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut timer = RefreshTimer::start(Duration::from_secs(1), tx);
        timer.cancel();

        time::sleep(Duration::from_secs(5)).await;
        assert!(rx.recv().await.is_none());
        assert!(!timer.is_active());
    }
}
