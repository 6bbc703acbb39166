use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};

use fleet_monitor::config::environment::MonitorConfig;
use fleet_monitor::map::headless::HeadlessSurfaceFactory;
use fleet_monitor::models::route::OPTIMIZATION_INSIGHT;
use fleet_monitor::services::export::{CsvExporter, FleetExporter};
use fleet_monitor::session::{DashboardUpdate, MonitoringSession, SessionRuntime};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = match MonitorConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            // El logging aún no está configurado
            eprintln!("❌ Configuración inválida [{}]: {}", e.code(), e);
            return Err(e.into());
        }
    };

    // Configurar logging
    let level = if config.is_development() {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🚚 Fleet Monitor - Dashboard de flota");
    info!("================================================");
    info!(
        "🚚 Flota: {} vehículos, {} rutas, refresco cada {:?}",
        config.fleet_size,
        config.route_count,
        config.refresh_interval()
    );

    let factory = HeadlessSurfaceFactory::new();
    let journal = factory.journal();
    let session = MonitoringSession::new(&config, factory);

    for route in session.state().routes() {
        info!("🛣️ {}: {}", route.name, route.summary());
    }
    info!("🛣️ {}", OPTIMIZATION_INSIGHT.headline());
    info!("🛣️ {}", OPTIMIZATION_INSIGHT.recommendation);

    let handle = SessionRuntime::spawn(session, config.refresh_interval());
    let mut updates = handle.subscribe();
    log_update(&updates.borrow_and_update());

    let mut seen: u64 = 0;
    tokio::select! {
        _ = async {
            while updates.changed().await.is_ok() {
                log_update(&updates.borrow_and_update());
                seen += 1;
                if config.run_ticks.map_or(false, |limit| seen >= limit) {
                    info!("🛑 {} actualizaciones recibidas, deteniendo", seen);
                    break;
                }
            }
        } => {}
        _ = shutdown_signal() => {}
    }

    let session = handle.shutdown().await?;
    let surfaces = journal.snapshot();
    info!(
        "🗺️ Superficies: {} creadas, {} liberadas; marcadores: {} creados, {} quitados",
        surfaces.surfaces_created,
        surfaces.surfaces_released,
        surfaces.markers_created,
        surfaces.markers_removed
    );

    match CsvExporter::new().export_vehicles(session.state().vehicles()) {
        Ok(csv) => info!("📊 Export CSV listo: {} filas", csv.lines().count().saturating_sub(1)),
        Err(e) => error!("❌ Error exportando CSV: {}", e),
    }

    info!("👋 Monitor terminado");
    Ok(())
}

fn log_update(update: &DashboardUpdate) {
    let status = &update.snapshot.status_counts;
    let health = &update.snapshot.maintenance_counts;
    info!(
        "📊 Revisión {}: {} activos, {} en mantenimiento, {} inactivos | {} sanos, {} pendientes, {} críticos | {} visibles, mapa {:?} con {} marcadores",
        update.revision,
        status.active,
        status.maintenance,
        status.inactive,
        health.healthy,
        health.due,
        health.critical,
        update.visible_vehicles,
        update.map.state,
        update.map.markers
    );
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("⚠️ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("⚠️ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, deteniendo monitor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, deteniendo monitor...");
        },
    }
}
