// src/main.rs
//
// Calculatrice RPN — point d’entrée NATIF
// ---------------------------------------
// But:
// - journal (tracing) : RUST_LOG, "info" par défaut
// - réglages : CALC_INTERVALLE_MS remplace la fenêtre anti-rebond
// - eframe::run_native + NativeOptions
//
// Pas d’entrée web : le minuteur du noyau a besoin d’un fil système.

use std::time::Duration;

use eframe::egui;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use calculatrice_rpn::noyau::Reglages;

mod app;

use app::AppCalc;

/// Titre unique.
const TITRE_APP: &str = "Calculatrice RPN";

/// Variable d’environnement : fenêtre anti-rebond en millisecondes.
const ENV_INTERVALLE: &str = "CALC_INTERVALLE_MS";

fn installer_journal() {
    let filtre = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filtre).init();
}

fn lire_reglages() -> Reglages {
    let mut reglages = Reglages::default();

    if let Ok(brut) = std::env::var(ENV_INTERVALLE) {
        match brut.trim().parse::<u64>() {
            Ok(ms) => reglages.intervalle = Duration::from_millis(ms),
            Err(e) => warn!(valeur = %brut, erreur = %e, "{ENV_INTERVALLE} ignoré"),
        }
    }

    reglages
}

fn main() -> eframe::Result<()> {
    installer_journal();

    let reglages = lire_reglages();
    info!(
        intervalle_ms = reglages.intervalle.as_millis() as u64,
        "démarrage"
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITRE_APP)
            .with_inner_size([360.0, 480.0])
            .with_min_inner_size([300.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        TITRE_APP,
        options,
        Box::new(move |cc| Ok(Box::new(AppCalc::new(&cc.egui_ctx, reglages)))),
    )
}
