// src/app.rs
//
// Calculatrice RPN — module App (racine)
// -------------------------------------
// Rôle:
// - Déclarer les sous-modules (etat.rs + vue.rs)
// - Ré-exporter AppCalc (pour main.rs: use app::AppCalc;)
// - Fournir l’impl eframe::App
//
// Clavier physique : chiffres, '.', + - * / ( ) envoyés au solveur,
// ESC = effacer (comme le bouton "C").

pub mod etat;
pub mod vue;

pub use etat::AppCalc;

use eframe::egui;

impl eframe::App for AppCalc {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let (esc, texte) = ctx.input(|i| {
            let texte: String = i
                .events
                .iter()
                .filter_map(|e| match e {
                    egui::Event::Text(t) => Some(t.as_str()),
                    _ => None,
                })
                .collect();
            (i.key_pressed(egui::Key::Escape), texte)
        });

        if esc {
            self.effacer();
        }
        for c in texte.chars() {
            self.touche_clavier(c);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.ui(ui);
        });
    }
}
