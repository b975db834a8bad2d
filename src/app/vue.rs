// src/app/vue.rs
//
// Vue (UI egui) — pavé numérique
// ------------------------------
// - Écran : formule (jetons) + résultat livré par le solveur
// - Pavé : chiffres, point, opérateurs, parenthèses, C
// - Aucun calcul ici

use eframe::egui;

use calculatrice_rpn::noyau::Action;

use super::etat::{AppCalc, Affichage};

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        ui.heading("Calculatrice RPN");
        ui.add_space(6.0);

        self.ui_ecran(ui);

        ui.add_space(8.0);
        ui.separator();
        ui.add_space(8.0);

        self.ui_pave(ui);
    }

    fn ui_ecran(&self, ui: &mut egui::Ui) {
        ui.label("Formule :");
        Self::champ_monospace(ui, "formule_out", &self.formule_texte());

        ui.add_space(6.0);

        ui.label("Résultat :");
        match self.affichage() {
            Affichage::Vide => Self::champ_monospace(ui, "resultat_out", ""),
            Affichage::Resultat(v) => Self::champ_monospace(ui, "resultat_out", &v),
            Affichage::Indisponible => {
                ui.monospace("indisponible");
            }
        }
    }

    fn ui_pave(&self, ui: &mut egui::Ui) {
        egui::Grid::new("pave_numerique_rpn")
            .num_columns(4)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                for ligne in PAVE {
                    for touche in ligne.iter() {
                        self.bouton(ui, *touche);
                    }
                    ui.end_row();
                }
            });
    }

    fn champ_monospace(ui: &mut egui::Ui, id: &str, contenu: &str) {
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.push_id(id, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.set_min_height(ui.text_style_height(&egui::TextStyle::Monospace));
                    ui.monospace(contenu);
                });
            });
    }

    fn bouton(&self, ui: &mut egui::Ui, touche: Touche) {
        let resp = ui.add_sized([64.0, 40.0], egui::Button::new(touche.label()));
        if !resp.clicked() {
            return;
        }

        match touche {
            Touche::Chiffre(c) => self.chiffre(c),
            Touche::Point => self.point(),
            Touche::Op(action) => self.operateur(action),
            Touche::Effacer => self.effacer(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Touche {
    Chiffre(u8),
    Point,
    Op(Action),
    Effacer,
}

impl Touche {
    fn label(self) -> String {
        match self {
            Touche::Chiffre(c) => c.to_string(),
            Touche::Point => ".".to_string(),
            Touche::Op(action) => action.symbole().to_string(),
            Touche::Effacer => "C".to_string(),
        }
    }
}

const PAVE: &[&[Touche]] = &[
    &[
        Touche::Chiffre(7),
        Touche::Chiffre(8),
        Touche::Chiffre(9),
        Touche::Op(Action::Div),
    ],
    &[
        Touche::Chiffre(4),
        Touche::Chiffre(5),
        Touche::Chiffre(6),
        Touche::Op(Action::Mul),
    ],
    &[
        Touche::Chiffre(1),
        Touche::Chiffre(2),
        Touche::Chiffre(3),
        Touche::Op(Action::Sub),
    ],
    &[
        Touche::Chiffre(0),
        Touche::Point,
        Touche::Effacer,
        Touche::Op(Action::Add),
    ],
    &[Touche::Op(Action::LPar), Touche::Op(Action::RPar)],
];
