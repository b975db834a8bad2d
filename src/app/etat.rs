//! src/app/etat.rs
//!
//! État UI : le solveur + le relais qui reçoit ses résultats.
//!
//! Contrats :
//! - Aucune arithmétique ici : chaque touche est transmise au solveur.
//! - Les résultats arrivent sur le fil du minuteur : le relais les range puis
//!   demande un repaint, la vue les lit sur le fil UI.

use std::sync::Arc;

use eframe::egui;
use parking_lot::Mutex;

use calculatrice_rpn::noyau::{format_tokens, Action, Decimal, Observateur, Reglages, Solveur};

/// Ce que l’écran affiche sous la formule.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Affichage {
    /// Rien à lire (démarrage, après effacement).
    #[default]
    Vide,
    Resultat(String),
    /// Formule incomplète, invalide ou division par zéro.
    Indisponible,
}

/// Observateur du solveur : re-dispatch vers le fil UI.
pub struct Relais {
    ctx: egui::Context,
    affichage: Mutex<Affichage>,
}

impl Relais {
    pub fn affichage(&self) -> Affichage {
        self.affichage.lock().clone()
    }

    fn poser(&self, a: Affichage) {
        *self.affichage.lock() = a;
        self.ctx.request_repaint();
    }
}

impl Observateur for Relais {
    fn on_solved(&self, resultat: Option<Decimal>) {
        self.poser(match resultat {
            Some(v) => Affichage::Resultat(v.to_string()),
            None => Affichage::Indisponible,
        });
    }

    fn on_cleared(&self) {
        self.poser(Affichage::Vide);
    }
}

pub struct AppCalc {
    solveur: Solveur,
    // garde l’observateur en vie : le solveur n’en tient qu’une référence faible
    relais: Arc<Relais>,
}

impl AppCalc {
    pub fn new(ctx: &egui::Context, reglages: Reglages) -> Self {
        let relais = Arc::new(Relais {
            ctx: ctx.clone(),
            affichage: Mutex::new(Affichage::Vide),
        });
        let solveur = Solveur::with_reglages(reglages);
        solveur.set_observateur(&relais);

        Self { solveur, relais }
    }

    /* ------------------------ Touches (transmises au solveur) ------------------------ */

    pub fn chiffre(&self, c: u8) {
        self.solveur.add_digit(c);
    }

    pub fn point(&self) {
        self.solveur.add_point();
    }

    pub fn operateur(&self, action: Action) {
        self.solveur.add_action(action);
    }

    /// C : formule vide, écran vidé immédiatement (via on_cleared).
    pub fn effacer(&self) {
        self.solveur.clear();
    }

    /// Clavier physique : un caractère tapé.
    pub fn touche_clavier(&self, c: char) {
        match c {
            '0'..='9' => self.chiffre(c as u8 - b'0'),
            '.' | ',' => self.point(),
            _ => {
                if let Some(action) = Action::TOUTES
                    .iter()
                    .find(|a| a.symbole().starts_with(c))
                {
                    self.operateur(*action);
                }
            }
        }
    }

    /* ------------------------ Lecture pour la vue ------------------------ */

    pub fn formule_texte(&self) -> String {
        format_tokens(&self.solveur.jetons())
    }

    pub fn affichage(&self) -> Affichage {
        self.relais.affichage()
    }
}
