//! Solveur : formule + minuteur + RPN + évaluation.
//!
//! Contrats :
//! - add_number / add_digit / add_point / add_action / clear ne bloquent jamais
//!   sur une évaluation.
//! - L’évaluation différée lit une copie de la formule, puis notifie
//!   l’observateur sur le fil du minuteur (à l’appelant de se re-dispatcher).
//! - Un seul observateur, tenu en `Weak` : le solveur ne le garde pas en vie.
//! - Garde d’époque : un résultat calculé avant clear() et pas encore livré
//!   est jeté. Un on_solved déjà commencé va à son terme (clear() n’attend pas).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, trace};

use super::decimal::Decimal;
use super::eval::resoudre;
use super::jetons::{Action, Tok};
use super::minuteur::{Minuteur, INTERVALLE_DEFAUT};
use super::tampon::Formule;

/// Destinataire des résultats.
pub trait Observateur: Send + Sync {
    /// Résultat d’une évaluation différée (None : formule invalide ou division par zéro).
    fn on_solved(&self, resultat: Option<Decimal>);

    /// Formule remise à zéro (appel synchrone, sur le fil de clear()).
    fn on_cleared(&self) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reglages {
    /// Fenêtre de silence avant évaluation.
    pub intervalle: Duration,
}

impl Default for Reglages {
    fn default() -> Self {
        Self {
            intervalle: INTERVALLE_DEFAUT,
        }
    }
}

struct Partage {
    formule: Mutex<Formule>,
    // verrou court : l’époque est comparée (livraison) ou incrémentée (clear)
    // sous ce verrou, jamais pendant un rappel de l’observateur
    observateur: Mutex<Option<Weak<dyn Observateur>>>,
    epoque: AtomicU64,
}

impl Partage {
    fn evaluer(&self, epoque: u64) {
        if self.epoque.load(Ordering::SeqCst) != epoque {
            trace!(epoque, "évaluation périmée, ignorée");
            return;
        }

        // copie : le verrou n’est pas tenu pendant le calcul
        let jetons = self.formule.lock().snapshot();
        let resultat = resoudre(&jetons);
        self.livrer(epoque, resultat);
    }

    /// Livre un résultat calculé pour `epoque`, sauf si clear() est passé entre-temps.
    /// Un rappel déjà commencé n’est pas interrompu par un clear() concurrent.
    fn livrer(&self, epoque: u64, resultat: Option<Decimal>) {
        let obs = {
            let slot = self.observateur.lock();
            if self.epoque.load(Ordering::SeqCst) != epoque {
                trace!(epoque, "résultat périmé, non livré");
                return;
            }
            slot.as_ref().and_then(Weak::upgrade)
        };

        match &resultat {
            Some(v) => debug!(resultat = %v, "formule résolue"),
            None => debug!("formule sans résultat"),
        }
        if let Some(obs) = obs {
            obs.on_solved(resultat);
        }
    }
}

pub struct Solveur {
    partage: Arc<Partage>,
    minuteur: Minuteur,
}

impl Solveur {
    pub fn new() -> Self {
        Self::with_reglages(Reglages::default())
    }

    /// Intervalle court utile aux tests.
    pub fn with_interval(intervalle: Duration) -> Self {
        Self::with_reglages(Reglages { intervalle })
    }

    pub fn with_reglages(reglages: Reglages) -> Self {
        Self {
            partage: Arc::new(Partage {
                formule: Mutex::new(Formule::new()),
                observateur: Mutex::new(None),
                epoque: AtomicU64::new(0),
            }),
            minuteur: Minuteur::new(reglages.intervalle),
        }
    }

    /// Enregistre l’observateur (le dernier enregistré remplace le précédent).
    pub fn set_observateur<O>(&self, obs: &Arc<O>)
    where
        O: Observateur + 'static,
    {
        let faible: Weak<O> = Arc::downgrade(obs);
        let faible: Weak<dyn Observateur> = faible;
        *self.partage.observateur.lock() = Some(faible);
    }

    pub fn clear_observateur(&self) {
        *self.partage.observateur.lock() = None;
    }

    /// Nombre complet : remplace le nombre en cours, sinon l’ajoute.
    pub fn add_number(&self, value: Decimal) {
        self.partage.formule.lock().push_number(value);
        self.planifier();
    }

    /// Chiffre 0..=9 ajouté au nombre en cours. false si refusé.
    pub fn add_digit(&self, chiffre: u8) -> bool {
        let accepte = self.partage.formule.lock().push_digit(chiffre);
        if accepte {
            self.planifier();
        }
        accepte
    }

    /// Point décimal. false si le nombre en cours en a déjà un.
    pub fn add_point(&self) -> bool {
        let accepte = self.partage.formule.lock().push_point();
        if accepte {
            self.planifier();
        }
        accepte
    }

    pub fn add_action(&self, action: Action) {
        self.partage.formule.lock().push_action(action);
        self.planifier();
    }

    /// Vide la formule et prévient l’observateur tout de suite.
    /// Les évaluations déjà planifiées pour l’ancienne formule ne livreront rien.
    /// Ne bloque pas : aucun verrou n’est partagé avec un on_solved en cours.
    pub fn clear(&self) {
        let obs = {
            let slot = self.partage.observateur.lock();
            self.partage.epoque.fetch_add(1, Ordering::SeqCst);
            slot.as_ref().and_then(Weak::upgrade)
        };
        self.partage.formule.lock().clear();

        if let Some(obs) = obs {
            obs.on_cleared();
        }
    }

    #[cfg(test)]
    pub(super) fn epoque(&self) -> u64 {
        self.partage.epoque.load(Ordering::SeqCst)
    }

    /// Livraison directe, comme en fin d’évaluation différée.
    #[cfg(test)]
    pub(super) fn livrer(&self, epoque: u64, resultat: Option<Decimal>) {
        self.partage.livrer(epoque, resultat);
    }

    /// Copie de la formule courante (affichage).
    pub fn jetons(&self) -> Vec<Tok> {
        self.partage.formule.lock().snapshot()
    }

    fn planifier(&self) {
        let partage = Arc::clone(&self.partage);
        let epoque = partage.epoque.load(Ordering::SeqCst);
        self.minuteur.planifier(move || partage.evaluer(epoque));
    }
}

impl Default for Solveur {
    fn default() -> Self {
        Self::new()
    }
}
