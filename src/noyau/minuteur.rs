// src/noyau/minuteur.rs
//
// Minuteur anti-rebond (debounce).
//
// - Un seul fil de travail par minuteur, lancé à la construction.
// - planifier() ne bloque jamais : il dépose le travail dans un canal.
// - Chaque dépôt relance la fenêtre de silence ; seul le dernier travail
//   déposé survit, les précédents sont jetés sans être exécutés.
// - Après `intervalle` sans nouveau dépôt, le travail s’exécute une fois,
//   sur le fil du minuteur.
// - Drop : le travail en attente (pas encore déclenché) est abandonné.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use tracing::{trace, warn};

/// Fenêtre de silence par défaut.
pub const INTERVALLE_DEFAUT: Duration = Duration::from_millis(150);

type Travail = Box<dyn FnOnce() + Send + 'static>;

pub struct Minuteur {
    envoi: Option<Sender<Travail>>,
    fil: Option<JoinHandle<()>>,
}

impl Minuteur {
    pub fn new(intervalle: Duration) -> Self {
        let (envoi, reception) = unbounded::<Travail>();

        let fil = thread::Builder::new()
            .name("minuteur-calcul".into())
            .spawn(move || boucle(reception, intervalle));

        let fil = match fil {
            Ok(h) => Some(h),
            Err(e) => {
                // sans fil, les travaux déposés restent dans le canal et ne partent jamais
                warn!(erreur = %e, "fil du minuteur indisponible");
                None
            }
        };

        Self {
            envoi: Some(envoi),
            fil,
        }
    }

    /// Dépose un travail ; remplace celui en attente et relance la fenêtre.
    pub fn planifier<F>(&self, travail: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if let Some(envoi) = &self.envoi {
            // échec = fil terminé, rien à faire de plus
            if envoi.send(Box::new(travail)).is_err() {
                trace!("minuteur arrêté, travail ignoré");
            }
        }
    }
}

fn boucle(reception: Receiver<Travail>, intervalle: Duration) {
    // attente d’un premier dépôt (pas de délai : rien n’est en attente)
    while let Ok(mut en_attente) = reception.recv() {
        loop {
            match reception.recv_timeout(intervalle) {
                Ok(suivant) => {
                    trace!("travail remplacé avant échéance");
                    en_attente = suivant;
                }
                Err(RecvTimeoutError::Timeout) => {
                    en_attente();
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => return,
            }
        }
    }
}

impl Drop for Minuteur {
    fn drop(&mut self) {
        // ferme le canal => la boucle se termine
        self.envoi.take();

        if let Some(fil) = self.fil.take() {
            // un travail peut lâcher le dernier propriétaire depuis le fil lui-même
            if fil.thread().id() == thread::current().id() {
                return;
            }
            if fil.join().is_err() {
                warn!("fil du minuteur terminé en panique");
            }
        }
    }
}
