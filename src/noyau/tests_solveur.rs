//! Tests asynchrones : minuteur anti-rebond + solveur.
//!
//! - intervalles courts (quelques ms) pour rester rapides
//! - l’observateur espion pousse chaque notification dans un canal
//! - attentes bornées : un test bloqué échoue au lieu de geler

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::decimal::Decimal;
use super::jetons::{format_tokens, Action};
use super::minuteur::Minuteur;
use super::solveur::{Observateur, Solveur};

const ATTENTE_MAX: Duration = Duration::from_secs(3);

#[derive(Clone, Debug, PartialEq)]
enum Evenement {
    Resolu(Option<Decimal>),
    Efface,
}

struct Espion {
    envoi: Sender<Evenement>,
}

impl Observateur for Espion {
    fn on_solved(&self, resultat: Option<Decimal>) {
        let _ = self.envoi.send(Evenement::Resolu(resultat));
    }

    fn on_cleared(&self) {
        let _ = self.envoi.send(Evenement::Efface);
    }
}

fn monte(ms: u64) -> (Solveur, Arc<Espion>, Receiver<Evenement>) {
    let (envoi, reception) = unbounded();
    let espion = Arc::new(Espion { envoi });
    let solveur = Solveur::with_interval(Duration::from_millis(ms));
    solveur.set_observateur(&espion);
    (solveur, espion, reception)
}

fn d(s: &str) -> Decimal {
    s.parse()
        .unwrap_or_else(|e| panic!("nombre={s:?} err={e}"))
}

fn attendre(reception: &Receiver<Evenement>) -> Evenement {
    reception
        .recv_timeout(ATTENTE_MAX)
        .unwrap_or_else(|e| panic!("aucune notification: {e}"))
}

fn attendre_resultat(reception: &Receiver<Evenement>) -> Option<Decimal> {
    match attendre(reception) {
        Evenement::Resolu(r) => r,
        autre => panic!("résultat attendu, reçu {autre:?}"),
    }
}

/// Dernier résultat d’une série : draine jusqu’à un silence de 100 ms.
/// Tolère une évaluation intermédiaire si le fil de test a été suspendu.
fn resultat_final(reception: &Receiver<Evenement>) -> Option<Decimal> {
    let mut dernier = attendre_resultat(reception);
    while let Ok(ev) = reception.recv_timeout(Duration::from_millis(100)) {
        match ev {
            Evenement::Resolu(r) => dernier = r,
            Evenement::Efface => panic!("effacement inattendu"),
        }
    }
    dernier
}

fn assert_silence(reception: &Receiver<Evenement>, duree: Duration) {
    if let Ok(ev) = reception.recv_timeout(duree) {
        panic!("notification inattendue: {ev:?}");
    }
}

/* ------------------------ Minuteur ------------------------ */

#[test]
fn minuteur_rafale_une_seule_execution() {
    let minuteur = Minuteur::new(Duration::from_millis(30));
    let executions = Arc::new(AtomicUsize::new(0));
    let dernier = Arc::new(AtomicUsize::new(usize::MAX));

    for i in 0..20 {
        let executions = Arc::clone(&executions);
        let dernier = Arc::clone(&dernier);
        minuteur.planifier(move || {
            executions.fetch_add(1, Ordering::SeqCst);
            dernier.store(i, Ordering::SeqCst);
        });
    }

    thread::sleep(Duration::from_millis(300));
    assert_eq!(executions.load(Ordering::SeqCst), 1);
    assert_eq!(dernier.load(Ordering::SeqCst), 19);
}

#[test]
fn minuteur_deux_rafales_separees() {
    let minuteur = Minuteur::new(Duration::from_millis(10));
    let executions = Arc::new(AtomicUsize::new(0));

    for _ in 0..2 {
        let e = Arc::clone(&executions);
        minuteur.planifier(move || {
            e.fetch_add(1, Ordering::SeqCst);
        });
        thread::sleep(Duration::from_millis(150));
    }

    assert_eq!(executions.load(Ordering::SeqCst), 2);
}

#[test]
fn minuteur_drop_abandonne_le_travail_en_attente() {
    let executions = Arc::new(AtomicUsize::new(0));
    {
        let minuteur = Minuteur::new(Duration::from_millis(500));
        let e = Arc::clone(&executions);
        minuteur.planifier(move || {
            e.fetch_add(1, Ordering::SeqCst);
        });
    }
    thread::sleep(Duration::from_millis(50));
    assert_eq!(executions.load(Ordering::SeqCst), 0);
}

#[test]
fn minuteur_planifier_ne_bloque_pas() {
    let minuteur = Minuteur::new(Duration::from_millis(500));
    let debut = Instant::now();
    for _ in 0..100 {
        minuteur.planifier(|| thread::sleep(Duration::from_millis(5)));
    }
    assert!(debut.elapsed() < Duration::from_millis(250));
}

/* ------------------------ Solveur : formules correctes ------------------------ */

#[test]
fn solveur_nombre_seul() {
    let (sut, _espion, rx) = monte(1);
    sut.add_number(d("5"));
    assert_eq!(attendre_resultat(&rx), Some(d("5")));
}

#[test]
fn solveur_formule_simple() {
    let (sut, _espion, rx) = monte(5);
    sut.add_number(d("5"));
    sut.add_action(Action::Add);
    sut.add_number(d("13"));
    assert_eq!(resultat_final(&rx), Some(d("18")));
}

#[test]
fn solveur_precedence() {
    let (sut, _espion, rx) = monte(5);
    sut.add_number(d("5"));
    sut.add_action(Action::Add);
    sut.add_number(d("2"));
    sut.add_action(Action::Mul);
    sut.add_number(d("3"));
    assert_eq!(resultat_final(&rx), Some(d("11")));
}

#[test]
fn solveur_parentheses() {
    let (sut, _espion, rx) = monte(5);
    sut.add_action(Action::LPar);
    sut.add_number(d("5"));
    sut.add_action(Action::Add);
    sut.add_number(d("2"));
    sut.add_action(Action::RPar);
    sut.add_action(Action::Mul);
    sut.add_number(d("3"));
    assert_eq!(resultat_final(&rx), Some(d("21")));
}

#[test]
fn solveur_deux_groupes() {
    let (sut, _espion, rx) = monte(5);
    sut.add_action(Action::LPar);
    sut.add_number(d("5"));
    sut.add_action(Action::Add);
    sut.add_number(d("2"));
    sut.add_action(Action::RPar);
    sut.add_action(Action::Mul);
    sut.add_action(Action::LPar);
    sut.add_number(d("5"));
    sut.add_action(Action::Sub);
    sut.add_number(d("2"));
    sut.add_action(Action::RPar);
    assert_eq!(resultat_final(&rx), Some(d("21")));
}

#[test]
fn solveur_division_decimale() {
    let (sut, _espion, rx) = monte(5);
    sut.add_action(Action::LPar);
    sut.add_number(d("5"));
    sut.add_action(Action::Add);
    sut.add_number(d("0"));
    sut.add_action(Action::RPar);
    sut.add_action(Action::Div);
    sut.add_action(Action::LPar);
    sut.add_number(d("5"));
    sut.add_action(Action::Sub);
    sut.add_number(d("3"));
    sut.add_action(Action::RPar);
    assert_eq!(resultat_final(&rx), Some(d("2.5")));
}

#[test]
fn solveur_decimaux_exacts() {
    let (sut, _espion, rx) = monte(5);
    sut.add_number(d("5.1"));
    sut.add_action(Action::Add);
    sut.add_number(d("1.1"));
    assert_eq!(resultat_final(&rx), Some(d("6.2")));

    sut.clear();
    assert_eq!(attendre(&rx), Evenement::Efface);
    sut.add_number(d("0.042"));
    sut.add_action(Action::Mul);
    sut.add_number(d("1000"));
    assert_eq!(resultat_final(&rx), Some(d("42")));
}

#[test]
fn solveur_saisie_au_clavier() {
    let (sut, _espion, rx) = monte(5);
    // 4.2 / (6 - 5)
    assert!(sut.add_digit(4));
    assert!(sut.add_point());
    assert!(sut.add_digit(2));
    sut.add_action(Action::Div);
    sut.add_action(Action::LPar);
    sut.add_digit(6);
    sut.add_action(Action::Sub);
    sut.add_digit(5);
    sut.add_action(Action::RPar);

    assert_eq!(format_tokens(&sut.jetons()), "4.2 / ( 6 - 5 )");
    let r = resultat_final(&rx).expect("résultat");
    assert_eq!(r.to_string(), "4.2");
}

/* ------------------------ Solveur : formules incorrectes ------------------------ */

#[test]
fn solveur_action_seule() {
    let (sut, _espion, rx) = monte(1);
    sut.add_action(Action::Add);
    assert_eq!(attendre_resultat(&rx), None);
    assert_silence(&rx, Duration::from_millis(50));
}

#[test]
fn solveur_parenthese_non_fermee() {
    let (sut, _espion, rx) = monte(5);

    // une évaluation par étape : on attend chaque résultat avant la suite
    sut.add_action(Action::LPar);
    assert_eq!(attendre_resultat(&rx), None);
    sut.add_number(d("10"));
    assert_eq!(attendre_resultat(&rx), None);
    sut.add_action(Action::Add);
    assert_eq!(attendre_resultat(&rx), None);
    sut.add_number(d("5"));
    assert_eq!(attendre_resultat(&rx), None);

    sut.add_action(Action::RPar);
    assert_eq!(attendre_resultat(&rx), Some(d("15")));
}

#[test]
fn solveur_operateur_final() {
    let (sut, _espion, rx) = monte(5);
    sut.add_number(d("10"));
    assert_eq!(attendre_resultat(&rx), Some(d("10")));
    sut.add_action(Action::Add);
    assert_eq!(attendre_resultat(&rx), None);
}

#[test]
fn solveur_division_par_zero() {
    let (sut, _espion, rx) = monte(5);
    sut.add_digit(7);
    sut.add_action(Action::Div);
    sut.add_digit(0);
    assert_eq!(resultat_final(&rx), None);
}

/* ------------------------ Anti-rebond, clear, observateur ------------------------ */

#[test]
fn solveur_rafale_une_seule_evaluation() {
    let (sut, _espion, rx) = monte(40);
    for c in [1, 2, 3] {
        sut.add_digit(c);
    }
    sut.add_action(Action::Add);
    sut.add_digit(7);

    assert_eq!(attendre_resultat(&rx), Some(d("130")));
    assert_silence(&rx, Duration::from_millis(200));
}

#[test]
fn solveur_clear_immediat_sans_resultat_perime() {
    let (sut, _espion, rx) = monte(50);
    sut.add_number(d("5"));
    sut.add_action(Action::Add);
    sut.clear();

    // synchrone : déjà dans le canal au retour de clear()
    assert_eq!(rx.try_recv(), Ok(Evenement::Efface));
    assert!(sut.jetons().is_empty());
    assert_silence(&rx, Duration::from_millis(200));

    // la session continue normalement
    sut.add_digit(8);
    assert_eq!(attendre_resultat(&rx), Some(d("8")));
}

#[test]
fn solveur_mutations_non_bloquantes() {
    let (sut, _espion, rx) = monte(300);
    let debut = Instant::now();
    for _ in 0..50 {
        sut.add_digit(9);
    }
    sut.clear();
    assert!(debut.elapsed() < Duration::from_millis(150));
    assert_eq!(attendre(&rx), Evenement::Efface);
}

#[test]
fn solveur_observateur_faible() {
    let (sut, espion, rx) = monte(5);
    // le solveur ne prolonge pas la vie de l’observateur
    assert_eq!(Arc::strong_count(&espion), 1);

    drop(espion);
    sut.add_digit(1);
    sut.clear();
    // espion détruit => émetteur fermé, plus rien ne peut arriver
    thread::sleep(Duration::from_millis(50));
    assert!(rx.try_recv().is_err());
}

#[test]
fn solveur_dernier_observateur_gagne() {
    let (sut, _premier, rx_premier) = monte(5);
    let (envoi, rx_second) = unbounded();
    let second = Arc::new(Espion { envoi });
    sut.set_observateur(&second);

    sut.add_digit(3);
    assert_eq!(attendre_resultat(&rx_second), Some(d("3")));
    assert_silence(&rx_premier, Duration::from_millis(50));

    sut.clear_observateur();
    sut.add_digit(4);
    assert_silence(&rx_second, Duration::from_millis(50));
}

/// Observateur lent : signale l’entrée dans on_solved, puis s’y attarde.
struct Lent {
    entree: Sender<()>,
    envoi: Sender<Evenement>,
    duree: Duration,
}

impl Observateur for Lent {
    fn on_solved(&self, resultat: Option<Decimal>) {
        let _ = self.entree.send(());
        thread::sleep(self.duree);
        let _ = self.envoi.send(Evenement::Resolu(resultat));
    }

    fn on_cleared(&self) {
        let _ = self.envoi.send(Evenement::Efface);
    }
}

#[test]
fn solveur_clear_pendant_on_solved_ne_bloque_pas() {
    let (entree, rx_entree) = unbounded();
    let (envoi, rx) = unbounded();
    let lent = Arc::new(Lent {
        entree,
        envoi,
        duree: Duration::from_millis(600),
    });
    let sut = Solveur::with_interval(Duration::from_millis(1));
    sut.set_observateur(&lent);

    sut.add_digit(5);
    rx_entree
        .recv_timeout(ATTENTE_MAX)
        .unwrap_or_else(|e| panic!("on_solved jamais appelé: {e}"));

    // on_solved dort encore : clear() ne l’attend pas
    let debut = Instant::now();
    sut.clear();
    assert!(
        debut.elapsed() < Duration::from_millis(200),
        "clear() a attendu {:?}",
        debut.elapsed()
    );
    assert_eq!(rx.try_recv(), Ok(Evenement::Efface));

    // le rappel commencé avant clear() va à son terme
    assert_eq!(attendre_resultat(&rx), Some(d("5")));
    assert_silence(&rx, Duration::from_millis(50));
}

#[test]
fn solveur_livraison_perimee_jetee() {
    let (envoi, rx) = unbounded();
    let espion = Arc::new(Espion { envoi });
    let sut = Solveur::new();
    sut.set_observateur(&espion);

    let avant = sut.epoque();
    sut.clear();
    assert_eq!(rx.try_recv(), Ok(Evenement::Efface));

    // résultat calculé pour l’ancienne formule, livré après clear()
    sut.livrer(avant, Some(d("5")));
    assert_silence(&rx, Duration::from_millis(50));

    sut.livrer(sut.epoque(), Some(d("7")));
    assert_eq!(rx.try_recv(), Ok(Evenement::Resolu(Some(d("7")))));
}
