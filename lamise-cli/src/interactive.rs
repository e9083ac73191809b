use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use lamise_core::config::{save_config, FilterConfig};
use lamise_core::models::Ticket;

use crate::display::{display_config, display_import_summary, display_tickets};
use crate::import::import_csv;

#[derive(Debug, PartialEq)]
enum InteractiveCommand {
    Show,
    Filter,
    Charts,
    Overlap,
    Buckets,
    Thresholds,
    Load,
    Quit,
}

fn parse_command(input: &str) -> Option<InteractiveCommand> {
    match input.trim().to_lowercase().as_str() {
        "1" | "afficher" | "show" => Some(InteractiveCommand::Show),
        "2" | "filtrer" | "filter" | "fil" => Some(InteractiveCommand::Filter),
        "3" | "graphiques" | "charts" | "graph" => Some(InteractiveCommand::Charts),
        "4" | "chevauchements" | "overlap" | "chev" => Some(InteractiveCommand::Overlap),
        "5" | "grille" | "buckets" => Some(InteractiveCommand::Buckets),
        "6" | "seuils" | "thresholds" => Some(InteractiveCommand::Thresholds),
        "7" | "charger" | "load" => Some(InteractiveCommand::Load),
        "8" | "quitter" | "quit" | "q" | "exit" => Some(InteractiveCommand::Quit),
        _ => None,
    }
}

fn display_menu() {
    println!();
    println!("── Mode interactif ──");
    println!("  1. afficher       Données brutes");
    println!("  2. filtrer        Mises filtrées et taux de profit");
    println!("  3. graphiques     Coût total, distribution, nuage de points");
    println!("  4. chevauchements Carte de chevauchement des numéros");
    println!("  5. grille         Coûts agrégés par plage de numéros");
    println!("  6. seuils         Afficher / modifier les seuils");
    println!("  7. charger        Charger un autre fichier CSV");
    println!("  8. quitter        Quitter");
    println!();
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Erreur de lecture")?;
    Ok(input.trim().to_string())
}

fn prompt_with_default(msg: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}] : ", msg, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

struct Session {
    tickets: Vec<Ticket>,
    has_rewards: bool,
    config: FilterConfig,
}

impl Session {
    fn load(path: &Path) -> Result<Self> {
        let (tickets, report) = import_csv(path)?;
        display_import_summary(&report);
        Ok(Session {
            tickets,
            has_rewards: report.has_rewards,
            config: FilterConfig::default(),
        })
    }
}

fn cmd_thresholds_interactive(session: &mut Session) -> Result<()> {
    display_config(&session.config);

    let avg = prompt_with_default(
        "Coût moyen minimal",
        &session.config.min_avg_cost.to_string(),
    )?;
    session.config.min_avg_cost = avg.parse().context("Nombre invalide")?;

    let unique = prompt_with_default(
        "Numéros uniques minimaux",
        &session.config.min_unique_count.to_string(),
    )?;
    session.config.min_unique_count = unique.parse().context("Nombre invalide")?;

    let save_path = prompt("Enregistrer dans un fichier JSON (vide = non) : ")?;
    if !save_path.is_empty() {
        save_config(&session.config, Path::new(&save_path))?;
        println!("Seuils enregistrés dans '{}'.", save_path);
    }

    Ok(())
}

fn cmd_load_interactive(session: &mut Session) -> Result<()> {
    let path = prompt("Chemin vers le fichier CSV : ")?;
    if path.is_empty() {
        println!("Chargement annulé.");
        return Ok(());
    }
    let loaded = Session::load(&PathBuf::from(&path))?;
    session.tickets = loaded.tickets;
    session.has_rewards = loaded.has_rewards;
    Ok(())
}

pub fn run_interactive(file: &Path) -> Result<()> {
    println!("Bienvenue dans le mode interactif de lamise !");

    let mut session = Session::load(file)?;

    loop {
        display_menu();
        let input = match prompt("> ") {
            Ok(s) => s,
            Err(_) => break, // EOF / Ctrl+D
        };

        if input.is_empty() {
            continue;
        }

        match parse_command(&input) {
            Some(InteractiveCommand::Quit) => {
                println!("Au revoir !");
                break;
            }
            Some(InteractiveCommand::Show) => {
                let stats = lamise_core::aggregate::summarize(&session.tickets);
                display_tickets(&session.tickets, &stats);
            }
            Some(InteractiveCommand::Filter) => {
                crate::render_filtered(&session.tickets, session.has_rewards, &session.config);
            }
            Some(InteractiveCommand::Charts) => {
                crate::render_charts(&session.tickets, session.has_rewards, &session.config);
            }
            Some(InteractiveCommand::Overlap) => {
                crate::render_overlap(&session.tickets, &session.config);
            }
            Some(InteractiveCommand::Buckets) => {
                crate::render_buckets(&session.tickets);
            }
            Some(InteractiveCommand::Thresholds) => {
                if let Err(e) = cmd_thresholds_interactive(&mut session) {
                    println!("Erreur: {e:#}");
                }
            }
            Some(InteractiveCommand::Load) => {
                if let Err(e) = cmd_load_interactive(&mut session) {
                    println!("Erreur: {e:#}");
                }
            }
            None => {
                println!(
                    "Commande inconnue : '{}'. Tapez un numéro (1-8) ou un nom de commande.",
                    input
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_by_number() {
        assert_eq!(parse_command("1"), Some(InteractiveCommand::Show));
        assert_eq!(parse_command("2"), Some(InteractiveCommand::Filter));
        assert_eq!(parse_command("3"), Some(InteractiveCommand::Charts));
        assert_eq!(parse_command("4"), Some(InteractiveCommand::Overlap));
        assert_eq!(parse_command("5"), Some(InteractiveCommand::Buckets));
        assert_eq!(parse_command("6"), Some(InteractiveCommand::Thresholds));
        assert_eq!(parse_command("7"), Some(InteractiveCommand::Load));
        assert_eq!(parse_command("8"), Some(InteractiveCommand::Quit));
    }

    #[test]
    fn test_parse_command_by_name() {
        assert_eq!(parse_command("afficher"), Some(InteractiveCommand::Show));
        assert_eq!(parse_command("filtrer"), Some(InteractiveCommand::Filter));
        assert_eq!(parse_command("graphiques"), Some(InteractiveCommand::Charts));
        assert_eq!(
            parse_command("chevauchements"),
            Some(InteractiveCommand::Overlap)
        );
        assert_eq!(parse_command("grille"), Some(InteractiveCommand::Buckets));
        assert_eq!(parse_command("seuils"), Some(InteractiveCommand::Thresholds));
        assert_eq!(parse_command("charger"), Some(InteractiveCommand::Load));
        assert_eq!(parse_command("quitter"), Some(InteractiveCommand::Quit));
    }

    #[test]
    fn test_parse_command_case_insensitive() {
        assert_eq!(parse_command("QUIT"), Some(InteractiveCommand::Quit));
        assert_eq!(parse_command("Afficher"), Some(InteractiveCommand::Show));
    }

    #[test]
    fn test_parse_command_unknown() {
        assert_eq!(parse_command("foo"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("9"), None);
    }
}
