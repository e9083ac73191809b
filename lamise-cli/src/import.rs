use std::path::Path;

use anyhow::{Context, Result};

use lamise_core::error::CoreError;
use lamise_core::models::Ticket;
use lamise_core::parse::parse_bets;

#[derive(Debug)]
pub struct ImportReport {
    pub total_rows: u32,
    pub loaded: u32,
    pub skipped: u32,
    /// La colonne `rewards` est facultative : son absence désactive seulement
    /// les vues de taux de profit.
    pub has_rewards: bool,
}

struct Columns {
    bets: usize,
    rewards: Option<usize>,
    username: Option<usize>,
}

fn locate_columns(headers: &csv::StringRecord) -> Result<Columns> {
    let find = |name: &str| headers.iter().position(|h| h.trim() == name);

    let bets = find("number_cost_dict").ok_or(CoreError::MissingColumn {
        name: "number_cost_dict".to_string(),
    })?;

    Ok(Columns {
        bets,
        rewards: find("rewards"),
        username: find("username"),
    })
}

fn parse_row(record: &csv::StringRecord, columns: &Columns) -> Result<Ticket> {
    let raw = record
        .get(columns.bets)
        .context("Cellule number_cost_dict manquante")?;
    let bets = parse_bets(raw.trim())?;

    let reward = match columns.rewards.and_then(|i| record.get(i)) {
        Some(s) if !s.trim().is_empty() => Some(
            s.trim()
                .parse::<f64>()
                .with_context(|| format!("Récompense illisible : '{}'", s))?,
        ),
        _ => None,
    };

    // username lu tel quel, jamais converti en nombre
    let username = columns
        .username
        .and_then(|i| record.get(i))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    Ok(Ticket {
        username,
        bets,
        reward,
    })
}

/// Charge le CSV en mémoire. Les lignes illisibles sont signalées sur stderr et
/// ignorées : une erreur de ligne n'interrompt jamais le chargement.
pub fn import_csv(path: &Path) -> Result<(Vec<Ticket>, ImportReport)> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;

    let headers = reader
        .headers()
        .context("Impossible de lire l'en-tête")?
        .clone();
    let columns = locate_columns(&headers)?;

    let mut report = ImportReport {
        total_rows: 0,
        loaded: 0,
        skipped: 0,
        has_rewards: columns.rewards.is_some(),
    };

    let mut tickets = Vec::new();
    for (i, record_result) in reader.records().enumerate() {
        let line = i + 2; // 1 = en-tête
        report.total_rows += 1;
        match record_result {
            Ok(record) => match parse_row(&record, &columns) {
                Ok(ticket) => {
                    tickets.push(ticket);
                    report.loaded += 1;
                }
                Err(e) => {
                    eprintln!("Erreur parsing ligne {}: {:#}", line, e);
                    report.skipped += 1;
                }
            },
            Err(e) => {
                eprintln!("Erreur lecture ligne {}: {}", line, e);
                report.skipped += 1;
            }
        }
    }

    Ok((tickets, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn test_import_full_columns() {
        let f = write_csv(
            "username,number_cost_dict,rewards\n\
             alice,\"{'1': 10, '2': 20}\",100\n\
             bob,\"{'2': 5, '3': 15}\",0\n",
        );
        let (tickets, report) = import_csv(f.path()).unwrap();
        assert_eq!(report.total_rows, 2);
        assert_eq!(report.loaded, 2);
        assert_eq!(report.skipped, 0);
        assert!(report.has_rewards);

        assert_eq!(tickets[0].username.as_deref(), Some("alice"));
        assert!((tickets[0].total_cost() - 30.0).abs() < 1e-12);
        assert_eq!(tickets[0].reward, Some(100.0));
        assert_eq!(tickets[1].reward, Some(0.0));
    }

    #[test]
    fn test_import_missing_required_column() {
        let f = write_csv("username,rewards\nalice,100\n");
        let err = import_csv(f.path()).unwrap_err();
        assert!(err.to_string().contains("number_cost_dict"), "{}", err);
    }

    #[test]
    fn test_import_optional_columns_absent() {
        let f = write_csv("number_cost_dict\n\"{'7': 3}\"\n");
        let (tickets, report) = import_csv(f.path()).unwrap();
        assert_eq!(report.loaded, 1);
        assert!(!report.has_rewards);
        assert_eq!(tickets[0].reward, None);
        assert_eq!(tickets[0].username, None);
    }

    #[test]
    fn test_import_skips_bad_rows() {
        let f = write_csv(
            "number_cost_dict,rewards\n\
             \"{'1': 10}\",50\n\
             \"pas un dictionnaire\",50\n\
             \"{'2': 5}\",30\n",
        );
        let (tickets, report) = import_csv(f.path()).unwrap();
        assert_eq!(report.total_rows, 3);
        assert_eq!(report.loaded, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(tickets.len(), 2);
    }

    #[test]
    fn test_import_header_spaces_stripped() {
        let f = write_csv(" number_cost_dict , rewards \n\"{'1': 2}\",10\n");
        let (tickets, report) = import_csv(f.path()).unwrap();
        assert_eq!(report.loaded, 1);
        assert!(report.has_rewards);
        assert_eq!(tickets[0].reward, Some(10.0));
    }

    #[test]
    fn test_import_empty_reward_cell() {
        let f = write_csv("number_cost_dict,rewards\n\"{'1': 2}\",\n");
        let (tickets, _) = import_csv(f.path()).unwrap();
        assert_eq!(tickets[0].reward, None);
    }

    #[test]
    fn test_import_row_order_preserved() {
        let f = write_csv(
            "number_cost_dict\n\"{'1': 1}\"\n\"{'2': 2}\"\n\"{'3': 3}\"\n",
        );
        let (tickets, _) = import_csv(f.path()).unwrap();
        let firsts: Vec<u32> = tickets
            .iter()
            .map(|t| *t.bets.keys().next().unwrap())
            .collect();
        assert_eq!(firsts, vec![1, 2, 3]);
    }
}
