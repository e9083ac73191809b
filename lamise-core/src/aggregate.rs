use crate::config::FilterConfig;
use crate::error::CoreError;
use crate::models::{
    BucketGrid, HistogramBin, Ticket, TicketStats, BUCKET_WIDTH, MAX_NUMBER, MIN_NUMBER,
};

pub fn compute_stats(ticket: &Ticket) -> TicketStats {
    let total_cost = ticket.total_cost();
    let unique_count = ticket.unique_count();
    let avg_cost = if unique_count == 0 {
        None
    } else {
        Some(total_cost / unique_count as f64)
    };
    TicketStats {
        total_cost,
        avg_cost,
        unique_count,
    }
}

pub fn summarize(tickets: &[Ticket]) -> Vec<TicketStats> {
    tickets.iter().map(compute_stats).collect()
}

/// Indices (ordre d'origine préservé) des mises passant les deux seuils.
/// Une mise sans numéro (coût moyen indéfini) ne passe jamais.
pub fn filter_indices(stats: &[TicketStats], config: &FilterConfig) -> Vec<usize> {
    stats
        .iter()
        .enumerate()
        .filter(|(_, s)| {
            matches!(s.avg_cost, Some(avg) if avg > config.min_avg_cost)
                && s.unique_count > config.min_unique_count
        })
        .map(|(i, _)| i)
        .collect()
}

/// Taux de profit en %. None quand la récompense manque ou que le coût total
/// est nul : la valeur est indéfinie, jamais une erreur.
pub fn profit_rate(ticket: &Ticket) -> Option<f64> {
    let total = ticket.total_cost();
    let reward = ticket.reward?;
    if total == 0.0 {
        return None;
    }
    Some((reward - total) / total * 100.0)
}

pub fn profit_rates(tickets: &[Ticket]) -> Vec<Option<f64>> {
    tickets.iter().map(profit_rate).collect()
}

/// Cellule (ligne, colonne) de la grille pour un numéro du domaine.
pub fn bucket_index(number: u32) -> Result<(usize, usize), CoreError> {
    if !(MIN_NUMBER..=MAX_NUMBER).contains(&number) {
        return Err(CoreError::Domain { number });
    }
    let slot = (number - MIN_NUMBER) as usize;
    Ok((slot / BUCKET_WIDTH, slot % BUCKET_WIDTH))
}

/// Agrège chaque paire (numéro, coût) dans une grille neuve. Les numéros hors
/// domaine sont collectés dans `out_of_domain` au lieu d'interrompre le calcul.
pub fn bucket_totals(tickets: &[Ticket]) -> BucketGrid {
    tickets
        .iter()
        .flat_map(|t| t.bets.iter())
        .fold(BucketGrid::default(), |mut grid, (&number, &cost)| {
            match bucket_index(number) {
                Ok((i, j)) => grid.cells[i][j] += cost,
                Err(_) => grid.out_of_domain.push((number, cost)),
            }
            grid
        })
}

fn overlap_count(a: &Ticket, b: &Ticket) -> usize {
    a.bets.keys().filter(|k| b.bets.contains_key(k)).count()
}

/// Matrice symétrique des numéros partagés entre paires de mises.
/// La diagonale vaut le nombre de numéros uniques de chaque mise.
pub fn overlap_matrix(tickets: &[Ticket]) -> Vec<Vec<usize>> {
    tickets
        .iter()
        .map(|a| tickets.iter().map(|b| overlap_count(a, b)).collect())
        .collect()
}

/// Histogramme à intervalles égaux sur les valeurs finies.
pub fn histogram(values: &[f64], n_bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || n_bins == 0 {
        return Vec::new();
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = if max > min {
        (max - min) / n_bins as f64
    } else {
        1.0
    };

    let mut counts = vec![0usize; n_bins];
    for v in &finite {
        let idx = (((v - min) / width) as usize).min(n_bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + i as f64 * width,
            upper: min + (i + 1) as f64 * width,
            count,
        })
        .collect()
}
