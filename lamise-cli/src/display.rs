use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use textplots::{Chart, Plot, Shape};

use crate::import::ImportReport;
use lamise_core::config::FilterConfig;
use lamise_core::models::{BucketGrid, HistogramBin, Ticket, TicketStats};

pub fn display_import_summary(report: &ImportReport) {
    println!("Chargement terminé :");
    println!("  Total lignes lues : {}", report.total_rows);
    println!("  Chargées          : {}", report.loaded);
    if report.skipped > 0 {
        println!("  Ignorées          : {}", report.skipped);
    }
    if !report.has_rewards {
        println!("  Colonne 'rewards' absente : vues de taux de profit désactivées.");
    }
}

fn format_bets(ticket: &Ticket) -> String {
    ticket
        .bets
        .iter()
        .map(|(n, c)| format!("{}:{}", n, c))
        .collect::<Vec<_>>()
        .join("  ")
}

fn format_avg(avg: Option<f64>) -> String {
    match avg {
        Some(v) => format!("{:.2} €", v),
        None => "—".to_string(),
    }
}

pub fn display_tickets(tickets: &[Ticket], stats: &[TicketStats]) {
    if tickets.is_empty() {
        println!("Aucune mise à afficher.");
        return;
    }

    println!("Données brutes (total : {} lignes) :", tickets.len());

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "#",
            "Utilisateur",
            "Mises (numéro:coût)",
            "Coût total",
            "Coût moyen",
            "Numéros",
            "Récompense",
        ]);

    for (i, (ticket, stat)) in tickets.iter().zip(stats).enumerate() {
        let reward = match ticket.reward {
            Some(r) => format!("{:.2} €", r),
            None => "—".to_string(),
        };
        table.add_row(vec![
            i.to_string(),
            ticket.username.clone().unwrap_or_else(|| "—".to_string()),
            format_bets(ticket),
            format!("{:.2} €", stat.total_cost),
            format_avg(stat.avg_cost),
            stat.unique_count.to_string(),
            reward,
        ]);
    }
    println!("{table}");
}

pub fn display_filtered(
    tickets: &[Ticket],
    stats: &[TicketStats],
    indices: &[usize],
    rates: &[Option<f64>],
    config: &FilterConfig,
) {
    println!(
        "Mises avec coût moyen > {} et numéros uniques > {} (total : {} lignes) :",
        config.min_avg_cost,
        config.min_unique_count,
        indices.len()
    );

    if indices.is_empty() {
        println!("Aucune mise ne passe les seuils.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "#",
            "Utilisateur",
            "Coût total",
            "Coût moyen",
            "Numéros",
            "Taux de profit",
        ]);

    for (&i, rate) in indices.iter().zip(rates) {
        let rate_cell = match rate {
            Some(r) if *r >= 0.0 => Cell::new(format!("{:+.1} %", r)).fg(Color::Green),
            Some(r) => Cell::new(format!("{:+.1} %", r)).fg(Color::Red),
            None => Cell::new("—"),
        };
        table.add_row(vec![
            Cell::new(i.to_string()),
            Cell::new(tickets[i].username.clone().unwrap_or_else(|| "—".to_string())),
            Cell::new(format!("{:.2} €", stats[i].total_cost)),
            Cell::new(format_avg(stats[i].avg_cost)),
            Cell::new(stats[i].unique_count.to_string()),
            rate_cell,
        ]);
    }
    println!("{table}");
}

pub fn display_total_cost_chart(stats: &[TicketStats], indices: &[usize]) {
    println!("\n== Coût total par mise ==\n");

    let points: Vec<(f32, f32)> = indices
        .iter()
        .map(|&i| (i as f32, stats[i].total_cost as f32))
        .collect();

    if points.is_empty() {
        println!("  (Pas de données à afficher)");
        return;
    }

    let x_max = points.last().map(|p| p.0).unwrap_or(0.0);
    // borne haute jamais nulle, même si tous les coûts valent 0
    let y_max = (points.iter().map(|p| p.1).fold(0.0f32, f32::max) * 1.05).max(1.0);

    let shape = Shape::Bars(&points);
    let mut chart = Chart::new_with_y_range(120, 40, -0.5, x_max + 0.5, 0.0, y_max);
    println!("{}", chart.lineplot(&shape));
    println!("  (abscisse : index de la ligne, ordonnée : coût total en €)");
}

pub fn display_profit_histogram(bins: &[HistogramBin]) {
    println!("\n== Distribution du taux de profit (%) ==\n");

    if bins.is_empty() {
        println!("  (Pas de taux de profit défini à afficher)");
        return;
    }

    let points: Vec<(f32, f32)> = bins
        .iter()
        .map(|b| (((b.lower + b.upper) / 2.0) as f32, b.count as f32))
        .collect();

    let x_min = bins[0].lower as f32;
    let x_max = bins[bins.len() - 1].upper as f32;
    let y_max = points.iter().map(|p| p.1).fold(f32::MIN, f32::max);

    let shape = Shape::Bars(&points);
    let mut chart = Chart::new_with_y_range(120, 40, x_min, x_max, 0.0, y_max + 1.0);
    println!("{}", chart.lineplot(&shape));
    println!("  (abscisse : taux de profit en %, ordonnée : nombre de mises)");
}

pub fn display_avg_vs_unique_scatter(stats: &[TicketStats], indices: &[usize]) {
    println!("\n== Coût moyen vs numéros uniques ==\n");

    let points: Vec<(f32, f32)> = indices
        .iter()
        .filter_map(|&i| {
            stats[i]
                .avg_cost
                .map(|avg| (avg as f32, stats[i].unique_count as f32))
        })
        .collect();

    if points.is_empty() {
        println!("  (Pas de données à afficher)");
        return;
    }

    let x_min = points.iter().map(|p| p.0).fold(f32::MAX, f32::min);
    let x_max = points.iter().map(|p| p.0).fold(f32::MIN, f32::max);
    let y_max = points.iter().map(|p| p.1).fold(f32::MIN, f32::max);

    let shape = Shape::Points(&points);
    let mut chart =
        Chart::new_with_y_range(120, 40, x_min - 1.0, x_max + 1.0, 0.0, y_max + 1.0);
    println!("{}", chart.lineplot(&shape));
    println!("  (abscisse : coût moyen en €, ordonnée : numéros uniques)");
}

fn heat_color(value: f64, max: f64) -> Color {
    if value <= 0.0 || max <= 0.0 {
        return Color::White;
    }
    let ratio = value / max;
    if ratio >= 0.75 {
        Color::Red
    } else if ratio >= 0.4 {
        Color::Yellow
    } else {
        Color::Green
    }
}

pub fn display_overlap_heatmap(matrix: &[Vec<usize>], indices: &[usize]) {
    println!("\n== Carte de chevauchement des numéros ==\n");

    if matrix.is_empty() {
        println!("  (Pas de données à afficher)");
        return;
    }

    // échelle sur les paires distinctes, la diagonale écraserait tout
    let max_off_diag = matrix
        .iter()
        .enumerate()
        .flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .filter(move |(j, _)| i != *j)
                .map(|(_, &v)| v)
        })
        .max()
        .unwrap_or(0) as f64;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![Cell::new("#")];
    header.extend(indices.iter().map(|i| Cell::new(i.to_string())));
    table.set_header(header);

    for (r, row) in matrix.iter().enumerate() {
        let mut cells = vec![Cell::new(indices[r].to_string())];
        for (c, &v) in row.iter().enumerate() {
            let cell = if r == c {
                Cell::new(v.to_string()).fg(Color::DarkGrey)
            } else {
                Cell::new(v.to_string()).fg(heat_color(v as f64, max_off_diag))
            };
            cells.push(cell);
        }
        table.add_row(cells);
    }
    println!("{table}");
    println!("  (diagonale : numéros uniques de la mise ; couleur : intensité du chevauchement)");
}

pub fn display_bucket_grid(grid: &BucketGrid) {
    println!("\n== Coûts agrégés par plage de numéros ==\n");

    let max = grid
        .cells
        .iter()
        .flatten()
        .copied()
        .fold(f64::MIN, f64::max);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![Cell::new("Plage")];
    header.extend((1..=10).map(|j| Cell::new(format!("+{}", j))));
    table.set_header(header);

    for (i, row) in grid.cells.iter().enumerate() {
        let (lo, hi) = BucketGrid::row_range(i);
        let mut cells = vec![Cell::new(format!("{}-{}", lo, hi))];
        for &v in row {
            cells.push(Cell::new(format!("{:.1}", v)).fg(heat_color(v, max)));
        }
        table.add_row(cells);
    }
    println!("{table}");
    println!("  Total agrégé : {:.2} €", grid.grand_total());

    if !grid.out_of_domain.is_empty() {
        println!("\n  ⚠ Numéros hors domaine (1-100) exclus de la grille :");
        for (n, cost) in &grid.out_of_domain {
            println!("    numéro {} ({:.2} €)", n, cost);
        }
    }
}

pub fn display_config(config: &FilterConfig) {
    println!("\n== Seuils courants ==\n");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Seuil", "Valeur", ""]);

    table.add_row(vec![
        "Coût moyen minimal".to_string(),
        format!("{}", config.min_avg_cost),
        String::new(),
    ]);
    table.add_row(vec![
        "Numéros uniques minimaux".to_string(),
        config.min_unique_count.to_string(),
        String::new(),
    ]);
    table.add_row(vec![
        "Numéros uniques (groupes)".to_string(),
        config.group_unique_number_threshold.to_string(),
        "réservé".to_string(),
    ]);
    table.add_row(vec![
        "Intervalle taux de profit".to_string(),
        format!("{} à {}", config.profit_rate_range.0, config.profit_rate_range.1),
        "réservé".to_string(),
    ]);
    table.add_row(vec![
        "Chevauchement maximal".to_string(),
        config.group_max_overlap_threshold.to_string(),
        "réservé".to_string(),
    ]);
    table.add_row(vec![
        "Écart de coût moyen maximal".to_string(),
        format!("{}", config.avg_cost_diff_threshold),
        "réservé".to_string(),
    ]);
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_format_bets_sorted_by_number() {
        let mut bets = BTreeMap::new();
        bets.insert(23, 2.5);
        bets.insert(5, 10.0);
        let t = Ticket {
            username: None,
            bets,
            reward: None,
        };
        assert_eq!(format_bets(&t), "5:10  23:2.5");
    }

    #[test]
    fn test_format_avg_undefined() {
        assert_eq!(format_avg(None), "—");
        assert_eq!(format_avg(Some(12.5)), "12.50 €");
    }

    #[test]
    fn test_total_cost_chart_all_zero_costs() {
        // Filtre à seuil négatif : des coûts totaux tous nuls restent affichables
        let stats = vec![
            TicketStats {
                total_cost: 0.0,
                avg_cost: Some(0.0),
                unique_count: 1,
            },
            TicketStats {
                total_cost: 0.0,
                avg_cost: Some(0.0),
                unique_count: 2,
            },
        ];
        display_total_cost_chart(&stats, &[0, 1]);
    }

    #[test]
    fn test_heat_color_bands() {
        assert_eq!(heat_color(0.0, 10.0), Color::White);
        assert_eq!(heat_color(1.0, 10.0), Color::Green);
        assert_eq!(heat_color(5.0, 10.0), Color::Yellow);
        assert_eq!(heat_color(9.0, 10.0), Color::Red);
        assert_eq!(heat_color(3.0, 0.0), Color::White);
    }
}
