mod display;
mod import;
mod interactive;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use lamise_core::aggregate::{
    bucket_totals, filter_indices, histogram, overlap_matrix, profit_rates, summarize,
};
use lamise_core::config::{load_config, save_config, FilterConfig};
use lamise_core::models::Ticket;

use crate::display::{
    display_avg_vs_unique_scatter, display_bucket_grid, display_config, display_filtered,
    display_import_summary, display_overlap_heatmap, display_profit_histogram, display_tickets,
    display_total_cost_chart,
};
use crate::import::{import_csv, ImportReport};

const PROFIT_RATE_BINS: usize = 20;

#[derive(Parser)]
#[command(name = "lamise", about = "Analyseur de mises de loterie (CSV)")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone)]
struct ThresholdArgs {
    /// Coût moyen minimal (0-200)
    #[arg(long, default_value = "50")]
    min_avg_cost: f64,

    /// Nombre minimal de numéros uniques (0-100)
    #[arg(long, default_value = "10")]
    min_unique_count: usize,

    /// Fichier de seuils JSON (prioritaire sur les options ci-dessus)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl ThresholdArgs {
    fn resolve(&self) -> Result<FilterConfig> {
        if let Some(path) = &self.config {
            return load_config(path);
        }
        Ok(FilterConfig {
            min_avg_cost: self.min_avg_cost,
            min_unique_count: self.min_unique_count,
            ..FilterConfig::default()
        })
    }
}

#[derive(Subcommand)]
enum Command {
    /// Afficher les données brutes avec leurs statistiques
    Show {
        /// Chemin vers le fichier CSV
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Filtrer les mises selon les seuils et afficher les taux de profit
    Filter {
        /// Chemin vers le fichier CSV
        #[arg(short, long)]
        file: PathBuf,

        #[command(flatten)]
        thresholds: ThresholdArgs,
    },

    /// Graphiques : coût total, distribution du taux de profit, nuage de points
    Charts {
        /// Chemin vers le fichier CSV
        #[arg(short, long)]
        file: PathBuf,

        #[command(flatten)]
        thresholds: ThresholdArgs,
    },

    /// Carte de chevauchement des numéros entre mises filtrées
    Overlap {
        /// Chemin vers le fichier CSV
        #[arg(short, long)]
        file: PathBuf,

        #[command(flatten)]
        thresholds: ThresholdArgs,
    },

    /// Grille 10×10 des coûts agrégés par plage de numéros
    Buckets {
        /// Chemin vers le fichier CSV
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Écrire un fichier de seuils par défaut
    InitConfig {
        /// Fichier de sortie
        #[arg(short, long, default_value = "seuils.json")]
        output: PathBuf,
    },

    /// Mode interactif (REPL)
    Interactive {
        /// Chemin vers le fichier CSV
        #[arg(short, long)]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Show { file } => cmd_show(&file),
        Command::Filter { file, thresholds } => cmd_filter(&file, &thresholds.resolve()?),
        Command::Charts { file, thresholds } => cmd_charts(&file, &thresholds.resolve()?),
        Command::Overlap { file, thresholds } => cmd_overlap(&file, &thresholds.resolve()?),
        Command::Buckets { file } => cmd_buckets(&file),
        Command::InitConfig { output } => cmd_init_config(&output),
        Command::Interactive { file } => interactive::run_interactive(&file),
    }
}

fn load(file: &PathBuf) -> Result<(Vec<Ticket>, ImportReport)> {
    let (tickets, report) = import_csv(file)?;
    display_import_summary(&report);
    println!();
    Ok((tickets, report))
}

fn cmd_show(file: &PathBuf) -> Result<()> {
    let (tickets, _) = load(file)?;
    let stats = summarize(&tickets);
    display_tickets(&tickets, &stats);
    Ok(())
}

pub(crate) fn render_filtered(tickets: &[Ticket], has_rewards: bool, config: &FilterConfig) {
    let stats = summarize(tickets);
    let indices = filter_indices(&stats, config);

    let rates: Vec<Option<f64>> = if has_rewards {
        let subset: Vec<Ticket> = indices.iter().map(|&i| tickets[i].clone()).collect();
        profit_rates(&subset)
    } else {
        vec![None; indices.len()]
    };

    display_filtered(tickets, &stats, &indices, &rates, config);
}

fn cmd_filter(file: &PathBuf, config: &FilterConfig) -> Result<()> {
    let (tickets, report) = load(file)?;
    render_filtered(&tickets, report.has_rewards, config);
    Ok(())
}

pub(crate) fn render_charts(tickets: &[Ticket], has_rewards: bool, config: &FilterConfig) {
    let stats = summarize(tickets);
    let indices = filter_indices(&stats, config);

    display_total_cost_chart(&stats, &indices);

    if has_rewards {
        let subset: Vec<Ticket> = indices.iter().map(|&i| tickets[i].clone()).collect();
        let rates: Vec<f64> = profit_rates(&subset).into_iter().flatten().collect();
        display_profit_histogram(&histogram(&rates, PROFIT_RATE_BINS));
    } else {
        println!("\nColonne 'rewards' absente : distribution du taux de profit ignorée.");
    }

    display_avg_vs_unique_scatter(&stats, &indices);
}

fn cmd_charts(file: &PathBuf, config: &FilterConfig) -> Result<()> {
    let (tickets, report) = load(file)?;
    render_charts(&tickets, report.has_rewards, config);
    Ok(())
}

pub(crate) fn render_overlap(tickets: &[Ticket], config: &FilterConfig) {
    let stats = summarize(tickets);
    let indices = filter_indices(&stats, config);
    let subset: Vec<Ticket> = indices.iter().map(|&i| tickets[i].clone()).collect();
    let matrix = overlap_matrix(&subset);
    display_overlap_heatmap(&matrix, &indices);
}

fn cmd_overlap(file: &PathBuf, config: &FilterConfig) -> Result<()> {
    let (tickets, _) = load(file)?;
    render_overlap(&tickets, config);
    Ok(())
}

pub(crate) fn render_buckets(tickets: &[Ticket]) {
    let grid = bucket_totals(tickets);
    display_bucket_grid(&grid);
}

fn cmd_buckets(file: &PathBuf) -> Result<()> {
    let (tickets, _) = load(file)?;
    render_buckets(&tickets);
    Ok(())
}

fn cmd_init_config(output: &PathBuf) -> Result<()> {
    let config = FilterConfig::default();
    save_config(&config, output)?;
    println!("Seuils par défaut écrits dans {:?}", output);
    display_config(&config);
    Ok(())
}
