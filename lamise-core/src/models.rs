use std::collections::BTreeMap;

/// Domaine des numéros jouables.
pub const MIN_NUMBER: u32 = 1;
pub const MAX_NUMBER: u32 = 100;

/// Grille d'agrégation : 10 plages contiguës de 10 numéros.
pub const BUCKET_WIDTH: usize = 10;
pub const GRID_SIDE: usize = 10;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ticket {
    pub username: Option<String>,
    pub bets: BTreeMap<u32, f64>,
    pub reward: Option<f64>,
}

impl Ticket {
    pub fn total_cost(&self) -> f64 {
        self.bets.values().sum()
    }

    pub fn unique_count(&self) -> usize {
        self.bets.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TicketStats {
    pub total_cost: f64,
    /// None pour une mise sans aucun numéro (division par zéro).
    pub avg_cost: Option<f64>,
    pub unique_count: usize,
}

/// Coûts agrégés sur la grille 10×10 : la cellule (i, j) couvre le numéro i*10+j+1.
#[derive(Debug, Clone, Default)]
pub struct BucketGrid {
    pub cells: [[f64; GRID_SIDE]; GRID_SIDE],
    /// Numéros hors domaine rencontrés pendant l'agrégation, avec leur coût.
    pub out_of_domain: Vec<(u32, f64)>,
}

impl BucketGrid {
    pub fn grand_total(&self) -> f64 {
        self.cells.iter().flatten().sum()
    }

    /// Bornes de la plage couverte par la ligne i.
    pub fn row_range(i: usize) -> (u32, u32) {
        let lo = (i * BUCKET_WIDTH) as u32 + 1;
        (lo, lo + BUCKET_WIDTH as u32 - 1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}
