use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Seuils de filtrage, équivalents des curseurs du tableau de bord d'origine.
///
/// Seuls `min_avg_cost` et `min_unique_count` pilotent le filtrage. Les autres
/// champs sont réservés : exposés et persistés pour compatibilité, jamais consommés.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Coût moyen minimal (0-200).
    pub min_avg_cost: f64,
    /// Nombre minimal de numéros uniques (0-100).
    pub min_unique_count: usize,
    /// Réservé.
    pub group_unique_number_threshold: usize,
    /// Réservé. Intervalle de taux de profit (%).
    pub profit_rate_range: (f64, f64),
    /// Réservé.
    pub group_max_overlap_threshold: usize,
    /// Réservé.
    pub avg_cost_diff_threshold: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_avg_cost: 50.0,
            min_unique_count: 10,
            group_unique_number_threshold: 70,
            profit_rate_range: (-10.0, 10.0),
            group_max_overlap_threshold: 5,
            avg_cost_diff_threshold: 50.0,
        }
    }
}

pub fn save_config(config: &FilterConfig, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)
        .with_context(|| format!("Impossible d'écrire {:?}", path))?;
    Ok(())
}

pub fn load_config(path: &Path) -> Result<FilterConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {:?}", path))?;
    let config: FilterConfig = serde_json::from_str(&json)
        .with_context(|| format!("Fichier de seuils invalide : {:?}", path))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_dashboard() {
        let c = FilterConfig::default();
        assert_eq!(c.min_avg_cost, 50.0);
        assert_eq!(c.min_unique_count, 10);
        assert_eq!(c.group_unique_number_threshold, 70);
        assert_eq!(c.profit_rate_range, (-10.0, 10.0));
        assert_eq!(c.group_max_overlap_threshold, 5);
        assert_eq!(c.avg_cost_diff_threshold, 50.0);
    }

    #[test]
    fn test_json_round_trip() {
        let c = FilterConfig {
            min_avg_cost: 75.0,
            min_unique_count: 3,
            ..FilterConfig::default()
        };
        let json = serde_json::to_string(&c).unwrap();
        let back: FilterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let back: FilterConfig = serde_json::from_str("{\"min_avg_cost\": 12.0}").unwrap();
        assert_eq!(back.min_avg_cost, 12.0);
        assert_eq!(back.min_unique_count, 10);
    }
}
