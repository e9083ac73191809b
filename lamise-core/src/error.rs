use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("colonne requise absente : '{name}'")]
    MissingColumn { name: String },

    #[error("dictionnaire de mises invalide : {reason}")]
    Parse { reason: String },

    #[error("numéro {number} hors domaine (1-100)")]
    Domain { number: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let e = CoreError::MissingColumn {
            name: "rewards".to_string(),
        };
        assert_eq!(e.to_string(), "colonne requise absente : 'rewards'");

        let e = CoreError::Domain { number: 105 };
        assert_eq!(e.to_string(), "numéro 105 hors domaine (1-100)");
    }
}
