use std::collections::BTreeMap;

use crate::error::CoreError;

/// Parse le littéral de la colonne `number_cost_dict` : `{'5': 12.5, "23": 3, 7: 1}`.
///
/// Clés entières (nues ou entre guillemets simples/doubles), valeurs numériques
/// positives ou nulles.
/// Tout écart de forme échoue avec un diagnostic par ligne plutôt qu'une erreur
/// globale de chargement.
pub fn parse_bets(input: &str) -> Result<BTreeMap<u32, f64>, CoreError> {
    let mut p = Scanner::new(input);
    p.skip_ws();
    p.expect('{')?;
    let mut bets = BTreeMap::new();

    p.skip_ws();
    if p.eat('}') {
        p.finish()?;
        return Ok(bets);
    }

    loop {
        p.skip_ws();
        let key = p.parse_key()?;
        p.skip_ws();
        p.expect(':')?;
        p.skip_ws();
        let value = p.parse_number()?;

        if bets.insert(key, value).is_some() {
            return Err(fail(format!("clé dupliquée : {}", key)));
        }

        p.skip_ws();
        if p.eat(',') {
            p.skip_ws();
            // virgule terminale tolérée
            if p.eat('}') {
                break;
            }
        } else if p.eat('}') {
            break;
        } else {
            return Err(fail(format!("',' ou '}}' attendu à la position {}", p.pos)));
        }
    }

    p.finish()?;
    Ok(bets)
}

fn fail(reason: String) -> CoreError {
    CoreError::Parse { reason }
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Scanner { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), CoreError> {
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(fail(format!("'{}' attendu, trouvé '{}'", expected, c))),
            None => Err(fail(format!("'{}' attendu, fin de texte", expected))),
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn finish(&mut self) -> Result<(), CoreError> {
        self.skip_ws();
        if self.pos != self.src.len() {
            return Err(fail(format!(
                "caractères en trop après '}}' : '{}'",
                &self.src[self.pos..]
            )));
        }
        Ok(())
    }

    fn parse_key(&mut self) -> Result<u32, CoreError> {
        let quote = match self.peek() {
            Some(q @ ('\'' | '"')) => {
                self.bump();
                Some(q)
            }
            _ => None,
        };

        let digits = self.take_while(|c| c.is_ascii_digit());
        if digits.is_empty() {
            return Err(fail(format!("clé entière attendue à la position {}", self.pos)));
        }
        let key: u32 = digits
            .parse()
            .map_err(|_| fail(format!("clé illisible : '{}'", digits)))?;

        if let Some(q) = quote {
            if !self.eat(q) {
                return Err(fail(format!("guillemet fermant {} manquant", q)));
            }
        }
        Ok(key)
    }

    fn parse_number(&mut self) -> Result<f64, CoreError> {
        let start = self.pos;
        // signe consommé uniquement pour produire un diagnostic précis
        let negative = self.eat('-');
        self.take_while(|c| c.is_ascii_digit());
        if self.eat('.') {
            self.take_while(|c| c.is_ascii_digit());
        }
        let raw = &self.src[start..self.pos];
        if raw.is_empty() || raw == "-" || raw == "." || raw == "-." {
            return Err(fail(format!(
                "valeur numérique attendue à la position {}",
                start
            )));
        }
        if negative {
            return Err(fail(format!("coût négatif interdit : '{}'", raw)));
        }
        raw.parse::<f64>()
            .map_err(|_| fail(format!("valeur illisible : '{}'", raw)))
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if pred(c)) {
            self.bump();
        }
        self.src[start..self.pos].to_string()
    }
}
