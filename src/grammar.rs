//! Deterministic context-free L-system grammar
//!
//! Rules map a single character symbol to its replacement. Expansion rewrites
//! every symbol of the current string simultaneously, symbols without a rule are
//! copied unchanged.
use crate::Error;
use std::{collections::BTreeMap, fmt};

/// Immutable L-system grammar: axiom and per-symbol replacement rules
#[derive(Clone, PartialEq, Eq)]
pub struct Grammar {
    axiom: String,
    rules: BTreeMap<char, String>,
}

impl Grammar {
    /// Create grammar from `axiom` and `(symbol, replacement)` pairs
    ///
    /// Fails if a symbol is not exactly one character or is defined twice.
    pub fn new<K, V>(
        axiom: impl Into<String>,
        rules: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self, Error>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let rules = rules
            .into_iter()
            .map(|(key, value)| -> Result<(char, String), Error> {
                Ok((single_char(key.as_ref())?, value.into()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_symbols(axiom, rules)
    }

    /// Create grammar from rules in the `symbol=replacement` form
    pub fn parse<S: AsRef<str>>(
        axiom: impl Into<String>,
        rules: impl IntoIterator<Item = S>,
    ) -> Result<Self, Error> {
        let rules = rules
            .into_iter()
            .map(|rule| parse_rule(rule.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_symbols(axiom, rules)
    }

    fn from_symbols(
        axiom: impl Into<String>,
        rules: impl IntoIterator<Item = (char, String)>,
    ) -> Result<Self, Error> {
        let mut table = BTreeMap::new();
        for (symbol, value) in rules {
            if table.insert(symbol, value).is_some() {
                return Err(Error::DuplicateRule(symbol));
            }
        }
        Ok(Self {
            axiom: axiom.into(),
            rules: table,
        })
    }

    /// Starting string
    pub fn axiom(&self) -> &str {
        &self.axiom
    }

    /// Replacement for the `symbol` if there is a rule for it
    pub fn rule(&self, symbol: char) -> Option<&str> {
        self.rules.get(&symbol).map(String::as_str)
    }

    /// All rules ordered by symbol
    pub fn rules(&self) -> impl Iterator<Item = (char, &str)> + '_ {
        self.rules
            .iter()
            .map(|(symbol, value)| (*symbol, value.as_str()))
    }

    /// Length of the string after single rewrite pass over `input`
    fn pass_len(&self, input: &str) -> usize {
        input.chars().fold(0usize, |acc, symbol| {
            let len = self.rule(symbol).map_or(symbol.len_utf8(), str::len);
            acc.saturating_add(len)
        })
    }

    fn pass(&self, input: &str) -> String {
        let mut output = String::with_capacity(self.pass_len(input));
        for symbol in input.chars() {
            match self.rules.get(&symbol) {
                Some(value) => output.push_str(value),
                None => output.push(symbol),
            }
        }
        output
    }

    /// Exact length in bytes of the string produced by [`Grammar::expand`]
    ///
    /// Computed without materializing the string, saturates at `usize::MAX`.
    pub fn expanded_len(&self, iterations: usize) -> usize {
        // lengths[symbol] is the expansion length of a symbol after `n` passes
        let mut lengths: BTreeMap<char, usize> = BTreeMap::new();
        for _ in 0..iterations {
            let next = self
                .rules
                .iter()
                .map(|(symbol, value)| {
                    let len = value.chars().fold(0usize, |acc, c| {
                        let len = lengths.get(&c).copied().unwrap_or(c.len_utf8());
                        acc.saturating_add(len)
                    });
                    (*symbol, len)
                })
                .collect();
            if next == lengths {
                // fixed point reached, more passes do not change lengths
                break;
            }
            lengths = next;
        }
        self.axiom.chars().fold(0usize, |acc, c| {
            acc.saturating_add(lengths.get(&c).copied().unwrap_or(c.len_utf8()))
        })
    }

    /// Apply `iterations` simultaneous rewrite passes to the axiom
    pub fn expand(&self, iterations: usize) -> String {
        let mut current = self.axiom.clone();
        for _ in 0..iterations {
            current = self.pass(&current);
        }
        current
    }

    /// Same as [`Grammar::expand`] but fails before producing string longer than `limit` bytes
    pub fn expand_limited(&self, iterations: usize, limit: usize) -> Result<String, Error> {
        let length = self.expanded_len(iterations);
        if length > limit {
            return Err(Error::ExpansionLimit { limit, length });
        }
        Ok(self.expand(iterations))
    }
}

impl fmt::Debug for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grammar axiom={:?}", self.axiom)?;
        for (symbol, value) in self.rules() {
            write!(f, " {}={}", symbol, value)?;
        }
        Ok(())
    }
}

/// Expand `grammar` for `iterations` passes, see [`Grammar::expand`]
pub fn expand(grammar: &Grammar, iterations: usize) -> String {
    grammar.expand(iterations)
}

/// Parse rule in the `symbol=replacement` form, replacement might be empty
pub fn parse_rule(rule: &str) -> Result<(char, String), Error> {
    let mut chars = rule.chars();
    if let (Some(symbol), Some('=')) = (chars.next(), chars.next()) {
        return Ok((symbol, chars.as_str().to_owned()));
    }
    match rule.split_once('=') {
        Some((key, _)) => Err(Error::InvalidRuleKey(key.to_owned())),
        None => Err(Error::InvalidRule(rule.to_owned())),
    }
}

fn single_char(key: &str) -> Result<char, Error> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        _ => Err(Error::InvalidRuleKey(key.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_doubling() -> Result<(), Error> {
        let grammar = Grammar::new("F", [("F", "FF")])?;
        let result = expand(&grammar, 3);
        assert_eq!(result.len(), 8);
        assert!(result.chars().all(|c| c == 'F'));
        assert_eq!(grammar.expanded_len(3), 8);
        Ok(())
    }

    #[test]
    fn test_expand_zero_iterations() -> Result<(), Error> {
        let grammar = Grammar::new("X+F", [("X", "F[+X]F[-X]+X"), ("F", "FF")])?;
        assert_eq!(grammar.expand(0), "X+F");
        assert_eq!(grammar.expanded_len(0), 3);
        let empty = Grammar::new("", Vec::<(String, String)>::new())?;
        assert_eq!(empty.expand(5), "");
        Ok(())
    }

    #[test]
    fn test_expand_simultaneous() -> Result<(), Error> {
        // sequential rewriting would turn "A" into "C", simultaneous into "B"
        let grammar = Grammar::new("A", [("A", "B"), ("B", "C")])?;
        assert_eq!(grammar.expand(1), "B");
        assert_eq!(grammar.expand(2), "C");
        assert_eq!(grammar.expand(3), "C");

        // algae
        let algae = Grammar::new("A", [("A", "AB"), ("B", "A")])?;
        assert_eq!(algae.expand(1), "AB");
        assert_eq!(algae.expand(2), "ABA");
        assert_eq!(algae.expand(3), "ABAAB");
        assert_eq!(algae.expand(4), "ABAABABA");
        assert_eq!(algae.expanded_len(10), algae.expand(10).len());
        Ok(())
    }

    #[test]
    fn test_expand_passthrough() -> Result<(), Error> {
        let grammar = Grammar::new("XAX", [("A", "AB")])?;
        assert_eq!(grammar.expand(1), "XABX");
        assert_eq!(grammar.expand(2), "XABBX");

        let erase = Grammar::new("F+F", [("F", "")])?;
        assert_eq!(erase.expand(1), "+");
        assert_eq!(erase.expanded_len(1), 1);
        Ok(())
    }

    #[test]
    fn test_expanded_len_matches() -> Result<(), Error> {
        let grammar = Grammar::new("F", [("F", "FF+[+F-F-F]-[-F+F+F]")])?;
        for iterations in 0..4 {
            assert_eq!(
                grammar.expanded_len(iterations),
                grammar.expand(iterations).len()
            );
        }
        let unicode = Grammar::new("λ", [("λ", "λμ")])?;
        assert_eq!(unicode.expanded_len(2), unicode.expand(2).len());
        Ok(())
    }

    #[test]
    fn test_expand_limited() -> Result<(), Error> {
        let grammar = Grammar::new("F", [("F", "FF")])?;
        assert_eq!(grammar.expand_limited(4, 16)?.len(), 16);
        assert!(matches!(
            grammar.expand_limited(5, 16),
            Err(Error::ExpansionLimit {
                limit: 16,
                length: 32
            })
        ));
        // saturates instead of overflowing
        assert_eq!(grammar.expanded_len(1000), usize::MAX);
        assert!(grammar.expand_limited(1000, 1 << 20).is_err());
        Ok(())
    }

    #[test]
    fn test_invalid_rules() {
        assert!(matches!(
            Grammar::new("F", [("FF", "F")]),
            Err(Error::InvalidRuleKey(key)) if key == "FF"
        ));
        assert!(matches!(
            Grammar::new("F", [("", "F")]),
            Err(Error::InvalidRuleKey(_))
        ));
        assert!(matches!(
            Grammar::new("F", [("F", "FF"), ("F", "F")]),
            Err(Error::DuplicateRule('F'))
        ));
    }

    #[test]
    fn test_parse_rule() -> Result<(), Error> {
        assert_eq!(parse_rule("F=FF")?, ('F', "FF".to_owned()));
        assert_eq!(parse_rule("X=")?, ('X', String::new()));
        assert_eq!(parse_rule("==F")?, ('=', "F".to_owned()));
        assert!(matches!(parse_rule("FF"), Err(Error::InvalidRule(_))));
        assert!(matches!(parse_rule("FX=F"), Err(Error::InvalidRuleKey(_))));

        let grammar = Grammar::parse("X", ["X=F[+X]F[-X]+X", "F=FF"])?;
        assert_eq!(grammar.rule('X'), Some("F[+X]F[-X]+X"));
        assert_eq!(grammar.rule('F'), Some("FF"));
        assert_eq!(grammar.rule('Y'), None);
        assert_eq!(grammar.rules().count(), 2);
        assert_eq!(format!("{:?}", grammar), "Grammar axiom=\"X\" F=FF X=F[+X]F[-X]+X");
        Ok(())
    }
}
