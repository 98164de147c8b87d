//! # Cf — Fator de Certeza ao Estilo MYCIN
//!
//! Implementação do **fator de certeza** (certainty factor, CF) usado pelos
//! shells de sistemas especialistas da família MYCIN/EMYCIN.
//!
//! ## O que é um Fator de Certeza?
//!
//! Um CF é um número real em **[-1.0, 1.0]** que expressa o grau de crença
//! em uma proposição. Ele **não é uma probabilidade** — CFs combinam-se por
//! operadores próprios, e evidências independentes sobre a mesma proposição
//! saturam em direção a ±1 sem nunca ultrapassar o intervalo.
//!
//! | Valor | Significado |
//! |-------|-------------|
//! | `1.0` | Verdadeiro com certeza total |
//! | `> 0.1` | Considerado afirmativamente verdadeiro (acima do corte) |
//! | `0.0` | Desconhecido / sem evidência |
//! | `< -0.9` | Considerado afirmativamente falso |
//! | `-1.0` | Falso com certeza total |
//!
//! Valores estritamente entre `-0.9` e `0.1` não são nem verdadeiros nem
//! falsos — são "incertos".
//!
//! ## Operadores
//!
//! - [`Cf::or`] — combina duas evidências **independentes** sobre a *mesma*
//!   proposição. Ambas positivas: `a + b - a*b`. Ambas negativas:
//!   `a + b + a*b`. Sinais mistos: `a + b`.
//! - [`Cf::and`] — combina evidências de uma **conjunção** de proposições
//!   (as premissas de uma regra). Definido como `min(a, b)`: a conjunção é
//!   tão certa quanto sua premissa mais fraca.
//!
//! ## Validação na Entrada
//!
//! Um CF fora de [-1, 1] corromperia toda a contabilidade de confiança.
//! Por isso a construção é validada ([`Cf::new`]) e a desserialização passa
//! pela mesma validação — nunca há clamp silencioso.
//!
//! ## Exemplo
//!
//! ```rust
//! use crate::core::Cf;
//!
//! let a = Cf::new(0.6).unwrap();
//! let b = Cf::new(0.4).unwrap();
//!
//! // Duas evidências positivas reforçam-se sem passar de 1.0
//! let combinado = a.or(b);
//! assert!((combinado.value() - 0.76).abs() < 1e-9);
//!
//! // A conjunção vale o elo mais fraco
//! assert_eq!(a.and(b), b);
//! ```

use std::fmt;
use std::ops::Mul;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Erro de validação de um fator de certeza.
///
/// Emitido no ponto de entrada ([`Cf::new`] ou desserialização) quando o
/// valor bruto não é um CF válido. A rejeição imediata evita que um valor
/// malformado contamine combinações posteriores.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CertaintyError {
    /// O valor está fora do intervalo permitido [-1, 1].
    #[error("fator de certeza fora do intervalo [-1, 1]: {0}")]
    OutOfRange(f64),

    /// O valor não é um número (NaN).
    #[error("fator de certeza não é um número válido")]
    NotANumber,
}

/// Fator de certeza validado — um `f64` garantidamente em [-1.0, 1.0].
///
/// ## Invariante
///
/// Todo `Cf` em circulação está dentro do intervalo: a construção valida
/// ([`Cf::new`]), os operadores [`or`](Cf::or)/[`and`](Cf::and) preservam o
/// intervalo para entradas válidas, e a multiplicação de dois CFs (usada
/// para escalar o CF base de uma regra pelo CF conjuntivo das premissas)
/// também permanece dentro dele.
///
/// ## Serde
///
/// Serializado como `f64` cru; a desserialização passa por [`Cf::new`],
/// portanto um arquivo de conhecimento com `"cf": 1.5` é rejeitado na
/// carga, não em tempo de inferência.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Cf(f64);

impl Cf {
    /// Certeza total de que a proposição é verdadeira.
    pub const TRUE: Cf = Cf(1.0);

    /// Certeza total de que a proposição é falsa.
    pub const FALSE: Cf = Cf(-1.0);

    /// Ausência de evidência.
    pub const UNKNOWN: Cf = Cf(0.0);

    /// Corte de classificação: acima dele um CF é considerado verdadeiro;
    /// abaixo de `CUTOFF - 1.0` (ou seja, -0.9) é considerado falso.
    pub const CUTOFF: f64 = 0.1;

    /// Cria um CF validado a partir de um `f64`.
    ///
    /// # Erros
    ///
    /// - [`CertaintyError::NotANumber`] se `value` é NaN
    /// - [`CertaintyError::OutOfRange`] se `value` está fora de [-1, 1]
    pub fn new(value: f64) -> Result<Self, CertaintyError> {
        if value.is_nan() {
            return Err(CertaintyError::NotANumber);
        }
        if !(-1.0..=1.0).contains(&value) {
            return Err(CertaintyError::OutOfRange(value));
        }
        Ok(Cf(value))
    }

    /// Retorna o valor numérico bruto do CF.
    pub fn value(self) -> f64 {
        self.0
    }

    /// **OR de certeza** — combina duas evidências independentes sobre a
    /// *mesma* proposição.
    ///
    /// - Ambas positivas: `a + b - a*b` — reforço com saturação em 1.0
    /// - Ambas negativas: `a + b + a*b` — simétrico, saturando em -1.0
    /// - Sinais mistos (ou algum zero): `a + b`
    ///
    /// Comutativo, e na prática associativo — é usado para dobrar muitas
    /// observações sucessivas sobre o mesmo valor.
    pub fn or(self, other: Cf) -> Cf {
        let (a, b) = (self.0, other.0);
        let combined = if a > 0.0 && b > 0.0 {
            a + b - a * b
        } else if a < 0.0 && b < 0.0 {
            a + b + a * b
        } else {
            a + b
        };
        Cf(combined)
    }

    /// **AND de certeza** — combina as evidências de uma conjunção de
    /// proposições (premissas de uma regra).
    ///
    /// Definido como `min(a, b)`: a conjunção é tão certa quanto sua
    /// premissa mais fraca. (A convenção multiplicativa `a*b` existe em
    /// variações deste desenho; este shell usa `min`, a convenção EMYCIN
    /// padrão — ver DESIGN.md.)
    pub fn and(self, other: Cf) -> Cf {
        Cf(self.0.min(other.0))
    }

    /// O CF é considerado afirmativamente verdadeiro? (`v > 0.1`)
    pub fn is_true(self) -> bool {
        self.0 > Self::CUTOFF
    }

    /// O CF é considerado afirmativamente falso? (`v < -0.9`)
    pub fn is_false(self) -> bool {
        self.0 < Self::CUTOFF - 1.0
    }
}

/// Escala um CF por outro — usado para multiplicar o CF base de uma regra
/// pelo CF conjuntivo de suas premissas. O produto de dois valores em
/// [-1, 1] permanece em [-1, 1].
impl Mul for Cf {
    type Output = Cf;

    fn mul(self, rhs: Cf) -> Cf {
        Cf(self.0 * rhs.0)
    }
}

impl TryFrom<f64> for Cf {
    type Error = CertaintyError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Cf::new(value)
    }
}

impl From<Cf> for f64 {
    fn from(cf: Cf) -> f64 {
        cf.0
    }
}

/// Formatação legível com duas casas decimais, por exemplo `0.11`.
impl fmt::Display for Cf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ─── construção e validação ────────────────────────────────

    #[test]
    fn new_accepts_bounds() {
        assert_eq!(Cf::new(1.0).unwrap(), Cf::TRUE);
        assert_eq!(Cf::new(-1.0).unwrap(), Cf::FALSE);
        assert_eq!(Cf::new(0.0).unwrap(), Cf::UNKNOWN);
    }

    #[test]
    fn new_rejects_out_of_range() {
        assert_eq!(Cf::new(1.5), Err(CertaintyError::OutOfRange(1.5)));
        assert_eq!(Cf::new(-1.01), Err(CertaintyError::OutOfRange(-1.01)));
    }

    #[test]
    fn new_rejects_nan() {
        assert_eq!(Cf::new(f64::NAN), Err(CertaintyError::NotANumber));
    }

    /// A desserialização passa pela mesma validação de Cf::new.
    #[test]
    fn deserialization_validates() {
        assert!(serde_json::from_str::<Cf>("0.7").is_ok());
        assert!(serde_json::from_str::<Cf>("1.5").is_err());
    }

    // ─── operadores ────────────────────────────────────────────

    /// cf_or(x, 0.0) == x para todo x válido (identidade).
    #[test]
    fn or_identity() {
        for v in [-1.0, -0.5, 0.0, 0.3, 1.0] {
            let cf = Cf::new(v).unwrap();
            assert_eq!(cf.or(Cf::UNKNOWN), cf);
        }
    }

    /// Saturação nos extremos: or(1,1)=1 e or(-1,-1)=-1.
    #[test]
    fn or_saturates() {
        assert_eq!(Cf::TRUE.or(Cf::TRUE), Cf::TRUE);
        assert_eq!(Cf::FALSE.or(Cf::FALSE), Cf::FALSE);
    }

    #[test]
    fn or_positive_pair() {
        let combined = Cf::new(0.6).unwrap().or(Cf::new(0.4).unwrap());
        assert!((combined.value() - 0.76).abs() < 1e-9);
    }

    #[test]
    fn or_negative_pair() {
        let combined = Cf::new(-0.6).unwrap().or(Cf::new(-0.4).unwrap());
        assert!((combined.value() + 0.76).abs() < 1e-9);
    }

    #[test]
    fn or_mixed_signs() {
        let combined = Cf::new(0.6).unwrap().or(Cf::new(-0.4).unwrap());
        assert!((combined.value() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn or_is_commutative() {
        let a = Cf::new(0.7).unwrap();
        let b = Cf::new(-0.2).unwrap();
        assert_eq!(a.or(b), b.or(a));
    }

    /// Para entradas em [-1, 1], or e and permanecem em [-1, 1].
    #[test]
    fn operators_preserve_range() {
        let samples = [-1.0, -0.9, -0.3, 0.0, 0.1, 0.5, 1.0];
        for &x in &samples {
            for &y in &samples {
                let a = Cf::new(x).unwrap();
                let b = Cf::new(y).unwrap();
                for result in [a.or(b), a.and(b), a * b] {
                    assert!((-1.0..=1.0).contains(&result.value()), "{x} {y}");
                }
            }
        }
    }

    /// A conjunção vale o elo mais fraco: min(a, b).
    #[test]
    fn and_is_min() {
        let a = Cf::new(0.5).unwrap();
        let b = Cf::new(0.3).unwrap();
        assert_eq!(a.and(b), b);
        assert_eq!(Cf::TRUE.and(Cf::UNKNOWN), Cf::UNKNOWN);
    }

    // ─── classificação pelo corte ──────────────────────────────

    #[test]
    fn cutoff_classification() {
        assert!(Cf::new(0.11).unwrap().is_true());
        assert!(!Cf::new(0.1).unwrap().is_true());
        assert!(Cf::new(-0.91).unwrap().is_false());
        assert!(!Cf::new(-0.9).unwrap().is_false());
        // Entre -0.9 e 0.1: nem verdadeiro nem falso
        let incerto = Cf::new(0.05).unwrap();
        assert!(!incerto.is_true() && !incerto.is_false());
    }

    /// Aplicar or(x, x) repetidamente aproxima |x| de 1 sem ultrapassar.
    #[test]
    fn repeated_or_converges_within_bounds() {
        let mut cf = Cf::new(0.3).unwrap();
        let mut previous = cf.value();
        for _ in 0..50 {
            cf = cf.or(Cf::new(0.3).unwrap());
            assert!(cf.value() >= previous);
            assert!(cf.value() <= 1.0);
            previous = cf.value();
        }
        assert!(cf.value() > 0.999);
    }

    #[test]
    fn scaling_rule_cf() {
        let base = Cf::new(0.11).unwrap();
        assert_eq!(base * Cf::TRUE, base);
        assert_eq!((base * Cf::UNKNOWN).value(), 0.0);
    }
}
