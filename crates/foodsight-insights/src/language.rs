//! Spanish/English detection for choosing a template variant.

use once_cell::sync::Lazy;
use regex::Regex;

/// Inputs shorter than this (after trimming) default to Spanish.
pub const SHORT_INPUT_CHARS: usize = 10;

/// Lowercased substrings that mark a question as Spanish. Entries avoid
/// fragments that commonly occur inside English words.
pub const SPANISH_KEYWORDS: &[&str] = &[
    "qué", "cómo", "como ", "cuál", "cual ", "cuánto", "cuanto", "cuántos", "dónde", "donde",
    "por qué", "quién", "quien", "ventas", "venta ", "vendimos", "clientes", "cliente",
    "productos", "producto", "inventario", "región", "regiones", "vendedor", "pedidos",
    "facturas", "mejores", "peores", "tenemos", "están", "estan", "muéstrame", "muestrame",
    "muestra", "dame ", "necesito", "quiero", "hoy", "semana", "hola", "gracias", "ganancia",
    "margen", "presupuesto", "cadena", "para el", "pedido",
];

static SPANISH_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[áéíóúüñ¿¡ÁÉÍÓÚÜÑ]").unwrap());

/// Decide whether a question should be answered in Spanish.
///
/// True when any keyword occurs in the lowercased text, when the raw text
/// contains a Spanish diacritic or inverted punctuation, or when the trimmed
/// text is shorter than [`SHORT_INPUT_CHARS`] characters (including empty).
pub fn is_spanish(question: &str) -> bool {
    let lower = question.to_lowercase();
    if SPANISH_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return true;
    }
    if SPANISH_CHARS.is_match(question) {
        return true;
    }
    question.trim().chars().count() < SHORT_INPUT_CHARS
}
