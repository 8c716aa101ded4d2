//! Parses a chat line such as `V=10 I=? R=4.7k` into a [`CalculationRequest`].

use super::{CalculationKind, CalculationRequest, CalculationResult, Parameter, SolverError, Unit};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("Please enter the values, for example: {0}")]
    Empty(&'static str),
    #[error("Expected SYMBOL=VALUE, got \"{0}\".")]
    Malformed(String),
    #[error("\"{symbol}\" is not an input of the {kind} calculator. Use: {expected}.")]
    UnknownSymbol {
        symbol: String,
        kind: CalculationKind,
        expected: String,
    },
    #[error("\"{0}\" is not a number.")]
    BadNumber(String),
    #[error("{0} was given more than once.")]
    Duplicate(Parameter),
}

/// Either half of turning a chat line into a result can fail.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LineError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Solver(#[from] SolverError),
}

const UNKNOWN_MARKER: &str = "?";

fn si_prefix(c: char) -> Option<f64> {
    Some(match c {
        'p' => 1e-12,
        'n' => 1e-9,
        'u' | 'µ' | 'μ' => 1e-6,
        'm' => 1e-3,
        'k' | 'K' => 1e3,
        'M' => 1e6,
        'G' => 1e9,
        _ => return None,
    })
}

/// Parses a number with an optional SI prefix and unit suffix (`4.7k`, `1uF`, `10 V`).
pub fn parse_value(text: &str, unit: Unit) -> Option<f64> {
    let text = text.trim();
    let text = text.strip_suffix(unit.symbol()).unwrap_or(text).trim_end();
    if let Ok(value) = text.parse::<f64>() {
        return Some(value);
    }

    let mut chars = text.chars();
    let scale = si_prefix(chars.next_back()?)?;
    chars.as_str().trim_end().parse::<f64>().ok().map(|value| value * scale)
}

/// Builds the request for `kind` from one line of `SYMBOL=VALUE` pairs.
///
/// Parameters that are left out or given as `?` become unknowns. For the
/// calculators that solve for an unknown, an entered 0 also counts as
/// unspecified, so `R=0` cannot be expressed there.
pub fn parse_request(kind: CalculationKind, line: &str) -> Result<CalculationRequest, InputError> {
    // "V = 10" and "V=10" read the same
    let normalized = line.split('=').map(str::trim).collect::<Vec<_>>().join("=");
    let assignments = normalized
        .split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>();

    if assignments.is_empty() {
        return Err(InputError::Empty(kind.example()));
    }

    let mut request = CalculationRequest::new(kind);
    for assignment in assignments {
        let (symbol, value) = assignment
            .split_once('=')
            .ok_or_else(|| InputError::Malformed(assignment.to_string()))?;
        if symbol.is_empty() || value.is_empty() {
            return Err(InputError::Malformed(assignment.to_string()));
        }

        let parameter = kind
            .parameters()
            .iter()
            .copied()
            .find(|p| p.symbol().eq_ignore_ascii_case(symbol))
            .ok_or_else(|| InputError::UnknownSymbol {
                symbol: symbol.to_string(),
                kind,
                expected: expected_symbols(kind),
            })?;
        if request.values.contains_key(&parameter) {
            return Err(InputError::Duplicate(parameter));
        }

        if value == UNKNOWN_MARKER {
            request = request.with_unknown(parameter);
            continue;
        }
        let number =
            parse_value(value, parameter.unit()).ok_or_else(|| InputError::BadNumber(value.to_string()))?;
        request = if number == 0.0 && kind.solves_for_unknown() {
            request.with_unknown(parameter)
        } else {
            request.with(parameter, number)
        };
    }

    for parameter in kind.parameters() {
        if !request.values.contains_key(parameter) {
            request = request.with_unknown(*parameter);
        }
    }
    Ok(request)
}

/// Parses `line` for `kind` and evaluates it.
pub fn evaluate_line(kind: CalculationKind, line: &str) -> Result<CalculationResult, LineError> {
    Ok(parse_request(kind, line)?.evaluate()?)
}

fn expected_symbols(kind: CalculationKind) -> String {
    kind.parameters()
        .iter()
        .map(|p| p.symbol())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Instructions shown after a calculator is picked.
pub fn usage(kind: CalculationKind) -> String {
    let inputs = kind
        .parameters()
        .iter()
        .map(|p| format!("{} = {} [{}]", p.symbol(), p.name(), p.unit()))
        .collect::<Vec<_>>()
        .join("\n");
    let unknown_hint = if kind.solves_for_unknown() {
        "\nLeave out the value to solve for (or write ?)."
    } else {
        ""
    };
    format!(
        "{}: {}\n\n{}\n{}\n\nExample: {}",
        kind.label(),
        kind.formula(),
        inputs,
        unknown_hint,
        kind.example()
    )
}
