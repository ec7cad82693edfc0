//! Cash desk rules
//!
//! Opening amounts are whole pesos typed as digits; closing amounts may carry
//! decimals. Plain sellers confirm both operations with the supervisor PIN.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::CashSession;
use crate::money::parse_amount;

/// PIN used when the configuration does not set one
pub const DEFAULT_SELLER_PIN: &str = "1234";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CashError {
    #[error("Debes ingresar el monto de apertura.")]
    MissingOpening,
    #[error("El monto de apertura debe ser un entero ≥ 0.")]
    InvalidOpening,
    #[error("Debes ingresar el monto de cierre.")]
    MissingClosing,
    #[error("El monto de cierre debe ser un número ≥ 0.")]
    InvalidClosing,
    #[error("No hay caja abierta.")]
    NoOpenSession,
    #[error("Contraseña incorrecta.")]
    WrongPin,
}

/// The session currently open, if any
pub fn open_session(sessions: &[CashSession]) -> Option<&CashSession> {
    sessions.iter().find(|s| s.is_open())
}

pub fn require_open(sessions: &[CashSession]) -> Result<&CashSession, CashError> {
    open_session(sessions).ok_or(CashError::NoOpenSession)
}

pub fn parse_opening(input: &str) -> Result<Decimal, CashError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CashError::MissingOpening);
    }
    if !input.chars().all(|c| c.is_ascii_digit()) {
        return Err(CashError::InvalidOpening);
    }
    input.parse::<Decimal>().map_err(|_| CashError::InvalidOpening)
}

pub fn parse_closing(input: &str) -> Result<Decimal, CashError> {
    if input.trim().is_empty() {
        return Err(CashError::MissingClosing);
    }
    parse_amount(input)
        .filter(|amount| *amount >= Decimal::ZERO)
        .ok_or(CashError::InvalidClosing)
}

/// Supervisor PIN check required from sellers
pub fn check_pin(entered: &str, expected: &str) -> Result<(), CashError> {
    if entered.trim() == expected {
        Ok(())
    } else {
        Err(CashError::WrongPin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CashStatus;
    use chrono::Utc;

    fn session(id: i64, status: CashStatus) -> CashSession {
        CashSession {
            id,
            status,
            opened_by: Some(1),
            closed_by: None,
            opened_by_name: Some("caja1".into()),
            closed_by_name: None,
            opening_amount: Decimal::from(20000),
            closing_amount: None,
            diff: None,
            opened_at: Utc::now(),
            closed_at: None,
        }
    }

    #[test]
    fn test_open_session_lookup() {
        let sessions = vec![session(3, CashStatus::Closed), session(4, CashStatus::Open)];
        assert_eq!(open_session(&sessions).map(|s| s.id), Some(4));
        assert_eq!(
            require_open(&sessions[..1]).unwrap_err(),
            CashError::NoOpenSession
        );
    }

    #[test]
    fn test_opening_must_be_whole_digits() {
        assert_eq!(parse_opening(" 20000 "), Ok(Decimal::from(20000)));
        assert_eq!(parse_opening(""), Err(CashError::MissingOpening));
        assert_eq!(parse_opening("-5"), Err(CashError::InvalidOpening));
        assert_eq!(parse_opening("100.5"), Err(CashError::InvalidOpening));
        assert_eq!(
            CashError::InvalidOpening.to_string(),
            "El monto de apertura debe ser un entero ≥ 0."
        );
    }

    #[test]
    fn test_closing_accepts_decimals() {
        assert_eq!(parse_closing("25000,5").unwrap().to_string(), "25000.5");
        assert_eq!(parse_closing("  "), Err(CashError::MissingClosing));
        assert_eq!(parse_closing("-1"), Err(CashError::InvalidClosing));
    }

    #[test]
    fn test_pin() {
        assert!(check_pin("1234", DEFAULT_SELLER_PIN).is_ok());
        assert_eq!(check_pin("0000", DEFAULT_SELLER_PIN), Err(CashError::WrongPin));
    }
}
