/// CNP (cod numeric personal) validation
///
/// The Romanian national identification number is 13 digits,
/// `S AA LL ZZ JJ NNN C`: sex/century digit, year, month, day, county
/// code, sequence number, and a control digit. The control digit is the
/// weighted sum of the first 12 digits (weights `279146358279`) modulo 11,
/// with a remainder of 10 mapping to 1.
///
/// Validation rejects, in order: wrong length or non-digit characters, a
/// `0` sex digit, an out-of-range month or day, and a wrong control digit.
/// Error messages are in Romanian since they surface directly in form
/// responses.
///
/// # Example
///
/// ```
/// use norma_shared::cnp;
///
/// assert!(cnp::is_valid("1900101221239"));
///
/// // Same CNP with a deliberately wrong control digit
/// assert!(!cnp::is_valid("1900101221234"));
/// ```

use thiserror::Error;

/// Control digit weights applied to the first 12 digits
const WEIGHTS: [u32; 12] = [2, 7, 9, 1, 4, 6, 3, 5, 8, 2, 7, 9];

/// Validation failure for a CNP
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CnpError {
    /// Not exactly 13 ASCII digits
    #[error("CNP-ul trebuie sa contina exact 13 cifre")]
    InvalidFormat,

    /// First digit is zero (no such sex/century component)
    #[error("Prima cifra a CNP-ului este invalida")]
    InvalidSexDigit,

    /// Month component outside 01-12
    #[error("Luna din CNP este invalida")]
    InvalidMonth,

    /// Day component outside 01-31
    #[error("Ziua din CNP este invalida")]
    InvalidDay,

    /// Control digit does not match the checksum
    #[error("Cifra de control a CNP-ului este incorecta")]
    InvalidChecksum,
}

/// Validates a CNP
///
/// # Errors
///
/// Returns the first failed check as a [`CnpError`].
pub fn validate(cnp: &str) -> Result<(), CnpError> {
    if cnp.len() != 13 || !cnp.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CnpError::InvalidFormat);
    }

    let digits: Vec<u32> = cnp.bytes().map(|b| (b - b'0') as u32).collect();

    if digits[0] == 0 {
        return Err(CnpError::InvalidSexDigit);
    }

    let month = digits[3] * 10 + digits[4];
    if !(1..=12).contains(&month) {
        return Err(CnpError::InvalidMonth);
    }

    let day = digits[5] * 10 + digits[6];
    if !(1..=31).contains(&day) {
        return Err(CnpError::InvalidDay);
    }

    let sum: u32 = digits[..12]
        .iter()
        .zip(WEIGHTS.iter())
        .map(|(d, w)| d * w)
        .sum();

    let control = match sum % 11 {
        10 => 1,
        rest => rest,
    };

    if control != digits[12] {
        return Err(CnpError::InvalidChecksum);
    }

    Ok(())
}

/// Convenience predicate over [`validate`]
pub fn is_valid(cnp: &str) -> bool {
    validate(cnp).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_cnp() {
        assert_eq!(validate("1900101221239"), Ok(()));
    }

    #[test]
    fn test_wrong_control_digit() {
        // Format is fine, only the final digit is off
        assert_eq!(validate("1900101221234"), Err(CnpError::InvalidChecksum));
        assert!(!is_valid("1900101221234"));
    }

    #[test]
    fn test_wrong_length() {
        assert_eq!(validate(""), Err(CnpError::InvalidFormat));
        assert_eq!(validate("190010122123"), Err(CnpError::InvalidFormat));
        assert_eq!(validate("19001012212390"), Err(CnpError::InvalidFormat));
    }

    #[test]
    fn test_non_digit_characters() {
        assert_eq!(validate("190010122123x"), Err(CnpError::InvalidFormat));
        assert_eq!(validate("1 900101221239"), Err(CnpError::InvalidFormat));
        // Unicode digits are not ASCII digits
        assert_eq!(validate("١٩٠٠١٠١٢٢١٢٣٩"), Err(CnpError::InvalidFormat));
    }

    #[test]
    fn test_zero_sex_digit() {
        assert_eq!(validate("0900101221239"), Err(CnpError::InvalidSexDigit));
    }

    #[test]
    fn test_invalid_month() {
        assert_eq!(validate("1901301221239"), Err(CnpError::InvalidMonth));
        assert_eq!(validate("1900001221239"), Err(CnpError::InvalidMonth));
    }

    #[test]
    fn test_invalid_day() {
        assert_eq!(validate("1900100221239"), Err(CnpError::InvalidDay));
        assert_eq!(validate("1900132221239"), Err(CnpError::InvalidDay));
    }

    #[test]
    fn test_error_messages_are_romanian() {
        assert_eq!(
            CnpError::InvalidFormat.to_string(),
            "CNP-ul trebuie sa contina exact 13 cifre"
        );
        assert_eq!(
            CnpError::InvalidChecksum.to_string(),
            "Cifra de control a CNP-ului este incorecta"
        );
    }
}
