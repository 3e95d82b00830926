//! CNPJ normalization and check-digit validation.
//!
//! A CNPJ is the 14-digit Brazilian business tax identifier. The last two
//! digits are check digits computed from weighted sums over the preceding
//! digits; a string of 14 identical digits is always invalid even though
//! its checksum happens to hold.

/// Strips everything but ASCII digits from a raw CNPJ value.
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Validates a CNPJ after normalization.
///
/// Accepts formatted (`11.222.333/0001-81`) and bare (`11222333000181`)
/// input. Rejects wrong lengths, repeated-digit sequences, and checksum
/// mismatches.
#[must_use]
pub fn is_valid(raw: &str) -> bool {
    let cleaned = normalize(raw);
    if cleaned.len() != 14 {
        return false;
    }

    let digits: Vec<u32> = cleaned.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    check_digit(&digits[..12]) == digits[12] && check_digit(&digits[..13]) == digits[13]
}

/// Renders a normalized CNPJ in the display form `NN.NNN.NNN/NNNN-NN`.
///
/// Returns the normalized digits unchanged when the value is not 14 digits
/// long.
#[must_use]
pub fn format(raw: &str) -> String {
    let cleaned = normalize(raw);
    if cleaned.len() != 14 {
        return cleaned;
    }
    format!(
        "{}.{}.{}/{}-{}",
        &cleaned[..2],
        &cleaned[2..5],
        &cleaned[5..8],
        &cleaned[8..12],
        &cleaned[12..]
    )
}

// Weights cycle 2..=9 from the rightmost digit leftwards.
fn check_digit(digits: &[u32]) -> u32 {
    let mut sum = 0u32;
    let mut weight = 2u32;
    for &digit in digits.iter().rev() {
        sum += digit * weight;
        weight = if weight == 9 { 2 } else { weight + 1 };
    }
    let remainder = sum % 11;
    if remainder < 2 { 0 } else { 11 - remainder }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Check digits verified by hand against the national algorithm.
    const VALID: [&str; 5] = [
        "11222333000181",
        "11444777000161",
        "12345678000195",
        "04025289000154",
        "61365480000189",
    ];

    const INVALID: [&str; 5] = [
        "11222333000182", // last check digit off by one
        "11444777000171", // first check digit off by one
        "12345678000190",
        "0402528900015",  // 13 digits
        "613654800001890", // 15 digits
    ];

    #[test]
    fn accepts_known_valid_ids() {
        for cnpj in VALID {
            assert!(is_valid(cnpj), "expected valid: {cnpj}");
        }
    }

    #[test]
    fn rejects_known_invalid_ids() {
        for cnpj in INVALID {
            assert!(!is_valid(cnpj), "expected invalid: {cnpj}");
        }
    }

    #[test]
    fn rejects_repeated_digit_sequences() {
        for digit in 0..=9u8 {
            let repeated: String = std::iter::repeat_n(char::from(b'0' + digit), 14).collect();
            assert!(!is_valid(&repeated), "expected invalid: {repeated}");
        }
    }

    #[test]
    fn accepts_formatted_input() {
        assert!(is_valid("11.222.333/0001-81"));
    }

    #[test]
    fn normalizes_punctuation() {
        assert_eq!(normalize("11.222.333/0001-81"), "11222333000181");
    }

    #[test]
    fn formats_display_form() {
        assert_eq!(format("11222333000181"), "11.222.333/0001-81");
        // Non-14-digit values pass through normalized.
        assert_eq!(format("123"), "123");
    }
}
