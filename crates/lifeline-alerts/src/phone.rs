/// Phone-number normalization for outbound messaging.
///
/// Two deliberately distinct passes exist. `normalize_for_storage` is the
/// contact directory's canonicalization; `normalize_for_dispatch` is the
/// simpler pass the per-recipient SMS channel applies on top of it. The
/// second pass is redundant on already-canonical input but kept for parity
/// with the original contact pipeline.

/// A contact ready for outbound messaging: phone in canonical
/// `+<country><digits>` form.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedContact {
    pub name: String,
    pub phone: String,
    pub relationship: String,
}

/// Canonicalize a stored phone number to `<country_code><digits>`.
///
/// Known defect, preserved intentionally: a number carrying a *different*
/// international prefix has its `+` stripped and the canonical code glued on
/// front, corrupting non-domestic numbers into domestic-looking ones. The
/// original system behaves this way and contacts entered under that regime
/// would silently change meaning if this were "fixed" here alone.
pub fn normalize_for_storage(phone: &str, country_code: &str) -> String {
    if phone.starts_with(country_code) {
        phone.to_string()
    } else if let Some(rest) = phone.strip_prefix('+') {
        format!("{}{}", country_code, rest)
    } else {
        format!("{}{}", country_code, phone)
    }
}

/// E.164-ish touch-up applied at SMS dispatch time: prefix `+` if absent.
pub fn normalize_for_dispatch(phone: &str) -> String {
    if phone.starts_with('+') {
        phone.to_string()
    } else {
        format!("+{}", phone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CC: &str = "+91";

    #[test]
    fn storage_normalization_is_idempotent() {
        let once = normalize_for_storage("9876543210", CC);
        assert_eq!(once, "+919876543210");
        assert_eq!(normalize_for_storage(&once, CC), once);
    }

    #[test]
    fn canonical_prefix_left_untouched() {
        assert_eq!(normalize_for_storage("+919876543210", CC), "+919876543210");
    }

    #[test]
    fn foreign_prefix_is_lossily_reprefixed() {
        // Pinned defect: a US number becomes a domestic-looking one.
        assert_eq!(normalize_for_storage("+14155550100", CC), "+9114155550100");
    }

    #[test]
    fn bare_digits_get_country_code() {
        assert_eq!(normalize_for_storage("04412345678", CC), "+9104412345678");
    }

    #[test]
    fn dispatch_normalization() {
        assert_eq!(normalize_for_dispatch("+919876543210"), "+919876543210");
        assert_eq!(normalize_for_dispatch("919876543210"), "+919876543210");
    }
}
