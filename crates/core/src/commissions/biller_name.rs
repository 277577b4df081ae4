use crate::constants::{BILLER_MARKER_DASH, BILLER_MARKER_FOR};

/// Derives the biller name from an uploaded file name.
///
/// * `... Fee-Commission Scheme for <biller>_<rest>` gives `<biller>`
/// * `... Fee-Commission Scheme - <biller> - <rest>` gives `<biller>`
/// * anything else gives the file name without its extension
///
/// When the marker is present but the delimiter is not, the remainder of the
/// name (extension stripped) is used.
pub fn derive_biller_name(file_name: &str) -> String {
    let stem = strip_extension(file_name.trim());

    let derived = if let Some((_, rest)) = file_name.split_once(BILLER_MARKER_FOR) {
        match rest.split_once('_') {
            Some((name, _)) => name,
            None => strip_extension(rest),
        }
    } else if let Some((_, rest)) = file_name.split_once(BILLER_MARKER_DASH) {
        match rest.split_once(" - ") {
            Some((name, _)) => name,
            None => strip_extension(rest),
        }
    } else {
        stem
    };

    match derived.trim() {
        "" => stem.trim().to_string(),
        name => name.to_string(),
    }
}

fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underscore_form() {
        assert_eq!(
            derive_biller_name("Fee-Commission Scheme for Acme Corp_v2.xlsx"),
            "Acme Corp"
        );
    }

    #[test]
    fn test_dash_form() {
        assert_eq!(
            derive_biller_name("Fee-Commission Scheme - Acme Corp - final.xlsx"),
            "Acme Corp"
        );
    }

    #[test]
    fn test_fallback_uses_stem() {
        assert_eq!(derive_biller_name("random_file.xlsx"), "random_file");
        assert_eq!(derive_biller_name("no_extension"), "no_extension");
        assert_eq!(derive_biller_name(".xlsx"), ".xlsx");
    }

    #[test]
    fn test_marker_without_delimiter() {
        assert_eq!(
            derive_biller_name("Fee-Commission Scheme for Dhaka WASA.xlsx"),
            "Dhaka WASA"
        );
        assert_eq!(
            derive_biller_name("2024 Fee-Commission Scheme - DESCO.xlsx"),
            "DESCO"
        );
    }

    #[test]
    fn test_empty_biller_falls_back_to_stem() {
        assert_eq!(
            derive_biller_name("Fee-Commission Scheme for _v2.xlsx"),
            "Fee-Commission Scheme for _v2"
        );
    }
}
