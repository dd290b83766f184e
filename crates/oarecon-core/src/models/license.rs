const IN_COPYRIGHT: &str = "https://rightsstatements.org/page/InC/1.0/";

/// Map a record-store license code to the repository's rights URI.
///
/// Unknown or missing codes map to the empty string, which later fails
/// deposit validation on `rights`.
pub fn rights_uri(code: &str) -> &'static str {
    match code.trim() {
        "other-closed" | "other (non-commercial)" => IN_COPYRIGHT,
        "cc-by" => "https://creativecommons.org/licenses/by/4.0/",
        "cc-by-nc" => "https://creativecommons.org/licenses/by-nc/4.0/",
        "cc-by-nc-sa" => "https://creativecommons.org/licenses/by-nc-sa/4.0/",
        "cc-by-nc-nd" => "https://creativecommons.org/licenses/by-nc-nd/4.0/",
        "cc0" => "http://creativecommons.org/publicdomain/zero/1.0/",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(rights_uri("cc-by"), "https://creativecommons.org/licenses/by/4.0/");
        assert_eq!(rights_uri("cc0"), "http://creativecommons.org/publicdomain/zero/1.0/");
        assert_eq!(rights_uri("other-closed"), IN_COPYRIGHT);
        assert_eq!(rights_uri("other (non-commercial)"), IN_COPYRIGHT);
    }

    #[test]
    fn test_unknown_and_missing_are_empty() {
        assert_eq!(rights_uri(""), "");
        assert_eq!(rights_uri("cc-by-sa"), "");
        assert_eq!(rights_uri("CC-BY"), "");
    }
}
