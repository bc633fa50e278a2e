//! Street name simplification.

/// Replace Hungarian accented letters with their base letter.
pub fn strip_diacritics(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' | 'ö' | 'ő' => 'o',
            'ú' | 'ü' | 'ű' => 'u',
            'Á' => 'A',
            'É' => 'E',
            'Í' => 'I',
            'Ó' | 'Ö' | 'Ő' => 'O',
            'Ú' | 'Ü' | 'Ű' => 'U',
            other => other,
        })
        .collect()
}

/// Lower-case, accent-free form of a street name, spaces as `_`.
///
/// Used as a stable key for file names and as the sort key for street lists.
pub fn simplify(name: &str) -> String {
    strip_diacritics(&name.to_lowercase()).replace(' ', "_")
}

/// Street name as a URL path segment: spaces encoded, everything else kept.
pub fn url_path_segment(name: &str) -> String {
    name.replace(' ', "%20")
}

/// Sort street names by their simplified form, then by the name itself.
pub fn sort_streets(names: &mut [String]) {
    names.sort_by_cached_key(|name| (simplify(name), name.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simplify_hungarian() {
        assert_eq!(simplify("Árpád Fejedelem útja"), "arpad_fejedelem_utja");
        assert_eq!(simplify("Őrség Ütköző Űr"), "orseg_utkozo_ur");
        assert_eq!(simplify("Hősök tere"), "hosok_tere");
    }

    #[test]
    fn url_segment() {
        assert_eq!(url_path_segment("Kossuth Lajos utca"), "Kossuth%20Lajos%20utca");
    }

    #[test]
    fn sort_ignores_accents_and_case() {
        let mut names = vec![
            "Zsálya utca".to_string(),
            "ábel utca".to_string(),
            "Becsali utca".to_string(),
        ];
        sort_streets(&mut names);
        assert_eq!(names, vec!["ábel utca", "Becsali utca", "Zsálya utca"]);
    }
}
