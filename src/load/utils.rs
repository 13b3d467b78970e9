use std::collections::HashSet;

/// Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

/// Trim header names and suffix repeats with `.1`, `.2`, ... so every column
/// name is unique. Blank names become `Unnamed: <index>`.
pub fn normalize_headers<'a, I>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let trimmed: Vec<String> = raw
        .into_iter()
        .enumerate()
        .map(|(i, h)| {
            let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
            match h.trim() {
                "" => format!("Unnamed: {i}"),
                name => name.to_string(),
            }
        })
        .collect();

    let mut taken: HashSet<String> = HashSet::with_capacity(trimmed.len());
    let mut out = Vec::with_capacity(trimmed.len());
    for name in &trimmed {
        let mut candidate = name.clone();
        let mut n = 0;
        while taken.contains(&candidate) {
            n += 1;
            candidate = format!("{name}.{n}");
        }
        taken.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_str_trims_and_unquotes() {
        assert_eq!(clean_str("  100.5 "), "100.5");
        assert_eq!(clean_str("\"East\""), "East");
        assert_eq!(clean_str("\""), "\"");
    }

    #[test]
    fn headers_are_trimmed_and_deduplicated() {
        let got = normalize_headers(["\u{feff} Sales", "Date ", "Sales", " Sales", "Sales.1"]);
        assert_eq!(got, vec!["Sales", "Date", "Sales.1", "Sales.2", "Sales.1.1"]);
    }

    #[test]
    fn blank_headers_get_positional_names() {
        assert_eq!(normalize_headers(["Sales", " ", "Date"]), vec!["Sales", "Unnamed: 1", "Date"]);
    }
}
