/// Best-effort extraction of grocery item names from recognized receipt
/// text. Deterministic for identical input; false positives and negatives
/// are acceptable over noisy recognition output.

/// Lines containing any of these (case-insensitively) are never items.
const NOISE_WORDS: [&str; 6] = ["TOTAL", "VAT", "TAX", "CHANGE", "CASH", "SUBTOTAL"];

/// Parse raw recognized text into a deduplicated list of plausible item
/// names, in first-occurrence order.
pub fn parse_receipt_text(raw: &str) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    for line in raw.lines() {
        if let Some(item) = clean_line(line) {
            if !items.contains(&item) {
                items.push(item);
            }
        }
    }
    items
}

fn clean_line(line: &str) -> Option<String> {
    let line = line.trim();
    // Strip a trailing price ("25.99") and then a leading quantity ("2 ").
    let line = line
        .trim_end_matches(|c: char| c.is_ascii_digit() || c == '.' || c == ',')
        .trim_end();
    let line = strip_leading_quantity(line);

    let len = line.chars().count();
    if !(3..=40).contains(&len) {
        return None;
    }
    if !line.chars().any(|c| c.is_alphabetic()) {
        return None;
    }
    let upper = line.to_uppercase();
    if NOISE_WORDS.iter().any(|w| upper.contains(w)) {
        return None;
    }
    // Long all-caps lines are almost always store headers or footers.
    if line == upper && len > 10 {
        return None;
    }
    Some(title_case(line))
}

fn strip_leading_quantity(line: &str) -> &str {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return line;
    }
    let rest = &line[digits..];
    let trimmed = rest.trim_start();
    if trimmed.len() == rest.len() {
        // Digits not followed by whitespace are part of the name ("7up").
        return line;
    }
    trimmed
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_and_cleans_plausible_items() {
        let raw = "2 Full Cream Milk 25.99\nSUBTOTAL 150.00\nBANANAS\nabc";
        let items = parse_receipt_text(raw);
        assert_eq!(items, vec!["Full Cream Milk", "Bananas", "Abc"]);
    }

    #[test]
    fn three_char_lines_are_kept() {
        assert_eq!(parse_receipt_text("abc"), vec!["Abc"]);
        assert_eq!(parse_receipt_text("ab"), Vec::<String>::new());
    }

    #[test]
    fn noise_words_are_dropped_case_insensitively() {
        let raw = "Total due 99.00\nvat 15%\nCash tendered\nMilk";
        assert_eq!(parse_receipt_text(raw), vec!["Milk"]);
    }

    #[test]
    fn all_caps_dropped_only_when_longer_than_ten() {
        // 8 characters of shouting is still an item.
        assert_eq!(parse_receipt_text("BANANAS"), vec!["Bananas"]);
        assert_eq!(
            parse_receipt_text("THANK YOU FOR SHOPPING"),
            Vec::<String>::new()
        );
    }

    #[test]
    fn prices_and_quantities_are_stripped() {
        assert_eq!(parse_receipt_text("3 Brown Bread 18.50"), vec!["Brown Bread"]);
        assert_eq!(parse_receipt_text("Eggs 32,99"), vec!["Eggs"]);
    }

    #[test]
    fn lines_without_letters_are_dropped() {
        assert_eq!(parse_receipt_text("123 456 --- 9.99"), Vec::<String>::new());
    }

    #[test]
    fn overlong_lines_are_dropped() {
        let long = "A very long receipt line that keeps going well past forty characters";
        assert_eq!(parse_receipt_text(long), Vec::<String>::new());
    }

    #[test]
    fn duplicates_collapse_to_first_occurrence() {
        let raw = "Milk 10.00\nBread\nMILK 10.00";
        assert_eq!(parse_receipt_text(raw), vec!["Milk", "Bread"]);
    }

    #[test]
    fn deterministic_for_identical_input() {
        let raw = "2 Apples 12.00\nJuice 22.50\nApples";
        assert_eq!(parse_receipt_text(raw), parse_receipt_text(raw));
    }

    #[test]
    fn leading_digits_without_space_stay_in_name() {
        assert_eq!(parse_receipt_text("7up can"), vec!["7up Can"]);
    }
}
