/// Lowercase, hyphenated identifier for a display label.
///
/// Anything that is not a letter or digit separates words, and so does a
/// case change inside a word (`waterNeeds`, `PHLevel`). Letters outside
/// ASCII are kept (`Café` becomes `café`).
pub fn slugify(label: &str) -> String {
    let chars: Vec<char> = label.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if !current.is_empty() && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let camel = prev.is_lowercase() || prev.is_numeric();
            let acronym_end = prev.is_uppercase() && next_lower;
            if camel || acronym_end {
                words.push(std::mem::take(&mut current));
            }
        }

        current.extend(c.to_lowercase());
    }

    if !current.is_empty() {
        words.push(current);
    }

    words.join("-")
}
