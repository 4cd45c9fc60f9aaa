/// Builds a URL slug: lowercase, punctuation dropped, runs of whitespace,
/// underscores and dashes collapsed to a single `-`, no leading or
/// trailing dashes.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for ch in input.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn collapses_separators() {
        assert_eq!(slugify("  Canon EOS  R5 "), "canon-eos-r5");
        assert_eq!(slugify("Lens__Kit -- 50mm"), "lens-kit-50mm");
    }

    #[test]
    fn drops_punctuation() {
        assert_eq!(slugify("Sony α7 IV (Body)!"), "sony-α7-iv-body");
        assert_eq!(slugify("--Tripods & Stands--"), "tripods-stands");
    }

    #[test]
    fn empty_input() {
        assert_eq!(slugify("   "), "");
        assert_eq!(slugify("!!!"), "");
    }
}
