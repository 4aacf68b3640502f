/// Rewrite Python-style literal keywords (`True`, `False`, `None`) to their
/// JSON spelling. Text inside single- or double-quoted strings is copied
/// through untouched, including escape sequences.
pub fn normalize_native_literals(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(ch) = chars.next() {
        if let Some(q) = quote {
            out.push(ch);
            if ch == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if ch == q {
                quote = None;
            }
            continue;
        }

        if ch == '"' || ch == '\'' {
            quote = Some(ch);
            out.push(ch);
            continue;
        }

        if is_ident_start(ch) {
            let mut word = String::new();
            word.push(ch);
            while let Some(&next) = chars.peek() {
                if !is_ident_continue(next) {
                    break;
                }
                word.push(next);
                chars.next();
            }
            out.push_str(match word.as_str() {
                "True" => "true",
                "False" => "false",
                "None" => "null",
                _ => word.as_str(),
            });
            continue;
        }

        out.push(ch);
    }

    out
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '$'
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}

#[cfg(test)]
mod tests {
    use super::normalize_native_literals;

    #[test]
    fn rewrites_python_keywords() {
        assert_eq!(
            normalize_native_literals("{'a': True, 'b': False, 'c': None}"),
            "{'a': true, 'b': false, 'c': null}"
        );
    }

    #[test]
    fn leaves_quoted_text_alone() {
        let raw = r#"{"note": "True story, None left", 'it\'s': 'False'}"#;
        assert_eq!(normalize_native_literals(raw), raw);
    }

    #[test]
    fn only_whole_words_are_rewritten() {
        assert_eq!(
            normalize_native_literals("[Trueish, NoneType, True_]"),
            "[Trueish, NoneType, True_]"
        );
    }
}
