/// Quote s as a Cypher string literal
pub fn quote_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Check that s can be used unquoted as a label, relationship type or property name
pub fn check_ident(s: &str) -> anyhow::Result<&str> {
    let mut it = s.chars();
    match it.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            if it.all(|c| c.is_ascii_alphanumeric() || c == '_') {
                Ok(s)
            } else {
                Err(anyhow!("Illegal character in identifier {}", s))
            }
        }
        _ => Err(anyhow!("Illegal identifier '{}'", s)),
    }
}
